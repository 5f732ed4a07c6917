//! Command and handle types for the monitor's event loop: the data
//! half of the actor, split out from its dispatch logic the way
//! `ClientTransactionData` separates `CommandSender`/`CommandReceiver`
//! and the data a transaction's event loop owns from the loop itself.

use tokio::sync::mpsc;

use crate::physical_layer::LayerStateChanged;
use crate::state::Event;

/// Everything the monitor's event loop reacts to, besides physical
/// layer completion (which arrives on its own channel, see
/// [`crate::physical_layer::PhysicalLayerEvents`]).
pub(crate) enum Command {
    /// A state event to dispatch: one of the four user intents, or
    /// the internal open timer firing.
    Dispatch(Event),
    /// Register a channel to be sent a [`LayerStateChanged`] every
    /// time the monitor's observable state changes, starting from its
    /// current state.
    Subscribe(mpsc::UnboundedSender<LayerStateChanged>),
}

/// Sending half of the monitor's command channel.
pub(crate) type CommandSender = mpsc::UnboundedSender<Command>;

/// Receiving half of the monitor's command channel.
pub(crate) type CommandReceiver = mpsc::UnboundedReceiver<Command>;

/// A cloneable handle to a running monitor. Dropping every clone of a
/// handle (and the physical layer's own sender) lets the monitor's
/// event loop task end.
#[derive(Clone)]
pub struct MonitorHandle {
    pub(crate) cmd_tx: CommandSender,
}

impl MonitorHandle {
    /// User intent: open the physical layer.
    pub fn start(&self) {
        let _ = self.cmd_tx.send(Command::Dispatch(Event::Start));
    }

    /// User intent: close the physical layer.
    pub fn close(&self) {
        let _ = self.cmd_tx.send(Command::Dispatch(Event::Close));
    }

    /// User intent: suspend (close, and do not retry).
    pub fn suspend(&self) {
        let _ = self.cmd_tx.send(Command::Dispatch(Event::Suspend));
    }

    /// User intent: shut down permanently.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Dispatch(Event::Shutdown));
    }

    /// Subscribe to observable state changes, starting from the
    /// monitor's current state.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<LayerStateChanged> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = self.cmd_tx.send(Command::Subscribe(tx));
        rx
    }
}
