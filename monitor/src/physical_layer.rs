//! The physical layer collaborator interface.
//!
//! The original source wires the physical layer back to its monitor
//! through a raw pointer (`m_pPhysicalLayerMonitor`) set at
//! construction time and invoked directly from the layer's own
//! methods. Here the layer instead holds a channel handed to it up
//! front, the same way `ClientTransactionData` holds an `events_tx:
//! mpsc::Sender<TransactionEvent>` to report back to whoever is
//! driving it, rather than a stored reference to a concrete type.
//! This keeps `PhysicalLayer` implementations decoupled from the
//! monitor's own event loop: anything holding the receiving end of
//! the channel can drive the state machine.

use tokio::sync::mpsc;

use crate::state::ObservableState;

/// The three things a [`PhysicalLayer`] can report back about an
/// open or close attempt in flight.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LayerEvent {
    /// An in-flight `async_open` call completed successfully.
    OpenSucceeded,
    /// An in-flight `async_open` call failed.
    OpenFailed,
    /// The layer closed, whether in response to an `async_close` call
    /// or not. The monitor tells the two cases apart from its own
    /// state, not from a flag on this event.
    Closed,
}

/// Delivered to observers registered with a monitor whenever its
/// observable state changes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LayerStateChanged(pub ObservableState);

/// The channel a [`PhysicalLayer`] reports completion of an open or
/// close attempt on. Built by the monitor's event loop around its own
/// command channel and handed to the layer at construction time.
#[derive(Clone)]
pub struct PhysicalLayerEvents {
    tx: mpsc::UnboundedSender<LayerEvent>,
}

impl PhysicalLayerEvents {
    pub(crate) fn new(tx: mpsc::UnboundedSender<LayerEvent>) -> Self {
        PhysicalLayerEvents { tx }
    }

    /// Report that an in-flight `async_open` call completed
    /// successfully. A no-op if the monitor has already gone away.
    pub fn open_succeeded(&self) {
        let _ = self.tx.send(LayerEvent::OpenSucceeded);
    }

    /// Report that an in-flight `async_open` call failed.
    pub fn open_failed(&self) {
        let _ = self.tx.send(LayerEvent::OpenFailed);
    }

    /// Report that the layer closed.
    pub fn closed(&self) {
        let _ = self.tx.send(LayerEvent::Closed);
    }
}

/// A physical layer: a serial port, TCP socket, or other bidirectional
/// channel the monitor supervises the lifecycle of.
///
/// Implementations own the actual I/O resource. `async_open` and
/// `async_close` must not block the caller; each reports its outcome
/// asynchronously through the [`PhysicalLayerEvents`] handed to
/// [`bind`](PhysicalLayer::bind). The monitor calls each of
/// `async_open`/`async_close` at most once before the matching
/// completion event arrives, so implementations do not need to guard
/// against re-entrant calls.
pub trait PhysicalLayer: Send {
    /// Hand the layer the channel to report completion on. Called
    /// once, before any call to `async_open` or `async_close`.
    fn bind(&mut self, events: PhysicalLayerEvents);

    /// Begin opening the layer. Must eventually report
    /// `open_succeeded` or `open_failed`, never both, never neither.
    fn async_open(&mut self);

    /// Begin closing the layer. Must eventually report `closed`.
    fn async_close(&mut self);
}
