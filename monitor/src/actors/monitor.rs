//! The monitor's event loop: owns the current state, runs the retry
//! timer as a cancellable spawned task (the same way
//! `LayerTaskManager` tracks a `JoinHandle` per spawned task and
//! aborts it on demand), and drives a [`PhysicalLayer`] through its
//! open/close lifecycle.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actors::messages::{Command, CommandReceiver, MonitorHandle};
use crate::error::MonitorError;
use crate::physical_layer::{LayerEvent, LayerStateChanged, PhysicalLayer, PhysicalLayerEvents};
use crate::state::{self, Action, Event, InternalState, ObservableState, Outcome};

/// Build a monitor around the given physical layer, starting in
/// `Suspended`, and spawn its event loop. Returns a [`MonitorHandle`]
/// for sending it intents and subscribing to its observable state.
pub fn spawn(layer: Box<dyn PhysicalLayer + Send>, retry_interval: Duration) -> MonitorHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (layer_tx, layer_rx) = mpsc::unbounded_channel();

    let handle = MonitorHandle {
        cmd_tx: cmd_tx.clone(),
    };

    let mut monitor = Monitor {
        state: InternalState::Suspended,
        layer,
        retry_interval,
        timer_handle: None,
        observers: Vec::new(),
        cmd_tx,
    };
    monitor.layer.bind(PhysicalLayerEvents::new(layer_tx));

    tokio::spawn(monitor.run(cmd_rx, layer_rx));

    handle
}

/// The monitor context: supervises a single [`PhysicalLayer`] through
/// its open/close lifecycle, retrying failed opens on a timer and
/// notifying subscribers of observable state changes.
struct Monitor {
    state: InternalState,
    layer: Box<dyn PhysicalLayer + Send>,
    retry_interval: Duration,
    timer_handle: Option<JoinHandle<()>>,
    observers: Vec<mpsc::UnboundedSender<LayerStateChanged>>,
    /// Clone used to post the open timer's own firing back onto the
    /// command channel it was spawned from.
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Monitor {
    async fn run(mut self, mut cmd_rx: CommandReceiver, mut layer_rx: mpsc::UnboundedReceiver<LayerEvent>) {
        tracing::debug!("monitor event loop started in state {:?}", self.state);

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(Command::Dispatch(event)) => self.dispatch(event),
                        Some(Command::Subscribe(tx)) => self.subscribe(tx),
                        None => break,
                    }
                }
                event = layer_rx.recv() => {
                    match event {
                        Some(LayerEvent::OpenSucceeded) => self.dispatch(Event::LayerOpenSucceeded),
                        Some(LayerEvent::OpenFailed) => self.dispatch(Event::LayerOpenFailed),
                        Some(LayerEvent::Closed) => self.dispatch(Event::LayerClosed),
                        None => break,
                    }
                }
            }
        }

        tracing::trace!("monitor event loop ending in state {:?}", self.state);
    }

    fn dispatch(&mut self, event: Event) {
        let outcome = state::transition(self.state, event);
        match outcome {
            Outcome::Ignored => {
                tracing::debug!("event {:?} ignored in state {:?}", event, self.state);
            }
            Outcome::Illegal => {
                let err = MonitorError::IllegalEvent {
                    state: self.state,
                    event,
                };
                tracing::error!("{}", err);
            }
            Outcome::Transition { to, actions } => {
                let from_observable = self.state.observable();
                tracing::info!("{:?} + {:?} -> {:?}", self.state, event, to);
                self.state = to;

                for action in actions {
                    self.run_action(action);
                }

                let to_observable = self.state.observable();
                if to_observable != from_observable {
                    self.notify_observers(to_observable);
                }
            }
        }
    }

    fn run_action(&mut self, action: Action) {
        match action {
            Action::StartOpenTimer => {
                let cmd_tx = self.cmd_tx.clone();
                let retry_interval = self.retry_interval;
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(retry_interval).await;
                    let _ = cmd_tx.send(Command::Dispatch(Event::OpenTimeout));
                });
                self.timer_handle = Some(handle);
            }
            Action::CancelOpenTimer => {
                if let Some(handle) = self.timer_handle.take() {
                    handle.abort();
                }
            }
            Action::AsyncOpen => self.layer.async_open(),
            Action::AsyncClose => self.layer.async_close(),
        }
    }

    fn subscribe(&mut self, tx: mpsc::UnboundedSender<LayerStateChanged>) {
        let current = self.state.observable();
        let _ = tx.send(LayerStateChanged(current));
        self.observers.push(tx);
    }

    fn notify_observers(&mut self, new_state: ObservableState) {
        self.observers
            .retain(|observer| observer.send(LayerStateChanged(new_state)).is_ok());
    }
}
