//! Shared test fixtures: a physical layer whose open/close attempts
//! are driven by the test itself, and a helper that drains a
//! subscription into a recorded sequence of observable states.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use plm_monitor::physical_layer::{PhysicalLayer, PhysicalLayerEvents};
use plm_monitor::{MonitorHandle, ObservableState};

/// A physical layer that counts open/close attempts and hands its
/// event channel to the test through a shared slot, so the test can
/// simulate completion of an attempt whenever it chooses.
pub struct ScriptedPhysicalLayer {
    events: Arc<Mutex<Option<PhysicalLayerEvents>>>,
    open_calls: Arc<AtomicUsize>,
    close_calls: Arc<AtomicUsize>,
}

/// A handle a test keeps to drive and inspect a [`ScriptedPhysicalLayer`]
/// it has already handed off to a monitor.
#[derive(Clone)]
pub struct PhysicalLayerHandle {
    events: Arc<Mutex<Option<PhysicalLayerEvents>>>,
    open_calls: Arc<AtomicUsize>,
    close_calls: Arc<AtomicUsize>,
}

impl PhysicalLayerHandle {
    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    fn events(&self) -> PhysicalLayerEvents {
        self.events
            .lock()
            .unwrap()
            .clone()
            .expect("physical layer not bound yet")
    }

    pub fn succeed_open(&self) {
        self.events().open_succeeded();
    }

    pub fn fail_open(&self) {
        self.events().open_failed();
    }

    pub fn report_closed(&self) {
        self.events().closed();
    }
}

/// Build a scripted physical layer together with the handle a test
/// uses to drive it.
pub fn scripted_physical_layer() -> (Box<dyn PhysicalLayer + Send>, PhysicalLayerHandle) {
    let events = Arc::new(Mutex::new(None));
    let open_calls = Arc::new(AtomicUsize::new(0));
    let close_calls = Arc::new(AtomicUsize::new(0));

    let layer = ScriptedPhysicalLayer {
        events: Arc::clone(&events),
        open_calls: Arc::clone(&open_calls),
        close_calls: Arc::clone(&close_calls),
    };
    let handle = PhysicalLayerHandle {
        events,
        open_calls,
        close_calls,
    };

    (Box::new(layer), handle)
}

impl PhysicalLayer for ScriptedPhysicalLayer {
    fn bind(&mut self, events: PhysicalLayerEvents) {
        *self.events.lock().unwrap() = Some(events);
    }

    fn async_open(&mut self) {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn async_close(&mut self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Subscribe to a monitor and spawn a task that drains the
/// subscription into a shared, append-only record of observable
/// states, starting from the monitor's current state.
pub fn record_observable_states(handle: &MonitorHandle) -> Arc<Mutex<Vec<ObservableState>>> {
    let mut rx = handle.subscribe();
    let states = Arc::new(Mutex::new(Vec::new()));
    let states_for_task = Arc::clone(&states);

    tokio::spawn(async move {
        while let Some(changed) = rx.recv().await {
            states_for_task.lock().unwrap().push(changed.0);
        }
    });

    states
}
