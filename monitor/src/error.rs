//! Error type for the monitor.

use thiserror::Error;

use crate::state::{Event, InternalState};

/// Errors the monitor can raise.
///
/// A small, closed error type modeled directly with `thiserror`, the
/// way `ice-core`'s own `Error` enum is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum MonitorError {
    /// A lower-edge or timer event was delivered in a state that the
    /// transition table marks as illegal for it. This signals a bug in
    /// the physical layer implementation or the timer wiring, not a
    /// user mistake: user intents are never illegal, only ignored.
    #[error("event {event:?} is illegal in state {state:?}")]
    IllegalEvent {
        /// The internal state the monitor was in.
        state: InternalState,
        /// The event that was illegal in that state.
        event: Event,
    },
}
