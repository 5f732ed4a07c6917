//! The state registry: eleven internal states (see `InternalState`'s
//! doc comment for why it's eleven, not nine), the observable states
//! they surface as, the event and action vocabularies, and the
//! `transition` table that ties them together.
//!
//! This module holds no per-instance data — `InternalState` and
//! `Event` are pure enumeration tags, and `transition` is a free
//! function. There is no singleton machinery and no virtual dispatch:
//! in the source this machine was ported from, each state was its own
//! class assembled out of reusable mixins (`IgnoresClose`,
//! `NotWaitingForTimer`, `OpenFailureCausesWait`, ...); here the same
//! reuse is just shared arms of one `match`.

use std::fmt;

/// The coarse-grained lifecycle value reported to observers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ObservableState {
    /// The physical layer is not open and no open attempt is in flight.
    Closed,
    /// An open attempt is in flight.
    Opening,
    /// The physical layer is open.
    Open,
    /// An open attempt failed and the retry timer is pending.
    Waiting,
    /// The monitor has reached its terminal state.
    Shutdown,
}

impl fmt::Display for ObservableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObservableState::Closed => "CLOSED",
            ObservableState::Opening => "OPENING",
            ObservableState::Open => "OPEN",
            ObservableState::Waiting => "WAITING",
            ObservableState::Shutdown => "SHUTDOWN",
        };
        f.write_str(name)
    }
}

/// The internal state of the monitor.
///
/// Eleven distinct states in total. Every one of them is load-bearing
/// (each appears as the source or destination of at least one
/// transition in `transition`'s table below), so all eleven are kept
/// here; see `DESIGN.md` for the reasoning behind that count.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InternalState {
    /// Idle, not open, no intent pending. The initial state.
    Suspended,
    /// A single `async_open` is in flight, no latent intent.
    Opening,
    /// An `async_open` is in flight; the user has asked to close.
    OpeningClosing,
    /// An `async_open` is in flight; the user has asked to shut down.
    OpeningStopping,
    /// An `async_open` is in flight; the user has asked to suspend.
    OpeningSuspending,
    /// The physical layer is open.
    Open,
    /// An open attempt failed; the retry timer is pending.
    Waiting,
    /// An `async_close` is in flight after a user `close`.
    Closing,
    /// An `async_close` is in flight after a user `suspend`.
    Suspending,
    /// An `async_close` is in flight after a user `shutdown`.
    ShuttingDown,
    /// Terminal. No transition leaves this state.
    Shutdown,
}

impl InternalState {
    /// The observable state this internal state surfaces as.
    pub fn observable(self) -> ObservableState {
        match self {
            InternalState::Suspended
            | InternalState::Closing
            | InternalState::Suspending
            | InternalState::ShuttingDown => ObservableState::Closed,
            InternalState::Opening
            | InternalState::OpeningClosing
            | InternalState::OpeningStopping
            | InternalState::OpeningSuspending => ObservableState::Opening,
            InternalState::Open => ObservableState::Open,
            InternalState::Waiting => ObservableState::Waiting,
            InternalState::Shutdown => ObservableState::Shutdown,
        }
    }

    /// Whether a single `async_open` is currently in flight. Exactly
    /// the four `Opening*` states.
    pub fn has_open_in_flight(self) -> bool {
        matches!(
            self,
            InternalState::Opening
                | InternalState::OpeningClosing
                | InternalState::OpeningStopping
                | InternalState::OpeningSuspending
        )
    }

    /// Whether the retry timer should be pending while in this state.
    /// Exactly `Waiting`.
    pub fn has_timer_pending(self) -> bool {
        matches!(self, InternalState::Waiting)
    }
}

/// The eight events the dispatcher accepts, grouped by origin.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Event {
    /// User intent: open the physical layer.
    Start,
    /// User intent: close the physical layer.
    Close,
    /// User intent: suspend (close, but do not retry).
    Suspend,
    /// User intent: shut down permanently.
    Shutdown,
    /// Layer event: an in-flight open attempt succeeded.
    LayerOpenSucceeded,
    /// Layer event: an in-flight open attempt failed.
    LayerOpenFailed,
    /// Layer event: the physical layer closed (solicited or not).
    LayerClosed,
    /// Timer event: the retry timer fired.
    OpenTimeout,
}

impl Event {
    /// Whether this event is a user intent (as opposed to a lower-edge
    /// or timer event). Intents are idempotent and never illegal.
    pub fn is_intent(self) -> bool {
        matches!(
            self,
            Event::Start | Event::Close | Event::Suspend | Event::Shutdown
        )
    }
}

/// A side effect a transition may request, in the order it must run.
/// Changing the current state itself is represented by
/// [`Outcome::Transition::to`] rather than as a variant here, since
/// every transition performs exactly one and it always runs first.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    /// Schedule the retry timer; only ever requested alongside a
    /// transition into `Waiting`.
    StartOpenTimer,
    /// Cancel the pending retry timer; only ever requested when
    /// leaving `Waiting`.
    CancelOpenTimer,
    /// Ask the physical layer to open.
    AsyncOpen,
    /// Ask the physical layer to close.
    AsyncClose,
}

/// The result of looking up `(state, event)` in the transition table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The event is a no-op in this state: a user intent the state
    /// does not act on. Idempotent, not an error.
    Ignored,
    /// The event is illegal in this state: a lower-edge or timer event
    /// the physical layer or timer should never deliver here. A fatal
    /// invariant violation.
    Illegal,
    /// The event causes a transition to `to`, running `actions` in
    /// order after the state has changed.
    Transition {
        /// The new internal state.
        to: InternalState,
        /// Side effects to run, in order.
        actions: Vec<Action>,
    },
}

impl Outcome {
    fn to(to: InternalState) -> Outcome {
        Outcome::Transition {
            to,
            actions: Vec::new(),
        }
    }

    fn to_with(to: InternalState, actions: Vec<Action>) -> Outcome {
        Outcome::Transition { to, actions }
    }
}

/// Look up the `(state, event)` cell in the transition table and
/// return what it prescribes.
///
/// This is a pure function: it has no side effects of its own and
/// does not touch a monitor's actual timer or physical layer. The
/// caller ([`crate::actors::monitor::MonitorActor`]) is responsible
/// for applying the returned actions.
#[allow(clippy::match_same_arms)]
pub fn transition(state: InternalState, event: Event) -> Outcome {
    use Action::{AsyncClose, AsyncOpen, CancelOpenTimer, StartOpenTimer};
    use Event::*;
    use InternalState::*;

    match (state, event) {
        // --- Suspended (CLOSED) ---
        (Suspended, Start) => Outcome::to_with(Opening, vec![AsyncOpen]),
        (Suspended, Close) => Outcome::Ignored,
        (Suspended, Suspend) => Outcome::Ignored,
        // The layer was never open, so there is nothing to close.
        (Suspended, Shutdown) => Outcome::to(Shutdown),
        (Suspended, LayerOpenSucceeded | LayerOpenFailed | LayerClosed | OpenTimeout) => {
            Outcome::Illegal
        }

        // --- Opening (OPENING) ---
        (Opening, Start) => Outcome::Ignored,
        (Opening, Close) => Outcome::to_with(OpeningClosing, vec![AsyncClose]),
        (Opening, Suspend) => Outcome::to_with(OpeningSuspending, vec![AsyncClose]),
        (Opening, Shutdown) => Outcome::to_with(OpeningStopping, vec![AsyncClose]),
        (Opening, LayerOpenSucceeded) => Outcome::to(Open),
        (Opening, LayerOpenFailed) => Outcome::to_with(Waiting, vec![StartOpenTimer]),
        (Opening, LayerClosed | OpenTimeout) => Outcome::Illegal,

        // --- OpeningClosing (OPENING) ---
        (OpeningClosing, Start) => Outcome::Ignored,
        (OpeningClosing, Close) => Outcome::Ignored,
        (OpeningClosing, Suspend) => Outcome::to(OpeningSuspending),
        (OpeningClosing, Shutdown) => Outcome::to(OpeningStopping),
        // The open attempt resolved (with failure) while a close was
        // pending. The async_close already issued still owes exactly
        // one `layer_closed`, so settle in `Closing` and await it
        // rather than jumping straight to `Waiting`. See DESIGN.md.
        (OpeningClosing, LayerOpenFailed) => Outcome::to(Closing),
        (OpeningClosing, LayerOpenSucceeded | LayerClosed | OpenTimeout) => Outcome::Illegal,

        // --- OpeningStopping (OPENING) ---
        (OpeningStopping, Start) => Outcome::Ignored,
        (OpeningStopping, Close) => Outcome::Ignored,
        (OpeningStopping, Suspend) => Outcome::Ignored,
        // Double shutdown: already on the way out. Ignored, not an error.
        (OpeningStopping, Shutdown) => Outcome::Ignored,
        // The open attempt failed before producing a layer to close;
        // the async_close already issued will find nothing to do, so
        // settle immediately instead of waiting for a `layer_closed`
        // that was never going to arrive for this open attempt.
        (OpeningStopping, LayerOpenFailed) => Outcome::to(Shutdown),
        (OpeningStopping, LayerOpenSucceeded | LayerClosed | OpenTimeout) => Outcome::Illegal,

        // --- OpeningSuspending (OPENING) ---
        // A fresh `start` cancels the latent suspension and returns to
        // the `Opening` family; the close already in flight will just
        // complete on its own. See DESIGN.md.
        (OpeningSuspending, Start) => Outcome::to(Opening),
        (OpeningSuspending, Close) => Outcome::Ignored,
        (OpeningSuspending, Suspend) => Outcome::Ignored,
        (OpeningSuspending, Shutdown) => Outcome::to(OpeningStopping),
        (OpeningSuspending, LayerOpenFailed) => Outcome::to(Suspended),
        (OpeningSuspending, LayerOpenSucceeded | LayerClosed | OpenTimeout) => Outcome::Illegal,

        // --- Open (OPEN) ---
        (Open, Start) => Outcome::Ignored,
        (Open, Close) => Outcome::to_with(Closing, vec![AsyncClose]),
        (Open, Suspend) => Outcome::to_with(Suspending, vec![AsyncClose]),
        (Open, Shutdown) => Outcome::to_with(ShuttingDown, vec![AsyncClose]),
        // Unsolicited close by the peer: reconnect automatically.
        (Open, LayerClosed) => Outcome::to_with(Opening, vec![AsyncOpen]),
        (Open, LayerOpenSucceeded | LayerOpenFailed | OpenTimeout) => Outcome::Illegal,

        // --- Waiting (WAITING) ---
        (Waiting, Start) => Outcome::Ignored,
        (Waiting, Close) => Outcome::Ignored,
        (Waiting, Suspend) => Outcome::to_with(Suspended, vec![CancelOpenTimer]),
        (Waiting, Shutdown) => Outcome::to_with(Shutdown, vec![CancelOpenTimer]),
        (Waiting, OpenTimeout) => Outcome::to_with(Opening, vec![AsyncOpen]),
        (Waiting, LayerOpenSucceeded | LayerOpenFailed | LayerClosed) => Outcome::Illegal,

        // --- Closing (CLOSED) ---
        (Closing, Start) => Outcome::Ignored,
        (Closing, Close) => Outcome::Ignored,
        (Closing, Suspend) => Outcome::to(Suspending),
        (Closing, Shutdown) => Outcome::to(ShuttingDown),
        // Closed cleanly; the close intent has been served, retry.
        (Closing, LayerClosed) => Outcome::to_with(Opening, vec![AsyncOpen]),
        (Closing, LayerOpenSucceeded | LayerOpenFailed | OpenTimeout) => Outcome::Illegal,

        // --- Suspending (CLOSED) ---
        (Suspending, Start) => Outcome::to(Opening),
        (Suspending, Close) => Outcome::Ignored,
        (Suspending, Suspend) => Outcome::Ignored,
        (Suspending, Shutdown) => Outcome::to(ShuttingDown),
        (Suspending, LayerClosed) => Outcome::to(Suspended),
        (Suspending, LayerOpenSucceeded | LayerOpenFailed | OpenTimeout) => Outcome::Illegal,

        // --- ShuttingDown (CLOSED) ---
        (ShuttingDown, Start) => Outcome::Ignored,
        (ShuttingDown, Close) => Outcome::Ignored,
        (ShuttingDown, Suspend) => Outcome::Ignored,
        // Double shutdown: already on the way out.
        (ShuttingDown, Shutdown) => Outcome::Ignored,
        (ShuttingDown, LayerClosed) => Outcome::to(Shutdown),
        (ShuttingDown, LayerOpenSucceeded | LayerOpenFailed | OpenTimeout) => Outcome::Illegal,

        // --- Shutdown (SHUTDOWN), terminal ---
        (Shutdown, Start | Close | Suspend | Shutdown) => Outcome::Ignored,
        (Shutdown, LayerOpenSucceeded | LayerOpenFailed | LayerClosed | OpenTimeout) => {
            Outcome::Illegal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> [InternalState; 11] {
        [
            InternalState::Suspended,
            InternalState::Opening,
            InternalState::OpeningClosing,
            InternalState::OpeningStopping,
            InternalState::OpeningSuspending,
            InternalState::Open,
            InternalState::Waiting,
            InternalState::Closing,
            InternalState::Suspending,
            InternalState::ShuttingDown,
            InternalState::Shutdown,
        ]
    }

    fn all_events() -> [Event; 8] {
        [
            Event::Start,
            Event::Close,
            Event::Suspend,
            Event::Shutdown,
            Event::LayerOpenSucceeded,
            Event::LayerOpenFailed,
            Event::LayerClosed,
            Event::OpenTimeout,
        ]
    }

    #[test]
    fn transition_table_is_total() {
        // Every (state, event) pair must be handled: the `match` in
        // `transition` would fail to compile otherwise, but this also
        // exercises the full table at least once.
        for &state in &all_states() {
            for &event in &all_events() {
                let _ = transition(state, event);
            }
        }
    }

    #[test]
    fn observable_state_mapping_matches_spec() {
        assert_eq!(InternalState::Suspended.observable(), ObservableState::Closed);
        assert_eq!(InternalState::Closing.observable(), ObservableState::Closed);
        assert_eq!(InternalState::Suspending.observable(), ObservableState::Closed);
        assert_eq!(InternalState::ShuttingDown.observable(), ObservableState::Closed);

        assert_eq!(InternalState::Opening.observable(), ObservableState::Opening);
        assert_eq!(InternalState::OpeningClosing.observable(), ObservableState::Opening);
        assert_eq!(InternalState::OpeningStopping.observable(), ObservableState::Opening);
        assert_eq!(InternalState::OpeningSuspending.observable(), ObservableState::Opening);

        assert_eq!(InternalState::Open.observable(), ObservableState::Open);
        assert_eq!(InternalState::Waiting.observable(), ObservableState::Waiting);
        assert_eq!(InternalState::Shutdown.observable(), ObservableState::Shutdown);
    }

    #[test]
    fn timer_pending_iff_waiting() {
        for &state in &all_states() {
            assert_eq!(state.has_timer_pending(), state == InternalState::Waiting);
        }
    }

    #[test]
    fn open_in_flight_iff_opening_family() {
        for &state in &all_states() {
            let expected = matches!(
                state,
                InternalState::Opening
                    | InternalState::OpeningClosing
                    | InternalState::OpeningStopping
                    | InternalState::OpeningSuspending
            );
            assert_eq!(state.has_open_in_flight(), expected);
        }
    }

    #[test]
    fn shutdown_is_terminal() {
        for &event in &all_events() {
            let outcome = transition(InternalState::Shutdown, event);
            match outcome {
                Outcome::Ignored | Outcome::Illegal => {}
                Outcome::Transition { .. } => panic!("Shutdown must never transition, got {event:?}"),
            }
        }
    }

    #[test]
    fn double_shutdown_is_ignored_not_illegal() {
        for &state in &[
            InternalState::Shutdown,
            InternalState::ShuttingDown,
            InternalState::OpeningStopping,
        ] {
            assert_eq!(transition(state, Event::Shutdown), Outcome::Ignored);
        }
    }

    #[test]
    fn opening_closing_open_failure_settles_in_closing_awaiting_layer_closed() {
        let outcome = transition(InternalState::OpeningClosing, Event::LayerOpenFailed);
        assert_eq!(outcome, Outcome::to(InternalState::Closing));
        // No async_open must be re-issued here: the next event a
        // caller in this scenario should drive is `layer_closed`.
        if let Outcome::Transition { actions, .. } = outcome {
            assert!(!actions.contains(&Action::AsyncOpen));
        }
    }

    #[test]
    fn start_during_suspending_family_returns_to_opening() {
        assert_eq!(
            transition(InternalState::Suspending, Event::Start),
            Outcome::to(InternalState::Opening)
        );
        assert_eq!(
            transition(InternalState::OpeningSuspending, Event::Start),
            Outcome::to(InternalState::Opening)
        );
    }

    #[test]
    fn every_async_close_is_eventually_followed_by_a_layer_closed_before_reopening() {
        // States reached only via an async_close must accept
        // `layer_closed` and must not accept another open-completion
        // event before it.
        for &state in &[
            InternalState::Closing,
            InternalState::Suspending,
            InternalState::ShuttingDown,
        ] {
            assert!(matches!(
                transition(state, Event::LayerClosed),
                Outcome::Transition { .. }
            ));
        }
    }
}
