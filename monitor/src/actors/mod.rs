/// The monitor's event loop: hosts the transition table and drives
/// the timer and the physical layer.
pub mod monitor;

/// Commands the monitor's event loop accepts, and the handle used to
/// send them.
pub mod messages;
