//! Physical layer monitor: a state machine that supervises the
//! open/close lifecycle of a physical layer (serial port, TCP socket,
//! or similar bidirectional channel) on behalf of a higher-level
//! protocol stack.
//!
//! The monitor mediates between user intents (`start`, `close`,
//! `suspend`, `shutdown`) and the physical layer's own lower-edge
//! events (open succeeded, open failed, layer closed), while managing
//! a single retry timer for failed open attempts. See [`state`] for
//! the transition table and [`actors::monitor`] for the tokio task
//! that runs it.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

/// Actors module: the tokio event loop that hosts the monitor context.
pub mod actors;

/// Config Manager API.
pub mod config_mngr;

/// Error type for the monitor.
pub mod error;

/// Physical layer collaborator interface.
pub mod physical_layer;

/// State, event and action vocabulary, and the transition table.
pub mod state;

pub use actors::messages::MonitorHandle;
pub use actors::monitor::spawn;
pub use error::MonitorError;
pub use state::{Action, Event, InternalState, ObservableState, Outcome};
