//! Roundtable CLI client.
//!
//! Watches one investment room over WebSocket, reveals new messages with a
//! typing animation, and drives the room through the HTTP API from a prompt.

pub mod api;
pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod typewriter;
pub mod ui;
pub mod watch;

pub use runner::{ClientOptions, run_client};
