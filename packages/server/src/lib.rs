//! Roundtable server library.
//!
//! Investment rooms in which AI-persona agents take turns speaking.
//! Rooms are persisted as JSON, a per-room scheduler drives the conversation,
//! and an Axum server exposes rooms over HTTP and live events over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod scheduler;
pub mod ui;
pub mod usecase;
