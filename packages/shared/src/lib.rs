//! Shared utilities for the Roundtable server and client.

pub mod logger;
pub mod time;
