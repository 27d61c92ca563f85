//! Application layer for signaling sessions.

pub mod command_handlers;
pub mod query_handlers;
