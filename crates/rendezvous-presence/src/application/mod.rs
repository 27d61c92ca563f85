//! Application layer for the presence hub.

pub mod command_handlers;
pub mod query_handlers;
