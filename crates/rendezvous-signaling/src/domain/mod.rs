//! Domain model for signaling sessions.

pub mod commands;
pub mod config;
pub mod session;
pub mod store;
