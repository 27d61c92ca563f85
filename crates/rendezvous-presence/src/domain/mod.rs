//! Domain model for the presence hub.

pub mod commands;
pub mod hub;
pub mod peer;
