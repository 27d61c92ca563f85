//! Route modules, one per component.

pub mod health;
pub mod presence;
pub mod signaling;
