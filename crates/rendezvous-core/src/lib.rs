//! Rendezvous Core — shared abstractions.
//!
//! This crate defines the traits and types that the presence hub and the
//! signaling store both depend on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod token;
