//! Rendezvous — presence registry and edit broadcast hub.
//!
//! Tracks which peers are connected and buffers edit payloads until some
//! client polls them. Delivery is single-consumer: each poll drains the
//! whole buffer.

pub mod application;
pub mod domain;
