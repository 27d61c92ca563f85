//! Rendezvous — WebRTC signaling session store.
//!
//! Creates negotiation sessions from SDP offers, accumulates ICE candidates
//! against them, and expires them after a bounded time-to-live. Expiry is
//! lazy: every store operation sweeps dead sessions before doing its work.

pub mod application;
pub mod domain;
