//! Lamport-ordered broadcast chat hub.
//!
//! Participants join, send text, and receive every participant's messages in
//! an order all processes agree on: each message carries a Lamport timestamp
//! assigned by the hub, and every participant receives broadcasts in
//! timestamp order.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
