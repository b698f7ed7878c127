//! Terminal client for the Lamport-ordered chat hub.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
pub mod session;
mod ui;

pub use runner::run_client;
pub use session::Identity;
pub use ui::prompt_for_name;
