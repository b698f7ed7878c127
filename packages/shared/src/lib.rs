//! Utilities shared by the Chitchat server and client.

pub mod logger;
pub mod time;
