//! Wire types for the HTTP API.

pub mod chat;
pub mod graph;

pub use chat::*;
pub use graph::*;
