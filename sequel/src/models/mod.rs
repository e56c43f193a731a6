mod conversation;
mod graph;

pub use conversation::*;
pub use graph::*;
