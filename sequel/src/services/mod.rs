mod chat;
mod graph;

pub use chat::{ChatService, ChatTurn};
pub use graph::GraphService;
