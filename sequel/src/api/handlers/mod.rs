pub mod chat;
pub mod debug;
pub mod graph;
pub mod health;

pub use health::health_check;
