mod core;
pub mod models;

pub use self::core::{ConversationEngine, EngineBuilder};
pub use models::{Exchange, SessionState};
