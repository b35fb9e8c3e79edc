pub mod chat;
pub mod gateway;
pub mod image;
pub mod prompt;
