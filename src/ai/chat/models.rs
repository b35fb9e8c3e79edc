//! The core models for keeping track of a chat with the model.
use serde::Serialize;

/// One user message paired with the assistant's reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Exchange {
    user_text: String,
    assistant_text: String,
}

impl Exchange {
    pub fn new(user_text: &str, assistant_text: &str) -> Self {
        Self {
            user_text: user_text.to_string(),
            assistant_text: assistant_text.to_string(),
        }
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn assistant_text(&self) -> &str {
        &self.assistant_text
    }
}

/// Ordered, append-only history of successful exchanges for one run.
///
/// Nothing is ever evicted so the history grows for as long as the
/// process lives. Only `clear` shrinks it.
#[derive(Default, Debug)]
pub struct SessionState(Vec<Exchange>);

impl SessionState {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Only the conversation engine records exchanges.
    pub(crate) fn append(&mut self, exchange: Exchange) {
        self.0.push(exchange)
    }

    pub fn all(&self) -> &[Exchange] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exchange> {
        self.0.iter()
    }
}
