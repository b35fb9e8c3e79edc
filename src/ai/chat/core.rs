use std::path::Path;

use serde_json::json;
use uuid::Uuid;

use super::models::{Exchange, SessionState};
use crate::ai::gateway::BoxedGateway;
use crate::ai::image::ImageHandle;
use crate::ai::prompt::{Prompt, PromptTemplates};
use crate::core::error::{EngineError, InputError, Operation};

/// The core abstraction around talking to the model: picks a prompt
/// template, fills it with the user's input, calls the gateway and
/// keeps the chat history.
///
/// Each operation is independent. Only successful chat turns are
/// recorded in the session, image analyses and results explanations
/// never are.
///
/// Use `ConversationEngine::builder()` to construct one.
pub struct ConversationEngine {
    gateway: BoxedGateway,
    prompts: PromptTemplates,
    session: SessionState,
    pub session_id: String,
}

impl ConversationEngine {
    pub fn builder(gateway: BoxedGateway) -> EngineBuilder {
        EngineBuilder::new(gateway)
    }

    /// Runs the next chat turn. Empty messages are not rejected here,
    /// re-prompting for input is the caller's job.
    pub async fn chat(&mut self, user_message: &str) -> Result<String, EngineError> {
        let prompt = self
            .prompts
            .render(Prompt::Chat, &json!({ "user_message": user_message }));

        let reply = self
            .gateway
            .generate_text(&prompt)
            .await
            .map_err(|err| {
                tracing::warn!(session_id = %self.session_id, "Chat failed: {}", err);
                EngineError::service(Operation::Chat, err)
            })?;

        self.session.append(Exchange::new(user_message, &reply));
        tracing::debug!(
            session_id = %self.session_id,
            "Recorded exchange {}",
            self.session.len()
        );

        Ok(reply)
    }

    /// Analyzes an image file. A missing file is reported without
    /// contacting the model.
    pub async fn analyze_image(&self, image_path: &Path) -> Result<String, EngineError> {
        if !image_path.exists() {
            return Err(InputError::FileNotFound(image_path.to_path_buf()).into());
        }

        let image = ImageHandle::open(image_path)?;
        let (width, height) = image.dimensions();
        tracing::debug!(
            "Analyzing {} ({}x{}, {})",
            image_path.display(),
            width,
            height,
            image.mime_type()
        );

        let prompt = self.prompts.render(Prompt::ImageAnalysis, &json!({}));
        let reply = self
            .gateway
            .generate_with_image(&prompt, &image)
            .await
            .map_err(|err| EngineError::service(Operation::ImageAnalysis, err))?;

        Ok(reply)
    }

    /// Explains results from another model. `raw_results` is passed
    /// through verbatim, it is never parsed or validated.
    pub async fn explain_results(&self, raw_results: &str) -> Result<String, EngineError> {
        let prompt = self
            .prompts
            .render(Prompt::ResultsExplanation, &json!({ "results": raw_results }));

        let reply = self
            .gateway
            .generate_text(&prompt)
            .await
            .map_err(|err| EngineError::service(Operation::ResultsExplanation, err))?;

        Ok(reply)
    }

    pub fn clear_history(&mut self) {
        self.session.clear();
        tracing::debug!(session_id = %self.session_id, "Cleared chat history");
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }
}

pub struct EngineBuilder {
    gateway: BoxedGateway,
    session_id: Option<String>,
}

impl EngineBuilder {
    pub fn new(gateway: BoxedGateway) -> Self {
        Self {
            gateway,
            session_id: None,
        }
    }

    pub fn build(self) -> ConversationEngine {
        ConversationEngine {
            gateway: self.gateway,
            prompts: PromptTemplates::new(),
            session: SessionState::new(),
            session_id: self
                .session_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }

    pub fn session_id(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

}
