use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::gateway::ModelGateway;
use crate::ai::image::ImageHandle;
use crate::core::error::ServiceError;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

// Object {
//     "text": String("Describe this image")
// }
// Object {
//     "inlineData": Object {
//         "mimeType": String("image/png"),
//         "data": String("iVBORw0KGgo...")
//     }
// }
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    // Anything else the model sends back e.g. function calls
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: &str) -> Self {
        Part::Text {
            text: text.to_string(),
        }
    }

    pub fn image(image: &ImageHandle) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type().to_string(),
                data: image.to_base64(),
            },
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some(String::from("user")),
                parts,
            }],
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    pub fn text(&self) -> Result<String, ServiceError> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.as_deref());
            return Err(match reason {
                Some(reason) => ServiceError::new(format!("prompt was blocked ({})", reason)),
                None => ServiceError::new("response contained no candidates"),
            });
        };

        let text: String = candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } | Part::Other(_) => None,
            })
            .collect();

        if text.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(ServiceError::new(format!(
                "response contained no text (finish reason: {})",
                reason
            )));
        }
        Ok(text)
    }
}

// Error payloads look like:
// {"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

/// Calls the Gemini `generateContent` endpoint. One request per call,
/// no retries.
pub struct GeminiGateway {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    timeout: Option<Duration>,
}

impl GeminiGateway {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    pub async fn generate_content(&self, parts: Vec<Part>) -> Result<String, ServiceError> {
        let payload = GenerateContentRequest::new(parts);
        let url = self.endpoint();
        tracing::debug!("POST {}", url);

        let mut request = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|err| err.error.message)
                .unwrap_or(body);
            tracing::warn!("Model request failed with status {}", status.as_u16());
            return Err(ServiceError::new(format!(
                "request failed ({}): {}",
                status.as_u16(),
                message.trim()
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| ServiceError::new(format!("invalid response payload: {}", err)))?;
        parsed.text()
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate_text(&self, prompt: &str) -> Result<String, ServiceError> {
        self.generate_content(vec![Part::text(prompt)]).await
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &ImageHandle,
    ) -> Result<String, ServiceError> {
        self.generate_content(vec![Part::text(prompt), Part::image(image)])
            .await
    }
}
