use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    /// No timeout is applied to model requests when this is `None`.
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let gemini_api_key = non_empty_env("GEMINI_API_KEY");
        let gemini_api_base = non_empty_env("GEMINI_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let gemini_model =
            non_empty_env("MEDCHAT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let request_timeout = non_empty_env("MEDCHAT_REQUEST_TIMEOUT_SECS").and_then(|raw| {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    tracing::warn!(
                        "Ignoring MEDCHAT_REQUEST_TIMEOUT_SECS={}: expected a positive integer",
                        raw
                    );
                    None
                }
            }
        });

        Self {
            gemini_api_key,
            gemini_api_base,
            gemini_model,
            request_timeout,
        }
    }
}

impl AppConfig {
    /// Apply command line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        api_base: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(model) = model {
            self.gemini_model = model;
        }
        if let Some(base) = api_base {
            self.gemini_api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
