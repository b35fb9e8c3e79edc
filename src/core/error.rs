//! Error taxonomy for the assistant.
//!
//! `ServiceError` and `InputError` are recovered locally and shown to
//! the user as a single line. `CredentialError` happens at startup and
//! aborts the process. `EngineError` is what the conversation engine
//! hands back to the shell, and its `Display` is the text the user sees.
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Any failure from the remote generation service collapsed into one
/// message: transport, auth, quota, blocked prompts, bad payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    // The request URL carries the API key so it never makes it into the message
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("request failed: {}", err.without_url()))
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("could not decode image {}: {reason}", .path.display())]
    ImageDecode { path: PathBuf, reason: String },
    #[error("could not read {}: {reason}", .path.display())]
    ReadFile { path: PathBuf, reason: String },
    #[error("no {0} provided")]
    Empty(&'static str),
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API key is required to run the assistant")]
    Missing,
    #[error("API key rejected: format not confirmed")]
    Declined,
    #[error("interrupted while reading the API key")]
    Interrupted,
    #[error("failed to read the API key: {0}")]
    Prompt(String),
}

/// The engine operation a service failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Chat,
    ImageAnalysis,
    ResultsExplanation,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Operation::Chat => "generating response",
            Operation::ImageAnalysis => "analyzing image",
            Operation::ResultsExplanation => "explaining results",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Error: {0}")]
    Input(#[from] InputError),
    #[error("Error {operation}: {source}")]
    Service {
        operation: Operation,
        #[source]
        source: ServiceError,
    },
}

impl EngineError {
    pub fn service(operation: Operation, source: ServiceError) -> Self {
        Self::Service { operation, source }
    }
}
