//! Test utilities for integration tests
#![allow(dead_code)]
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rustyline::error::ReadlineError;

use medchat::ai::chat::ConversationEngine;
use medchat::ai::gateway::ModelGateway;
use medchat::ai::image::ImageHandle;
use medchat::cli::input::LineSource;
use medchat::core::error::ServiceError;

/// A single call that reached the gateway.
#[derive(Debug, Clone)]
pub struct GatewayCall {
    pub prompt: String,
    pub image_mime_type: Option<String>,
}

/// Gateway double that replays canned replies in order and records
/// every call. Once the replies run out it answers "ok".
#[derive(Clone, Default)]
pub struct FakeGateway {
    replies: Arc<Mutex<VecDeque<Result<String, ServiceError>>>>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(ServiceError::new(message)));
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, call: GatewayCall) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push(call);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::from("ok")))
    }
}

#[async_trait]
impl ModelGateway for FakeGateway {
    async fn generate_text(&self, prompt: &str) -> Result<String, ServiceError> {
        self.next(GatewayCall {
            prompt: prompt.to_string(),
            image_mime_type: None,
        })
    }

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &ImageHandle,
    ) -> Result<String, ServiceError> {
        self.next(GatewayCall {
            prompt: prompt.to_string(),
            image_mime_type: Some(image.mime_type().to_string()),
        })
    }
}

/// Builds an engine around `gateway`, keeping a handle to it so tests
/// can inspect the calls.
pub fn test_engine(gateway: &FakeGateway) -> ConversationEngine {
    ConversationEngine::builder(Box::new(gateway.clone())).build()
}

/// Replays lines of input, then behaves like Ctrl-D.
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<String, ReadlineError> {
        self.lines.pop_front().ok_or(ReadlineError::Eof)
    }
}

/// Writes a small PNG into `dir` and returns its path.
pub fn write_png(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    image::RgbImage::new(16, 16)
        .save(&path)
        .expect("Failed to write test image");
    path
}
