//! The boundary between the assistant and the remote generative
//! model.
use async_trait::async_trait;

use super::image::ImageHandle;
use crate::core::error::ServiceError;

/// A request/response capability for generating text, optionally
/// grounded on an image.
///
/// Implementations make at most one outbound request per call. They
/// don't retry or cache, and every lower level failure comes back as
/// a `ServiceError`.
#[async_trait]
pub trait ModelGateway {
    async fn generate_text(&self, prompt: &str) -> Result<String, ServiceError>;

    async fn generate_with_image(
        &self,
        prompt: &str,
        image: &ImageHandle,
    ) -> Result<String, ServiceError>;
}

pub type BoxedGateway = Box<dyn ModelGateway + Send + Sync + 'static>;
