//! Image generator trait.

use crate::error::Result;
use crate::image::types::{GenerationRequest, GenerationResult};
use async_trait::async_trait;

/// Something that can turn a generation request into an image.
///
/// Each call is a single best-effort attempt; implementations do not retry.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates an image from the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Returns the name of this generator for display.
    fn name(&self) -> &str;
}
