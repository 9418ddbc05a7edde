//! Serializable view state.

use crate::image::providers::GeminiModel;
use crate::image::{GenerationResult, ImageResolution};
use crate::locale::Locale;
use crate::prompt::PromptSelections;
use serde::{Deserialize, Serialize};

/// Maximum number of source images held at once.
pub const MAX_SOURCE_IMAGES: usize = 10;

/// An uploaded source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    /// Client-generated id.
    pub id: String,
    /// Image as a base64 data URL.
    pub data: String,
    /// Whether the image is sent with the next request.
    pub enabled: bool,
}

impl SourceImage {
    /// Creates an enabled image with a fresh id.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            data: data.into(),
            enabled: true,
        }
    }
}

/// Everything the UI shows, in one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Source images in display order.
    pub images: Vec<SourceImage>,
    /// Prompt text and clause selections.
    pub selections: PromptSelections,
    /// Requested output resolution.
    pub resolution: ImageResolution,
    /// Model variant.
    pub model: GeminiModel,
    /// Display language.
    pub locale: Locale,
    /// Latest generated image.
    pub result: Option<GenerationResult>,
    /// A request is outstanding.
    pub is_generating: bool,
    /// Message shown next to the generate control.
    pub error: Option<String>,
}

impl ViewState {
    /// Images that will be sent, in display order.
    pub fn enabled_images(&self) -> impl Iterator<Item = &SourceImage> {
        self.images.iter().filter(|img| img.enabled)
    }

    /// Free image slots.
    pub fn remaining_slots(&self) -> usize {
        MAX_SOURCE_IMAGES.saturating_sub(self.images.len())
    }
}
