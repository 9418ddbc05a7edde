//! Image generation module.

mod provider;
pub mod providers;
mod types;

pub use provider::ImageGenerator;
pub use types::{
    data_url_mime_type, data_url_payload, to_data_url, AspectRatio, GenerationRequest,
    GenerationResult, ImageFormat, ImageResolution, DEFAULT_MIME_TYPE,
};
