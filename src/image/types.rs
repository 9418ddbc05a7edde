//! Core types for image generation.

use crate::error::{ProEditError, Result};
use crate::image::providers::GeminiModel;
use crate::locale::Locale;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// MIME type assumed when a data URL carries no header.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Supported input image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
    /// GIF format.
    Gif,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        None
    }
}

/// Aspect ratios the compositor can derive from a paper selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square aspect ratio.
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape (widescreen) aspect ratio.
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait (tall) aspect ratio.
    #[serde(rename = "9:16")]
    Portrait,
    /// 4:3 standard landscape aspect ratio.
    #[serde(rename = "4:3")]
    Standard,
    /// 3:4 standard portrait aspect ratio.
    #[serde(rename = "3:4")]
    StandardPortrait,
}

impl AspectRatio {
    /// Returns the aspect ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::StandardPortrait => "3:4",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested output resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageResolution {
    /// Fast, 1K.
    #[serde(rename = "1K")]
    Res1K,
    /// Standard, 2K.
    #[default]
    #[serde(rename = "2K")]
    Res2K,
    /// Ultra, 4K.
    #[serde(rename = "4K")]
    Res4K,
}

impl ImageResolution {
    /// All tiers, lowest first.
    pub const ALL: [ImageResolution; 3] = [Self::Res1K, Self::Res2K, Self::Res4K];

    /// Returns the API value ("1K", "2K" or "4K").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Res1K => "1K",
            Self::Res2K => "2K",
            Self::Res4K => "4K",
        }
    }

    /// Human-readable label in the given locale.
    pub fn label(&self, locale: Locale) -> &'static str {
        let t = locale.strings();
        match self {
            Self::Res1K => t.res_1k,
            Self::Res2K => t.res_2k,
            Self::Res4K => t.res_4k,
        }
    }
}

impl FromStr for ImageResolution {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProEditError::InvalidRequest(format!("unknown resolution '{s}'")))
    }
}

/// Returns the MIME type declared in a `data:<mime>;base64,` header.
pub fn data_url_mime_type(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Returns the base64 payload after the data-URL comma, or the input as-is.
pub fn data_url_payload(data_url: &str) -> &str {
    match data_url.split_once(',') {
        Some((_, payload)) if !payload.is_empty() => payload,
        _ => data_url,
    }
}

/// Encodes raw bytes as a base64 data URL.
pub fn to_data_url(mime_type: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

/// A request to generate or edit an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Enabled source images as data URLs, in display order.
    pub images: Vec<String>,
    /// The composed prompt.
    pub prompt: String,
    /// Output aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Output resolution, honored only by models that support it.
    pub resolution: ImageResolution,
    /// Model variant to call.
    pub model: GeminiModel,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt and defaults.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            images: Vec::new(),
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::StandardPortrait,
            resolution: ImageResolution::default(),
            model: GeminiModel::default(),
        }
    }

    /// Appends a source image (data URL).
    pub fn with_image(mut self, data_url: impl Into<String>) -> Self {
        self.images.push(data_url.into());
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Sets the resolution tier.
    pub fn with_resolution(mut self, resolution: ImageResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Returns true if this is an image editing request (has source images).
    pub fn is_edit(&self) -> bool {
        !self.images.is_empty()
    }
}

/// The latest generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "generated image should be saved or processed"]
pub struct GenerationResult {
    /// PNG image as a `data:image/png;base64,` URL.
    pub image_url: String,
    /// When the result arrived.
    pub timestamp: DateTime<Utc>,
}

impl GenerationResult {
    /// Wraps a base64 PNG payload returned by the API.
    pub fn from_base64_png(payload: &str) -> Self {
        Self {
            image_url: format!("data:image/png;base64,{payload}"),
            timestamp: Utc::now(),
        }
    }

    /// Decodes the PNG bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(data_url_payload(&self.image_url))
            .map_err(|e| ProEditError::Decode(e.to_string()))
    }

    /// Default file name for downloading this result.
    pub fn download_file_name(&self) -> String {
        format!("proedit-ai-{}.png", self.timestamp.timestamp_millis())
    }

    /// Saves the PNG to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.decode()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"short"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_aspect_ratio_serde() {
        assert_eq!(AspectRatio::StandardPortrait.as_str(), "3:4");
        assert_eq!(
            serde_json::to_string(&AspectRatio::Landscape).unwrap(),
            "\"16:9\""
        );
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("4K".parse::<ImageResolution>().unwrap(), ImageResolution::Res4K);
        assert_eq!("1k".parse::<ImageResolution>().unwrap(), ImageResolution::Res1K);
        assert!("8K".parse::<ImageResolution>().is_err());
        assert_eq!(ImageResolution::default(), ImageResolution::Res2K);
    }

    #[test]
    fn test_resolution_labels() {
        assert_eq!(ImageResolution::Res1K.label(Locale::En), "Fast (1K)");
        assert_eq!(ImageResolution::Res4K.label(Locale::En), "Ultra (4K)");
        assert_eq!(ImageResolution::Res2K.label(Locale::Ja), "標準 (2K)");
        for res in ImageResolution::ALL {
            assert!(res.label(Locale::Ja).contains(res.as_str()));
        }
    }

    #[test]
    fn test_data_url_mime_type() {
        assert_eq!(data_url_mime_type("data:image/png;base64,AAAA"), "image/png");
        assert_eq!(data_url_mime_type("data:image/webp;base64,AAAA"), "image/webp");
        assert_eq!(data_url_mime_type("AAAA"), DEFAULT_MIME_TYPE);
        assert_eq!(data_url_mime_type("data:;base64,AAAA"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_data_url_payload() {
        assert_eq!(data_url_payload("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(data_url_payload("AAAA"), "AAAA");
    }

    #[test]
    fn test_result_decode_and_name() {
        let url = to_data_url("image/png", &PNG_MAGIC);
        let result = GenerationResult::from_base64_png(data_url_payload(&url));
        assert_eq!(result.image_url, url);
        assert_eq!(result.decode().unwrap(), PNG_MAGIC.to_vec());

        let name = result.download_file_name();
        assert!(name.starts_with("proedit-ai-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_result_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let url = to_data_url("image/png", &PNG_MAGIC);
        let result = GenerationResult::from_base64_png(data_url_payload(&url));
        result.save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), PNG_MAGIC.to_vec());
    }

    #[test]
    fn test_request_builder() {
        let req = GenerationRequest::new("edit")
            .with_image("data:image/png;base64,AAAA")
            .with_resolution(ImageResolution::Res4K);
        assert!(req.is_edit());
        assert_eq!(req.resolution, ImageResolution::Res4K);
        assert!(!GenerationRequest::new("x").is_edit());
    }
}
