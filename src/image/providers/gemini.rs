//! Gemini (Google) image generation and editing provider.

use crate::credentials::{CredentialResolver, FileCredentialStore, PlatformCapability};
use crate::error::{sanitize_error_message, ProEditError, Result};
use crate::image::provider::ImageGenerator;
use crate::image::types::{data_url_mime_type, data_url_payload, GenerationRequest, GenerationResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sent in place of an empty prompt.
const FALLBACK_PROMPT: &str = "Generate a high quality image.";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeminiModel {
    /// Gemini 3 Pro Image (highest quality, honors output resolution).
    #[default]
    #[serde(rename = "gemini-3-pro-image-preview")]
    Gemini3ProImage,
    /// Gemini 3 Flash.
    #[serde(rename = "gemini-3-flash-preview")]
    Gemini3Flash,
    /// Gemini 2.5 Flash Image (fast, economical).
    #[serde(rename = "gemini-2.5-flash-image")]
    Gemini25FlashImage,
}

impl GeminiModel {
    /// All variants, highest capability first.
    pub const ALL: [GeminiModel; 3] = [
        Self::Gemini3ProImage,
        Self::Gemini3Flash,
        Self::Gemini25FlashImage,
    ];

    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini3ProImage => "gemini-3-pro-image-preview",
            Self::Gemini3Flash => "gemini-3-flash-preview",
            Self::Gemini25FlashImage => "gemini-2.5-flash-image",
        }
    }

    /// Whether the model accepts an explicit output resolution.
    pub fn supports_resolution(&self) -> bool {
        matches!(self, Self::Gemini3ProImage)
    }
}

impl std::fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GeminiModel {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ProEditError::InvalidRequest(format!("unknown model '{s}'")))
    }
}

/// A safety-threshold override sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    /// Harm category, e.g. `HARM_CATEGORY_HARASSMENT`.
    pub category: String,
    /// Block threshold, e.g. `BLOCK_ONLY_HIGH`.
    pub threshold: String,
}

impl SafetySetting {
    /// Creates a new override.
    pub fn new(category: impl Into<String>, threshold: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            threshold: threshold.into(),
        }
    }
}

/// Builder for GeminiProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiProviderBuilder {
    api_key: Option<String>,
    credentials: Option<CredentialResolver>,
    base_url: Option<String>,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fixed API key, skipping credential resolution.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Resolves the API key per request through this resolver.
    pub fn credentials(mut self, credentials: CredentialResolver) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Overrides the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Adds a safety-threshold override.
    pub fn safety_setting(mut self, setting: SafetySetting) -> Self {
        self.safety_settings.push(setting);
        self
    }

    /// Builds the provider.
    ///
    /// Without an explicit key or resolver, the key is resolved from the
    /// default credential file, then `GOOGLE_API_KEY` / `API_KEY`.
    pub fn build(self) -> Result<GeminiProvider> {
        let auth = match (self.api_key, self.credentials) {
            (Some(key), _) => Auth::Key(key),
            (None, Some(resolver)) => Auth::Resolver(resolver),
            (None, None) => Auth::Resolver(CredentialResolver::new(
                Arc::new(FileCredentialStore::default_location()?),
                PlatformCapability::from_env(),
            )),
        };

        Ok(GeminiProvider {
            client: reqwest::Client::new(),
            auth,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            safety_settings: self.safety_settings,
        })
    }
}

#[derive(Debug, Clone)]
enum Auth {
    Key(String),
    Resolver(CredentialResolver),
}

/// Gemini image generation provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    auth: Auth,
    base_url: String,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    async fn api_key(&self) -> Result<String> {
        match &self.auth {
            Auth::Key(key) => Ok(key.clone()),
            Auth::Resolver(resolver) => resolver.resolve().await,
        }
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let api_key = self.api_key().await?;
        let start = Instant::now();

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            request.model.as_str(),
        );

        let body = GeminiRequest::from_generation_request(request, &self.safety_settings);

        tracing::debug!(
            model = %request.model,
            images = request.images.len(),
            aspect_ratio = %request.aspect_ratio,
            "submitting Gemini generation request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let payload = extract_image(gemini_response)?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Gemini generation complete"
        );

        Ok(GenerationResult::from_base64_png(&payload))
    }
}

fn parse_error(status: u16, text: &str) -> ProEditError {
    let text = sanitize_error_message(text);
    if status == 401 || status == 403 {
        return ProEditError::Auth(text);
    }
    // An invalid key comes back as 400 INVALID_ARGUMENT.
    if status == 400 && text.contains("API key not valid") {
        return ProEditError::Auth(text);
    }
    ProEditError::Api {
        status,
        message: text,
    }
}

/// Pulls the first inline image out of a response, or explains its absence.
fn extract_image(response: GeminiResponse) -> Result<String> {
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let msg = feedback
                .block_reason_message
                .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
            return Err(ProEditError::EmptyResult { text: Some(msg) });
        }
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ProEditError::EmptyResult { text: None });
    };

    let mut texts = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(inline) = part.inline_data {
            if !inline.data.is_empty() {
                return Ok(inline.data);
            }
        }
        if let Some(text) = part.text {
            let text = text.trim();
            if !text.is_empty() {
                texts.push(text.to_string());
            }
        }
    }

    let text = if texts.is_empty() {
        candidate
            .finish_reason
            .filter(|r| r != "STOP")
            .map(|r| format!("Generation stopped: {}", r))
    } else {
        Some(texts.join("\n"))
    };
    Err(ProEditError::EmptyResult { text })
}

#[async_trait]
impl ImageGenerator for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        self.generate_impl(request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
    image_config: GeminiImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiImageConfig {
    aspect_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<String>,
}

impl GeminiRequest {
    fn from_generation_request(req: &GenerationRequest, safety: &[SafetySetting]) -> Self {
        // Images go first so the model grounds the edit on them.
        let mut parts: Vec<GeminiRequestPart> = req
            .images
            .iter()
            .map(|url| GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: data_url_mime_type(url).to_string(),
                    data: data_url_payload(url).to_string(),
                },
            })
            .collect();

        let text = if req.prompt.is_empty() {
            FALLBACK_PROMPT.to_string()
        } else {
            req.prompt.clone()
        };
        parts.push(GeminiRequestPart::Text { text });

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
                image_config: GeminiImageConfig {
                    aspect_ratio: req.aspect_ratio.as_str().to_string(),
                    image_size: req
                        .model
                        .supports_resolution()
                        .then(|| req.resolution.as_str().to_string()),
                },
            },
            safety_settings: safety.to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    data: String,
}
