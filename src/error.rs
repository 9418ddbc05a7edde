//! Error types for prompt composition and image generation.

use crate::locale::Locale;

/// Maximum length of an API error body kept in an error message.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while preparing or running a generation.
#[derive(Debug, thiserror::Error)]
pub enum ProEditError {
    /// No stored API key and no platform-selected project.
    #[error("{0}")]
    MissingCredential(String),

    /// The platform project-selection collaborator is not available here.
    #[error("environment unsupported: {0}")]
    EnvironmentUnsupported(String),

    /// The API answered but returned no image, possibly with an explanation.
    #[error("no image data found in response{}", explanation_suffix(.text))]
    EmptyResult {
        /// Text returned by the model instead of an image (e.g. a refusal).
        text: Option<String>,
    },

    /// API key rejected by the remote service.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned a non-success response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Invalid request parameters or a transition that is not allowed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProEditError {
    /// Returns true for missing, unavailable or rejected credentials.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential(_) | Self::EnvironmentUnsupported(_) | Self::Auth(_)
        )
    }

    /// Message shown inline next to the generate control.
    ///
    /// Credential and empty-result errors are surfaced verbatim; transport
    /// and unknown failures fall back to the localized generic message.
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            Self::MissingCredential(msg) | Self::EnvironmentUnsupported(msg) => msg.clone(),
            Self::EmptyResult { text: Some(text) } => text.clone(),
            Self::EmptyResult { text: None } => self.to_string(),
            Self::Auth(_) | Self::InvalidRequest(_) => self.to_string(),
            _ => locale.strings().error_generic.to_string(),
        }
    }
}

fn explanation_suffix(text: &Option<String>) -> String {
    text.as_deref().map(|t| format!(": {t}")).unwrap_or_default()
}

/// Result type alias for ProEdit operations.
pub type Result<T> = std::result::Result<T, ProEditError>;

/// Trims an API error body and masks anything that looks like an API key.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let masked: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let token = word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_');
            if token.starts_with("AIza") && token.len() > 20 {
                word.replace(token, "[redacted]")
            } else {
                word.to_string()
            }
        })
        .collect();
    let joined = masked.join(" ");
    if joined.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = joined.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors() {
        assert!(ProEditError::MissingCredential("no key".into()).is_credential_error());
        assert!(ProEditError::EnvironmentUnsupported("no platform".into()).is_credential_error());
        assert!(ProEditError::Auth("bad key".into()).is_credential_error());

        assert!(!ProEditError::EmptyResult { text: None }.is_credential_error());
        assert!(!ProEditError::Decode("bad base64".into()).is_credential_error());
    }

    #[test]
    fn test_error_display() {
        let err = ProEditError::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = ProEditError::EmptyResult { text: None };
        assert_eq!(err.to_string(), "no image data found in response");

        let err = ProEditError::EmptyResult {
            text: Some("I can't help with that".into()),
        };
        assert_eq!(
            err.to_string(),
            "no image data found in response: I can't help with that"
        );
    }

    #[test]
    fn test_user_message_verbatim_refusal() {
        let err = ProEditError::EmptyResult {
            text: Some("Blocked for safety".into()),
        };
        assert_eq!(err.user_message(Locale::En), "Blocked for safety");
        assert_eq!(err.user_message(Locale::Ja), "Blocked for safety");
    }

    #[test]
    fn test_user_message_generic_for_transport() {
        let err = ProEditError::Api {
            status: 500,
            message: "internal".into(),
        };
        assert_eq!(
            err.user_message(Locale::En),
            Locale::En.strings().error_generic
        );
        assert_eq!(
            err.user_message(Locale::Ja),
            Locale::Ja.strings().error_generic
        );
    }

    #[test]
    fn test_sanitize_masks_keys_and_truncates() {
        let msg = sanitize_error_message("key AIzaSyA1234567890abcdefghij is invalid");
        assert_eq!(msg, "key [redacted] is invalid");

        let long = "x".repeat(MAX_ERROR_MESSAGE_LEN + 10);
        let msg = sanitize_error_message(&long);
        assert!(msg.ends_with("..."));
        assert_eq!(msg.chars().count(), MAX_ERROR_MESSAGE_LEN + 3);
    }
}
