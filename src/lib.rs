#![warn(missing_docs)]
//! ProEdit - prompt composition and Gemini image editing.
//!
//! Up to ten source images plus a free-text prompt are combined with fixed
//! style, line-style, mode, preservation and fit-to-paper clauses, then sent
//! to a Gemini image model in a single request.
//!
//! # Quick Start
//!
//! ```no_run
//! use proedit::{Controller, GeminiProvider, Style};
//!
//! #[tokio::main]
//! async fn main() -> proedit::Result<()> {
//!     let provider = GeminiProvider::builder().build()?;
//!
//!     let mut controller = Controller::new();
//!     controller.set_prompt("A cat on a windowsill");
//!     controller.set_style(Style::Anime90s);
//!
//!     let image = controller.generate(&provider).await?;
//!     image.save(image.download_file_name())?;
//!     Ok(())
//! }
//! ```
//!
//! # Composing a prompt without a network call
//!
//! ```
//! use proedit::{compose_prompt, Locale, LineStyle, PromptSelections};
//!
//! let selections = PromptSelections {
//!     prompt: "a cat".into(),
//!     line_style: Some(LineStyle::Hot),
//!     ..Default::default()
//! };
//! let text = compose_prompt(&selections, Locale::En);
//! assert!(text.starts_with("a cat\n("));
//! ```

pub mod credentials;
mod error;
pub mod image;
mod locale;
pub mod prompt;
pub mod session;

// Re-export error types at crate root
pub use error::{ProEditError, Result};
pub use locale::{Locale, Strings};

pub use credentials::{
    CredentialResolver, CredentialStore, EnvProjectSelector, FileCredentialStore,
    MemoryCredentialStore, PlatformCapability, ProjectSelector,
};
pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder, SafetySetting};
pub use image::{
    AspectRatio, GenerationRequest, GenerationResult, ImageFormat, ImageGenerator,
    ImageResolution,
};
pub use prompt::{
    compose_prompt, LineStyle, Mode, Orientation, Paper, PreservationMode, PromptSelections,
    Style, StyleGroup,
};
pub use session::{Controller, ImageReady, IntakeReport, SourceImage, ViewState, MAX_SOURCE_IMAGES};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ProEditError, Result};
    pub use crate::image::providers::GeminiProvider;
    pub use crate::image::{GenerationRequest, GenerationResult, ImageGenerator};
    pub use crate::prompt::{compose_prompt, PromptSelections};
    pub use crate::session::Controller;
}
