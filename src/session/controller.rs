//! The controller owning the view state. Every mutation is a named transition.

use crate::error::{ProEditError, Result};
use crate::image::providers::GeminiModel;
use crate::image::{AspectRatio, GenerationRequest, GenerationResult, ImageGenerator, ImageResolution};
use crate::locale::Locale;
use crate::prompt::{
    compose_prompt, LineStyle, Mode, Orientation, Paper, PreservationMode, Style,
};
use crate::session::intake::ImageReady;
use crate::session::state::{SourceImage, ViewState, MAX_SOURCE_IMAGES};

/// Owns a [`ViewState`] and applies transitions to it.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    state: ViewState,
}

impl Controller {
    /// Starts from the default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from a saved state. A request that was in flight is dropped.
    pub fn from_state(mut state: ViewState) -> Self {
        state.is_generating = false;
        Self { state }
    }

    /// Current state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Consumes the controller, returning its state.
    pub fn into_state(self) -> ViewState {
        self.state
    }

    // Selections

    /// Sets the free-text prompt.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.state.selections.prompt = prompt.into();
    }

    /// Selects a style, replacing any previous one.
    pub fn set_style(&mut self, style: Style) {
        self.state.selections.style = Some(style);
    }

    /// Clears the style.
    pub fn release_style(&mut self) {
        self.state.selections.style = None;
    }

    /// Selects a line style.
    pub fn set_line_style(&mut self, line_style: LineStyle) {
        self.state.selections.line_style = Some(line_style);
    }

    /// Clears the line style.
    pub fn release_line_style(&mut self) {
        self.state.selections.line_style = None;
    }

    /// Selects a mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.state.selections.mode = Some(mode);
    }

    /// Clears the mode.
    pub fn release_mode(&mut self) {
        self.state.selections.mode = None;
    }

    /// Sets the preservation mode.
    pub fn set_preservation(&mut self, preservation: PreservationMode) {
        self.state.selections.preservation = preservation;
    }

    /// Selects the output paper.
    pub fn set_paper(&mut self, paper: Paper) {
        self.state.selections.paper = paper;
    }

    /// Sets the orientation. Has no effect on the aspect ratio of square paper.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.state.selections.orientation = orientation;
    }

    /// Enables or disables the fit-to-paper instruction.
    pub fn set_fit_to_paper(&mut self, enabled: bool) {
        self.state.selections.fit_to_paper = enabled;
    }

    /// Sets the resolution tier.
    pub fn set_resolution(&mut self, resolution: ImageResolution) {
        self.state.resolution = resolution;
    }

    /// Sets the model variant.
    pub fn set_model(&mut self, model: GeminiModel) {
        self.state.model = model;
    }

    /// Sets the display language.
    pub fn set_locale(&mut self, locale: Locale) {
        self.state.locale = locale;
    }

    /// Switches between English and Japanese.
    pub fn toggle_locale(&mut self) {
        self.state.locale = self.state.locale.toggled();
    }

    // Source images

    /// Appends an image that finished loading.
    ///
    /// The cap is checked again here, so late completions never push the
    /// list past [`MAX_SOURCE_IMAGES`]. Returns the new image id.
    pub fn apply_intake(&mut self, event: ImageReady) -> Option<String> {
        if self.state.images.len() >= MAX_SOURCE_IMAGES {
            tracing::warn!(
                max = MAX_SOURCE_IMAGES,
                "source image limit reached; dropping loaded image"
            );
            return None;
        }
        let image = SourceImage::new(event.data);
        let id = image.id.clone();
        self.state.images.push(image);
        self.state.result = None;
        self.state.error = None;
        Some(id)
    }

    /// Flips whether an image is sent. Returns false if the id is unknown.
    pub fn toggle_image(&mut self, id: &str) -> bool {
        match self.state.images.iter_mut().find(|img| img.id == id) {
            Some(img) => {
                img.enabled = !img.enabled;
                true
            }
            None => false,
        }
    }

    /// Removes an image. Returns false if the id is unknown.
    pub fn remove_image(&mut self, id: &str) -> bool {
        let before = self.state.images.len();
        self.state.images.retain(|img| img.id != id);
        self.state.images.len() != before
    }

    // Generation

    /// The text that will be sent to the model.
    pub fn composed_prompt(&self) -> String {
        compose_prompt(&self.state.selections, self.state.locale)
    }

    /// The aspect ratio derived from paper and orientation.
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.state
            .selections
            .paper
            .aspect_ratio(self.state.selections.orientation)
    }

    /// Whether the generate control is enabled.
    pub fn can_generate(&self) -> bool {
        !self.state.is_generating && self.has_input()
    }

    fn has_input(&self) -> bool {
        !self.state.selections.prompt.is_empty()
            || self.state.enabled_images().next().is_some()
    }

    /// Builds the request for the current state without changing it.
    pub fn build_request(&self) -> Result<GenerationRequest> {
        if !self.has_input() {
            return Err(ProEditError::InvalidRequest(
                "enter a prompt or enable at least one image".into(),
            ));
        }
        Ok(GenerationRequest {
            images: self
                .state
                .enabled_images()
                .map(|img| img.data.clone())
                .collect(),
            prompt: self.composed_prompt(),
            aspect_ratio: self.aspect_ratio(),
            resolution: self.state.resolution,
            model: self.state.model,
        })
    }

    /// Marks a request as outstanding and returns it.
    ///
    /// Fails while another request is outstanding.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest> {
        if self.state.is_generating {
            return Err(ProEditError::InvalidRequest(
                "a generation is already in progress".into(),
            ));
        }
        let request = self.build_request()?;
        self.state.is_generating = true;
        self.state.error = None;
        Ok(request)
    }

    /// Applies the outcome of the outstanding request.
    ///
    /// Outcomes arriving when nothing is outstanding are ignored.
    pub fn finish_generation(&mut self, outcome: &Result<GenerationResult>) {
        if !self.state.is_generating {
            tracing::debug!("ignoring generation outcome with no request outstanding");
            return;
        }
        self.state.is_generating = false;
        match outcome {
            Ok(result) => {
                self.state.result = Some(result.clone());
                self.state.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "image generation failed");
                self.state.error = Some(e.user_message(self.state.locale));
            }
        }
    }

    /// Runs one generation through `generator`, updating the state once.
    pub async fn generate<G>(&mut self, generator: &G) -> Result<GenerationResult>
    where
        G: ImageGenerator + ?Sized,
    {
        let request = self.begin_generation()?;
        let outcome = generator.generate(&request).await;
        self.finish_generation(&outcome);
        outcome
    }
}
