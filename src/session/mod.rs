//! View state, its controller, and file intake.

mod controller;
mod intake;
mod state;

pub use controller::Controller;
pub use intake::{intake_files, read_image_file, ImageReady, IntakeReport};
pub use state::{SourceImage, ViewState, MAX_SOURCE_IMAGES};
