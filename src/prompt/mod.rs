//! Prompt composition: fixed clause tables and paper handling.

mod compose;
mod paper;
mod style;

pub use compose::{compose_prompt, fit_to_paper_clause, PromptSelections};
pub use paper::{Orientation, Paper};
pub use style::{LineStyle, Mode, PreservationMode, Style, StyleGroup};
