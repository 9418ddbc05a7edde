//! Final prompt assembly.

use crate::locale::Locale;
use crate::prompt::paper::{Orientation, Paper};
use crate::prompt::style::{LineStyle, Mode, PreservationMode, Style};
use serde::{Deserialize, Serialize};

/// The selections that feed prompt composition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSelections {
    /// Free-text prompt written by the user.
    pub prompt: String,
    /// Fixed style clause.
    pub style: Option<Style>,
    /// Line art / finish clause.
    pub line_style: Option<LineStyle>,
    /// Layout mode clause.
    pub mode: Option<Mode>,
    /// Preservation constraint. `None` adds nothing.
    pub preservation: PreservationMode,
    /// Append the fit-to-paper instruction.
    pub fit_to_paper: bool,
    /// Selected output paper.
    pub paper: Paper,
    /// Selected orientation.
    pub orientation: Orientation,
}

/// Builds the fit-to-paper instruction for a paper and orientation.
pub fn fit_to_paper_clause(paper: Paper, orientation: Orientation, locale: Locale) -> String {
    format!(
        "IMPORTANT: Automatically adjust and extend the composition to perfectly fit the {} size in {} orientation. \
         Ensure the aspect ratio is strictly adhered to. There must be no unnatural borders, cropping, or empty spaces. \
         Fill the entire canvas seamlessly to match this specific paper format.",
        paper.label(locale),
        orientation.label(locale),
    )
}

/// Composes the text sent to the model.
///
/// Each active clause is appended on its own line in parentheses, always in
/// the order style, line style, mode, preservation, fit-to-paper.
pub fn compose_prompt(selections: &PromptSelections, locale: Locale) -> String {
    let mut clauses: Vec<String> = Vec::with_capacity(5);

    if let Some(style) = selections.style {
        clauses.push(style.clause().to_string());
    }
    if let Some(line_style) = selections.line_style {
        clauses.push(line_style.clause().to_string());
    }
    if let Some(mode) = selections.mode {
        clauses.push(mode.clause().to_string());
    }
    if let Some(clause) = selections.preservation.clause() {
        clauses.push(clause.to_string());
    }
    if selections.fit_to_paper {
        clauses.push(fit_to_paper_clause(
            selections.paper,
            selections.orientation,
            locale,
        ));
    }

    let mut prompt = selections.prompt.clone();
    for clause in clauses {
        prompt.push_str("\n(");
        prompt.push_str(&clause);
        prompt.push(')');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat() -> PromptSelections {
        PromptSelections {
            prompt: "a cat".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_selections_is_prompt_verbatim() {
        assert_eq!(compose_prompt(&cat(), Locale::En), "a cat");
        assert_eq!(compose_prompt(&PromptSelections::default(), Locale::Ja), "");
    }

    #[test]
    fn test_style_and_line_style_example() {
        let selections = PromptSelections {
            style: Some(Style::Anime90s),
            line_style: Some(LineStyle::Hot),
            preservation: PreservationMode::None,
            ..cat()
        };
        let expected = format!(
            "a cat\n({})\n({})",
            Style::Anime90s.clause(),
            LineStyle::Hot.clause()
        );
        assert_eq!(compose_prompt(&selections, Locale::En), expected);
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let selections = PromptSelections {
            fit_to_paper: true,
            preservation: PreservationMode::LineArt,
            mode: Some(Mode::PictureBook),
            line_style: Some(LineStyle::Real),
            style: Some(Style::MangaBw),
            ..cat()
        };
        let out = compose_prompt(&selections, Locale::En);
        let positions: Vec<usize> = [
            Style::MangaBw.clause(),
            LineStyle::Real.clause(),
            Mode::PictureBook.clause(),
            PreservationMode::LineArt.clause().unwrap(),
            "IMPORTANT: Automatically adjust",
        ]
        .iter()
        .map(|c| out.find(c).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(out.matches("\n(").count(), 5);
    }

    #[test]
    fn test_unset_selections_add_nothing() {
        let with_mode = PromptSelections {
            mode: Some(Mode::FourKomaLayout),
            ..cat()
        };
        let out = compose_prompt(&with_mode, Locale::En);
        assert_eq!(out.len(), "a cat".len() + 3 + Mode::FourKomaLayout.clause().len());
        assert!(!out.contains("()"));
    }

    #[test]
    fn test_fit_to_paper_interpolates_locale() {
        let selections = PromptSelections {
            fit_to_paper: true,
            paper: Paper::Hagaki,
            orientation: Orientation::Landscape,
            ..cat()
        };
        let en = compose_prompt(&selections, Locale::En);
        assert!(en.contains("fit the Postcard size in Landscape (Horizontal) orientation"));

        let ja = compose_prompt(&selections, Locale::Ja);
        assert!(ja.contains("fit the はがき size in 横長 (Landscape) orientation"));
        assert!(ja.ends_with("paper format.)"));
    }

    #[test]
    fn test_deterministic() {
        let selections = PromptSelections {
            style: Some(Style::CgLow),
            preservation: PreservationMode::Strict,
            fit_to_paper: true,
            ..cat()
        };
        assert_eq!(
            compose_prompt(&selections, Locale::Ja),
            compose_prompt(&selections.clone(), Locale::Ja)
        );
    }
}
