//! Output paper sizes, orientation and aspect-ratio derivation.

use crate::error::{ProEditError, Result};
use crate::image::AspectRatio;
use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paper {
    /// ISO A3 / A4.
    #[default]
    A3a4,
    /// Japanese postcard, 100x148mm.
    Hagaki,
    /// L-size photo print.
    L,
    /// Phone screen.
    Mobile,
    /// Social media story.
    Story,
    /// 16:9 monitor.
    Wide,
    /// 1:1.
    Square,
}

impl Paper {
    /// All papers in display order.
    pub const ALL: [Paper; 7] = [
        Self::A3a4,
        Self::Hagaki,
        Self::L,
        Self::Mobile,
        Self::Story,
        Self::Wide,
        Self::Square,
    ];

    /// Returns the paper id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A3a4 => "a3a4",
            Self::Hagaki => "hagaki",
            Self::L => "l",
            Self::Mobile => "mobile",
            Self::Story => "story",
            Self::Wide => "wide",
            Self::Square => "square",
        }
    }

    /// Whether orientation applies to this paper.
    pub fn is_rectangular(&self) -> bool {
        !matches!(self, Self::Square)
    }

    /// Human-readable label in the given locale.
    pub fn label(&self, locale: Locale) -> &'static str {
        let t = locale.strings();
        match self {
            Self::A3a4 => t.paper_a3a4,
            Self::Hagaki => t.paper_hagaki,
            Self::L => t.paper_l,
            Self::Mobile => t.paper_mobile,
            Self::Story => t.paper_story,
            Self::Wide => t.paper_wide,
            Self::Square => t.paper_square,
        }
    }

    /// Derives the aspect ratio sent to the model.
    pub fn aspect_ratio(&self, orientation: Orientation) -> AspectRatio {
        match (self, orientation) {
            (Self::Square, _) => AspectRatio::Square,
            (Self::Mobile | Self::Story | Self::Wide, Orientation::Portrait) => {
                AspectRatio::Portrait
            }
            (Self::Mobile | Self::Story | Self::Wide, Orientation::Landscape) => {
                AspectRatio::Landscape
            }
            (Self::A3a4 | Self::Hagaki | Self::L, Orientation::Portrait) => {
                AspectRatio::StandardPortrait
            }
            (Self::A3a4 | Self::Hagaki | Self::L, Orientation::Landscape) => AspectRatio::Standard,
        }
    }
}

impl FromStr for Paper {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ProEditError::InvalidRequest(format!("unknown paper '{s}'")))
    }
}

/// Paper orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Taller than wide.
    #[default]
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Returns the orientation id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    /// Human-readable name in the given locale.
    pub fn label(&self, locale: Locale) -> &'static str {
        match self {
            Self::Portrait => locale.strings().orient_portrait,
            Self::Landscape => locale.strings().orient_landscape,
        }
    }
}

impl FromStr for Orientation {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(ProEditError::InvalidRequest(format!(
                "unknown orientation '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_is_total() {
        let allowed = [
            AspectRatio::Square,
            AspectRatio::StandardPortrait,
            AspectRatio::Standard,
            AspectRatio::Portrait,
            AspectRatio::Landscape,
        ];
        for paper in Paper::ALL {
            for orientation in [Orientation::Portrait, Orientation::Landscape] {
                assert!(allowed.contains(&paper.aspect_ratio(orientation)));
            }
        }
    }

    #[test]
    fn test_square_ignores_orientation() {
        assert_eq!(Paper::Square.aspect_ratio(Orientation::Portrait), AspectRatio::Square);
        assert_eq!(Paper::Square.aspect_ratio(Orientation::Landscape), AspectRatio::Square);
        assert!(!Paper::Square.is_rectangular());
    }

    #[test]
    fn test_wide_family() {
        for paper in [Paper::Mobile, Paper::Story, Paper::Wide] {
            assert_eq!(paper.aspect_ratio(Orientation::Portrait).as_str(), "9:16");
            assert_eq!(paper.aspect_ratio(Orientation::Landscape).as_str(), "16:9");
        }
    }

    #[test]
    fn test_standard_family() {
        for paper in [Paper::A3a4, Paper::Hagaki, Paper::L] {
            assert_eq!(paper.aspect_ratio(Orientation::Portrait).as_str(), "3:4");
            assert_eq!(paper.aspect_ratio(Orientation::Landscape).as_str(), "4:3");
            assert!(paper.is_rectangular());
        }
    }

    #[test]
    fn test_paper_ids() {
        for paper in Paper::ALL {
            assert_eq!(paper.as_str().parse::<Paper>().unwrap(), paper);
        }
        assert!("letter".parse::<Paper>().is_err());
        assert_eq!(serde_json::to_string(&Paper::A3a4).unwrap(), "\"a3a4\"");
    }

    #[test]
    fn test_labels_follow_locale() {
        assert_eq!(Paper::Hagaki.label(Locale::En), "Postcard");
        assert_eq!(Paper::Hagaki.label(Locale::Ja), "はがき");
        assert_eq!(Orientation::Landscape.label(Locale::En), "Landscape (Horizontal)");
    }
}
