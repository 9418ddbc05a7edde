//! Localized strings used by prompt composition and error reporting.

use crate::error::ProEditError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    En,
    /// Japanese.
    #[default]
    Ja,
}

impl Locale {
    /// Returns the locale id ("en" or "ja").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    /// Returns the other locale.
    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Ja,
            Self::Ja => Self::En,
        }
    }

    /// Returns the string table for this locale.
    pub fn strings(&self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Ja => &JA,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ja" => Ok(Self::Ja),
            other => Err(ProEditError::InvalidRequest(format!(
                "unknown locale '{other}'"
            ))),
        }
    }
}

/// String table for one locale.
#[allow(missing_docs)]
#[derive(Debug)]
pub struct Strings {
    pub error_generic: &'static str,
    pub key_missing: &'static str,
    pub project_required: &'static str,
    pub platform_unavailable: &'static str,
    pub orient_portrait: &'static str,
    pub orient_landscape: &'static str,
    pub paper_a3a4: &'static str,
    pub paper_hagaki: &'static str,
    pub paper_l: &'static str,
    pub paper_square: &'static str,
    pub paper_mobile: &'static str,
    pub paper_story: &'static str,
    pub paper_wide: &'static str,
    pub res_1k: &'static str,
    pub res_2k: &'static str,
    pub res_4k: &'static str,
}

static EN: Strings = Strings {
    error_generic: "Failed to generate image. Please try again.",
    key_missing: "Please provide a Gemini API Key in settings or select a Google Cloud Project.",
    project_required: "Project selection is required if no API Key is provided in settings.",
    platform_unavailable: "Google Cloud Project selection is not available in this environment.",
    orient_portrait: "Portrait (Vertical)",
    orient_landscape: "Landscape (Horizontal)",
    paper_a3a4: "A3 / A4",
    paper_hagaki: "Postcard",
    paper_l: "L-Size",
    paper_square: "Square",
    paper_mobile: "Mobile",
    paper_story: "Story",
    paper_wide: "Wide (16:9)",
    res_1k: "Fast (1K)",
    res_2k: "Standard (2K)",
    res_4k: "Ultra (4K)",
};

static JA: Strings = Strings {
    error_generic: "画像の生成に失敗しました。もう一度お試しください。",
    key_missing: "設定でGemini APIキーを入力するか、Google Cloudプロジェクトを選択してください。",
    project_required: "APIキーが設定されていない場合は、プロジェクトの選択が必要です。",
    platform_unavailable: "この環境ではGoogle Cloudプロジェクトを選択できません。",
    orient_portrait: "縦長 (Portrait)",
    orient_landscape: "横長 (Landscape)",
    paper_a3a4: "A3・A4",
    paper_hagaki: "はがき",
    paper_l: "L判",
    paper_square: "スクエア",
    paper_mobile: "スマホ",
    paper_story: "ストーリー",
    paper_wide: "ワイド",
    res_1k: "軽量 (1K)",
    res_2k: "標準 (2K)",
    res_4k: "超高画質 (4K)",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse_and_display() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ja".parse::<Locale>().unwrap(), Locale::Ja);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::En.to_string(), "en");
    }

    #[test]
    fn test_locale_toggle() {
        assert_eq!(Locale::default(), Locale::Ja);
        assert_eq!(Locale::Ja.toggled(), Locale::En);
        assert_eq!(Locale::En.toggled().toggled(), Locale::En);
    }
}
