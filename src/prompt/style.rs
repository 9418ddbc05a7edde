//! Fixed prompt clauses for styles, line styles, modes and preservation.

use crate::error::{ProEditError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Style groups shown as tabs in the style section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleGroup {
    /// Anime by era.
    #[serde(rename = "anime")]
    Anime,
    /// Manga background touch.
    #[serde(rename = "manga")]
    Manga,
    /// Polygon / 3DCG rendering.
    #[serde(rename = "3dcg")]
    ThreeDcg,
    /// Pixel art.
    #[serde(rename = "pixel")]
    Pixel,
}

impl StyleGroup {
    /// All groups in display order.
    pub const ALL: [StyleGroup; 4] = [Self::Anime, Self::Manga, Self::ThreeDcg, Self::Pixel];

    /// Returns the group id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Manga => "manga",
            Self::ThreeDcg => "3dcg",
            Self::Pixel => "pixel",
        }
    }

    /// Styles belonging to this group.
    pub fn styles(&self) -> &'static [Style] {
        match self {
            Self::Anime => &[
                Style::Anime80s,
                Style::Anime90s,
                Style::Anime00s,
                Style::Anime10s,
            ],
            Self::Manga => &[Style::MangaBw, Style::MangaColor],
            Self::ThreeDcg => &[Style::CgPs, Style::CgLow, Style::CgModern],
            Self::Pixel => &[Style::PixelStandard],
        }
    }
}

impl FromStr for StyleGroup {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| ProEditError::InvalidRequest(format!("unknown style group '{s}'")))
    }
}

/// A concrete style: a group plus an id within that group.
///
/// Serialized as `"<group>/<id>"`, e.g. `"anime/90s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    /// Anime, 1980s-1990s.
    #[serde(rename = "anime/80s")]
    Anime80s,
    /// Anime, 1990s-2000s.
    #[serde(rename = "anime/90s")]
    Anime90s,
    /// Anime, 2000s-2010s.
    #[serde(rename = "anime/00s")]
    Anime00s,
    /// Anime, 2010s to present.
    #[serde(rename = "anime/10s")]
    Anime10s,
    /// Black and white manga.
    #[serde(rename = "manga/bw")]
    MangaBw,
    /// Color manga.
    #[serde(rename = "manga/color")]
    MangaColor,
    /// PS1-era low poly.
    #[serde(rename = "3dcg/ps")]
    CgPs,
    /// PS2-era low poly.
    #[serde(rename = "3dcg/low")]
    CgLow,
    /// Current 3DCG.
    #[serde(rename = "3dcg/modern")]
    CgModern,
    /// Dot graphics.
    #[serde(rename = "pixel/standard")]
    PixelStandard,
}

impl Style {
    /// Looks up a style by group and id.
    pub fn from_parts(group: StyleGroup, id: &str) -> Result<Self> {
        group
            .styles()
            .iter()
            .copied()
            .find(|s| s.id() == id)
            .ok_or_else(|| {
                ProEditError::InvalidRequest(format!(
                    "unknown style '{id}' in group '{}'",
                    group.as_str()
                ))
            })
    }

    /// Returns the group this style belongs to.
    pub fn group(&self) -> StyleGroup {
        match self {
            Self::Anime80s | Self::Anime90s | Self::Anime00s | Self::Anime10s => StyleGroup::Anime,
            Self::MangaBw | Self::MangaColor => StyleGroup::Manga,
            Self::CgPs | Self::CgLow | Self::CgModern => StyleGroup::ThreeDcg,
            Self::PixelStandard => StyleGroup::Pixel,
        }
    }

    /// Returns the id within the group.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Anime80s => "80s",
            Self::Anime90s => "90s",
            Self::Anime00s => "00s",
            Self::Anime10s => "10s",
            Self::MangaBw => "bw",
            Self::MangaColor => "color",
            Self::CgPs => "ps",
            Self::CgLow => "low",
            Self::CgModern => "modern",
            Self::PixelStandard => "standard",
        }
    }

    /// Returns the clause appended to the prompt.
    pub fn clause(&self) -> &'static str {
        match self {
            Self::Anime80s => "1980〜1990年代までのアニメ風のタッチとカラー使い",
            Self::Anime90s => "1990〜2000年代までのアニメ風のタッチとカラー使い",
            Self::Anime00s => "2000〜2010年代までのアニメ風のタッチとカラー使い",
            Self::Anime10s => "2010〜今現在のアニメまでのタッチとカラー使い",
            Self::MangaBw => "白黒漫画に使う背景用の漫画タッチ",
            Self::MangaColor => "カラー漫画に使う背景用の漫画タッチ",
            Self::CgPs => "3DCGかポリゴングラフィックをつかう画像(プレイステーション1時代のポリゴン)。3DCGかポリゴングラフィック以外は描写しないこと。PS1時代を超える高画質、高精細なテクスチャ、滑らかなモデルは禁止。",
            Self::CgLow => "3DCGかポリゴングラフィックをつかう画像(プレイステーション2時代のポリゴン)。3DCGかポリゴングラフィック以外は描写しないこと。PS2時代を超える高画質、リアルなライティング、高精細なモデルは禁止。",
            Self::CgModern => "3DCGかポリゴングラフィックをつかう画像(現代の３DCG)。3DCGかポリゴングラフィック以外は描写しないこと。",
            Self::PixelStandard => "ドットグラフィック（ドット絵）を使用し画像を作る。ドット絵以外の描写は禁止。高解像度、滑らかな線、ベクター表現は行わないこと。アンチエイリアスのかからない、エッジの効いたブロック状の描写にすること。",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.group().as_str(), self.id())
    }
}

impl FromStr for Style {
    type Err = ProEditError;

    /// Parses `"<group>/<id>"`.
    fn from_str(s: &str) -> Result<Self> {
        let (group, id) = s.split_once('/').ok_or_else(|| {
            ProEditError::InvalidRequest(format!("style '{s}' must be written as <group>/<id>"))
        })?;
        Self::from_parts(group.parse()?, id)
    }
}

/// Line art / finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Standard anime/manga line art.
    Std,
    /// Hot-blooded, bold lines.
    Hot,
    /// Gekiga, dramatic.
    Gekiga,
    /// Realistic.
    Real,
    /// Lower elementary grades.
    Lowgrade,
    /// Kindergarten.
    Kindergarten,
}

impl LineStyle {
    /// All line styles in display order.
    pub const ALL: [LineStyle; 6] = [
        Self::Std,
        Self::Hot,
        Self::Gekiga,
        Self::Real,
        Self::Lowgrade,
        Self::Kindergarten,
    ];

    /// Returns the line style id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Std => "std",
            Self::Hot => "hot",
            Self::Gekiga => "gekiga",
            Self::Real => "real",
            Self::Lowgrade => "lowgrade",
            Self::Kindergarten => "kindergarten",
        }
    }

    /// Returns the clause appended to the prompt.
    pub fn clause(&self) -> &'static str {
        match self {
            Self::Std => "通常のアニメ・漫画の線画タッチ",
            Self::Hot => "熱血アニメ風の力強い線画とコントラスト",
            Self::Gekiga => "劇画調の太く荒々しい線画と陰影",
            Self::Real => "写実的でリアルな描画スタイル",
            Self::Lowgrade => "小学生向けの絵柄のタッチ",
            Self::Kindergarten => "幼稚園児くらいの子供が好む絵のタッチ",
        }
    }
}

impl FromStr for LineStyle {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ProEditError::InvalidRequest(format!("unknown line style '{s}'")))
    }
}

/// Layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Four-panel comic strip.
    #[serde(rename = "4koma_layout")]
    FourKomaLayout,
    /// Children's picture book illustration.
    #[serde(rename = "picture_book")]
    PictureBook,
}

impl Mode {
    /// All modes in display order.
    pub const ALL: [Mode; 2] = [Self::FourKomaLayout, Self::PictureBook];

    /// Returns the mode id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FourKomaLayout => "4koma_layout",
            Self::PictureBook => "picture_book",
        }
    }

    /// Returns the clause appended to the prompt.
    pub fn clause(&self) -> &'static str {
        match self {
            Self::FourKomaLayout => "Create a 4-panel comic strip (4-koma manga) layout. The image must be divided into 4 clear panels.",
            Self::PictureBook => "Create an illustration in the style of a children's picture book. Use warm, soft colors and a whimsical, narrative-driven artistic style suitable for a storybook.",
        }
    }
}

impl FromStr for Mode {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ProEditError::InvalidRequest(format!("unknown mode '{s}'")))
    }
}

/// How much of the source image the model must keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreservationMode {
    /// Standard editing, no constraint.
    #[default]
    None,
    /// Keep everything, improve quality only.
    Strict,
    /// Keep line art, change color and texture.
    LineArt,
    /// Keep the characters, change the background.
    CharacterBackground,
    /// Same character in a new pose or location.
    SameCharacter,
}

impl PreservationMode {
    /// All preservation modes in display order.
    pub const ALL: [PreservationMode; 5] = [
        Self::None,
        Self::Strict,
        Self::LineArt,
        Self::CharacterBackground,
        Self::SameCharacter,
    ];

    /// Returns the preservation mode id.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Strict => "strict",
            Self::LineArt => "line_art",
            Self::CharacterBackground => "character_background",
            Self::SameCharacter => "same_character",
        }
    }

    /// Returns the clause appended to the prompt, if this mode adds one.
    pub fn clause(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Strict => Some("Preserve the source image exactly. Keep the composition, characters, colors and every detail unchanged. Only improve the image quality, sharpen details and remove noise."),
            Self::LineArt => Some("Preserve the line art of the source image exactly. Do not change any lines, shapes or the composition. Only add or change colors, shading and textures."),
            Self::CharacterBackground => Some("Preserve the characters of the source image exactly, including their faces, outfits, poses and expressions. Change only the background."),
            Self::SameCharacter => Some("Draw the same character as in the source image with an identical face, hairstyle, outfit and overall identity. The pose, camera angle and location may change freely."),
        }
    }
}

impl FromStr for PreservationMode {
    type Err = ProEditError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ProEditError::InvalidRequest(format!("unknown preservation mode '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse() {
        assert_eq!("anime/90s".parse::<Style>().unwrap(), Style::Anime90s);
        assert_eq!("3dcg/ps".parse::<Style>().unwrap(), Style::CgPs);
        assert_eq!("pixel/standard".parse::<Style>().unwrap(), Style::PixelStandard);

        assert!("anime".parse::<Style>().is_err());
        assert!("anime/bw".parse::<Style>().is_err());
        assert!("watercolor/soft".parse::<Style>().is_err());
    }

    #[test]
    fn test_style_group_membership() {
        for group in StyleGroup::ALL {
            for style in group.styles() {
                assert_eq!(style.group(), group);
                assert_eq!(Style::from_parts(group, style.id()).unwrap(), *style);
                assert_eq!(style.to_string().parse::<Style>().unwrap(), *style);
            }
        }
    }

    #[test]
    fn test_style_serde_uses_group_and_id() {
        let json = serde_json::to_string(&Style::MangaColor).unwrap();
        assert_eq!(json, "\"manga/color\"");
        let group = serde_json::to_string(&StyleGroup::ThreeDcg).unwrap();
        assert_eq!(group, "\"3dcg\"");
    }

    #[test]
    fn test_ids_roundtrip_through_from_str() {
        for line in LineStyle::ALL {
            assert_eq!(line.as_str().parse::<LineStyle>().unwrap(), line);
        }
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
        for p in PreservationMode::ALL {
            assert_eq!(p.as_str().parse::<PreservationMode>().unwrap(), p);
        }
        assert!("comic".parse::<Mode>().is_err());
    }

    #[test]
    fn test_preservation_none_has_no_clause() {
        assert!(PreservationMode::None.clause().is_none());
        assert!(PreservationMode::ALL[1..]
            .iter()
            .all(|p| p.clause().is_some()));
    }
}
