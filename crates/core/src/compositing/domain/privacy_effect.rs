use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::occlusion_image::OcclusionImage;

/// The privacy effect selected by the user. Discriminants match the
/// number keys that select each mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyMode {
    #[default]
    None = 0,
    Blur = 1,
    Pixelate = 2,
    Occlude = 3,
}

impl PrivacyMode {
    pub const ALL: &[PrivacyMode] = &[
        PrivacyMode::None,
        PrivacyMode::Blur,
        PrivacyMode::Pixelate,
        PrivacyMode::Occlude,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PrivacyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivacyMode::None => write!(f, "None"),
            PrivacyMode::Blur => write!(f, "Blur"),
            PrivacyMode::Pixelate => write!(f, "Pixelate"),
            PrivacyMode::Occlude => write!(f, "Occlude"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown privacy mode '{0}' (expected none, blur, pixelate, occlude or 0-3)")]
pub struct ParseModeError(pub String);

impl FromStr for PrivacyMode {
    type Err = ParseModeError;

    /// Accepts a mode name (any case) or its key digit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<u8>() {
            return Self::from_index(index).ok_or_else(|| ParseModeError(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(PrivacyMode::None),
            "blur" => Ok(PrivacyMode::Blur),
            "pixelate" | "mosaic" => Ok(PrivacyMode::Pixelate),
            "occlude" | "mask" => Ok(PrivacyMode::Occlude),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// One fully parameterised effect, ready for the compositor.
///
/// Parameters are taken as given; the compositor coerces out-of-range
/// values (zero or even kernel sizes, zero pixel sizes) itself.
#[derive(Clone, Copy, Debug)]
pub enum PrivacyEffect<'a> {
    None,
    Blur { kernel_size: usize },
    Pixelate { pixel_size: usize },
    Occlude { image: Option<&'a OcclusionImage> },
}

impl PrivacyEffect<'_> {
    pub fn mode(&self) -> PrivacyMode {
        match self {
            PrivacyEffect::None => PrivacyMode::None,
            PrivacyEffect::Blur { .. } => PrivacyMode::Blur,
            PrivacyEffect::Pixelate { .. } => PrivacyMode::Pixelate,
            PrivacyEffect::Occlude { .. } => PrivacyMode::Occlude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", PrivacyMode::None)]
    #[case("1", PrivacyMode::Blur)]
    #[case("2", PrivacyMode::Pixelate)]
    #[case("3", PrivacyMode::Occlude)]
    #[case("blur", PrivacyMode::Blur)]
    #[case("Pixelate", PrivacyMode::Pixelate)]
    #[case(" OCCLUDE ", PrivacyMode::Occlude)]
    #[case("mask", PrivacyMode::Occlude)]
    #[case("none", PrivacyMode::None)]
    fn test_parse_mode(#[case] input: &str, #[case] expected: PrivacyMode) {
        assert_eq!(input.parse::<PrivacyMode>().unwrap(), expected);
    }

    #[rstest]
    #[case("4")]
    #[case("sharpen")]
    #[case("")]
    fn test_parse_mode_rejects_unknown(#[case] input: &str) {
        let err = input.parse::<PrivacyMode>().unwrap_err();
        assert_eq!(err, ParseModeError(input.to_string()));
    }

    #[test]
    fn test_index_round_trips_for_every_mode() {
        for &mode in PrivacyMode::ALL {
            assert_eq!(PrivacyMode::from_index(mode.index()), Some(mode));
        }
        assert_eq!(PrivacyMode::from_index(4), None);
    }

    #[test]
    fn test_default_mode_is_none() {
        assert_eq!(PrivacyMode::default(), PrivacyMode::None);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&PrivacyMode::Pixelate).unwrap();
        assert_eq!(json, "\"pixelate\"");
        let mode: PrivacyMode = serde_json::from_str("\"occlude\"").unwrap();
        assert_eq!(mode, PrivacyMode::Occlude);
    }

    #[test]
    fn test_effect_reports_its_mode() {
        assert_eq!(PrivacyEffect::None.mode(), PrivacyMode::None);
        assert_eq!(
            PrivacyEffect::Blur { kernel_size: 5 }.mode(),
            PrivacyMode::Blur
        );
        assert_eq!(
            PrivacyEffect::Pixelate { pixel_size: 4 }.mode(),
            PrivacyMode::Pixelate
        );
        assert_eq!(
            PrivacyEffect::Occlude { image: None }.mode(),
            PrivacyMode::Occlude
        );
    }
}
