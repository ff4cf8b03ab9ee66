use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use face_privacy_core::compositing::domain::privacy_effect::PrivacyMode;
use face_privacy_core::pipeline::frame_processor::EffectParams;

/// Persisted defaults for the CLI. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: PrivacyMode,
    pub kernel_size: usize,
    pub pixel_size: usize,
    pub occlusion_scale: f32,
    pub min_confidence: f32,
    pub occlusion_image: Option<PathBuf>,
    pub annotate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let params = EffectParams::default();
        Self {
            mode: PrivacyMode::None,
            kernel_size: params.kernel_size,
            pixel_size: params.pixel_size,
            occlusion_scale: params.occlusion_scale,
            min_confidence: params.min_confidence,
            occlusion_image: None,
            annotate: false,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FacePrivacy").join("settings.json"))
    }

    /// Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            log::debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn effect_params(&self) -> EffectParams {
        EffectParams {
            kernel_size: self.kernel_size,
            pixel_size: self.pixel_size,
            occlusion_scale: self.occlusion_scale,
            min_confidence: self.min_confidence,
        }
    }
}
