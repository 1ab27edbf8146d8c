//! Sketch configuration (JSON).
//!
//! Demos run fine on `SketchConfig::default()`; a JSON file is only needed
//! to override window size, frame rate, or pointer units.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SketchError;

/// Units for the pointer coordinates handed to the per-frame callback.
///
/// The upstream demos disagreed on this (some normalized, some raw pixels),
/// so it is an explicit knob instead of an accident of which entry file ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerUnits {
    /// [0, 1] over the window, clamped.
    Normalized,
    /// Raw physical pixels.
    Pixels,
}

impl Default for PointerUnits {
    fn default() -> Self {
        PointerUnits::Normalized
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Target frame rate; the loop never runs frames closer than 1/fps apart.
    pub fps: u32,
    pub pointer_units: PointerUnits,
    /// RGBA clear color applied before every frame.
    pub clear_color: [f32; 4],
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            title: "glint sketch".to_string(),
            width: 960,
            height: 540,
            fps: 60,
            pointer_units: PointerUnits::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl SketchConfig {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Load and validate a config from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, SketchError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SketchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: SketchConfig =
            serde_json::from_str(&text).map_err(|source| SketchError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()
            .map_err(|msg| SketchError::InvalidConfig {
                path: path.to_path_buf(),
                msg,
            })?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "window size must be at least 1x1 (got {}x{})",
                self.width, self.height
            ));
        }
        if self.fps == 0 {
            return Err("fps must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SketchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_fps_is_rejected() {
        let cfg = SketchConfig {
            fps: 0,
            ..SketchConfig::default()
        };
        let msg = cfg.validate().unwrap_err();
        assert!(msg.contains("fps"), "unexpected msg: {msg}");
    }

    #[test]
    fn zero_size_is_rejected() {
        let cfg = SketchConfig {
            width: 0,
            ..SketchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SketchConfig = serde_json::from_str(r#"{ "fps": 30 }"#).unwrap();
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.width, 960);
        assert_eq!(cfg.pointer_units, PointerUnits::Normalized);
    }

    #[test]
    fn pointer_units_parse_snake_case() {
        let cfg: SketchConfig =
            serde_json::from_str(r#"{ "pointer_units": "pixels" }"#).unwrap();
        assert_eq!(cfg.pointer_units, PointerUnits::Pixels);
    }
}
