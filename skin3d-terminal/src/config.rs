//! Pose files and command-line overrides.
//!
//! A pose file is TOML with two optional tables:
//!
//! ```toml
//! [render]
//! vr = -25.0
//! hr = 35.0
//! vrla = 45.0
//! display_cape = false
//!
//! [preview]
//! step = 5.0
//! spin_speed = 2.0
//! fps = 30
//! ```
//!
//! Missing fields keep their defaults.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skin3d_core::RenderConfig;

/// Settings for the interactive preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Degrees per rotation key press.
    pub step: f64,
    /// Degrees of `hr` added per frame while spinning.
    pub spin_speed: f64,
    /// Target frame rate.
    pub fps: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            step: 5.0,
            spin_speed: 2.0,
            fps: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseFile {
    pub render: RenderConfig,
    pub preview: PreviewSettings,
}

impl PoseFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pose file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid pose file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let pose: PoseFile = toml::from_str(text)?;
        pose.render.validate()?;
        anyhow::ensure!(pose.preview.fps > 0, "preview.fps must be positive");
        Ok(pose)
    }
}

/// Values given on the command line; they win over the pose file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub vr: Option<f64>,
    pub hr: Option<f64>,
    pub ratio: Option<u32>,
    pub head: bool,
    pub antialias: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut RenderConfig) {
        if let Some(vr) = self.vr {
            config.vr = vr;
        }
        if let Some(hr) = self.hr {
            config.hr = hr;
        }
        if let Some(ratio) = self.ratio {
            config.ratio = ratio;
        }
        if self.head {
            config.head_only = true;
            config.display_second_layer = false;
            config.display_cape = false;
        }
        if self.antialias {
            config.antialias = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pose_is_default() {
        let pose = PoseFile::parse("").unwrap();
        assert_eq!(pose, PoseFile::default());
    }

    #[test]
    fn test_partial_tables() {
        let pose = PoseFile::parse("[render]\nvrla = 45.0\n\n[preview]\nstep = 15.0\n").unwrap();
        assert_eq!(pose.render.vrla, 45.0);
        assert_eq!(pose.render.hr, 35.0);
        assert_eq!(pose.preview.step, 15.0);
        assert_eq!(pose.preview.fps, 30);
    }

    #[test]
    fn test_rejects_bad_pose() {
        assert!(PoseFile::parse("[render]\nratio = \"big\"\n").is_err());
        assert!(PoseFile::parse("[preview]\nfps = 0\n").is_err());
        assert!(PoseFile::parse("[render]\nvr = nan\n").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = RenderConfig::default();
        let overrides = Overrides {
            hr: Some(-90.0),
            ratio: Some(4),
            head: true,
            ..Overrides::default()
        };
        overrides.apply(&mut config);
        assert_eq!(config.hr, -90.0);
        assert_eq!(config.vr, -25.0);
        assert_eq!(config.ratio, 4);
        assert!(config.head_only);
        assert!(!config.display_cape);
        assert!(!config.antialias);
    }
}
