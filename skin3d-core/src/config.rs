//! Render parameters.
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// View angles, limb articulation and output options for one render.
///
/// All angles are in degrees and unconstrained. Missing fields in a
/// deserialized document fall back to the full-body defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical view rotation.
    pub vr: f64,
    /// Horizontal view rotation.
    pub hr: f64,
    /// Head yaw.
    pub hrh: f64,
    /// Left leg pitch.
    pub vrll: f64,
    /// Right leg pitch.
    pub vrrl: f64,
    /// Left arm pitch.
    pub vrla: f64,
    /// Left arm yaw.
    pub hrla: f64,
    /// Right arm pitch.
    pub vrra: f64,
    /// Right arm yaw.
    pub hrra: f64,
    /// Cape pitch; positive values swing the cape away from the back.
    pub vrc: f64,
    /// Output pixels per model unit. Values below 2 render as 2.
    pub ratio: u32,
    pub head_only: bool,
    pub display_hair: bool,
    pub display_second_layer: bool,
    pub display_cape: bool,
    pub antialias: bool,
    pub transparent_background: bool,
    /// Fill used when `transparent_background` is off. Alpha is forced opaque.
    pub background: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vr: -25.0,
            hr: 35.0,
            hrh: 0.0,
            vrll: 0.0,
            vrrl: 0.0,
            vrla: 0.0,
            hrla: 0.0,
            vrra: 0.0,
            hrra: 0.0,
            vrc: 30.0,
            ratio: 12,
            head_only: false,
            display_hair: true,
            display_second_layer: true,
            display_cape: true,
            antialias: false,
            transparent_background: true,
            background: [255, 255, 255, 255],
        }
    }
}

impl RenderConfig {
    /// Head-only preset: no body, no second layer, no cape.
    pub fn head() -> Self {
        Self {
            head_only: true,
            display_second_layer: false,
            display_cape: false,
            ..Self::default()
        }
    }

    pub fn with_view(mut self, vr: f64, hr: f64) -> Self {
        self.vr = vr;
        self.hr = hr;
        self
    }

    pub fn with_ratio(mut self, ratio: u32) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_layers(mut self, hair: bool, second_layer: bool, cape: bool) -> Self {
        self.display_hair = hair;
        self.display_second_layer = second_layer;
        self.display_cape = cape;
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    /// Pixels per model unit actually used for the working raster.
    pub fn effective_ratio(&self) -> f64 {
        let ratio = f64::from(self.ratio.max(2));
        if self.antialias {
            ratio * 2.0
        } else {
            ratio
        }
    }

    /// Background fill, or `None` for a transparent canvas.
    pub fn background_fill(&self) -> Option<Rgba<u8>> {
        if self.transparent_background {
            None
        } else {
            let [r, g, b, _] = self.background;
            Some(Rgba([r, g, b, 255]))
        }
    }

    pub fn validate(&self) -> Result<()> {
        let angles = [
            ("vr", self.vr),
            ("hr", self.hr),
            ("hrh", self.hrh),
            ("vrll", self.vrll),
            ("vrrl", self.vrrl),
            ("vrla", self.vrla),
            ("hrla", self.hrla),
            ("vrra", self.vrra),
            ("hrra", self.hrra),
            ("vrc", self.vrc),
        ];
        for (name, value) in angles {
            if !value.is_finite() {
                return Err(RenderError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_is_clamped() {
        assert_eq!(RenderConfig::default().with_ratio(0).effective_ratio(), 2.0);
        assert_eq!(RenderConfig::default().with_ratio(1).effective_ratio(), 2.0);
        assert_eq!(RenderConfig::default().with_ratio(5).effective_ratio(), 5.0);
        let aa = RenderConfig::default().with_ratio(1).with_antialias(true);
        assert_eq!(aa.effective_ratio(), 4.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RenderConfig = toml::from_str("hr = 90.0\nhead_only = true\n").unwrap();
        assert_eq!(config.hr, 90.0);
        assert!(config.head_only);
        assert_eq!(config.vr, -25.0);
        assert_eq!(config.ratio, 12);
    }

    #[test]
    fn test_rejects_non_finite_angles() {
        let config = RenderConfig {
            vrc: f64::NAN,
            ..RenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_background_fill() {
        assert_eq!(RenderConfig::default().background_fill(), None);
        let opaque = RenderConfig {
            transparent_background: false,
            background: [1, 2, 3, 0],
            ..RenderConfig::default()
        };
        assert_eq!(opaque.background_fill(), Some(Rgba([1, 2, 3, 255])));
    }
}
