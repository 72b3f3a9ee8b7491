//! Input atlases and their size rules.
use image::RgbaImage;

use crate::error::{AtlasKind, RenderError, Result};

/// Width of a baseline skin or cape atlas.
pub const BASE_WIDTH: u32 = 64;

/// A skin atlas, an optional cape atlas and the arm model.
///
/// Legacy 32px-tall skins are expected to be upgraded by the caller; if one
/// arrives anyway, the rows it lacks sample as transparent.
#[derive(Debug, Clone)]
pub struct SkinAsset {
    atlas: RgbaImage,
    cape: Option<RgbaImage>,
    is_slim: bool,
}

impl SkinAsset {
    pub fn new(atlas: RgbaImage, cape: Option<RgbaImage>, is_slim: bool) -> Self {
        Self {
            atlas,
            cape,
            is_slim,
        }
    }

    /// Build an asset, picking the arm model from the atlas itself.
    pub fn with_detected_model(atlas: RgbaImage, cape: Option<RgbaImage>) -> Self {
        let is_slim = Self::detect_slim(&atlas);
        Self::new(atlas, cape, is_slim)
    }

    /// The texel at (46, 52) lies in a classic left arm's back region
    /// (columns 44..47) but past a slim one's (43..45), so only a classic
    /// skin paints it.
    pub fn detect_slim(atlas: &RgbaImage) -> bool {
        let ratio = (atlas.width() / BASE_WIDTH).max(1);
        atlas
            .get_pixel_checked(46 * ratio, 52 * ratio)
            .map(|pixel| pixel[3] == 0)
            .unwrap_or(false)
    }

    pub fn atlas(&self) -> &RgbaImage {
        &self.atlas
    }

    pub fn cape(&self) -> Option<&RgbaImage> {
        self.cape.as_ref()
    }

    pub fn is_slim(&self) -> bool {
        self.is_slim
    }

    /// Resolution multiplier of the skin atlas relative to 64px.
    pub fn hd_ratio(&self) -> Result<u32> {
        let (width, height) = self.atlas.dimensions();
        let invalid = |reason| RenderError::InvalidAtlasDimensions {
            kind: AtlasKind::Skin,
            width,
            height,
            reason,
        };

        if width == 0 || width % BASE_WIDTH != 0 {
            return Err(invalid("width must be a positive multiple of 64"));
        }
        let ratio = width / BASE_WIDTH;
        if height != 64 * ratio && height != 32 * ratio {
            return Err(invalid("height must be width or half of width"));
        }
        Ok(ratio)
    }

    /// Resolution multiplier of the cape atlas, if there is one.
    pub fn cape_ratio(&self) -> Result<Option<u32>> {
        let Some(cape) = &self.cape else {
            return Ok(None);
        };
        let (width, height) = cape.dimensions();
        let invalid = |reason| RenderError::InvalidAtlasDimensions {
            kind: AtlasKind::Cape,
            width,
            height,
            reason,
        };

        if width == 0 || width % BASE_WIDTH != 0 {
            return Err(invalid("width must be a positive multiple of 64"));
        }
        let ratio = width / BASE_WIDTH;
        if height % 32 != 0 || height < 32 * ratio {
            return Err(invalid("height must be a multiple of 32 covering the cape layout"));
        }
        Ok(Some(ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_hd_ratio() {
        let skin = SkinAsset::new(RgbaImage::new(128, 128), None, false);
        assert_eq!(skin.hd_ratio().unwrap(), 2);

        let legacy = SkinAsset::new(RgbaImage::new(64, 32), None, false);
        assert_eq!(legacy.hd_ratio().unwrap(), 1);
    }

    #[test]
    fn test_rejects_bad_skin_dimensions() {
        for (w, h) in [(0, 0), (65, 64), (64, 48), (128, 64 + 1), (64, 128)] {
            let skin = SkinAsset::new(RgbaImage::new(w, h), None, false);
            assert!(
                matches!(
                    skin.hd_ratio(),
                    Err(RenderError::InvalidAtlasDimensions {
                        kind: AtlasKind::Skin,
                        ..
                    })
                ),
                "{w}x{h} should be rejected"
            );
        }
    }

    #[test]
    fn test_cape_ratio() {
        let skin = SkinAsset::new(RgbaImage::new(64, 64), Some(RgbaImage::new(128, 64)), false);
        assert_eq!(skin.cape_ratio().unwrap(), Some(2));

        let no_cape = SkinAsset::new(RgbaImage::new(64, 64), None, false);
        assert_eq!(no_cape.cape_ratio().unwrap(), None);

        let labymod = SkinAsset::new(RgbaImage::new(64, 64), Some(RgbaImage::new(22, 17)), false);
        assert!(labymod.cape_ratio().is_err());

        let short = SkinAsset::new(RgbaImage::new(64, 64), Some(RgbaImage::new(128, 32)), false);
        assert!(short.cape_ratio().is_err());
    }

    #[test]
    fn test_detect_slim() {
        let mut atlas = RgbaImage::from_pixel(64, 64, Rgba([200, 150, 100, 255]));
        assert!(!SkinAsset::detect_slim(&atlas));

        atlas.put_pixel(46, 52, Rgba([0, 0, 0, 0]));
        assert!(SkinAsset::detect_slim(&atlas));
        assert!(SkinAsset::with_detected_model(atlas, None).is_slim());
    }

    #[test]
    fn test_slim_marker_texel_is_left_arm_back() {
        use crate::atlas::face_rule;
        use crate::model::{BodyPart, Face};

        let covers = |slim: bool| {
            let rule = face_rule(BodyPart::LeftArm, Face::Back, slim);
            (rule.u..rule.u + rule.width).contains(&46)
                && (rule.v..rule.v + rule.height).contains(&52)
        };
        assert!(covers(false));
        assert!(!covers(true));
        for part in [BodyPart::RightArm, BodyPart::RightArmLayer] {
            for face in Face::ALL {
                let rule = face_rule(part, face, false);
                assert!(!(rule.v..rule.v + rule.height).contains(&52), "{part}");
            }
        }
    }
}
