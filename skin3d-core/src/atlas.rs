//! Atlas sampler: where each cube face lives on the skin or cape texture.
//!
//! The table is pure data. Every body part maps to six face rules, one per
//! `Face`, produced by the standard box unwrap of a `w x h x d` cuboid:
//!
//! ```text
//!            u+d      u+d+w
//!       +-----+--------+--------+
//!  v    |     |  top   | bottom |
//!       +-----+--------+--------+--------+--------+
//!  v+d  |right| front  |  left  |      back       |
//!       +-----+--------+--------+--------+--------+
//! ```
use image::{Rgba, RgbaImage};

use crate::model::{BodyPart, Face};

/// A rectangular atlas region for one cube face, in texture units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRule {
    pub u: u32,
    pub v: u32,
    pub width: u32,
    pub height: u32,
    /// Columns run right-to-left (faces seen from behind or from the left).
    pub mirror: bool,
}

impl FaceRule {
    const fn new(u: u32, v: u32, width: u32, height: u32, mirror: bool) -> Self {
        Self {
            u,
            v,
            width,
            height,
            mirror,
        }
    }

    /// Atlas pixel for the face-grid cell `(i, j)`.
    ///
    /// The face grid has `width * mesh_ratio` columns; `atlas_ratio` may
    /// differ (a cape at a different resolution than the skin), in which case
    /// cells are mapped to the nearest lower texel.
    pub fn texel(&self, i: u32, j: u32, atlas_ratio: u32, mesh_ratio: u32) -> (u32, u32) {
        let column = i * atlas_ratio / mesh_ratio;
        let row = j * atlas_ratio / mesh_ratio;
        let column = if self.mirror {
            self.width * atlas_ratio - 1 - column
        } else {
            column
        };
        (self.u * atlas_ratio + column, self.v * atlas_ratio + row)
    }
}

/// Box unwrap of a cuboid at atlas origin `(u, v)`, indexed by `Face::index`.
const fn unwrap(u: u32, v: u32, w: u32, h: u32, d: u32) -> [FaceRule; 6] {
    [
        FaceRule::new(u + 2 * d + w, v + d, w, h, true),
        FaceRule::new(u, v + d, d, h, false),
        FaceRule::new(u + d, v, w, d, false),
        FaceRule::new(u + d, v + d, w, h, false),
        FaceRule::new(u + d + w, v + d, d, h, true),
        FaceRule::new(u + d + w, v, w, d, false),
    ]
}

/// The cape's outer side faces away from the player, so its front region
/// lands on the model's back face.
const CAPE: [FaceRule; 6] = [
    FaceRule::new(1, 1, 10, 16, true),
    FaceRule::new(0, 1, 1, 16, false),
    FaceRule::new(1, 0, 10, 1, false),
    FaceRule::new(12, 1, 10, 16, false),
    FaceRule::new(11, 1, 1, 16, false),
    FaceRule::new(11, 0, 10, 1, false),
];

/// Classic (4px arm) layout, indexed by `BodyPart::index`.
static CLASSIC: [[FaceRule; 6]; BodyPart::COUNT] = [
    unwrap(0, 0, 8, 8, 8),
    unwrap(32, 0, 8, 8, 8),
    unwrap(16, 16, 8, 12, 4),
    unwrap(16, 32, 8, 12, 4),
    unwrap(40, 16, 4, 12, 4),
    unwrap(40, 32, 4, 12, 4),
    unwrap(32, 48, 4, 12, 4),
    unwrap(48, 48, 4, 12, 4),
    unwrap(0, 16, 4, 12, 4),
    unwrap(0, 32, 4, 12, 4),
    unwrap(16, 48, 4, 12, 4),
    unwrap(0, 48, 4, 12, 4),
    CAPE,
];

/// Slim (3px arm) rows for r_arm, r_arm_layer, l_arm, l_arm_layer.
static SLIM_ARMS: [[FaceRule; 6]; 4] = [
    unwrap(40, 16, 3, 12, 4),
    unwrap(40, 32, 3, 12, 4),
    unwrap(32, 48, 3, 12, 4),
    unwrap(48, 48, 3, 12, 4),
];

/// The six face rules of a body part.
pub fn face_rules(part: BodyPart, slim: bool) -> &'static [FaceRule; 6] {
    if slim && part.is_arm() {
        &SLIM_ARMS[part.index() - BodyPart::RightArm.index()]
    } else {
        &CLASSIC[part.index()]
    }
}

pub fn face_rule(part: BodyPart, face: Face, slim: bool) -> &'static FaceRule {
    &face_rules(part, slim)[face.index()]
}

/// Sample one texel. Pixels outside the atlas read as fully transparent.
pub fn sample(
    atlas: &RgbaImage,
    rule: &FaceRule,
    i: u32,
    j: u32,
    atlas_ratio: u32,
    mesh_ratio: u32,
) -> Rgba<u8> {
    let (x, y) = rule.texel(i, j, atlas_ratio, mesh_ratio);
    atlas.get_pixel_checked(x, y).copied().unwrap_or(Rgba([0, 0, 0, 0]))
}
