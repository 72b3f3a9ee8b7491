//! The fixed humanoid topology: body parts, cube faces and cuboid extents.
//!
//! All extents are in texture units of a 64px wide atlas. The mesh builder
//! multiplies them by the atlas' `hd_ratio`. Model space has y growing
//! downward and z growing toward the viewer; a cuboid's "right" face is its
//! min-x face.
use std::fmt;

/// One side of a cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Back,
    Right,
    Top,
    Front,
    Left,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Back,
        Face::Right,
        Face::Top,
        Face::Front,
        Face::Left,
        Face::Bottom,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Face::Back => "back",
            Face::Right => "right",
            Face::Top => "top",
            Face::Front => "front",
            Face::Left => "left",
            Face::Bottom => "bottom",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A small set of faces, iterated in `Face::ALL` order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceSet(u8);

impl FaceSet {
    pub const EMPTY: FaceSet = FaceSet(0);
    pub const ALL: FaceSet = FaceSet(0b11_1111);

    pub fn from_faces(faces: &[Face]) -> Self {
        faces.iter().fold(Self::EMPTY, |set, &face| set.with(face))
    }

    pub const fn with(self, face: Face) -> Self {
        FaceSet(self.0 | face.bit())
    }

    pub const fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    pub const fn complement(self) -> Self {
        FaceSet(!self.0 & Self::ALL.0)
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |face| self.contains(*face))
    }
}

impl fmt::Debug for FaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Face::name)).finish()
    }
}

/// Every piece of the humanoid model, base and overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyPart {
    Head,
    Helmet,
    Torso,
    TorsoLayer,
    RightArm,
    RightArmLayer,
    LeftArm,
    LeftArmLayer,
    RightLeg,
    RightLegLayer,
    LeftLeg,
    LeftLegLayer,
    Cape,
}

impl BodyPart {
    pub const COUNT: usize = 13;

    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Head,
        BodyPart::Helmet,
        BodyPart::Torso,
        BodyPart::TorsoLayer,
        BodyPart::RightArm,
        BodyPart::RightArmLayer,
        BodyPart::LeftArm,
        BodyPart::LeftArmLayer,
        BodyPart::RightLeg,
        BodyPart::RightLegLayer,
        BodyPart::LeftLeg,
        BodyPart::LeftLegLayer,
        BodyPart::Cape,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            BodyPart::Head => "head",
            BodyPart::Helmet => "helmet",
            BodyPart::Torso => "torso",
            BodyPart::TorsoLayer => "torso_layer",
            BodyPart::RightArm => "r_arm",
            BodyPart::RightArmLayer => "r_arm_layer",
            BodyPart::LeftArm => "l_arm",
            BodyPart::LeftArmLayer => "l_arm_layer",
            BodyPart::RightLeg => "r_leg",
            BodyPart::RightLegLayer => "r_leg_layer",
            BodyPart::LeftLeg => "l_leg",
            BodyPart::LeftLegLayer => "l_leg_layer",
            BodyPart::Cape => "cape",
        }
    }

    /// The base cuboid an overlay wraps. Base parts return themselves.
    pub const fn base(self) -> BodyPart {
        match self {
            BodyPart::Helmet => BodyPart::Head,
            BodyPart::TorsoLayer => BodyPart::Torso,
            BodyPart::RightArmLayer => BodyPart::RightArm,
            BodyPart::LeftArmLayer => BodyPart::LeftArm,
            BodyPart::RightLegLayer => BodyPart::RightLeg,
            BodyPart::LeftLegLayer => BodyPart::LeftLeg,
            other => other,
        }
    }

    /// The overlay drawn over a base part, if the part has one.
    pub const fn overlay(self) -> Option<BodyPart> {
        match self {
            BodyPart::Head => Some(BodyPart::Helmet),
            BodyPart::Torso => Some(BodyPart::TorsoLayer),
            BodyPart::RightArm => Some(BodyPart::RightArmLayer),
            BodyPart::LeftArm => Some(BodyPart::LeftArmLayer),
            BodyPart::RightLeg => Some(BodyPart::RightLegLayer),
            BodyPart::LeftLeg => Some(BodyPart::LeftLegLayer),
            _ => None,
        }
    }

    pub const fn is_overlay(self) -> bool {
        matches!(
            self,
            BodyPart::Helmet
                | BodyPart::TorsoLayer
                | BodyPart::RightArmLayer
                | BodyPart::LeftArmLayer
                | BodyPart::RightLegLayer
                | BodyPart::LeftLegLayer
        )
    }

    pub const fn is_arm(self) -> bool {
        matches!(self.base(), BodyPart::RightArm | BodyPart::LeftArm)
    }

    /// Outward inflation of an overlay cuboid, in texture units.
    pub const fn inflate(self) -> f64 {
        match self {
            BodyPart::Helmet => 0.25,
            BodyPart::TorsoLayer
            | BodyPart::RightArmLayer
            | BodyPart::LeftArmLayer
            | BodyPart::RightLegLayer
            | BodyPart::LeftLegLayer => 0.125,
            _ => 0.0,
        }
    }

    /// Rotation origin of the part, in texture units.
    pub const fn pivot(self) -> [f64; 3] {
        match self.base() {
            BodyPart::Head => [4.0, 8.0, 2.0],
            BodyPart::RightArm => [-2.0, 10.0, 2.0],
            BodyPart::LeftArm => [10.0, 10.0, 2.0],
            BodyPart::RightLeg => [2.0, 22.0, 2.0],
            BodyPart::LeftLeg => [6.0, 22.0, 2.0],
            BodyPart::Cape => [4.0, 8.0, 0.0],
            _ => [4.0, 14.0, 2.0],
        }
    }

    /// The cuboid this part occupies.
    pub fn cuboid(self, slim: bool) -> Cuboid {
        let arm = if slim { 3 } else { 4 };
        let (origin, size) = match self.base() {
            BodyPart::Head => ([0.0, 0.0, -2.0], [8, 8, 8]),
            BodyPart::Torso => ([0.0, 8.0, 0.0], [8, 12, 4]),
            BodyPart::RightArm => ([-(arm as f64), 8.0, 0.0], [arm, 12, 4]),
            BodyPart::LeftArm => ([8.0, 8.0, 0.0], [arm, 12, 4]),
            BodyPart::RightLeg => ([0.0, 20.0, 0.0], [4, 12, 4]),
            BodyPart::LeftLeg => ([4.0, 20.0, 0.0], [4, 12, 4]),
            _ => ([-1.0, 8.0, -1.0], [10, 16, 1]),
        };
        Cuboid {
            origin,
            size,
            inflate: self.inflate(),
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An axis-aligned box in texture units, optionally inflated on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub origin: [f64; 3],
    /// Width, height and depth in whole texture units.
    pub size: [u32; 3],
    pub inflate: f64,
}

impl Cuboid {
    /// Number of lattice cells along each axis at the given resolution.
    pub fn cells(&self, hd_ratio: u32) -> [u32; 3] {
        self.size.map(|units| units * hd_ratio)
    }

    /// Model-space coordinate of a lattice index along `axis`.
    ///
    /// Overlays keep the base cell count but stretch each cell so the box
    /// grows by `inflate` on both sides.
    pub fn coordinate(&self, axis: usize, index: u32, hd_ratio: u32) -> f64 {
        let ratio = f64::from(hd_ratio);
        let units = f64::from(self.size[axis]);
        let step = (units + 2.0 * self.inflate) / units;
        (self.origin[axis] - self.inflate) * ratio + f64::from(index) * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_set_complement() {
        let back = FaceSet::from_faces(&[Face::Back, Face::Right, Face::Top]);
        let front = back.complement();
        assert_eq!(front, FaceSet::from_faces(&[Face::Front, Face::Left, Face::Bottom]));
        assert_eq!(front.len(), 3);
        assert_eq!(back.complement().complement(), back);
        assert_eq!(FaceSet::ALL.complement(), FaceSet::EMPTY);
    }

    #[test]
    fn test_face_set_iterates_in_fixed_order() {
        let set = FaceSet::from_faces(&[Face::Bottom, Face::Back, Face::Front]);
        let faces: Vec<Face> = set.iter().collect();
        assert_eq!(faces, vec![Face::Back, Face::Front, Face::Bottom]);
    }

    #[test]
    fn test_overlay_links() {
        for part in BodyPart::ALL {
            if let Some(overlay) = part.overlay() {
                assert!(overlay.is_overlay());
                assert_eq!(overlay.base(), part);
            }
        }
        assert!(!BodyPart::Cape.is_overlay());
        assert!(BodyPart::Helmet.is_overlay());
        assert!(!BodyPart::Torso.is_overlay());
    }

    #[test]
    fn test_inflated_coordinates() {
        let helmet = BodyPart::Helmet.cuboid(false);
        assert_eq!(helmet.coordinate(0, 0, 1), -0.25);
        assert_eq!(helmet.coordinate(0, 8, 1), 8.25);
        assert_eq!(helmet.coordinate(2, 0, 2), -4.5);

        let torso = BodyPart::Torso.cuboid(false);
        assert_eq!(torso.coordinate(1, 0, 2), 16.0);
        assert_eq!(torso.coordinate(1, 24, 2), 40.0);
    }

    #[test]
    fn test_slim_arms_are_one_unit_narrower() {
        let classic = BodyPart::RightArm.cuboid(false);
        let slim = BodyPart::RightArm.cuboid(true);
        assert_eq!(classic.size[0] - slim.size[0], 1);
        assert_eq!(slim.origin[0], -3.0);
        assert_eq!(BodyPart::LeftArm.cuboid(true).origin[0], 8.0);
        assert_eq!(BodyPart::LeftArmLayer.cuboid(true).size[0], 3);
    }
}
