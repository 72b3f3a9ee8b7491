//! Back-face classification per body part.
//!
//! A unit cube is rotated by the part's local matrix and the view matrix.
//! The corner that ends up deepest names the three faces turned away from
//! the camera; the other three face it.
use nalgebra::{Matrix3, Vector3};

use crate::config::RenderConfig;
use crate::model::{BodyPart, Face, FaceSet};
use crate::transform::Transform;

/// Unit cube corners and the faces that meet at each, in visiting order.
const CORNERS: [([f64; 3], [Face; 3]); 8] = [
    ([0.0, 0.0, 0.0], [Face::Back, Face::Right, Face::Top]),
    ([0.0, 0.0, 1.0], [Face::Front, Face::Right, Face::Top]),
    ([0.0, 1.0, 0.0], [Face::Back, Face::Right, Face::Bottom]),
    ([0.0, 1.0, 1.0], [Face::Front, Face::Right, Face::Bottom]),
    ([1.0, 0.0, 0.0], [Face::Back, Face::Left, Face::Top]),
    ([1.0, 0.0, 1.0], [Face::Front, Face::Left, Face::Top]),
    ([1.0, 1.0, 0.0], [Face::Back, Face::Left, Face::Bottom]),
    ([1.0, 1.0, 1.0], [Face::Front, Face::Left, Face::Bottom]),
];

/// Faces of one part split by whether they face the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub front: FaceSet,
    pub back: FaceSet,
}

impl Visibility {
    /// Classify faces under `general * local`.
    ///
    /// Ties keep the earlier corner, so the result is fully determined by
    /// the matrices.
    pub fn resolve(local: &Matrix3<f64>, general: &Matrix3<f64>) -> Self {
        let combined = general * local;
        let mut deepest = (f64::INFINITY, CORNERS[0].1);
        for (corner, faces) in CORNERS {
            let depth = (combined * Vector3::from(corner)).z;
            if depth < deepest.0 {
                deepest = (depth, faces);
            }
        }
        let back = FaceSet::from_faces(&deepest.1);
        Self {
            front: back.complement(),
            back,
        }
    }
}

/// Visibility of every body part for one view.
#[derive(Debug, Clone)]
pub struct VisibilityMap {
    parts: [Visibility; BodyPart::COUNT],
}

impl VisibilityMap {
    pub fn new(config: &RenderConfig) -> Self {
        let general = Transform::general(config);
        let parts = BodyPart::ALL
            .map(|part| Visibility::resolve(&Transform::local(part, config), &general));
        Self { parts }
    }

    pub fn get(&self, part: BodyPart) -> Visibility {
        self.parts[part.index()]
    }

    pub fn front(&self, part: BodyPart) -> FaceSet {
        self.get(part).front
    }

    /// The torso's classification, which drives the draw order.
    pub fn model(&self) -> Visibility {
        self.get(BodyPart::Torso)
    }
}
