//! Painter's-algorithm draw order.
//!
//! No depth buffer is used. The order comes from a fixed table keyed by
//! whether the torso shows its top and its right side, and every base part
//! is drawn as a group: overlay back faces, base front faces, overlay front
//! faces.
use crate::model::BodyPart::{Cape, Head, LeftArm, LeftLeg, RightArm, RightLeg, Torso};
use crate::model::{BodyPart, Face, FaceSet};
use crate::visibility::VisibilityMap;

/// Draw the listed faces of one part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOp {
    pub part: BodyPart,
    pub faces: FaceSet,
}

/// Base part sequences, farthest first. The cape slot is used only when the
/// model's back faces the camera.
const ORDERS: [[BodyPart; 7]; 4] = [
    // top and right visible
    [LeftLeg, RightLeg, LeftArm, Torso, RightArm, Cape, Head],
    // top and left visible
    [RightLeg, LeftLeg, RightArm, Torso, LeftArm, Cape, Head],
    // bottom and right visible
    [Head, LeftArm, Torso, RightArm, LeftLeg, RightLeg, Cape],
    // bottom and left visible
    [Head, RightArm, Torso, LeftArm, RightLeg, LeftLeg, Cape],
];

fn table_row(front: FaceSet) -> usize {
    match (front.contains(Face::Top), front.contains(Face::Right)) {
        (true, true) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    }
}

/// Push the draw group for a base part.
fn push_group(plan: &mut Vec<DrawOp>, base: BodyPart, visibility: &VisibilityMap) {
    let front = visibility.front(base);
    match base.overlay() {
        Some(overlay) => {
            plan.push(DrawOp {
                part: overlay,
                faces: visibility.model().back,
            });
            plan.push(DrawOp { part: base, faces: front });
            plan.push(DrawOp {
                part: overlay,
                faces: front,
            });
        }
        None => plan.push(DrawOp { part: base, faces: front }),
    }
}

/// The full ordered list of draw operations for a view.
///
/// Parts that end up unbuilt are listed anyway; the renderer skips them.
pub fn plan(visibility: &VisibilityMap) -> Vec<DrawOp> {
    let front = visibility.model().front;
    let mut plan = Vec::with_capacity(20);

    if front.contains(Face::Front) {
        push_group(&mut plan, Cape, visibility);
    }
    for base in ORDERS[table_row(front)] {
        if base == Cape && !front.contains(Face::Back) {
            continue;
        }
        push_group(&mut plan, base, visibility);
    }
    plan
}
