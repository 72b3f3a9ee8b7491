//! Rotation matrices and per-part transforms.
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

use crate::config::RenderConfig;
use crate::model::BodyPart;

/// Degrees to radians, reduced into one turn first so that angles a whole
/// turn apart produce identical matrices.
pub fn radians(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0).to_radians()
}

pub fn rotate_x(degrees: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), radians(degrees)).into_inner()
}

pub fn rotate_y(degrees: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), radians(degrees)).into_inner()
}

pub fn rotate_z(degrees: f64) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), radians(degrees)).into_inner()
}

/// Pivot plus local rotation of one body part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartTransform {
    pub pivot: Point3<f64>,
    pub rotation: Matrix3<f64>,
}

impl PartTransform {
    pub fn identity() -> Self {
        Self {
            pivot: Point3::origin(),
            rotation: Matrix3::identity(),
        }
    }

    /// Rotate a model-space point about the pivot.
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.pivot + self.rotation * (point - self.pivot)
    }
}

/// Transform builder for the view and the articulated parts.
pub struct Transform;

impl Transform {
    /// Combined view rotation: horizontal turn first, then vertical tilt.
    pub fn rotation_matrix(vertical: f64, horizontal: f64) -> Matrix3<f64> {
        rotate_x(vertical) * rotate_y(horizontal)
    }

    /// The global view matrix for a config.
    pub fn general(config: &RenderConfig) -> Matrix3<f64> {
        Self::rotation_matrix(config.vr, config.hr)
    }

    /// Local rotation of a part. Overlays share their base part's matrix.
    pub fn local(part: BodyPart, config: &RenderConfig) -> Matrix3<f64> {
        match part.base() {
            BodyPart::Head => rotate_y(config.hrh),
            BodyPart::RightArm => rotate_x(config.vrra) * rotate_z(config.hrra),
            BodyPart::LeftArm => rotate_x(config.vrla) * rotate_z(config.hrla),
            BodyPart::RightLeg => rotate_x(config.vrrl),
            BodyPart::LeftLeg => rotate_x(config.vrll),
            BodyPart::Cape => rotate_x(-config.vrc),
            _ => Matrix3::identity(),
        }
    }

    /// Local rotation with the part's pivot scaled to the mesh resolution.
    pub fn part(part: BodyPart, config: &RenderConfig, hd_ratio: u32) -> PartTransform {
        let ratio = f64::from(hd_ratio);
        let [x, y, z] = part.pivot();
        PartTransform {
            pivot: Point3::new(x * ratio, y * ratio, z * ratio),
            rotation: Self::local(part, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Matrix3<f64>, b: &Matrix3<f64>) {
        assert!((a - b).norm() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(0.0, 0.0);
        assert_close(&matrix, &Matrix3::identity());
    }

    #[test]
    fn test_full_turn_is_exact() {
        assert_eq!(rotate_y(360.0), rotate_y(0.0));
        assert_eq!(rotate_y(395.0), rotate_y(35.0));
        assert_eq!(
            Transform::rotation_matrix(-25.0, 395.0),
            Transform::rotation_matrix(-25.0, 35.0)
        );
    }

    #[test]
    fn test_view_rotation_matches_closed_form() {
        // x' = x cos b + z sin b
        // y' = x sin a sin b + y cos a - z sin a cos b
        // z' = -x cos a sin b + y sin a + z cos a cos b
        let (a, b) = (radians(-25.0), radians(35.0));
        let (ca, sa, cb, sb) = (a.cos(), a.sin(), b.cos(), b.sin());
        #[rustfmt::skip]
        let expected = Matrix3::new(
            cb, 0.0, sb,
            sa * sb, ca, -sa * cb,
            -ca * sb, sa, ca * cb,
        );
        assert_close(&Transform::rotation_matrix(-25.0, 35.0), &expected);
    }

    #[test]
    fn test_compose_multiplies_not_sums() {
        let composed = rotate_x(30.0) * rotate_y(30.0);
        let summed = Rotation3::from_axis_angle(&Vector3::x_axis(), radians(30.0))
            .into_inner()
            + Rotation3::from_axis_angle(&Vector3::y_axis(), radians(30.0)).into_inner();
        assert!((composed - summed).norm() > 0.5);
        assert!((composed.determinant() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlays_share_local_rotation() {
        let config = RenderConfig {
            hrh: 20.0,
            vrra: 45.0,
            hrra: 10.0,
            vrll: -30.0,
            ..RenderConfig::default()
        };
        for part in BodyPart::ALL {
            assert_eq!(
                Transform::local(part, &config),
                Transform::local(part.base(), &config)
            );
        }
        assert_eq!(Transform::local(BodyPart::Torso, &config), Matrix3::identity());
    }

    #[test]
    fn test_pivot_is_fixed_point() {
        let config = RenderConfig {
            vrla: 70.0,
            ..RenderConfig::default()
        };
        let transform = Transform::part(BodyPart::LeftArm, &config, 2);
        assert_eq!(transform.pivot, Point3::new(20.0, 20.0, 4.0));
        let moved = transform.apply(&transform.pivot);
        assert!((moved - transform.pivot).norm() < 1e-12);
    }

    #[test]
    fn test_cape_swings_backward() {
        let config = RenderConfig {
            vrc: 30.0,
            ..RenderConfig::default()
        };
        let transform = Transform::part(BodyPart::Cape, &config, 1);
        let hem = transform.apply(&Point3::new(4.0, 24.0, 0.0));
        assert!(hem.z < 0.0);
    }
}
