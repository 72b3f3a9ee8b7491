/// Parallel projection of the model and its screen-space bounds
use nalgebra::{Matrix3, Point3};

use crate::geometry::{Model, Vertex};
use crate::transform::PartTransform;

/// Running min/max of projected x and y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, point: &Point3<f64>) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Applies part transforms and the view matrix, tracking bounds.
pub struct Projector {
    general: Matrix3<f64>,
    bounds: Bounds,
    projections: usize,
}

impl Projector {
    pub fn new(general: Matrix3<f64>) -> Self {
        Self {
            general,
            bounds: Bounds::EMPTY,
            projections: 0,
        }
    }

    /// Project one vertex: local rotation about the pivot, then the view.
    pub fn project(&mut self, vertex: &mut Vertex, transform: &PartTransform) -> Point3<f64> {
        let general = self.general;
        let (point, fresh) =
            vertex.project_with(|position| general * transform.apply(position));
        if fresh {
            self.projections += 1;
            self.bounds.include(&point);
        }
        point
    }

    /// Project every vertex of every built part.
    pub fn project_model(&mut self, model: &mut Model) {
        let (parts, vertices) = model.parts_and_vertices_mut();
        for mesh in parts.iter().flatten() {
            for vertex in &mut vertices[mesh.vertices.clone()] {
                self.project(vertex, &mesh.transform);
            }
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of vertices actually transformed so far.
    pub fn projections(&self) -> usize {
        self.projections
    }
}
