/// Mesh building: cuboid surface lattices and textured quads.
use std::ops::Range;

use image::{Rgba, RgbaImage};
use nalgebra::Point3;

use crate::atlas::{self, FaceRule};
use crate::model::{BodyPart, Cuboid, Face};
use crate::transform::PartTransform;

/// Sentinel for lattice slots that hold no vertex (the cuboid interior).
const NO_VERTEX: u32 = u32::MAX;

/// A model-space point, projected at most once per render.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f64>,
    projected: Option<Point3<f64>>,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            projected: None,
        }
    }

    pub fn projected(&self) -> Option<Point3<f64>> {
        self.projected
    }

    /// Return the cached projection, computing it with `project` on first use.
    /// The flag is true when this call did the work.
    pub fn project_with<F>(&mut self, project: F) -> (Point3<f64>, bool)
    where
        F: FnOnce(&Point3<f64>) -> Point3<f64>,
    {
        match self.projected {
            Some(point) => (point, false),
            None => {
                let point = project(&self.position);
                self.projected = Some(point);
                (point, true)
            }
        }
    }
}

/// One textured lattice cell on a cuboid face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Indices into the model's vertex arena, in winding order.
    pub corners: [u32; 4],
    pub color: Rgba<u8>,
}

/// The built geometry of one body part.
#[derive(Debug, Clone)]
pub struct PartMesh {
    pub part: BodyPart,
    pub cuboid: Cuboid,
    pub transform: PartTransform,
    /// The part's slice of the vertex arena.
    pub vertices: Range<usize>,
    faces: [Vec<Quad>; 6],
}

impl PartMesh {
    pub fn quads(&self, face: Face) -> &[Quad] {
        &self.faces[face.index()]
    }

    pub fn quad_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }
}

/// Where a part's texels come from.
#[derive(Debug, Clone, Copy)]
pub struct Texture<'a> {
    pub atlas: &'a RgbaImage,
    pub atlas_ratio: u32,
    pub rules: &'a [FaceRule; 6],
}

/// A shared vertex arena plus the parts built on top of it.
#[derive(Debug, Clone)]
pub struct Model {
    hd_ratio: u32,
    vertices: Vec<Vertex>,
    parts: [Option<PartMesh>; BodyPart::COUNT],
}

impl Model {
    pub fn new(hd_ratio: u32) -> Self {
        Self {
            hd_ratio,
            vertices: Vec::new(),
            parts: std::array::from_fn(|_| None),
        }
    }

    pub fn hd_ratio(&self) -> u32 {
        self.hd_ratio
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: u32) -> &Vertex {
        &self.vertices[index as usize]
    }

    pub fn part(&self, part: BodyPart) -> Option<&PartMesh> {
        self.parts[part.index()].as_ref()
    }

    pub fn parts(&self) -> impl Iterator<Item = &PartMesh> {
        self.parts.iter().flatten()
    }

    pub fn quad_count(&self) -> usize {
        self.parts().map(PartMesh::quad_count).sum()
    }

    /// Split borrow used by the projector: each part's transform alongside
    /// the mutable vertex arena.
    pub fn parts_and_vertices_mut(&mut self) -> (&[Option<PartMesh>], &mut [Vertex]) {
        (&self.parts, &mut self.vertices)
    }

    /// Build the surface lattice of `part` and one quad per opaque texel.
    ///
    /// Every surface vertex enters the arena even when no quad uses it, so
    /// the projected bounds depend only on topology.
    pub fn build_part(
        &mut self,
        part: BodyPart,
        cuboid: Cuboid,
        transform: PartTransform,
        texture: Texture<'_>,
    ) -> &PartMesh {
        let ratio = self.hd_ratio;
        let [nx, ny, nz] = cuboid.cells(ratio);
        let start = self.vertices.len();

        let lattice = Lattice::new([nx, ny, nz]);
        let mut slots = vec![NO_VERTEX; lattice.len()];
        for a in 0..=nx {
            for b in 0..=ny {
                for c in 0..=nz {
                    if !lattice.on_surface(a, b, c) {
                        continue;
                    }
                    slots[lattice.slot(a, b, c)] = self.vertices.len() as u32;
                    self.vertices.push(Vertex::new(
                        cuboid.coordinate(0, a, ratio),
                        cuboid.coordinate(1, b, ratio),
                        cuboid.coordinate(2, c, ratio),
                    ));
                }
            }
        }

        let at = |a: u32, b: u32, c: u32| slots[lattice.slot(a, b, c)];
        let mut faces: [Vec<Quad>; 6] = Default::default();
        for face in Face::ALL {
            let rule = &texture.rules[face.index()];
            let (columns, rows) = match face {
                Face::Back | Face::Front => (nx, ny),
                Face::Right | Face::Left => (nz, ny),
                Face::Top | Face::Bottom => (nx, nz),
            };
            let quads = &mut faces[face.index()];
            for row in 0..rows {
                for column in 0..columns {
                    let color = atlas::sample(
                        texture.atlas,
                        rule,
                        column,
                        row,
                        texture.atlas_ratio,
                        ratio,
                    );
                    if color[3] == 0 {
                        continue;
                    }
                    let (i, j) = (column, row);
                    let corners = match face {
                        Face::Back | Face::Front => {
                            let c = if face == Face::Back { 0 } else { nz };
                            [at(i, j, c), at(i + 1, j, c), at(i + 1, j + 1, c), at(i, j + 1, c)]
                        }
                        Face::Right | Face::Left => {
                            let a = if face == Face::Right { 0 } else { nx };
                            [at(a, j, i), at(a, j, i + 1), at(a, j + 1, i + 1), at(a, j + 1, i)]
                        }
                        Face::Top | Face::Bottom => {
                            let b = if face == Face::Top { 0 } else { ny };
                            [at(i, b, j), at(i + 1, b, j), at(i + 1, b, j + 1), at(i, b, j + 1)]
                        }
                    };
                    quads.push(Quad { corners, color });
                }
            }
        }

        let mesh = PartMesh {
            part,
            cuboid,
            transform,
            vertices: start..self.vertices.len(),
            faces,
        };
        self.parts[part.index()].insert(mesh)
    }
}

/// Dense index over the `(nx+1) x (ny+1) x (nz+1)` lattice of a cuboid.
struct Lattice {
    dims: [u32; 3],
}

impl Lattice {
    fn new(cells: [u32; 3]) -> Self {
        Self {
            dims: cells.map(|n| n + 1),
        }
    }

    fn len(&self) -> usize {
        self.dims.iter().map(|&n| n as usize).product()
    }

    fn slot(&self, a: u32, b: u32, c: u32) -> usize {
        let [_, dy, dz] = self.dims.map(|n| n as usize);
        (a as usize * dy + b as usize) * dz + c as usize
    }

    fn on_surface(&self, a: u32, b: u32, c: u32) -> bool {
        let [dx, dy, dz] = self.dims;
        a == 0 || b == 0 || c == 0 || a == dx - 1 || b == dy - 1 || c == dz - 1
    }
}
