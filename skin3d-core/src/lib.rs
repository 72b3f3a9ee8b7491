/// Skin3D Core Library - Minecraft skin projection and rendering engine
///
/// Builds the cuboid humanoid from a skin atlas, rotates it under a parallel
/// projection and paints it back-to-front into an RGBA image. The crate does
/// no I/O; atlases come in and the rendered image goes out as `RgbaImage`.

pub mod atlas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod order;
pub mod projection;
pub mod raster;
pub mod render;
pub mod skin;
pub mod transform;
pub mod visibility;

// Re-export commonly used types
pub use config::RenderConfig;
pub use error::{AtlasKind, RenderError, Result};
pub use geometry::{Model, Quad, Vertex};
pub use model::{BodyPart, Face, FaceSet};
pub use projection::Bounds;
pub use render::{render, RenderResult, RenderState, RenderStats};
pub use skin::SkinAsset;
pub use transform::Transform;
pub use visibility::{Visibility, VisibilityMap};
