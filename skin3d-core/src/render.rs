//! The render pipeline: validate, classify faces, build, project, order, draw.
use image::RgbaImage;
use tracing::{debug, debug_span, trace, warn};

use crate::atlas;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::{Model, Texture};
use crate::model::BodyPart;
use crate::order::{self, DrawOp};
use crate::projection::{Bounds, Projector};
use crate::raster::{self, Canvas};
use crate::skin::SkinAsset;
use crate::transform::Transform;
use crate::visibility::VisibilityMap;

/// Counters gathered during one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub hd_ratio: u32,
    pub vertices: usize,
    pub projected_vertices: usize,
    pub quads: usize,
    pub drawn_quads: usize,
    pub degenerate_quads: usize,
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub image: RgbaImage,
    /// Projected bounds of the model, in mesh units.
    pub bounds: Bounds,
    pub stats: RenderStats,
}

/// Per-render working state: everything between the inputs and the canvas.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub visibility: VisibilityMap,
    pub model: Model,
    pub plan: Vec<DrawOp>,
    pub bounds: Bounds,
    pub projected_vertices: usize,
}

impl RenderState {
    /// Validate the inputs and run every stage up to rasterization.
    pub fn prepare(skin: &SkinAsset, config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        let hd_ratio = skin.hd_ratio()?;
        let cape_ratio = skin.cape_ratio()?;
        debug!(hd_ratio, slim = skin.is_slim(), "validated atlases");

        let visibility = VisibilityMap::new(config);
        debug!(
            front = ?visibility.model().front,
            back = ?visibility.model().back,
            "classified torso faces"
        );

        let mut model = Model::new(hd_ratio);
        for part in active_parts(config, cape_ratio.is_some()) {
            let (atlas, atlas_ratio) = match (part, skin.cape(), cape_ratio) {
                (BodyPart::Cape, Some(cape), Some(ratio)) => (cape, ratio),
                _ => (skin.atlas(), hd_ratio),
            };
            let texture = Texture {
                atlas,
                atlas_ratio,
                rules: atlas::face_rules(part, skin.is_slim()),
            };
            let mesh = model.build_part(
                part,
                part.cuboid(skin.is_slim()),
                Transform::part(part, config, hd_ratio),
                texture,
            );
            trace!(part = %part, quads = mesh.quad_count(), "built part");
        }
        debug!(
            vertices = model.vertices().len(),
            quads = model.quad_count(),
            "built mesh"
        );

        let mut projector = Projector::new(Transform::general(config));
        projector.project_model(&mut model);
        let bounds = projector.bounds();
        debug!(?bounds, projected = projector.projections(), "projected mesh");

        let (width, height) = raster::raster_size(&bounds, config.effective_ratio())?;
        debug!(width, height, "sized raster");

        Ok(Self {
            plan: order::plan(&visibility),
            visibility,
            model,
            bounds,
            projected_vertices: projector.projections(),
        })
    }

    /// Draw the planned faces onto a fresh canvas.
    pub fn rasterize(&self, config: &RenderConfig) -> Result<RenderResult> {
        let mut canvas = Canvas::new(
            &self.bounds,
            config.effective_ratio(),
            config.background_fill(),
        )?;
        let mut stats = RenderStats {
            hd_ratio: self.model.hd_ratio(),
            vertices: self.model.vertices().len(),
            projected_vertices: self.projected_vertices,
            quads: self.model.quad_count(),
            ..RenderStats::default()
        };

        for op in &self.plan {
            let Some(mesh) = self.model.part(op.part) else {
                continue;
            };
            for face in op.faces.iter() {
                for quad in mesh.quads(face) {
                    let corners = quad.corners.map(|index| {
                        let vertex = self.model.vertex(index);
                        let point = vertex.projected().unwrap_or(vertex.position);
                        canvas.to_raster(&point)
                    });
                    if canvas.fill_quad(corners, quad.color) {
                        stats.drawn_quads += 1;
                    } else {
                        stats.degenerate_quads += 1;
                        trace!(part = %op.part, face = face.name(), "skipped edge-on quad");
                    }
                }
            }
        }

        let (width, height) = canvas.dimensions();
        let image = canvas.finish(config.antialias);
        debug!(
            width,
            height,
            output_width = image.width(),
            output_height = image.height(),
            drawn = stats.drawn_quads,
            degenerate = stats.degenerate_quads,
            "rasterized"
        );
        Ok(RenderResult {
            image,
            bounds: self.bounds,
            stats,
        })
    }
}

/// Parts to build for a config, in `BodyPart::ALL` order.
///
/// Asking for a cape without one falls back to no cape.
pub fn active_parts(config: &RenderConfig, has_cape: bool) -> Vec<BodyPart> {
    let mut cape = config.display_cape;
    if cape && !config.head_only && !has_cape {
        warn!("cape requested but no cape texture supplied, rendering without it");
        cape = false;
    }

    BodyPart::ALL
        .into_iter()
        .filter(|&part| match part {
            BodyPart::Head => true,
            BodyPart::Helmet => config.display_hair,
            _ if config.head_only => false,
            BodyPart::Cape => cape,
            _ if part.is_overlay() => config.display_second_layer,
            _ => true,
        })
        .collect()
}

/// Render a skin to an RGBA image.
///
/// Fails only on invalid atlas dimensions, a non-finite angle or a ratio too
/// large to allocate; everything else degrades to drawing less.
pub fn render(skin: &SkinAsset, config: &RenderConfig) -> Result<RenderResult> {
    let span = debug_span!("render", vr = config.vr, hr = config.hr, ratio = config.ratio);
    let _enter = span.enter();

    let state = RenderState::prepare(skin, config)?;
    state.rasterize(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(config: &RenderConfig, has_cape: bool) -> Vec<BodyPart> {
        active_parts(config, has_cape)
    }

    #[test]
    fn test_full_body_parts() {
        assert_eq!(parts(&RenderConfig::default(), true).len(), BodyPart::COUNT);
        let without_cape = parts(&RenderConfig::default(), false);
        assert_eq!(without_cape.len(), BodyPart::COUNT - 1);
        assert!(!without_cape.contains(&BodyPart::Cape));
    }

    #[test]
    fn test_head_only_parts() {
        assert_eq!(parts(&RenderConfig::head(), true), vec![BodyPart::Head, BodyPart::Helmet]);
        let bare = RenderConfig {
            display_hair: false,
            ..RenderConfig::head()
        };
        assert_eq!(parts(&bare, true), vec![BodyPart::Head]);
    }

    #[test]
    fn test_layers_toggle_independently() {
        let config = RenderConfig::default().with_layers(true, false, false);
        let built = parts(&config, true);
        assert!(built.contains(&BodyPart::Helmet));
        assert!(!built.contains(&BodyPart::TorsoLayer));
        assert!(!built.contains(&BodyPart::Cape));
        assert_eq!(built.len(), 7);
    }
}
