/// Polygon rasterizer and compositor for the output bitmap
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use nalgebra::Point3;

use crate::error::{RenderError, Result};
use crate::projection::Bounds;

/// Largest working raster accepted, in RGBA bytes.
pub const MAX_RASTER_BYTES: u64 = 1 << 30;

/// Twice the signed area below which a quad counts as edge-on.
const DEGENERATE_AREA: f64 = 1e-6;

/// Slack for points that sit on a quad edge up to float noise.
const EDGE_EPSILON: f64 = 1e-9;

/// Working raster size for the given bounds and pixels per unit.
///
/// Fails when the raster would not fit in `MAX_RASTER_BYTES`.
pub fn raster_size(bounds: &Bounds, ratio: f64) -> Result<(u32, u32)> {
    let side = |extent: f64| (ratio * extent + 1.0 + EDGE_EPSILON).floor().max(1.0);
    let (width, height) = (side(bounds.width()), side(bounds.height()));
    let too_large = || {
        RenderError::InvalidConfig(format!(
            "a {width}x{height} raster exceeds the {MAX_RASTER_BYTES} byte limit"
        ))
    };
    if !(width <= f64::from(u32::MAX) && height <= f64::from(u32::MAX)) {
        return Err(too_large());
    }
    let (width, height) = (width as u32, height as u32);
    u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(4))
        .filter(|&bytes| bytes <= MAX_RASTER_BYTES)
        .ok_or_else(too_large)?;
    Ok((width, height))
}

/// Twice the signed area of a polygon (shoelace formula).
pub fn twice_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum()
}

/// Source-over compositing of a straight-alpha texel onto the canvas.
pub fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = u32::from(src[3]);
    if sa == 255 {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }
    let da = u32::from(dst[3]);
    // Output alpha scaled by 255.
    let out = sa * 255 + da * (255 - sa);
    if out == 0 {
        return;
    }
    for c in 0..3 {
        let value = u32::from(src[c]) * sa * 255 + u32::from(dst[c]) * da * (255 - sa);
        dst[c] = ((value + out / 2) / out) as u8;
    }
    dst[3] = ((out + 127) / 255) as u8;
}

/// Inclusive pixel spans per row, so each pixel of a quad is composited once.
struct Spans {
    top: i64,
    rows: Vec<Option<(i64, i64)>>,
}

impl Spans {
    fn new(top: i64, bottom: i64) -> Self {
        let len = (bottom - top + 1).max(0) as usize;
        Self {
            top,
            rows: vec![None; len],
        }
    }

    fn add(&mut self, y: i64, left: i64, right: i64) {
        if y < self.top || left > right {
            return;
        }
        let Some(row) = self.rows.get_mut((y - self.top) as usize) else {
            return;
        };
        *row = Some(match *row {
            Some((l, r)) => (l.min(left), r.max(right)),
            None => (left, right),
        });
    }

    fn iter(&self) -> impl Iterator<Item = (i64, i64, i64)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(move |(offset, row)| row.map(|(l, r)| (self.top + offset as i64, l, r)))
    }
}

/// The output bitmap plus the mapping from projected to pixel coordinates.
pub struct Canvas {
    image: RgbaImage,
    ratio: f64,
    origin: (f64, f64),
}

impl Canvas {
    pub fn new(bounds: &Bounds, ratio: f64, background: Option<Rgba<u8>>) -> Result<Self> {
        let (width, height) = raster_size(bounds, ratio)?;
        let image = match background {
            Some(fill) => RgbaImage::from_pixel(width, height, fill),
            None => RgbaImage::new(width, height),
        };
        let origin = if bounds.is_empty() {
            (0.0, 0.0)
        } else {
            (bounds.min_x, bounds.min_y)
        };
        Ok(Self {
            image,
            ratio,
            origin,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel position of a projected point.
    pub fn to_raster(&self, point: &Point3<f64>) -> (f64, f64) {
        (
            (point.x - self.origin.0) * self.ratio,
            (point.y - self.origin.1) * self.ratio,
        )
    }

    /// Fill a convex quad and its outline. Returns false for an edge-on
    /// quad, which draws nothing.
    pub fn fill_quad(&mut self, corners: [(f64, f64); 4], color: Rgba<u8>) -> bool {
        if twice_area(&corners).abs() < DEGENERATE_AREA {
            return false;
        }

        let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let top = (min_y - EDGE_EPSILON).ceil() as i64;
        let bottom = (max_y + EDGE_EPSILON).floor() as i64;
        let mut spans = Spans::new(top.min(min_y.round() as i64), bottom.max(max_y.round() as i64));

        for y in top..=bottom {
            let row = y as f64;
            let mut left = f64::INFINITY;
            let mut right = f64::NEG_INFINITY;
            for i in 0..4 {
                let (x0, y0) = corners[i];
                let (x1, y1) = corners[(i + 1) % 4];
                if (y1 - y0).abs() < EDGE_EPSILON {
                    if (row - y0).abs() <= EDGE_EPSILON {
                        left = left.min(x0.min(x1));
                        right = right.max(x0.max(x1));
                    }
                    continue;
                }
                let t = (row - y0) / (y1 - y0);
                if (-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&t) {
                    let x = x0 + t * (x1 - x0);
                    left = left.min(x);
                    right = right.max(x);
                }
            }
            if left <= right {
                spans.add(
                    y,
                    (left - EDGE_EPSILON).ceil() as i64,
                    (right + EDGE_EPSILON).floor() as i64,
                );
            }
        }

        for i in 0..4 {
            let (x0, y0) = corners[i];
            let (x1, y1) = corners[(i + 1) % 4];
            line(
                (x0.round() as i64, y0.round() as i64),
                (x1.round() as i64, y1.round() as i64),
                |x, y| spans.add(y, x, x),
            );
        }

        let (width, height) = (i64::from(self.image.width()), i64::from(self.image.height()));
        for (y, left, right) in spans.iter() {
            if y < 0 || y >= height {
                continue;
            }
            for x in left.max(0)..=right.min(width - 1) {
                blend(self.image.get_pixel_mut(x as u32, y as u32), color);
            }
        }
        true
    }

    /// The final image, downsampled 2x with Lanczos3 when antialiasing.
    pub fn finish(self, antialias: bool) -> RgbaImage {
        if !antialias {
            return self.image;
        }
        let (width, height) = self.image.dimensions();
        imageops::resize(
            &self.image,
            (width / 2).max(1),
            (height / 2).max(1),
            FilterType::Lanczos3,
        )
    }
}

/// Bresenham line between two pixel positions, endpoints included.
pub fn line<F: FnMut(i64, i64)>(from: (i64, i64), to: (i64, i64), mut plot: F) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x, y);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
