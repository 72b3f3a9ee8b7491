// Shared helpers for the rendering tests.
#![allow(dead_code)]

use std::path::Path;

use image::{Rgba, RgbaImage};
use skin3d_core::SkinAsset;

/// A fully opaque skin atlas with a distinct colour per texel.
pub fn opaque_atlas(hd_ratio: u32) -> RgbaImage {
    RgbaImage::from_fn(64 * hd_ratio, 64 * hd_ratio, |x, y| {
        let (u, v) = (x / hd_ratio, y / hd_ratio);
        Rgba([
            (u * 4) as u8,
            (v * 4) as u8,
            if (u + v) % 2 == 0 { 96 } else { 192 },
            255,
        ])
    })
}

/// Opaque base regions, with the second-layer rows left empty except the
/// helmet, which keeps a band of hair across its front.
pub fn layered_atlas() -> RgbaImage {
    let mut atlas = opaque_atlas(1);
    for (x, y, pixel) in atlas.enumerate_pixels_mut() {
        let helmet = y < 16 && x >= 32;
        let layer_rows = (32..48).contains(&y) || (y >= 48 && (x < 16 || x >= 48));
        let hair = helmet && (8..11).contains(&y) && (40..48).contains(&x);
        if (helmet && !hair) || layer_rows {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    atlas
}

pub fn cape_atlas() -> RgbaImage {
    RgbaImage::from_fn(64, 32, |x, y| Rgba([200, (x * 3) as u8, (y * 7) as u8, 255]))
}

pub fn classic_skin() -> SkinAsset {
    SkinAsset::new(opaque_atlas(1), None, false)
}

pub fn caped_skin() -> SkinAsset {
    SkinAsset::new(opaque_atlas(1), Some(cape_atlas()), false)
}

/// Compare against a fixture PNG. With `UPDATE_GOLDEN=1` the fixture is
/// rewritten instead. Channels may differ by `tolerance`.
pub fn compare_or_update(actual: &RgbaImage, fixture_path: &Path, tolerance: u8) {
    let update = std::env::var("UPDATE_GOLDEN")
        .map(|v| v == "1")
        .unwrap_or(false);
    compare_with_fixture(actual, fixture_path, tolerance, update);
}

/// A missing fixture fails unless `update` is set.
pub fn compare_with_fixture(actual: &RgbaImage, fixture_path: &Path, tolerance: u8, update: bool) {
    if update {
        if let Some(parent) = fixture_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        actual.save(fixture_path).expect("Failed to save fixture");
        eprintln!("Wrote fixture: {}", fixture_path.display());
        return;
    }

    assert!(
        fixture_path.exists(),
        "missing fixture {}; rerun with UPDATE_GOLDEN=1 to create it",
        fixture_path.display()
    );

    let fixture = image::open(fixture_path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", fixture_path.display(), e))
        .to_rgba8();

    assert_eq!(
        actual.dimensions(),
        fixture.dimensions(),
        "dimensions differ from {}",
        fixture_path.display()
    );

    let mismatched = actual
        .pixels()
        .zip(fixture.pixels())
        .filter(|(a, b)| a.0.iter().zip(b.0.iter()).any(|(x, y)| x.abs_diff(*y) > tolerance))
        .count();

    if mismatched > 0 {
        let actual_path = fixture_path.with_extension("actual.png");
        actual.save(&actual_path).expect("Failed to save actual image");
        panic!(
            "{mismatched} pixels differ from {}\n  actual: {}",
            fixture_path.display(),
            actual_path.display()
        );
    }
}
