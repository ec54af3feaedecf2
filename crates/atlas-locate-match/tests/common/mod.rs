//! Procedural atlas and frames shared by the integration tests.

#![allow(dead_code)]

use atlas_locate_core::{PixelRect, RgbImage};
use atlas_locate_match::{BaselineSpec, DistinctivenessParams, LocatorParams, RegionMask, SearchParams};

pub const ATLAS_W: usize = 160;
pub const ATLAS_H: usize = 120;
pub const REGION: PixelRect = PixelRect::new(30, 14, 40, 40);
pub const FRAME_W: usize = 80;
pub const FRAME_H: usize = 60;
/// Flat "water" patch with no texture at all.
pub const WATER: PixelRect = PixelRect::new(0, 80, 48, 40);
pub const WATER_RGB: [u8; 3] = [30, 60, 120];
pub const INDICATOR_RADIUS: f32 = 4.0;

struct Lcg(u32);

impl Lcg {
    fn next_u8(&mut self) -> u8 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 24) as u8
    }
}

/// Independent per-channel speckle in `[40, 216]`.
pub fn textured(width: usize, height: usize, seed: u32) -> RgbImage {
    let mut lcg = Lcg(seed);
    let mut img = RgbImage::filled(width, height, [0, 0, 0]);
    for y in 0..height {
        for x in 0..width {
            let mut rgb = [0u8; 3];
            for c in &mut rgb {
                *c = 40 + ((lcg.next_u8() as u32 * 176) / 255) as u8;
            }
            img.put_pixel(x, y, rgb);
        }
    }
    img
}

pub fn atlas_image() -> RgbImage {
    let mut img = textured(ATLAS_W, ATLAS_H, 0x5eed);
    let water = RgbImage::filled(WATER.width, WATER.height, WATER_RGB);
    img.blit(&water.view(), WATER.x, WATER.y);
    img
}

pub fn params() -> LocatorParams {
    LocatorParams {
        region: REGION,
        distinctiveness: DistinctivenessParams {
            indicator_radius: INDICATOR_RADIUS,
            baseline: BaselineSpec::Surround {
                inner_radius: 7.0,
                outer_radius: 12.0,
            },
        },
        search: SearchParams {
            parallel: false,
            ..SearchParams::default()
        },
        ..LocatorParams::default()
    }
}

/// Paint the white indicator disk at the region centre.
pub fn draw_indicator(region: &mut RgbImage) {
    let mask = RegionMask::disk(region.width, region.height, INDICATOR_RADIUS);
    for y in 0..region.height {
        for x in 0..region.width {
            if mask.contains(x, y) {
                region.put_pixel(x, y, [255, 255, 255]);
            }
        }
    }
}

/// A full frame whose indicator region shows `region`.
pub fn frame_with(region: &RgbImage) -> RgbImage {
    let mut frame = textured(FRAME_W, FRAME_H, 7);
    frame.blit(&region.view(), REGION.x, REGION.y);
    frame
}

/// Frame showing the atlas window at `top_left` with the indicator drawn on it.
pub fn positive_frame(atlas: &RgbImage, top_left: (usize, usize)) -> RgbImage {
    let mut region = atlas
        .view()
        .crop(&PixelRect::new(top_left.0, top_left.1, REGION.width, REGION.height))
        .expect("window inside atlas");
    draw_indicator(&mut region);
    frame_with(&region)
}
