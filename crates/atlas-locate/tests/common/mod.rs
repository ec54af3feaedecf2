//! Procedural atlas and frames written to disk for the facade tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use atlas_locate::detect::save_rgb;
use atlas_locate::io::LocateConfig;
use atlas_locate::matcher::{BaselineSpec, DistinctivenessParams, RegionMask};
use atlas_locate::{LocatorParams, PixelRect, RgbImage};

pub const REGION: PixelRect = PixelRect::new(30, 14, 40, 40);
pub const FRAME_W: usize = 80;
pub const FRAME_H: usize = 60;
pub const INDICATOR_RADIUS: f32 = 4.0;
/// Atlas windows (top-left corners) that are known to match well.
pub const POSITIVES: [(usize, usize); 3] = [(10, 5), (100, 60), (57, 33)];

struct Lcg(u32);

impl Lcg {
    fn next_u8(&mut self) -> u8 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 >> 24) as u8
    }
}

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
    let mut img = textured(160, 120, 0x5eed);
    let water = RgbImage::filled(48, 40, [30, 60, 120]);
    img.blit(&water.view(), 0, 80);
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
        ..LocatorParams::default()
    }
}

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

pub fn frame_with(region: &RgbImage) -> RgbImage {
    let mut frame = textured(FRAME_W, FRAME_H, 7);
    frame.blit(&region.view(), REGION.x, REGION.y);
    frame
}

pub fn positive_frame(atlas: &RgbImage, top_left: (usize, usize)) -> RgbImage {
    let mut region = atlas
        .view()
        .crop(&PixelRect::new(top_left.0, top_left.1, REGION.width, REGION.height))
        .expect("window inside atlas");
    draw_indicator(&mut region);
    frame_with(&region)
}

pub fn negative_frame(seed: u32) -> RgbImage {
    let mut region = textured(REGION.width, REGION.height, seed);
    draw_indicator(&mut region);
    frame_with(&region)
}

/// Expected indicator centre for a window at `top_left`.
pub fn centre(top_left: (usize, usize)) -> (usize, usize) {
    (top_left.0 + REGION.width / 2, top_left.1 + REGION.height / 2)
}

/// Writes `atlas.png` and `config.json` (with relative paths) into `dir`.
pub fn write_setup(dir: &Path) -> PathBuf {
    save_rgb(&atlas_image(), dir.join("atlas.png")).expect("save atlas");
    let mut cfg = LocateConfig::new("atlas.png", params());
    cfg.output_path = Some("report.json".into());
    let path = dir.join("config.json");
    cfg.write_json(&path).expect("write config");
    path
}

pub fn write_frame(img: &RgbImage, path: &Path) -> PathBuf {
    save_rgb(img, path).expect("save frame");
    path.to_path_buf()
}
