//! Core types shared by the `atlas-locate-*` crates.
//!
//! Plain pixel containers (RGB and grayscale, owned and borrowed), pixel
//! rectangles, and the crate-wide logger setup. Nothing here knows about
//! matching; see `atlas-locate-match` for the algorithm.

mod image;
mod logger;
mod rect;

pub use image::{luma_u8, GrayImage, GrayImageView, ImageError, RgbImage, RgbImageView};
pub use rect::PixelRect;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

/// Largest possible Euclidean distance between two RGB8 colours
/// (black vs. white): `sqrt(3 * 255^2)`.
pub const MAX_COLOR_DIFF: f32 = 441.672_96;
