//! Positions collected from successful matches, and a square view around them.

use atlas_locate_core::PixelRect;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use atlas_locate_match::LocateResult;

/// Padding around the path, in atlas pixels.
pub const CROP_BORDER: usize = 30;
/// Smallest side of the preview square.
pub const MIN_PREVIEW_SIZE: usize = 600;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTrack {
    points: Vec<Point2<usize>>,
}

impl PathTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the position of a successful match. Other outcomes are ignored.
    pub fn record(&mut self, result: &LocateResult) -> bool {
        match result.position {
            Some(p) if result.is_successful() => {
                self.points.push(p);
                true
            }
            _ => false,
        }
    }

    pub fn push(&mut self, p: Point2<usize>) {
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point2<usize>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Square window around the path.
    ///
    /// The padded path extents are rounded up to even lengths so both sides
    /// get the same padding. The side is at least [`MIN_PREVIEW_SIZE`] and the
    /// corner never goes negative. The window may extend past the right or
    /// bottom atlas edge. An empty track gives the whole atlas.
    pub fn bounds(&self, atlas_width: usize, atlas_height: usize) -> PixelRect {
        let Some(first) = self.points.first() else {
            return PixelRect::new(0, 0, atlas_width, atlas_height);
        };
        let (mut min_x, mut max_x) = (first.x, first.x);
        let (mut min_y, mut max_y) = (first.y, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let border = CROP_BORDER as i64;
        let (min_x, max_x) = (min_x as i64 - border, max_x as i64 + border);
        let (min_y, max_y) = (min_y as i64 - border, max_y as i64 + border);
        let even = |len: i64| (len + 1) / 2 * 2;
        let path_w = even(max_x - min_x);
        let path_h = even(max_y - min_y);
        let size = (MIN_PREVIEW_SIZE as i64).max(path_w).max(path_h);

        let x = (min_x - (size - path_w) / 2).max(0);
        let y = (min_y - (size - path_h) / 2).max(0);
        PixelRect::new(x as usize, y as usize, size as usize, size as usize)
    }
}
