//! Exhaustive zero-mean normalized cross-correlation search.
//!
//! Every placement of the region inside the atlas is scored with
//!
//! ```text
//! score(x, y) = sum(t' * I) / sqrt(var_t * var_I)
//! ```
//!
//! where `t'` is the zero-mean region, `var_t = sum(t'^2)` and `var_I` is the
//! window variance (times the pixel count) taken from the atlas summed-area
//! tables. Only the dot product is evaluated per placement.
//!
//! Scores are reported in `[0, 1]`: anti-correlation and degenerate windows
//! count as "no similarity" and map to `0`.

use atlas_locate_core::{GrayImageView, PixelRect};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{LocateError, ReferenceAtlas};

/// Search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Scan rows in parallel when the `rayon` feature is enabled.
    ///
    /// Ignored without the feature. Results are identical either way.
    pub parallel: bool,
    /// Windows whose luma variance (sum of squared deviations) is at or below
    /// this value score `0`.
    pub min_window_variance: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            parallel: true,
            min_window_variance: 1e-6,
        }
    }
}

impl SearchParams {
    pub(crate) fn use_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "rayon")
    }
}

/// Best placement of a region inside the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Top-left corner of the matched window, atlas pixels.
    pub top_left: Point2<usize>,
    /// Correlation score in `[0, 1]`.
    pub score: f32,
}

/// Zero-mean region pixels plus their energy.
struct RegionPlan {
    width: usize,
    height: usize,
    t_prime: Vec<f32>,
    var_t: f64,
}

impl RegionPlan {
    fn new(region: &GrayImageView<'_>) -> Self {
        let n = (region.width * region.height) as f64;
        let sum: f64 = region.data.iter().map(|&v| v as f64).sum();
        let mean = sum / n;
        let t_prime: Vec<f32> = region
            .data
            .iter()
            .map(|&v| (v as f64 - mean) as f32)
            .collect();
        let var_t = t_prime.iter().map(|&v| (v as f64) * (v as f64)).sum();
        Self {
            width: region.width,
            height: region.height,
            t_prime,
            var_t,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MatchSearcher {
    params: SearchParams,
}

impl MatchSearcher {
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Find the placement with the highest score.
    ///
    /// Ties go to the first placement in row-major order. A region with no
    /// intensity variation cannot correlate with anything and yields
    /// `{(0, 0), 0.0}`.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, region, atlas),
            fields(
                region_w = region.width,
                region_h = region.height,
                atlas_w = atlas.width(),
                atlas_h = atlas.height()
            )
        )
    )]
    pub fn search(
        &self,
        region: &GrayImageView<'_>,
        atlas: &ReferenceAtlas,
    ) -> Result<MatchCandidate, LocateError> {
        if region.width == 0 || region.height == 0 {
            return Err(LocateError::InvalidRegion {
                width: region.width,
                height: region.height,
            });
        }
        atlas.check_rect(&PixelRect::new(0, 0, region.width, region.height))?;

        let plan = RegionPlan::new(region);
        if plan.var_t <= self.params.min_window_variance {
            log::debug!("region has no intensity variation, skipping scan");
            return Ok(MatchCandidate {
                top_left: Point2::new(0, 0),
                score: 0.0,
            });
        }

        let max_y = atlas.height() - plan.height;
        let best = if self.params.use_parallel() {
            self.scan_rows_parallel(&plan, atlas, max_y)
        } else {
            (0..=max_y)
                .map(|y| self.best_in_row(&plan, atlas, y))
                .fold(None, pick_first_max)
        };

        Ok(best.unwrap_or(MatchCandidate {
            top_left: Point2::new(0, 0),
            score: 0.0,
        }))
    }

    #[cfg(feature = "rayon")]
    fn scan_rows_parallel(
        &self,
        plan: &RegionPlan,
        atlas: &ReferenceAtlas,
        max_y: usize,
    ) -> Option<MatchCandidate> {
        use rayon::prelude::*;

        // Collect per-row winners first so the reduction runs in row order.
        let rows: Vec<MatchCandidate> = (0..=max_y)
            .into_par_iter()
            .map(|y| self.best_in_row(plan, atlas, y))
            .collect();
        rows.into_iter().fold(None, pick_first_max)
    }

    #[cfg(not(feature = "rayon"))]
    fn scan_rows_parallel(
        &self,
        plan: &RegionPlan,
        atlas: &ReferenceAtlas,
        max_y: usize,
    ) -> Option<MatchCandidate> {
        (0..=max_y)
            .map(|y| self.best_in_row(plan, atlas, y))
            .fold(None, pick_first_max)
    }

    fn best_in_row(&self, plan: &RegionPlan, atlas: &ReferenceAtlas, y: usize) -> MatchCandidate {
        let max_x = atlas.width() - plan.width;
        let mut best = MatchCandidate {
            top_left: Point2::new(0, y),
            score: f32::NEG_INFINITY,
        };
        for x in 0..=max_x {
            let score = self.score_at(plan, atlas, x, y);
            if score > best.score {
                best = MatchCandidate {
                    top_left: Point2::new(x, y),
                    score,
                };
            }
        }
        best
    }

    fn score_at(&self, plan: &RegionPlan, atlas: &ReferenceAtlas, x: usize, y: usize) -> f32 {
        let n = (plan.width * plan.height) as f64;
        let (sum_i, sum_i2) = atlas.window_sums(x, y, plan.width, plan.height);
        let var_i = sum_i2 - sum_i * sum_i / n;
        if var_i <= self.params.min_window_variance {
            return 0.0;
        }

        let gray = atlas.gray();
        let mut dot = 0.0f64;
        for ty in 0..plan.height {
            let img_row = &gray.row(y + ty)[x..x + plan.width];
            let tpl_row = &plan.t_prime[ty * plan.width..(ty + 1) * plan.width];
            let row_dot: f32 = tpl_row
                .iter()
                .zip(img_row)
                .map(|(&t, &v)| t * v as f32)
                .sum();
            dot += row_dot as f64;
        }

        let score = dot / (plan.var_t * var_i).sqrt();
        if score.is_finite() {
            score.clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }
}

/// Fold step keeping the earliest maximum.
fn pick_first_max(best: Option<MatchCandidate>, cand: MatchCandidate) -> Option<MatchCandidate> {
    match best {
        Some(b) if cand.score <= b.score => Some(b),
        _ => Some(cand),
    }
}
