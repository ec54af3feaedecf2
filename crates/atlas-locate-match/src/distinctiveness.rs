//! Colour-difference signal that vetoes matches on visually generic regions.
//!
//! A near-uniform capture (loading screen, blank overlay, open water) can
//! correlate well with many atlas locations. The indicator itself is drawn in
//! a colour that stands out from its surroundings, so the mean colour of the
//! indicator pixels compared against a baseline tells us whether the
//! indicator is actually visible in the capture.

use atlas_locate_core::{RgbImageView, MAX_COLOR_DIFF};
use serde::{Deserialize, Serialize};

use crate::{ExtractedRegion, LocateError, RegionMask};

/// What the indicator colour is compared against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaselineSpec {
    /// Mean colour of a ring around the indicator (its local background).
    Surround { inner_radius: f32, outer_radius: f32 },
    /// A fixed neutral colour.
    Solid { color: [u8; 3] },
}

/// Procedural mask geometry, in region pixels around the region centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistinctivenessParams {
    pub indicator_radius: f32,
    pub baseline: BaselineSpec,
}

impl Default for DistinctivenessParams {
    fn default() -> Self {
        Self {
            indicator_radius: 6.0,
            baseline: BaselineSpec::Surround {
                inner_radius: 9.0,
                outer_radius: 14.0,
            },
        }
    }
}

/// Resolved baseline used by the scorer.
#[derive(Clone, Debug, PartialEq)]
pub enum Baseline {
    Mask(RegionMask),
    Solid([u8; 3]),
}

#[derive(Clone, Debug)]
pub struct DistinctivenessScorer {
    indicator: RegionMask,
    baseline: Baseline,
}

impl DistinctivenessScorer {
    /// Build a scorer from explicit masks (e.g. loaded from mask images).
    pub fn new(indicator: RegionMask, baseline: Baseline) -> Result<Self, LocateError> {
        if indicator.is_empty() {
            return Err(LocateError::EmptyMask { which: "indicator" });
        }
        if let Baseline::Mask(mask) = &baseline {
            if mask.is_empty() {
                return Err(LocateError::EmptyMask { which: "surround" });
            }
            if (mask.width(), mask.height()) != (indicator.width(), indicator.height()) {
                return Err(LocateError::MaskSizeMismatch {
                    which: "surround",
                    mask_width: mask.width(),
                    mask_height: mask.height(),
                    region_width: indicator.width(),
                    region_height: indicator.height(),
                });
            }
        }
        Ok(Self {
            indicator,
            baseline,
        })
    }

    /// Build procedural masks for a `width x height` region.
    pub fn from_params(
        width: usize,
        height: usize,
        params: &DistinctivenessParams,
    ) -> Result<Self, LocateError> {
        let indicator = RegionMask::disk(width, height, params.indicator_radius);
        let baseline = match params.baseline {
            BaselineSpec::Surround {
                inner_radius,
                outer_radius,
            } => Baseline::Mask(RegionMask::annulus(
                width,
                height,
                inner_radius,
                outer_radius,
            )),
            BaselineSpec::Solid { color } => Baseline::Solid(color),
        };
        Self::new(indicator, baseline)
    }

    #[inline]
    pub fn indicator_mask(&self) -> &RegionMask {
        &self.indicator
    }

    #[inline]
    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Distance between the indicator's mean colour and the baseline, in
    /// `[0, MAX_COLOR_DIFF]`.
    pub fn score(&self, region: &ExtractedRegion) -> Result<f32, LocateError> {
        let view = region.view();
        if (view.width, view.height) != (self.indicator.width(), self.indicator.height()) {
            return Err(LocateError::MaskSizeMismatch {
                which: "indicator",
                mask_width: self.indicator.width(),
                mask_height: self.indicator.height(),
                region_width: view.width,
                region_height: view.height,
            });
        }

        let indicator = mean_color(&view, &self.indicator);
        let reference = match &self.baseline {
            Baseline::Mask(mask) => mean_color(&view, mask),
            Baseline::Solid(c) => [c[0] as f32, c[1] as f32, c[2] as f32],
        };
        Ok(color_distance(indicator, reference))
    }
}

fn mean_color(view: &RgbImageView<'_>, mask: &RegionMask) -> [f32; 3] {
    let mut acc = [0.0f64; 3];
    let mut n = 0usize;
    for idx in mask.indices() {
        let p = &view.data[idx * 3..idx * 3 + 3];
        for (a, &v) in acc.iter_mut().zip(p) {
            *a += v as f64;
        }
        n += 1;
    }
    if n == 0 {
        return [0.0; 3];
    }
    acc.map(|a| (a / n as f64) as f32)
}

/// Euclidean RGB distance clamped to [`MAX_COLOR_DIFF`].
pub fn color_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d2: f32 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
    d2.sqrt().clamp(0.0, MAX_COLOR_DIFF)
}
