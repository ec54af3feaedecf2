use atlas_locate_core::PixelRect;
use serde::{Deserialize, Serialize};

use crate::{ConfidenceThresholds, DistinctivenessParams, SearchParams};

/// Indicator region of a 1920x1080 capture.
pub const DEFAULT_REGION: PixelRect = PixelRect::new(1630, 798, 252, 253);

/// Full configuration of a [`crate::Locator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorParams {
    /// Rectangle cropped from every frame.
    pub region: PixelRect,
    pub thresholds: ConfidenceThresholds,
    pub distinctiveness: DistinctivenessParams,
    pub search: SearchParams,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION,
            thresholds: ConfidenceThresholds::default(),
            distinctiveness: DistinctivenessParams::default(),
            search: SearchParams::default(),
        }
    }
}

impl LocatorParams {
    /// Defaults with a different region rectangle.
    pub fn for_region(region: PixelRect) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }
}
