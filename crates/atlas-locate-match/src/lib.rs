//! Locate a captured indicator region inside a large reference atlas.
//!
//! ## Quickstart
//!
//! ```
//! use std::sync::Arc;
//! use atlas_locate_core::{PixelRect, RgbImage};
//! use atlas_locate_match::{Locator, LocatorParams, MatchOutcome, ReferenceAtlas};
//!
//! let atlas = Arc::new(ReferenceAtlas::new(RgbImage::filled(64, 64, [40, 80, 40])));
//! let params = LocatorParams::for_region(PixelRect::new(8, 8, 32, 32));
//! let locator = Locator::new(atlas, params).expect("valid configuration");
//!
//! let frame = RgbImage::filled(64, 48, [0, 0, 0]);
//! let result = locator.find_position(&frame.view()).expect("frame is large enough");
//! assert_eq!(result.outcome, MatchOutcome::Failed);
//! assert!(result.position.is_none());
//! ```
//!
//! Pipeline for one frame:
//! 1. Crop the fixed indicator rectangle ([`RegionExtractor`]).
//! 2. Scan every placement in the atlas with zero-mean NCC ([`MatchSearcher`]).
//! 3. Measure how much the indicator stands out from its baseline colour
//!    ([`DistinctivenessScorer`]).
//! 4. Accept, flag as ambiguous, or reject the match from the
//!    (distinctiveness, score) pair ([`ConfidenceClassifier`]).
//! 5. Convert the accepted top-left corner to the indicator centre
//!    ([`PositionResolver`]).

mod atlas;
mod classify;
mod distinctiveness;
mod error;
mod extract;
mod locator;
mod mask;
mod params;
mod resolve;
mod search;

pub use atlas::ReferenceAtlas;
pub use classify::{ConfidenceClassifier, ConfidenceThresholds, MatchOutcome};
pub use distinctiveness::{
    color_distance, Baseline, BaselineSpec, DistinctivenessParams, DistinctivenessScorer,
};
pub use error::LocateError;
pub use extract::{ExtractedRegion, RegionExtractor};
pub use locator::{LocateResult, Locator};
pub use mask::RegionMask;
pub use params::{LocatorParams, DEFAULT_REGION};
pub use resolve::PositionResolver;
pub use search::{MatchCandidate, MatchSearcher, SearchParams};

pub use atlas_locate_core::MAX_COLOR_DIFF;
