//! End-to-end localisation of one captured frame.

use std::sync::Arc;

use atlas_locate_core::{PixelRect, RgbImageView};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ConfidenceClassifier, DistinctivenessScorer, ExtractedRegion, LocateError, LocatorParams,
    MatchOutcome, MatchSearcher, PositionResolver, ReferenceAtlas, RegionExtractor,
};

/// Outcome of one localisation attempt plus the raw evidence behind it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocateResult {
    pub outcome: MatchOutcome,
    /// Indicator centre in atlas pixels; `Some` only for successful matches.
    pub position: Option<Point2<usize>>,
    /// Top-left corner of the best window, whatever the outcome.
    pub top_left: Point2<usize>,
    /// Correlation score in `[0, 1]`.
    pub score: f32,
    /// Colour difference in `[0, MAX_COLOR_DIFF]`.
    pub distinctiveness: f32,
}

impl LocateResult {
    #[inline]
    pub fn is_successful(&self) -> bool {
        self.outcome.is_successful()
    }
}

/// Matches frames against a shared atlas.
///
/// `Locator` holds no mutable state, so one instance can serve any number of
/// threads.
#[derive(Clone, Debug)]
pub struct Locator {
    atlas: Arc<ReferenceAtlas>,
    params: LocatorParams,
    extractor: RegionExtractor,
    searcher: MatchSearcher,
    scorer: DistinctivenessScorer,
    classifier: ConfidenceClassifier,
    resolver: PositionResolver,
}

impl Locator {
    /// Validate `params` against the atlas and build a locator with
    /// procedural distinctiveness masks.
    pub fn new(atlas: Arc<ReferenceAtlas>, params: LocatorParams) -> Result<Self, LocateError> {
        let scorer = DistinctivenessScorer::from_params(
            params.region.width,
            params.region.height,
            &params.distinctiveness,
        )?;
        Self::with_scorer(atlas, params, scorer)
    }

    /// Like [`Locator::new`] but with a caller-built scorer, e.g. one using
    /// masks loaded from images. `params.distinctiveness` is ignored.
    pub fn with_scorer(
        atlas: Arc<ReferenceAtlas>,
        params: LocatorParams,
        scorer: DistinctivenessScorer,
    ) -> Result<Self, LocateError> {
        let extractor = RegionExtractor::new(params.region)?;
        let region = params.region;
        atlas.check_rect(&PixelRect::new(0, 0, region.width, region.height))?;

        let mask = scorer.indicator_mask();
        if (mask.width(), mask.height()) != (region.width, region.height) {
            return Err(LocateError::MaskSizeMismatch {
                which: "indicator",
                mask_width: mask.width(),
                mask_height: mask.height(),
                region_width: region.width,
                region_height: region.height,
            });
        }

        let classifier = ConfidenceClassifier::new(params.thresholds)?;
        let searcher = MatchSearcher::new(params.search);
        let resolver = PositionResolver::new(region.width, region.height);

        log::info!(
            "locator ready: atlas {}x{}, region {}x{} at ({}, {})",
            atlas.width(),
            atlas.height(),
            region.width,
            region.height,
            region.x,
            region.y
        );

        Ok(Self {
            atlas,
            params,
            extractor,
            searcher,
            scorer,
            classifier,
            resolver,
        })
    }

    #[inline]
    pub fn atlas(&self) -> &ReferenceAtlas {
        &self.atlas
    }

    #[inline]
    pub fn params(&self) -> &LocatorParams {
        &self.params
    }

    #[inline]
    pub fn extractor(&self) -> &RegionExtractor {
        &self.extractor
    }

    #[inline]
    pub fn classifier(&self) -> &ConfidenceClassifier {
        &self.classifier
    }

    /// Locate the indicator of one captured frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, frame),
            fields(width = frame.width, height = frame.height)
        )
    )]
    pub fn find_position(&self, frame: &RgbImageView<'_>) -> Result<LocateResult, LocateError> {
        let region = self.extractor.extract(frame)?;
        self.locate_region(&region)
    }

    /// Run search, scoring and classification on an already extracted region.
    pub fn locate_region(&self, region: &ExtractedRegion) -> Result<LocateResult, LocateError> {
        let expected = self.params.region;
        if (region.width(), region.height()) != (expected.width, expected.height) {
            return Err(LocateError::MaskSizeMismatch {
                which: "indicator",
                mask_width: expected.width,
                mask_height: expected.height,
                region_width: region.width(),
                region_height: region.height(),
            });
        }

        let gray = region.to_gray();
        let candidate = self.searcher.search(&gray.view(), &self.atlas)?;
        let distinctiveness = self.scorer.score(region)?;
        let outcome = self.classifier.classify(distinctiveness, candidate.score);
        let position = match outcome {
            MatchOutcome::Successful => Some(self.resolver.resolve(&candidate)),
            MatchOutcome::Ambiguous | MatchOutcome::Failed => None,
        };

        log::debug!(
            "match at ({}, {}): score={:.3} distinctiveness={:.1} -> {:?}",
            candidate.top_left.x,
            candidate.top_left.y,
            candidate.score,
            distinctiveness,
            outcome
        );

        Ok(LocateResult {
            outcome,
            position,
            top_left: candidate.top_left,
            score: candidate.score,
            distinctiveness,
        })
    }

    /// Locate a batch of independent frames, preserving input order.
    ///
    /// Frames are processed in parallel when the `rayon` feature is enabled.
    pub fn find_positions(
        &self,
        frames: &[RgbImageView<'_>],
    ) -> Vec<Result<LocateResult, LocateError>> {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            frames.par_iter().map(|f| self.find_position(f)).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            frames.iter().map(|f| self.find_position(f)).collect()
        }
    }
}
