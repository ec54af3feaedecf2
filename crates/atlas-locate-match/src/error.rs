use atlas_locate_core::PixelRect;

/// Errors returned by the localisation pipeline.
///
/// Weak or ambiguous matches are not errors; they are reported through
/// [`crate::MatchOutcome`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LocateError {
    #[error(
        "frame {frame_width}x{frame_height} does not contain the region {region:?}"
    )]
    FrameTooSmall {
        frame_width: usize,
        frame_height: usize,
        region: PixelRect,
    },

    #[error("rectangle {rect:?} exceeds the atlas ({atlas_width}x{atlas_height})")]
    OutOfBounds {
        rect: PixelRect,
        atlas_width: usize,
        atlas_height: usize,
    },

    #[error("region {width}x{height} is empty")]
    InvalidRegion { width: usize, height: usize },

    #[error("invalid confidence thresholds: {reason}")]
    InvalidThresholds { reason: &'static str },

    #[error("{which} mask has no pixels set")]
    EmptyMask { which: &'static str },

    #[error(
        "{which} mask is {mask_width}x{mask_height}, region is {region_width}x{region_height}"
    )]
    MaskSizeMismatch {
        which: &'static str,
        mask_width: usize,
        mask_height: usize,
        region_width: usize,
        region_height: usize,
    },
}
