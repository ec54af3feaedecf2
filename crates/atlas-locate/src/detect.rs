//! End-to-end helpers on top of the `image` crate.

use std::{path::Path, sync::Arc};

use crate::io::{resolve_path, LocateConfig};
use crate::matcher::{
    Baseline, BaselineSpec, DistinctivenessScorer, Locator, ReferenceAtlas, RegionMask,
};
use crate::{core, matcher};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced when loading images or building a locator from disk.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: ::image::ImageError,
    },

    #[error("failed to write image {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: ::image::ImageError,
    },

    #[error("image too large ({width}x{height})")]
    TooLarge { width: usize, height: usize },

    #[error(transparent)]
    Buffer(#[from] core::ImageError),

    #[error(transparent)]
    Locate(#[from] matcher::LocateError),
}

/// Borrow an `image::RgbImage` as the core view type.
pub fn rgb_view(img: &::image::RgbImage) -> core::RgbImageView<'_> {
    core::RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Take ownership of an `image::RgbImage` buffer.
pub fn from_image_rgb(img: ::image::RgbImage) -> core::RgbImage {
    let (width, height) = (img.width() as usize, img.height() as usize);
    core::RgbImage {
        width,
        height,
        data: img.into_raw(),
    }
}

/// Copy a core image into an `image::RgbImage`.
pub fn to_image_rgb(img: &core::RgbImage) -> Result<::image::RgbImage, LoadError> {
    let too_large = || LoadError::TooLarge {
        width: img.width,
        height: img.height,
    };
    let w = u32::try_from(img.width).map_err(|_| too_large())?;
    let h = u32::try_from(img.height).map_err(|_| too_large())?;
    ::image::RgbImage::from_raw(w, h, img.data.clone()).ok_or_else(too_large)
}

fn open(path: &Path) -> Result<::image::DynamicImage, LoadError> {
    ::image::open(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Decode any supported image file as RGB8.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<core::RgbImage, LoadError> {
    Ok(from_image_rgb(open(path.as_ref())?.to_rgb8()))
}

/// Decode an atlas image and precompute its search tables.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))
)]
pub fn load_atlas(path: impl AsRef<Path>) -> Result<ReferenceAtlas, LoadError> {
    let path = path.as_ref();
    let rgb = load_rgb(path)?;
    log::info!(
        "loaded atlas {} ({}x{})",
        path.display(),
        rgb.width,
        rgb.height
    );
    Ok(ReferenceAtlas::new(rgb))
}

/// Decode a mask image; pixels with luma above `threshold` are set.
pub fn load_mask(path: impl AsRef<Path>, threshold: u8) -> Result<RegionMask, LoadError> {
    let gray = open(path.as_ref())?.to_luma8();
    let view = core::GrayImageView {
        width: gray.width() as usize,
        height: gray.height() as usize,
        data: gray.as_raw(),
    };
    Ok(RegionMask::from_luma(&view, threshold))
}

/// Encode a core image; the format follows the file extension.
pub fn save_rgb(img: &core::RgbImage, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    to_image_rgb(img)?
        .save(path)
        .map_err(|source| LoadError::Write {
            path: path.display().to_string(),
            source,
        })
}

/// Build a locator from a config, loading the atlas and any mask images.
///
/// Relative paths in `cfg` are resolved against `base_dir`.
pub fn build_locator(cfg: &LocateConfig, base_dir: &Path) -> Result<Locator, LoadError> {
    let atlas = Arc::new(load_atlas(resolve_path(base_dir, &cfg.atlas_path))?);
    let params = cfg.params.clone();

    if cfg.indicator_mask_path.is_none() && cfg.surround_mask_path.is_none() {
        return Ok(Locator::new(atlas, params)?);
    }

    let (w, h) = (params.region.width, params.region.height);
    let load = |p: &str| load_mask(resolve_path(base_dir, p), cfg.mask_threshold);
    let indicator = match &cfg.indicator_mask_path {
        Some(p) => load(p)?,
        None => RegionMask::disk(w, h, params.distinctiveness.indicator_radius),
    };
    let baseline = match (&cfg.surround_mask_path, params.distinctiveness.baseline) {
        (Some(p), _) => Baseline::Mask(load(p)?),
        (
            None,
            BaselineSpec::Surround {
                inner_radius,
                outer_radius,
            },
        ) => Baseline::Mask(RegionMask::annulus(w, h, inner_radius, outer_radius)),
        (None, BaselineSpec::Solid { color }) => Baseline::Solid(color),
    };
    let scorer = DistinctivenessScorer::new(indicator, baseline)?;
    Ok(Locator::with_scorer(atlas, params, scorer)?)
}
