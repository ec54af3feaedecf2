//! High-level facade crate for the `atlas-locate-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core image types and the matcher
//! - JSON configuration and report types ([`io`])
//! - frame scheduling for video-like frame sequences ([`schedule`])
//! - path bookkeeping over successful matches ([`track`])
//! - (feature-gated) loading atlases, frames and masks with the `image` crate
//!
//! ## Quickstart
//!
//! ```no_run
//! use atlas_locate::{detect, matcher::LocatorParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let atlas = detect::load_atlas("atlas.png")?;
//! let locator = atlas_locate::matcher::Locator::new(
//!     std::sync::Arc::new(atlas),
//!     LocatorParams::default(),
//! )?;
//! let frame = detect::load_rgb("frame_0001.png")?;
//! let result = locator.find_position(&frame.view())?;
//! println!("{:?} at {:?}", result.outcome, result.position);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `atlas_locate::core`: pixel containers, rectangles, logger.
//! - `atlas_locate::matcher`: atlas, search, distinctiveness, classification.
//! - `atlas_locate::detect` (feature `image`): disk I/O via `image`.

pub use atlas_locate_core as core;
pub use atlas_locate_match as matcher;

pub use atlas_locate_core::{PixelRect, RgbImage, RgbImageView};
pub use atlas_locate_match::{LocateError, LocateResult, Locator, LocatorParams, MatchOutcome};

pub mod fixtures;
pub mod io;
pub mod schedule;
pub mod track;

#[cfg(feature = "image")]
pub mod detect;
