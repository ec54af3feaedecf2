//! JSON configuration and report helpers.

use std::{
    fs,
    path::{Path, PathBuf},
};

use atlas_locate_core::PixelRect;
use atlas_locate_match::{LocateError, LocateResult, LocatorParams, MatchOutcome};
use serde::{Deserialize, Serialize};

use crate::schedule::{ScheduleParams, ScheduledFrame};

#[derive(thiserror::Error, Debug)]
pub enum LocateIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_mask_threshold() -> u8 {
    10
}

/// Configuration for a localisation run.
///
/// Relative paths are resolved against the directory holding the config
/// file (see [`resolve_path`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateConfig {
    pub atlas_path: String,
    #[serde(default)]
    pub params: LocatorParams,
    /// Grayscale image marking indicator pixels; replaces the procedural disk.
    #[serde(default)]
    pub indicator_mask_path: Option<String>,
    /// Grayscale image marking baseline pixels; replaces the configured baseline.
    #[serde(default)]
    pub surround_mask_path: Option<String>,
    /// Mask pixels brighter than this are set.
    #[serde(default = "default_mask_threshold")]
    pub mask_threshold: u8,
    /// Treat the frame list as a recording and only process scheduled frames.
    #[serde(default)]
    pub schedule: Option<ScheduleParams>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl LocateConfig {
    pub fn new(atlas_path: impl Into<String>, params: LocatorParams) -> Self {
        Self {
            atlas_path: atlas_path.into(),
            params,
            indicator_mask_path: None,
            surround_mask_path: None,
            mask_threshold: default_mask_threshold(),
            schedule: None,
            output_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LocateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LocateIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self, base_dir: &Path) -> PathBuf {
        self.output_path
            .as_deref()
            .map(|p| resolve_path(base_dir, p))
            .unwrap_or_else(|| PathBuf::from("atlas_locate_report.json"))
    }
}

/// `path` as is when absolute, otherwise relative to `base_dir`.
pub fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Outcome of one frame in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame_path: String,
    #[serde(default)]
    pub schedule: Option<ScheduledFrame>,
    #[serde(default)]
    pub result: Option<LocateResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub successful: usize,
    pub ambiguous: usize,
    pub failed: usize,
    pub errors: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.successful + self.ambiguous + self.failed + self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateReport {
    pub config_path: String,
    pub atlas_path: String,
    pub region: PixelRect,
    pub frames: Vec<FrameReport>,
    pub summary: ReportSummary,
    /// Square view around the successful positions, see [`crate::track::PathTrack::bounds`].
    #[serde(default)]
    pub path_bounds: Option<PixelRect>,
}

impl LocateReport {
    pub fn new(cfg: &LocateConfig, config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_string_lossy().into_owned(),
            atlas_path: cfg.atlas_path.clone(),
            region: cfg.params.region,
            frames: Vec::new(),
            summary: ReportSummary::default(),
            path_bounds: None,
        }
    }

    /// Append a frame outcome and update the summary.
    pub fn push(
        &mut self,
        frame_path: &Path,
        schedule: Option<ScheduledFrame>,
        result: Result<LocateResult, LocateError>,
    ) {
        let (result, error) = match result {
            Ok(r) => {
                match r.outcome {
                    MatchOutcome::Successful => self.summary.successful += 1,
                    MatchOutcome::Ambiguous => self.summary.ambiguous += 1,
                    MatchOutcome::Failed => self.summary.failed += 1,
                }
                (Some(r), None)
            }
            Err(e) => {
                self.summary.errors += 1;
                (None, Some(e.to_string()))
            }
        };
        self.frames.push(FrameReport {
            frame_path: frame_path.to_string_lossy().into_owned(),
            schedule,
            result,
            error,
        });
    }

    /// Record a frame that could not be read at all.
    pub fn push_error(&mut self, frame_path: &Path, error: impl std::fmt::Display) {
        self.summary.errors += 1;
        self.frames.push(FrameReport {
            frame_path: frame_path.to_string_lossy().into_owned(),
            schedule: None,
            result: None,
            error: Some(error.to_string()),
        });
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LocateIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LocateIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
