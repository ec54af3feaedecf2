//! Which frames of a recorded sequence to process.
//!
//! Processing starts at the landing time, takes one frame per step interval
//! and stops at the end time (or the end of the recording).

use serde::{Deserialize, Serialize};

/// Timing of a frame sequence, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleParams {
    /// Frames per second of the recording.
    pub fps: f64,
    /// Time of the first frame to process.
    pub landing_time: f64,
    /// Time between processed frames.
    pub step_interval: f64,
    /// Time after which nothing is processed; `None` runs to the last frame.
    pub end_time: Option<f64>,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            fps: 30.0,
            landing_time: 0.0,
            step_interval: 1.0,
            end_time: None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("frame rate must be positive and finite (got {0})")]
    InvalidFps(f64),

    #[error("{which} must be non-negative and finite (got {value})")]
    InvalidTime { which: &'static str, value: f64 },

    #[error("end time {end}s precedes landing time {landing}s")]
    EndBeforeLanding { landing: f64, end: f64 },
}

/// One frame selected by a [`FrameSchedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledFrame {
    /// Zero-based index into the recording.
    pub index: u64,
    /// Progress through the scheduled span, `0..=100`.
    pub percent: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSchedule {
    landing_frame: u64,
    skip: u64,
    end_frame: u64,
    to_process: u64,
}

fn check_time(which: &'static str, value: f64) -> Result<(), ScheduleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScheduleError::InvalidTime { which, value })
    }
}

impl FrameSchedule {
    /// Build the schedule for a recording of `frame_count` frames.
    pub fn new(params: &ScheduleParams, frame_count: u64) -> Result<Self, ScheduleError> {
        let fps = params.fps;
        if !(fps.is_finite() && fps > 0.0) {
            return Err(ScheduleError::InvalidFps(fps));
        }
        check_time("landing_time", params.landing_time)?;
        check_time("step_interval", params.step_interval)?;
        if let Some(end) = params.end_time {
            check_time("end_time", end)?;
            if end < params.landing_time {
                return Err(ScheduleError::EndBeforeLanding {
                    landing: params.landing_time,
                    end,
                });
            }
        }

        let landing_frame = (params.landing_time * fps).floor() as u64;
        let skip = ((params.step_interval * fps).floor() as u64).max(1) - 1;
        let death_frame = params
            .end_time
            .map_or(frame_count, |t| (t * fps).floor() as u64);

        Ok(Self {
            landing_frame,
            skip,
            end_frame: death_frame.min(frame_count),
            to_process: death_frame.saturating_sub(landing_frame),
        })
    }

    #[inline]
    pub fn landing_frame(&self) -> u64 {
        self.landing_frame
    }

    /// Frames skipped between two processed frames.
    #[inline]
    pub fn skip(&self) -> u64 {
        self.skip
    }

    /// First frame index that is never processed.
    #[inline]
    pub fn end_frame(&self) -> u64 {
        self.end_frame
    }

    pub fn frames(&self) -> impl Iterator<Item = ScheduledFrame> + '_ {
        let stride = self.skip + 1;
        (self.landing_frame..self.end_frame)
            .step_by(stride as usize)
            .enumerate()
            .map(move |(k, index)| {
                let processed = k as u64 * stride + 1;
                ScheduledFrame {
                    index,
                    percent: self.percent(processed),
                }
            })
    }

    pub fn len(&self) -> usize {
        self.frames().count()
    }

    pub fn is_empty(&self) -> bool {
        self.landing_frame >= self.end_frame
    }

    fn percent(&self, processed: u64) -> u32 {
        if self.to_process == 0 {
            return 100;
        }
        (processed.saturating_mul(100) / self.to_process).min(100) as u32
    }
}
