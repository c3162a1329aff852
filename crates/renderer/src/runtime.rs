use std::path::PathBuf;
use std::time::{Duration, Instant};

use blobfield::{BoxedTimeSource, FixedTimeSource, SystemTimeSource};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames animate continuously, pin to a
/// fixed timestamp, or get written to disk once.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally capping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Present a single frame evaluated at an optional timestamp.
    Still {
        /// Specific timestamp to evaluate the scene at (seconds).
        time: Option<f32>,
    },
    /// Evaluate one frame through the CPU reference path and write it out.
    Export {
        /// Specific timestamp to evaluate the scene at (seconds).
        time: Option<f32>,
        /// Destination path for the exported file.
        path: PathBuf,
        /// Output format the user requested.
        format: ExportFormat,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// File formats supported by the still-export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
}

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemTimeSource::new()),
        RenderPolicy::Still { time } | RenderPolicy::Export { time, .. } => {
            Box::new(FixedTimeSource::new(time.unwrap_or(0.0)))
        }
    }
}

/// Paces redraw requests for the event loop.
///
/// Uncapped animation renders on every callback; a capped policy spaces
/// frames by deadline; still policies render exactly once until reset.
pub(crate) struct FrameScheduler {
    interval: Option<Duration>,
    one_shot: bool,
    last_rendered: Option<Instant>,
    rendered_once: bool,
}

impl FrameScheduler {
    pub fn new(policy: &RenderPolicy) -> Self {
        let (interval, one_shot) = match policy {
            RenderPolicy::Animate { target_fps } => (
                target_fps
                    .filter(|fps| *fps > 0.0)
                    .map(|fps| Duration::from_secs_f32(1.0 / fps)),
                false,
            ),
            RenderPolicy::Still { .. } | RenderPolicy::Export { .. } => (None, true),
        };
        Self {
            interval,
            one_shot,
            last_rendered: None,
            rendered_once: false,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if self.one_shot {
            return !self.rendered_once;
        }
        match (self.interval, self.last_rendered) {
            (None, _) | (Some(_), None) => true,
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        if self.one_shot {
            return None;
        }
        match (self.interval, self.last_rendered) {
            (Some(interval), Some(last)) => Some(last + interval),
            _ => None,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.rendered_once = true;
        self.last_rendered = Some(now);
    }

    pub fn reset(&mut self) {
        self.rendered_once = false;
        self.last_rendered = None;
    }
}
