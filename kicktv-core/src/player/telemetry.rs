//! Typed player telemetry
//!
//! The playback engine (external) emits one [`TimeUpdate`] per tick. The
//! tracker consumes these instead of reaching into the player, so the
//! transition table is testable without a real player behind it.

use serde::{Deserialize, Serialize};

/// The `[start, end]` range a live player can currently seek within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekableWindow {
    pub start: f64,
    pub end: f64,
}

impl SeekableWindow {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Width of the window, floored at zero for degenerate inputs.
    #[must_use]
    pub fn span(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// One telemetry tick from the playback engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUpdate {
    /// Current playback position, seconds.
    pub position: f64,
    /// Total duration; absent or non-finite for live content.
    pub duration: Option<f64>,
    /// Seekable window; absent before the player has loaded anything.
    pub seekable: Option<SeekableWindow>,
}

impl TimeUpdate {
    /// Tick for finite (VOD) content.
    #[must_use]
    pub fn finite(position: f64, duration: f64) -> Self {
        Self {
            position,
            duration: Some(duration),
            seekable: None,
        }
    }

    /// Tick for live content with a DVR window.
    #[must_use]
    pub fn live(position: f64, window: SeekableWindow) -> Self {
        Self {
            position,
            duration: None,
            seekable: Some(window),
        }
    }

    /// Tick with no usable timing data yet.
    #[must_use]
    pub fn empty(position: f64) -> Self {
        Self {
            position,
            duration: None,
            seekable: None,
        }
    }
}
