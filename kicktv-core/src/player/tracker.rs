//! Live-edge / DVR tracking state machine
//!
//! One tracker per playback session. Every telemetry tick is folded into an
//! immutable [`PlaybackSnapshot`]; seeks produce a [`SeekRequest`] for the
//! player plus an optimistic snapshot update so the UI does not wait for
//! the next tick to confirm.

use crate::config::PlayerConfig;

use super::telemetry::{SeekableWindow, TimeUpdate};

/// Playback mode derived from telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Known finite duration (VOD); has no live edge.
    Finite,
    /// Live and within the behind-live threshold of the edge.
    LiveAtEdge,
    /// Live but trailing the edge by more than the threshold.
    LiveBehind,
    /// Neither duration nor a seekable window available yet.
    Unknown,
}

impl PlaybackMode {
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::LiveAtEdge | Self::LiveBehind)
    }
}

/// Derived state published after every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub mode: PlaybackMode,
    /// Current position, seconds.
    pub position: f64,
    /// Finite duration when known.
    pub duration: Option<f64>,
    /// Last seen seekable window.
    pub seekable: Option<SeekableWindow>,
    /// Scrubber fraction in `[0, 1]`.
    pub progress: f64,
    /// Seconds behind the live edge, `>= 0`.
    pub latency: f64,
    /// True when latency exceeds the behind-live threshold.
    pub behind_live: bool,
    /// Total seekable span, seconds.
    pub buffer_span: f64,
}

impl PlaybackSnapshot {
    /// Snapshot before any telemetry has arrived.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            mode: PlaybackMode::Unknown,
            position: 0.0,
            duration: None,
            seekable: None,
            progress: 0.0,
            latency: 0.0,
            behind_live: false,
            buffer_span: 0.0,
        }
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self::unknown()
    }
}

/// A seek the tracker asks the player to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    /// Absolute target position, seconds.
    pub target: f64,
    /// Whether playback should resume after the seek (jump-to-live).
    pub resume: bool,
}

/// Tracker tunables; defaults match the observed player behavior.
#[derive(Debug, Clone, Copy)]
pub struct TrackerTunables {
    /// Latency above which the session counts as behind live, seconds.
    pub behind_live_threshold: f64,
    /// Progress fraction above which the scrubber snaps to 1.0.
    pub edge_snap_fraction: f64,
}

impl Default for TrackerTunables {
    fn default() -> Self {
        Self {
            behind_live_threshold: 10.0,
            edge_snap_fraction: 0.995,
        }
    }
}

impl From<&PlayerConfig> for TrackerTunables {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            behind_live_threshold: config.behind_live_threshold_seconds,
            edge_snap_fraction: config.edge_snap_fraction,
        }
    }
}

/// Live-edge tracker state machine.
#[derive(Debug, Clone)]
pub struct LiveEdgeTracker {
    tunables: TrackerTunables,
    snapshot: PlaybackSnapshot,
}

impl LiveEdgeTracker {
    #[must_use]
    pub fn new(tunables: TrackerTunables) -> Self {
        Self {
            tunables,
            snapshot: PlaybackSnapshot::unknown(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot
    }

    /// Fold one telemetry tick into a new snapshot.
    ///
    /// Transition rules, in order: a finite positive duration wins and
    /// forces `behind_live` off; otherwise a seekable window drives the
    /// live computation; otherwise everything is unknown.
    pub fn observe(&mut self, update: TimeUpdate) -> PlaybackSnapshot {
        let position = update.position;

        let snapshot = match update.duration {
            Some(duration) if duration.is_finite() && duration > 0.0 => PlaybackSnapshot {
                mode: PlaybackMode::Finite,
                position,
                duration: Some(duration),
                seekable: update.seekable,
                progress: (position / duration).clamp(0.0, 1.0),
                latency: 0.0,
                behind_live: false,
                buffer_span: 0.0,
            },
            _ => match update.seekable {
                Some(window) => self.observe_live(position, window),
                None => PlaybackSnapshot {
                    position,
                    ..PlaybackSnapshot::unknown()
                },
            },
        };

        self.snapshot = snapshot;
        snapshot
    }

    fn observe_live(&self, position: f64, window: SeekableWindow) -> PlaybackSnapshot {
        let latency = (window.end - position).max(0.0);
        let buffer_span = window.end - window.start;
        let behind_live = latency > self.tunables.behind_live_threshold;

        let progress = if window.end > window.start {
            let raw = (position - window.start) / buffer_span;
            if raw > self.tunables.edge_snap_fraction {
                // Anti-jitter: this close to the edge, floating-point noise
                // makes the scrubber flicker below full.
                1.0
            } else {
                raw.clamp(0.0, 1.0)
            }
        } else {
            1.0
        };

        PlaybackSnapshot {
            mode: if behind_live {
                PlaybackMode::LiveBehind
            } else {
                PlaybackMode::LiveAtEdge
            },
            position,
            duration: None,
            seekable: Some(window),
            progress,
            latency,
            behind_live,
            buffer_span,
        }
    }

    /// Translate a scrubber fraction into a player seek.
    ///
    /// In a live mode the latency and behind-live flag are updated
    /// optimistically before the next tick confirms them.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Option<SeekRequest> {
        let fraction = fraction.clamp(0.0, 1.0);

        match self.snapshot.mode {
            PlaybackMode::Finite => {
                let duration = self.snapshot.duration?;
                Some(SeekRequest {
                    target: fraction * duration,
                    resume: false,
                })
            }
            PlaybackMode::LiveAtEdge | PlaybackMode::LiveBehind => {
                let window = self.snapshot.seekable?;
                let target = window.start + fraction * window.span();

                let latency = (window.end - target).max(0.0);
                let behind_live = latency > self.tunables.behind_live_threshold;
                self.snapshot.latency = latency;
                self.snapshot.behind_live = behind_live;
                self.snapshot.mode = if behind_live {
                    PlaybackMode::LiveBehind
                } else {
                    PlaybackMode::LiveAtEdge
                };

                Some(SeekRequest {
                    target,
                    resume: false,
                })
            }
            PlaybackMode::Unknown => None,
        }
    }

    /// Seek to the freshest known edge and resume playback.
    ///
    /// No-op when no seekable window has been observed.
    pub fn jump_to_live(&mut self) -> Option<SeekRequest> {
        let window = self.snapshot.seekable?;

        self.snapshot.latency = 0.0;
        self.snapshot.behind_live = false;
        if self.snapshot.mode.is_live() {
            self.snapshot.mode = PlaybackMode::LiveAtEdge;
            self.snapshot.progress = 1.0;
        }

        Some(SeekRequest {
            target: window.end,
            resume: true,
        })
    }
}

impl Default for LiveEdgeTracker {
    fn default() -> Self {
        Self::new(TrackerTunables::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> LiveEdgeTracker {
        LiveEdgeTracker::default()
    }

    #[test]
    fn test_no_data_yields_unknown() {
        let mut t = tracker();
        let snap = t.observe(TimeUpdate::empty(3.0));

        assert_eq!(snap.mode, PlaybackMode::Unknown);
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.buffer_span, 0.0);
        assert!(!snap.behind_live);
    }

    #[test]
    fn test_finite_progress() {
        let mut t = tracker();
        let snap = t.observe(TimeUpdate::finite(30.0, 120.0));

        assert_eq!(snap.mode, PlaybackMode::Finite);
        assert!((snap.progress - 0.25).abs() < 1e-9);
        assert!(!snap.behind_live);
    }

    #[test]
    fn test_finite_wins_over_seekable_window() {
        let mut t = tracker();
        let snap = t.observe(TimeUpdate {
            position: 30.0,
            duration: Some(120.0),
            seekable: Some(SeekableWindow::new(0.0, 300.0)),
        });

        assert_eq!(snap.mode, PlaybackMode::Finite);
        assert!(!snap.behind_live);
        assert_eq!(snap.latency, 0.0);
    }

    #[test]
    fn test_infinite_duration_treated_as_live() {
        let mut t = tracker();
        let snap = t.observe(TimeUpdate {
            position: 95.0,
            duration: Some(f64::INFINITY),
            seekable: Some(SeekableWindow::new(0.0, 100.0)),
        });

        assert_eq!(snap.mode, PlaybackMode::LiveAtEdge);
        assert_eq!(snap.latency, 5.0);
    }

    #[test]
    fn test_edge_snap() {
        let mut t = tracker();
        let snap = t.observe(TimeUpdate::live(99.6, SeekableWindow::new(0.0, 100.0)));

        // Raw fraction 0.996 > 0.995 snaps to exactly 1.0.
        assert_eq!(snap.progress, 1.0);
    }

    #[test]
    fn test_no_snap_below_threshold() {
        let mut t = tracker();
        let snap = t.observe(TimeUpdate::live(
            215.0,
            SeekableWindow::new(120.0, 220.0),
        ));

        assert_eq!(snap.latency, 5.0);
        assert!(!snap.behind_live);
        // Raw fraction 0.95 is below the snap threshold: reported as-is.
        assert!((snap.progress - 0.95).abs() < 1e-9);
        assert_eq!(snap.buffer_span, 100.0);
    }

    #[test]
    fn test_behind_live_hysteresis() {
        let mut t = tracker();

        let at_threshold = t.observe(TimeUpdate::live(90.0, SeekableWindow::new(0.0, 100.0)));
        assert_eq!(at_threshold.latency, 10.0);
        assert!(!at_threshold.behind_live);
        assert_eq!(at_threshold.mode, PlaybackMode::LiveAtEdge);

        let over = t.observe(TimeUpdate::live(89.99, SeekableWindow::new(0.0, 100.0)));
        assert!(over.latency > 10.0);
        assert!(over.behind_live);
        assert_eq!(over.mode, PlaybackMode::LiveBehind);
    }

    #[test]
    fn test_latency_clamped_non_negative() {
        let mut t = tracker();
        // Position briefly past the reported edge (player jitter).
        let snap = t.observe(TimeUpdate::live(100.4, SeekableWindow::new(0.0, 100.0)));

        assert_eq!(snap.latency, 0.0);
        assert!(!snap.behind_live);
    }

    #[test]
    fn test_zero_width_window() {
        let mut t = tracker();
        let snap = t.observe(TimeUpdate::live(50.0, SeekableWindow::new(50.0, 50.0)));

        assert_eq!(snap.progress, 1.0);
        assert_eq!(snap.buffer_span, 0.0);
    }

    #[test]
    fn test_seek_finite() {
        let mut t = tracker();
        t.observe(TimeUpdate::finite(10.0, 200.0));

        let seek = t.seek_to_fraction(0.5).expect("seekable");
        assert_eq!(seek.target, 100.0);
        assert!(!seek.resume);
    }

    #[test]
    fn test_seek_live_optimistic_update() {
        let mut t = tracker();
        t.observe(TimeUpdate::live(215.0, SeekableWindow::new(120.0, 220.0)));

        // Scrub back to 40% of the DVR window.
        let seek = t.seek_to_fraction(0.4).expect("seekable");
        assert_eq!(seek.target, 160.0);

        // Latency and behind-live updated before any new tick.
        let snap = t.snapshot();
        assert_eq!(snap.latency, 60.0);
        assert!(snap.behind_live);
        assert_eq!(snap.mode, PlaybackMode::LiveBehind);
    }

    #[test]
    fn test_seek_unknown_is_noop() {
        let mut t = tracker();
        assert!(t.seek_to_fraction(0.5).is_none());
    }

    #[test]
    fn test_jump_to_live() {
        let mut t = tracker();
        t.observe(TimeUpdate::live(150.0, SeekableWindow::new(120.0, 220.0)));
        assert!(t.snapshot().behind_live);

        let seek = t.jump_to_live().expect("window known");
        assert_eq!(seek.target, 220.0);
        assert!(seek.resume);

        let snap = t.snapshot();
        assert_eq!(snap.mode, PlaybackMode::LiveAtEdge);
        assert_eq!(snap.latency, 0.0);
        assert!(!snap.behind_live);
    }

    #[test]
    fn test_jump_to_live_without_window_is_noop() {
        let mut t = tracker();
        t.observe(TimeUpdate::empty(0.0));
        assert!(t.jump_to_live().is_none());
    }

    #[test]
    fn test_custom_tunables() {
        let mut t = LiveEdgeTracker::new(TrackerTunables {
            behind_live_threshold: 3.0,
            edge_snap_fraction: 0.9,
        });

        let snap = t.observe(TimeUpdate::live(95.0, SeekableWindow::new(0.0, 100.0)));
        assert!(snap.behind_live);
        assert_eq!(snap.progress, 1.0);
    }
}
