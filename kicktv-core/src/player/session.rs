//! Playback session
//!
//! Async wrapper around the [`LiveEdgeTracker`]: one session per attached
//! player. Publishes snapshots over a watch channel, drives the player
//! through the [`PlayerHandle`] contract, and owns the one-second
//! elapsed-stream clock. Teardown cancels every timer through a single
//! token; a torn-down session never mutates its channels again.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::telemetry::TimeUpdate;
use super::tracker::{LiveEdgeTracker, PlaybackSnapshot, TrackerTunables};

/// Commands the tracker issues to the external playback engine.
#[async_trait]
pub trait PlayerHandle: Send + Sync {
    async fn seek_to(&self, position: f64);
    async fn play(&self);
    async fn pause(&self);
}

/// One-second wall-clock timer deriving `now - stream_start`.
///
/// Runs only while the session is live and a start time is known; stopping
/// resets the published value to `None`.
struct StreamClock {
    elapsed_tx: watch::Sender<Option<u64>>,
    running: Option<CancellationToken>,
}

impl StreamClock {
    fn new() -> Self {
        let (elapsed_tx, _) = watch::channel(None);
        Self {
            elapsed_tx,
            running: None,
        }
    }

    fn start(&mut self, stream_start: DateTime<Utc>, parent: &CancellationToken) {
        self.stop();

        let cancel = parent.child_token();
        let tx = self.elapsed_tx.clone();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let elapsed = (Utc::now() - stream_start).num_seconds().max(0) as u64;
                        tx.send_replace(Some(elapsed));
                    }
                }
            }
        });

        self.running = Some(cancel);
    }

    fn stop(&mut self) {
        if let Some(cancel) = self.running.take() {
            cancel.cancel();
            self.elapsed_tx.send_replace(None);
        }
    }

    fn is_running(&self) -> bool {
        self.running.is_some()
    }

    fn subscribe(&self) -> watch::Receiver<Option<u64>> {
        self.elapsed_tx.subscribe()
    }
}

/// Per-player playback session.
pub struct PlaybackSession {
    tracker: LiveEdgeTracker,
    player: Arc<dyn PlayerHandle>,
    snapshot_tx: watch::Sender<PlaybackSnapshot>,
    clock: StreamClock,
    stream_start: Option<DateTime<Utc>>,
    cancel: CancellationToken,
    closed: bool,
}

impl PlaybackSession {
    #[must_use]
    pub fn new(player: Arc<dyn PlayerHandle>, tunables: TrackerTunables) -> Self {
        let (snapshot_tx, _) = watch::channel(PlaybackSnapshot::unknown());
        Self {
            tracker: LiveEdgeTracker::new(tunables),
            player,
            snapshot_tx,
            clock: StreamClock::new(),
            stream_start: None,
            cancel: CancellationToken::new(),
            closed: false,
        }
    }

    /// Set (or clear) the broadcast's wall-clock start time.
    pub fn set_stream_start(&mut self, stream_start: Option<DateTime<Utc>>) {
        self.stream_start = stream_start;
        if stream_start.is_none() {
            self.clock.stop();
        }
    }

    /// Watch channel of derived playback snapshots.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Watch channel of elapsed broadcast seconds; `None` while the clock
    /// is stopped.
    #[must_use]
    pub fn elapsed(&self) -> watch::Receiver<Option<u64>> {
        self.clock.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.tracker.snapshot()
    }

    /// Fold one telemetry tick and publish the resulting snapshot.
    pub fn on_time_update(&mut self, update: TimeUpdate) -> PlaybackSnapshot {
        if self.closed {
            return self.tracker.snapshot();
        }

        let snapshot = self.tracker.observe(update);
        self.snapshot_tx.send_replace(snapshot);

        // The elapsed clock only runs for live playback with a known start.
        if snapshot.mode.is_live() {
            if let Some(start) = self.stream_start {
                if !self.clock.is_running() {
                    self.clock.start(start, &self.cancel);
                }
            }
        } else {
            self.clock.stop();
        }

        snapshot
    }

    /// Seek to a scrubber fraction, publishing the optimistic snapshot
    /// before the player confirms with its next tick.
    pub async fn seek_to_fraction(&mut self, fraction: f64) {
        if self.closed {
            return;
        }
        if let Some(request) = self.tracker.seek_to_fraction(fraction) {
            self.snapshot_tx.send_replace(self.tracker.snapshot());
            self.player.seek_to(request.target).await;
        }
    }

    /// Seek to the live edge and resume playback. No-op when no seekable
    /// window has been observed yet.
    pub async fn jump_to_live(&mut self) {
        if self.closed {
            return;
        }
        if let Some(request) = self.tracker.jump_to_live() {
            self.snapshot_tx.send_replace(self.tracker.snapshot());
            self.player.seek_to(request.target).await;
            if request.resume {
                self.player.play().await;
            }
        }
    }

    /// Tear the session down: stops both timers and freezes all channels.
    /// Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel.cancel();
        self.clock.stop();
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.close();
    }
}
