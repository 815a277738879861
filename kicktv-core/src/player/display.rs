//! Derived display strings for the playback UI
//!
//! Nothing here is stored; the client recomputes these from the latest
//! snapshot and the elapsed-stream clock on every render.

use super::tracker::{PlaybackMode, PlaybackSnapshot};

/// Format a second count as `h:mm:ss`, or `mm:ss` below one hour.
///
/// Negative inputs format their absolute value; the caller adds the sign.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let abs = seconds.abs();
    let h = (abs / 3600.0).floor() as u64;
    let m = ((abs % 3600.0) / 60.0).floor() as u64;
    let s = (abs % 60.0).floor() as u64;

    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Primary time label for the current snapshot.
///
/// Finite content shows `position / duration`; a live session behind the
/// edge shows negative latency; at the edge (or with no data) the label is
/// empty and the client shows its live badge instead.
#[must_use]
pub fn time_display(snapshot: &PlaybackSnapshot) -> String {
    match snapshot.mode {
        PlaybackMode::Finite => {
            let duration = snapshot.duration.unwrap_or(0.0);
            format!(
                "{} / {}",
                format_time(snapshot.position),
                format_time(duration)
            )
        }
        PlaybackMode::LiveBehind => format!("-{}", format_time(snapshot.latency)),
        PlaybackMode::LiveAtEdge | PlaybackMode::Unknown => String::new(),
    }
}

/// Secondary label: wall-clock offset into the broadcast at the currently
/// displayed position, floored at zero.
#[must_use]
pub fn elapsed_display(elapsed_secs: u64, latency: f64) -> String {
    let at_position = (elapsed_secs as f64 - latency).max(0.0);
    format_time(at_position)
}
