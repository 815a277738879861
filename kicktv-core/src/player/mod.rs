//! Client-side playback state
//!
//! The live-edge tracker and its session wrapper. No dependency on the
//! manifest relay; the two meet only through the manifest URLs the relay
//! produces and the external player dereferences.

pub mod display;
pub mod idle;
pub mod session;
pub mod telemetry;
pub mod tracker;

pub use idle::IdleTimeout;
pub use session::{PlaybackSession, PlayerHandle};
pub use telemetry::{SeekableWindow, TimeUpdate};
pub use tracker::{
    LiveEdgeTracker, PlaybackMode, PlaybackSnapshot, SeekRequest, TrackerTunables,
};
