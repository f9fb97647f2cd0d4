//! Playback clock adapter: the media element seam, per-clip handles, and a
//! simulated element for hosts without a decoder.

mod handle;
mod simulated;

pub use handle::{PlaybackHandle, PlaybackHandles};
pub use simulated::SimulatedMedia;

/// An externally owned media resource (a video element, a decoder, a stub).
///
/// `play` and `pause` may be called in any state; implementations treat a
/// call that matches the current state as a no-op.
pub trait MediaElement {
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    fn seek(&mut self, seconds: f64);
}

/// Asynchronous notifications a media element raises towards the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaSignal {
    LoadedMetadata,
    Played,
    Ended,
}
