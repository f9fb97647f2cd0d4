//! Synchronization engine for a carousel of short video clips.
//!
//! Keeps the active clip, its per-frame progress indicator and the slide
//! transition in step:
//!
//! ```text
//! CarouselState (active index, playing, finished)
//!     ├── TransitionDriver   slide offset = -100% * active index
//!     ├── PlaybackHandles    play / pause / rewind the active clip's media
//!     ├── ProgressSampler    per-frame ticker subscription while playing
//!     └── IndicatorStrip     bar width / fill, collapse on natural completion
//! ```
//!
//! Rendering, tweening and media decoding belong to the host; the engine
//! only emits [`engine::Effect`]s.

pub mod clip;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod media;
pub mod sampler;
pub mod simulation;
pub mod state;
pub mod ticker;
pub mod transition;

pub use clip::{ClipDescriptor, ClipId, ClipRegistry};
pub use config::CarouselConfig;
pub use engine::{CarouselEngine, ControlAction, Effect, MediaCommand};
pub use error::CarouselError;
pub use media::{MediaElement, MediaSignal, SimulatedMedia};
pub use simulation::Simulation;
pub use state::{CarouselState, Phase, Transition};
