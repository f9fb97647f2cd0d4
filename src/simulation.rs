//! Drives a [`CarouselEngine`] over [`SimulatedMedia`] elements with a fixed
//! frame step. Used by the headless runner, the viewer and the tests.

use rand::Rng;

use crate::clip::{ClipDescriptor, ClipRegistry};
use crate::config::CarouselConfig;
use crate::engine::{CarouselEngine, Effect};
use crate::error::CarouselError;
use crate::media::{MediaSignal, SimulatedMedia};

pub struct Simulation {
    engine: CarouselEngine<SimulatedMedia>,
    elapsed: f64,
    frames: u64,
}

impl Simulation {
    /// Builds the engine and mounts one simulated element per clip, created by `media_for`.
    pub fn new<F>(registry: ClipRegistry, config: &CarouselConfig, viewport_width: f32, mut media_for: F) -> Result<Self, CarouselError>
    where
        F: FnMut(usize, &ClipDescriptor) -> SimulatedMedia,
    {
        let clips: Vec<ClipDescriptor> = registry.iter().cloned().collect();
        let mut engine = CarouselEngine::new(registry, config, viewport_width)?;
        for (i, clip) in clips.iter().enumerate() {
            engine.mount(clip.id, media_for(i, clip))?;
        }
        Ok(Self { engine, elapsed: 0.0, frames: 0 })
    }

    /// Every clip loads immediately.
    pub fn instant(registry: ClipRegistry, config: &CarouselConfig, viewport_width: f32) -> Result<Self, CarouselError> {
        Self::new(registry, config, viewport_width, |_, clip| SimulatedMedia::new(clip.duration_seconds))
    }

    /// Clips load after a random latency below `max_delay` seconds; clips listed
    /// in `never_load` never report metadata.
    pub fn with_latency<R: Rng>(
        registry: ClipRegistry,
        config: &CarouselConfig,
        viewport_width: f32,
        rng: &mut R,
        max_delay: f64,
        never_load: &[usize],
    ) -> Result<Self, CarouselError> {
        Self::new(registry, config, viewport_width, |i, clip| {
            let media = SimulatedMedia::new(clip.duration_seconds).with_random_load_delay(&mut *rng, max_delay);
            if never_load.contains(&i) { media.never_loads() } else { media }
        })
    }

    /// Advances every element by `dt`, forwards their signals, then runs one frame.
    pub fn step(&mut self, dt: f64) -> Result<Vec<Effect>, CarouselError> {
        let ids: Vec<_> = self.engine.registry().iter().map(|c| c.id).collect();

        let mut signals = Vec::new();
        for id in ids {
            if let Some(media) = self.engine.media_mut(id) {
                signals.extend(media.advance(dt).into_iter().map(|s| (id, s)));
            }
        }

        for (id, signal) in signals {
            match signal {
                MediaSignal::LoadedMetadata => self.engine.on_loaded_metadata(id)?,
                MediaSignal::Played => self.engine.on_play(id)?,
                MediaSignal::Ended => self.engine.on_ended(id)?,
            }
        }

        self.engine.on_frame();
        self.elapsed += dt;
        self.frames += 1;
        Ok(self.engine.drain_effects())
    }

    /// Steps until the last clip finished. Returns false if `frame_limit` was hit first.
    pub fn run_until_finished<F>(&mut self, dt: f64, frame_limit: u64, mut on_effects: F) -> Result<bool, CarouselError>
    where
        F: FnMut(&mut CarouselEngine<SimulatedMedia>, Vec<Effect>) -> Result<(), CarouselError>,
    {
        let start = self.frames;
        while !self.engine.state().is_last_clip() {
            if self.frames - start >= frame_limit {
                return Ok(false);
            }
            let effects = self.step(dt)?;
            on_effects(&mut self.engine, effects)?;
        }
        Ok(true)
    }

    pub fn engine(&self) -> &CarouselEngine<SimulatedMedia> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CarouselEngine<SimulatedMedia> {
        &mut self.engine
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
