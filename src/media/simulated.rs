use rand::Rng;

use crate::media::{MediaElement, MediaSignal};

/// A media element that plays back in simulated time.
///
/// The host calls [`SimulatedMedia::advance`] once per frame and forwards the
/// returned signals to the engine.
#[derive(Clone, Debug)]
pub struct SimulatedMedia {
    duration: f64,
    position: f64,
    paused: bool,
    load_delay: Option<f64>,
    load_timer: f64,
    loaded: bool,
    ended: bool,
    pending_play: bool,
}

impl SimulatedMedia {
    /// Metadata loads on the first advance.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            position: 0.0,
            paused: true,
            load_delay: Some(0.0),
            load_timer: 0.0,
            loaded: false,
            ended: false,
            pending_play: false,
        }
    }

    pub fn with_load_delay(mut self, seconds: f64) -> Self {
        self.load_delay = Some(seconds);
        self
    }

    pub fn with_random_load_delay<R: Rng>(self, rng: &mut R, max_seconds: f64) -> Self {
        if max_seconds <= 0.0 {
            return self.with_load_delay(0.0);
        }
        let delay = rng.random_range(0.0..max_seconds);
        self.with_load_delay(delay)
    }

    /// A resource that fails to load and never reports metadata.
    pub fn never_loads(mut self) -> Self {
        self.load_delay = None;
        self
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn advance(&mut self, dt: f64) -> Vec<MediaSignal> {
        let mut signals = Vec::new();

        if !self.loaded {
            self.load_timer += dt;
            match self.load_delay {
                Some(delay) if self.load_timer >= delay => {
                    self.loaded = true;
                    signals.push(MediaSignal::LoadedMetadata);
                }
                _ => return signals,
            }
        }

        if self.pending_play {
            self.pending_play = false;
            signals.push(MediaSignal::Played);
        }

        if !self.paused && !self.ended {
            self.position = (self.position + dt).min(self.duration);
            if self.position >= self.duration {
                self.ended = true;
                self.paused = true;
                signals.push(MediaSignal::Ended);
            }
        }

        signals
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&mut self) {
        if !self.paused {
            return;
        }
        // Playing an ended element starts over.
        if self.ended {
            self.ended = false;
            self.position = 0.0;
        }
        self.paused = false;
        self.pending_play = true;
    }

    fn pause(&mut self) {
        self.paused = true;
        self.pending_play = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.duration);
        if self.position < self.duration {
            self.ended = false;
        }
    }
}
