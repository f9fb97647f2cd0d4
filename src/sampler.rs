//! Per-frame progress sampling for the active clip.
//!
//! `Idle -> Sampling -> Completed`. The sampler owns at most one ticker
//! subscription; it is cancelled when sampling stops, when the pass completes,
//! and whenever a new pass begins.

use crate::clip::ClipId;
use crate::ticker::{Generation, Subscription, Ticker};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SamplerPhase {
    Idle,
    Sampling,
    Completed,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SampleEvent {
    Progress {
        clip: ClipId,
        generation: Generation,
        percent: u8,
    },
    Completed {
        clip: ClipId,
        generation: Generation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pass {
    clip: ClipId,
    generation: Generation,
    duration: f64,
}

#[derive(Debug)]
pub struct ProgressSampler {
    phase: SamplerPhase,
    pass: Option<Pass>,
    last_percent: u8,
    subscription: Option<Subscription>,
}

impl Default for ProgressSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSampler {
    pub fn new() -> Self {
        Self {
            phase: SamplerPhase::Idle,
            pass: None,
            last_percent: 0,
            subscription: None,
        }
    }

    /// Binds the sampler to a new playback pass. Progress restarts from 0.
    pub fn begin_pass(&mut self, ticker: &mut Ticker, clip: ClipId, generation: Generation, duration: f64) {
        self.cancel(ticker);
        self.pass = Some(Pass { clip, generation, duration });
        self.phase = SamplerPhase::Idle;
        self.last_percent = 0;
    }

    /// Idle -> Sampling. Returns false if there is no pass or it already completed.
    pub fn start(&mut self, ticker: &mut Ticker) -> bool {
        let Some(pass) = self.pass else {
            return false;
        };
        match self.phase {
            SamplerPhase::Sampling => true,
            SamplerPhase::Completed => false,
            SamplerPhase::Idle => {
                self.subscription = Some(ticker.subscribe(pass.clip, pass.generation));
                self.phase = SamplerPhase::Sampling;
                tracing::debug!(clip = %pass.clip, generation = pass.generation.0, "Sampling started");
                true
            }
        }
    }

    /// Sampling -> Idle. Progress is kept so a resumed pass continues from it.
    pub fn stop(&mut self, ticker: &mut Ticker) {
        if self.phase == SamplerPhase::Sampling {
            self.cancel(ticker);
            self.phase = SamplerPhase::Idle;
            if let Some(pass) = self.pass {
                tracing::debug!(clip = %pass.clip, percent = self.last_percent, "Sampling stopped");
            }
        }
    }

    /// Handles one ticker callback. Callbacks for any subscription other than
    /// the live one are stale and ignored.
    pub fn sample(&mut self, ticker: &mut Ticker, subscription: &Subscription, current_time: f64) -> Vec<SampleEvent> {
        if self.subscription != Some(*subscription) || self.phase != SamplerPhase::Sampling {
            tracing::trace!(
                clip = %subscription.clip,
                generation = subscription.generation.0,
                "Discarding stale ticker callback"
            );
            return Vec::new();
        }
        self.advance_to(ticker, current_time)
    }

    /// Takes a final sample at the end of the pass, so the pass completes even
    /// if the media ended between two frames.
    pub fn finish(&mut self, ticker: &mut Ticker, clip: ClipId, generation: Generation) -> Vec<SampleEvent> {
        match self.pass {
            Some(pass) if pass.clip == clip && pass.generation == generation && self.phase != SamplerPhase::Completed => {
                self.advance_to(ticker, pass.duration)
            }
            _ => Vec::new(),
        }
    }

    fn advance_to(&mut self, ticker: &mut Ticker, current_time: f64) -> Vec<SampleEvent> {
        let Some(pass) = self.pass else {
            return Vec::new();
        };

        let fraction = (current_time / pass.duration).clamp(0.0, 1.0);
        let percent = (fraction * 100.0).ceil() as u8;

        let mut events = Vec::new();
        if percent > self.last_percent {
            self.last_percent = percent;
            events.push(SampleEvent::Progress {
                clip: pass.clip,
                generation: pass.generation,
                percent,
            });
        }

        if fraction >= 1.0 {
            self.cancel(ticker);
            self.phase = SamplerPhase::Completed;
            tracing::debug!(clip = %pass.clip, generation = pass.generation.0, "Sampling completed");
            events.push(SampleEvent::Completed {
                clip: pass.clip,
                generation: pass.generation,
            });
        }

        events
    }

    fn cancel(&mut self, ticker: &mut Ticker) {
        if let Some(subscription) = self.subscription.take() {
            ticker.cancel(subscription.id);
        }
    }

    pub fn phase(&self) -> SamplerPhase {
        self.phase
    }

    pub fn clip(&self) -> Option<ClipId> {
        self.pass.map(|p| p.clip)
    }

    pub fn generation(&self) -> Option<Generation> {
        self.pass.map(|p| p.generation)
    }

    /// Last emitted progress, 0.0 to 1.0.
    pub fn fraction(&self) -> f64 {
        f64::from(self.last_percent) / 100.0
    }

    pub fn subscription(&self) -> Option<Subscription> {
        self.subscription
    }
}
