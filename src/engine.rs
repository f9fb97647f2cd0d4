//! The carousel engine: single writer of [`CarouselState`], coordinating the
//! media handles, the progress sampler, the indicator strip and the slide
//! transition.
//!
//! Hosts feed it media signals (`on_loaded_metadata`, `on_play`, `on_ended`),
//! visibility reports, user actions and one `on_frame` call per animation
//! frame, then drain the outbound [`Effect`]s and render them.

use std::collections::HashSet;

use crate::clip::{ClipId, ClipRegistry};
use crate::config::CarouselConfig;
use crate::error::CarouselError;
use crate::indicator::{IndicatorRequest, IndicatorSlot, IndicatorStrip};
use crate::media::{MediaElement, PlaybackHandle, PlaybackHandles};
use crate::sampler::{ProgressSampler, SampleEvent};
use crate::state::{CarouselState, Phase, Transition};
use crate::ticker::{Generation, Ticker};
use crate::transition::{SlideRequest, TransitionDriver, VisibilityTrigger};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MediaCommand {
    Play,
    Pause,
    Rewind,
}

/// Externally observable output of the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Slide(SlideRequest),
    Indicator(IndicatorRequest),
    Media { clip: ClipId, command: MediaCommand },
}

/// What the single control button currently does.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ControlAction {
    Play,
    Pause,
    Replay,
}

pub struct CarouselEngine<M> {
    registry: ClipRegistry,
    state: CarouselState,
    active: ClipId,
    handles: PlaybackHandles<M>,
    counted_ready: HashSet<ClipId>,
    ticker: Ticker,
    sampler: ProgressSampler,
    indicators: IndicatorStrip,
    transition: TransitionDriver,
    visibility: VisibilityTrigger,
    generation: Generation,
    effects: Vec<Effect>,
}

impl<M: MediaElement> CarouselEngine<M> {
    pub fn new(registry: ClipRegistry, config: &CarouselConfig, viewport_width: f32) -> Result<Self, CarouselError> {
        config.validate()?;
        let count = registry.len();
        let state = CarouselState::new(count, config.ready_threshold(count))?;
        let active = registry.get(0)?.id;

        let mut engine = Self {
            indicators: IndicatorStrip::new(count, viewport_width, config),
            transition: TransitionDriver::new(config.slide_duration),
            registry,
            state,
            active,
            handles: PlaybackHandles::new(),
            counted_ready: HashSet::new(),
            ticker: Ticker::new(),
            sampler: ProgressSampler::new(),
            visibility: VisibilityTrigger::default(),
            generation: Generation::default(),
            effects: Vec::new(),
        };
        engine.activate(0, false)?;
        tracing::info!(clips = count, threshold = engine.state.ready_threshold(), "Carousel ready");
        Ok(engine)
    }

    // --- Mounting ---

    /// Attaches a media element to a clip. Returns the element it replaces.
    pub fn mount(&mut self, clip: ClipId, media: M) -> Result<Option<M>, CarouselError> {
        let index = self.index_of(clip)?;
        let previous = self.handles.mount(clip, media).map(|mut old| {
            if !old.is_paused() {
                old.pause();
            }
            old
        });
        if index == self.state.active_index() {
            if let Some(handle) = self.handles.get_mut(clip) {
                handle.arm(self.generation);
            }
            self.sync()?;
        }
        tracing::debug!(clip = %clip, index, "Media mounted");
        Ok(previous)
    }

    pub fn unmount(&mut self, clip: ClipId) -> Option<M> {
        if self.sampler.clip() == Some(clip) {
            self.sampler.stop(&mut self.ticker);
        }
        let media = self.handles.unmount(clip);
        if media.is_some() {
            tracing::debug!(clip = %clip, "Media unmounted");
        }
        media
    }

    // --- Media signals ---

    pub fn on_loaded_metadata(&mut self, clip: ClipId) -> Result<(), CarouselError> {
        self.index_of(clip)?;
        let Some(handle) = self.handles.get_mut(clip) else {
            tracing::trace!(clip = %clip, "Metadata for unmounted clip ignored");
            return Ok(());
        };
        if !handle.mark_ready() {
            return Ok(());
        }
        // A remounted element becomes ready again but counts once per clip.
        if self.counted_ready.insert(clip) {
            self.state.apply(Transition::MetadataLoaded)?;
            tracing::debug!(clip = %clip, ready = self.state.ready_count(), "Clip ready");
        } else {
            tracing::debug!(clip = %clip, "Remounted clip ready");
        }
        self.sync()
    }

    /// The media element reports that it started playing.
    pub fn on_play(&mut self, clip: ClipId) -> Result<(), CarouselError> {
        self.index_of(clip)?;
        let really_playing = self.handles.get(clip).is_some_and(|h| !h.is_paused());
        if clip != self.active_clip() || !really_playing {
            tracing::trace!(clip = %clip, "Stale play signal discarded");
            return Ok(());
        }
        if !self.state.is_playing() {
            self.state.apply(Transition::StartPlay)?;
        }
        self.sync()
    }

    pub fn on_ended(&mut self, clip: ClipId) -> Result<(), CarouselError> {
        let index = self.index_of(clip)?;
        let Some(generation) = self.handles.get_mut(clip).and_then(PlaybackHandle::take_ended) else {
            tracing::trace!(clip = %clip, "Repeated or unarmed ended signal discarded");
            return Ok(());
        };
        if index != self.state.active_index() || generation != self.generation {
            tracing::trace!(clip = %clip, generation = generation.0, "Stale ended signal discarded");
            return Ok(());
        }

        let was_playing = self.state.is_playing();
        let events = self.sampler.finish(&mut self.ticker, clip, generation);
        self.apply_samples(events, was_playing);

        if index == self.state.last_index() {
            self.state.apply(Transition::LastClipEnd(index))?;
            tracing::info!(clip = %clip, "Last clip finished");
            self.sync()
        } else {
            let applied = self.state.apply(Transition::ClipEnd(index))?;
            tracing::info!(clip = %clip, next = index + 1, "Clip finished");
            match applied.activated {
                Some(next) => self.activate(next, true),
                None => self.sync(),
            }
        }
    }

    /// The armed clip entered the viewport.
    pub fn on_visible(&mut self, clip: ClipId) -> Result<(), CarouselError> {
        if !self.visibility.on_visible(clip) {
            return Ok(());
        }
        tracing::debug!(clip = %clip, "Clip became visible");
        self.state.apply(Transition::StartPlay)?;
        self.sync()
    }

    // --- User actions ---

    pub fn toggle_play(&mut self) -> Result<(), CarouselError> {
        self.state.apply(Transition::TogglePlay)?;
        self.sync()
    }

    /// Replays from the first clip. Only valid once the last clip finished.
    pub fn replay(&mut self) -> Result<(), CarouselError> {
        self.state.apply(Transition::Reset)?;
        let requests = self.indicators.rest_all();
        self.effects.extend(requests.into_iter().map(Effect::Indicator));
        tracing::info!("Replaying from the first clip");
        self.activate(0, true)
    }

    pub fn control_action(&self) -> ControlAction {
        if self.state.is_last_clip() {
            ControlAction::Replay
        } else if !self.state.is_playing() {
            ControlAction::Play
        } else {
            ControlAction::Pause
        }
    }

    pub fn press_control(&mut self) -> Result<ControlAction, CarouselError> {
        let action = self.control_action();
        match action {
            ControlAction::Replay => self.replay()?,
            ControlAction::Play | ControlAction::Pause => self.toggle_play()?,
        }
        Ok(action)
    }

    pub fn set_viewport(&mut self, width_px: f32) {
        let requests = self.indicators.set_viewport(width_px);
        self.effects.extend(requests.into_iter().map(Effect::Indicator));
    }

    // --- Frame ticker ---

    /// One animation frame: runs every live ticker subscription.
    pub fn on_frame(&mut self) {
        let due = self.ticker.tick();
        for subscription in due {
            if !self.ticker.is_live(&subscription) {
                continue;
            }
            let Some(current_time) = self.handles.get(subscription.clip).map(PlaybackHandle::current_time) else {
                continue;
            };
            let events = self.sampler.sample(&mut self.ticker, &subscription, current_time);
            self.apply_samples(events, self.state.is_playing());
        }
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // --- Internals ---

    /// Makes `index` the active clip for a fresh pass. `resume` forces playback on.
    fn activate(&mut self, index: usize, resume: bool) -> Result<(), CarouselError> {
        let clip = self.registry.get(index)?;
        let (id, duration) = (clip.id, clip.duration_seconds);

        self.active = id;
        self.generation = self.generation.next();
        if let Some(handle) = self.handles.get_mut(id) {
            if handle.arm(self.generation) {
                self.effects.push(Effect::Media { clip: id, command: MediaCommand::Rewind });
            }
        }
        self.sampler.begin_pass(&mut self.ticker, id, self.generation, duration);

        // A restart from the first clip never shows a stale full bar.
        if index == 0 {
            if let Some(request) = self.indicators.restart(0) {
                self.effects.push(Effect::Indicator(request));
            }
        }

        let slide = self.transition.slide_to(index);
        self.effects.push(Effect::Slide(slide));
        self.visibility.arm(id);

        if resume {
            self.state.apply(Transition::ClipArmed(index))?;
        }
        tracing::debug!(clip = %id, index, generation = self.generation.0, "Clip activated");
        self.sync()
    }

    /// Brings media and sampling in line with the current state.
    fn sync(&mut self) -> Result<(), CarouselError> {
        let clip = self.active_clip();

        if self.state.phase() == Phase::Finished {
            self.sampler.stop(&mut self.ticker);
            return Ok(());
        }
        if !self.state.sampling_permitted() {
            return Ok(());
        }

        let Some(handle) = self.handles.get_mut(clip) else {
            tracing::warn!(clip = %clip, "Active clip has no mounted media");
            self.sampler.stop(&mut self.ticker);
            return Ok(());
        };

        if !self.state.is_playing() {
            if handle.pause() {
                self.effects.push(Effect::Media { clip, command: MediaCommand::Pause });
            }
            self.sampler.stop(&mut self.ticker);
        } else if self.state.start_play() && handle.is_ready() {
            if handle.play() {
                self.effects.push(Effect::Media { clip, command: MediaCommand::Play });
            }
            self.sampler.start(&mut self.ticker);
        } else {
            // Nothing is sampled from a handle that has not loaded.
            self.sampler.stop(&mut self.ticker);
        }
        Ok(())
    }

    fn apply_samples(&mut self, events: Vec<SampleEvent>, was_playing: bool) {
        for event in events {
            let request = match event {
                SampleEvent::Progress { clip, percent, .. } => self
                    .registry
                    .index_of(clip)
                    .and_then(|i| self.indicators.progress(i, percent)),
                SampleEvent::Completed { clip, .. } => self
                    .registry
                    .index_of(clip)
                    .and_then(|i| self.indicators.complete(i, was_playing)),
            };
            if let Some(request) = request {
                self.effects.push(Effect::Indicator(request));
            }
        }
    }

    fn index_of(&self, clip: ClipId) -> Result<usize, CarouselError> {
        self.registry.index_of(clip).ok_or(CarouselError::UnknownClip(clip))
    }

    // --- Accessors ---

    pub fn active_clip(&self) -> ClipId {
        debug_assert_eq!(self.registry.index_of(self.active), Some(self.state.active_index()));
        self.active
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn registry(&self) -> &ClipRegistry {
        &self.registry
    }

    pub fn indicators(&self) -> &[IndicatorSlot] {
        self.indicators.slots()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn sampler(&self) -> &ProgressSampler {
        &self.sampler
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn slide(&self) -> Option<SlideRequest> {
        self.transition.current()
    }

    pub fn handle(&self, clip: ClipId) -> Option<&PlaybackHandle<M>> {
        self.handles.get(clip)
    }

    pub fn media_mut(&mut self, clip: ClipId) -> Option<&mut M> {
        self.handles.get_mut(clip).map(PlaybackHandle::media_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipDescriptor;
    use crate::indicator::{SlotFill, SlotWidth};
    use crate::media::SimulatedMedia;
    use crate::sampler::SamplerPhase;
    use crate::simulation::Simulation;

    const DT: f64 = 1.0 / 60.0;

    fn registry(durations: &[f64]) -> ClipRegistry {
        let clips = durations
            .iter()
            .enumerate()
            .map(|(i, d)| ClipDescriptor::new(i as u32 + 1, "clip.mp4", *d, &[]))
            .collect();
        ClipRegistry::new(clips).unwrap()
    }

    fn offsets(effects: &[Effect]) -> Vec<f32> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Slide(s) => Some(s.offset_percent),
                _ => None,
            })
            .collect()
    }

    fn indicator_updates(effects: &[Effect]) -> usize {
        effects.iter().filter(|e| matches!(e, Effect::Indicator(_))).count()
    }

    fn started(durations: &[f64]) -> Simulation {
        let mut sim = Simulation::instant(registry(durations), &CarouselConfig::default(), 1440.0).unwrap();
        sim.step(DT).unwrap();
        sim.engine_mut().on_visible(ClipId(1)).unwrap();
        sim.engine_mut().drain_effects();
        sim
    }

    fn step_until_active(sim: &mut Simulation, index: usize) {
        for _ in 0..10_000 {
            if sim.engine().state().active_index() == index {
                return;
            }
            sim.step(DT).unwrap();
        }
        panic!("clip {index} never became active");
    }

    #[test]
    fn full_pass_then_replay() {
        let mut sim = Simulation::instant(registry(&[3.0, 2.0, 4.0, 1.0]), &CarouselConfig::default(), 1440.0).unwrap();
        assert_eq!(sim.engine().state().active_index(), 0);
        assert!(!sim.engine().state().is_playing());
        assert_eq!(offsets(&sim.engine_mut().drain_effects()), vec![0.0]);

        // Metadata arrives, but nothing plays until the clip is visible.
        sim.step(DT).unwrap();
        assert!(sim.engine().state().sampling_permitted());
        assert_eq!(sim.engine().ticker().active_count(), 0);
        assert!(sim.engine().handle(ClipId(1)).unwrap().is_paused());

        sim.engine_mut().on_visible(ClipId(1)).unwrap();
        assert!(sim.engine().state().is_playing());
        assert_eq!(sim.engine().ticker().active_count(), 1);
        assert!(
            sim.engine_mut()
                .drain_effects()
                .contains(&Effect::Media { clip: ClipId(1), command: MediaCommand::Play })
        );

        let mut seen = Vec::new();
        while sim.engine().state().active_index() == 0 {
            seen.extend(offsets(&sim.step(DT).unwrap()));
        }
        assert_eq!(seen, vec![-100.0]);
        assert!((sim.elapsed() - 3.0).abs() < 4.0 * DT, "clip 0 ended at {}", sim.elapsed());
        assert!(sim.engine().indicators()[0].collapsed);
        assert!(sim.engine().state().is_playing());

        let finished = sim
            .run_until_finished(DT, 10_000, |engine, effects| {
                seen.extend(offsets(&effects));
                assert!(engine.ticker().active_count() <= 1);
                Ok(())
            })
            .unwrap();
        assert!(finished);
        assert_eq!(seen, vec![-100.0, -200.0, -300.0]);
        assert_eq!(sim.engine().state().active_index(), 3);
        assert_eq!(sim.engine().slide().unwrap().offset_percent, -300.0);
        assert!(sim.engine().indicators().iter().all(|s| s.collapsed));

        // Terminal: no further advance.
        for _ in 0..120 {
            assert!(offsets(&sim.step(DT).unwrap()).is_empty());
        }
        assert_eq!(sim.engine().state().active_index(), 3);
        assert_eq!(sim.engine().control_action(), ControlAction::Replay);

        let before = sim.engine().generation();
        assert_eq!(sim.engine_mut().press_control().unwrap(), ControlAction::Replay);
        let effects = sim.engine_mut().drain_effects();
        assert_eq!(offsets(&effects), vec![0.0]);
        assert!(effects.contains(&Effect::Media { clip: ClipId(1), command: MediaCommand::Rewind }));

        let engine = sim.engine();
        assert_eq!(engine.state().active_index(), 0);
        assert!(!engine.state().is_last_clip());
        assert!(engine.state().is_playing());
        assert!(engine.generation() > before);
        assert_eq!(engine.sampler().fraction(), 0.0);
        for slot in engine.indicators() {
            assert!(slot.is_resting());
            assert!(!slot.collapsed);
            assert_eq!(slot.progress_fraction, 0.0);
        }
    }

    #[test]
    fn pausing_freezes_the_indicator() {
        let mut sim = started(&[3.0, 2.0, 4.0, 1.0]);
        step_until_active(&mut sim, 1);
        for _ in 0..30 {
            sim.step(DT).unwrap();
        }
        let frozen = sim.engine().indicators()[1].progress_fraction;
        assert!(frozen > 0.0);

        sim.engine_mut().press_control().unwrap();
        assert!(!sim.engine().state().is_playing());
        assert_eq!(sim.engine().ticker().active_count(), 0);
        assert_eq!(sim.engine().sampler().phase(), SamplerPhase::Idle);
        assert!(
            sim.engine_mut()
                .drain_effects()
                .contains(&Effect::Media { clip: ClipId(2), command: MediaCommand::Pause })
        );

        let position = sim.engine().handle(ClipId(2)).unwrap().current_time();
        for _ in 0..60 {
            assert_eq!(indicator_updates(&sim.step(DT).unwrap()), 0);
        }
        assert_eq!(sim.engine().indicators()[1].progress_fraction, frozen);
        assert_eq!(sim.engine().handle(ClipId(2)).unwrap().current_time(), position);
        assert_eq!(sim.engine().state().active_index(), 1);

        sim.engine_mut().press_control().unwrap();
        assert_eq!(sim.engine().ticker().active_count(), 1);
        for _ in 0..30 {
            sim.step(DT).unwrap();
        }
        assert!(sim.engine().indicators()[1].progress_fraction > frozen);
    }

    #[test]
    fn progress_is_monotonic_within_a_pass() {
        let mut sim = started(&[2.0, 1.0]);
        let mut last = 0.0;
        while sim.engine().state().active_index() == 0 {
            sim.step(DT).unwrap();
            let fraction = sim.engine().indicators()[0].progress_fraction;
            assert!(fraction >= last);
            last = fraction;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn indicator_widens_while_playing() {
        let mut sim = started(&[2.0, 1.0]);
        for _ in 0..10 {
            sim.step(DT).unwrap();
        }
        let slot = &sim.engine().indicators()[0];
        assert_eq!(slot.width, SlotWidth::InProgress { vw: 4.0 });
        assert_eq!(slot.fill, SlotFill::Active);

        sim.engine_mut().set_viewport(700.0);
        let effects = sim.engine_mut().drain_effects();
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Indicator(r) if r.slot == 0 && r.width == SlotWidth::InProgress { vw: 10.0 }
        )));
    }

    #[test]
    fn toggle_twice_changes_nothing_else() {
        let mut sim = started(&[3.0, 2.0]);
        let before = sim.engine().state().clone();
        sim.engine_mut().toggle_play().unwrap();
        sim.engine_mut().toggle_play().unwrap();
        assert_eq!(sim.engine().state(), &before);
        assert_eq!(sim.engine().ticker().active_count(), 1);
    }

    #[test]
    fn sampling_waits_for_ready_threshold() {
        let mut sim = Simulation::new(registry(&[1.0; 6]), &CarouselConfig::default(), 1440.0, |i, clip| {
            let media = SimulatedMedia::new(clip.duration_seconds);
            if i == 3 { media.with_load_delay(0.5) } else { media }
        })
        .unwrap();
        sim.step(DT).unwrap();
        sim.engine_mut().on_visible(ClipId(1)).unwrap();
        assert_eq!(sim.engine().state().ready_count(), 5);

        let mut sim = Simulation::new(registry(&[1.0; 6]), &CarouselConfig::default(), 1440.0, |i, clip| {
            let media = SimulatedMedia::new(clip.duration_seconds);
            if i >= 3 { media.with_load_delay(0.5) } else { media }
        })
        .unwrap();
        sim.step(DT).unwrap();
        sim.engine_mut().on_visible(ClipId(1)).unwrap();
        assert_eq!(sim.engine().state().ready_count(), 3);
        assert!(sim.engine().state().is_playing());
        assert_eq!(sim.engine().ticker().active_count(), 0);
        assert!(sim.engine().handle(ClipId(1)).unwrap().is_paused());

        while sim.engine().state().ready_count() < 4 {
            sim.step(DT).unwrap();
        }
        assert_eq!(sim.engine().ticker().active_count(), 1);
        assert!(!sim.engine().handle(ClipId(1)).unwrap().is_paused());
    }

    #[test]
    fn unready_clip_stops_auto_advance() {
        let config = CarouselConfig { min_ready_clips: 1, ..CarouselConfig::default() };
        let mut sim = Simulation::new(registry(&[0.5, 0.5, 0.5]), &config, 1440.0, |i, clip| {
            let media = SimulatedMedia::new(clip.duration_seconds);
            if i == 1 { media.never_loads() } else { media }
        })
        .unwrap();
        sim.step(DT).unwrap();
        sim.engine_mut().on_visible(ClipId(1)).unwrap();

        for _ in 0..600 {
            sim.step(DT).unwrap();
        }
        let state = sim.engine().state();
        assert_eq!(state.active_index(), 1);
        assert!(!state.is_last_clip());
        assert_eq!(sim.engine().ticker().active_count(), 0);
    }

    #[test]
    fn stale_and_repeated_signals_are_ignored() {
        let mut sim = started(&[3.0, 2.0, 1.0]);
        let before = sim.engine().state().clone();

        sim.engine_mut().on_ended(ClipId(3)).unwrap();
        sim.engine_mut().on_play(ClipId(2)).unwrap();
        sim.engine_mut().on_loaded_metadata(ClipId(1)).unwrap();
        assert_eq!(sim.engine().state(), &before);

        assert_eq!(sim.engine_mut().on_ended(ClipId(42)).unwrap_err(), CarouselError::UnknownClip(ClipId(42)));

        sim.engine_mut().on_ended(ClipId(1)).unwrap();
        assert_eq!(sim.engine().state().active_index(), 1);
        sim.engine_mut().on_ended(ClipId(1)).unwrap();
        assert_eq!(sim.engine().state().active_index(), 1);
    }

    #[test]
    fn replay_before_the_end_is_rejected() {
        let mut sim = started(&[3.0, 2.0]);
        let before = sim.engine().state().clone();
        assert!(matches!(
            sim.engine_mut().replay(),
            Err(CarouselError::PreconditionViolated { transition: "reset", .. })
        ));
        assert_eq!(sim.engine().state(), &before);
    }

    #[test]
    fn advancing_resumes_a_paused_carousel() {
        let mut sim = started(&[3.0, 2.0, 1.0]);
        for _ in 0..30 {
            sim.step(DT).unwrap();
        }
        sim.engine_mut().toggle_play().unwrap();
        assert!(!sim.engine().state().is_playing());

        // The host reports the end while paused (e.g. a seek past the end).
        sim.engine_mut().on_ended(ClipId(1)).unwrap();
        let engine = sim.engine();
        assert_eq!(engine.state().active_index(), 1);
        assert!(engine.state().is_playing());
        assert!(!engine.state().is_end_of_clip());
        assert!(!engine.indicators()[0].collapsed);
        assert_eq!(engine.ticker().active_count(), 1);
    }

    #[test]
    fn unmounting_the_active_clip_stops_sampling() {
        let mut sim = started(&[3.0, 2.0]);
        assert_eq!(sim.engine().ticker().active_count(), 1);
        assert!(sim.engine_mut().unmount(ClipId(1)).is_some());
        assert_eq!(sim.engine().ticker().active_count(), 0);
        for _ in 0..10 {
            sim.step(DT).unwrap();
        }
        assert_eq!(sim.engine().ticker().active_count(), 0);
        assert!(sim.engine_mut().mount(ClipId(9), SimulatedMedia::new(1.0)).is_err());
    }

    #[test]
    fn remounted_active_clip_plays_through() {
        let mut sim = started(&[3.0, 2.0]);
        for _ in 0..30 {
            sim.step(DT).unwrap();
        }
        assert!(sim.engine_mut().unmount(ClipId(1)).is_some());
        assert!(sim.engine_mut().mount(ClipId(1), SimulatedMedia::new(3.0)).unwrap().is_none());
        assert_eq!(sim.engine().state().ready_count(), 2);

        sim.step(DT).unwrap();
        let handle = sim.engine().handle(ClipId(1)).unwrap();
        assert!(handle.is_ready());
        assert!(!handle.is_paused());
        assert_eq!(sim.engine().state().ready_count(), 2);
        assert_eq!(sim.engine().ticker().active_count(), 1);

        for _ in 0..600 {
            sim.step(DT).unwrap();
        }
        assert_eq!(sim.engine().state().active_index(), 1);
        assert!(sim.engine().indicators()[0].collapsed);
    }

    #[test]
    fn replacing_the_active_media_stops_sampling_until_it_loads() {
        let mut sim = started(&[3.0, 2.0]);
        for _ in 0..30 {
            sim.step(DT).unwrap();
        }
        assert_eq!(sim.engine().sampler().phase(), SamplerPhase::Sampling);

        let replaced = sim
            .engine_mut()
            .mount(ClipId(1), SimulatedMedia::new(3.0).with_load_delay(0.5))
            .unwrap()
            .unwrap();
        assert!(replaced.is_paused());
        assert!(!sim.engine().handle(ClipId(1)).unwrap().is_ready());
        assert_eq!(sim.engine().ticker().active_count(), 0);
        assert_eq!(sim.engine().sampler().phase(), SamplerPhase::Idle);

        for _ in 0..60 {
            sim.step(DT).unwrap();
        }
        assert!(sim.engine().handle(ClipId(1)).unwrap().is_ready());
        assert_eq!(sim.engine().ticker().active_count(), 1);
        assert_eq!(sim.engine().sampler().phase(), SamplerPhase::Sampling);
    }

    #[test]
    fn active_clip_follows_activation() {
        let mut sim = started(&[1.0, 1.0, 1.0]);
        assert_eq!(sim.engine().active_clip(), ClipId(1));
        step_until_active(&mut sim, 2);
        assert_eq!(sim.engine().active_clip(), ClipId(3));
    }

    #[test]
    fn single_clip_carousel_finishes_and_replays() {
        let mut sim = started(&[1.0]);
        assert!(sim.run_until_finished(DT, 1_000, |_, _| Ok(())).unwrap());
        assert_eq!(sim.engine().control_action(), ControlAction::Replay);
        sim.engine_mut().replay().unwrap();
        assert_eq!(sim.engine().state().active_index(), 0);
        assert!(sim.engine().state().is_playing());
    }
}
