//! Carousel state and its transition table.
//!
//! The state tuple is only ever changed through [`CarouselState::apply`].
//! Each transition checks its precondition before touching any field, so a
//! rejected transition leaves the state exactly as it was.

use crate::error::CarouselError;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Transition {
    /// Clip `i` finished and is not the last clip.
    ClipEnd(usize),
    /// The last clip `i` finished.
    LastClipEnd(usize),
    /// Replay from the first clip after the last one finished.
    Reset,
    TogglePlay,
    /// One more clip reported loaded metadata.
    MetadataLoaded,
    /// Autoplay authorised (visibility trigger or the media's own play signal).
    StartPlay,
    /// Clip `i` was armed for a new pass after becoming active; playback resumes.
    ClipArmed(usize),
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::ClipEnd(_) => "clip-end",
            Transition::LastClipEnd(_) => "last-clip-end",
            Transition::Reset => "reset",
            Transition::TogglePlay => "toggle-play",
            Transition::MetadataLoaded => "metadata-loaded",
            Transition::StartPlay => "start-play",
            Transition::ClipArmed(_) => "clip-armed",
        }
    }
}

/// Exactly one of these holds at any time.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Phase {
    Playing,
    Paused,
    Finished, // Last clip done, waiting for a replay
}

/// What a successful transition asks the engine to do next.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Applied {
    /// A new active index that must be armed and slid into view.
    pub activated: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselState {
    clip_count: usize,
    ready_threshold: usize,

    active_index: usize,
    is_end_of_clip: bool,
    is_last_clip: bool,
    is_playing: bool,
    start_play: bool,
    ready_count: usize,
}

impl CarouselState {
    pub fn new(clip_count: usize, ready_threshold: usize) -> Result<Self, CarouselError> {
        if clip_count == 0 {
            return Err(CarouselError::EmptyRegistry);
        }
        Ok(Self {
            clip_count,
            ready_threshold: ready_threshold.min(clip_count),
            active_index: 0,
            is_end_of_clip: false,
            is_last_clip: false,
            is_playing: false,
            start_play: false,
            ready_count: 0,
        })
    }

    pub fn apply(&mut self, transition: Transition) -> Result<Applied, CarouselError> {
        self.check(transition)?;

        let mut applied = Applied::default();
        match transition {
            Transition::ClipEnd(i) => {
                self.is_end_of_clip = true;
                self.active_index = i + 1;
                applied.activated = Some(self.active_index);
            }
            Transition::LastClipEnd(_) => {
                self.is_last_clip = true;
            }
            Transition::Reset => {
                self.is_last_clip = false;
                self.active_index = 0;
                applied.activated = Some(0);
            }
            Transition::TogglePlay => {
                self.is_playing = !self.is_playing;
            }
            Transition::MetadataLoaded => {
                self.ready_count += 1;
            }
            Transition::StartPlay => {
                self.start_play = true;
                self.is_playing = true;
            }
            Transition::ClipArmed(_) => {
                self.is_end_of_clip = false;
                self.is_playing = true;
            }
        }

        debug_assert!(self.invariants_hold(), "invariant broken by {}", transition.name());
        tracing::debug!(
            transition = transition.name(),
            active = self.active_index,
            playing = self.is_playing,
            last = self.is_last_clip,
            ready = self.ready_count,
            "Transition applied"
        );
        Ok(applied)
    }

    fn check(&self, transition: Transition) -> Result<(), CarouselError> {
        let name = transition.name();
        match transition {
            Transition::ClipEnd(i) => {
                self.check_index(i)?;
                if i == self.last_index() {
                    return Err(CarouselError::rejected(name, format!("clip {i} is the last clip")));
                }
                if self.is_last_clip {
                    return Err(CarouselError::rejected(name, "carousel already finished"));
                }
                self.check_active(name, i)
            }
            Transition::LastClipEnd(i) => {
                self.check_index(i)?;
                if i != self.last_index() {
                    return Err(CarouselError::rejected(name, format!("clip {i} is not the last clip")));
                }
                if self.is_last_clip {
                    return Err(CarouselError::rejected(name, "carousel already finished"));
                }
                self.check_active(name, i)
            }
            Transition::Reset => {
                if !self.is_last_clip {
                    return Err(CarouselError::rejected(name, "last clip has not finished"));
                }
                Ok(())
            }
            Transition::MetadataLoaded => {
                if self.ready_count >= self.clip_count {
                    return Err(CarouselError::rejected(name, "every clip is already ready"));
                }
                Ok(())
            }
            Transition::ClipArmed(i) => {
                self.check_index(i)?;
                self.check_active(name, i)
            }
            Transition::TogglePlay | Transition::StartPlay => Ok(()),
        }
    }

    fn check_index(&self, i: usize) -> Result<(), CarouselError> {
        if i >= self.clip_count {
            return Err(CarouselError::IndexOutOfRange { index: i, len: self.clip_count });
        }
        Ok(())
    }

    fn check_active(&self, name: &'static str, i: usize) -> Result<(), CarouselError> {
        if self.active_index != i {
            return Err(CarouselError::rejected(
                name,
                format!("clip {i} is not active (active is {})", self.active_index),
            ));
        }
        Ok(())
    }

    pub fn invariants_hold(&self) -> bool {
        self.active_index < self.clip_count
            && (!self.is_last_clip || self.active_index == self.last_index())
            && self.ready_count <= self.clip_count
    }

    pub fn phase(&self) -> Phase {
        if self.is_last_clip {
            Phase::Finished
        } else if self.is_playing {
            Phase::Playing
        } else {
            Phase::Paused
        }
    }

    /// Sampling and media commands are held back until enough clips are ready.
    pub fn sampling_permitted(&self) -> bool {
        self.ready_count >= self.ready_threshold
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn clip_count(&self) -> usize {
        self.clip_count
    }

    pub fn last_index(&self) -> usize {
        self.clip_count - 1
    }

    pub fn is_end_of_clip(&self) -> bool {
        self.is_end_of_clip
    }

    pub fn is_last_clip(&self) -> bool {
        self.is_last_clip
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn start_play(&self) -> bool {
        self.start_play
    }

    pub fn ready_count(&self) -> usize {
        self.ready_count
    }

    pub fn ready_threshold(&self) -> usize {
        self.ready_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(count: usize) -> CarouselState {
        CarouselState::new(count, 4).unwrap()
    }

    #[test]
    fn clip_end_advances_and_flags_end() {
        let mut s = state(4);
        let applied = s.apply(Transition::ClipEnd(0)).unwrap();
        assert_eq!(applied.activated, Some(1));
        assert_eq!(s.active_index(), 1);
        assert!(s.is_end_of_clip());

        s.apply(Transition::ClipArmed(1)).unwrap();
        assert!(!s.is_end_of_clip());
        assert!(s.is_playing());
    }

    #[test]
    fn last_clip_end_never_advances() {
        for count in 1..6 {
            let mut s = state(count);
            for i in 0..count - 1 {
                s.apply(Transition::ClipEnd(i)).unwrap();
            }
            let applied = s.apply(Transition::LastClipEnd(count - 1)).unwrap();
            assert_eq!(applied.activated, None);
            assert!(s.is_last_clip());
            assert_eq!(s.active_index(), count - 1);
            assert_eq!(s.phase(), Phase::Finished);

            assert!(s.apply(Transition::LastClipEnd(count - 1)).is_err());
            assert_eq!(s.active_index(), count - 1);
        }
    }

    #[test]
    fn rejected_transitions_leave_state_untouched() {
        let mut s = state(4);
        let before = s.clone();

        assert!(matches!(
            s.apply(Transition::ClipEnd(2)),
            Err(CarouselError::PreconditionViolated { transition: "clip-end", .. })
        ));
        assert!(s.apply(Transition::ClipEnd(3)).is_err());
        assert!(s.apply(Transition::LastClipEnd(0)).is_err());
        assert!(s.apply(Transition::Reset).is_err());
        assert!(s.apply(Transition::ClipArmed(2)).is_err());
        assert_eq!(
            s.apply(Transition::ClipEnd(9)).unwrap_err(),
            CarouselError::IndexOutOfRange { index: 9, len: 4 }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn reset_returns_to_first_clip() {
        let mut s = state(2);
        s.apply(Transition::ClipEnd(0)).unwrap();
        s.apply(Transition::LastClipEnd(1)).unwrap();
        let applied = s.apply(Transition::Reset).unwrap();
        assert_eq!(applied.activated, Some(0));
        assert_eq!(s.active_index(), 0);
        assert!(!s.is_last_clip());
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut s = state(4);
        s.apply(Transition::StartPlay).unwrap();
        let before = s.clone();
        s.apply(Transition::TogglePlay).unwrap();
        assert!(!s.is_playing());
        assert_eq!(s.phase(), Phase::Paused);
        s.apply(Transition::TogglePlay).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn ready_gate_uses_capped_threshold() {
        let mut s = state(2);
        assert_eq!(s.ready_threshold(), 2);
        s.apply(Transition::MetadataLoaded).unwrap();
        assert!(!s.sampling_permitted());
        s.apply(Transition::MetadataLoaded).unwrap();
        assert!(s.sampling_permitted());
        assert!(s.apply(Transition::MetadataLoaded).is_err());

        let mut big = state(6);
        for _ in 0..3 {
            big.apply(Transition::MetadataLoaded).unwrap();
        }
        assert!(!big.sampling_permitted());
        big.apply(Transition::MetadataLoaded).unwrap();
        assert!(big.sampling_permitted());
    }

    #[test]
    fn empty_carousel_is_rejected() {
        assert_eq!(CarouselState::new(0, 4).unwrap_err(), CarouselError::EmptyRegistry);
    }
}
