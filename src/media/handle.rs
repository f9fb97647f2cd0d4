use std::collections::HashMap;

use crate::clip::ClipId;
use crate::media::MediaElement;
use crate::ticker::Generation;

/// Owned wrapper around one clip's media element.
///
/// Tracks readiness (metadata loaded, reported once) and the ended edge for
/// the current playback pass. `arm` opens a new pass; `take_ended` yields the
/// pass generation at most once per pass.
pub struct PlaybackHandle<M> {
    media: M,
    ready: bool,
    armed: bool,
    generation: Generation,
}

impl<M: MediaElement> PlaybackHandle<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            ready: false,
            armed: false,
            generation: Generation::default(),
        }
    }

    /// Returns true only the first time.
    pub fn mark_ready(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.ready = true;
        true
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Starts a new pass: rewinds the media if it moved and re-arms the ended
    /// edge. Returns true if a rewind was needed.
    pub fn arm(&mut self, generation: Generation) -> bool {
        let rewound = self.media.current_time() > 0.0;
        if rewound {
            self.media.seek(0.0);
        }
        self.armed = true;
        self.generation = generation;
        rewound
    }

    pub fn take_ended(&mut self) -> Option<Generation> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        Some(self.generation)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns true if the command changed the media state.
    pub fn play(&mut self) -> bool {
        if !self.media.is_paused() {
            return false;
        }
        self.media.play();
        true
    }

    /// Returns true if the command changed the media state.
    pub fn pause(&mut self) -> bool {
        if self.media.is_paused() {
            return false;
        }
        self.media.pause();
        true
    }

    pub fn is_paused(&self) -> bool {
        self.media.is_paused()
    }

    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn into_media(self) -> M {
        self.media
    }
}

/// Handles keyed by clip id; a handle lives from mount to unmount of its clip.
pub struct PlaybackHandles<M> {
    handles: HashMap<ClipId, PlaybackHandle<M>>,
}

impl<M: MediaElement> Default for PlaybackHandles<M> {
    fn default() -> Self {
        Self { handles: HashMap::new() }
    }
}

impl<M: MediaElement> PlaybackHandles<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the media previously mounted under the same id, if any.
    pub fn mount(&mut self, clip: ClipId, media: M) -> Option<M> {
        self.handles
            .insert(clip, PlaybackHandle::new(media))
            .map(PlaybackHandle::into_media)
    }

    pub fn unmount(&mut self, clip: ClipId) -> Option<M> {
        self.handles.remove(&clip).map(PlaybackHandle::into_media)
    }

    pub fn get(&self, clip: ClipId) -> Option<&PlaybackHandle<M>> {
        self.handles.get(&clip)
    }

    pub fn get_mut(&mut self, clip: ClipId) -> Option<&mut PlaybackHandle<M>> {
        self.handles.get_mut(&clip)
    }
}
