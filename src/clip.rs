use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CarouselError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub u32);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One video segment of the carousel, as supplied by configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipDescriptor {
    pub id: ClipId,
    pub source_ref: String,
    pub duration_seconds: f64,
    #[serde(default)]
    pub display_text: Vec<String>,
}

impl ClipDescriptor {
    pub fn new(id: u32, source_ref: &str, duration_seconds: f64, display_text: &[&str]) -> Self {
        Self {
            id: ClipId(id),
            source_ref: source_ref.to_string(),
            duration_seconds,
            display_text: display_text.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered, read-only list of clips. Positions in the registry are the
/// carousel's slide indices.
#[derive(Clone, Debug)]
pub struct ClipRegistry {
    clips: Vec<ClipDescriptor>,
}

impl ClipRegistry {
    pub fn new(clips: Vec<ClipDescriptor>) -> Result<Self, CarouselError> {
        if clips.is_empty() {
            return Err(CarouselError::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        for clip in &clips {
            if !seen.insert(clip.id) {
                return Err(CarouselError::DuplicateClip(clip.id));
            }
            if !clip.duration_seconds.is_finite() || clip.duration_seconds <= 0.0 {
                return Err(CarouselError::InvalidDuration {
                    id: clip.id,
                    seconds: clip.duration_seconds,
                });
            }
        }

        Ok(Self { clips })
    }

    /// Parses a JSON array of clip descriptors.
    pub fn from_json(json: &str) -> Result<Self, CarouselError> {
        let clips: Vec<ClipDescriptor> = serde_json::from_str(json)?;
        Self::new(clips)
    }

    /// The built-in highlight reel used when no clip file is given.
    pub fn highlights() -> Self {
        Self {
            clips: vec![
                ClipDescriptor::new(1, "videos/highlight-first.mp4", 4.0, &["Enter A17 Pro.", "Game-changing chip.", "Groundbreaking performance."]),
                ClipDescriptor::new(2, "videos/highlight-second.mp4", 5.0, &["Titanium.", "So strong. So light. So Pro."]),
                ClipDescriptor::new(3, "videos/highlight-third.mp4", 2.0, &["iPhone 15 Pro Max has the", "longest optical zoom in", "iPhone ever. Far out."]),
                ClipDescriptor::new(4, "videos/highlight-fourth.mp4", 3.63, &["All-new Action button.", "What will yours do?"]),
            ],
        }
    }

    pub fn get(&self, index: usize) -> Result<&ClipDescriptor, CarouselError> {
        self.clips.get(index).ok_or(CarouselError::IndexOutOfRange {
            index,
            len: self.clips.len(),
        })
    }

    pub fn index_of(&self, id: ClipId) -> Option<usize> {
        self.clips.iter().position(|clip| clip.id == id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.clips.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipDescriptor> {
        self.clips.iter()
    }
}
