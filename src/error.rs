//! Error types for the carousel engine.

use thiserror::Error;

use crate::clip::ClipId;

/// Errors reported by the registry, the state machine and configuration loading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarouselError {
    #[error("Clip index {index} out of range (clip count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown clip: {0}")]
    UnknownClip(ClipId),

    #[error("Transition `{transition}` rejected: {reason}")]
    PreconditionViolated {
        transition: &'static str,
        reason: String,
    },

    #[error("Clip registry is empty")]
    EmptyRegistry,

    #[error("Duplicate clip id: {0}")]
    DuplicateClip(ClipId),

    #[error("Clip {id} has invalid duration {seconds}s")]
    InvalidDuration { id: ClipId, seconds: f64 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CarouselError {
    pub(crate) fn rejected(transition: &'static str, reason: impl Into<String>) -> Self {
        Self::PreconditionViolated {
            transition,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CarouselError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
