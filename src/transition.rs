//! Slide offset requests and the one-shot visibility trigger.

use crate::clip::ClipId;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Ease {
    Linear,
    /// Quadratic ease-in/ease-out ("power2.inOut").
    QuadInOut,
}

impl Ease {
    /// Maps linear progress `t` in [0, 1] to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Request to animate the whole slide strip to a horizontal offset.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SlideRequest {
    /// Offset in percent of one slide width; 0, -100, -200, ...
    pub offset_percent: f32,
    pub duration: f32,
    pub ease: Ease,
}

#[derive(Debug, Clone)]
pub struct TransitionDriver {
    duration: f32,
    current: Option<SlideRequest>,
}

impl TransitionDriver {
    pub fn new(duration: f32) -> Self {
        Self { duration, current: None }
    }

    pub fn slide_to(&mut self, active_index: usize) -> SlideRequest {
        let request = SlideRequest {
            offset_percent: -100.0 * active_index as f32,
            duration: self.duration,
            ease: Ease::QuadInOut,
        };
        self.current = Some(request);
        tracing::debug!(offset = request.offset_percent, "Slide requested");
        request
    }

    pub fn current(&self) -> Option<SlideRequest> {
        self.current
    }
}

/// Fires once, on the first time the armed clip is reported visible.
#[derive(Debug, Default, Clone)]
pub struct VisibilityTrigger {
    armed: Option<ClipId>,
}

impl VisibilityTrigger {
    pub fn arm(&mut self, clip: ClipId) {
        self.armed = Some(clip);
    }

    pub fn on_visible(&mut self, clip: ClipId) -> bool {
        if self.armed == Some(clip) {
            self.armed = None;
            return true;
        }
        false
    }

    pub fn armed(&self) -> Option<ClipId> {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_proportional_to_index() {
        let mut driver = TransitionDriver::new(2.0);
        assert_eq!(driver.slide_to(0).offset_percent, 0.0);
        let req = driver.slide_to(3);
        assert_eq!(req.offset_percent, -300.0);
        assert_eq!(req.duration, 2.0);
        assert_eq!(req.ease, Ease::QuadInOut);
        assert_eq!(driver.current(), Some(req));
    }

    #[test]
    fn quad_in_out_profile() {
        let ease = Ease::QuadInOut;
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(0.5), 0.5);
        assert_eq!(ease.apply(1.0), 1.0);
        assert!(ease.apply(0.25) < 0.25);
        assert!(ease.apply(0.75) > 0.75);
        assert_eq!(ease.apply(2.0), 1.0);
        assert_eq!(Ease::Linear.apply(0.3), 0.3);
    }

    #[test]
    fn visibility_fires_once_per_arm() {
        let mut trigger = VisibilityTrigger::default();
        assert!(!trigger.on_visible(ClipId(1)));
        trigger.arm(ClipId(1));
        assert!(!trigger.on_visible(ClipId(2)));
        assert!(trigger.on_visible(ClipId(1)));
        assert!(!trigger.on_visible(ClipId(1)));
    }
}
