use raylib::prelude::*;

use clip_carousel::transition::{Ease, SlideRequest};

fn easer(ease: Ease) -> fn(f32, f32, f32, f32) -> f32 {
    match ease {
        Ease::Linear => ease::linear_none,
        Ease::QuadInOut => ease::quad_in_out,
    }
}

/// Horizontal strip of slides, tweened towards the engine's slide requests.
pub struct SlideStrip {
    offset_percent: f32,
    target_percent: f32,

    tween: Option<ease::Tween>,
    animation_timer: f32,
    duration: f32,
    pub is_animating: bool,
}

impl SlideStrip {
    pub fn new() -> Self {
        Self {
            offset_percent: 0.0,
            target_percent: 0.0,
            tween: None,
            animation_timer: 0.0,
            duration: 0.0,
            is_animating: false,
        }
    }

    pub fn slide_to(&mut self, request: SlideRequest) {
        self.target_percent = request.offset_percent;
        self.duration = request.duration;
        self.animation_timer = 0.0;
        self.tween = Some(ease::Tween::new(
            easer(request.ease),
            self.offset_percent,
            request.offset_percent,
            request.duration,
        ));
        self.is_animating = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_animating {
            return;
        }
        if let Some(tween) = self.tween.as_mut() {
            self.offset_percent = tween.apply(dt);
        }
        self.animation_timer += dt;

        if self.animation_timer >= self.duration {
            self.is_animating = false;
            self.offset_percent = self.target_percent;
            self.tween = None;
        }
    }

    /// Settled on the requested offset; the active slide is fully in view.
    pub fn is_settled(&self) -> bool {
        !self.is_animating
    }

    /// Left edge of slide `index` given the slide stride (width plus gap).
    pub fn slide_x(&self, index: usize, left_margin: f32, stride: f32) -> f32 {
        left_margin + index as f32 * stride + self.offset_percent / 100.0 * stride
    }
}
