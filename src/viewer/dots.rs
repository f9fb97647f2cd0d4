use raylib::prelude::*;

use clip_carousel::constants::*;
use clip_carousel::indicator::{IndicatorRequest, SlotFill};

const DOT_HEIGHT: f32 = 12.0;
const DOT_SPACING: f32 = 16.0;
const TRACK_COLOR: Color = Color::new(0xe5, 0xe7, 0xeb, 0xff);

fn fill_color(fill: SlotFill) -> Color {
    let (r, g, b) = fill.rgb();
    Color::new(r, g, b, 0xff)
}

fn mix(a: Color, b: Color, t: f32) -> Color {
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), 0xff)
}

/// One indicator dot; width and fill color follow the engine's requests.
struct Dot {
    width: f32,
    percent: f32,
    from_color: Color,
    to_color: Color,
    color_t: f32,

    tween_width: Option<ease::Tween>,
    animation_timer: f32,
    is_animating: bool,
}

impl Dot {
    fn new(resting_px: f32) -> Self {
        let muted = fill_color(SlotFill::Muted);
        Self {
            width: resting_px,
            percent: 0.0,
            from_color: muted,
            to_color: muted,
            color_t: 1.0,
            tween_width: None,
            animation_timer: 0.0,
            is_animating: false,
        }
    }

    fn color(&self) -> Color {
        mix(self.from_color, self.to_color, self.color_t)
    }

    fn apply(&mut self, request: &IndicatorRequest, viewport_width: f32) {
        self.percent = request.progress_percent as f32;

        let target_width = request.width.to_px(viewport_width);
        if (target_width - self.width).abs() > f32::EPSILON {
            self.tween_width = Some(ease::Tween::new(ease::quad_in_out, self.width, target_width, INDICATOR_TWEEN_DURATION));
            self.animation_timer = 0.0;
            self.is_animating = true;
        }

        let target_color = fill_color(request.fill);
        if target_color != self.to_color {
            self.from_color = self.color();
            self.to_color = target_color;
            self.color_t = 0.0;
            self.animation_timer = 0.0;
            self.is_animating = true;
        }
    }

    fn update(&mut self, dt: f32) {
        if !self.is_animating {
            return;
        }
        if let Some(tween) = self.tween_width.as_mut() {
            self.width = tween.apply(dt);
        }
        self.animation_timer += dt;
        self.color_t = (self.animation_timer / INDICATOR_TWEEN_DURATION).min(1.0);

        if self.animation_timer >= INDICATOR_TWEEN_DURATION {
            self.is_animating = false;
            self.tween_width = None;
            self.color_t = 1.0;
        }
    }
}

pub struct IndicatorDots {
    dots: Vec<Dot>,
}

impl IndicatorDots {
    pub fn new(count: usize, resting_px: f32) -> Self {
        Self {
            dots: (0..count).map(|_| Dot::new(resting_px)).collect(),
        }
    }

    pub fn apply(&mut self, request: &IndicatorRequest, viewport_width: f32) {
        if let Some(dot) = self.dots.get_mut(request.slot) {
            dot.apply(request, viewport_width);
        }
    }

    pub fn update(&mut self, dt: f32) {
        for dot in self.dots.iter_mut() {
            dot.update(dt);
        }
    }

    pub fn total_width(&self) -> f32 {
        let widths: f32 = self.dots.iter().map(|d| d.width).sum();
        widths + DOT_SPACING * self.dots.len().saturating_sub(1) as f32
    }

    /// Draws the dots left to right starting at `x`, vertically centered on `center_y`.
    pub fn draw(&self, d: &mut RaylibDrawHandle, x: f32, center_y: f32) {
        let y = center_y - DOT_HEIGHT * 0.5;
        let mut cursor = x;
        for dot in &self.dots {
            d.draw_rectangle_rounded(Rectangle::new(cursor, y, dot.width, DOT_HEIGHT), 1.0, 8, TRACK_COLOR);
            let fill_width = dot.width * dot.percent / 100.0;
            if fill_width > 0.0 {
                d.draw_rectangle_rounded(Rectangle::new(cursor, y, fill_width, DOT_HEIGHT), 1.0, 8, dot.color());
            }
            cursor += dot.width + DOT_SPACING;
        }
    }
}
