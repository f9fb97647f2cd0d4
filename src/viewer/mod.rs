//! Raylib window around a [`Simulation`]: slide strip, clip panels, indicator
//! dots and the play / pause / replay control.

mod dots;
mod strip;

use anyhow::Result;
use raylib::prelude::*;
use tracing::{debug, info, warn};

use clip_carousel::engine::{ControlAction, Effect};
use clip_carousel::{CarouselConfig, Simulation};

use self::dots::IndicatorDots;
use self::strip::SlideStrip;

const SLIDE_WIDTH_RATIO: f32 = 0.72;
const SLIDE_GAP: f32 = 48.0;
const SLIDE_TOP: f32 = 40.0;
const CONTROL_RADIUS: f32 = 22.0;
const PANEL_COLORS: [Color; 4] = [
    Color::new(0x1f, 0x29, 0x37, 0xff),
    Color::new(0x31, 0x2e, 0x81, 0xff),
    Color::new(0x13, 0x4e, 0x4a, 0xff),
    Color::new(0x7c, 0x2d, 0x12, 0xff),
];

fn control_label(action: ControlAction) -> &'static str {
    match action {
        ControlAction::Play => "PLAY",
        ControlAction::Pause => "PAUSE",
        ControlAction::Replay => "REPLAY",
    }
}

fn apply_effects(effects: Vec<Effect>, strip: &mut SlideStrip, dots: &mut IndicatorDots, viewport_width: f32) {
    for effect in effects {
        match effect {
            Effect::Slide(request) => strip.slide_to(request),
            Effect::Indicator(request) => dots.apply(&request, viewport_width),
            Effect::Media { clip, command } => debug!(%clip, ?command, "Media command"),
        }
    }
}

pub fn run(mut sim: Simulation, config: &CarouselConfig, width: i32, height: i32, fps: u32) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("Clip Carousel")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let clip_count = sim.engine().registry().len();
    let mut strip = SlideStrip::new();
    let mut dots = IndicatorDots::new(clip_count, config.resting_dot_px);

    let mut viewport_width = rl.get_screen_width();
    sim.engine_mut().set_viewport(viewport_width as f32);
    let initial = sim.engine_mut().drain_effects();
    apply_effects(initial, &mut strip, &mut dots, viewport_width as f32);

    info!(clips = clip_count, width, height, "Viewer started");

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        let sw = rl.get_screen_width() as f32;
        let sh = rl.get_screen_height() as f32;

        let slide_width = sw * SLIDE_WIDTH_RATIO;
        let slide_height = sh * 0.68;
        let stride = slide_width + SLIDE_GAP;
        let left_margin = (sw - slide_width) * 0.5;
        let bar_y = SLIDE_TOP + slide_height + 48.0;

        // 1. Input and viewport
        let control_center = Vector2::new(left_margin + dots.total_width() + 48.0, bar_y);
        let clicked = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT)
            && {
                let mouse = rl.get_mouse_position();
                (mouse.x - control_center.x).hypot(mouse.y - control_center.y) <= CONTROL_RADIUS
            };
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) || clicked {
            match sim.engine_mut().press_control() {
                Ok(action) => info!(?action, "Control pressed"),
                Err(e) => warn!(error = %e, "Control press rejected"),
            }
        }

        if rl.get_screen_width() != viewport_width {
            viewport_width = rl.get_screen_width();
            sim.engine_mut().set_viewport(viewport_width as f32);
        }

        // 2. Engine, then animations
        let effects = sim.step(dt as f64)?;
        apply_effects(effects, &mut strip, &mut dots, viewport_width as f32);
        strip.update(dt);
        dots.update(dt);

        if strip.is_settled() {
            let active = sim.engine().active_clip();
            sim.engine_mut().on_visible(active)?;
        }

        // 3. Draw
        let engine = sim.engine();
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        for (i, clip) in engine.registry().iter().enumerate() {
            let x = strip.slide_x(i, left_margin, stride);
            if x + slide_width < 0.0 || x > sw {
                continue;
            }
            let panel = Rectangle::new(x, SLIDE_TOP, slide_width, slide_height);
            d.draw_rectangle_rounded(panel, 0.08, 12, PANEL_COLORS[i % PANEL_COLORS.len()]);
            d.draw_text(&format!("{}", i + 1), (x + slide_width - 120.0) as i32, (SLIDE_TOP + 20.0) as i32, 96, Color::new(0xff, 0xff, 0xff, 0x30));

            for (line, text) in clip.display_text.iter().enumerate() {
                d.draw_text(text, (x + 32.0) as i32, (SLIDE_TOP + 32.0) as i32 + line as i32 * 40, 32, Color::WHITE);
            }

            if let Some(handle) = engine.handle(clip.id) {
                let status = if !handle.is_ready() { "loading" } else if handle.is_paused() { "paused" } else { "playing" };
                d.draw_text(status, (x + 32.0) as i32, (SLIDE_TOP + slide_height - 48.0) as i32, 20, Color::LIGHTGRAY);
                let played = (handle.current_time() / clip.duration_seconds).clamp(0.0, 1.0) as f32;
                d.draw_rectangle_rec(Rectangle::new(x, SLIDE_TOP + slide_height - 6.0, slide_width * played, 6.0), Color::new(0xff, 0xff, 0xff, 0x60));
            }
        }

        dots.draw(&mut d, left_margin, bar_y);

        d.draw_circle_v(control_center, CONTROL_RADIUS, Color::new(0xe5, 0xe7, 0xeb, 0xff));
        let label = control_label(engine.control_action());
        let label_width = label.len() as i32 * 7;
        d.draw_text(label, control_center.x as i32 - label_width / 2, control_center.y as i32 - 6, 12, Color::BLACK);

        // --- Optional Debug Info ---
        let state = engine.state();
        let debug_text = format!(
            "active {}  playing {}  ready {}/{}  t {:.1}s",
            state.active_index(),
            state.is_playing(),
            state.ready_count(),
            clip_count,
            sim.elapsed(),
        );
        d.draw_text(&debug_text, 10, (sh - 24.0) as i32, 16, Color::GRAY);
    }

    Ok(())
}
