pub const RENDER_WIDTH: i32 = 1280;           // Default window width
pub const RENDER_HEIGHT: i32 = 720;           // Default window height
pub const FPS: u32 = 60;                      // Frames per second

pub const SLIDE_DURATION: f32 = 2.0;          // Duration of the slide strip transition (seconds)
pub const INDICATOR_TWEEN_DURATION: f32 = 0.5; // Duration of indicator width/color tweens (seconds)

pub const MIN_READY_CLIPS: usize = 4;         // Clips that must report metadata before sampling starts

pub const MOBILE_MAX_WIDTH: f32 = 760.0;      // Viewports narrower than this are "mobile"
pub const TABLET_MAX_WIDTH: f32 = 1200.0;     // Viewports narrower than this are "tablet"
pub const MOBILE_SLOT_VW: f32 = 10.0;         // In-progress slot width, percent of viewport width
pub const TABLET_SLOT_VW: f32 = 10.0;
pub const DESKTOP_SLOT_VW: f32 = 4.0;
pub const RESTING_DOT_PX: f32 = 12.0;         // Slot width once collapsed or reset

pub const ACTIVE_FILL_RGB: (u8, u8, u8) = (0xff, 0xff, 0xff); // Fill while the clip plays
pub const MUTED_FILL_RGB: (u8, u8, u8) = (0xaf, 0xaf, 0xaf);  // Fill once the clip finished

pub const HEADLESS_FRAME_LIMIT: u64 = 60 * 60 * 10; // Ten minutes of simulated frames
