//! Progress indicator slots, one per clip.
//!
//! A slot rests as a small muted dot, widens to a viewport-relative bar with
//! a white fill while its clip plays, and collapses back to the dot when the
//! clip finishes naturally.

use crate::config::CarouselConfig;
use crate::constants::*;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WidthClass {
    Mobile,
    Tablet,
    Desktop,
}

impl WidthClass {
    pub fn from_viewport(width_px: f32, config: &CarouselConfig) -> Self {
        if width_px < config.mobile_max_px {
            WidthClass::Mobile
        } else if width_px < config.tablet_max_px {
            WidthClass::Tablet
        } else {
            WidthClass::Desktop
        }
    }

    /// In-progress slot width as a percentage of the viewport width.
    pub fn slot_vw(self) -> f32 {
        match self {
            WidthClass::Mobile => MOBILE_SLOT_VW,
            WidthClass::Tablet => TABLET_SLOT_VW,
            WidthClass::Desktop => DESKTOP_SLOT_VW,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SlotWidth {
    Resting { px: f32 },
    InProgress { vw: f32 },
}

impl SlotWidth {
    pub fn to_px(self, viewport_width: f32) -> f32 {
        match self {
            SlotWidth::Resting { px } => px,
            SlotWidth::InProgress { vw } => viewport_width * vw / 100.0,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlotFill {
    Active,
    Muted,
}

impl SlotFill {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SlotFill::Active => ACTIVE_FILL_RGB,
            SlotFill::Muted => MUTED_FILL_RGB,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSlot {
    pub progress_fraction: f64,
    /// Set only when the clip finished while playing.
    pub collapsed: bool,
    pub width_class: WidthClass,
    pub width: SlotWidth,
    pub fill: SlotFill,
}

impl IndicatorSlot {
    fn resting(width_class: WidthClass, resting_px: f32) -> Self {
        Self {
            progress_fraction: 0.0,
            collapsed: false,
            width_class,
            width: SlotWidth::Resting { px: resting_px },
            fill: SlotFill::Muted,
        }
    }

    pub fn is_resting(&self) -> bool {
        matches!(self.width, SlotWidth::Resting { .. }) && self.fill == SlotFill::Muted
    }
}

/// Outbound width/color request for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRequest {
    pub slot: usize,
    pub width: SlotWidth,
    pub fill: SlotFill,
    pub progress_percent: u8,
}

#[derive(Debug, Clone)]
pub struct IndicatorStrip {
    slots: Vec<IndicatorSlot>,
    viewport_width: f32,
    width_class: WidthClass,
    resting_px: f32,
    config: CarouselConfig,
}

impl IndicatorStrip {
    pub fn new(count: usize, viewport_width: f32, config: &CarouselConfig) -> Self {
        let width_class = WidthClass::from_viewport(viewport_width, config);
        Self {
            slots: vec![IndicatorSlot::resting(width_class, config.resting_dot_px); count],
            viewport_width,
            width_class,
            resting_px: config.resting_dot_px,
            config: config.clone(),
        }
    }

    /// Re-buckets the slots; bars currently in progress are re-requested at the new size.
    pub fn set_viewport(&mut self, width_px: f32) -> Vec<IndicatorRequest> {
        self.viewport_width = width_px;
        let width_class = WidthClass::from_viewport(width_px, &self.config);
        if width_class == self.width_class {
            return Vec::new();
        }
        self.width_class = width_class;

        let mut requests = Vec::new();
        for i in 0..self.slots.len() {
            let slot = &mut self.slots[i];
            slot.width_class = width_class;
            if let SlotWidth::InProgress { .. } = slot.width {
                slot.width = SlotWidth::InProgress { vw: width_class.slot_vw() };
                requests.push(self.request(i));
            }
        }
        requests
    }

    pub fn progress(&mut self, slot: usize, percent: u8) -> Option<IndicatorRequest> {
        let width_class = self.width_class;
        let s = self.slots.get_mut(slot)?;
        s.progress_fraction = f64::from(percent.min(100)) / 100.0;
        s.width = SlotWidth::InProgress { vw: width_class.slot_vw() };
        s.fill = SlotFill::Active;
        Some(self.request(slot))
    }

    /// Collapses the slot to the resting dot, but only for a clip that was
    /// playing when it completed.
    pub fn complete(&mut self, slot: usize, was_playing: bool) -> Option<IndicatorRequest> {
        if !was_playing {
            return None;
        }
        let resting_px = self.resting_px;
        let s = self.slots.get_mut(slot)?;
        s.collapsed = true;
        s.width = SlotWidth::Resting { px: resting_px };
        s.fill = SlotFill::Muted;
        Some(self.request(slot))
    }

    /// Clears stale progress so the bar animates again from 0.
    pub fn restart(&mut self, slot: usize) -> Option<IndicatorRequest> {
        let s = self.slots.get_mut(slot)?;
        s.progress_fraction = 0.0;
        s.collapsed = false;
        Some(self.request(slot))
    }

    /// Forces every slot back to the resting dot.
    pub fn rest_all(&mut self) -> Vec<IndicatorRequest> {
        let (width_class, resting_px) = (self.width_class, self.resting_px);
        for slot in self.slots.iter_mut() {
            *slot = IndicatorSlot::resting(width_class, resting_px);
        }
        (0..self.slots.len()).map(|i| self.request(i)).collect()
    }

    fn request(&self, slot: usize) -> IndicatorRequest {
        let s = &self.slots[slot];
        IndicatorRequest {
            slot,
            width: s.width,
            fill: s.fill,
            progress_percent: (s.progress_fraction * 100.0).round() as u8,
        }
    }

    pub fn slots(&self) -> &[IndicatorSlot] {
        &self.slots
    }

    pub fn width_class(&self) -> WidthClass {
        self.width_class
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }
}
