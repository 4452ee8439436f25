//! Tray styling and timing configuration.
//!
//! Every knob that varied across shipped tray skins (durations, hover scale,
//! corner rounding) lives here as data with a default, so hosts can load a
//! skin from a data file instead of patching constants.
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Which screen edge the tray slides in from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideDirection {
    Left,
    #[default]
    Right,
}

impl SlideDirection {
    /// Offset from the resting position to the fully off-screen position,
    /// given the measured row width.
    pub(crate) fn offscreen_offset(self, row_width: f32) -> Vec3 {
        match self {
            SlideDirection::Left => Vec3::new(-row_width, 0.0, 0.0),
            SlideDirection::Right => Vec3::new(row_width, 0.0, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    /// Base size of one item's interactive rectangle.
    pub item_size: Vec2,
    /// Gap between adjacent items (also trails the last item).
    pub item_spacing: f32,
    /// Duration of one hover transition, forward or reverse.
    pub hover_duration: Duration,
    /// Duration of the entry slide.
    pub open_duration: Duration,
    /// Duration of the exit slide. Deliberately distinct from
    /// [`TrayConfig::open_duration`].
    pub close_duration: Duration,
    /// Scale of a fully hovered item relative to its base size.
    pub scale_factor: f32,
    /// Corner radius of a fully hovered item.
    pub max_corner_radius: f32,
    /// Corner radius of an item at rest.
    pub resting_corner_radius: f32,
    /// Z offset of items above the tray root.
    pub baseline_elevation: f32,
    /// Additional elevation of a fully hovered item, applied absolutely on
    /// top of the baseline.
    pub elevation_gain: f32,
    /// Whether hovered items are lifted vertically as they grow.
    pub lift: bool,
    /// Edge the tray slides in from.
    pub slide_direction: SlideDirection,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            item_size: Vec2::splat(64.0),
            item_spacing: 16.0,
            hover_duration: Duration::from_millis(200),
            open_duration: Duration::from_millis(200),
            close_duration: Duration::from_millis(300),
            scale_factor: 1.8,
            max_corner_radius: 32.0,
            resting_corner_radius: 80.0,
            baseline_elevation: 0.01,
            elevation_gain: 1.0,
            lift: false,
            slide_direction: SlideDirection::Right,
        }
    }
}

impl TrayConfig {
    /// Horizontal distance from one item's left edge to the next.
    pub fn item_stride(&self) -> f32 {
        self.item_size.x + self.item_spacing
    }

    /// Measured width of a row of `count` items, trailing gap included.
    pub fn row_width(&self, count: usize) -> f32 {
        count as f32 * self.item_stride()
    }

    /// Local-space center of the item at `index`, laid out left to right
    /// from the tray root's origin.
    pub fn item_offset(&self, index: usize) -> Vec2 {
        Vec2::new(
            index as f32 * self.item_stride() + self.item_size.x * 0.5,
            0.0,
        )
    }
}
