//! Input abstraction layer.
//!
//! The map library delivers pointer events with geographic coordinates
//! already projected. They are normalized into `MapEvent` and consumed by
//! the tool controller.

use mapnote_core::LatLng;

/// A normalized map interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Single click on the map.
    Click { at: LatLng },

    /// Pointer moved over the map.
    Move { at: LatLng },

    /// Double click: finishes multi-vertex shapes.
    DoubleClick { at: LatLng },
}

/// Keyboard modifier state at the time of a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl MapEvent {
    pub fn click(lat: f64, lng: f64) -> Self {
        Self::Click {
            at: LatLng::new(lat, lng),
        }
    }

    pub fn moved(lat: f64, lng: f64) -> Self {
        Self::Move {
            at: LatLng::new(lat, lng),
        }
    }

    pub fn double_click(lat: f64, lng: f64) -> Self {
        Self::DoubleClick {
            at: LatLng::new(lat, lng),
        }
    }

    /// Geographic position of the event.
    pub fn position(&self) -> LatLng {
        match self {
            Self::Click { at } | Self::Move { at } | Self::DoubleClick { at } => *at,
        }
    }
}
