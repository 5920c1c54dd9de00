//! Popup state machine and placement.
//!
//! Each marker's popup is in one of three states:
//!
//! ```text
//! Hidden ──enter──▶ HoverShown ──leave──▶ Hidden
//!    │                  │
//!    └──────click───────┴──────▶ ActiveShown
//! ```
//!
//! An active popup stays up until another marker is clicked or the map
//! background is clicked. Transitions themselves are driven by
//! [`MapView`](crate::MapView), which also guarantees that at most one
//! popup is displayed at a time.

use serde::Serialize;

use crate::surface::{Offset, ScreenPoint, Size};

/// Display state of a single marker's popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PopupState {
    /// Not displayed.
    #[default]
    Hidden,
    /// Displayed while the pointer is over the marker.
    HoverShown,
    /// Pinned open by a click.
    ActiveShown,
}

impl PopupState {
    /// Whether the popup is on screen.
    #[must_use]
    pub const fn is_shown(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Computes where to show a popup so that it stays inside the canvas.
///
/// By default the popup is centered horizontally over its marker with its
/// bottom edge `gap` pixels above it. If that box would cross a canvas edge
/// it is shifted back inside; a popup larger than the canvas is pinned to
/// the left/top edge.
#[must_use]
pub fn place_popup(anchor: ScreenPoint, popup: Size, canvas: Size, gap: f64) -> Offset {
    let left = anchor.x - popup.width / 2.0;
    let top = anchor.y - gap - popup.height;

    Offset {
        x: shift_into(left, popup.width, canvas.width),
        y: shift_into(top, popup.height, canvas.height) - gap,
    }
}

/// Top-left corner of a popup displaced by `offset` from `anchor`.
#[must_use]
pub fn popup_origin(anchor: ScreenPoint, popup: Size, offset: Offset) -> ScreenPoint {
    ScreenPoint {
        x: anchor.x + offset.x - popup.width / 2.0,
        y: anchor.y + offset.y - popup.height,
    }
}

/// How far a span starting at `start` with `len` must move to fit inside
/// `0..=limit`.
fn shift_into(start: f64, len: f64, limit: f64) -> f64 {
    if start < 0.0 || len > limit {
        -start
    } else if start + len > limit {
        limit - (start + len)
    } else {
        0.0
    }
}
