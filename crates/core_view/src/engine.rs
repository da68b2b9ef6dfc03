//! Concrete attribute targets for a resolved state.

use crate::metrics::MiddleMetrics;
use crate::state::{LayoutState, WindowSize};

/// Numeric layout of the middle region and the timer text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiddleLayout {
    /// Vertical space the footer actually consumes (0 when hidden, the
    /// collapsed bar height when closed, the state's height when open).
    pub footer_height: f64,
    pub middle_height: f64,
    pub middle_y: f64,
    pub time_size: f64,
    pub time_y: f64,
}

/// Map a resolved [`LayoutState`] to concrete middle/time attribute values.
///
/// Pure; any non-finite intermediate is a fatal configuration error.
pub fn compute_middle_layout(
    state: &LayoutState,
    window: WindowSize,
    header_height: f64,
    footer_closed_height: f64,
    metrics: &dyn MiddleMetrics,
) -> MiddleLayout {
    // Space taken up by the footer.
    let mut footer_height = state.footer_height;
    if !state.footer_open {
        footer_height = footer_closed_height;
    }
    if !state.footer_visible {
        footer_height = 0.0;
    }
    assert!(
        footer_height.is_finite(),
        "invalid footer height: {footer_height}"
    );

    // Space taken up by the header.
    let header_height = if state.header_visible { header_height } else { 0.0 };
    assert!(
        header_height.is_finite(),
        "invalid header height: {header_height}"
    );

    let middle_height = (window.height - header_height - footer_height).max(0.0);
    let middle_y = header_height;
    assert!(
        middle_height.is_finite(),
        "invalid middle height: {middle_height}"
    );

    let time = metrics.time_layout(
        window.width,
        middle_height,
        state.pb_visible,
        state.scramble_visible,
        state.memo_visible,
    );

    MiddleLayout {
        footer_height,
        middle_height,
        middle_y,
        time_size: time.time_size,
        time_y: time.time_y,
    }
}
