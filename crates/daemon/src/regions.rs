//! Screen region objects.
//!
//! Each region measures itself and paints itself from an attribute
//! snapshot. The daemon has no screen of its own; painting records the
//! applied geometry so queries, logs, and tests can observe what a
//! frontend would render.

use cubedeck_core_view::{
    Attribute, AttributeSnapshot, MiddleMetrics, SpaceConstraints, TimeLayout, TimerMetrics,
    FOOTER_CLOSED_HEIGHT,
};
use tracing::trace;

/// Fixed height of the header bar in pixels.
const HEADER_HEIGHT: f64 = 44.0;

/// The header bar: puzzle name, puzzle dropdown.
#[derive(Debug, Default)]
pub struct Header {
    puzzles: Vec<String>,
    active_puzzle: Option<String>,
    dropdown_open: bool,
    opacity: f64,
    offset: f64,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measured height of the header bar.
    pub fn height(&self) -> f64 {
        HEADER_HEIGHT
    }

    pub fn set_puzzles(&mut self, puzzles: Vec<String>) {
        self.puzzles = puzzles;
    }

    pub fn set_active_puzzle(&mut self, name: &str) {
        self.active_puzzle = Some(name.to_string());
    }

    /// Rename the active puzzle, updating the dropdown entry to match.
    pub fn set_puzzle_name(&mut self, name: &str) {
        if let Some(active) = &self.active_puzzle {
            if let Some(entry) = self.puzzles.iter_mut().find(|p| *p == active) {
                *entry = name.to_string();
            }
        }
        self.active_puzzle = Some(name.to_string());
    }

    pub fn remove_puzzle(&mut self, name: &str) {
        self.puzzles.retain(|p| p != name);
        if self.active_puzzle.as_deref() == Some(name) {
            self.active_puzzle = None;
        }
    }

    /// Close the puzzles dropdown if it is open.
    pub fn close(&mut self) {
        self.dropdown_open = false;
    }

    pub fn layout(&mut self, attrs: &AttributeSnapshot) {
        self.opacity = attrs.get(Attribute::HeaderOpacity);
        self.offset = attrs.get(Attribute::HeaderOffset);
        trace!(
            opacity = self.opacity,
            offset = self.offset,
            puzzles = self.puzzles.len(),
            dropdown_open = self.dropdown_open,
            "header layout"
        );
    }

    #[cfg(test)]
    pub fn puzzles(&self) -> &[String] {
        &self.puzzles
    }
}

/// The collapsible footer panel: settings and statistics.
#[derive(Debug, Default)]
pub struct Footer {
    puzzle_name: String,
    showing_stats: bool,
    height: f64,
    closedness: f64,
    opacity: f64,
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height of the collapsed footer bar.
    pub fn closed_height(&self) -> f64 {
        FOOTER_CLOSED_HEIGHT
    }

    pub fn set_puzzle_name(&mut self, name: &str) {
        self.puzzle_name = name.to_string();
    }

    /// Flip the statistics pane into view.
    pub fn set_showing_stats(&mut self, showing: bool, _animated: bool) {
        self.showing_stats = showing;
    }

    pub fn layout(&mut self, attrs: &AttributeSnapshot) {
        self.height = attrs.get(Attribute::FooterHeight);
        self.closedness = attrs.get(Attribute::FooterClosedness);
        self.opacity = attrs.get(Attribute::FooterOpacity);
        trace!(
            height = self.height,
            closedness = self.closedness,
            opacity = self.opacity,
            puzzle = %self.puzzle_name,
            showing_stats = self.showing_stats,
            "footer layout"
        );
    }

    #[cfg(test)]
    pub fn applied_height(&self) -> f64 {
        self.height
    }
}

/// The middle region: timer text, memo time, scramble, PB label.
///
/// Text payloads are kept when the corresponding value is cleared so the
/// element fades out non-empty; only a new value overwrites them.
#[derive(Debug, Default)]
pub struct Middle {
    metrics: TimerMetrics,
    time: String,
    time_blinking: bool,
    blink_phase: bool,
    memo: String,
    scramble: String,
    pb: String,
    height: f64,
    y: f64,
    time_size: f64,
    time_y: f64,
}

impl Middle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&mut self, text: &str) {
        self.time = text.to_string();
    }

    pub fn set_time_blinking(&mut self, blinking: bool) {
        self.time_blinking = blinking;
        if !blinking {
            self.blink_phase = false;
        }
    }

    /// Advance the time blinker by one phase, if it is blinking at all.
    pub fn blink_time(&mut self) {
        if self.time_blinking {
            self.blink_phase = !self.blink_phase;
        }
    }

    pub fn set_memo(&mut self, text: &str) {
        self.memo = text.to_string();
    }

    pub fn set_scramble(&mut self, text: &str) {
        self.scramble = text.to_string();
    }

    pub fn set_pb(&mut self, text: &str) {
        self.pb = text.to_string();
    }

    pub fn layout(&mut self, attrs: &AttributeSnapshot) {
        self.height = attrs.get(Attribute::MiddleHeight);
        self.y = attrs.get(Attribute::MiddleY);
        self.time_size = attrs.get(Attribute::TimeSize);
        self.time_y = attrs.get(Attribute::TimeY);
        trace!(
            height = self.height,
            y = self.y,
            time_size = self.time_size,
            time_y = self.time_y,
            time = %self.time,
            memo = %self.memo,
            scramble = %self.scramble,
            pb = %self.pb,
            blink = self.blink_phase,
            "middle layout"
        );
    }

    #[cfg(test)]
    pub fn scramble_text(&self) -> &str {
        &self.scramble
    }
}

// The resolver and layout engine query the middle region directly, the way
// the rest of the view asks regions for their measurements.
impl MiddleMetrics for Middle {
    fn constraints(&self, pb: bool, scramble: bool, memo: bool) -> SpaceConstraints {
        self.metrics.constraints(pb, scramble, memo)
    }

    fn time_layout(
        &self,
        width: f64,
        height: f64,
        pb: bool,
        scramble: bool,
        memo: bool,
    ) -> TimeLayout {
        self.metrics.time_layout(width, height, pb, scramble, memo)
    }
}
