//! Vertical space requirements and timer sizing for the middle region.
//!
//! The middle region owns its internal layout. The resolver and the layout
//! engine never guess at it; they ask through [`MiddleMetrics`] for two
//! things: how much vertical room the region needs under the current set of
//! auxiliary elements, and where the timer text should sit inside a given
//! box.

/// Soft and bare vertical space requirements for the middle region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceConstraints {
    /// Space needed assuming the footer gets zero height.
    pub soft: f64,
    /// Minimum space needed even in the most cramped footer-minimal layout.
    pub bare: f64,
}

/// Font size and vertical offset for the timer text, relative to the top
/// of the middle region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeLayout {
    pub time_size: f64,
    pub time_y: f64,
}

/// Constraint and sizing queries answered by the middle region.
pub trait MiddleMetrics {
    /// Vertical space the region needs when the given auxiliary elements
    /// are meant to show.
    fn constraints(&self, pb: bool, scramble: bool, memo: bool) -> SpaceConstraints;

    /// Timer font size and vertical offset for a middle region of the
    /// given dimensions, keeping the timer legible and the remaining
    /// elements centered.
    fn time_layout(&self, width: f64, height: f64, pb: bool, scramble: bool, memo: bool)
        -> TimeLayout;
}

// Layout measurements for the timer view.

/// Comfortable vertical space for the timer text alone.
const TIME_SOFT_SPACE: f64 = 220.0;

/// Absolute minimum vertical space for the timer text.
const TIME_BARE_SPACE: f64 = 120.0;

/// Height of the personal-best label row.
const PB_SPACE: f64 = 30.0;

/// Height of the scramble sequence block.
const SCRAMBLE_SPACE: f64 = 50.0;

/// Height of the memo time row.
const MEMO_SPACE: f64 = 35.0;

/// Bounds for the timer font size in pixels.
const MIN_TIME_SIZE: f64 = 24.0;
const MAX_TIME_SIZE: f64 = 150.0;

/// Approximate width of the widest time string ("1:23:45.67") in ems.
const TIME_WIDTH_RATIO: f64 = 4.5;

/// Fraction of the free middle height the timer text may occupy.
const TIME_HEIGHT_RATIO: f64 = 0.4;

/// The timer view's concrete [`MiddleMetrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerMetrics;

impl MiddleMetrics for TimerMetrics {
    fn constraints(&self, pb: bool, scramble: bool, memo: bool) -> SpaceConstraints {
        let mut soft = TIME_SOFT_SPACE;
        let mut bare = TIME_BARE_SPACE;
        if pb {
            soft += PB_SPACE;
        }
        if scramble {
            soft += SCRAMBLE_SPACE;
        }
        if memo {
            soft += MEMO_SPACE;
            // The memo stays visible even in the most cramped layout.
            bare += MEMO_SPACE;
        }
        SpaceConstraints { soft, bare }
    }

    fn time_layout(
        &self,
        width: f64,
        height: f64,
        pb: bool,
        scramble: bool,
        memo: bool,
    ) -> TimeLayout {
        let mut extras = 0.0;
        if pb {
            extras += PB_SPACE;
        }
        if scramble {
            extras += SCRAMBLE_SPACE;
        }
        if memo {
            extras += MEMO_SPACE;
        }

        let free = height - extras;
        let time_size = (width / TIME_WIDTH_RATIO)
            .min(free * TIME_HEIGHT_RATIO)
            .clamp(MIN_TIME_SIZE, MAX_TIME_SIZE);

        // Center the timer in the space left above the auxiliary elements.
        let time_y = ((free - time_size) / 2.0).max(0.0);

        assert!(
            time_size.is_finite() && time_y.is_finite(),
            "invalid time layout: size={time_size} y={time_y}"
        );

        TimeLayout { time_size, time_y }
    }
}
