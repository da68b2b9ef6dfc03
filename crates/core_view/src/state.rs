//! Discrete view state.

use serde::{Deserialize, Serialize};

use crate::ViewError;

/// Window dimensions reported by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

impl WindowSize {
    /// Validate dimensions arriving from outside the process.
    ///
    /// Resize reports travel over IPC, so a non-finite or negative value is
    /// bad input rather than a bug and is rejected instead of panicking.
    pub fn new(width: f64, height: f64) -> Result<Self, ViewError> {
        if !width.is_finite() || width < 0.0 {
            return Err(ViewError::InvalidDimension("width", width));
        }
        if !height.is_finite() || height < 0.0 {
            return Err(ViewError::InvalidDimension("height", height));
        }
        Ok(Self { width, height })
    }
}

/// The discrete visibility/size decision for every region of the screen.
///
/// A `LayoutState` is a disposable snapshot: the controller replaces it
/// wholesale on every recompute and diffs the old copy field by field to
/// decide which attributes to animate. It is never mutated after being
/// diffed.
///
/// `footer_height` is meaningful only while `footer_visible` is set;
/// consumers must not read it otherwise. `pb_visible` implies
/// `pb_available`, and `scramble_visible` implies `scramble_available`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    /// Height of the open footer in pixels.
    pub footer_height: f64,
    /// Whether the user wants the footer expanded (persisted intent).
    pub footer_open: bool,
    /// Whether the footer fits on screen at all (derived).
    pub footer_visible: bool,
    /// Whether the header is shown (false only in theater mode).
    pub header_visible: bool,
    /// Whether the memo time is currently shown.
    pub memo_visible: bool,
    /// Raw availability flag for the personal-best label.
    pub pb_available: bool,
    /// Derived: available and permitted by the current space tier.
    pub pb_visible: bool,
    /// Raw availability flag for the scramble sequence.
    pub scramble_available: bool,
    /// Derived: available and permitted by the current space tier.
    pub scramble_visible: bool,
}

impl LayoutState {
    /// Panic if a numeric field is not a finite, non-negative number.
    ///
    /// A bad value here would corrupt every later layout computation, so it
    /// is treated as a programmer error and caught at the assignment site.
    pub fn assert_valid(&self) {
        assert!(
            self.footer_height.is_finite() && self.footer_height >= 0.0,
            "invalid footer_height: {}",
            self.footer_height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_state() -> LayoutState {
        LayoutState {
            footer_height: 300.0,
            footer_open: true,
            footer_visible: true,
            header_visible: true,
            memo_visible: false,
            pb_available: false,
            pb_visible: false,
            scramble_available: false,
            scramble_visible: false,
        }
    }

    #[test]
    fn test_valid_state_passes() {
        base_state().assert_valid();
    }

    #[test]
    #[should_panic(expected = "invalid footer_height")]
    fn test_nan_footer_height_panics() {
        let mut state = base_state();
        state.footer_height = f64::NAN;
        state.assert_valid();
    }

    #[test]
    #[should_panic(expected = "invalid footer_height")]
    fn test_negative_footer_height_panics() {
        let mut state = base_state();
        state.footer_height = -1.0;
        state.assert_valid();
    }

    #[test]
    fn test_window_size_rejects_non_finite() {
        assert!(WindowSize::new(f64::NAN, 600.0).is_err());
        assert!(WindowSize::new(800.0, f64::INFINITY).is_err());
        assert!(WindowSize::new(-10.0, 600.0).is_err());
        assert!(WindowSize::new(800.0, 600.0).is_ok());
    }

    #[test]
    fn test_state_is_compared_structurally() {
        let a = base_state();
        let mut b = base_state();
        assert_eq!(a, b);
        b.memo_visible = true;
        assert_ne!(a, b);
    }
}
