//! Derivation of the discrete view state from window constraints.

use crate::metrics::MiddleMetrics;
use crate::state::LayoutState;
use crate::MIN_FOOTER_SIZE;

/// Derive the state the view should currently have.
///
/// Pure and deterministic: the same inputs always produce the same output.
/// `prior` supplies the fields that carry through unchanged (user intent,
/// availability flags, memo visibility); every derived field is recomputed
/// from scratch.
///
/// The degrade order is fixed policy: the scramble is hidden before the
/// footer shrinks to its minimum, and the footer disappears entirely only
/// when even the bare middle layout cannot spare [`MIN_FOOTER_SIZE`]. The
/// personal-best label tracks "footer not user-expanded" in every tier.
pub fn resolve(
    prior: &LayoutState,
    theater_mode: bool,
    window_height: f64,
    header_height: f64,
    user_footer_height: f64,
    metrics: &dyn MiddleMetrics,
) -> LayoutState {
    let mut state = *prior;

    // Theater mode hides everything but the time. The remaining fields keep
    // their last values so leaving theater mode restores the exact state.
    if theater_mode {
        state.pb_visible = false;
        state.footer_visible = false;
        state.scramble_visible = false;
        state.header_visible = false;
        return state;
    }

    state.header_visible = true;

    // Ask the middle region how much vertical room it wants.
    let pb = state.pb_available && !state.footer_open;
    let scramble = state.scramble_available;
    let memo = state.memo_visible;
    let constraints = metrics.constraints(pb, scramble, memo);

    let available = window_height - header_height;
    let footer_size = available - constraints.soft;

    // Everything fits: cap the footer at the user's preferred height.
    if footer_size >= MIN_FOOTER_SIZE {
        state.footer_height = footer_size.min(user_footer_height);
        state.footer_visible = true;
        state.pb_visible = pb;
        state.scramble_visible = state.scramble_available;
        state.assert_valid();
        return state;
    }

    // No room to show the scramble for sure.
    state.scramble_visible = false;

    // Pin the footer to its minimum size and see if it still fits.
    state.footer_height = MIN_FOOTER_SIZE;
    if available - constraints.bare >= MIN_FOOTER_SIZE {
        state.footer_visible = true;
        state.pb_visible = pb;
    } else {
        state.footer_visible = false;
        state.pb_visible = false;
    }

    state.assert_valid();
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SpaceConstraints;
    use crate::metrics::TimeLayout;

    /// Metrics stub with fixed soft/bare answers.
    struct FixedMetrics {
        soft: f64,
        bare: f64,
    }

    impl MiddleMetrics for FixedMetrics {
        fn constraints(&self, _pb: bool, _scramble: bool, _memo: bool) -> SpaceConstraints {
            SpaceConstraints {
                soft: self.soft,
                bare: self.bare,
            }
        }

        fn time_layout(
            &self,
            _width: f64,
            _height: f64,
            _pb: bool,
            _scramble: bool,
            _memo: bool,
        ) -> TimeLayout {
            TimeLayout {
                time_size: 100.0,
                time_y: 0.0,
            }
        }
    }

    const HEADER: f64 = 60.0;

    fn prior() -> LayoutState {
        LayoutState {
            footer_height: 0.0,
            footer_open: false,
            footer_visible: false,
            header_visible: true,
            memo_visible: false,
            pb_available: true,
            pb_visible: false,
            scramble_available: true,
            scramble_visible: false,
        }
    }

    #[test]
    fn test_full_tier_when_everything_fits() {
        // 900x1200 window, header 60, user footer height 300: soft-derived
        // cap is 1140 - 300 = 840, so the user preference wins.
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        let state = resolve(&prior(), false, 1200.0, HEADER, 300.0, &metrics);
        assert!(state.footer_visible);
        assert_eq!(state.footer_height, 300.0);
        assert!(state.scramble_visible);
        assert!(state.pb_visible, "pb shows while the footer is not open");
        assert!(state.header_visible);
    }

    #[test]
    fn test_full_tier_caps_footer_below_preference() {
        // available = 590, soft = 300 -> footer cap 290 < preferred 300.
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        let state = resolve(&prior(), false, 650.0, HEADER, 300.0, &metrics);
        assert!(state.footer_visible);
        assert_eq!(state.footer_height, 290.0);
        assert!(state.scramble_visible);
    }

    #[test]
    fn test_minimal_tier_hides_scramble_first() {
        // Window shrunk to 500: available = 440, 440 - 300 = 140 < 250 fails
        // the full tier; 440 - 120 = 320 >= 250 passes the minimal tier.
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        let state = resolve(&prior(), false, 500.0, HEADER, 300.0, &metrics);
        assert!(state.footer_visible);
        assert_eq!(state.footer_height, MIN_FOOTER_SIZE);
        assert!(!state.scramble_visible, "scramble is the first casualty");
        assert!(state.pb_visible);
    }

    #[test]
    fn test_bottom_tier_hides_footer_and_pb() {
        // available = 240, even the bare layout leaves < MIN_FOOTER_SIZE.
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        let state = resolve(&prior(), false, 300.0, HEADER, 300.0, &metrics);
        assert!(!state.footer_visible);
        assert!(!state.scramble_visible);
        assert!(!state.pb_visible);
        assert!(state.header_visible, "header survives outside theater mode");
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        // Exactly header + soft + MIN_FOOTER_SIZE: full tier.
        let state = resolve(&prior(), false, HEADER + 300.0 + 250.0, HEADER, 300.0, &metrics);
        assert!(state.footer_visible && state.scramble_visible);

        // One pixel less: minimal tier.
        let state = resolve(
            &prior(),
            false,
            HEADER + 300.0 + 250.0 - 1.0,
            HEADER,
            300.0,
            &metrics,
        );
        assert!(state.footer_visible && !state.scramble_visible);

        // Exactly header + bare + MIN_FOOTER_SIZE: minimal tier still fits.
        let state = resolve(&prior(), false, HEADER + 120.0 + 250.0, HEADER, 300.0, &metrics);
        assert!(state.footer_visible);

        // One pixel less: footer gone.
        let state = resolve(
            &prior(),
            false,
            HEADER + 120.0 + 250.0 - 1.0,
            HEADER,
            300.0,
            &metrics,
        );
        assert!(!state.footer_visible);
    }

    #[test]
    fn test_pb_tracks_footer_open_in_every_tier() {
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        let mut open = prior();
        open.footer_open = true;

        // Full tier: pb hidden because the footer is expanded.
        let state = resolve(&open, false, 1200.0, HEADER, 300.0, &metrics);
        assert!(state.footer_visible);
        assert!(!state.pb_visible);

        // Minimal tier: same rule.
        let state = resolve(&open, false, 500.0, HEADER, 300.0, &metrics);
        assert!(state.footer_visible);
        assert!(!state.pb_visible);
    }

    #[test]
    fn test_theater_mode_round_trip() {
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        let normal = resolve(&prior(), false, 1200.0, HEADER, 300.0, &metrics);

        let theater = resolve(&normal, true, 1200.0, HEADER, 300.0, &metrics);
        assert!(!theater.header_visible);
        assert!(!theater.footer_visible);
        assert!(!theater.scramble_visible);
        assert!(!theater.pb_visible);
        // Carried fields survive for the return trip.
        assert_eq!(theater.footer_height, normal.footer_height);
        assert_eq!(theater.footer_open, normal.footer_open);
        assert_eq!(theater.memo_visible, normal.memo_visible);

        let restored = resolve(&theater, false, 1200.0, HEADER, 300.0, &metrics);
        assert_eq!(restored, normal);
    }

    #[test]
    fn test_theater_mode_ignores_availability() {
        let metrics = FixedMetrics {
            soft: 300.0,
            bare: 120.0,
        };
        let mut state = prior();
        state.pb_available = true;
        state.scramble_available = true;
        let theater = resolve(&state, true, 5000.0, HEADER, 300.0, &metrics);
        assert!(!theater.pb_visible);
        assert!(!theater.scramble_visible);
        assert!(!theater.footer_visible);
    }
}
