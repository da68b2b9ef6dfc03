//! Attribute animation store.
//!
//! The animator owns the current numeric value of every visual attribute
//! and the bookkeeping for eased transitions between values. It has no
//! layout semantics and never touches the screen: callers decide *what*
//! should move, the animator answers *where it is right now*.

/// Duration of every attribute transition in milliseconds.
pub const ANIMATION_DURATION_MS: f64 = 400.0;

/// The closed set of animatable visual attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    FooterHeight,
    /// 0 when the footer is open, 1 when collapsed.
    FooterClosedness,
    FooterOffset,
    FooterOpacity,
    HeaderOffset,
    HeaderOpacity,
    MemoOpacity,
    PbOpacity,
    ScrambleOpacity,
    MiddleHeight,
    MiddleY,
    TimeSize,
    TimeY,
}

impl Attribute {
    /// Number of attributes in the set.
    pub const COUNT: usize = 13;

    /// Every attribute, in declaration order.
    pub const ALL: [Attribute; Self::COUNT] = [
        Attribute::FooterHeight,
        Attribute::FooterClosedness,
        Attribute::FooterOffset,
        Attribute::FooterOpacity,
        Attribute::HeaderOffset,
        Attribute::HeaderOpacity,
        Attribute::MemoOpacity,
        Attribute::PbOpacity,
        Attribute::ScrambleOpacity,
        Attribute::MiddleHeight,
        Attribute::MiddleY,
        Attribute::TimeSize,
        Attribute::TimeY,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// A full mapping from every attribute to its current value.
///
/// Snapshots are never partially populated: one taken mid-animation carries
/// interpolated values for the keys in flight and unchanged values for
/// everything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeSnapshot {
    values: [f64; Attribute::COUNT],
}

impl AttributeSnapshot {
    pub fn get(&self, attr: Attribute) -> f64 {
        self.values[attr.index()]
    }
}

/// An in-flight transition for a single attribute.
#[derive(Debug, Clone, Copy)]
struct Transition {
    from: f64,
    to: f64,
    elapsed_ms: f64,
}

/// Cubic ease-in-out over progress `t` in [0, 1].
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Holds the current value of every attribute and advances eased
/// transitions toward their targets.
#[derive(Debug, Default)]
pub struct Animator {
    values: [f64; Attribute::COUNT],
    transitions: [Option<Transition>; Attribute::COUNT],
}

impl Animator {
    /// Create an animator with every attribute at zero. Callers set the
    /// real starting values before the first layout application.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of every attribute.
    pub fn current(&self) -> AttributeSnapshot {
        AttributeSnapshot {
            values: self.values,
        }
    }

    /// Pin an attribute to a value immediately, cancelling any in-flight
    /// transition for that key.
    pub fn set_attribute(&mut self, attr: Attribute, value: f64) {
        assert!(value.is_finite(), "non-finite value {value} for {attr:?}");
        self.values[attr.index()] = value;
        self.transitions[attr.index()] = None;
    }

    /// Pin several attributes at once.
    pub fn set_attributes<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Attribute, f64)>,
    {
        for (attr, value) in entries {
            self.set_attribute(attr, value);
        }
    }

    /// Begin an eased transition from the attribute's current value to
    /// `target` over [`ANIMATION_DURATION_MS`].
    ///
    /// Retargeting a key already in flight starts the new transition from
    /// the current interpolated value, never the original start point, so
    /// there is no visible discontinuity.
    pub fn animate_attribute(&mut self, attr: Attribute, target: f64) {
        assert!(target.is_finite(), "non-finite target {target} for {attr:?}");
        let i = attr.index();
        self.transitions[i] = Some(Transition {
            from: self.values[i],
            to: target,
            elapsed_ms: 0.0,
        });
    }

    /// Begin eased transitions for several attributes at once.
    pub fn animate_attributes<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Attribute, f64)>,
    {
        for (attr, target) in entries {
            self.animate_attribute(attr, target);
        }
    }

    /// True while at least one attribute is in flight.
    pub fn is_animating(&self) -> bool {
        self.transitions.iter().any(Option::is_some)
    }

    /// Advance every in-flight transition by `delta_ms` and recompute the
    /// interpolated values.
    ///
    /// Returns true if any transition is still running afterward; once this
    /// returns false the caller stops ticking and values hold steady until
    /// the next set/animate call.
    pub fn tick(&mut self, delta_ms: f64) -> bool {
        let mut still_animating = false;
        for i in 0..Attribute::COUNT {
            let Some(transition) = self.transitions[i].as_mut() else {
                continue;
            };
            transition.elapsed_ms += delta_ms;
            if transition.elapsed_ms >= ANIMATION_DURATION_MS {
                self.values[i] = transition.to;
                self.transitions[i] = None;
            } else {
                let progress = ease_in_out(transition.elapsed_ms / ANIMATION_DURATION_MS);
                self.values[i] = transition.from + (transition.to - transition.from) * progress;
                still_animating = true;
            }
        }
        still_animating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_is_immediate() {
        let mut animator = Animator::new();
        animator.set_attribute(Attribute::FooterHeight, 300.0);
        assert_eq!(animator.current().get(Attribute::FooterHeight), 300.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut animator = Animator::new();
        animator.animate_attribute(Attribute::MiddleHeight, 500.0);
        assert!(animator.is_animating());

        // Halfway: strictly between the endpoints.
        assert!(animator.tick(ANIMATION_DURATION_MS / 2.0));
        let mid = animator.current().get(Attribute::MiddleHeight);
        assert!(mid > 0.0 && mid < 500.0, "mid-flight value {mid}");

        // Past the end: exactly the target, no longer animating.
        assert!(!animator.tick(ANIMATION_DURATION_MS));
        assert_eq!(animator.current().get(Attribute::MiddleHeight), 500.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_retarget_starts_from_interpolated_value() {
        let mut animator = Animator::new();
        animator.animate_attribute(Attribute::TimeSize, 100.0);
        animator.tick(ANIMATION_DURATION_MS / 2.0);
        let mid = animator.current().get(Attribute::TimeSize);

        // Retarget mid-flight; the very next value must move from `mid`,
        // not jump back toward the original start.
        animator.animate_attribute(Attribute::TimeSize, 0.0);
        assert_eq!(animator.current().get(Attribute::TimeSize), mid);
        animator.tick(1.0);
        let after = animator.current().get(Attribute::TimeSize);
        assert!(
            (after - mid).abs() < 1.0,
            "discontinuity: {mid} -> {after}"
        );
    }

    #[test]
    fn test_immediate_retarget_uses_value_at_second_call() {
        let mut animator = Animator::new();
        animator.set_attribute(Attribute::PbOpacity, 0.25);
        animator.animate_attribute(Attribute::PbOpacity, 1.0);
        // No tick in between: the second call starts from 0.25.
        animator.animate_attribute(Attribute::PbOpacity, 0.0);
        assert_eq!(animator.current().get(Attribute::PbOpacity), 0.25);
        animator.tick(ANIMATION_DURATION_MS);
        assert_eq!(animator.current().get(Attribute::PbOpacity), 0.0);
    }

    #[test]
    fn test_set_cancels_animation() {
        let mut animator = Animator::new();
        animator.animate_attribute(Attribute::FooterOpacity, 1.0);
        animator.set_attribute(Attribute::FooterOpacity, 0.5);
        assert!(!animator.is_animating());
        assert_eq!(animator.current().get(Attribute::FooterOpacity), 0.5);
    }

    #[test]
    fn test_snapshot_includes_untouched_keys() {
        let mut animator = Animator::new();
        animator.set_attribute(Attribute::HeaderOpacity, 1.0);
        animator.animate_attribute(Attribute::FooterHeight, 250.0);
        animator.tick(10.0);
        let snapshot = animator.current();
        assert_eq!(snapshot.get(Attribute::HeaderOpacity), 1.0);
        assert_eq!(snapshot.get(Attribute::MiddleY), 0.0);
    }

    #[test]
    fn test_unrelated_animation_survives_other_sets() {
        let mut animator = Animator::new();
        animator.animate_attribute(Attribute::MemoOpacity, 1.0);
        animator.set_attribute(Attribute::FooterHeight, 300.0);
        assert!(animator.is_animating(), "memo fade must not be interrupted");
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_non_finite_set_panics() {
        let mut animator = Animator::new();
        animator.set_attribute(Attribute::FooterHeight, f64::NAN);
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_non_finite_animate_panics() {
        let mut animator = Animator::new();
        animator.animate_attribute(Attribute::FooterHeight, f64::INFINITY);
    }
}
