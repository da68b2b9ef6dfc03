//! The reconciliation controller.
//!
//! `AppView` orchestrates the core pipeline: every transition snapshots the
//! prior [`LayoutState`], recomputes the new one through the resolver, maps
//! it to concrete attribute targets through the layout engine, diffs old
//! against new field by field to decide animate-vs-snap per attribute, and
//! pushes the decisions into the [`Animator`]. Attributes whose target did
//! not change are left alone entirely, so concurrent unrelated animations
//! are never interrupted.

use cubedeck_core_view::{
    compute_middle_layout, resolve, Animator, Attribute, AttributeSnapshot, LayoutState,
    MiddleLayout, WindowSize, MAX_FOOTER_SIZE, MIN_FOOTER_SIZE,
};
use tracing::debug;

use crate::config::Prefs;
use crate::load::{plan_effects, EntryEffect, LoadSequence};
use crate::regions::{Footer, Header, Middle};

/// The main app view: owner of the single layout state and the animator.
///
/// No other component writes either; transitions enter through the named
/// methods below and nowhere else.
pub struct AppView {
    animator: Animator,
    header: Header,
    footer: Footer,
    middle: Middle,

    state: LayoutState,
    theater_mode: bool,
    user_footer_height: f64,
    window: WindowSize,

    prefs: Prefs,
    load: LoadSequence,
    entry_effects: Vec<EntryEffect>,
}

impl AppView {
    pub fn new(window: WindowSize, prefs: Prefs) -> Self {
        let header = Header::new();
        let footer = Footer::new();
        let middle = Middle::new();

        // Initial state without any input from the window, mainly so the
        // first resolve has a prior to carry fields from.
        let state = LayoutState {
            footer_height: 0.0,
            footer_open: prefs.footer_open,
            footer_visible: false,
            header_visible: true,
            memo_visible: false,
            pb_available: false,
            pb_visible: false,
            scramble_available: false,
            scramble_visible: false,
        };

        let mut view = Self {
            animator: Animator::new(),
            header,
            footer,
            middle,
            state,
            theater_mode: false,
            user_footer_height: prefs.footer_height,
            window,
            prefs,
            load: LoadSequence::new(0),
            entry_effects: Vec::new(),
        };

        view.state = view.resolve_state();
        view.initialize_animator();

        view.entry_effects = plan_effects(view.state.footer_visible, view.state.memo_visible);
        view.load = LoadSequence::new(view.entry_effects.len());

        view.apply_layout();
        view
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Flip the footer between open and collapsed. Always animated.
    pub fn toggle_footer(&mut self) {
        let old = self.state;
        self.state.footer_open = !self.state.footer_open;
        self.state = self.resolve_state();

        self.prefs.footer_open = self.state.footer_open;
        self.prefs.save();

        self.animate_state_change(&old);
    }

    /// Handle a window resize report.
    ///
    /// Size-driven changes snap (the user is actively dragging or rotating);
    /// only visibility flips fade, and the dependent middle attributes
    /// animate only when such a flip happened this tick.
    pub fn resized(&mut self, window: WindowSize) {
        self.window = window;
        let old = self.state;
        self.state = self.resolve_state();

        // True if anything important faded in or out.
        let mut major_change = false;

        if self.state.footer_height != old.footer_height {
            // The footer size is never animated after a window resize.
            self.animator
                .set_attribute(Attribute::FooterHeight, self.state.footer_height);
        }

        if self.state.footer_visible != old.footer_visible {
            self.animator.animate_attribute(
                Attribute::FooterOpacity,
                if self.state.footer_visible { 1.0 } else { 0.0 },
            );
            major_change = true;
        }
        if self.state.scramble_visible != old.scramble_visible {
            self.animator.animate_attribute(
                Attribute::ScrambleOpacity,
                if self.state.scramble_visible { 1.0 } else { 0.0 },
            );
            major_change = true;
        }
        if self.state.pb_visible != old.pb_visible {
            self.animator.animate_attribute(
                Attribute::PbOpacity,
                if self.state.pb_visible { 1.0 } else { 0.0 },
            );
            major_change = true;
        }

        // Resize never moves middle_y: the header height is constant.
        let middle = self.middle_layout();
        if major_change {
            self.animator.animate_attributes([
                (Attribute::MiddleHeight, middle.middle_height),
                (Attribute::TimeSize, middle.time_size),
                (Attribute::TimeY, middle.time_y),
            ]);
        } else {
            self.animator.set_attributes([
                (Attribute::MiddleHeight, middle.middle_height),
                (Attribute::TimeSize, middle.time_size),
                (Attribute::TimeY, middle.time_y),
            ]);
        }

        // Nothing may be animating, so lay out once by hand rather than
        // leave the screen stale.
        self.apply_layout();
    }

    /// Handle a drag of the footer resize handle. Never animated: the
    /// footer must track the pointer 1:1.
    pub fn resize_footer(&mut self, height: f64) {
        // The handle can emit events while the footer is closing or hiding.
        if !self.state.footer_open || !self.state.footer_visible {
            return;
        }

        self.user_footer_height = height.clamp(MIN_FOOTER_SIZE, MAX_FOOTER_SIZE);
        self.prefs.footer_height = self.user_footer_height;
        self.prefs.save();

        // Nothing in the state changes besides the footer height.
        self.state = self.resolve_state();
        let middle = self.middle_layout();
        self.animator.set_attributes([
            (Attribute::FooterHeight, self.state.footer_height),
            (Attribute::MiddleHeight, middle.middle_height),
            (Attribute::MiddleY, middle.middle_y),
            (Attribute::TimeSize, middle.time_size),
            (Attribute::TimeY, middle.time_y),
        ]);

        self.apply_layout();
    }

    /// Enable or disable theater mode. Always animated.
    pub fn set_theater_mode(&mut self, on: bool) {
        self.theater_mode = on;
        let old = self.state;
        self.state = self.resolve_state();
        self.animate_state_change(&old);
    }

    /// Update the memo time; `None` hides it.
    pub fn set_memo(&mut self, memo: Option<&str>) {
        let old = self.state;
        self.state.memo_visible = memo.is_some();
        self.state = self.resolve_state();

        // On clear the text stays put so the memo fades out non-empty.
        if let Some(text) = memo {
            self.middle.set_memo(text);
        }

        self.animate_state_change(&old);
    }

    /// Update the personal-best label; `None` hides it.
    pub fn set_pb(&mut self, pb: Option<&str>) {
        let old = self.state;
        self.state.pb_available = pb.is_some();
        self.state = self.resolve_state();

        if let Some(text) = pb {
            self.middle.set_pb(text);
        }

        self.animate_state_change(&old);
    }

    /// Update the scramble sequence; `None` hides it.
    pub fn set_scramble(&mut self, scramble: Option<&str>) {
        if let Some(text) = scramble {
            self.middle.set_scramble(text);
        }

        let old = self.state;
        self.state.scramble_available = scramble.is_some();
        self.state = self.resolve_state();

        self.animate_state_change(&old);
    }

    // ------------------------------------------------------------------
    // Display payload passthroughs
    // ------------------------------------------------------------------

    pub fn set_time(&mut self, time: Option<&str>) {
        self.middle.set_time(time.unwrap_or(""));
    }

    pub fn set_time_blinking(&mut self, blinking: bool) {
        self.middle.set_time_blinking(blinking);
    }

    pub fn blink_time(&mut self) {
        self.middle.blink_time();
    }

    pub fn set_puzzles(&mut self, puzzles: Vec<String>) {
        self.header.set_puzzles(puzzles);
    }

    pub fn set_active_puzzle(&mut self, name: &str) {
        self.header.set_active_puzzle(name);
        self.footer.set_puzzle_name(name);
    }

    pub fn set_puzzle_name(&mut self, name: &str) {
        self.header.set_puzzle_name(name);
        self.footer.set_puzzle_name(name);
    }

    pub fn remove_puzzle(&mut self, name: &str) {
        self.header.remove_puzzle(name);
    }

    pub fn close_puzzles(&mut self) {
        self.header.close();
    }

    /// Record a newly completed solve: the footer switches to its stats
    /// pane, animated unless theater mode suppresses it.
    pub fn time_added(&mut self) {
        self.footer.set_showing_stats(true, !self.theater_mode);
    }

    // ------------------------------------------------------------------
    // Animation driving
    // ------------------------------------------------------------------

    /// Advance all in-flight animations and repaint.
    ///
    /// Returns true while any attribute is still in flight; the caller
    /// stops ticking once this returns false.
    pub fn tick(&mut self, delta_ms: f64) -> bool {
        let still_animating = self.animator.tick(delta_ms);
        self.apply_layout();
        still_animating
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    // ------------------------------------------------------------------
    // Entry animation sequencing
    // ------------------------------------------------------------------

    /// Effects the daemon should schedule at startup.
    pub fn entry_effects(&self) -> Vec<EntryEffect> {
        self.entry_effects.clone()
    }

    /// Record an entry effect completion. Returns true when the last one
    /// released the barrier and the view became ready.
    pub fn entry_effect_done(&mut self, effect: EntryEffect) -> bool {
        debug!("Entry effect finished: {}", effect.name());
        // The memo fade paints outside the animator; pin its opacity so the
        // attribute store agrees with the screen from here on.
        if effect == EntryEffect::MemoFade {
            self.animator.set_attribute(Attribute::MemoOpacity, 1.0);
        }
        self.load.finish_one()
    }

    /// True while the entry animations are still playing and the view
    /// should not accept user interaction.
    pub fn loading(&self) -> bool {
        self.load.is_loading()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> AttributeSnapshot {
        self.animator.current()
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn theater_mode(&self) -> bool {
        self.theater_mode
    }

    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Recompute the discrete state from the current inputs.
    fn resolve_state(&self) -> LayoutState {
        resolve(
            &self.state,
            self.theater_mode,
            self.window.height,
            self.header.height(),
            self.user_footer_height,
            &self.middle,
        )
    }

    /// Concrete middle/time attribute targets for the current state.
    fn middle_layout(&self) -> MiddleLayout {
        compute_middle_layout(
            &self.state,
            self.window,
            self.header.height(),
            self.footer.closed_height(),
            &self.middle,
        )
    }

    /// Animate the transition between an old state and the current state.
    ///
    /// State-backed attributes move only when their field changed; the four
    /// middle/time attributes are always re-animated. The resize and drag
    /// paths deliberately bypass this and apply their own snap policies.
    fn animate_state_change(&mut self, old: &LayoutState) {
        let state = self.state;

        if old.footer_height != state.footer_height {
            self.animator
                .animate_attribute(Attribute::FooterHeight, state.footer_height);
        }
        if old.footer_open != state.footer_open {
            self.animator.animate_attribute(
                Attribute::FooterClosedness,
                if state.footer_open { 0.0 } else { 1.0 },
            );
        }
        if old.footer_visible != state.footer_visible {
            self.animator.animate_attribute(
                Attribute::FooterOpacity,
                if state.footer_visible { 1.0 } else { 0.0 },
            );
        }
        if old.header_visible != state.header_visible {
            self.animator.animate_attribute(
                Attribute::HeaderOpacity,
                if state.header_visible { 1.0 } else { 0.0 },
            );
        }
        if old.memo_visible != state.memo_visible {
            self.animator.animate_attribute(
                Attribute::MemoOpacity,
                if state.memo_visible { 1.0 } else { 0.0 },
            );
        }
        if old.scramble_visible != state.scramble_visible {
            self.animator.animate_attribute(
                Attribute::ScrambleOpacity,
                if state.scramble_visible { 1.0 } else { 0.0 },
            );
        }
        if old.pb_visible != state.pb_visible {
            self.animator.animate_attribute(
                Attribute::PbOpacity,
                if state.pb_visible { 1.0 } else { 0.0 },
            );
        }

        let middle = self.middle_layout();
        self.animator.animate_attributes([
            (Attribute::MiddleHeight, middle.middle_height),
            (Attribute::MiddleY, middle.middle_y),
            (Attribute::TimeSize, middle.time_size),
            (Attribute::TimeY, middle.time_y),
        ]);
    }

    /// Seed the animator with the initial on-screen values.
    fn initialize_animator(&mut self) {
        let middle = self.middle_layout();
        self.animator.set_attributes([
            // Footer attributes
            (
                Attribute::FooterClosedness,
                if self.state.footer_open { 0.0 } else { 1.0 },
            ),
            (Attribute::FooterHeight, self.state.footer_height),
            (Attribute::FooterOffset, 0.0),
            (
                Attribute::FooterOpacity,
                if self.state.footer_visible { 1.0 } else { 0.0 },
            ),
            // Header attributes
            (Attribute::HeaderOffset, 0.0),
            (Attribute::HeaderOpacity, 1.0),
            // Middle attributes
            (Attribute::MiddleHeight, middle.middle_height),
            (Attribute::MiddleY, middle.middle_y),
            // Miscellaneous attributes
            (
                Attribute::MemoOpacity,
                if self.state.memo_visible { 1.0 } else { 0.0 },
            ),
            (Attribute::PbOpacity, 0.0),
            (Attribute::ScrambleOpacity, 0.0),
            // Time attributes
            (Attribute::TimeSize, middle.time_size),
            (Attribute::TimeY, middle.time_y),
        ]);
    }

    /// Paint every region from the current attribute snapshot.
    fn apply_layout(&mut self) {
        let attrs = self.animator.current();
        self.footer.layout(&attrs);
        self.header.layout(&attrs);
        self.middle.layout(&attrs);
    }
}
