//! Cubedeck Core View Engine
//!
//! Platform-agnostic reconciliation core for the timer application's main
//! view.
//!
//! This crate implements the "resolve, then interpolate" pipeline:
//! - A pure resolver derives the discrete visibility/size configuration
//!   ([`LayoutState`]) for every screen region from window constraints
//! - A pure layout engine maps that configuration to concrete numeric
//!   attribute values for the middle/timer region
//! - An [`Animator`] carries each attribute from its previous value to its
//!   new target, so the screen never jumps mid-transition

mod animator;
mod engine;
mod metrics;
mod resolver;
mod state;

pub use animator::{Animator, Attribute, AttributeSnapshot, ANIMATION_DURATION_MS};
pub use engine::{compute_middle_layout, MiddleLayout};
pub use metrics::{MiddleMetrics, SpaceConstraints, TimeLayout, TimerMetrics};
pub use resolver::resolve;
pub use state::{LayoutState, WindowSize};

use thiserror::Error;

/// Minimum height of the open footer panel in pixels.
/// Below this the footer is hidden rather than squeezed further.
pub const MIN_FOOTER_SIZE: f64 = 250.0;

/// Maximum height the user may drag the footer to.
pub const MAX_FOOTER_SIZE: f64 = 400.0;

/// Height of the collapsed footer bar in pixels.
pub const FOOTER_CLOSED_HEIGHT: f64 = 40.0;

/// Errors for untrusted numeric inputs crossing the view boundary.
///
/// Invariant violations *inside* the core (non-finite attribute values,
/// a corrupt [`LayoutState`]) are programmer errors and panic instead.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("window {0} must be a finite non-negative number, got {1}")]
    InvalidDimension(&'static str, f64),
}
