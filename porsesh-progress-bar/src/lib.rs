//! Navigation progress bar for the Porsesh frontend.
//!
//! A purely presentational view over
//! [`ProgressState`](porsesh_progress::ProgressState): a fixed strip at the
//! top of the viewport whose fill tracks the progress value, with a glow on
//! the leading edge. [`SmoothedProgress`] optionally eases the displayed
//! value toward the authoritative one.

mod markup;
pub mod smoothing;
mod style;
pub mod units;
mod view;

pub use smoothing::{DisplaySmoother, SmoothedProgress};
pub use style::{LayoutDirection, ProgressBarDefaults, ProgressBarStyle};
pub use units::{Color, Dp, Px, PxRect};
pub use view::{BarFrame, ProgressBarView, Viewport};
