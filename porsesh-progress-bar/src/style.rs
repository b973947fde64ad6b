//! Visual arguments for the progress bar.
//!
//! ## Usage
//!
//! Match the bar to the forum theme and reading direction.

use std::time::Duration;

use derive_setters::Setters;

use crate::units::{Color, Dp};

/// Which edge the bar grows from.
///
/// The forum renders right-to-left, so the bar fills from the right and its
/// glow sits on the left end of the fill.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LayoutDirection {
    LeftToRight,
    #[default]
    RightToLeft,
}

/// Default values for the navigation progress bar.
pub struct ProgressBarDefaults;

impl ProgressBarDefaults {
    pub const HEIGHT: Dp = Dp(3.0);
    pub const GLOW_WIDTH: Dp = Dp(100.0);
    pub const GLOW_SPREAD: Dp = Dp(10.0);
    pub const SMOOTHING_INTERVAL: Duration = Duration::from_millis(50);
    pub const SMOOTHING_STEP: f32 = 10.0;
    pub const Z_INDEX: i32 = 1031;

    pub fn color() -> Color {
        Color::from_rgb_u8(41, 121, 255)
    }
}

/// Arguments for [`ProgressBarView`](crate::ProgressBarView).
///
/// # Examples
///
/// ```
/// use porsesh_progress_bar::{Dp, LayoutDirection, ProgressBarStyle};
///
/// let style = ProgressBarStyle::default()
///     .height(Dp(4.0))
///     .direction(LayoutDirection::LeftToRight);
/// assert_eq!(style.height, Dp(4.0));
/// ```
#[derive(Clone, Debug, PartialEq, Setters)]
pub struct ProgressBarStyle {
    /// Thickness of the bar.
    pub height: Dp,
    /// Fill color.
    pub color: Color,
    /// Width of the glow element at the leading edge.
    pub glow_width: Dp,
    /// Blur spread of the glow.
    pub glow_spread: Dp,
    /// Reading direction the bar grows in.
    pub direction: LayoutDirection,
    /// Stacking order of the fixed container in the page markup.
    pub z_index: i32,
    /// Cadence of the display smoothing loop.
    pub smoothing_interval: Duration,
    /// Largest step the displayed value takes per smoothing tick.
    pub smoothing_step: f32,
}

impl Default for ProgressBarStyle {
    fn default() -> Self {
        Self {
            height: ProgressBarDefaults::HEIGHT,
            color: ProgressBarDefaults::color(),
            glow_width: ProgressBarDefaults::GLOW_WIDTH,
            glow_spread: ProgressBarDefaults::GLOW_SPREAD,
            direction: LayoutDirection::default(),
            z_index: ProgressBarDefaults::Z_INDEX,
            smoothing_interval: ProgressBarDefaults::SMOOTHING_INTERVAL,
            smoothing_step: ProgressBarDefaults::SMOOTHING_STEP,
        }
    }
}
