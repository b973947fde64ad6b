//! Layout of the navigation progress bar.
//!
//! The bar is a fixed, full-width strip pinned to the top of the viewport.
//! Its fill covers `progress` percent of the width, growing from the start
//! edge of the reading direction, and a glow element sits on the fill's
//! leading edge.

use porsesh_progress::ProgressState;

use crate::{
    style::{LayoutDirection, ProgressBarStyle},
    units::{Color, Px, PxRect},
};

/// Size of the surface the bar is drawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: Px,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: Px, scale_factor: f64) -> Self {
        Self {
            width,
            scale_factor,
        }
    }
}

/// Everything needed to paint one frame of the bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarFrame {
    /// The fixed strip across the top of the viewport.
    pub container: PxRect,
    /// The filled part of the strip.
    pub fill: PxRect,
    /// Glow element at the fill's leading edge.
    pub glow: PxRect,
    pub color: Color,
    /// Progress the frame was laid out for, clamped to `0..=100`.
    pub progress: f32,
}

/// Pure view over a [`ProgressState`].
#[derive(Clone, Debug, Default)]
pub struct ProgressBarView {
    style: ProgressBarStyle,
}

impl ProgressBarView {
    pub fn new(style: ProgressBarStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ProgressBarStyle {
        &self.style
    }

    /// Lays the bar out for `viewport`; `None` when nothing should render.
    pub fn frame(&self, state: ProgressState, viewport: Viewport) -> Option<BarFrame> {
        if !state.is_visible {
            return None;
        }
        let progress = state.progress.clamp(0.0, 100.0);
        let height = self.style.height.to_px(viewport.scale_factor);
        let container = PxRect::new(Px::ZERO, Px::ZERO, viewport.width, height);

        let fill_width = viewport.width.scale(progress / 100.0);
        let fill_x = match self.style.direction {
            LayoutDirection::LeftToRight => Px::ZERO,
            LayoutDirection::RightToLeft => viewport.width - fill_width,
        };
        let fill = PxRect::new(fill_x, Px::ZERO, fill_width, height);

        let glow_width = self
            .style
            .glow_width
            .to_px(viewport.scale_factor)
            .min(fill_width);
        let glow_x = match self.style.direction {
            LayoutDirection::LeftToRight => fill.right() - glow_width,
            LayoutDirection::RightToLeft => fill.x,
        };
        let glow = PxRect::new(glow_x, Px::ZERO, glow_width, height);

        Some(BarFrame {
            container,
            fill,
            glow,
            color: self.style.color,
            progress,
        })
    }
}
