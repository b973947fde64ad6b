//! Length and color primitives for the bar.

use std::ops::{Add, Sub};

/// Density-independent pixels.
///
/// Converted to physical pixels with the viewport's scale factor, so a
/// `Dp(3.0)` bar looks equally thick on low and high density screens.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dp(pub f64);

impl Dp {
    /// Physical pixels for `scale_factor`, rounded to the nearest pixel.
    pub fn to_px(self, scale_factor: f64) -> Px {
        Px((self.0 * scale_factor).round() as i32)
    }
}

/// Physical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    pub const ZERO: Self = Self(0);

    /// `fraction` of this length, rounded to the nearest pixel.
    pub fn scale(self, fraction: f32) -> Px {
        Px((self.0 as f32 * fraction).round() as i32)
    }
}

impl Add for Px {
    type Output = Px;

    fn add(self, rhs: Px) -> Px {
        Px(self.0 + rhs.0)
    }
}

impl Sub for Px {
    type Output = Px;

    fn sub(self, rhs: Px) -> Px {
        Px(self.0 - rhs.0)
    }
}

/// An axis-aligned rectangle in physical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PxRect {
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
}

impl PxRect {
    pub const fn new(x: Px, y: Px, width: Px, height: Px) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// x coordinate of the right edge.
    pub fn right(&self) -> Px {
        self.x + self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width.0 <= 0 || self.height.0 <= 0
    }
}

/// An sRGB color with alpha, components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same color with alpha replaced.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` notation.
    pub fn to_css(self) -> String {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            (self.a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}
