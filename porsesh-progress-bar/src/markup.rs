//! Inline markup for server-rendered pages.
//!
//! Lengths are emitted in CSS pixels, which are already density
//! independent, and the fill width as a percentage so the markup does not
//! depend on the client's viewport.

use std::fmt::Write as _;

use porsesh_progress::ProgressState;

use crate::{ProgressBarView, style::LayoutDirection};

impl ProgressBarView {
    /// Renders the bar as HTML, or an empty string while hidden.
    pub fn render_markup(&self, state: ProgressState) -> String {
        if !state.is_visible {
            return String::new();
        }
        let style = self.style();
        let progress = state.progress.clamp(0.0, 100.0);
        let color = style.color.to_css();
        let (anchor, glow_anchor, dir) = match style.direction {
            LayoutDirection::LeftToRight => ("left", "right", "ltr"),
            LayoutDirection::RightToLeft => ("right", "left", "rtl"),
        };

        let mut html = String::with_capacity(512);
        let _ = write!(
            html,
            "<div class=\"nav-progress\" role=\"progressbar\" aria-valuemin=\"0\" \
             aria-valuemax=\"100\" aria-valuenow=\"{now}\" dir=\"{dir}\" \
             style=\"position:fixed;top:0;left:0;right:0;height:{height}px;\
             z-index:{z};pointer-events:none\">",
            now = progress.round() as u32,
            height = style.height.0,
            z = style.z_index,
        );
        let _ = write!(
            html,
            "<div class=\"nav-progress__fill\" style=\"position:absolute;top:0;\
             {anchor}:0;height:100%;width:{width:.2}%;background:{color};\
             transition:width 200ms ease-out\">",
            width = progress,
        );
        let _ = write!(
            html,
            "<div class=\"nav-progress__glow\" style=\"position:absolute;top:0;\
             {glow_anchor}:0;height:100%;width:{glow}px;max-width:100%;\
             box-shadow:0 0 {spread}px {color},0 0 {half}px {color}\"></div>",
            glow = style.glow_width.0,
            spread = style.glow_spread.0,
            half = style.glow_spread.0 / 2.0,
        );
        html.push_str("</div></div>");
        html
    }
}
