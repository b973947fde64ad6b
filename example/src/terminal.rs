use porsesh_progress_bar::{BarFrame, Px};

const FILL: char = '█';
const GLOW: char = '▓';
const TRACK: char = '·';

/// Draws `frame` as one line of `width` columns, one column per pixel.
pub fn render_line(frame: Option<&BarFrame>, width: u16) -> String {
    let Some(frame) = frame else {
        return " ".repeat(width as usize);
    };
    (0..i32::from(width))
        .map(|column| {
            let x = Px(column);
            if contains(frame.glow.x, frame.glow.right(), x) {
                GLOW
            } else if contains(frame.fill.x, frame.fill.right(), x) {
                FILL
            } else {
                TRACK
            }
        })
        .collect()
}

fn contains(start: Px, end: Px, x: Px) -> bool {
    start <= x && x < end
}

#[cfg(test)]
mod tests {
    use porsesh_progress::ProgressState;
    use porsesh_progress_bar::{
        Dp, LayoutDirection, ProgressBarStyle, ProgressBarView, Px, Viewport,
    };

    use super::render_line;

    fn frame_for(progress: f32, direction: LayoutDirection) -> porsesh_progress_bar::BarFrame {
        ProgressBarView::new(
            ProgressBarStyle::default()
                .direction(direction)
                .glow_width(Dp(2.0)),
        )
        .frame(
            ProgressState {
                is_visible: true,
                progress,
            },
            Viewport::new(Px(10), 1.0),
        )
        .expect("visible bar")
    }

    #[test]
    fn hidden_bar_is_blank() {
        assert_eq!(render_line(None, 4), "    ");
    }

    #[test]
    fn left_to_right_line() {
        let frame = frame_for(50.0, LayoutDirection::LeftToRight);
        assert_eq!(render_line(Some(&frame), 10), "███▓▓·····");
    }

    #[test]
    fn right_to_left_line() {
        let frame = frame_for(50.0, LayoutDirection::RightToLeft);
        assert_eq!(render_line(Some(&frame), 10), "·····▓▓███");
    }
}
