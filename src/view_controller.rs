use crate::data_types::{BrushPosition, Track, Window};
use crate::error::Result;

/// ViewController holds the geometry of brush interactions (move, resize,
/// pixel/index conversion) independently of any input plumbing to facilitate
/// testing.
pub struct ViewController;

impl ViewController {
    /// Slides the brush by the pointer travel, keeping it inside the track.
    ///
    /// `dx` is `start_pointer_x - pointer_x`, so a positive value moves left.
    pub fn move_window(start: BrushPosition, dx: f64, track_width: f64) -> BrushPosition {
        BrushPosition {
            x: (start.x - dx).max(0.0).min(track_width - start.width),
            width: start.width,
        }
    }

    /// Drags the left edge while the right edge stays put.
    pub fn resize_left(start: BrushPosition, dx: f64, min_width: f64) -> BrushPosition {
        let right_edge = start.right();
        let x = (start.x - dx).max(0.0).min((right_edge - min_width).max(0.0));
        BrushPosition {
            x,
            width: right_edge - x,
        }
    }

    /// Drags the right edge while the left edge stays put.
    pub fn resize_right(
        start: BrushPosition,
        dx: f64,
        min_width: f64,
        track_width: f64,
    ) -> BrushPosition {
        let max_width = track_width - start.x;
        BrushPosition {
            x: start.x,
            width: (start.width - dx).max(min_width).min(max_width),
        }
    }

    /// Initial brush: anchored to the right edge of the track.
    pub fn initial_position(track_width: f64, initial_width_pct: f64) -> BrushPosition {
        let width = (track_width * initial_width_pct).clamp(0.0, track_width.max(0.0));
        BrushPosition {
            x: track_width - width,
            width,
        }
    }

    /// Widens `position` to at least `min_width` and keeps it inside the track,
    /// shifting it left when it would overflow the right edge.
    pub fn fit_to_track(
        position: BrushPosition,
        min_width: f64,
        track_width: f64,
    ) -> BrushPosition {
        let track_width = track_width.max(0.0);
        let width = position.width.max(min_width).min(track_width);
        BrushPosition {
            x: position.x.max(0.0).min(track_width - width),
            width,
        }
    }

    /// Converts a brush position into a dataset window.
    ///
    /// `start = round(x / W * length)`, `end = start + round(width / W * length)`,
    /// then nudged so the window is non-empty and inside `[0, length]`.
    /// Fails only for an empty dataset.
    pub fn window_from_brush(
        position: BrushPosition,
        track: Track,
        length: usize,
    ) -> Result<Window> {
        let (start, end) = Self::window_bounds(position, track.width, length);
        Window::new(start, end, length)
    }

    /// Raw `(start, end)` index bounds for a brush position.
    pub fn window_bounds(
        position: BrushPosition,
        track_width: f64,
        length: usize,
    ) -> (usize, usize) {
        if length == 0 || track_width <= 0.0 {
            return (0, length);
        }
        let density = length as f64 / track_width;
        let start = (position.x * density).round().max(0.0) as usize;
        let span = ((position.width * density).round().max(1.0)) as usize;

        let start = start.min(length - 1);
        let end = (start + span).min(length);
        (start, end)
    }

    /// Inverse of [`Self::window_from_brush`].
    pub fn brush_from_window(window: Window, track: Track, length: usize) -> BrushPosition {
        if length == 0 {
            return BrushPosition::default();
        }
        let density = track.width / length as f64;
        BrushPosition {
            x: window.start() as f64 * density,
            width: window.span() as f64 * density,
        }
    }
}
