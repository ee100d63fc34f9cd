use brush_chart::data_types::{BrushPosition, Track, Window};
use brush_chart::view_controller::ViewController;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TRACK: Track = Track {
    width: 1000.0,
    height: 100.0,
};

fn pos(x: f64, width: f64) -> BrushPosition {
    BrushPosition { x, width }
}

#[test]
fn test_move_window_clamps_to_track() {
    // Pointer moved 50px right: dx is negative.
    let moved = ViewController::move_window(pos(900.0, 100.0), -50.0, TRACK.width);
    assert_eq!(moved, pos(900.0, 100.0));

    let moved = ViewController::move_window(pos(400.0, 100.0), 950.0, TRACK.width);
    assert_eq!(moved, pos(0.0, 100.0));

    let moved = ViewController::move_window(pos(400.0, 100.0), 150.0, TRACK.width);
    assert_eq!(moved, pos(250.0, 100.0));
}

#[test]
fn test_resize_left_keeps_right_edge() {
    let resized = ViewController::resize_left(pos(500.0, 100.0), 200.0, 20.0);
    assert_eq!(resized, pos(300.0, 300.0));

    // Collapsing past the minimum width stops at the minimum.
    let resized = ViewController::resize_left(pos(500.0, 100.0), -150.0, 20.0);
    assert_eq!(resized, pos(580.0, 20.0));

    let resized = ViewController::resize_left(pos(500.0, 100.0), 900.0, 20.0);
    assert_eq!(resized, pos(0.0, 600.0));
}

#[test]
fn test_resize_right_clamps_to_min_width() {
    // 2% of a 1000px track: an attempted width of 5 is held at 20.
    let min_width = 0.02 * TRACK.width;
    let resized = ViewController::resize_right(pos(900.0, 100.0), 95.0, min_width, TRACK.width);
    assert_eq!(resized, pos(900.0, 20.0));

    let resized = ViewController::resize_right(pos(500.0, 100.0), -800.0, min_width, TRACK.width);
    assert_eq!(resized, pos(500.0, 500.0));
}

#[test]
fn test_initial_position_sits_at_right_edge() {
    assert_eq!(
        ViewController::initial_position(TRACK.width, 0.1),
        pos(900.0, 100.0)
    );
    assert_eq!(ViewController::initial_position(TRACK.width, 2.0), pos(0.0, 1000.0));
}

#[test]
fn test_window_from_brush() {
    let window = ViewController::window_from_brush(pos(900.0, 100.0), TRACK, 100).unwrap();
    assert_eq!((window.start(), window.end()), (90, 100));

    let window = ViewController::window_from_brush(pos(123.0, 250.0), TRACK, 1000).unwrap();
    assert_eq!((window.start(), window.end()), (123, 373));

    // A sliver still covers one index and stays inside the dataset.
    let window = ViewController::window_from_brush(pos(999.5, 0.5), TRACK, 100).unwrap();
    assert_eq!((window.start(), window.end()), (99, 100));

    assert!(ViewController::window_from_brush(pos(0.0, 10.0), TRACK, 0).is_err());
}

#[test]
fn test_brush_from_window() {
    let window = Window::new(250, 500, 1000).unwrap();
    let position = ViewController::brush_from_window(window, TRACK, 1000);
    assert_eq!(position, pos(250.0, 250.0));

    let back = ViewController::window_from_brush(position, TRACK, 1000).unwrap();
    assert_eq!(back, window);
}

#[test]
fn test_fit_to_track() {
    let min_width = 20.0;
    assert_eq!(
        ViewController::fit_to_track(pos(0.0, 10.0), min_width, TRACK.width),
        pos(0.0, 20.0)
    );
    assert_eq!(
        ViewController::fit_to_track(pos(990.0, 10.0), min_width, TRACK.width),
        pos(980.0, 20.0)
    );
    assert_eq!(
        ViewController::fit_to_track(pos(-50.0, 2000.0), min_width, TRACK.width),
        pos(0.0, 1000.0)
    );
    assert_eq!(
        ViewController::fit_to_track(pos(300.0, 100.0), min_width, TRACK.width),
        pos(300.0, 100.0)
    );
}

#[test]
fn test_resize_left_of_undersized_brush_stays_on_track() {
    // Narrower than the minimum, touching the left edge.
    let resized = ViewController::resize_left(pos(0.0, 10.0), 0.0, 20.0);
    assert!(resized.x >= 0.0);
    assert_eq!(resized.right(), 10.0);
}

#[test]
fn test_drag_invariants_hold_for_random_input() {
    let mut rng = StdRng::seed_from_u64(2024);
    let min_width = 0.02 * TRACK.width;

    for _ in 0..1000 {
        let width = rng.random_range(min_width..=TRACK.width);
        let x = rng.random_range(0.0..=TRACK.width - width);
        let start = pos(x, width);
        let dx = rng.random_range(-2000.0..2000.0);

        let moved = ViewController::move_window(start, dx, TRACK.width);
        assert!(moved.x >= 0.0);
        assert!(moved.right() <= TRACK.width + 1e-9);
        assert_eq!(moved.width, width);

        let left = ViewController::resize_left(start, dx, min_width);
        assert!(left.width >= min_width - 1e-9);
        assert!(left.width <= TRACK.width + 1e-9);
        assert!(left.x >= 0.0);
        assert!((left.right() - start.right()).abs() < 1e-9);

        let right = ViewController::resize_right(start, dx, min_width, TRACK.width);
        assert!(right.width >= min_width - 1e-9);
        assert!(right.right() <= TRACK.width + 1e-9);
        assert_eq!(right.x, x);

        let length = rng.random_range(1..5000);
        let window = ViewController::window_from_brush(right, TRACK, length).unwrap();
        assert!(window.start() < window.end());
        assert!(window.end() <= length);
    }
}
