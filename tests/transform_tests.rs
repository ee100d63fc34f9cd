use brush_chart::data_types::{Dataset, Scaled, Series, Track};
use brush_chart::error::ChartError;
use brush_chart::transform::{EngineEvent, TransformEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 400.0;

/// 100 points. Series `a` peaks at 50 (index 50) and reaches 40 at index 15;
/// series `b` peaks at 80 (index 70) and stays at 5 elsewhere.
fn two_series() -> Dataset {
    let mut a = vec![10.0; 100];
    a[15] = 40.0;
    a[50] = 50.0;
    let mut b = vec![5.0; 100];
    b[70] = 80.0;
    let x_axis = (0..100).map(|i| i as f64).collect();
    Dataset::new(
        vec![
            Series::new("a", a, "#f00", "A"),
            Series::new("b", b, "#00f", "B"),
        ],
        x_axis,
    )
}

fn engine() -> TransformEngine {
    TransformEngine::new(two_series(), WIDTH, HEIGHT).unwrap()
}

#[test]
fn test_full_and_narrow_window() {
    let mut engine = engine();
    assert_eq!(engine.dataset().y_max, 80.0);

    let full = engine.compute_transform(0, 100).unwrap().ready().unwrap();
    assert_eq!(full.scale_x, 1.0);
    assert_eq!(full.scale_y, 1.0);
    assert_eq!(full.dx, 0.0);
    assert_eq!(full.dy, 0.0);

    let narrow = engine.compute_transform(10, 20).unwrap().ready().unwrap();
    assert_eq!(narrow.scale_x, 10.0);
    // y_max / window max = 80 / 40
    assert_eq!(narrow.scale_y, 2.0);
    assert_eq!(narrow.dx, -100.0);
    assert_eq!(narrow.dy, HEIGHT / 2.0 - HEIGHT);

    let window = engine.compute_window(10, 20).unwrap().ready().unwrap();
    assert_eq!(window.max, 40.0);
    assert_eq!(window.x_axis.len(), 10);

    // The full window is still served from the cache.
    let again = engine.compute_transform(0, 100).unwrap().ready().unwrap();
    assert!(Rc::ptr_eq(&full, &again));
}

#[test]
fn test_compute_transform_is_idempotent() {
    let mut engine = engine();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let start = rng.random_range(0..99);
        let end = rng.random_range(start + 1..=100);
        let first = engine.compute_transform(start, end).unwrap().ready().unwrap();
        let second = engine.compute_transform(start, end).unwrap().ready().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert!(first.scale_y.is_finite() && first.dy.is_finite());
    }
}

#[test]
fn test_window_scaling_round_trip() {
    let mut engine = engine();
    let dataset = engine.dataset().clone();
    let scaled = engine.compute_window(0, 100).unwrap().ready().unwrap();
    assert_eq!(scaled.max, 80.0);

    for series in &dataset.series {
        let line = scaled.line(&series.field).unwrap();
        for (pixel, raw) in line.iter().zip(&series.values) {
            let restored = pixel * scaled.max / HEIGHT;
            assert!((restored - raw).abs() < 1e-9);
        }
    }
}

#[test]
fn test_toggle_restores_transform() {
    let mut engine = engine();
    let before = engine.compute_transform(10, 20).unwrap().ready().unwrap();

    assert!(engine.set_series_visibility("a", false).unwrap());
    let hidden = engine.compute_transform(10, 20).unwrap().ready().unwrap();
    assert_eq!(hidden.scale_y, 16.0);
    assert_ne!(*hidden, *before);

    assert!(engine.set_series_visibility("a", true).unwrap());
    let after = engine.compute_transform(10, 20).unwrap().ready().unwrap();
    assert_eq!(*after, *before);
    assert!(Rc::ptr_eq(&before, &after));
}

#[test]
fn test_all_hidden_signals_empty_visible_set() {
    let mut engine = engine();
    engine.set_series_visibility("a", false).unwrap();
    engine.set_series_visibility("b", false).unwrap();

    assert!(engine.compute_window(0, 100).unwrap().is_empty_visible_set());
    assert!(engine.compute_transform(10, 20).unwrap().is_empty_visible_set());
    let overview = engine.overview_transform(Track {
        width: WIDTH,
        height: 100.0,
    });
    assert_eq!(overview, Scaled::EmptyVisibleSet);
}

#[test]
fn test_invalid_windows_are_rejected() {
    let mut engine = engine();
    assert_eq!(
        engine.compute_transform(20, 10).unwrap_err(),
        ChartError::InvalidWindow {
            start: 20,
            end: 10,
            length: 100
        }
    );
    assert!(engine.compute_transform(5, 5).is_err());
    assert!(engine.compute_window(0, 101).is_err());
    assert!(matches!(
        engine.set_series_visibility("missing", false),
        Err(ChartError::UnknownField(_))
    ));
}

#[test]
fn test_zero_valued_series_scale_to_zero() {
    let dataset = Dataset::new(
        vec![Series::new("flat", vec![0.0; 10], "#000", "")],
        (0..10).map(|i| i as f64).collect(),
    );
    let mut engine = TransformEngine::new(dataset, WIDTH, HEIGHT).unwrap();

    let transform = engine.compute_transform(2, 8).unwrap().ready().unwrap();
    assert_eq!(transform.scale_y, 1.0);
    assert_eq!(transform.dy, 0.0);

    let window = engine.compute_window(2, 8).unwrap().ready().unwrap();
    assert!(window.line("flat").unwrap().iter().all(|v| *v == 0.0));
}

#[test]
fn test_empty_dataset_is_rejected() {
    let dataset = Dataset::new(Vec::new(), Vec::new());
    assert_eq!(
        TransformEngine::new(dataset, WIDTH, HEIGHT).unwrap_err(),
        ChartError::EmptyDataset
    );
}

#[test]
fn test_resize_changes_key() {
    let mut engine = engine();
    let before = engine.compute_transform(10, 20).unwrap().ready().unwrap();
    engine.update_output_size(500.0, HEIGHT);
    let after = engine.compute_transform(10, 20).unwrap().ready().unwrap();
    assert_eq!(before.dx, -100.0);
    assert_eq!(after.dx, -50.0);
    assert_eq!(engine.x_positions()[1], 5.0);
}

#[test]
fn test_bounded_cache_evicts_oldest() {
    let mut engine = engine().with_cache_capacity(Some(2));
    let first = engine.compute_transform(0, 10).unwrap().ready().unwrap();
    engine.compute_transform(10, 20).unwrap();
    engine.compute_transform(20, 30).unwrap();
    assert_eq!(engine.cache_len(), 2);

    let recomputed = engine.compute_transform(0, 10).unwrap().ready().unwrap();
    assert!(!Rc::ptr_eq(&first, &recomputed));
    assert_eq!(*first, *recomputed);

    engine.clear_cache();
    assert_eq!(engine.cache_len(), 0);
}

#[test]
fn test_set_window_notifies() {
    let mut engine = engine();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = engine.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    engine.set_window(10, 20).unwrap();
    assert_eq!(engine.window().start(), 10);
    engine.set_series_visibility("b", false).unwrap();
    engine.update_output_size(800.0, HEIGHT);

    let events = seen.borrow();
    assert_eq!(events.len(), 3);
    match &events[0] {
        EngineEvent::TransformChanged { window, transform } => {
            assert_eq!((window.start(), window.end()), (10, 20));
            assert_eq!(transform.as_ready().unwrap().scale_y, 2.0);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        events[1],
        EngineEvent::VisibilityChanged {
            field: "b".to_string(),
            visible: false
        }
    );
    drop(events);
    assert!(engine.unsubscribe(id));
}

#[test]
fn test_inspect_and_index_at() {
    let mut engine = engine();
    engine.set_window(10, 20).unwrap();
    let index = engine.index_at(WIDTH / 2.0);
    assert_eq!(index, 15);
    assert_eq!(engine.index_at(WIDTH * 2.0), 19);

    let point = engine.inspect(index).unwrap();
    assert_eq!(point.x, 15.0);
    let values: Vec<f64> = point.values.iter().map(|v| v.value).collect();
    assert_eq!(values, vec![40.0, 5.0]);
    assert_eq!(point.values[0].name, "A");
    assert!(engine.inspect(100).is_none());
}

#[test]
fn test_overview_fits_track() {
    let mut engine = engine();
    let track = Track {
        width: WIDTH,
        height: 100.0,
    };
    let overview = engine.overview_transform(track).ready().unwrap();
    assert_eq!(overview.scale_x, 1.0);
    assert_eq!(overview.scale_y, 0.25);

    // Only `a` left: the minimap refits to its all-time max of 50.
    engine.set_series_visibility("b", false).unwrap();
    let overview = engine.overview_transform(track).ready().unwrap();
    assert!((overview.scale_y - 0.4).abs() < 1e-12);
}
