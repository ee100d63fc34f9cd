//! Windowed transform engine.
//!
//! Owns the dataset and memoizes, per window, both the view transform and the
//! Y-scaled series values. Entries are keyed structurally by window, output
//! size and the set of visible fields, so toggling a series or resizing the
//! output simply lands on another key.

use crate::data_types::{
    ChartConfig, Dataset, RawChartData, Scaled, ScaledLine, Track, Transform, Window,
    WindowedScale,
};
use crate::error::{ChartError, Result};
use crate::events::{EventEmitter, SubscriptionId};
use crate::extract::{prepare_data, Extractors};
use crate::scales::{index_positions, vertical_fit, ValueScale};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransformKey {
    pub window: Window,
    width_bits: u64,
    height_bits: u64,
    pub visible: BTreeSet<String>,
}

impl TransformKey {
    pub fn new(window: Window, width: f64, height: f64, visible: BTreeSet<String>) -> Self {
        Self {
            window,
            width_bits: width.to_bits(),
            height_bits: height.to_bits(),
            visible,
        }
    }

    pub fn width(&self) -> f64 {
        f64::from_bits(self.width_bits)
    }

    pub fn height(&self) -> f64 {
        f64::from_bits(self.height_bits)
    }
}

/// Append-only memo table, optionally bounded with oldest-first eviction.
#[derive(Debug)]
struct MemoCache<V> {
    entries: HashMap<TransformKey, V>,
    order: VecDeque<TransformKey>,
    capacity: Option<usize>,
}

impl<V: Clone> MemoCache<V> {
    fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, key: &TransformKey) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: TransformKey, value: V) {
        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity.max(1) {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
                debug!(window = ?oldest.window, "evicted memoized window");
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    TransformChanged {
        window: Window,
        transform: Scaled<Transform>,
    },
    VisibilityChanged {
        field: String,
        visible: bool,
    },
    OutputResized {
        width: f64,
        height: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesValue {
    pub field: String,
    pub name: String,
    pub color: String,
    pub value: f64,
}

/// Hover summary for one dataset index.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSummary {
    pub index: usize,
    pub x: f64,
    pub values: Vec<SeriesValue>,
}

pub struct TransformEngine {
    dataset: Dataset,
    width: f64,
    height: f64,
    window: Window,
    transforms: MemoCache<Rc<Transform>>,
    windows: MemoCache<Rc<WindowedScale>>,
    x_positions: Option<(u64, Rc<[f64]>)>,
    events: EventEmitter<EngineEvent>,
}

impl std::fmt::Debug for TransformEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformEngine")
            .field("length", &self.dataset.length)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("window", &self.window)
            .field("cached", &self.cache_len())
            .finish()
    }
}

impl TransformEngine {
    /// The dataset is guaranteed non-empty by [`prepare_data`]; a hand-built
    /// empty dataset is rejected here as well.
    pub fn new(dataset: Dataset, width: f64, height: f64) -> Result<Self> {
        let window = Window::full(dataset.length).map_err(|_| ChartError::EmptyDataset)?;
        Ok(Self {
            dataset,
            width,
            height,
            window,
            transforms: MemoCache::new(None),
            windows: MemoCache::new(None),
            x_positions: None,
            events: EventEmitter::new(),
        })
    }

    pub fn from_raw(
        raw: &RawChartData,
        config: &ChartConfig,
        extractors: &Extractors,
    ) -> Result<Self> {
        let dataset = prepare_data(raw, config, extractors)?;
        let engine = Self::new(dataset, config.width, config.height)?;
        Ok(engine.with_cache_capacity(config.cache_capacity))
    }

    pub fn with_cache_capacity(mut self, capacity: Option<usize>) -> Self {
        self.transforms = MemoCache::new(capacity);
        self.windows = MemoCache::new(capacity);
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn len(&self) -> usize {
        self.dataset.length
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.length == 0
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Window most recently applied through [`Self::set_window`].
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&EngineEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn key(&self, window: Window) -> TransformKey {
        TransformKey::new(window, self.width, self.height, self.dataset.visible_fields())
    }

    /// Transform of `[start, end)` for the current visibility and output size.
    ///
    /// Identical inputs return the same `Rc`.
    pub fn compute_transform(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<Scaled<Rc<Transform>>> {
        let window = Window::new(start, end, self.dataset.length)?;
        if !self.dataset.has_visible() {
            return Ok(Scaled::EmptyVisibleSet);
        }

        let key = self.key(window);
        if let Some(cached) = self.transforms.get(&key) {
            return Ok(Scaled::Ready(cached));
        }

        let length = self.dataset.length as f64;
        let window_max = self.dataset.visible_max_in(start, end).unwrap_or(0.0);
        let (scale_y, dy) = vertical_fit(self.dataset.y_max, window_max, self.height);
        let transform = Rc::new(Transform {
            scale_x: length / window.span() as f64,
            scale_y,
            dx: -(self.width / length) * start as f64,
            dy,
        });
        debug!(start, end, window_max, ?transform, "computed window transform");

        self.transforms.insert(key, transform.clone());
        Ok(Scaled::Ready(transform))
    }

    /// Windowed x values and visible series scaled to the window maximum.
    pub fn compute_window(
        &mut self,
        start: usize,
        end: usize,
    ) -> Result<Scaled<Rc<WindowedScale>>> {
        let window = Window::new(start, end, self.dataset.length)?;
        if !self.dataset.has_visible() {
            return Ok(Scaled::EmptyVisibleSet);
        }

        let key = self.key(window);
        if let Some(cached) = self.windows.get(&key) {
            return Ok(Scaled::Ready(cached));
        }

        let max = self.dataset.visible_max_in(start, end).unwrap_or(0.0);
        let scale = ValueScale::new(max, self.height);
        let lines = self
            .dataset
            .visible_series()
            .map(|s| ScaledLine {
                field: s.field.clone(),
                values: scale.map_all(&s.values[start..end]),
            })
            .collect();
        let scaled = Rc::new(WindowedScale {
            window,
            x_axis: self.dataset.x_axis[start..end].to_vec(),
            lines,
            max,
        });
        debug!(start, end, max, "scaled window values");

        self.windows.insert(key, scaled.clone());
        Ok(Scaled::Ready(scaled))
    }

    /// Applies `[start, end)` as the current window and notifies subscribers.
    pub fn set_window(&mut self, start: usize, end: usize) -> Result<Scaled<Rc<Transform>>> {
        let transform = self.compute_transform(start, end)?;
        self.window = Window::new(start, end, self.dataset.length)?;
        self.emit_transform(&transform);
        Ok(transform)
    }

    /// Recomputes the current window, e.g. after a toggle or resize.
    pub fn refresh(&mut self) -> Result<Scaled<Rc<Transform>>> {
        let window = self.window;
        self.set_window(window.start(), window.end())
    }

    fn emit_transform(&mut self, transform: &Scaled<Rc<Transform>>) {
        let event = EngineEvent::TransformChanged {
            window: self.window,
            transform: transform.clone().map(|t| *t),
        };
        self.events.emit(&event);
    }

    /// Flips a series flag without recomputing. Returns whether it changed.
    pub fn set_series_visibility(&mut self, field: &str, visible: bool) -> Result<bool> {
        let series = self
            .dataset
            .series_mut(field)
            .ok_or_else(|| ChartError::UnknownField(field.to_string()))?;
        if series.visible == visible {
            return Ok(false);
        }
        series.visible = visible;
        debug!(field, visible, "series visibility changed");
        self.events.emit(&EngineEvent::VisibilityChanged {
            field: field.to_string(),
            visible,
        });
        Ok(true)
    }

    pub fn update_output_size(&mut self, width: f64, height: f64) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        debug!(width, height, "output resized");
        self.events.emit(&EngineEvent::OutputResized { width, height });
    }

    /// Full-dataset pixel x coordinate of every index.
    pub fn x_positions(&mut self) -> Rc<[f64]> {
        let bits = self.width.to_bits();
        if let Some((cached_bits, positions)) = &self.x_positions {
            if *cached_bits == bits {
                return positions.clone();
            }
        }
        let positions: Rc<[f64]> = index_positions(self.dataset.length, self.width).into();
        self.x_positions = Some((bits, positions.clone()));
        positions
    }

    /// Every series scaled against the dataset-wide maximum, hidden ones
    /// included. This is the geometry the view transform is applied to.
    pub fn full_scale(&self) -> Vec<ScaledLine> {
        let scale = ValueScale::new(self.dataset.y_max, self.height);
        self.dataset
            .series
            .iter()
            .map(|s| ScaledLine {
                field: s.field.clone(),
                values: scale.map_all(&s.values),
            })
            .collect()
    }

    /// Transform of the brush minimap: the whole dataset squeezed into the
    /// track and refit to the tallest visible series.
    pub fn overview_transform(&self, track: Track) -> Scaled<Transform> {
        let Some(visible_max) = self.dataset.visible_y_max() else {
            return Scaled::EmptyVisibleSet;
        };
        let (fit, dy) = vertical_fit(self.dataset.y_max, visible_max, self.height);
        let scale_x = if self.width > 0.0 { track.width / self.width } else { 1.0 };
        let scale_y = if self.height > 0.0 {
            track.height / self.height * fit
        } else {
            fit
        };
        Scaled::Ready(Transform {
            scale_x,
            scale_y,
            dx: 0.0,
            dy,
        })
    }

    /// Raw values of the visible series at `index`.
    pub fn inspect(&self, index: usize) -> Option<PointSummary> {
        let x = *self.dataset.x_axis.get(index)?;
        let values = self
            .dataset
            .visible_series()
            .map(|s| SeriesValue {
                field: s.field.clone(),
                name: s.name.clone(),
                color: s.color.clone(),
                value: s.values[index],
            })
            .collect();
        Some(PointSummary { index, x, values })
    }

    /// Nearest dataset index under output pixel `pixel_x` in the current window.
    pub fn index_at(&self, pixel_x: f64) -> usize {
        let window = self.window;
        if self.width <= 0.0 {
            return window.start();
        }
        let pct = (pixel_x / self.width).clamp(0.0, 1.0);
        let offset = (pct * window.span() as f64).round() as usize;
        (window.start() + offset).min(window.end() - 1)
    }

    /// Number of memoized entries across both tables.
    pub fn cache_len(&self) -> usize {
        self.transforms.len() + self.windows.len()
    }

    pub fn clear_cache(&mut self) {
        self.transforms.clear();
        self.windows.clear();
        self.x_positions = None;
    }
}
