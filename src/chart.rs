//! Chart controller
//!
//! `Chart` wires the pieces together: normalized pointer input drives the
//! brush, brush positions become dataset windows pushed into the transform
//! engine, and the resulting transform is forwarded to the rendering surface
//! while axis labels are refreshed under caller-side throttles.
//!
//! Everything runs synchronously inside the calls below; time is passed in
//! explicitly so the label throttles can be driven deterministically.

use crate::axis_sampler::{
    AxisLabelSampler, AxisLabels, LabelFormatter, YAxisLabels, YAxisSampler,
};
use crate::brush::Brush;
use crate::data_types::{
    BrushPosition, ChartConfig, RawChartData, Scaled, Track, Transform, Window,
};
use crate::error::Result;
use crate::events::{EventEmitter, SubscriptionId};
use crate::extract::Extractors;
use crate::input::{InputAdapter, PointerEvent, RawInput};
use crate::rendering::{line_primitive, paint_lines, Layer, PrimitiveId, RenderSurface};
use crate::transform::{PointSummary, TransformEngine};
use crate::utils::date_formatter;
use crate::utils::throttle::Throttle;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info};

/// Label text formatters.
pub struct Formatters {
    pub x_axis: LabelFormatter,
    pub tooltip: LabelFormatter,
    pub y_axis: LabelFormatter,
}

impl Default for Formatters {
    fn default() -> Self {
        Self {
            x_axis: Box::new(date_formatter::x_axis_label),
            tooltip: Box::new(date_formatter::tooltip_label),
            y_axis: Box::new(date_formatter::y_axis_label),
        }
    }
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatters").finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub point: PointSummary,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    TransformChanged {
        window: Window,
        transform: Scaled<Transform>,
    },
    BrushMoved {
        position: BrushPosition,
        track: Track,
    },
    OverviewChanged(Scaled<Transform>),
    XAxisLabels(AxisLabels),
    YAxisLabels(YAxisLabels),
    VisibilityChanged {
        field: String,
        visible: bool,
    },
    /// `None` hides the tooltip.
    Tooltip(Option<Tooltip>),
}

pub type SharedSurface = Rc<RefCell<dyn RenderSurface>>;

pub struct Chart {
    config: ChartConfig,
    engine: TransformEngine,
    brush: Option<Brush>,
    input: InputAdapter,
    x_axis: Option<AxisLabelSampler>,
    y_axis: Option<YAxisSampler>,
    x_throttle: Throttle,
    y_throttle: Throttle,
    tooltip_formatter: LabelFormatter,
    surface: Option<SharedSurface>,
    window_applied: bool,
    events: EventEmitter<ChartEvent>,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("brush", &self.brush)
            .field("attached", &self.surface.is_some())
            .finish_non_exhaustive()
    }
}

impl Chart {
    pub fn new(
        raw: &RawChartData,
        config: ChartConfig,
        extractors: &Extractors,
        formatters: Formatters,
    ) -> Result<Self> {
        let engine = TransformEngine::from_raw(raw, &config, extractors)?;

        let brush = config
            .with_brush
            .then(|| Brush::new(config.track(), config.brush.clone()));
        let x_axis = config.with_x_axis.then(|| {
            AxisLabelSampler::new(config.x_axis_label_amount(), formatters.x_axis)
                .with_animation(config.x_axis_animation())
        });
        let y_axis = config.with_y_axis.then(|| {
            YAxisSampler::new(config.horizontal_strokes_amount, formatters.y_axis)
                .with_animation(config.y_axis_animation())
        });

        Ok(Self {
            x_throttle: Throttle::new(config.x_axis_animation()),
            y_throttle: Throttle::new(config.y_axis_animation()),
            config,
            engine,
            brush,
            input: InputAdapter::default(),
            x_axis,
            y_axis,
            tooltip_formatter: formatters.tooltip,
            surface: None,
            window_applied: false,
            events: EventEmitter::new(),
        })
    }

    /// Builds a chart from the JSON form of [`RawChartData`] with default
    /// extractors and formatters.
    pub fn from_json(json: &str, config: ChartConfig) -> eyre::Result<Self> {
        let raw = RawChartData::from_json_str(json)?;
        Ok(Self::new(&raw, config, &Extractors::default(), Formatters::default())?)
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TransformEngine {
        &mut self.engine
    }

    pub fn brush(&self) -> Option<&Brush> {
        self.brush.as_ref()
    }

    pub fn brush_mut(&mut self) -> Option<&mut Brush> {
        self.brush.as_mut()
    }

    /// Page x of the brush track's left edge, used to normalize host input.
    pub fn set_track_origin(&mut self, origin_x: f64) {
        self.input.origin_x = origin_x;
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ChartEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Paints every visible line onto `surface` and applies the initial window.
    pub fn attach(&mut self, surface: SharedSurface, now: Instant) -> Result<()> {
        {
            let mut target = surface.borrow_mut();
            paint_lines(&mut *target, &mut self.engine, Layer::Lines);
            if self.brush.is_some() {
                paint_lines(&mut *target, &mut self.engine, Layer::Overview);
            }
        }
        self.surface = Some(surface);
        info!(length = self.engine.len(), "chart attached");

        self.update_overview();
        if let Some(brush) = self.brush.as_mut() {
            brush.announce();
        }
        self.apply_window(now, true)
    }

    /// Removes every primitive the chart appended.
    pub fn detach(&mut self) {
        let Some(surface) = self.surface.take() else {
            return;
        };
        let mut target = surface.borrow_mut();
        for series in &self.engine.dataset().series {
            target.remove_primitive(&PrimitiveId::new(Layer::Lines, series.field.clone()));
            if self.brush.is_some() {
                target.remove_primitive(&PrimitiveId::new(Layer::Overview, series.field.clone()));
            }
        }
        self.window_applied = false;
    }

    /// Normalizes host input and feeds it to the brush.
    pub fn handle_input(&mut self, input: &RawInput, now: Instant) -> Result<Option<Window>> {
        match self.input.normalize(input) {
            Some(event) => self.handle_pointer(event, now),
            None => Ok(None),
        }
    }

    /// Feeds a pointer event to the brush. Returns the new window when the
    /// event changed it.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> Result<Option<Window>> {
        let Some(brush) = self.brush.as_mut() else {
            return Ok(None);
        };
        let Some(position) = brush.handle(event) else {
            return Ok(None);
        };
        self.events.emit(&ChartEvent::BrushMoved {
            position,
            track: brush.track(),
        });

        let before = self.engine.window();
        self.apply_window(now, false)?;
        let after = self.engine.window();
        Ok((before != after).then_some(after))
    }

    /// Shows or hides a series and rescales the view.
    ///
    /// Returns false when toggling is disabled or nothing changed.
    pub fn toggle_series(&mut self, field: &str, visible: bool, now: Instant) -> Result<bool> {
        if !self.config.lines_toggleable {
            return Ok(false);
        }
        if !self.engine.set_series_visibility(field, visible)? {
            return Ok(false);
        }
        self.events.emit(&ChartEvent::VisibilityChanged {
            field: field.to_string(),
            visible,
        });

        if let Some(surface) = &self.surface {
            let mut target = surface.borrow_mut();
            let mut layers = vec![Layer::Lines];
            if self.brush.is_some() {
                layers.push(Layer::Overview);
            }
            for layer in layers {
                let id = PrimitiveId::new(layer, field);
                if visible {
                    if let Some(primitive) = line_primitive(&mut self.engine, field) {
                        target.append_primitive(id, primitive);
                    }
                } else {
                    target.remove_primitive(&id);
                }
            }
        }

        self.update_overview();
        let transform = self.engine.refresh()?;
        self.publish_transform(&transform);
        self.request_labels(now);
        Ok(true)
    }

    /// Changes the output size, rescaling the brush track and repainting.
    pub fn resize(&mut self, width: f64, height: f64, now: Instant) -> Result<()> {
        self.config.width = width;
        self.config.height = height;
        self.engine.update_output_size(width, height);
        if let Some(brush) = self.brush.as_mut() {
            brush.resize_track(self.config.track());
        }
        if let Some(sampler) = self.x_axis.as_mut() {
            sampler.set_max_labels(self.config.x_axis_label_amount());
        }

        if let Some(surface) = self.surface.clone() {
            let mut target = surface.borrow_mut();
            let mut layers = vec![Layer::Lines];
            if self.brush.is_some() {
                layers.push(Layer::Overview);
            }
            for layer in layers {
                for series in &self.engine.dataset().series {
                    target.remove_primitive(&PrimitiveId::new(layer, series.field.clone()));
                }
                paint_lines(&mut *target, &mut self.engine, layer);
            }
        }

        self.update_overview();
        self.apply_window(now, true)
    }

    /// Releases trailing label refreshes whose throttle window elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.x_throttle.poll(now) {
            self.refresh_x_labels();
        }
        if self.y_throttle.poll(now) {
            self.refresh_y_labels();
        }
    }

    /// Tooltip for output pixel `pixel_x`, also published as an event.
    pub fn hover(&mut self, pixel_x: f64) -> Option<Tooltip> {
        if !self.config.with_tooltip || !self.engine.dataset().has_visible() {
            return None;
        }
        let index = self.engine.index_at(pixel_x);
        let point = self.engine.inspect(index)?;
        let tooltip = Tooltip {
            title: (self.tooltip_formatter)(point.x),
            point,
        };
        self.events.emit(&ChartEvent::Tooltip(Some(tooltip.clone())));
        Some(tooltip)
    }

    pub fn hide_tooltip(&mut self) {
        self.events.emit(&ChartEvent::Tooltip(None));
    }

    /// Current window from the brush (or the whole dataset without one).
    fn target_window(&self) -> Result<Window> {
        match &self.brush {
            Some(brush) => brush.to_window(self.engine.len()),
            None => Window::full(self.engine.len()),
        }
    }

    fn apply_window(&mut self, now: Instant, force: bool) -> Result<()> {
        let window = self.target_window()?;
        if !force && self.window_applied && window == self.engine.window() {
            return Ok(());
        }
        debug!(start = window.start(), end = window.end(), "applying window");

        let transform = self.engine.set_window(window.start(), window.end())?;
        self.window_applied = true;
        self.publish_transform(&transform);
        self.request_labels(now);
        self.hide_tooltip();
        Ok(())
    }

    fn publish_transform(&mut self, transform: &Scaled<Rc<Transform>>) {
        if let (Some(surface), Some(t)) = (&self.surface, transform.as_ready()) {
            surface.borrow_mut().set_transform(Layer::Lines, t);
        }
        self.events.emit(&ChartEvent::TransformChanged {
            window: self.engine.window(),
            transform: transform.clone().map(|t| *t),
        });
    }

    fn update_overview(&mut self) {
        let Some(brush) = &self.brush else {
            return;
        };
        let overview = self.engine.overview_transform(brush.track());
        if let (Some(surface), Some(t)) = (&self.surface, overview.as_ready()) {
            surface.borrow_mut().set_transform(Layer::Overview, t);
        }
        self.events.emit(&ChartEvent::OverviewChanged(overview));
    }

    fn request_labels(&mut self, now: Instant) {
        if self.x_throttle.request(now) {
            self.refresh_x_labels();
        }
        if self.y_throttle.request(now) {
            self.refresh_y_labels();
        }
    }

    fn refresh_x_labels(&mut self) {
        if !self.engine.dataset().has_visible() {
            return;
        }
        let window = self.engine.window();
        let width = self.engine.width();
        let Some(sampler) = self.x_axis.as_mut() else {
            return;
        };
        let labels = sampler.sample(&self.engine.dataset().x_axis, window, width);
        self.events.emit(&ChartEvent::XAxisLabels(labels));
    }

    fn refresh_y_labels(&mut self) {
        if self.y_axis.is_none() {
            return;
        }
        let window = self.engine.window();
        let transform = match self.engine.compute_transform(window.start(), window.end()) {
            Ok(Scaled::Ready(t)) => t,
            Ok(Scaled::EmptyVisibleSet) | Err(_) => return,
        };
        let y_max = self.engine.dataset().y_max;
        let height = self.engine.height();
        let Some(sampler) = self.y_axis.as_mut() else {
            return;
        };
        let labels = sampler.sample(y_max, &transform, height);
        self.events.emit(&ChartEvent::YAxisLabels(labels));
    }
}
