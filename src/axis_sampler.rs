//! Axis label windows.
//!
//! The x sampler picks a bounded set of evenly spaced indices inside the
//! current window and memoizes the formatted text per dataset index. Both
//! samplers report which way the label set should animate when the view
//! changes.

use crate::data_types::{Transform, Window};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

pub type LabelFormatter = Box<dyn Fn(f64) -> String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Animation {
    FadeInLeft,
    FadeInRight,
    FadeInUp,
    FadeInDown,
    FadeOutLeft,
    FadeOutRight,
    FadeOutUp,
    FadeOutDown,
}

impl Direction {
    /// Horizontal direction between two windows.
    ///
    /// The start delta is examined first; the end delta only decides when the
    /// start did not move. Unchanged windows report `Left`.
    pub fn between(prev: Window, next: Window) -> Self {
        let d_start = prev.start() as i64 - next.start() as i64;
        let d_end = prev.end() as i64 - next.end() as i64;
        let moves_left = if d_start != 0 {
            d_start < 0
        } else if d_end != 0 {
            d_end < 0
        } else {
            true
        };
        if moves_left {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// `(enter, exit)` animations for the incoming and outgoing label sets.
    pub fn animations(self) -> (Animation, Animation) {
        match self {
            Self::Left => (Animation::FadeInRight, Animation::FadeOutLeft),
            Self::Right => (Animation::FadeInLeft, Animation::FadeOutRight),
            Self::Up => (Animation::FadeInUp, Animation::FadeOutUp),
            Self::Down => (Animation::FadeInDown, Animation::FadeOutDown),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisTransition {
    pub direction: Direction,
    pub enter: Animation,
    pub exit: Animation,
    pub duration: Duration,
}

impl AxisTransition {
    pub fn new(direction: Direction, duration: Duration) -> Self {
        let (enter, exit) = direction.animations();
        Self {
            direction,
            enter,
            exit,
            duration,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabel {
    /// Dataset index the label was sampled from.
    pub index: usize,
    /// Slot offset along the axis, in output pixels.
    pub x: f64,
    pub text: Rc<str>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisLabels {
    pub window: Window,
    pub labels: Vec<AxisLabel>,
    pub transition: Option<AxisTransition>,
}

/// Evenly spaced sample indices of `window`, at most `max_labels` of them.
pub fn sample_indices(window: Window, max_labels: usize, length: usize) -> Vec<usize> {
    let span = window.span();
    let amount = max_labels.min(span);
    if amount == 0 || length == 0 {
        return Vec::new();
    }
    let step = span as f64 / amount as f64;
    (0..amount)
        .map(|i| {
            let index = (window.start() as f64 + i as f64 * step).round() as usize;
            index.min(length - 1)
        })
        .collect()
}

pub struct AxisLabelSampler {
    max_labels: usize,
    formatter: LabelFormatter,
    cache: HashMap<usize, Rc<str>>,
    prev: Option<Window>,
    animation: Duration,
    format_calls: usize,
}

impl fmt::Debug for AxisLabelSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisLabelSampler")
            .field("max_labels", &self.max_labels)
            .field("cached", &self.cache.len())
            .field("prev", &self.prev)
            .finish_non_exhaustive()
    }
}

impl AxisLabelSampler {
    pub fn new(max_labels: usize, formatter: impl Fn(f64) -> String + 'static) -> Self {
        Self {
            max_labels,
            formatter: Box::new(formatter),
            cache: HashMap::new(),
            prev: None,
            animation: Duration::from_millis(200),
            format_calls: 0,
        }
    }

    pub fn with_animation(mut self, animation: Duration) -> Self {
        self.animation = animation;
        self
    }

    pub fn max_labels(&self) -> usize {
        self.max_labels
    }

    /// Changes the label budget, e.g. after the output width changed.
    pub fn set_max_labels(&mut self, max_labels: usize) {
        self.max_labels = max_labels;
    }

    /// How many times the formatter ran since creation.
    pub fn format_calls(&self) -> usize {
        self.format_calls
    }

    /// Samples labels of `values` for `window`, laying slots out over `width`.
    ///
    /// A transition is reported only when a previous window exists and differs.
    pub fn sample(&mut self, values: &[f64], window: Window, width: f64) -> AxisLabels {
        let indices = sample_indices(window, self.max_labels, values.len());
        let slot = if indices.is_empty() {
            0.0
        } else {
            width / indices.len() as f64
        };

        let mut labels = Vec::with_capacity(indices.len());
        for (i, index) in indices.into_iter().enumerate() {
            labels.push(AxisLabel {
                index,
                x: i as f64 * slot,
                text: self.format(index, values[index]),
            });
        }

        let transition = match self.prev {
            Some(prev) if prev != window => Some(AxisTransition::new(
                Direction::between(prev, window),
                self.animation,
            )),
            _ => None,
        };
        self.prev = Some(window);

        AxisLabels {
            window,
            labels,
            transition,
        }
    }

    fn format(&mut self, index: usize, value: f64) -> Rc<str> {
        if let Some(text) = self.cache.get(&index) {
            return text.clone();
        }
        let text: Rc<str> = (self.formatter)(value).into();
        self.format_calls += 1;
        trace!(index, %text, "formatted axis label");
        self.cache.insert(index, text.clone());
        text
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct YAxisLabel {
    pub value: f64,
    /// Baseline of the stroke, in output pixels from the top.
    pub y: f64,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct YAxisLabels {
    pub labels: Vec<YAxisLabel>,
    pub transition: Option<AxisTransition>,
}

/// Value labels for the horizontal strokes of the plot.
///
/// The zero baseline is fixed and not part of the sampled set.
pub struct YAxisSampler {
    amount: usize,
    formatter: LabelFormatter,
    prev_scale_y: Option<f64>,
    animation: Duration,
}

impl fmt::Debug for YAxisSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YAxisSampler")
            .field("amount", &self.amount)
            .field("prev_scale_y", &self.prev_scale_y)
            .finish_non_exhaustive()
    }
}

impl YAxisSampler {
    pub fn new(amount: usize, formatter: impl Fn(f64) -> String + 'static) -> Self {
        Self {
            amount,
            formatter: Box::new(formatter),
            prev_scale_y: None,
            animation: Duration::from_millis(200),
        }
    }

    pub fn with_animation(mut self, animation: Duration) -> Self {
        self.animation = animation;
        self
    }

    /// Labels for `transform`: stroke `i` reads `round(y_max / scale_y / (n + 1) * (i + 1))`.
    pub fn sample(&mut self, y_max: f64, transform: &Transform, height: f64) -> YAxisLabels {
        let scale_y = transform.scale_y;
        let divisions = (self.amount + 1) as f64;
        let step = if scale_y > 0.0 {
            y_max / scale_y / divisions
        } else {
            0.0
        };
        let spacing = height / divisions;

        let labels = (0..self.amount)
            .map(|i| {
                let value = (step * (i + 1) as f64).round();
                YAxisLabel {
                    value,
                    y: height - spacing * (i + 1) as f64,
                    text: (self.formatter)(value),
                }
            })
            .collect();

        let transition = match self.prev_scale_y {
            Some(prev) if prev != scale_y => {
                let direction = if prev > scale_y {
                    Direction::Down
                } else {
                    Direction::Up
                };
                Some(AxisTransition::new(direction, self.animation))
            }
            _ => None,
        };
        self.prev_scale_y = Some(scale_y);

        YAxisLabels { labels, transition }
    }
}
