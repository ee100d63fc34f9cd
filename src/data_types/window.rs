use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};

/// Half-open index range `[start, end)` into the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    start: usize,
    end: usize,
}

impl Window {
    /// Fails unless `start < end <= length`.
    pub fn new(start: usize, end: usize, length: usize) -> Result<Self> {
        if start >= end || end > length {
            return Err(ChartError::InvalidWindow { start, end, length });
        }
        Ok(Self { start, end })
    }

    pub fn full(length: usize) -> Result<Self> {
        Self::new(0, length, length)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices covered, always at least one.
    pub fn span(&self) -> usize {
        self.end - self.start
    }
}

/// Maps full-dataset pixel space to the visible pixel space of a window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            dx: 0.0,
            dy: 0.0,
        }
    }
}

/// Outcome of a scaling request.
///
/// `EmptyVisibleSet` means every series is hidden and there is nothing to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum Scaled<T> {
    Ready(T),
    EmptyVisibleSet,
}

impl<T> Scaled<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::EmptyVisibleSet => None,
        }
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::EmptyVisibleSet => None,
        }
    }

    pub fn is_empty_visible_set(&self) -> bool {
        matches!(self, Self::EmptyVisibleSet)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Scaled<U> {
        match self {
            Self::Ready(value) => Scaled::Ready(f(value)),
            Self::EmptyVisibleSet => Scaled::EmptyVisibleSet,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScaledLine {
    pub field: String,
    pub values: Vec<f64>,
}

/// Windowed x labels plus Y-scaled pixel values of every visible series.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowedScale {
    pub window: Window,
    pub x_axis: Vec<f64>,
    pub lines: Vec<ScaledLine>,
    /// Max over all visible series inside the window.
    pub max: f64,
}

impl WindowedScale {
    pub fn line(&self, field: &str) -> Option<&[f64]> {
        self.lines
            .iter()
            .find(|line| line.field == field)
            .map(|line| line.values.as_slice())
    }
}

/// Brush rectangle in track pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrushPosition {
    pub x: f64,
    pub width: f64,
}

impl BrushPosition {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Pixel dimensions of the brush track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub width: f64,
    pub height: f64,
}
