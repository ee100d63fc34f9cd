//! Rendering surface contract for the chart.

use crate::data_types::{ScaledLine, Transform};
use crate::transform::TransformEngine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Main plot area.
    Lines,
    /// Minimap drawn inside the brush track.
    Overview,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveId {
    pub layer: Layer,
    pub field: String,
}

impl PrimitiveId {
    pub fn new(layer: Layer, field: impl Into<String>) -> Self {
        Self {
            layer,
            field: field.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Polyline in full-dataset pixel space, y growing upwards from 0.
    Line {
        color: String,
        points: Vec<(f64, f64)>,
    },
}

/// Host surface the core draws into. Implementations own the actual visual
/// elements; the core never touches them directly.
pub trait RenderSurface {
    fn append_primitive(&mut self, id: PrimitiveId, primitive: Primitive);
    fn remove_primitive(&mut self, id: &PrimitiveId);
    fn set_transform(&mut self, layer: Layer, transform: &Transform);
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Append(PrimitiveId),
    Remove(PrimitiveId),
    SetTransform(Layer, Transform),
}

/// Headless surface that keeps the attached primitives and an operation log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub primitives: Vec<(PrimitiveId, Primitive)>,
    pub transforms: Vec<(Layer, Transform)>,
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &PrimitiveId) -> bool {
        self.primitives.iter().any(|(pid, _)| pid == id)
    }

    pub fn transform(&self, layer: Layer) -> Option<Transform> {
        self.transforms
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, t)| *t)
    }
}

impl RenderSurface for RecordingSurface {
    fn append_primitive(&mut self, id: PrimitiveId, primitive: Primitive) {
        self.ops.push(SurfaceOp::Append(id.clone()));
        self.primitives.retain(|(pid, _)| *pid != id);
        self.primitives.push((id, primitive));
    }

    fn remove_primitive(&mut self, id: &PrimitiveId) {
        self.ops.push(SurfaceOp::Remove(id.clone()));
        self.primitives.retain(|(pid, _)| pid != id);
    }

    fn set_transform(&mut self, layer: Layer, transform: &Transform) {
        self.ops.push(SurfaceOp::SetTransform(layer, *transform));
        match self.transforms.iter_mut().find(|(l, _)| *l == layer) {
            Some(entry) => entry.1 = *transform,
            None => self.transforms.push((layer, *transform)),
        }
    }
}

fn line_points(x_positions: &[f64], line: &ScaledLine) -> Vec<(f64, f64)> {
    x_positions
        .iter()
        .copied()
        .zip(line.values.iter().copied())
        .collect()
}

/// Builds the polyline of one series against the global maximum.
pub fn line_primitive(engine: &mut TransformEngine, field: &str) -> Option<Primitive> {
    let color = engine.dataset().series(field)?.color.clone();
    let positions = engine.x_positions();
    let line = engine.full_scale().into_iter().find(|l| l.field == field)?;
    Some(Primitive::Line {
        color,
        points: line_points(&positions, &line),
    })
}

/// Appends one polyline per visible series onto `layer`.
pub fn paint_lines(surface: &mut dyn RenderSurface, engine: &mut TransformEngine, layer: Layer) {
    let positions = engine.x_positions();
    let lines = engine.full_scale();
    for line in &lines {
        let Some(series) = engine.dataset().series(&line.field) else {
            continue;
        };
        if !series.visible {
            continue;
        }
        surface.append_primitive(
            PrimitiveId::new(layer, line.field.clone()),
            Primitive::Line {
                color: series.color.clone(),
                points: line_points(&positions, line),
            },
        );
    }
}
