//! Brush state machine: a draggable, resizable window over a fixed track.

use crate::data_types::{BrushConfig, BrushPosition, Track, Window};
use crate::error::Result;
use crate::events::{EventEmitter, SubscriptionId};
use crate::input::{PointerEvent, PointerPhase};
use crate::view_controller::ViewController;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    MoveWindow,
    ResizeLeft,
    ResizeRight,
}

/// Snapshot taken when a drag starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub target: DragTarget,
    pub start_pointer_x: f64,
    pub start_window: BrushPosition,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BrushState {
    Idle,
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BrushEvent {
    Moved {
        position: BrushPosition,
        track: Track,
    },
}

#[derive(Debug)]
pub struct Brush {
    config: BrushConfig,
    track: Track,
    min_width: f64,
    position: BrushPosition,
    state: BrushState,
    events: EventEmitter<BrushEvent>,
}

impl Brush {
    pub fn new(track: Track, config: BrushConfig) -> Self {
        let position =
            ViewController::initial_position(track.width, config.initial_width_percentage);
        Self {
            min_width: config.min_width_percentage * track.width,
            config,
            track,
            position,
            state: BrushState::Idle,
            events: EventEmitter::new(),
        }
    }

    pub fn position(&self) -> BrushPosition {
        self.position
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, BrushState::Dragging(_))
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&BrushEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Emits the current position, as done when the brush is first attached.
    pub fn announce(&mut self) {
        self.emit();
    }

    /// Which part of the brush lies under track coordinate `x`.
    ///
    /// The handles take precedence over the body; when the brush is narrower
    /// than both handles, the nearer edge wins.
    pub fn hit_test(&self, x: f64) -> Option<DragTarget> {
        let left = self.position.x;
        let right = self.position.right();
        if x < left || x > right {
            return None;
        }
        let handle = self.config.handle_width;
        let near_left = x - left <= handle;
        let near_right = right - x <= handle;
        match (near_left, near_right) {
            (true, true) => Some(if x - left <= right - x {
                DragTarget::ResizeLeft
            } else {
                DragTarget::ResizeRight
            }),
            (true, false) => Some(DragTarget::ResizeLeft),
            (false, true) => Some(DragTarget::ResizeRight),
            (false, false) => Some(DragTarget::MoveWindow),
        }
    }

    /// Feeds one normalized pointer event. Returns the new position when the
    /// event moved the brush.
    pub fn handle(&mut self, event: PointerEvent) -> Option<BrushPosition> {
        match event.phase {
            PointerPhase::Down => {
                self.pointer_down(event.x);
                None
            }
            PointerPhase::Move => self.pointer_move(event.x),
            PointerPhase::Up | PointerPhase::Cancel => {
                self.pointer_up();
                None
            }
        }
    }

    /// Starts a drag on whatever part of the brush is under `x`.
    pub fn pointer_down(&mut self, x: f64) -> Option<DragTarget> {
        let target = self.hit_test(x);
        match target {
            Some(target) => self.begin_drag(x, target),
            None => trace!(x, "pointer down outside brush ignored"),
        }
        target
    }

    pub fn begin_drag(&mut self, x: f64, target: DragTarget) {
        debug!(drag = ?target, x, "brush drag started");
        self.state = BrushState::Dragging(DragSession {
            target,
            start_pointer_x: x,
            start_window: self.position,
        });
    }

    pub fn pointer_move(&mut self, x: f64) -> Option<BrushPosition> {
        let BrushState::Dragging(session) = self.state else {
            trace!(x, "pointer move without drag ignored");
            return None;
        };

        let dx = session.start_pointer_x - x;
        let start = session.start_window;
        let next = match session.target {
            DragTarget::MoveWindow => ViewController::move_window(start, dx, self.track.width),
            DragTarget::ResizeLeft => ViewController::resize_left(start, dx, self.min_width),
            DragTarget::ResizeRight => {
                ViewController::resize_right(start, dx, self.min_width, self.track.width)
            }
        };

        if next == self.position {
            return None;
        }
        self.position = next;
        self.emit();
        Some(next)
    }

    pub fn pointer_up(&mut self) {
        if let BrushState::Dragging(session) = self.state {
            debug!(drag = ?session.target, position = ?self.position, "brush drag ended");
        }
        self.state = BrushState::Idle;
    }

    /// Places the brush over `window` of a dataset with `length` points.
    ///
    /// Windows thinner than the minimum brush width are widened, so the brush
    /// may end up covering a few more indices than requested.
    pub fn set_window(&mut self, window: Window, length: usize) {
        let next = ViewController::fit_to_track(
            ViewController::brush_from_window(window, self.track, length),
            self.min_width,
            self.track.width,
        );
        if next != self.position {
            self.position = next;
            self.emit();
        }
    }

    /// Dataset window covered by the brush.
    pub fn to_window(&self, length: usize) -> Result<Window> {
        ViewController::window_from_brush(self.position, self.track, length)
    }

    /// Rescales the brush proportionally to a new track size. Ends any drag.
    pub fn resize_track(&mut self, track: Track) {
        let ratio = if self.track.width > 0.0 {
            track.width / self.track.width
        } else {
            1.0
        };
        self.track = track;
        self.min_width = self.config.min_width_percentage * track.width;
        self.state = BrushState::Idle;
        self.position = BrushPosition {
            x: self.position.x * ratio,
            width: self.position.width * ratio,
        };
        self.emit();
    }

    fn emit(&mut self) {
        let event = BrushEvent::Moved {
            position: self.position,
            track: self.track,
        };
        self.events.emit(&event);
    }
}
