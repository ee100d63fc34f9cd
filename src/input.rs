//! Mouse/touch adaptation into a single pointer stream.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Normalized pointer input consumed by the brush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Horizontal coordinate in track pixels.
    pub x: f64,
}

impl PointerEvent {
    pub fn down(x: f64) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
        }
    }

    pub fn moved(x: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
        }
    }

    pub fn up(x: f64) -> Self {
        Self {
            phase: PointerPhase::Up,
            x,
        }
    }

    pub fn cancel(x: f64) -> Self {
        Self {
            phase: PointerPhase::Cancel,
            x,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Move,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub page_x: f64,
    pub page_y: f64,
}

/// Host input as delivered by the windowing layer, in page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    Mouse {
        action: MouseAction,
        page_x: f64,
        page_y: f64,
    },
    Touch {
        action: TouchAction,
        /// Touches still relevant to the event (`changedTouches` on end).
        touches: Vec<TouchPoint>,
    },
}

/// Converts host input into [`PointerEvent`]s.
///
/// Only the first touch point is tracked. `origin_x` is the page x of the
/// track's left edge.
#[derive(Clone, Debug, Default)]
pub struct InputAdapter {
    pub origin_x: f64,
    tracked_touch: Option<u64>,
    last_x: f64,
}

impl InputAdapter {
    pub fn new(origin_x: f64) -> Self {
        Self {
            origin_x,
            ..Default::default()
        }
    }

    pub fn normalize(&mut self, input: &RawInput) -> Option<PointerEvent> {
        match input {
            RawInput::Mouse { action, page_x, .. } => {
                let x = self.to_track(*page_x);
                Some(match action {
                    MouseAction::Down => PointerEvent::down(x),
                    MouseAction::Move => PointerEvent::moved(x),
                    MouseAction::Up => PointerEvent::up(x),
                })
            }
            RawInput::Touch { action, touches } => self.normalize_touch(*action, touches),
        }
    }

    fn normalize_touch(
        &mut self,
        action: TouchAction,
        touches: &[TouchPoint],
    ) -> Option<PointerEvent> {
        match action {
            TouchAction::Start => {
                if self.tracked_touch.is_some() {
                    return None;
                }
                let touch = touches.first()?;
                self.tracked_touch = Some(touch.id);
                Some(PointerEvent::down(self.to_track(touch.page_x)))
            }
            TouchAction::Move => {
                let touch = self.find_tracked(touches)?;
                Some(PointerEvent::moved(self.to_track(touch.page_x)))
            }
            TouchAction::End | TouchAction::Cancel => {
                let tracked = self.tracked_touch?;
                let x = touches
                    .iter()
                    .find(|t| t.id == tracked)
                    .map(|t| t.page_x - self.origin_x)
                    .unwrap_or(self.last_x);
                self.tracked_touch = None;
                self.last_x = x;
                Some(if action == TouchAction::End {
                    PointerEvent::up(x)
                } else {
                    PointerEvent::cancel(x)
                })
            }
        }
    }

    fn find_tracked(&self, touches: &[TouchPoint]) -> Option<TouchPoint> {
        let tracked = self.tracked_touch?;
        touches.iter().find(|t| t.id == tracked).copied()
    }

    fn to_track(&mut self, page_x: f64) -> f64 {
        self.last_x = page_x - self.origin_x;
        self.last_x
    }
}
