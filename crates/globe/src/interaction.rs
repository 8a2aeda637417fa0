//! One-shot "drop" interaction: the next click or tap is picked against the
//! terrain and the resulting position handed to a callback.

use std::fmt;

use foundation::math::Position;
use scene::{PointerEvent, PointerEventKind, RenderSurface};
use tracing::debug;

pub type DropCallback = Box<dyn FnOnce(Position)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Crosshair,
}

/// Result of routing one pointer event through the controller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DropOutcome {
    /// Not consumed; the event keeps propagating.
    Ignored,
    /// Terrain was hit and the callback received this position.
    Dropped(Position),
    /// Consumed, but nothing but sky was under the pointer.
    Missed,
}

enum DropState {
    Disarmed,
    Armed(DropCallback),
}

pub struct ClickDrop {
    state: DropState,
}

impl Default for ClickDrop {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickDrop {
    pub fn new() -> Self {
        Self {
            state: DropState::Disarmed,
        }
    }

    /// Arms the controller. A previously pending callback is dropped without
    /// being called; returns whether that happened.
    pub fn arm(&mut self, callback: impl FnOnce(Position) + 'static) -> bool {
        let replaced = self.is_armed();
        self.state = DropState::Armed(Box::new(callback));
        replaced
    }

    pub fn disarm(&mut self) -> bool {
        let was_armed = self.is_armed();
        self.state = DropState::Disarmed;
        was_armed
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DropState::Armed(_))
    }

    pub fn cursor(&self) -> CursorStyle {
        if self.is_armed() {
            CursorStyle::Crosshair
        } else {
            CursorStyle::Default
        }
    }

    /// Consumes a click or touch end while armed.
    ///
    /// A touch end without changed touches is ignored and leaves the
    /// controller armed.
    pub fn handle(&mut self, event: &mut PointerEvent, surface: &dyn RenderSurface) -> DropOutcome {
        if !self.is_armed() {
            return DropOutcome::Ignored;
        }
        if !matches!(
            event.kind(),
            PointerEventKind::Click | PointerEventKind::TouchEnd
        ) {
            return DropOutcome::Ignored;
        }
        let Some((x, y)) = event.screen_point() else {
            return DropOutcome::Ignored;
        };
        let DropState::Armed(callback) = std::mem::replace(&mut self.state, DropState::Disarmed)
        else {
            return DropOutcome::Ignored;
        };

        let outcome = match surface.pick_terrain(x, y).terrain_object() {
            Some(position) => {
                callback(position);
                DropOutcome::Dropped(position)
            }
            None => DropOutcome::Missed,
        };
        event.stop_immediate_propagation();
        debug!(x, y, ?outcome, "drop handled");
        outcome
    }
}

impl fmt::Debug for ClickDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickDrop")
            .field("armed", &self.is_armed())
            .finish()
    }
}
