//! Pointer input normalization.
//!
//! Raw window cursor and button events are turned into canvas-relative
//! [`PointerEvent`]s, synthesizing `Enter`/`Leave` from the canvas bounds.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn is_primary(&self) -> bool {
        matches!(self, MouseButton::Left)
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Enter {
        position: Point,
    },
    Leave,
    Down {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
        /// Whether the primary button is held.
        primary_held: bool,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
}

/// Tracks the pointer relative to the canvas.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Canvas area in window coordinates.
    bounds: Rect,
    /// Last pointer position in canvas coordinates.
    pointer_position: Option<Point>,
    /// Whether the pointer is over the canvas.
    inside: bool,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

impl InputState {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            pointer_position: None,
            inside: false,
            pressed_buttons: HashSet::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Update the canvas area, e.g. after a window resize.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn pointer_position(&self) -> Option<Point> {
        self.pointer_position
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    fn to_canvas(&self, window: Point) -> Point {
        Point::new(window.x - self.bounds.x0, window.y - self.bounds.y0)
    }

    /// Process a cursor move in window coordinates.
    pub fn cursor_moved(&mut self, window: Point) -> Option<PointerEvent> {
        let over = self.bounds.contains(window);
        let position = self.to_canvas(window);

        match (self.inside, over) {
            (false, true) => {
                self.inside = true;
                self.pointer_position = Some(position);
                Some(PointerEvent::Enter { position })
            }
            (true, true) => {
                self.pointer_position = Some(position);
                Some(PointerEvent::Move {
                    position,
                    primary_held: self.is_button_pressed(MouseButton::Left),
                })
            }
            (true, false) => self.leave(),
            (false, false) => None,
        }
    }

    /// The cursor left the window.
    pub fn cursor_left(&mut self) -> Option<PointerEvent> {
        if self.inside { self.leave() } else { None }
    }

    fn leave(&mut self) -> Option<PointerEvent> {
        self.inside = false;
        self.pointer_position = None;
        Some(PointerEvent::Leave)
    }

    /// Process a button press or release. Only reported while over the canvas.
    pub fn button(&mut self, button: MouseButton, pressed: bool) -> Option<PointerEvent> {
        let changed = if pressed {
            self.pressed_buttons.insert(button)
        } else {
            self.pressed_buttons.remove(&button)
        };
        if !changed || !self.inside {
            return None;
        }

        let position = self.pointer_position?;
        Some(if pressed {
            PointerEvent::Down { position, button }
        } else {
            PointerEvent::Up { position, button }
        })
    }
}
