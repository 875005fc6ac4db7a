//! Pointer gesture state machine.

use crate::drawables::{Drawable, DrawableId};
use crate::editor::Change;
use crate::history::History;
use crate::input::PointerEvent;
use crate::tools::ToolManager;
use kurbo::Point;

/// What the current gesture is acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// Extending the committed stroke with this id.
    DrawingStroke(DrawableId),
    /// Moving the placed sticker with this id.
    DraggingSticker(DrawableId),
}

/// In-progress gesture plus the preview shown under the pointer.
#[derive(Debug, Clone, Default)]
pub struct InputSession {
    state: SessionState,
    preview: Option<Drawable>,
}

impl InputSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The ephemeral drawable rendered on top of the history.
    pub fn preview(&self) -> Option<&Drawable> {
        self.preview.as_ref()
    }

    /// Apply a pointer event. Returns the change to notify, if any.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        tools: &ToolManager,
        history: &mut History,
    ) -> Option<Change> {
        match *event {
            PointerEvent::Enter { position } => Some(self.hover(position, tools)),
            PointerEvent::Leave => {
                self.state = SessionState::Idle;
                self.preview = None;
                Some(Change::PreviewMoved)
            }
            PointerEvent::Down { position, button } => {
                if !button.is_primary() {
                    return None;
                }
                Some(self.press(position, tools, history))
            }
            PointerEvent::Move {
                position,
                primary_held,
            } => {
                if primary_held {
                    Some(self.drag(position, tools, history))
                } else {
                    Some(self.hover(position, tools))
                }
            }
            PointerEvent::Up { position, button } => {
                if !button.is_primary() {
                    return None;
                }
                self.state = SessionState::Idle;
                self.preview = Some(tools.preview_at(position));
                Some(Change::ContentChanged)
            }
        }
    }

    fn hover(&mut self, position: Point, tools: &ToolManager) -> Change {
        // Release may have happened off-canvas.
        self.state = SessionState::Idle;
        self.preview = Some(tools.preview_at(position));
        Change::PreviewMoved
    }

    fn press(&mut self, position: Point, tools: &ToolManager, history: &mut History) -> Change {
        self.preview = None;
        match tools.new_sticker(position) {
            Some(sticker) => {
                let id = history.commit(sticker.into());
                log::debug!("Placed sticker {id} at ({}, {})", position.x, position.y);
                self.state = SessionState::Idle;
            }
            None => {
                let id = history.commit(tools.new_stroke(position).into());
                log::debug!("Started stroke {id}");
                self.state = SessionState::DrawingStroke(id);
            }
        }
        Change::ContentChanged
    }

    fn drag(&mut self, position: Point, tools: &ToolManager, history: &mut History) -> Change {
        if let SessionState::DrawingStroke(id) = self.state {
            if let Some(stroke) = history.get_mut(id).and_then(Drawable::as_stroke_mut) {
                stroke.extend(position);
                self.preview = None;
                return Change::ContentChanged;
            }
            log::debug!("Stroke {id} no longer in history, dropping handle");
            self.state = SessionState::Idle;
        }

        if let SessionState::DraggingSticker(id) = self.state {
            if let Some(sticker) = history.get_mut(id).and_then(Drawable::as_sticker_mut) {
                sticker.reposition(position);
                self.preview = None;
                return Change::ContentChanged;
            }
            log::debug!("Sticker {id} no longer in history, dropping handle");
            self.state = SessionState::Idle;
        }

        // Only an idle drag picks a new sticker up.
        if tools.is_sticker_mode() {
            if let Some(id) = history.sticker_at(position) {
                if let Some(sticker) = history.get_mut(id).and_then(Drawable::as_sticker_mut) {
                    sticker.reposition(position);
                    self.state = SessionState::DraggingSticker(id);
                    self.preview = None;
                    return Change::ContentChanged;
                }
            }
        }

        self.state = SessionState::Idle;
        self.preview = Some(tools.preview_at(position));
        Change::PreviewMoved
    }

    /// Rebuild an existing preview for the current tool at the same spot.
    pub fn refresh_preview(&mut self, tools: &ToolManager) {
        if let Some(anchor) = self.preview.as_ref().and_then(Drawable::anchor) {
            self.preview = Some(tools.preview_at(anchor));
        }
    }

    /// Drop the gesture handle and preview.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawables::Sticker;
    use crate::input::MouseButton;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn drag(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
            primary_held: true,
        }
    }

    fn hover(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
            primary_held: false,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_hover_shows_cursor_preview() {
        let tools = ToolManager::default();
        let mut history = History::new();
        let mut session = InputSession::new();

        let change = session.handle(&hover(5.0, 5.0), &tools, &mut history);
        assert_eq!(change, Some(Change::PreviewMoved));
        assert!(matches!(session.preview(), Some(Drawable::Cursor(_))));
        assert!(history.is_empty());
    }

    #[test]
    fn test_stroke_gesture() {
        let tools = ToolManager::default();
        let mut history = History::new();
        let mut session = InputSession::new();

        assert_eq!(
            session.handle(&down(10.0, 10.0), &tools, &mut history),
            Some(Change::ContentChanged)
        );
        assert!(session.preview().is_none());
        let SessionState::DrawingStroke(id) = session.state() else {
            panic!("expected a stroke in progress");
        };

        session.handle(&drag(20.0, 20.0), &tools, &mut history);
        session.handle(&drag(30.0, 10.0), &tools, &mut history);
        assert_eq!(
            session.handle(&up(30.0, 10.0), &tools, &mut history),
            Some(Change::ContentChanged)
        );

        assert_eq!(session.state(), SessionState::Idle);
        assert!(matches!(session.preview(), Some(Drawable::Cursor(_))));
        let stroke = history.get(id).and_then(Drawable::as_stroke).unwrap();
        assert_eq!(stroke.len(), 3);
        assert!((stroke.width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_commits_single_point_stroke() {
        let tools = ToolManager::default();
        let mut history = History::new();
        let mut session = InputSession::new();

        session.handle(&down(5.0, 5.0), &tools, &mut history);
        session.handle(&up(5.0, 5.0), &tools, &mut history);
        assert_eq!(history.len(), 1);
        assert_eq!(history.last().and_then(Drawable::as_stroke).map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_sticker_placed_on_press() {
        let mut tools = ToolManager::default();
        tools.select_sticker("🌵");
        let mut history = History::new();
        let mut session = InputSession::new();

        session.handle(&hover(40.0, 40.0), &tools, &mut history);
        assert!(matches!(session.preview(), Some(Drawable::Sticker(s)) if s.is_preview()));

        assert_eq!(
            session.handle(&down(40.0, 40.0), &tools, &mut history),
            Some(Change::ContentChanged)
        );
        assert!(session.preview().is_none());
        let placed = history.last().and_then(Drawable::as_sticker).unwrap();
        assert_eq!(placed.glyph, "🌵");
        assert!(!placed.is_preview());
    }

    #[test]
    fn test_drag_moves_hit_sticker() {
        let mut tools = ToolManager::default();
        tools.select_sticker("🐱");
        let mut history = History::new();
        let id = history.commit(Sticker::new(Point::new(50.0, 50.0), "🐱", 32.0).into());
        let mut session = InputSession::new();

        assert_eq!(
            session.handle(&drag(55.0, 52.0), &tools, &mut history),
            Some(Change::ContentChanged)
        );
        assert_eq!(session.state(), SessionState::DraggingSticker(id));
        let moved = history.get(id).and_then(Drawable::as_sticker).unwrap();
        assert_eq!(moved.position, Point::new(55.0, 52.0));
    }

    #[test]
    fn test_fast_drag_keeps_grabbed_sticker() {
        let mut tools = ToolManager::default();
        tools.select_sticker("🐱");
        let mut history = History::new();
        let mut session = InputSession::new();

        session.handle(&down(50.0, 50.0), &tools, &mut history);
        let id = history.last().map(Drawable::id).unwrap();
        session.handle(&drag(60.0, 50.0), &tools, &mut history);
        assert_eq!(session.state(), SessionState::DraggingSticker(id));

        // Further than one sticker size from where it was.
        assert_eq!(
            session.handle(&drag(100.0, 50.0), &tools, &mut history),
            Some(Change::ContentChanged)
        );
        assert_eq!(session.state(), SessionState::DraggingSticker(id));
        assert!(session.preview().is_none());
        let moved = history.get(id).and_then(Drawable::as_sticker).unwrap();
        assert_eq!(moved.position, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_drag_does_not_switch_to_newer_sticker() {
        let mut tools = ToolManager::default();
        tools.select_sticker("🐱");
        let mut history = History::new();
        let a = history.commit(Sticker::new(Point::new(50.0, 50.0), "🐱", 32.0).into());
        let b = history.commit(Sticker::new(Point::new(100.0, 50.0), "🐶", 32.0).into());
        let mut session = InputSession::new();

        session.handle(&drag(55.0, 50.0), &tools, &mut history);
        assert_eq!(session.state(), SessionState::DraggingSticker(a));
        session.handle(&drag(80.0, 50.0), &tools, &mut history);
        assert_eq!(session.state(), SessionState::DraggingSticker(a));

        let pos = |id| history.get(id).and_then(Drawable::as_sticker).map(|s| s.position);
        assert_eq!(pos(a), Some(Point::new(80.0, 50.0)));
        assert_eq!(pos(b), Some(Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_undone_sticker_handle_is_dropped() {
        let mut tools = ToolManager::default();
        tools.select_sticker("🐱");
        let mut history = History::new();
        history.commit(Sticker::new(Point::new(50.0, 50.0), "🐱", 32.0).into());
        let mut session = InputSession::new();

        session.handle(&drag(55.0, 50.0), &tools, &mut history);
        history.undo();
        assert_eq!(
            session.handle(&drag(60.0, 50.0), &tools, &mut history),
            Some(Change::PreviewMoved)
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_drag_without_hit_moves_preview() {
        let mut tools = ToolManager::default();
        tools.select_sticker("🐱");
        let mut history = History::new();
        history.commit(Sticker::new(Point::new(50.0, 50.0), "🐱", 32.0).into());
        let mut session = InputSession::new();

        assert_eq!(
            session.handle(&drag(200.0, 200.0), &tools, &mut history),
            Some(Change::PreviewMoved)
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(
            session.preview().and_then(Drawable::anchor),
            Some(Point::new(200.0, 200.0))
        );
        let untouched = history.last().and_then(Drawable::as_sticker).unwrap();
        assert_eq!(untouched.position, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_leave_drops_preview_and_handle() {
        let tools = ToolManager::default();
        let mut history = History::new();
        let mut session = InputSession::new();

        session.handle(&down(5.0, 5.0), &tools, &mut history);
        assert_eq!(
            session.handle(&PointerEvent::Leave, &tools, &mut history),
            Some(Change::PreviewMoved)
        );
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.preview().is_none());

        // Further drags do not grow the old stroke.
        session.handle(&drag(9.0, 9.0), &tools, &mut history);
        assert_eq!(history.last().and_then(Drawable::as_stroke).map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_undone_stroke_handle_is_dropped() {
        let tools = ToolManager::default();
        let mut history = History::new();
        let mut session = InputSession::new();

        session.handle(&down(5.0, 5.0), &tools, &mut history);
        history.undo();
        assert_eq!(
            session.handle(&drag(9.0, 9.0), &tools, &mut history),
            Some(Change::PreviewMoved)
        );
        assert!(history.is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_secondary_button_ignored() {
        let tools = ToolManager::default();
        let mut history = History::new();
        let mut session = InputSession::new();

        let event = PointerEvent::Down {
            position: Point::new(5.0, 5.0),
            button: MouseButton::Right,
        };
        assert_eq!(session.handle(&event, &tools, &mut history), None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_refresh_preview_keeps_position() {
        let mut tools = ToolManager::default();
        let mut history = History::new();
        let mut session = InputSession::new();

        session.handle(&hover(12.0, 34.0), &tools, &mut history);
        tools.select_sticker("🍕");
        session.refresh_preview(&tools);

        match session.preview() {
            Some(Drawable::Sticker(ghost)) => {
                assert_eq!(ghost.glyph, "🍕");
                assert_eq!(ghost.position, Point::new(12.0, 34.0));
            }
            other => panic!("unexpected preview {other:?}"),
        }
    }
}
