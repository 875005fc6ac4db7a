//! Editor aggregate and the change notification loop.

use crate::config::EditorConfig;
use crate::drawables::Drawable;
use crate::history::History;
use crate::input::PointerEvent;
use crate::session::InputSession;
use crate::surface::Surface;
use crate::tools::{Thickness, ToolManager};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Kind of change a mutation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Change {
    /// The committed drawables changed.
    ContentChanged,
    /// Only the preview (or tool affecting it) changed.
    PreviewMoved,
}

/// Commands issued by the tool bar and keyboard shortcuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorCommand {
    Undo,
    Redo,
    Clear,
    SelectDraw,
    /// Sticker mode with the last used glyph.
    EnterStickerMode,
    SelectSticker(String),
    SetThickness(Thickness),
    /// Free text to split into new palette entries.
    AddStickers(String),
}

/// All editor state: history, tools and the current gesture.
#[derive(Debug, Clone)]
pub struct EditorState {
    config: EditorConfig,
    history: History,
    tools: ToolManager,
    session: InputSession,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    pub fn new(config: EditorConfig) -> Self {
        let tools = ToolManager::new(&config);
        Self {
            config,
            history: History::new(),
            tools,
            session: InputSession::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    pub fn canvas_size(&self) -> Size {
        self.config.canvas_size()
    }

    /// Feed a canvas pointer event through the gesture state machine.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Change> {
        self.session.handle(event, &self.tools, &mut self.history)
    }

    pub fn apply(&mut self, command: EditorCommand) -> Option<Change> {
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Clear => Some(self.clear()),
            EditorCommand::SelectDraw => {
                self.tools.select_draw();
                Some(self.tool_changed())
            }
            EditorCommand::EnterStickerMode => {
                if self.tools.enter_sticker_mode() {
                    Some(self.tool_changed())
                } else {
                    None
                }
            }
            EditorCommand::SelectSticker(glyph) => {
                self.tools.select_sticker(glyph);
                Some(self.tool_changed())
            }
            EditorCommand::SetThickness(thickness) => {
                self.tools.set_thickness(thickness);
                Some(self.tool_changed())
            }
            EditorCommand::AddStickers(input) => {
                let added = self.tools.add_stickers(&input);
                if added.is_empty() {
                    return None;
                }
                log::info!("Added stickers: {}", added.join(" "));
                Some(Change::PreviewMoved)
            }
        }
    }

    fn tool_changed(&mut self) -> Change {
        self.session.refresh_preview(&self.tools);
        Change::PreviewMoved
    }

    /// Undo the last commit. No notification when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Change> {
        if self.history.undo() {
            log::info!("Undo ({} left)", self.history.len());
            Some(Change::ContentChanged)
        } else {
            None
        }
    }

    pub fn redo(&mut self) -> Option<Change> {
        if self.history.redo() {
            log::info!("Redo ({} left)", self.history.redo_len());
            Some(Change::ContentChanged)
        } else {
            None
        }
    }

    /// Remove every drawable, including the redo stack.
    pub fn clear(&mut self) -> Change {
        log::info!("Clear ({} drawables)", self.history.len());
        self.history.clear();
        Change::ContentChanged
    }

    /// Full redraw: clear, committed drawables oldest first, then the preview.
    pub fn render(&self, surface: &mut dyn Surface) {
        let frame = Rect::from_origin_size((0.0, 0.0), surface.size());
        surface.clear_rect(frame);
        let visible = |d: &&Drawable| !d.bounds().intersect(frame).is_zero_area();
        for drawable in self.history.iter().filter(visible) {
            drawable.render(surface);
        }
        if let Some(preview) = self.session.preview().filter(visible) {
            preview.render(surface);
        }
    }
}

/// Receives every change right after the mutation that caused it.
pub trait RedrawObserver {
    fn on_change(&mut self, change: Change, editor: &EditorState);
}

impl<F> RedrawObserver for F
where
    F: FnMut(Change, &EditorState),
{
    fn on_change(&mut self, change: Change, editor: &EditorState) {
        self(change, editor)
    }
}

/// Observer that re-renders the whole editor into an owned surface.
#[derive(Debug)]
pub struct SurfaceRedraw<S> {
    surface: S,
    redraws: usize,
}

impl<S: Surface> SurfaceRedraw<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            redraws: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of redraws performed.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

}

impl<S: Surface> RedrawObserver for SurfaceRedraw<S> {
    fn on_change(&mut self, _change: Change, editor: &EditorState) {
        editor.render(&mut self.surface);
        self.redraws += 1;
    }
}

/// Editor wired to a redraw observer.
///
/// Every mutating call that produces a [`Change`] notifies the observer once,
/// synchronously, before returning.
pub struct Sketchpad<O> {
    editor: EditorState,
    observer: O,
}

impl<O: RedrawObserver> Sketchpad<O> {
    pub fn new(editor: EditorState, observer: O) -> Self {
        Self { editor, observer }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn notify(&mut self, change: Option<Change>) -> Option<Change> {
        if let Some(change) = change {
            self.observer.on_change(change, &self.editor);
        }
        change
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Change> {
        let change = self.editor.handle_pointer(event);
        self.notify(change)
    }

    pub fn apply(&mut self, command: EditorCommand) -> Option<Change> {
        let change = self.editor.apply(command);
        self.notify(change)
    }

    pub fn undo(&mut self) -> Option<Change> {
        let change = self.editor.undo();
        self.notify(change)
    }

    pub fn redo(&mut self) -> Option<Change> {
        let change = self.editor.redo();
        self.notify(change)
    }

    pub fn clear(&mut self) -> Option<Change> {
        let change = self.editor.clear();
        self.notify(Some(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawables::Sticker;
    use crate::input::MouseButton;
    use crate::surface::{RecordingSurface, SurfaceOp};
    use kurbo::Point;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(256.0, 256.0))
    }

    fn click(editor: &mut EditorState, x: f64, y: f64) {
        let position = Point::new(x, y);
        editor.handle_pointer(&PointerEvent::Down {
            position,
            button: MouseButton::Left,
        });
        editor.handle_pointer(&PointerEvent::Up {
            position,
            button: MouseButton::Left,
        });
    }

    #[test]
    fn test_render_order_with_preview_last() {
        let mut editor = EditorState::default();
        click(&mut editor, 10.0, 10.0);
        editor.apply(EditorCommand::SelectSticker("🐱".into()));
        click(&mut editor, 50.0, 50.0);

        let mut surface = surface();
        editor.render(&mut surface);
        let frame = surface.frame();

        assert!(matches!(surface.ops()[0], SurfaceOp::Clear { .. }));
        assert_eq!(frame.len(), 3);
        assert!(matches!(frame[0], SurfaceOp::Stroke { .. }));
        assert!(matches!(&frame[1], SurfaceOp::Text { color, .. } if color.a == 255));
        // Ghost left behind by the release.
        assert!(matches!(&frame[2], SurfaceOp::Text { color, .. } if color.a < 255));
    }

    #[test]
    fn test_render_skips_drawables_off_surface() {
        let mut editor = EditorState::default();
        editor
            .history
            .commit(Sticker::new(Point::new(500.0, 500.0), "🐱", 32.0).into());
        // Overhangs the edge, so it is still drawn.
        editor
            .history
            .commit(Sticker::new(Point::new(250.0, 250.0), "🌵", 32.0).into());

        let mut surface = surface();
        editor.render(&mut surface);
        let frame = surface.frame();
        assert_eq!(frame.len(), 1);
        assert!(matches!(&frame[0], SurfaceOp::Text { text, .. } if text == "🌵"));
    }

    #[test]
    fn test_undo_redo_notifications() {
        let mut editor = EditorState::default();
        assert_eq!(editor.undo(), None);
        assert_eq!(editor.redo(), None);

        click(&mut editor, 10.0, 10.0);
        assert_eq!(editor.undo(), Some(Change::ContentChanged));
        assert_eq!(editor.redo(), Some(Change::ContentChanged));
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_clear_always_notifies() {
        let mut editor = EditorState::default();
        assert_eq!(editor.apply(EditorCommand::Clear), Some(Change::ContentChanged));

        click(&mut editor, 10.0, 10.0);
        editor.clear();
        assert!(editor.history().is_empty());
        assert_eq!(editor.undo(), None);
    }

    #[test]
    fn test_tool_change_refreshes_preview() {
        let mut editor = EditorState::default();
        editor.handle_pointer(&PointerEvent::Enter {
            position: Point::new(30.0, 30.0),
        });

        let change = editor.apply(EditorCommand::SetThickness(Thickness::Thick));
        assert_eq!(change, Some(Change::PreviewMoved));
        match editor.session().preview() {
            Some(Drawable::Cursor(cursor)) => {
                assert!((cursor.thickness - 8.0).abs() < f64::EPSILON);
                assert_eq!(cursor.position, Point::new(30.0, 30.0));
            }
            other => panic!("unexpected preview {other:?}"),
        }
    }

    #[test]
    fn test_add_stickers_command() {
        let mut editor = EditorState::default();
        assert_eq!(editor.apply(EditorCommand::AddStickers("  ".into())), None);
        assert_eq!(
            editor.apply(EditorCommand::AddStickers("⭐".into())),
            Some(Change::PreviewMoved)
        );
        assert_eq!(editor.tools().palette().last().map(String::as_str), Some("⭐"));
    }

    #[test]
    fn test_sketchpad_notifies_closure() {
        let mut seen = Vec::new();
        {
            let observer = |change: Change, _: &EditorState| seen.push(change);
            let mut pad = Sketchpad::new(EditorState::default(), observer);
            pad.undo();
            pad.handle_pointer(&PointerEvent::Enter {
                position: Point::new(1.0, 1.0),
            });
            pad.handle_pointer(&PointerEvent::Down {
                position: Point::new(1.0, 1.0),
                button: MouseButton::Left,
            });
            pad.clear();
        }
        assert_eq!(
            seen,
            vec![Change::PreviewMoved, Change::ContentChanged, Change::ContentChanged]
        );
    }

    #[test]
    fn test_surface_redraw_renders_each_change() {
        let redraw = SurfaceRedraw::new(surface());
        let mut pad = Sketchpad::new(EditorState::default(), redraw);

        pad.handle_pointer(&PointerEvent::Enter {
            position: Point::new(20.0, 20.0),
        });
        pad.apply(EditorCommand::Undo);
        assert_eq!(pad.observer().redraws(), 1);

        let frame = pad.observer().surface().frame();
        assert_eq!(frame.len(), 1);
        assert!(matches!(frame[0], SurfaceOp::Circle { .. }));
    }
}
