//! StickerPad Core Library
//!
//! Platform-agnostic drawing model for the StickerPad sketching surface:
//! drawables, the undo/redo history, tools, pointer gestures and the
//! change notification loop. Rendering goes through the [`Surface`] trait.

pub mod config;
pub mod drawables;
pub mod editor;
pub mod history;
pub mod input;
pub mod session;
pub mod surface;
pub mod tools;

pub use config::{ConfigError, EditorConfig};
pub use drawables::{CursorPreview, Drawable, DrawableId, DrawableTrait, SerializableColor, Sticker, Stroke};
pub use editor::{Change, EditorCommand, EditorState, RedrawObserver, Sketchpad, SurfaceRedraw};
pub use history::History;
pub use input::{InputState, MouseButton, PointerEvent};
pub use session::{InputSession, SessionState};
pub use surface::{RecordingSurface, Surface, SurfaceOp};
pub use tools::{Thickness, ToolManager, ToolMode};
