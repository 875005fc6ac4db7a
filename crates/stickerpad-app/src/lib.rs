//! StickerPad Application
//!
//! The application shell providing windowing, input handling,
//! and integration of the editor, renderer and tool bar.

mod app;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig, AppError, WindowRedraw, CONFIG_ENV};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{render_ui, submit_custom_stickers, UiState};
