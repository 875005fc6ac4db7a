//! Drawable actions recorded on the canvas.

mod cursor;
mod sticker;
mod stroke;

pub use cursor::CursorPreview;
pub use sticker::Sticker;
pub use stroke::Stroke;

use crate::surface::Surface;
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for drawables.
pub type DrawableId = Uuid;

/// Common behavior of every drawable variant.
pub trait DrawableTrait {
    /// Get the unique identifier.
    fn id(&self) -> DrawableId;

    /// Area touched when rendered.
    fn bounds(&self) -> Rect;

    /// Draw onto `surface`. Style changes must stay scoped to this call.
    fn render(&self, surface: &mut dyn Surface);
}

/// A visual action: committed to the history or shown as a live preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Drawable {
    Stroke(Stroke),
    Sticker(Sticker),
    Cursor(CursorPreview),
}

impl Drawable {
    pub fn id(&self) -> DrawableId {
        match self {
            Drawable::Stroke(s) => s.id(),
            Drawable::Sticker(s) => s.id(),
            Drawable::Cursor(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Drawable::Stroke(s) => s.bounds(),
            Drawable::Sticker(s) => s.bounds(),
            Drawable::Cursor(s) => s.bounds(),
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Drawable::Stroke(s) => s.render(surface),
            Drawable::Sticker(s) => s.render(surface),
            Drawable::Cursor(s) => s.render(surface),
        }
    }

    /// Previews are ephemeral and never enter the history.
    pub fn is_preview(&self) -> bool {
        match self {
            Drawable::Cursor(_) => true,
            Drawable::Sticker(s) => s.is_preview(),
            Drawable::Stroke(_) => false,
        }
    }

    /// Position the preview tracks, if this is a preview.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Drawable::Cursor(c) => Some(c.position),
            Drawable::Sticker(s) => Some(s.position),
            Drawable::Stroke(_) => None,
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stroke_mut(&mut self) -> Option<&mut Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sticker(&self) -> Option<&Sticker> {
        match self {
            Drawable::Sticker(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sticker_mut(&mut self) -> Option<&mut Sticker> {
        match self {
            Drawable::Sticker(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}

impl From<Sticker> for Drawable {
    fn from(sticker: Sticker) -> Self {
        Drawable::Sticker(sticker)
    }
}

impl From<CursorPreview> for Drawable {
    fn from(cursor: CursorPreview) -> Self {
        Drawable::Cursor(cursor)
    }
}
