//! Sticker glyphs placed on the canvas.

use super::{DrawableId, DrawableTrait, SerializableColor};
use crate::surface::Surface;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A glyph drawn centered on a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub(crate) id: DrawableId,
    /// Center of the glyph.
    pub position: Point,
    /// One or more code points, never empty.
    pub glyph: String,
    /// Font size in canvas pixels.
    pub size: f64,
    /// 1.0 for placed stickers.
    pub opacity: f64,
    #[serde(default)]
    preview: bool,
}

impl Sticker {
    pub fn new(position: Point, glyph: impl Into<String>, size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            glyph: glyph.into(),
            size,
            opacity: 1.0,
            preview: false,
        }
    }

    /// A translucent ghost showing where the sticker would land.
    pub fn preview(position: Point, glyph: impl Into<String>, size: f64, opacity: f64) -> Self {
        Self {
            opacity,
            preview: true,
            ..Self::new(position, glyph, size)
        }
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Move the sticker's center.
    pub fn reposition(&mut self, position: Point) {
        self.position = position;
    }

    /// Whether `point` is close enough to grab this sticker.
    pub fn contains(&self, point: Point) -> bool {
        self.position.distance(point) < self.size
    }
}

impl DrawableTrait for Sticker {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.position, Size::new(self.size, self.size))
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.set_global_alpha(self.opacity);
        surface.set_fill_color(SerializableColor::black().into());
        surface.set_font_size(self.size);
        surface.fill_text(&self.glyph, self.position);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    #[test]
    fn test_reposition() {
        let mut sticker = Sticker::new(Point::new(50.0, 50.0), "🐱", 32.0);
        let id = sticker.id();
        sticker.reposition(Point::new(55.0, 52.0));
        assert_eq!(sticker.position, Point::new(55.0, 52.0));
        assert_eq!(sticker.id(), id);
    }

    #[test]
    fn test_contains_uses_size_as_radius() {
        let sticker = Sticker::new(Point::new(50.0, 50.0), "🐱", 32.0);
        assert!(sticker.contains(Point::new(55.0, 52.0)));
        assert!(sticker.contains(Point::new(50.0, 81.0)));
        assert!(!sticker.contains(Point::new(50.0, 82.0)));
        assert!(!sticker.contains(Point::new(200.0, 200.0)));
    }

    #[test]
    fn test_render_centered_text() {
        let sticker = Sticker::new(Point::new(40.0, 60.0), "🍕", 32.0);
        let mut surface = RecordingSurface::new(Size::new(256.0, 256.0));
        sticker.render(&mut surface);

        assert_eq!(
            surface.ops(),
            &[SurfaceOp::Text {
                text: "🍕".to_string(),
                center: Point::new(40.0, 60.0),
                size: 32.0,
                color: SerializableColor::black(),
            }]
        );
    }

    #[test]
    fn test_preview_renders_translucent() {
        let ghost = Sticker::preview(Point::new(40.0, 60.0), "🍕", 32.0, 0.8);
        let mut surface = RecordingSurface::new(Size::new(256.0, 256.0));
        ghost.render(&mut surface);

        match &surface.ops()[0] {
            SurfaceOp::Text { color, .. } => assert_eq!(color.a, 204),
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(surface.save_depth(), 0);
    }
}
