//! Brush cursor shown under the pointer in draw mode.

use super::{DrawableId, DrawableTrait, SerializableColor};
use crate::surface::Surface;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest radius the cursor dot is drawn with.
const MIN_RADIUS: f64 = 1.0;

/// A filled dot sized to the current line thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPreview {
    pub(crate) id: DrawableId,
    pub position: Point,
    /// Line width of the active tool.
    pub thickness: f64,
    pub color: SerializableColor,
}

impl CursorPreview {
    pub fn new(position: Point, thickness: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            thickness,
            color: SerializableColor::black(),
        }
    }

    pub fn radius(&self) -> f64 {
        (self.thickness / 2.0).max(MIN_RADIUS)
    }
}

impl DrawableTrait for CursorPreview {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let d = self.radius() * 2.0;
        Rect::from_center_size(self.position, Size::new(d, d))
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.set_fill_color(self.color.into());
        surface.fill_circle(self.position, self.radius());
        surface.restore();
    }
}
