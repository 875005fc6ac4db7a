//! Freehand stroke.

use super::{DrawableId, DrawableTrait, SerializableColor};
use crate::surface::Surface;
use kurbo::{Cap, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand line through an ordered series of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: DrawableId,
    /// Points in drawing order.
    pub points: Vec<Point>,
    /// Line width in canvas pixels.
    pub width: f64,
    pub color: SerializableColor,
}

impl Stroke {
    /// Start a stroke at `start`.
    pub fn new(start: Point, width: f64) -> Self {
        Self::from_points(vec![start], width)
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            width,
            color: SerializableColor::black(),
        }
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    /// Append a point to the end of the stroke.
    pub fn extend(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl DrawableTrait for Stroke {
    fn id(&self) -> DrawableId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };

        let rect = self
            .points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        let pad = self.width / 2.0;
        rect.inflate(pad, pad)
    }

    fn render(&self, surface: &mut dyn Surface) {
        let Some(first) = self.points.first() else {
            return;
        };

        surface.save();
        surface.set_stroke_color(self.color.into());
        surface.set_line_width(self.width);
        surface.set_line_cap(Cap::Round);

        surface.begin_path();
        surface.move_to(*first);
        if self.points.len() == 1 {
            // Degenerate segment so round caps leave a dot.
            surface.line_to(*first);
        } else {
            for point in self.points.iter().skip(1) {
                surface.line_to(*point);
            }
        }
        surface.stroke();
        surface.restore();
    }
}
