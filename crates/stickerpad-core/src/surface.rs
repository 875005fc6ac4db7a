//! Rendering surface abstraction.
//!
//! Drawables never talk to a concrete backend. They issue canvas-style
//! primitive operations against a [`Surface`], scoping any style changes
//! between [`Surface::save`] and [`Surface::restore`].

use crate::drawables::SerializableColor;
use kurbo::{Cap, Point, Rect, Size};
use peniko::Color;

/// A 2D immediate-mode rendering surface.
pub trait Surface {
    /// Size of the drawable area in surface coordinates.
    fn size(&self) -> Size;

    /// Push the current style state.
    fn save(&mut self);

    /// Pop the style state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: Cap);
    /// Opacity multiplier applied to every subsequent paint (0.0..=1.0).
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font_size(&mut self, size: f64);

    /// Discard the current path.
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    /// Stroke the current path with the current stroke style.
    fn stroke(&mut self);

    /// Fill `text` centered horizontally and vertically on `center`.
    fn fill_text(&mut self, text: &str, center: Point);

    fn fill_circle(&mut self, center: Point, radius: f64);

    /// Reset every pixel inside `rect` to the surface's clear color.
    fn clear_rect(&mut self, rect: Rect);
}

/// Style state tracked by a surface between `save` / `restore` pairs.
#[derive(Debug, Clone, Copy)]
pub struct DrawState {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
    pub line_cap: Cap,
    pub global_alpha: f64,
    pub font_size: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            stroke_color: Color::from_rgba8(0, 0, 0, 255),
            fill_color: Color::from_rgba8(0, 0, 0, 255),
            line_width: 1.0,
            line_cap: Cap::Butt,
            global_alpha: 1.0,
            font_size: 10.0,
        }
    }
}

impl DrawState {
    /// Stroke color with the global alpha applied.
    pub fn stroke_paint(&self) -> Color {
        with_alpha(self.stroke_color, self.global_alpha)
    }

    /// Fill color with the global alpha applied.
    pub fn fill_paint(&self) -> Color {
        with_alpha(self.fill_color, self.global_alpha)
    }
}

/// Multiply a color's alpha channel by `alpha`.
pub fn with_alpha(color: Color, alpha: f64) -> Color {
    let rgba = color.to_rgba8();
    let a = (rgba.a as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, a)
}

/// Save/restore stack for [`DrawState`].
///
/// An unbalanced `restore` keeps the current state.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        } else {
            log::warn!("restore() without matching save()");
        }
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Drop all saved states and return to defaults.
    pub fn reset(&mut self) {
        self.current = DrawState::default();
        self.saved.clear();
    }
}

/// A primitive operation captured by [`RecordingSurface`], with the style
/// that was in effect resolved into it.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Clear {
        rect: Rect,
    },
    Stroke {
        subpaths: Vec<Vec<Point>>,
        width: f64,
        cap: Cap,
        color: SerializableColor,
    },
    Text {
        text: String,
        center: Point,
        size: f64,
        color: SerializableColor,
    },
    Circle {
        center: Point,
        radius: f64,
        color: SerializableColor,
    },
}

impl SurfaceOp {
    /// Whether this operation leaves any visible pixels behind.
    pub fn is_visible(&self) -> bool {
        match self {
            SurfaceOp::Clear { .. } => false,
            SurfaceOp::Stroke {
                subpaths,
                width,
                cap,
                color,
            } => {
                if *width <= 0.0 || color.a == 0 {
                    return false;
                }
                subpaths.iter().any(|sub| match sub.as_slice() {
                    [] | [_] => false,
                    [first, rest @ ..] => {
                        let has_length = rest.iter().any(|p| p != first);
                        // Zero-length segments only show up under round or square caps.
                        has_length || *cap != Cap::Butt
                    }
                })
            }
            SurfaceOp::Text { text, size, color, .. } => {
                !text.is_empty() && *size > 0.0 && color.a > 0
            }
            SurfaceOp::Circle { radius, color, .. } => *radius > 0.0 && color.a > 0,
        }
    }
}

/// A surface that records operations instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    state: StateStack,
    path: Vec<Vec<Point>>,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            state: StateStack::new(),
            path: Vec::new(),
            ops: Vec::new(),
        }
    }

    /// All operations recorded so far.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Operations recorded after the most recent full clear.
    pub fn frame(&self) -> &[SurfaceOp] {
        let full = Rect::from_origin_size(Point::ZERO, self.size);
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, SurfaceOp::Clear { rect } if rect.covers(full)))
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.ops[start..]
    }

    /// Current save/restore nesting depth.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }
}

trait RectExt {
    fn covers(&self, other: Rect) -> bool;
}

impl RectExt for Rect {
    fn covers(&self, other: Rect) -> bool {
        self.x0 <= other.x0 && self.y0 <= other.y0 && self.x1 >= other.x1 && self.y1 >= other.y1
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.current_mut().stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.current_mut().fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.current_mut().line_width = width;
    }

    fn set_line_cap(&mut self, cap: Cap) {
        self.state.current_mut().line_cap = cap;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.current_mut().global_alpha = alpha;
    }

    fn set_font_size(&mut self, size: f64) {
        self.state.current_mut().font_size = size;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, point: Point) {
        self.path.push(vec![point]);
    }

    fn line_to(&mut self, point: Point) {
        match self.path.last_mut() {
            Some(sub) => sub.push(point),
            // Canvas semantics: line_to on an empty path behaves as move_to.
            None => self.path.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        let state = self.state.current();
        self.ops.push(SurfaceOp::Stroke {
            subpaths: self.path.clone(),
            width: state.line_width,
            cap: state.line_cap,
            color: state.stroke_paint().into(),
        });
    }

    fn fill_text(&mut self, text: &str, center: Point) {
        let state = self.state.current();
        self.ops.push(SurfaceOp::Text {
            text: text.to_string(),
            center,
            size: state.font_size,
            color: state.fill_paint().into(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        let state = self.state.current();
        self.ops.push(SurfaceOp::Circle {
            center,
            radius,
            color: state.fill_paint().into(),
        });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(SurfaceOp::Clear { rect });
    }
}
