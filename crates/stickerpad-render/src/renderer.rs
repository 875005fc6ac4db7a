//! Renderer trait abstraction.

use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;
use stickerpad_core::EditorState;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a EditorState,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Window color around the canvas.
    pub background_color: Color,
    /// Color the canvas is cleared to.
    pub canvas_color: Color,
    /// Top-left corner of the canvas in logical window coordinates.
    pub canvas_origin: Point,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with the canvas at the window origin.
    pub fn new(editor: &'a EditorState, viewport_size: Size) -> Self {
        Self {
            editor,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(240, 240, 240, 255),
            canvas_color: Color::WHITE,
            canvas_origin: Point::ZERO,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_canvas_color(mut self, color: Color) -> Self {
        self.canvas_color = color;
        self
    }

    /// Place the canvas at `origin`.
    pub fn with_canvas_origin(mut self, origin: Point) -> Self {
        self.canvas_origin = origin;
        self
    }

    /// Center the canvas in the viewport.
    pub fn centered(self) -> Self {
        let origin = centered_origin(self.viewport_size, self.editor.canvas_size());
        self.with_canvas_origin(origin)
    }

    /// Canvas area in logical window coordinates.
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_origin_size(self.canvas_origin, self.editor.canvas_size())
    }

    /// Maps canvas coordinates to physical pixels.
    pub fn canvas_transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * Affine::translate(self.canvas_origin.to_vec2())
    }
}

/// Origin that centers a canvas of `canvas` size inside `viewport`, clamped to
/// the top-left corner when the viewport is smaller.
pub fn centered_origin(viewport: Size, canvas: Size) -> Point {
    Point::new(
        ((viewport.width - canvas.width) / 2.0).max(0.0).round(),
        ((viewport.height - canvas.height) / 2.0).max(0.0).round(),
    )
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_origin() {
        let origin = centered_origin(Size::new(800.0, 600.0), Size::new(256.0, 256.0));
        assert_eq!(origin, Point::new(272.0, 172.0));
    }

    #[test]
    fn test_centered_origin_clamps() {
        let origin = centered_origin(Size::new(100.0, 600.0), Size::new(256.0, 256.0));
        assert_eq!(origin, Point::new(0.0, 172.0));
    }

    #[test]
    fn test_canvas_transform_applies_scale_after_offset() {
        let editor = EditorState::default();
        let ctx = RenderContext::new(&editor, Size::new(800.0, 600.0))
            .centered()
            .with_scale_factor(2.0);

        let mapped = ctx.canvas_transform() * Point::new(10.0, 10.0);
        assert_eq!(mapped, Point::new(564.0, 364.0));
        assert_eq!(ctx.canvas_rect(), Rect::new(272.0, 172.0, 528.0, 428.0));
    }
}
