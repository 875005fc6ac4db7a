//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Point, Rect, Size, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use stickerpad_core::surface::{StateStack, Surface};
use vello::Scene;

/// Border drawn around the canvas.
const CANVAS_BORDER: Color = Color::from_rgba8(180, 180, 180, 255);

/// Vello-based renderer for GPU-accelerated 2D graphics.
///
/// Implements [`Surface`] directly: drawables issue their primitive
/// operations against it and they are encoded into a [`Scene`].
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached to avoid rescanning system fonts).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    state: StateStack,
    /// Current path as subpaths of points.
    path: Vec<Vec<Point>>,
    /// Canvas to physical pixels.
    transform: Affine,
    size: Size,
    clear_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            state: StateStack::new(),
            path: Vec::new(),
            transform: Affine::IDENTITY,
            size: Size::ZERO,
            clear_color: Color::WHITE,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Reset the scene and style state for a new frame of a canvas of `size`.
    pub fn begin_frame(&mut self, size: Size, transform: Affine, clear_color: Color) {
        self.scene.reset();
        self.state.reset();
        self.path.clear();
        self.size = size;
        self.transform = transform;
        self.clear_color = clear_color;
    }

    /// Zero-length subpath: canvas draws the cap shape only.
    fn render_dot(&mut self, center: Point, width: f64, cap: Cap, color: Color) {
        let half = width / 2.0;
        match cap {
            Cap::Round => {
                self.scene.fill(
                    Fill::NonZero,
                    self.transform,
                    color,
                    None,
                    &Circle::new(center, half),
                );
            }
            Cap::Square => {
                let rect = Rect::new(center.x - half, center.y - half, center.x + half, center.y + half);
                self.scene.fill(Fill::NonZero, self.transform, color, None, &rect);
            }
            Cap::Butt => {}
        }
    }

    /// Paint the window background over anything spilling past the canvas edge.
    fn render_canvas_frame(&mut self, ctx: &RenderContext) {
        let canvas = ctx.canvas_rect();
        let (w, h) = (ctx.viewport_size.width, ctx.viewport_size.height);
        let transform = Affine::scale(ctx.scale_factor);

        let margins = [
            Rect::new(0.0, 0.0, w, canvas.y0),
            Rect::new(0.0, canvas.y1, w, h),
            Rect::new(0.0, canvas.y0, canvas.x0, canvas.y1),
            Rect::new(canvas.x1, canvas.y0, w, canvas.y1),
        ];
        for rect in margins {
            if rect.width() > 0.0 && rect.height() > 0.0 {
                self.scene
                    .fill(Fill::NonZero, transform, ctx.background_color, None, &rect);
            }
        }

        self.scene.stroke(
            &Stroke::new(1.0),
            transform,
            CANVAS_BORDER,
            None,
            &canvas.inflate(0.5, 0.5),
        );
    }
}

impl Surface for VelloRenderer {
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
            None => self.path.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        let state = *self.state.current();
        if state.line_width <= 0.0 {
            return;
        }
        let color = state.stroke_paint();

        let mut path = BezPath::new();
        let mut dots = Vec::new();
        for sub in &self.path {
            let Some((first, rest)) = sub.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            if rest.iter().all(|p| p == first) {
                dots.push(*first);
                continue;
            }
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
        }

        if !path.elements().is_empty() {
            let style = Stroke::new(state.line_width)
                .with_caps(state.line_cap)
                .with_join(Join::Round);
            self.scene.stroke(&style, self.transform, color, None, &path);
        }
        for dot in dots {
            self.render_dot(dot, state.line_width, state.line_cap, color);
        }
    }

    /// Shapes `text` with Parley and draws it centered on `center`.
    fn fill_text(&mut self, text: &str, center: Point) {
        if text.is_empty() {
            return;
        }
        let state = *self.state.current();
        let brush = Brush::Solid(state.fill_paint());

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(state.font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        let mut layout = builder.build(text);

        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let width = layout.width() as f64;
        let height = layout.height() as f64;
        let text_transform =
            self.transform * Affine::translate((center.x - width / 2.0, center.y - height / 2.0));

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        if glyph_count == 0 {
            log::warn!("No font could shape {text:?}");
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64) {
        let color = self.state.current().fill_paint();
        self.scene.fill(
            Fill::NonZero,
            self.transform,
            color,
            None,
            &Circle::new(center, radius),
        );
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.scene
            .fill(Fill::NonZero, self.transform, self.clear_color, None, &rect);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.begin_frame(ctx.editor.canvas_size(), ctx.canvas_transform(), ctx.canvas_color);

        ctx.editor.render(self);

        if self.state.depth() != 0 {
            log::warn!("Unbalanced save/restore after frame (depth {})", self.state.depth());
        }
        self.render_canvas_frame(ctx);
    }
}
