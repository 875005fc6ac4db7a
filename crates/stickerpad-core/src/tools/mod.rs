//! Tool selection: draw vs. sticker mode, line thickness and the sticker palette.

use crate::config::EditorConfig;
use crate::drawables::{CursorPreview, Drawable, SerializableColor, Sticker, Stroke};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Marker thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Thickness {
    #[default]
    Thin,
    Thick,
}

impl Thickness {
    pub fn label(&self) -> &'static str {
        match self {
            Thickness::Thin => "Thin",
            Thickness::Thick => "Thick",
        }
    }
}

/// What a primary-button press does on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ToolMode {
    /// Freehand strokes.
    #[default]
    Draw,
    /// Place the given glyph.
    Sticker(String),
}

/// Manages the current tool mode, thickness and sticker palette.
#[derive(Debug, Clone)]
pub struct ToolManager {
    mode: ToolMode,
    thickness: Thickness,
    palette: Vec<String>,
    /// Last glyph picked, restored when switching back to sticker mode.
    last_sticker: Option<String>,
    thin_width: f64,
    thick_width: f64,
    sticker_size: f64,
    preview_opacity: f64,
    stroke_color: SerializableColor,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl ToolManager {
    pub fn new(config: &EditorConfig) -> Self {
        let mut tools = Self {
            mode: ToolMode::Draw,
            thickness: Thickness::Thin,
            palette: Vec::new(),
            last_sticker: None,
            thin_width: config.thin_width,
            thick_width: config.thick_width,
            sticker_size: config.sticker_size,
            preview_opacity: config.preview_opacity,
            stroke_color: config.stroke_color,
        };
        for glyph in &config.stickers {
            tools.push_glyph(glyph);
        }
        tools
    }

    pub fn mode(&self) -> &ToolMode {
        &self.mode
    }

    pub fn thickness(&self) -> Thickness {
        self.thickness
    }

    /// Sticker glyphs in button order.
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn is_sticker_mode(&self) -> bool {
        matches!(self.mode, ToolMode::Sticker(_))
    }

    /// Glyph placed by the next press, if in sticker mode.
    pub fn current_sticker(&self) -> Option<&str> {
        match &self.mode {
            ToolMode::Sticker(glyph) => Some(glyph),
            ToolMode::Draw => None,
        }
    }

    /// Line width for the current thickness.
    pub fn current_width(&self) -> f64 {
        self.width_of(self.thickness)
    }

    pub fn width_of(&self, thickness: Thickness) -> f64 {
        match thickness {
            Thickness::Thin => self.thin_width,
            Thickness::Thick => self.thick_width,
        }
    }

    /// Switch to freehand drawing.
    pub fn select_draw(&mut self) {
        self.mode = ToolMode::Draw;
    }

    /// Switch to placing `glyph`.
    pub fn select_sticker(&mut self, glyph: impl Into<String>) {
        let glyph = glyph.into();
        self.last_sticker = Some(glyph.clone());
        self.mode = ToolMode::Sticker(glyph);
    }

    /// Switch to sticker mode with the last used glyph, or the first in the palette.
    ///
    /// Returns false when there is no glyph to pick.
    pub fn enter_sticker_mode(&mut self) -> bool {
        let glyph = self
            .last_sticker
            .clone()
            .or_else(|| self.palette.first().cloned());
        match glyph {
            Some(glyph) => {
                self.select_sticker(glyph);
                true
            }
            None => false,
        }
    }

    /// Set the marker thickness. Applies to the cursor preview and new strokes.
    pub fn set_thickness(&mut self, thickness: Thickness) {
        self.thickness = thickness;
    }

    /// Split free text into grapheme clusters and add each new one to the palette.
    ///
    /// Whitespace and glyphs already present are skipped. Returns the glyphs added.
    pub fn add_stickers(&mut self, input: &str) -> Vec<String> {
        input
            .graphemes(true)
            .filter(|g| self.push_glyph(g))
            .map(str::to_string)
            .collect()
    }

    fn push_glyph(&mut self, glyph: &str) -> bool {
        if glyph.trim().is_empty() || self.palette.iter().any(|g| g == glyph) {
            return false;
        }
        self.palette.push(glyph.to_string());
        true
    }

    /// Preview for the current tool at `point`.
    pub fn preview_at(&self, point: Point) -> Drawable {
        match &self.mode {
            ToolMode::Draw => {
                let mut cursor = CursorPreview::new(point, self.current_width());
                cursor.color = self.stroke_color;
                Drawable::Cursor(cursor)
            }
            ToolMode::Sticker(glyph) => Drawable::Sticker(Sticker::preview(
                point,
                glyph.as_str(),
                self.sticker_size,
                self.preview_opacity,
            )),
        }
    }

    /// Start a stroke at `point` with the current width and color.
    pub fn new_stroke(&self, point: Point) -> Stroke {
        Stroke::new(point, self.current_width()).with_color(self.stroke_color)
    }

    /// A placed sticker at `point`, if in sticker mode.
    pub fn new_sticker(&self, point: Point) -> Option<Sticker> {
        self.current_sticker()
            .map(|glyph| Sticker::new(point, glyph, self.sticker_size))
    }
}
