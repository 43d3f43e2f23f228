use crate::fonts::BuiltinFont;

/// RGB color for fills, strokes and text.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from RGB components (each 0.0–1.0).
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a grayscale color (r = g = b = level).
    pub fn gray(level: f64) -> Self {
        Color {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// Font, size and fill color for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: BuiltinFont,
    pub font_size: f64,
    pub color: Color,
}

impl TextStyle {
    pub fn regular(font_size: f64) -> Self {
        TextStyle {
            font: BuiltinFont::Helvetica,
            font_size,
            color: Color::BLACK,
        }
    }

    pub fn bold(font_size: f64) -> Self {
        TextStyle {
            font: BuiltinFont::HelveticaBold,
            font_size,
            color: Color::BLACK,
        }
    }

    pub fn oblique(font_size: f64) -> Self {
        TextStyle {
            font: BuiltinFont::HelveticaOblique,
            font_size,
            color: Color::BLACK,
        }
    }

    /// Same style with a different fill color.
    pub fn with_color(self, color: Color) -> Self {
        TextStyle { color, ..self }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle::regular(12.0)
    }
}
