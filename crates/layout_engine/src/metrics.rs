//! Glyph advance metrics

/// Horizontal advance of glyphs in a handwriting font
pub trait GlyphMetrics: Send + Sync {
    /// Advance width of `ch` at `font_size` pixels
    fn advance(&self, ch: char, font_size: f32) -> f32;

    /// Sum of advances of every character in `text`
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.advance(ch, font_size)).sum()
    }
}

/// Approximate advances of a casual cursive font, by character class
#[derive(Debug, Default, Clone, Copy)]
pub struct HandMetrics;

impl HandMetrics {
    fn em_width(ch: char) -> f32 {
        match ch {
            ' ' => 0.3,
            'i' | 'j' | 'l' | '!' | '|' | '\'' | ',' | '.' | ':' | ';' | '`' => 0.25,
            'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '{' | '}' => 0.35,
            'm' | 'w' | 'M' | 'W' => 0.8,
            'A'..='Z' => 0.6,
            '0'..='9' => 0.55,
            'a'..='z' => 0.5,
            _ => 0.55,
        }
    }
}

impl GlyphMetrics for HandMetrics {
    fn advance(&self, ch: char, font_size: f32) -> f32 {
        Self::em_width(ch) * font_size
    }
}

/// Every glyph advances by the same fraction of the font size
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    pub em: f32,
}

impl MonospaceMetrics {
    pub fn new(em: f32) -> Self {
        Self { em }
    }
}

impl GlyphMetrics for MonospaceMetrics {
    fn advance(&self, _ch: char, font_size: f32) -> f32 {
        self.em * font_size
    }
}
