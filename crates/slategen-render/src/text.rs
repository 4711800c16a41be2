//! Text measurement behind a trait seam.
//!
//! The auto aspect-ratio search needs descriptor widths before anything is
//! rasterized. `FontFileTextMeasurer` reads real glyph advances from the
//! configured slate font; `DeterministicTextMeasurer` approximates a bold
//! sans-serif with a per-character em-width table and needs no assets, which
//! also makes it the measurer of choice in tests.

use std::path::Path;

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font_size: f64,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Width of one character in em, tuned against a regular-weight sans-serif.
fn char_width_em(ch: char) -> f64 {
    if ch == ' ' {
        return 0.33;
    }
    if ch == '_' || ch == '-' {
        return 0.33;
    }
    if matches!(ch, '.' | ',' | ':' | ';' | '\'') {
        return 0.28;
    }
    if matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | '/') {
        return 0.33;
    }
    if matches!(ch, '+' | '*' | '=' | '\\' | '^' | '|' | '~') {
        return 0.45;
    }
    if ch.is_ascii_digit() {
        return 0.56;
    }
    if ch.is_ascii_uppercase() {
        return match ch {
            'I' => 0.30,
            'W' => 0.85,
            _ => 0.60,
        };
    }
    if ch.is_ascii_lowercase() {
        return match ch {
            'i' | 'l' => 0.28,
            'm' | 'w' => 0.78,
            'k' | 'y' => 0.55,
            _ => 0.43,
        };
    }
    0.60
}

/// Bold faces run wider than the regular table above.
const BOLD_WIDTH_FACTOR: f64 = 1.08;
const LINE_HEIGHT_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer;

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let font_size = style.font_size.max(1.0);
        let em: f64 = text.chars().map(char_width_em).sum();
        let mut width = em * font_size;
        if style.bold {
            width *= BOLD_WIDTH_FACTOR;
        }
        TextMetrics {
            width,
            height: font_size * LINE_HEIGHT_FACTOR,
        }
    }
}

/// Measures with the horizontal advances of an actual font face.
///
/// The face is validated at construction; characters the face has no glyph
/// for fall back to the deterministic table so a sparse font cannot zero out
/// a descriptor's width.
#[derive(Debug, Clone)]
pub struct FontFileTextMeasurer {
    data: Vec<u8>,
}

impl FontFileTextMeasurer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        if ttf_parser::Face::parse(&data, 0).is_err() {
            return Err(Error::FontParse {
                path: path.display().to_string(),
            });
        }
        Ok(Self { data })
    }
}

impl TextMeasurer for FontFileTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let Ok(face) = ttf_parser::Face::parse(&self.data, 0) else {
            return DeterministicTextMeasurer.measure(text, style);
        };
        let font_size = style.font_size.max(1.0);
        let upem = f64::from(face.units_per_em());

        let mut width = 0.0;
        for ch in text.chars() {
            let advance = face
                .glyph_index(ch)
                .and_then(|gid| face.glyph_hor_advance(gid));
            match advance {
                Some(units) => width += f64::from(units) / upem * font_size,
                None => {
                    let mut em = char_width_em(ch);
                    if style.bold {
                        em *= BOLD_WIDTH_FACTOR;
                    }
                    width += em * font_size;
                }
            }
        }
        TextMetrics {
            width,
            height: font_size * LINE_HEIGHT_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_linearly_with_font_size() {
        let m = DeterministicTextMeasurer;
        let style_small = TextStyle { font_size: 10.0, bold: true };
        let style_large = TextStyle { font_size: 20.0, bold: true };
        let small = m.measure("Intense Violence", &style_small).width;
        let large = m.measure("Intense Violence", &style_large).width;
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn longer_text_measures_wider() {
        let m = DeterministicTextMeasurer;
        let style = TextStyle { font_size: 82.0, bold: true };
        let short = m.measure("Blood", &style).width;
        let long = m.measure("Blood and Gore", &style).width;
        assert!(long > short);
        assert!(short > 0.0);
    }

    #[test]
    fn bold_runs_wider_than_regular() {
        let m = DeterministicTextMeasurer;
        let bold = m.measure("Violence", &TextStyle { font_size: 82.0, bold: true });
        let regular = m.measure("Violence", &TextStyle { font_size: 82.0, bold: false });
        assert!(bold.width > regular.width);
    }

    #[test]
    fn font_file_measurer_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("not-a-font.ttf");
        std::fs::write(&path, b"definitely not sfnt data").expect("write");
        assert!(matches!(
            FontFileTextMeasurer::from_file(&path),
            Err(Error::FontParse { .. })
        ));
    }
}
