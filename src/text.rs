//! Typography: font loading with graceful fallback, glyph drawing,
//! word wrap and shrink-to-fit.
//!
//! TTF faces go through `fontdue`; when a font file is missing or
//! unreadable the face silently degrades to a built-in scalable 5x7
//! bitmap font, so a render never fails on fonts. Coordinates given to
//! [`draw_text`] are the top-left corner of the line box.

use std::path::Path;

use tracing::warn;

use crate::color::Rgba;
use crate::layer::Layer;

pub struct FontFace {
    kind: FaceKind,
}

enum FaceKind {
    Ttf(Box<fontdue::Font>),
    Builtin,
}

impl FontFace {
    /// Load a TTF face, falling back to the builtin face on any failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => match fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
                Ok(font) => {
                    return Self {
                        kind: FaceKind::Ttf(Box::new(font)),
                    };
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "font file unusable, using builtin face");
                }
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "font file unreadable, using builtin face");
            }
        }
        Self::builtin()
    }

    pub fn builtin() -> Self {
        Self {
            kind: FaceKind::Builtin,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, FaceKind::Builtin)
    }

    fn builtin_scale(size: f64) -> u32 {
        ((size / 8.0).round() as u32).max(1)
    }

    /// Height of one line box at `size`.
    pub fn line_height(&self, size: f64) -> f64 {
        match &self.kind {
            FaceKind::Ttf(font) => font
                .horizontal_line_metrics(size as f32)
                .map(|m| f64::from(m.new_line_size))
                .unwrap_or(size * 1.2),
            FaceKind::Builtin => f64::from(Self::builtin_scale(size) * 9),
        }
    }

    fn ascent(&self, size: f64) -> f64 {
        match &self.kind {
            FaceKind::Ttf(font) => font
                .horizontal_line_metrics(size as f32)
                .map(|m| f64::from(m.ascent))
                .unwrap_or(size * 0.8),
            FaceKind::Builtin => f64::from(Self::builtin_scale(size) * 7),
        }
    }

    /// Advance width of a single line of text at `size`.
    pub fn line_width(&self, text: &str, size: f64) -> f64 {
        match &self.kind {
            FaceKind::Ttf(font) => text
                .chars()
                .map(|ch| f64::from(font.metrics(ch, size as f32).advance_width))
                .sum(),
            FaceKind::Builtin => {
                let scale = f64::from(Self::builtin_scale(size));
                text.chars().count() as f64 * 6.0 * scale
            }
        }
    }
}

/// Draw one line of text with its line box's top-left corner at `(x, y)`.
pub fn draw_text(layer: &mut Layer, x: f64, y: f64, text: &str, face: &FontFace, size: f64, color: Rgba) {
    match &face.kind {
        FaceKind::Ttf(font) => draw_ttf(layer, x, y, text, font, face.ascent(size), size, color),
        FaceKind::Builtin => draw_builtin(layer, x, y, text, FontFace::builtin_scale(size), color),
    }
}

/// Draw a multi-line block; returns the pixel height consumed.
#[allow(clippy::too_many_arguments)]
pub fn draw_lines(
    layer: &mut Layer,
    x: f64,
    y: f64,
    lines: &[String],
    face: &FontFace,
    size: f64,
    line_spacing: f64,
    color: Rgba,
) -> f64 {
    let lh = face.line_height(size);
    let mut cursor = y;
    for line in lines {
        draw_text(layer, x, cursor, line, face, size, color);
        cursor += lh + line_spacing;
    }
    (cursor - y - if lines.is_empty() { 0.0 } else { line_spacing }).max(0.0)
}

#[allow(clippy::too_many_arguments)]
fn draw_ttf(
    layer: &mut Layer,
    x: f64,
    y: f64,
    text: &str,
    font: &fontdue::Font,
    ascent: f64,
    size: f64,
    color: Rgba,
) {
    let baseline = y + ascent;
    let mut cursor = x;
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, size as f32);
        let gx = (cursor + f64::from(metrics.xmin)).round() as i64;
        let gy = (baseline - f64::from(metrics.height as i32 + metrics.ymin)).round() as i64;
        for (row, chunk) in bitmap.chunks_exact(metrics.width.max(1)).enumerate() {
            for (col, &cov) in chunk.iter().enumerate() {
                if cov == 0 {
                    continue;
                }
                let a = ((u32::from(cov) * u32::from(color.a) + 127) / 255) as u8;
                layer.blend(gx + col as i64, gy + row as i64, color.with_alpha(a));
            }
        }
        cursor += f64::from(metrics.advance_width);
    }
}

fn draw_builtin(layer: &mut Layer, x: f64, y: f64, text: &str, scale: u32, color: Rgba) {
    let s = i64::from(scale);
    let mut cursor = x.round() as i64;
    let top = y.round() as i64;
    for ch in text.chars() {
        let rows = builtin_glyph(ch);
        for (r, bits) in rows.iter().enumerate() {
            for c in 0..5 {
                if bits & (0b10000u8 >> c) == 0 {
                    continue;
                }
                let px = cursor + c as i64 * s;
                let py = top + r as i64 * s;
                for dy in 0..s {
                    for dx in 0..s {
                        layer.blend(px + dx, py + dy, color);
                    }
                }
            }
        }
        cursor += 6 * s;
    }
}

/// Greedy word wrap against a pixel width budget. A single word wider
/// than the budget gets its own line; nothing is hyphenated or truncated.
pub fn wrap_to_width(face: &FontFace, size: f64, text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_owned();
            continue;
        }
        let candidate = format!("{current} {word}");
        if face.line_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_owned();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap `text` into at most `max_lines` lines fitting `max_width` x
/// `max_height`, shrinking the font size in fixed steps down to
/// `min_size` when it would overflow. Returns the chosen size and lines
/// (capped at `max_lines` even at the floor size).
#[allow(clippy::too_many_arguments)]
pub fn fit_text(
    face: &FontFace,
    text: &str,
    start_size: f64,
    min_size: f64,
    max_width: f64,
    max_height: f64,
    max_lines: usize,
    line_spacing: f64,
) -> (f64, Vec<String>) {
    let step = 4.0;
    let mut size = start_size;
    loop {
        let lines = wrap_to_width(face, size, text, max_width);
        let height = lines.len() as f64 * face.line_height(size)
            + line_spacing * lines.len().saturating_sub(1) as f64;
        let widest = lines
            .iter()
            .map(|l| face.line_width(l, size))
            .fold(0.0f64, f64::max);

        let fits = lines.len() <= max_lines && height <= max_height && widest <= max_width;
        if fits || size - step < min_size {
            let mut lines = lines;
            lines.truncate(max_lines);
            return (size, lines);
        }
        size -= step;
    }
}

/// 5x7 bitmap glyphs for the builtin fallback face, one row per byte,
/// high bit = leftmost column. Unknown characters render a hollow box.
fn builtin_glyph(ch: char) -> [u8; 7] {
    match ch {
        ' ' => [0, 0, 0, 0, 0, 0, 0],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '"' => [0b01010, 0b01010, 0b01010, 0, 0, 0, 0],
        '#' => [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        '$' => [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100],
        '%' => [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '\'' => [0b00100, 0b00100, 0b01000, 0, 0, 0, 0],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '*' => [0b00000, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        ',' => [0, 0, 0, 0, 0b00110, 0b00100, 0b01000],
        '-' => [0, 0, 0, 0b11111, 0, 0, 0],
        '.' => [0, 0, 0, 0, 0, 0b00110, 0b00110],
        '/' => [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => [0, 0b00110, 0b00110, 0, 0b00110, 0b00110, 0],
        ';' => [0, 0b00110, 0b00110, 0, 0b00110, 0b00100, 0b01000],
        '<' => [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010],
        '=' => [0, 0, 0b11111, 0, 0b11111, 0, 0],
        '>' => [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '@' => [0b01110, 0b10001, 0b00001, 0b01101, 0b10101, 0b10101, 0b01110],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '[' => [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110],
        '\\' => [0b00000, 0b10000, 0b01000, 0b00100, 0b00010, 0b00001, 0b00000],
        ']' => [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110],
        '^' => [0b00100, 0b01010, 0b10001, 0, 0, 0, 0],
        '_' => [0, 0, 0, 0, 0, 0, 0b11111],
        '`' => [0b01000, 0b00100, 0, 0, 0, 0, 0],
        'a' => [0, 0, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'b' => [0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'c' => [0, 0, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        'd' => [0b00001, 0b00001, 0b01111, 0b10001, 0b10001, 0b10001, 0b01111],
        'e' => [0, 0, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'f' => [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000],
        'g' => [0, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'h' => [0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b10001, 0b10001],
        'i' => [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'j' => [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100],
        'k' => [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
        'l' => [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'm' => [0, 0, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101],
        'n' => [0, 0, 0b11110, 0b10001, 0b10001, 0b10001, 0b10001],
        'o' => [0, 0, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'p' => [0, 0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000],
        'q' => [0, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001],
        'r' => [0, 0, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        's' => [0, 0, 0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
        't' => [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110],
        'u' => [0, 0, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        'v' => [0, 0, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'w' => [0, 0, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010],
        'x' => [0, 0, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        'y' => [0, 0b10001, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'z' => [0, 0, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        '{' => [0b00110, 0b00100, 0b00100, 0b01000, 0b00100, 0b00100, 0b00110],
        '|' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        '}' => [0b01100, 0b00100, 0b00100, 0b00010, 0b00100, 0b00100, 0b01100],
        '~' => [0, 0, 0b01000, 0b10101, 0b00010, 0, 0],
        '£' => [0b00110, 0b01001, 0b01000, 0b11110, 0b01000, 0b01000, 0b11111],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let face = FontFace::load(Path::new("/definitely/not/here.ttf"));
        assert!(face.is_builtin());
    }

    #[test]
    fn builtin_metrics_scale_with_size() {
        let face = FontFace::builtin();
        assert!(face.line_height(56.0) > face.line_height(16.0));
        assert!(face.line_width("HELLO", 56.0) > face.line_width("HELLO", 16.0));
        assert!(face.line_width("LONGER TEXT", 16.0) > face.line_width("SHORT", 16.0));
    }

    #[test]
    fn draw_text_marks_pixels() {
        let face = FontFace::builtin();
        let mut l = Layer::transparent(200, 40);
        draw_text(&mut l, 2.0, 2.0, "ABC", &face, 24.0, Rgba::WHITE);
        let lit = l.data.chunks_exact(4).filter(|p| p[3] > 0).count();
        assert!(lit > 0);
    }

    #[test]
    fn wrap_splits_and_preserves_words() {
        let face = FontFace::builtin();
        let lines = wrap_to_width(&face, 16.0, "one two three four five six", 80.0);
        assert!(lines.len() > 1);
        let joined = lines.join(" ");
        assert_eq!(joined, "one two three four five six");
    }

    #[test]
    fn oversized_word_sits_alone_untruncated() {
        let face = FontFace::builtin();
        let word = "Antidisestablishmentarianism";
        let lines = wrap_to_width(&face, 16.0, &format!("a {word} b"), 40.0);
        assert!(lines.contains(&word.to_owned()));
    }

    #[test]
    fn fit_text_shrinks_until_line_cap() {
        let face = FontFace::builtin();
        let long = "How to Find UK Government Tenders in 2026 and Win Them Reliably";
        let (size, lines) = fit_text(&face, long, 56.0, 24.0, 700.0, 260.0, 3, 10.0);
        assert!(lines.len() <= 3);
        assert!(size <= 56.0 && size >= 24.0);
    }

    #[test]
    fn fit_text_single_char_is_fine() {
        let face = FontFace::builtin();
        let (size, lines) = fit_text(&face, "A", 56.0, 24.0, 700.0, 260.0, 3, 10.0);
        assert_eq!(size, 56.0);
        assert_eq!(lines, vec!["A".to_owned()]);
    }
}
