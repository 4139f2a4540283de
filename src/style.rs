//! Thumbnail styles and the render entry point.
//!
//! Each style is an independent composition of the shared layer, draw,
//! blur and text primitives, rendered back-to-front in a fixed z-order:
//! background, glow/atmosphere, decorative geometry, legibility scrim,
//! text, branding. The shared chrome (tag label, title block, brand
//! footer, corner brackets) lives here so styles stay lean.

mod mesh;
mod radar;
mod scatter;
mod waves;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use kurbo::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::color::Rgba;
use crate::draw;
use crate::error::{ThumbsmithError, ThumbsmithResult};
use crate::layer::{Layer, rotated_working_square};
use crate::layout::{DEFAULT_SEED, LayoutRng};
use crate::text::{self, FontFace};
use crate::theme::BrandTheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Hacked radar display: broken concentric arcs, rotated geometry,
    /// diagonal slashes, sweep cone, scan bands.
    Radar,
    /// Aurora gradient wave bands with blurred glow and crisp wave lines.
    Waves,
    /// Seeded particle field with faint rings.
    Scatter,
    /// Seeded network graph with node glows.
    Mesh,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Radar, Style::Waves, Style::Scatter, Style::Mesh];

    pub fn name(self) -> &'static str {
        match self {
            Style::Radar => "radar",
            Style::Waves => "waves",
            Style::Scatter => "scatter",
            Style::Mesh => "mesh",
        }
    }
}

/// One render invocation: what to draw and where to put it.
#[derive(Debug, Clone)]
pub struct ThumbnailSpec {
    pub title: String,
    pub tag: String,
    pub output_path: PathBuf,
    /// Layout seed; `None` means [`DEFAULT_SEED`].
    pub seed: Option<u64>,
    pub style: Style,
}

impl ThumbnailSpec {
    pub fn validate(&self) -> ThumbsmithResult<()> {
        if self.title.trim().is_empty() {
            return Err(ThumbsmithError::validation("title must be non-empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ThumbsmithError::validation("output path must be non-empty"));
        }
        Ok(())
    }
}

/// The two brand faces, loaded once per render.
pub(crate) struct Fonts {
    pub display: FontFace,
    pub body: FontFace,
}

impl Fonts {
    fn load(theme: &BrandTheme) -> Self {
        Self {
            display: FontFace::load(&theme.display_font_path()),
            body: FontFace::load(&theme.body_font_path()),
        }
    }
}

/// Render a thumbnail and write it as a lossless PNG.
///
/// The canvas is flattened to opaque RGB before encoding, parent
/// directories are created as needed, and the file is written to a
/// temporary sibling path and renamed into place so a failed render
/// never leaves a partial image behind.
#[instrument(skip_all, fields(style = spec.style.name(), out = %spec.output_path.display()))]
pub fn render_thumbnail(spec: &ThumbnailSpec, theme: &BrandTheme) -> ThumbsmithResult<PathBuf> {
    spec.validate()?;
    theme.validate()?;

    let fonts = Fonts::load(theme);
    let seed = spec.seed.unwrap_or(DEFAULT_SEED);
    let mut rng = LayoutRng::from_seed(seed);
    debug!(seed, "compositing layers");

    let canvas = match spec.style {
        Style::Radar => radar::compose(spec, theme, &fonts, &mut rng)?,
        Style::Waves => waves::compose(spec, theme, &fonts, &mut rng)?,
        Style::Scatter => scatter::compose(spec, theme, &fonts, &mut rng)?,
        Style::Mesh => mesh::compose(spec, theme, &fonts, &mut rng)?,
    };

    let image = canvas.to_rgb_image(theme.background);
    let mut encoded = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
        .map_err(|e| ThumbsmithError::render(format!("png encode: {e}")))?;

    write_atomic(&spec.output_path, &encoded)?;
    debug!(bytes = encoded.len(), "thumbnail written");
    Ok(spec.output_path.clone())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> ThumbsmithResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes)?;
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared chrome
// ---------------------------------------------------------------------------

/// Raw bracket tag `[ TAG ]` near the top-left, with a strikethrough.
pub(crate) fn bracket_tag(canvas: &mut Layer, theme: &BrandTheme, fonts: &Fonts, tag: &str) {
    let label = format!("[ {} ]", tag.to_uppercase());
    let size = 18.0;
    text::draw_text(canvas, 72.0, 68.0, &label, &fonts.body, size, theme.accent.with_alpha(220));

    let w = fonts.body.line_width(&label, size);
    let y = 68.0 + fonts.body.line_height(size) / 2.0 + 2.0;
    draw::line(
        canvas,
        Point::new(70.0, y),
        Point::new(70.0 + w + 8.0, y),
        1.0,
        theme.accent.with_alpha(55),
    );
}

/// Accent tag pill near the top-left.
pub(crate) fn pill_tag(canvas: &mut Layer, theme: &BrandTheme, fonts: &Fonts, tag: &str) {
    let label = tag.to_uppercase();
    let size = 18.0;
    let w = fonts.body.line_width(&label, size);
    let h = fonts.body.line_height(size);
    let (x, y) = (72.0, 62.0);
    let (pad_x, pad_y) = (14.0, 7.0);
    draw::fill_rounded_rect(
        canvas,
        x,
        y,
        x + w + pad_x * 2.0,
        y + h + pad_y * 2.0,
        (h + pad_y * 2.0) / 2.0,
        theme.accent.with_alpha(36),
    );
    text::draw_text(canvas, x + pad_x, y + pad_y, &label, &fonts.body, size, theme.accent);
}

/// Word-wrapped title block starting in the left margin, optionally
/// rotated as one unit via a diagonal working square.
pub(crate) fn title_block(
    canvas: &mut Layer,
    theme: &BrandTheme,
    fonts: &Fonts,
    title: &str,
    top: f64,
    angle_deg: f64,
) {
    let max_w = f64::from(theme.width) * 0.62;
    let max_h = f64::from(theme.height) - top - 120.0;
    let spacing = 16.0;
    let (size, lines) =
        text::fit_text(&fonts.display, title, 56.0, 28.0, max_w, max_h, 3, spacing);

    if angle_deg == 0.0 {
        text::draw_lines(canvas, 72.0, top, &lines, &fonts.display, size, spacing, theme.text);
        return;
    }

    // render axis-aligned, rotate the whole block, paste at the anchor
    let widest = lines
        .iter()
        .map(|l| fonts.display.line_width(l, size))
        .fold(0.0f64, f64::max);
    let block_h = lines.len() as f64 * fonts.display.line_height(size)
        + spacing * lines.len().saturating_sub(1) as f64;
    let pad = 20.0;
    let bw = (widest + pad * 2.0).ceil() as u32;
    let bh = (block_h + pad * 2.0).ceil() as u32;

    let (mut square, off_x, off_y) = rotated_working_square(bw, bh, 0);
    text::draw_lines(
        &mut square,
        off_x as f64 + pad,
        off_y as f64 + pad,
        &lines,
        &fonts.display,
        size,
        spacing,
        theme.text,
    );
    let rotated = square.rotated(angle_deg);
    let paste_x = 72 - i64::from(rotated.width) / 2 + i64::from(bw) / 2 - pad as i64;
    let paste_y = top as i64 - i64::from(rotated.height) / 2 + i64::from(bh) / 2 - pad as i64;
    canvas.paste(&rotated, paste_x, paste_y);
}

/// Footer branding: separator, brand name, URL.
pub(crate) fn brand_footer(canvas: &mut Layer, theme: &BrandTheme, fonts: &Fonts) {
    let h = f64::from(theme.height);
    draw::line(
        canvas,
        Point::new(72.0, h - 62.0),
        Point::new(260.0, h - 62.0),
        1.0,
        Rgba::WHITE.with_alpha(25),
    );
    text::draw_text(
        canvas,
        72.0,
        h - 50.0,
        &theme.brand_name,
        &fonts.display,
        18.0,
        theme.accent.with_alpha(180),
    );
    let name_w = fonts.display.line_width(&theme.brand_name, 18.0);
    text::draw_text(
        canvas,
        72.0 + name_w + 14.0,
        h - 47.0,
        &theme.brand_url,
        &fonts.body,
        14.0,
        theme.text_muted,
    );
}

/// Corner bracket crop marks framing the whole canvas.
pub(crate) fn corner_brackets(canvas: &mut Layer, theme: &BrandTheme, color: Rgba) {
    let (w, h) = (f64::from(theme.width), f64::from(theme.height));
    let len = 55.0;
    let thick = 4.0;
    let inset = 16.0;
    let corners = [
        (inset, inset, 1.0, 1.0),
        (w - inset, inset, -1.0, 1.0),
        (inset, h - inset, 1.0, -1.0),
        (w - inset, h - inset, -1.0, -1.0),
    ];
    for (cx, cy, sx, sy) in corners {
        draw::line(canvas, Point::new(cx, cy), Point::new(cx, cy + sy * len), thick, color);
        draw::line(canvas, Point::new(cx, cy), Point::new(cx + sx * len, cy), thick, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_rejects_blank_title() {
        let spec = ThumbnailSpec {
            title: "   ".to_owned(),
            tag: "Tag".to_owned(),
            output_path: PathBuf::from("out.png"),
            seed: None,
            style: Style::Radar,
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn style_names_round_trip_serde() {
        for style in Style::ALL {
            let json = serde_json::to_string(&style).unwrap();
            assert_eq!(json, format!("\"{}\"", style.name()));
            let back: Style = serde_json::from_str(&json).unwrap();
            assert_eq!(back, style);
        }
    }

    #[test]
    fn chrome_helpers_mark_canvas() {
        let theme = BrandTheme::default();
        let fonts = Fonts {
            display: FontFace::builtin(),
            body: FontFace::builtin(),
        };
        let mut canvas = Layer::filled(theme.width, theme.height, theme.background);
        let before = canvas.data.clone();
        bracket_tag(&mut canvas, &theme, &fonts, "uk procurement");
        title_block(&mut canvas, &theme, &fonts, "Hello World", 118.0, -2.0);
        brand_footer(&mut canvas, &theme, &fonts);
        corner_brackets(&mut canvas, &theme, theme.accent.with_alpha(130));
        assert_ne!(canvas.data, before);
    }
}
