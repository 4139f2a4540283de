//! Scatter dots: a seeded particle field drifting toward the right half,
//! with a few faint orbit rings for structure.

use crate::color::Rgba;
use crate::draw;
use crate::error::ThumbsmithResult;
use crate::layer::Layer;
use crate::layout::LayoutRng;
use crate::style::{Fonts, ThumbnailSpec, brand_footer, pill_tag, title_block};
use crate::theme::BrandTheme;

pub(crate) fn compose(
    spec: &ThumbnailSpec,
    theme: &BrandTheme,
    fonts: &Fonts,
    rng: &mut LayoutRng,
) -> ThumbsmithResult<Layer> {
    let (w, h) = (theme.width, theme.height);
    let (wf, hf) = (f64::from(w), f64::from(h));
    let accent = theme.accent;

    let mut canvas = Layer::filled(w, h, theme.background);

    // soft atmosphere in the dot-dense corner
    let mut atmosphere = Layer::transparent(w, h);
    draw::radial_glow(&mut atmosphere, wf * 0.78, hf * 0.42, 420.0, theme.accent_alt, 26);
    canvas.composite_over(&atmosphere)?;

    // faint orbit rings anchoring the scatter
    let mut rings = Layer::transparent(w, h);
    for _ in 0..3 {
        let cx = rng.range_f64(wf * 0.55, wf * 0.95);
        let cy = rng.range_f64(hf * 0.2, hf * 0.8);
        let radius = rng.range_f64(70.0, 260.0);
        let alpha = rng.range_alpha(14, 34);
        draw::stroke_circle(&mut rings, cx, cy, radius, 1.0, accent.with_alpha(alpha));
    }
    canvas.composite_over(&rings)?;

    // the particle field: density rises toward the right, size and
    // brightness vary per dot, a handful get a glow halo
    let mut field = Layer::transparent(w, h);
    for _ in 0..90 {
        let x = wf * rng.range_f64(0.0, 1.0).powf(0.6);
        let y = rng.range_f64(0.0, hf);
        let size = rng.range_f64(0.8, 5.5);
        let alpha = rng.range_alpha(20, 160);
        let color = if rng.chance(0.7) {
            accent
        } else if rng.chance(0.5) {
            Rgba::WHITE
        } else {
            theme.accent_alt
        };
        let halo = size > 3.5 && rng.chance(0.4);
        draw::blip(&mut field, x, y, size, color.with_alpha(alpha), halo);
    }
    canvas.composite_over(&field)?;

    // sparse dust between the bigger particles
    let mut dust = Layer::transparent(w, h);
    for _ in 0..120 {
        let x = rng.range_f64(0.0, wf);
        let y = rng.range_f64(0.0, hf);
        let alpha = rng.range_alpha(6, 22);
        draw::fill_circle(&mut dust, x, y, rng.range_f64(0.4, 1.0), Rgba::WHITE.with_alpha(alpha));
    }
    canvas.composite_over(&dust)?;

    draw::vignette_bottom(&mut canvas, hf * 0.4, Rgba::BLACK, 140);

    pill_tag(&mut canvas, theme, fonts, &spec.tag);
    title_block(&mut canvas, theme, fonts, &spec.title, 130.0, 0.0);
    brand_footer(&mut canvas, theme, fonts);

    draw::fill_rect(&mut canvas, 0.0, hf - 3.0, wf, hf, accent.with_alpha(50));

    Ok(canvas)
}
