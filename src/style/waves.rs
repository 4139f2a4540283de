//! Aurora gradient waves: flowing multi-harmonic bands with soft glow,
//! crisp wave lines riding on top, and a legibility scrim under the text.

use kurbo::Point;

use crate::blur::blur_layer;
use crate::color::Rgba;
use crate::draw;
use crate::error::ThumbsmithResult;
use crate::layer::Layer;
use crate::layout::LayoutRng;
use crate::style::{Fonts, ThumbnailSpec, brand_footer, pill_tag, title_block};
use crate::theme::BrandTheme;

struct WaveBand {
    y_center: f64,
    amplitude: f64,
    freq: f64,
    phase: f64,
    c_start: Rgba,
    c_mid: Rgba,
    c_end: Rgba,
    peak_alpha: u8,
    thickness: f64,
    blur_radius: u32,
    x_bias: f64,
}

pub(crate) fn compose(
    spec: &ThumbnailSpec,
    theme: &BrandTheme,
    fonts: &Fonts,
    rng: &mut LayoutRng,
) -> ThumbsmithResult<Layer> {
    let (w, h) = (theme.width, theme.height);
    let (wf, hf) = (f64::from(w), f64::from(h));
    let accent = theme.accent;
    let teal = theme.accent_alt;

    let mut canvas = Layer::filled(w, h, theme.background);
    let mut bg = Layer::transparent(w, h);
    draw::linear_gradient_v(
        &mut bg,
        theme.background,
        Rgba::rgb(
            theme.background.r.saturating_add(4),
            theme.background.g.saturating_add(10),
            theme.background.b.saturating_add(12),
        ),
    );
    canvas.composite_over(&bg)?;

    // back-to-front aurora bands: wide faint teal first, brighter and
    // tighter accent bands on top
    let deep = Rgba::rgb(5, 70, 65);
    let dark = Rgba::rgb(5, 50, 45);
    let bands = [
        WaveBand {
            y_center: hf * 0.76 + rng.range_f64(-20.0, 20.0),
            amplitude: rng.range_f64(80.0, 110.0),
            freq: 0.0025,
            phase: rng.range_f64(0.0, 6.28),
            c_start: deep,
            c_mid: teal,
            c_end: dark,
            peak_alpha: 70,
            thickness: 150.0,
            blur_radius: 10,
            x_bias: 0.35,
        },
        WaveBand {
            y_center: hf * 0.64 + rng.range_f64(-18.0, 18.0),
            amplitude: rng.range_f64(55.0, 80.0),
            freq: 0.0032,
            phase: rng.range_f64(0.0, 6.28),
            c_start: teal,
            c_mid: accent.with_alpha(255),
            c_end: teal,
            peak_alpha: 55,
            thickness: 100.0,
            blur_radius: 8,
            x_bias: 0.55,
        },
        WaveBand {
            y_center: hf * 0.55 + rng.range_f64(-14.0, 14.0),
            amplitude: rng.range_f64(35.0, 55.0),
            freq: 0.0041,
            phase: rng.range_f64(0.0, 6.28),
            c_start: dark,
            c_mid: accent.with_alpha(255),
            c_end: deep,
            peak_alpha: 45,
            thickness: 64.0,
            blur_radius: 6,
            x_bias: 0.7,
        },
    ];
    for band in &bands {
        let layer = draw_band(w, h, band)?;
        canvas.composite_over(&layer)?;
    }

    // crisp flowing lines riding the glow
    for i in 0..3 {
        let line = WaveBand {
            y_center: hf * (0.52 + 0.1 * f64::from(i)) + rng.range_f64(-10.0, 10.0),
            amplitude: rng.range_f64(30.0, 60.0),
            freq: 0.003 + 0.0006 * f64::from(i),
            phase: rng.range_f64(0.0, 6.28),
            c_start: accent,
            c_mid: accent,
            c_end: accent,
            peak_alpha: (90 - i * 20) as u8,
            thickness: 2.0,
            blur_radius: 2,
            x_bias: 0.55,
        };
        let layer = draw_wave_line(w, h, &line)?;
        canvas.composite_over(&layer)?;
    }

    // glow orb accent, upper right
    let mut orb = Layer::transparent(w, h);
    let (ox, oy) = (wf * 0.74, hf * 0.3);
    draw::radial_glow(&mut orb, ox, oy, 170.0, teal, 60);
    draw::fill_circle(&mut orb, ox, oy, 4.0, accent.with_alpha(200));
    canvas.composite_over(&orb)?;

    // subtle noise grain
    let mut grain = Layer::transparent(w, h);
    for _ in 0..140 {
        let x = rng.range_f64(0.0, wf);
        let y = rng.range_f64(0.0, hf);
        let alpha = rng.range_alpha(4, 12);
        let size = rng.range_f64(0.5, 1.3);
        draw::fill_circle(&mut grain, x, y, size, Rgba::WHITE.with_alpha(alpha));
    }
    canvas.composite_over(&grain)?;

    // scrim so text stays readable over the bright bands
    draw::vignette_bottom(&mut canvas, hf * 0.35, Rgba::BLACK, 150);

    pill_tag(&mut canvas, theme, fonts, &spec.tag);
    title_block(&mut canvas, theme, fonts, &spec.title, 130.0, 0.0);
    brand_footer(&mut canvas, theme, fonts);

    // left edge accent sliver
    draw::fill_rect(&mut canvas, 0.0, 0.0, 4.0, hf, accent.with_alpha(140));

    Ok(canvas)
}

fn wave_y(band: &WaveBand, x: f64) -> f64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    band.y_center
        + band.amplitude * (band.freq * x * two_pi + band.phase).sin()
        + band.amplitude * 0.35 * (band.freq * 1.8 * x * two_pi + band.phase * 2.1).sin()
        + band.amplitude * 0.15 * (band.freq * 3.2 * x * two_pi + band.phase * 0.7).sin()
}

/// Soft gradient band: vertical strips with a 3-stop horizontal gradient,
/// bell-curve alpha envelope and Gaussian falloff across the thickness,
/// blurred afterwards for the glow.
fn draw_band(w: u32, h: u32, band: &WaveBand) -> ThumbsmithResult<Layer> {
    let mut layer = Layer::transparent(w, h);
    let wf = f64::from(w);
    let hf = f64::from(h);

    let mut x = 0.0;
    while x < wf {
        let x_ratio = x / wf;
        let y_mid = wave_y(band, x);
        let color = Rgba::lerp3(band.c_start, band.c_mid, band.c_end, x_ratio);

        // bell envelope centered at x_bias, gentle fade at canvas edges
        let dist = (x_ratio - band.x_bias).abs() / band.x_bias.max(1.0 - band.x_bias);
        let envelope = (-2.5 * dist * dist).exp();
        let edge_fade = (x_ratio / 0.08).min(1.0) * ((1.0 - x_ratio) / 0.08).min(1.0);
        let alpha = f64::from(band.peak_alpha) * envelope * edge_fade;
        if alpha < 1.0 {
            x += 2.0;
            continue;
        }

        let half = band.thickness / 2.0;
        let top = y_mid - half;
        let mut y_off = 0.0;
        while y_off < band.thickness {
            let y_pos = top + y_off;
            if y_pos >= 0.0 && y_pos < hf {
                let d = (y_off - half).abs() / (half + 0.001);
                let local = (alpha * (-2.8 * d * d).exp()).round() as u8;
                if local > 0 {
                    draw::fill_rect(&mut layer, x, y_pos, x + 2.0, y_pos + 2.0, color.with_alpha(local));
                }
            }
            y_off += 2.0;
        }
        x += 2.0;
    }

    blur_layer(&layer, band.blur_radius, f64::from(band.blur_radius) / 2.0)
}

/// Thin anti-aliased wave line with per-segment alpha.
fn draw_wave_line(w: u32, h: u32, band: &WaveBand) -> ThumbsmithResult<Layer> {
    let mut layer = Layer::transparent(w, h);
    let wf = f64::from(w);

    let mut prev: Option<(f64, f64, f64)> = None;
    let mut x = 0.0;
    while x <= wf {
        let x_ratio = x / wf;
        let y = wave_y(band, x);
        let edge_fade = (x_ratio / 0.1).min(1.0) * ((1.0 - x_ratio) / 0.1).min(1.0);
        let boost = (-3.0 * (x_ratio - band.x_bias).powi(2)).exp();
        let alpha = f64::from(band.peak_alpha) * edge_fade * (0.3 + 0.7 * boost);

        if let Some((px, py, pa)) = prev {
            let avg = ((alpha + pa) / 2.0).round() as u8;
            if avg >= 2 {
                draw::line(
                    &mut layer,
                    Point::new(px, py),
                    Point::new(x, y),
                    band.thickness,
                    band.c_mid.with_alpha(avg),
                );
            }
        }
        prev = Some((x, y, alpha));
        x += 4.0;
    }

    blur_layer(&layer, band.blur_radius, f64::from(band.blur_radius) / 2.0)
}
