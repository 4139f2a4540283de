//! Hacked radar display: surveillance meets street art.
//!
//! Concentric scanning rings emanating from off the right edge, broken
//! by rotated geometry and diagonal slashes; bracketed tag, slightly
//! rotated title, crop-mark corners. The busiest style, and the one that
//! exercises every primitive in the crate.

use kurbo::Point;

use crate::color::Rgba;
use crate::draw;
use crate::error::ThumbsmithResult;
use crate::layer::Layer;
use crate::layout::LayoutRng;
use crate::style::{Fonts, ThumbnailSpec, bracket_tag, brand_footer, corner_brackets, title_block};
use crate::text;
use crate::theme::BrandTheme;

enum ArcKind {
    Solid,
    Dashed,
    Dotted,
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
    let white = Rgba::WHITE;

    // ring center pushed off the right edge so arcs sweep into view
    let ring_cx = wf + 80.0;
    let ring_cy = hf / 2.0 + 20.0;

    let mut canvas = Layer::filled(w, h, theme.background);

    // watermark characters at very low opacity, bleeding off the edges
    let mut wm = Layer::transparent(w, h);
    let initials: String = spec
        .tag
        .split_whitespace()
        .next()
        .unwrap_or("XX")
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase();
    text::draw_text(&mut wm, 20.0, 90.0, &initials, &fonts.display, 320.0, accent.with_alpha(20));
    text::draw_text(&mut wm, 620.0, -40.0, "#", &fonts.display, 420.0, accent.with_alpha(15));
    canvas.composite_over(&wm)?;

    // faint radial glow behind the ring center
    let mut atmosphere = Layer::transparent(w, h);
    draw::radial_glow(&mut atmosphere, ring_cx, ring_cy, 700.0, accent, 10);
    canvas.composite_over(&atmosphere)?;

    // broken concentric rings; partial arcs leave deliberate gaps
    let mut rings = Layer::transparent(w, h);
    let ring_configs: [(f64, ArcKind, f64, f64); 8] = [
        (130.0, ArcKind::Solid, 90.0, 340.0),
        (210.0, ArcKind::Dashed, 70.0, 310.0),
        (300.0, ArcKind::Dotted, 50.0, 350.0),
        (400.0, ArcKind::Solid, 100.0, 280.0),
        (400.0, ArcKind::Solid, 295.0, 345.0),
        (510.0, ArcKind::Dashed, 60.0, 330.0),
        (640.0, ArcKind::Dotted, 80.0, 340.0),
        (780.0, ArcKind::Dashed, 45.0, 350.0),
    ];
    for (i, (radius, kind, start, end)) in ring_configs.iter().enumerate() {
        let fi = i as f64;
        let alpha = (160.0 - fi * 16.0).max(15.0) as u8;
        let color = accent.with_alpha(alpha);
        match kind {
            ArcKind::Solid => {
                draw::stroke_arc(&mut rings, ring_cx, ring_cy, *radius, 1.0, color, *start, *end);
            }
            ArcKind::Dashed => draw::dashed_arc(
                &mut rings,
                ring_cx,
                ring_cy,
                *radius,
                color,
                *start,
                *end,
                14.0 + fi * 2.0,
                10.0 + fi,
                1.0,
            ),
            ArcKind::Dotted => draw::dotted_arc(
                &mut rings,
                ring_cx,
                ring_cy,
                *radius,
                color,
                *start,
                *end,
                12.0 + fi * 2.0,
                1.2 + fi * 0.1,
            ),
        }
    }
    canvas.composite_over(&rings)?;

    // crosshair marks: one at the (mostly off-screen) center, the rest
    // where inner rings face into the canvas
    let mut marks = Layer::transparent(w, h);
    draw::crosshair(&mut marks, ring_cx, ring_cy, 30.0, 2.0, accent.with_alpha(120));
    for radius in [130.0, 210.0] {
        let mx = ring_cx - radius;
        if (0.0..=wf).contains(&mx) {
            draw::crosshair(&mut marks, mx, ring_cy, 10.0, 1.0, accent.with_alpha(70));
        }
    }
    for angle_deg in [145.0f64, 235.0] {
        let mx = ring_cx + 300.0 * angle_deg.to_radians().cos();
        let my = ring_cy + 300.0 * angle_deg.to_radians().sin();
        if (0.0..=wf).contains(&mx) && (0.0..=hf).contains(&my) {
            draw::crosshair(&mut marks, mx, my, 8.0, 1.0, white.with_alpha(40));
        }
    }
    canvas.composite_over(&marks)?;

    // data blips on the rings, plus ambient noise in the radar zone
    let mut blips = Layer::transparent(w, h);
    let ring_radii = [130.0, 210.0, 300.0, 400.0, 510.0, 640.0, 780.0];
    let blip_configs: [(usize, f64, f64, bool); 17] = [
        (1, 160.0, 4.0, true),
        (1, 220.0, 3.0, false),
        (2, 135.0, 5.0, true),
        (2, 180.0, 3.0, false),
        (2, 250.0, 4.0, true),
        (3, 150.0, 3.0, false),
        (3, 200.0, 5.0, true),
        (4, 145.0, 4.0, true),
        (4, 195.0, 3.0, false),
        (4, 270.0, 4.0, false),
        (5, 125.0, 4.0, true),
        (5, 175.0, 3.0, false),
        (5, 220.0, 4.0, true),
        (5, 290.0, 3.0, false),
        (6, 140.0, 3.0, true),
        (6, 190.0, 4.0, true),
        (6, 260.0, 3.0, false),
    ];
    for (ring_idx, angle_deg, size, glow) in blip_configs {
        let radius = ring_radii[ring_idx];
        let bx = ring_cx + radius * angle_deg.to_radians().cos();
        let by = ring_cy + radius * angle_deg.to_radians().sin();
        if (-10.0..=wf + 10.0).contains(&bx) && (-10.0..=hf + 10.0).contains(&by) {
            let alpha = (220.0 - ring_idx as f64 * 25.0).max(60.0) as u8;
            draw::blip(&mut blips, bx, by, size, accent.with_alpha(alpha), glow);
        }
    }
    for _ in 0..25 {
        let dx = rng.range_f64(wf * 0.4, wf);
        let dy = rng.range_f64(0.0, hf);
        let alpha = rng.range_alpha(12, 45);
        let size = rng.range_f64(0.5, 1.5);
        draw::fill_circle(&mut blips, dx, dy, size, accent.with_alpha(alpha));
    }
    canvas.composite_over(&blips)?;

    // rotated geometric rectangles overlapping the rings
    let rects = [
        // center, size, angle, fill, outline
        (Point::new(960.0, 300.0), (480.0, 700.0), 12.0, Some(accent.with_alpha(35)), Some((accent.with_alpha(90), 5.0))),
        (Point::new(800.0, 160.0), (300.0, 210.0), -8.0, None, Some((white.with_alpha(65), 4.0))),
        (Point::new(140.0, 500.0), (90.0, 90.0), 18.0, Some(accent.with_alpha(45)), Some((white.with_alpha(30), 2.0))),
        (Point::new(1100.0, 480.0), (50.0, 260.0), -14.0, Some(white.with_alpha(15)), Some((white.with_alpha(40), 3.0))),
    ];
    for (center, (rw, rh), angle, fill, outline) in rects {
        let layer = draw::rotated_rect(w, h, center, rw, rh, angle, fill, outline);
        canvas.composite_over(&layer)?;
    }

    // blips along the rectangle edges for the hacked feel
    let mut geo_blips = Layer::transparent(w, h);
    let geo_positions: [(f64, f64, f64, bool); 8] = [
        (870.0, 110.0, 3.0, true),
        (920.0, 230.0, 4.0, false),
        (1040.0, 180.0, 3.0, true),
        (750.0, 90.0, 3.0, false),
        (155.0, 460.0, 3.0, true),
        (120.0, 530.0, 4.0, false),
        (1080.0, 420.0, 3.0, true),
        (1120.0, 530.0, 3.0, false),
    ];
    for (gx, gy, gs, gg) in geo_positions {
        draw::blip(&mut geo_blips, gx, gy, gs, accent.with_alpha(140), gg);
    }
    canvas.composite_over(&geo_blips)?;

    // diagonal slashes cutting through the rings
    let mut slashes = Layer::transparent(w, h);
    draw::line(&mut slashes, Point::new(0.0, 490.0), Point::new(wf, 370.0), 3.0, accent.with_alpha(25));
    draw::line(&mut slashes, Point::new(780.0, 0.0), Point::new(wf, hf), 2.0, white.with_alpha(14));
    draw::line(&mut slashes, Point::new(500.0, 0.0), Point::new(900.0, hf), 1.0, accent.with_alpha(12));
    canvas.composite_over(&slashes)?;

    // sweep beam with a gradient glow cone behind it
    let mut sweep = Layer::transparent(w, h);
    let sweep_angle = 160.0f64.to_radians();
    for offset in -3i32..=3 {
        let a = sweep_angle + (f64::from(offset) * 0.35).to_radians();
        let alpha = (35 - offset.abs() * 9).max(4) as u8;
        draw::line(
            &mut sweep,
            Point::new(ring_cx, ring_cy),
            Point::new(ring_cx + 900.0 * a.cos(), ring_cy + 900.0 * a.sin()),
            1.0,
            accent.with_alpha(alpha),
        );
    }
    let cone_spread = 18i32;
    for d in -cone_spread..=0 {
        let a = sweep_angle + f64::from(d).to_radians();
        let alpha = (10.0 * (1.0 - f64::from(d.abs()) / f64::from(cone_spread))).max(1.0) as u8;
        draw::line(
            &mut sweep,
            Point::new(ring_cx, ring_cy),
            Point::new(ring_cx + 900.0 * a.cos(), ring_cy + 900.0 * a.sin()),
            1.0,
            accent.with_alpha(alpha),
        );
    }
    canvas.composite_over(&sweep)?;

    // horizontal disruption bands plus faint scanline texture
    let mut bands = Layer::transparent(w, h);
    draw::fill_rect(&mut bands, 0.0, 418.0, wf, 422.0, accent.with_alpha(28));
    draw::fill_rect(&mut bands, 0.0, 426.0, wf, 428.0, white.with_alpha(14));
    let mut y = 0.0;
    while y < hf {
        draw::fill_rect(&mut bands, 0.0, y, wf, y + 1.0, Rgba::BLACK.with_alpha(8));
        y += 5.0;
    }
    canvas.composite_over(&bands)?;

    // accent bar bleeding off the left edge
    let bar = draw::rotated_rect(
        w,
        h,
        Point::new(-15.0, 340.0),
        65.0,
        260.0,
        6.0,
        Some(accent.with_alpha(75)),
        None,
    );
    canvas.composite_over(&bar)?;

    bracket_tag(&mut canvas, theme, fonts, &spec.tag);
    title_block(&mut canvas, theme, fonts, &spec.title, 118.0, -2.0);

    // decorative squares cluster, top-right
    for (cx, cy, sz, ang, alpha) in [
        (1040.0, 50.0, 32.0, 24.0, 40u8),
        (1085.0, 78.0, 22.0, -14.0, 30),
        (1015.0, 95.0, 16.0, 40.0, 24),
        (1065.0, 115.0, 10.0, -6.0, 18),
    ] {
        let sq = draw::rotated_rect(
            w,
            h,
            Point::new(cx, cy),
            sz,
            sz,
            ang,
            Some(accent.with_alpha(alpha)),
            None,
        );
        canvas.composite_over(&sq)?;
    }

    corner_brackets(&mut canvas, theme, accent.with_alpha(130));
    brand_footer(&mut canvas, theme, fonts);

    // thin accent line along the bottom edge
    draw::fill_rect(&mut canvas, 0.0, hf - 3.0, wf, hf, accent.with_alpha(50));

    Ok(canvas)
}
