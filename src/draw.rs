//! Shape rasterization primitives shared by every thumbnail style.
//!
//! Everything draws with alpha-over blending onto a [`Layer`] and uses
//! analytic coverage at edges for antialiasing. Degenerate geometry
//! (zero radius, zero width, empty rects) is skipped rather than treated
//! as an error: decorative elements are non-essential to a render.

use kurbo::Point;

use crate::color::Rgba;
use crate::layer::{Layer, rotated_working_square};

#[inline]
fn coverage_alpha(color: Rgba, coverage: f64) -> Rgba {
    color.fade(coverage)
}

/// Clipped pixel bounding box helper: returns `(x0, y0, x1, y1)` inclusive.
fn clip_box(layer: &Layer, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> (i64, i64, i64, i64) {
    let x0 = (min_x.floor() as i64).max(0);
    let y0 = (min_y.floor() as i64).max(0);
    let x1 = (max_x.ceil() as i64).min(i64::from(layer.width) - 1);
    let y1 = (max_y.ceil() as i64).min(i64::from(layer.height) - 1);
    (x0, y0, x1, y1)
}

pub fn fill_circle(layer: &mut Layer, cx: f64, cy: f64, radius: f64, color: Rgba) {
    if radius <= 0.0 || color.a == 0 {
        return;
    }
    let (x0, y0, x1, y1) = clip_box(layer, cx - radius - 1.0, cy - radius - 1.0, cx + radius + 1.0, cy + radius + 1.0);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = (f64::from(x as i32) + 0.5 - cx).hypot(f64::from(y as i32) + 0.5 - cy);
            let cov = (radius - d + 0.5).clamp(0.0, 1.0);
            if cov > 0.0 {
                layer.blend(x, y, coverage_alpha(color, cov));
            }
        }
    }
}

/// True when `angle` (degrees, any sign) lies on the arc from `start`
/// sweeping forward to `end`.
fn angle_on_arc(angle: f64, start: f64, end: f64) -> bool {
    let span = end - start;
    if span >= 360.0 {
        return true;
    }
    (angle - start).rem_euclid(360.0) <= span
}

/// Stroke a (partial) circular arc of the given line width.
pub fn stroke_arc(
    layer: &mut Layer,
    cx: f64,
    cy: f64,
    radius: f64,
    width: f64,
    color: Rgba,
    start_deg: f64,
    end_deg: f64,
) {
    if radius <= 0.0 || width <= 0.0 || end_deg <= start_deg || color.a == 0 {
        return;
    }
    let reach = radius + width / 2.0 + 1.0;
    let (x0, y0, x1, y1) = clip_box(layer, cx - reach, cy - reach, cx + reach, cy + reach);
    let half = width / 2.0;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = f64::from(x as i32) + 0.5 - cx;
            let dy = f64::from(y as i32) + 0.5 - cy;
            let d = (dx.hypot(dy) - radius).abs();
            let cov = (half + 0.5 - d).clamp(0.0, 1.0);
            if cov <= 0.0 {
                continue;
            }
            let ang = dy.atan2(dx).to_degrees();
            if angle_on_arc(ang, start_deg, end_deg) {
                layer.blend(x, y, coverage_alpha(color, cov));
            }
        }
    }
}

pub fn stroke_circle(layer: &mut Layer, cx: f64, cy: f64, radius: f64, width: f64, color: Rgba) {
    stroke_arc(layer, cx, cy, radius, width, color, 0.0, 360.0);
}

/// Dashed arc: alternating drawn/blank segments measured along the
/// circumference, like a radar ring.
#[allow(clippy::too_many_arguments)]
pub fn dashed_arc(
    layer: &mut Layer,
    cx: f64,
    cy: f64,
    radius: f64,
    color: Rgba,
    start_deg: f64,
    end_deg: f64,
    dash_len: f64,
    gap_len: f64,
    width: f64,
) {
    if radius <= 0.0 || dash_len <= 0.0 {
        return;
    }
    let circumference = 2.0 * std::f64::consts::PI * radius;
    let dash_angle = (dash_len / circumference) * 360.0;
    let gap_angle = (gap_len.max(0.0) / circumference) * 360.0;
    let step = dash_angle + gap_angle;
    if step <= 0.0 {
        return;
    }

    let mut angle = start_deg;
    while angle < end_deg {
        let seg_end = (angle + dash_angle).min(end_deg);
        stroke_arc(layer, cx, cy, radius, width, color, angle, seg_end);
        angle += step;
    }
}

/// Dotted arc: small filled circles spaced along the arc.
#[allow(clippy::too_many_arguments)]
pub fn dotted_arc(
    layer: &mut Layer,
    cx: f64,
    cy: f64,
    radius: f64,
    color: Rgba,
    start_deg: f64,
    end_deg: f64,
    dot_spacing: f64,
    dot_radius: f64,
) {
    if radius <= 0.0 || dot_radius <= 0.0 || end_deg <= start_deg {
        return;
    }
    let arc_deg = end_deg - start_deg;
    let arc_px = (arc_deg / 360.0) * 2.0 * std::f64::consts::PI * radius;
    if arc_px <= 0.0 || dot_spacing <= 0.0 {
        return;
    }
    let dots = ((arc_px / dot_spacing) as usize).max(1);
    for i in 0..dots {
        let frac = if dots > 1 { i as f64 / (dots - 1) as f64 } else { 0.0 };
        let ang = (start_deg + frac * arc_deg).to_radians();
        fill_circle(
            layer,
            cx + radius * ang.cos(),
            cy + radius * ang.sin(),
            dot_radius,
            color,
        );
    }
}

/// Thick line with round caps (capsule distance field).
pub fn line(layer: &mut Layer, p0: Point, p1: Point, width: f64, color: Rgba) {
    if width <= 0.0 || color.a == 0 {
        return;
    }
    let half = width / 2.0;
    let (x0, y0, x1, y1) = clip_box(
        layer,
        p0.x.min(p1.x) - half - 1.0,
        p0.y.min(p1.y) - half - 1.0,
        p0.x.max(p1.x) + half + 1.0,
        p0.y.max(p1.y) + half + 1.0,
    );
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let len2 = dx * dx + dy * dy;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let px = f64::from(x as i32) + 0.5;
            let py = f64::from(y as i32) + 0.5;
            let t = if len2 > 0.0 {
                (((px - p0.x) * dx + (py - p0.y) * dy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let qx = p0.x + t * dx;
            let qy = p0.y + t * dy;
            let d = (px - qx).hypot(py - qy);
            let cov = (half + 0.5 - d).clamp(0.0, 1.0);
            if cov > 0.0 {
                layer.blend(x, y, coverage_alpha(color, cov));
            }
        }
    }
}

/// Axis-aligned filled rectangle, `[x0, x1) x [y0, y1)` in pixels.
pub fn fill_rect(layer: &mut Layer, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba) {
    if x1 <= x0 || y1 <= y0 || color.a == 0 {
        return;
    }
    let (bx0, by0, bx1, by1) = clip_box(layer, x0, y0, x1 - 1.0, y1 - 1.0);
    for y in by0..=by1 {
        for x in bx0..=bx1 {
            layer.blend(x, y, color);
        }
    }
}

pub fn stroke_rect(layer: &mut Layer, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: Rgba) {
    if x1 <= x0 || y1 <= y0 || width <= 0.0 {
        return;
    }
    let w = width;
    fill_rect(layer, x0, y0, x1, y0 + w, color);
    fill_rect(layer, x0, y1 - w, x1, y1, color);
    fill_rect(layer, x0, y0 + w, x0 + w, y1 - w, color);
    fill_rect(layer, x1 - w, y0 + w, x1, y1 - w, color);
}

/// Filled rounded rectangle (tag pills, badges).
pub fn fill_rounded_rect(
    layer: &mut Layer,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    corner: f64,
    color: Rgba,
) {
    if x1 <= x0 || y1 <= y0 || color.a == 0 {
        return;
    }
    let corner = corner.clamp(0.0, ((x1 - x0).min(y1 - y0)) / 2.0);
    let (bx0, by0, bx1, by1) = clip_box(layer, x0, y0, x1, y1);
    for y in by0..=by1 {
        for x in bx0..=bx1 {
            let px = f64::from(x as i32) + 0.5;
            let py = f64::from(y as i32) + 0.5;
            // signed distance to the rounded-rect boundary
            let qx = (px - (x0 + corner)).min(0.0) + (px - (x1 - corner)).max(0.0);
            let qy = (py - (y0 + corner)).min(0.0) + (py - (y1 - corner)).max(0.0);
            let d = qx.hypot(qy) - corner;
            let cov = (0.5 - d).clamp(0.0, 1.0);
            if cov > 0.0 {
                layer.blend(x, y, coverage_alpha(color, cov));
            }
        }
    }
}

/// Crosshair/target mark: four gapped arms plus a center dot.
pub fn crosshair(layer: &mut Layer, cx: f64, cy: f64, size: f64, width: f64, color: Rgba) {
    if size <= 0.0 {
        return;
    }
    let gap = 6.0_f64.min(size / 2.0);
    line(layer, Point::new(cx - size, cy), Point::new(cx - gap, cy), width, color);
    line(layer, Point::new(cx + gap, cy), Point::new(cx + size, cy), width, color);
    line(layer, Point::new(cx, cy - size), Point::new(cx, cy - gap), width, color);
    line(layer, Point::new(cx, cy + gap), Point::new(cx, cy + size), width, color);
    fill_circle(layer, cx, cy, 2.0, color);
}

/// Data blip: a bright dot, optionally sitting in a soft glow disc.
pub fn blip(layer: &mut Layer, x: f64, y: f64, size: f64, color: Rgba, with_glow: bool) {
    if size <= 0.0 {
        return;
    }
    if with_glow {
        fill_circle(layer, x, y, size * 3.0, color.with_alpha(40));
    }
    fill_circle(layer, x, y, size, color);
}

/// Soft radial glow disc: alpha peaks at the center and falls off
/// quadratically to zero at `radius`.
pub fn radial_glow(layer: &mut Layer, cx: f64, cy: f64, radius: f64, color: Rgba, peak_alpha: u8) {
    if radius <= 0.0 || peak_alpha == 0 {
        return;
    }
    let (x0, y0, x1, y1) = clip_box(layer, cx - radius, cy - radius, cx + radius, cy + radius);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = (f64::from(x as i32) + 0.5 - cx).hypot(f64::from(y as i32) + 0.5 - cy);
            if d >= radius {
                continue;
            }
            let t = 1.0 - d / radius;
            let a = (f64::from(peak_alpha) * t * t).round() as u8;
            if a > 0 {
                layer.blend(x, y, color.with_alpha(a));
            }
        }
    }
}

/// Vertical two-stop background gradient covering the whole layer.
pub fn linear_gradient_v(layer: &mut Layer, top: Rgba, bottom: Rgba) {
    let h = layer.height;
    for y in 0..h {
        let t = if h > 1 { f64::from(y) / f64::from(h - 1) } else { 0.0 };
        let c = Rgba::lerp(top, bottom, t);
        for x in 0..layer.width {
            layer.put(i64::from(x), i64::from(y), c);
        }
    }
}

/// Directional legibility scrim: darkening ramp from `from_y` down to the
/// bottom edge, peaking at `peak_alpha`.
pub fn vignette_bottom(layer: &mut Layer, from_y: f64, color: Rgba, peak_alpha: u8) {
    let h = f64::from(layer.height);
    if from_y >= h - 1.0 || peak_alpha == 0 {
        return;
    }
    let span = h - 1.0 - from_y;
    for y in 0..layer.height {
        let fy = f64::from(y);
        if fy < from_y {
            continue;
        }
        let t = (fy - from_y) / span;
        let a = (f64::from(peak_alpha) * t * t).round() as u8;
        if a == 0 {
            continue;
        }
        for x in 0..layer.width {
            layer.blend(i64::from(x), i64::from(y), color.with_alpha(a));
        }
    }
}

/// Rectangle rotated about `center`, returned as a canvas-sized layer
/// ready to composite. Drawn axis-aligned on a diagonal-sized working
/// square first so rotation cannot clip the corners.
#[allow(clippy::too_many_arguments)]
pub fn rotated_rect(
    canvas_w: u32,
    canvas_h: u32,
    center: Point,
    width: f64,
    height: f64,
    angle_deg: f64,
    fill: Option<Rgba>,
    outline: Option<(Rgba, f64)>,
) -> Layer {
    let mut result = Layer::transparent(canvas_w, canvas_h);
    if width <= 0.0 || height <= 0.0 {
        return result;
    }
    let ow = outline.map(|(_, w)| w).unwrap_or(0.0);
    let (mut square, off_x, off_y) = rotated_working_square(width as u32, height as u32, ow as u32);
    let (x0, y0) = (off_x as f64, off_y as f64);
    if let Some(c) = fill {
        fill_rect(&mut square, x0, y0, x0 + width, y0 + height, c);
    }
    if let Some((c, w)) = outline {
        stroke_rect(&mut square, x0, y0, x0 + width, y0 + height, w, c);
    }
    let rotated = square.rotated(angle_deg);
    result.paste(
        &rotated,
        (center.x as i64) - i64::from(rotated.width) / 2,
        (center.y as i64) - i64::from(rotated.height) / 2,
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_shapes_are_skipped() {
        let mut l = Layer::transparent(16, 16);
        let before = l.data.clone();
        fill_circle(&mut l, 8.0, 8.0, 0.0, Rgba::WHITE);
        stroke_arc(&mut l, 8.0, 8.0, -3.0, 1.0, Rgba::WHITE, 0.0, 360.0);
        line(&mut l, Point::new(0.0, 0.0), Point::new(9.0, 9.0), 0.0, Rgba::WHITE);
        fill_rect(&mut l, 5.0, 5.0, 5.0, 9.0, Rgba::WHITE);
        dotted_arc(&mut l, 8.0, 8.0, 4.0, Rgba::WHITE, 0.0, 360.0, 0.0, 1.0);
        assert_eq!(l.data, before);
    }

    #[test]
    fn fill_circle_center_opaque_edge_soft() {
        let mut l = Layer::transparent(21, 21);
        fill_circle(&mut l, 10.5, 10.5, 6.0, Rgba::WHITE);
        assert_eq!(l.pixel(10, 10).a, 255);
        assert_eq!(l.pixel(0, 0).a, 0);
    }

    #[test]
    fn arc_respects_angle_range() {
        let mut l = Layer::transparent(41, 41);
        // 0..90 degrees covers the +x/+y quadrant only (y grows downward)
        stroke_arc(&mut l, 20.0, 20.0, 15.0, 2.0, Rgba::WHITE, 0.0, 90.0);
        assert!(l.pixel(35, 20).a > 0 || l.pixel(34, 21).a > 0);
        assert_eq!(l.pixel(5, 20).a, 0);
    }

    #[test]
    fn dashed_arc_leaves_gaps() {
        let mut l = Layer::transparent(81, 81);
        dashed_arc(&mut l, 40.0, 40.0, 30.0, Rgba::WHITE, 0.0, 360.0, 12.0, 8.0, 2.0);
        let lit = l.data.chunks_exact(4).filter(|p| p[3] > 0).count();
        let mut solid = Layer::transparent(81, 81);
        stroke_circle(&mut solid, 40.0, 40.0, 30.0, 2.0, Rgba::WHITE);
        let solid_lit = solid.data.chunks_exact(4).filter(|p| p[3] > 0).count();
        assert!(lit > 0 && lit < solid_lit);
    }

    #[test]
    fn thick_line_covers_midpoint() {
        let mut l = Layer::transparent(20, 20);
        line(&mut l, Point::new(2.0, 2.0), Point::new(17.0, 17.0), 3.0, Rgba::WHITE);
        assert!(l.pixel(10, 10).a > 0);
        assert_eq!(l.pixel(18, 2).a, 0);
    }

    #[test]
    fn rounded_rect_rounds_corners() {
        let mut l = Layer::transparent(40, 20);
        fill_rounded_rect(&mut l, 2.0, 2.0, 38.0, 18.0, 6.0, Rgba::WHITE);
        assert_eq!(l.pixel(20, 10).a, 255);
        // the sharp corner pixel is outside the rounded boundary
        assert_eq!(l.pixel(2, 2).a, 0);
    }

    #[test]
    fn vignette_darkens_bottom_only() {
        let mut l = Layer::filled(10, 100, Rgba::rgb(200, 200, 200));
        vignette_bottom(&mut l, 50.0, Rgba::BLACK, 200);
        assert_eq!(l.pixel(5, 10), Rgba::rgb(200, 200, 200));
        assert!(l.pixel(5, 99).r < 120);
    }

    #[test]
    fn rotated_rect_lands_at_center() {
        let out = rotated_rect(
            100,
            100,
            Point::new(50.0, 50.0),
            40.0,
            20.0,
            30.0,
            Some(Rgba::WHITE),
            None,
        );
        assert_eq!((out.width, out.height), (100, 100));
        assert!(out.pixel(50, 50).a > 0);
        assert_eq!(out.pixel(2, 2).a, 0);
    }

    #[test]
    fn radial_glow_peaks_at_center() {
        let mut l = Layer::transparent(41, 41);
        radial_glow(&mut l, 20.0, 20.0, 18.0, Rgba::rgb(229, 255, 0), 120);
        assert!(l.pixel(20, 20).a > l.pixel(20, 33).a);
        assert_eq!(l.pixel(0, 0).a, 0);
    }
}
