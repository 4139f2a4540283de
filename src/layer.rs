//! Transient RGBA8 raster buffers and painter's-algorithm compositing.
//!
//! A [`Layer`] holds the pixels of one visual element (or the canvas
//! itself). Layers are composited in declared order with standard
//! alpha-over blending and never read back afterwards. All blending is
//! integer math so repeated renders are bit-exact.

use kurbo::{Affine, Point};

use crate::color::Rgba;
use crate::error::{ThumbsmithError, ThumbsmithResult};

#[derive(Clone, Debug)]
pub struct Layer {
    pub width: u32,
    pub height: u32,
    /// Straight-alpha RGBA8, row-major, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

/// Straight-alpha "over": `src` composited onto `dst`.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    let da_scaled = (da * inv + 127) / 255;
    let out_a = sa + da_scaled;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa + u32::from(dst[i]) * da_scaled;
        out[i] = ((num + out_a / 2) / out_a) as u8;
    }
    out[3] = out_a as u8;
    out
}

impl Layer {
    /// Fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Buffer filled with one color (the canvas starts this way, opaque).
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let px = [color.r, color.g, color.b, color.a];
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = self.idx(x, y);
        Rgba::rgba(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }

    /// Overwrite one pixel, ignoring out-of-bounds coordinates.
    pub fn put(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Alpha-over blend one pixel, ignoring out-of-bounds coordinates.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        let dst = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
        let out = over(dst, [color.r, color.g, color.b, color.a]);
        self.data[i..i + 4].copy_from_slice(&out);
    }

    /// Composite `src` over `self` at matching dimensions.
    pub fn composite_over(&mut self, src: &Layer) -> ThumbsmithResult<()> {
        if self.width != src.width || self.height != src.height {
            return Err(ThumbsmithError::render(
                "composite_over expects equal-size layers",
            ));
        }
        for (d, s) in self.data.chunks_exact_mut(4).zip(src.data.chunks_exact(4)) {
            if s[3] == 0 {
                continue;
            }
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
        Ok(())
    }

    /// Alpha-over paste of `src` with its top-left corner at `(x, y)`,
    /// clipped to this layer's bounds.
    pub fn paste(&mut self, src: &Layer, x: i64, y: i64) {
        for sy in 0..src.height {
            let dy = y + i64::from(sy);
            if dy < 0 || dy >= i64::from(self.height) {
                continue;
            }
            for sx in 0..src.width {
                let dx = x + i64::from(sx);
                if dx < 0 || dx >= i64::from(self.width) {
                    continue;
                }
                let si = src.idx(sx, sy);
                if src.data[si + 3] == 0 {
                    continue;
                }
                let di = self.idx(dx as u32, dy as u32);
                let out = over(
                    [
                        self.data[di],
                        self.data[di + 1],
                        self.data[di + 2],
                        self.data[di + 3],
                    ],
                    [
                        src.data[si],
                        src.data[si + 1],
                        src.data[si + 2],
                        src.data[si + 3],
                    ],
                );
                self.data[di..di + 4].copy_from_slice(&out);
            }
        }
    }

    /// Rotate counter-clockwise about the buffer center, same output size.
    ///
    /// Inverse-mapped bilinear resampling; taps are interpolated in
    /// premultiplied space and converted back, and anything sampled from
    /// outside the source is transparent. Elements that must keep their
    /// corners are rendered onto a diagonal-sized working square first
    /// (see [`rotated_working_square`]).
    pub fn rotated(&self, angle_deg: f64) -> Layer {
        let mut out = Layer::transparent(self.width, self.height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        let cx = f64::from(self.width) / 2.0;
        let cy = f64::from(self.height) / 2.0;
        let inverse = Affine::translate((cx, cy))
            * Affine::rotate(angle_deg.to_radians())
            * Affine::translate((-cx, -cy));

        for y in 0..self.height {
            for x in 0..self.width {
                let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let px = self.sample_bilinear(p.x - 0.5, p.y - 0.5);
                if px[3] == 0 {
                    continue;
                }
                let i = out.idx(x, y);
                out.data[i..i + 4].copy_from_slice(&px);
            }
        }
        out
    }

    fn sample_bilinear(&self, x: f64, y: f64) -> [u8; 4] {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let mut acc = [0.0f64; 4];
        for (dy, wy) in [(0i64, 1.0 - fy), (1, fy)] {
            for (dx, wx) in [(0i64, 1.0 - fx), (1, fx)] {
                let w = wx * wy;
                if w <= 0.0 {
                    continue;
                }
                let sx = x0 as i64 + dx;
                let sy = y0 as i64 + dy;
                if sx < 0 || sy < 0 || sx >= i64::from(self.width) || sy >= i64::from(self.height) {
                    continue;
                }
                let i = self.idx(sx as u32, sy as u32);
                let a = f64::from(self.data[i + 3]) / 255.0;
                // premultiplied taps
                acc[0] += w * f64::from(self.data[i]) * a;
                acc[1] += w * f64::from(self.data[i + 1]) * a;
                acc[2] += w * f64::from(self.data[i + 2]) * a;
                acc[3] += w * a * 255.0;
            }
        }

        let a = acc[3];
        if a < 0.5 {
            return [0, 0, 0, 0];
        }
        let unpremul = |c: f64| -> u8 { ((c * 255.0 / a).round()).clamp(0.0, 255.0) as u8 };
        [
            unpremul(acc[0]),
            unpremul(acc[1]),
            unpremul(acc[2]),
            a.round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Flatten onto an opaque background, dropping the alpha channel.
    pub fn to_rgb_image(&self, background: Rgba) -> image::RgbImage {
        let mut img = image::RgbImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.idx(x, y);
                let a = u32::from(self.data[i + 3]);
                let inv = 255 - a;
                let ch = |c: u8, bg: u8| -> u8 {
                    ((u32::from(c) * a + u32::from(bg) * inv + 127) / 255) as u8
                };
                img.put_pixel(
                    x,
                    y,
                    image::Rgb([
                        ch(self.data[i], background.r),
                        ch(self.data[i + 1], background.g),
                        ch(self.data[i + 2], background.b),
                    ]),
                );
            }
        }
        img
    }
}

/// Working square sized to the diagonal of a `width * height` element, so
/// a subsequent in-place rotation cannot clip its corners. Returns the
/// square plus the offset of the element's top-left corner inside it.
pub fn rotated_working_square(width: u32, height: u32, margin: u32) -> (Layer, i64, i64) {
    let diag = f64::from(width).hypot(f64::from(height)).ceil() as u32 + margin * 2 + 4;
    let off_x = i64::from((diag - width) / 2);
    let off_y = i64::from((diag - height) / 2);
    (Layer::transparent(diag, diag), off_x, off_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_transparent_is_noop() {
        let dst = [10, 20, 30, 40];
        assert_eq!(over(dst, [255, 255, 255, 0]), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let src = [255, 0, 0, 255];
        assert_eq!(over([0, 0, 0, 255], src), src);
    }

    #[test]
    fn over_on_opaque_dst_matches_simple_formula() {
        // dst opaque: out = src*sa + dst*(1-sa)
        let got = over([0, 0, 0, 255], [200, 100, 50, 128]);
        assert_eq!(got[3], 255);
        assert!((i32::from(got[0]) - 100).abs() <= 1);
        assert!((i32::from(got[1]) - 50).abs() <= 1);
        assert!((i32::from(got[2]) - 25).abs() <= 1);
    }

    #[test]
    fn composite_over_rejects_size_mismatch() {
        let mut a = Layer::transparent(4, 4);
        let b = Layer::transparent(4, 5);
        assert!(a.composite_over(&b).is_err());
    }

    #[test]
    fn paste_clips_at_edges() {
        let mut dst = Layer::filled(4, 4, Rgba::BLACK);
        let src = Layer::filled(4, 4, Rgba::WHITE);
        dst.paste(&src, 2, 2);
        assert_eq!(dst.pixel(3, 3), Rgba::WHITE);
        assert_eq!(dst.pixel(1, 1), Rgba::BLACK);
    }

    #[test]
    fn rotation_by_zero_keeps_opaque_interior() {
        let mut src = Layer::transparent(9, 9);
        for y in 2..7 {
            for x in 2..7 {
                src.put(x, y, Rgba::rgb(200, 10, 10));
            }
        }
        let out = src.rotated(0.0);
        assert_eq!(out.pixel(4, 4), Rgba::rgb(200, 10, 10));
        assert_eq!(out.pixel(0, 0).a, 0);
    }

    #[test]
    fn rotation_90_moves_asymmetric_mass() {
        let mut src = Layer::transparent(11, 11);
        src.put(9, 5, Rgba::WHITE);
        let out = src.rotated(90.0);
        // whatever the direction convention, the pixel must leave (9,5)
        assert_eq!(out.pixel(9, 5).a, 0);
        let moved = (0..11)
            .flat_map(|y| (0..11).map(move |x| (x, y)))
            .any(|(x, y)| out.pixel(x, y).a > 0);
        assert!(moved);
    }

    #[test]
    fn working_square_covers_diagonal() {
        let (sq, ox, oy) = rotated_working_square(100, 40, 2);
        assert!(sq.width >= 108);
        assert_eq!(sq.width, sq.height);
        assert!(ox > 0 && oy > 0);
    }

    #[test]
    fn flatten_blends_semi_transparent_over_background() {
        let mut l = Layer::transparent(1, 1);
        l.put(0, 0, Rgba::rgba(255, 255, 255, 128));
        let img = l.to_rgb_image(Rgba::BLACK);
        let p = img.get_pixel(0, 0);
        assert!((i32::from(p[0]) - 128).abs() <= 1);
    }
}
