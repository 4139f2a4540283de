//! Separable Gaussian blur and the bloom/glow helper built on it.
//!
//! The kernel is quantized to Q16 fixed point and renormalized so the taps
//! sum to exactly 65536; combined with clamp-to-edge sampling this keeps
//! the filter fully integer and bit-reproducible across runs. Layers are
//! straight-alpha, so the filter premultiplies on the way in and divides
//! alpha back out on the way out.

use crate::error::{ThumbsmithError, ThumbsmithResult};
use crate::layer::Layer;

/// Gaussian-blur a layer. `radius == 0` returns a plain copy.
pub fn blur_layer(src: &Layer, radius: u32, sigma: f64) -> ThumbsmithResult<Layer> {
    if radius == 0 {
        return Ok(src.clone());
    }
    let kernel = gaussian_kernel_q16(radius, sigma)?;

    let mut premul = premultiply(&src.data);
    let mut tmp = vec![0u8; premul.len()];
    // horizontal, then vertical
    convolve_axis(&premul, &mut tmp, src.width, src.height, &kernel, Axis::X);
    convolve_axis(&tmp, &mut premul, src.width, src.height, &kernel, Axis::Y);

    Ok(Layer {
        width: src.width,
        height: src.height,
        data: unpremultiply(&premul),
    })
}

/// Bloom: blurred copies of `sharp` composited beneath the sharp original.
/// Extra passes restack the blurred copy for more intensity.
pub fn glow(sharp: &Layer, radius: u32, sigma: f64, passes: u32) -> ThumbsmithResult<Layer> {
    let mut out = Layer::transparent(sharp.width, sharp.height);
    if passes > 0 && radius > 0 {
        let soft = blur_layer(sharp, radius, sigma)?;
        for _ in 0..passes {
            out.composite_over(&soft)?;
        }
    }
    out.composite_over(sharp)?;
    Ok(out)
}

enum Axis {
    X,
    Y,
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> ThumbsmithResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ThumbsmithError::render("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r).map(|i| (-(f64::from(i).powi(2)) / denom).exp()).collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ThumbsmithError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|&w| (((w / sum) * 65536.0).round() as i64).clamp(0, 65536) as u32)
        .collect();

    // push quantization error into the center tap so the sum is exact
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn convolve_axis(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as i64 - radius;
                let (sx, sy) = match axis {
                    Axis::X => ((x + d).clamp(0, w - 1), y),
                    Axis::Y => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    (((acc + 32768) >> 16).min(255)) as u8
}

fn premultiply(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks_exact(4) {
        let a = u32::from(px[3]);
        for c in 0..3 {
            out.push(((u32::from(px[c]) * a + 127) / 255) as u8);
        }
        out.push(px[3]);
    }
    out
}

fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks_exact(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            out.push(((u32::from(px[c]) * 255 + a / 2) / a).min(255) as u8);
        }
        out.push(px[3]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn radius_0_is_identity() {
        let mut l = Layer::transparent(3, 2);
        l.put(1, 1, Rgba::rgb(9, 8, 7));
        let out = blur_layer(&l, 0, 1.0).unwrap();
        assert_eq!(out.data, l.data);
    }

    #[test]
    fn constant_opaque_layer_is_identity() {
        let l = Layer::filled(5, 4, Rgba::rgb(10, 20, 30));
        let out = blur_layer(&l, 3, 2.0).unwrap();
        assert_eq!(out.data, l.data);
    }

    #[test]
    fn blur_spreads_energy_from_single_pixel() {
        let mut l = Layer::transparent(7, 7);
        l.put(3, 3, Rgba::WHITE);
        let out = blur_layer(&l, 2, 1.2).unwrap();

        let nonzero = out.data.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);

        // alpha energy is conserved within rounding
        let sum_a: u32 = out.data.chunks_exact(4).map(|px| u32::from(px[3])).sum();
        assert!((sum_a as i32 - 255).abs() <= 4);
    }

    #[test]
    fn invalid_sigma_is_an_error() {
        let l = Layer::transparent(2, 2);
        assert!(blur_layer(&l, 2, 0.0).is_err());
        assert!(blur_layer(&l, 2, f64::NAN).is_err());
    }

    #[test]
    fn glow_keeps_sharp_center_and_adds_halo() {
        let mut sharp = Layer::transparent(11, 11);
        sharp.put(5, 5, Rgba::rgb(229, 255, 0));
        let out = glow(&sharp, 3, 1.5, 1).unwrap();
        // center stays fully lit, neighbors pick up halo alpha
        assert_eq!(out.pixel(5, 5).a, 255);
        assert!(out.pixel(7, 5).a > 0);
    }
}
