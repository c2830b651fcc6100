use crate::foundation::error::{CardError, CardResult};

/// Separable Gaussian blur of a single 8-bit coverage plane.
///
/// Edges clamp. The kernel is quantized to Q16 and renormalized so a constant plane stays
/// constant.
pub fn blur_plane_u8(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> CardResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| CardError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(CardError::validation(
            "blur_plane_u8 expects src matching width*height",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    let (w, h) = (width as usize, height as usize);
    convolve(src, &mut tmp, w, h, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, w, h, &kernel, Axis::Vertical);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CardResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CardError::validation("blur sigma must be > 0"));
    }

    let r = radius as i64;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Push the rounding residue into the center tap.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;
    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as isize - radius;
                let idx = match axis {
                    Axis::Horizontal => {
                        y * w + (x as isize + d).clamp(0, w as isize - 1) as usize
                    }
                    Axis::Vertical => {
                        (y as isize + d).clamp(0, h as isize - 1) as usize * w + x
                    }
                };
                acc += u64::from(kw) * u64::from(src[idx]);
            }
            dst[y * w + x] = ((acc + 32768) >> 16).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
