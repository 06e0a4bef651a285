use crate::{
    foundation::error::{GlowdriftError, GlowdriftResult},
    render::compose::FrameRgba,
};

/// How the blur kernel samples past the frame edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EdgeMode {
    /// Repeat edge pixels (clamp-to-edge).
    Clamp,
    /// Wrap around to the opposite edge.
    Repeat,
}

/// Blur the frame in place with a separable gaussian.
///
/// Stateless and idempotent from the caller's perspective: one call per
/// composed frame, no persisted effect state beyond the radii passed in.
/// Sigma defaults to half the radius on each axis. A zero radius skips that
/// axis; both zero is the identity.
pub fn apply_blur(
    frame: &mut FrameRgba,
    radius_x: u32,
    radius_y: u32,
    mode: EdgeMode,
) -> GlowdriftResult<()> {
    let expected = (frame.width as usize)
        .checked_mul(frame.height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| GlowdriftError::render("blur buffer size overflow"))?;
    if frame.data.len() != expected {
        return Err(GlowdriftError::render(
            "apply_blur expects data matching width*height*4",
        ));
    }
    if radius_x == 0 && radius_y == 0 {
        return Ok(());
    }

    let mut scratch = vec![0u8; expected];
    if radius_x > 0 {
        let kernel = gaussian_kernel_q16(radius_x, radius_x as f32 / 2.0)?;
        horizontal_pass(
            &frame.data,
            &mut scratch,
            frame.width,
            frame.height,
            &kernel,
            mode,
        );
        frame.data.copy_from_slice(&scratch);
    }
    if radius_y > 0 {
        let kernel = gaussian_kernel_q16(radius_y, radius_y as f32 / 2.0)?;
        vertical_pass(
            &frame.data,
            &mut scratch,
            frame.width,
            frame.height,
            &kernel,
            mode,
        );
        frame.data.copy_from_slice(&scratch);
    }
    Ok(())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> GlowdriftResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(GlowdriftError::render("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(GlowdriftError::render("gaussian kernel sum is zero"));
    }

    // Q16 fixed point, renormalized so the weights sum exactly to one.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        weights[mid] = (mid_val + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn resolve_index(v: i32, len: i32, mode: EdgeMode) -> i32 {
    match mode {
        EdgeMode::Clamp => v.clamp(0, len - 1),
        EdgeMode::Repeat => v.rem_euclid(len),
    }
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], mode: EdgeMode) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = resolve_index(x + dx, w, mode);
                let idx = ((y * w + sx) as usize) * 4;
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

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], mode: EdgeMode) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = resolve_index(y + dy, h, mode);
                let idx = ((sy * w + x) as usize) * 4;
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
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Bounds;

    fn frame_from(bytes: Vec<u8>, w: u32, h: u32) -> FrameRgba {
        FrameRgba {
            width: w,
            height: h,
            data: bytes,
            premultiplied: true,
        }
    }

    #[test]
    fn zero_radius_is_identity() {
        let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut f = frame_from(src.clone(), 1, 2);
        apply_blur(&mut f, 0, 0, EdgeMode::Repeat).unwrap();
        assert_eq!(f.data, src);
    }

    #[test]
    fn constant_image_is_unchanged() {
        let px = [10u8, 20, 30, 40];
        let (w, h) = (4u32, 3u32);
        let src = px.repeat((w * h) as usize);
        let mut f = frame_from(src.clone(), w, h);
        apply_blur(&mut f, 3, 3, EdgeMode::Clamp).unwrap();
        assert_eq!(f.data, src);
        let mut f = frame_from(src.clone(), w, h);
        apply_blur(&mut f, 3, 3, EdgeMode::Repeat).unwrap();
        assert_eq!(f.data, src);
    }

    #[test]
    fn impulse_energy_is_conserved() {
        let (w, h) = (5u32, 5u32);
        let mut data = vec![0u8; (w * h * 4) as usize];
        let center = ((2 * w + 2) * 4) as usize;
        data[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
        let mut f = frame_from(data, w, h);
        apply_blur(&mut f, 2, 2, EdgeMode::Repeat).unwrap();

        let nonzero = f.data.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);
        let sum_a: u32 = f.data.chunks_exact(4).map(|px| u32::from(px[3])).sum();
        assert!((sum_a as i32 - 255).abs() <= 4);
    }

    #[test]
    fn repeat_mode_wraps_an_edge_impulse_to_the_far_side() {
        let (w, h) = (8u32, 1u32);
        let mut data = vec![0u8; (w * h * 4) as usize];
        data[0..4].copy_from_slice(&[255, 255, 255, 255]);
        let mut wrapped = frame_from(data.clone(), w, h);
        apply_blur(&mut wrapped, 2, 0, EdgeMode::Repeat).unwrap();
        let mut clamped = frame_from(data, w, h);
        apply_blur(&mut clamped, 2, 0, EdgeMode::Clamp).unwrap();

        let last_alpha = |f: &FrameRgba| f.data[((w - 1) * 4 + 3) as usize];
        assert!(last_alpha(&wrapped) > 0);
        assert_eq!(last_alpha(&clamped), 0);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let mut f = FrameRgba::transparent(Bounds::new(4, 4).unwrap()).unwrap();
        f.data.pop();
        assert!(apply_blur(&mut f, 1, 1, EdgeMode::Repeat).is_err());
    }
}
