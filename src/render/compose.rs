use crate::{
    foundation::core::{Bounds, Pixmap},
    foundation::error::{GlowdriftError, GlowdriftResult},
    foundation::math::{add_sat_u8, mul_div255_u8},
};

/// A composed frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Allocate a transparent frame covering `bounds`.
    pub fn transparent(bounds: Bounds) -> GlowdriftResult<Self> {
        let len = (bounds.width as usize)
            .checked_mul(bounds.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| GlowdriftError::render("frame buffer size overflow"))?;
        Ok(Self {
            width: bounds.width,
            height: bounds.height,
            data: vec![0u8; len],
            premultiplied: true,
        })
    }

    /// Unpremultiply into straight RGBA8 bytes, for image export.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            if a == 0 || a == 255 {
                continue;
            }
            let a16 = u16::from(a);
            for c in px.iter_mut().take(3) {
                let v = (u16::from(*c) * 255 + a16 / 2) / a16;
                *c = v.min(255) as u8;
            }
        }
        out
    }
}

/// Source-over one cached unit raster onto the frame.
///
/// The raster is offset by the integer-rounded translation and scaled by the
/// unit's current opacity; rows falling outside the frame are clipped. Source
/// and destination are both premultiplied RGBA8.
pub(crate) fn blit_premul_over(
    frame: &mut FrameRgba,
    raster: &Pixmap,
    dx: i64,
    dy: i64,
    opacity: f64,
) -> GlowdriftResult<()> {
    let src = raster.data_as_u8_slice();
    let sw = i64::from(raster.width());
    let sh = i64::from(raster.height());
    if src.len() != (sw as usize) * (sh as usize) * 4 {
        return Err(GlowdriftError::render("raster byte length mismatch"));
    }

    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return Ok(());
    }

    let fw = i64::from(frame.width);
    let fh = i64::from(frame.height);
    let y0 = dy.max(0);
    let y1 = (dy + sh).min(fh);
    let x0 = dx.max(0);
    let x1 = (dx + sw).min(fw);
    if y0 >= y1 || x0 >= x1 {
        return Ok(());
    }

    for fy in y0..y1 {
        let sy = fy - dy;
        let src_row = ((sy * sw + (x0 - dx)) as usize) * 4;
        let dst_row = ((fy * fw + x0) as usize) * 4;
        let cols = (x1 - x0) as usize;
        let s_row = &src[src_row..src_row + cols * 4];
        let d_row = &mut frame.data[dst_row..dst_row + cols * 4];

        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let sa = mul_div255_u8(u16::from(s[3]), op);
            if sa == 0 {
                continue;
            }
            let inv = 255u16 - u16::from(sa);

            d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
            for c in 0..3 {
                let sc = mul_div255_u8(u16::from(s[c]), op);
                let dc = mul_div255_u8(u16::from(d[c]), inv);
                d[c] = add_sat_u8(sc, dc);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_pixmap(w: u16, h: u16, px: [u8; 4]) -> Pixmap {
        let pixels = (0..(w as usize * h as usize))
            .map(|_| vello_cpu::peniko::color::PremulRgba8::from_u8_array(px))
            .collect();
        Pixmap::from_parts_with_opacity(pixels, w, h, true)
    }

    fn frame_4x4() -> FrameRgba {
        FrameRgba::transparent(Bounds::new(4, 4).unwrap()).unwrap()
    }

    fn px(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * frame.width + x) * 4) as usize;
        frame.data[i..i + 4].try_into().unwrap()
    }

    #[test]
    fn full_opacity_blit_copies_source() {
        let mut f = frame_4x4();
        let src = solid_pixmap(2, 2, [100, 0, 0, 255]);
        blit_premul_over(&mut f, &src, 1, 1, 1.0).unwrap();
        assert_eq!(px(&f, 0, 0), [0, 0, 0, 0]);
        assert_eq!(px(&f, 1, 1), [100, 0, 0, 255]);
        assert_eq!(px(&f, 2, 2), [100, 0, 0, 255]);
        assert_eq!(px(&f, 3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn zero_opacity_leaves_destination_untouched() {
        let mut f = frame_4x4();
        let src = solid_pixmap(2, 2, [100, 0, 0, 255]);
        blit_premul_over(&mut f, &src, 0, 0, 0.0).unwrap();
        assert!(f.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn half_opacity_scales_premultiplied_channels() {
        let mut f = frame_4x4();
        let src = solid_pixmap(1, 1, [200, 100, 0, 255]);
        blit_premul_over(&mut f, &src, 0, 0, 0.5).unwrap();
        let got = px(&f, 0, 0);
        assert_eq!(got[3], 128);
        assert_eq!(got[0], 100);
        assert_eq!(got[1], 50);
    }

    #[test]
    fn blit_clips_at_every_frame_edge() {
        let src = solid_pixmap(2, 2, [0, 0, 80, 255]);
        for (dx, dy) in [(-1i64, -1i64), (3, -1), (-1, 3), (3, 3)] {
            let mut f = frame_4x4();
            blit_premul_over(&mut f, &src, dx, dy, 1.0).unwrap();
            let covered: usize = f.data.chunks_exact(4).filter(|p| p[3] != 0).count();
            assert_eq!(covered, 1, "offset ({dx},{dy}) should leave one pixel");
        }
    }

    #[test]
    fn fully_offscreen_blit_is_a_noop() {
        let mut f = frame_4x4();
        let src = solid_pixmap(2, 2, [10, 10, 10, 255]);
        blit_premul_over(&mut f, &src, 10, 10, 1.0).unwrap();
        blit_premul_over(&mut f, &src, -10, -10, 1.0).unwrap();
        assert!(f.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn straight_rgba_roundtrip_of_half_alpha() {
        let mut f = frame_4x4();
        let src = solid_pixmap(1, 1, [100, 50, 0, 255]);
        blit_premul_over(&mut f, &src, 0, 0, 0.5).unwrap();
        let straight = f.to_straight_rgba();
        // Premul (50, 25, 0, 128) unpremultiplies back to ~(100, 50, 0).
        assert_eq!(straight[3], 128);
        assert!((i32::from(straight[0]) - 100).abs() <= 1);
        assert!((i32::from(straight[1]) - 50).abs() <= 1);
    }
}
