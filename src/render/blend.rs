use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Blend `src` over the 4-byte pixel at the front of `dst`.
pub(crate) fn over_px(dst: &mut [u8], src: PremulRgba8) {
    let out = over([dst[0], dst[1], dst[2], dst[3]], src);
    dst[..4].copy_from_slice(&out);
}

/// Blend an equal-length premultiplied row onto `dst`.
pub(crate) fn over_row(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        over_px(d, [s[0], s[1], s[2], s[3]]);
    }
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
