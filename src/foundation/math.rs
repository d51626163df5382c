use crate::foundation::error::{QrError, QrResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn unpremul_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    if a == 255 {
        return c;
    }
    (((u32::from(c) * 255) + u32::from(a) / 2) / u32::from(a)).min(255) as u8
}

/// Convert straight RGBA8 to premultiplied RGBA8 in place.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

fn check_same_len(dst: &[u8], src: &[u8], op: &str) -> QrResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(QrError::validation(format!(
            "{op} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

/// Porter-Duff `src over dst` on premultiplied RGBA8 buffers.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> QrResult<()> {
    check_same_len(dst, src, "premul_over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = s[3].saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = s[c].saturating_add(dc);
        }
    }
    Ok(())
}

/// Porter-Duff `src atop dst`: paint `src` only where `dst` already has coverage, keeping `dst`
/// alpha unchanged.
pub(crate) fn premul_atop_in_place(dst: &mut [u8], src: &[u8]) -> QrResult<()> {
    check_same_len(dst, src, "premul_atop_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let da = u16::from(d[3]);
        if da == 0 {
            continue;
        }
        let sa = u16::from(s[3]);
        let inv_sa = 255u16 - sa;
        for c in 0..3 {
            let sc = mul_div255_u16(u16::from(s[c]), da);
            let dc = mul_div255_u16(u16::from(d[c]), inv_sa);
            d[c] = (sc + dc).min(255) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
