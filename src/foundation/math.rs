//! Small numeric helpers shared by the CPU kernels.

/// Rec.709 luminance of an RGBA pixel.
#[inline]
pub(crate) fn luma(px: [f32; 4]) -> f32 {
    0.2126 * px[0] + 0.7152 * px[1] + 0.0722 * px[2]
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub(crate) fn lerp4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
        lerp(a[3], b[3], t),
    ]
}

/// Deterministic per-cell hash in [0, 1).
///
/// Integer-mix hash in the style of the procedural-noise kernels this crate is
/// modeled on; cheap enough to call per sample.
#[inline]
pub(crate) fn hash_f32(x: u32, y: u32, seed: u32) -> f32 {
    let mut h = x
        .wrapping_mul(0x85eb_ca6b)
        .wrapping_add(y.wrapping_mul(0xc2b2_ae35))
        .wrapping_add(seed.wrapping_mul(0x27d4_eb2f));
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b_3c6d);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297a_2d39);
    h ^= h >> 15;
    (h >> 8) as f32 / ((1u32 << 24) as f32)
}

/// Smooth value noise in [0, 1) at (x, y) with the given cell size.
pub(crate) fn value_noise(x: f32, y: f32, cell: f32, seed: u32) -> f32 {
    let cell = cell.max(1e-3);
    let gx = x / cell;
    let gy = y / cell;
    let x0 = gx.floor();
    let y0 = gy.floor();
    let fx = gx - x0;
    let fy = gy - y0;
    // smoothstep fade
    let ux = fx * fx * (3.0 - 2.0 * fx);
    let uy = fy * fy * (3.0 - 2.0 * fy);
    let (x0, y0) = (x0 as i64 as u32, y0 as i64 as u32);
    let x1 = x0.wrapping_add(1);
    let y1 = y0.wrapping_add(1);
    let a = hash_f32(x0, y0, seed);
    let b = hash_f32(x1, y0, seed);
    let c = hash_f32(x0, y1, seed);
    let d = hash_f32(x1, y1, seed);
    lerp(lerp(a, b, ux), lerp(c, d, ux), uy)
}

/// RGB -> HSV, all channels in [0, 1].
pub(crate) fn rgb_to_hsv(px: [f32; 4]) -> [f32; 4] {
    let (r, g, b) = (px[0], px[1], px[2]);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let h = if d <= 0.0 {
        0.0
    } else if max == r {
        (((g - b) / d).rem_euclid(6.0)) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };
    let s = if max <= 0.0 { 0.0 } else { d / max };
    [h, s, max, px[3]]
}

/// HSV -> RGB, all channels in [0, 1].
pub(crate) fn hsv_to_rgb(px: [f32; 4]) -> [f32; 4] {
    let (h, s, v) = (px[0].rem_euclid(1.0) * 6.0, px[1], px[2]);
    let c = v * s;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r + m, g + m, b + m, px[3]]
}

/// RGB -> a CIELAB-style opponent space (L scaled to [0, 1]).
pub(crate) fn rgb_to_lab(px: [f32; 4]) -> [f32; 4] {
    let l = luma(px);
    let a = px[0] - px[1];
    let b = px[2] - (px[0] + px[1]) * 0.5;
    [l, a, b, px[3]]
}

/// Inverse of [`rgb_to_lab`].
pub(crate) fn lab_to_rgb(px: [f32; 4]) -> [f32; 4] {
    let (l, a, b) = (px[0], px[1], px[2]);
    // The opponent space is linear; invert the forward transform directly:
    //   l = 0.2126 r + 0.7152 g + 0.0722 bl,  a = r - g,  bl = b + (r+g)/2
    let kr = 0.2126 + 0.0361;
    let kg = 0.7152 + 0.0361;
    let g = (l - 0.0722 * b - kr * a) / (kr + kg);
    let r = g + a;
    let bl = b + (r + g) * 0.5;
    [r, g, bl, px[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_round_trip() {
        for px in [
            [0.2, 0.4, 0.8, 1.0],
            [1.0, 0.0, 0.0, 1.0],
            [0.5, 0.5, 0.5, 0.3],
        ] {
            let back = hsv_to_rgb(rgb_to_hsv(px));
            for c in 0..4 {
                assert!((back[c] - px[c]).abs() < 1e-5, "{px:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn lab_round_trip() {
        for px in [[0.2, 0.4, 0.8, 1.0], [0.9, 0.1, 0.3, 0.5]] {
            let back = lab_to_rgb(rgb_to_lab(px));
            for c in 0..4 {
                assert!((back[c] - px[c]).abs() < 1e-4, "{px:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn hash_is_deterministic_and_bounded() {
        let a = hash_f32(12, 34, 5);
        let b = hash_f32(12, 34, 5);
        assert_eq!(a, b);
        assert!((0.0..1.0).contains(&a));
        assert_ne!(hash_f32(12, 34, 5), hash_f32(13, 34, 5));
    }
}
