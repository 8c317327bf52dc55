//! Derived Gaussian-blur record, including the precomputed sample table.

use crate::settings::GBlurSettings;

/// Capacity of the precomputed offset/weight tables. A blur whose squared
/// radius exceeds this falls back to the per-pixel evaluation pass.
pub const GBLUR_TABLE_LEN: usize = 256;

/// Gaussian-blur uniforms.
///
/// The blur walks a `blur_size x blur_size` grid of tile-sized steps; when the
/// grid fits [`GBLUR_TABLE_LEN`] the offsets and weights are precomputed here
/// so the kernel is a table walk with one multiply per sample.
#[derive(Clone, Debug, PartialEq)]
pub struct GBlurParams {
    pub lod: u32,
    /// `2^lod`.
    pub tile_size: u32,
    /// Sample length, clamped to at least one tile.
    pub sample_len: u32,
    /// Blur radius in tiles: `sample_len / tile_size`.
    pub blur_size: u32,
    pub inv_domain_sigma: f32,
    /// `1 / (2 * sigma^2)`, so the per-sample weight is a single multiply.
    pub domain_variance: f32,
    pub domain_bias: f32,
    pub mean: f32,
    /// False when `blur_size^2 > 256`; the kernel then evaluates weights
    /// per pixel instead of reading the tables.
    pub use_precalc: bool,
    pub offset_x: Box<[f32; GBLUR_TABLE_LEN]>,
    pub offset_y: Box<[f32; GBLUR_TABLE_LEN]>,
    pub domain_weight: Box<[f32; GBLUR_TABLE_LEN]>,
}

impl Default for GBlurParams {
    fn default() -> Self {
        Self::derive(&GBlurSettings::default())
    }
}

impl GBlurParams {
    pub fn derive(gb: &GBlurSettings) -> Self {
        let tile_size = 1u32 << gb.lod;
        let sample_len = gb.sample_len.max(tile_size);
        let blur_size = sample_len / tile_size;

        let domain_sigma = sample_len as f32 * (1.0 / tile_size as f32) * gb.domain_sigma;
        let inv_domain_sigma = 1.0 / domain_sigma;
        let domain_variance = 1.0 / (domain_sigma * domain_sigma * 2.0);
        let mean = sample_len as f32 * 0.5;

        let mut out = Self {
            lod: gb.lod,
            tile_size,
            sample_len,
            blur_size,
            inv_domain_sigma,
            domain_variance,
            domain_bias: gb.domain_bias,
            mean,
            use_precalc: true,
            offset_x: Box::new([0.0; GBLUR_TABLE_LEN]),
            offset_y: Box::new([0.0; GBLUR_TABLE_LEN]),
            domain_weight: Box::new([0.0; GBLUR_TABLE_LEN]),
        };

        if (blur_size * blur_size) as usize > GBLUR_TABLE_LEN {
            out.use_precalc = false;
            return out;
        }

        // Finish the exponentials up front; the kernel only multiplies.
        for y in 0..blur_size {
            for x in 0..blur_size {
                let index = (y * blur_size + x) as usize;
                let ox = x as f32 * tile_size as f32 - mean;
                let oy = y as f32 * tile_size as f32 - mean;
                out.offset_x[index] = ox;
                out.offset_y[index] = oy;

                let sx = ox * inv_domain_sigma * gb.domain_bias;
                let sy = oy * inv_domain_sigma * gb.domain_bias;
                let dot = sx * sx + sy * sy;
                out.domain_weight[index] = (-0.5 * dot).exp() * domain_variance;
            }
        }
        out
    }

    /// Number of live entries in the sample tables.
    pub fn table_len(&self) -> usize {
        if self.use_precalc {
            (self.blur_size * self.blur_size) as usize
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(sample_len: u32, lod: u32) -> GBlurSettings {
        GBlurSettings {
            sample_len,
            lod,
            ..GBlurSettings::default()
        }
    }

    #[test]
    fn tile_size_is_power_of_two_of_lod() {
        let p = GBlurParams::derive(&settings(16, 3));
        assert_eq!(p.tile_size, 8);
        assert_eq!(p.blur_size, 2);
    }

    #[test]
    fn sample_len_clamps_to_tile_size() {
        let p = GBlurParams::derive(&settings(2, 3));
        assert_eq!(p.sample_len, 8);
        assert_eq!(p.blur_size, 1);
    }

    #[test]
    fn precalc_flips_exactly_at_table_capacity() {
        // 64 samples at LOD 2 -> tile 4, radius 16, 16*16 = 256: still precomputed.
        let p = GBlurParams::derive(&settings(64, 2));
        assert_eq!(p.blur_size, 16);
        assert!(p.use_precalc);
        assert_eq!(p.table_len(), 256);

        // radius 17 -> 289 > 256: falls back to per-pixel evaluation.
        let p = GBlurParams::derive(&settings(68, 2));
        assert_eq!(p.blur_size, 17);
        assert!(!p.use_precalc);
        assert_eq!(p.table_len(), 0);
    }

    #[test]
    fn variance_is_half_inverse_sigma_squared() {
        let gb = settings(16, 2);
        let p = GBlurParams::derive(&gb);
        let sigma = p.sample_len as f32 / p.tile_size as f32 * gb.domain_sigma;
        assert!((p.domain_variance - 1.0 / (2.0 * sigma * sigma)).abs() < 1e-7);
    }

    #[test]
    fn table_weights_peak_at_the_mean() {
        let p = GBlurParams::derive(&settings(16, 2));
        let n = p.table_len();
        let peak = p.domain_weight[..n]
            .iter()
            .cloned()
            .fold(f32::MIN, f32::max);
        // The cell nearest the center carries the largest weight.
        let center = p.offset_x[..n]
            .iter()
            .zip(p.offset_y[..n].iter())
            .zip(p.domain_weight[..n].iter())
            .min_by(|((ax, ay), _), ((bx, by), _)| {
                (*ax * *ax + *ay * *ay)
                    .partial_cmp(&(*bx * *bx + *by * *by))
                    .unwrap()
            })
            .map(|(_, w)| *w)
            .unwrap();
        assert_eq!(center, peak);
    }
}
