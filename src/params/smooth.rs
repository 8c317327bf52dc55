//! Derived records for the smoothing family: bilateral, anisotropic Kuwahara,
//! symmetric nearest neighbor.

use std::f32::consts::PI;

use crate::settings::{AkfSettings, BfSettings, SnnSettings};

/// Capacity of the bilateral range-weight table.
pub const BF_RANGE_TABLE_LEN: usize = 256;

/// Bilateral-filter uniforms.
#[derive(Clone, Debug, PartialEq)]
pub struct BfParams {
    pub flow_based: bool,
    pub blur_count: u32,
    pub sample_len: f32,
    /// `1 / (2 * distance_sigma^2)`.
    pub domain_variance: f32,
    /// `1 / (2 * color_sigma^2)`.
    pub range_variance: f32,
    pub domain_bias: f32,
    pub range_bias: f32,
    /// Reciprocal of the color cutoff.
    pub range_threshold: f32,
    pub step_dir_scale: f32,
    pub step_len_scale: f32,
    pub use_precalc: bool,
    pub range_weight: Box<[f32; BF_RANGE_TABLE_LEN]>,
}

impl Default for BfParams {
    fn default() -> Self {
        Self::derive(&BfSettings::default())
    }
}

impl BfParams {
    pub fn derive(bf: &BfSettings) -> Self {
        let domain_variance = 1.0 / (bf.distance_sigma * bf.distance_sigma * 2.0);
        let range_variance = 1.0 / (bf.color_sigma * bf.color_sigma * 2.0);

        let mut out = Self {
            flow_based: bf.flow_based,
            blur_count: bf.blur_count,
            sample_len: bf.sample_len,
            domain_variance,
            range_variance,
            domain_bias: bf.distance_bias,
            range_bias: bf.color_bias,
            range_threshold: 1.0 / bf.color_threshold,
            step_dir_scale: bf.step_dir_scale,
            step_len_scale: bf.step_len_scale,
            use_precalc: bf.precalc_range_weights,
            range_weight: Box::new([0.0; BF_RANGE_TABLE_LEN]),
        };

        if !out.use_precalc {
            return out;
        }
        for i in 0..BF_RANGE_TABLE_LEN {
            let x = i as f32 * out.range_bias;
            out.range_weight[i] = (-(x * x) * range_variance).exp();
        }
        out
    }
}

/// Anisotropic-Kuwahara uniforms.
///
/// The kernel splits an ellipse into eight sectors; `overlap_x`/`overlap_y`
/// shape the parabola `(x + overlap_x) - overlap_y * y^2` that decides sector
/// membership with deliberate overlap, so the variance comparison across
/// sectors stays smooth.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AkfParams {
    pub radius: f32,
    pub mask_radius: f32,
    pub sharpness: f32,
    pub overlap_x: f32,
    pub overlap_y: f32,
    pub sample_step: u32,
}

/// Fixed sector count of the Kuwahara ellipse.
const AKF_DIV_COUNT: f32 = 8.0;

impl AkfParams {
    pub fn derive(akf: &AkfSettings) -> Self {
        // Below RADIUS_MIN the masked region shows paint gaps.
        let mask_radius = AkfSettings::RADIUS_MIN.max(akf.radius * akf.mask_radius_ratio);

        let theta = akf.side_overlap * (PI / AKF_DIV_COUNT);
        let (sin_theta, cos_theta) = theta.sin_cos();
        let overlap_y = (akf.center_overlap + cos_theta) / (sin_theta * sin_theta);

        Self {
            radius: akf.radius,
            mask_radius,
            sharpness: akf.sharpness,
            overlap_x: akf.center_overlap,
            overlap_y,
            sample_step: 2,
        }
    }
}

/// Symmetric-nearest-neighbor uniforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnnParams {
    pub radius: i32,
    /// Normalization weight: twice the number of symmetric pairs sampled.
    pub weight: f32,
}

impl SnnParams {
    pub fn derive(snn: &SnnSettings) -> Self {
        let r = snn.radius as f32;
        Self {
            radius: snn.radius as i32,
            weight: (r * (r * 2.0 + 1.0) + r) * 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bf_variances_follow_the_gaussian_form() {
        let bf = BfSettings::default();
        let p = BfParams::derive(&bf);
        assert!(
            (p.domain_variance - 1.0 / (2.0 * bf.distance_sigma * bf.distance_sigma)).abs() < 1e-7
        );
        assert!((p.range_variance - 1.0 / (2.0 * bf.color_sigma * bf.color_sigma)).abs() < 1e-7);
        assert!(!p.use_precalc);
    }

    #[test]
    fn bf_range_table_decays_monotonically() {
        let p = BfParams::derive(&BfSettings {
            precalc_range_weights: true,
            ..BfSettings::default()
        });
        assert_eq!(p.range_weight[0], 1.0);
        for i in 1..BF_RANGE_TABLE_LEN {
            assert!(p.range_weight[i] <= p.range_weight[i - 1]);
        }
    }

    #[test]
    fn akf_mask_radius_never_drops_below_minimum() {
        let p = AkfParams::derive(&AkfSettings {
            radius: 4.0,
            mask_radius_ratio: 0.2,
            ..AkfSettings::default()
        });
        assert_eq!(p.mask_radius, AkfSettings::RADIUS_MIN);
    }

    #[test]
    fn akf_overlap_divides_by_sin_squared() {
        let akf = AkfSettings::default();
        let p = AkfParams::derive(&akf);
        let theta = akf.side_overlap * (PI / 8.0);
        let expected = (akf.center_overlap + theta.cos()) / (theta.sin() * theta.sin());
        assert!((p.overlap_y - expected).abs() < 1e-5);
        assert_eq!(p.overlap_x, akf.center_overlap);
    }

    #[test]
    fn snn_weight_counts_symmetric_pairs() {
        let p = SnnParams::derive(&SnnSettings { radius: 8 });
        assert_eq!(p.weight, (8.0 * (8.0 * 2.0 + 1.0) + 8.0) * 2.0);
    }
}
