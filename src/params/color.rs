//! Derived records for the color-oriented passes.

use std::f32::consts::PI;

use crate::settings::{CanvasSettings, CcSettings, PosterizeSettings};

/// Color-correction uniforms, bound on frame entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CcParams {
    pub in_black: f32,
    pub in_gamma: f32,
    pub in_white: f32,
    pub out_black: f32,
    pub out_white: f32,
    pub mul_lum: f32,
    pub add_lum: f32,
}

impl CcParams {
    pub fn derive(cc: &CcSettings) -> Self {
        Self {
            in_black: cc.input_black,
            in_gamma: cc.input_gamma,
            in_white: cc.input_white,
            out_black: cc.output_black,
            out_white: cc.output_white,
            mul_lum: cc.mul_lum,
            add_lum: cc.add_lum,
        }
    }
}

/// Posterization uniforms; the reciprocal keeps the kernel divide-free.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PosterizeParams {
    pub bins: f32,
    pub inv_bins: f32,
}

impl PosterizeParams {
    pub fn derive(pst: &PosterizeSettings) -> Self {
        let bins = pst.bins as f32;
        Self {
            bins,
            inv_bins: 1.0 / bins,
        }
    }
}

/// Paper/canvas uniforms: ruled-line frequency and rotation matrix.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasParams {
    pub ruled_line_density: f32,
    pub ruled_line_inv_size: f32,
    /// Row-major 2x2 rotation for the ruled-line direction.
    pub ruled_line_rot: [f32; 4],
}

impl CanvasParams {
    pub fn derive(can: &CanvasSettings) -> Self {
        // Size is edited in millimeter-ish units; fold the unit conversion and
        // the wave frequency into one reciprocal.
        let inv_size = (1.0 / (can.ruled_line_size * 0.001)) * PI;
        let angle = can.ruled_line_angle.to_radians();
        let (s, c) = angle.sin_cos();
        Self {
            ruled_line_density: can.ruled_line_density,
            ruled_line_inv_size: inv_size,
            ruled_line_rot: [c, -s, s, c],
        }
    }
}
