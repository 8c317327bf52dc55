//! Derived records for the painterly algorithms: stroke-based rendering and
//! watercolor.

use crate::params::noise::NoisePack;
use crate::settings::{CanvasSettings, SbrSettings, WcrSettings};

/// Per-layer uniform arrays for stroke-based rendering.
///
/// The screen is divided into a per-layer grid and one brush stroke is drawn
/// per cell; upper layers use denser grids, i.e. smaller and finer strokes.
/// All arrays have `count` live entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SbrParams {
    pub grid_scale: f32,
    pub count: usize,
    /// `1 / count`, bound as the layer-count reciprocal uniform.
    pub inv_layer_count: f32,
    pub enable: Vec<f32>,
    pub mask_type: Vec<f32>,
    /// Stroke sampling radius per layer, in grid cells.
    pub radius: Vec<f32>,
    pub detail_threshold_high: Vec<f32>,
    pub detail_threshold_low: Vec<f32>,
    /// Stroke width/length converted to texel units.
    pub stroke_width: Vec<f32>,
    pub stroke_len: Vec<f32>,
    pub stroke_opacity: Vec<f32>,
    pub stroke_len_rand: Vec<f32>,
    /// (height, width, 1/height, 1/width) of the scratch texture.
    pub scratch_size: Vec<[f32; 4]>,
    pub scratch_opacity: Vec<f32>,
    /// (tex2grid_x, tex2grid_y, grid2tex_x, grid2tex_y).
    pub tex2grid: Vec<[f32; 4]>,
    /// (ascending progress, descending index, descending progress, 0).
    pub progress: Vec<[f32; 4]>,
    /// (hue1, hue2, saturation, value) tolerances.
    pub tolerance: Vec<[f32; 4]>,
    /// HSV color-grading add terms.
    pub add: Vec<[f32; 4]>,
    /// HSV color-grading mul terms.
    pub mul: Vec<[f32; 4]>,
    pub inv_grid_x: Vec<f32>,
    pub inv_grid_y: Vec<f32>,
}

impl SbrParams {
    pub fn derive(sbr: &SbrSettings, layer_max: usize, width: u32, height: u32) -> Self {
        let count = sbr.layers.len().min(layer_max);
        let mut out = Self {
            grid_scale: sbr.grid_scale,
            count,
            ..Self::default()
        };
        if count == 0 {
            return out;
        }

        out.inv_layer_count = 1.0 / count as f32;
        // Progress step between adjacent layers; guarded, since a single
        // layer has no cross-layer blending to order.
        let progress_step = if count > 1 {
            1.0 / (count as f32 - 1.0)
        } else {
            0.0
        };

        // Scale the denser axis down so a grid cell is square in screen space
        // whatever the source aspect ratio.
        let (mut aspect_x, mut aspect_y) = (1.0f32, 1.0f32);
        if width < height {
            aspect_x *= width as f32 / height as f32;
        }
        if width > height {
            aspect_y *= height as f32 / width as f32;
        }
        let inv_width = 1.0 / width as f32;
        let inv_height = 1.0 / height as f32;

        for (i, layer) in sbr.layers.iter().take(count).enumerate() {
            out.enable.push(if layer.enable { 1.0 } else { 0.0 });
            out.mask_type.push(layer.mask_type.as_f32());

            let rev_layer = (count - 1 - i) as f32;
            out.progress.push([
                i as f32 * progress_step,
                rev_layer,
                rev_layer * progress_step,
                0.0,
            ]);

            let grid_count = layer.grid_count as f32 * sbr.grid_scale;
            let grid_count_x = grid_count * aspect_x;
            let grid_count_y = grid_count * aspect_y;
            let inv_grid_count_x = 1.0 / grid_count_x;
            let inv_grid_count_y = 1.0 / grid_count_y;

            // Sampling radius from the larger stroke extent: drop the center
            // pixel and split the rest across both sides.
            let rad_max = layer.stroke_width.max(layer.stroke_len);
            out.radius.push(((rad_max - 1.0) / 2.0).ceil());

            let tex2grid_x = grid_count_x * inv_width;
            let tex2grid_y = grid_count_y * inv_height;
            let grid2tex_x = width as f32 * inv_grid_count_x;
            let grid2tex_y = height as f32 * inv_grid_count_y;
            out.tex2grid
                .push([tex2grid_x, tex2grid_y, grid2tex_x, grid2tex_y]);

            out.detail_threshold_high.push(layer.detail_threshold_high);
            out.detail_threshold_low.push(layer.detail_threshold_low);
            out.stroke_width.push(layer.stroke_width * grid2tex_x);
            out.stroke_len.push(layer.stroke_len * grid2tex_y);
            out.stroke_opacity.push(layer.stroke_opacity);
            out.stroke_len_rand.push(layer.stroke_len_rand);
            out.scratch_size.push([
                layer.scratch_height,
                layer.scratch_width,
                1.0 / layer.scratch_height,
                1.0 / layer.scratch_width,
            ]);
            out.scratch_opacity.push(layer.scratch_opacity);
            out.tolerance.push([
                layer.tolerance_h1,
                layer.tolerance_h2,
                layer.tolerance_s,
                layer.tolerance_v,
            ]);
            out.add
                .push([layer.add_h1, layer.add_h2, layer.add_s, layer.add_v]);
            out.mul
                .push([layer.mul_h1, layer.mul_h2, layer.mul_s, layer.mul_v]);
            out.inv_grid_x.push(inv_grid_count_x);
            out.inv_grid_y.push(inv_grid_count_y);
        }
        out
    }
}

/// Watercolor uniforms plus the two noise parameter packs that feed the
/// throttled noise buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WcrParams {
    pub bleeding: f32,
    pub opacity: f32,
    pub hand_tremor_len: f32,
    pub hand_tremor_scale: f32,
    pub hand_tremor_draw_count: f32,
    pub hand_tremor_inv_draw_count: f32,
    pub hand_tremor_overlap_count: f32,
    pub pigment_dispersion_scale: f32,
    pub turbulence_flow_scale1: f32,
    pub turbulence_flow_scale2: f32,
    pub wet_in_wet_len_ratio: f32,
    pub wet_in_wet_inv_len_ratio: f32,
    pub wet_in_wet_low: f32,
    pub wet_in_wet_high: f32,
    pub wet_in_wet_dark_to_light: f32,
    pub wet_in_wet_hue_similarity: f32,
    pub edge_darking_len_ratio: f32,
    pub edge_darking_inv_len_ratio: f32,
    pub edge_darking_size: f32,
    pub edge_darking_scale: f32,
    /// Minimum seconds between noise-buffer rebuilds.
    pub noise_update_time: f32,
    /// Hand-tremor / turbulence noise, rendered into the SNOISE buffer.
    pub snoise1: NoisePack,
    /// Wet-in-wet / paper-wrinkle noise, rendered into the FNOISE buffer.
    pub snoise2: NoisePack,
}

impl WcrParams {
    pub fn derive(wcr: &WcrSettings, canvas: &CanvasSettings) -> Self {
        Self {
            bleeding: wcr.bleeding,
            opacity: wcr.opacity,
            hand_tremor_len: wcr.hand_tremor_len,
            hand_tremor_scale: wcr.hand_tremor_scale,
            hand_tremor_draw_count: wcr.hand_tremor_draw_count,
            hand_tremor_inv_draw_count: 1.0 / wcr.hand_tremor_draw_count,
            hand_tremor_overlap_count: wcr.hand_tremor_overlap_count,
            pigment_dispersion_scale: wcr.pigment_dispersion_scale,
            turbulence_flow_scale1: wcr.turbulence_flow_scale1,
            turbulence_flow_scale2: wcr.turbulence_flow_scale2,
            wet_in_wet_len_ratio: 1.0 - wcr.wet_in_wet_len_ratio,
            wet_in_wet_inv_len_ratio: 1.0 / wcr.wet_in_wet_len_ratio,
            wet_in_wet_low: wcr.wet_in_wet_low,
            wet_in_wet_high: wcr.wet_in_wet_high,
            wet_in_wet_dark_to_light: if wcr.wet_in_wet_dark_to_light {
                1.0
            } else {
                0.0
            },
            wet_in_wet_hue_similarity: wcr.wet_in_wet_hue_similarity,
            edge_darking_len_ratio: 1.0 - wcr.edge_darking_len_ratio,
            edge_darking_inv_len_ratio: 1.0 / wcr.edge_darking_len_ratio,
            edge_darking_size: wcr.edge_darking_size,
            edge_darking_scale: wcr.edge_darking_scale,
            noise_update_time: wcr.noise_update_time,
            snoise1: NoisePack {
                size: [
                    wcr.hand_tremor_wave_len1,
                    wcr.hand_tremor_wave_len2,
                    wcr.turbulence_flow_wave_len1,
                    wcr.turbulence_flow_wave_len2,
                ],
                scale: [
                    wcr.hand_tremor_amplitude1,
                    wcr.hand_tremor_amplitude2,
                    wcr.turbulence_flow_amplitude1,
                    wcr.turbulence_flow_amplitude2,
                ],
                speed: [0.0; 4],
            },
            snoise2: NoisePack {
                size: [wcr.wet_in_wet_wave_len, 1.0, 1.0, canvas.wrinkle_wave_len],
                scale: [wcr.wet_in_wet_amplitude, 1.0, 1.0, canvas.wrinkle_amplitude],
                speed: [0.0; 4],
            },
        }
    }
}
