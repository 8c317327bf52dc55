//! Editable settings records, one per algorithm.
//!
//! These are the pipeline's configuration surface: plain serde-serializable
//! structs owned by the embedding application. Every numeric field documents
//! its valid range; the pipeline assumes values are already clamped to those
//! ranges by the owner (range enforcement is a UI concern, not an engine one).

pub mod defaults;

use serde::{Deserialize, Serialize};

/// Hard limit on stroke-rendering layers, matching the uniform-array capacity
/// of the kernel contract.
pub const SBR_LAYER_MAX: usize = 10;

/// All per-algorithm settings plus the common records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cc: CcSettings,
    pub canvas: CanvasSettings,
    pub sbr: SbrSettings,
    pub wcr: WcrSettings,
    pub bf: BfSettings,
    pub akf: AkfSettings,
    pub snn: SnnSettings,
    pub fxdog: FxDogSettings,
    pub outline: OutlineSettings,
    pub gblur: GBlurSettings,
    pub posterize: PosterizeSettings,
    pub lic: LicSettings,
    pub snoise: SNoiseSettings,
    pub fnoise: FNoiseSettings,
}

/// Color correction applied on frame entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CcSettings {
    /// Input black point, [0, 255].
    pub input_black: f32,
    /// Input gamma, [0, 2].
    pub input_gamma: f32,
    /// Input white point, [0, 255].
    pub input_white: f32,
    /// Output black point, [0, 255].
    pub output_black: f32,
    /// Output white point, [0, 255].
    pub output_white: f32,
    /// Luminance multiplier, [0, 2].
    pub mul_lum: f32,
    /// Luminance offset, [-1, 1].
    pub add_lum: f32,
}

impl CcSettings {
    pub const MUL_LUM_MIN: f32 = 0.0;
    pub const MUL_LUM_MAX: f32 = 2.0;
}

impl Default for CcSettings {
    fn default() -> Self {
        Self {
            input_black: 0.0,
            input_gamma: 1.0,
            input_white: 255.0,
            output_black: 0.0,
            output_white: 255.0,
            mul_lum: 1.0,
            add_lum: 0.0,
        }
    }
}

/// Paper/canvas texture options shared by the painterly algorithms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Paper wrinkle noise wavelength, [0, 40].
    pub wrinkle_wave_len: f32,
    /// Paper wrinkle noise amplitude, [0, 10].
    pub wrinkle_amplitude: f32,
    /// Ruled-line density, [0, 1] (0 disables).
    pub ruled_line_density: f32,
    /// Ruled-line size, [1, 3].
    pub ruled_line_size: f32,
    /// Ruled-line angle in degrees, [0, 90].
    pub ruled_line_angle: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            wrinkle_wave_len: 20.0,
            wrinkle_amplitude: 5.0,
            ruled_line_density: 0.0,
            ruled_line_size: 2.0,
            ruled_line_angle: 45.0,
        }
    }
}

/// Masking mode for one stroke layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskType {
    /// Layer ignores the mask.
    #[default]
    None,
    /// Layer draws only inside the mask.
    Mask,
    /// Layer draws only outside the mask.
    MaskReverse,
}

impl MaskType {
    pub(crate) fn as_f32(self) -> f32 {
        match self {
            MaskType::None => 0.0,
            MaskType::Mask => 1.0,
            MaskType::MaskReverse => 2.0,
        }
    }
}

/// One stroke-based-rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SbrLayer {
    pub enable: bool,
    /// Free-form note shown in editors; ignored by the pipeline.
    pub memo: String,
    pub mask_type: MaskType,
    /// Grid cells along the dominant axis, [1, 1000]. One brush stroke is
    /// placed per cell; more cells means finer strokes.
    pub grid_count: u32,
    /// Detail band upper bound, [0, 1].
    pub detail_threshold_high: f32,
    /// Detail band lower bound, [0, 1].
    pub detail_threshold_low: f32,
    /// Stroke width in grid cells, [0.1, 7].
    pub stroke_width: f32,
    /// Stroke length in grid cells, [0.1, 7].
    pub stroke_len: f32,
    /// Stroke opacity, [0, 1].
    pub stroke_opacity: f32,
    /// Random stroke-length jitter, [0, 10].
    pub stroke_len_rand: f32,
    /// Scratch texture width, [0.1, 10].
    pub scratch_width: f32,
    /// Scratch texture height, [0.1, 30].
    pub scratch_height: f32,
    /// Scratch opacity, [0, 1].
    pub scratch_opacity: f32,
    /// Color tolerances (hue1, hue2, saturation, value), each [0, 1].
    pub tolerance_h1: f32,
    pub tolerance_h2: f32,
    pub tolerance_s: f32,
    pub tolerance_v: f32,
    /// Color-grading additive terms, each [-1, 1].
    pub add_h1: f32,
    pub add_h2: f32,
    pub add_s: f32,
    pub add_v: f32,
    /// Color-grading multiplicative terms, each [0, 2].
    pub mul_h1: f32,
    pub mul_h2: f32,
    pub mul_s: f32,
    pub mul_v: f32,
}

impl Default for SbrLayer {
    fn default() -> Self {
        Self {
            enable: true,
            memo: String::new(),
            mask_type: MaskType::None,
            grid_count: 100,
            detail_threshold_high: 1.0,
            detail_threshold_low: 0.0,
            stroke_width: 1.0,
            stroke_len: 3.0,
            stroke_opacity: 1.0,
            stroke_len_rand: 0.0,
            scratch_width: 15.0,
            scratch_height: 2.0,
            scratch_opacity: 1.0,
            tolerance_h1: 1.0,
            tolerance_h2: 1.0,
            tolerance_s: 1.0,
            tolerance_v: 1.0,
            add_h1: 0.0,
            add_h2: 0.0,
            add_s: 0.0,
            add_v: 0.0,
            mul_h1: 1.0,
            mul_h2: 1.0,
            mul_s: 1.0,
            mul_v: 1.0,
        }
    }
}

impl SbrLayer {
    /// Named constructor used by the default presets.
    pub fn named(memo: &str, mask_type: MaskType) -> Self {
        Self {
            memo: memo.to_string(),
            mask_type,
            ..Self::default()
        }
    }

    pub fn grid(mut self, grid_count: u32, low: f32, high: f32) -> Self {
        self.grid_count = grid_count;
        self.detail_threshold_low = low;
        self.detail_threshold_high = high;
        self
    }

    pub fn stroke(mut self, width: f32, len: f32, opacity: f32, len_rand: f32) -> Self {
        self.stroke_width = width;
        self.stroke_len = len;
        self.stroke_opacity = opacity;
        self.stroke_len_rand = len_rand;
        self
    }

    pub fn scratch(mut self, width: f32, height: f32, opacity: f32) -> Self {
        self.scratch_width = width;
        self.scratch_height = height;
        self.scratch_opacity = opacity;
        self
    }

    pub fn tolerance(mut self, h1: f32, h2: f32, s: f32, v: f32) -> Self {
        self.tolerance_h1 = h1;
        self.tolerance_h2 = h2;
        self.tolerance_s = s;
        self.tolerance_v = v;
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn grading(
        mut self,
        add_h1: f32,
        add_h2: f32,
        add_s: f32,
        add_v: f32,
        mul_h1: f32,
        mul_h2: f32,
        mul_s: f32,
        mul_v: f32,
    ) -> Self {
        self.add_h1 = add_h1;
        self.add_h2 = add_h2;
        self.add_s = add_s;
        self.add_v = add_v;
        self.mul_h1 = mul_h1;
        self.mul_h2 = mul_h2;
        self.mul_s = mul_s;
        self.mul_v = mul_v;
        self
    }
}

/// Stroke-based rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SbrSettings {
    /// Global grid multiplier, [0.1, 2]. The headline control.
    pub grid_scale: f32,
    /// Up to [`SBR_LAYER_MAX`] layers, painted back to front.
    pub layers: Vec<SbrLayer>,
}

impl SbrSettings {
    pub const GRID_SCALE_MIN: f32 = 0.1;
    pub const GRID_SCALE_MAX: f32 = 2.0;
    pub const GRID_SCALE_STEP: f32 = 0.1;
}

impl Default for SbrSettings {
    fn default() -> Self {
        Self {
            grid_scale: 1.0,
            layers: Vec::new(),
        }
    }
}

/// Watercolor rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WcrSettings {
    /// Pigment bleeding length, [0.1, 40].
    pub bleeding: f32,
    /// Overall opacity, [0, 1].
    pub opacity: f32,
    /// First hand-tremor noise wavelength, [0, 100].
    pub hand_tremor_wave_len1: f32,
    /// First hand-tremor noise amplitude, [0, 100].
    pub hand_tremor_amplitude1: f32,
    /// Second hand-tremor noise wavelength, [0, 100].
    pub hand_tremor_wave_len2: f32,
    /// Second hand-tremor noise amplitude, [0, 100].
    pub hand_tremor_amplitude2: f32,
    /// Tremor displacement length, [0, 30].
    pub hand_tremor_len: f32,
    /// Tremor displacement scale, [0, 3].
    pub hand_tremor_scale: f32,
    /// Overdraw count for the tremor pass, [1, 32].
    pub hand_tremor_draw_count: f32,
    /// Accepted overlaps per pixel in the tremor pass, [1, 8].
    pub hand_tremor_overlap_count: f32,
    /// Pigment dispersion scale, [0, 4].
    pub pigment_dispersion_scale: f32,
    /// Turbulent-flow wavelength, [0, 4].
    pub turbulence_flow_wave_len1: f32,
    /// Turbulent-flow amplitude, [0, 300].
    pub turbulence_flow_amplitude1: f32,
    /// Turbulent-flow scale, [0, 4].
    pub turbulence_flow_scale1: f32,
    /// Secondary turbulent-flow wavelength, [0, 50].
    pub turbulence_flow_wave_len2: f32,
    /// Secondary turbulent-flow amplitude, [0, 300].
    pub turbulence_flow_amplitude2: f32,
    /// Secondary turbulent-flow scale, [0, 40].
    pub turbulence_flow_scale2: f32,
    /// Edge-darkening band size, [0, 1].
    pub edge_darking_size: f32,
    /// Edge-darkening strength, [0.1, 1].
    pub edge_darking_scale: f32,
    /// Edge-darkening length ratio, (0, 1].
    pub edge_darking_len_ratio: f32,
    /// Wet-in-wet bleeds from dark into light when true.
    pub wet_in_wet_dark_to_light: bool,
    /// Hue similarity threshold in degrees, [0, 180]. The headline control.
    pub wet_in_wet_hue_similarity: f32,
    /// Wet-in-wet low luminance bound, [0, 1].
    pub wet_in_wet_low: f32,
    /// Wet-in-wet high luminance bound, [0, 1].
    pub wet_in_wet_high: f32,
    /// Wet-in-wet noise wavelength, [0, 300].
    pub wet_in_wet_wave_len: f32,
    /// Wet-in-wet noise amplitude, [0, 40].
    pub wet_in_wet_amplitude: f32,
    /// Wet-in-wet length ratio, (0, 1].
    pub wet_in_wet_len_ratio: f32,
    /// Minimum seconds between noise-buffer rebuilds, [0, 10].
    pub noise_update_time: f32,
}

impl WcrSettings {
    pub const HUE_SIMILARITY_MIN: f32 = 0.0;
    pub const HUE_SIMILARITY_MAX: f32 = 180.0;
    pub const HUE_SIMILARITY_STEP: f32 = 10.0;
}

impl Default for WcrSettings {
    fn default() -> Self {
        Self {
            bleeding: 40.0,
            opacity: 0.9,
            hand_tremor_wave_len1: 5.0,
            hand_tremor_amplitude1: 20.0,
            hand_tremor_wave_len2: 0.0,
            hand_tremor_amplitude2: 0.0,
            hand_tremor_len: 10.0,
            hand_tremor_scale: 1.0,
            hand_tremor_draw_count: 16.0,
            hand_tremor_overlap_count: 2.0,
            pigment_dispersion_scale: 1.0,
            turbulence_flow_wave_len1: 2.0,
            turbulence_flow_amplitude1: 120.0,
            turbulence_flow_scale1: 1.5,
            turbulence_flow_wave_len2: 0.0,
            turbulence_flow_amplitude2: 0.0,
            turbulence_flow_scale2: 0.0,
            edge_darking_size: 0.1,
            edge_darking_scale: 0.5,
            edge_darking_len_ratio: 1.0,
            wet_in_wet_dark_to_light: true,
            wet_in_wet_hue_similarity: 10.0,
            wet_in_wet_low: 0.0,
            wet_in_wet_high: 0.65,
            wet_in_wet_wave_len: 300.0,
            wet_in_wet_amplitude: 20.0,
            wet_in_wet_len_ratio: 0.5,
            noise_update_time: 0.0333,
        }
    }
}

/// Bilateral / flow-based filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BfSettings {
    /// Steer the tangent pass by the flow field instead of image axes.
    pub flow_based: bool,
    /// Diffusion iterations, [1, 20]. The headline control.
    pub blur_count: u32,
    /// Sample walk length, [0.1, 20].
    pub sample_len: f32,
    /// Spatial Gaussian sigma, [0.1, 20].
    pub distance_sigma: f32,
    /// Spatial weight bias, [0.1, 2].
    pub distance_bias: f32,
    /// Range Gaussian sigma, [0.1, 4].
    pub color_sigma: f32,
    /// Range weight bias, [0.1, 128].
    pub color_bias: f32,
    /// Range cutoff, (0, 1].
    pub color_threshold: f32,
    /// Step scale along the walk direction, [1, 10].
    pub step_dir_scale: f32,
    /// Step scale along the walk length, [1, 4].
    pub step_len_scale: f32,
    /// Precompute the 256-entry range-weight table.
    pub precalc_range_weights: bool,
}

impl BfSettings {
    pub const BLUR_COUNT_MIN: u32 = 1;
    pub const BLUR_COUNT_MAX: u32 = 20;
}

impl Default for BfSettings {
    fn default() -> Self {
        Self {
            flow_based: false,
            blur_count: 4,
            sample_len: 10.0,
            distance_sigma: 10.0,
            distance_bias: 1.0,
            color_sigma: 2.0,
            color_bias: 64.0,
            color_threshold: 1.0,
            step_dir_scale: 2.0,
            step_len_scale: 1.0,
            precalc_range_weights: false,
        }
    }
}

/// Anisotropic Kuwahara filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AkfSettings {
    /// Sampling radius in pixels, [4, 32]. The headline control.
    pub radius: f32,
    /// Masked-area radius as a ratio of `radius`, [0.2, 1].
    pub mask_radius_ratio: f32,
    /// Sector-weight sharpness, [0.1, 8].
    pub sharpness: f32,
    /// Sector overlap at the rim, [0.1, 3].
    pub side_overlap: f32,
    /// Sector overlap at the center, [0.1, 1].
    pub center_overlap: f32,
}

impl AkfSettings {
    pub const RADIUS_MIN: f32 = 4.0;
    pub const RADIUS_MAX: f32 = 32.0;
}

impl Default for AkfSettings {
    fn default() -> Self {
        Self {
            radius: 16.0,
            mask_radius_ratio: 0.5,
            sharpness: 8.0,
            side_overlap: 1.5,
            center_overlap: 0.3,
        }
    }
}

/// Symmetric nearest neighbor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnnSettings {
    /// Neighborhood radius in pixels, [1, 20]. The headline control.
    pub radius: u32,
}

impl SnnSettings {
    pub const RADIUS_MIN: u32 = 1;
    pub const RADIUS_MAX: u32 = 20;
}

impl Default for SnnSettings {
    fn default() -> Self {
        Self { radius: 8 }
    }
}

/// Flow-based extended difference-of-Gaussians.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxDogSettings {
    /// Abstraction level, [0.1, 3].
    pub abstractness: f32,
    /// Edge contrast, [1, 3].
    pub contrast: f32,
    /// Edge sharpness, [1, 40].
    pub sharpness: f32,
    /// Flow coherence, [1, 10].
    pub coherence: f32,
    /// Tangent smoothing, [1, 3].
    pub smoothness: f32,
    /// Tangent smoothing range, [1, 3].
    pub smooth_range: f32,
    /// Soft threshold slope, [0.1, 3].
    pub threshold_slope: f32,
    /// Threshold level, [1, 100].
    pub threshold: f32,
}

impl Default for FxDogSettings {
    fn default() -> Self {
        Self {
            abstractness: 2.0,
            contrast: 2.0,
            sharpness: 20.0,
            coherence: 5.0,
            smoothness: 2.0,
            smooth_range: 2.0,
            threshold_slope: 2.0,
            threshold: 80.0,
        }
    }
}

/// Outline stylization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSettings {
    /// Line size, [1, 5]. The headline control.
    pub size: f32,
    /// Line opacity, [0, 0.2].
    pub opacity: f32,
    /// Detail retention, [0, 2].
    pub detail: f32,
}

impl OutlineSettings {
    pub const SIZE_MIN: f32 = 1.0;
    pub const SIZE_MAX: f32 = 5.0;
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            size: 3.0,
            opacity: 0.1,
            detail: 1.0,
        }
    }
}

/// Gaussian blur used by the edge/flow precompute and as a debug effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GBlurSettings {
    /// Sample length in pixels, [1, 64].
    pub sample_len: u32,
    /// Mip level; the tile size is `2^lod`. [0, 3].
    pub lod: u32,
    /// Spatial sigma multiplier, [0.1, 10].
    pub domain_sigma: f32,
    /// Spatial weight bias, [0.1, 10].
    pub domain_bias: f32,
}

impl Default for GBlurSettings {
    fn default() -> Self {
        Self {
            sample_len: 16,
            lod: 2,
            domain_sigma: 1.0,
            domain_bias: 1.0,
        }
    }
}

/// Posterization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterizeSettings {
    /// Quantization bins per channel, [1, 16].
    pub bins: u32,
}

impl Default for PosterizeSettings {
    fn default() -> Self {
        Self { bins: 8 }
    }
}

/// Line integral convolution (debug visualization of the flow field).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicSettings {
    /// Noise scale, [0, 10].
    pub scale: f32,
    /// Convolution sigma, [0, 20].
    pub sigma: f32,
}

impl Default for LicSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            sigma: 9.0,
        }
    }
}

/// Simplex-style noise generator (four independent channels).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SNoiseSettings {
    /// Per-channel wavelengths, each [1, 256].
    pub size: [f32; 4],
    /// Per-channel amplitudes, each [1, 256].
    pub scale: [f32; 4],
    /// Per-channel animation speeds, each [0, 2].
    pub speed: [f32; 4],
}

impl Default for SNoiseSettings {
    fn default() -> Self {
        Self {
            size: [3.0; 4],
            scale: [64.0; 4],
            speed: [1.0; 4],
        }
    }
}

/// Flow noise generator (three channels).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FNoiseSettings {
    /// Per-channel wavelengths, each [1, 256].
    pub size: [f32; 3],
    /// Per-channel amplitudes, each [1, 64].
    pub scale: [f32; 3],
    /// Per-channel animation speeds, each [0, 2].
    pub speed: [f32; 3],
}

impl Default for FNoiseSettings {
    fn default() -> Self {
        Self {
            size: [3.0; 3],
            scale: [64.0, 46.0, 64.0],
            speed: [1.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_serde_round_trip() {
        let mut s = Settings::default();
        s.sbr.layers = vec![SbrLayer::named("bg", MaskType::Mask).grid(120, 0.1, 0.9)];
        s.bf.blur_count = 7;
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"akf":{"radius":24.0}}"#).unwrap();
        assert_eq!(s.akf.radius, 24.0);
        assert_eq!(s.akf.sharpness, AkfSettings::default().sharpness);
        assert_eq!(s.bf, BfSettings::default());
    }
}
