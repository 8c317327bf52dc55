//! Curated default parameter sets.
//!
//! These are the presets installed when an algorithm is entered through the
//! selector's forward cycle, and the self-heal source when stroke rendering is
//! selected with no layers configured. Each preset also adjusts the common
//! color-correction and blur records that the algorithm was tuned against.

use crate::settings::{MaskType, SbrLayer, Settings};

/// Install the eight-layer stroke-rendering preset (background washes up
/// through fine outline and skin detail layers).
pub fn apply_sbr(settings: &mut Settings) {
    settings.sbr.layers = vec![
        SbrLayer::named("Background", MaskType::None)
            .grid(100, 0.0, 1.0)
            .stroke(3.0, 3.0, 1.0, 0.0)
            .scratch(0.1, 0.1, 0.0)
            .tolerance(0.3, 0.3, 1.0, 0.1)
            .grading(0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0),
        SbrLayer::named("BaseColor1", MaskType::None)
            .grid(50, 0.001, 0.05)
            .stroke(0.8, 2.5, 1.0, 0.1)
            .scratch(1.0, 30.0, 1.0)
            .tolerance(0.3, 0.3, 1.0, 0.2)
            .grading(0.0, 0.0, 0.05, 0.0, 1.0, 1.0, 0.7, 1.0),
        SbrLayer::named("BaseColor2", MaskType::None)
            .grid(51, 0.001, 0.05)
            .stroke(0.8, 2.5, 1.0, 0.1)
            .scratch(1.0, 30.0, 1.0)
            .tolerance(0.3, 0.3, 1.0, 0.2)
            .grading(0.0, 0.0, 0.1, 0.0, 1.0, 1.0, 0.7, 1.0),
        SbrLayer::named("BaseColor3", MaskType::None)
            .grid(52, 0.001, 0.05)
            .stroke(0.8, 2.5, 1.0, 0.1)
            .scratch(1.0, 30.0, 1.0)
            .tolerance(0.3, 0.3, 1.0, 0.2)
            .grading(0.0, 0.0, 0.15, 0.0, 1.0, 1.0, 0.7, 1.0),
        SbrLayer::named("Outline1", MaskType::MaskReverse)
            .grid(101, 0.005, 1.0)
            .stroke(0.6, 2.7, 1.0, 0.1)
            .scratch(1.0, 30.0, 1.0)
            .tolerance(1.0, 1.0, 1.0, 1.0)
            .grading(0.0, 0.0, 0.15, 0.0, 1.0, 1.0, 0.7, 1.0),
        SbrLayer::named("Outline2", MaskType::MaskReverse)
            .grid(102, 0.005, 1.0)
            .stroke(0.6, 2.7, 1.0, 0.1)
            .scratch(1.0, 30.0, 1.0)
            .tolerance(1.0, 1.0, 1.0, 1.0)
            .grading(0.0, 0.0, 0.15, 0.0, 1.0, 1.0, 0.7, 1.0),
        SbrLayer::named("Outline3", MaskType::MaskReverse)
            .grid(105, 0.005, 1.0)
            .stroke(0.6, 2.7, 1.0, 0.1)
            .scratch(1.0, 30.0, 1.0)
            .tolerance(1.0, 1.0, 1.0, 1.0)
            .grading(0.0, 0.0, 0.15, 0.0, 1.0, 1.0, 0.7, 1.0),
        SbrLayer::named("Skin", MaskType::Mask)
            .grid(1000, 0.01, 1.0)
            .stroke(2.0, 2.7, 1.0, 0.0)
            .scratch(0.1, 0.1, 0.0)
            .tolerance(1.0, 1.0, 1.0, 1.0)
            .grading(0.0, 0.0, 0.15, 0.0, 1.0, 1.0, 0.7, 1.0),
    ];

    settings.cc.input_black = 0.0;
    settings.cc.input_gamma = 1.0;
    settings.cc.input_white = 1.0;
    settings.cc.output_black = 0.0;
    settings.cc.output_white = 1.0;
    settings.cc.mul_lum = 1.2;
    settings.cc.add_lum = 0.0;

    settings.gblur.sample_len = 16;
    settings.gblur.lod = 2;
}

/// Install the watercolor preset along with its bilateral pre-pass tuning.
pub fn apply_wcr(settings: &mut Settings) {
    let wcr = &mut settings.wcr;
    wcr.bleeding = 40.0;
    wcr.opacity = 0.9;
    wcr.hand_tremor_wave_len1 = 5.0;
    wcr.hand_tremor_amplitude1 = 20.0;
    wcr.hand_tremor_wave_len2 = 0.0;
    wcr.hand_tremor_amplitude2 = 0.0;
    wcr.hand_tremor_len = 10.0;
    wcr.hand_tremor_scale = 1.0;
    wcr.hand_tremor_draw_count = 16.0;
    wcr.hand_tremor_overlap_count = 2.0;
    wcr.pigment_dispersion_scale = 1.0;
    wcr.turbulence_flow_wave_len1 = 2.0;
    wcr.turbulence_flow_amplitude1 = 120.0;
    wcr.turbulence_flow_scale1 = 1.5;
    wcr.turbulence_flow_wave_len2 = 0.0;
    wcr.turbulence_flow_amplitude2 = 0.0;
    wcr.turbulence_flow_scale2 = 0.0;
    wcr.edge_darking_len_ratio = 1.0;
    wcr.edge_darking_size = 0.1;
    wcr.edge_darking_scale = 0.5;
    wcr.wet_in_wet_len_ratio = 0.5;
    wcr.wet_in_wet_dark_to_light = true;
    wcr.wet_in_wet_hue_similarity = 10.0;
    wcr.wet_in_wet_low = 0.0;
    wcr.wet_in_wet_high = 0.65;
    wcr.wet_in_wet_wave_len = 300.0;
    wcr.wet_in_wet_amplitude = 20.0;
    wcr.noise_update_time = 0.0333;

    settings.cc.input_black = 0.0;
    settings.cc.input_gamma = 1.0;
    settings.cc.input_white = 1.0;
    settings.cc.output_black = 0.0;
    settings.cc.output_white = 1.0;
    settings.cc.mul_lum = 1.4;
    settings.cc.add_lum = 0.0;

    settings.gblur.sample_len = 16;
    settings.gblur.lod = 2;

    let bf = &mut settings.bf;
    bf.flow_based = false;
    bf.blur_count = 4;
    bf.sample_len = 10.0;
    bf.distance_sigma = 10.0;
    bf.distance_bias = 1.0;
    bf.color_sigma = 2.0;
    bf.color_bias = 64.0;
    bf.step_dir_scale = 2.0;
    bf.step_len_scale = 1.0;
}

/// Install the anisotropic-Kuwahara preset.
pub fn apply_akf(settings: &mut Settings) {
    let akf = &mut settings.akf;
    akf.radius = 16.0;
    akf.mask_radius_ratio = 0.5;
    akf.sharpness = 8.0;
    akf.side_overlap = 1.5;
    akf.center_overlap = 0.3;

    settings.gblur.sample_len = 16;
    settings.gblur.lod = 2;
}

/// Install the standalone bilateral-filter preset.
pub fn apply_bf(settings: &mut Settings) {
    let bf = &mut settings.bf;
    bf.flow_based = false;
    bf.blur_count = 10;
    bf.sample_len = 10.0;
    bf.distance_sigma = 10.0;
    bf.distance_bias = 1.0;
    bf.color_sigma = 1.5;
    bf.color_bias = 64.0;

    settings.gblur.sample_len = 16;
    settings.gblur.lod = 2;
}
