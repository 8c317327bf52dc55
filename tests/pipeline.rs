//! Pipeline-level behavior: dispatch graphs, selection semantics, the dirty
//! flag, the noise throttle and failure policies, observed through a
//! recording backend.

use paintbox::{
    ALL_EFFECTS, CpuBackend, Effect, Image, PaintboxError, PaintboxResult, PassBackend, PassId,
    PassIo, Pipeline,
};

/// Records the pass stream (and the bilateral leg flag) while acting as a
/// plain copy kernel.
#[derive(Default)]
struct Recorder {
    passes: Vec<PassId>,
    bf_flags: Vec<f32>,
    snoise_count: usize,
}

impl Recorder {
    fn reset(&mut self) {
        self.passes.clear();
        self.bf_flags.clear();
        self.snoise_count = 0;
    }
}

impl PassBackend for Recorder {
    fn run_pass(&mut self, pass: PassId, io: PassIo<'_>) -> PaintboxResult<()> {
        self.passes.push(pass);
        if matches!(pass, PassId::Bf | PassId::Fbf) {
            self.bf_flags.push(io.uniforms.f32("_BFOrthogonalize")?);
        }
        if pass == PassId::SNoise {
            self.snoise_count += 1;
        }
        io.dst.copy_from(io.src)
    }
}

struct FailingBackend;

impl PassBackend for FailingBackend {
    fn run_pass(&mut self, _: PassId, _: PassIo<'_>) -> PaintboxResult<()> {
        Err(PaintboxError::validation("backend down"))
    }
}

fn frame(w: u32, h: u32) -> Image {
    Image::new(w, h).unwrap()
}

fn run_once(pipeline: &mut Pipeline, rec: &mut Recorder) {
    let src = frame(16, 12);
    let mut dst = frame(16, 12);
    pipeline.run_frame(&src, &mut dst, 0.016, rec).unwrap();
}

#[test]
fn akf_graph_runs_the_edge_flow_prefix_then_one_pass() {
    let mut p = Pipeline::new().unwrap();
    p.select(Some(Effect::Akf));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);
    assert_eq!(
        rec.passes,
        vec![PassId::Sobel, PassId::GBlurTable, PassId::Tfm, PassId::Akf]
    );
}

#[test]
fn sbr_graph_posterizes_then_stylizes() {
    let mut p = Pipeline::new().unwrap();
    p.select(Some(Effect::Sbr));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);
    assert_eq!(
        rec.passes,
        vec![
            PassId::Sobel,
            PassId::GBlurTable,
            PassId::Tfm,
            PassId::Posterize,
            PassId::Sbr,
        ]
    );
}

#[test]
fn sbr_with_no_layers_self_heals_instead_of_failing() {
    let mut p = Pipeline::new().unwrap();
    assert!(p.settings().sbr.layers.is_empty());
    p.select(Some(Effect::Sbr));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);
    assert_eq!(p.settings().sbr.layers.len(), 8);
}

#[test]
fn fxdog_graph_runs_gradient_then_tangent() {
    let mut p = Pipeline::new().unwrap();
    p.select(Some(Effect::FxDog));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);
    assert_eq!(
        rec.passes,
        vec![
            PassId::Sobel,
            PassId::GBlurTable,
            PassId::Tfm,
            PassId::FxDogGradient,
            PassId::FxDogTangent,
        ]
    );
}

#[test]
fn snn_graph_posterizes_in_hsv_and_converts_back() {
    let mut p = Pipeline::new().unwrap();
    p.select(Some(Effect::Snn));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);
    assert_eq!(
        rec.passes,
        vec![PassId::Posterize, PassId::Snn, PassId::HsvToRgb]
    );
}

#[test]
fn bf_iterations_alternate_orthogonal_and_tangent_legs() {
    let mut p = Pipeline::new().unwrap();
    p.settings_mut().bf.blur_count = 3;
    p.select(Some(Effect::Bf));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);

    // Prefix, LAB round trip, and 2 legs per iteration.
    assert_eq!(rec.passes[..4].to_vec(), vec![
        PassId::Sobel,
        PassId::GBlurTable,
        PassId::Tfm,
        PassId::RgbToLab,
    ]);
    assert_eq!(*rec.passes.last().unwrap(), PassId::LabToRgb);
    let legs: Vec<_> = rec
        .passes
        .iter()
        .filter(|p| matches!(p, PassId::Bf | PassId::Fbf))
        .collect();
    assert_eq!(legs.len(), 6);
    assert_eq!(rec.bf_flags, vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
}

#[test]
fn flow_based_bf_uses_the_fbf_tangent_pass() {
    let mut p = Pipeline::new().unwrap();
    p.settings_mut().bf.blur_count = 2;
    p.settings_mut().bf.flow_based = true;
    p.select(Some(Effect::Bf));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);
    let legs: Vec<_> = rec
        .passes
        .iter()
        .filter(|p| matches!(p, PassId::Bf | PassId::Fbf))
        .copied()
        .collect();
    assert_eq!(legs, vec![PassId::Bf, PassId::Fbf, PassId::Bf, PassId::Fbf]);
}

#[test]
fn wcr_noise_updates_are_throttled_by_elapsed_time() {
    let mut p = Pipeline::new().unwrap();
    p.settings_mut().wcr.noise_update_time = 0.0333;
    p.select(Some(Effect::Wcr));
    let mut rec = Recorder::default();

    let src = frame(16, 12);
    let mut dst = frame(16, 12);

    // First frame: the accumulator starts saturated, both noise buffers build.
    p.run_frame(&src, &mut dst, 0.0, &mut rec).unwrap();
    assert_eq!(rec.snoise_count, 2);

    // 0.02 elapsed: below the interval, no rebuild.
    rec.reset();
    p.run_frame(&src, &mut dst, 0.02, &mut rec).unwrap();
    assert_eq!(rec.snoise_count, 0);

    // Another 0.02 (total 0.04 >= 0.0333): rebuilds exactly once.
    rec.reset();
    p.run_frame(&src, &mut dst, 0.02, &mut rec).unwrap();
    assert_eq!(rec.snoise_count, 2);

    // The accumulator reset on firing.
    rec.reset();
    p.run_frame(&src, &mut dst, 0.02, &mut rec).unwrap();
    assert_eq!(rec.snoise_count, 0);
}

#[test]
fn selecting_effects_is_mutually_exclusive_for_all_pairs() {
    for &a in ALL_EFFECTS {
        for &b in ALL_EFFECTS {
            if a == b {
                continue;
            }
            let mut p = Pipeline::new().unwrap();
            p.select(Some(a));
            p.select(Some(b));
            let enabled: Vec<_> = ALL_EFFECTS
                .iter()
                .copied()
                .filter(|&e| p.is_enabled(e))
                .collect();
            assert_eq!(enabled, vec![b]);
        }
    }
}

#[test]
fn cycle_forward_installs_presets_and_walks_the_ring() {
    let mut p = Pipeline::new().unwrap();
    p.cycle_forward();
    assert_eq!(p.current_effect(), Some(Effect::Sbr));
    assert_eq!(p.settings().sbr.layers.len(), 8);

    p.cycle_forward();
    assert_eq!(p.current_effect(), Some(Effect::Wcr));
    assert_eq!(p.settings().cc.mul_lum, 1.4);

    p.cycle_forward();
    assert_eq!(p.current_effect(), Some(Effect::Akf));
    p.cycle_forward();
    assert_eq!(p.current_effect(), Some(Effect::Snn));
    p.cycle_forward();
    assert_eq!(p.current_effect(), Some(Effect::Bf));
    assert_eq!(p.settings().bf.blur_count, 10);
    p.cycle_forward();
    assert_eq!(p.current_effect(), Some(Effect::Outline));
    p.cycle_forward();
    assert_eq!(p.current_effect(), Some(Effect::Sbr));
}

#[test]
fn cycling_keeps_user_edited_stroke_layers() {
    let mut p = Pipeline::new().unwrap();
    p.cycle_forward(); // SBR, installs 8 layers
    p.settings_mut().sbr.layers.truncate(3);
    for _ in 0..6 {
        p.cycle_forward(); // all the way around the ring
    }
    assert_eq!(p.current_effect(), Some(Effect::Sbr));
    assert_eq!(p.settings().sbr.layers.len(), 3);
}

#[test]
fn headline_controls_clamp_at_their_bounds() {
    let mut p = Pipeline::new().unwrap();

    p.select(Some(Effect::Akf));
    p.settings_mut().akf.radius = 31.0;
    p.increment();
    assert_eq!(p.settings().akf.radius, 32.0);
    p.increment();
    assert_eq!(p.settings().akf.radius, 32.0);

    p.select(Some(Effect::Snn));
    p.settings_mut().snn.radius = 1;
    p.decrement();
    assert_eq!(p.settings().snn.radius, 1);

    p.select(Some(Effect::Sbr));
    p.settings_mut().sbr.grid_scale = 1.95;
    p.increment();
    assert_eq!(p.settings().sbr.grid_scale, 2.0);

    p.select(None);
    let before = p.settings().clone();
    p.increment();
    p.decrement();
    assert_eq!(*p.settings(), before);
}

#[test]
fn luminance_nudges_clamp_to_their_range() {
    let mut p = Pipeline::new().unwrap();
    p.settings_mut().cc.mul_lum = 1.95;
    p.inc_lum();
    assert_eq!(p.settings().cc.mul_lum, 2.0);
    p.inc_lum();
    assert_eq!(p.settings().cc.mul_lum, 2.0);
    for _ in 0..30 {
        p.dec_lum();
    }
    assert_eq!(p.settings().cc.mul_lum, 0.0);
}

#[test]
fn dirty_survives_a_failed_frame_and_output_is_untouched() {
    let mut p = Pipeline::new().unwrap();
    p.select(Some(Effect::Akf));

    let src = frame(8, 8);
    let mut dst = frame(8, 8);
    dst.fill([0.1, 0.2, 0.3, 1.0]);
    let before = dst.clone();

    assert!(p.run_frame(&src, &mut dst, 0.0, &mut FailingBackend).is_err());
    assert!(p.is_dirty());
    assert_eq!(dst, before);

    // The next good frame recovers.
    let mut rec = Recorder::default();
    p.run_frame(&src, &mut dst, 0.0, &mut rec).unwrap();
    assert!(!p.is_dirty());
}

#[test]
fn derived_uniforms_reach_the_pool_once_dirty() {
    let mut p = Pipeline::new().unwrap();
    p.settings_mut().akf.radius = 24.0;
    p.select(Some(Effect::Akf));
    let mut rec = Recorder::default();
    run_once(&mut p, &mut rec);
    assert_eq!(p.pool().uniforms().f32("_AKFRadius").unwrap(), 24.0);
    // The redesigned overlap formula divides by sin^2(theta).
    let derived = p.derived().akf.clone();
    assert!(derived.overlap_y > 0.0);
    assert_eq!(
        p.pool().uniforms().f32("_AKFOverlapY").unwrap(),
        derived.overlap_y
    );
}

#[test]
fn temporal_blend_ping_pongs_through_the_lerp_ring() {
    let mut p = Pipeline::new().unwrap();
    let mut backend = CpuBackend::new();

    let mut src = frame(4, 4);
    src.fill([0.0, 0.0, 0.0, 1.0]);
    let mut dst = frame(4, 4);
    p.run_frame(&src, &mut dst, 0.0, &mut backend).unwrap();

    // History was seeded with the (black) source; blending a white frame at
    // rate 0.5 meets it halfway.
    let mut white = frame(4, 4);
    white.fill([1.0, 1.0, 1.0, 1.0]);
    p.temporal_blend(&mut white, 0.5, &mut backend).unwrap();
    assert!((white.pixel(2, 2)[0] - 0.5).abs() < 1e-6);

    // The second blend reads the first blend's output from the other buffer.
    let mut white2 = frame(4, 4);
    white2.fill([1.0, 1.0, 1.0, 1.0]);
    p.temporal_blend(&mut white2, 0.5, &mut backend).unwrap();
    assert!((white2.pixel(2, 2)[0] - 0.75).abs() < 1e-6);
}

#[test]
fn mask_effect_copies_the_session_mask() {
    let mut p = Pipeline::new().unwrap();
    let mut rec = Recorder::default();
    let src = frame(8, 8);
    let mut dst = frame(8, 8);
    p.run_frame(&src, &mut dst, 0.0, &mut rec).unwrap();

    let mut mask = frame(8, 8);
    mask.fill([1.0, 0.0, 0.0, 1.0]);
    p.set_mask(mask).unwrap();

    p.select(Some(Effect::Mask));
    p.run_frame(&src, &mut dst, 0.0, &mut rec).unwrap();
    assert_eq!(dst.pixel(3, 3), [1.0, 0.0, 0.0, 1.0]);
}
