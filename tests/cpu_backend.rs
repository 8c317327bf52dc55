//! End-to-end runs of every effect through the bundled CPU backend.

use paintbox::{ALL_EFFECTS, CpuBackend, Effect, Image, Pipeline};

/// A small test card with gradients, blocks and an edge, so edge- and
/// flow-driven kernels have something to chew on.
fn test_card(w: u32, h: u32) -> Image {
    let mut img = Image::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            let fx = x as f32 / w as f32;
            let fy = y as f32 / h as f32;
            let block = if x > w / 2 { 0.9 } else { 0.2 };
            img.set_pixel(x, y, [fx, fy, block, 1.0]);
        }
    }
    img
}

#[test]
fn every_effect_renders_finite_output() {
    let src = test_card(24, 18);
    for &effect in ALL_EFFECTS {
        let mut pipeline = Pipeline::new().unwrap();
        pipeline.select(Some(effect));
        let mut backend = CpuBackend::new();
        let mut dst = Image::new(24, 18).unwrap();

        // Two frames: a dirty one (uniform updates run) and a clean one
        // (bound state persists, derivation is skipped).
        for _ in 0..2 {
            pipeline
                .run_frame(&src, &mut dst, 0.016, &mut backend)
                .unwrap_or_else(|e| panic!("{effect:?}: {e}"));
        }
        assert!(
            dst.data().iter().all(|v| v.is_finite()),
            "{effect:?} produced non-finite samples"
        );
    }
}

#[test]
fn no_effect_passes_the_source_through() {
    let src = test_card(16, 16);
    let mut pipeline = Pipeline::new().unwrap();
    let mut backend = CpuBackend::new();
    let mut dst = Image::new(16, 16).unwrap();
    pipeline.run_frame(&src, &mut dst, 0.016, &mut backend).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn gblur_keeps_a_constant_image_constant() {
    let mut src = Image::new(16, 16).unwrap();
    src.fill([0.3, 0.5, 0.7, 1.0]);
    let mut pipeline = Pipeline::new().unwrap();
    pipeline.select(Some(Effect::GBlur));
    let mut backend = CpuBackend::new();
    let mut dst = Image::new(16, 16).unwrap();
    pipeline.run_frame(&src, &mut dst, 0.016, &mut backend).unwrap();
    let px = dst.pixel(8, 8);
    for c in 0..4 {
        assert!((px[c] - src.pixel(8, 8)[c]).abs() < 1e-4);
    }
}

#[test]
fn posterize_limits_the_channel_levels() {
    let src = test_card(32, 8);
    let mut pipeline = Pipeline::new().unwrap();
    pipeline.settings_mut().posterize.bins = 4;
    pipeline.select(Some(Effect::Posterize));
    let mut backend = CpuBackend::new();
    let mut dst = Image::new(32, 8).unwrap();
    pipeline.run_frame(&src, &mut dst, 0.016, &mut backend).unwrap();

    let mut reds: Vec<i32> = dst
        .data()
        .chunks_exact(4)
        .map(|px| (px[0] * 100.0).round() as i32)
        .collect();
    reds.sort_unstable();
    reds.dedup();
    assert!(reds.len() <= 4, "expected at most 4 red levels, got {reds:?}");
}

#[test]
fn outline_leaves_flat_regions_untouched() {
    let mut src = Image::new(16, 16).unwrap();
    src.fill([0.5, 0.5, 0.5, 1.0]);
    let mut pipeline = Pipeline::new().unwrap();
    pipeline.select(Some(Effect::Outline));
    let mut backend = CpuBackend::new();
    let mut dst = Image::new(16, 16).unwrap();
    pipeline.run_frame(&src, &mut dst, 0.016, &mut backend).unwrap();
    let px = dst.pixel(8, 8);
    for c in 0..3 {
        assert!((px[c] - 0.5).abs() < 1e-5, "flat field darkened: {px:?}");
    }
}

#[test]
fn sobel_effect_highlights_the_block_edge() {
    let src = test_card(24, 18);
    let mut pipeline = Pipeline::new().unwrap();
    pipeline.select(Some(Effect::Sobel));
    let mut backend = CpuBackend::new();
    let mut dst = Image::new(24, 18).unwrap();
    pipeline.run_frame(&src, &mut dst, 0.016, &mut backend).unwrap();

    // The vertical block edge sits at x = w/2; magnitude (alpha) spikes there
    // relative to the flat interior.
    let edge = dst.pixel(12, 9)[3].abs();
    let flat = dst.pixel(4, 9)[3].abs();
    assert!(edge > flat);
}

#[test]
fn wcr_respects_opacity_zero() {
    let src = test_card(20, 14);
    let mut pipeline = Pipeline::new().unwrap();
    pipeline.settings_mut().wcr.opacity = 0.0;
    pipeline.select(Some(Effect::Wcr));
    let mut backend = CpuBackend::new();
    let mut dst = Image::new(20, 14).unwrap();
    pipeline.run_frame(&src, &mut dst, 0.016, &mut backend).unwrap();
    // Zero opacity composites the untouched original back out.
    for (a, b) in dst.data().iter().zip(src.data().iter()) {
        assert!((a - b).abs() < 1e-4);
    }
}

#[test]
fn akf_smooths_more_with_larger_radius() {
    let src = test_card(24, 18);

    let render = |radius: f32| -> Image {
        let mut pipeline = Pipeline::new().unwrap();
        pipeline.settings_mut().akf.radius = radius;
        pipeline.select(Some(Effect::Akf));
        let mut dst = Image::new(24, 18).unwrap();
        let mut backend = CpuBackend::new();
        pipeline
            .run_frame(&src, &mut dst, 0.016, &mut backend)
            .unwrap();
        dst
    };

    let small = render(4.0);
    let large = render(16.0);

    // Total variation across the block edge shrinks as the radius grows.
    let variation = |img: &Image| -> f32 {
        let mut v = 0.0;
        for x in 1..24i64 {
            let a = img.pixel(x, 9);
            let b = img.pixel(x - 1, 9);
            v += (a[2] - b[2]).abs();
        }
        v
    };
    assert!(variation(&large) <= variation(&small) + 1e-3);
}
