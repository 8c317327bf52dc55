//! The pass dispatcher: one fixed blit graph per effect.
//!
//! Pass ordering within a frame is a correctness requirement, not a
//! performance one — later passes read buffers written by earlier ones, and
//! the slot-reuse order per graph is part of the alias contract in
//! [`crate::render::pool`]. Uniform updates are gated on the context dirty
//! flag; blits run every frame.

use tracing::debug;

use crate::foundation::core::Image;
use crate::foundation::error::PaintboxResult;
use crate::params::DerivedParams;
use crate::render::passes::{PassBackend, PassId};
use crate::render::pool::{BufferPool, Role};
use crate::selector::Effect;

/// Digit-shift applied to Sobel output so gradients survive a half-float
/// buffer; downstream passes undo it via `_SobelInvCarryDigit`.
const CARRY_DIGIT: f32 = 10_000.0;

/// Continuous time-based throttle for the watercolor noise buffers.
///
/// Independent of the dirty flag: it accumulates real elapsed time across
/// frames and fires when the configured interval has passed. Starts saturated
/// so the first watercolor frame always builds the buffers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NoiseThrottle {
    elapsed: f32,
}

impl NoiseThrottle {
    pub(crate) fn new() -> Self {
        Self { elapsed: f32::MAX }
    }

    /// Force the next tick to fire (used to reflect edits immediately).
    pub(crate) fn force(&mut self) {
        self.elapsed = f32::MAX;
    }

    /// Accumulate `dt`; returns true (and resets) when `interval` has elapsed.
    pub(crate) fn tick(&mut self, dt: f32, interval: f32) -> bool {
        self.elapsed = self.elapsed + dt;
        if self.elapsed >= interval {
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Borrowed execution context for one frame.
pub(crate) struct Dispatcher<'a> {
    pub pool: &'a mut BufferPool,
    pub params: &'a DerivedParams,
    pub backend: &'a mut dyn PassBackend,
    /// Settings changed since the last successful run.
    pub dirty: bool,
}

impl Dispatcher<'_> {
    /// Execute the selected effect's graph into `out`.
    pub(crate) fn run(
        &mut self,
        effect: Option<Effect>,
        out: &mut Image,
        throttle: &mut NoiseThrottle,
        dt: f32,
    ) -> PaintboxResult<()> {
        self.update_canvas();
        match effect {
            Some(Effect::Sbr) => self.effect_sbr(out),
            Some(Effect::Wcr) => self.effect_wcr(out, throttle, dt),
            Some(Effect::Bf) => self.effect_bf(out),
            Some(Effect::Akf) => self.effect_akf(out),
            Some(Effect::Snn) => self.effect_snn(out),
            Some(Effect::FxDog) => self.effect_fxdog(out),
            Some(Effect::Outline) => self.effect_outline(out),
            Some(Effect::Mask) => self.pool.copy_mask_out(out),
            Some(Effect::Sobel) => self.sobel_out(Role::Work0, out, 1.0),
            Some(Effect::Sst) => self.effect_sst(out),
            Some(Effect::Tfm) => self.effect_tfm(out),
            Some(Effect::Lic) => self.effect_lic(out),
            Some(Effect::GBlur) => self.effect_gblur(out),
            Some(Effect::Posterize) => self.effect_posterize(out),
            Some(Effect::SNoise) => self.effect_snoise(out),
            Some(Effect::FNoise) => self.effect_fnoise(out),
            Some(Effect::VNoise) => self.effect_vnoise(out),
            None => self.pool.copy_out(Role::Work0, out),
        }
    }

    // ---- shared prefix -------------------------------------------------

    /// Sobel between pool buffers, carrying digits for precision.
    fn sobel(&mut self, src: Role, dst: Role) -> PaintboxResult<()> {
        self.sobel_with_carry(src, dst, CARRY_DIGIT)
    }

    fn sobel_with_carry(&mut self, src: Role, dst: Role, carry: f32) -> PaintboxResult<()> {
        self.pool.set_f32("_SobelCarryDigit", carry);
        self.pool.blit(src, dst, PassId::Sobel, self.backend)?;
        // Register the gradient buffer and the digit-drop for later passes.
        self.pool.bind_texture("_RT_SOBEL", Role::Sobel);
        self.pool.set_f32("_SobelInvCarryDigit", 1.0 / carry);
        Ok(())
    }

    fn sobel_out(&mut self, src: Role, dst: &mut Image, carry: f32) -> PaintboxResult<()> {
        self.pool.set_f32("_SobelCarryDigit", carry);
        self.pool.set_f32("_SobelInvCarryDigit", 1.0 / carry);
        self.pool.blit_out(src, dst, PassId::Sobel, self.backend)
    }

    /// Smoothed-structure-tensor prefix shared by most stylization graphs:
    /// gradient, Gaussian relaxation, tensor-field reduction.
    fn sst(&mut self) -> PaintboxResult<()> {
        self.sobel(Role::Work0, Role::Sobel)?;
        self.update_gblur();
        self.gblur(Role::Sobel, Role::Work0)?;
        self.pool.blit(Role::Work0, Role::Tfm, PassId::Tfm, self.backend)?;
        self.pool.bind_texture("_RT_TFM", Role::Tfm);
        Ok(())
    }

    fn gblur_pass(&self) -> PassId {
        if self.params.gblur.use_precalc {
            PassId::GBlurTable
        } else {
            PassId::GBlur
        }
    }

    fn gblur(&mut self, src: Role, dst: Role) -> PaintboxResult<()> {
        let pass = self.gblur_pass();
        self.pool.blit(src, dst, pass, self.backend)
    }

    fn gblur_out(&mut self, src: Role, dst: &mut Image) -> PaintboxResult<()> {
        let pass = self.gblur_pass();
        self.pool.blit_out(src, dst, pass, self.backend)
    }

    // ---- effect graphs -------------------------------------------------

    fn effect_sbr(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.sst()?;
        self.update_posterize(true);
        self.pool
            .blit(Role::Orig, Role::SbrHsv, PassId::Posterize, self.backend)?;

        // The stylization pass reads four inputs at once: HSV source,
        // original, tensor field, and gradient magnitude.
        self.update_sbr();
        self.pool.bind_texture("_RT_SBR_HSV", Role::SbrHsv);
        self.pool.blit_out(Role::SbrHsv, out, PassId::Sbr, self.backend)
    }

    fn effect_wcr(
        &mut self,
        out: &mut Image,
        throttle: &mut NoiseThrottle,
        dt: f32,
    ) -> PaintboxResult<()> {
        // Noise generation is expensive; rebuild only on the configured
        // interval, not every frame.
        if throttle.tick(dt, self.params.wcr.noise_update_time) {
            debug!(interval = self.params.wcr.noise_update_time, "rebuilding watercolor noise");
            self.render_noise_buffers()?;
        }

        self.effect_bf_into(Role::Work0)?;
        self.update_hand_tremor();
        self.pool
            .blit(Role::Work0, Role::Work4, PassId::HandTremor, self.backend)?;
        self.pool.copy(Role::Work4, Role::Work0)?;

        self.sst()?;
        self.update_wcr();
        self.pool.blit_out(Role::Work4, out, PassId::Wcr, self.backend)
    }

    fn render_noise_buffers(&mut self) -> PaintboxResult<()> {
        let wcr = &self.params.wcr;
        self.pool.set_vec4("_SNoiseSize", wcr.snoise1.size);
        self.pool.set_vec4("_SNoiseScale", wcr.snoise1.scale);
        self.pool.set_vec4("_SNoiseSpeed", wcr.snoise1.speed);
        self.pool.bind_texture("_RT_SNOISE", Role::SNoise);
        self.pool
            .blit(Role::Orig, Role::SNoise, PassId::SNoise, self.backend)?;

        self.pool.set_vec4("_SNoiseSize", wcr.snoise2.size);
        self.pool.set_vec4("_SNoiseScale", wcr.snoise2.scale);
        self.pool.set_vec4("_SNoiseSpeed", wcr.snoise2.speed);
        self.pool.bind_texture("_RT_FNOISE", Role::FNoise);
        self.pool
            .blit(Role::Orig, Role::FNoise, PassId::SNoise, self.backend)
    }

    /// Full bilateral graph ending in a pool buffer (the watercolor pre-pass).
    fn effect_bf_into(&mut self, dst: Role) -> PaintboxResult<()> {
        self.sst()?;
        self.pool
            .blit(Role::Orig, Role::Work0, PassId::RgbToLab, self.backend)?;
        self.update_bf();
        self.bf_loop()?;
        self.pool.blit(Role::Work3, dst, PassId::LabToRgb, self.backend)
    }

    fn effect_bf(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.sst()?;
        self.pool
            .blit(Role::Orig, Role::Work0, PassId::RgbToLab, self.backend)?;
        self.update_bf();
        self.bf_loop()?;
        self.pool.blit_out(Role::Work3, out, PassId::LabToRgb, self.backend)
    }

    /// Iterative two-stage diffusion: each round runs a domain-only
    /// "orthogonal" step then a range+domain "tangent" step, the round's
    /// output feeding the next round. The asymmetry is intentional.
    fn bf_loop(&mut self) -> PaintboxResult<()> {
        let tangent_pass = if self.params.bf.flow_based {
            PassId::Fbf
        } else {
            PassId::Bf
        };
        let mut src = Role::Work0;
        for _ in 0..self.params.bf.blur_count {
            self.pool.set_f32("_BFOrthogonalize", 1.0);
            self.pool.blit(src, Role::Work4, PassId::Bf, self.backend)?;

            self.pool.set_f32("_BFOrthogonalize", 0.0);
            self.pool
                .blit(Role::Work4, Role::Work3, tangent_pass, self.backend)?;

            src = Role::Work3;
        }
        Ok(())
    }

    fn effect_akf(&mut self, out: &mut Image) -> PaintboxResult<()> {
        // Without the Gaussian relaxation in the prefix this degenerates to a
        // plain Kuwahara look.
        self.sst()?;
        self.update_akf();
        self.pool.blit_out(Role::Work0, out, PassId::Akf, self.backend)
    }

    fn effect_snn(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.update_posterize(true);
        self.pool
            .blit(Role::Work0, Role::Work3, PassId::Posterize, self.backend)?;
        self.update_snn();
        self.pool
            .blit(Role::Work3, Role::Work0, PassId::Snn, self.backend)?;
        self.pool.blit_out(Role::Work0, out, PassId::HsvToRgb, self.backend)
    }

    fn effect_fxdog(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.sst()?;
        self.update_fxdog();
        self.pool
            .blit(Role::Work0, Role::Work3, PassId::FxDogGradient, self.backend)?;
        self.pool
            .blit_out(Role::Work3, out, PassId::FxDogTangent, self.backend)
    }

    fn effect_outline(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.sobel(Role::Work0, Role::Sobel)?;
        self.update_outline();
        self.pool.blit_out(Role::Orig, out, PassId::Outline, self.backend)?;
        // Register the line buffer for any pass that follows this frame.
        self.pool.bind_texture("_RT_OUTLINE", Role::OutlineBuf);
        Ok(())
    }

    fn effect_sst(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.sobel(Role::Work0, Role::Sobel)?;
        self.update_gblur();
        self.gblur_out(Role::Sobel, out)
    }

    fn effect_tfm(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.sst()?;
        self.pool.copy_out(Role::Tfm, out)
    }

    fn effect_lic(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.sst()?;
        self.update_lic();
        self.pool.blit_out(Role::Tfm, out, PassId::Lic, self.backend)
    }

    fn effect_gblur(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.update_gblur();
        self.gblur_out(Role::Work0, out)
    }

    fn effect_posterize(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.update_posterize(false);
        self.pool.blit_out(Role::Work0, out, PassId::Posterize, self.backend)
    }

    fn effect_snoise(&mut self, out: &mut Image) -> PaintboxResult<()> {
        let pack = &self.params.snoise;
        self.pool.set_vec4("_SNoiseSize", pack.size);
        self.pool.set_vec4("_SNoiseScale", pack.scale);
        self.pool.set_vec4("_SNoiseSpeed", pack.speed);
        self.pool.bind_texture("_RT_SNOISE", Role::SNoise);
        self.pool.blit_out(Role::Orig, out, PassId::SNoise, self.backend)
    }

    fn effect_fnoise(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.update_fnoise();
        self.pool.blit_out(Role::Orig, out, PassId::FNoise, self.backend)
    }

    fn effect_vnoise(&mut self, out: &mut Image) -> PaintboxResult<()> {
        self.pool.blit_out(Role::Orig, out, PassId::VNoise, self.backend)
    }

    /// Temporal blend over the lerp ring: the previous blend result feeds the
    /// next one through alternating buffers.
    pub(crate) fn render_lerp(
        &mut self,
        src: Role,
        out: &mut Image,
        rate: f32,
        flag: &mut bool,
    ) -> PaintboxResult<()> {
        let (input, output) = if *flag {
            (Role::Lerp1, Role::Lerp2)
        } else {
            (Role::Lerp2, Role::Lerp1)
        };
        *flag = !*flag;

        self.pool.bind_texture("_LerpBuf", input);
        self.pool.set_f32("_LerpRate", rate);
        self.pool.blit(src, output, PassId::Lerp, self.backend)?;
        self.pool.copy_out(output, out)
    }

    // ---- dirty-gated uniform updates ----------------------------------

    fn update_canvas(&mut self) {
        if !self.dirty {
            return;
        }
        let c = &self.params.canvas;
        self.pool.set_f32("_RuledLineDensity", c.ruled_line_density);
        self.pool.set_f32("_RuledLineInvSize", c.ruled_line_inv_size);
        self.pool.set_vec4("_RuledLineRotMat", c.ruled_line_rot);
    }

    fn update_sbr(&mut self) {
        if !self.dirty {
            return;
        }
        let sbr = &self.params.sbr;
        self.pool.set_i32("_SBRLayerCount", sbr.count as i32);
        self.pool.set_f32("_SBRInvLayerCount", sbr.inv_layer_count);
        self.pool.set_f32_array("_SBRLayerEnable", &sbr.enable);
        self.pool.set_f32_array("_SBRMaskType", &sbr.mask_type);
        self.pool.set_f32_array("_SBRRadius", &sbr.radius);
        self.pool.set_vec4_array("_SBRTex2Grid", &sbr.tex2grid);
        self.pool.set_vec4_array("_SBRProgress", &sbr.progress);
        self.pool
            .set_f32_array("_SBRDetailThresholdHigh", &sbr.detail_threshold_high);
        self.pool
            .set_f32_array("_SBRDetailThresholdLow", &sbr.detail_threshold_low);
        self.pool.set_f32_array("_SBRStrokeWidth", &sbr.stroke_width);
        self.pool.set_f32_array("_SBRStrokeLen", &sbr.stroke_len);
        self.pool.set_f32_array("_SBRStrokeOpacity", &sbr.stroke_opacity);
        self.pool.set_f32_array("_SBRStrokeLenRand", &sbr.stroke_len_rand);
        self.pool.set_vec4_array("_SBRScratchSize", &sbr.scratch_size);
        self.pool.set_f32_array("_SBRScratchOpacity", &sbr.scratch_opacity);
        self.pool.set_vec4_array("_SBRTolerance", &sbr.tolerance);
        self.pool.set_vec4_array("_SBRAdd", &sbr.add);
        self.pool.set_vec4_array("_SBRMul", &sbr.mul);
        self.pool.set_f32_array("_SBRInvGridX", &sbr.inv_grid_x);
        self.pool.set_f32_array("_SBRInvGridY", &sbr.inv_grid_y);
    }

    fn update_hand_tremor(&mut self) {
        if !self.dirty {
            return;
        }
        let wcr = &self.params.wcr;
        self.pool.set_f32("_WCRBleeding", wcr.bleeding);
        self.pool.set_f32("_WCROpacity", wcr.opacity);
        self.pool.set_f32("_WCRHandTremorLen", wcr.hand_tremor_len);
        self.pool.set_f32("_WCRHandTremorScale", wcr.hand_tremor_scale);
        self.pool
            .set_f32("_WCRHandTremorDrawCount", wcr.hand_tremor_draw_count);
        self.pool
            .set_f32("_WCRHandTremorInvDrawCount", wcr.hand_tremor_inv_draw_count);
        self.pool
            .set_f32("_WCRHandTremorOverlapCount", wcr.hand_tremor_overlap_count);
        self.pool
            .set_f32("_WCRPigmentDispersionScale", wcr.pigment_dispersion_scale);
        self.pool
            .set_f32("_WCRTurbulenceFlowScale1", wcr.turbulence_flow_scale1);
        self.pool
            .set_f32("_WCRTurbulenceFlowScale2", wcr.turbulence_flow_scale2);
    }

    fn update_wcr(&mut self) {
        if !self.dirty {
            return;
        }
        let wcr = &self.params.wcr;
        self.pool.set_f32("_WetInWetLenRatio", wcr.wet_in_wet_len_ratio);
        self.pool
            .set_f32("_WetInWetInvLenRatio", wcr.wet_in_wet_inv_len_ratio);
        self.pool.set_f32("_WetInWetLow", wcr.wet_in_wet_low);
        self.pool.set_f32("_WetInWetHigh", wcr.wet_in_wet_high);
        self.pool
            .set_f32("_WetInWetDarkToLight", wcr.wet_in_wet_dark_to_light);
        self.pool
            .set_f32("_WetInWetHueSimilarity", wcr.wet_in_wet_hue_similarity);
        self.pool
            .set_f32("_EdgeDarkingLenRatio", wcr.edge_darking_len_ratio);
        self.pool
            .set_f32("_EdgeDarkingInvLenRatio", wcr.edge_darking_inv_len_ratio);
        self.pool.set_f32("_EdgeDarkingSize", wcr.edge_darking_size);
        self.pool.set_f32("_EdgeDarkingScale", wcr.edge_darking_scale);
    }

    fn update_bf(&mut self) {
        if !self.dirty {
            return;
        }
        let bf = &self.params.bf;
        self.pool.set_f32("_BFSampleLen", bf.sample_len);
        self.pool.set_f32("_BFDomainVariance", bf.domain_variance);
        self.pool.set_f32("_BFDomainBias", bf.domain_bias);
        self.pool.set_f32("_BFRangeVariance", bf.range_variance);
        self.pool.set_f32("_BFRangeBias", bf.range_bias);
        self.pool.set_f32("_BFRangeThreshold", bf.range_threshold);
        self.pool.set_f32("_BFStepDirScale", bf.step_dir_scale);
        self.pool.set_f32("_BFStepLenScale", bf.step_len_scale);
        if bf.use_precalc {
            self.pool.set_f32_array("_BFRangeWeight", &bf.range_weight[..]);
        }
    }

    fn update_akf(&mut self) {
        if !self.dirty {
            return;
        }
        let akf = &self.params.akf;
        self.pool.set_f32("_AKFRadius", akf.radius);
        self.pool.set_f32("_AKFMaskRadius", akf.mask_radius);
        self.pool.set_f32("_AKFSharpness", akf.sharpness);
        self.pool.set_i32("_AKFSampleStep", akf.sample_step as i32);
        self.pool.set_f32("_AKFOverlapX", akf.overlap_x);
        self.pool.set_f32("_AKFOverlapY", akf.overlap_y);
    }

    fn update_snn(&mut self) {
        if !self.dirty {
            return;
        }
        let snn = &self.params.snn;
        self.pool.set_i32("_SNNRadius", snn.radius);
        self.pool.set_f32("_SNNWeight", snn.weight);
    }

    fn update_posterize(&mut self, return_hsv: bool) {
        // The HSV flag depends on the calling graph, so it is bound even on
        // clean frames; the bin counts stay dirty-gated.
        self.pool
            .set_f32("_PosterizeReturnHSV", if return_hsv { 1.0 } else { 0.0 });
        if !self.dirty {
            return;
        }
        let pst = &self.params.posterize;
        self.pool.set_f32("_PosterizeBins", pst.bins);
        self.pool.set_f32("_PosterizeInvBins", pst.inv_bins);
    }

    fn update_fxdog(&mut self) {
        if !self.dirty {
            return;
        }
        let fxdog = &self.params.fxdog;
        self.pool.set_f32("_FXDoGGradientMaxLen", fxdog.gradient_max_len);
        self.pool.set_f32("_FXDoGTangentMaxLen", fxdog.tangent_max_len);
        self.pool
            .set_f32("_FXDoGGradientVarianceL", fxdog.gradient_variance_l);
        self.pool
            .set_f32("_FXDoGGradientVarianceS", fxdog.gradient_variance_s);
        self.pool.set_f32("_FXDoGTangentVariance", fxdog.tangent_variance);
        self.pool.set_f32("_FXDoGSharpness", fxdog.sharpness);
        self.pool.set_f32("_FXDoGSmoothRange", fxdog.smooth_range);
        self.pool.set_f32("_FXDoGThresholdSlope", fxdog.threshold_slope);
        self.pool.set_f32("_FXDoGThreshold", fxdog.threshold);
    }

    fn update_outline(&mut self) {
        if !self.dirty {
            return;
        }
        let ol = &self.params.outline;
        self.pool.set_f32("_OutlineSize", ol.size);
        self.pool.set_f32("_OutlineInvSize", ol.inv_size);
        self.pool.set_f32("_OutlineOpacity", ol.opacity);
        self.pool.set_f32("_OutlineDetail", ol.detail);
        self.pool.set_f32("_OutlineDensity", ol.density);
        self.pool.set_f32("_OutlineReverse", ol.reverse);
    }

    fn update_lic(&mut self) {
        if !self.dirty {
            return;
        }
        let lic = &self.params.lic;
        self.pool.set_f32("_LICScale", lic.scale);
        self.pool.set_f32("_LICMaxLen", lic.max_len);
        self.pool.set_f32("_LICVariance", lic.variance);
    }

    fn update_gblur(&mut self) {
        if !self.dirty {
            return;
        }
        let gb = &self.params.gblur;
        self.pool.set_i32("_GBlurLOD", gb.lod as i32);
        self.pool.set_i32("_GBlurTileSize", gb.tile_size as i32);
        self.pool.set_i32("_GBlurSampleLen", gb.sample_len as i32);
        self.pool.set_i32("_GBlurSize", gb.blur_size as i32);
        self.pool.set_f32("_GBlurInvDomainSigma", gb.inv_domain_sigma);
        self.pool.set_f32("_GBlurDomainVariance", gb.domain_variance);
        self.pool.set_f32("_GBlurDomainBias", gb.domain_bias);
        self.pool.set_f32("_GBlurMean", gb.mean);
        if gb.use_precalc {
            self.pool.set_f32_array("_GBlurOffsetX", &gb.offset_x[..]);
            self.pool.set_f32_array("_GBlurOffsetY", &gb.offset_y[..]);
            self.pool.set_f32_array("_GBlurDomainWeight", &gb.domain_weight[..]);
        }
    }

    fn update_fnoise(&mut self) {
        if !self.dirty {
            return;
        }
        let pack = &self.params.fnoise;
        self.pool.set_vec4("_FNoiseSize", pack.size);
        self.pool.set_vec4("_FNoiseScale", pack.scale);
        self.pool.set_vec4("_FNoiseSpeed", pack.speed);
        self.pool.bind_texture("_RT_FNOISE", Role::FNoise);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_fires_once_per_interval_and_resets() {
        let mut t = NoiseThrottle::new();
        // Starts saturated: the first tick always fires.
        assert!(t.tick(0.0, 0.0333));
        assert_eq!(t.elapsed(), 0.0);
        // 0.02 < 0.0333: no fire.
        assert!(!t.tick(0.02, 0.0333));
        // 0.04 >= 0.0333: fires exactly once and resets.
        assert!(t.tick(0.02, 0.0333));
        assert_eq!(t.elapsed(), 0.0);
        assert!(!t.tick(0.02, 0.0333));
    }

    #[test]
    fn throttle_force_saturates() {
        let mut t = NoiseThrottle::new();
        assert!(t.tick(0.0, 1.0));
        assert!(!t.tick(0.1, 1.0));
        t.force();
        assert!(t.tick(0.0, 1.0));
    }
}
