//! The pass and uniform contract between the dispatcher and a kernel backend.
//!
//! Pass identifiers and uniform names are the stable compatibility surface:
//! a backend (the bundled CPU reference, or an external GPU implementation)
//! keys its kernels off [`PassId`] and reads its parameters from the named
//! uniforms bound by the dispatcher before each pass.

use std::collections::HashMap;

use crate::foundation::core::Image;
use crate::foundation::error::{PaintboxError, PaintboxResult};

/// Every filter pass the dispatcher can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassId {
    /// Stroke-based stylization (reads HSV, ORIG, TFM and SOBEL inputs).
    Sbr,
    /// Watercolor wet-in-wet / edge-darkening composite.
    Wcr,
    /// Hand-tremor warp driven by the noise buffers.
    HandTremor,
    /// Bilateral filter step (domain-only when `_BFOrthogonalize` is 1).
    Bf,
    /// Flow-steered bilateral tangent step.
    Fbf,
    /// Anisotropic Kuwahara filter.
    Akf,
    /// Symmetric nearest neighbor.
    Snn,
    /// FXDoG difference-of-Gaussians along the gradient.
    FxDogGradient,
    /// FXDoG smoothing along the tangent, with soft thresholding.
    FxDogTangent,
    /// Per-channel quantization; returns HSV when `_PosterizeReturnHSV` is 1.
    Posterize,
    /// Edge-line overlay from the SOBEL buffer.
    Outline,
    /// 3x3 Sobel gradient, magnitudes carried by `_SobelCarryDigit`.
    Sobel,
    /// Structure-tensor reduction into the flow field.
    Tfm,
    /// Line integral convolution of the flow field.
    Lic,
    /// Gaussian blur, per-pixel weight evaluation.
    GBlur,
    /// Gaussian blur over the precomputed offset/weight tables.
    GBlurTable,
    /// HSV to RGB conversion.
    HsvToRgb,
    /// RGB to the opponent (Lab-style) space.
    RgbToLab,
    /// Opponent space back to RGB.
    LabToRgb,
    /// Four-channel simplex-style noise.
    SNoise,
    /// Three-channel flow noise.
    FNoise,
    /// Voronoi cell noise.
    VNoise,
    /// Temporal blend against the `_LerpBuf` texture.
    Lerp,
}

impl PassId {
    /// Stable pass identifier, part of the backend contract.
    pub fn name(self) -> &'static str {
        match self {
            PassId::Sbr => "SBR",
            PassId::Wcr => "WCR",
            PassId::HandTremor => "HandTremor",
            PassId::Bf => "BF",
            PassId::Fbf => "FBF",
            PassId::Akf => "AKF",
            PassId::Snn => "SNN",
            PassId::FxDogGradient => "FXDoGGradient",
            PassId::FxDogTangent => "FXDoGTangent",
            PassId::Posterize => "Posterize",
            PassId::Outline => "Outline",
            PassId::Sobel => "Sobel3",
            PassId::Tfm => "TFM",
            PassId::Lic => "LIC",
            PassId::GBlur => "GBlur",
            PassId::GBlurTable => "GBlur2",
            PassId::HsvToRgb => "HSV2RGB",
            PassId::RgbToLab => "RGB2LAB",
            PassId::LabToRgb => "LAB2RGB",
            PassId::SNoise => "SNoise",
            PassId::FNoise => "FNoise",
            PassId::VNoise => "VNoise",
            PassId::Lerp => "Lerp",
        }
    }
}

/// A bound uniform value.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    F32(f32),
    I32(i32),
    Vec4([f32; 4]),
    F32Array(Box<[f32]>),
    Vec4Array(Box<[[f32; 4]]>),
}

/// The canonical uniform-name list.
///
/// Binding a name outside this list is a programming error, caught by a debug
/// assertion; backends may use the list to intern property lookups at startup.
pub const UNIFORM_NAMES: &[&str] = &[
    "_CCInBlack", "_CCInGamma", "_CCInWhite", "_CCOutBlack", "_CCOutWhite", "_CCMulLum",
    "_CCAddLum",
    "_SBRLayerCount", "_SBRInvLayerCount", "_SBRLayerEnable", "_SBRMaskType", "_SBRRadius",
    "_SBRTex2Grid", "_SBRProgress", "_SBRDetailThresholdHigh", "_SBRDetailThresholdLow",
    "_SBRStrokeWidth", "_SBRStrokeLen", "_SBRStrokeOpacity", "_SBRStrokeLenRand",
    "_SBRScratchSize", "_SBRScratchOpacity", "_SBRTolerance", "_SBRAdd", "_SBRMul",
    "_SBRInvGridX", "_SBRInvGridY",
    "_WCRBleeding", "_WCROpacity", "_WCRHandTremorLen", "_WCRHandTremorScale",
    "_WCRHandTremorDrawCount", "_WCRHandTremorInvDrawCount", "_WCRHandTremorOverlapCount",
    "_WCRPigmentDispersionScale", "_WCRTurbulenceFlowScale1", "_WCRTurbulenceFlowScale2",
    "_WetInWetLenRatio", "_WetInWetInvLenRatio", "_WetInWetLow", "_WetInWetHigh",
    "_WetInWetDarkToLight", "_WetInWetHueSimilarity",
    "_EdgeDarkingLenRatio", "_EdgeDarkingInvLenRatio", "_EdgeDarkingSize", "_EdgeDarkingScale",
    "_BFSampleLen", "_BFDomainVariance", "_BFRangeVariance", "_BFDomainBias", "_BFRangeBias",
    "_BFRangeThreshold", "_BFOrthogonalize", "_BFStepDirScale", "_BFStepLenScale",
    "_BFRangeWeight",
    "_AKFRadius", "_AKFMaskRadius", "_AKFSharpness", "_AKFOverlapX", "_AKFOverlapY",
    "_AKFSampleStep",
    "_SNNRadius", "_SNNWeight",
    "_PosterizeBins", "_PosterizeInvBins", "_PosterizeReturnHSV",
    "_FXDoGGradientMaxLen", "_FXDoGTangentMaxLen", "_FXDoGGradientVarianceL",
    "_FXDoGGradientVarianceS", "_FXDoGTangentVariance", "_FXDoGSharpness", "_FXDoGSmoothRange",
    "_FXDoGThresholdSlope", "_FXDoGThreshold",
    "_SobelCarryDigit", "_SobelInvCarryDigit",
    "_OutlineSize", "_OutlineInvSize", "_OutlineOpacity", "_OutlineDetail", "_OutlineDensity",
    "_OutlineReverse",
    "_LICScale", "_LICMaxLen", "_LICVariance",
    "_GBlurLOD", "_GBlurTileSize", "_GBlurSampleLen", "_GBlurSize", "_GBlurInvDomainSigma",
    "_GBlurDomainVariance", "_GBlurDomainBias", "_GBlurMean", "_GBlurOffsetX", "_GBlurOffsetY",
    "_GBlurDomainWeight",
    "_SNoiseSize", "_SNoiseScale", "_SNoiseSpeed",
    "_FNoiseSize", "_FNoiseScale", "_FNoiseSpeed",
    "_RuledLineDensity", "_RuledLineInvSize", "_RuledLineRotMat",
    "_LerpRate",
];

/// Texture-binding names resolvable through [`Textures::get`].
pub const TEXTURE_NAMES: &[&str] = &[
    "_RT_ORIG", "_RT_MASK", "_RT_SOBEL", "_RT_TFM", "_RT_OUTLINE", "_RT_SNOISE", "_RT_FNOISE",
    "_RT_SBR_HSV", "_LerpBuf",
];

/// Named-uniform store; the CPU analog of a material's property block.
///
/// Values persist across passes within a frame: early passes may bind values
/// (for example `_SobelInvCarryDigit`) that later passes read.
#[derive(Clone, Debug, Default)]
pub struct Uniforms {
    values: HashMap<&'static str, UniformValue>,
}

impl Uniforms {
    fn set(&mut self, name: &'static str, value: UniformValue) {
        debug_assert!(
            UNIFORM_NAMES.contains(&name),
            "uniform '{name}' is not part of the contract"
        );
        self.values.insert(name, value);
    }

    pub fn set_f32(&mut self, name: &'static str, v: f32) {
        self.set(name, UniformValue::F32(v));
    }

    pub fn set_i32(&mut self, name: &'static str, v: i32) {
        self.set(name, UniformValue::I32(v));
    }

    pub fn set_vec4(&mut self, name: &'static str, v: [f32; 4]) {
        self.set(name, UniformValue::Vec4(v));
    }

    pub fn set_f32_array(&mut self, name: &'static str, v: &[f32]) {
        self.set(name, UniformValue::F32Array(v.into()));
    }

    pub fn set_vec4_array(&mut self, name: &'static str, v: &[[f32; 4]]) {
        self.set(name, UniformValue::Vec4Array(v.into()));
    }

    fn get(&self, name: &str) -> PaintboxResult<&UniformValue> {
        self.values
            .get(name)
            .ok_or_else(|| PaintboxError::validation(format!("uniform '{name}' is not bound")))
    }

    pub fn f32(&self, name: &str) -> PaintboxResult<f32> {
        match self.get(name)? {
            UniformValue::F32(v) => Ok(*v),
            UniformValue::I32(v) => Ok(*v as f32),
            _ => Err(PaintboxError::validation(format!(
                "uniform '{name}' is not a scalar"
            ))),
        }
    }

    pub fn i32(&self, name: &str) -> PaintboxResult<i32> {
        match self.get(name)? {
            UniformValue::I32(v) => Ok(*v),
            _ => Err(PaintboxError::validation(format!(
                "uniform '{name}' is not an integer"
            ))),
        }
    }

    pub fn vec4(&self, name: &str) -> PaintboxResult<[f32; 4]> {
        match self.get(name)? {
            UniformValue::Vec4(v) => Ok(*v),
            _ => Err(PaintboxError::validation(format!(
                "uniform '{name}' is not a vec4"
            ))),
        }
    }

    pub fn f32_array(&self, name: &str) -> PaintboxResult<&[f32]> {
        match self.get(name)? {
            UniformValue::F32Array(v) => Ok(v),
            _ => Err(PaintboxError::validation(format!(
                "uniform '{name}' is not a float array"
            ))),
        }
    }

    pub fn vec4_array(&self, name: &str) -> PaintboxResult<&[[f32; 4]]> {
        match self.get(name)? {
            UniformValue::Vec4Array(v) => Ok(v),
            _ => Err(PaintboxError::validation(format!(
                "uniform '{name}' is not a vec4 array"
            ))),
        }
    }
}

/// Read-only view of the pool's texture bindings during one pass.
pub struct Textures<'a> {
    slots: &'a [Image],
    mask: &'a Image,
    bindings: &'a HashMap<&'static str, usize>,
}

impl<'a> Textures<'a> {
    pub(crate) fn new(
        slots: &'a [Image],
        mask: &'a Image,
        bindings: &'a HashMap<&'static str, usize>,
    ) -> Self {
        Self {
            slots,
            mask,
            bindings,
        }
    }

    /// Resolve a bound texture by contract name.
    pub fn get(&self, name: &str) -> PaintboxResult<&'a Image> {
        if name == "_RT_MASK" {
            return Ok(self.mask);
        }
        let idx = self.bindings.get(name).copied().ok_or_else(|| {
            PaintboxError::validation(format!("texture '{name}' is not bound"))
        })?;
        let img = &self.slots[idx];
        if img.width() == 0 {
            // The slot was taken out as the active destination of this blit.
            return Err(PaintboxError::validation(format!(
                "texture '{name}' aliases the active destination buffer"
            )));
        }
        Ok(img)
    }
}

/// Inputs and output of one pass invocation.
pub struct PassIo<'a> {
    /// The blit source (already bound as the active input).
    pub src: &'a Image,
    /// The blit destination; same size as `src`.
    pub dst: &'a mut Image,
    /// Named uniforms bound so far this frame.
    pub uniforms: &'a Uniforms,
    /// Additional texture inputs for multi-input passes.
    pub textures: Textures<'a>,
}

/// A kernel library executing individual passes.
///
/// Implementations must not assume anything about pass ordering: the
/// dispatcher owns sequencing, and every parameter arrives through
/// [`PassIo::uniforms`] or [`PassIo::textures`].
pub trait PassBackend {
    fn run_pass(&mut self, pass: PassId, io: PassIo<'_>) -> PaintboxResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_types_are_checked() {
        let mut u = Uniforms::default();
        u.set_f32("_AKFRadius", 16.0);
        u.set_i32("_SNNRadius", 8);
        assert_eq!(u.f32("_AKFRadius").unwrap(), 16.0);
        assert_eq!(u.i32("_SNNRadius").unwrap(), 8);
        // Integers widen to f32, but not the other way around.
        assert_eq!(u.f32("_SNNRadius").unwrap(), 8.0);
        assert!(u.i32("_AKFRadius").is_err());
        assert!(u.f32("_BFSampleLen").is_err());
    }

    #[test]
    fn array_uniforms_round_trip() {
        let mut u = Uniforms::default();
        u.set_f32_array("_GBlurOffsetX", &[1.0, 2.0, 3.0]);
        u.set_vec4_array("_SBRTolerance", &[[1.0, 1.0, 1.0, 1.0]]);
        assert_eq!(u.f32_array("_GBlurOffsetX").unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(u.vec4_array("_SBRTolerance").unwrap().len(), 1);
    }

    #[test]
    fn pass_names_are_unique() {
        let all = [
            PassId::Sbr, PassId::Wcr, PassId::HandTremor, PassId::Bf, PassId::Fbf, PassId::Akf,
            PassId::Snn, PassId::FxDogGradient, PassId::FxDogTangent, PassId::Posterize,
            PassId::Outline, PassId::Sobel, PassId::Tfm, PassId::Lic, PassId::GBlur,
            PassId::GBlurTable, PassId::HsvToRgb, PassId::RgbToLab, PassId::LabToRgb,
            PassId::SNoise, PassId::FNoise, PassId::VNoise, PassId::Lerp,
        ];
        let mut names: Vec<_> = all.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }
}
