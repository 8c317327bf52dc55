//! Derived records for the edge-stylization family: FXDoG, outline, LIC.

use crate::settings::{FxDogSettings, LicSettings, OutlineSettings};

/// Scale factor between the two difference-of-Gaussians kernels; 1.6
/// approximates a Laplacian of Gaussian.
const DIFF_KERNEL_SCALE: f32 = 1.6;

/// Flow-based extended difference-of-Gaussians uniforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FxDogParams {
    pub gradient_max_len: f32,
    pub tangent_max_len: f32,
    /// `1 / (2 * abstractness^2)` — the larger DoG kernel.
    pub gradient_variance_l: f32,
    /// `1 / (2 * (abstractness * 1.6)^2)` — the smaller DoG kernel.
    pub gradient_variance_s: f32,
    /// `1 / (2 * coherence^2)`.
    pub tangent_variance: f32,
    pub sharpness: f32,
    pub smooth_range: f32,
    pub threshold_slope: f32,
    pub threshold: f32,
}

impl FxDogParams {
    pub fn derive(fxdog: &FxDogSettings) -> Self {
        let gradient_sigma_s = fxdog.abstractness * DIFF_KERNEL_SCALE;
        Self {
            gradient_max_len: fxdog.contrast * fxdog.abstractness,
            tangent_max_len: fxdog.smoothness * fxdog.coherence,
            gradient_variance_l: 1.0 / (fxdog.abstractness * fxdog.abstractness * 2.0),
            gradient_variance_s: 1.0 / (gradient_sigma_s * gradient_sigma_s * 2.0),
            tangent_variance: 1.0 / (fxdog.coherence * fxdog.coherence * 2.0),
            sharpness: fxdog.sharpness,
            smooth_range: fxdog.smooth_range,
            threshold_slope: fxdog.threshold_slope * 0.01,
            threshold: fxdog.threshold,
        }
    }
}

/// Outline uniforms. Density is fixed by the kernel design.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutlineParams {
    pub size: f32,
    pub inv_size: f32,
    pub opacity: f32,
    pub detail: f32,
    pub density: f32,
    pub reverse: f32,
}

impl OutlineParams {
    pub fn derive(ol: &OutlineSettings) -> Self {
        Self {
            size: ol.size,
            inv_size: 1.0 / ol.size,
            opacity: ol.opacity,
            detail: ol.detail,
            density: 5.0,
            reverse: 1.0,
        }
    }
}

/// Line-integral-convolution uniforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LicParams {
    pub scale: f32,
    pub max_len: f32,
    /// `1 / (2 * sigma^2)`.
    pub variance: f32,
}

impl LicParams {
    pub fn derive(lic: &LicSettings) -> Self {
        Self {
            scale: lic.scale,
            max_len: lic.sigma,
            variance: 1.0 / (lic.sigma * lic.sigma * 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fxdog_small_kernel_is_scaled_by_1_6() {
        let s = FxDogSettings::default();
        let p = FxDogParams::derive(&s);
        let sigma_s = s.abstractness * 1.6;
        assert!((p.gradient_variance_s - 1.0 / (2.0 * sigma_s * sigma_s)).abs() < 1e-7);
        assert!((p.gradient_max_len - s.contrast * s.abstractness).abs() < 1e-6);
    }

    #[test]
    fn outline_inverse_size_matches() {
        let p = OutlineParams::derive(&OutlineSettings {
            size: 4.0,
            ..OutlineSettings::default()
        });
        assert!((p.size * p.inv_size - 1.0).abs() < 1e-6);
        assert_eq!(p.density, 5.0);
    }
}
