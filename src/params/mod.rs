//! Pure derivation of GPU-facing parameter records from editable settings.
//!
//! `DerivedParams::derive` is deterministic and side-effect free; the pipeline
//! calls it only when the dirty flag is set (settings edited or resolution
//! changed) and reuses the records unchanged otherwise. That skip is a
//! performance contract, not a hint: the Gaussian and range-weight tables are
//! O(kernel²) to rebuild and must not be recomputed per frame.

mod blur;
mod color;
mod edge;
mod noise;
mod smooth;
mod stroke;

pub use blur::{GBLUR_TABLE_LEN, GBlurParams};
pub use color::{CanvasParams, CcParams, PosterizeParams};
pub use edge::{FxDogParams, LicParams, OutlineParams};
pub use noise::NoisePack;
pub use smooth::{AkfParams, BF_RANGE_TABLE_LEN, BfParams, SnnParams};
pub use stroke::{SbrParams, WcrParams};

use crate::settings::{SBR_LAYER_MAX, Settings};

/// Every algorithm's derived record, rebuilt as one unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedParams {
    pub cc: CcParams,
    pub canvas: CanvasParams,
    pub posterize: PosterizeParams,
    pub sbr: SbrParams,
    pub wcr: WcrParams,
    pub bf: BfParams,
    pub akf: AkfParams,
    pub snn: SnnParams,
    pub fxdog: FxDogParams,
    pub outline: OutlineParams,
    pub lic: LicParams,
    pub gblur: GBlurParams,
    pub snoise: NoisePack,
    pub fnoise: NoisePack,
}

impl DerivedParams {
    /// Derive all records for the given settings and frame resolution.
    pub fn derive(settings: &Settings, width: u32, height: u32) -> Self {
        Self {
            cc: CcParams::derive(&settings.cc),
            canvas: CanvasParams::derive(&settings.canvas),
            posterize: PosterizeParams::derive(&settings.posterize),
            sbr: SbrParams::derive(&settings.sbr, SBR_LAYER_MAX, width, height),
            wcr: WcrParams::derive(&settings.wcr, &settings.canvas),
            bf: BfParams::derive(&settings.bf),
            akf: AkfParams::derive(&settings.akf),
            snn: SnnParams::derive(&settings.snn),
            fxdog: FxDogParams::derive(&settings.fxdog),
            outline: OutlineParams::derive(&settings.outline),
            lic: LicParams::derive(&settings.lic),
            gblur: GBlurParams::derive(&settings.gblur),
            snoise: NoisePack::from_snoise(&settings.snoise),
            fnoise: NoisePack::from_fnoise(&settings.fnoise),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::defaults;

    #[test]
    fn derivation_is_idempotent() {
        let mut settings = Settings::default();
        defaults::apply_sbr(&mut settings);
        let a = DerivedParams::derive(&settings, 1920, 1080);
        let b = DerivedParams::derive(&settings, 1920, 1080);
        assert_eq!(a, b);
    }

    #[test]
    fn resolution_changes_the_stroke_record_only_where_expected() {
        let mut settings = Settings::default();
        defaults::apply_sbr(&mut settings);
        let a = DerivedParams::derive(&settings, 1920, 1080);
        let b = DerivedParams::derive(&settings, 1080, 1920);
        assert_ne!(a.sbr, b.sbr);
        assert_eq!(a.gblur, b.gblur);
        assert_eq!(a.akf, b.akf);
    }
}
