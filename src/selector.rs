//! The effect selector: which single algorithm is current.
//!
//! Selection is mutually exclusive by construction — the state is one
//! `Option<Effect>`, so enabling an effect atomically disables every other
//! one and the last selection request wins.

use crate::settings::{AkfSettings, BfSettings, OutlineSettings, SbrSettings, Settings, SnnSettings, WcrSettings};

/// Every selectable algorithm. `None` is represented by `Option<Effect>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Stroke-based rendering.
    Sbr,
    /// Watercolor rendering.
    Wcr,
    /// Bilateral / flow-based filter.
    Bf,
    /// Anisotropic Kuwahara filter.
    Akf,
    /// Symmetric nearest neighbor.
    Snn,
    /// Flow-based extended difference-of-Gaussians.
    FxDog,
    /// Edge outline overlay.
    Outline,
    /// Mask buffer visualization.
    Mask,
    /// Sobel gradient visualization.
    Sobel,
    /// Smoothed-structure-tensor visualization.
    Sst,
    /// Tensor-field visualization.
    Tfm,
    /// Line integral convolution of the flow field.
    Lic,
    /// Gaussian blur.
    GBlur,
    /// Posterization.
    Posterize,
    /// Simplex-style noise.
    SNoise,
    /// Flow noise.
    FNoise,
    /// Voronoi noise.
    VNoise,
}

/// All effects, in declaration order (test and iteration helper).
pub const ALL_EFFECTS: &[Effect] = &[
    Effect::Sbr,
    Effect::Wcr,
    Effect::Bf,
    Effect::Akf,
    Effect::Snn,
    Effect::FxDog,
    Effect::Outline,
    Effect::Mask,
    Effect::Sobel,
    Effect::Sst,
    Effect::Tfm,
    Effect::Lic,
    Effect::GBlur,
    Effect::Posterize,
    Effect::SNoise,
    Effect::FNoise,
    Effect::VNoise,
];

/// Exclusive-selection state machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectSelector {
    current: Option<Effect>,
}

impl EffectSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected effect, if any.
    pub fn current(&self) -> Option<Effect> {
        self.current
    }

    /// True iff `effect` is the one enabled effect.
    pub fn is_enabled(&self, effect: Effect) -> bool {
        self.current == Some(effect)
    }

    /// Select `effect`, deselecting everything else. `None` disables all.
    pub fn select(&mut self, effect: Option<Effect>) {
        self.current = effect;
    }

    /// Advance along the curated demo ring:
    /// `None`/`Outline` -> SBR -> WCR -> AKF -> SNN -> BF -> Outline -> ...
    ///
    /// Returns the newly current effect so the caller can install that
    /// algorithm's default parameters where required.
    pub fn cycle_forward(&mut self) -> Effect {
        let next = match self.current {
            Some(Effect::Sbr) => Effect::Wcr,
            Some(Effect::Wcr) => Effect::Akf,
            Some(Effect::Akf) => Effect::Snn,
            Some(Effect::Snn) => Effect::Bf,
            Some(Effect::Bf) => Effect::Outline,
            // Outline, any off-ring effect, or nothing: restart at SBR.
            _ => Effect::Sbr,
        };
        self.current = Some(next);
        next
    }

    /// Nudge the current effect's headline control up one step.
    ///
    /// Returns true when a control was targeted (the value may already sit at
    /// its clamp). No-op when nothing is selected.
    pub fn increment(&self, settings: &mut Settings) -> bool {
        match self.current {
            Some(Effect::Sbr) => {
                settings.sbr.grid_scale = (settings.sbr.grid_scale + SbrSettings::GRID_SCALE_STEP)
                    .min(SbrSettings::GRID_SCALE_MAX);
            }
            Some(Effect::Wcr) => {
                settings.wcr.wet_in_wet_hue_similarity = (settings.wcr.wet_in_wet_hue_similarity
                    + WcrSettings::HUE_SIMILARITY_STEP)
                    .min(WcrSettings::HUE_SIMILARITY_MAX);
            }
            Some(Effect::Akf) => {
                settings.akf.radius = (settings.akf.radius + 1.0).min(AkfSettings::RADIUS_MAX);
            }
            Some(Effect::Snn) => {
                settings.snn.radius = (settings.snn.radius + 1).min(SnnSettings::RADIUS_MAX);
            }
            Some(Effect::Bf) => {
                settings.bf.blur_count = (settings.bf.blur_count + 1).min(BfSettings::BLUR_COUNT_MAX);
            }
            Some(Effect::Outline) => {
                settings.outline.size = (settings.outline.size + 1.0).min(OutlineSettings::SIZE_MAX);
            }
            _ => return false,
        }
        true
    }

    /// Nudge the current effect's headline control down one step.
    pub fn decrement(&self, settings: &mut Settings) -> bool {
        match self.current {
            Some(Effect::Sbr) => {
                settings.sbr.grid_scale = (settings.sbr.grid_scale - SbrSettings::GRID_SCALE_STEP)
                    .max(SbrSettings::GRID_SCALE_MIN);
            }
            Some(Effect::Wcr) => {
                settings.wcr.wet_in_wet_hue_similarity = (settings.wcr.wet_in_wet_hue_similarity
                    - WcrSettings::HUE_SIMILARITY_STEP)
                    .max(WcrSettings::HUE_SIMILARITY_MIN);
            }
            Some(Effect::Akf) => {
                settings.akf.radius = (settings.akf.radius - 1.0).max(AkfSettings::RADIUS_MIN);
            }
            Some(Effect::Snn) => {
                settings.snn.radius = settings.snn.radius.saturating_sub(1).max(SnnSettings::RADIUS_MIN);
            }
            Some(Effect::Bf) => {
                settings.bf.blur_count = settings
                    .bf
                    .blur_count
                    .saturating_sub(1)
                    .max(BfSettings::BLUR_COUNT_MIN);
            }
            Some(Effect::Outline) => {
                settings.outline.size = (settings.outline.size - 1.0).max(OutlineSettings::SIZE_MIN);
            }
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_mutually_exclusive_for_all_pairs() {
        for &a in ALL_EFFECTS {
            for &b in ALL_EFFECTS {
                if a == b {
                    continue;
                }
                let mut sel = EffectSelector::new();
                sel.select(Some(a));
                sel.select(Some(b));
                let enabled: Vec<_> = ALL_EFFECTS.iter().filter(|&&e| sel.is_enabled(e)).collect();
                assert_eq!(enabled, vec![&b], "selecting {a:?} then {b:?}");
            }
        }
    }

    #[test]
    fn cycle_walks_the_ring_and_wraps() {
        let mut sel = EffectSelector::new();
        let ring: Vec<Effect> = (0..7).map(|_| sel.cycle_forward()).collect();
        assert_eq!(
            ring,
            vec![
                Effect::Sbr,
                Effect::Wcr,
                Effect::Akf,
                Effect::Snn,
                Effect::Bf,
                Effect::Outline,
                Effect::Sbr,
            ]
        );
    }

    #[test]
    fn cycle_from_an_off_ring_effect_restarts_at_sbr() {
        let mut sel = EffectSelector::new();
        sel.select(Some(Effect::Lic));
        assert_eq!(sel.cycle_forward(), Effect::Sbr);
    }

    #[test]
    fn akf_radius_clamps_at_max() {
        let mut sel = EffectSelector::new();
        sel.select(Some(Effect::Akf));
        let mut s = Settings::default();
        s.akf.radius = 31.0;
        assert!(sel.increment(&mut s));
        assert_eq!(s.akf.radius, 32.0);
        assert!(sel.increment(&mut s));
        assert_eq!(s.akf.radius, 32.0);
    }

    #[test]
    fn snn_radius_clamps_at_min() {
        let mut sel = EffectSelector::new();
        sel.select(Some(Effect::Snn));
        let mut s = Settings::default();
        s.snn.radius = 1;
        assert!(sel.decrement(&mut s));
        assert_eq!(s.snn.radius, 1);
    }

    #[test]
    fn adjustment_is_a_noop_without_a_selection() {
        let sel = EffectSelector::new();
        let mut s = Settings::default();
        let before = s.clone();
        assert!(!sel.increment(&mut s));
        assert!(!sel.decrement(&mut s));
        assert_eq!(s, before);
    }
}
