//! The pipeline context: settings, derived records, selector, buffer pool and
//! the consolidated dirty flag, orchestrated frame by frame.
//!
//! `run_frame` is the engine's critical section over the pool: callers must
//! not touch pool buffers between its start and end, and a frame's pass
//! sequence always runs to completion once started (there is no mid-sequence
//! abort path).

use crate::foundation::core::Image;
use crate::foundation::error::{PaintboxError, PaintboxResult};
use crate::params::DerivedParams;
use crate::render::dispatch::{Dispatcher, NoiseThrottle};
use crate::render::passes::PassBackend;
use crate::render::pool::{BufferPool, Role, validate_role_table};
use crate::selector::{Effect, EffectSelector};
use crate::settings::{CcSettings, Settings, defaults};

/// The image-stylization pipeline.
///
/// One instance owns everything a tick needs; there is no global state. The
/// usual loop is: mutate settings (which marks the context dirty), then call
/// [`Pipeline::run_frame`] once per displayed frame.
pub struct Pipeline {
    settings: Settings,
    derived: DerivedParams,
    selector: EffectSelector,
    pool: BufferPool,
    /// Settings changed since the last successful run (also set on resolution
    /// changes). Cleared by the dispatcher after a successful frame.
    dirty: bool,
    throttle: NoiseThrottle,
    lerp_flag: bool,
    derived_size: (u32, u32),
}

impl Pipeline {
    /// Create a pipeline with default settings.
    ///
    /// Validates the buffer-pool alias table once; a collision there is a
    /// build defect, not a runtime condition.
    pub fn new() -> PaintboxResult<Self> {
        Self::with_settings(Settings::default())
    }

    /// Create a pipeline with the given settings.
    pub fn with_settings(settings: Settings) -> PaintboxResult<Self> {
        validate_role_table()?;
        Ok(Self {
            settings,
            derived: DerivedParams::default(),
            selector: EffectSelector::new(),
            pool: BufferPool::new(),
            dirty: true,
            throttle: NoiseThrottle::new(),
            lerp_flag: true,
            derived_size: (0, 0),
        })
    }

    /// Read access to the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the settings; borrowing marks the context dirty.
    pub fn settings_mut(&mut self) -> &mut Settings {
        self.dirty = true;
        &mut self.settings
    }

    /// Signal that settings changed outside `settings_mut`.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True when the next frame will re-derive parameters.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The derived records of the last derivation (test and debug surface).
    pub fn derived(&self) -> &DerivedParams {
        &self.derived
    }

    /// Read access to the buffer pool.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// The currently selected effect.
    pub fn current_effect(&self) -> Option<Effect> {
        self.selector.current()
    }

    /// True iff `effect` is the single enabled effect.
    pub fn is_enabled(&self, effect: Effect) -> bool {
        self.selector.is_enabled(effect)
    }

    /// Select an effect (or none), deselecting everything else.
    pub fn select(&mut self, effect: Option<Effect>) {
        self.selector.select(effect);
        self.dirty = true;
    }

    /// Advance the selector's demo ring, installing the entered algorithm's
    /// default parameters where the ring defines them. Stroke layers are only
    /// populated when none exist, so user-edited layers survive cycling.
    pub fn cycle_forward(&mut self) {
        match self.selector.cycle_forward() {
            Effect::Sbr => {
                if self.settings.sbr.layers.is_empty() {
                    defaults::apply_sbr(&mut self.settings);
                }
            }
            Effect::Wcr => defaults::apply_wcr(&mut self.settings),
            Effect::Akf => defaults::apply_akf(&mut self.settings),
            Effect::Bf => defaults::apply_bf(&mut self.settings),
            _ => {}
        }
        self.dirty = true;
        self.throttle.force();
    }

    /// Nudge the current effect's headline control up; no-op when nothing is
    /// selected.
    pub fn increment(&mut self) {
        if self.selector.increment(&mut self.settings) {
            self.dirty = true;
        }
    }

    /// Nudge the current effect's headline control down.
    pub fn decrement(&mut self) {
        if self.selector.decrement(&mut self.settings) {
            self.dirty = true;
        }
    }

    /// Raise the common luminance multiplier by one step.
    pub fn inc_lum(&mut self) {
        self.settings.cc.mul_lum = (self.settings.cc.mul_lum + 0.1).min(CcSettings::MUL_LUM_MAX);
        self.dirty = true;
    }

    /// Lower the common luminance multiplier by one step.
    pub fn dec_lum(&mut self) {
        self.settings.cc.mul_lum = (self.settings.cc.mul_lum - 0.1).max(CcSettings::MUL_LUM_MIN);
        self.dirty = true;
    }

    /// Make the next watercolor frame rebuild its noise buffers immediately,
    /// so edits show up without waiting for the throttle interval.
    pub fn force_noise_refresh(&mut self) {
        self.throttle.force();
    }

    /// Install the session mask. The pool must already be allocated at the
    /// mask's resolution (run one frame first, or call after `run_frame`).
    pub fn set_mask(&mut self, mask: Image) -> PaintboxResult<()> {
        self.pool.set_mask(mask)
    }

    /// Process one tick: `src` in, `dst` out, `dt` seconds since the last
    /// tick.
    ///
    /// On a resource error (buffer allocation failure) `dst` is left
    /// untouched — the caller keeps showing the previous frame. The dirty
    /// flag is cleared only after a fully successful run.
    #[tracing::instrument(skip_all, fields(effect = ?self.selector.current(), dirty = self.dirty))]
    pub fn run_frame(
        &mut self,
        src: &Image,
        dst: &mut Image,
        dt: f32,
        backend: &mut dyn PassBackend,
    ) -> PaintboxResult<()> {
        if !src.same_size(dst) {
            return Err(PaintboxError::validation(format!(
                "run_frame: source {}x{} and destination {}x{} differ",
                src.width(),
                src.height(),
                dst.width(),
                dst.height()
            )));
        }
        let (width, height) = (src.width(), src.height());

        // Fatal for this frame if allocation fails; nothing was written yet.
        self.pool.ensure(width, height)?;

        if self.derived_size != (width, height) {
            self.dirty = true;
        }

        // Self-heal: stroke rendering without layers gets the preset rather
        // than failing the frame.
        if self.selector.current() == Some(Effect::Sbr) && self.settings.sbr.layers.is_empty() {
            defaults::apply_sbr(&mut self.settings);
            self.dirty = true;
        }

        if self.dirty {
            self.derived = DerivedParams::derive(&self.settings, width, height);
            self.derived_size = (width, height);
        }

        self.pool.begin(src)?;
        bind_cc(&mut self.pool, &self.derived);

        let mut dispatcher = Dispatcher {
            pool: &mut self.pool,
            params: &self.derived,
            backend,
            dirty: self.dirty,
        };
        dispatcher.run(self.selector.current(), dst, &mut self.throttle, dt)?;

        self.dirty = false;
        Ok(())
    }

    /// Blend `frame` against the previous blended frame through the lerp
    /// ring (`rate` = 0 keeps the history, 1 takes the new frame). Useful to
    /// settle stroke flicker at high frame rates.
    pub fn temporal_blend(
        &mut self,
        frame: &mut Image,
        rate: f32,
        backend: &mut dyn PassBackend,
    ) -> PaintboxResult<()> {
        self.pool.copy_in(frame, Role::Lerp0)?;
        let mut dispatcher = Dispatcher {
            pool: &mut self.pool,
            params: &self.derived,
            backend,
            dirty: false,
        };
        dispatcher.render_lerp(Role::Lerp0, frame, rate, &mut self.lerp_flag)
    }
}

fn bind_cc(pool: &mut BufferPool, derived: &DerivedParams) {
    let cc = &derived.cc;
    pool.set_f32("_CCInBlack", cc.in_black);
    pool.set_f32("_CCInGamma", cc.in_gamma);
    pool.set_f32("_CCInWhite", cc.in_white);
    pool.set_f32("_CCOutBlack", cc.out_black);
    pool.set_f32("_CCOutWhite", cc.out_white);
    pool.set_f32("_CCMulLum", cc.mul_lum);
    pool.set_f32("_CCAddLum", cc.add_lum);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::passes::{PassId, PassIo};

    struct Nop;
    impl PassBackend for Nop {
        fn run_pass(&mut self, _: PassId, io: PassIo<'_>) -> PaintboxResult<()> {
            io.dst.copy_from(io.src)
        }
    }

    fn frame(w: u32, h: u32) -> Image {
        Image::new(w, h).unwrap()
    }

    #[test]
    fn dirty_clears_after_a_successful_run() {
        let mut p = Pipeline::new().unwrap();
        assert!(p.is_dirty());
        let src = frame(4, 4);
        let mut dst = frame(4, 4);
        p.run_frame(&src, &mut dst, 0.016, &mut Nop).unwrap();
        assert!(!p.is_dirty());
        p.settings_mut().akf.radius = 20.0;
        assert!(p.is_dirty());
    }

    #[test]
    fn resolution_change_triggers_rederivation() {
        let mut p = Pipeline::new().unwrap();
        let src = frame(4, 4);
        let mut dst = frame(4, 4);
        p.run_frame(&src, &mut dst, 0.0, &mut Nop).unwrap();
        assert!(!p.is_dirty());

        let src2 = frame(8, 8);
        let mut dst2 = frame(8, 8);
        p.run_frame(&src2, &mut dst2, 0.0, &mut Nop).unwrap();
        assert!(!p.is_dirty());
        assert_eq!(p.pool().size(), (8, 8));
    }

    #[test]
    fn mismatched_frames_are_rejected() {
        let mut p = Pipeline::new().unwrap();
        let src = frame(4, 4);
        let mut dst = frame(8, 8);
        assert!(p.run_frame(&src, &mut dst, 0.0, &mut Nop).is_err());
    }
}
