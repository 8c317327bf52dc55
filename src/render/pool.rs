//! The intermediate-buffer pool: eight general-purpose image buffers plus the
//! session-persistent mask, addressed through named roles.
//!
//! Several roles deliberately alias one physical slot — two algorithms never
//! run in the same tick, so a slot can serve as generic scratch for one graph
//! and as a purpose-named buffer for another without conflict. The alias table
//! below is validated once at pipeline startup: within any single algorithm's
//! pass graph, no two simultaneously-live roles may share a slot.

use std::collections::HashMap;

use crate::foundation::core::Image;
use crate::foundation::error::{PaintboxError, PaintboxResult};
use crate::render::passes::{PassBackend, PassId, PassIo, Textures, Uniforms};

/// Number of general-purpose pool slots (the mask buffer is separate).
pub const POOL_SLOT_COUNT: usize = 8;

/// A named buffer role. `slot()` gives the physical index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Generic scratch, seeded with the source frame each tick.
    Work0,
    /// The untouched source frame for this tick; read-only by convention.
    Orig,
    Work2,
    Work3,
    Work4,
    Work5,
    Work6,
    Work7,
    /// Stroke rendering's HSV-coded posterized source (aliases `Work0`).
    SbrHsv,
    /// Structure-tensor flow field (aliases `Work2`).
    Tfm,
    /// Sobel gradient (aliases `Work3`).
    Sobel,
    /// Outline line buffer (aliases `Work4`).
    OutlineBuf,
    /// First procedural-noise buffer (aliases `Work6`).
    SNoise,
    /// Second procedural-noise buffer (aliases `Work7`).
    FNoise,
    /// Temporal-blend ring (aliases `Work5`/`Work6`/`Work7`).
    Lerp0,
    Lerp1,
    Lerp2,
}

impl Role {
    /// Physical slot index of this role.
    pub const fn slot(self) -> usize {
        match self {
            Role::Work0 | Role::SbrHsv => 0,
            Role::Orig => 1,
            Role::Work2 | Role::Tfm => 2,
            Role::Work3 | Role::Sobel => 3,
            Role::Work4 | Role::OutlineBuf => 4,
            Role::Work5 | Role::Lerp0 => 5,
            Role::Work6 | Role::SNoise | Role::Lerp1 => 6,
            Role::Work7 | Role::FNoise | Role::Lerp2 => 7,
        }
    }
}

/// Roles that are live at the same time within one algorithm's pass graph.
///
/// A role may appear in several sets; what must never happen is two distinct
/// roles in the *same* set mapping to the same slot. `validate_role_table`
/// proves that once at startup.
const LIVE_ROLE_SETS: &[(&str, &[Role])] = &[
    ("SBR", &[Role::SbrHsv, Role::Orig, Role::Tfm, Role::Sobel]),
    (
        "WCR",
        &[
            Role::Work0,
            Role::Orig,
            Role::Tfm,
            Role::Sobel,
            Role::Work4,
            Role::SNoise,
            Role::FNoise,
        ],
    ),
    (
        "BF",
        &[Role::Work0, Role::Orig, Role::Tfm, Role::Work3, Role::Work4],
    ),
    ("AKF", &[Role::Work0, Role::Tfm, Role::Sobel]),
    ("SNN", &[Role::Work0, Role::Work3]),
    ("FXDoG", &[Role::Work0, Role::Tfm, Role::Work3]),
    (
        "Outline",
        &[Role::Work0, Role::Orig, Role::Sobel, Role::OutlineBuf],
    ),
    ("LIC", &[Role::Tfm]),
    ("Lerp", &[Role::Lerp0, Role::Lerp1, Role::Lerp2]),
];

/// Check the alias table: within each live set, distinct roles get distinct
/// slots. Called once from `Pipeline::new`.
pub(crate) fn validate_role_table() -> PaintboxResult<()> {
    for (graph, roles) in LIVE_ROLE_SETS {
        for (i, a) in roles.iter().enumerate() {
            for b in &roles[i + 1..] {
                if a.slot() == b.slot() {
                    return Err(PaintboxError::validation(format!(
                        "role table: {a:?} and {b:?} collide on slot {} in the {graph} graph",
                        a.slot()
                    )));
                }
            }
        }
    }
    Ok(())
}

/// The buffer pool. Owns the slot images, the mask, the named-uniform store
/// and the texture bindings (the CPU analog of material state).
#[derive(Default)]
pub struct BufferPool {
    width: u32,
    height: u32,
    slots: [Image; POOL_SLOT_COUNT],
    mask: Image,
    uniforms: Uniforms,
    bindings: HashMap<&'static str, usize>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer resolution, `(0, 0)` before the first `ensure`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// (Re)allocate all buffers for the given resolution.
    ///
    /// A no-op when the size is unchanged, preserving buffer identity and role
    /// bindings. On failure no partially-allocated state is kept: the caller
    /// must skip the frame. A resolution change clears the mask — the masking
    /// collaborator has to supply a matching one.
    pub fn ensure(&mut self, width: u32, height: u32) -> PaintboxResult<()> {
        if self.width == width && self.height == height {
            return Ok(());
        }
        let mut fresh: [Image; POOL_SLOT_COUNT] = Default::default();
        for slot in fresh.iter_mut() {
            *slot = Image::new(width, height)?;
        }
        let mask = Image::new(width, height)?;
        self.slots = fresh;
        self.mask = mask;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Seed the tick: copy the source frame into the scratch input WORK0 and
    /// the read-only ORIG, and register the original-frame binding.
    ///
    /// The remaining buffers keep their previous contents on purpose — every
    /// graph writes them before reading, and the throttled noise buffers must
    /// survive the frames between rebuilds.
    pub fn begin(&mut self, src: &Image) -> PaintboxResult<()> {
        if src.width() != self.width || src.height() != self.height {
            return Err(PaintboxError::validation(format!(
                "begin: source {}x{} does not match pool {}x{}",
                src.width(),
                src.height(),
                self.width,
                self.height
            )));
        }
        self.slots[Role::Work0.slot()].copy_from(src)?;
        self.slots[Role::Orig.slot()].copy_from(src)?;
        self.bind_texture("_RT_ORIG", Role::Orig);
        Ok(())
    }

    /// Install the session mask. Must match the pool resolution.
    pub fn set_mask(&mut self, mask: Image) -> PaintboxResult<()> {
        if mask.width() != self.width || mask.height() != self.height {
            return Err(PaintboxError::validation(format!(
                "mask {}x{} does not match pool {}x{}",
                mask.width(),
                mask.height(),
                self.width,
                self.height
            )));
        }
        self.mask = mask;
        Ok(())
    }

    /// The session mask buffer.
    pub fn mask(&self) -> &Image {
        &self.mask
    }

    /// Read access to a pool buffer (tests and readbacks).
    pub fn image(&self, role: Role) -> &Image {
        &self.slots[role.slot()]
    }

    /// Register `name` as reading from `role` for subsequent passes.
    pub fn bind_texture(&mut self, name: &'static str, role: Role) {
        self.bindings.insert(name, role.slot());
    }

    pub fn set_f32(&mut self, name: &'static str, v: f32) {
        self.uniforms.set_f32(name, v);
    }

    pub fn set_i32(&mut self, name: &'static str, v: i32) {
        self.uniforms.set_i32(name, v);
    }

    pub fn set_vec4(&mut self, name: &'static str, v: [f32; 4]) {
        self.uniforms.set_vec4(name, v);
    }

    pub fn set_f32_array(&mut self, name: &'static str, v: &[f32]) {
        self.uniforms.set_f32_array(name, v);
    }

    pub fn set_vec4_array(&mut self, name: &'static str, v: &[[f32; 4]]) {
        self.uniforms.set_vec4_array(name, v);
    }

    /// Bound uniforms (read-only).
    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    /// Run `pass` from one pool buffer into another.
    pub fn blit(
        &mut self,
        src: Role,
        dst: Role,
        pass: PassId,
        backend: &mut dyn PassBackend,
    ) -> PaintboxResult<()> {
        let (s, d) = (src.slot(), dst.slot());
        if s == d {
            return Err(PaintboxError::validation(format!(
                "blit {:?}: source {src:?} and destination {dst:?} share slot {s}",
                pass.name()
            )));
        }
        // Take the destination out so the remaining slots can be read as
        // textures while the kernel writes.
        let mut dst_img = std::mem::take(&mut self.slots[d]);
        let result = backend.run_pass(
            pass,
            PassIo {
                src: &self.slots[s],
                dst: &mut dst_img,
                uniforms: &self.uniforms,
                textures: Textures::new(&self.slots, &self.mask, &self.bindings),
            },
        );
        self.slots[d] = dst_img;
        result
    }

    /// Run `pass` from a pool buffer into an external output frame.
    pub fn blit_out(
        &mut self,
        src: Role,
        dst: &mut Image,
        pass: PassId,
        backend: &mut dyn PassBackend,
    ) -> PaintboxResult<()> {
        if dst.width() != self.width || dst.height() != self.height {
            return Err(PaintboxError::validation(format!(
                "blit_out {}: destination {}x{} does not match pool {}x{}",
                pass.name(),
                dst.width(),
                dst.height(),
                self.width,
                self.height
            )));
        }
        backend.run_pass(
            pass,
            PassIo {
                src: &self.slots[src.slot()],
                dst,
                uniforms: &self.uniforms,
                textures: Textures::new(&self.slots, &self.mask, &self.bindings),
            },
        )
    }

    /// Plain copy between pool buffers (no kernel).
    pub fn copy(&mut self, src: Role, dst: Role) -> PaintboxResult<()> {
        let (s, d) = (src.slot(), dst.slot());
        if s == d {
            return Err(PaintboxError::validation(format!(
                "copy: {src:?} and {dst:?} share slot {s}"
            )));
        }
        let mut dst_img = std::mem::take(&mut self.slots[d]);
        let result = dst_img.copy_from(&self.slots[s]);
        self.slots[d] = dst_img;
        result
    }

    /// Plain copy from a pool buffer into an external frame.
    pub fn copy_out(&self, src: Role, dst: &mut Image) -> PaintboxResult<()> {
        dst.copy_from(&self.slots[src.slot()])
    }

    /// Plain copy from an external frame into a pool buffer.
    pub fn copy_in(&mut self, src: &Image, dst: Role) -> PaintboxResult<()> {
        self.slots[dst.slot()].copy_from(src)
    }

    /// Plain copy of the mask buffer into an external frame.
    pub fn copy_mask_out(&self, dst: &mut Image) -> PaintboxResult<()> {
        dst.copy_from(&self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_table_is_collision_free() {
        validate_role_table().unwrap();
    }

    #[test]
    fn aliases_share_their_documented_slots() {
        assert_eq!(Role::SbrHsv.slot(), Role::Work0.slot());
        assert_eq!(Role::Tfm.slot(), Role::Work2.slot());
        assert_eq!(Role::Sobel.slot(), Role::Work3.slot());
        assert_eq!(Role::SNoise.slot(), Role::Lerp1.slot());
        assert_ne!(Role::Orig.slot(), Role::Work0.slot());
    }

    #[test]
    fn ensure_is_identity_preserving_when_size_is_unchanged() {
        let mut pool = BufferPool::new();
        pool.ensure(8, 4).unwrap();
        let src = Image::new(8, 4).unwrap();
        pool.begin(&src).unwrap();
        let before = pool.image(Role::Work5).data().as_ptr();
        pool.ensure(8, 4).unwrap();
        assert_eq!(pool.image(Role::Work5).data().as_ptr(), before);
    }

    #[test]
    fn ensure_failure_leaves_previous_buffers_intact() {
        let mut pool = BufferPool::new();
        pool.ensure(8, 4).unwrap();
        assert!(pool.ensure(0, 4).is_err());
        assert_eq!(pool.size(), (8, 4));
        assert_eq!(pool.image(Role::Work0).width(), 8);
    }

    #[test]
    fn begin_seeds_the_inputs_and_spares_the_noise_buffers() {
        let mut pool = BufferPool::new();
        pool.ensure(2, 2).unwrap();
        let mut src = Image::new(2, 2).unwrap();
        src.set_pixel(1, 1, [0.25, 0.5, 0.75, 1.0]);
        pool.begin(&src).unwrap();
        for role in [Role::Work0, Role::Orig] {
            assert_eq!(pool.image(role).pixel(1, 1), [0.25, 0.5, 0.75, 1.0]);
        }
        // The noise buffers keep their contents between throttled rebuilds.
        assert_eq!(pool.image(Role::SNoise).pixel(1, 1), [0.0; 4]);
        assert_eq!(pool.image(Role::FNoise).pixel(1, 1), [0.0; 4]);
    }

    #[test]
    fn same_slot_blit_is_rejected() {
        let mut pool = BufferPool::new();
        pool.ensure(2, 2).unwrap();
        struct Nop;
        impl PassBackend for Nop {
            fn run_pass(&mut self, _: PassId, _: PassIo<'_>) -> PaintboxResult<()> {
                Ok(())
            }
        }
        let err = pool
            .blit(Role::Work0, Role::SbrHsv, PassId::Posterize, &mut Nop)
            .unwrap_err();
        assert!(err.to_string().contains("share slot"));
    }

    #[test]
    fn resize_clears_the_mask() {
        let mut pool = BufferPool::new();
        pool.ensure(2, 2).unwrap();
        let mut mask = Image::new(2, 2).unwrap();
        mask.fill([1.0; 4]);
        pool.set_mask(mask).unwrap();
        pool.ensure(4, 4).unwrap();
        assert_eq!(pool.mask().pixel(0, 0), [0.0; 4]);
    }
}
