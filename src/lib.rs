//! Paintbox is a real-time image-stylization compositor.
//!
//! Each tick takes a source color frame and produces a stylized frame by
//! running one of ~20 selectable multi-pass filter algorithms: stroke-based
//! rendering, watercolor simulation, bilateral/Kuwahara smoothing, flow-based
//! edge stylization, posterization, procedural noise and line integral
//! convolution.
//!
//! # Pipeline overview
//!
//! 1. **Derive**: editable [`Settings`] become GPU-style numeric records
//!    ([`DerivedParams`]) — only when the dirty flag says they changed.
//! 2. **Pool**: a fixed set of intermediate buffers is kept at frame
//!    resolution, with deliberate role aliasing validated at startup.
//! 3. **Dispatch**: the selected effect's fixed pass graph runs over the pool
//!    through a pluggable [`PassBackend`]; the bundled [`CpuBackend`] is the
//!    reference kernel library.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No global state**: one [`Pipeline`] value owns everything a tick needs.
//! - **Deterministic pass order**: within a frame, the blit sequence is fixed
//!   per algorithm; later passes read buffers written by earlier ones.

#![forbid(unsafe_code)]

mod foundation;
mod params;
mod pipeline;
mod render;
mod selector;
mod settings;

pub use foundation::core::{Image, MAX_IMAGE_DIM};
pub use foundation::error::{PaintboxError, PaintboxResult};
pub use params::{
    AkfParams, BF_RANGE_TABLE_LEN, BfParams, CanvasParams, CcParams, DerivedParams, FxDogParams,
    GBLUR_TABLE_LEN, GBlurParams, LicParams, NoisePack, OutlineParams, PosterizeParams, SbrParams,
    SnnParams, WcrParams,
};
pub use pipeline::Pipeline;
pub use render::cpu::CpuBackend;
pub use render::passes::{
    PassBackend, PassId, PassIo, TEXTURE_NAMES, Textures, UNIFORM_NAMES, UniformValue, Uniforms,
};
pub use render::pool::{BufferPool, POOL_SLOT_COUNT, Role};
pub use selector::{ALL_EFFECTS, Effect, EffectSelector};
pub use settings::{
    AkfSettings, BfSettings, CanvasSettings, CcSettings, FNoiseSettings, FxDogSettings,
    GBlurSettings, LicSettings, MaskType, OutlineSettings, PosterizeSettings, SBR_LAYER_MAX,
    SNoiseSettings, SbrLayer, SbrSettings, Settings, SnnSettings, WcrSettings, defaults,
};
