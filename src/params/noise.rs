//! Noise parameter packs for the procedural-noise passes.

use crate::settings::{FNoiseSettings, SNoiseSettings};

/// One four-channel noise configuration, bound directly as vec4 uniforms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoisePack {
    pub size: [f32; 4],
    pub scale: [f32; 4],
    pub speed: [f32; 4],
}

impl NoisePack {
    pub fn from_snoise(noise: &SNoiseSettings) -> Self {
        Self {
            size: noise.size,
            scale: noise.scale,
            speed: noise.speed,
        }
    }

    pub fn from_fnoise(noise: &FNoiseSettings) -> Self {
        Self {
            size: [noise.size[0], noise.size[1], noise.size[2], 0.0],
            scale: [noise.scale[0], noise.scale[1], noise.scale[2], 0.0],
            speed: [noise.speed[0], noise.speed[1], noise.speed[2], 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnoise_pack_zeroes_the_fourth_channel() {
        let p = NoisePack::from_fnoise(&FNoiseSettings::default());
        assert_eq!(p.size[3], 0.0);
        assert_eq!(p.scale[3], 0.0);
        assert_eq!(p.speed[3], 0.0);
    }
}
