//! Reference CPU backend.
//!
//! One compact kernel per pass, each reading its parameters exclusively from
//! the bound uniforms and textures — the same contract a GPU backend would
//! see. Rows are processed in parallel; fidelity targets a plausible look,
//! the normative surface is parameters, ordering and buffer usage.

use rayon::prelude::*;

use crate::foundation::core::Image;
use crate::foundation::error::PaintboxResult;
use crate::foundation::math::{
    hash_f32, hsv_to_rgb, lab_to_rgb, lerp, lerp4, luma, rgb_to_hsv, rgb_to_lab, value_noise,
};
use crate::render::passes::{PassBackend, PassId, PassIo};

/// The bundled kernel library.
#[derive(Debug, Default)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PassBackend for CpuBackend {
    fn run_pass(&mut self, pass: PassId, io: PassIo<'_>) -> PaintboxResult<()> {
        match pass {
            PassId::Sobel => sobel(io),
            PassId::Tfm => tfm(io),
            PassId::GBlur => gblur(io, false),
            PassId::GBlurTable => gblur(io, true),
            PassId::Posterize => posterize(io),
            PassId::HsvToRgb => map_pixels(io, hsv_to_rgb),
            PassId::RgbToLab => map_pixels(io, rgb_to_lab),
            PassId::LabToRgb => map_pixels(io, lab_to_rgb),
            PassId::Bf => bilateral(io, false),
            PassId::Fbf => bilateral(io, true),
            PassId::Akf => kuwahara(io),
            PassId::Snn => snn(io),
            PassId::FxDogGradient => fxdog_gradient(io),
            PassId::FxDogTangent => fxdog_tangent(io),
            PassId::Outline => outline(io),
            PassId::HandTremor => hand_tremor(io),
            PassId::Wcr => watercolor(io),
            PassId::Sbr => stroke_render(io),
            PassId::Lic => lic(io),
            PassId::SNoise => snoise(io),
            PassId::FNoise => fnoise(io),
            PassId::VNoise => vnoise(io),
            PassId::Lerp => lerp_pass(io),
        }
    }
}

/// Row-parallel per-pixel fill.
fn fill(dst: &mut Image, f: impl Fn(i64, i64) -> [f32; 4] + Sync) {
    let w = dst.width() as usize;
    let stride = w * 4;
    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let px = f(x as i64, y as i64);
                row[x * 4..x * 4 + 4].copy_from_slice(&px);
            }
        });
}

fn map_pixels(io: PassIo<'_>, f: impl Fn([f32; 4]) -> [f32; 4] + Sync) -> PaintboxResult<()> {
    let src = io.src;
    fill(io.dst, |x, y| f(src.pixel(x, y)));
    Ok(())
}

fn sobel(io: PassIo<'_>) -> PaintboxResult<()> {
    let carry = io.uniforms.f32("_SobelCarryDigit")?;
    let src = io.src;
    fill(io.dst, |x, y| {
        let l = |dx: i64, dy: i64| luma(src.pixel(x + dx, y + dy));
        let gx = -l(-1, -1) - 2.0 * l(-1, 0) - l(-1, 1) + l(1, -1) + 2.0 * l(1, 0) + l(1, 1);
        let gy = -l(-1, -1) - 2.0 * l(0, -1) - l(1, -1) + l(-1, 1) + 2.0 * l(0, 1) + l(1, 1);
        let mag = (gx * gx + gy * gy).sqrt();
        [gx * carry, gy * carry, 0.0, mag * carry]
    });
    Ok(())
}

/// Tensor-field reduction: turn the (relaxed) gradient field into a
/// unit tangent plus anisotropy estimate.
fn tfm(io: PassIo<'_>) -> PaintboxResult<()> {
    let inv_carry = io.uniforms.f32("_SobelInvCarryDigit")?;
    let src = io.src;
    fill(io.dst, |x, y| {
        let g = src.pixel(x, y);
        let (gx, gy) = (g[0] * inv_carry, g[1] * inv_carry);
        let mag = (gx * gx + gy * gy).sqrt();
        let (tx, ty) = if mag > 1e-6 {
            (-gy / mag, gx / mag)
        } else {
            (1.0, 0.0)
        };
        [tx, ty, ty.atan2(tx), mag / (mag + 1.0)]
    });
    Ok(())
}

fn gblur(io: PassIo<'_>, use_table: bool) -> PaintboxResult<()> {
    let size = io.uniforms.i32("_GBlurSize")? as usize;
    let src = io.src;
    if use_table {
        let n = size * size;
        let ox = io.uniforms.f32_array("_GBlurOffsetX")?;
        let oy = io.uniforms.f32_array("_GBlurOffsetY")?;
        let weights = io.uniforms.f32_array("_GBlurDomainWeight")?;
        fill(io.dst, |x, y| {
            let mut acc = [0.0f32; 4];
            let mut total = 0.0;
            for i in 0..n {
                let w = weights[i];
                let px = src.pixel(x + ox[i] as i64, y + oy[i] as i64);
                for c in 0..4 {
                    acc[c] += px[c] * w;
                }
                total += w;
            }
            acc.map(|v| v / total)
        });
        return Ok(());
    }

    let tile = io.uniforms.i32("_GBlurTileSize")? as f32;
    let mean = io.uniforms.f32("_GBlurMean")?;
    let inv_sigma = io.uniforms.f32("_GBlurInvDomainSigma")?;
    let bias = io.uniforms.f32("_GBlurDomainBias")?;
    fill(io.dst, |x, y| {
        let mut acc = [0.0f32; 4];
        let mut total = 0.0;
        for ty in 0..size {
            for tx in 0..size {
                let ox = tx as f32 * tile - mean;
                let oy = ty as f32 * tile - mean;
                let sx = ox * inv_sigma * bias;
                let sy = oy * inv_sigma * bias;
                let w = (-0.5 * (sx * sx + sy * sy)).exp();
                let px = src.pixel(x + ox as i64, y + oy as i64);
                for c in 0..4 {
                    acc[c] += px[c] * w;
                }
                total += w;
            }
        }
        acc.map(|v| v / total)
    });
    Ok(())
}

fn posterize(io: PassIo<'_>) -> PaintboxResult<()> {
    let bins = io.uniforms.f32("_PosterizeBins")?;
    let inv_bins = io.uniforms.f32("_PosterizeInvBins")?;
    let return_hsv = io.uniforms.f32("_PosterizeReturnHSV")? > 0.5;
    let src = io.src;
    fill(io.dst, |x, y| {
        let px = src.pixel(x, y);
        let q = [
            (px[0] * bins).floor() * inv_bins,
            (px[1] * bins).floor() * inv_bins,
            (px[2] * bins).floor() * inv_bins,
            px[3],
        ];
        if return_hsv { rgb_to_hsv(q) } else { q }
    });
    Ok(())
}

/// One bilateral leg. The orthogonal leg (`_BFOrthogonalize` = 1) walks the
/// gradient direction with domain weights only; the tangent leg walks the
/// flow tangent with range and domain weights. The flow-based variant
/// re-samples the flow field at every step instead of walking a straight
/// line.
fn bilateral(io: PassIo<'_>, flow_based: bool) -> PaintboxResult<()> {
    let sample_len = io.uniforms.f32("_BFSampleLen")?;
    let domain_variance = io.uniforms.f32("_BFDomainVariance")?;
    let domain_bias = io.uniforms.f32("_BFDomainBias")?;
    let range_variance = io.uniforms.f32("_BFRangeVariance")?;
    let range_bias = io.uniforms.f32("_BFRangeBias")?;
    let range_threshold = io.uniforms.f32("_BFRangeThreshold")?;
    let orthogonal = io.uniforms.f32("_BFOrthogonalize")? > 0.5;
    let step_len_scale = io.uniforms.f32("_BFStepLenScale")?;
    let tfm = io.textures.get("_RT_TFM")?;
    let src = io.src;

    let steps = (sample_len * step_len_scale).ceil().max(1.0) as i32;
    fill(io.dst, |x, y| {
        let center = src.pixel(x, y);
        let mut acc = center;
        let mut total = 1.0f32;
        for side in [-1.0f32, 1.0] {
            let (mut fx, mut fy) = (x as f32, y as f32);
            for i in 1..=steps {
                let t = tfm.pixel(fx as i64, fy as i64);
                let (mut dx, mut dy) = if orthogonal { (t[1], -t[0]) } else { (t[0], t[1]) };
                if !flow_based {
                    // Straight walk: keep the direction sampled at the center.
                    let t0 = tfm.pixel(x, y);
                    (dx, dy) = if orthogonal { (t0[1], -t0[0]) } else { (t0[0], t0[1]) };
                }
                fx += dx * side;
                fy += dy * side;
                let px = src.pixel(fx as i64, fy as i64);
                let d = i as f32;
                let mut w = (-(d * d * domain_bias * domain_bias) * domain_variance).exp();
                if !orthogonal {
                    let dl = (luma(px) - luma(center)).abs();
                    if dl * range_threshold > 1.0 {
                        continue;
                    }
                    let r = dl * range_bias;
                    w *= (-(r * r) * range_variance).exp();
                }
                for c in 0..4 {
                    acc[c] += px[c] * w;
                }
                total += w;
            }
        }
        acc.map(|v| v / total)
    });
    Ok(())
}

fn kuwahara(io: PassIo<'_>) -> PaintboxResult<()> {
    let radius = io.uniforms.f32("_AKFRadius")?;
    let mask_radius = io.uniforms.f32("_AKFMaskRadius")?;
    let sharpness = io.uniforms.f32("_AKFSharpness")?;
    let overlap_x = io.uniforms.f32("_AKFOverlapX")?;
    let overlap_y = io.uniforms.f32("_AKFOverlapY")?;
    let step = io.uniforms.i32("_AKFSampleStep")?.max(1) as i64;
    let tfm = io.textures.get("_RT_TFM")?;
    let mask = io.textures.get("_RT_MASK")?;
    let src = io.src;

    const SECTORS: usize = 8;
    fill(io.dst, |x, y| {
        let r = if mask.pixel(x, y)[0] > 0.5 { mask_radius } else { radius };
        let ir = r as i64;
        let t = tfm.pixel(x, y);
        let (ca, sa) = (t[0], t[1]);

        let mut mean = [[0.0f32; 4]; SECTORS];
        let mut mean_sq = [0.0f32; SECTORS];
        let mut count = [0.0f32; SECTORS];
        let mut dy = -ir;
        while dy <= ir {
            let mut dx = -ir;
            while dx <= ir {
                let (fx, fy) = (dx as f32, dy as f32);
                if fx * fx + fy * fy <= r * r {
                    // Rotate into the flow frame, then score each sector's
                    // overlapped parabola.
                    let rx = (fx * ca + fy * sa) / r;
                    let ry = (-fx * sa + fy * ca) / r;
                    let px = src.pixel(x + dx, y + dy);
                    let l = luma(px);
                    for (k, (m, (msq, cnt))) in mean
                        .iter_mut()
                        .zip(mean_sq.iter_mut().zip(count.iter_mut()))
                        .enumerate()
                    {
                        let ang = k as f32 * (std::f32::consts::PI / 4.0);
                        let (sk, ck) = ang.sin_cos();
                        let lx = rx * ck + ry * sk;
                        let ly = -rx * sk + ry * ck;
                        if (lx + overlap_x) - overlap_y * ly * ly > 0.0 {
                            for c in 0..4 {
                                m[c] += px[c];
                            }
                            *msq += l * l;
                            *cnt += 1.0;
                        }
                    }
                }
                dx += step;
            }
            dy += step;
        }

        let mut acc = [0.0f32; 4];
        let mut total = 0.0f32;
        for k in 0..SECTORS {
            if count[k] < 1.0 {
                continue;
            }
            let m = mean[k].map(|v| v / count[k]);
            let var = (mean_sq[k] / count[k] - luma(m) * luma(m)).max(0.0);
            let w = 1.0 / (1.0 + var.powf(0.5 * sharpness) * 255.0);
            for c in 0..4 {
                acc[c] += m[c] * w;
            }
            total += w;
        }
        if total <= 0.0 {
            src.pixel(x, y)
        } else {
            acc.map(|v| v / total)
        }
    });
    Ok(())
}

fn snn(io: PassIo<'_>) -> PaintboxResult<()> {
    let radius = io.uniforms.i32("_SNNRadius")? as i64;
    let weight = io.uniforms.f32("_SNNWeight")?;
    let src = io.src;
    fill(io.dst, |x, y| {
        let center = src.pixel(x, y);
        let cl = luma(center);
        let mut acc = [0.0f32; 4];
        // Walk the symmetric upper half-plane; per pair keep the neighbor
        // closer in luminance to the center.
        for dy in 0..=radius {
            let dx_start = if dy == 0 { 1 } else { -radius };
            for dx in dx_start..=radius {
                let a = src.pixel(x + dx, y + dy);
                let b = src.pixel(x - dx, y - dy);
                let chosen = if (luma(a) - cl).abs() <= (luma(b) - cl).abs() {
                    a
                } else {
                    b
                };
                for c in 0..4 {
                    acc[c] += chosen[c] * 2.0;
                }
            }
        }
        acc.map(|v| v / weight)
    });
    Ok(())
}

fn fxdog_gradient(io: PassIo<'_>) -> PaintboxResult<()> {
    let max_len = io.uniforms.f32("_FXDoGGradientMaxLen")?;
    let variance_l = io.uniforms.f32("_FXDoGGradientVarianceL")?;
    let variance_s = io.uniforms.f32("_FXDoGGradientVarianceS")?;
    let sharpness = io.uniforms.f32("_FXDoGSharpness")?;
    let tfm = io.textures.get("_RT_TFM")?;
    let src = io.src;

    let steps = max_len.ceil().max(1.0) as i32;
    fill(io.dst, |x, y| {
        let t = tfm.pixel(x, y);
        // Gradient direction is orthogonal to the flow tangent.
        let (gx, gy) = (t[1], -t[0]);
        let (mut sum_l, mut sum_s) = (0.0f32, 0.0f32);
        let (mut tot_l, mut tot_s) = (0.0f32, 0.0f32);
        for i in -steps..=steps {
            let d = i as f32;
            let px = src.pixel(x + (gx * d) as i64, y + (gy * d) as i64);
            let l = luma(px);
            let wl = (-(d * d) * variance_l).exp();
            let ws = (-(d * d) * variance_s).exp();
            sum_l += l * wl;
            tot_l += wl;
            sum_s += l * ws;
            tot_s += ws;
        }
        let dog = (1.0 + sharpness) * (sum_l / tot_l) - sharpness * (sum_s / tot_s);
        let a = src.pixel(x, y)[3];
        [dog, dog, dog, a]
    });
    Ok(())
}

fn fxdog_tangent(io: PassIo<'_>) -> PaintboxResult<()> {
    let max_len = io.uniforms.f32("_FXDoGTangentMaxLen")?;
    let variance = io.uniforms.f32("_FXDoGTangentVariance")?;
    let smooth_range = io.uniforms.f32("_FXDoGSmoothRange")?;
    let slope = io.uniforms.f32("_FXDoGThresholdSlope")?;
    let threshold = io.uniforms.f32("_FXDoGThreshold")? / 255.0;
    let tfm = io.textures.get("_RT_TFM")?;
    let src = io.src;

    let steps = (max_len * smooth_range).ceil().max(1.0) as i32;
    fill(io.dst, |x, y| {
        // Line integral of the DoG response along the flow tangent.
        let mut sum = luma(src.pixel(x, y));
        let mut total = 1.0f32;
        for side in [-1.0f32, 1.0] {
            let (mut fx, mut fy) = (x as f32, y as f32);
            for i in 1..=steps {
                let t = tfm.pixel(fx as i64, fy as i64);
                fx += t[0] * side;
                fy += t[1] * side;
                let d = i as f32;
                let w = (-(d * d) * variance).exp();
                sum += luma(src.pixel(fx as i64, fy as i64)) * w;
                total += w;
            }
        }
        let u = sum / total;
        let edge = if u > threshold {
            1.0
        } else {
            1.0 + (slope * (u - threshold) * 255.0).tanh()
        };
        let a = src.pixel(x, y)[3];
        [edge, edge, edge, a]
    });
    Ok(())
}

fn outline(io: PassIo<'_>) -> PaintboxResult<()> {
    let inv_size = io.uniforms.f32("_OutlineInvSize")?;
    let opacity = io.uniforms.f32("_OutlineOpacity")?;
    let detail = io.uniforms.f32("_OutlineDetail")?;
    let density = io.uniforms.f32("_OutlineDensity")?;
    let reverse = io.uniforms.f32("_OutlineReverse")?;
    let inv_carry = io.uniforms.f32("_SobelInvCarryDigit")?;
    let sobel = io.textures.get("_RT_SOBEL")?;
    let src = io.src;
    fill(io.dst, |x, y| {
        let mag = sobel.pixel(x, y)[3] * inv_carry;
        let line = (mag * detail * density * inv_size).clamp(0.0, 1.0) * opacity * reverse;
        let px = src.pixel(x, y);
        [
            px[0] * (1.0 - line),
            px[1] * (1.0 - line),
            px[2] * (1.0 - line),
            px[3],
        ]
    });
    Ok(())
}

fn hand_tremor(io: PassIo<'_>) -> PaintboxResult<()> {
    let len = io.uniforms.f32("_WCRHandTremorLen")?;
    let scale = io.uniforms.f32("_WCRHandTremorScale")?;
    let draw_count = io.uniforms.f32("_WCRHandTremorDrawCount")?.max(1.0) as u32;
    let inv_draw_count = io.uniforms.f32("_WCRHandTremorInvDrawCount")?;
    let snoise = io.textures.get("_RT_SNOISE")?;
    let src = io.src;
    fill(io.dst, |x, y| {
        let n = snoise.pixel(x, y);
        let ox = (n[0] - 0.5) * 2.0 * len * scale;
        let oy = (n[1] - 0.5) * 2.0 * len * scale;
        // Overdraw: average several partial displacements so strokes smear
        // instead of tearing.
        let mut acc = [0.0f32; 4];
        for i in 1..=draw_count {
            let t = i as f32 * inv_draw_count;
            let px = src.pixel(x + (ox * t) as i64, y + (oy * t) as i64);
            for c in 0..4 {
                acc[c] += px[c];
            }
        }
        acc.map(|v| v * inv_draw_count)
    });
    Ok(())
}

fn watercolor(io: PassIo<'_>) -> PaintboxResult<()> {
    let opacity = io.uniforms.f32("_WCROpacity")?;
    let bleeding = io.uniforms.f32("_WCRBleeding")?;
    let dispersion = io.uniforms.f32("_WCRPigmentDispersionScale")?;
    let low = io.uniforms.f32("_WetInWetLow")?;
    let high = io.uniforms.f32("_WetInWetHigh")?;
    let hue_similarity = io.uniforms.f32("_WetInWetHueSimilarity")? / 360.0;
    let dark_to_light = io.uniforms.f32("_WetInWetDarkToLight")? > 0.5;
    let edge_size = io.uniforms.f32("_EdgeDarkingSize")?;
    let edge_scale = io.uniforms.f32("_EdgeDarkingScale")?;
    let inv_carry = io.uniforms.f32("_SobelInvCarryDigit")?;
    let sobel = io.textures.get("_RT_SOBEL")?;
    let wet_noise = io.textures.get("_RT_FNOISE")?;
    let orig = io.textures.get("_RT_ORIG")?;
    let src = io.src;
    fill(io.dst, |x, y| {
        let px = src.pixel(x, y);
        let l = luma(px);

        // Pigment granulation: density follows the wet-in-wet noise.
        let g = wet_noise.pixel(x, y)[0];
        let density = 1.0 + dispersion * (g - 0.5);
        let mut rgb = [
            px[0].max(0.0).powf(density),
            px[1].max(0.0).powf(density),
            px[2].max(0.0).powf(density),
        ];

        // Wet-in-wet: inside the luminance band, pull color toward a bled
        // neighbor of sufficiently similar hue.
        if l > low && l < high {
            let spread = (bleeding * (g - 0.5)) as i64;
            let bled = src.pixel(x + spread, y);
            let mut dh = (rgb_to_hsv(bled)[0] - rgb_to_hsv(px)[0]).abs();
            dh = dh.min(1.0 - dh);
            let darker_ok = !dark_to_light || luma(bled) <= l;
            if dh <= hue_similarity && darker_ok {
                for (c, v) in rgb.iter_mut().enumerate() {
                    *v = lerp(*v, bled[c], 0.25);
                }
            }
        }

        // Edge darkening: pigment pools where gradients are strong.
        let mag = sobel.pixel(x, y)[3] * inv_carry;
        let dark = 1.0 - edge_scale * (mag / edge_size.max(1e-3)).clamp(0.0, 1.0);
        for v in rgb.iter_mut() {
            *v *= dark;
        }

        let o = orig.pixel(x, y);
        [
            lerp(o[0], rgb[0], opacity),
            lerp(o[1], rgb[1], opacity),
            lerp(o[2], rgb[2], opacity),
            px[3],
        ]
    });
    Ok(())
}

fn stroke_render(io: PassIo<'_>) -> PaintboxResult<()> {
    let count = io.uniforms.i32("_SBRLayerCount")?.max(0) as usize;
    let enable = io.uniforms.f32_array("_SBRLayerEnable")?;
    let mask_type = io.uniforms.f32_array("_SBRMaskType")?;
    let tex2grid = io.uniforms.vec4_array("_SBRTex2Grid")?;
    let stroke_width = io.uniforms.f32_array("_SBRStrokeWidth")?;
    let stroke_len = io.uniforms.f32_array("_SBRStrokeLen")?;
    let stroke_opacity = io.uniforms.f32_array("_SBRStrokeOpacity")?;
    let stroke_len_rand = io.uniforms.f32_array("_SBRStrokeLenRand")?;
    let detail_high = io.uniforms.f32_array("_SBRDetailThresholdHigh")?;
    let detail_low = io.uniforms.f32_array("_SBRDetailThresholdLow")?;
    let tolerance = io.uniforms.vec4_array("_SBRTolerance")?;
    let add = io.uniforms.vec4_array("_SBRAdd")?;
    let mul = io.uniforms.vec4_array("_SBRMul")?;
    let inv_carry = io.uniforms.f32("_SobelInvCarryDigit")?;
    let hsv = io.textures.get("_RT_SBR_HSV")?;
    let orig = io.textures.get("_RT_ORIG")?;
    let tfm = io.textures.get("_RT_TFM")?;
    let sobel = io.textures.get("_RT_SOBEL")?;
    let mask = io.textures.get("_RT_MASK")?;

    fill(io.dst, |x, y| {
        let mut out = orig.pixel(x, y);
        for i in 0..count {
            if enable[i] < 0.5 {
                continue;
            }
            // Layer masking: 1 = inside mask only, 2 = outside only.
            let m = mask.pixel(x, y)[0];
            if (mask_type[i] == 1.0 && m < 0.5) || (mask_type[i] == 2.0 && m >= 0.5) {
                continue;
            }

            // Detail gate on the local gradient magnitude.
            let mag = (sobel.pixel(x, y)[3] * inv_carry).clamp(0.0, 1.0);
            if mag < detail_low[i] || mag > detail_high[i] {
                continue;
            }

            // The stroke anchored in this pixel's grid cell.
            let [t2g_x, t2g_y, g2t_x, g2t_y] = tex2grid[i];
            let cell_x = (x as f32 * t2g_x).floor();
            let cell_y = (y as f32 * t2g_y).floor();
            let anchor_x = (cell_x + 0.5) * g2t_x;
            let anchor_y = (cell_y + 0.5) * g2t_y;

            // Stroke frame: flow tangent at the anchor.
            let t = tfm.pixel(anchor_x as i64, anchor_y as i64);
            let (dx, dy) = (x as f32 - anchor_x, y as f32 - anchor_y);
            let along = dx * t[0] + dy * t[1];
            let across = -dx * t[1] + dy * t[0];

            let jitter = hash_f32(cell_x as u32, cell_y as u32, i as u32);
            let half_len = stroke_len[i] * 0.5 * (1.0 + stroke_len_rand[i] * (jitter - 0.5));
            let half_width = stroke_width[i] * 0.5;
            if along.abs() > half_len || across.abs() > half_width {
                continue;
            }

            // Stroke color: posterized HSV at the anchor, graded, within
            // tolerance of the pixel underneath.
            let sc = hsv.pixel(anchor_x as i64, anchor_y as i64);
            let here = rgb_to_hsv(out);
            let tol = tolerance[i];
            if (sc[0] - here[0]).abs() > tol[0].max(tol[1])
                || (sc[1] - here[1]).abs() > tol[2]
                || (sc[2] - here[2]).abs() > tol[3]
            {
                continue;
            }
            let graded = hsv_to_rgb([
                (sc[0] * mul[i][0] + add[i][0]).rem_euclid(1.0),
                (sc[1] * mul[i][2] + add[i][2]).clamp(0.0, 1.0),
                (sc[2] * mul[i][3] + add[i][3]).clamp(0.0, 1.0),
                sc[3],
            ]);
            out = lerp4(out, graded, stroke_opacity[i]);
        }
        out
    });
    Ok(())
}

fn lic(io: PassIo<'_>) -> PaintboxResult<()> {
    let scale = io.uniforms.f32("_LICScale")?.max(1e-3);
    let max_len = io.uniforms.f32("_LICMaxLen")?;
    let variance = io.uniforms.f32("_LICVariance")?;
    let flow = io.src; // the tensor field itself
    let steps = max_len.ceil().max(1.0) as i32;
    fill(io.dst, |x, y| {
        let noise_at = |fx: f32, fy: f32| {
            hash_f32((fx / scale) as i64 as u32, (fy / scale) as i64 as u32, 7)
        };
        let mut sum = noise_at(x as f32, y as f32);
        let mut total = 1.0f32;
        for side in [-1.0f32, 1.0] {
            let (mut fx, mut fy) = (x as f32, y as f32);
            for i in 1..=steps {
                let t = flow.pixel(fx as i64, fy as i64);
                fx += t[0] * side;
                fy += t[1] * side;
                let d = i as f32;
                let w = (-(d * d) * variance).exp();
                sum += noise_at(fx, fy) * w;
                total += w;
            }
        }
        let v = sum / total;
        [v, v, v, 1.0]
    });
    Ok(())
}

fn snoise(io: PassIo<'_>) -> PaintboxResult<()> {
    let size = io.uniforms.vec4("_SNoiseSize")?;
    let scale = io.uniforms.vec4("_SNoiseScale")?;
    fill(io.dst, |x, y| {
        let mut px = [0.0f32; 4];
        for c in 0..4 {
            let amp = (scale[c] / 256.0).clamp(0.0, 1.0);
            px[c] = 0.5 + (value_noise(x as f32, y as f32, size[c], c as u32) - 0.5) * amp;
        }
        px
    });
    Ok(())
}

fn fnoise(io: PassIo<'_>) -> PaintboxResult<()> {
    let size = io.uniforms.vec4("_FNoiseSize")?;
    let scale = io.uniforms.vec4("_FNoiseScale")?;
    fill(io.dst, |x, y| {
        let mut px = [0.0f32; 4];
        for c in 0..3 {
            // Two-octave turbulence for a streakier field.
            let n1 = value_noise(x as f32, y as f32, size[c].max(1.0), 11 + c as u32);
            let n2 = value_noise(x as f32, y as f32, (size[c] * 0.5).max(1.0), 17 + c as u32);
            let amp = (scale[c] / 64.0).clamp(0.0, 1.0);
            px[c] = 0.5 + ((n1 - 0.5) + 0.5 * (n2 - 0.5)) * amp;
        }
        px[3] = 1.0;
        px
    });
    Ok(())
}

fn vnoise(io: PassIo<'_>) -> PaintboxResult<()> {
    const CELL: f32 = 24.0;
    fill(io.dst, |x, y| {
        let gx = (x as f32 / CELL).floor();
        let gy = (y as f32 / CELL).floor();
        let mut best = f32::MAX;
        for oy in -1..=1i32 {
            for ox in -1..=1i32 {
                let cx = gx + ox as f32;
                let cy = gy + oy as f32;
                let jx = hash_f32(cx as i64 as u32, cy as i64 as u32, 3);
                let jy = hash_f32(cx as i64 as u32, cy as i64 as u32, 4);
                let px = (cx + jx) * CELL;
                let py = (cy + jy) * CELL;
                let d = (px - x as f32).hypot(py - y as f32);
                best = best.min(d / CELL);
            }
        }
        let v = best.clamp(0.0, 1.0);
        [v, v, v, 1.0]
    });
    Ok(())
}

fn lerp_pass(io: PassIo<'_>) -> PaintboxResult<()> {
    let rate = io.uniforms.f32("_LerpRate")?;
    let history = io.textures.get("_LerpBuf")?;
    let src = io.src;
    fill(io.dst, |x, y| {
        lerp4(history.pixel(x, y), src.pixel(x, y), rate)
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::passes::{Textures, Uniforms};
    use std::collections::HashMap;

    fn flat(w: u32, h: u32, px: [f32; 4]) -> Image {
        let mut img = Image::new(w, h).unwrap();
        img.fill(px);
        img
    }

    fn run(pass: PassId, src: &Image, uniforms: &Uniforms) -> Image {
        let mut dst = Image::new(src.width(), src.height()).unwrap();
        let slots: Vec<Image> = Vec::new();
        let mask = Image::default();
        let bindings = HashMap::new();
        CpuBackend::new()
            .run_pass(
                pass,
                PassIo {
                    src,
                    dst: &mut dst,
                    uniforms,
                    textures: Textures::new(&slots, &mask, &bindings),
                },
            )
            .unwrap();
        dst
    }

    #[test]
    fn sobel_is_zero_on_a_flat_field() {
        let src = flat(8, 8, [0.5, 0.5, 0.5, 1.0]);
        let mut u = Uniforms::default();
        u.set_f32("_SobelCarryDigit", 10_000.0);
        let out = run(PassId::Sobel, &src, &u);
        // Cancellation residue stays far below one carry digit.
        for c in out.pixel(4, 4) {
            assert!(c.abs() < 1e-2);
        }
    }

    #[test]
    fn posterize_quantizes_to_bin_edges() {
        let src = flat(2, 2, [0.37, 0.62, 0.99, 1.0]);
        let mut u = Uniforms::default();
        u.set_f32("_PosterizeBins", 4.0);
        u.set_f32("_PosterizeInvBins", 0.25);
        u.set_f32("_PosterizeReturnHSV", 0.0);
        let out = run(PassId::Posterize, &src, &u);
        assert_eq!(out.pixel(0, 0), [0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn gblur_preserves_a_constant_image() {
        let src = flat(8, 8, [0.3, 0.6, 0.9, 1.0]);
        let mut u = Uniforms::default();
        u.set_i32("_GBlurSize", 4);
        u.set_i32("_GBlurTileSize", 4);
        u.set_f32("_GBlurMean", 8.0);
        u.set_f32("_GBlurInvDomainSigma", 0.25);
        u.set_f32("_GBlurDomainBias", 1.0);
        let out = run(PassId::GBlur, &src, &u);
        let px = out.pixel(4, 4);
        for c in 0..4 {
            assert!((px[c] - src.pixel(4, 4)[c]).abs() < 1e-5);
        }
    }

    #[test]
    fn color_conversions_round_trip_through_passes() {
        let src = flat(2, 2, [0.2, 0.4, 0.8, 1.0]);
        let u = Uniforms::default();
        let lab = run(PassId::RgbToLab, &src, &u);
        let back = run(PassId::LabToRgb, &lab, &u);
        for c in 0..4 {
            assert!((back.pixel(0, 0)[c] - src.pixel(0, 0)[c]).abs() < 1e-4);
        }
    }

    #[test]
    fn lerp_blends_against_history() {
        let src = flat(2, 2, [1.0, 1.0, 1.0, 1.0]);
        let history = flat(2, 2, [0.0, 0.0, 0.0, 1.0]);
        let mut u = Uniforms::default();
        u.set_f32("_LerpRate", 0.25);
        let mut dst = Image::new(2, 2).unwrap();
        let slots = vec![history];
        let mask = Image::default();
        let mut bindings = HashMap::new();
        bindings.insert("_LerpBuf", 0usize);
        CpuBackend::new()
            .run_pass(
                PassId::Lerp,
                PassIo {
                    src: &src,
                    dst: &mut dst,
                    uniforms: &u,
                    textures: Textures::new(&slots, &mask, &bindings),
                },
            )
            .unwrap();
        assert_eq!(dst.pixel(0, 0)[0], 0.25);
    }

    #[test]
    fn missing_uniform_is_a_validation_error() {
        let src = flat(2, 2, [0.5; 4]);
        let u = Uniforms::default();
        let mut dst = Image::new(2, 2).unwrap();
        let slots: Vec<Image> = Vec::new();
        let mask = Image::default();
        let bindings = HashMap::new();
        let err = CpuBackend::new()
            .run_pass(
                PassId::Sobel,
                PassIo {
                    src: &src,
                    dst: &mut dst,
                    uniforms: &u,
                    textures: Textures::new(&slots, &mask, &bindings),
                },
            )
            .unwrap_err();
        assert!(err.to_string().contains("_SobelCarryDigit"));
    }
}
