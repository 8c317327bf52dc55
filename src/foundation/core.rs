use crate::foundation::error::{PaintboxError, PaintboxResult};

/// Largest edge length the pipeline will allocate buffers for.
///
/// This is the CPU analog of the render-target size limit a GPU driver
/// imposes; `BufferPool::ensure` treats anything larger as a resource failure.
pub const MAX_IMAGE_DIM: u32 = 16_384;

/// An RGBA image with `f32` channels, tightly packed, row-major.
///
/// Intermediate buffers keep full float precision; conversion to 8-bit
/// happens only at the IO boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Image {
    /// Allocate a zeroed image, failing on zero or oversized dimensions.
    pub fn new(width: u32, height: u32) -> PaintboxResult<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Wrap an existing channel buffer; `data.len()` must be `width*height*4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> PaintboxResult<Self> {
        let len = checked_len(width, height)?;
        if data.len() != len {
            return Err(PaintboxError::validation(format!(
                "image data length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw channel data, row-major RGBA.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw channel data.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Read one pixel; coordinates are clamped to the image edge. An empty
    /// image reads as transparent black.
    #[inline]
    pub fn pixel(&self, x: i64, y: i64) -> [f32; 4] {
        if self.data.is_empty() {
            return [0.0; 4];
        }
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Write one pixel; coordinates must be in bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [f32; 4]) {
        debug_assert!(x < self.width && y < self.height);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// True if `other` has the same dimensions.
    pub fn same_size(&self, other: &Image) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Copy `src` into `self`, reusing the existing allocation.
    ///
    /// Sizes must match; this is the identity-preserving copy used by the
    /// buffer pool when seeding work buffers each tick.
    pub fn copy_from(&mut self, src: &Image) -> PaintboxResult<()> {
        if !self.same_size(src) {
            return Err(PaintboxError::validation(format!(
                "copy_from size mismatch: {}x{} vs {}x{}",
                self.width, self.height, src.width, src.height
            )));
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Set every pixel to `px`.
    pub fn fill(&mut self, px: [f32; 4]) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }
}

impl Default for Image {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }
}

fn checked_len(width: u32, height: u32) -> PaintboxResult<usize> {
    if width == 0 || height == 0 {
        return Err(PaintboxError::resource(format!(
            "image dimensions must be non-zero (got {width}x{height})"
        )));
    }
    if width > MAX_IMAGE_DIM || height > MAX_IMAGE_DIM {
        return Err(PaintboxError::resource(format!(
            "image dimensions {width}x{height} exceed the {MAX_IMAGE_DIM} limit"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| PaintboxError::resource("image buffer size overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_degenerate_sizes() {
        assert!(Image::new(0, 4).is_err());
        assert!(Image::new(4, 0).is_err());
        assert!(Image::new(MAX_IMAGE_DIM + 1, 4).is_err());
    }

    #[test]
    fn pixel_access_round_trips_and_clamps() {
        let mut img = Image::new(4, 2).unwrap();
        img.set_pixel(3, 1, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(img.pixel(3, 1), [0.1, 0.2, 0.3, 1.0]);
        // Out-of-range reads clamp to the nearest edge pixel.
        assert_eq!(img.pixel(99, 99), [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(img.pixel(-5, -5), img.pixel(0, 0));
    }

    #[test]
    fn copy_from_requires_matching_size() {
        let mut a = Image::new(2, 2).unwrap();
        let b = Image::new(3, 2).unwrap();
        assert!(a.copy_from(&b).is_err());
    }
}
