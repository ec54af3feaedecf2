use crate::rect::PixelRect;

/// Errors produced when wrapping raw pixel buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid pixel buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error(
        "crop {rect:?} exceeds image bounds (width={width}, height={height})"
    )]
    CropOutOfBounds {
        rect: PixelRect,
        width: usize,
        height: usize,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl<'a> GrayImageView<'a> {
    /// One row of pixels. Panics when `y` is out of range.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

/// Borrowed interleaved RGB8 image (`len = w*h*3`, row-major).
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

/// Owned interleaved RGB8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

fn expected_rgb_len(width: usize, height: usize) -> Result<usize, ImageError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or(ImageError::InvalidDimensions { width, height })
}

impl RgbImage {
    /// Wrap an existing buffer, checking its length against the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = expected_rgb_len(width, height)?;
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image filled with a single colour.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let idx = (y * self.width + x) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Copy `src` into this image with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside this image are dropped.
    pub fn blit(&mut self, src: &RgbImageView<'_>, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = src.width.min(self.width - x);
        let h = src.height.min(self.height - y);
        for row in 0..h {
            let s = row * src.width * 3;
            let d = ((y + row) * self.width + x) * 3;
            self.data[d..d + w * 3].copy_from_slice(&src.data[s..s + w * 3]);
        }
    }
}

impl<'a> RgbImageView<'a> {
    pub fn from_slice(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        let expected = expected_rgb_len(width, height)?;
        if data.len() != expected {
            return Err(ImageError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Whether `rect` lies entirely inside the image.
    #[inline]
    pub fn contains(&self, rect: &PixelRect) -> bool {
        rect.fits_within(self.width, self.height)
    }

    /// Copy out a rectangle. Never clamps: an out-of-range rectangle is an error.
    pub fn crop(&self, rect: &PixelRect) -> Result<RgbImage, ImageError> {
        if !self.contains(rect) {
            return Err(ImageError::CropOutOfBounds {
                rect: *rect,
                width: self.width,
                height: self.height,
            });
        }
        let row_len = rect.width * 3;
        let mut data = Vec::with_capacity(row_len * rect.height);
        for y in rect.y..rect.y + rect.height {
            let start = (y * self.width + rect.x) * 3;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Ok(RgbImage {
            width: rect.width,
            height: rect.height,
            data,
        })
    }

    /// Convert to 8-bit luma with ITU-R BT.601 weights.
    pub fn to_gray(&self) -> GrayImage {
        let data = self
            .data
            .chunks_exact(3)
            .map(|p| luma_u8([p[0], p[1], p[2]]))
            .collect();
        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// BT.601 luma, rounded to nearest.
#[inline]
pub fn luma_u8(rgb: [u8; 3]) -> u8 {
    let y = 0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32;
    y.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> RgbImage {
        let mut img = RgbImage::filled(width, height, [0, 0, 0]);
        for y in 0..height {
            for x in 0..width {
                img.put_pixel(x, y, [x as u8, y as u8, (x + y) as u8]);
            }
        }
        img
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = RgbImage::from_raw(4, 4, vec![0; 47]).unwrap_err();
        assert_eq!(
            err,
            ImageError::InvalidBuffer {
                expected: 48,
                got: 47
            }
        );
    }

    #[test]
    fn crop_copies_the_requested_window() {
        let img = gradient(10, 8);
        let crop = img.view().crop(&PixelRect::new(3, 2, 4, 5)).expect("crop");
        assert_eq!((crop.width, crop.height), (4, 5));
        assert_eq!(crop.view().pixel(0, 0), [3, 2, 5]);
        assert_eq!(crop.view().pixel(3, 4), [6, 6, 12]);
    }

    #[test]
    fn crop_never_truncates() {
        let img = gradient(10, 8);
        let err = img.view().crop(&PixelRect::new(7, 0, 4, 2)).unwrap_err();
        assert!(matches!(err, ImageError::CropOutOfBounds { .. }));
    }

    #[test]
    fn blit_then_crop_recovers_source() {
        let src = gradient(5, 3);
        let mut dst = RgbImage::filled(20, 20, [9, 9, 9]);
        dst.blit(&src.view(), 11, 6);
        let back = dst.view().crop(&PixelRect::new(11, 6, 5, 3)).expect("crop");
        assert_eq!(back, src);
        assert_eq!(dst.view().pixel(10, 6), [9, 9, 9]);
    }

    #[test]
    fn luma_of_extremes() {
        assert_eq!(luma_u8([0, 0, 0]), 0);
        assert_eq!(luma_u8([255, 255, 255]), 255);
        assert_eq!(luma_u8([255, 0, 0]), 76);
    }
}
