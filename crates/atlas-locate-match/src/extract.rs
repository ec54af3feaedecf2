//! Cropping the indicator region out of a captured frame.

use atlas_locate_core::{GrayImage, PixelRect, RgbImage, RgbImageView};

use crate::LocateError;

/// The fixed-size crop believed to contain the positional indicator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedRegion {
    pub pixels: RgbImage,
}

impl ExtractedRegion {
    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height
    }

    #[inline]
    pub fn view(&self) -> RgbImageView<'_> {
        self.pixels.view()
    }

    pub fn to_gray(&self) -> GrayImage {
        self.pixels.view().to_gray()
    }
}

/// Crops a fixed rectangle from every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionExtractor {
    rect: PixelRect,
}

impl RegionExtractor {
    pub fn new(rect: PixelRect) -> Result<Self, LocateError> {
        if rect.is_empty() {
            return Err(LocateError::InvalidRegion {
                width: rect.width,
                height: rect.height,
            });
        }
        Ok(Self { rect })
    }

    #[inline]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn extract(&self, frame: &RgbImageView<'_>) -> Result<ExtractedRegion, LocateError> {
        let too_small = || LocateError::FrameTooSmall {
            frame_width: frame.width,
            frame_height: frame.height,
            region: self.rect,
        };
        if !frame.contains(&self.rect) {
            return Err(too_small());
        }
        let pixels = frame.crop(&self.rect).map_err(|_| too_small())?;
        Ok(ExtractedRegion { pixels })
    }
}
