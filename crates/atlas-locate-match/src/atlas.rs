//! Immutable reference atlas.

use atlas_locate_core::{GrayImage, GrayImageView, PixelRect, RgbImage, RgbImageView};

use crate::LocateError;

/// The large, static reference image every search runs against.
///
/// Built once and then only read. Besides the colour pixels it keeps a luma
/// plane plus summed-area tables of luma and luma², so the mean and variance
/// of any window are O(1) during the correlation scan.
#[derive(Clone, Debug)]
pub struct ReferenceAtlas {
    rgb: RgbImage,
    gray: GrayImage,
    /// `(width + 1) * (height + 1)` inclusive prefix sums, first row/col are zero.
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl ReferenceAtlas {
    pub fn new(rgb: RgbImage) -> Self {
        let gray = rgb.view().to_gray();
        let (sum, sum_sq) = integral_tables(&gray.view());
        Self {
            rgb,
            gray,
            sum,
            sum_sq,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rgb.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rgb.height
    }

    #[inline]
    pub fn rgb(&self) -> RgbImageView<'_> {
        self.rgb.view()
    }

    #[inline]
    pub fn gray(&self) -> GrayImageView<'_> {
        self.gray.view()
    }

    /// Copy out the `w x h` window at `(x, y)`.
    pub fn sub_region(
        &self,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
    ) -> Result<RgbImage, LocateError> {
        let rect = PixelRect::new(x, y, w, h);
        self.check_rect(&rect)?;
        self.rgb
            .view()
            .crop(&rect)
            .map_err(|_| self.out_of_bounds(rect))
    }

    pub(crate) fn check_rect(&self, rect: &PixelRect) -> Result<(), LocateError> {
        if rect.fits_within(self.width(), self.height()) {
            Ok(())
        } else {
            Err(self.out_of_bounds(*rect))
        }
    }

    fn out_of_bounds(&self, rect: PixelRect) -> LocateError {
        LocateError::OutOfBounds {
            rect,
            atlas_width: self.width(),
            atlas_height: self.height(),
        }
    }

    /// Sum and sum of squares of luma over a window. The window must fit.
    #[inline]
    pub(crate) fn window_sums(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let stride = self.width() + 1;
        let a = y * stride + x;
        let b = y * stride + x + w;
        let c = (y + h) * stride + x;
        let d = (y + h) * stride + x + w;
        (
            self.sum[d] - self.sum[b] - self.sum[c] + self.sum[a],
            self.sum_sq[d] - self.sum_sq[b] - self.sum_sq[c] + self.sum_sq[a],
        )
    }
}

fn integral_tables(gray: &GrayImageView<'_>) -> (Vec<f64>, Vec<f64>) {
    let stride = gray.width + 1;
    let mut sum = vec![0.0f64; stride * (gray.height + 1)];
    let mut sum_sq = vec![0.0f64; stride * (gray.height + 1)];
    for y in 0..gray.height {
        let row = gray.row(y);
        let mut acc = 0.0f64;
        let mut acc_sq = 0.0f64;
        for (x, &v) in row.iter().enumerate() {
            let v = v as f64;
            acc += v;
            acc_sq += v * v;
            let idx = (y + 1) * stride + x + 1;
            sum[idx] = sum[idx - stride] + acc;
            sum_sq[idx] = sum_sq[idx - stride] + acc_sq;
        }
    }
    (sum, sum_sq)
}
