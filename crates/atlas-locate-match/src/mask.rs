//! Binary pixel masks over the extracted region.

use atlas_locate_core::GrayImageView;

/// Which pixels of a region belong to a mask, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl RegionMask {
    fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Filled disk of `radius` centred on `(width / 2, height / 2)`.
    pub fn disk(width: usize, height: usize, radius: f32) -> Self {
        Self::annulus(width, height, 0.0, radius)
    }

    /// Ring `inner < d <= outer` around `(width / 2, height / 2)`.
    ///
    /// With `inner == 0` the centre pixel is included.
    pub fn annulus(width: usize, height: usize, inner: f32, outer: f32) -> Self {
        let cx = (width / 2) as f32;
        let cy = (height / 2) as f32;
        let inner2 = inner * inner;
        let outer2 = outer * outer;
        Self::from_fn(width, height, |x, y| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d2 = dx * dx + dy * dy;
            outer >= 0.0 && d2 <= outer2 && (inner <= 0.0 || d2 > inner2)
        })
    }

    /// Pixels brighter than `threshold` are set.
    pub fn from_luma(image: &GrayImageView<'_>, threshold: u8) -> Self {
        let bits = image.data.iter().map(|&v| v > threshold).collect();
        Self {
            width: image.width,
            height: image.height,
            bits,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Row-major indices of set pixels.
    pub(crate) fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_is_centred_and_symmetric() {
        let m = RegionMask::disk(11, 11, 2.0);
        assert!(m.contains(5, 5));
        assert!(m.contains(3, 5) && m.contains(7, 5) && m.contains(5, 3) && m.contains(5, 7));
        assert!(!m.contains(2, 5));
        assert!(!m.contains(3, 3));
        // 13 lattice points within radius 2.
        assert_eq!(m.count(), 13);
    }

    #[test]
    fn annulus_excludes_inner_disk() {
        let inner = RegionMask::disk(21, 21, 3.0);
        let ring = RegionMask::annulus(21, 21, 3.0, 6.0);
        for y in 0..21 {
            for x in 0..21 {
                assert!(!(inner.contains(x, y) && ring.contains(x, y)));
            }
        }
        assert!(ring.contains(10 + 5, 10));
        assert!(!ring.contains(10, 10));
    }

    #[test]
    fn luma_threshold_is_strict() {
        let data = [0u8, 10, 11, 255];
        let view = GrayImageView {
            width: 2,
            height: 2,
            data: &data,
        };
        let m = RegionMask::from_luma(&view, 10);
        assert_eq!(m.indices().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn out_of_range_is_not_contained() {
        let m = RegionMask::disk(5, 5, 10.0);
        assert!(!m.is_empty());
        assert!(!m.contains(5, 0));
    }
}
