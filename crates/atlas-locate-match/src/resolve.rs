use nalgebra::Point2;

use crate::MatchCandidate;

/// Converts a matched window's top-left corner into the indicator centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionResolver {
    half_width: usize,
    half_height: usize,
}

impl PositionResolver {
    pub fn new(region_width: usize, region_height: usize) -> Self {
        Self {
            half_width: region_width / 2,
            half_height: region_height / 2,
        }
    }

    #[inline]
    pub fn resolve(&self, candidate: &MatchCandidate) -> Point2<usize> {
        Point2::new(
            candidate.top_left.x + self.half_width,
            candidate.top_left.y + self.half_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_by_half_region_rounding_down() {
        let resolver = PositionResolver::new(252, 253);
        let c = MatchCandidate {
            top_left: Point2::new(100, 40),
            score: 0.9,
        };
        assert_eq!(resolver.resolve(&c), Point2::new(226, 166));
    }

    #[test]
    fn origin_maps_to_half_extent() {
        let resolver = PositionResolver::new(7, 4);
        let c = MatchCandidate {
            top_left: Point2::new(0, 0),
            score: 0.0,
        };
        assert_eq!(resolver.resolve(&c), Point2::new(3, 2));
    }
}
