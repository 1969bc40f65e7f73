use crate::geometry::primitives::Dims;

/// One of the six axis-aligned relabelings of a box's `(width, height, depth)`.
///
/// The variant name lists which original extent ends up on the x, y and z axis respectively.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    WHD,
    WDH,
    HWD,
    HDW,
    DWH,
    DHW,
}

impl Orientation {
    /// All orientations, in the order in which placement searches try them.
    pub const ALL: [Orientation; 6] = [
        Orientation::WHD,
        Orientation::WDH,
        Orientation::HWD,
        Orientation::HDW,
        Orientation::DWH,
        Orientation::DHW,
    ];

    pub fn apply(self, dims: Dims) -> Dims {
        let Dims {
            width: w,
            height: h,
            depth: d,
        } = dims;
        match self {
            Orientation::WHD => Dims::new(w, h, d),
            Orientation::WDH => Dims::new(w, d, h),
            Orientation::HWD => Dims::new(h, w, d),
            Orientation::HDW => Dims::new(h, d, w),
            Orientation::DWH => Dims::new(d, w, h),
            Orientation::DHW => Dims::new(d, h, w),
        }
    }
}

/// A candidate orientation of a box together with the dimensions it produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedDims {
    pub orientation: Orientation,
    pub dims: Dims,
    /// Whether `dims` differs from the original dimensions.
    /// Permutations of equal extents (e.g. on a cube) are not considered rotations.
    pub rotated: bool,
}

impl OrientedDims {
    /// The dimensions as given, without any relabeling
    pub fn original(dims: Dims) -> Self {
        OrientedDims {
            orientation: Orientation::WHD,
            dims,
            rotated: false,
        }
    }
}

/// Enumerates all six orientations of `dims`.
///
/// Degenerate boxes (equal extents) still produce six entries, some of them with identical dimensions.
pub fn orientations(dims: Dims) -> [OrientedDims; 6] {
    Orientation::ALL.map(|orientation| {
        let o_dims = orientation.apply(dims);
        OrientedDims {
            orientation,
            dims: o_dims,
            rotated: o_dims != dims,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_permutations_in_fixed_order() {
        let dims = Dims::new(1.0, 2.0, 3.0);
        let expected = [
            [1.0, 2.0, 3.0],
            [1.0, 3.0, 2.0],
            [2.0, 1.0, 3.0],
            [2.0, 3.0, 1.0],
            [3.0, 1.0, 2.0],
            [3.0, 2.0, 1.0],
        ];
        let actual = orientations(dims).map(|o| o.dims.as_array());
        assert_eq!(actual, expected);
    }

    #[test]
    fn only_identity_is_unrotated_for_distinct_extents() {
        let oriented = orientations(Dims::new(4.0, 9.0, 4.5));
        assert!(!oriented[0].rotated);
        assert!(oriented[1..].iter().all(|o| o.rotated));
    }

    #[test]
    fn cube_is_never_rotated() {
        let oriented = orientations(Dims::new(2.0, 2.0, 2.0));
        assert_eq!(oriented.len(), 6);
        assert!(oriented.iter().all(|o| !o.rotated));
    }

    #[test]
    fn swapping_equal_extents_is_not_a_rotation() {
        // w == d, so swapping them (DHW) reproduces the original order
        let oriented = orientations(Dims::new(4.0, 9.0, 4.0));
        let dhw = oriented
            .iter()
            .find(|o| o.orientation == Orientation::DHW)
            .unwrap();
        assert!(!dhw.rotated);
    }

    #[test]
    fn every_orientation_preserves_the_multiset() {
        let dims = Dims::new(7.0, 1.5, 3.0);
        for o in orientations(dims) {
            assert!(o.dims.same_multiset(&dims));
        }
    }
}
