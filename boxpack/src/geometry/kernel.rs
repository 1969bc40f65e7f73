use crate::geometry::geo_traits::{CollidesWith, Encloses, Shape};
use crate::geometry::primitives::{Cuboid, Dims, Point};

/// True iff the interiors of both boxes intersect. Touching boxes do not overlap.
pub fn overlaps(a: &Cuboid, b: &Cuboid) -> bool {
    a.collides_with(b)
}

/// True iff a box of `dims` with its lower corner at `position` lies entirely within a container of `container` dimensions.
pub fn fits(dims: Dims, position: Point, container: Dims) -> bool {
    container
        .bbox()
        .encloses(&Cuboid::from_placement(position, dims))
}

pub fn volume(dims: Dims) -> f64 {
    dims.volume()
}

/// `used_volume` as a percentage of `total_volume`, 0 for an empty container.
pub fn utilization(total_volume: f64, used_volume: f64) -> f64 {
    if total_volume == 0.0 {
        return 0.0;
    }
    used_volume / total_volume * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn cube(x: f64, y: f64, z: f64, size: f64) -> Cuboid {
        Cuboid::from_placement(Point::new(x, y, z), Dims::new(size, size, size))
    }

    #[test]
    fn overlapping_boxes_collide() {
        assert!(overlaps(&cube(0.0, 0.0, 0.0, 5.0), &cube(3.0, 3.0, 3.0, 5.0)));
    }

    #[test]
    fn distant_boxes_do_not_collide() {
        assert!(!overlaps(&cube(0.0, 0.0, 0.0, 5.0), &cube(10.0, 10.0, 10.0, 5.0)));
    }

    #[test]
    fn touching_boxes_do_not_collide() {
        let a = cube(0.0, 0.0, 0.0, 5.0);
        assert!(!overlaps(&a, &cube(5.0, 0.0, 0.0, 5.0)));
        assert!(!overlaps(&a, &cube(5.0, 5.0, 0.0, 5.0)));
        assert!(!overlaps(&a, &cube(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn nested_box_collides() {
        assert!(overlaps(&cube(0.0, 0.0, 0.0, 10.0), &cube(2.0, 2.0, 2.0, 1.0)));
    }

    #[test]
    fn fits_respects_every_axis() {
        let container = Dims::new(10.0, 10.0, 10.0);
        let item = Dims::new(5.0, 5.0, 5.0);
        assert!(fits(item, Point::ORIGIN, container));
        assert!(fits(item, Point::new(5.0, 5.0, 5.0), container));
        assert!(!fits(item, Point::new(6.0, 0.0, 0.0), container));
        assert!(!fits(item, Point::new(0.0, 6.0, 0.0), container));
        assert!(!fits(item, Point::new(0.0, 0.0, 6.0), container));
        assert!(!fits(item, Point::new(-1.0, 0.0, 0.0), container));
        assert!(!fits(Dims::new(11.0, 1.0, 1.0), Point::ORIGIN, container));
    }

    #[test]
    fn utilization_is_percentage() {
        assert!(approx_eq!(f64, utilization(1000.0, 250.0), 25.0));
        assert!(approx_eq!(f64, utilization(64.0, 64.0), 100.0));
        assert_eq!(utilization(0.0, 10.0), 0.0);
    }

    #[test]
    fn volume_is_product() {
        assert!(approx_eq!(f64, volume(Dims::new(2.0, 3.0, 4.0)), 24.0));
    }
}
