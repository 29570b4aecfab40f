//! Geometry primitives shared by the layout model and the hit tests.

use serde::{Deserialize, Serialize};

/// 2-D point on the map plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 3-D point; `z` is the stack axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Point at `z` on the stack axis, centered on the map plane.
    pub fn at_height(z: f64) -> Self {
        Self { x: 0.0, y: 0.0, z }
    }
}

/// Outline polygon of a floor, building or place, as reported by the
/// renderer. Any third coordinate has already been dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Footprint {
    pub points: Vec<Point2>,
}

/// Point-in-polygon test via ray casting over a simple (possibly
/// non-convex) polygon.
///
/// A crossing is counted when the point's y lies strictly between the
/// edge endpoints' y values (half-open, so a vertex shared by two edges
/// is counted once) and the point's x is left of the edge's
/// x-intersection at that y. Odd crossing parity means inside.
pub fn point_in_polygon(point: Point2, polygon: &[Point2]) -> bool {
    let (x, y) = (point.x, point.y);
    let mut inside = false;

    let n = polygon.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = (polygon[i].x, polygon[i].y);
        let (xj, yj) = (polygon[j].x, polygon[j].y);

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Thickness parameters of one floor in a stack, ordered by level index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloorStack {
    pub stack_height_min: f64,
    pub stack_height_max: f64,
    pub stack_gap: f64,
}

/// Signed stack heights relative to the ground floor.
///
/// Walks outward from `ground_index` in both directions: going up, each
/// floor starts where the previous floor's usable volume plus its gap
/// ends; going down, the symmetric subtraction applies. The ground
/// floor itself is at exactly 0.
pub fn ground_stack_heights(floors: &[FloorStack], ground_index: usize) -> Vec<f64> {
    let mut heights = vec![0.0; floors.len()];
    if floors.is_empty() {
        return heights;
    }

    let mut cumul = 0.0;
    for i in (ground_index + 1)..floors.len() {
        cumul += floors[i - 1].stack_height_max + floors[i - 1].stack_gap
            - floors[i].stack_height_min;
        heights[i] = cumul;
    }
    cumul = 0.0;
    for i in (0..ground_index).rev() {
        cumul -= floors[i].stack_height_max + floors[i].stack_gap - floors[i + 1].stack_height_min;
        heights[i] = cumul;
    }
    heights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
        ]
    }

    #[test]
    fn test_point_inside_square() {
        assert!(point_in_polygon(Point2::new(5.0, 5.0), &square()));
    }

    #[test]
    fn test_point_outside_square() {
        assert!(!point_in_polygon(Point2::new(15.0, 5.0), &square()));
    }

    #[test]
    fn test_boundary_is_deterministic() {
        let polygon = square();
        let boundary = Point2::new(0.0, 5.0);
        let first = point_in_polygon(boundary, &polygon);
        for _ in 0..10 {
            assert_eq!(point_in_polygon(boundary, &polygon), first);
        }
    }

    #[test]
    fn test_non_convex_polygon() {
        // L-shape: the notch at (7,7) is outside
        let polygon = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(5.0, 5.0),
            Point2::new(5.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point2::new(2.0, 8.0), &polygon));
        assert!(!point_in_polygon(Point2::new(7.0, 7.0), &polygon));
    }

    #[test]
    fn test_empty_polygon_is_outside() {
        assert!(!point_in_polygon(Point2::new(0.0, 0.0), &[]));
    }

    #[test]
    fn test_ground_stack_heights_two_floors() {
        // F0(level 0, max=3, gap=0.5, min=0), F1(level 1, max=3, gap=0.5, min=0)
        let floors = [
            FloorStack {
                stack_height_min: 0.0,
                stack_height_max: 3.0,
                stack_gap: 0.5,
            },
            FloorStack {
                stack_height_min: 0.0,
                stack_height_max: 3.0,
                stack_gap: 0.5,
            },
        ];
        let heights = ground_stack_heights(&floors, 0);
        assert_eq!(heights[0], 0.0);
        assert_eq!(heights[1], 3.5);
    }

    #[test]
    fn test_ground_stack_heights_with_basement() {
        // B1(max=4, gap=0), F0(ground, max=3, gap=0.5), F1
        let floors = [
            FloorStack {
                stack_height_min: 0.0,
                stack_height_max: 4.0,
                stack_gap: 0.0,
            },
            FloorStack {
                stack_height_min: 0.0,
                stack_height_max: 3.0,
                stack_gap: 0.5,
            },
            FloorStack {
                stack_height_min: 0.5,
                stack_height_max: 3.0,
                stack_gap: 0.5,
            },
        ];
        let heights = ground_stack_heights(&floors, 1);
        assert_eq!(heights[1], 0.0);
        // down: -(4.0 + 0.0 - 0.0) = -4.0
        assert_eq!(heights[0], -4.0);
        // up: 3.0 + 0.5 - 0.5 = 3.0
        assert_eq!(heights[2], 3.0);
    }
}
