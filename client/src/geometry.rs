use std::f64::consts::PI;

use drawboard_shared::Point;

pub const POLYGON_SIDES: usize = 5;

pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if !point.is_finite() {
        return None;
    }
    Some(point)
}

pub fn circle_radius(center: Point, edge: Point) -> f64 {
    center.distance_to(edge)
}

// First vertex at angle zero, the rest at `2π / sides` steps.
pub fn polygon_vertices(center: Point, edge: Point, sides: usize) -> Vec<Point> {
    if sides == 0 {
        return Vec::new();
    }
    let radius = circle_radius(center, edge);
    let step = 2.0 * PI / sides as f64;
    (0..sides)
        .map(|i| {
            let angle = i as f64 * step;
            Point {
                x: center.x + radius * angle.cos(),
                y: center.y + radius * angle.sin(),
            }
        })
        .collect()
}

pub fn rect_between(start: Point, end: Point) -> Rect {
    Rect {
        origin: start,
        width: end.x - start.x,
        height: end.y - start.y,
    }
}

pub fn eraser_rect(center: Point, size: f64) -> Rect {
    Rect {
        origin: Point {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
        },
        width: size,
        height: size,
    }
}

pub fn backing_size(width: f64, height: f64, dpr: f64) -> (u32, u32) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let scale = |value: f64| (value.max(0.0) * dpr).round() as u32;
    (scale(width), scale(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn pentagon_vertices_sit_on_the_radius() {
        let center = Point::new(0.0, 0.0);
        let vertices = polygon_vertices(center, Point::new(10.0, 0.0), 5);
        assert_eq!(vertices.len(), 5);
        for (index, vertex) in vertices.iter().enumerate() {
            assert!((center.distance_to(*vertex) - 10.0).abs() < EPSILON);
            let angle = vertex.y.atan2(vertex.x).rem_euclid(2.0 * PI);
            let expected = (index as f64 * 72.0).to_radians();
            assert!(
                (angle - expected).abs() < 1e-9,
                "vertex {index} at {angle} expected {expected}"
            );
        }
        assert!((vertices[0].x - 10.0).abs() < EPSILON);
        assert!(vertices[0].y.abs() < EPSILON);
    }

    #[test]
    fn polygon_radius_ignores_drag_direction() {
        let vertices = polygon_vertices(Point::new(5.0, 5.0), Point::new(8.0, 9.0), 5);
        assert!((vertices[0].x - 10.0).abs() < EPSILON);
        assert!((vertices[0].y - 5.0).abs() < EPSILON);
    }

    #[test]
    fn degenerate_polygon_is_empty() {
        assert!(polygon_vertices(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 0).is_empty());
    }

    #[test]
    fn circle_radius_is_euclidean() {
        let radius = circle_radius(Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert!((radius - 5.0).abs() < EPSILON);
    }

    #[test]
    fn rect_keeps_drag_direction() {
        let rect = rect_between(Point::new(10.0, 10.0), Point::new(4.0, 16.0));
        assert_eq!(rect.origin, Point::new(10.0, 10.0));
        assert_eq!(rect.width, -6.0);
        assert_eq!(rect.height, 6.0);
    }

    #[test]
    fn eraser_rect_is_centred() {
        let rect = eraser_rect(Point::new(20.0, 30.0), 10.0);
        assert_eq!(rect.origin, Point::new(15.0, 25.0));
        assert_eq!(rect.width, 10.0);
        assert_eq!(rect.height, 10.0);
    }

    #[test]
    fn rejects_non_finite_points() {
        assert!(normalize_point(Point::new(f64::NAN, 0.0)).is_none());
        assert!(normalize_point(Point::new(1.0, 2.0)).is_some());
    }

    #[test]
    fn backing_size_follows_pixel_ratio() {
        assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
        assert_eq!(backing_size(100.5, 50.0, 1.5), (151, 75));
        assert_eq!(backing_size(100.0, 50.0, 0.0), (100, 50));
        assert_eq!(backing_size(-5.0, 50.0, 1.0), (0, 50));
    }
}
