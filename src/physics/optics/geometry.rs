//! Axis-aligned refracting solids

use crate::physics::math::{Scalar, Vector};

/// An infinite plane through `point` with a unit `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vector,
    pub normal: Vector,
}

impl Plane {
    pub fn new(point: Vector, normal: Vector) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Ray parameter `t` at which `origin + t·direction` meets the plane.
    ///
    /// Returns `None` for rays parallel to the plane (`|n·d|` within
    /// `epsilon`), for non-finite results, and for hits at or behind the
    /// origin (`t <= epsilon`).
    pub fn intersect(&self, origin: Vector, direction: Vector, epsilon: Scalar) -> Option<Scalar> {
        let normal_dot_direction = self.normal.dot(direction);
        if normal_dot_direction.abs() <= epsilon {
            return None;
        }

        let t = self.normal.dot(self.point - origin) / normal_dot_direction;
        (t.is_finite() && t > epsilon).then_some(t)
    }
}

/// A rectangular block of transparent material
///
/// The six face planes are derived from the centre and dimensions and are
/// rebuilt whenever the dimensions or centre change.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry {
    center: Vector,
    width: Scalar,
    height: Scalar,
    depth: Scalar,
    refractive_index: Scalar,
    planes: [Plane; 6],
}

impl BoxGeometry {
    /// `width`, `height` and `depth` run along x, y and z.
    pub fn new(
        center: Vector,
        width: Scalar,
        height: Scalar,
        depth: Scalar,
        refractive_index: Scalar,
    ) -> Self {
        let (width, height, depth) = (width.abs(), height.abs(), depth.abs());
        Self {
            center,
            width,
            height,
            depth,
            refractive_index: refractive_index.abs(),
            planes: Self::face_planes(center, width, height, depth),
        }
    }

    fn face_planes(center: Vector, width: Scalar, height: Scalar, depth: Scalar) -> [Plane; 6] {
        let face = |normal: Vector, half: Scalar| Plane::new(center + normal * half, normal);
        [
            face(Vector::NEG_Z, depth / 2.0),
            face(Vector::Z, depth / 2.0),
            face(Vector::NEG_Y, height / 2.0),
            face(Vector::Y, height / 2.0),
            face(Vector::NEG_X, width / 2.0),
            face(Vector::X, width / 2.0),
        ]
    }

    pub fn center(&self) -> Vector {
        self.center
    }

    /// `(width, height, depth)`
    pub fn dimensions(&self) -> Vector {
        Vector::new(self.width, self.height, self.depth)
    }

    pub fn refractive_index(&self) -> Scalar {
        self.refractive_index
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn set_refractive_index(&mut self, refractive_index: Scalar) {
        self.refractive_index = refractive_index.abs();
    }

    pub fn set_center(&mut self, center: Vector) {
        self.center = center;
        self.planes = Self::face_planes(center, self.width, self.height, self.depth);
    }

    /// Inclusive bounding-box test, widened by `epsilon` on every side.
    pub fn is_inside(&self, point: Vector, epsilon: Scalar) -> bool {
        let half = self.dimensions() / 2.0 + Vector::splat(epsilon);
        let offset = (point - self.center).abs();
        offset.x <= half.x && offset.y <= half.y && offset.z <= half.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::math::EPSILON;

    #[test]
    fn test_planes_are_axis_aligned_faces() {
        let geometry = BoxGeometry::new(Vector::new(1.0, 0.0, 0.0), 4.0, 2.0, 6.0, 1.5);

        let planes = geometry.planes();
        assert_eq!(planes[0].point, Vector::new(1.0, 0.0, -3.0));
        assert_eq!(planes[3].point, Vector::new(1.0, 1.0, 0.0));
        assert_eq!(planes[5].point, Vector::new(3.0, 0.0, 0.0));
        for plane in planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-12);
            assert_eq!(plane.normal.abs().max_element(), 1.0);
        }
    }

    #[test]
    fn test_is_inside_is_inclusive_with_tolerance() {
        let geometry = BoxGeometry::new(Vector::ZERO, 2.0, 2.0, 2.0, 1.5);

        assert!(geometry.is_inside(Vector::ZERO, EPSILON));
        assert!(geometry.is_inside(Vector::new(1.0, 1.0, 1.0), 0.0));
        assert!(geometry.is_inside(Vector::new(1.0 + 1e-7, 0.0, 0.0), EPSILON));
        assert!(!geometry.is_inside(Vector::new(1.1, 0.0, 0.0), EPSILON));
    }

    #[test]
    fn test_plane_intersection() {
        let plane = Plane::new(Vector::new(0.0, 0.0, 5.0), Vector::Z);

        assert_eq!(plane.intersect(Vector::ZERO, Vector::Z, EPSILON), Some(5.0));
        // Behind the origin
        assert_eq!(plane.intersect(Vector::ZERO, -Vector::Z, EPSILON), None);
        // Parallel
        assert_eq!(plane.intersect(Vector::ZERO, Vector::X, EPSILON), None);
    }

    #[test]
    fn test_moving_the_box_moves_its_planes() {
        let mut geometry = BoxGeometry::new(Vector::ZERO, 2.0, 2.0, 2.0, 1.5);
        geometry.set_center(Vector::new(0.0, 10.0, 0.0));

        assert_eq!(geometry.planes()[3].point, Vector::new(0.0, 11.0, 0.0));
        assert!(geometry.is_inside(Vector::new(0.0, 10.5, 0.0), EPSILON));
    }
}
