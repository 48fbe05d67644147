//! Shapes that contribute polygons to a [`Scene`](crate::Scene).

use nalgebra::{Point3, Rotation3, Vector3};

use crate::Polygon;

/// Anything that can report its current faces as flat polygons.
pub trait Shape<M> {
    /// Returns the faces of the shape in world space.
    fn faces(&self) -> Vec<Polygon<M>>;
}

impl<M: Clone> Shape<M> for Polygon<M> {
    fn faces(&self) -> Vec<Polygon<M>> {
        vec![self.clone()]
    }
}

impl<M: Clone> Shape<M> for Vec<Polygon<M>> {
    fn faces(&self) -> Vec<Polygon<M>> {
        self.clone()
    }
}

/// A single triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle<M> {
    vertices: [Point3<f64>; 3],
    material: M,
}

impl<M> Triangle<M> {
    /// Creates a triangle; the winding `a → b → c` fixes the normal direction.
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>, material: M) -> Self {
        Self {
            vertices: [a, b, c],
            material,
        }
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>; 3] {
        &self.vertices
    }
}

impl<M: Clone> Shape<M> for Triangle<M> {
    fn faces(&self) -> Vec<Polygon<M>> {
        vec![Polygon::with_material(
            self.vertices.to_vec(),
            self.material.clone(),
        )]
    }
}

/// A parallelogram defined by a corner and two edge vectors.
///
/// The four vertices are `origin`, `origin + u`, `origin + u + v` and
/// `origin + v`, so the normal follows `u × v`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad<M> {
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    material: M,
}

impl<M> Quad<M> {
    /// Creates a quad from a corner and two edge vectors.
    pub fn new(origin: Point3<f64>, u: Vector3<f64>, v: Vector3<f64>, material: M) -> Self {
        Self {
            origin,
            u,
            v,
            material,
        }
    }

    /// Returns the four corners in winding order.
    pub fn vertices(&self) -> [Point3<f64>; 4] {
        [
            self.origin,
            self.origin + self.u,
            self.origin + self.u + self.v,
            self.origin + self.v,
        ]
    }
}

impl<M: Clone> Shape<M> for Quad<M> {
    fn faces(&self) -> Vec<Polygon<M>> {
        vec![Polygon::with_material(
            self.vertices().to_vec(),
            self.material.clone(),
        )]
    }
}

/// Corner indices of the six cuboid faces, wound counter-clockwise seen from outside.
const CUBOID_FACES: [[usize; 4]; 6] = [
    [4, 5, 6, 7], // +Z
    [1, 0, 3, 2], // -Z
    [0, 4, 7, 3], // -X
    [5, 1, 2, 6], // +X
    [7, 6, 2, 3], // +Y
    [0, 1, 5, 4], // -Y
];

/// A box with an arbitrary orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid<M> {
    center: Point3<f64>,
    half_extents: Vector3<f64>,
    rotation: Rotation3<f64>,
    material: M,
}

impl<M> Cuboid<M> {
    /// Creates an axis-aligned box.
    pub fn new(center: Point3<f64>, half_extents: Vector3<f64>, material: M) -> Self {
        Self {
            center,
            half_extents,
            rotation: Rotation3::identity(),
            material,
        }
    }

    /// Creates an axis-aligned cube with edge length `size`.
    pub fn cube(center: Point3<f64>, size: f64, material: M) -> Self {
        Self::new(center, Vector3::repeat(size / 2.0), material)
    }

    /// Rotates the box about its center.
    pub fn rotated(mut self, rotation: Rotation3<f64>) -> Self {
        self.rotation = rotation * self.rotation;
        self
    }

    /// Moves the box.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.center += offset;
    }

    /// Returns the center of the box.
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        self.center
    }

    /// Returns the eight corners in world space.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let h = self.half_extents;
        [
            Vector3::new(-h.x, -h.y, -h.z),
            Vector3::new(h.x, -h.y, -h.z),
            Vector3::new(h.x, h.y, -h.z),
            Vector3::new(-h.x, h.y, -h.z),
            Vector3::new(-h.x, -h.y, h.z),
            Vector3::new(h.x, -h.y, h.z),
            Vector3::new(h.x, h.y, h.z),
            Vector3::new(-h.x, h.y, h.z),
        ]
        .map(|offset| self.center + self.rotation * offset)
    }
}

impl<M: Clone> Shape<M> for Cuboid<M> {
    fn faces(&self) -> Vec<Polygon<M>> {
        let corners = self.corners();
        CUBOID_FACES
            .iter()
            .map(|face| {
                Polygon::with_material(
                    face.iter().map(|&k| corners[k]).collect(),
                    self.material.clone(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Unit;

    #[test]
    fn triangle_has_one_face() {
        let triangle = Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            'a',
        );
        let faces = triangle.faces();

        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].vertices(), triangle.vertices());
        assert_eq!(*faces[0].material(), 'a');
    }

    #[test]
    fn quad_normal_follows_u_cross_v() {
        let quad = Quad::new(Point3::origin(), Vector3::x() * 2.0, Vector3::y() * 3.0, ());
        let face = &quad.faces()[0];

        assert_relative_eq!(face.unit_normal().unwrap(), Vector3::z());
        assert_relative_eq!(face.area(), 6.0);
        assert_eq!(face.vertices()[2], Point3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn cube_faces_point_outwards() {
        let center = Point3::new(1.0, 2.0, 3.0);
        let cube = Cuboid::cube(center, 2.0, ());
        let faces = cube.faces();

        assert_eq!(faces.len(), 6);
        for face in &faces {
            let outward = face.centroid() - center;
            assert_relative_eq!(face.unit_normal().unwrap(), outward.normalize());
            assert_relative_eq!(face.area(), 4.0);
        }
    }

    #[test]
    fn rotated_cuboid_keeps_planar_faces() {
        let axis = Unit::new_normalize(Vector3::new(1.0, 2.0, 0.5));
        let cuboid = Cuboid::new(Point3::origin(), Vector3::new(1.0, 2.0, 0.5), 0_u8)
            .rotated(Rotation3::from_axis_angle(&axis, 0.9));

        let total: f64 = cuboid.faces().iter().map(|f| f.area()).sum();
        assert_relative_eq!(total, 2.0 * (4.0 * 2.0 + 4.0 * 1.0 + 2.0 * 1.0), epsilon = 1e-10);
        assert!(cuboid.faces().iter().all(|f| f.is_planar(1e-10)));
    }

    #[test]
    fn translate_moves_every_corner() {
        let mut cube = Cuboid::cube(Point3::origin(), 1.0, ());
        let before = cube.corners();
        cube.translate(Vector3::new(0.0, 5.0, 0.0));

        assert_eq!(cube.center(), Point3::new(0.0, 5.0, 0.0));
        for (a, b) in before.iter().zip(cube.corners()) {
            assert_relative_eq!(b - a, Vector3::new(0.0, 5.0, 0.0), epsilon = 1e-12);
        }
    }
}
