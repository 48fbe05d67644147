//! Polygon representation shared by the splitter and the orderer.

use nalgebra::{Point3, Vector3};

use crate::{MeanDistance, OrderStrategy, Plane3D, PlaneSide};

/// A flat polygon in 3D space: an ordered, closed loop of vertices plus the
/// material (or owning shape) it was generated from.
///
/// Edge `k` runs from vertex `k` to vertex `k + 1`, wrapping back to vertex 0
/// after the last one.
///
/// Polygons with two or fewer vertices, or whose first three vertices are
/// collinear, are *degenerate*: they have no supporting plane and are passed
/// through the splitter untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<M = ()> {
    vertices: Vec<Point3<f64>>,
    material: M,
}

impl Polygon {
    /// Creates a polygon without a material.
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        Self::with_material(vertices, ())
    }
}

impl<M> Polygon<M> {
    /// Creates a polygon carrying `material`.
    pub fn with_material(vertices: Vec<Point3<f64>>, material: M) -> Self {
        Self { vertices, material }
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Returns the material the polygon was created with.
    #[inline]
    pub fn material(&self) -> &M {
        &self.material
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` if the polygon has no supporting plane.
    pub fn is_degenerate(&self) -> bool {
        self.plane().is_none()
    }

    /// Returns the supporting plane, anchored at the first vertex.
    ///
    /// The normal is the normalized cross product of the first two edge
    /// vectors. Returns `None` for degenerate polygons.
    pub fn plane(&self) -> Option<Plane3D> {
        match self.vertices.as_slice() {
            [a, b, c, ..] => Plane3D::from_three_points(*a, *b, *c),
            _ => None,
        }
    }

    /// Returns the unit normal of the supporting plane.
    pub fn unit_normal(&self) -> Option<Vector3<f64>> {
        self.plane().map(|plane| plane.normal())
    }

    /// Returns `true` if every vertex lies on the supporting plane within `epsilon`.
    pub fn is_planar(&self, epsilon: f64) -> bool {
        let Some(plane) = self.plane() else {
            return false;
        };
        self.vertices
            .iter()
            .all(|v| plane.classify_point_with_epsilon(*v, epsilon) == PlaneSide::OnPlane)
    }

    /// Iterates over the edges as `(index, start, end)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, Point3<f64>, Point3<f64>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| (k, self.vertices[k], self.vertices[(k + 1) % n]))
    }

    /// Computes the centroid (vertex average) of the polygon.
    pub fn centroid(&self) -> Point3<f64> {
        let sum: Vector3<f64> = self.vertices.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Mean Euclidean distance from `from` to each vertex.
    ///
    /// Returns `0.0` for a polygon without vertices.
    pub fn mean_distance(&self, from: Point3<f64>) -> f64 {
        MeanDistance.key(from, &self.vertices)
    }

    /// Largest absolute coordinate of any vertex.
    pub fn extent(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.coords.amax())
            .fold(0.0, f64::max)
    }

    /// Enclosed area, computed with Newell's method.
    pub fn area(&self) -> f64 {
        let twice: Vector3<f64> = self
            .edges()
            .map(|(_, a, b)| a.coords.cross(&b.coords))
            .sum();
        twice.norm() / 2.0
    }

    /// Returns the same outline with a different material.
    pub fn map_material<N>(self, f: impl FnOnce(M) -> N) -> Polygon<N> {
        Polygon {
            vertices: self.vertices,
            material: f(self.material),
        }
    }
}
