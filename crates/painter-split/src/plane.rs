//! Supporting planes of polygons.

use nalgebra::{Point3, Vector3};

/// Default base tolerance.
///
/// The solver uses it as is. Geometric tests made while splitting widen it by
/// the size of the polygons involved and by how close to parallel their planes
/// are; see [`SplitConfig::tolerance`](crate::SplitConfig::tolerance).
pub const EPSILON: f64 = 1e-10;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// A plane in 3D space, stored as a unit normal and an anchor point on the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane3D {
    normal: Vector3<f64>,
    point: Point3<f64>,
}

impl Plane3D {
    /// Creates a plane from a point on the plane and a normal vector.
    /// The normal will be normalized automatically.
    ///
    /// Returns `None` if the normal has (near) zero length.
    pub fn from_point_and_normal(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let norm = normal.norm();
        if norm <= EPSILON || !norm.is_finite() {
            return None;
        }
        Some(Self {
            normal: normal / norm,
            point,
        })
    }

    /// Creates a plane through `point` spanned by the vectors `u` and `v`.
    /// The normal is `u × v`, normalized.
    ///
    /// Returns `None` if `u` and `v` are parallel, i.e. the sine of the angle
    /// between them is within [`EPSILON`] of zero. The test does not depend on
    /// the lengths of `u` and `v`.
    pub fn from_spanning_vectors(
        u: Vector3<f64>,
        v: Vector3<f64>,
        point: Point3<f64>,
    ) -> Option<Self> {
        let normal = u.cross(&v);
        let norm = normal.norm();
        if !norm.is_finite() || norm <= EPSILON * u.norm() * v.norm() {
            return None;
        }
        Some(Self {
            normal: normal / norm,
            point,
        })
    }

    /// Creates a plane from three non-collinear points, anchored at `a`.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Returns `None` if the points are collinear (or nearly so).
    pub fn from_three_points(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Option<Self> {
        Self::from_spanning_vectors(b - a, c - a, a)
    }

    /// Returns the unit normal vector of the plane.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Returns the anchor point the plane was built from.
    #[inline]
    pub fn point(&self) -> Point3<f64> {
        self.point
    }

    /// Returns the signed distance from the origin to the plane along the normal,
    /// i.e. the right-hand side of `n · x = n · p`.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.normal.dot(&self.point.coords)
    }

    /// Computes the signed distance from a point to the plane.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.point))
    }

    /// Classifies which side of the plane a point lies on, using [`EPSILON`].
    #[inline]
    pub fn classify_point(&self, point: Point3<f64>) -> PlaneSide {
        self.classify_point_with_epsilon(point, EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<f64>, epsilon: f64) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Returns a new plane with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            point: self.point,
        }
    }

    /// Returns this plane with its normal pointing towards `reference`.
    ///
    /// A reference point lying on the plane keeps the current orientation.
    pub fn facing(&self, reference: Point3<f64>) -> Self {
        if self.signed_distance(reference) < 0.0 {
            self.flipped()
        } else {
            self.clone()
        }
    }

    /// Returns `true` if both planes have the same unit normal within `epsilon`
    /// (component-wise). Opposite normals are not considered equal.
    pub fn same_normal(&self, other: &Plane3D, epsilon: f64) -> bool {
        (self.normal - other.normal).iter().all(|d| d.abs() <= epsilon)
    }

    /// Projects a point onto the plane (finds the closest point on the plane).
    #[inline]
    pub fn project_point(&self, point: Point3<f64>) -> Point3<f64> {
        point - self.normal * self.signed_distance(point)
    }
}
