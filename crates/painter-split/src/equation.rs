//! Conversion of geometric primitives into linear equation rows.
//!
//! Every row has the layout `[a, b, c, d]` for the equation `a·x + b·y + c·z = d`,
//! which is the width an [`AugmentedMatrix`](crate::AugmentedMatrix) over three
//! unknowns expects.

use nalgebra::{Point3, Vector3};

use crate::Plane3D;

/// The point-normal equation `n · x = n · p` of a plane.
#[inline]
pub fn plane_row(plane: &Plane3D) -> [f64; 4] {
    let n = plane.normal();
    [n.x, n.y, n.z, plane.offset()]
}

/// Two independent planes whose intersection is the line through `p1` and `p2`.
///
/// Both normals are unit length, perpendicular to the line direction and to
/// each other, so a residual against either plane is a true distance.
///
/// Returns `None` if the points coincide.
pub fn line_planes(p1: Point3<f64>, p2: Point3<f64>) -> Option<[Plane3D; 2]> {
    let direction = p2 - p1;
    let len = direction.norm();
    if len <= f64::EPSILON {
        return None;
    }
    let direction = direction / len;

    // Cross with the axis least aligned to the line to stay well conditioned
    let abs = direction.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };

    let first = direction.cross(&axis);
    let second = direction.cross(&first);

    Some([
        Plane3D::from_point_and_normal(p1, first)?,
        Plane3D::from_point_and_normal(p1, second)?,
    ])
}

/// The two equation rows of [`line_planes`].
pub fn line_rows(p1: Point3<f64>, p2: Point3<f64>) -> Option<[[f64; 4]; 2]> {
    let [a, b] = line_planes(p1, p2)?;
    Some([plane_row(&a), plane_row(&b)])
}

/// Inclusive bounds test for a point already known to lie on the line through `a` and `b`.
///
/// The point counts as inside when its projection onto the segment falls within
/// `[0, 1]` of the segment length, widened by `epsilon` on both ends.
pub fn segment_contains(a: Point3<f64>, b: Point3<f64>, point: Point3<f64>, epsilon: f64) -> bool {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::EPSILON {
        return (point - a).norm() <= epsilon;
    }
    let len = len_sq.sqrt();
    // Distance along the segment measured in world units
    let along = (point - a).dot(&ab) / len;
    along >= -epsilon && along <= len + epsilon
}
