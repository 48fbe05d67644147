//! Locating where an intersection line crosses a polygon's boundary.

use log::error;
use nalgebra::Point3;

use crate::equation::segment_contains;
use crate::{AugmentedMatrix, Polygon, SolutionType};

use super::cut::{Cut, SplitPoint};

/// Intersects the edge `a`–`b` with the line described by `line`.
///
/// `line` is a reduced two-plane system; the edge's own two line equations are
/// stacked underneath it. Only a [`SolutionType::Point`] result is a crossing;
/// the point may still lie outside the edge's bounds.
pub fn edge_crossing(a: Point3<f64>, b: Point3<f64>, line: &AugmentedMatrix) -> Option<Point3<f64>> {
    let mut system = line.stacked(2);
    system.add_line(a, b).ok()?;

    match system.solve() {
        SolutionType::Point => match system.point3_solution() {
            Ok(point) => Some(point),
            Err(err) if cfg!(debug_assertions) => {
                panic!("edge system classified as a point without one: {err}")
            }
            Err(err) => {
                error!("edge system classified as a point without one: {err}");
                None
            }
        },
        // Parallel, skew, or lying on the line itself
        SolutionType::Undefined
        | SolutionType::Unsolvable
        | SolutionType::Line
        | SolutionType::Plane
        | SolutionType::HigherDimension => None,
    }
}

/// Finds the chord the line cuts across `polygon`.
///
/// Edges are tested in index order; a crossing counts when it lies within the
/// edge's bounds, end points included. A crossing that coincides with one
/// already found (the line passing through a vertex hits both adjoining edges)
/// is recorded once. Exactly two distinct crossings make a cut; the search
/// gives up as soon as a third one turns up. Both the bounds test and the
/// coincidence test use `tolerance`, in world units.
pub fn find_cut<M>(polygon: &Polygon<M>, line: &AugmentedMatrix, tolerance: f64) -> Option<Cut> {
    let mut found: Vec<SplitPoint> = Vec::with_capacity(2);

    for (edge, a, b) in polygon.edges() {
        let Some(point) = edge_crossing(a, b, line) else {
            continue;
        };
        if !segment_contains(a, b, point, tolerance) {
            continue;
        }
        if found.iter().any(|s| (s.point - point).norm() <= tolerance) {
            continue;
        }
        if found.len() == 2 {
            return None;
        }
        found.push(SplitPoint { point, edge });
    }

    match found.as_slice() {
        [a, b] => Some(Cut::new(*a, *b)),
        _ => None,
    }
}

/// Returns `true` if both ends of `cut` lie on the line through one of the
/// polygon's own edges, i.e. splitting would only reproduce the polygon.
///
/// `tolerance` is the largest distance from the edge line still counted as on it.
pub fn lies_on_existing_edge<M>(polygon: &Polygon<M>, cut: &Cut, tolerance: f64) -> bool {
    polygon.edges().any(|(_, a, b)| {
        let mut edge_line = AugmentedMatrix::with_epsilon(2, 4, tolerance);
        edge_line.add_line(a, b).is_ok()
            && edge_line.satisfies_point(cut.first().point)
            && edge_line.satisfies_point(cut.second().point)
    })
}
