//! Cutting a single polygon along a chord between two of its edges.

use nalgebra::Point3;

use crate::Polygon;

/// Where the intersection line crosses the boundary of a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPoint {
    /// The crossing coordinate.
    pub point: Point3<f64>,
    /// Index of the edge the crossing lies on.
    pub edge: usize,
}

/// A chord across a polygon, given by two crossings ordered by edge index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    first: SplitPoint,
    second: SplitPoint,
}

impl Cut {
    /// Creates a cut from two crossings in any order.
    pub fn new(a: SplitPoint, b: SplitPoint) -> Self {
        if a.edge <= b.edge {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Crossing on the lower-indexed edge.
    #[inline]
    pub fn first(&self) -> SplitPoint {
        self.first
    }

    /// Crossing on the higher-indexed edge.
    #[inline]
    pub fn second(&self) -> SplitPoint {
        self.second
    }
}

impl<M: Clone> Polygon<M> {
    /// Splits the polygon into two loops along `cut`.
    ///
    /// With crossings `P0` on edge `e0` and `P1` on edge `e1`, the children are
    /// `[P0, v(e0+1) .. v(e1), P1]` and `[P1, v(e1+1) .. v(e0), P0]`, the second
    /// one wrapping past the last vertex. A crossing that coincides with the
    /// neighbouring vertex (within `epsilon`) is not inserted twice, so cutting
    /// through a corner does not create duplicate vertices.
    ///
    /// Returns `None` if either child would have fewer than three vertices or
    /// would be no wider than `epsilon`.
    pub fn split_along(&self, cut: &Cut, epsilon: f64) -> Option<[Polygon<M>; 2]> {
        let vertices = self.vertices();
        let n = vertices.len();
        let (start, end) = (cut.first.edge, cut.second.edge);
        if start >= n || end >= n || start == end {
            return None;
        }

        let mut first = Vec::with_capacity(end - start + 2);
        push_distinct(&mut first, cut.first.point, epsilon);
        for v in &vertices[start + 1..=end] {
            push_distinct(&mut first, *v, epsilon);
        }
        push_distinct(&mut first, cut.second.point, epsilon);
        close_loop(&mut first, epsilon);

        let mut second = Vec::with_capacity(n - (end - start) + 2);
        push_distinct(&mut second, cut.second.point, epsilon);
        for v in vertices[end + 1..].iter().chain(&vertices[..=start]) {
            push_distinct(&mut second, *v, epsilon);
        }
        push_distinct(&mut second, cut.first.point, epsilon);
        close_loop(&mut second, epsilon);

        if first.len() < 3 || second.len() < 3 {
            return None;
        }

        let children = [
            Polygon::with_material(first, self.material().clone()),
            Polygon::with_material(second, self.material().clone()),
        ];
        if children.iter().any(|child| is_sliver(child, epsilon)) {
            return None;
        }
        Some(children)
    }
}

/// A loop whose area is at most `epsilon` times its longest edge has no
/// width to speak of.
fn is_sliver<M>(polygon: &Polygon<M>, epsilon: f64) -> bool {
    let longest = polygon
        .edges()
        .map(|(_, a, b)| (b - a).norm())
        .fold(0.0, f64::max);
    polygon.area() <= epsilon * longest
}

fn push_distinct(loop_vertices: &mut Vec<Point3<f64>>, point: Point3<f64>, epsilon: f64) {
    if loop_vertices
        .last()
        .is_none_or(|last| (last - point).norm() > epsilon)
    {
        loop_vertices.push(point);
    }
}

fn close_loop(loop_vertices: &mut Vec<Point3<f64>>, epsilon: f64) {
    if loop_vertices.len() > 1 {
        let (first, last) = (loop_vertices[0], loop_vertices[loop_vertices.len() - 1]);
        if (first - last).norm() <= epsilon {
            loop_vertices.pop();
        }
    }
}
