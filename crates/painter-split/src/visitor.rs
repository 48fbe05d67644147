//! Visitor pattern for walking polygons in draw order.
//!
//! Visitors allow custom processing of polygons during an ordered walk
//! without coupling the ordering to a specific use case.

use crate::Polygon;

/// Visitor for processing polygons in the order chosen by a
/// [`DrawOrder`](crate::DrawOrder).
///
/// Common uses include:
/// - Rendering (painter's algorithm)
/// - Collecting polygons in sorted order
/// - Hit testing from the nearest polygon outwards
pub trait PolygonVisitor<M> {
    /// Called once per polygon; `index` is its position in the ordered list.
    fn visit(&mut self, index: usize, polygon: &Polygon<M>);
}

/// A simple visitor that collects all visited polygons and their indices.
#[derive(Debug)]
pub struct CollectingVisitor<M> {
    indices: Vec<usize>,
    collected: Vec<Polygon<M>>,
}

impl<M> Default for CollectingVisitor<M> {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            collected: Vec::new(),
        }
    }
}

impl<M> CollectingVisitor<M> {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visited indices, in visit order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns a reference to the collected polygons.
    pub fn polygons(&self) -> &[Polygon<M>] {
        &self.collected
    }

    /// Returns the collected polygons.
    pub fn into_polygons(self) -> Vec<Polygon<M>> {
        self.collected
    }
}

impl<M: Clone> PolygonVisitor<M> for CollectingVisitor<M> {
    fn visit(&mut self, index: usize, polygon: &Polygon<M>) {
        self.indices.push(index);
        self.collected.push(polygon.clone());
    }
}

/// A visitor that calls a closure for each polygon.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<M, F> PolygonVisitor<M> for FnVisitor<F>
where
    F: FnMut(usize, &Polygon<M>),
{
    fn visit(&mut self, index: usize, polygon: &Polygon<M>) {
        (self.func)(index, polygon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn make_triangle(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Polygon {
        Polygon::new(vec![
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        ])
    }

    #[test]
    fn collecting_visitor_empty() {
        let visitor: CollectingVisitor<()> = CollectingVisitor::new();
        assert!(visitor.polygons().is_empty());
        assert!(visitor.indices().is_empty());
    }

    #[test]
    fn collecting_visitor_collects() {
        let mut visitor = CollectingVisitor::new();
        let poly1 = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let poly2 = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);

        visitor.visit(4, &poly1);
        visitor.visit(2, &poly2);

        assert_eq!(visitor.indices(), &[4, 2]);
        let collected = visitor.into_polygons();
        assert_eq!(collected, vec![poly1, poly2]);
    }

    #[test]
    fn fn_visitor_calls_closure() {
        let mut seen = Vec::new();
        {
            let mut visitor = FnVisitor::new(|index: usize, polygon: &Polygon| {
                seen.push((index, polygon.len()));
            });

            let poly = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
            visitor.visit(0, &poly);
            visitor.visit(1, &poly);
        }
        assert_eq!(seen, vec![(0, 3), (1, 3)]);
    }
}
