//! Painter's-algorithm draw ordering.
//!
//! Ordering by distance is a heuristic: it is only reliable for polygons that
//! do not pass through each other, which is what the
//! [`PolygonSplitter`](crate::PolygonSplitter) guarantees beforehand.

use std::borrow::Borrow;

use nalgebra::Point3;

use crate::{Polygon, PolygonVisitor};

/// Strategy for computing the sort key of a polygon as seen from a viewpoint.
///
/// Smaller keys are nearer to the viewer.
pub trait OrderStrategy {
    /// Returns the sort key of a polygon with the given vertices.
    fn key(&self, from: Point3<f64>, vertices: &[Point3<f64>]) -> f64;
}

/// Orders by the mean Euclidean distance from the viewpoint to each vertex.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanDistance;

impl OrderStrategy for MeanDistance {
    fn key(&self, from: Point3<f64>, vertices: &[Point3<f64>]) -> f64 {
        if vertices.is_empty() {
            return 0.0;
        }
        let total: f64 = vertices.iter().map(|v| (v - from).norm()).sum();
        total / vertices.len() as f64
    }
}

/// Computes the draw order of `polygons` as seen from `from`.
///
/// The result holds positions into the input sequence sorted by ascending key.
/// The sort is stable, so polygons with equal keys keep their input order.
pub fn draw_order<'a, M: 'a>(
    strategy: &dyn OrderStrategy,
    from: Point3<f64>,
    polygons: impl IntoIterator<Item = &'a Polygon<M>>,
) -> DrawOrder {
    let keys: Vec<f64> = polygons
        .into_iter()
        .map(|polygon| strategy.key(from, polygon.vertices()))
        .collect();

    let mut indices: Vec<usize> = (0..keys.len()).collect();
    indices.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    DrawOrder { indices }
}

/// [`draw_order`] with the [`MeanDistance`] strategy.
pub fn order_by_distance<'a, M: 'a>(
    from: Point3<f64>,
    polygons: impl IntoIterator<Item = &'a Polygon<M>>,
) -> DrawOrder {
    draw_order(&MeanDistance, from, polygons)
}

/// A permutation of polygon indices, nearest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawOrder {
    indices: Vec<usize>,
}

impl DrawOrder {
    /// Returns the indices, nearest first.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Consumes the order and returns the indices, nearest first.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    /// Number of ordered polygons.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if nothing was ordered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates from the nearest polygon to the farthest.
    pub fn front_to_back(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Iterates from the farthest polygon to the nearest, the order to draw in.
    pub fn back_to_front(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.indices.iter().rev().copied()
    }

    /// Replaces every index `k` with `positions[k]`.
    ///
    /// Used when the order was computed over a subset, to translate back into
    /// indices of the full list.
    ///
    /// # Panics
    /// Panics if an index is out of bounds for `positions`.
    pub fn remap(self, positions: &[usize]) -> Self {
        Self {
            indices: self.indices.into_iter().map(|k| positions[k]).collect(),
        }
    }

    /// Hands each polygon to `visitor`, farthest first.
    pub fn visit_back_to_front<M, P, V>(&self, polygons: &[P], visitor: &mut V)
    where
        P: Borrow<Polygon<M>>,
        V: PolygonVisitor<M>,
    {
        for index in self.back_to_front() {
            visitor.visit(index, polygons[index].borrow());
        }
    }

    /// Hands each polygon to `visitor`, nearest first.
    pub fn visit_front_to_back<M, P, V>(&self, polygons: &[P], visitor: &mut V)
    where
        P: Borrow<Polygon<M>>,
        V: PolygonVisitor<M>,
    {
        for index in self.front_to_back() {
            visitor.visit(index, polygons[index].borrow());
        }
    }
}
