//! Polygon splitting and distance ordering for painter's-algorithm rendering.
//!
//! The [`PolygonSplitter`] cuts every pair of polygons that pass through each
//! other along their line of intersection, using an [`AugmentedMatrix`]
//! solver for the plane and edge systems. The resulting set can then be drawn
//! back to front with a [`DrawOrder`]. A [`Scene`] ties both together and
//! only re-splits when its geometry changes.

pub mod equation;
mod matrix;
mod order;
mod plane;
mod polygon;
mod scene;
mod shapes;
mod split;
mod visitor;

pub use matrix::{AugmentedMatrix, SolutionType, SolverError};
pub use order::{DrawOrder, MeanDistance, OrderStrategy, draw_order, order_by_distance};
pub use plane::{EPSILON, Plane3D, PlaneSide};
pub use polygon::Polygon;
pub use scene::Scene;
pub use shapes::{Cuboid, Quad, Shape, Triangle};
pub use split::{
    Cut, PolygonSplitter, SplitConfig, SplitPoint, SplitReport, edge_crossing, find_cut,
    lies_on_existing_edge,
};
pub use visitor::{CollectingVisitor, FnVisitor, PolygonVisitor};
