//! Splitting of mutually intersecting polygons.
//!
//! Distance ordering can only draw two polygons in a consistent order if they
//! do not pass through each other. The splitter restores that: for every pair
//! whose supporting planes meet in a line that crosses both polygons, each
//! polygon is cut in two along that line.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use painter_split::{Polygon, PolygonSplitter, SplitConfig};
//!
//! let floor = Polygon::new(vec![
//!     Point3::new(-1.0, -1.0, 0.0),
//!     Point3::new(1.0, -1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(-1.0, 1.0, 0.0),
//! ]);
//! let wall = Polygon::new(vec![
//!     Point3::new(0.0, -1.0, -1.0),
//!     Point3::new(0.0, 1.0, -1.0),
//!     Point3::new(0.0, 1.0, 1.0),
//!     Point3::new(0.0, -1.0, 1.0),
//! ]);
//!
//! let (polygons, report) = PolygonSplitter::new(SplitConfig::default()).split(vec![floor, wall]);
//! assert_eq!(polygons.len(), 4);
//! assert_eq!(report.splits, 2);
//! ```

mod crossing;
mod cut;

pub use crossing::{edge_crossing, find_cut, lies_on_existing_edge};
pub use cut::{Cut, SplitPoint};

use log::{debug, trace, warn};

use crate::{AugmentedMatrix, EPSILON, Plane3D, Polygon, SolutionType};

/// Settings for a splitting pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    /// When `false` the pass hands its input back unchanged.
    pub enabled: bool,
    /// Base tolerance. The solver uses it directly; geometric tests scale it,
    /// see [`SplitConfig::tolerance`].
    pub epsilon: f64,
    /// Upper bound on the number of polygons split in one pass.
    pub max_splits: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            epsilon: EPSILON,
            max_splits: 10_000,
        }
    }
}

impl SplitConfig {
    /// A configuration that leaves polygon lists untouched.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Enables or disables splitting.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the split budget of a pass.
    pub fn with_max_splits(mut self, max_splits: usize) -> Self {
        self.max_splits = max_splits;
        self
    }

    /// Tolerance for the geometric tests on one pair of polygons.
    ///
    /// `extent` is the largest absolute coordinate of the pair and `sine` the
    /// sine of the angle between their planes. Rounding error in the computed
    /// intersection line grows with both coordinate size and `1 / sine`, so
    /// the base epsilon is widened by the same factors. Extents below one are
    /// treated as one.
    pub fn tolerance(&self, extent: f64, sine: f64) -> f64 {
        self.epsilon * extent.max(1.0) / sine.max(f64::EPSILON)
    }
}

/// Statistics of one splitting pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Number of polygons handed to the pass.
    pub input: usize,
    /// Number of polygons the pass produced.
    pub output: usize,
    /// Number of polygons that were replaced by two children.
    pub splits: usize,
    /// Number of non-degenerate pairs examined.
    pub pairs_tested: usize,
    /// `true` if the pass stopped at `max_splits` with a split still pending.
    pub truncated: bool,
}

/// The two halves a polygon was cut into, if it was cut.
type Children<M> = Option<[Polygon<M>; 2]>;

/// Result of splitting one pair: the partner's index and the children of
/// whichever polygons were actually cut.
struct PairSplit<M> {
    partner: usize,
    first: Children<M>,
    second: Children<M>,
}

/// Cuts intersecting polygons so that no two polygons in the output pass
/// through each other.
#[derive(Debug, Clone, Default)]
pub struct PolygonSplitter {
    config: SplitConfig,
}

impl PolygonSplitter {
    /// Creates a splitter with the given settings.
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Returns the splitter's settings.
    #[inline]
    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Runs a splitting pass over `polygons`.
    ///
    /// The list is walked with a cursor `i`. For the polygon at `i`, later
    /// polygons are searched for the first pair that actually splits; the split
    /// polygons are replaced in place by their children and the polygon now at
    /// `i` is examined again. When no partner splits, the cursor advances.
    /// Degenerate polygons and pairs without a usable intersection are left
    /// as they are.
    pub fn split<M: Clone>(&self, polygons: Vec<Polygon<M>>) -> (Vec<Polygon<M>>, SplitReport) {
        let mut working = polygons;
        let mut report = SplitReport {
            input: working.len(),
            ..SplitReport::default()
        };

        if !self.config.enabled {
            report.output = working.len();
            return (working, report);
        }

        debug!("splitting pass started with {} polygons", working.len());

        let mut i = 0;
        while i < working.len() {
            match self.find_split(&working, i, &mut report.pairs_tested) {
                Some(_) if report.splits >= self.config.max_splits => {
                    warn!(
                        "split budget of {} reached, polygon {i} of {} still crosses a partner",
                        self.config.max_splits,
                        working.len()
                    );
                    report.truncated = true;
                    break;
                }
                Some(split) => {
                    let partner = split.partner;
                    // Partner first: it sits after i, so i stays valid
                    if let Some([a, b]) = split.second {
                        replace_with_children(&mut working, partner, a, b);
                        report.splits += 1;
                    }
                    if let Some([a, b]) = split.first {
                        replace_with_children(&mut working, i, a, b);
                        report.splits += 1;
                    }
                    debug!("split pair ({i}, {partner}), now {} polygons", working.len());
                }
                None => i += 1,
            }
        }

        report.output = working.len();
        debug!(
            "splitting pass finished: {} -> {} polygons, {} splits",
            report.input, report.output, report.splits
        );
        (working, report)
    }

    /// Searches the polygons after `i` for the first partner that splits with it.
    fn find_split<M: Clone>(
        &self,
        polygons: &[Polygon<M>],
        i: usize,
        pairs_tested: &mut usize,
    ) -> Option<PairSplit<M>> {
        let first = &polygons[i];
        let Some(first_plane) = first.plane() else {
            trace!("polygon {i} is degenerate, skipped");
            return None;
        };

        for (j, second) in polygons.iter().enumerate().skip(i + 1) {
            let Some(second_plane) = second.plane() else {
                continue;
            };
            *pairs_tested += 1;

            if first_plane.same_normal(&second_plane, self.config.epsilon) {
                trace!("pair ({i}, {j}) shares a normal, skipped");
                continue;
            }

            if let Some((first_children, second_children)) =
                self.split_pair(first, &first_plane, second, &second_plane)
            {
                return Some(PairSplit {
                    partner: j,
                    first: first_children,
                    second: second_children,
                });
            }
        }
        None
    }

    /// Splits two polygons along the line where their planes meet.
    ///
    /// Returns `None` unless at least one of them is cut.
    fn split_pair<M: Clone>(
        &self,
        first: &Polygon<M>,
        first_plane: &Plane3D,
        second: &Polygon<M>,
        second_plane: &Plane3D,
    ) -> Option<(Children<M>, Children<M>)> {
        let mut line = AugmentedMatrix::with_epsilon(2, 4, self.config.epsilon);
        line.add_plane(first_plane).ok()?;
        line.add_plane(second_plane).ok()?;
        match line.solve() {
            SolutionType::Line => {}
            other @ (SolutionType::Undefined
            | SolutionType::Unsolvable
            | SolutionType::Point
            | SolutionType::Plane
            | SolutionType::HigherDimension) => {
                trace!("planes meet as {other:?}, no split");
                return None;
            }
        }

        let sine = first_plane.normal().cross(&second_plane.normal()).norm();
        let tolerance = self.config.tolerance(first.extent().max(second.extent()), sine);

        let first_cut = find_cut(first, &line, tolerance)?;
        let second_cut = find_cut(second, &line, tolerance)?;

        // A cut along one of a polygon's own edges would only copy it
        let first_children = if lies_on_existing_edge(first, &first_cut, tolerance) {
            None
        } else {
            first.split_along(&first_cut, tolerance)
        };
        let second_children = if lies_on_existing_edge(second, &second_cut, tolerance) {
            None
        } else {
            second.split_along(&second_cut, tolerance)
        };

        if first_children.is_none() && second_children.is_none() {
            return None;
        }
        Some((first_children, second_children))
    }
}

fn replace_with_children<M>(polygons: &mut Vec<Polygon<M>>, index: usize, a: Polygon<M>, b: Polygon<M>) {
    polygons.splice(index..=index, [a, b]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Rotation3, Vector3};

    fn make_quad(corners: [[f64; 3]; 4]) -> Polygon {
        Polygon::new(
            corners
                .iter()
                .map(|c| Point3::new(c[0], c[1], c[2]))
                .collect(),
        )
    }

    fn floor() -> Polygon {
        make_quad([
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ])
    }

    fn wall() -> Polygon {
        make_quad([
            [0.0, -1.0, -1.0],
            [0.0, 1.0, -1.0],
            [0.0, 1.0, 1.0],
            [0.0, -1.0, 1.0],
        ])
    }

    fn total_area(polygons: &[Polygon]) -> f64 {
        polygons.iter().map(Polygon::area).sum()
    }

    #[test]
    fn perpendicular_squares_split_into_four() {
        let input = vec![floor(), wall()];
        let (output, report) = PolygonSplitter::default().split(input.clone());

        assert_eq!(output.len(), 4);
        assert_eq!(report.splits, 2);
        assert_eq!(report.input, 2);
        assert_eq!(report.output, 4);
        assert!(!report.truncated);
        for polygon in &output {
            assert_eq!(polygon.len(), 4);
            assert!(!polygon.is_degenerate());
            assert!(polygon.is_planar(1e-10));
            assert_relative_eq!(polygon.area(), 2.0, epsilon = 1e-10);
        }
        assert_relative_eq!(total_area(&output), total_area(&input), epsilon = 1e-10);
    }

    #[test]
    fn coplanar_squares_are_untouched() {
        let left = make_quad([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        let right = make_quad([
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [3.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
        ]);
        let input = vec![left, right];
        let (output, report) = PolygonSplitter::default().split(input.clone());

        assert_eq!(output, input);
        assert_eq!(report.splits, 0);
        assert_eq!(report.pairs_tested, 1);
    }

    #[test]
    fn splitting_is_idempotent() {
        let (once, _) = PolygonSplitter::default().split(vec![floor(), wall()]);
        let (twice, report) = PolygonSplitter::default().split(once.clone());

        assert_eq!(report.splits, 0);
        assert_eq!(twice, once);
    }

    #[test]
    fn disabled_pass_returns_input() {
        let input = vec![floor(), wall()];
        let splitter = PolygonSplitter::new(SplitConfig::disabled());
        let (output, report) = splitter.split(input.clone());

        assert_eq!(output, input);
        assert_eq!(report.splits, 0);
        assert_eq!(report.pairs_tested, 0);
        assert_eq!(report.output, 2);
    }

    #[test]
    fn degenerate_polygons_pass_through() {
        let segment = Polygon::new(vec![Point3::new(0.0, -2.0, 0.0), Point3::new(0.0, 2.0, 0.0)]);
        let (output, report) = PolygonSplitter::default().split(vec![segment.clone(), floor()]);

        assert_eq!(output, vec![segment, floor()]);
        assert_eq!(report.pairs_tested, 0);
    }

    #[test]
    fn separated_polygons_are_not_split() {
        // The wall's plane crosses the floor, but the wall itself is far away
        let far_wall = make_quad([
            [0.0, 5.0, 1.0],
            [0.0, 7.0, 1.0],
            [0.0, 7.0, 3.0],
            [0.0, 5.0, 3.0],
        ]);
        let (output, report) = PolygonSplitter::default().split(vec![floor(), far_wall]);

        assert_eq!(output.len(), 2);
        assert_eq!(report.splits, 0);
    }

    #[test]
    fn touching_along_an_edge_splits_only_the_crossed_polygon() {
        // The wall stands on the floor: the cut is the wall's own bottom edge
        let standing = make_quad([
            [0.0, -1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 2.0],
            [0.0, -1.0, 2.0],
        ]);
        let (output, report) = PolygonSplitter::default().split(vec![floor(), standing.clone()]);

        assert_eq!(report.splits, 1);
        assert_eq!(output.len(), 3);
        assert!(output.contains(&standing));
    }

    #[test]
    fn cut_through_floor_corners_makes_triangles() {
        // Diagonal wall through two opposite corners of the floor
        let diagonal = make_quad([
            [-2.0, -2.0, -1.0],
            [2.0, 2.0, -1.0],
            [2.0, 2.0, 1.0],
            [-2.0, -2.0, 1.0],
        ]);
        let (output, report) = PolygonSplitter::default().split(vec![floor(), diagonal]);

        assert_eq!(report.splits, 2);
        assert_eq!(output.len(), 4);
        let triangles = output.iter().filter(|p| p.len() == 3).count();
        assert_eq!(triangles, 2);
        for polygon in &output {
            for (k, v) in polygon.vertices().iter().enumerate() {
                let next = polygon.vertices()[(k + 1) % polygon.len()];
                assert!((next - v).norm() > 1e-10, "duplicate vertex in {polygon:?}");
            }
        }
    }

    #[test]
    fn rotated_pair_preserves_area() {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.7)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), 0.3);
        let rotate = |p: Polygon| {
            Polygon::new(p.vertices().iter().map(|v| rotation * v).collect())
        };
        let input = vec![rotate(floor()), rotate(wall())];
        let (output, report) = PolygonSplitter::default().split(input.clone());

        assert_eq!(report.splits, 2);
        assert_relative_eq!(total_area(&output), total_area(&input), epsilon = 1e-9);

        let (again, report) = PolygonSplitter::default().split(output.clone());
        assert_eq!(report.splits, 0);
        assert_eq!(again.len(), output.len());
    }

    #[test]
    fn three_way_intersection_settles() {
        let (output, report) = PolygonSplitter::default().split(vec![floor(), wall(), divider()]);

        // Each quad ends up quartered by the other two
        assert_eq!(output.len(), 12);
        assert!(!report.truncated);
        let (_, again) = PolygonSplitter::default().split(output);
        assert_eq!(again.splits, 0);
    }

    fn divider() -> Polygon {
        make_quad([
            [-1.0, 0.0, -1.0],
            [1.0, 0.0, -1.0],
            [1.0, 0.0, 1.0],
            [-1.0, 0.0, 1.0],
        ])
    }

    #[test]
    fn split_budget_truncates_pass() {
        let config = SplitConfig::default().with_max_splits(2);
        let input = vec![floor(), wall(), divider()];
        let (output, report) = PolygonSplitter::new(config).split(input);

        // The floor/wall pair uses the budget; the divider still crosses both
        assert_eq!(report.splits, 2);
        assert!(report.truncated);
        assert_eq!(output.len(), 5);
    }

    #[test]
    fn exhausted_budget_without_pending_work_is_not_truncation() {
        let config = SplitConfig::default().with_max_splits(2);
        let (output, report) = PolygonSplitter::new(config).split(vec![floor(), wall()]);

        assert_eq!(report.splits, 2);
        assert!(!report.truncated);
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn tolerance_grows_with_extent_and_obliquity() {
        let config = SplitConfig::default();
        assert_eq!(config.tolerance(0.5, 1.0), EPSILON);
        assert_relative_eq!(config.tolerance(20.0, 1.0), 20.0 * EPSILON);
        assert_relative_eq!(config.tolerance(20.0, 0.01), 2000.0 * EPSILON);
    }

    #[test]
    fn micro_scale_pair_is_split() {
        let shrink =
            |p: Polygon| Polygon::new(p.vertices().iter().map(|v| Point3::from(v.coords * 1e-6)).collect());
        let input = vec![shrink(floor()), shrink(wall())];
        let (output, report) = PolygonSplitter::default().split(input.clone());

        assert_eq!(report.splits, 2);
        assert_eq!(output.len(), 4);
        assert_relative_eq!(total_area(&output), total_area(&input), epsilon = 1e-20);
    }

    #[test]
    fn materials_follow_their_parent() {
        let floor = floor().map_material(|_| "floor");
        let wall = wall().map_material(|_| "wall");
        let (output, _) = PolygonSplitter::default().split(vec![floor, wall]);

        let floors = output.iter().filter(|p| *p.material() == "floor").count();
        let walls = output.iter().filter(|p| *p.material() == "wall").count();
        assert_eq!((floors, walls), (2, 2));
    }
}
