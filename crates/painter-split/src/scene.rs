//! A scene of shapes with a split-consistent polygon set.

use log::debug;
use nalgebra::Point3;

use crate::{
    DrawOrder, MeanDistance, OrderStrategy, Polygon, PolygonSplitter, Shape, SplitConfig,
    SplitReport, draw_order,
};

/// Owns the shapes of a scene and the polygons derived from them.
///
/// Geometry is only rebuilt and split by [`Scene::update`] after something
/// called [`Scene::schedule_update`]. Ordering for a new viewpoint reuses the
/// published polygons, so moving the camera never triggers a splitting pass.
pub struct Scene<M> {
    shapes: Vec<Box<dyn Shape<M>>>,
    splitter: PolygonSplitter,
    strategy: Box<dyn OrderStrategy>,
    polygons: Vec<Polygon<M>>,
    needs_update: bool,
    last_report: SplitReport,
}

impl<M: Clone> Default for Scene<M> {
    fn default() -> Self {
        Self::new(SplitConfig::default())
    }
}

impl<M: Clone> Scene<M> {
    /// Creates an empty scene ordered by [`MeanDistance`].
    pub fn new(config: SplitConfig) -> Self {
        Self {
            shapes: Vec::new(),
            splitter: PolygonSplitter::new(config),
            strategy: Box::new(MeanDistance),
            polygons: Vec::new(),
            needs_update: false,
            last_report: SplitReport::default(),
        }
    }

    /// Replaces the ordering strategy.
    pub fn with_strategy(mut self, strategy: impl OrderStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Adds a shape and schedules an update.
    pub fn add_shape(&mut self, shape: impl Shape<M> + 'static) {
        self.shapes.push(Box::new(shape));
        self.needs_update = true;
    }

    /// Removes every shape and schedules an update.
    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
        self.needs_update = true;
    }

    /// Number of shapes in the scene.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Signals that the geometry changed and must be rebuilt on the next update.
    #[inline]
    pub fn schedule_update(&mut self) {
        self.needs_update = true;
    }

    /// Returns `true` if an update is pending.
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Turns the splitting pass on or off; takes effect on the next update.
    pub fn set_splitting(&mut self, enabled: bool) {
        if self.splitter.config().enabled != enabled {
            let config = self.splitter.config().with_enabled(enabled);
            self.splitter = PolygonSplitter::new(config);
            self.needs_update = true;
        }
    }

    /// Returns `true` if the splitting pass is enabled.
    #[inline]
    pub fn is_splitting(&self) -> bool {
        self.splitter.config().enabled
    }

    /// Rebuilds the polygon set if an update was scheduled.
    ///
    /// Collects the faces of every shape, runs the splitting pass and then
    /// publishes the result. Returns `true` if anything was rebuilt.
    pub fn update(&mut self) -> bool {
        if !self.needs_update {
            return false;
        }

        let raw: Vec<Polygon<M>> = self.shapes.iter().flat_map(|shape| shape.faces()).collect();
        let (split, report) = self.splitter.split(raw);
        debug!(
            "scene rebuilt from {} shapes: {} faces, {} polygons after splitting",
            self.shapes.len(),
            report.input,
            report.output
        );

        self.polygons = split;
        self.last_report = report;
        self.needs_update = false;
        true
    }

    /// The published, split-consistent polygons.
    #[inline]
    pub fn polygons(&self) -> &[Polygon<M>] {
        &self.polygons
    }

    /// Statistics of the most recent splitting pass.
    #[inline]
    pub fn last_report(&self) -> SplitReport {
        self.last_report
    }

    /// Orders the polygons at the `visible` positions as seen from `eye`.
    ///
    /// The returned indices refer to [`Scene::polygons`].
    ///
    /// # Panics
    /// Panics if a position in `visible` is out of bounds.
    pub fn order(&self, eye: Point3<f64>, visible: &[usize]) -> DrawOrder {
        let subset = visible.iter().map(|&k| &self.polygons[k]);
        draw_order(self.strategy.as_ref(), eye, subset).remap(visible)
    }

    /// Orders every published polygon as seen from `eye`.
    pub fn order_all(&self, eye: Point3<f64>) -> DrawOrder {
        draw_order(self.strategy.as_ref(), eye, &self.polygons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, Quad};
    use nalgebra::Vector3;

    fn make_floor() -> Quad<u8> {
        Quad::new(
            Point3::new(-1.0, -1.0, 0.0),
            Vector3::x() * 2.0,
            Vector3::y() * 2.0,
            1,
        )
    }

    fn make_wall() -> Quad<u8> {
        Quad::new(
            Point3::new(0.0, -1.0, -1.0),
            Vector3::y() * 2.0,
            Vector3::z() * 2.0,
            2,
        )
    }

    #[test]
    fn empty_scene_has_nothing_to_do() {
        let mut scene: Scene<u8> = Scene::default();
        assert!(!scene.needs_update());
        assert!(!scene.update());
        assert!(scene.polygons().is_empty());
        assert!(scene.order_all(Point3::origin()).is_empty());
    }

    #[test]
    fn update_splits_intersecting_shapes() {
        let mut scene = Scene::new(SplitConfig::default());
        scene.add_shape(make_floor());
        scene.add_shape(make_wall());

        assert!(scene.needs_update());
        assert!(scene.update());
        assert!(!scene.needs_update());
        assert_eq!(scene.polygons().len(), 4);
        assert_eq!(scene.last_report().splits, 2);

        let floors = scene.polygons().iter().filter(|p| *p.material() == 1).count();
        assert_eq!(floors, 2);
    }

    #[test]
    fn moving_the_camera_does_not_resplit() {
        let mut scene = Scene::new(SplitConfig::default());
        scene.add_shape(make_floor());
        scene.add_shape(make_wall());
        scene.update();

        let before = scene.polygons().to_vec();
        let near = scene.order_all(Point3::new(5.0, 0.0, 0.5));
        let far = scene.order_all(Point3::new(-5.0, 0.0, 0.5));

        assert_ne!(near, far);
        assert!(!scene.update());
        assert_eq!(scene.polygons(), before.as_slice());
    }

    #[test]
    fn toggling_splitting_schedules_a_rebuild() {
        let mut scene = Scene::new(SplitConfig::default());
        scene.add_shape(make_floor());
        scene.add_shape(make_wall());
        scene.update();

        scene.set_splitting(false);
        assert!(!scene.is_splitting());
        assert!(scene.update());
        assert_eq!(scene.polygons().len(), 2);

        // Same value again is a no-op
        scene.set_splitting(false);
        assert!(!scene.needs_update());
    }

    #[test]
    fn order_of_visible_subset_uses_scene_indices() {
        let mut scene = Scene::new(SplitConfig::disabled());
        for z in [5.0, 1.0, 3.0, 2.0] {
            scene.add_shape(Cuboid::cube(Point3::new(0.0, 0.0, z * 10.0), 1.0, ()));
        }
        scene.update();
        assert_eq!(scene.polygons().len(), 24);

        // One face from each of the cubes at z = 50, 10 and 30
        let visible = [0, 6, 12];
        let order = scene.order(Point3::origin(), &visible);
        assert_eq!(order.indices(), &[6, 12, 0]);
    }

    #[test]
    fn clear_shapes_empties_the_scene_on_update() {
        let mut scene = Scene::new(SplitConfig::default());
        scene.add_shape(make_floor());
        scene.update();
        assert_eq!(scene.shape_count(), 1);

        scene.clear_shapes();
        assert!(scene.update());
        assert!(scene.polygons().is_empty());
    }

    #[test]
    fn custom_strategy_is_applied() {
        struct Reverse;
        impl OrderStrategy for Reverse {
            fn key(&self, from: Point3<f64>, vertices: &[Point3<f64>]) -> f64 {
                -MeanDistance.key(from, vertices)
            }
        }

        let mut scene = Scene::new(SplitConfig::disabled()).with_strategy(Reverse);
        scene.add_shape(Quad::new(Point3::new(0.0, 0.0, 1.0), Vector3::x(), Vector3::y(), ()));
        scene.add_shape(Quad::new(Point3::new(0.0, 0.0, 9.0), Vector3::x(), Vector3::y(), ()));
        scene.update();

        assert_eq!(scene.order_all(Point3::origin()).indices(), &[1, 0]);
    }
}
