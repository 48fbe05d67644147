//! Shared visualization utilities for the painter-split demos.

use macroquad::models::{Mesh, Vertex, draw_mesh};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Unit, Vector3};
use painter_split::{Cuboid, DrawOrder, Polygon, PolygonVisitor, Quad, Scene, SplitConfig};

/// Direction of the light used for flat shading.
const LIGHT_DIRECTION: [f64; 3] = [0.4, 0.8, 0.45];

fn to_vec3(p: &Point3<f64>) -> Vec3 {
    vec3(p.x as f32, p.y as f32, p.z as f32)
}

/// Darkens `base` according to how far the polygon faces away from the light.
pub fn shade(base: Color, polygon: &Polygon<Color>) -> Color {
    let Some(normal) = polygon.unit_normal() else {
        return base;
    };
    let light = Vector3::from(LIGHT_DIRECTION).normalize();
    // Faces are drawn from both sides
    let intensity = (0.35 + 0.65 * normal.dot(&light).abs()) as f32;
    Color::new(base.r * intensity, base.g * intensity, base.b * intensity, base.a)
}

/// Draws a single polygon by triangulating it (fan triangulation) using a Mesh.
pub fn draw_polygon(polygon: &Polygon<Color>, outline: Option<Color>) {
    let verts = polygon.vertices();
    if verts.len() < 3 {
        return;
    }

    let color = shade(*polygon.material(), polygon);

    let mesh_vertices: Vec<Vertex> = verts
        .iter()
        .map(|p| Vertex::new2(to_vec3(p), vec2(0.0, 0.0), color))
        .collect();

    // Fan triangulation: vertex 0 connects to all edges
    let mut indices: Vec<u16> = Vec::with_capacity((verts.len() - 2) * 3);
    for i in 1..verts.len() - 1 {
        indices.push(0);
        indices.push(i as u16);
        indices.push((i + 1) as u16);
    }

    draw_mesh(&Mesh {
        vertices: mesh_vertices,
        indices,
        texture: None,
    });

    if let Some(outline) = outline {
        for (_, a, b) in polygon.edges() {
            draw_line_3d(to_vec3(&a), to_vec3(&b), outline);
        }
    }
}

/// Visitor that renders polygons using macroquad's 3D drawing.
pub struct RenderVisitor {
    outline: Option<Color>,
    drawn: usize,
}

impl RenderVisitor {
    /// Creates a renderer; `outline` draws every edge on top of its polygon.
    pub fn new(outline: Option<Color>) -> Self {
        Self { outline, drawn: 0 }
    }

    /// Number of polygons drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl PolygonVisitor<Color> for RenderVisitor {
    fn visit(&mut self, _index: usize, polygon: &Polygon<Color>) {
        draw_polygon(polygon, self.outline);
        self.drawn += 1;
    }
}

/// Positions of the polygons whose front side faces `eye`.
pub fn facing_polygons(polygons: &[Polygon<Color>], eye: Point3<f64>) -> Vec<usize> {
    polygons
        .iter()
        .enumerate()
        .filter(|(_, polygon)| {
            polygon
                .plane()
                .is_some_and(|plane| plane.signed_distance(eye) > 0.0)
        })
        .map(|(k, _)| k)
        .collect()
}

/// Draws the scene back to front and returns the number of polygons drawn.
pub fn render_scene(scene: &Scene<Color>, eye: Point3<f64>, cull: bool, outline: Option<Color>) -> usize {
    let order: DrawOrder = if cull {
        scene.order(eye, &facing_polygons(scene.polygons(), eye))
    } else {
        scene.order_all(eye)
    };

    let mut renderer = RenderVisitor::new(outline);
    order.visit_back_to_front(scene.polygons(), &mut renderer);
    renderer.drawn()
}

/// Three interpenetrating cubes standing in a floor plate.
pub fn intersecting_cubes_scene(config: SplitConfig) -> Scene<Color> {
    let mut scene = Scene::new(config);
    scene.add_shape(Quad::new(
        Point3::new(-12.0, 0.0, -12.0),
        Vector3::new(0.0, 0.0, 24.0),
        Vector3::new(24.0, 0.0, 0.0),
        Color::from_rgba(90, 90, 100, 255),
    ));
    scene.add_shape(Cuboid::cube(
        Point3::new(0.0, 2.0, 0.0),
        8.0,
        Color::from_rgba(200, 70, 60, 255),
    ));
    scene.add_shape(
        Cuboid::cube(
            Point3::new(4.0, 4.0, 3.0),
            6.0,
            Color::from_rgba(60, 160, 210, 255),
        )
        .rotated(Rotation3::from_euler_angles(0.3, 0.6, 0.0)),
    );
    scene.add_shape(
        Cuboid::new(
            Point3::new(-3.0, 5.0, -2.0),
            Vector3::new(1.5, 6.0, 1.5),
            Color::from_rgba(240, 200, 80, 255),
        )
        .rotated(Rotation3::from_axis_angle(&Vector3::z_axis(), 0.5)),
    );
    scene
}

/// Simple seeded random number generator (LCG).
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((self.state >> 33) as f64) / (u32::MAX as f64 / 2.0)
    }

    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Random rotated cubes of random colors in a box of edge `world_size`.
pub fn random_cubes_scene(config: SplitConfig, seed: u64, count: usize, world_size: f64) -> Scene<Color> {
    let mut rng = Rng::new(seed);
    let mut scene = Scene::new(config);

    for _ in 0..count {
        let center = Point3::new(
            (rng.next_f64() - 0.5) * world_size,
            (rng.next_f64() - 0.5) * world_size,
            (rng.next_f64() - 0.5) * world_size,
        );
        let size = rng.range(world_size / 10.0, world_size / 4.0);

        let axis = Vector3::new(rng.next_f64() - 0.5, rng.next_f64() - 0.5, rng.next_f64() - 0.5);
        let axis = Unit::try_new(axis, 0.01).unwrap_or_else(Vector3::x_axis);
        let angle = rng.next_f64() * std::f64::consts::TAU;

        let color = Color::new(
            rng.range(0.2, 1.0) as f32,
            rng.range(0.2, 1.0) as f32,
            rng.range(0.2, 1.0) as f32,
            1.0,
        );

        scene.add_shape(
            Cuboid::cube(center, size, color).rotated(Rotation3::from_axis_angle(&axis, angle)),
        );
    }
    scene
}

/// Orbit camera circling a target point; the viewpoint for draw ordering.
///
/// Angles are in radians. Yaw turns about the world Y axis, pitch tilts
/// towards it and is kept short of the poles.
pub struct OrbitCamera {
    target: Point3<f64>,
    distance: f64,
    yaw: f64,
    pitch: f64,
    zoom_speed: f64,
    min_distance: f64,
    max_distance: f64,
}

/// Largest pitch magnitude, just short of looking straight up or down.
const MAX_PITCH: f64 = 1.5;
/// Radians turned per frame while an arrow key is held.
const KEY_TURN: f64 = 0.02;

impl OrbitCamera {
    pub fn new(distance: f64, yaw: f64, pitch: f64) -> Self {
        Self {
            target: Point3::origin(),
            distance,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            zoom_speed: 5.0,
            min_distance: 10.0,
            max_distance: 200.0,
        }
    }

    /// Sets the distance change per scroll step and the allowed distance range.
    pub fn with_zoom(mut self, speed: f64, min: f64, max: f64) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self.distance = self.distance.clamp(min, max);
        self
    }

    pub fn with_target(mut self, target: Point3<f64>) -> Self {
        self.target = target;
        self
    }

    /// Turns the camera around its target.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Moves towards the target by `steps` scroll steps; negative steps move away.
    pub fn zoom(&mut self, steps: f64) {
        self.distance =
            (self.distance - steps * self.zoom_speed).clamp(self.min_distance, self.max_distance);
    }

    /// Applies this frame's mouse drag, scroll wheel and arrow keys.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.orbit(-2.0 * delta.x as f64, -2.0 * delta.y as f64);
        }
        self.zoom(mouse_wheel().1 as f64);

        let turn = |plus: KeyCode, minus: KeyCode| match (is_key_down(plus), is_key_down(minus)) {
            (true, false) => KEY_TURN,
            (false, true) => -KEY_TURN,
            _ => 0.0,
        };
        self.orbit(
            turn(KeyCode::Left, KeyCode::Right),
            turn(KeyCode::Up, KeyCode::Down),
        );
    }

    /// World position of the camera.
    pub fn eye_point(&self) -> Point3<f64> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.distance * Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: to_vec3(&self.eye_point()),
            up: vec3(0.0, 1.0, 0.0),
            target: to_vec3(&self.target),
            ..Default::default()
        }
    }
}

/// Handles the keys shared by the demos: `S` toggles splitting, `C` toggles
/// back-face culling and `O` toggles outlines.
pub struct Toggles {
    pub cull: bool,
    pub outline: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            cull: false,
            outline: true,
        }
    }
}

impl Toggles {
    pub fn update(&mut self, scene: &mut Scene<Color>) {
        if is_key_pressed(KeyCode::S) {
            let enabled = !scene.is_splitting();
            scene.set_splitting(enabled);
            log::info!("splitting {}", if enabled { "enabled" } else { "disabled" });
        }
        if is_key_pressed(KeyCode::C) {
            self.cull = !self.cull;
        }
        if is_key_pressed(KeyCode::O) {
            self.outline = !self.outline;
        }
    }

    pub fn outline_color(&self) -> Option<Color> {
        self.outline.then_some(Color::from_rgba(20, 20, 20, 255))
    }
}

/// Draws the status lines shown by every demo.
pub fn draw_status(title: &str, scene: &Scene<Color>, drawn: usize, toggles: &Toggles) {
    let report = scene.last_report();
    draw_text(title, 10.0, 25.0, 20.0, WHITE);
    draw_text(
        &format!(
            "Shapes: {} | Faces: {} | Polygons: {} | Splits: {}{}",
            scene.shape_count(),
            report.input,
            report.output,
            report.splits,
            if report.truncated { " (truncated)" } else { "" }
        ),
        10.0,
        45.0,
        18.0,
        GRAY,
    );
    draw_text(
        &format!(
            "Drawn: {} | Splitting: {} | Culling: {}",
            drawn,
            if scene.is_splitting() { "on" } else { "off" },
            if toggles.cull { "on" } else { "off" }
        ),
        10.0,
        65.0,
        18.0,
        GRAY,
    );
    draw_text(
        "Drag mouse to rotate, scroll to zoom, S split, C cull, O outlines",
        10.0,
        85.0,
        16.0,
        DARKGRAY,
    );
    draw_text(&format!("FPS: {}", get_fps()), 10.0, 105.0, 16.0, DARKGRAY);
}
