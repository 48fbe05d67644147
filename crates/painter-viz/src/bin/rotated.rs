use log::info;
use macroquad::prelude::*;
use painter_split::SplitConfig;
use painter_viz::{OrbitCamera, Toggles, draw_status, random_cubes_scene, render_scene};

const NUM_CUBES: usize = 10;
const WORLD_SIZE: f64 = 30.0;

#[macroquad::main("Painter Split Rotated Cubes")]
async fn main() {
    env_logger::init();

    info!("generating {NUM_CUBES} random rotated cubes");
    let mut scene = random_cubes_scene(SplitConfig::default(), 42, NUM_CUBES, WORLD_SIZE);
    scene.update();
    let report = scene.last_report();
    info!(
        "split {} faces into {} polygons ({} splits)",
        report.input, report.output, report.splits
    );

    let mut camera = OrbitCamera::new(50.0, 0.0, 0.3).with_zoom(3.0, 10.0, 150.0);
    let mut toggles = Toggles::default();
    let mut seed = 42;

    loop {
        camera.update();
        toggles.update(&mut scene);
        if is_key_pressed(KeyCode::R) {
            seed += 1;
            let config = SplitConfig::default().with_enabled(scene.is_splitting());
            scene = random_cubes_scene(config, seed, NUM_CUBES, WORLD_SIZE);
            info!("regenerated cubes with seed {seed}");
        }
        scene.update();

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.to_camera3d());

        let drawn = render_scene(
            &scene,
            camera.eye_point(),
            toggles.cull,
            toggles.outline_color(),
        );

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(8.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 8.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 8.0), BLUE);

        set_default_camera();
        draw_status("Rotated cubes (R to regenerate)", &scene, drawn, &toggles);

        next_frame().await
    }
}
