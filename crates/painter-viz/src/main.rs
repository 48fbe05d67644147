use macroquad::prelude::*;
use nalgebra::Point3;
use painter_split::SplitConfig;
use painter_viz::{OrbitCamera, Toggles, draw_status, intersecting_cubes_scene, render_scene};

#[macroquad::main("Painter Split")]
async fn main() {
    env_logger::init();

    let mut scene = intersecting_cubes_scene(SplitConfig::default());
    let mut camera = OrbitCamera::new(40.0, 0.6, 0.4)
        .with_zoom(3.0, 10.0, 120.0)
        .with_target(Point3::new(0.0, 2.0, 0.0));
    let mut toggles = Toggles::default();

    loop {
        camera.update();
        toggles.update(&mut scene);
        scene.update();

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.to_camera3d());

        let drawn = render_scene(
            &scene,
            camera.eye_point(),
            toggles.cull,
            toggles.outline_color(),
        );

        set_default_camera();
        draw_status("Intersecting cubes", &scene, drawn, &toggles);

        next_frame().await
    }
}
