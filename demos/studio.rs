//! # Studio Render
//!
//! Builds a small studio scene (teapot or fallback cube, primitives, floor,
//! three-point lighting, fixed camera) and renders it to `studio.png`
//! without opening a window. Falls back from the high-performance GPU to a
//! low-power or software adapter when needed.

use tableau::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::new();

    let teapot = GeometryProvider::import_or_default("teapot.stl")?;
    let teapot = match teapot.kind() {
        GeometryKind::ProceduralDefault => teapot.named("Demo_Object"),
        _ => teapot.named("Teapot").with_uniform_scale(0.1),
    };
    let teapot = scene.add_geometry(teapot);

    let sphere = scene.add_geometry(
        GeometryDescriptor::sphere(1.0)
            .with_resolution(32, 16)
            .named("Demo_Sphere")
            .at(5.0, 0.0, 0.0),
    );
    let cube = scene.add_geometry(
        GeometryDescriptor::cube_size(1.5)
            .named("Demo_Cube")
            .at(-5.0, 0.0, 0.0),
    );
    let cylinder = scene.add_geometry(
        GeometryDescriptor::cylinder(0.8, 2.0, 32)
            .named("Demo_Cylinder")
            .at(0.0, 5.0, 0.0),
    );
    let torus = scene.add_geometry(
        GeometryDescriptor::torus(1.5, 0.5)
            .named("Demo_Torus")
            .at(0.0, -5.0, 0.0),
    );
    let floor = scene.add_geometry(
        GeometryDescriptor::plane(20.0, 20.0)
            .named("Floor")
            .at(0.0, 0.0, -2.0),
    );

    let mut viewport = Viewport::new()
        .with_background(Color::rgb(0.02, 0.02, 0.08))
        .with_camera(
            CameraPlacement::from_euler(
                [12.0, -12.0, 8.0],
                [60f32.to_radians(), 0.0, 45f32.to_radians()],
            )
            .with_lens(35.0)
            .with_clip(0.1, 1000.0),
        );
    for light in three_point_rig() {
        viewport.add_light(light);
    }

    viewport.bind(teapot, Appearance::pbr(Color::GOLD, 0.9, 0.2).with_smooth_shading(true));
    viewport.bind(
        sphere,
        Appearance::pbr(Color::CRIMSON, 0.3, 0.2).with_smooth_shading(true),
    );
    viewport.bind(cube, Appearance::pbr(Color::ROYAL_BLUE, 0.5, 0.3));
    viewport.bind(
        cylinder,
        Appearance::pbr(Color::FOREST_GREEN, 0.4, 0.4).with_smooth_shading(true),
    );
    viewport.bind(
        torus,
        Appearance::pbr(Color::PURPLE, 0.6, 0.15).with_smooth_shading(true),
    );
    viewport.bind(floor, Appearance::pbr(Color::rgb(0.3, 0.3, 0.3), 0.0, 0.8));

    let settings = RenderSettings::default()
        .with_resolution(1920, 1080)
        .with_percentage(100)
        .with_output("studio.png");

    let mut driver = DisplayDriver::new(settings);
    driver.compose(
        scene,
        DisplaySurface::new(1920, 1080)
            .with_title("Studio")
            .with_viewport(viewport),
    )?;
    let image = driver.render_to_file()?;

    println!(
        "Rendered {}x{} with {:?} engine",
        image.width,
        image.height,
        driver.selected_engine()
    );
    Ok(())
}
