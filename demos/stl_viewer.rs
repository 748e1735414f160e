//! # STL Viewer
//!
//! Loads `teapot.stl` from the working directory (or a path given as the
//! first argument) and shows it in yellow. Dragging rotates the teapot
//! itself rather than the camera.

use tableau::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "teapot.stl".to_string());

    let mut scene = Scene::new();
    let teapot = scene.add_geometry(GeometryProvider::import_or_default(&path)?.named("Teapot"));

    let mut viewport = Viewport::new().with_background(Color::rgb(0.1, 0.1, 0.1));
    viewport.bind(teapot, Appearance::new(Color::YELLOW));

    let surface = DisplaySurface::new(800, 800)
        .with_title("Teapot STL Viewer")
        .with_interaction(InteractionStyle::TrackballActor)
        .with_viewport(viewport);

    let mut driver = DisplayDriver::new(RenderSettings::default());
    driver.compose(scene, surface)?;
    driver.show()?;
    Ok(())
}
