//! # Sphere
//!
//! A single white sphere on a dark background. Drag to orbit, shift+drag to
//! pan, scroll to zoom, `q` to quit.

use tableau::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::new();
    let sphere = scene.add_geometry(GeometryDescriptor::sphere(0.5).with_resolution(40, 40));

    let mut viewport = Viewport::new().with_background(Color::rgb(0.1, 0.1, 0.1));
    viewport.bind(sphere, Appearance::new(Color::WHITE));

    let surface = DisplaySurface::new(900, 700)
        .with_title("Sphere")
        .with_interaction(InteractionStyle::TrackballCamera)
        .with_viewport(viewport);

    let mut driver = DisplayDriver::new(RenderSettings::default());
    driver.compose(scene, surface)?;
    driver.show()?;
    Ok(())
}
