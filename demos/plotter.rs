//! # Plotter
//!
//! A gold teapot surrounded by translucent primitives over a floor plane,
//! on a black to dark blue gradient, with a title and orientation axes.

use tableau::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Use mouse to rotate, scroll to zoom, shift+drag to pan");

    let mut scene = Scene::new();
    let teapot = scene.add_geometry(GeometryProvider::import_or_default("teapot.stl")?);
    let sphere = scene.add_geometry(
        GeometryDescriptor::sphere(10.0)
            .with_resolution(30, 30)
            .at(50.0, 0.0, 0.0),
    );
    let cube = scene.add_geometry(GeometryDescriptor::cube(15.0, 15.0, 15.0).at(-50.0, 0.0, 0.0));
    let cylinder = scene.add_geometry(
        GeometryDescriptor::cylinder(8.0, 20.0, 64)
            .with_direction(0.0, 1.0, 0.0)
            .at(0.0, 50.0, 0.0),
    );
    let floor = scene.add_geometry(
        GeometryDescriptor::plane(200.0, 200.0)
            .with_direction(0.0, 0.0, 1.0)
            .at(0.0, 0.0, -20.0),
    );

    let mut viewport = Viewport::new()
        .with_gradient_background(Color::BLACK, Color::DARK_BLUE)
        .with_title("3D Visualization Demo")
        .with_axes(true);
    viewport.bind(
        teapot,
        Appearance::new(Color::GOLD)
            .with_specular(0.5, 15.0)
            .with_smooth_shading(true),
    );
    viewport.bind(sphere, Appearance::new(Color::CRIMSON).with_opacity(0.8));
    viewport.bind(cube, Appearance::new(Color::ROYAL_BLUE).with_opacity(0.8));
    viewport.bind(cylinder, Appearance::new(Color::FOREST_GREEN).with_opacity(0.8));
    viewport.bind(floor, Appearance::new(Color::GRAY).with_opacity(0.3));

    let surface = DisplaySurface::new(1000, 800)
        .with_title("3D Visualization Demo")
        .with_viewport(viewport);

    let mut driver = DisplayDriver::new(RenderSettings::default());
    driver.compose(scene, surface)?;
    driver.show()?;
    Ok(())
}
