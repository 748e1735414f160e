//! # Multiple Viewports
//!
//! Two side-by-side viewports. The left one shows a red cube and a cone,
//! the right one the same cube on its own. Each viewport keeps its own
//! camera.

use tableau::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::new();
    let cube = scene.add_geometry(GeometryDescriptor::cube_size(1.0));
    let cone = scene.add_geometry(
        GeometryDescriptor::cone(0.5, 1.0, 200)
            .with_direction(1.0, 0.0, 0.0)
            .at(1.0, 1.0, 1.0),
    );

    let red = Appearance::new(Color::RED);

    let mut left = Viewport::new()
        .with_bounds(0.0, 0.0, 0.5, 1.0)
        .with_background(Color::rgb(0.1, 0.1, 0.2));
    left.bind(cube, red.clone());
    left.bind(cone, Appearance::default());

    let mut right = Viewport::new()
        .with_bounds(0.5, 0.0, 1.0, 1.0)
        .with_background(Color::rgb(0.2, 0.1, 0.1));
    right.bind(cube, red);

    let surface = DisplaySurface::new(600, 300)
        .with_title("Multiple Viewports")
        .with_viewport(left)
        .with_viewport(right);

    let mut driver = DisplayDriver::new(RenderSettings::default());
    driver.compose(scene, surface)?;
    driver.show()?;
    Ok(())
}
