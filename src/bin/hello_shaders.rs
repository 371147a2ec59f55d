//! A per-vertex colored triangle circling the window, moved by the `shift` uniform.

use std::path::Path;
use std::time::Instant;

use glam::Vec2;
use hellogl::{App, DemoConfig, Mesh, ShaderProgram, logging};

#[rustfmt::skip]
const VERTICES: [f32; 18] = [
    // position       // color
     0.0,  0.5, 0.0,  1.0, 0.0, 0.0,
     0.5, -0.5, 0.0,  0.0, 1.0, 0.0,
    -0.5, -0.5, 0.0,  0.0, 0.0, 1.0,
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DemoConfig::from_args()?;
    logging::init(config.log_level)?;

    let mut app = App::new(&config.window, "hello_shaders")?;

    let shaders = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    let program = ShaderProgram::from_files_with(
        &app.gl,
        shaders.join("moving_triangle.vert"),
        shaders.join("triangle_basic.frag"),
        &config.shader,
    )?;

    let triangle = Mesh::new(&app.gl, &VERTICES, &[3, 3], None)?;
    let start = Instant::now();

    while app.handle_events() {
        let t = start.elapsed().as_secs_f32();
        let shift = Vec2::new(t.sin() / 2.0, t.cos() / 2.0);

        app.clear(config.clear_color);
        program.use_program();
        program.set_uniform("shift", shift);
        triangle.draw();
        app.swap();
    }

    Ok(())
}
