//! Two blue squares and an orange triangle. Both programs share one vertex stage.

use std::path::Path;

use hellogl::{App, DemoConfig, Mesh, Shader, ShaderProgram, ShaderSource, ShaderStage, logging};

const SQUARE_INDICES: [u32; 6] = [
    0, 1, 2, // top right triangle
    0, 2, 3, // bottom left triangle
];

#[rustfmt::skip]
const TOP_LEFT_SQUARE: [f32; 12] = [
    -0.5, 0.5, 0.0,
     0.0, 0.5, 0.0,
     0.0, 0.0, 0.0,
    -0.5, 0.0, 0.0,
];

#[rustfmt::skip]
const BOTTOM_RIGHT_SQUARE: [f32; 12] = [
    0.0,  0.0, 0.0,
    0.5,  0.0, 0.0,
    0.5, -0.5, 0.0,
    0.0, -0.5, 0.0,
];

#[rustfmt::skip]
const TRIANGLE: [f32; 9] = [
    0.0, 0.5, 0.0,
    0.5, 0.5, 0.0,
    0.5, 0.0, 0.0,
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DemoConfig::from_args()?;
    logging::init(config.log_level)?;

    let mut app = App::new(&config.window, "Square")?;

    let shaders = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    let compile = |stage, file: &str| {
        let path = shaders.join(file);
        Shader::from_source_with(&app.gl, stage, ShaderSource::File(&path), &config.shader)
    };
    let vertex = compile(ShaderStage::Vertex, "vertex_shader.vert")?;
    let blue = compile(ShaderStage::Fragment, "just_blue.frag")?;
    let orange = compile(ShaderStage::Fragment, "just_orange.frag")?;

    let blue_program = ShaderProgram::link_with(&app.gl, &vertex, &blue, &config.shader)?;
    let orange_program = ShaderProgram::link_with(&app.gl, &vertex, &orange, &config.shader)?;
    drop((vertex, blue, orange));

    let squares = [
        Mesh::new(&app.gl, &TOP_LEFT_SQUARE, &[3], Some(&SQUARE_INDICES))?,
        Mesh::new(&app.gl, &BOTTOM_RIGHT_SQUARE, &[3], Some(&SQUARE_INDICES))?,
    ];
    let triangle = Mesh::new(&app.gl, &TRIANGLE, &[3], None)?;

    while app.handle_events() {
        app.clear(config.clear_color);

        blue_program.use_program();
        for square in &squares {
            square.draw();
        }

        orange_program.use_program();
        triangle.draw();

        app.swap();
    }

    Ok(())
}
