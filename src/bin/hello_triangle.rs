//! Draws a single orange triangle with shaders compiled from literal source.

use hellogl::{App, DemoConfig, Mesh, Shader, ShaderProgram, ShaderStage, logging};

const VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;

void main() {
    gl_Position = vec4(aPos, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
out vec4 FragColor;

void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

#[rustfmt::skip]
const VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DemoConfig::from_args()?;
    logging::init(config.log_level)?;

    let mut app = App::new(&config.window, "Hello triangle")?;

    let vertex = Shader::new_with(&app.gl, ShaderStage::Vertex, VERTEX_SHADER, &config.shader)?;
    let fragment =
        Shader::new_with(&app.gl, ShaderStage::Fragment, FRAGMENT_SHADER, &config.shader)?;
    let program = ShaderProgram::from_shaders_with(&app.gl, vertex, fragment, &config.shader)?;

    let triangle = Mesh::new(&app.gl, &VERTICES, &[3], None)?;

    while app.handle_events() {
        app.clear(config.clear_color);
        program.use_program();
        triangle.draw();
        app.swap();
    }

    Ok(())
}
