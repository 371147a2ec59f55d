use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};
use hellogl::{MockDriver, Shader, ShaderProgram, ShaderStage, UniformValue, uniform};

const VERTEX: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;

uniform vec2 shift;
uniform float scale;

void main() {
    gl_Position = vec4(aPos.xy * scale + shift, aPos.z, 1.0);
}
"#;

const FRAGMENT: &str = r#"#version 330 core
out vec4 FragColor;

uniform int mode;
uniform bool enabled;
uniform vec3 tint;
uniform vec4 color;

void main() {
    FragColor = enabled ? color * vec4(tint, 1.0) : vec4(float(mode));
}
"#;

fn program() -> (Arc<MockDriver>, ShaderProgram<MockDriver>) {
    let gl = Arc::new(MockDriver::new());
    let vertex = Shader::new(&gl, ShaderStage::Vertex, VERTEX).unwrap();
    let fragment = Shader::new(&gl, ShaderStage::Fragment, FRAGMENT).unwrap();
    let program = ShaderProgram::from_shaders(&gl, vertex, fragment).unwrap();
    program.use_program();
    (gl, program)
}

#[test]
fn test_vec2_shift_is_stored() {
    let (gl, program) = program();
    program.set_uniform("shift", (0.1f32, 0.2f32));

    assert_eq!(
        gl.uniform_value(program.id(), "shift"),
        Some(UniformValue::Vec2(Vec2::new(0.1, 0.2)))
    );
    assert_eq!(gl.call_count("uniform_2_f32"), 1);
    assert!(gl.errors().is_empty(), "{:?}", gl.errors());
}

#[test]
fn test_unknown_uniform_is_a_silent_no_op() {
    let (gl, program) = program();
    program.set_uniform("scale", 2.0f32);

    program.set_uniform("doesNotExist", 1.0f32);

    assert_eq!(gl.call_count("get_uniform_location"), 2);
    assert_eq!(gl.call_count("uniform_1_f32"), 1);
    assert_eq!(
        gl.uniform_value(program.id(), "scale"),
        Some(UniformValue::Float(2.0))
    );
    assert_eq!(gl.uniform_value(program.id(), "doesNotExist"), None);
    assert!(gl.errors().is_empty(), "{:?}", gl.errors());
}

#[test]
fn test_each_value_kind_takes_its_own_path() {
    let (gl, program) = program();
    program.set_uniform("enabled", true);
    program.set_uniform("mode", 3i32);
    program.set_uniform("scale", 0.5f32);
    program.set_uniform("tint", Vec3::new(1.0, 0.5, 0.25));
    program.set_uniform("color", [0.1f32, 0.2, 0.3, 1.0]);

    let id = program.id();
    // Booleans go through the integer path as 0/1.
    assert_eq!(gl.uniform_value(id, "enabled"), Some(UniformValue::Int(1)));
    assert_eq!(gl.uniform_value(id, "mode"), Some(UniformValue::Int(3)));
    assert_eq!(gl.uniform_value(id, "scale"), Some(UniformValue::Float(0.5)));
    assert_eq!(
        gl.uniform_value(id, "tint"),
        Some(UniformValue::Vec3(Vec3::new(1.0, 0.5, 0.25)))
    );
    assert_eq!(
        gl.uniform_value(id, "color"),
        Some(UniformValue::Vec4(Vec4::new(0.1, 0.2, 0.3, 1.0)))
    );
    assert_eq!(gl.call_count("uniform_1_i32"), 2);
    assert!(gl.errors().is_empty(), "{:?}", gl.errors());

    program.set_uniform("enabled", false);
    assert_eq!(gl.uniform_value(id, "enabled"), Some(UniformValue::Int(0)));
}

#[test]
fn test_locations_are_resolved_on_every_call() {
    let (gl, program) = program();
    for frame in 0..3 {
        program.set_uniform("shift", Vec2::splat(frame as f32));
    }
    assert_eq!(gl.call_count("get_uniform_location"), 3);
    assert_eq!(
        gl.uniform_value(program.id(), "shift"),
        Some(UniformValue::Vec2(Vec2::splat(2.0)))
    );
}

#[test]
fn test_uploads_go_to_the_program_in_use() {
    let (gl, program) = program();
    hellogl::GraphicsDriver::use_program(&*gl, None);

    program.set_uniform("scale", 4.0f32);
    assert_eq!(gl.uniform_value(program.id(), "scale"), None);
    assert_eq!(gl.errors().len(), 1);

    program.use_program();
    uniform::set_uniform(&*gl, program.id(), "scale", UniformValue::Float(4.0));
    assert_eq!(
        gl.uniform_value(program.id(), "scale"),
        Some(UniformValue::Float(4.0))
    );
}
