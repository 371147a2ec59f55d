//! An in-memory [`GraphicsDriver`] for tests.
//!
//! [`MockDriver`] behaves like a (very forgiving) GLSL implementation: it checks that
//! each stage has a `#version` line and balanced brackets, reads the top-level
//! `in`/`out`/`uniform` declarations, and at link time matches fragment inputs against
//! vertex outputs and assigns uniform locations. Uniform uploads land in per-program
//! memory that tests can read back with [`MockDriver::uniform_value`].
//!
//! Driver misuse is recorded like `glGetError` would report it, see [`MockDriver::errors`].

use std::cell::RefCell;
use std::collections::HashMap;

use glam::{Vec2, Vec3, Vec4};

use super::{GraphicsDriver, ShaderStage, UniformValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockShader(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockProgram(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockUniformLocation {
    program: u32,
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Storage {
    In,
    Out,
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    storage: Storage,
    ty: String,
    name: String,
}

#[derive(Debug)]
struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
    declarations: Vec<Declaration>,
    has_main: bool,
}

#[derive(Debug, Default)]
struct ProgramState {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<(String, String)>,
    values: HashMap<usize, UniformValue>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, ShaderState>,
    programs: HashMap<u32, ProgramState>,
    current: Option<u32>,
    forced_create_error: Option<String>,
    forced_compile_log: Option<String>,
    forced_link_log: Option<String>,
    errors: Vec<String>,
    calls: Vec<&'static str>,
}

impl State {
    fn next_handle(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// A fake graphics context that keeps all driver state in memory.
#[derive(Debug, Default)]
pub struct MockDriver {
    state: RefCell<State>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create_shader` or `create_program` call fail with `message`.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        self.state.borrow_mut().forced_create_error = Some(message.into());
    }

    /// Makes the next compile fail with `log` as its info log, whatever the source.
    pub fn fail_next_compile(&self, log: impl Into<String>) {
        self.state.borrow_mut().forced_compile_log = Some(log.into());
    }

    /// Makes the next link fail with `log` as its info log.
    pub fn fail_next_link(&self, log: impl Into<String>) {
        self.state.borrow_mut().forced_link_log = Some(log.into());
    }

    /// Number of shader objects created and not yet deleted.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Number of program objects created and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn is_shader_live(&self, shader: MockShader) -> bool {
        self.state.borrow().shaders.contains_key(&shader.0)
    }

    pub fn is_program_live(&self, program: MockProgram) -> bool {
        self.state.borrow().programs.contains_key(&program.0)
    }

    /// The source text last submitted for `shader`.
    pub fn shader_source_text(&self, shader: MockShader) -> Option<String> {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|s| s.source.clone())
    }

    /// The value last uploaded into the uniform `name` of `program`.
    pub fn uniform_value(&self, program: MockProgram, name: &str) -> Option<UniformValue> {
        let state = self.state.borrow();
        let program = state.programs.get(&program.0)?;
        let index = program.uniforms.iter().position(|(n, _)| n == name)?;
        program.values.get(&index).copied()
    }

    /// Every driver entry point called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| **c == name)
            .count()
    }

    /// Errors raised by invalid driver calls.
    pub fn errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    fn record(&self, call: &'static str) {
        self.state.borrow_mut().calls.push(call);
    }

    fn error(&self, message: String) {
        self.state.borrow_mut().errors.push(message);
    }

    fn upload(&self, location: &MockUniformLocation, value: UniformValue) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.current != Some(location.program) {
            state.errors.push(format!(
                "GL_INVALID_OPERATION: uniform upload to program {} while {:?} is in use",
                location.program, state.current
            ));
            return;
        }
        let Some(program) = state.programs.get_mut(&location.program) else {
            state.errors.push("GL_INVALID_OPERATION: program was deleted".to_string());
            return;
        };
        let Some((name, ty)) = program.uniforms.get(location.index).cloned() else {
            state.errors.push(format!("GL_INVALID_OPERATION: bad location {}", location.index));
            return;
        };
        if !accepts(&ty, &value) {
            state.errors.push(format!(
                "GL_INVALID_OPERATION: {value:?} doesn't fit uniform `{name}' of type {ty}"
            ));
            return;
        }
        program.values.insert(location.index, value);
    }
}

/// Whether a uniform declared as `ty` can be set with `value`'s upload call.
fn accepts(ty: &str, value: &UniformValue) -> bool {
    match value {
        UniformValue::Int(_) | UniformValue::Bool(_) => {
            matches!(ty, "int" | "bool") || ty.starts_with("sampler")
        }
        UniformValue::Float(_) => matches!(ty, "float" | "bool"),
        UniformValue::Vec2(_) => ty == "vec2",
        UniformValue::Vec3(_) => ty == "vec3",
        UniformValue::Vec4(_) => ty == "vec4",
    }
}

const QUALIFIERS: &[&str] = &[
    "flat",
    "smooth",
    "noperspective",
    "centroid",
    "highp",
    "mediump",
    "lowp",
];

/// Checks `source` the way a strict-enough GLSL front end would and returns its
/// top-level interface, or the info log of the failed compile.
fn analyze(source: &str) -> Result<(Vec<Declaration>, bool), String> {
    let stripped: String = source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    let first = stripped.lines().find(|l| !l.trim().is_empty());
    if !first.is_some_and(|l| l.trim_start().starts_with("#version")) {
        return Err("0:1(1): error: missing #version directive".to_string());
    }

    // Keep only depth-0 text, turning braces into statement breaks.
    let mut top_level = String::new();
    let mut stack = Vec::new();
    let mut line = 1;
    for c in stripped.chars() {
        match c {
            '\n' => line += 1,
            '{' | '(' => stack.push(c),
            '}' | ')' => {
                let open = if c == '}' { '{' } else { '(' };
                if stack.pop() != Some(open) {
                    return Err(format!("0:{line}(1): error: syntax error, unexpected '{c}'"));
                }
            }
            _ => {}
        }
        let depth = stack.iter().filter(|b| **b == '{').count();
        if depth == 0 && c != '}' {
            top_level.push(c);
        } else if c == '{' && depth == 1 {
            top_level.push(';');
        }
    }
    if !stack.is_empty() {
        return Err(format!("0:{line}(1): error: syntax error, unexpected end of file"));
    }

    let mut declarations = Vec::new();
    let mut has_main = false;
    for statement in top_level.split(';') {
        let statement: String = statement
            .lines()
            .filter(|l| !l.trim_start().starts_with('#'))
            .collect::<Vec<_>>()
            .join(" ");
        let mut rest = statement.trim();
        if rest.starts_with("layout") {
            rest = rest.split_once(')').map_or("", |(_, r)| r).trim();
        }
        let tokens: Vec<&str> = rest
            .split_whitespace()
            .filter(|t| !QUALIFIERS.contains(t))
            .collect();

        let storage = match tokens.first() {
            Some(&"in") => Storage::In,
            Some(&"out") => Storage::Out,
            Some(&"uniform") => Storage::Uniform,
            Some(&"void") if tokens.get(1).is_some_and(|t| t.starts_with("main")) => {
                has_main = true;
                continue;
            }
            _ => continue,
        };
        if tokens.len() != 3 {
            let unexpected = tokens.get(3).or(tokens.last()).copied().unwrap_or("");
            return Err(format!("error: syntax error, unexpected `{unexpected}'"));
        }
        let name = tokens[2].split('[').next().unwrap_or(tokens[2]);
        declarations.push(Declaration {
            storage,
            ty: tokens[1].to_string(),
            name: name.to_string(),
        });
    }

    Ok((declarations, has_main))
}

fn link_interface(shaders: &[&ShaderState]) -> Result<Vec<(String, String)>, String> {
    if let Some(s) = shaders.iter().find(|s| !s.compiled) {
        return Err(format!("error: linking with uncompiled {} shader", s.stage));
    }
    let find = |stage: ShaderStage| shaders.iter().find(|s| s.stage == stage);
    let (Some(vertex), Some(fragment)) = (find(ShaderStage::Vertex), find(ShaderStage::Fragment))
    else {
        return Err("error: program needs both a vertex and a fragment shader".to_string());
    };
    for stage in [vertex, fragment] {
        if !stage.has_main {
            return Err(format!("error: {} shader lacks `main'", stage.stage));
        }
    }

    for input in fragment.declarations.iter().filter(|d| d.storage == Storage::In) {
        let output = vertex
            .declarations
            .iter()
            .find(|d| d.storage == Storage::Out && d.name == input.name);
        match output {
            None => {
                return Err(format!(
                    "error: fragment shader input `{}' has no matching output \
                     in the previous stage",
                    input.name
                ));
            }
            Some(output) if output.ty != input.ty => {
                return Err(format!(
                    "error: `{}' declared as type `{}' and type `{}'",
                    input.name, output.ty, input.ty
                ));
            }
            Some(_) => {}
        }
    }

    let mut uniforms: Vec<(String, String)> = Vec::new();
    for decl in [vertex, fragment]
        .iter()
        .flat_map(|s| s.declarations.iter())
        .filter(|d| d.storage == Storage::Uniform)
    {
        match uniforms.iter().find(|(n, _)| *n == decl.name) {
            Some((_, ty)) if *ty != decl.ty => {
                return Err(format!(
                    "error: uniform `{}' declared as type `{}' and type `{}'",
                    decl.name, ty, decl.ty
                ));
            }
            Some(_) => {}
            None => uniforms.push((decl.name.clone(), decl.ty.clone())),
        }
    }
    Ok(uniforms)
}

impl GraphicsDriver for MockDriver {
    type Shader = MockShader;
    type Program = MockProgram;
    type UniformLocation = MockUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        self.record("create_shader");
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.forced_create_error.take() {
            return Err(message);
        }
        let id = state.next_handle();
        state.shaders.insert(
            id,
            ShaderState {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
                declarations: Vec::new(),
                has_main: false,
            },
        );
        Ok(MockShader(id))
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        self.record("shader_source");
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match state.shaders.get_mut(&shader.0) {
            Some(s) => s.source = source.to_string(),
            None => state
                .errors
                .push(format!("GL_INVALID_VALUE: no shader {}", shader.0)),
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        self.record("compile_shader");
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let forced = state.forced_compile_log.take();
        let Some(s) = state.shaders.get_mut(&shader.0) else {
            state.errors.push(format!("GL_INVALID_VALUE: no shader {}", shader.0));
            return;
        };
        let result = match forced {
            Some(log) => Err(log),
            None => analyze(&s.source),
        };
        match result {
            Ok((declarations, has_main)) => {
                s.compiled = true;
                s.log.clear();
                s.declarations = declarations;
                s.has_main = has_main;
            }
            Err(log) => {
                s.compiled = false;
                s.log = log;
                s.declarations.clear();
                s.has_main = false;
            }
        }
    }

    fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        self.record("get_shader_compile_status");
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .is_some_and(|s| s.compiled)
    }

    fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        self.record("get_shader_info_log");
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: Self::Shader) {
        self.record("delete_shader");
        if self.state.borrow_mut().shaders.remove(&shader.0).is_none() {
            self.error(format!("GL_INVALID_VALUE: no shader {}", shader.0));
        }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        self.record("create_program");
        let mut state = self.state.borrow_mut();
        if let Some(message) = state.forced_create_error.take() {
            return Err(message);
        }
        let id = state.next_handle();
        state.programs.insert(id, ProgramState::default());
        Ok(MockProgram(id))
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        self.record("attach_shader");
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if !state.shaders.contains_key(&shader.0) {
            state.errors.push(format!("GL_INVALID_VALUE: no shader {}", shader.0));
            return;
        }
        match state.programs.get_mut(&program.0) {
            Some(p) => p.attached.push(shader.0),
            None => state
                .errors
                .push(format!("GL_INVALID_VALUE: no program {}", program.0)),
        }
    }

    fn link_program(&self, program: Self::Program) {
        self.record("link_program");
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let forced = state.forced_link_log.take();
        let Some(attached) = state.programs.get(&program.0).map(|p| p.attached.clone()) else {
            state.errors.push(format!("GL_INVALID_VALUE: no program {}", program.0));
            return;
        };
        let result = match forced {
            Some(log) => Err(log),
            None => {
                let shaders: Vec<&ShaderState> =
                    attached.iter().filter_map(|id| state.shaders.get(id)).collect();
                link_interface(&shaders)
            }
        };
        if let Some(p) = state.programs.get_mut(&program.0) {
            p.values.clear();
            match result {
                Ok(uniforms) => {
                    p.linked = true;
                    p.log.clear();
                    p.uniforms = uniforms;
                }
                Err(log) => {
                    p.linked = false;
                    p.log = log;
                    p.uniforms.clear();
                }
            }
        }
    }

    fn get_program_link_status(&self, program: Self::Program) -> bool {
        self.record("get_program_link_status");
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .is_some_and(|p| p.linked)
    }

    fn get_program_info_log(&self, program: Self::Program) -> String {
        self.record("get_program_info_log");
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: Self::Program) {
        self.record("delete_program");
        if self.state.borrow_mut().programs.remove(&program.0).is_none() {
            self.error(format!("GL_INVALID_VALUE: no program {}", program.0));
        }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        self.record("use_program");
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match program {
            None => state.current = None,
            Some(p) if state.programs.get(&p.0).is_some_and(|p| p.linked) => {
                state.current = Some(p.0);
            }
            Some(p) => state
                .errors
                .push(format!("GL_INVALID_OPERATION: program {} isn't linked", p.0)),
        }
    }

    fn current_program(&self) -> Option<Self::Program> {
        self.record("current_program");
        self.state.borrow().current.map(MockProgram)
    }

    fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        self.record("get_uniform_location");
        let state = self.state.borrow();
        let p = state.programs.get(&program.0).filter(|p| p.linked)?;
        let index = p.uniforms.iter().position(|(n, _)| n == name)?;
        Some(MockUniformLocation {
            program: program.0,
            index,
        })
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, x: i32) {
        self.record("uniform_1_i32");
        self.upload(location, UniformValue::Int(x));
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32) {
        self.record("uniform_1_f32");
        self.upload(location, UniformValue::Float(x));
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        self.record("uniform_2_f32");
        self.upload(location, UniformValue::Vec2(Vec2::new(x, y)));
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        self.record("uniform_3_f32");
        self.upload(location, UniformValue::Vec3(Vec3::new(x, y, z)));
    }

    fn uniform_4_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        self.record("uniform_4_f32");
        self.upload(location, UniformValue::Vec4(Vec4::new(x, y, z, w)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_is_read_from_top_level_only() {
        let source = "#version 330 core\n\
                      layout (location = 0) in vec3 aPos;\n\
                      flat out vec3 color;\n\
                      uniform vec2 shift; // offset\n\
                      void main() {\n\
                          vec3 local = aPos;\n\
                          color = local;\n\
                      }\n";
        let (decls, has_main) = analyze(source).unwrap();
        assert!(has_main);
        let names: Vec<_> = decls
            .iter()
            .map(|d| (d.storage, d.ty.as_str(), d.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                (Storage::In, "vec3", "aPos"),
                (Storage::Out, "vec3", "color"),
                (Storage::Uniform, "vec2", "shift"),
            ]
        );
    }

    #[test]
    fn test_unbalanced_braces_fail() {
        let err = analyze("#version 330 core\nvoid main() {\n").unwrap_err();
        assert!(err.contains("unexpected end of file"), "{err}");

        let err = analyze("#version 330 core\nvoid main() }\n").unwrap_err();
        assert!(err.contains("unexpected '}'"), "{err}");
    }

    #[test]
    fn test_missing_semicolon_fails() {
        let err = analyze("#version 330 core\nout vec4 FragColor\nvoid main() {}\n").unwrap_err();
        assert!(err.contains("syntax error"), "{err}");
    }

    #[test]
    fn test_missing_version_fails() {
        assert!(analyze("void main() {}").is_err());
    }

    #[test]
    fn test_uniform_types_are_enforced() {
        assert!(accepts("bool", &UniformValue::Int(1)));
        assert!(accepts("sampler2D", &UniformValue::Int(0)));
        assert!(!accepts("vec3", &UniformValue::Vec2(Vec2::ZERO)));
        assert!(!accepts("int", &UniformValue::Float(1.0)));
    }
}
