//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for compiling shader
//! stages and linking them into programs. Every constructor takes the driver explicitly,
//! and every failure comes back as a [`ShaderError`].
//!
//! Shader objects are released as soon as they are dropped. The consuming linker
//! ([`ShaderProgram::from_shaders`]) therefore releases both stages right after the link.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{GraphicsDriver, ShaderSource, Uniform, uniform};
use crate::error::ShaderError;

/// Size of the buffer the driver's info log is copied into, terminator included.
/// Longer diagnostics are cut off.
pub const INFO_LOG_CAPACITY: usize = 512;

/// One of the two programmable stages of a minimal pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// The OpenGL enum naming this stage.
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Settings shared by the compile and link steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Info-log buffer size in bytes, terminator included.
    pub info_log_capacity: usize,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            info_log_capacity: INFO_LOG_CAPACITY,
        }
    }
}

/// Cuts `log` down to what fits in a `capacity` byte buffer that also holds a
/// terminating NUL, without splitting a UTF-8 character.
pub fn truncate_info_log(mut log: String, capacity: usize) -> String {
    let max = capacity.saturating_sub(1);
    if log.len() > max {
        let mut end = max;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}

/// Represents an individual compiled shader stage.
pub struct Shader<D: GraphicsDriver = glow::Context> {
    gl: Arc<D>,
    id: D::Shader,
    stage: ShaderStage,
}

impl<D: GraphicsDriver> Shader<D> {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<D>, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        Self::new_with(gl, stage, source, &ShaderConfig::default())
    }

    /// Reads the file at `path` and compiles it.
    pub fn from_file(
        gl: &Arc<D>,
        stage: ShaderStage,
        path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Self::from_source(gl, stage, ShaderSource::File(path.as_ref()))
    }

    /// Loads `source` and compiles it. A file that can't be read fails before the
    /// driver is touched.
    pub fn from_source(
        gl: &Arc<D>,
        stage: ShaderStage,
        source: ShaderSource<'_>,
    ) -> Result<Self, ShaderError> {
        Self::from_source_with(gl, stage, source, &ShaderConfig::default())
    }

    /// Like [`from_source`](Shader::from_source), with the given compile settings.
    pub fn from_source_with(
        gl: &Arc<D>,
        stage: ShaderStage,
        source: ShaderSource<'_>,
        config: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        let text = source.load()?;
        Self::new_with(gl, stage, &text, config)
    }

    /// Compiles a new shader, keeping at most `config.info_log_capacity` bytes of
    /// the info log on failure.
    pub fn new_with(
        gl: &Arc<D>,
        stage: ShaderStage,
        source: &str,
        config: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        let shader = gl.create_shader(stage).map_err(ShaderError::Driver)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = truncate_info_log(gl.get_shader_info_log(shader), config.info_log_capacity);
            gl.delete_shader(shader);
            log::error!("Couldn't compile {stage} shader: {log}");
            return Err(ShaderError::Compile { stage, log });
        }

        log::info!("{stage} shader compiled: id={shader:?}");

        Ok(Self {
            gl: Arc::clone(gl),
            id: shader,
            stage,
        })
    }

    /// The driver handle of this shader.
    pub fn id(&self) -> D::Shader {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn expect_stage(&self, expected: ShaderStage) -> Result<(), ShaderError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ShaderError::StageMismatch {
                expected,
                found: self.stage,
            })
        }
    }
}

impl<D: GraphicsDriver> fmt::Debug for Shader<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .finish()
    }
}

impl<D: GraphicsDriver> Drop for Shader<D> {
    fn drop(&mut self) {
        log::debug!("Releasing {} shader {:?}", self.stage, self.id);
        self.gl.delete_shader(self.id);
    }
}

/// Represents a linked program made of one vertex and one fragment stage.
///
/// The program object is deleted when this value is dropped, unless it was
/// handed out with [`into_raw`](ShaderProgram::into_raw).
pub struct ShaderProgram<D: GraphicsDriver = glow::Context> {
    gl: Arc<D>,
    id: D::Program,
    owned: bool,
}

impl<D: GraphicsDriver> ShaderProgram<D> {
    /// Reads, compiles and links the two stage files. See [`build_program`].
    pub fn from_files(
        gl: &Arc<D>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        build_program(gl, vertex_path, fragment_path)
    }

    /// Like [`from_files`](ShaderProgram::from_files), with the given compile and link
    /// settings.
    pub fn from_files_with(
        gl: &Arc<D>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
        config: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        build_program_with(gl, vertex_path, fragment_path, config)
    }

    /// Links the two stages and releases them, whether or not the link succeeded.
    pub fn from_shaders(
        gl: &Arc<D>,
        vertex: Shader<D>,
        fragment: Shader<D>,
    ) -> Result<Self, ShaderError> {
        Self::from_shaders_with(gl, vertex, fragment, &ShaderConfig::default())
    }

    /// Like [`from_shaders`](ShaderProgram::from_shaders), with the given link settings.
    pub fn from_shaders_with(
        gl: &Arc<D>,
        vertex: Shader<D>,
        fragment: Shader<D>,
        config: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        Self::link_with(gl, &vertex, &fragment, config)
    }

    /// Links a new program from borrowed stages, which stay alive for reuse in other
    /// programs until the caller drops them.
    pub fn link(
        gl: &Arc<D>,
        vertex: &Shader<D>,
        fragment: &Shader<D>,
    ) -> Result<Self, ShaderError> {
        Self::link_with(gl, vertex, fragment, &ShaderConfig::default())
    }

    /// Like [`link`](ShaderProgram::link), keeping at most `config.info_log_capacity`
    /// bytes of the info log on failure.
    pub fn link_with(
        gl: &Arc<D>,
        vertex: &Shader<D>,
        fragment: &Shader<D>,
        config: &ShaderConfig,
    ) -> Result<Self, ShaderError> {
        vertex.expect_stage(ShaderStage::Vertex)?;
        fragment.expect_stage(ShaderStage::Fragment)?;

        let program = gl.create_program().map_err(ShaderError::Driver)?;
        gl.attach_shader(program, vertex.id);
        gl.attach_shader(program, fragment.id);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = truncate_info_log(gl.get_program_info_log(program), config.info_log_capacity);
            gl.delete_program(program);
            log::error!("Couldn't link program: {log}");
            return Err(ShaderError::Link { log });
        }

        log::info!(
            "Program linked: id={program:?} (vertex={:?}, fragment={:?})",
            vertex.id,
            fragment.id
        );

        Ok(Self {
            gl: Arc::clone(gl),
            id: program,
            owned: true,
        })
    }

    /// The driver handle of this program.
    pub fn id(&self) -> D::Program {
        self.id
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Sets a uniform variable in the shader program. The program must be in use.
    /// Names the program doesn't declare are ignored.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        uniform::set_uniform(&*self.gl, self.id, name, value);
    }

    /// Gives up ownership of the program object without deleting it. It then lives
    /// until the context is destroyed.
    pub fn into_raw(mut self) -> D::Program {
        self.owned = false;
        self.id
    }
}

impl<D: GraphicsDriver> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram").field("id", &self.id).finish()
    }
}

impl<D: GraphicsDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        if self.owned {
            log::debug!("Releasing program {:?}", self.id);
            self.gl.delete_program(self.id);
        }
    }
}

/// Reads both stage files, compiles them, links them and releases the stages.
/// The first failing step aborts the whole build with its own error.
pub fn build_program<D: GraphicsDriver>(
    gl: &Arc<D>,
    vertex_path: impl AsRef<Path>,
    fragment_path: impl AsRef<Path>,
) -> Result<ShaderProgram<D>, ShaderError> {
    build_program_with(gl, vertex_path, fragment_path, &ShaderConfig::default())
}

/// [`build_program`] with the given compile and link settings.
pub fn build_program_with<D: GraphicsDriver>(
    gl: &Arc<D>,
    vertex_path: impl AsRef<Path>,
    fragment_path: impl AsRef<Path>,
    config: &ShaderConfig,
) -> Result<ShaderProgram<D>, ShaderError> {
    let vertex = Shader::from_source_with(
        gl,
        ShaderStage::Vertex,
        ShaderSource::File(vertex_path.as_ref()),
        config,
    )?;
    let fragment = Shader::from_source_with(
        gl,
        ShaderStage::Fragment,
        ShaderSource::File(fragment_path.as_ref()),
        config,
    )?;
    ShaderProgram::from_shaders_with(gl, vertex, fragment, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_log_is_kept() {
        let log = "0:3(1): error: syntax error".to_string();
        assert_eq!(truncate_info_log(log.clone(), INFO_LOG_CAPACITY), log);
    }

    #[test]
    fn test_log_is_cut_at_capacity_minus_terminator() {
        let log = "x".repeat(INFO_LOG_CAPACITY * 2);
        let cut = truncate_info_log(log, INFO_LOG_CAPACITY);
        assert_eq!(cut.len(), INFO_LOG_CAPACITY - 1);

        let exact = "y".repeat(15);
        assert_eq!(truncate_info_log(exact.clone(), 16), exact);
        assert_eq!(truncate_info_log(exact, 15).len(), 14);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 'é' is two bytes; a 4 byte buffer holds 3 bytes of text.
        let cut = truncate_info_log("éé".to_string(), 4);
        assert_eq!(cut, "é");
        assert_eq!(truncate_info_log("abc".to_string(), 0), "");
    }

    #[test]
    fn test_stage_names_and_enums() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
        assert_eq!(ShaderStage::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
    }
}
