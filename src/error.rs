//! Error types.
//!
//! [`ShaderError`] covers every way building a shader program can fail. None of
//! these are retryable: a compile or link failure is a static property of the
//! source text.

use std::path::PathBuf;

use thiserror::Error;

use crate::abs::ShaderStage;

/// Errors raised while loading, compiling or linking shaders.
#[derive(Error, Debug)]
pub enum ShaderError {
    /// The shader source file is missing, unreadable, a directory, or not UTF-8.
    #[error("couldn't open {}: {source}", .path.display())]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The driver reported a failed compile. `log` is the (possibly truncated) info log.
    #[error("couldn't compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    /// The driver reported a failed link. `log` is the (possibly truncated) info log.
    #[error("couldn't link program: {log}")]
    Link { log: String },
    /// A shader of the wrong stage was passed to the linker.
    #[error("expected a {expected} shader, got a {found} shader")]
    StageMismatch {
        expected: ShaderStage,
        found: ShaderStage,
    },
    /// The driver refused to allocate a shader or program object.
    #[error("graphics driver error: {0}")]
    Driver(String),
}

/// Errors raised while reading a [`DemoConfig`](crate::config::DemoConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while bringing up the SDL2 window and OpenGL context.
#[cfg(feature = "window")]
#[derive(Error, Debug)]
pub enum AppError {
    #[error("SDL error: {0}")]
    Sdl(String),
    #[error("couldn't create window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),
    #[error("couldn't create OpenGL context: {0}")]
    Context(String),
}
