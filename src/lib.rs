//! Helpers for small OpenGL tutorial programs.
//!
//! The interesting part is the shader program lifecycle in [`abs`]: load the source
//! of a vertex and a fragment stage, compile both, link them into a
//! [`ShaderProgram`], then `use_program` and `set_uniform` every frame. Everything
//! goes through a [`GraphicsDriver`], which is a real [`glow::Context`] in the
//! tutorial binaries and, with the `mock` feature, an in-memory `MockDriver` in tests.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # fn run(gl: Arc<glow::Context>) -> Result<(), hellogl::ShaderError> {
//! let program = hellogl::ShaderProgram::from_files(
//!     &gl,
//!     "shaders/moving_triangle.vert",
//!     "shaders/triangle_basic.frag",
//! )?;
//! program.use_program();
//! program.set_uniform("shift", (0.1f32, 0.2f32));
//! # Ok(())
//! # }
//! ```

pub mod abs;
pub mod config;
pub mod error;
pub mod logging;

pub use abs::*;
pub use config::{DemoConfig, WindowConfig};
#[cfg(feature = "window")]
pub use error::AppError;
pub use error::{ConfigError, ShaderError};
