//! This module contains the OpenGL helpers the tutorial programs are built on:
//! the driver seam, shader loading, compilation and linking, uniform upload, and,
//! with the `window` feature, window setup and mesh upload. The `mock` feature adds
//! `MockDriver` for testing without a GPU.

#[cfg(feature = "window")]
pub mod app;
pub mod driver;
#[cfg(feature = "window")]
pub mod mesh;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod shader;
pub mod source;
pub mod uniform;

#[cfg(feature = "window")]
pub use app::*;
pub use driver::*;
#[cfg(feature = "window")]
pub use mesh::*;
#[cfg(any(test, feature = "mock"))]
pub use mock::*;
pub use shader::*;
pub use source::*;
pub use uniform::{Uniform, UniformValue};
