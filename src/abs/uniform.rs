//! Uniform upload.
//!
//! Host values are converted into a [`UniformValue`] through the [`Uniform`] trait
//! and uploaded with a single `match` over the variant. Locations are looked up
//! by name on every call. A name the linked program doesn't have resolves to no
//! location, and the upload is silently skipped, like the driver itself does.

use glam::{Vec2, Vec3, Vec4};

use super::GraphicsDriver;

/// A value that can be stored in a uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

/// Represents a host value that can be uploaded into a uniform variable.
pub trait Uniform {
    fn to_uniform_value(&self) -> UniformValue;
}

impl Uniform for UniformValue {
    fn to_uniform_value(&self) -> UniformValue {
        *self
    }
}

impl Uniform for bool {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Bool(*self)
    }
}

impl Uniform for i32 {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Int(*self)
    }
}

impl Uniform for f32 {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Float(*self)
    }
}

impl Uniform for Vec2 {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec2(*self)
    }
}

impl Uniform for Vec3 {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec3(*self)
    }
}

impl Uniform for Vec4 {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec4(*self)
    }
}

impl Uniform for (f32, f32) {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec2(Vec2::new(self.0, self.1))
    }
}

impl Uniform for (f32, f32, f32) {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec3(Vec3::new(self.0, self.1, self.2))
    }
}

impl Uniform for (f32, f32, f32, f32) {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec4(Vec4::new(self.0, self.1, self.2, self.3))
    }
}

impl Uniform for [f32; 2] {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec2(Vec2::from_array(*self))
    }
}

impl Uniform for [f32; 3] {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec3(Vec3::from_array(*self))
    }
}

impl Uniform for [f32; 4] {
    fn to_uniform_value(&self) -> UniformValue {
        UniformValue::Vec4(Vec4::from_array(*self))
    }
}

impl<T: Uniform> Uniform for &T {
    fn to_uniform_value(&self) -> UniformValue {
        (*self).to_uniform_value()
    }
}

/// Uploads `value` into the uniform called `name` of `program`.
///
/// The driver applies uniform uploads to the program currently in use, so
/// `program` must have been made current first.
pub fn set_uniform<D, T>(gl: &D, program: D::Program, name: &str, value: T)
where
    D: GraphicsDriver + ?Sized,
    T: Uniform,
{
    let Some(location) = gl.get_uniform_location(program, name) else {
        log::trace!("Uniform {name:?} not found in program {program:?}, skipping");
        return;
    };

    match value.to_uniform_value() {
        UniformValue::Bool(b) => gl.uniform_1_i32(&location, b as i32),
        UniformValue::Int(i) => gl.uniform_1_i32(&location, i),
        UniformValue::Float(x) => gl.uniform_1_f32(&location, x),
        UniformValue::Vec2(v) => gl.uniform_2_f32(&location, v.x, v.y),
        UniformValue::Vec3(v) => gl.uniform_3_f32(&location, v.x, v.y, v.z),
        UniformValue::Vec4(v) => gl.uniform_4_f32(&location, v.x, v.y, v.z, v.w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuples_and_arrays_become_vectors() {
        assert_eq!(
            (0.1f32, 0.2f32).to_uniform_value(),
            UniformValue::Vec2(Vec2::new(0.1, 0.2))
        );
        assert_eq!(
            [1.0f32, 2.0, 3.0].to_uniform_value(),
            UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(
            (&Vec4::ONE).to_uniform_value(),
            UniformValue::Vec4(Vec4::ONE)
        );
    }

    #[test]
    fn test_scalars_keep_their_kind() {
        assert_eq!(true.to_uniform_value(), UniformValue::Bool(true));
        assert_eq!(7i32.to_uniform_value(), UniformValue::Int(7));
        assert_eq!(0.5f32.to_uniform_value(), UniformValue::Float(0.5));
    }
}
