//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct, a vertex array with its vertex buffer and
//! optional element buffer, which is all the geometry the tutorial programs need.
//! Vertices are flat `f32` slices described by a list of attribute sizes.

use std::sync::Arc;

use glow::HasContext;

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    count: usize,
}

impl Mesh {
    /// Uploads `vertices` and sets up one float attribute per entry of `attributes`,
    /// with that many components, at locations 0, 1, 2, and so on. Without `indices`
    /// the vertices are drawn in order.
    pub fn new(
        gl: &Arc<glow::Context>,
        vertices: &[f32],
        attributes: &[i32],
        indices: Option<&[u32]>,
    ) -> Result<Self, String> {
        let floats_per_vertex: i32 = attributes.iter().sum();
        let stride = floats_per_vertex * std::mem::size_of::<f32>() as i32;

        unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(e);
                }
            };
            // From here on dropping `mesh` releases whatever was created.
            let mut mesh = Self {
                gl: Arc::clone(gl),
                vao,
                vbo,
                ebo: None,
                count: 0,
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    std::mem::size_of_val(vertices),
                ),
                glow::STATIC_DRAW,
            );
            log::debug!("Uploaded {} floats to vbo {vbo:?}", vertices.len());

            if let Some(indices) = indices {
                let ebo = gl.create_buffer()?;
                mesh.ebo = Some(ebo);
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                gl.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    std::slice::from_raw_parts(
                        indices.as_ptr() as *const u8,
                        std::mem::size_of_val(indices),
                    ),
                    glow::STATIC_DRAW,
                );
            }

            let mut offset = 0;
            for (location, &size) in attributes.iter().enumerate() {
                gl.vertex_attrib_pointer_f32(
                    location as u32,
                    size,
                    glow::FLOAT,
                    false,
                    stride,
                    offset,
                );
                gl.enable_vertex_attrib_array(location as u32);
                offset += size * std::mem::size_of::<f32>() as i32;
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            if mesh.ebo.is_some() {
                gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            }

            mesh.count = match indices {
                Some(indices) => indices.len(),
                None if floats_per_vertex > 0 => vertices.len() / floats_per_vertex as usize,
                None => 0,
            };

            Ok(mesh)
        }
    }

    /// Draws the mesh as triangles with whatever program is in use.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            if self.ebo.is_some() {
                self.gl
                    .draw_elements(glow::TRIANGLES, self.count as i32, glow::UNSIGNED_INT, 0);
            } else {
                self.gl.draw_arrays(glow::TRIANGLES, 0, self.count as i32);
            }
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            if let Some(ebo) = self.ebo {
                self.gl.delete_buffer(ebo);
            }
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
