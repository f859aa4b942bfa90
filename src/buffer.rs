//! Vertex storage with a probed vertex-array-object fast path.
//!
//! Geometry is uploaded once (`STATIC_DRAW`) and never re-uploaded for
//! the lifetime of the buffer. Where the driver supports vertex array
//! objects, the attribute layout is recorded once into a VAO; where it
//! does not, [`bind`](VertexBuffer::bind) re-declares the layout before
//! every draw and [`unbind`](VertexBuffer::unbind) disables it after.
//!
//! Support cannot be inferred from the advertised version: some driver
//! profiles export the VAO entry points and then fail them with an error
//! flag. The only reliable detection is to attempt the allocation and
//! check `glGetError`, which is what [`upload`](VertexBuffer::upload)
//! does. Both paths declare the attribute through the same routine, so a
//! draw issued against a fallback buffer consumes the exact same layout
//! as one issued against a VAO-backed buffer.

use glow::HasContext;

use crate::error::Error;
use crate::geometry::Vertex;
use crate::shaders::POSITION_LOCATION;

/// Components per position attribute.
pub(crate) const ATTRIBUTE_COMPONENTS: i32 = 3;

/// Byte stride between consecutive vertices. Vertex is three packed
/// f32s, so the cast cannot truncate.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const ATTRIBUTE_STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;

/// An uploaded vertex list, bound either through a VAO or by re-declaring
/// the attribute layout at every draw.
pub struct VertexBuffer {
    vbo: glow::Buffer,
    /// `None` means the context failed the VAO probe; the per-draw
    /// attribute path is in effect.
    vao: Option<glow::VertexArray>,
    vertex_count: i32,
}

impl VertexBuffer {
    /// Upload a vertex list to a new GPU buffer.
    ///
    /// Attempts to wrap the buffer in a vertex array object; on any
    /// reported error the object is discarded and the buffer operates in
    /// the per-draw attribute mode.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// [`Error::ResourceCreation`] if the driver refuses to allocate the
    /// vertex buffer itself. VAO failure is not an error.
    ///
    /// # Panics
    ///
    /// Panics if the vertex count exceeds `i32::MAX`.
    pub unsafe fn upload(gl: &glow::Context, vertices: &[Vertex]) -> Result<Self, Error> {
        let vbo = unsafe { gl.create_buffer() }.map_err(Error::ResourceCreation)?;

        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );
        }

        let vao = unsafe { try_create_vao(gl, vbo) };
        unsafe { gl.bind_buffer(glow::ARRAY_BUFFER, None) };

        Ok(Self {
            vbo,
            vao,
            vertex_count: i32::try_from(vertices.len()).expect("vertex count exceeds i32::MAX"),
        })
    }

    /// Prepare the buffer for a draw call.
    ///
    /// VAO mode binds the recorded state; fallback mode binds the raw
    /// buffer and declares the attribute layout in place.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    pub unsafe fn bind(&self, gl: &glow::Context) {
        match self.vao {
            Some(vao) => unsafe { gl.bind_vertex_array(Some(vao)) },
            None => unsafe {
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
                declare_position_attribute(gl);
            },
        }
    }

    /// Undo [`bind`](Self::bind) after the draw call.
    ///
    /// In fallback mode the attribute must be disabled again: with no VAO
    /// there is no persistent binding state to scope it to.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    pub unsafe fn unbind(&self, gl: &glow::Context) {
        match self.vao {
            Some(_) => unsafe { gl.bind_vertex_array(None) },
            None => unsafe {
                gl.disable_vertex_attrib_array(POSITION_LOCATION);
                gl.bind_buffer(glow::ARRAY_BUFFER, None);
            },
        }
    }

    /// Number of uploaded vertices, as the draw-call count argument.
    #[must_use]
    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    /// Whether the VAO probe succeeded for this buffer.
    #[must_use]
    pub fn has_array_object(&self) -> bool {
        self.vao.is_some()
    }

    /// Delete the buffer and, if present, its VAO.
    ///
    /// # Safety
    ///
    /// Requires the same context the buffer was created on; the buffer
    /// must not be used afterwards.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            if let Some(vao) = self.vao {
                gl.delete_vertex_array(vao);
            }
            gl.delete_buffer(self.vbo);
        }
    }
}

/// Attempt VAO creation, validated through the error flag.
///
/// Returns `None` if the driver rejects the allocation, leaving the
/// buffer on the per-draw attribute path. Expects `vbo` to be bound to
/// `ARRAY_BUFFER`, and leaves it bound.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn try_create_vao(gl: &glow::Context, vbo: glow::Buffer) -> Option<glow::VertexArray> {
    unsafe {
        // Drain stale error flags so the probe reads only its own result.
        while gl.get_error() != glow::NO_ERROR {}

        let vao = match gl.create_vertex_array() {
            Ok(vao) => vao,
            Err(log) => {
                log::debug!("vertex array allocation failed ({log}); using per-draw attributes");
                return None;
            }
        };

        if gl.get_error() != glow::NO_ERROR {
            // Entry point exists but the context doesn't honor it.
            gl.delete_vertex_array(vao);
            log::debug!("vertex array objects unsupported here; using per-draw attributes");
            return None;
        }

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        declare_position_attribute(gl);
        gl.bind_vertex_array(None);

        Some(vao)
    }
}

/// Declare the position attribute layout against the bound buffer.
///
/// Both the VAO setup and the per-draw fallback declare the layout
/// through this one routine.
///
/// # Safety
///
/// Requires a valid, current OpenGL context with the target buffer bound
/// to `ARRAY_BUFFER`.
unsafe fn declare_position_attribute(gl: &glow::Context) {
    unsafe {
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        gl.vertex_attrib_pointer_f32(
            POSITION_LOCATION,
            ATTRIBUTE_COMPONENTS,
            glow::FLOAT,
            false,
            ATTRIBUTE_STRIDE,
            0,
        );
    }
}
