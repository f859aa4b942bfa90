//! Built-in shape drawables: [`Square`] and [`Circle`].
//!
//! Both carry their geometry in object space (built at construction, no
//! context needed) and place it at draw time through the scaled shape
//! shader: `u_scale` sizes the unit geometry, `u_position` moves it in
//! normalized device coordinates.
//!
//! Each instance owns its own program and buffer outright; nothing is
//! shared between drawables.

use glow::HasContext;

use crate::buffer::VertexBuffer;
use crate::capability::GlslTier;
use crate::error::Error;
use crate::geometry::{self, Vertex};
use crate::scene::{Drawable, Lifecycle};
use crate::shaders::{ShaderProgram, SHAPE_SOURCE};

/// Fill color drawables start with.
pub const DEFAULT_COLOR: [f32; 3] = [1.0, 0.5, 0.2];

/// GPU half of a shape: one program, one buffer.
struct ShapeGpu {
    shader: ShaderProgram,
    buffer: VertexBuffer,
}

impl ShapeGpu {
    /// Compile the shape program and upload the geometry.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    unsafe fn create(
        gl: &glow::Context,
        tier: GlslTier,
        vertices: &[Vertex],
    ) -> Result<Self, Error> {
        let shader = unsafe { ShaderProgram::compile(gl, &SHAPE_SOURCE, tier) }?;
        let buffer = match unsafe { VertexBuffer::upload(gl, vertices) } {
            Ok(buffer) => buffer,
            Err(err) => {
                unsafe { shader.destroy(gl) };
                return Err(err);
            }
        };
        Ok(Self { shader, buffer })
    }

    /// Issue one draw call with the given transform and color.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    unsafe fn draw(
        &self,
        gl: &glow::Context,
        mode: u32,
        position: [f32; 3],
        scale: f32,
        color: [f32; 3],
    ) {
        unsafe {
            self.shader.bind(gl);
            self.shader.set_position(gl, position);
            self.shader.set_scale(gl, scale);
            self.shader.set_color(gl, color);

            self.buffer.bind(gl);
            gl.draw_arrays(mode, 0, self.buffer.vertex_count());
            self.buffer.unbind(gl);

            gl.use_program(None);
        }
    }

    /// Release the program and buffer.
    ///
    /// # Safety
    ///
    /// Requires the same context the resources were created on.
    unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe {
            self.shader.destroy(gl);
            self.buffer.destroy(gl);
        }
    }
}

/// A flat-colored unit square, drawn as a triangle strip.
pub struct Square {
    name: String,
    position: [f32; 3],
    color: [f32; 3],
    scale: f32,
    vertices: Vec<Vertex>,
    gpu: Option<ShapeGpu>,
    lifecycle: Lifecycle,
}

impl Square {
    /// Create a square with default placement (origin, unit scale,
    /// [`DEFAULT_COLOR`]).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            color: DEFAULT_COLOR,
            scale: 1.0,
            vertices: geometry::square(),
            gpu: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Current uniform scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the uniform scale. Negative values clamp to zero.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }
}

impl Drawable for Square {
    fn name(&self) -> &str {
        &self.name
    }

    unsafe fn initialize(&mut self, gl: &glow::Context, tier: GlslTier) -> Result<(), Error> {
        self.lifecycle.assert_created(&self.name);
        self.gpu = Some(unsafe { ShapeGpu::create(gl, tier, &self.vertices) }?);
        self.lifecycle = Lifecycle::Live;
        Ok(())
    }

    unsafe fn render(&mut self, gl: &glow::Context) {
        self.lifecycle.assert_live(&self.name);
        if let Some(gpu) = &self.gpu {
            unsafe {
                gpu.draw(gl, glow::TRIANGLE_STRIP, self.position, self.scale, self.color);
            }
        }
    }

    unsafe fn cleanup(&mut self, gl: &glow::Context) {
        self.lifecycle.assert_cleanable(&self.name);
        if let Some(gpu) = self.gpu.take() {
            unsafe { gpu.destroy(gl) };
        }
        self.lifecycle = Lifecycle::Destroyed;
    }

    fn position(&self) -> [f32; 3] {
        self.position
    }

    fn set_position(&mut self, position: [f32; 3]) {
        self.position = position;
    }

    fn color(&self) -> [f32; 3] {
        self.color
    }

    fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
    }
}

/// A flat-colored circle, drawn as a triangle fan.
pub struct Circle {
    name: String,
    position: [f32; 3],
    color: [f32; 3],
    scale: f32,
    vertices: Vec<Vertex>,
    gpu: Option<ShapeGpu>,
    lifecycle: Lifecycle,
}

impl Circle {
    /// Rim segments used by [`new`](Self::new).
    pub const DEFAULT_SEGMENTS: u32 = 32;

    /// Create a circle with the default segment count and placement.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_segments(name, Self::DEFAULT_SEGMENTS)
    }

    /// Create a circle with a custom rim segment count.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is zero.
    #[must_use]
    pub fn with_segments(name: impl Into<String>, segments: u32) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            color: DEFAULT_COLOR,
            scale: 1.0,
            vertices: geometry::circle(segments),
            gpu: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Current uniform scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the uniform scale. Negative values clamp to zero.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }
}

impl Drawable for Circle {
    fn name(&self) -> &str {
        &self.name
    }

    unsafe fn initialize(&mut self, gl: &glow::Context, tier: GlslTier) -> Result<(), Error> {
        self.lifecycle.assert_created(&self.name);
        self.gpu = Some(unsafe { ShapeGpu::create(gl, tier, &self.vertices) }?);
        self.lifecycle = Lifecycle::Live;
        Ok(())
    }

    unsafe fn render(&mut self, gl: &glow::Context) {
        self.lifecycle.assert_live(&self.name);
        if let Some(gpu) = &self.gpu {
            unsafe {
                gpu.draw(gl, glow::TRIANGLE_FAN, self.position, self.scale, self.color);
            }
        }
    }

    unsafe fn cleanup(&mut self, gl: &glow::Context) {
        self.lifecycle.assert_cleanable(&self.name);
        if let Some(gpu) = self.gpu.take() {
            unsafe { gpu.destroy(gl) };
        }
        self.lifecycle = Lifecycle::Destroyed;
    }

    fn position(&self) -> [f32; 3] {
        self.position
    }

    fn set_position(&mut self, position: [f32; 3]) {
        self.position = position;
    }

    fn color(&self) -> [f32; 3] {
        self.color
    }

    fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_start_with_shared_defaults() {
        let square = Square::new("sq");
        assert_eq!(square.name(), "sq");
        assert_eq!(square.position(), [0.0; 3]);
        assert_eq!(square.color(), DEFAULT_COLOR);
        assert_eq!(square.scale(), 1.0);

        let circle = Circle::new("ci");
        assert_eq!(circle.color(), DEFAULT_COLOR);
        assert_eq!(circle.scale(), 1.0);
    }

    #[test]
    fn negative_scale_clamps_to_zero() {
        let mut square = Square::new("sq");
        square.set_scale(-2.0);
        assert_eq!(square.scale(), 0.0);
    }

    #[test]
    fn circle_geometry_follows_segment_count() {
        let circle = Circle::with_segments("ci", 8);
        // Center plus a closed rim.
        assert_eq!(circle.vertices.len(), 10);
    }
}
