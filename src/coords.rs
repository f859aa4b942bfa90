//! Pixel-space to normalized-device-coordinate conversion.
//!
//! The rasterizer consumes positions in [-1, 1] × [-1, 1] with Y pointing
//! up; window pixels have the origin at the top-left with Y pointing down.
//! Widget placement and hit-testing both go through the mapping here.
//!
//! A [`Viewport`] is a snapshot of the window's current pixel size, taken
//! by the host at the moment of the call. Nothing in this crate caches
//! one: every placement or hit-test call converts against the size it is
//! handed, so a resized window can never leave stale conversions behind.

/// Window size in pixels at the time of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport from a window's current pixel size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a pixel position to normalized device coordinates.
    ///
    /// `(0, 0)` (top-left pixel) maps to `(-1, 1)`; the window center maps
    /// to the origin.
    #[must_use]
    pub fn point_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        #[expect(clippy::cast_precision_loss)]
        let (w, h) = (self.width as f32, self.height as f32);
        (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
    }

    /// Convert a pixel extent (width, height) to normalized device units.
    ///
    /// Extents scale without the ±1 offset and without the Y flip.
    #[must_use]
    pub fn extent_to_ndc(&self, width: f32, height: f32) -> (f32, f32) {
        #[expect(clippy::cast_precision_loss)]
        let (w, h) = (self.width as f32, self.height as f32);
        (width / w * 2.0, height / h * 2.0)
    }

    /// Convert a normalized device position back to pixels.
    ///
    /// Inverse of [`point_to_ndc`](Self::point_to_ndc).
    #[must_use]
    pub fn ndc_to_point(&self, nx: f32, ny: f32) -> (f32, f32) {
        #[expect(clippy::cast_precision_loss)]
        let (w, h) = (self.width as f32, self.height as f32);
        ((nx + 1.0) * 0.5 * w, (1.0 - ny) * 0.5 * h)
    }
}
