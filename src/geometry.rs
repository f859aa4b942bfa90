//! CPU-side geometry for the built-in primitives.
//!
//! Everything here is pure and context-free: shape parameters in, vertex
//! lists out, in object-space coordinates centered on the shape's own
//! origin. Conversion to normalized device coordinates happens elsewhere
//! (in the shader for shapes, at placement time for widgets), so geometry
//! can be built before any GL context exists.

use bytemuck::{Pod, Zeroable};

/// A single vertex, ready for the GPU.
///
/// Three floats, 12-byte stride, matching the attribute layout declared in
/// [`VertexBuffer`](crate::buffer::VertexBuffer).
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
}

/// Below this, a corner radius is treated as zero.
const RADIUS_EPSILON: f32 = 1e-7;

const fn v(x: f32, y: f32) -> Vertex {
    Vertex {
        position: [x, y, 0.0],
    }
}

/// A unit square spanning [-0.5, 0.5]², in triangle-strip order.
#[must_use]
pub fn square() -> Vec<Vertex> {
    vec![
        v(-0.5, 0.5),  // top-left
        v(0.5, 0.5),   // top-right
        v(-0.5, -0.5), // bottom-left
        v(0.5, -0.5),  // bottom-right
    ]
}

/// A circle of radius 0.5 as a triangle fan: one center vertex followed by
/// `segments + 1` rim vertices (the last duplicates the first to close the
/// fan). Rim vertex `i` sits at angle `2π·i/segments`.
///
/// # Panics
///
/// Panics if `segments` is zero.
#[must_use]
pub fn circle(segments: u32) -> Vec<Vertex> {
    assert!(segments > 0, "a circle needs at least one segment");

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(v(0.0, 0.0));
    for i in 0..=segments {
        #[expect(clippy::cast_precision_loss)]
        let angle = std::f32::consts::TAU * i as f32 / segments as f32;
        vertices.push(v(0.5 * angle.cos(), 0.5 * angle.sin()));
    }
    vertices
}

/// Fill and outline geometry for a rounded rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRect {
    /// Triangle-list body geometry.
    pub fill: Vec<Vertex>,
    /// Line-loop border geometry, one closed loop around the shape.
    pub outline: Vec<Vertex>,
}

/// Build a rounded rectangle centered on the origin.
///
/// `corner_radius` is clamped to `[0, min(width, height) / 2]`. With an
/// effectively zero radius the fill is two triangles and the outline the
/// four corners; otherwise the outline is four quarter-circle arcs, one
/// per corner and each rotated 90° from the last, traced clockwise from
/// the top-right corner so the loop closes with no gap or overlap at the
/// corner seams. Each arc contributes `segments + 1` points, and the fill
/// fans from the center through consecutive outline pairs, wrapping the
/// final pair back to the first point.
#[must_use]
pub fn rounded_rect(width: f32, height: f32, corner_radius: f32, segments: u32) -> RoundedRect {
    use std::f32::consts::{FRAC_PI_2, PI};

    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let radius = corner_radius.clamp(0.0, half_w.min(half_h));

    if radius <= RADIUS_EPSILON {
        let (tl, tr) = (v(-half_w, half_h), v(half_w, half_h));
        let (bl, br) = (v(-half_w, -half_h), v(half_w, -half_h));
        return RoundedRect {
            fill: vec![tl, tr, br, tl, br, bl],
            outline: vec![tl, tr, br, bl],
        };
    }

    let mut outline = Vec::with_capacity(4 * (segments as usize + 1));
    let mut arc = |cx: f32, cy: f32, start: f32, end: f32| {
        for i in 0..=segments {
            #[expect(clippy::cast_precision_loss)]
            let t = i as f32 / segments as f32;
            let angle = start + t * (end - start);
            outline.push(v(cx + radius * angle.cos(), cy + radius * angle.sin()));
        }
    };

    // One quarter turn per corner; each arc starts where the previous
    // corner's edge ends, so the loop stays continuous.
    arc(half_w - radius, half_h - radius, FRAC_PI_2, 0.0); // top-right
    arc(half_w - radius, -half_h + radius, 0.0, -FRAC_PI_2); // bottom-right
    arc(-half_w + radius, -half_h + radius, -FRAC_PI_2, -PI); // bottom-left
    arc(-half_w + radius, half_h - radius, -PI, -3.0 * FRAC_PI_2); // top-left

    let mut fill = Vec::with_capacity(outline.len() * 3);
    for i in 0..outline.len() {
        let next = (i + 1) % outline.len();
        fill.push(v(0.0, 0.0));
        fill.push(outline[i]);
        fill.push(outline[next]);
    }

    RoundedRect { fill, outline }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn square_spans_unit_box() {
        let verts = square();
        assert_eq!(verts.len(), 4);
        for vert in &verts {
            assert_eq!(vert.position[0].abs(), 0.5);
            assert_eq!(vert.position[1].abs(), 0.5);
            assert_eq!(vert.position[2], 0.0);
        }
    }

    #[test]
    fn circle_has_center_plus_closed_rim() {
        let verts = circle(32);
        assert_eq!(verts.len(), 34);
        assert_eq!(verts[0].position, [0.0, 0.0, 0.0]);
        for rim in &verts[1..] {
            let [x, y, _] = rim.position;
            assert!((x.hypot(y) - 0.5).abs() < TOLERANCE);
        }
        // The fan closes: last rim vertex lands back on the first.
        let first = verts[1].position;
        let last = verts[33].position;
        assert!((first[0] - last[0]).abs() < TOLERANCE);
        assert!((first[1] - last[1]).abs() < TOLERANCE);
    }

    #[test]
    fn sharp_rect_degenerates_to_two_triangles() {
        let rect = rounded_rect(2.0, 1.0, 0.0, 8);
        assert_eq!(rect.fill.len(), 6);
        assert_eq!(rect.outline.len(), 4);
    }

    #[test]
    fn tiny_radius_counts_as_sharp() {
        let rect = rounded_rect(2.0, 1.0, 1e-8, 8);
        assert_eq!(rect.fill.len(), 6);
        assert_eq!(rect.outline.len(), 4);
    }

    #[test]
    fn rounded_outline_point_count() {
        let segments = 8;
        let rect = rounded_rect(0.5, 0.333, 0.08, segments);
        assert_eq!(rect.outline.len(), 4 * (segments as usize + 1));
        assert_eq!(rect.fill.len(), rect.outline.len() * 3);
    }

    /// The four arcs must meet the straight edges exactly: every arc
    /// endpoint lies on the rectangle boundary, so the line loop closes
    /// with no gap or overlap at the corner seams.
    #[test]
    fn arc_endpoints_sit_on_the_rect_edges() {
        let (w, h, r, segments) = (2.0_f32, 1.0_f32, 0.2_f32, 8_usize);
        let rect = rounded_rect(w, h, r, segments as u32);
        let (half_w, half_h) = (w / 2.0, h / 2.0);

        let on_edge = |vert: &Vertex| {
            let [x, y, _] = vert.position;
            (x.abs() - half_w).abs() < TOLERANCE || (y.abs() - half_h).abs() < TOLERANCE
        };

        let arc_len = segments + 1;
        for corner in 0..4 {
            let first = &rect.outline[corner * arc_len];
            let last = &rect.outline[corner * arc_len + segments];
            assert!(on_edge(first), "arc {corner} start off-edge: {first:?}");
            assert!(on_edge(last), "arc {corner} end off-edge: {last:?}");
        }
    }

    #[test]
    fn outline_stays_inside_the_bounding_box() {
        let rect = rounded_rect(2.0, 1.0, 0.3, 8);
        for vert in &rect.outline {
            let [x, y, _] = vert.position;
            assert!(x.abs() <= 1.0 + TOLERANCE);
            assert!(y.abs() <= 0.5 + TOLERANCE);
        }
    }

    #[test]
    fn oversized_radius_is_clamped() {
        // Radius larger than half the short side must not blow the shape up.
        let rect = rounded_rect(2.0, 1.0, 5.0, 8);
        for vert in &rect.outline {
            let [x, y, _] = vert.position;
            assert!(x.abs() <= 1.0 + TOLERANCE);
            assert!(y.abs() <= 0.5 + TOLERANCE);
        }
    }
}
