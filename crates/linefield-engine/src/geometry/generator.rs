use std::f32::consts::TAU;

use glam::Vec3;

use super::{Vertex, VertexBuffer};

/// Scene parameters for the circle-grid line generator.
///
/// `grid_width`/`grid_height` count lattice *cells*; circle centers sit on the
/// `(grid_width + 1) × (grid_height + 1)` lattice points, centered on the
/// origin and spaced `spacing` apart. Each circle is approximated by
/// `circle_resolution` line segments.
#[derive(Debug, Clone)]
pub struct CircleGrid {
    pub grid_width: u32,
    pub grid_height: u32,
    pub spacing: f32,
    pub circle_resolution: u32,
    pub radius: f32,
    /// Pass-through vertex color; not derived from geometry.
    pub color: [f32; 3],
}

impl Default for CircleGrid {
    fn default() -> Self {
        Self {
            grid_width: 100,
            grid_height: 100,
            spacing: 0.1,
            circle_resolution: 6,
            radius: 0.04,
            color: [1.0, 1.0, 1.0],
        }
    }
}

impl CircleGrid {
    /// Number of circle centers in the scene.
    #[inline]
    pub fn centers(&self) -> usize {
        (self.grid_width as usize + 1) * (self.grid_height as usize + 1)
    }

    /// Line-list vertices the full scene produces (2 per segment).
    ///
    /// Use this to size the destination buffer; `generate` truncates instead
    /// of failing when the buffer is smaller.
    #[inline]
    pub fn vertex_demand(&self) -> usize {
        self.centers() * self.circle_resolution as usize * 2
    }

    /// Fills `out` with the scene's line-list and returns the vertex count.
    ///
    /// `out` is reset first; writing always starts at index 0. The walk order
    /// (row-major over centers, clockwise from the top of each circle) is
    /// fixed, so output is deterministic and regenerating every frame with
    /// unchanged parameters is byte-identical.
    ///
    /// Overflow is a soft failure: if the next segment would not fit,
    /// generation stops at a whole-segment boundary, warns once, and the
    /// buffer is left valid and consumable. The returned count is always even.
    pub fn generate(&self, out: &mut VertexBuffer) -> usize {
        out.reset();

        if self.circle_resolution == 0 {
            return 0;
        }

        let d_theta = TAU / self.circle_resolution as f32;

        for iy in 0..=self.grid_height {
            let cy = (iy as f32 - self.grid_height as f32 * 0.5) * self.spacing;
            for ix in 0..=self.grid_width {
                let cx = (ix as f32 - self.grid_width as f32 * 0.5) * self.spacing;

                // Circle walk starts at angle 0: (cx, cy + radius).
                let mut prev = Vec3::new(cx, cy + self.radius, 0.0);
                for i in 1..=self.circle_resolution {
                    let theta = i as f32 * d_theta;
                    let next = Vec3::new(
                        cx + self.radius * theta.sin(),
                        cy + self.radius * theta.cos(),
                        0.0,
                    );

                    if out.remaining() < 2 {
                        log::warn!(
                            "line buffer full ({} vertices); truncating scene of {}",
                            out.len(),
                            self.vertex_demand()
                        );
                        return out.len();
                    }
                    out.append(Vertex::new(prev.to_array(), self.color));
                    out.append(Vertex::new(next.to_array(), self.color));
                    prev = next;
                }
            }
        }

        out.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scene() -> CircleGrid {
        CircleGrid {
            grid_width: 2,
            grid_height: 2,
            spacing: 1.0,
            circle_resolution: 4,
            radius: 0.1,
            color: [1.0, 1.0, 1.0],
        }
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn full_scene_vertex_count() {
        // (2+1) x (2+1) centers, 4 segments each, 2 vertices per segment.
        let scene = small_scene();
        let mut buf = VertexBuffer::with_capacity(256);
        let written = scene.generate(&mut buf);
        assert_eq!(written, 72);
        assert_eq!(written, scene.vertex_demand());
        assert_eq!(buf.len(), written);
    }

    #[test]
    fn odd_grid_dimensions_still_have_inclusive_centers() {
        let scene = CircleGrid {
            grid_width: 3,
            grid_height: 1,
            ..small_scene()
        };
        assert_eq!(scene.centers(), 4 * 2);
        let mut buf = VertexBuffer::with_capacity(scene.vertex_demand());
        assert_eq!(scene.generate(&mut buf), 8 * 4 * 2);
    }

    // ── capacity safety ───────────────────────────────────────────────────

    #[test]
    fn never_writes_past_capacity() {
        let scene = small_scene();
        for capacity in [0, 1, 2, 3, 7, 10, 71, 72, 73] {
            let mut buf = VertexBuffer::with_capacity(capacity);
            let written = scene.generate(&mut buf);
            assert!(written <= capacity, "capacity {capacity}");
            assert_eq!(buf.len(), written);
        }
    }

    #[test]
    fn truncated_output_is_whole_segments() {
        let scene = small_scene();
        for capacity in [1, 3, 5, 9, 11, 71] {
            let mut buf = VertexBuffer::with_capacity(capacity);
            let written = scene.generate(&mut buf);
            assert_eq!(written % 2, 0, "capacity {capacity}");
        }
    }

    // ── determinism ───────────────────────────────────────────────────────

    #[test]
    fn regeneration_is_byte_identical() {
        let scene = small_scene();
        let mut a = VertexBuffer::with_capacity(256);
        let mut b = VertexBuffer::with_capacity(256);
        scene.generate(&mut a);
        scene.generate(&mut b);
        assert_eq!(a.as_bytes(), b.as_bytes());

        // Reuse of the same buffer is equally deterministic.
        let first: Vec<u8> = a.as_bytes().to_vec();
        scene.generate(&mut a);
        assert_eq!(a.as_bytes(), &first[..]);
    }

    #[test]
    fn truncation_point_is_deterministic() {
        let scene = small_scene();
        let mut a = VertexBuffer::with_capacity(10);
        let mut b = VertexBuffer::with_capacity(10);
        assert_eq!(scene.generate(&mut a), 10);
        assert_eq!(scene.generate(&mut b), 10);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn segments_chain_around_each_circle() {
        // Consecutive segments of one circle share an endpoint.
        let scene = CircleGrid {
            grid_width: 0,
            grid_height: 0,
            ..small_scene()
        };
        let mut buf = VertexBuffer::with_capacity(scene.vertex_demand());
        scene.generate(&mut buf);
        let verts = buf.vertices();
        for pair in verts.chunks_exact(2).collect::<Vec<_>>().windows(2) {
            assert_eq!(pair[0][1].position, pair[1][0].position);
        }
        // The walk closes: the final endpoint lands back on the angle-0 start
        // point (up to float rounding in sin/cos at full turn).
        let first = verts[0].position;
        let last = verts[verts.len() - 1].position;
        for axis in 0..3 {
            assert!((first[axis] - last[axis]).abs() < 1e-6);
        }
    }

    #[test]
    fn color_is_passed_through() {
        let scene = CircleGrid {
            color: [0.25, 0.5, 0.75],
            ..small_scene()
        };
        let mut buf = VertexBuffer::with_capacity(scene.vertex_demand());
        scene.generate(&mut buf);
        assert!(buf.vertices().iter().all(|v| v.color == [0.25, 0.5, 0.75]));
    }
}
