use glam::Vec3;
use thiserror::Error;

use super::{Vertex, VertexBuffer};

/// Expansion failure. Expansion is all-or-nothing: on error the destination
/// buffer is untouched, because a partially built triangle list renders as
/// dangling half-quads rather than merely showing less.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("quad buffer capacity {capacity} cannot hold {required} expanded vertices")]
    CapacityExceeded { required: usize, capacity: usize },
}

/// Color handling for expanded quads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColorPolicy {
    /// Every expanded vertex gets one fixed tint.
    Tint([f32; 3]),
    /// Expanded vertices inherit the color of the segment endpoint they
    /// belong to.
    Preserve,
}

impl Default for ColorPolicy {
    fn default() -> Self {
        ColorPolicy::Tint([1.0, 0.5, 0.0])
    }
}

/// Parameters for line-to-quad expansion.
#[derive(Debug, Clone, Default)]
pub struct ExpandParams {
    /// Perpendicular offset magnitude; the rendered line is `2 * half_width`
    /// thick.
    pub half_width: f32,
    pub color: ColorPolicy,
}

/// Expands the line-list in `src` into a triangle-list in `dst`.
///
/// Each 2-vertex segment becomes 6 vertices: two triangles covering a quad
/// offset by `half_width` along the segment's XY-plane normal (Z passes
/// through unrotated). Winding per segment is `{A+, A-, B+}`, `{A-, B+, B-}`.
///
/// Capacity is checked once up front; `3 * src.len() >= dst.capacity()` fails
/// with [`ExpandError::CapacityExceeded`] before anything is written.
///
/// Zero-length segments have no defined normal and are skipped (counted and
/// reported at debug level) rather than emitting NaN positions. A trailing
/// unpaired vertex in `src` is ignored.
///
/// Returns the number of vertices written to `dst`.
pub fn expand(
    src: &VertexBuffer,
    dst: &mut VertexBuffer,
    params: &ExpandParams,
) -> Result<usize, ExpandError> {
    let required = src.len() * 3;
    if required >= dst.capacity() {
        return Err(ExpandError::CapacityExceeded {
            required,
            capacity: dst.capacity(),
        });
    }

    dst.reset();

    let mut skipped = 0usize;
    for segment in src.vertices().chunks_exact(2) {
        let (v0, v1) = (&segment[0], &segment[1]);
        let a = Vec3::from(v0.position);
        let b = Vec3::from(v1.position);

        let dir = (b - a).normalize_or_zero();
        if dir == Vec3::ZERO {
            skipped += 1;
            continue;
        }

        let normal = Vec3::new(-dir.y, dir.x, dir.z);
        let offset = normal * params.half_width;

        let (color_a, color_b) = match params.color {
            ColorPolicy::Tint(tint) => (tint, tint),
            ColorPolicy::Preserve => (v0.color, v1.color),
        };

        push(dst, a + offset, color_a);
        push(dst, a - offset, color_a);
        push(dst, b + offset, color_b);

        push(dst, a - offset, color_a);
        push(dst, b + offset, color_b);
        push(dst, b - offset, color_b);
    }

    if skipped > 0 {
        log::debug!("skipped {skipped} zero-length segments during expansion");
    }

    Ok(dst.len())
}

#[inline]
fn push(dst: &mut VertexBuffer, position: Vec3, color: [f32; 3]) {
    let appended = dst.append(Vertex::new(position.to_array(), color));
    // Capacity for every non-degenerate segment was reserved up front.
    debug_assert!(appended);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CircleGrid;

    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

    fn line_buffer(segments: &[([f32; 3], [f32; 3])]) -> VertexBuffer {
        let mut buf = VertexBuffer::with_capacity(segments.len() * 2);
        for (a, b) in segments {
            buf.append(Vertex::new(*a, WHITE));
            buf.append(Vertex::new(*b, WHITE));
        }
        buf
    }

    fn tint_params(half_width: f32, tint: [f32; 3]) -> ExpandParams {
        ExpandParams {
            half_width,
            color: ColorPolicy::Tint(tint),
        }
    }

    // ── exact values ──────────────────────────────────────────────────────

    #[test]
    fn unit_segment_expands_to_exact_quad() {
        let src = line_buffer(&[([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]);
        let mut dst = VertexBuffer::with_capacity(7);

        let written = expand(&src, &mut dst, &tint_params(0.5, WHITE)).unwrap();
        assert_eq!(written, 6);

        let a_plus = [0.0, 0.5, 0.0];
        let a_minus = [0.0, -0.5, 0.0];
        let b_plus = [1.0, 0.5, 0.0];
        let b_minus = [1.0, -0.5, 0.0];
        let positions: Vec<[f32; 3]> = dst.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![a_plus, a_minus, b_plus, a_minus, b_plus, b_minus]
        );
    }

    #[test]
    fn vertical_segment_offsets_along_x() {
        let src = line_buffer(&[([0.0, 0.0, 0.0], [0.0, 2.0, 0.0])]);
        let mut dst = VertexBuffer::with_capacity(7);

        expand(&src, &mut dst, &tint_params(0.25, WHITE)).unwrap();

        // dir = +Y, normal = (-1, 0, 0): the quad extends along X.
        assert_eq!(dst.vertices()[0].position, [-0.25, 0.0, 0.0]);
        assert_eq!(dst.vertices()[1].position, [0.25, 0.0, 0.0]);
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn insufficient_capacity_writes_nothing() {
        let src = line_buffer(&[([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]);
        // One vertex short of the 6-plus-headroom minimum.
        let mut dst = VertexBuffer::with_capacity(6);
        dst.append(Vertex::new([9.0, 9.0, 9.0], WHITE));

        let err = expand(&src, &mut dst, &tint_params(0.5, WHITE)).unwrap_err();
        assert_eq!(
            err,
            ExpandError::CapacityExceeded {
                required: 6,
                capacity: 6,
            }
        );
        // Pre-existing contents untouched; no partial output.
        assert_eq!(dst.len(), 1);
        assert_eq!(dst.vertices()[0].position, [9.0, 9.0, 9.0]);
    }

    #[test]
    fn failed_expansion_leaves_a_fresh_buffer_empty() {
        let src = line_buffer(&[([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]);
        let mut dst = VertexBuffer::with_capacity(6);
        assert!(expand(&src, &mut dst, &tint_params(0.5, WHITE)).is_err());
        assert_eq!(dst.len(), 0);
    }

    #[test]
    fn exact_headroom_succeeds() {
        let src = line_buffer(&[([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]);
        let mut dst = VertexBuffer::with_capacity(7);
        assert_eq!(expand(&src, &mut dst, &tint_params(0.5, WHITE)), Ok(6));
    }

    // ── degenerate segments ───────────────────────────────────────────────

    #[test]
    fn zero_length_segment_is_skipped_without_nans() {
        let src = line_buffer(&[([1.0, 2.0, 3.0], [1.0, 2.0, 3.0])]);
        let mut dst = VertexBuffer::with_capacity(16);

        let written = expand(&src, &mut dst, &tint_params(0.5, WHITE)).unwrap();
        assert_eq!(written, 0);
        assert!(dst.is_empty());
    }

    #[test]
    fn degenerate_segment_does_not_block_its_neighbors() {
        let src = line_buffer(&[
            ([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
        ]);
        let mut dst = VertexBuffer::with_capacity(16);

        let written = expand(&src, &mut dst, &tint_params(0.5, WHITE)).unwrap();
        assert_eq!(written, 6);
        for v in dst.vertices() {
            assert!(v.position.iter().all(|c| c.is_finite()));
        }
    }

    // ── color policy ──────────────────────────────────────────────────────

    #[test]
    fn tint_recolors_every_vertex() {
        let tint = [1.0, 0.5, 0.0];
        let src = line_buffer(&[([0.0, 0.0, 0.0], [1.0, 0.0, 0.0])]);
        let mut dst = VertexBuffer::with_capacity(7);

        expand(&src, &mut dst, &tint_params(0.5, tint)).unwrap();
        assert!(dst.vertices().iter().all(|v| v.color == tint));
    }

    #[test]
    fn preserve_inherits_per_endpoint_colors() {
        let mut src = VertexBuffer::with_capacity(2);
        src.append(Vertex::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]));
        src.append(Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]));
        let mut dst = VertexBuffer::with_capacity(7);

        expand(
            &src,
            &mut dst,
            &ExpandParams {
                half_width: 0.5,
                color: ColorPolicy::Preserve,
            },
        )
        .unwrap();

        // {A+, A-, B+}, {A-, B+, B-}: A-vertices red, B-vertices green.
        let colors: Vec<[f32; 3]> = dst.vertices().iter().map(|v| v.color).collect();
        let red = [1.0, 0.0, 0.0];
        let green = [0.0, 1.0, 0.0];
        assert_eq!(colors, vec![red, red, green, red, green, green]);
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn circle_grid_scene_expands_to_expected_count() {
        let scene = CircleGrid {
            grid_width: 2,
            grid_height: 2,
            spacing: 1.0,
            circle_resolution: 4,
            radius: 0.1,
            color: WHITE,
        };
        let mut lines = VertexBuffer::with_capacity(scene.vertex_demand());
        assert_eq!(scene.generate(&mut lines), 72);

        let mut quads = VertexBuffer::with_capacity(72 * 3 + 1);
        let written = expand(&lines, &mut quads, &tint_params(0.01, WHITE)).unwrap();
        assert_eq!(written, 216);
        assert!(quads
            .vertices()
            .iter()
            .all(|v| v.position.iter().all(|c| c.is_finite())));
    }
}
