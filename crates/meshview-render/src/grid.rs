//! Viewport overlay grid
//!
//! Generates the XZ-plane reference grid drawn under the mesh: `steps` lines
//! parallel to each axis, spanning `-size..size`, at Y = 0.

use glam::Vec3;

/// Line segments of a square grid in the XZ plane.
///
/// Returns `2 * steps` segments: `steps` parallel to Z followed by `steps`
/// parallel to X, each with endpoints at the grid boundary.
pub fn grid_lines(size: f32, steps: usize) -> Vec<[Vec3; 2]> {
    // Evenly spaced coordinates over [-size, size], endpoints included.
    let coords: Vec<f32> = (0..steps)
        .map(|i| {
            if steps == 1 {
                -size
            } else {
                -size + 2.0 * size * i as f32 / (steps - 1) as f32
            }
        })
        .collect();

    let mut lines = Vec::with_capacity(steps * 2);
    for &t in &coords {
        lines.push([Vec3::new(t, 0.0, -size), Vec3::new(t, 0.0, size)]);
    }
    for &t in &coords {
        lines.push([Vec3::new(-size, 0.0, t), Vec3::new(size, 0.0, t)]);
    }
    lines
}

/// Interleaved position + color vertex stream for the colored-line pipeline,
/// six floats per vertex.
pub fn grid_vertex_data(size: f32, steps: usize, color: [f32; 3]) -> Vec<f32> {
    let mut data = Vec::with_capacity(steps * 2 * 2 * 6);
    for line in grid_lines(size, steps) {
        for point in line {
            data.extend_from_slice(&point.to_array());
            data.extend_from_slice(&color);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_line_count() {
        assert_eq!(grid_lines(5.0, 10).len(), 20);
    }

    #[test]
    fn test_grid_lies_in_xz_plane() {
        for line in grid_lines(5.0, 10) {
            for point in line {
                assert_eq!(point.y, 0.0);
                assert!(point.x.abs() <= 5.0 + 1e-6);
                assert!(point.z.abs() <= 5.0 + 1e-6);
            }
        }
    }

    #[test]
    fn test_grid_spans_both_edges() {
        let lines = grid_lines(5.0, 10);
        assert_eq!(lines[0][0], Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(lines[9][1], Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_vertex_stream_stride() {
        let data = grid_vertex_data(5.0, 10, [0.3, 0.3, 0.3]);
        // 20 lines, 2 vertices each, 6 floats per vertex.
        assert_eq!(data.len(), 20 * 2 * 6);
        assert_eq!(&data[3..6], &[0.3, 0.3, 0.3]);
    }

    #[test]
    fn test_empty_grid() {
        assert!(grid_lines(5.0, 0).is_empty());
    }
}
