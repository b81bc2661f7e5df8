//! Static shared-vertex index buffer.
//!
//! The index pattern does not depend on waveform content, so one buffer is
//! generated up front for the largest bake the application will draw. A
//! draw call only varies how many of its indices (and from where) it submits.

use serde::{Deserialize, Serialize};
use waveplot_core::Frames;

use crate::TessellationError;
use crate::bake::{MIN_SAMPLES, WaveformMesh};

/// Indices per quad: two triangles
const INDICES_PER_QUAD: usize = 6;

/// Largest sample capacity an index buffer is generated for (~400MB of indices)
pub const MAX_CAPACITY: Frames = 1 << 24;

/// Generate the shared-vertex index pattern for up to `capacity` samples.
///
/// Produces `6 * (capacity - 1)` indices, repeating
/// `{j, j+1, j+2, j+3, j+2, j+1}` with `j` advancing by 2 per quad.
///
/// # Errors
///
/// Rejects a capacity below [`MIN_SAMPLES`] (no bake would fit), above
/// [`MAX_CAPACITY`], or one whose buffer cannot be allocated.
pub fn generate_shared_vertex_indices(capacity: Frames) -> Result<IndexBuffer, TessellationError> {
    if !(MIN_SAMPLES..=MAX_CAPACITY).contains(&capacity) {
        return Err(TessellationError::InvalidCapacity(capacity));
    }

    // Largest index referenced is 2 * (quads - 1) + 3, well inside u32
    let quads = capacity - 1;

    let mut indices = Vec::new();
    indices
        .try_reserve_exact(INDICES_PER_QUAD * quads)
        .map_err(|_| TessellationError::InvalidCapacity(capacity))?;
    for quad in 0..quads {
        let j = (2 * quad) as u32;
        indices.extend_from_slice(&[j, j + 1, j + 2, j + 3, j + 2, j + 1]);
    }

    tracing::debug!(
        "Generated {} shared-vertex indices for capacity {}",
        indices.len(),
        capacity
    );

    Ok(IndexBuffer { indices, capacity })
}

/// Horizontal window of the stroke currently in view, in output coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewWindow {
    /// Left edge
    pub left: f32,
    /// Visible width (must be > 0 for anything to be drawn)
    pub width: f32,
}

impl ViewWindow {
    pub const fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }
}

/// Contiguous slice of the index buffer to submit in one draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRange {
    /// Offset of the first index (in indices, not bytes)
    pub first_index: usize,
    /// Number of indices to draw
    pub index_count: usize,
}

/// Content-independent index buffer sized for a maximum sample count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuffer {
    indices: Vec<u32>,
    capacity: Frames,
}

impl IndexBuffer {
    /// Largest sample count this buffer can draw
    pub fn capacity(&self) -> Frames {
        self.capacity
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    /// Raw bytes for upload (4 bytes per index)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of indices that draw a full bake of `sample_count` samples.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` when the bake is larger than this buffer serves,
    /// `TooFewSamples` when it is not a valid bake size.
    pub fn index_count_for(&self, sample_count: Frames) -> Result<usize, TessellationError> {
        if sample_count < MIN_SAMPLES {
            return Err(TessellationError::TooFewSamples {
                count: sample_count,
                minimum: MIN_SAMPLES,
            });
        }

        if sample_count > self.capacity {
            return Err(TessellationError::CapacityExceeded {
                requested: sample_count,
                capacity: self.capacity,
            });
        }

        Ok(INDICES_PER_QUAD * (sample_count - 2))
    }

    /// Slice of indices covering the part of `mesh` inside `view`.
    ///
    /// Segment `s` (between samples `s` and `s + 1`) is drawn by triangle 0
    /// for the first segment, the last triangle for the final segment, and
    /// triangles `2s - 1` and `2s` in between. Returns `Ok(None)` when the
    /// window does not overlap the stroke.
    pub fn draw_range(
        &self,
        mesh: &WaveformMesh,
        view: ViewWindow,
    ) -> Result<Option<DrawRange>, TessellationError> {
        let sample_count = mesh.sample_count();
        self.index_count_for(sample_count)?;

        let x_step = mesh.params().x_step;
        let stroke_end = mesh.params().sample_x(sample_count - 1);
        let right = view.left + view.width;

        if !(view.width > 0.0) || right <= 0.0 || view.left >= stroke_end {
            return Ok(None);
        }

        let last_segment = sample_count - 2;
        let first_segment = ((view.left / x_step).floor().max(0.0) as usize).min(last_segment);
        let end_segment = ((right / x_step).ceil().max(1.0) as usize - 1).min(last_segment);

        let last_triangle = mesh.triangle_count() - 1;
        let first_triangle = (2 * first_segment).saturating_sub(1);
        let end_triangle = (2 * end_segment).min(last_triangle);

        Ok(Some(DrawRange {
            first_index: 3 * first_triangle,
            index_count: 3 * (end_triangle - first_triangle + 1),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bake::bake;
    use crate::stroke::StrokeParams;

    #[test]
    fn test_index_buffer_length() {
        for capacity in [3, 4, 10, 1000] {
            let buffer = generate_shared_vertex_indices(capacity).unwrap();
            assert_eq!(buffer.len(), 6 * (capacity - 1));
            assert_eq!(buffer.capacity(), capacity);
        }
    }

    #[test]
    fn test_index_pattern() {
        let buffer = generate_shared_vertex_indices(64).unwrap();

        for (quad, block) in buffer.as_slice().chunks(6).enumerate() {
            let j = 2 * quad as u32;
            assert_eq!(block, &[j, j + 1, j + 2, j + 3, j + 2, j + 1]);
        }
    }

    #[test]
    fn test_indices_reproduce_triangle_array() {
        let samples: Vec<f32> = (0..12).map(|i| (i as f32 * 0.9).sin() * 0.3).collect();
        let mesh = bake(&samples, &StrokeParams::new(1.0, 1.0, 50.0, 50.0)).unwrap();
        let buffer = generate_shared_vertex_indices(samples.len()).unwrap();

        let count = buffer.index_count_for(mesh.sample_count()).unwrap();
        assert_eq!(count, mesh.index_count());

        let vertices = mesh.vertices();
        let triangles = mesh.triangles();
        for (t, tri) in buffer.as_slice()[..count].chunks(3).enumerate() {
            let indexed = [
                vertices[tri[0] as usize],
                vertices[tri[1] as usize],
                vertices[tri[2] as usize],
            ];
            assert_eq!(indexed, triangles[t].vertices);
        }
    }

    #[test]
    fn test_rejects_small_capacity() {
        assert_eq!(
            generate_shared_vertex_indices(2),
            Err(TessellationError::InvalidCapacity(2))
        );
        assert_eq!(
            generate_shared_vertex_indices(0),
            Err(TessellationError::InvalidCapacity(0))
        );
    }

    #[test]
    fn test_rejects_oversized_capacity() {
        assert_eq!(
            generate_shared_vertex_indices(MAX_CAPACITY + 1),
            Err(TessellationError::InvalidCapacity(MAX_CAPACITY + 1))
        );
        assert_eq!(
            generate_shared_vertex_indices(2_000_000_000),
            Err(TessellationError::InvalidCapacity(2_000_000_000))
        );
    }

    #[test]
    fn test_capacity_exceeded_is_reported() {
        let buffer = generate_shared_vertex_indices(16).unwrap();

        assert_eq!(buffer.index_count_for(16), Ok(84));
        assert_eq!(
            buffer.index_count_for(17),
            Err(TessellationError::CapacityExceeded {
                requested: 17,
                capacity: 16
            })
        );
    }

    #[test]
    fn test_as_bytes_length() {
        let buffer = generate_shared_vertex_indices(5).unwrap();
        assert_eq!(buffer.as_bytes().len(), 4 * buffer.len());
    }

    #[test]
    fn test_draw_range_full_view() {
        let mesh = bake(&[0.0; 10], &StrokeParams::new(1.0, 1.0, 1.0, 0.0)).unwrap();
        let buffer = generate_shared_vertex_indices(10).unwrap();

        let range = buffer
            .draw_range(&mesh, ViewWindow::new(-5.0, 100.0))
            .unwrap()
            .unwrap();
        assert_eq!(range.first_index, 0);
        assert_eq!(range.index_count, mesh.index_count());
    }

    #[test]
    fn test_draw_range_middle_window() {
        // 10 samples, x_step 1: segments 0..=8, triangles 0..=15
        let mesh = bake(&[0.0; 10], &StrokeParams::new(1.0, 1.0, 1.0, 0.0)).unwrap();
        let buffer = generate_shared_vertex_indices(10).unwrap();

        // Covers segments 3 and 4
        let range = buffer
            .draw_range(&mesh, ViewWindow::new(3.5, 1.0))
            .unwrap()
            .unwrap();
        assert_eq!(range.first_index, 3 * 5);
        assert_eq!(range.index_count, 3 * 4);
    }

    #[test]
    fn test_draw_range_last_segment() {
        let mesh = bake(&[0.0; 10], &StrokeParams::new(1.0, 1.0, 1.0, 0.0)).unwrap();
        let buffer = generate_shared_vertex_indices(10).unwrap();

        let range = buffer
            .draw_range(&mesh, ViewWindow::new(8.2, 50.0))
            .unwrap()
            .unwrap();
        // Segment 8 is the end cap, triangle 15
        assert_eq!(range.first_index, 3 * 15);
        assert_eq!(range.index_count, 3);
    }

    #[test]
    fn test_draw_range_outside_stroke() {
        let mesh = bake(&[0.0; 10], &StrokeParams::new(1.0, 1.0, 1.0, 0.0)).unwrap();
        let buffer = generate_shared_vertex_indices(10).unwrap();

        assert_eq!(buffer.draw_range(&mesh, ViewWindow::new(-20.0, 5.0)), Ok(None));
        assert_eq!(buffer.draw_range(&mesh, ViewWindow::new(9.0, 5.0)), Ok(None));
        assert_eq!(buffer.draw_range(&mesh, ViewWindow::new(2.0, 0.0)), Ok(None));
    }

    #[test]
    fn test_draw_range_needs_capacity() {
        let mesh = bake(&[0.0; 10], &StrokeParams::new(1.0, 1.0, 1.0, 0.0)).unwrap();
        let buffer = generate_shared_vertex_indices(5).unwrap();

        assert!(matches!(
            buffer.draw_range(&mesh, ViewWindow::new(0.0, 1.0)),
            Err(TessellationError::CapacityExceeded { .. })
        ));
    }
}
