//! Waveform baking: samples in, stroke geometry out.
//!
//! The output is a shared-vertex triangle strip:
//!
//! ```text
//!   upper:      2 ----- 4 ----- 6
//!             /  \    /  \    /  \
//!   apex:   0     \  /    \  /     7
//!             \    \/      \/    /
//!   lower:      1 ----- 3 ----- 5
//! ```
//!
//! `[P0, J1.lower, J1.upper, ..., J(n-2).lower, J(n-2).upper, P(n-1)]`,
//! i.e. `2n - 2` vertices and `2n - 4` triangles for `n` samples. The end
//! caps are single triangles whose apex is the raw sample point.

use tracing::{debug, warn};
use waveplot_core::{Frames, Triangle, Vertex};

use crate::TessellationError;
use crate::miter::{JoinKind, Point2, compute_join};
use crate::stroke::StrokeParams;

/// Fewest samples that form a stroke: two end points and one join
pub const MIN_SAMPLES: usize = 3;

/// Texture u on the left (upper) boundary
const U_LEFT: f32 = 0.0;
/// Texture u on the right (lower) boundary
const U_RIGHT: f32 = 1.0;
/// Texture u at the end-cap apexes
const U_APEX: f32 = 0.5;

/// Vertices produced for `sample_count` samples
pub const fn vertex_count_for(sample_count: Frames) -> usize {
    2 * sample_count - 2
}

/// Triangles produced for `sample_count` samples
pub const fn triangle_count_for(sample_count: Frames) -> usize {
    2 * sample_count - 4
}

/// Baked stroke geometry for one sample sequence
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformMesh {
    vertices: Vec<Vertex>,
    sample_count: Frames,
    params: StrokeParams,
    tight_turns: usize,
}

impl WaveformMesh {
    /// Vertices in strip order, ready for upload
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    /// Raw bytes of the vertex buffer (16 bytes per vertex)
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn sample_count(&self) -> Frames {
        self.sample_count
    }

    pub fn params(&self) -> &StrokeParams {
        &self.params
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        triangle_count_for(self.sample_count)
    }

    /// Indices to submit when drawing the whole stroke
    pub fn index_count(&self) -> usize {
        3 * self.triangle_count()
    }

    /// Joins that went through the line-intersection branch
    pub fn tight_turn_count(&self) -> usize {
        self.tight_turns
    }

    /// Expand the strip into independent triangles (triangle-array mode).
    ///
    /// Triangle `t` is `(t, t+1, t+2)` for even `t` and `(t+2, t+1, t)` for
    /// odd `t`, which keeps every triangle counter-clockwise and matches the
    /// shared-vertex index pattern one-for-one.
    pub fn triangles(&self) -> Vec<Triangle> {
        self.vertices
            .windows(3)
            .enumerate()
            .map(|(t, w)| {
                if t % 2 == 0 {
                    Triangle::new(w[0], w[1], w[2])
                } else {
                    Triangle::new(w[2], w[1], w[0])
                }
            })
            .collect()
    }
}

/// Bake a sample sequence into stroke geometry.
///
/// Every interior sample gets a miter join: a perpendicular offset when the
/// adjacent slopes differ by less than
/// [`NEAR_PARALLEL_THRESHOLD`](crate::miter::NEAR_PARALLEL_THRESHOLD),
/// otherwise the intersection of both segments' offset boundaries.
///
/// # Errors
///
/// Fails on fewer than [`MIN_SAMPLES`] samples, invalid parameters, a
/// non-finite sample, or a join that overflows to non-finite coordinates.
pub fn bake(samples: &[f32], params: &StrokeParams) -> Result<WaveformMesh, TessellationError> {
    params.validate()?;

    if samples.len() < MIN_SAMPLES {
        return Err(TessellationError::TooFewSamples {
            count: samples.len(),
            minimum: MIN_SAMPLES,
        });
    }

    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(TessellationError::NonFiniteSample { index });
    }

    let sample_count = samples.len();
    let last = sample_count - 1;
    let point = |i: usize| Point2::new(params.sample_x(i), params.sample_y(samples[i]));
    let along = |i: usize| i as f32 / last as f32;

    let mut vertices = Vec::with_capacity(vertex_count_for(sample_count));
    let mut tight_turns = 0;

    let start = point(0);
    vertices.push(Vertex::new(start.x, start.y, U_APEX, 0.0));

    for i in 1..last {
        let join = compute_join(
            point(i - 1),
            point(i),
            point(i + 1),
            params.x_step,
            params.half_stroke_width,
            params.miter_limit,
        );

        if !join.is_finite() {
            return Err(TessellationError::NonFiniteGeometry { index: i });
        }

        if join.kind == JoinKind::Intersection {
            tight_turns += 1;
        }

        let v = along(i);
        vertices.push(Vertex::new(join.lower.x, join.lower.y, U_RIGHT, v));
        vertices.push(Vertex::new(join.upper.x, join.upper.y, U_LEFT, v));
    }

    let end = point(last);
    vertices.push(Vertex::new(end.x, end.y, U_APEX, 1.0));

    debug!(
        "Baked {} samples: {} vertices, {} tight turns",
        sample_count,
        vertices.len(),
        tight_turns
    );

    Ok(WaveformMesh {
        vertices,
        sample_count,
        params: *params,
        tight_turns,
    })
}

/// Result of baking against a fixed sample capacity
#[derive(Debug, Clone, PartialEq)]
pub struct BakeOutcome {
    pub mesh: WaveformMesh,
    /// Samples actually baked
    pub processed: Frames,
    /// True when the input was longer than the capacity and got cut
    pub truncated: bool,
}

/// Bake at most `capacity` samples, reporting any truncation.
pub fn bake_within_capacity(
    samples: &[f32],
    params: &StrokeParams,
    capacity: Frames,
) -> Result<BakeOutcome, TessellationError> {
    if capacity < MIN_SAMPLES {
        return Err(TessellationError::InvalidCapacity(capacity));
    }

    let processed = samples.len().min(capacity);
    let truncated = processed < samples.len();

    if truncated {
        warn!(
            "Input has {} samples, baking only the first {} (capacity)",
            samples.len(),
            processed
        );
    }

    let mesh = bake(&samples[..processed], params)?;

    Ok(BakeOutcome {
        mesh,
        processed,
        truncated,
    })
}
