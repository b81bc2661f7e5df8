//! Waveform tessellation.
//!
//! This crate turns a normalized sample sequence into a constant-width,
//! mitered stroke: a shared-vertex triangle strip plus a static index
//! buffer that can draw any bake up to a fixed capacity.
//!
//! ```no_run
//! use waveplot_geometry::{StrokeParams, prepare};
//!
//! let samples: Vec<f32> = vec![0.0, 0.5, -0.5, 0.5, 0.0];
//! let prepared = prepare(&samples, &StrokeParams::default(), 65536)?;
//!
//! let vertex_bytes = prepared.outcome.mesh.vertex_bytes();
//! let index_bytes = prepared.indices.as_bytes();
//! let draw_count = prepared.draw_count()?;
//! # let _ = (vertex_bytes, index_bytes, draw_count);
//! # Ok::<(), waveplot_geometry::TessellationError>(())
//! ```

pub mod bake;
pub mod config;
pub mod indices;
pub mod miter;
pub mod prepare;
pub mod stroke;

pub use bake::{BakeOutcome, MIN_SAMPLES, WaveformMesh, bake, bake_within_capacity};
pub use config::{BakeConfig, ConfigError};
pub use indices::{
    DrawRange, IndexBuffer, MAX_CAPACITY, ViewWindow, generate_shared_vertex_indices,
};
pub use miter::NEAR_PARALLEL_THRESHOLD;
pub use prepare::{PreparedWaveform, prepare};
pub use stroke::StrokeParams;

use waveplot_core::Frames;

/// Contract violations reported by the tessellator.
///
/// Near-parallel segments are not errors; they take the perpendicular
/// offset branch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TessellationError {
    #[error("Too few samples: got {count}, need at least {minimum}")]
    TooFewSamples { count: Frames, minimum: Frames },

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("Join at sample {index} produced non-finite coordinates")]
    NonFiniteGeometry { index: usize },

    #[error("Invalid index buffer capacity: {0}")]
    InvalidCapacity(Frames),

    #[error("Bake of {requested} samples exceeds index buffer capacity {capacity}")]
    CapacityExceeded { requested: Frames, capacity: Frames },

    #[error("Index generation worker panicked")]
    WorkerPanicked,
}
