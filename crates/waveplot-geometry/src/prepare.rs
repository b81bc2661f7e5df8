//! Bake and index generation as two independent tasks.
//!
//! Neither task reads the other's output, so the index buffer is built on a
//! scoped worker thread while the calling thread bakes. Both are joined
//! before anything is returned.

use std::thread::ScopedJoinHandle;
use std::time::Instant;

use tracing::info;
use waveplot_core::Frames;

use crate::TessellationError;
use crate::bake::{BakeOutcome, bake_within_capacity};
use crate::indices::{IndexBuffer, generate_shared_vertex_indices};
use crate::stroke::StrokeParams;

/// Everything a renderer needs after a file load
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedWaveform {
    pub outcome: BakeOutcome,
    pub indices: IndexBuffer,
}

impl PreparedWaveform {
    /// Indices to submit for the whole baked stroke
    pub fn draw_count(&self) -> Result<usize, TessellationError> {
        self.indices.index_count_for(self.outcome.mesh.sample_count())
    }
}

/// Bake `samples` (clamped to `capacity`) and generate the matching index buffer.
///
/// # Errors
///
/// Propagates bake and index generation errors; a panic on the worker
/// thread becomes [`TessellationError::WorkerPanicked`].
pub fn prepare(
    samples: &[f32],
    params: &StrokeParams,
    capacity: Frames,
) -> Result<PreparedWaveform, TessellationError> {
    let start_time = Instant::now();

    let (outcome, indices) = std::thread::scope(|scope| {
        let worker = scope.spawn(|| generate_shared_vertex_indices(capacity));
        let outcome = bake_within_capacity(samples, params, capacity);
        (outcome, join_worker(worker))
    });

    let outcome = outcome?;
    let indices = indices?;

    info!(
        "Prepared {} samples ({} vertices, {} indices) in {:.2} ms",
        outcome.processed,
        outcome.mesh.vertex_count(),
        indices.len(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    Ok(PreparedWaveform { outcome, indices })
}

/// Join a scoped worker, turning a panic into an error instead of resuming it
fn join_worker<T>(
    worker: ScopedJoinHandle<'_, Result<T, TessellationError>>,
) -> Result<T, TessellationError> {
    worker
        .join()
        .map_err(|_| TessellationError::WorkerPanicked)
        .and_then(|result| result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bake::bake;

    #[test]
    fn test_prepare_matches_sequential() {
        let samples: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin()).collect();
        let params = StrokeParams::default();

        let prepared = prepare(&samples, &params, 4096).unwrap();

        assert_eq!(prepared.outcome.mesh, bake(&samples, &params).unwrap());
        assert_eq!(
            prepared.indices,
            generate_shared_vertex_indices(4096).unwrap()
        );
        assert_eq!(prepared.draw_count().unwrap(), 6 * 998);
        assert!(!prepared.outcome.truncated);
    }

    #[test]
    fn test_prepare_truncates_to_capacity() {
        let samples = vec![0.1_f32; 500];
        let prepared = prepare(&samples, &StrokeParams::default(), 100).unwrap();

        assert!(prepared.outcome.truncated);
        assert_eq!(prepared.outcome.processed, 100);
        assert_eq!(prepared.draw_count().unwrap(), 6 * 98);
    }

    #[test]
    fn test_worker_panic_becomes_error() {
        let result: Result<IndexBuffer, _> = std::thread::scope(|scope| {
            join_worker(scope.spawn(|| -> Result<IndexBuffer, TessellationError> {
                panic!("index generation failed")
            }))
        });
        assert_eq!(result, Err(TessellationError::WorkerPanicked));
    }

    #[test]
    fn test_worker_error_passes_through() {
        let result = std::thread::scope(|scope| {
            join_worker(scope.spawn(|| generate_shared_vertex_indices(1)))
        });
        assert_eq!(result, Err(TessellationError::InvalidCapacity(1)));
    }

    #[test]
    fn test_prepare_propagates_errors() {
        let result = prepare(&[0.0, 0.0], &StrokeParams::default(), 100);
        assert!(matches!(
            result,
            Err(TessellationError::TooFewSamples { count: 2, .. })
        ));

        let result = prepare(&[0.0; 10], &StrokeParams::default(), 1);
        assert_eq!(result, Err(TessellationError::InvalidCapacity(1)));
    }
}
