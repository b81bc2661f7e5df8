//! Stroke parameters: how samples map to screen space and how thick the line is.

use serde::{Deserialize, Serialize};
use waveplot_core::defaults;

use crate::TessellationError;

/// Geometry parameters for one bake
///
/// A sample `s` at index `i` lands at `(i * x_step, y_scale * s + y_offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeParams {
    /// Half the visual line thickness, in output units (must be > 0)
    pub half_stroke_width: f32,
    /// Horizontal advance per sample (must be > 0)
    pub x_step: f32,
    /// Vertical scale applied to each normalized sample
    pub y_scale: f32,
    /// Vertical offset added after scaling
    pub y_offset: f32,
    /// Optional maximum miter length, in multiples of `half_stroke_width`.
    ///
    /// `None` (the default) keeps raw intersections, overshoot included.
    #[serde(default)]
    pub miter_limit: Option<f32>,
}

impl Default for StrokeParams {
    fn default() -> Self {
        Self::for_viewport(defaults::LINE_WIDTH, defaults::X_STEP, defaults::VIEWPORT_HEIGHT)
    }
}

impl StrokeParams {
    pub const fn new(half_stroke_width: f32, x_step: f32, y_scale: f32, y_offset: f32) -> Self {
        Self {
            half_stroke_width,
            x_step,
            y_scale,
            y_offset,
            miter_limit: None,
        }
    }

    /// Center the waveform vertically in a viewport of the given height,
    /// with full-scale samples reaching its edges.
    pub fn for_viewport(line_width: f32, x_step: f32, viewport_height: f32) -> Self {
        let half_height = viewport_height / 2.0;
        Self::new(line_width / 2.0, x_step, half_height, half_height)
    }

    /// Enable the miter-length clamp
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = Some(limit);
        self
    }

    /// Map a normalized sample to its vertical output coordinate
    #[inline]
    pub fn sample_y(&self, sample: f32) -> f32 {
        self.y_scale.mul_add(sample, self.y_offset)
    }

    /// Horizontal output coordinate of sample `index`
    #[inline]
    pub fn sample_x(&self, index: usize) -> f32 {
        index as f32 * self.x_step
    }

    /// Reject parameters that would produce degenerate geometry
    pub fn validate(&self) -> Result<(), TessellationError> {
        if !(self.half_stroke_width.is_finite() && self.half_stroke_width > 0.0) {
            return Err(TessellationError::InvalidParameter {
                name: "half_stroke_width",
                value: self.half_stroke_width,
            });
        }

        if !(self.x_step.is_finite() && self.x_step > 0.0) {
            return Err(TessellationError::InvalidParameter {
                name: "x_step",
                value: self.x_step,
            });
        }

        if !self.y_scale.is_finite() {
            return Err(TessellationError::InvalidParameter {
                name: "y_scale",
                value: self.y_scale,
            });
        }

        if !self.y_offset.is_finite() {
            return Err(TessellationError::InvalidParameter {
                name: "y_offset",
                value: self.y_offset,
            });
        }

        if let Some(limit) = self.miter_limit {
            // A limit below 1 would pull joins inside the stroke
            if !(limit.is_finite() && limit >= 1.0) {
                return Err(TessellationError::InvalidParameter {
                    name: "miter_limit",
                    value: limit,
                });
            }
        }

        Ok(())
    }
}
