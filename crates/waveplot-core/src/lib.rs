//! Core types, traits, and constants shared across the waveplot crates.
//!
//! This crate provides the sample aliases and the vertex layout handed to
//! renderers.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Sample rate in Hz
pub type SampleRate = u32;

/// Number of audio frames (samples per channel)
pub type Frames = usize;

/// Audio sample type, normalized to [-1.0, 1.0]
pub type Sample = f32;

/// Number of audio channels
pub type ChannelCount = usize;

/// Default stroke and buffer settings
pub mod defaults {
    use super::Frames;

    /// Visual thickness of the waveform stroke in pixels
    pub const LINE_WIDTH: f32 = 1.8;
    /// Horizontal pixel advance per sample (four samples per pixel)
    pub const X_STEP: f32 = 0.25;
    /// Viewport height the vertical mapping is derived from
    pub const VIEWPORT_HEIGHT: f32 = 960.0;
    /// Largest sample count the static index buffer is sized for
    pub const SAMPLE_CAPACITY: Frames = 65536;
}

/// One stroke vertex: screen position plus texture coordinate.
///
/// `#[repr(C)]` with a 16 byte stride: position at offset 0, texture
/// coordinate at offset 8. Renderers upload slices of this type as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    /// Screen-space position (x, y)
    pub position: [f32; 2],
    /// Texture coordinate (u across the stroke, v along it)
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a vertex from position and texture coordinate components
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            tex_coord: [u, v],
        }
    }

    pub const fn x(&self) -> f32 {
        self.position[0]
    }

    pub const fn y(&self) -> f32 {
        self.position[1]
    }

    /// Check that every component is finite
    pub fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.tex_coord.iter())
            .all(|c| c.is_finite())
    }
}

/// Three vertices forming one render primitive
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub const fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Signed area with the y axis pointing up.
    ///
    /// Positive for counter-clockwise vertex order.
    pub fn signed_area(&self) -> f32 {
        let [a, b, c] = self.vertices;
        let (abx, aby) = (b.x() - a.x(), b.y() - a.y());
        let (acx, acy) = (c.x() - a.x(), c.y() - a.y());
        0.5 * (abx * acy - aby * acx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        assert_eq!(std::mem::size_of::<Triangle>(), 48);

        let vertex = Vertex::new(1.0, 2.0, 0.0, 1.0);
        let raw: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&vertex));
        assert_eq!(raw, &[1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = Triangle::new(
            Vertex::new(0.0, 0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0, 0.0),
        );
        assert_eq!(ccw.signed_area(), 0.5);

        let [a, b, c] = ccw.vertices;
        let cw = Triangle::new(a, c, b);
        assert_eq!(cw.signed_area(), -0.5);
    }

    #[test]
    fn test_vertex_finite() {
        assert!(Vertex::new(0.0, 1.0, 0.5, 0.5).is_finite());
        assert!(!Vertex::new(f32::NAN, 1.0, 0.5, 0.5).is_finite());
    }
}
