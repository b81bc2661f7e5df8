//! Sample decoding for waveplot.
//!
//! Reads WAV files through `hound` and hands the tessellator a flat,
//! normalized sample sequence, optionally averaged down to one channel.

pub mod decode;

pub use decode::{DecodeError, DecodedAudio, decode_wav, down_mix_to_mono, load_wav};
