//! WAV decoding through `hound`.
//!
//! Produces interleaved `f32` samples normalized to [-1.0, 1.0] regardless
//! of the file's sample format.

use dasp::Sample as _;
use dasp::sample::I24;
use hound::{SampleFormat, WavReader};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};
use waveplot_core::{ChannelCount, Frames, Sample, SampleRate};

/// Files above this size are refused (500MB)
pub const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Errors that can occur while decoding audio
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("File too large: {0:.1}MB (max 500MB)")]
    TooLarge(f64),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoded audio, still interleaved
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved samples [c0, c1, ..., c0, c1, ...]
    pub samples: Vec<Sample>,
    pub channels: ChannelCount,
    pub sample_rate: SampleRate,
}

impl DecodedAudio {
    /// Number of complete frames
    pub fn frame_count(&self) -> Frames {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }

    /// Average all channels into one sample per frame
    pub fn to_mono(&self) -> Vec<Sample> {
        down_mix_to_mono(&self.samples, self.channels)
    }
}

/// Average each frame's channels into a single sample.
///
/// Stereo becomes `0.5 * (L + R)`. A trailing partial frame is dropped.
pub fn down_mix_to_mono(interleaved: &[Sample], channels: ChannelCount) -> Vec<Sample> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        _ => {
            let remainder = interleaved.len() % channels;
            if remainder != 0 {
                warn!(
                    "Dropping {} samples of a partial trailing frame ({} channels)",
                    remainder, channels
                );
            }

            let scale = 1.0 / channels as f32;
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() * scale)
                .collect()
        }
    }
}

/// Load a WAV file from disk
pub fn load_wav(path: impl AsRef<Path>) -> Result<DecodedAudio, DecodeError> {
    let path = path.as_ref();

    // Check if file exists first (required for canonicalize)
    if !path.exists() {
        return Err(DecodeError::NotFound(path.display().to_string()));
    }

    let canonical_path = fs::canonicalize(path)?;

    if !canonical_path.is_file() {
        return Err(DecodeError::InvalidPath(format!(
            "not a file: {}",
            canonical_path.display()
        )));
    }

    let has_wav_extension = canonical_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if !has_wav_extension {
        return Err(DecodeError::InvalidPath(format!(
            "expected .wav extension: {}",
            canonical_path.display()
        )));
    }

    let metadata = fs::metadata(&canonical_path)?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(DecodeError::TooLarge(metadata.len() as f64 / (1024.0 * 1024.0)));
    }

    let reader = WavReader::open(&canonical_path)?;
    let audio = decode_reader(reader)?;

    info!(
        "Loaded {}: {} frames, {} channels at {}Hz ({:.2}s)",
        canonical_path.display(),
        audio.frame_count(),
        audio.channels,
        audio.sample_rate,
        audio.duration_secs()
    );

    Ok(audio)
}

/// Decode WAV data from any reader (file, in-memory buffer, ...)
pub fn decode_wav<R: Read>(source: R) -> Result<DecodedAudio, DecodeError> {
    decode_reader(WavReader::new(source)?)
}

fn decode_reader<R: Read>(mut reader: WavReader<R>) -> Result<DecodedAudio, DecodeError> {
    let spec = reader.spec();
    debug!(
        "WAV format: {} Hz, {} channels, {} bits, {:?}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
    );

    if spec.channels == 0 {
        return Err(DecodeError::UnsupportedFormat("zero channels".to_string()));
    }

    let samples: Vec<Sample> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v.to_sample::<f32>()))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v.to_sample::<f32>()))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| I24::new_unchecked(v).to_sample::<f32>()))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v.to_sample::<f32>()))
            .collect::<Result<_, _>>()?,
        (format, bits) => {
            return Err(DecodeError::UnsupportedFormat(format!("{bits}-bit {format:?}")));
        }
    };

    Ok(DecodedAudio {
        samples,
        channels: usize::from(spec.channels),
        sample_rate: spec.sample_rate,
    })
}
