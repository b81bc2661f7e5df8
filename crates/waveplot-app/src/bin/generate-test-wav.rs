//! Synthesize WAV files for exercising waveplot-bake
//!
//! Sharp-cornered shapes (square, saw) produce the tight turns that take
//! the miter intersection path; a low-amplitude sine stays near-parallel.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::TAU;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shape {
    Sine,
    Square,
    Saw,
}

impl Shape {
    /// Value in [-1, 1] at `phase` cycles
    fn at(self, phase: f32) -> f32 {
        let phase = phase.fract();
        match self {
            Self::Sine => (TAU * phase).sin(),
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Saw => 2.0 * phase - 1.0,
        }
    }
}

/// Synthesize a test WAV file
#[derive(Parser, Debug)]
#[command(name = "generate-test-wav")]
#[command(about = "Synthesize WAV files for waveform baking", long_about = None)]
struct Args {
    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Waveform shape
    #[arg(short = 'w', long, value_enum, default_value_t = Shape::Sine)]
    shape: Shape,

    /// Sample rate (Hz)
    #[arg(short, long, default_value_t = 48000)]
    sample_rate: u32,

    /// Number of channels; every channel after the first is phase shifted
    #[arg(short, long, default_value_t = 2)]
    channels: u16,

    /// Duration (seconds)
    #[arg(short, long, default_value_t = 1.0)]
    duration: f32,

    /// Frequency (Hz)
    #[arg(short, long, default_value_t = 220.0)]
    frequency: f32,

    /// Peak amplitude (0.0-1.0)
    #[arg(short, long, default_value_t = 0.8)]
    amplitude: f32,

    /// Write 16-bit integer PCM instead of 32-bit float
    #[arg(long)]
    pcm16: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "generate_test_wav=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.channels > 0, "channel count must be at least 1");
    anyhow::ensure!(
        (0.0..=1.0).contains(&args.amplitude),
        "amplitude must be within 0.0-1.0, got {}",
        args.amplitude
    );

    let spec = if args.pcm16 {
        WavSpec {
            channels: args.channels,
            sample_rate: args.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    } else {
        WavSpec {
            channels: args.channels,
            sample_rate: args.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        }
    };

    let mut writer = WavWriter::create(&args.output, spec)
        .with_context(|| format!("Failed to create output file: {}", args.output.display()))?;

    let frames = (args.sample_rate as f32 * args.duration) as usize;
    let cycles_per_frame = args.frequency / args.sample_rate as f32;
    let channel_shift = 1.0 / f32::from(args.channels);

    for frame in 0..frames {
        let phase = frame as f32 * cycles_per_frame;
        for channel in 0..args.channels {
            let value = args.amplitude * args.shape.at(phase + f32::from(channel) * channel_shift);
            if args.pcm16 {
                writer
                    .write_sample((value * f32::from(i16::MAX)) as i16)
                    .context("Failed to write sample")?;
            } else {
                writer.write_sample(value).context("Failed to write sample")?;
            }
        }
    }

    writer.finalize().context("Failed to finalize WAV file")?;

    tracing::info!(
        "Wrote {} frames of {:?} at {} Hz ({} channels) to {}",
        frames,
        args.shape,
        args.sample_rate,
        args.channels,
        args.output.display()
    );
    Ok(())
}
