//! waveplot-bake - offline waveform baker
//!
//! Decodes a WAV file, bakes its waveform into stroke geometry and writes
//! the vertex and index buffers a renderer would upload.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waveplot_audio::load_wav;
use waveplot_core::Vertex;
use waveplot_geometry::{BakeConfig, PreparedWaveform, prepare};

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Vertices and draw count as JSON
    Json,
    /// Vertex buffer bytes followed by the index bytes actually drawn
    Raw,
}

/// Offline waveform baker
#[derive(Parser, Debug)]
#[command(name = "waveplot-bake")]
#[command(about = "Bake a WAV file's waveform into stroke geometry", long_about = None)]
struct Args {
    /// Input WAV file
    #[arg(short, long)]
    input: PathBuf,

    /// Bake configuration (RON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file; only a summary is logged when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Override the configured sample capacity
    #[arg(long)]
    capacity: Option<usize>,
}

/// JSON document written by `--format json`
#[derive(Serialize)]
struct BakeReport<'a> {
    source: &'a Path,
    sample_rate: u32,
    processed_samples: usize,
    truncated: bool,
    tight_turns: usize,
    triangle_count: usize,
    index_count: usize,
    vertices: &'a [Vertex],
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waveplot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BakeConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => BakeConfig::default(),
    };
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    tracing::info!("Bake config: {:?}", config);

    let audio = load_wav(&args.input)
        .with_context(|| format!("Failed to load WAV file: {}", args.input.display()))?;

    let samples = if config.down_mix {
        audio.to_mono()
    } else {
        if audio.channels > 1 {
            tracing::warn!(
                "Down-mix disabled: baking {} interleaved channels as one sequence",
                audio.channels
            );
        }
        audio.samples.clone()
    };

    let prepared = prepare(&samples, &config.stroke_params(), config.capacity)
        .context("Failed to bake waveform")?;

    let mesh = &prepared.outcome.mesh;
    if prepared.outcome.truncated {
        tracing::warn!(
            "Input truncated: baked {} of {} samples",
            prepared.outcome.processed,
            samples.len()
        );
    }
    tracing::info!(
        "{} triangles, {} tight turns, {} indices per full draw",
        mesh.triangle_count(),
        mesh.tight_turn_count(),
        prepared.draw_count()?
    );

    if let Some(output) = &args.output {
        match args.format {
            OutputFormat::Json => write_json(output, &args.input, audio.sample_rate, &prepared)?,
            OutputFormat::Raw => write_raw(output, &prepared)?,
        }
        tracing::info!("Geometry written to {:?}", output);
    }

    Ok(())
}

/// Write the bake as a JSON report
fn write_json(
    path: &Path,
    source: &Path,
    sample_rate: u32,
    prepared: &PreparedWaveform,
) -> Result<()> {
    let mesh = &prepared.outcome.mesh;
    let report = BakeReport {
        source,
        sample_rate,
        processed_samples: prepared.outcome.processed,
        truncated: prepared.outcome.truncated,
        tight_turns: mesh.tight_turn_count(),
        triangle_count: mesh.triangle_count(),
        index_count: prepared.draw_count()?,
        vertices: mesh.vertices(),
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), &report).context("Failed to write JSON report")?;
    Ok(())
}

/// Write vertex bytes, then the drawn prefix of the index buffer
fn write_raw(path: &Path, prepared: &PreparedWaveform) -> Result<()> {
    let draw_count = prepared.draw_count()?;
    let indices = &prepared.indices.as_slice()[..draw_count];

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(prepared.outcome.mesh.vertex_bytes())
        .context("Failed to write vertex buffer")?;
    writer
        .write_all(bytemuck::cast_slice(indices))
        .context("Failed to write index buffer")?;
    writer.flush().context("Failed to flush output")?;

    tracing::debug!(
        "Raw output: {} vertex bytes, {} index bytes",
        prepared.outcome.mesh.vertex_bytes().len(),
        draw_count * std::mem::size_of::<u32>()
    );
    Ok(())
}
