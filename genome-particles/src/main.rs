//! FASTA to particle cloud converter entry point.
//!
//! Writes the particle document to stdout (or `--output`); diagnostics and
//! progress go to stderr. Exits 1 on any error.

use anyhow::{Context, Result};
use clap::Parser;
use genome_particles::fasta::read_record;
use genome_particles::{ParticleDocument, ParticlePipeline, PipelineConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Convert a FASTA sequence to 3D particles with a voxel spatial hash and LOD tiers.
#[derive(Parser, Debug)]
#[command(name = "genome-particles", version)]
struct Args {
    /// Input FASTA file
    input: PathBuf,

    /// Maximum particles to generate
    #[arg(long, value_name = "N")]
    max_particles: Option<usize>,

    /// LOD tier targets, coarsest first (e.g. 5000 50000 500000)
    #[arg(long, value_name = "N", num_args = 1..)]
    lod: Option<Vec<usize>>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// FASTA record to convert (default: first record)
    #[arg(long, value_name = "NAME")]
    sequence: Option<String>,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Worker threads for particle generation (default: all cores)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,
}

fn main() -> ExitCode {
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version land here too
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    info!("Reading FASTA file: {}", args.input.display());
    let record = read_record(&args.input, args.sequence.as_deref())
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    info!("Sequence: {}", record.name);
    info!("Length: {} bases", record.sequence.len());

    let pipeline = ParticlePipeline::new(PipelineConfig {
        max_elements: args.max_particles,
        lod_targets: args.lod.clone(),
    });

    let total = pipeline.effective_length(record.sequence.len());
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} particles ({percent}%) {msg}")?
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message("Generating particles");

    let mut observer = |processed: usize, _total: usize| -> ControlFlow<()> {
        pb.set_position(processed as u64);
        ControlFlow::Continue(())
    };
    let result = pipeline.run_with_progress(&record.sequence, &mut observer);
    match &result {
        Ok(_) => pb.finish_with_message("Particles generated"),
        Err(_) => pb.abandon(),
    }
    let particle_run = result?;

    let document = ParticleDocument::new(&record.name, &particle_run);
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            document.write_json(file, args.pretty)?;
            info!("Saved {}", path.display());
        }
        None => document.write_json(io::stdout().lock(), args.pretty)?,
    }

    let elapsed = particle_run.metadata.elapsed.as_secs_f64();
    info!("Total generation time: {:.2}s", elapsed);
    if elapsed > 0.0 {
        info!(
            "Particles per second: {:.0}",
            particle_run.particles.len() as f64 / elapsed
        );
    }

    Ok(())
}
