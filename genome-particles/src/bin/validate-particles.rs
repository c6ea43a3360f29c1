//! Particle document validator.
//!
//! Re-reads a document written by `genome-particles` and checks the schema
//! and index invariants. Exits 1 when any check fails.

use anyhow::{Context, Result};
use clap::Parser;
use genome_particles::ParticleFile;
use genome_particles::validate::{ValidationReport, validate_document};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Validate a particle JSON document.
#[derive(Parser, Debug)]
#[command(name = "validate-particles", version)]
struct Args {
    /// Particle document to validate
    file: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(true) => {
            println!("✓ VALIDATION PASSED");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("✗ VALIDATION FAILED");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    println!("Validating: {}", args.file.display());
    println!("{}", "=".repeat(60));

    let start = Instant::now();
    let file = ParticleFile::load(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let load_time = start.elapsed();

    let metadata = &file.metadata;
    println!("✓ Metadata found");
    println!("  - Sequence: {}", metadata.sequence_name);
    println!("  - Length: {}", metadata.length);
    println!("  - Particles: {}", metadata.particles);
    println!("  - Voxels: {}", metadata.voxel_count);
    println!("  - Williams batch size: {}", metadata.williams_batch_size);
    println!("  - Generation time: {}s", metadata.generation_time);
    println!("  - Version: {}", metadata.version);
    println!("  - Load time: {:.2}s", load_time.as_secs_f64());
    println!();

    let report = validate_document(&file);
    print_report(&report);

    let file_size = fs::metadata(&args.file)?.len();
    println!("File size: {:.2} MB", file_size as f64 / 1024.0 / 1024.0);
    if report.particles > 0 {
        println!(
            "Bytes per particle: {:.2}",
            file_size as f64 / report.particles as f64
        );
    }
    println!();

    Ok(report.is_valid())
}

fn print_report(report: &ValidationReport) {
    println!("Particles: {}", report.particles);
    println!(
        "Spatial hash: {} voxels, {} positions",
        report.voxels, report.spatial_entries
    );
    println!("LOD levels: {}", report.lod_counts.len());
    for (tier, count) in report.lod_counts.iter().enumerate() {
        println!("  - LOD {}: {} particles", tier, count);
    }

    if !report.bounds.is_empty() {
        let b = &report.bounds;
        println!("Extent:");
        println!("  X: {:.6} to {:.6}", b.min_x, b.max_x);
        println!("  Y: {:.6} to {:.6}", b.min_y, b.max_y);
        println!("  Z: {:.6} to {:.6}", b.min_z, b.max_z);
    }
    println!();

    for issue in &report.issues {
        println!("✗ {}", issue);
    }
    if report.suppressed > 0 {
        println!("✗ ... and {} more issues", report.suppressed);
    }
}
