//! Particle pipeline orchestrating mapping, voxel hashing and LOD sampling.
use crate::batch::williams_batch_size;
use crate::error::{ParticleError, Result};
use crate::lod::{LodTable, generate_lod_levels, validate_targets};
use crate::spatial_layout::{Particle, SpatialHashIndex};
use constants::streaming::{DEFAULT_LOD_TIERS, PROGRESS_INTERVAL};
use rayon::prelude::*;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Run configuration supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Truncate the sequence to at most this many positions.
    pub max_elements: Option<usize>,
    /// LOD tier targets, coarsest first. `None` selects the default tiers.
    pub lod_targets: Option<Vec<usize>>,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    /// Positions processed (the effective sequence length).
    pub total: usize,
    /// Non-empty voxel buckets.
    pub voxel_count: usize,
    pub batch_size: usize,
    /// Particle count per LOD tier, tier order preserved.
    pub lod_counts: Vec<usize>,
    pub elapsed: Duration,
}

/// Everything one run produces. Owned exclusively by the caller.
#[derive(Debug, Clone)]
pub struct ParticleRun {
    pub particles: Vec<Particle>,
    pub spatial_hash: SpatialHashIndex,
    pub lod_table: LodTable,
    pub metadata: RunMetadata,
}

/// Receives `(processed, total)` after every progress window.
/// Returning `ControlFlow::Break` cancels the run.
pub trait ProgressObserver {
    fn on_progress(&mut self, processed: usize, total: usize) -> ControlFlow<()>;
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    fn on_progress(&mut self, processed: usize, total: usize) -> ControlFlow<()> {
        self(processed, total)
    }
}

/// Observer that never reports and never cancels.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _processed: usize, _total: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Converts a sequence into particles, a voxel spatial hash and LOD tiers.
/// Deterministic: identical input and configuration give identical output.
pub struct ParticlePipeline {
    config: PipelineConfig,
}

impl ParticlePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Number of positions a sequence of `len` symbols yields under this configuration.
    pub fn effective_length(&self, len: usize) -> usize {
        self.config.max_elements.map_or(len, |max| len.min(max))
    }

    /// Execute the full pipeline without progress reporting.
    pub fn run(&self, sequence: &[u8]) -> Result<ParticleRun> {
        self.run_with_progress(sequence, &mut NoProgress)
    }

    /// Execute the full pipeline, reporting every `PROGRESS_INTERVAL` positions.
    /// Cancellation discards all partial state.
    pub fn run_with_progress<O>(&self, sequence: &[u8], observer: &mut O) -> Result<ParticleRun>
    where
        O: ProgressObserver + ?Sized,
    {
        let start = Instant::now();

        let total = self.effective_length(sequence.len());
        if total == 0 {
            return Err(ParticleError::EmptySequence);
        }

        let targets = self
            .config
            .lod_targets
            .as_deref()
            .unwrap_or(DEFAULT_LOD_TIERS);
        validate_targets(targets)?;

        if total < sequence.len() {
            info!("Limited to {} of {} positions", total, sequence.len());
        }

        let batch_size = williams_batch_size(i64::try_from(total).unwrap_or(i64::MAX));
        info!("Williams batch size: {}", batch_size);

        let (particles, spatial_hash) =
            generate_particles(&sequence[..total], batch_size, observer)?;
        info!(
            "Generated {} particles across {} voxels",
            particles.len(),
            spatial_hash.len()
        );

        let lod_table = generate_lod_levels(total, targets)?;
        for (tier, counts) in lod_table.counts().iter().enumerate() {
            debug!("LOD {}: {} particles", tier, counts);
        }

        let metadata = RunMetadata {
            total,
            voxel_count: spatial_hash.len(),
            batch_size,
            lod_counts: lod_table.counts(),
            elapsed: start.elapsed(),
        };

        Ok(ParticleRun {
            particles,
            spatial_hash,
            lod_table,
            metadata,
        })
    }
}

/// Map every position of `sequence` and hash it into its voxel.
///
/// Positions are processed in windows of `PROGRESS_INTERVAL`. Each window is
/// split into contiguous ranges of `batch_size` computed on the rayon pool;
/// ranges come back in order and are merged in order, so particles stay in
/// position order and every bucket stays ascending.
fn generate_particles<O>(
    sequence: &[u8],
    batch_size: usize,
    observer: &mut O,
) -> Result<(Vec<Particle>, SpatialHashIndex)>
where
    O: ProgressObserver + ?Sized,
{
    let total = sequence.len();
    let range_len = batch_size.clamp(1, PROGRESS_INTERVAL);

    let mut particles = Vec::with_capacity(total);
    let mut spatial_hash = SpatialHashIndex::new();

    for (window_idx, window) in sequence.chunks(PROGRESS_INTERVAL).enumerate() {
        let window_start = window_idx * PROGRESS_INTERVAL;

        let ranges: Vec<(Vec<Particle>, SpatialHashIndex)> = window
            .par_chunks(range_len)
            .enumerate()
            .map(|(range_idx, range)| {
                let range_start = window_start + range_idx * range_len;
                let local: Vec<Particle> = range
                    .iter()
                    .enumerate()
                    .map(|(offset, &symbol)| Particle::new(symbol, (range_start + offset) as u64))
                    .collect();
                let local_hash = SpatialHashIndex::build(&local);
                (local, local_hash)
            })
            .collect();

        for (local, local_hash) in ranges {
            particles.extend(local);
            spatial_hash.merge(local_hash);
        }

        let processed = window_start + window.len();
        if observer.on_progress(processed, total).is_break() {
            warn!("Generation cancelled at {} / {} positions", processed, total);
            return Err(ParticleError::Cancelled { processed });
        }
    }

    Ok((particles, spatial_hash))
}
