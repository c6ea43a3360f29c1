//! DNA sequence to particle cloud conversion.
//!
//! Each position of a sequence is placed on a golden-angle Fermat spiral in
//! the unit cube, hashed into a 100³ voxel grid and sampled into
//! level-of-detail tiers for progressive streaming.
//!
//! ```
//! use genome_particles::{ParticlePipeline, PipelineConfig};
//!
//! let run = ParticlePipeline::new(PipelineConfig::default()).run(b"ACGT")?;
//! assert_eq!(run.particles.len(), 4);
//! assert_eq!(run.lod_table.tier(0).unwrap().indices, vec![0, 1, 2, 3]);
//! # Ok::<(), genome_particles::ParticleError>(())
//! ```

pub mod batch;
pub mod bounds;
pub mod converter;
pub mod coordinates;
pub mod error;
pub mod fasta;
pub mod lod;
pub mod manifest;
pub mod spatial_layout;
pub mod validate;

pub use batch::williams_batch_size;
pub use converter::{NoProgress, ParticlePipeline, ParticleRun, PipelineConfig, ProgressObserver, RunMetadata};
pub use coordinates::{Coordinate, digital_root, map_position};
pub use error::{ParticleError, Result};
pub use lod::{LodTable, LodTier, generate_lod_levels};
pub use manifest::{DocumentMetadata, ParticleDocument, ParticleFile};
pub use spatial_layout::{Particle, SpatialHashIndex, voxel_id};
