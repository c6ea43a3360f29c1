//! Error types for particle generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for particle generation
pub type Result<T> = std::result::Result<T, ParticleError>;

/// Failures raised at the pipeline boundary and by its collaborators
#[derive(Debug, Error)]
pub enum ParticleError {
    /// No usable input elements after truncation
    #[error("sequence is empty: no particles to generate")]
    EmptySequence,

    /// A supplied LOD target list was empty
    #[error("LOD target list is empty")]
    EmptyTargets,

    /// A LOD tier asked for zero particles
    #[error("invalid LOD target {target} at tier {index}: targets must be positive")]
    InvalidTarget {
        /// Tier ordinal in the supplied list
        index: usize,
        /// Offending target count
        target: usize,
    },

    /// The progress observer stopped the run
    #[error("generation cancelled after {processed} positions")]
    Cancelled {
        /// Positions processed before the observer broke out
        processed: usize,
    },

    /// FASTA input had no records
    #[error("no sequences found in {}", .path.display())]
    NoSequences {
        /// Input file
        path: PathBuf,
    },

    /// The requested FASTA record does not exist
    #[error("sequence '{name}' not found in {}", .path.display())]
    SequenceNotFound {
        /// Requested record name
        name: String,
        /// Input file
        path: PathBuf,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
