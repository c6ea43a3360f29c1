//! Uniform-stride level-of-detail tiers over the position axis.
use crate::error::{ParticleError, Result};

/// One LOD tier: the requested target and the sampled positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LodTier {
    pub target: usize,
    pub indices: Vec<u64>,
}

/// Tier ordinal -> strictly ascending particle positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LodTable {
    tiers: Vec<LodTier>,
}

impl LodTable {
    pub fn tiers(&self) -> &[LodTier] {
        &self.tiers
    }

    pub fn tier(&self, index: usize) -> Option<&LodTier> {
        self.tiers.get(index)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Particle count per tier, tier order preserved
    pub fn counts(&self) -> Vec<usize> {
        self.tiers.iter().map(|t| t.indices.len()).collect()
    }
}

/// Reject empty target lists and zero targets.
pub fn validate_targets(targets: &[usize]) -> Result<()> {
    if targets.is_empty() {
        return Err(ParticleError::EmptyTargets);
    }

    match targets.iter().position(|&t| t == 0) {
        Some(index) => Err(ParticleError::InvalidTarget { index, target: 0 }),
        None => Ok(()),
    }
}

/// Sample each target independently over `[0, total)`.
///
/// A target at or above `total` keeps every position; otherwise the tier
/// holds `target` positions at stride `total / target`.
pub fn generate_lod_levels(total: usize, targets: &[usize]) -> Result<LodTable> {
    validate_targets(targets)?;

    let tiers = targets
        .iter()
        .map(|&target| LodTier {
            target,
            indices: sample_tier(total, target),
        })
        .collect();

    Ok(LodTable { tiers })
}

fn sample_tier(total: usize, target: usize) -> Vec<u64> {
    if target >= total {
        return (0..total as u64).collect();
    }

    // ⌊k · total / target⌋ in exact integer arithmetic; stride > 1 keeps it strictly ascending
    let (total, target) = (total as u128, target as u128);
    (0..target).map(|k| (k * total / target) as u64).collect()
}
