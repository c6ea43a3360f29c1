//! Level-of-detail and streaming defaults.

/// Default LOD tier targets, coarsest first: 5K → 50K → 500K → 5M
pub const DEFAULT_LOD_TIERS: &[usize] = &[5_000, 50_000, 500_000, 5_000_000];

/// Positions processed between progress callbacks
pub const PROGRESS_INTERVAL: usize = 100_000;
