//! Golden-spiral layout and voxel grid parameters.

/// Golden ratio φ = (1 + √5) / 2
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Golden angle 2π / φ² in radians (≈137.508°)
pub const GOLDEN_ANGLE: f64 = 2.0 * std::f64::consts::PI / (GOLDEN_RATIO * GOLDEN_RATIO);

/// Divisor applied to √position to get the spiral radius
pub const RADIUS_SCALE: f64 = 10_000.0;

/// Spiral offset per alphabet class
pub const BASE_OFFSET_STEP: f64 = 0.02;

/// Divisor for the slow z drift along absolute sequence position
pub const Z_DRIFT_SCALE: f64 = 100_000_000.0;

/// Voxel edge length in unit-cube space
pub const VOXEL_SIZE: f64 = 0.01;

/// Voxels per axis
pub const GRID_RESOLUTION: u32 = 100;

/// Number of addressable voxel ids
pub const VOXEL_COUNT: u32 = GRID_RESOLUTION * GRID_RESOLUTION * GRID_RESOLUTION;

/// Decimal digits kept for serialized coordinates
pub const COORDINATE_DECIMALS: i32 = 6;
