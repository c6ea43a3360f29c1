//! Voxel grid spatial hash for particle lookup
use crate::coordinates::{Coordinate, map_position};
use constants::alphabet::base_color;
use constants::layout::{GRID_RESOLUTION, VOXEL_SIZE};
use std::collections::HashMap;

/// Sequence element placed in the unit cube
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub symbol: u8,
    pub position: u64,
    pub voxel: u32,
    pub color: [f32; 3],
}

impl Particle {
    /// Place a symbol found at `position`
    pub fn new(symbol: u8, position: u64) -> Self {
        let Coordinate { x, y, z } = map_position(symbol, position);

        Self {
            x,
            y,
            z,
            symbol,
            position,
            voxel: voxel_id(x, y, z),
            color: base_color(symbol),
        }
    }
}

/// Linearised voxel id for a unit-cube coordinate (base-100 over x, y, z)
pub fn voxel_id(x: f64, y: f64, z: f64) -> u32 {
    let grid_x = voxel_axis(x);
    let grid_y = voxel_axis(y);
    let grid_z = voxel_axis(z);

    grid_x + grid_y * GRID_RESOLUTION + grid_z * GRID_RESOLUTION * GRID_RESOLUTION
}

fn voxel_axis(v: f64) -> u32 {
    // Saturating cast; clamp keeps 1 - ε from rounding into bin 100
    ((v / VOXEL_SIZE).floor() as u32).min(GRID_RESOLUTION - 1)
}

/// Voxel id -> particle positions, each bucket in ascending position order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpatialHashIndex {
    buckets: HashMap<u32, Vec<u64>>,
}

impl SpatialHashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index particles in a single left-to-right pass
    pub fn build(particles: &[Particle]) -> Self {
        let mut index = Self::new();
        for particle in particles {
            index.insert(particle.voxel, particle.position);
        }
        index
    }

    /// Append a position to its voxel bucket.
    /// Positions must arrive in ascending order.
    pub fn insert(&mut self, voxel: u32, position: u64) {
        let bucket = self.buckets.entry(voxel).or_default();
        debug_assert!(bucket.last().is_none_or(|&last| last < position));
        bucket.push(position);
    }

    /// Fold in the index of another position range.
    ///
    /// Buckets stay ascending whatever order the ranges are merged in: a
    /// range that follows the existing contents is appended, anything else
    /// is merged by position.
    pub fn merge(&mut self, other: SpatialHashIndex) {
        for (voxel, positions) in other.buckets {
            let bucket = self.buckets.entry(voxel).or_default();
            let ordered = match (bucket.last(), positions.first()) {
                (Some(&last), Some(&first)) => last < first,
                _ => true,
            };

            bucket.extend(positions);
            if !ordered {
                bucket.sort_unstable();
            }
        }
    }

    /// Positions hashed to a voxel, ascending
    pub fn bucket(&self, voxel: u32) -> Option<&[u64]> {
        self.buckets.get(&voxel).map(Vec::as_slice)
    }

    /// Number of non-empty voxels
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total positions across all buckets
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Buckets in ascending voxel order
    pub fn sorted_buckets(&self) -> Vec<(u32, &[u64])> {
        let mut buckets: Vec<(u32, &[u64])> = self
            .buckets
            .iter()
            .map(|(&voxel, positions)| (voxel, positions.as_slice()))
            .collect();
        buckets.sort_unstable_by_key(|&(voxel, _)| voxel);
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::layout::VOXEL_COUNT;
    use proptest::prelude::*;

    #[test]
    fn voxel_id_linearisation() {
        assert_eq!(voxel_id(0.0, 0.0, 0.0), 0);
        assert_eq!(voxel_id(0.015, 0.0, 0.0), 1);
        assert_eq!(voxel_id(0.0, 0.015, 0.0), 100);
        assert_eq!(voxel_id(0.0, 0.0, 0.015), 10_000);
        assert_eq!(voxel_id(0.555, 0.123, 0.905), 55 + 12 * 100 + 90 * 10_000);
    }

    #[test]
    fn voxel_id_clamps_upper_edge() {
        let edge = 1.0 - f64::EPSILON;
        assert_eq!(voxel_id(edge, edge, edge), VOXEL_COUNT - 1);
    }

    #[test]
    fn particle_carries_colour_and_voxel() {
        let particle = Particle::new(b'T', 7);
        assert_eq!(particle.position, 7);
        assert_eq!(particle.color, [1.0, 1.0, 0.0]);
        assert_eq!(particle.voxel, voxel_id(particle.x, particle.y, particle.z));

        let unknown = Particle::new(b'N', 7);
        assert_eq!(unknown.color, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn build_keeps_buckets_ascending() {
        let particles: Vec<Particle> = (0..2_000).map(|p| Particle::new(b'A', p)).collect();
        let index = SpatialHashIndex::build(&particles);

        assert_eq!(index.entry_count(), particles.len());
        for (voxel, positions) in index.sorted_buckets() {
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            for &p in positions {
                assert_eq!(particles[p as usize].voxel, voxel);
            }
        }
    }

    #[test]
    fn merge_out_of_order_ranges() {
        let mut early = SpatialHashIndex::new();
        early.insert(5, 0);
        early.insert(5, 2);
        early.insert(9, 1);

        let mut late = SpatialHashIndex::new();
        late.insert(5, 3);
        late.insert(7, 4);

        let mut merged = late.clone();
        merged.merge(early.clone());
        assert_eq!(merged.bucket(5), Some(&[0, 2, 3][..]));

        let mut appended = early;
        appended.merge(late);
        assert_eq!(appended, merged);
        assert_eq!(appended.len(), 3);
        assert_eq!(appended.bucket(8), None);
    }

    #[test]
    fn sorted_buckets_are_ordered_by_voxel() {
        let mut index = SpatialHashIndex::new();
        for (voxel, position) in [(40, 0), (3, 1), (999_999, 2), (3, 3)] {
            index.insert(voxel, position);
        }
        let voxels: Vec<u32> = index.sorted_buckets().iter().map(|&(v, _)| v).collect();
        assert_eq!(voxels, vec![3, 40, 999_999]);
    }

    proptest! {
        #[test]
        fn voxel_id_in_range(x in 0.0f64..1.0, y in 0.0f64..1.0, z in 0.0f64..1.0) {
            let id = voxel_id(x, y, z);
            prop_assert!(id < VOXEL_COUNT);
            prop_assert_eq!(id, voxel_id(x, y, z));
        }
    }
}
