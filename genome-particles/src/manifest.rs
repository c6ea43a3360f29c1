//! Particle document generation for renderer, compressor and validator integration.
use crate::converter::ParticleRun;
use crate::error::Result;
use crate::lod::LodTable;
use crate::spatial_layout::{Particle, SpatialHashIndex};
use constants::layout::{COORDINATE_DECIMALS, GOLDEN_ANGLE, VOXEL_SIZE};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Document format version written into every file.
pub const FORMAT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run summary heading every particle document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// FASTA record the particles were generated from.
    pub sequence_name: String,
    /// Effective sequence length after truncation.
    pub length: usize,
    pub particles: usize,
    /// Particle count per LOD tier, tier order preserved.
    pub lod_levels: Vec<usize>,
    /// Non-empty voxels in the spatial hash.
    pub voxel_count: usize,
    pub voxel_size: f64,
    pub williams_batch_size: usize,
    /// Wall time in seconds, two decimals.
    pub generation_time: f64,
    pub golden_angle_degrees: f64,
    pub version: String,
}

impl DocumentMetadata {
    pub fn from_run(sequence_name: &str, run: &ParticleRun) -> Self {
        let metadata = &run.metadata;

        Self {
            sequence_name: sequence_name.to_string(),
            length: metadata.total,
            particles: run.particles.len(),
            lod_levels: metadata.lod_counts.clone(),
            voxel_count: metadata.voxel_count,
            voxel_size: VOXEL_SIZE,
            williams_batch_size: metadata.batch_size,
            generation_time: round_to(metadata.elapsed.as_secs_f64(), 2),
            golden_angle_degrees: round_to(GOLDEN_ANGLE.to_degrees(), 3),
            version: FORMAT_VERSION.to_string(),
        }
    }
}

/// Borrowed view of a finished run, serialized without copying particles.
#[derive(Serialize)]
pub struct ParticleDocument<'a> {
    pub metadata: DocumentMetadata,
    pub particles: &'a [Particle],
    pub spatial_hash: &'a SpatialHashIndex,
    pub lod_levels: &'a LodTable,
}

impl<'a> ParticleDocument<'a> {
    pub fn new(sequence_name: &str, run: &'a ParticleRun) -> Self {
        Self {
            metadata: DocumentMetadata::from_run(sequence_name, run),
            particles: &run.particles,
            spatial_hash: &run.spatial_hash,
            lod_levels: &run.lod_table,
        }
    }

    /// Stream the document as JSON. `pretty` only changes formatting.
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        if pretty {
            serde_json::to_writer_pretty(&mut writer, self)?;
        } else {
            serde_json::to_writer(&mut writer, self)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl Serialize for Particle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Particle", 7)?;
        state.serialize_field("x", &round_to(self.x, COORDINATE_DECIMALS))?;
        state.serialize_field("y", &round_to(self.y, COORDINATE_DECIMALS))?;
        state.serialize_field("z", &round_to(self.z, COORDINATE_DECIMALS))?;
        state.serialize_field("base", &char::from(self.symbol))?;
        state.serialize_field("pos", &self.position)?;
        state.serialize_field("voxel", &self.voxel)?;
        state.serialize_field("color", &self.color)?;
        state.end()
    }
}

impl Serialize for SpatialHashIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let buckets = self.sorted_buckets();
        let mut map = serializer.serialize_map(Some(buckets.len()))?;
        for (voxel, positions) in buckets {
            map.serialize_entry(&voxel.to_string(), positions)?;
        }
        map.end()
    }
}

impl Serialize for LodTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (tier, level) in self.tiers().iter().enumerate() {
            map.serialize_entry(&tier.to_string(), &level.indices)?;
        }
        map.end()
    }
}

/// Particle as read back from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub base: String,
    pub pos: u64,
    pub voxel: u32,
    pub color: [f32; 3],
}

/// Owned form of a particle document, used for validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticleFile {
    pub metadata: DocumentMetadata,
    pub particles: Vec<ParticleRecord>,
    pub spatial_hash: BTreeMap<String, Vec<u64>>,
    pub lod_levels: BTreeMap<String, Vec<u64>>,
}

impl ParticleFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Round to a fixed number of decimal digits for serialized output.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
