//! Consistency checks for generated particle documents.
use crate::bounds::ParticleBounds;
use crate::manifest::ParticleFile;
use constants::layout::{VOXEL_COUNT, VOXEL_SIZE};
use rayon::prelude::*;

/// Issues kept verbatim; anything beyond is only counted
const MAX_REPORTED_ISSUES: usize = 50;

/// Outcome of validating one document.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub particles: usize,
    pub voxels: usize,
    /// Positions summed over all spatial hash buckets.
    pub spatial_entries: usize,
    pub lod_counts: Vec<usize>,
    pub bounds: ParticleBounds,
    pub issues: Vec<String>,
    /// Issues found after `issues` filled up.
    pub suppressed: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn report(&mut self, issue: String) {
        if self.issues.len() < MAX_REPORTED_ISSUES {
            self.issues.push(issue);
        } else {
            self.suppressed += 1;
        }
    }
}

/// Check structure and index invariants of a loaded document.
pub fn validate_document(file: &ParticleFile) -> ValidationReport {
    let mut report = ValidationReport {
        particles: file.particles.len(),
        voxels: file.spatial_hash.len(),
        spatial_entries: file.spatial_hash.values().map(Vec::len).sum(),
        lod_counts: Vec::new(),
        bounds: particle_bounds(file),
        issues: Vec::new(),
        suppressed: 0,
    };

    check_metadata(file, &mut report);
    check_particles(file, &mut report);
    check_spatial_hash(file, &mut report);
    check_lod_levels(file, &mut report);

    if !report.bounds.within_unit_cube() {
        report.report(format!("coordinates leave the unit cube: {:?}", report.bounds));
    }

    report
}

fn particle_bounds(file: &ParticleFile) -> ParticleBounds {
    file.particles
        .par_chunks(25_000)
        .map(|chunk| {
            let mut local = ParticleBounds::new();
            for p in chunk {
                local.update(p.x, p.y, p.z);
            }
            local
        })
        .reduce(ParticleBounds::new, |a, b| a.union(&b))
}

fn check_metadata(file: &ParticleFile, report: &mut ValidationReport) {
    let metadata = &file.metadata;
    let n = file.particles.len();

    if metadata.particles != n {
        report.report(format!(
            "metadata.particles is {} but document holds {} particles",
            metadata.particles, n
        ));
    }
    if metadata.length != n {
        report.report(format!("metadata.length is {} but expected {}", metadata.length, n));
    }
    if metadata.voxel_count != file.spatial_hash.len() {
        report.report(format!(
            "metadata.voxel_count is {} but spatial hash has {} voxels",
            metadata.voxel_count,
            file.spatial_hash.len()
        ));
    }
    if metadata.voxel_size != VOXEL_SIZE {
        report.report(format!("unexpected voxel_size {}", metadata.voxel_size));
    }
    if metadata.williams_batch_size == 0 {
        report.report("williams_batch_size must be at least 1".to_string());
    }
    if metadata.lod_levels.len() != file.lod_levels.len() {
        report.report(format!(
            "metadata lists {} LOD tiers but document holds {}",
            metadata.lod_levels.len(),
            file.lod_levels.len()
        ));
    }
}

fn check_particles(file: &ParticleFile, report: &mut ValidationReport) {
    for (i, particle) in file.particles.iter().enumerate() {
        if particle.pos != i as u64 {
            report.report(format!("particle {} has pos {}", i, particle.pos));
        }
        if particle.voxel >= VOXEL_COUNT {
            report.report(format!("particle {} has voxel {} out of range", i, particle.voxel));
        }
        if particle.base.chars().count() != 1 {
            report.report(format!("particle {} has base {:?}", i, particle.base));
        }
    }
}

fn check_spatial_hash(file: &ParticleFile, report: &mut ValidationReport) {
    let n = file.particles.len() as u64;

    for (key, positions) in &file.spatial_hash {
        let Ok(voxel) = key.parse::<u32>() else {
            report.report(format!("spatial hash key {:?} is not a voxel id", key));
            continue;
        };
        if voxel >= VOXEL_COUNT {
            report.report(format!("spatial hash voxel {} out of range", voxel));
        }
        if positions.is_empty() {
            report.report(format!("spatial hash voxel {} is empty", voxel));
        }
        if !positions.windows(2).all(|w| w[0] < w[1]) {
            report.report(format!("spatial hash voxel {} is not in ascending order", voxel));
        }

        for &pos in positions {
            match file.particles.get(pos as usize) {
                Some(particle) if pos < n && particle.voxel == voxel => {}
                Some(particle) => report.report(format!(
                    "position {} listed under voxel {} but particle has voxel {}",
                    pos, voxel, particle.voxel
                )),
                None => report.report(format!(
                    "spatial hash voxel {} references missing position {}",
                    voxel, pos
                )),
            }
        }
    }

    if report.spatial_entries as u64 != n {
        report.report(format!(
            "spatial hash holds {} positions for {} particles",
            report.spatial_entries, n
        ));
    }
}

fn check_lod_levels(file: &ParticleFile, report: &mut ValidationReport) {
    let n = file.particles.len() as u64;

    for tier in 0..file.lod_levels.len() {
        let Some(indices) = file.lod_levels.get(&tier.to_string()) else {
            report.report(format!("LOD tier {} is missing", tier));
            continue;
        };
        report.lod_counts.push(indices.len());

        if !indices.windows(2).all(|w| w[0] < w[1]) {
            report.report(format!("LOD tier {} is not strictly ascending", tier));
        }
        if indices.last().is_some_and(|&last| last >= n) {
            report.report(format!("LOD tier {} references positions beyond {}", tier, n));
        }
        if let Some(&expected) = file.metadata.lod_levels.get(tier) {
            if expected != indices.len() {
                report.report(format!(
                    "LOD tier {} holds {} positions, metadata says {}",
                    tier,
                    indices.len(),
                    expected
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ParticlePipeline, PipelineConfig};
    use crate::manifest::ParticleDocument;

    fn generated_file(len: usize, targets: Vec<usize>) -> ParticleFile {
        let sequence: Vec<u8> = b"GATTACA".iter().copied().cycle().take(len).collect();
        let run = ParticlePipeline::new(PipelineConfig {
            max_elements: None,
            lod_targets: Some(targets),
        })
        .run(&sequence)
        .unwrap();

        let mut bytes = Vec::new();
        ParticleDocument::new("chrTest", &run)
            .write_json(&mut bytes, false)
            .unwrap();
        ParticleFile::from_slice(&bytes).unwrap()
    }

    #[test]
    fn generated_document_is_valid() {
        let file = generated_file(5_000, vec![10, 100, 10_000]);
        let report = validate_document(&file);

        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(report.particles, 5_000);
        assert_eq!(report.spatial_entries, 5_000);
        assert_eq!(report.lod_counts, vec![10, 100, 5_000]);
        assert!(report.bounds.within_unit_cube());
    }

    #[test]
    fn detects_unordered_bucket() {
        let mut file = generated_file(500, vec![50]);
        let bucket = file
            .spatial_hash
            .values_mut()
            .find(|positions| positions.len() > 1)
            .unwrap();
        bucket.reverse();

        let report = validate_document(&file);
        assert!(!report.is_valid());
        assert!(report.issues.iter().any(|i| i.contains("ascending")));
    }

    #[test]
    fn detects_metadata_and_lod_mismatch() {
        let mut file = generated_file(500, vec![50]);
        file.metadata.particles = 499;
        file.lod_levels.insert("0".to_string(), vec![3, 2, 1]);

        let report = validate_document(&file);
        assert!(report.issues.iter().any(|i| i.contains("metadata.particles")));
        assert!(report.issues.iter().any(|i| i.contains("strictly ascending")));
        assert!(report.issues.iter().any(|i| i.contains("metadata says 50")));
    }

    #[test]
    fn detects_out_of_cube_coordinates() {
        let mut file = generated_file(100, vec![10]);
        file.particles[3].y = 1.5;

        let report = validate_document(&file);
        assert!(report.issues.iter().any(|i| i.contains("unit cube")));
    }

    #[test]
    fn issue_list_is_capped() {
        let mut file = generated_file(200, vec![10]);
        for particle in &mut file.particles {
            particle.pos += 1_000;
        }

        let report = validate_document(&file);
        assert_eq!(report.issues.len(), MAX_REPORTED_ISSUES);
        assert!(report.suppressed > 0);
    }
}
