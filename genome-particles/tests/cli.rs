use genome_particles::ParticleFile;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

fn fasta(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn genome_particles(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_genome-particles"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn validate_particles(path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_validate-particles"))
        .arg(path)
        .output()
        .unwrap()
}

#[test]
fn acgt_document_on_stdout() {
    let input = fasta(">tiny test\nACGT\n");
    let output = genome_particles(&[input.path().to_str().unwrap()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let document = ParticleFile::from_slice(&output.stdout).unwrap();

    assert_eq!(document.metadata.sequence_name, "tiny");
    assert_eq!(document.metadata.particles, 4);
    assert_eq!(document.metadata.lod_levels, vec![4, 4, 4, 4]);
    let bases: Vec<&str> = document.particles.iter().map(|p| p.base.as_str()).collect();
    assert_eq!(bases, vec!["A", "C", "G", "T"]);
    for (i, particle) in document.particles.iter().enumerate() {
        assert_eq!(particle.pos, i as u64);
    }
    for indices in document.lod_levels.values() {
        assert_eq!(indices, &vec![0, 1, 2, 3]);
    }
}

#[test]
fn truncation_tiers_and_output_file() {
    let sequence: String = "GATTACA".chars().cycle().take(1_000).collect();
    let input = fasta(&format!(">chrA\nACGT\n>chrB\n{}\n", sequence));
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("chrB.particles.json");

    let output = genome_particles(&[
        input.path().to_str().unwrap(),
        "--sequence",
        "chrB",
        "--max-particles",
        "100",
        "--pretty",
        "--output",
        out.to_str().unwrap(),
        "--lod",
        "10",
        "200",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let document = ParticleFile::load(&out).unwrap();
    assert_eq!(document.metadata.sequence_name, "chrB");
    assert_eq!(document.metadata.length, 100);
    assert_eq!(document.metadata.lod_levels, vec![10, 100]);
    let coarse = &document.lod_levels["0"];
    assert!(coarse.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(document.lod_levels["1"], (0..100).collect::<Vec<u64>>());

    let validation = validate_particles(&out);
    assert!(validation.status.success());
    assert!(String::from_utf8_lossy(&validation.stdout).contains("VALIDATION PASSED"));
}

#[test]
fn identical_runs_produce_identical_bytes() {
    let sequence: String = "ACGTN".chars().cycle().take(5_000).collect();
    let input = fasta(&format!(">chr\n{}\n", sequence));
    let path = input.path().to_str().unwrap();

    let first = genome_particles(&[path, "--lod", "50", "500"]);
    let second = genome_particles(&[path, "--lod", "50", "500", "--threads", "1"]);
    assert!(first.status.success() && second.status.success());

    let a = ParticleFile::from_slice(&first.stdout).unwrap();
    let b = ParticleFile::from_slice(&second.stdout).unwrap();
    assert_eq!(a.particles, b.particles);
    assert_eq!(a.spatial_hash, b.spatial_hash);
    assert_eq!(a.lod_levels, b.lod_levels);
}

#[test]
fn failures_exit_one_with_message_on_stderr() {
    let empty = fasta("");
    let output = genome_particles(&[empty.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no sequences found"));

    let input = fasta(">chr\nACGT\n");
    let output = genome_particles(&[input.path().to_str().unwrap(), "--lod", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid LOD target"));

    let output = genome_particles(&[input.path().to_str().unwrap(), "--max-particles", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("sequence is empty"));

    let output = genome_particles(&[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn validator_rejects_corrupt_document() {
    let input = fasta(">chr\nACGTACGTACGT\n");
    let output = genome_particles(&[input.path().to_str().unwrap()]);
    assert!(output.status.success());

    let mut value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["metadata"]["particles"] = serde_json::json!(99);
    let corrupt = fasta(&value.to_string());

    let validation = validate_particles(corrupt.path());
    assert_eq!(validation.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&validation.stdout).contains("VALIDATION FAILED"));
}
