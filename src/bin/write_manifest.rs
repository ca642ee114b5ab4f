//! Artifact manifest utility.
//!
//! Hashes `scaler.json` and `knn_model.json` in a model directory and writes
//! `manifest.json` beside them, binding the pair together.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin write_manifest -- <model_dir> [--force]
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use cardiorisk::adapters::artifact::{ArtifactManifest, CLASSIFIER_FILE, MANIFEST_FILE, SCALER_FILE};

const USAGE: &str = "Usage: write_manifest <model_dir> [--force]";

fn main() -> Result<()> {
    let mut model_dir: Option<PathBuf> = None;
    let mut force = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--force" => force = true,
            "-h" | "--help" => {
                println!("{USAGE}\n\nWrites {MANIFEST_FILE} with the SHA-256 of {SCALER_FILE} and {CLASSIFIER_FILE}.");
                return Ok(());
            }
            _ if model_dir.is_none() && !arg.starts_with('-') => {
                model_dir = Some(PathBuf::from(arg));
            }
            _ => {
                eprintln!("Unknown arg: {arg}\n{USAGE}");
                std::process::exit(2);
            }
        }
    }

    let Some(model_dir) = model_dir else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let out = model_dir.join(MANIFEST_FILE);
    if out.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", out.display());
    }

    let manifest = ArtifactManifest::from_files(&model_dir, &[SCALER_FILE, CLASSIFIER_FILE])
        .with_context(|| format!("Failed to hash artifacts in {}", model_dir.display()))?;
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(&out, json + "\n")
        .with_context(|| format!("Failed to write {}", out.display()))?;

    for (name, hash) in &manifest.files {
        println!("{name}: {hash}");
    }
    println!("Wrote {}", out.display());
    Ok(())
}
