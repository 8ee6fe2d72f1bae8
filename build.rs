//! Build script to generate the character script manifest
//!
//! Scans characters/installed/ and characters/available/ and embeds every
//! `.ron` script, since WASM can't enumerate directories at runtime.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const SCRIPT_DIRS: [&str; 2] = ["installed", "available"];

/// Sorted `.ron` files of one directory; empty when it doesn't exist
fn scripts_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut scripts: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.to_ascii_lowercase() == "ron")
                .unwrap_or(false)
        })
        .collect();
    scripts.sort();
    scripts
}

fn main() {
    println!("cargo:rerun-if-changed=characters");

    let root = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let characters = root.join("characters");

    let mut manifest = String::from("pub static BUNDLED_SCRIPTS: &[(&str, &str)] = &[\n");
    for dir in SCRIPT_DIRS {
        for script in scripts_in(&characters.join(dir)) {
            let Some(name) = script.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            // ("installed/ghost.ron", include_str!("/abs/path/characters/installed/ghost.ron"))
            manifest.push_str(&format!(
                "    ({:?}, include_str!({:?})),\n",
                format!("{}/{}", dir, name),
                script.display().to_string()
            ));
        }
    }
    manifest.push_str("];\n");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts"));
    fs::write(out_dir.join("character_manifest.rs"), manifest).expect("failed to write character manifest");
}
