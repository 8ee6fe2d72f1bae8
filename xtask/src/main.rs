//! Build automation tasks for Roster Forge
//!
//! Usage:
//!   cargo xtask build-web              # Build WASM + page into dist/web
//!   cargo xtask package-web            # Zip dist/web for upload
//!   cargo xtask package-native         # Release binary + characters/ into dist/native
//!   cargo xtask new-character <id>     # Scaffold characters/available/<id>.ron

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

const BIN_NAME: &str = "roster-forge";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for Roster Forge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build WASM and the host page for the browser
    BuildWeb {
        /// Mark as dev build (adds DEV to the page title)
        #[arg(long)]
        dev: bool,
    },
    /// Create a zip of the web build
    PackageWeb,
    /// Build a native release with the characters folder next to it
    PackageNative {
        /// Target platform: windows, macos, linux
        #[arg(long)]
        platform: Option<String>,
    },
    /// Write a starter script for a new character
    NewCharacter {
        /// Lowercase letters and digits
        id: String,
        /// Write to characters/installed instead of characters/available
        #[arg(long)]
        installed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildWeb { dev } => build_web(dev),
        Commands::PackageWeb => package_web(),
        Commands::PackageNative { platform } => package_native(platform),
        Commands::NewCharacter { id, installed } => new_character(&id, installed),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Download a file from URL to destination
fn download_file(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {}...", url);
    run_cmd(Command::new("curl").args(["-L", "-o"]).arg(dest).arg(url))
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src).with_context(|| format!("reading {}", src.display()))? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Remove and recreate an output folder
fn fresh_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Build WASM for web deployment
fn build_web(dev: bool) -> Result<()> {
    let root = project_root()?;
    let dist = root.join("dist/web");

    println!("Building WASM...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--target", "wasm32-unknown-unknown"]),
    )?;

    fresh_dir(&dist)?;

    println!("Copying files to dist/web...");
    let wasm = format!("{}.wasm", BIN_NAME);
    std::fs::copy(root.join("target/wasm32-unknown-unknown/release").join(&wasm), dist.join(&wasm))?;
    std::fs::copy(root.join("web/index.html"), dist.join("index.html"))?;

    // Download macroquad JS bundle
    let mq_js = dist.join("mq_js_bundle.js");
    if !mq_js.exists() {
        download_file(
            "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js",
            &mq_js,
        )?;
    }

    // Scripts are compiled into the binary by build.rs; nothing else to copy

    if dev {
        println!("Applying DEV build modifications...");
        let index_path = dist.join("index.html");
        let index = std::fs::read_to_string(&index_path)?;
        std::fs::write(&index_path, index.replace("<title>Roster Forge", "<title>[DEV] Roster Forge"))?;
    }

    println!("Web build complete: dist/web/");
    Ok(())
}

/// Zip the web build
fn package_web() -> Result<()> {
    build_web(false)?;

    let dist = project_root()?.join("dist");
    let zip_name = format!("{}-web.zip", BIN_NAME);
    let zip_path = dist.join(&zip_name);
    if zip_path.exists() {
        std::fs::remove_file(&zip_path)?;
    }

    println!("Creating web zip...");
    run_cmd(
        Command::new("zip")
            .current_dir(dist.join("web"))
            .args(["-r", &format!("../{}", zip_name), "."]),
    )?;

    println!("Web package ready: dist/{}", zip_name);
    Ok(())
}

fn host_platform() -> String {
    if cfg!(target_os = "windows") {
        "windows".to_string()
    } else if cfg!(target_os = "macos") {
        "macos".to_string()
    } else {
        "linux".to_string()
    }
}

/// Native release with the characters folder beside the binary
fn package_native(platform: Option<String>) -> Result<()> {
    let root = project_root()?;
    let platform = platform.unwrap_or_else(host_platform);
    let dist = root.join(format!("dist/native/{}", platform));

    println!("Building native release for {}...", platform);
    fresh_dir(&dist)?;
    run_cmd(Command::new("cargo").current_dir(&root).args(["build", "--release"]))?;

    let binary_name = if platform == "windows" {
        format!("{}.exe", BIN_NAME)
    } else {
        BIN_NAME.to_string()
    };
    std::fs::copy(root.join("target/release").join(&binary_name), dist.join(&binary_name))?;
    copy_dir_recursive(&root.join("characters"), &dist.join("characters"))?;

    println!("Native build complete: dist/native/{}/", platform);
    Ok(())
}

fn character_template(id: &str) -> String {
    let mut display_name = id.to_string();
    if let Some(first) = display_name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    format!(
        r#"(
    id: "{id}",
    meta: Some((
        display_name: "{display_name}",
        glyph: "?",
        category: custom,
        description: "",
        abilities: [],
    )),
    parts: [
        (shape: Box, size: (1.0, 1.0, 1.0), offset: (0.0, 0.5, 0.0), color: (200, 200, 200)),
        (shape: Sphere, size: (0.8, 0.8, 0.8), offset: (0.0, 1.4, 0.0), color: (230, 200, 170)),
    ],
)
"#
    )
}

/// Scaffold a character script
fn new_character(id: &str, installed: bool) -> Result<()> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()) {
        anyhow::bail!("invalid character id {:?} (expected lowercase letters and digits)", id);
    }

    let dir = if installed { "installed" } else { "available" };
    let path = project_root()?.join("characters").join(dir).join(format!("{}.ron", id));
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, character_template(id)).with_context(|| format!("writing {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
