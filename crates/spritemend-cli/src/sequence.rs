//! Frame-directory glue: the core only sees encoded bytes; mapping those to
//! files on disk lives here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use spritemend_core::pipeline::{PipelineConfig, Report};
use tracing::info;

/// An ordered sequence of encoded frames loaded from a directory.
/// Lexicographic file order defines frame order.
pub struct FrameSequence {
    pub names: Vec<String>,
    pub frames: Vec<Vec<u8>>,
}

/// Load all `.png` files of a directory, sorted by name.
pub fn load_sequence(dir: &Path) -> Result<FrameSequence> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read frame directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("png"))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("No .png frames found in {}", dir.display());
    }

    let mut names = Vec::with_capacity(paths.len());
    let mut frames = Vec::with_capacity(paths.len());
    for path in &paths {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read frame {}", path.display()))?;
        names.push(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        frames.push(bytes);
    }

    info!(frames = frames.len(), dir = %dir.display(), "Loaded frame sequence");
    Ok(FrameSequence { names, frames })
}

/// Write corrected frames under their original file names.
pub fn write_sequence(dir: &Path, names: &[String], frames: &[Vec<u8>]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    for (name, bytes) in names.iter().zip(frames) {
        let path = dir.join(name);
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write frame {}", path.display()))?;
    }
    Ok(())
}

/// Persist the diagnostic report as JSON.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}

/// Load a pipeline config from a TOML file, or defaults when no path given.
pub fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: PipelineConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}
