//! Executable lookup and output-directory housekeeping.

use std::{
  env::current_exe,
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Number of previous stills kept by the startup prune.
pub const KEEP_OUTPUTS: usize = 20;

/// Returns the path of the rendering engine executable, to be used as the
/// argument to `Command::new`. It first attempts to locate an `ffmpeg`
/// binary adjacent to the Rust executable, falling back to the system path.
/// A missing binary is only reported when the command is actually run.
pub fn engine_path() -> PathBuf {
  resolve_tool("ffmpeg")
}

/// Returns the path of the image viewer executable, with the same lookup
/// rules as [`engine_path`].
pub fn viewer_path() -> PathBuf {
  resolve_tool("ffplay")
}

fn resolve_tool(name: &str) -> PathBuf {
  let default = Path::new(name).to_path_buf();
  match adjacent_path(name) {
    Ok(path) if path.exists() => path,
    _ => default,
  }
}

/// The (expected) path to a tool binary adjacent to the Rust binary.
///
/// The extension differs between platforms, with Windows using `.exe`,
/// while Mac and Linux have no extension.
fn adjacent_path(name: &str) -> Result<PathBuf> {
  let mut path = current_exe()?
    .parent()
    .context("can't get parent of current_exe")?
    .join(name);
  if cfg!(windows) {
    path.set_extension("exe");
  }
  Ok(path)
}

/// The fixed directory where generated stills are written.
pub fn default_output_dir() -> PathBuf {
  std::env::temp_dir().join("noisegen")
}

/// Delete all but the newest [`KEEP_OUTPUTS`] stills, by name sort.
///
/// Runs once at process start only. Best-effort housekeeping, not a
/// retention guarantee: every error is silently discarded.
pub fn prune_old_outputs(dir: &Path) {
  let Ok(entries) = fs::read_dir(dir) else {
    return;
  };
  let mut outputs: Vec<PathBuf> = entries
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.path())
    .filter(|path| {
      path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("noise_") && name.ends_with(".png"))
    })
    .collect();
  outputs.sort();
  let excess = outputs.len().saturating_sub(KEEP_OUTPUTS);
  for path in outputs.into_iter().take(excess) {
    let _ = fs::remove_file(path);
  }
}
