//! One generation pass: seed, build, invoke the engine, publish the path.

use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info};

use crate::{
  command::RenderCommand,
  filter::FilterGraphSpec,
  params::{seed_from_clock, ParameterBundle},
  paths,
};

/// Owns the output directory and the most recently published still.
///
/// Each call to [`Generator::generate`] walks Seeded -> Built -> Rendered ->
/// Published, or stops at RenderFailed without touching the published state.
pub struct Generator {
  engine: PathBuf,
  output_dir: PathBuf,
  resolution: String,
  last_output: Option<PathBuf>,
  last_name: Option<String>,
}

impl Generator {
  /// Create a generator writing into `output_dir`, which is created if
  /// absent.
  pub fn new<P: Into<PathBuf>, S: Into<String>>(output_dir: P, resolution: S) -> Result<Self> {
    let output_dir = output_dir.into();
    fs::create_dir_all(&output_dir)
      .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    Ok(Self {
      engine: paths::engine_path(),
      output_dir,
      resolution: resolution.into(),
      last_output: None,
      last_name: None,
    })
  }

  /// Override the rendering engine executable. Used by tests.
  pub fn with_engine<P: Into<PathBuf>>(mut self, engine: P) -> Self {
    self.engine = engine.into();
    self
  }

  /// Path of the most recently published still, if any.
  pub fn last_output(&self) -> Option<&Path> {
    self.last_output.as_deref()
  }

  /// Generate one image from a fresh clock-derived seed and return the
  /// published output path.
  pub fn generate(&mut self) -> Result<PathBuf> {
    self.generate_with_seed(seed_from_clock())
  }

  /// Deterministic remainder of [`Generator::generate`], split out so tests
  /// can pin the seed.
  pub fn generate_with_seed(&mut self, seed: u64) -> Result<PathBuf> {
    let bundle = ParameterBundle::from_seed(seed);
    let spec = FilterGraphSpec::build(&bundle, &self.resolution);
    info!(
      "seed {seed}: {} pattern, hue {}, noise {}",
      spec.pattern_name, bundle.hue_rotate, bundle.noise_amount
    );
    debug!("source: {}", spec.source);
    debug!("filters: {}", spec.filters);

    let name = self.unique_name();
    let output = self.output_dir.join(name);
    let render = RenderCommand::new_with_exe(&self.engine)
      .lavfi_source(&spec.source)
      .filtergraph(&spec.filters)
      .single_frame()
      .overwrite()
      .output(&output)
      .spawn()
      .with_context(|| format!("failed to launch rendering engine {}", self.engine.display()))?;

    if let Err(error) = render.wait_for_output() {
      // Nothing is published for a failed render, and no partial file is
      // left behind under the failed call's name.
      let _ = fs::remove_file(&output);
      return Err(error);
    }

    self.last_output = Some(output.clone());
    Ok(output)
  }

  /// Timestamped output name, unique within the process run.
  ///
  /// The wall clock carries microseconds, so a repeat of the previous name
  /// only happens when two calls land in the same tick; spinning until the
  /// name changes keeps the uniqueness guarantee unconditional.
  fn unique_name(&mut self) -> String {
    loop {
      let stamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
      let name = format!("noise_{stamp}.png");
      if self.last_name.as_deref() != Some(name.as_str()) {
        self.last_name = Some(name.clone());
        return name;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::process;

  fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("noisegen-test-{tag}-{}", process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn output_names_never_repeat() {
    let dir = scratch_dir("names");
    let mut generator = Generator::new(&dir, "64x64").unwrap();
    let mut names = Vec::new();
    for _ in 0..200 {
      names.push(generator.unique_name());
    }
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn failed_render_publishes_nothing() {
    let dir = scratch_dir("fail");
    // `false` exits non-zero without writing anything, standing in for a
    // broken engine.
    let mut generator = Generator::new(&dir, "64x64").unwrap().with_engine("false");
    assert!(generator.generate_with_seed(7).is_err());
    assert_eq!(generator.last_output(), None);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn failed_render_keeps_previous_publication() {
    let dir = scratch_dir("keep");
    let mut generator = Generator::new(&dir, "64x64").unwrap().with_engine("false");
    let previous = dir.join("noise_fake.png");
    fs::write(&previous, b"png").unwrap();
    generator.last_output = Some(previous.clone());

    assert!(generator.generate_with_seed(7).is_err());
    assert_eq!(generator.last_output(), Some(previous.as_path()));
    assert!(previous.exists());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn missing_engine_is_reported() {
    let dir = scratch_dir("missing");
    let mut generator = Generator::new(&dir, "64x64")
      .unwrap()
      .with_engine("/nonexistent/noisegen-engine");
    let err = generator.generate_with_seed(0).unwrap_err();
    assert!(err.to_string().contains("failed to launch rendering engine"));
    let _ = fs::remove_dir_all(&dir);
  }
}
