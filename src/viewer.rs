//! Keep exactly one viewer process pointed at the latest still.

use std::{
  ffi::OsStr,
  path::{Path, PathBuf},
  process::{Child, Command, Stdio},
};

use anyhow::{Context, Result};
use log::debug;

use crate::paths;

/// Title applied to the viewer window after launch, best effort.
const WINDOW_TITLE: &str = "noisegen";

/// Controls the external image viewer through its child-process handle.
///
/// The handle returned by the launch is retained and reaped here, so
/// liveness checks and termination never rely on process-name matching.
pub struct Viewer {
  exe: PathBuf,
  child: Option<Child>,
}

impl Viewer {
  pub fn new() -> Self {
    Self {
      exe: paths::viewer_path(),
      child: None,
    }
  }

  /// Override the viewer executable. Used by tests.
  pub fn with_exe<S: AsRef<OsStr>>(mut self, exe: S) -> Self {
    self.exe = PathBuf::from(exe.as_ref());
    self
  }

  /// Whether the held viewer process is still alive.
  pub fn is_running(&mut self) -> bool {
    match self.child.as_mut() {
      Some(child) => matches!(child.try_wait(), Ok(None)),
      None => false,
    }
  }

  /// Point the viewer at `path`, replacing any viewer already on screen.
  ///
  /// The viewer has no live-reload mechanism, so a refresh is a restart:
  /// kill the old process, then launch a new one on the new path.
  pub fn show(&mut self, path: &Path) -> Result<()> {
    if self.is_running() {
      self.close();
    }
    let child = Command::new(&self.exe)
      .arg(path)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .spawn()
      .with_context(|| format!("failed to launch viewer {}", self.exe.display()))?;
    self.child = Some(child);
    self.retitle();
    Ok(())
  }

  /// Kill the held viewer process and reap it. No-op when nothing is held.
  pub fn close(&mut self) {
    if let Some(mut child) = self.child.take() {
      let _ = child.kill();
      let _ = child.wait();
    }
  }

  /// Ask the window manager to retitle the viewer window.
  ///
  /// Failure is ignored: not every session has `xdotool` or a display.
  fn retitle(&self) {
    let viewer_name = self
      .exe
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();
    let result = Command::new("xdotool")
      .args(["search", "--name", &viewer_name, "set_window_title", WINDOW_TITLE])
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status();
    if let Err(error) = result {
      debug!("window retitle skipped: {error}");
    }
  }
}

impl Default for Viewer {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  // `sleep` stands in for the viewer: it takes one argument and stays
  // alive until killed, like an image window would.
  fn stub_viewer() -> Viewer {
    Viewer::new().with_exe("sleep")
  }

  #[test]
  fn starts_with_no_viewer_running() {
    let mut viewer = stub_viewer();
    assert!(!viewer.is_running());
  }

  #[test]
  fn show_launches_and_close_reaps() {
    let mut viewer = stub_viewer();
    viewer.show(Path::new("30")).unwrap();
    assert!(viewer.is_running());
    viewer.close();
    assert!(!viewer.is_running());
  }

  #[test]
  fn refresh_replaces_the_held_child() {
    let mut viewer = stub_viewer();
    viewer.show(Path::new("30")).unwrap();
    let first_pid = viewer.child.as_ref().unwrap().id();
    viewer.show(Path::new("30")).unwrap();
    let second_pid = viewer.child.as_ref().unwrap().id();
    assert_ne!(first_pid, second_pid);
    assert!(viewer.is_running());
    viewer.close();
  }

  #[test]
  fn launch_failure_is_an_error() {
    let mut viewer = Viewer::new().with_exe("/nonexistent/noisegen-viewer");
    assert!(viewer.show(Path::new("anything")).is_err());
    assert!(!viewer.is_running());
  }
}
