//! Invocation of the external rendering engine.

use std::{
  ffi::OsStr,
  fmt,
  io::{self, Read},
  path::Path,
  process::{Child, Command, Stdio},
};

use anyhow::{bail, Result};

use crate::paths::engine_path;

/// A wrapper around [`std::process::Command`] preconfigured for rasterizing
/// a single lavfi frame with `ffmpeg`.
///
/// The aliases cover only the arguments this tool needs; anything else can
/// go through [`RenderCommand::arg`]. Refer to the FFmpeg documentation for
/// the full surface: <https://ffmpeg.org/ffmpeg.html>.
pub struct RenderCommand {
  inner: Command,
}

impl RenderCommand {
  /// Alias for `-f lavfi -i <expr>`: take a libavfilter source expression
  /// as the input instead of a file.
  pub fn lavfi_source<S: AsRef<str>>(&mut self, expr: S) -> &mut Self {
    self.args(["-f", "lavfi", "-i"]);
    self.arg(expr.as_ref());
    self
  }

  /// Alias for `-vf` argument, the filtergraph applied to the stream.
  pub fn filtergraph<S: AsRef<str>>(&mut self, filtergraph: S) -> &mut Self {
    self.arg("-vf");
    self.arg(filtergraph.as_ref());
    self
  }

  /// Alias for `-frames:v 1`: stop after one rasterized frame.
  pub fn single_frame(&mut self) -> &mut Self {
    self.args(["-frames:v", "1"]);
    self
  }

  /// Alias for `-y` argument: overwrite output files without asking.
  pub fn overwrite(&mut self) -> &mut Self {
    self.arg("-y");
    self
  }

  /// Alias for `-hide_banner` argument.
  ///
  /// Suppress printing the copyright notice, build options and library
  /// versions, keeping the diagnostic stream down to actual diagnostics.
  pub fn hide_banner(&mut self) -> &mut Self {
    self.arg("-hide_banner");
    self
  }

  /// Set the output file path, the trailing positional argument.
  pub fn output<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
    self.inner.arg(path.as_ref());
    self
  }

  /// Adds an argument to pass to the program.
  ///
  /// Identical to `arg` in [`std::process::Command`].
  pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
    self.inner.arg(arg.as_ref());
    self
  }

  /// Adds multiple arguments to pass to the program.
  ///
  /// Identical to `args` in [`std::process::Command`].
  pub fn args<I, S>(&mut self, args: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    for arg in args {
      self.arg(arg.as_ref());
    }
    self
  }

  /// Spawn the engine as a child process, wrapping it in a [`RenderChild`]
  /// interface.
  pub fn spawn(&mut self) -> io::Result<RenderChild> {
    self.inner.spawn().map(RenderChild::from_inner)
  }

  pub fn new() -> Self {
    Self::new_with_exe(engine_path())
  }

  pub fn new_with_exe<S: AsRef<OsStr>>(exe: S) -> Self {
    let mut inner = Command::new(&exe);
    inner.stdin(Stdio::null());
    inner.stdout(Stdio::null());
    inner.stderr(Stdio::piped());

    let mut command = Self { inner };
    command.hide_banner();
    command
  }
}

impl Default for RenderCommand {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for RenderCommand {
  /// Format the program and arguments of the underlying `Command`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.inner.fmt(f)
  }
}

/// A spawned rendering engine process.
pub struct RenderChild {
  inner: Child,
}

impl RenderChild {
  pub(crate) fn from_inner(inner: Child) -> Self {
    Self { inner }
  }

  /// Block until the engine exits.
  ///
  /// On a non-zero exit status the captured diagnostic stream is folded
  /// into the returned error; the buffer is dropped on success.
  pub fn wait_for_output(mut self) -> Result<()> {
    let mut diagnostics = String::new();
    if let Some(mut stderr) = self.inner.stderr.take() {
      // Reading to EOF first avoids deadlocking on a full pipe.
      let _ = stderr.read_to_string(&mut diagnostics);
    }
    let status = self.inner.wait()?;
    if !status.success() {
      bail!(
        "rendering engine exited with {status}: {}",
        diagnostics.trim()
      );
    }
    Ok(())
  }
}
