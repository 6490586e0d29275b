use std::{path::PathBuf, thread, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;
use log::error;

use noisegen::{paths, render::Generator, viewer::Viewer};

/// Generate a procedural glitch-art still and display it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
  /// Seconds between images; loops forever when given, generates a single
  /// image when absent.
  delay: Option<f64>,

  /// Output resolution.
  #[arg(long, default_value = "1280x720")]
  size: String,

  /// Directory for generated stills.
  #[arg(long)]
  out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
  let args = Args::parse();

  let output_dir = args.out_dir.unwrap_or_else(paths::default_output_dir);
  paths::prune_old_outputs(&output_dir);

  let mut generator = Generator::new(output_dir, args.size)?;
  let mut viewer = Viewer::new();

  match args.delay {
    None => {
      let path = generator.generate()?;
      println!("{}", path.display());
      viewer.show(&path)
    }
    Some(delay) => {
      ensure!(
        delay.is_finite() && delay >= 0.0,
        "delay must be a non-negative number of seconds"
      );
      loop {
        match generator.generate() {
          Ok(path) => {
            println!("{}", path.display());
            if let Err(error) = viewer.show(&path) {
              error!("viewer refresh failed: {error:#}");
            }
          }
          // The loop always continues to its next scheduled iteration.
          Err(error) => error!("generation failed: {error:#}"),
        }
        thread::sleep(Duration::from_secs_f64(delay));
      }
    }
  }
}
