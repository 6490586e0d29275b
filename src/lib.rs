//! Generate procedural glitch-art stills with a standalone FFmpeg binary.
//!
//! Each invocation derives a bundle of numeric and color parameters from a
//! timestamp seed, composes a lavfi filter graph from it, rasterizes a
//! single PNG frame with `ffmpeg`, and points an external viewer at the
//! result.
//!
//! ## Example
//!
//! ```rust
//! use noisegen::{filter::FilterGraphSpec, params::ParameterBundle};
//!
//! let bundle = ParameterBundle::from_seed(271_828); // <- pure and deterministic
//! let spec = FilterGraphSpec::build(&bundle, "1280x720");
//! println!("{}: {}", spec.pattern_name, spec.source);
//! ```

pub mod command;
pub mod filter;
pub mod params;
pub mod paths;
pub mod render;
pub mod viewer;
