//! Seed acquisition and the deterministic seed-to-parameter mapping.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound (exclusive) for seeds derived from the clock.
pub const SEED_RANGE: u64 = 1_000_000;

/// Derive a fresh seed from the current high-resolution timestamp.
///
/// The nanosecond wall clock is checksummed and reduced into
/// `[0, SEED_RANGE)`. Recomputed on every generation, never persisted.
pub fn seed_from_clock() -> u64 {
  let nanos = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_nanos())
    .unwrap_or_default();
  let mut hasher = DefaultHasher::new();
  nanos.hash(&mut hasher);
  hasher.finish() % SEED_RANGE
}

/// Numeric and color parameters for one generated image.
///
/// Every field is a pure function of the seed: identical seeds always expand
/// to identical bundles, which is what makes generation reproducible in
/// tests even though production seeds are clock-derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBundle {
  /// Selects one of the four pattern variants, in `[0, 4)`.
  pub pattern_type: u64,
  /// Strength of the temporal grain filter, in `[0, 101)`.
  pub noise_amount: u64,
  /// Hue rotation in degrees, in `[0, 360)`.
  pub hue_rotate: u64,
  /// Selects one of the five color-filter variants, in `[0, 5)`.
  pub color_variation: u64,
  /// Texture density multiplier, in `[1, 11)`.
  pub texture_scale: u64,
  /// Numerator of the shared `0.NN` fraction, in `[0, 100)`.
  pub seed_decimal: u64,
  /// `seed_decimal / 100`, embedded in filter text with 2 decimals.
  pub seed_small: f64,
  /// Red byte of the cellular-automaton life color, in `[0, 256)`.
  pub hex_r: u64,
  /// Green byte of the cellular-automaton life color, in `[0, 256)`.
  pub hex_g: u64,
  /// Blue byte of the cellular-automaton life color, in `[0, 256)`.
  pub hex_b: u64,
  /// Horizontal anchor of the fractal viewport, 6 decimals in filter text.
  pub mandelbrot_start_x: f64,
  /// Vertical anchor of the fractal viewport, 6 decimals in filter text.
  pub mandelbrot_start_y: f64,
  /// Fractal escape radius, in `[10, 100)`.
  pub mandelbrot_bailout: u64,
  /// Fractal iteration cap, in `[50, 200)`.
  pub mandelbrot_max_iter: u64,
}

impl ParameterBundle {
  /// Expand a seed into the full parameter bundle.
  ///
  /// Total for any `u64`: every field is reduced modulo a positive
  /// constant, so all documented ranges hold regardless of seed magnitude.
  pub fn from_seed(seed: u64) -> Self {
    let seed_decimal = seed % 100;
    let seed_small = seed_decimal as f64 / 100.0;
    Self {
      pattern_type: seed.wrapping_mul(7) % 4,
      noise_amount: seed % 101,
      hue_rotate: seed.wrapping_mul(13) % 360,
      color_variation: seed.wrapping_mul(17) % 5,
      texture_scale: seed.wrapping_mul(23) % 10 + 1,
      seed_decimal,
      seed_small,
      hex_r: seed.wrapping_mul(31) % 256,
      hex_g: seed.wrapping_mul(43) % 256,
      hex_b: seed.wrapping_mul(61) % 256,
      mandelbrot_start_x: -2.0 + seed_small,
      mandelbrot_start_y: -1.5 + seed_small,
      mandelbrot_bailout: 10 + seed % 90,
      mandelbrot_max_iter: 50 + seed % 150,
    }
  }

  /// 24-bit `#rrggbb` color built from the three hex bytes.
  pub fn life_color(&self) -> String {
    format!("#{:02x}{:02x}{:02x}", self.hex_r, self.hex_g, self.hex_b)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_zero_expands_to_documented_example() {
    let bundle = ParameterBundle::from_seed(0);
    assert_eq!(bundle.noise_amount, 0);
    assert_eq!(bundle.hue_rotate, 0);
    assert_eq!(bundle.color_variation, 0);
    assert_eq!(bundle.pattern_type, 0);
    assert_eq!(bundle.texture_scale, 1);
    assert_eq!(bundle.seed_decimal, 0);
    assert_eq!(bundle.seed_small, 0.0);
    assert_eq!(bundle.life_color(), "#000000");
    assert_eq!(format!("{:.6}", bundle.mandelbrot_start_x), "-2.000000");
    assert_eq!(format!("{:.6}", bundle.mandelbrot_start_y), "-1.500000");
    assert_eq!(bundle.mandelbrot_bailout, 10);
    assert_eq!(bundle.mandelbrot_max_iter, 50);
  }

  #[test]
  fn seed_max_expands_to_documented_example() {
    let bundle = ParameterBundle::from_seed(999_999);
    assert_eq!(bundle.pattern_type, 1);
    assert_eq!(bundle.color_variation, 3);
  }

  #[test]
  fn expansion_is_deterministic() {
    for seed in [0, 1, 42, 999_999, u64::MAX] {
      assert_eq!(
        ParameterBundle::from_seed(seed),
        ParameterBundle::from_seed(seed)
      );
    }
  }

  #[test]
  fn every_field_stays_in_range() {
    for seed in 0..SEED_RANGE {
      let bundle = ParameterBundle::from_seed(seed);
      assert!(bundle.pattern_type < 4);
      assert!(bundle.noise_amount < 101);
      assert!(bundle.hue_rotate < 360);
      assert!(bundle.color_variation < 5);
      assert!((1..11).contains(&bundle.texture_scale));
      assert!(bundle.seed_decimal < 100);
      assert!((0.0..1.0).contains(&bundle.seed_small));
      assert!(bundle.hex_r < 256);
      assert!(bundle.hex_g < 256);
      assert!(bundle.hex_b < 256);
      assert!((10..100).contains(&bundle.mandelbrot_bailout));
      assert!((50..200).contains(&bundle.mandelbrot_max_iter));
    }
  }

  #[test]
  fn clock_seed_is_in_range() {
    for _ in 0..100 {
      assert!(seed_from_clock() < SEED_RANGE);
    }
  }
}
