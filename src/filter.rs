//! Turn a parameter bundle into lavfi filter-graph text.
//!
//! FFmpeg filter reference: <https://ffmpeg.org/ffmpeg-filters.html>

use crate::params::ParameterBundle;

/// Human-readable names for the four pattern variants, indexed by
/// `pattern_type`.
const PATTERN_NAMES: [&str; 4] = [
  "sine noise",
  "mandelbrot",
  "game of life",
  "plasma waves",
];

/// The two expressions handed to the rendering engine, plus the chosen
/// pattern's name for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGraphSpec {
  /// lavfi source expression, passed as the engine's input.
  pub source: String,
  /// Post-processing chain applied to the rasterized stream.
  pub filters: String,
  /// Name of the pattern selected by `pattern_type`.
  pub pattern_name: &'static str,
}

impl FilterGraphSpec {
  /// Build the source expression and filter chain for one bundle.
  ///
  /// Exactly one of the four pattern expressions is selected by
  /// `pattern_type` and exactly one of the five color filters by
  /// `color_variation`; both fields are produced modulo their table length
  /// so no index can miss.
  pub fn build(bundle: &ParameterBundle, resolution: &str) -> Self {
    Self {
      source: source_expression(bundle, resolution),
      filters: format!(
        "noise=alls={}:allf=t,{}",
        bundle.noise_amount,
        color_expression(bundle)
      ),
      pattern_name: PATTERN_NAMES[bundle.pattern_type as usize],
    }
  }
}

/// Pattern source, selected by `pattern_type`.
fn source_expression(bundle: &ParameterBundle, resolution: &str) -> String {
  match bundle.pattern_type {
    0 => format!(
      "nullsrc=s={resolution}:d=0.1,\
       geq=r='128+{noise}*sin(X/10)':\
       g='128+{scale}*sin(Y/10)':\
       b='128+{noise}*sin((X+Y)/10)'",
      noise = bundle.noise_amount,
      scale = bundle.texture_scale,
    ),
    1 => format!(
      "mandelbrot=s={resolution}:start_x={x:.6}:start_y={y:.6}:\
       bailout={bailout}:maxiter={maxiter}",
      x = bundle.mandelbrot_start_x,
      y = bundle.mandelbrot_start_y,
      bailout = bundle.mandelbrot_bailout,
      maxiter = bundle.mandelbrot_max_iter,
    ),
    2 => format!(
      // The explicit cast mirrors the original tool, which truncated the
      // mold parameter even though texture_scale is always integral.
      "life=s={resolution}:ratio={ratio:.2}:mold={mold}:life_color={color}",
      ratio = bundle.seed_small,
      mold = bundle.texture_scale as i64,
      color = bundle.life_color(),
    ),
    _ => format!(
      "nullsrc=s={resolution}:d=0.1,\
       geq=r='128+128*sin({freq:.2}*X*PI*4/W)':\
       g='128+128*sin({freq:.2}*Y*PI*4/H)':\
       b='128+128*sin({freq:.2}*(X+Y)*PI*4/(W+H))'",
      freq = bundle.seed_small,
    ),
  }
}

/// Color transform, selected by `color_variation`.
fn color_expression(bundle: &ParameterBundle) -> String {
  let fraction = bundle.seed_decimal as f64 / 100.0;
  match bundle.color_variation {
    0 => format!(
      "hue=h={}:s={:.1}",
      bundle.hue_rotate,
      bundle.texture_scale as f64 / 10.0
    ),
    1 => format!("hue=h={}:s=3,negate", bundle.hue_rotate),
    2 => format!(
      "colorbalance=rs={fraction:.2}:gs={fraction:.2}:bs={fraction:.2}"
    ),
    3 => format!(
      "eq=contrast={:.2}:brightness={fraction:.2}",
      1.0 + fraction
    ),
    _ => format!(
      "hue=h={},colorchannelmixer=rr={fraction:.2}:gg={fraction:.2}:bb={fraction:.2}:aa=0",
      bundle.hue_rotate
    ),
  }
}
