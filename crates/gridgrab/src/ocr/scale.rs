//! Rescale advice ahead of the final recognition pass.
//!
//! OCR engines read best at a particular text height. A first pass over the
//! unscaled capture yields word heights; their mean tells how far the capture
//! has to be scaled so that lines come out at the target height, bounded by
//! the largest raster the backend accepts.

use serde::{Deserialize, Serialize};

/// Line height, in pixels, the scale is chosen for.
pub const TARGET_LINE_HEIGHT: f64 = 40.0;

/// Assumed line height when the first pass found no words.
pub const DEFAULT_LINE_HEIGHT: f64 = 10.0;

/// Floor for the mean height so degenerate zero-height words cannot divide by zero.
pub const MIN_LINE_HEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleAdvisor {
    pub target_line_height: f64,
    pub default_line_height: f64,
}

impl Default for ScaleAdvisor {
    fn default() -> Self {
        Self {
            target_line_height: TARGET_LINE_HEIGHT,
            default_line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl ScaleAdvisor {
    /// Uniform scale factor for an `image_width` x `image_height` capture.
    ///
    /// Non-finite heights are ignored. When the scaled image would exceed
    /// `max_dimension` on its longer side the factor is lowered to fit exactly;
    /// a `max_dimension` of zero disables that bound. The result is always
    /// positive.
    pub fn ideal_scale(&self, word_heights: &[f64], image_width: u32, image_height: u32, max_dimension: u32) -> f64 {
        let finite: Vec<f64> = word_heights.iter().copied().filter(|h| h.is_finite()).collect();
        let mean_height = if finite.is_empty() {
            self.default_line_height
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        };
        let mean_height = mean_height.max(MIN_LINE_HEIGHT);

        let mut scale = self.target_line_height / mean_height;

        let larger_dimension = image_width.max(image_height) as f64;
        if max_dimension > 0 && larger_dimension > 0.0 && larger_dimension * scale > max_dimension as f64 {
            scale = max_dimension as f64 / larger_dimension;
        }

        if !(scale.is_finite() && scale > 0.0) {
            tracing::warn!("Degenerate scale factor {} computed; falling back to 1.0", scale);
            return 1.0;
        }

        tracing::debug!(
            "ideal scale {:.3} for {}x{} capture (mean word height {:.1}px over {} words)",
            scale,
            image_width,
            image_height,
            mean_height,
            finite.len()
        );
        scale
    }
}

/// [`ScaleAdvisor::ideal_scale`] with the default 40px target and 10px fallback height.
pub fn ideal_scale(word_heights: &[f64], image_width: u32, image_height: u32, max_dimension: u32) -> f64 {
    ScaleAdvisor::default().ideal_scale(word_heights, image_width, image_height, max_dimension)
}
