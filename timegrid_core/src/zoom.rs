//! Pinch-driven zoom over the shared measure width.

use serde::{Deserialize, Serialize};

/// Zoom clamping and damping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    /// Damping applied to the raw pinch scale.
    pub speed: f32,
    /// Minimum width of a measure bar after zooming out.
    pub min_measure_width: f32,
    /// Maximum width of a measure bar after zooming in.
    pub max_measure_width: f32,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            speed: 0.4,
            min_measure_width: 100.0,
            max_measure_width: 500.0,
        }
    }
}

/// Applies one pinch tick. The raw scale is damped by `speed`, then the
/// damped scale itself is clamped so a single tick cannot jump across the
/// whole `[min, max]` range. Takes effect immediately; there is no separate
/// commit step.
pub fn apply_pinch(measure_width: f32, raw_scale: f32, settings: &ZoomSettings) -> f32 {
    let mut scale = ((raw_scale - 1.0) * settings.speed) + 1.0;
    scale = scale.min(settings.max_measure_width / measure_width);
    scale = scale.max(settings.min_measure_width / measure_width);
    (measure_width * scale).clamp(settings.min_measure_width, settings.max_measure_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_pinch_in_clamps_to_max() {
        let settings = ZoomSettings::default();
        assert_eq!(apply_pinch(200.0, 10.0, &settings), 500.0);
    }

    #[test]
    fn large_pinch_out_clamps_to_min() {
        let settings = ZoomSettings::default();
        assert!(apply_pinch(200.0, 0.01, &settings) >= 100.0);
        assert!(apply_pinch(110.0, 0.001, &settings) >= 100.0);
    }

    #[test]
    fn speed_damps_the_raw_scale() {
        let settings = ZoomSettings::default();
        // (1.5 - 1) * 0.4 + 1 = 1.2
        let zoomed = apply_pinch(200.0, 1.5, &settings);
        assert!((zoomed - 240.0).abs() < 1e-3);
    }

    #[test]
    fn unit_scale_is_identity_inside_range() {
        let settings = ZoomSettings::default();
        assert_eq!(apply_pinch(200.0, 1.0, &settings), 200.0);
    }
}
