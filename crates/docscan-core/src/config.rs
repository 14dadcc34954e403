// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration. Every tunable carries the literal default the
// scanner has always shipped with.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// ISO A4 portrait, width over height.
pub const A4_ASPECT_RATIO: f64 = 210.0 / 297.0;

/// Geometric acceptance bounds for a candidate quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Smallest accepted area as a fraction of the image area (inclusive).
    pub min_area_fraction: f64,
    /// Largest accepted area as a fraction of the image area (inclusive).
    pub max_area_fraction: f64,
    /// Maximum deviation of any interior angle from 90 degrees.
    pub angle_tolerance_deg: f64,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_area_fraction: 0.10,
            max_area_fraction: 0.80,
            angle_tolerance_deg: 30.0,
        }
    }
}

/// Settings for the per-frame detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Sobel magnitude above which a pixel counts as an edge.
    pub edge_threshold: f64,
    /// Distance between flood-fill seed candidates on each axis.
    pub seed_stride: u32,
    /// Width of the frame border that seeds never start in.
    pub seed_border: u32,
    /// Upper bound on stored points per contour.
    pub max_contour_points: usize,
    /// Contours must have more than this many points to be fitted.
    pub min_contour_points: usize,
    pub validation: ValidationPolicy,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 50.0,
            seed_stride: 5,
            seed_border: 10,
            max_contour_points: 1000,
            min_contour_points: 50,
            validation: ValidationPolicy::default(),
        }
    }
}

/// How destination pixels are mapped back into the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectifyMode {
    /// Blend the four corners by normalised (u, v) weights.
    #[default]
    Bilinear,
    /// Solve the full 4-point projective transform.
    Homography,
}

/// Output geometry for rectified captures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyConfig {
    /// Output width in pixels; height follows from the aspect ratio.
    pub target_width: u32,
    /// Output width divided by output height.
    pub aspect_ratio: f64,
    /// Margin on each side of the fallback centre crop, as a fraction.
    pub fallback_margin: f64,
    pub mode: RectifyMode,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            target_width: 800,
            aspect_ratio: A4_ASPECT_RATIO,
            fallback_margin: 0.10,
            mode: RectifyMode::Bilinear,
        }
    }
}

impl RectifyConfig {
    /// Output height for the configured width and aspect ratio.
    pub fn target_height(&self) -> u32 {
        output_height(self.target_width, self.aspect_ratio)
    }
}

/// Output height for `width` at `aspect_ratio` (width / height), rounded.
pub fn output_height(width: u32, aspect_ratio: f64) -> u32 {
    (width as f64 / aspect_ratio).round() as u32
}

/// Contrast/brightness applied to a rectified capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneSettings {
    pub contrast: f64,
    pub brightness: f64,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            contrast: 1.3,
            brightness: 15.0,
        }
    }
}

impl ToneSettings {
    /// Settings that leave every channel unchanged.
    pub const IDENTITY: Self = Self {
        contrast: 1.0,
        brightness: 0.0,
    };
}

/// Complete scanner settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub detection: DetectionConfig,
    pub rectify: RectifyConfig,
    /// Tone used when a detected outline drove the rectification.
    pub detected_tone: ToneSettings,
    /// Tone used for the centre-crop fallback.
    pub fallback_tone: ToneSettings,
}

impl ScanConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;
        if !d.edge_threshold.is_finite() || d.edge_threshold < 0.0 {
            return Err(config_err("edge_threshold must be a non-negative number"));
        }
        if d.seed_stride == 0 {
            return Err(config_err("seed_stride must be at least 1"));
        }
        if d.max_contour_points == 0 {
            return Err(config_err("max_contour_points must be at least 1"));
        }
        if d.max_contour_points <= d.min_contour_points {
            return Err(config_err(
                "max_contour_points must exceed min_contour_points",
            ));
        }

        let v = &d.validation;
        let fraction_ok = |f: f64| f.is_finite() && (0.0..=1.0).contains(&f);
        if !fraction_ok(v.min_area_fraction) || !fraction_ok(v.max_area_fraction) {
            return Err(config_err("area fractions must lie in [0, 1]"));
        }
        if v.min_area_fraction > v.max_area_fraction {
            return Err(config_err(
                "min_area_fraction must not exceed max_area_fraction",
            ));
        }
        if !(v.angle_tolerance_deg.is_finite() && (0.0..=90.0).contains(&v.angle_tolerance_deg)) {
            return Err(config_err("angle_tolerance_deg must lie in [0, 90]"));
        }

        let r = &self.rectify;
        if r.target_width == 0 {
            return Err(config_err("target_width must be at least 1"));
        }
        if !r.aspect_ratio.is_finite() || r.aspect_ratio <= 0.0 {
            return Err(config_err("aspect_ratio must be a positive number"));
        }
        if !(r.fallback_margin.is_finite() && (0.0..0.5).contains(&r.fallback_margin)) {
            return Err(config_err("fallback_margin must lie in [0, 0.5)"));
        }

        for tone in [&self.detected_tone, &self.fallback_tone] {
            if !tone.contrast.is_finite() || !tone.brightness.is_finite() {
                return Err(config_err("tone settings must be finite"));
            }
        }
        Ok(())
    }
}

fn config_err(msg: &str) -> ScanError {
    ScanError::Config(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_constants() {
        let config = ScanConfig::default();
        assert_eq!(config.detection.edge_threshold, 50.0);
        assert_eq!(config.detection.max_contour_points, 1000);
        assert_eq!(config.detection.validation.min_area_fraction, 0.10);
        assert_eq!(config.detection.validation.max_area_fraction, 0.80);
        assert_eq!(config.detection.validation.angle_tolerance_deg, 30.0);
        assert_eq!(config.rectify.target_width, 800);
        assert_eq!(config.rectify.target_height(), 1131);
        assert_eq!(config.detected_tone.contrast, 1.3);
        assert_eq!(config.detected_tone.brightness, 15.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            ScanConfig::from_json(r#"{ "detection": { "edge_threshold": 80.0 } }"#).unwrap();
        assert_eq!(config.detection.edge_threshold, 80.0);
        assert_eq!(config.detection.seed_stride, 5);
        assert_eq!(config.rectify, RectifyConfig::default());
    }

    #[test]
    fn json_round_trip_preserves_mode() {
        let mut config = ScanConfig::default();
        config.rectify.mode = RectifyMode::Homography;
        let json = config.to_json().unwrap();
        assert_eq!(ScanConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn inverted_area_bounds_are_rejected() {
        let mut config = ScanConfig::default();
        config.detection.validation.min_area_fraction = 0.9;
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));
    }

    #[test]
    fn contour_cap_must_exceed_minimum() {
        let mut config = ScanConfig::default();
        config.detection.max_contour_points = config.detection.min_contour_points;
        assert!(matches!(config.validate(), Err(ScanError::Config(_))));

        config.detection.max_contour_points += 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = ScanConfig::from_json(r#"{ "rectify": { "target_width": 0 } }"#).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = ScanConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ScanError::Serialization(_)));
    }
}
