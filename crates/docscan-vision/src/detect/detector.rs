// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-frame document detection: grayscale, smooth, Sobel edges, contour
// trace, hull, corner fit, validate, select.

use docscan_core::error::Result;
use docscan_core::{DetectionConfig, DetectionResult, PixelBuffer, Quadrilateral};
use tracing::{debug, info, instrument};

use crate::detect::select::select_best;
use crate::detect::validate::{Rejection, validate};
use crate::filter::{gaussian_blur, grayscale, sobel_edges};
use crate::geometry::{TraceOptions, convex_hull, fit_quadrilateral, trace_contours};

/// Finds the outline of a document in camera frames.
///
/// Holds only configuration; every call allocates its own intermediate
/// buffers and drops them before returning, so one detector can be shared
/// freely.
#[derive(Debug, Clone, Default)]
pub struct DocumentDetector {
    config: DetectionConfig,
}

/// Everything one detection pass found, for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct DetectionReport {
    /// The selected outline, if any candidate survived validation.
    pub quad: DetectionResult,
    /// Contours long enough to be fitted.
    pub contours: usize,
    /// Edge pixels visited by the contour trace.
    pub pixels_visited: usize,
    /// Quadrilaterals that passed validation, in discovery order.
    pub accepted: Vec<Quadrilateral>,
    /// Validation failures, in discovery order.
    pub rejected: Vec<Rejection>,
}

impl DocumentDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Locate the document outline in an RGBA (or luma) frame.
    ///
    /// Returns `Ok(None)` when nothing document-like is visible. The frame is
    /// only read.
    pub fn detect(&self, frame: &PixelBuffer) -> Result<DetectionResult> {
        Ok(self.detect_with_report(frame)?.quad)
    }

    /// Like [`detect`](Self::detect) but also returns the intermediate counts
    /// and every candidate considered.
    #[instrument(skip_all, fields(width = frame.width(), height = frame.height()))]
    pub fn detect_with_report(&self, frame: &PixelBuffer) -> Result<DetectionReport> {
        let gray = grayscale(frame)?;
        let smoothed = gaussian_blur(&gray)?;
        let edges = sobel_edges(&smoothed, self.config.edge_threshold)?;
        debug!(threshold = self.config.edge_threshold, "Edge mask computed");

        let trace = trace_contours(&edges, &TraceOptions::from(&self.config))?;

        let mut report = DetectionReport {
            contours: trace.contours.len(),
            pixels_visited: trace.pixels_visited,
            ..DetectionReport::default()
        };

        for contour in &trace.contours {
            let hull = convex_hull(contour);
            let Some(quad) = fit_quadrilateral(&hull) else {
                debug!(hull_points = hull.len(), "Hull too small for a quadrilateral");
                continue;
            };
            match validate(&quad, frame.width(), frame.height(), &self.config.validation) {
                Ok(()) => report.accepted.push(quad),
                Err(rejection) => {
                    debug!(%rejection, "Candidate rejected");
                    report.rejected.push(rejection);
                }
            }
        }

        report.quad = select_best(report.accepted.clone());
        match &report.quad {
            Some(quad) => info!(
                area = quad.area(),
                candidates = report.accepted.len(),
                "Document outline detected"
            ),
            None => debug!(
                contours = report.contours,
                rejected = report.rejected.len(),
                "No document outline this frame"
            ),
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::ValidationPolicy;

    /// Black RGBA frame with a white axis-aligned rectangle.
    fn frame_with_rect(width: u32, height: u32, rect: (u32, u32, u32, u32)) -> PixelBuffer {
        let (rx, ry, rw, rh) = rect;
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let inside = x >= rx && x < rx + rw && y >= ry && y < ry + rh;
                let v = if inside { 255 } else { 0 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        PixelBuffer::rgba(width, height, data).unwrap()
    }

    #[test]
    fn uniform_frame_detects_nothing() {
        let frame = PixelBuffer::rgba(80, 60, [90, 90, 90, 255].repeat(80 * 60)).unwrap();
        let report = DocumentDetector::default().detect_with_report(&frame).unwrap();
        assert!(report.quad.is_none());
        assert_eq!(report.pixels_visited, 0);
    }

    #[test]
    fn white_rectangle_is_found() {
        let frame = frame_with_rect(160, 160, (40, 30, 80, 100));
        let quad = DocumentDetector::default().detect(&frame).unwrap().unwrap();
        let area = quad.area();
        assert!((area - 8000.0).abs() < 8000.0 * 0.2, "area {}", area);
        for angle in quad.interior_angles().unwrap() {
            assert!((angle - 90.0).abs() <= 30.0, "angle {}", angle);
        }
    }

    #[test]
    fn small_rectangle_is_rejected_on_area() {
        // 30x30 in 160x160 is ~3.5% of the frame.
        let frame = frame_with_rect(160, 160, (60, 60, 30, 30));
        let report = DocumentDetector::default().detect_with_report(&frame).unwrap();
        assert!(report.quad.is_none());
        assert!(
            report
                .rejected
                .iter()
                .any(|r| matches!(r, Rejection::AreaTooSmall { .. }))
        );
    }

    #[test]
    fn relaxed_policy_accepts_small_rectangle() {
        let config = DetectionConfig {
            validation: ValidationPolicy {
                min_area_fraction: 0.01,
                ..ValidationPolicy::default()
            },
            ..DetectionConfig::default()
        };
        let frame = frame_with_rect(160, 160, (60, 60, 30, 30));
        assert!(DocumentDetector::new(config).detect(&frame).unwrap().is_some());
    }
}
