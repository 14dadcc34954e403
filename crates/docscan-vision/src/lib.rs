// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-vision — Finds a document's outline in a camera frame and turns it
// into an upright page.
//
// Detection runs per frame: luminance, 3x3 Gaussian, Sobel edges, flood-fill
// contours, convex hull, four-corner fit, geometric validation, and largest-
// area selection. Capture runs on demand: perspective rectification onto an
// A4-proportioned page (or a centre crop when nothing was detected) followed
// by contrast/brightness adjustment.

pub mod convert;
pub mod detect;
pub mod filter;
pub mod geometry;
pub mod scan;

use docscan_core::error::Result;
use docscan_core::{DetectionResult, PixelBuffer};

// Re-export the primary entry points so callers can use `docscan_vision::detect` etc.
pub use detect::{DetectionReport, DocumentDetector, Rejection};
pub use scan::{DetectOutcome, Rectifier, ScanSession, enhance, enhance_with, rectify};

/// Detect a document outline in `frame` with the default configuration.
///
/// `Ok(None)` means no document was found; errors only signal a malformed
/// frame.
pub fn detect(frame: &PixelBuffer) -> Result<DetectionResult> {
    DocumentDetector::default().detect(frame)
}
