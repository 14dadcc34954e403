// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture-time processing — perspective rectification, tone enhancement, and
// the scan session that hands detections from the periodic detector to the
// capture path.

pub mod enhance;
pub mod rectify;
pub mod session;

pub use enhance::{enhance, enhance_with};
pub use rectify::{Rectifier, fallback_crop, rectify};
pub use session::{DetectOutcome, ScanSession};
