// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document detection — geometric validation, candidate selection, and the
// per-frame pipeline that ties the filter and geometry stages together.

pub mod detector;
pub mod select;
pub mod validate;

pub use detector::{DetectionReport, DocumentDetector};
pub use select::select_best;
pub use validate::{Rejection, validate};
