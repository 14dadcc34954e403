// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan — Core types, configuration, and error definitions shared across crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{
    A4_ASPECT_RATIO, DetectionConfig, RectifyConfig, RectifyMode, ScanConfig, ToneSettings,
    ValidationPolicy, output_height,
};
pub use error::ScanError;
pub use types::*;
