// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for scanner errors, for the capture UI to show.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Retrying with the next frame is likely to work.
    Transient,
    /// Something in the app setup must change (settings, integration).
    ActionRequired,
    /// The input can never be processed as given.
    Permanent,
}

/// A plain-language error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the caller may simply retry on the next frame.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `ScanError` into something a person holding a phone can act on.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::InvalidInput(_) | ScanError::UnsupportedChannels { .. } => HumanError {
            message: "The camera picture couldn't be read.".into(),
            suggestion: "Hold the camera steady and try capturing again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::ImageError(detail) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: format!(
                "The image may be damaged or in an unusual format. Try another picture. ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Config(detail) => HumanError {
            message: "The scanner settings aren't valid.".into(),
            suggestion: format!("Reset the scanner settings to their defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::Serialization(_) => HumanError {
            message: "The saved scanner settings couldn't be loaded.".into(),
            suggestion: "Reset the scanner settings to their defaults.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
