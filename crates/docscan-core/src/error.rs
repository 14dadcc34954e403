// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docscan.

use thiserror::Error;

use crate::types::Channels;

/// Top-level error type for all docscan operations.
///
/// "No document found" is never an error; detection returns `Ok(None)` for
/// that. Errors are reserved for malformed caller input.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Caller input --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported channel layout: expected {expected}, got {actual}")]
    UnsupportedChannels { expected: Channels, actual: Channels },

    // -- Interop --
    #[error("image conversion failed: {0}")]
    ImageError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
