// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// RGBA to single-channel luminance.

use docscan_core::error::Result;
use docscan_core::{Channels, PixelBuffer};

const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Convert a frame to luminance using the standard luma weights
/// `0.299*R + 0.587*G + 0.114*B`. Alpha is ignored.
///
/// A buffer that is already single-channel is returned as a copy.
pub fn grayscale(frame: &PixelBuffer) -> Result<PixelBuffer> {
    match frame.channels() {
        Channels::Luma => Ok(frame.clone()),
        Channels::Rgba => {
            let luma = frame
                .as_bytes()
                .chunks_exact(4)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect();
            PixelBuffer::luma(frame.width(), frame.height(), luma)
        }
    }
}

/// Luminance of a single RGB triple, rounded to nearest.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64;
    y.round().clamp(0.0, 255.0) as u8
}
