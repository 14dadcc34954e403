// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contrast and brightness adjustment for rectified captures.

use docscan_core::{Channels, PixelBuffer, ToneSettings};
use tracing::{debug, instrument};

/// Apply `out = clamp((in - 128) * contrast + 128 + brightness, 0, 255)` to
/// every colour channel. RGBA alpha is forced to 255.
///
/// Contrast 1 with brightness 0 leaves colour channels untouched.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn enhance(image: &PixelBuffer, contrast: f64, brightness: f64) -> PixelBuffer {
    let curve = tone_curve(contrast, brightness);
    let mut out = image.clone();

    match out.channels() {
        Channels::Luma => {
            for v in out.as_bytes_mut() {
                *v = curve[*v as usize];
            }
        }
        Channels::Rgba => {
            for px in out.as_bytes_mut().chunks_exact_mut(4) {
                px[0] = curve[px[0] as usize];
                px[1] = curve[px[1] as usize];
                px[2] = curve[px[2] as usize];
                px[3] = 255;
            }
        }
    }

    debug!("Tone adjustment applied");
    out
}

/// [`enhance`] with a settings bundle.
pub fn enhance_with(image: &PixelBuffer, tone: &ToneSettings) -> PixelBuffer {
    enhance(image, tone.contrast, tone.brightness)
}

/// Lookup table for one contrast/brightness pair. Non-finite results map
/// to 0 rather than propagating.
fn tone_curve(contrast: f64, brightness: f64) -> [u8; 256] {
    let mut curve = [0u8; 256];
    for (i, slot) in curve.iter_mut().enumerate() {
        let v = (i as f64 - 128.0) * contrast + 128.0 + brightness;
        *slot = if v.is_finite() {
            v.round().clamp(0.0, 255.0) as u8
        } else {
            0
        };
    }
    curve
}
