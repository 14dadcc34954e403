// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sobel gradient magnitude, thresholded into a binary edge mask.

use docscan_core::error::Result;
use docscan_core::{Channels, PixelBuffer};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use super::EDGE_ON;
use crate::convert::to_gray_image;

/// Mark interior pixels whose gradient magnitude `sqrt(Gx² + Gy²)` exceeds
/// `threshold` as [`EDGE_ON`]; everything else, border included, is 0.
pub fn sobel_edges(smoothed: &PixelBuffer, threshold: f64) -> Result<PixelBuffer> {
    smoothed.require(Channels::Luma)?;
    let (width, height) = smoothed.dimensions();
    let mut out = vec![0u8; smoothed.pixel_count()];
    if width < 3 || height < 3 {
        return PixelBuffer::luma(width, height, out);
    }

    let gray = to_gray_image(smoothed)?;
    let gx = horizontal_sobel(&gray);
    let gy = vertical_sobel(&gray);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let h = f64::from(gx.get_pixel(x, y)[0]);
            let v = f64::from(gy.get_pixel(x, y)[0]);
            if h.hypot(v) > threshold {
                out[(y * width + x) as usize] = EDGE_ON;
            }
        }
    }

    PixelBuffer::luma(width, height, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_input_has_no_edges() {
        let buf = PixelBuffer::luma(8, 8, vec![140; 64]).unwrap();
        let edges = sobel_edges(&buf, 50.0).unwrap();
        assert!(edges.as_bytes().iter().all(|&v| v == 0));
    }

    #[test]
    fn vertical_step_is_detected_on_both_sides() {
        // Columns 0..3 dark, 3..6 bright.
        let data: Vec<u8> = (0..36).map(|i| if i % 6 < 3 { 0 } else { 200 }).collect();
        let edges = sobel_edges(&PixelBuffer::luma(6, 6, data).unwrap(), 50.0).unwrap();
        let px = |x: usize, y: usize| edges.as_bytes()[y * 6 + x];
        for y in 1..5 {
            assert_eq!(px(2, y), EDGE_ON);
            assert_eq!(px(3, y), EDGE_ON);
            assert_eq!(px(1, y), 0);
            assert_eq!(px(4, y), 0);
        }
        // Border ring stays off.
        assert_eq!(px(2, 0), 0);
        assert_eq!(px(3, 5), 0);
    }

    #[test]
    fn threshold_is_strict() {
        // A step of 10 gives |Gx| = 40 exactly at the step.
        let data: Vec<u8> = (0..9).map(|i| if i % 3 == 2 { 10 } else { 0 }).collect();
        let buf = PixelBuffer::luma(3, 3, data).unwrap();
        assert_eq!(sobel_edges(&buf, 40.0).unwrap().as_bytes()[4], 0);
        assert_eq!(sobel_edges(&buf, 39.9).unwrap().as_bytes()[4], EDGE_ON);
    }

    #[test]
    fn magnitude_combines_both_gradients() {
        // Lone corner pixel: Gx = Gy = 10 at the centre, magnitude 14.14.
        let mut data = vec![0u8; 9];
        data[8] = 10;
        let buf = PixelBuffer::luma(3, 3, data).unwrap();
        assert_eq!(sobel_edges(&buf, 14.0).unwrap().as_bytes()[4], EDGE_ON);
        assert_eq!(sobel_edges(&buf, 14.2).unwrap().as_bytes()[4], 0);
    }
}
