// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// 3x3 Gaussian smoothing of a luminance buffer.

use docscan_core::error::Result;
use docscan_core::{Channels, PixelBuffer};
use image::GrayImage;
use imageproc::filter::Kernel;

use crate::convert::{from_gray_image, to_gray_image};

/// Row-major 3x3 kernel; weights sum to [`KERNEL_SUM`].
const KERNEL: [u32; 9] = [1, 2, 1, 2, 4, 2, 1, 2, 1];
const KERNEL_SUM: u32 = 16;

/// Convolve every interior pixel with the 3x3 Gaussian kernel.
///
/// The one-pixel border ring keeps the input values. Buffers narrower or
/// shorter than three pixels have no interior and are returned unchanged.
pub fn gaussian_blur(gray: &PixelBuffer) -> Result<PixelBuffer> {
    gray.require(Channels::Luma)?;
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return Ok(gray.clone());
    }

    let src = to_gray_image(gray)?;
    let kernel = Kernel::new(&KERNEL, 3, 3);
    let mut out: GrayImage = kernel.filter(&src, |channel: &mut u8, acc: u32| {
        *channel = ((acc + KERNEL_SUM / 2) / KERNEL_SUM) as u8;
    });

    for x in 0..width {
        for y in [0, height - 1] {
            out.put_pixel(x, y, *src.get_pixel(x, y));
        }
    }
    for y in 1..height - 1 {
        for x in [0, width - 1] {
            out.put_pixel(x, y, *src.get_pixel(x, y));
        }
    }

    from_gray_image(out)
}
