// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interop between `PixelBuffer` and the `image` crate's buffer types, for
// collaborators that decode or display frames with `image`.

use docscan_core::error::{Result, ScanError};
use docscan_core::{Channels, PixelBuffer};
use image::{DynamicImage, GrayImage, RgbaImage};

/// Take ownership of an RGBA image's pixels.
pub fn from_rgba_image(image: RgbaImage) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    PixelBuffer::rgba(width, height, image.into_raw())
}

/// Take ownership of a grayscale image's pixels.
pub fn from_gray_image(image: GrayImage) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    PixelBuffer::luma(width, height, image.into_raw())
}

/// Convert any decoded image to an RGBA frame.
pub fn from_dynamic(image: &DynamicImage) -> Result<PixelBuffer> {
    from_rgba_image(image.to_rgba8())
}

/// Copy an RGBA buffer into an `RgbaImage`.
pub fn to_rgba_image(buffer: &PixelBuffer) -> Result<RgbaImage> {
    buffer.require(Channels::Rgba)?;
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec())
        .ok_or_else(|| ScanError::ImageError("RGBA buffer does not fit its dimensions".into()))
}

/// Copy a single-channel buffer into a `GrayImage`.
pub fn to_gray_image(buffer: &PixelBuffer) -> Result<GrayImage> {
    buffer.require(Channels::Luma)?;
    GrayImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec())
        .ok_or_else(|| ScanError::ImageError("luma buffer does not fit its dimensions".into()))
}
