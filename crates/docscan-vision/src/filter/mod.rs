// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel filters feeding the detector — luminance, smoothing, Sobel edges.

pub mod grayscale;
pub mod smooth;
pub mod sobel;

pub use grayscale::grayscale;
pub use smooth::gaussian_blur;
pub use sobel::sobel_edges;

/// Edge mask value for "on" pixels.
pub const EDGE_ON: u8 = 255;
