// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the docscan pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channels {
    /// One byte per pixel: luminance or a binary edge mask.
    Luma,
    /// Four bytes per pixel, interleaved R, G, B, A.
    Rgba,
}

impl Channels {
    /// Bytes per pixel for this layout.
    pub fn count(self) -> usize {
        match self {
            Self::Luma => 1,
            Self::Rgba => 4,
        }
    }
}

impl std::fmt::Display for Channels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Luma => write!(f, "Luma8"),
            Self::Rgba => write!(f, "Rgba8"),
        }
    }
}

/// An owned, row-major 8-bit image buffer.
///
/// The data length always equals `width * height * channels.count()`; the
/// constructors refuse anything else, so stages can index without bounds
/// surprises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw bytes, checking that the length matches the dimensions.
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        let expected = expected_len(width, height, channels)?;
        if data.len() != expected {
            return Err(ScanError::InvalidInput(format!(
                "{}x{} {} buffer needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Allocate a zero-filled buffer.
    pub fn blank(width: u32, height: u32, channels: Channels) -> Result<Self> {
        let len = expected_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0; len],
        })
    }

    /// Shorthand for an RGBA buffer.
    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::Rgba, data)
    }

    /// Shorthand for a single-channel buffer.
    pub fn luma(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Channels::Luma, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of the first channel of pixel `(x, y)`.
    ///
    /// Callers must keep `x < width` and `y < height`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels.count()
    }

    /// Channel bytes of pixel `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        Some(&self.data[start..start + self.channels.count()])
    }

    /// Fail with [`ScanError::UnsupportedChannels`] unless the layout matches.
    pub fn require(&self, channels: Channels) -> Result<()> {
        if self.channels == channels {
            Ok(())
        } else {
            Err(ScanError::UnsupportedChannels {
                expected: channels,
                actual: self.channels,
            })
        }
    }
}

fn expected_len(width: u32, height: u32, channels: Channels) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels.count()))
        .ok_or_else(|| {
            ScanError::InvalidInput(format!("{}x{} buffer size overflows", width, height))
        })
}

/// A point in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x as f64, y as f64)
    }
}

/// Connected edge pixels in discovery order. Not necessarily a closed loop.
pub type Contour = Vec<Point>;

/// Four corner points of a candidate document outline.
///
/// The stored order is whatever produced the quad (hull order, fitter
/// order). Call [`Quadrilateral::ordered`] before anything that relies on
/// corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    pub corners: [Point; 4],
}

impl Quadrilateral {
    pub const fn new(corners: [Point; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle with its top-left corner at `(x, y)`.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Reorder to `[top_left, top_right, bottom_right, bottom_left]`.
    ///
    /// Top-left minimises x+y, bottom-right maximises it; top-right maximises
    /// x−y and bottom-left minimises it. Ties keep the earliest corner.
    pub fn ordered(&self) -> Self {
        let sum = |p: &Point| p.x + p.y;
        let diff = |p: &Point| p.x - p.y;
        Self::new([
            extreme(&self.corners, sum, false),
            extreme(&self.corners, diff, true),
            extreme(&self.corners, sum, true),
            extreme(&self.corners, diff, false),
        ])
    }

    /// Polygon area via the shoelace formula (absolute value).
    pub fn area(&self) -> f64 {
        let mut twice = 0.0;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            twice += a.x * b.y - b.x * a.y;
        }
        twice.abs() / 2.0
    }

    /// Interior angle at each vertex in degrees, in corner order.
    ///
    /// Returns `None` if any edge has zero length, since the angle at its
    /// endpoints is undefined.
    pub fn interior_angles(&self) -> Option<[f64; 4]> {
        let mut angles = [0.0; 4];
        for (i, angle) in angles.iter_mut().enumerate() {
            let here = self.corners[i];
            let prev = self.corners[(i + 3) % 4];
            let next = self.corners[(i + 1) % 4];
            let (ax, ay) = (prev.x - here.x, prev.y - here.y);
            let (bx, by) = (next.x - here.x, next.y - here.y);
            let norms = ax.hypot(ay) * bx.hypot(by);
            if norms.is_nan() || norms <= f64::EPSILON {
                return None;
            }
            let cos = ((ax * bx + ay * by) / norms).clamp(-1.0, 1.0);
            *angle = cos.acos().to_degrees();
        }
        Some(angles)
    }
}

/// First point minimising (or maximising) `key`; ties keep the earliest.
fn extreme(points: &[Point; 4], key: impl Fn(&Point) -> f64, want_max: bool) -> Point {
    let mut best = points[0];
    for p in &points[1..] {
        let better = if want_max {
            key(p) > key(&best)
        } else {
            key(p) < key(&best)
        };
        if better {
            best = *p;
        }
    }
    best
}

/// Outcome of one detection pass: `None` means no document this frame.
pub type DetectionResult = Option<Quadrilateral>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_buffer_rejects_length_mismatch() {
        let err = PixelBuffer::rgba(4, 4, vec![0; 63]).unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)));
        assert!(PixelBuffer::luma(4, 4, vec![0; 16]).is_ok());
    }

    #[test]
    fn into_bytes_returns_the_backing_storage() {
        let data: Vec<u8> = (0..12).collect();
        let buf = PixelBuffer::luma(4, 3, data.clone()).unwrap();
        assert_eq!(buf.into_bytes(), data);
    }

    #[test]
    fn pixel_lookup_respects_bounds() {
        let mut buf = PixelBuffer::blank(3, 2, Channels::Rgba).unwrap();
        let off = buf.offset(2, 1);
        buf.as_bytes_mut()[off..off + 4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(buf.pixel(2, 1), Some(&[1u8, 2, 3, 4][..]));
        assert_eq!(buf.pixel(3, 1), None);
        assert_eq!(buf.pixel(0, 2), None);
    }

    #[test]
    fn require_reports_both_layouts() {
        let buf = PixelBuffer::blank(1, 1, Channels::Luma).unwrap();
        match buf.require(Channels::Rgba) {
            Err(ScanError::UnsupportedChannels { expected, actual }) => {
                assert_eq!(expected, Channels::Rgba);
                assert_eq!(actual, Channels::Luma);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ordered_recovers_positions_from_any_rotation() {
        let rect = Quadrilateral::from_rect(10.0, 20.0, 100.0, 50.0);
        let scrambled = Quadrilateral::new([
            rect.corners[2],
            rect.corners[0],
            rect.corners[3],
            rect.corners[1],
        ]);
        assert_eq!(scrambled.ordered(), rect);
    }

    #[test]
    fn shoelace_area_of_rectangle() {
        let rect = Quadrilateral::from_rect(0.0, 0.0, 10.0, 5.0);
        assert!((rect.area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rectangle_angles_are_right_angles() {
        let angles = Quadrilateral::from_rect(3.0, 4.0, 20.0, 7.0)
            .interior_angles()
            .unwrap();
        for a in angles {
            assert!((a - 90.0).abs() < 1e-9, "angle {}", a);
        }
    }

    #[test]
    fn collapsed_quad_has_no_angles() {
        let p = Point::new(5.0, 5.0);
        let quad = Quadrilateral::new([p; 4]);
        assert_eq!(quad.area(), 0.0);
        assert!(quad.interior_angles().is_none());
    }
}
