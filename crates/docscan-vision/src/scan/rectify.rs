// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — map a detected document outline (or a centre
// crop when nothing was detected) onto a fixed-size upright page.

use docscan_core::error::{Result, ScanError};
use docscan_core::{
    Channels, PixelBuffer, Quadrilateral, RectifyConfig, RectifyMode, output_height,
};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument, warn};

use crate::convert::{from_rgba_image, to_rgba_image};

/// Upper bound on output pixels, so a pathological aspect ratio cannot ask
/// for a multi-gigabyte allocation.
const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

/// Outlines smaller than this (in square pixels) have no usable projection.
const MIN_PROJECTIVE_AREA: f64 = 1e-6;

/// Produces upright page images from camera frames.
#[derive(Debug, Clone, Default)]
pub struct Rectifier {
    config: RectifyConfig,
}

impl Rectifier {
    pub fn new(config: RectifyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RectifyConfig {
        &self.config
    }

    /// Rectify `frame` using `quad`, or a centre crop when `quad` is `None`.
    ///
    /// The output is always `target_width` x `target_width / aspect_ratio`
    /// (rounded) RGBA. Destination pixels whose source lies outside the
    /// frame stay fully transparent black.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnsupportedChannels`] for a non-RGBA frame and
    /// [`ScanError::InvalidInput`] for an unusable output size.
    #[instrument(skip_all, fields(
        width = frame.width(),
        height = frame.height(),
        detected = quad.is_some(),
        mode = ?self.config.mode
    ))]
    pub fn rectify(&self, frame: &PixelBuffer, quad: Option<Quadrilateral>) -> Result<PixelBuffer> {
        frame.require(Channels::Rgba)?;
        let (out_w, out_h) = self.output_size()?;

        let source = match quad {
            Some(quad) => quad.ordered(),
            None => {
                warn!("No detection available; using centre crop");
                fallback_crop(
                    frame.width(),
                    frame.height(),
                    self.config.aspect_ratio,
                    self.config.fallback_margin,
                )
            }
        };
        debug!(
            top_left = ?source.corners[0],
            top_right = ?source.corners[1],
            bottom_right = ?source.corners[2],
            bottom_left = ?source.corners[3],
            "Source corners"
        );

        let output = match self.config.mode {
            RectifyMode::Bilinear => bilinear_warp(frame, &source, out_w, out_h)?,
            RectifyMode::Homography => match homography_warp(frame, &source, out_w, out_h)? {
                Some(output) => output,
                None => {
                    warn!("Corners admit no projective transform; using bilinear blend");
                    bilinear_warp(frame, &source, out_w, out_h)?
                }
            },
        };

        info!(out_w, out_h, "Capture rectified");
        Ok(output)
    }

    fn output_size(&self) -> Result<(u32, u32)> {
        let RectifyConfig {
            target_width,
            aspect_ratio,
            ..
        } = self.config;
        if target_width == 0 {
            return Err(ScanError::InvalidInput("target width must be at least 1".into()));
        }
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(ScanError::InvalidInput(format!(
                "aspect ratio must be positive, got {}",
                aspect_ratio
            )));
        }
        let target_height = output_height(target_width, aspect_ratio);
        let pixels = target_width as u64 * target_height as u64;
        if target_height == 0 || pixels > MAX_OUTPUT_PIXELS {
            return Err(ScanError::InvalidInput(format!(
                "output of {}x{} is out of range",
                target_width, target_height
            )));
        }
        Ok((target_width, target_height))
    }
}

/// Rectify with default settings apart from output width and aspect ratio.
pub fn rectify(
    frame: &PixelBuffer,
    quad: Option<Quadrilateral>,
    target_width: u32,
    aspect_ratio: f64,
) -> Result<PixelBuffer> {
    Rectifier::new(RectifyConfig {
        target_width,
        aspect_ratio,
        ..RectifyConfig::default()
    })
    .rectify(frame, quad)
}

/// Centred crop of a `width` x `height` frame at `aspect_ratio`, as large as
/// fits after reserving `margin` (a fraction) on each side.
pub fn fallback_crop(width: u32, height: u32, aspect_ratio: f64, margin: f64) -> Quadrilateral {
    let avail_w = width as f64 * (1.0 - 2.0 * margin);
    let avail_h = height as f64 * (1.0 - 2.0 * margin);
    let (crop_w, crop_h) = if avail_h > 0.0 && avail_w / avail_h > aspect_ratio {
        (avail_h * aspect_ratio, avail_h)
    } else {
        (avail_w, avail_w / aspect_ratio)
    };
    Quadrilateral::from_rect(
        (width as f64 - crop_w) / 2.0,
        (height as f64 - crop_h) / 2.0,
        crop_w,
        crop_h,
    )
}

/// Nearest-neighbour sampling through a bilinear blend of the four corners.
///
/// For destination `(x, y)` with `u = x / W` and `v = y / H`, the source
/// point is `TL(1-u)(1-v) + TR·u(1-v) + BR·uv + BL(1-u)v`. This is not a
/// true homography; it suits gently skewed outlines.
fn bilinear_warp(
    frame: &PixelBuffer,
    quad: &Quadrilateral,
    out_w: u32,
    out_h: u32,
) -> Result<PixelBuffer> {
    let mut out = PixelBuffer::blank(out_w, out_h, Channels::Rgba)?;
    let [tl, tr, br, bl] = quad.corners;
    let src = frame.as_bytes();
    let dst = out.as_bytes_mut();
    let src_stride = frame.width() as usize * 4;

    for y in 0..out_h {
        let v = y as f64 / out_h as f64;
        for x in 0..out_w {
            let u = x as f64 / out_w as f64;
            let w_tl = (1.0 - u) * (1.0 - v);
            let w_tr = u * (1.0 - v);
            let w_br = u * v;
            let w_bl = (1.0 - u) * v;
            let sx = tl.x * w_tl + tr.x * w_tr + br.x * w_br + bl.x * w_bl;
            let sy = tl.y * w_tl + tr.y * w_tr + br.y * w_br + bl.y * w_bl;

            let Some((px, py)) = source_pixel(sx, sy, frame.width(), frame.height()) else {
                continue;
            };
            let s = py * src_stride + px * 4;
            let d = (y as usize * out_w as usize + x as usize) * 4;
            dst[d..d + 4].copy_from_slice(&src[s..s + 4]);
        }
    }
    Ok(out)
}

/// Round a source coordinate to a pixel, or `None` if it falls outside the
/// frame (or is not a number).
fn source_pixel(sx: f64, sy: f64, width: u32, height: u32) -> Option<(usize, usize)> {
    let (rx, ry) = (sx.round(), sy.round());
    let inside = rx >= 0.0 && ry >= 0.0 && rx < width as f64 && ry < height as f64;
    inside.then_some((rx as usize, ry as usize))
}

/// Full projective warp via `imageproc`. `None` when the corners are
/// degenerate and no projection exists.
fn homography_warp(
    frame: &PixelBuffer,
    quad: &Quadrilateral,
    out_w: u32,
    out_h: u32,
) -> Result<Option<PixelBuffer>> {
    let area = quad.area();
    if area.is_nan() || area <= MIN_PROJECTIVE_AREA {
        return Ok(None);
    }

    let corner = |i: usize| (quad.corners[i].x as f32, quad.corners[i].y as f32);
    let src = [corner(0), corner(1), corner(2), corner(3)];
    let (w, h) = (out_w as f32, out_h as f32);
    let dest = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];

    let Some(projection) = Projection::from_control_points(src, dest) else {
        return Ok(None);
    };

    let input = to_rgba_image(frame)?;
    let mut output = RgbaImage::new(out_w, out_h);
    warp_into(
        &input,
        &projection,
        Interpolation::Nearest,
        Rgba([0u8, 0, 0, 0]),
        &mut output,
    );
    from_rgba_image(output).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::{A4_ASPECT_RATIO, Point};

    /// Frame where R encodes x and G encodes y.
    fn coordinate_frame(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        PixelBuffer::rgba(width, height, data).unwrap()
    }

    #[test]
    fn output_size_is_fixed_on_both_paths() {
        let frame = coordinate_frame(200, 150);
        let quad = Quadrilateral::from_rect(20.0, 10.0, 120.0, 110.0);
        for q in [Some(quad), None] {
            let out = rectify(&frame, q, 800, A4_ASPECT_RATIO).unwrap();
            assert_eq!(out.dimensions(), (800, 1131));
            assert_eq!(out.channels(), Channels::Rgba);
        }
    }

    #[test]
    fn detected_quad_maps_top_left_corner() {
        let frame = coordinate_frame(200, 200);
        // Corners deliberately scrambled; rectify must reorder them.
        let quad = Quadrilateral::new([
            Point::new(150.0, 160.0),
            Point::new(30.0, 20.0),
            Point::new(30.0, 160.0),
            Point::new(150.0, 20.0),
        ]);
        let out = rectify(&frame, Some(quad), 120, 120.0 / 140.0).unwrap();
        assert_eq!(out.pixel(0, 0), Some(&[30u8, 20, 0, 255][..]));
        // Halfway across and down: (90, 90).
        assert_eq!(out.pixel(60, 70), Some(&[90u8, 90, 0, 255][..]));
    }

    #[test]
    fn fallback_crop_stays_inside_margin() {
        let frame = coordinate_frame(200, 200);
        let out = rectify(&frame, None, 800, A4_ASPECT_RATIO).unwrap();
        // Crop is 113.1 x 160 at (43.4, 20).
        assert_eq!(out.pixel(0, 0), Some(&[43u8, 20, 0, 255][..]));
        for px in out.as_bytes().chunks_exact(4) {
            assert!((20..=180).contains(&px[0]), "x {}", px[0]);
            assert!((20..=180).contains(&px[1]), "y {}", px[1]);
        }
    }

    #[test]
    fn fallback_crop_is_centred() {
        let crop = fallback_crop(1000, 500, 2.0, 0.1);
        let [tl, tr, br, bl] = crop.corners;
        assert_eq!(tl, Point::new(100.0, 50.0));
        assert_eq!(br, Point::new(900.0, 450.0));
        assert_eq!(tr.y, tl.y);
        assert_eq!(bl.x, tl.x);
    }

    #[test]
    fn collapsed_quad_samples_one_pixel() {
        let frame = coordinate_frame(50, 50);
        let quad = Quadrilateral::new([Point::new(12.0, 34.0); 4]);
        let out = rectify(&frame, Some(quad), 40, 0.5).unwrap();
        assert_eq!(out.dimensions(), (40, 80));
        for px in out.as_bytes().chunks_exact(4) {
            assert_eq!(px, [12, 34, 0, 255]);
        }
    }

    #[test]
    fn out_of_frame_samples_stay_blank() {
        let frame = PixelBuffer::rgba(20, 20, [255u8; 4].repeat(400)).unwrap();
        let quad = Quadrilateral::from_rect(-50.0, -50.0, 100.0, 100.0);
        let out = rectify(&frame, Some(quad), 100, 1.0).unwrap();
        assert_eq!(out.pixel(0, 0), Some(&[0u8, 0, 0, 0][..]));
        assert_eq!(out.pixel(50, 50), Some(&[255u8; 4][..]));
    }

    #[test]
    fn bad_output_geometry_is_invalid_input() {
        let frame = coordinate_frame(10, 10);
        for (w, aspect) in [(0, 1.0), (10, 0.0), (10, f64::NAN), (10, -2.0), (1, 10.0)] {
            assert!(matches!(
                rectify(&frame, None, w, aspect),
                Err(ScanError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn luma_frame_is_rejected() {
        let frame = PixelBuffer::blank(10, 10, Channels::Luma).unwrap();
        assert!(matches!(
            rectify(&frame, None, 10, 1.0),
            Err(ScanError::UnsupportedChannels { .. })
        ));
    }

    #[test]
    fn empty_frame_falls_back_without_panicking() {
        let frame = PixelBuffer::blank(0, 0, Channels::Rgba).unwrap();
        let out = rectify(&frame, None, 8, 1.0).unwrap();
        assert!(out.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn homography_mode_keeps_left_and_right() {
        let mut data = Vec::with_capacity(100 * 100 * 4);
        for _y in 0..100 {
            for x in 0..100 {
                let px = if x < 50 { [255, 0, 0, 255] } else { [0, 0, 255, 255] };
                data.extend_from_slice(&px);
            }
        }
        let frame = PixelBuffer::rgba(100, 100, data).unwrap();
        let rectifier = Rectifier::new(RectifyConfig {
            target_width: 100,
            aspect_ratio: 1.0,
            mode: RectifyMode::Homography,
            ..RectifyConfig::default()
        });
        let quad = Quadrilateral::from_rect(10.0, 10.0, 80.0, 80.0);
        let out = rectifier.rectify(&frame, Some(quad)).unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.pixel(10, 50), Some(&[255u8, 0, 0, 255][..]));
        assert_eq!(out.pixel(90, 50), Some(&[0u8, 0, 255, 255][..]));
    }

    #[test]
    fn homography_mode_survives_collapsed_quad() {
        let frame = coordinate_frame(30, 30);
        let rectifier = Rectifier::new(RectifyConfig {
            target_width: 16,
            aspect_ratio: 1.0,
            mode: RectifyMode::Homography,
            ..RectifyConfig::default()
        });
        let quad = Quadrilateral::new([Point::new(3.0, 4.0); 4]);
        let out = rectifier.rectify(&frame, Some(quad)).unwrap();
        assert_eq!(out.dimensions(), (16, 16));
        assert_eq!(out.pixel(5, 5), Some(&[3u8, 4, 0, 255][..]));
    }
}
