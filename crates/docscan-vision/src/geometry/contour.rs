// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour tracing: connected components of edge pixels, found by iterative
// 8-connected flood fill from a coarse grid of seeds.

use docscan_core::error::Result;
use docscan_core::{Channels, Contour, DetectionConfig, PixelBuffer, Point};
use tracing::debug;

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Seeding and size limits for [`trace_contours`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    /// Distance between seed candidates on each axis.
    pub seed_stride: u32,
    /// Seeds never start within this many pixels of the frame edge.
    pub seed_border: u32,
    /// Maximum stored points per contour.
    pub max_points: usize,
    /// Contours need strictly more points than this to be returned.
    pub min_points: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self::from(&DetectionConfig::default())
    }
}

impl From<&DetectionConfig> for TraceOptions {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            seed_stride: config.seed_stride.max(1),
            seed_border: config.seed_border,
            max_points: config.max_contour_points.max(1),
            min_points: config.min_contour_points,
        }
    }
}

/// Contours found in one pass, plus the work it took.
#[derive(Debug, Clone, Default)]
pub struct TraceOutput {
    /// Contours longer than the minimum, in seed order.
    pub contours: Vec<Contour>,
    /// Edge pixels popped off the fill stack over the whole pass.
    pub pixels_visited: usize,
}

/// Trace connected edge components in a binary edge mask.
///
/// Every "on" pixel is visited at most once per call thanks to a shared
/// visited mask, so total work is bounded by the pixel count regardless of
/// how many seeds land on the same component.
pub fn trace_contours(edges: &PixelBuffer, options: &TraceOptions) -> Result<TraceOutput> {
    edges.require(Channels::Luma)?;

    let (width, height) = edges.dimensions();
    let mask = edges.as_bytes();
    let mut visited = vec![false; mask.len()];
    let mut output = TraceOutput::default();
    let stride = options.seed_stride.max(1) as usize;
    let mut seeds = 0usize;

    let y_end = height.saturating_sub(options.seed_border);
    let x_end = width.saturating_sub(options.seed_border);
    for y in (options.seed_border..y_end).step_by(stride) {
        for x in (options.seed_border..x_end).step_by(stride) {
            let idx = y as usize * width as usize + x as usize;
            if visited[idx] || mask[idx] == 0 {
                continue;
            }
            seeds += 1;
            let (contour, visited_here) =
                flood_fill(mask, (width, height), (x, y), &mut visited, options);
            output.pixels_visited += visited_here;
            if contour.len() > options.min_points {
                output.contours.push(contour);
            }
        }
    }

    debug!(
        seeds,
        contours = output.contours.len(),
        pixels_visited = output.pixels_visited,
        "Contour trace complete"
    );
    Ok(output)
}

/// Collect the component containing `(x, y)`, marking it visited.
///
/// Pixels are marked when pushed, so none enters the stack twice. The whole
/// component is consumed even after the sample is full.
fn flood_fill(
    mask: &[u8],
    (width, height): (u32, u32),
    (x, y): (u32, u32),
    visited: &mut [bool],
    options: &TraceOptions,
) -> (Contour, usize) {
    let w = width as usize;
    let mut sample = ContourSample::new(options.max_points);
    let mut stack = vec![(x, y)];
    visited[y as usize * w + x as usize] = true;
    let mut popped = 0usize;

    while let Some((cx, cy)) = stack.pop() {
        popped += 1;
        sample.push(Point::from((cx, cy)));

        for (dx, dy) in NEIGHBOURS {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let idx = ny as usize * w + nx as usize;
            if !visited[idx] && mask[idx] != 0 {
                visited[idx] = true;
                stack.push((nx as u32, ny as u32));
            }
        }
    }

    (sample.points, popped)
}

/// Bounded, order-preserving sample of a component's pixels.
///
/// When full, every other stored point is dropped and the keep interval
/// doubles, so the sample stays spread over the whole component instead of
/// holding only its first `cap` pixels.
struct ContourSample {
    points: Vec<Point>,
    cap: usize,
    keep_every: usize,
    seen: usize,
}

impl ContourSample {
    fn new(cap: usize) -> Self {
        Self {
            points: Vec::with_capacity(cap.min(4096)),
            cap,
            keep_every: 1,
            seen: 0,
        }
    }

    fn push(&mut self, point: Point) {
        if self.seen % self.keep_every == 0 {
            if self.points.len() >= self.cap {
                let mut i = 0usize;
                self.points.retain(|_| {
                    let keep = i % 2 == 0;
                    i += 1;
                    keep
                });
                self.keep_every *= 2;
            }
            if self.seen % self.keep_every == 0 && self.points.len() < self.cap {
                self.points.push(point);
            }
        }
        self.seen += 1;
    }
}
