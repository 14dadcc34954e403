// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Graham-scan convex hull over contour points.

use std::cmp::Ordering;

use docscan_core::Point;

/// Compute the convex hull of `points` with a Graham scan.
///
/// The pivot is the point with the largest y (smallest x on ties); the rest
/// are swept in polar-angle order around it and any turn that is not
/// strictly convex is popped. Fewer than three points are returned as-is.
/// Collinear points on hull edges are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let pivot = points
        .iter()
        .copied()
        .reduce(|best, p| {
            if p.y > best.y || (p.y == best.y && p.x < best.x) {
                p
            } else {
                best
            }
        })
        .unwrap_or_default();

    // Image y grows downwards, so with the pivot at the bottom these angles
    // run from -π (left) through -π/2 (up) to 0 (right).
    let mut rest: Vec<(f64, f64, Point)> = points
        .iter()
        .filter(|p| **p != pivot)
        .map(|p| {
            let (dx, dy) = (p.x - pivot.x, p.y - pivot.y);
            (dy.atan2(dx), dx * dx + dy * dy, *p)
        })
        .collect();
    rest.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });

    let mut hull: Vec<Point> = Vec::with_capacity(rest.len() + 1);
    hull.push(pivot);
    for (_, _, p) in rest {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Points collinear with the pivot on the final ray survive the sweep.
    while hull.len() >= 3 && cross(hull[hull.len() - 2], hull[hull.len() - 1], pivot) <= 0.0 {
        hull.pop();
    }
    hull
}

/// Cross product of OA × OB. Positive means a clockwise turn on screen
/// (y down), which is the convex direction for this sweep.
#[inline]
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}
