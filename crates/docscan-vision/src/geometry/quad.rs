// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Four-corner approximation of a convex hull.

use docscan_core::{Point, Quadrilateral};

/// Reduce a convex hull to four corners.
///
/// A hull of exactly four points is taken as-is. Larger hulls use the
/// extremes of x+y and x−y: top-left minimises x+y, bottom-right maximises
/// it, top-right maximises x−y and bottom-left minimises it. This only suits
/// roughly upright, document-like outlines; it is not a general polygon
/// simplification. Hulls with fewer than four points cannot form a
/// quadrilateral.
pub fn fit_quadrilateral(hull: &[Point]) -> Option<Quadrilateral> {
    match hull.len() {
        0..=3 => None,
        4 => Some(Quadrilateral::new([hull[0], hull[1], hull[2], hull[3]])),
        _ => {
            let (mut tl, mut tr, mut br, mut bl) = (hull[0], hull[0], hull[0], hull[0]);
            for &p in &hull[1..] {
                if p.x + p.y < tl.x + tl.y {
                    tl = p;
                }
                if p.x + p.y > br.x + br.y {
                    br = p;
                }
                if p.x - p.y > tr.x - tr.y {
                    tr = p;
                }
                if p.x - p.y < bl.x - bl.y {
                    bl = p;
                }
            }
            Some(Quadrilateral::new([tl, tr, br, bl]))
        }
    }
}
