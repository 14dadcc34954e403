// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry stages — contour tracing over the edge mask, convex hull, and
// four-corner fitting.

pub mod contour;
pub mod hull;
pub mod quad;

pub use contour::{TraceOptions, TraceOutput, trace_contours};
pub use hull::convex_hull;
pub use quad::fit_quadrilateral;
