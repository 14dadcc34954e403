// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pick one quadrilateral out of the accepted candidates for a frame.

use docscan_core::Quadrilateral;

/// Return the largest-area candidate.
///
/// The sort is stable, so among equal areas the earliest discovered wins.
pub fn select_best(mut candidates: Vec<Quadrilateral>) -> Option<Quadrilateral> {
    candidates.sort_by(|a, b| b.area().total_cmp(&a.area()));
    candidates.into_iter().next()
}
