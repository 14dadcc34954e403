// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometric acceptance test for candidate quadrilaterals.

use docscan_core::{Quadrilateral, ValidationPolicy};
use thiserror::Error;

/// Relative slack on the area bounds so a quad sitting exactly on a
/// boundary is not lost to float rounding.
const AREA_SLACK: f64 = 1e-9;

/// Why a candidate was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Rejection {
    #[error("quadrilateral is degenerate")]
    Degenerate,

    #[error("area {area:.0} is below the minimum {min:.0}")]
    AreaTooSmall { area: f64, min: f64 },

    #[error("area {area:.0} is above the maximum {max:.0}")]
    AreaTooLarge { area: f64, max: f64 },

    #[error("corner angle {angle:.1}° is more than {tolerance}° from square")]
    AngleOutOfTolerance { angle: f64, tolerance: f64 },
}

/// Accept `quad` if its area lies within the policy's fraction of the
/// `width` x `height` image (bounds inclusive) and every interior angle is
/// within the tolerance of 90°.
pub fn validate(
    quad: &Quadrilateral,
    width: u32,
    height: u32,
    policy: &ValidationPolicy,
) -> Result<(), Rejection> {
    let area = quad.area();
    if !area.is_finite() || area <= 0.0 {
        return Err(Rejection::Degenerate);
    }

    let image_area = width as f64 * height as f64;
    let min = image_area * policy.min_area_fraction;
    let max = image_area * policy.max_area_fraction;
    if area < min * (1.0 - AREA_SLACK) {
        return Err(Rejection::AreaTooSmall { area, min });
    }
    if area > max * (1.0 + AREA_SLACK) {
        return Err(Rejection::AreaTooLarge { area, max });
    }

    let angles = quad.interior_angles().ok_or(Rejection::Degenerate)?;
    for angle in angles {
        if (angle - 90.0).abs() > policy.angle_tolerance_deg {
            return Err(Rejection::AngleOutOfTolerance {
                angle,
                tolerance: policy.angle_tolerance_deg,
            });
        }
    }
    Ok(())
}
