// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session — gates the periodic detector so overlapping passes are
// dropped, and keeps the latest detection for the capture path.
//
// The camera collaborator calls `try_detect` on its own cadence; the shutter
// calls `capture` whenever the user asks. Capture never waits for an
// in-flight pass and may see a detection one tick old.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use docscan_core::error::Result;
use docscan_core::{DetectionResult, PixelBuffer, Quadrilateral, ScanConfig};
use tracing::{debug, info, instrument};

use crate::detect::DocumentDetector;
use crate::scan::enhance::enhance_with;
use crate::scan::rectify::Rectifier;

/// What happened to one detection tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectOutcome {
    /// Another pass was still running; this tick was dropped.
    Skipped,
    /// The pass ran to completion.
    Completed(DetectionResult),
}

/// Detector, rectifier, and the single "last known detection" slot.
///
/// `ScanSession` is `Send + Sync`; share it behind an `Arc` between the
/// frame loop and the capture handler.
#[derive(Debug)]
pub struct ScanSession {
    config: ScanConfig,
    detector: DocumentDetector,
    rectifier: Rectifier,
    in_flight: AtomicBool,
    last: Mutex<Option<Quadrilateral>>,
}

/// Clears the in-flight flag when the pass ends, however it ends.
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ScanSession {
    /// Build a session after checking the configuration.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: DocumentDetector::new(config.detection),
            rectifier: Rectifier::new(config.rectify),
            config,
            in_flight: AtomicBool::new(false),
            last: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run one detection pass unless one is already running.
    ///
    /// A found outline replaces the stored detection; a pass that finds
    /// nothing leaves the previous one in place.
    #[instrument(skip_all)]
    pub fn try_detect(&self, frame: &PixelBuffer) -> Result<DetectOutcome> {
        let Some(_guard) = self.begin_pass() else {
            debug!("Detection pass still in flight; dropping tick");
            return Ok(DetectOutcome::Skipped);
        };

        let result = self.detector.detect(frame)?;
        if let Some(quad) = result {
            *self.slot() = Some(quad);
        }
        Ok(DetectOutcome::Completed(result))
    }

    /// Most recent detection, if any.
    pub fn last_detection(&self) -> DetectionResult {
        *self.slot()
    }

    /// Remove and return the most recent detection.
    pub fn take_detection(&self) -> DetectionResult {
        self.slot().take()
    }

    /// Forget the stored detection.
    pub fn clear(&self) {
        *self.slot() = None;
    }

    /// Rectify and tone-adjust `frame` using the latest detection, falling
    /// back to the centre crop when there is none.
    ///
    /// A successful capture consumes the detection it used. On error the
    /// slot is left untouched.
    #[instrument(skip_all)]
    pub fn capture(&self, frame: &PixelBuffer) -> Result<PixelBuffer> {
        let quad = self.last_detection();
        let tone = if quad.is_some() {
            &self.config.detected_tone
        } else {
            &self.config.fallback_tone
        };
        let page = self.rectifier.rectify(frame, quad)?;
        if quad.is_some() {
            let mut slot = self.slot();
            // A newer pass may have landed while rectifying; keep it.
            if *slot == quad {
                *slot = None;
            }
        }
        info!(detected = quad.is_some(), "Capture complete");
        Ok(enhance_with(&page, tone))
    }

    fn begin_pass(&self) -> Option<PassGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| PassGuard(&self.in_flight))
    }

    /// The slot holds plain data, so a poisoned lock is still usable.
    fn slot(&self) -> MutexGuard<'_, Option<Quadrilateral>> {
        self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
