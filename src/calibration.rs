//! Physical scale calibration.
//!
//! The interpupillary distance is the only physical anchor available: eye
//! centres are measured in detector units and pinned to a population-average
//! IPD in millimetres, which yields a mm-per-unit scale factor.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::landmarks::indices;
use crate::types::{LandmarkAccess, Landmarks, Point3};

/// Population-average adult IPD in millimetres.
pub const DEFAULT_REFERENCE_IPD_MM: f64 = 63.0;

/// Floor applied to the measured IPD before dividing.
pub const IPD_EPSILON: f64 = 1e-6;

/// Normalized IPD range considered geometrically plausible.
pub const PLAUSIBLE_IPD_MIN: f64 = 0.08;
pub const PLAUSIBLE_IPD_MAX: f64 = 0.35;

/// Normalized IPD at which confidence saturates.
pub const FULL_CONFIDENCE_IPD: f64 = 0.15;

/// Confidence reported for implausible detections.
pub const LOW_CONFIDENCE: f64 = 0.3;

/// Scale and centring transform from detector space to millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Millimetres per normalized unit. Always finite and positive.
    pub scale_factor: f64,
    /// Eye-centre distance in normalized units.
    pub normalized_ipd: f64,
    pub reference_ipd_mm: f64,
    /// Mean of all landmarks.
    pub centroid: Point3,
    /// 0..1; low values mean millimetre figures are unreliable.
    pub confidence: f64,
}

impl Calibration {
    /// Calibrate from a detection.
    ///
    /// Fails only when the canthus landmarks are missing from a partial
    /// detection. A degenerate IPD is floored, never an error; it surfaces
    /// through `confidence` instead.
    pub fn from_landmarks(landmarks: &Landmarks, reference_ipd_mm: f64) -> Result<Self> {
        let (left, right) = eye_centers(landmarks)?;
        let normalized_ipd = left.distance(&right);
        let scale_factor = reference_ipd_mm / normalized_ipd.max(IPD_EPSILON);
        let confidence = confidence_for(normalized_ipd);

        if confidence <= LOW_CONFIDENCE {
            warn!(
                normalized_ipd,
                confidence, "implausible eye distance, metric scale unreliable"
            );
        }

        Ok(Self {
            scale_factor,
            normalized_ipd,
            reference_ipd_mm,
            centroid: landmarks.centroid(),
            confidence,
        })
    }

    /// Whether millimetre measurements can be taken at face value.
    pub fn is_reliable(&self) -> bool {
        self.confidence > LOW_CONFIDENCE
    }
}

/// Left and right eye centres: midpoint of each eye's inner and outer canthus.
pub fn eye_centers<L: LandmarkAccess + ?Sized>(landmarks: &L) -> Result<(Point3, Point3)> {
    let left = landmarks
        .require(indices::EYE_LEFT_INNER)?
        .midpoint(&landmarks.require(indices::EYE_LEFT_OUTER)?);
    let right = landmarks
        .require(indices::EYE_RIGHT_INNER)?
        .midpoint(&landmarks.require(indices::EYE_RIGHT_OUTER)?);
    Ok((left, right))
}

/// Confidence heuristic over the normalized IPD.
pub fn confidence_for(normalized_ipd: f64) -> f64 {
    if (PLAUSIBLE_IPD_MIN..=PLAUSIBLE_IPD_MAX).contains(&normalized_ipd) {
        (normalized_ipd / FULL_CONFIDENCE_IPD).min(1.0)
    } else {
        LOW_CONFIDENCE
    }
}
