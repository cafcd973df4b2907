//! Bilateral symmetry by reflection across the sagittal line.
//!
//! The sagittal reference is the vertical line through the glabella. Head
//! yaw and roll are not compensated before reflecting, so a turned or tilted
//! head reads as asymmetry. Callers wanting pose-robust numbers should gate on
//! a frontal pose upstream.

use serde::{Deserialize, Serialize};

use crate::calibration::eye_centers;
use crate::error::{Error, Result};
use crate::landmarks::{indices, BilateralPair};
use crate::types::{LandmarkAccess, Point3};

/// Mirror `point` across the vertical line `x = sagittal_x`; y and z are kept.
pub fn reflect_across(point: Point3, sagittal_x: f64) -> Point3 {
    Point3::new(sagittal_x + (sagittal_x - point.x), point.y, point.z)
}

/// Distance between the reflected left point and the actual right point.
/// Zero for a perfectly mirrored pair.
pub fn distance_symmetry(left: Point3, right: Point3, sagittal_x: f64) -> f64 {
    reflect_across(left, sagittal_x).distance(&right)
}

/// Scale-invariant asymmetry: symmetry distance over interpupillary distance.
/// `None` when the IPD has collapsed.
pub fn asymmetry_index(distance: f64, ipd: f64) -> Option<f64> {
    (ipd > f64::EPSILON).then(|| distance / ipd)
}

/// Mean vertical offset `|left.y - right.y|` over the five reference pairs,
/// without reflection.
pub fn global_vertical_asymmetry<L: LandmarkAccess + ?Sized>(landmarks: &L) -> Result<f64> {
    let mut total = 0.0;
    for pair in BilateralPair::VERTICAL {
        let (l, r) = pair.indices();
        total += (landmarks.require(l)?.y - landmarks.require(r)?.y).abs();
    }
    Ok(total / BilateralPair::VERTICAL.len() as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSymmetry {
    pub pair: BilateralPair,
    pub distance: f64,
    pub asymmetry_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryReport {
    pub sagittal_x: f64,
    pub interpupillary_distance: f64,
    pub pairs: Vec<PairSymmetry>,
    pub mean_asymmetry_index: f64,
    /// Same units as the input landmarks.
    pub global_vertical_asymmetry: f64,
}

impl SymmetryReport {
    pub fn pair(&self, pair: BilateralPair) -> Option<&PairSymmetry> {
        self.pairs.iter().find(|p| p.pair == pair)
    }
}

/// Reflect every catalogued pair across the glabella line.
pub fn analyze_symmetry<L: LandmarkAccess + ?Sized>(landmarks: &L) -> Result<SymmetryReport> {
    let sagittal_x = landmarks.require(indices::GLABELLA)?.x;
    let (left_eye, right_eye) = eye_centers(landmarks)?;
    let ipd = left_eye.distance(&right_eye);

    let mut pairs = Vec::with_capacity(BilateralPair::ALL.len());
    for pair in BilateralPair::ALL {
        let (l, r) = pair.indices();
        let distance = distance_symmetry(landmarks.require(l)?, landmarks.require(r)?, sagittal_x);
        let index = asymmetry_index(distance, ipd).ok_or_else(|| {
            Error::DegenerateGeometry("interpupillary distance is zero".to_string())
        })?;
        pairs.push(PairSymmetry {
            pair,
            distance,
            asymmetry_index: index,
        });
    }

    let mean_asymmetry_index =
        pairs.iter().map(|p| p.asymmetry_index).sum::<f64>() / pairs.len() as f64;

    Ok(SymmetryReport {
        sagittal_x,
        interpupillary_distance: ipd,
        pairs,
        mean_asymmetry_index,
        global_vertical_asymmetry: global_vertical_asymmetry(landmarks)?,
    })
}
