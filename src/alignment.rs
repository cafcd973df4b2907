//! Rigid comparison of anchor shapes between two frames.
//!
//! Both anchor clouds are centred and the optimal rotation is found with the
//! Kabsch method, so residuals measure shape change only, not head motion.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metric::MetricLandmarks;

/// Anchors needed to fix a rotation in 3D.
pub const MIN_SHARED_ANCHORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorResidual {
    pub index: usize,
    /// Millimetres after alignment.
    pub residual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Root-mean-square residual in millimetres.
    pub rmsd: f64,
    pub max_residual: f64,
    pub residuals: Vec<AnchorResidual>,
}

/// Align `current` onto `reference` over the anchors both frames contain.
pub fn compare_anchor_shapes(
    reference: &MetricLandmarks,
    current: &MetricLandmarks,
) -> Result<AlignmentReport> {
    let pairs: Vec<(usize, Vector3<f64>, Vector3<f64>)> = reference
        .anchors()
        .filter_map(|r| {
            current
                .points
                .get(r.index)
                .filter(|c| c.is_anchor)
                .map(|c| (r.index, Vector3::from(r.position), Vector3::from(c.position)))
        })
        .collect();

    if pairs.len() < MIN_SHARED_ANCHORS {
        return Err(Error::InsufficientAnchors {
            found: pairs.len(),
            required: MIN_SHARED_ANCHORS,
        });
    }

    let n = pairs.len() as f64;
    let ref_centroid = pairs.iter().fold(Vector3::zeros(), |acc, p| acc + p.1) / n;
    let cur_centroid = pairs.iter().fold(Vector3::zeros(), |acc, p| acc + p.2) / n;

    // Cross-covariance of the centred clouds, current -> reference.
    let mut h = Matrix3::zeros();
    for (_, r, c) in &pairs {
        h += (c - cur_centroid) * (r - ref_centroid).transpose();
    }

    let rotation = kabsch_rotation(h)?;

    let residuals: Vec<AnchorResidual> = pairs
        .iter()
        .map(|(index, r, c)| {
            let aligned = rotation * (c - cur_centroid);
            AnchorResidual {
                index: *index,
                residual: (aligned - (r - ref_centroid)).norm(),
            }
        })
        .collect();

    let rmsd = (residuals.iter().map(|a| a.residual * a.residual).sum::<f64>() / n).sqrt();
    let max_residual = residuals.iter().map(|a| a.residual).fold(0.0, f64::max);

    Ok(AlignmentReport {
        rmsd,
        max_residual,
        residuals,
    })
}

/// Proper rotation maximising alignment for cross-covariance `h`.
fn kabsch_rotation(h: Matrix3<f64>) -> Result<Matrix3<f64>> {
    let svd = h.svd(true, true);
    let u = svd
        .u
        .ok_or_else(|| Error::Alignment("SVD did not produce U".to_string()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| Error::Alignment("SVD did not produce V^T".to_string()))?;

    // Flip the weakest axis if the best orthogonal fit is a reflection.
    let d = (v_t.transpose() * u.transpose()).determinant().signum();
    let correction = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, d));
    Ok(v_t.transpose() * correction * u.transpose())
}
