//! Soft-tissue volume estimation by tetrahedral fan decomposition.
//!
//! A region boundary is fanned from its first surface vertex; each triangle
//! of the fan closes a tetrahedron with a deep anchor landmark, and the
//! absolute tetrahedron volumes are summed.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::{LandmarkAccess, Point3};

/// Volume of the tetrahedron `abcd`: `|det(b-a, c-a, d-a)| / 6`.
pub fn tetrahedron_volume(a: Point3, b: Point3, c: Point3, d: Point3) -> f64 {
    let m = Matrix3::from_columns(&[
        Vector3::from(b - a),
        Vector3::from(c - a),
        Vector3::from(d - a),
    ]);
    m.determinant().abs() / 6.0
}

/// Fan-triangulated volume between an ordered surface patch and `anchor`.
///
/// Fewer than three surface points enclose nothing and yield 0.
pub fn fan_volume(surface: &[Point3], anchor: Point3) -> f64 {
    if surface.len() < 3 {
        return 0.0;
    }
    let apex = surface[0];
    surface[1..]
        .windows(2)
        .map(|w| tetrahedron_volume(apex, w[0], w[1], anchor))
        .sum()
}

/// Facial regions tracked for volumetric deficit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumetricRegion {
    LeftMalar,
    RightMalar,
    LeftNasolabial,
    RightNasolabial,
    Lips,
    Chin,
}

impl VolumetricRegion {
    pub const ALL: [VolumetricRegion; 6] = [
        VolumetricRegion::LeftMalar,
        VolumetricRegion::RightMalar,
        VolumetricRegion::LeftNasolabial,
        VolumetricRegion::RightNasolabial,
        VolumetricRegion::Lips,
        VolumetricRegion::Chin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LeftMalar => "Left malar",
            Self::RightMalar => "Right malar",
            Self::LeftNasolabial => "Left nasolabial",
            Self::RightNasolabial => "Right nasolabial",
            Self::Lips => "Lips",
            Self::Chin => "Chin",
        }
    }

    /// Ordered boundary of the region on the face mesh.
    pub fn surface_indices(self) -> &'static [usize] {
        match self {
            Self::LeftMalar => &[116, 117, 118, 101, 205, 187, 123],
            Self::RightMalar => &[345, 346, 347, 330, 425, 411, 352],
            Self::LeftNasolabial => &[129, 203, 206, 216, 57],
            Self::RightNasolabial => &[358, 423, 426, 436, 287],
            Self::Lips => &[61, 39, 0, 269, 291, 405, 17, 181],
            Self::Chin => &[149, 176, 148, 152, 377, 400, 378],
        }
    }

    /// Deep reference point the fan closes against.
    pub fn deep_anchor_index(self) -> usize {
        match self {
            Self::LeftMalar => 127,
            Self::RightMalar => 356,
            Self::LeftNasolabial => 64,
            Self::RightNasolabial => 294,
            Self::Lips => 13,
            Self::Chin => 200,
        }
    }

    /// Young-adult reference volume in millilitres.
    pub fn reference_volume_ml(self) -> f64 {
        match self {
            Self::LeftMalar | Self::RightMalar => 3.5,
            Self::LeftNasolabial | Self::RightNasolabial => 1.2,
            Self::Lips => 2.0,
            Self::Chin => 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionVolume {
    pub region: VolumetricRegion,
    /// Raw volume in the cube of the input units.
    pub raw_volume: f64,
    /// `raw_volume / 1000`, meaningful when the input is in millimetres.
    pub volume_ml: f64,
    pub reference_ml: f64,
    pub percent_of_reference: f64,
    /// `100 - percent_of_reference`, floored at 0.
    pub deficit_pct: f64,
}

/// Estimate one region. Fails if any of its landmarks is missing.
pub fn estimate_region<L: LandmarkAccess + ?Sized>(
    landmarks: &L,
    region: VolumetricRegion,
) -> Result<RegionVolume> {
    let surface = region
        .surface_indices()
        .iter()
        .map(|&i| landmarks.require(i))
        .collect::<Result<Vec<_>>>()?;
    let anchor = landmarks.require(region.deep_anchor_index())?;

    let raw_volume = fan_volume(&surface, anchor);
    let volume_ml = raw_volume / 1000.0;
    let reference_ml = region.reference_volume_ml();
    let percent_of_reference = volume_ml / reference_ml * 100.0;

    Ok(RegionVolume {
        region,
        raw_volume,
        volume_ml,
        reference_ml,
        percent_of_reference,
        deficit_pct: (100.0 - percent_of_reference).max(0.0),
    })
}

/// Every region the detection covers. Regions with missing landmarks are
/// left out.
pub fn estimate_all_regions<L: LandmarkAccess + ?Sized>(landmarks: &L) -> Vec<RegionVolume> {
    VolumetricRegion::ALL
        .into_iter()
        .filter_map(|region| match estimate_region(landmarks, region) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(region = region.label(), error = %e, "volume unavailable");
                None
            }
        })
        .collect()
}
