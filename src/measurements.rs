//! Anatomical distances, ratios and proportion partitions.
//!
//! Works over any [`LandmarkAccess`]: run it on metric landmarks for
//! millimetres, or on the raw detection for normalized units. Ratios and
//! percentages are identical in both spaces.

use serde::{Deserialize, Serialize};

use crate::calibration::eye_centers;
use crate::error::{Error, Result};
use crate::landmarks::indices::*;
use crate::symmetry::global_vertical_asymmetry;
use crate::types::LandmarkAccess;

/// Denominators at or below this are treated as zero.
const EPS: f64 = 1e-9;

/// Facial measurement set.
///
/// Distances are in the units of the input landmarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacialMeasurements {
    // === Widths ===
    /// Distance between eye centres
    pub interpupillary_distance: f64,
    /// Cheekbone to cheekbone
    pub bizygomatic_width: f64,
    /// Jaw angle to jaw angle
    pub bigonial_width: f64,
    pub nasal_width: f64,
    pub mouth_width: f64,
    pub palpebral_fissure_left: f64,
    pub palpebral_fissure_right: f64,

    // === Heights ===
    /// Glabella to chin
    pub facial_height: f64,
    /// Forehead top to chin
    pub face_height_total: f64,
    /// Nose tip to nasal base
    pub nasal_height: f64,
    /// Vertical lip opening
    pub lip_height: f64,
    /// Brow peak to outer canthus
    pub brow_left_height: f64,
    pub brow_right_height: f64,

    /// Mean depth offset of the malar points from the lateral contour
    pub malar_depth: f64,

    // === Thirds (% of their sum) ===
    /// Forehead top to glabella
    pub third_upper_pct: f64,
    /// Glabella to nasal base
    pub third_middle_pct: f64,
    /// Nasal base to chin
    pub third_lower_pct: f64,

    // === Fifths (% of their sum), jaw edge to jaw edge ===
    pub fifth_1_pct: f64,
    pub fifth_2_pct: f64,
    /// Intercanthal fifth
    pub fifth_3_pct: f64,
    pub fifth_4_pct: f64,
    pub fifth_5_pct: f64,

    // === Ratios ===
    /// Facial height / bizygomatic width
    pub facial_index: f64,
    /// Total face height / bizygomatic width (ideal ~1.3)
    pub face_length_index: f64,
    /// Nasal width / nasal height
    pub nasal_index: f64,
    /// Bizygomatic / bigonial width
    pub width_ratio: f64,
    /// Mouth width / lip height
    pub lip_index: f64,
    pub upper_lower_lip_ratio: f64,

    // === Symmetry ===
    /// |L - R| / max(L, R) of the palpebral fissures, in percent (0 = perfect)
    pub eye_symmetry_pct: f64,
    pub brow_symmetry_pct: f64,
    /// Mean vertical offset across five bilateral pairs
    pub global_asymmetry: f64,

    /// Mento-to-chin share of the lower third, in percent
    pub chin_projection_pct: f64,
}

impl FacialMeasurements {
    /// Measure a detection.
    ///
    /// Fails if any required landmark is missing (partial detection) or a
    /// proportion group collapses to zero length.
    pub fn from_landmarks<L: LandmarkAccess + ?Sized>(landmarks: &L) -> Result<Self> {
        let g = |idx: usize| landmarks.require(idx);

        let forehead = g(FOREHEAD_TOP)?;
        let glabella = g(GLABELLA)?;
        let nasal_base = g(NASAL_BASE)?;
        let nose_tip = g(NOSE_TIP)?;
        let chin = g(CHIN)?;
        let mento = g(MENTO)?;
        let zyg_l = g(ZYGOMA_LEFT)?;
        let zyg_r = g(ZYGOMA_RIGHT)?;
        let gon_l = g(GONION_LEFT)?;
        let gon_r = g(GONION_RIGHT)?;
        let el_out = g(EYE_LEFT_OUTER)?;
        let el_in = g(EYE_LEFT_INNER)?;
        let er_in = g(EYE_RIGHT_INNER)?;
        let er_out = g(EYE_RIGHT_OUTER)?;
        let brow_l = g(BROW_LEFT_PEAK)?;
        let brow_r = g(BROW_RIGHT_PEAK)?;
        let lip_top = g(LIP_TOP)?;
        let lip_bot = g(LIP_BOTTOM)?;
        let cupid_l = g(CUPID_LEFT)?;
        let malar_l = g(MALAR_LEFT)?;
        let malar_r = g(MALAR_RIGHT)?;

        let (left_eye, right_eye) = eye_centers(landmarks)?;

        let bizygomatic_width = zyg_l.distance(&zyg_r);
        let bigonial_width = gon_l.distance(&gon_r);
        let facial_height = glabella.distance(&chin);
        let face_height_total = forehead.distance(&chin);

        let thirds = percent_partition(
            &[
                forehead.distance(&glabella),
                glabella.distance(&nasal_base),
                nasal_base.distance(&chin),
            ],
            "facial thirds",
        )?;

        // Lateral fifths are horizontal offsets; the eye-level fifths are
        // full distances between canthi.
        let fifths = percent_partition(
            &[
                (el_out.x - zyg_l.x).abs(),
                el_out.distance(&el_in),
                el_in.distance(&er_in),
                er_in.distance(&er_out),
                (zyg_r.x - er_out.x).abs(),
            ],
            "facial fifths",
        )?;

        let palpebral_fissure_left = el_out.distance(&el_in);
        let palpebral_fissure_right = er_out.distance(&er_in);
        let brow_left_height = brow_l.distance(&el_out);
        let brow_right_height = brow_r.distance(&er_out);

        let nasal_width = g(ALA_LEFT)?.distance(&g(ALA_RIGHT)?);
        let nasal_height = nose_tip.distance(&nasal_base);
        let mouth_width = g(MOUTH_LEFT)?.distance(&g(MOUTH_RIGHT)?);
        let lip_height = lip_top.distance(&lip_bot);

        let lip_mid_y = (lip_top.y + lip_bot.y) / 2.0;
        let upper_lip = (cupid_l.y - lip_top.y).abs();
        let lower_lip = (lip_bot.y - lip_mid_y).abs();

        let malar_depth = ((malar_l.z - zyg_l.z).abs() + (malar_r.z - zyg_r.z).abs()) / 2.0;

        Ok(Self {
            interpupillary_distance: left_eye.distance(&right_eye),
            bizygomatic_width,
            bigonial_width,
            nasal_width,
            mouth_width,
            palpebral_fissure_left,
            palpebral_fissure_right,
            facial_height,
            face_height_total,
            nasal_height,
            lip_height,
            brow_left_height,
            brow_right_height,
            malar_depth,
            third_upper_pct: thirds[0],
            third_middle_pct: thirds[1],
            third_lower_pct: thirds[2],
            fifth_1_pct: fifths[0],
            fifth_2_pct: fifths[1],
            fifth_3_pct: fifths[2],
            fifth_4_pct: fifths[3],
            fifth_5_pct: fifths[4],
            facial_index: quotient(facial_height, bizygomatic_width),
            face_length_index: quotient(face_height_total, bizygomatic_width),
            nasal_index: quotient(nasal_width, nasal_height),
            width_ratio: quotient(bizygomatic_width, bigonial_width),
            lip_index: quotient(mouth_width, lip_height),
            upper_lower_lip_ratio: quotient(upper_lip, lower_lip),
            eye_symmetry_pct: relative_difference(palpebral_fissure_left, palpebral_fissure_right),
            brow_symmetry_pct: relative_difference(brow_left_height, brow_right_height),
            global_asymmetry: global_vertical_asymmetry(landmarks)?,
            chin_projection_pct: ratio(mento.distance(&chin), nasal_base.distance(&chin)),
        })
    }

    pub fn thirds(&self) -> [f64; 3] {
        [self.third_upper_pct, self.third_middle_pct, self.third_lower_pct]
    }

    pub fn fifths(&self) -> [f64; 5] {
        [
            self.fifth_1_pct,
            self.fifth_2_pct,
            self.fifth_3_pct,
            self.fifth_4_pct,
            self.fifth_5_pct,
        ]
    }

    /// Global vertical asymmetry as a percentage of the IPD. `None` when the
    /// IPD has collapsed.
    pub fn normalized_global_asymmetry_pct(&self) -> Option<f64> {
        self.has_interpupillary_distance()
            .then(|| ratio(self.global_asymmetry, self.interpupillary_distance))
    }

    /// Whether the eye centres are far enough apart to normalize against.
    pub fn has_interpupillary_distance(&self) -> bool {
        self.interpupillary_distance > EPS
    }
}

/// Express each segment as a percentage of the group total.
fn percent_partition(segments: &[f64], group: &str) -> Result<Vec<f64>> {
    let total: f64 = segments.iter().sum();
    if total.is_nan() || total <= EPS {
        return Err(Error::DegenerateGeometry(format!("{group} sum to zero")));
    }
    Ok(segments.iter().map(|s| s / total * 100.0).collect())
}

/// Calculate percentage ratio, handling division by zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > EPS {
        (numerator / denominator) * 100.0
    } else {
        0.0
    }
}

fn quotient(numerator: f64, denominator: f64) -> f64 {
    if denominator > EPS {
        numerator / denominator
    } else {
        0.0
    }
}

/// |a - b| / max(a, b) in percent.
fn relative_difference(a: f64, b: f64) -> f64 {
    ratio((a - b).abs(), a.max(b))
}

// ============================================================================
// Ideal-range report
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdealStatus {
    Within,
    Outside,
    /// No tolerance defined; lower is better.
    Info,
}

/// One measurement compared with its classical ideal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealCheck {
    pub key: String,
    pub description: String,
    pub measured: f64,
    pub ideal: f64,
    pub tolerance: Option<f64>,
    pub status: IdealStatus,
}

/// Compare the key proportions with their textbook ideals.
pub fn ideal_checks(m: &FacialMeasurements) -> Vec<IdealCheck> {
    let table: [(&str, f64, f64, Option<f64>); 10] = [
        ("face_length_index", m.face_length_index, 1.3, Some(0.1)),
        ("third_upper_pct", m.third_upper_pct, 33.3, Some(3.0)),
        ("third_middle_pct", m.third_middle_pct, 33.3, Some(3.0)),
        ("third_lower_pct", m.third_lower_pct, 33.3, Some(3.0)),
        ("fifth_3_pct", m.fifth_3_pct, 20.0, Some(2.0)),
        ("eye_symmetry_pct", m.eye_symmetry_pct, 0.0, Some(5.0)),
        ("brow_symmetry_pct", m.brow_symmetry_pct, 0.0, Some(5.0)),
        ("nasal_index", m.nasal_index, 0.67, Some(0.1)),
        ("upper_lower_lip_ratio", m.upper_lower_lip_ratio, 0.5, Some(0.1)),
        ("global_asymmetry", m.global_asymmetry, 0.0, None),
    ];

    table
        .into_iter()
        .map(|(key, measured, ideal, tolerance)| {
            let status = match tolerance {
                Some(tol) if (measured - ideal).abs() <= tol => IdealStatus::Within,
                Some(_) => IdealStatus::Outside,
                None => IdealStatus::Info,
            };
            IdealCheck {
                key: key.to_string(),
                description: ideal_description(key).to_string(),
                measured,
                ideal,
                tolerance,
                status,
            }
        })
        .collect()
}

fn ideal_description(key: &str) -> &'static str {
    match key {
        "face_length_index" => "Face length index (h/w), ideal ~1.3 (oval)",
        "third_upper_pct" => "Upper third (%), ideal ~33%",
        "third_middle_pct" => "Middle third (%), ideal ~33%",
        "third_lower_pct" => "Lower third (%), ideal ~33%",
        "fifth_3_pct" => "Central fifth (%), ideal ~20%",
        "eye_symmetry_pct" => "Eye asymmetry (%), ideal < 5%",
        "brow_symmetry_pct" => "Brow asymmetry (%), ideal < 5%",
        "nasal_index" => "Nasal index (w/h), ideal ~0.67",
        "upper_lower_lip_ratio" => "Upper/lower lip ratio, ideal ~0.5",
        "global_asymmetry" => "Global vertical asymmetry, lower is better",
        _ => "",
    }
}
