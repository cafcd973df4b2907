//! Rule-based face shape classification and shape regularity.

use serde::{Deserialize, Serialize};

use crate::measurements::FacialMeasurements;

// Empirical cutoffs; kept exactly.
const HEART_MIN_WIDTH_RATIO: f64 = 1.35;
const ROUND_MAX_FACIAL_INDEX: f64 = 0.85;
const ROUND_MAX_WIDTH_RATIO: f64 = 1.25;
const ANGULAR_MAX_WIDTH_RATIO: f64 = 1.12;

/// Ideal face-length index (oval face).
pub const IDEAL_FACE_LENGTH_INDEX: f64 = 1.3;
/// Ideal bizygomatic/bigonial ratio.
pub const IDEAL_WIDTH_RATIO: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceShape {
    /// Balanced proportions, slightly longer than wide
    Oval,
    /// Short face with soft jaw
    Round,
    /// Wide cheekbones tapering to a narrow jaw
    Heart,
    /// Jaw nearly as wide as the cheekbones
    Angular,
}

impl FaceShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Oval => "Oval",
            Self::Round => "Round",
            Self::Heart => "Heart",
            Self::Angular => "Angular",
        }
    }
}

/// Classify from the facial index (height / bizygomatic width) and the
/// width ratio (bizygomatic / bigonial).
pub fn classify_face_shape(facial_index: f64, width_ratio: f64) -> FaceShape {
    if width_ratio >= HEART_MIN_WIDTH_RATIO {
        FaceShape::Heart
    } else if facial_index < ROUND_MAX_FACIAL_INDEX && width_ratio < ROUND_MAX_WIDTH_RATIO {
        FaceShape::Round
    } else if width_ratio < ANGULAR_MAX_WIDTH_RATIO {
        FaceShape::Angular
    } else {
        FaceShape::Oval
    }
}

/// 100 minus 5 points per 0.1 of deviation from the ideal face-length index
/// and width ratio, clamped to [0, 100].
pub fn regularity_score(face_length_index: f64, width_ratio: f64) -> f64 {
    let deviation = (face_length_index - IDEAL_FACE_LENGTH_INDEX).abs() / 0.1
        + (width_ratio - IDEAL_WIDTH_RATIO).abs() / 0.1;
    (100.0 - 5.0 * deviation).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceShapeResult {
    pub shape: FaceShape,
    pub facial_index: f64,
    pub width_ratio: f64,
    /// 0..=100
    pub regularity: f64,
}

impl FaceShapeResult {
    pub fn from_measurements(m: &FacialMeasurements) -> Self {
        Self {
            shape: classify_face_shape(m.facial_index, m.width_ratio),
            facial_index: m.facial_index,
            width_ratio: m.width_ratio,
            regularity: regularity_score(m.face_length_index, m.width_ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::frontal_face;

    #[test]
    fn decision_order() {
        // Heart wins even for a short face.
        assert_eq!(classify_face_shape(0.7, 1.35), FaceShape::Heart);
        assert_eq!(classify_face_shape(0.80, 1.20), FaceShape::Round);
        assert_eq!(classify_face_shape(0.80, 1.25), FaceShape::Oval);
        assert_eq!(classify_face_shape(0.95, 1.10), FaceShape::Angular);
        assert_eq!(classify_face_shape(0.95, 1.12), FaceShape::Oval);
        assert_eq!(classify_face_shape(0.95, 1.3499), FaceShape::Oval);
    }

    #[test]
    fn ideal_proportions_are_fully_regular() {
        assert!((regularity_score(1.3, 1.25) - 100.0).abs() < 1e-9);
        assert!((regularity_score(1.4, 1.25) - 95.0).abs() < 1e-9);
        assert_eq!(regularity_score(5.0, 3.0), 0.0);
    }

    #[test]
    fn synthetic_face_is_oval() {
        let m = FacialMeasurements::from_landmarks(&frontal_face()).unwrap();
        let r = FaceShapeResult::from_measurements(&m);
        assert_eq!(r.shape, FaceShape::Oval);
        assert!(r.regularity > 90.0 && r.regularity < 95.0);
    }
}
