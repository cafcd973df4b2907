//! MediaPipe face-mesh landmark indices used by the measurement engine.
//!
//! "Left" always names the image-left member of a bilateral pair.

use serde::{Deserialize, Serialize};

/// Face-mesh indices (468-point topology; the 478-point refined mesh shares them).
pub mod indices {
    // === Midline ===
    /// Top of forehead (hairline proxy)
    pub const FOREHEAD_TOP: usize = 10;
    /// Glabella, between the brows
    pub const GLABELLA: usize = 9;
    /// Subnasale / columella base
    pub const NASAL_BASE: usize = 2;
    pub const NOSE_TIP: usize = 4;
    /// Menton (lowest chin point)
    pub const CHIN: usize = 152;
    /// Soft-tissue pogonion, just above the menton
    pub const MENTO: usize = 175;

    // === Contour ===
    /// Lateral contour at cheekbone level (zygion)
    pub const ZYGOMA_LEFT: usize = 234;
    pub const ZYGOMA_RIGHT: usize = 454;
    /// Jaw angle
    pub const GONION_LEFT: usize = 172;
    pub const GONION_RIGHT: usize = 397;

    // === Eyes ===
    pub const EYE_LEFT_OUTER: usize = 33;
    pub const EYE_LEFT_INNER: usize = 133;
    pub const EYE_RIGHT_INNER: usize = 362;
    pub const EYE_RIGHT_OUTER: usize = 263;
    pub const EYE_LEFT_TOP: usize = 159;
    pub const EYE_LEFT_BOTTOM: usize = 145;
    pub const EYE_RIGHT_TOP: usize = 386;
    pub const EYE_RIGHT_BOTTOM: usize = 374;

    // === Brows ===
    pub const BROW_LEFT_PEAK: usize = 66;
    pub const BROW_RIGHT_PEAK: usize = 296;

    // === Nose ===
    pub const ALA_LEFT: usize = 129;
    pub const ALA_RIGHT: usize = 358;

    // === Lips ===
    pub const LIP_TOP: usize = 13;
    pub const LIP_BOTTOM: usize = 14;
    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;
    pub const CUPID_LEFT: usize = 37;
    pub const CUPID_RIGHT: usize = 267;

    // === Malar ===
    pub const MALAR_LEFT: usize = 116;
    pub const MALAR_RIGHT: usize = 345;
}

/// Stable points used to compare shapes across frames.
pub const ANCHOR_INDICES: [usize; 15] = [
    indices::GLABELLA,
    indices::CHIN,
    indices::EYE_LEFT_OUTER,
    indices::EYE_LEFT_INNER,
    indices::EYE_RIGHT_INNER,
    indices::EYE_RIGHT_OUTER,
    indices::ZYGOMA_LEFT,
    indices::ZYGOMA_RIGHT,
    indices::GONION_LEFT,
    indices::GONION_RIGHT,
    indices::MOUTH_LEFT,
    indices::MOUTH_RIGHT,
    indices::LIP_TOP,
    indices::LIP_BOTTOM,
    indices::NOSE_TIP,
];

pub fn is_anchor(index: usize) -> bool {
    ANCHOR_INDICES.contains(&index)
}

/// Homologous left/right landmark pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BilateralPair {
    MouthCorners,
    OuterCanthi,
    InnerCanthi,
    Alae,
    Malar,
    BrowPeaks,
    Gonions,
}

impl BilateralPair {
    pub const ALL: [BilateralPair; 7] = [
        BilateralPair::MouthCorners,
        BilateralPair::OuterCanthi,
        BilateralPair::InnerCanthi,
        BilateralPair::Alae,
        BilateralPair::Malar,
        BilateralPair::BrowPeaks,
        BilateralPair::Gonions,
    ];

    /// Pairs averaged for the vertical (height) imbalance metric.
    pub const VERTICAL: [BilateralPair; 5] = [
        BilateralPair::OuterCanthi,
        BilateralPair::Alae,
        BilateralPair::Malar,
        BilateralPair::MouthCorners,
        BilateralPair::BrowPeaks,
    ];

    /// `(left, right)` landmark indices.
    pub const fn indices(self) -> (usize, usize) {
        match self {
            Self::MouthCorners => (indices::MOUTH_LEFT, indices::MOUTH_RIGHT),
            Self::OuterCanthi => (indices::EYE_LEFT_OUTER, indices::EYE_RIGHT_OUTER),
            Self::InnerCanthi => (indices::EYE_LEFT_INNER, indices::EYE_RIGHT_INNER),
            Self::Alae => (indices::ALA_LEFT, indices::ALA_RIGHT),
            Self::Malar => (indices::MALAR_LEFT, indices::MALAR_RIGHT),
            Self::BrowPeaks => (indices::BROW_LEFT_PEAK, indices::BROW_RIGHT_PEAK),
            Self::Gonions => (indices::GONION_LEFT, indices::GONION_RIGHT),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MouthCorners => "Mouth corners",
            Self::OuterCanthi => "Outer canthi",
            Self::InnerCanthi => "Inner canthi",
            Self::Alae => "Nasal alae",
            Self::Malar => "Malar",
            Self::BrowPeaks => "Brow peaks",
            Self::Gonions => "Gonions",
        }
    }
}
