//! Composite FAS score: five weighted domains, renormalized over those with
//! real data.

use serde::{Deserialize, Serialize};

use crate::discord::DynamicDiscordResult;
use crate::face_shape::FaceShapeResult;
use crate::measurements::FacialMeasurements;

/// Ideal share of one third, in percent.
const IDEAL_THIRD_PCT: f64 = 33.33;
/// Ideal share of one fifth, in percent.
const IDEAL_FIFTH_PCT: f64 = 20.0;
/// Lowest expression score a computed domain can report.
const EXPRESSION_FLOOR: f64 = 10.0;

/// Five-level ordinal scale shared by every domain and the global score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Critical,
    Attention,
    Moderate,
    Good,
    Excellent,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Grade::Excellent
        } else if score >= 70.0 {
            Grade::Good
        } else if score >= 50.0 {
            Grade::Moderate
        } else if score >= 30.0 {
            Grade::Attention
        } else {
            Grade::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Good => "Good",
            Grade::Moderate => "Moderate",
            Grade::Attention => "Attention",
            Grade::Critical => "Critical",
        }
    }

    fn interpretation(&self) -> &'static str {
        match self {
            Grade::Excellent => "within the ideal range",
            Grade::Good => "close to ideal",
            Grade::Moderate => "noticeable deviation from ideal",
            Grade::Attention => "marked deviation, review advised",
            Grade::Critical => "severe deviation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FasDomain {
    FaceShape,
    Proportion,
    Symmetry,
    Expression,
    SkinQuality,
}

impl FasDomain {
    pub const ALL: [FasDomain; 5] = [
        FasDomain::FaceShape,
        FasDomain::Proportion,
        FasDomain::Symmetry,
        FasDomain::Expression,
        FasDomain::SkinQuality,
    ];

    /// Catalog weight; the five weights sum to 1.
    pub fn weight(&self) -> f64 {
        match self {
            FasDomain::FaceShape => 0.15,
            FasDomain::Proportion => 0.20,
            FasDomain::Symmetry => 0.25,
            FasDomain::Expression => 0.25,
            FasDomain::SkinQuality => 0.15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FasDomain::FaceShape => "Face shape",
            FasDomain::Proportion => "Proportion",
            FasDomain::Symmetry => "Symmetry",
            FasDomain::Expression => "Expression",
            FasDomain::SkinQuality => "Skin quality",
        }
    }
}

/// Whether a domain could be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DomainOutcome {
    Computed { score: f64 },
    Unavailable { reason: String },
}

impl DomainOutcome {
    pub fn computed(score: f64) -> Self {
        DomainOutcome::Computed {
            score: score.clamp(0.0, 100.0),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        DomainOutcome::Unavailable {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FasDomainScore {
    pub domain: FasDomain,
    pub outcome: DomainOutcome,
    /// `None` when the domain is unavailable.
    pub grade: Option<Grade>,
    pub interpretation: String,
    pub weight: f64,
}

impl FasDomainScore {
    pub fn new(domain: FasDomain, outcome: DomainOutcome) -> Self {
        let (grade, interpretation) = match &outcome {
            DomainOutcome::Computed { score } => {
                let grade = Grade::from_score(*score);
                (Some(grade), grade.interpretation().to_string())
            }
            DomainOutcome::Unavailable { reason } => (None, format!("Data unavailable: {reason}")),
        };
        Self {
            domain,
            outcome,
            grade,
            interpretation,
            weight: domain.weight(),
        }
    }

    pub fn has_real_data(&self) -> bool {
        matches!(self.outcome, DomainOutcome::Computed { .. })
    }

    /// Score, or 0 when unavailable.
    pub fn score(&self) -> f64 {
        match self.outcome {
            DomainOutcome::Computed { score } => score,
            DomainOutcome::Unavailable { .. } => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FasResult {
    pub domains: Vec<FasDomainScore>,
    /// 0..=100
    pub global_score: u32,
    pub global_grade: Grade,
    pub evaluated_count: usize,
    pub summary: String,
}

impl FasResult {
    pub fn domain(&self, domain: FasDomain) -> Option<&FasDomainScore> {
        self.domains.iter().find(|d| d.domain == domain)
    }
}

/// Weighted mean over the domains with real data.
///
/// Dividing by the sum of the participating weights renormalizes them, so a
/// single evaluated domain yields its own score.
pub fn aggregate(domains: Vec<FasDomainScore>) -> FasResult {
    let (weighted, total_weight, evaluated_count) = domains
        .iter()
        .filter(|d| d.has_real_data())
        .fold((0.0, 0.0, 0), |(s, w, n), d| {
            (s + d.score() * d.weight, w + d.weight, n + 1)
        });

    if evaluated_count == 0 || total_weight <= 0.0 {
        return FasResult {
            domains,
            global_score: 0,
            global_grade: Grade::Critical,
            evaluated_count: 0,
            summary: "No domains evaluated".to_string(),
        };
    }

    let global_score = (weighted / total_weight).round().clamp(0.0, 100.0) as u32;
    let global_grade = Grade::from_score(global_score as f64);
    let summary = format!(
        "{}: {} of {} domains evaluated",
        global_grade.label(),
        evaluated_count,
        domains.len()
    );

    FasResult {
        domains,
        global_score,
        global_grade,
        evaluated_count,
        summary,
    }
}

// ============================================================================
// Domain scores
// ============================================================================

pub fn face_shape_outcome(shape: &FaceShapeResult) -> DomainOutcome {
    DomainOutcome::computed(shape.regularity)
}

/// 100 minus 3 points per percentage point of mean deviation of the thirds
/// and the fifths.
pub fn proportion_outcome(m: &FacialMeasurements) -> DomainOutcome {
    let thirds = m.thirds();
    let fifths = m.fifths();
    let third_dev =
        thirds.iter().map(|t| (t - IDEAL_THIRD_PCT).abs()).sum::<f64>() / thirds.len() as f64;
    let fifth_dev =
        fifths.iter().map(|f| (f - IDEAL_FIFTH_PCT).abs()).sum::<f64>() / fifths.len() as f64;
    DomainOutcome::computed(100.0 - 3.0 * (third_dev + fifth_dev))
}

/// 35% eye symmetry, 25% brow symmetry, 40% global vertical asymmetry
/// relative to the IPD. Unavailable when the IPD has collapsed.
pub fn symmetry_outcome(m: &FacialMeasurements) -> DomainOutcome {
    let Some(global_pct) = m.normalized_global_asymmetry_pct() else {
        return DomainOutcome::unavailable("degenerate interpupillary distance");
    };
    let eye = (100.0 - 5.0 * m.eye_symmetry_pct).clamp(0.0, 100.0);
    let brow = (100.0 - 5.0 * m.brow_symmetry_pct).clamp(0.0, 100.0);
    let global = (100.0 - 10.0 * global_pct).clamp(0.0, 100.0);
    DomainOutcome::computed(0.35 * eye + 0.25 * brow + 0.40 * global)
}

/// Inverted discord score, floored at 10.
pub fn expression_outcome(discord: &DynamicDiscordResult) -> DomainOutcome {
    if !discord.has_data {
        return DomainOutcome::unavailable("no expression data");
    }
    DomainOutcome::computed((100.0 - discord.global_score as f64).max(EXPRESSION_FLOOR))
}

/// Externally supplied texture score.
pub fn skin_quality_outcome(score: Option<f64>) -> DomainOutcome {
    match score {
        Some(s) if s.is_finite() => DomainOutcome::computed(s),
        _ => DomainOutcome::unavailable("awaiting texture analysis"),
    }
}
