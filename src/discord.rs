//! Dynamic discord: muscle activation scored per clinical zone.
//!
//! Blendshape coefficients from the detector are grouped into seven zones.
//! Each zone gets a peak-biased composite score and a hyperactivity flag; the
//! zone scores roll up into a 0-100 global discord score and a summary line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::landmarks::indices;

/// Default gate below which a zone counts as at rest.
pub const ACTIVITY_THRESHOLD: f64 = 0.15;

/// Default score a zone must strictly exceed to be hyperactive.
pub const HYPERACTIVITY_THRESHOLD: f64 = 0.65;

/// Weight of the mean in the composite zone score; the peak gets the rest.
const AVG_WEIGHT: f64 = 0.4;

// ============================================================================
// Blendshape input
// ============================================================================

/// One named coefficient as emitted by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendshapeEntry {
    #[serde(alias = "categoryName")]
    pub name: String,
    pub score: f64,
}

/// Named muscle-activation coefficients for one frame.
///
/// Serializes as a list of `{name, score}` entries; `categoryName` is
/// accepted in place of `name`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<BlendshapeEntry>", into = "Vec<BlendshapeEntry>")]
pub struct Blendshapes {
    scores: BTreeMap<String, f64>,
}

impl Blendshapes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, score: f64) {
        self.scores.insert(name.into(), score);
    }

    /// Coefficient for `name` clamped to [0, 1]. Missing or non-finite
    /// values read as 0.
    pub fn get(&self, name: &str) -> f64 {
        match self.scores.get(name) {
            Some(s) if s.is_finite() => s.clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Blendshapes {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        }
    }
}

impl From<Vec<BlendshapeEntry>> for Blendshapes {
    fn from(entries: Vec<BlendshapeEntry>) -> Self {
        entries.into_iter().map(|e| (e.name, e.score)).collect()
    }
}

impl From<Blendshapes> for Vec<BlendshapeEntry> {
    fn from(b: Blendshapes) -> Self {
        b.scores
            .into_iter()
            .map(|(name, score)| BlendshapeEntry { name, score })
            .collect()
    }
}

// ============================================================================
// Zone catalog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalZone {
    Forehead,
    Glabella,
    PeriorbitalLeft,
    PeriorbitalRight,
    Perioral,
    Nasolabial,
    Marionette,
}

impl ClinicalZone {
    pub const ALL: [ClinicalZone; 7] = [
        ClinicalZone::Forehead,
        ClinicalZone::Glabella,
        ClinicalZone::PeriorbitalLeft,
        ClinicalZone::PeriorbitalRight,
        ClinicalZone::Perioral,
        ClinicalZone::Nasolabial,
        ClinicalZone::Marionette,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Forehead => "Forehead",
            Self::Glabella => "Glabella",
            Self::PeriorbitalLeft => "Left periorbital",
            Self::PeriorbitalRight => "Right periorbital",
            Self::Perioral => "Perioral",
            Self::Nasolabial => "Nasolabial",
            Self::Marionette => "Marionette",
        }
    }

    pub fn muscle(self) -> &'static str {
        match self {
            Self::Forehead => "frontalis",
            Self::Glabella => "corrugator / procerus",
            Self::PeriorbitalLeft | Self::PeriorbitalRight => "orbicularis oculi",
            Self::Perioral => "orbicularis oris",
            Self::Nasolabial => "zygomaticus / levator labii",
            Self::Marionette => "depressor anguli oris / mentalis",
        }
    }

    pub fn blendshape_names(self) -> &'static [&'static str] {
        match self {
            Self::Forehead => &["browInnerUp", "browOuterUpLeft", "browOuterUpRight"],
            Self::Glabella => &["browDownLeft", "browDownRight"],
            Self::PeriorbitalLeft => &["eyeSquintLeft", "eyeBlinkLeft"],
            Self::PeriorbitalRight => &["eyeSquintRight", "eyeBlinkRight"],
            Self::Perioral => &["mouthPucker", "mouthFunnel", "mouthPressLeft", "mouthPressRight"],
            Self::Nasolabial => &[
                "mouthSmileLeft",
                "mouthSmileRight",
                "cheekSquintLeft",
                "cheekSquintRight",
            ],
            Self::Marionette => &["mouthFrownLeft", "mouthFrownRight", "mouthShrugLower"],
        }
    }

    /// Landmarks an overlay uses to place the zone.
    pub fn anchor_indices(self) -> &'static [usize] {
        match self {
            Self::Forehead => &[indices::FOREHEAD_TOP, 67, 297, 109, 338],
            Self::Glabella => &[indices::GLABELLA, 55, 285, 8],
            Self::PeriorbitalLeft => &[indices::EYE_LEFT_OUTER, 130, 226, 247],
            Self::PeriorbitalRight => &[indices::EYE_RIGHT_OUTER, 359, 446, 467],
            Self::Perioral => &[indices::LIP_TOP, indices::LIP_BOTTOM, 0, 17],
            Self::Nasolabial => &[indices::ALA_LEFT, indices::ALA_RIGHT, 205, 425],
            Self::Marionette => &[indices::MOUTH_LEFT, indices::MOUTH_RIGHT, 202, 422],
        }
    }

    /// `(fill, stroke)` overlay colours.
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Self::Forehead => ("rgba(59,130,246,0.25)", "#3b82f6"),
            Self::Glabella => ("rgba(239,68,68,0.25)", "#ef4444"),
            Self::PeriorbitalLeft | Self::PeriorbitalRight => ("rgba(168,85,247,0.25)", "#a855f7"),
            Self::Perioral => ("rgba(236,72,153,0.25)", "#ec4899"),
            Self::Nasolabial => ("rgba(245,158,11,0.25)", "#f59e0b"),
            Self::Marionette => ("rgba(20,184,166,0.25)", "#14b8a6"),
        }
    }
}

// ============================================================================
// Scoring
// ============================================================================

/// Activity gates used by the scorer, always `0 <= activity < hyperactivity <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscordThresholds {
    activity: f64,
    hyperactivity: f64,
}

impl DiscordThresholds {
    pub fn new(activity: f64, hyperactivity: f64) -> Result<Self> {
        let in_range = |t: f64| (0.0..=1.0).contains(&t);
        if !in_range(activity) || !in_range(hyperactivity) || activity >= hyperactivity {
            return Err(Error::InvalidConfig(format!(
                "thresholds must satisfy 0 <= activity < hyperactivity <= 1, got {} and {}",
                activity, hyperactivity
            )));
        }
        Ok(Self {
            activity,
            hyperactivity,
        })
    }

    /// Score a zone must exceed to count as active.
    pub fn activity(&self) -> f64 {
        self.activity
    }

    /// Score a zone must exceed to count as hyperactive.
    pub fn hyperactivity(&self) -> f64 {
        self.hyperactivity
    }
}

impl Default for DiscordThresholds {
    fn default() -> Self {
        Self {
            activity: ACTIVITY_THRESHOLD,
            hyperactivity: HYPERACTIVITY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendshapeScore {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDiscordResult {
    pub zone: ClinicalZone,
    /// Composite activation in [0, 1].
    pub score: f64,
    pub is_hyperactive: bool,
    pub is_active: bool,
    pub details: Vec<BlendshapeScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicDiscordResult {
    pub zones: Vec<ZoneDiscordResult>,
    /// 0..=100
    pub global_score: u32,
    pub hyperactive_count: usize,
    pub summary: String,
    /// False when no coefficients were supplied.
    pub has_data: bool,
}

impl DynamicDiscordResult {
    pub fn zone(&self, zone: ClinicalZone) -> Option<&ZoneDiscordResult> {
        self.zones.iter().find(|z| z.zone == zone)
    }

    pub fn active_count(&self) -> usize {
        self.zones.iter().filter(|z| z.is_active).count()
    }
}

/// Peak-biased composite: `0.6 * max + 0.4 * avg`, written as
/// `max - 0.4 * (max - avg)` so a uniform set scores exactly its value.
pub fn composite_zone_score(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let max = values.iter().copied().fold(0.0, f64::max);
    let avg = (values.iter().sum::<f64>() / values.len() as f64).min(max);
    max - AVG_WEIGHT * (max - avg)
}

/// Score a single zone.
pub fn score_zone(
    zone: ClinicalZone,
    blendshapes: &Blendshapes,
    thresholds: &DiscordThresholds,
) -> ZoneDiscordResult {
    let details: Vec<BlendshapeScore> = zone
        .blendshape_names()
        .iter()
        .map(|&name| BlendshapeScore {
            name: name.to_string(),
            score: blendshapes.get(name),
        })
        .collect();
    let values: Vec<f64> = details.iter().map(|d| d.score).collect();
    let score = composite_zone_score(&values);

    ZoneDiscordResult {
        zone,
        score,
        is_hyperactive: score > thresholds.hyperactivity,
        is_active: score > thresholds.activity,
        details,
    }
}

/// Score every zone and summarise.
///
/// `None` or an empty set means no expression data: global score 0, every
/// zone inactive.
pub fn analyze_discord(
    blendshapes: Option<&Blendshapes>,
    thresholds: &DiscordThresholds,
) -> DynamicDiscordResult {
    let Some(blendshapes) = blendshapes.filter(|b| !b.is_empty()) else {
        let empty = Blendshapes::new();
        let zones = ClinicalZone::ALL
            .into_iter()
            .map(|zone| score_zone(zone, &empty, thresholds))
            .collect();
        return DynamicDiscordResult {
            zones,
            global_score: 0,
            hyperactive_count: 0,
            summary: "No expression data".to_string(),
            has_data: false,
        };
    };

    let zones: Vec<ZoneDiscordResult> = ClinicalZone::ALL
        .into_iter()
        .map(|zone| score_zone(zone, blendshapes, thresholds))
        .collect();

    let mean = zones.iter().map(|z| z.score).sum::<f64>() / zones.len() as f64;
    let global_score = (100.0 * mean).round().clamp(0.0, 100.0) as u32;
    let hyperactive_count = zones.iter().filter(|z| z.is_hyperactive).count();
    let summary = summarize(&zones);

    DynamicDiscordResult {
        zones,
        global_score,
        hyperactive_count,
        summary,
        has_data: true,
    }
}

/// At rest, then mild activity, then hyperactive zones, in that order.
fn summarize(zones: &[ZoneDiscordResult]) -> String {
    let active = zones.iter().filter(|z| z.is_active).count();
    if active == 0 {
        return "At rest: no significant muscle activity".to_string();
    }

    let hyperactive: Vec<&str> = zones
        .iter()
        .filter(|z| z.is_hyperactive)
        .map(|z| z.zone.label())
        .collect();
    if hyperactive.is_empty() {
        let plural = if active == 1 { "zone" } else { "zones" };
        return format!("Mild activity in {active} {plural}");
    }

    format!(
        "Hyperactive: {}. Prioritize intervention on these zones",
        hyperactive.join(", ")
    )
}
