//! The caller-owned analysis handle.
//!
//! [`Engine`] holds only its configuration. Every call is a pure function of
//! its input, so one engine can be shared across threads and the same frame
//! always produces the same analysis.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alignment::{compare_anchor_shapes, AlignmentReport};
use crate::calibration::Calibration;
use crate::composite::{
    aggregate, expression_outcome, face_shape_outcome, proportion_outcome, skin_quality_outcome,
    symmetry_outcome, DomainOutcome, FasDomain, FasDomainScore, FasResult,
};
use crate::config::EngineConfig;
use crate::discord::{analyze_discord, Blendshapes, DiscordThresholds, DynamicDiscordResult};
use crate::error::Result;
use crate::face_shape::FaceShapeResult;
use crate::measurements::{ideal_checks, FacialMeasurements, IdealCheck};
use crate::metric::MetricLandmarks;
use crate::symmetry::{analyze_symmetry, SymmetryReport};
use crate::types::Landmarks;
use crate::volume::{estimate_all_regions, RegionVolume};

/// One detector output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    pub landmarks: Landmarks,
    #[serde(default)]
    pub blendshapes: Option<Blendshapes>,
    /// Texture score from an external classifier, 0..=100.
    #[serde(default)]
    pub skin_quality: Option<f64>,
}

impl FrameInput {
    pub fn new(landmarks: Landmarks) -> Self {
        Self {
            landmarks,
            ..Default::default()
        }
    }

    pub fn with_blendshapes(mut self, blendshapes: Blendshapes) -> Self {
        self.blendshapes = Some(blendshapes);
        self
    }

    pub fn with_skin_quality(mut self, score: f64) -> Self {
        self.skin_quality = Some(score);
        self
    }
}

/// Everything computed for one frame. Geometric parts are `None` when the
/// detection was too incomplete to measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub calibration: Option<Calibration>,
    /// Measured on metric landmarks, so distances are in millimetres.
    pub measurements: Option<FacialMeasurements>,
    pub ideal_checks: Vec<IdealCheck>,
    pub symmetry: Option<SymmetryReport>,
    pub volumes: Vec<RegionVolume>,
    pub face_shape: Option<FaceShapeResult>,
    pub discord: DynamicDiscordResult,
    pub fas: FasResult,
}

/// A producer of detections, such as a camera-driven landmark detector.
pub trait DetectionSource {
    /// The next frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Option<FrameInput>;
}

impl<I: Iterator<Item = FrameInput>> DetectionSource for I {
    fn next_frame(&mut self) -> Option<FrameInput> {
        self.next()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    thresholds: DiscordThresholds,
}

impl Engine {
    /// Fails with [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// configuration does not validate.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            thresholds: config.discord_thresholds()?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Calibrate a detection and convert it to millimetres.
    pub fn metric_landmarks(
        &self,
        landmarks: &Landmarks,
    ) -> Result<(Calibration, MetricLandmarks)> {
        let calibration = Calibration::from_landmarks(landmarks, self.config.reference_ipd_mm)?;
        let metric = MetricLandmarks::from_landmarks(landmarks, &calibration);
        Ok((calibration, metric))
    }

    /// Rigidly compare the anchor shapes of two detections.
    pub fn compare_frames(
        &self,
        reference: &Landmarks,
        current: &Landmarks,
    ) -> Result<AlignmentReport> {
        let (_, reference) = self.metric_landmarks(reference)?;
        let (_, current) = self.metric_landmarks(current)?;
        compare_anchor_shapes(&reference, &current)
    }

    /// Run the full pipeline on one frame.
    ///
    /// Missing or degenerate data never fails the call; the affected
    /// domains come back unavailable.
    pub fn analyze(&self, input: &FrameInput) -> FrameAnalysis {
        let metric = match self.metric_landmarks(&input.landmarks) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!(error = %e, "calibration skipped");
                None
            }
        };

        let measurements = metric.as_ref().and_then(|(_, m)| {
            FacialMeasurements::from_landmarks(m)
                .map_err(|e| debug!(error = %e, "measurements skipped"))
                .ok()
        });
        let symmetry = metric.as_ref().and_then(|(_, m)| {
            analyze_symmetry(m)
                .map_err(|e| debug!(error = %e, "symmetry report skipped"))
                .ok()
        });
        let volumes = metric
            .as_ref()
            .map(|(_, m)| estimate_all_regions(m))
            .unwrap_or_default();
        let face_shape = measurements.as_ref().map(FaceShapeResult::from_measurements);
        let discord = analyze_discord(input.blendshapes.as_ref(), &self.thresholds);

        let geometry_missing = || DomainOutcome::unavailable("landmarks incomplete");
        let domains = vec![
            FasDomainScore::new(
                FasDomain::FaceShape,
                face_shape.as_ref().map_or_else(geometry_missing, face_shape_outcome),
            ),
            FasDomainScore::new(
                FasDomain::Proportion,
                measurements.as_ref().map_or_else(geometry_missing, proportion_outcome),
            ),
            FasDomainScore::new(
                FasDomain::Symmetry,
                measurements.as_ref().map_or_else(geometry_missing, symmetry_outcome),
            ),
            FasDomainScore::new(FasDomain::Expression, expression_outcome(&discord)),
            FasDomainScore::new(FasDomain::SkinQuality, skin_quality_outcome(input.skin_quality)),
        ];
        for d in domains.iter().filter(|d| !d.has_real_data()) {
            debug!(domain = d.domain.label(), "domain unavailable");
        }

        FrameAnalysis {
            calibration: metric.map(|(c, _)| c),
            ideal_checks: measurements.as_ref().map(ideal_checks).unwrap_or_default(),
            measurements,
            symmetry,
            volumes,
            face_shape,
            discord,
            fas: aggregate(domains),
        }
    }

    /// Pull one frame from `source` and analyze it.
    pub fn analyze_next<S: DetectionSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Option<FrameAnalysis> {
        source.next_frame().map(|frame| self.analyze(&frame))
    }
}
