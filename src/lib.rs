//! # fas-face
//!
//! Clinical facial measurement and composite aesthetic scoring from
//! face-mesh landmarks.
//!
//! This crate provides:
//! - **Calibration**: millimetre scale from the interpupillary distance
//! - **Measurements**: anatomical distances, ratios, facial thirds and fifths
//! - **Symmetry**: sagittal-reflection asymmetry per bilateral pair
//! - **Volumes**: tetrahedral fan estimates of soft-tissue regions
//! - **Dynamic discord**: blendshape activation scored per clinical zone
//! - **FAS**: a weighted five-domain score that degrades gracefully when
//!   domains lack data
//!
//! The input is an already-detected MediaPipe-style face mesh (468 or 478
//! points, normalized to the image) and, optionally, the detector's
//! blendshape coefficients.
//!
//! ## Pipeline
//!
//! 1. Calibrate: eye-centre distance pinned to a reference IPD (63 mm)
//! 2. Convert every landmark to centred millimetre space
//! 3. Measure, reflect and decompose the metric mesh
//! 4. Score expression zones from blendshapes
//! 5. Aggregate the five domains over those with real data
//!
//! ## Quick Start
//!
//! ```rust
//! use fas_face::{Blendshapes, Engine, EngineConfig, FrameInput, Landmarks, Point3};
//!
//! # fn main() -> fas_face::Result<()> {
//! let engine = Engine::new(EngineConfig::default())?;
//!
//! // Landmarks normally come from a face-mesh detector.
//! let landmarks: Landmarks = (0..478)
//!     .map(|i| Point3::new(0.3 + (i % 20) as f64 * 0.02, 0.2 + (i / 20) as f64 * 0.025, 0.0))
//!     .collect();
//!
//! let blendshapes: Blendshapes = [("browDownLeft", 0.9), ("browDownRight", 0.1)]
//!     .into_iter()
//!     .collect();
//!
//! let analysis = engine.analyze(&FrameInput::new(landmarks).with_blendshapes(blendshapes));
//! println!("FAS {} ({})", analysis.fas.global_score, analysis.fas.global_grade.label());
//! println!("{}", analysis.discord.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Other coordinate spaces
//!
//! Measurement and symmetry code runs over anything implementing
//! [`LandmarkAccess`]:
//!
//! ```rust
//! use fas_face::{LandmarkAccess, Point3};
//!
//! struct Mesh(Vec<[f64; 3]>);
//!
//! impl LandmarkAccess for Mesh {
//!     fn len(&self) -> usize { self.0.len() }
//!     fn point(&self, index: usize) -> Option<Point3> {
//!         self.0.get(index).map(|p| Point3::new(p[0], p[1], p[2]))
//!     }
//! }
//! ```

pub mod alignment;
pub mod calibration;
pub mod composite;
pub mod config;
pub mod discord;
pub mod engine;
mod error;
pub mod face_shape;
pub mod landmarks;
pub mod measurements;
pub mod metric;
pub mod symmetry;
mod types;
pub mod volume;

#[cfg(test)]
mod fixtures;

pub use alignment::{compare_anchor_shapes, AlignmentReport};
pub use calibration::Calibration;
pub use composite::{DomainOutcome, FasDomain, FasDomainScore, FasResult, Grade};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use discord::{
    analyze_discord, Blendshapes, ClinicalZone, DynamicDiscordResult, ZoneDiscordResult,
};
pub use engine::{DetectionSource, Engine, FrameAnalysis, FrameInput};
pub use error::{Error, Result};
pub use face_shape::{FaceShape, FaceShapeResult};
pub use measurements::{ideal_checks, FacialMeasurements, IdealCheck, IdealStatus};
pub use metric::{MetricLandmark, MetricLandmarks};
pub use symmetry::{analyze_symmetry, SymmetryReport};
pub use types::{LandmarkAccess, Landmarks, Point3};
pub use volume::{RegionVolume, VolumetricRegion};
