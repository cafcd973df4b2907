//! Conversion from normalized detector space to centred millimetre space.

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::landmarks::is_anchor;
use crate::types::{LandmarkAccess, Landmarks, Point3};

/// A landmark in millimetres, relative to the face centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricLandmark {
    pub position: Point3,
    /// Index in the source detection.
    pub index: usize,
    /// Member of the cross-frame alignment anchor set.
    pub is_anchor: bool,
}

/// Metric copy of a whole detection, index-aligned with the source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricLandmarks {
    pub points: Vec<MetricLandmark>,
}

impl MetricLandmarks {
    /// `(landmark - centroid) * scale_factor` for every point.
    pub fn from_landmarks(landmarks: &Landmarks, calibration: &Calibration) -> Self {
        let points = landmarks
            .points
            .iter()
            .enumerate()
            .map(|(index, p)| MetricLandmark {
                position: (*p - calibration.centroid) * calibration.scale_factor,
                index,
                is_anchor: is_anchor(index),
            })
            .collect();
        Self { points }
    }

    pub fn anchors(&self) -> impl Iterator<Item = &MetricLandmark> {
        self.points.iter().filter(|m| m.is_anchor)
    }

    pub fn positions(&self) -> Vec<Point3> {
        self.points.iter().map(|m| m.position).collect()
    }
}

impl LandmarkAccess for MetricLandmarks {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Option<Point3> {
        self.points.get(index).map(|m| m.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{indices, ANCHOR_INDICES};

    fn calibration(scale_factor: f64, centroid: Point3) -> Calibration {
        Calibration {
            scale_factor,
            normalized_ipd: 63.0 / scale_factor,
            reference_ipd_mm: 63.0,
            centroid,
            confidence: 1.0,
        }
    }

    #[test]
    fn centres_and_scales() {
        let lm = Landmarks::new(vec![Point3::new(0.4, 0.5, 0.0), Point3::new(0.6, 0.5, 0.1)]);
        let cal = calibration(100.0, lm.centroid());
        let metric = MetricLandmarks::from_landmarks(&lm, &cal);

        let a = metric.point(0).unwrap();
        let b = metric.point(1).unwrap();
        assert!((a.x + 10.0).abs() < 1e-9);
        assert!((b.x - 10.0).abs() < 1e-9);
        assert!((b.z - 5.0).abs() < 1e-9);
        // Metric distances are the normalized ones times the scale.
        let norm = lm.points[0].distance(&lm.points[1]);
        assert!((a.distance(&b) - norm * 100.0).abs() < 1e-9);
    }

    #[test]
    fn anchors_are_tagged() {
        let lm = Landmarks::new(vec![Point3::new(0.5, 0.5, 0.0); 468]);
        let cal = calibration(420.0, lm.centroid());
        let metric = MetricLandmarks::from_landmarks(&lm, &cal);

        assert_eq!(metric.anchors().count(), ANCHOR_INDICES.len());
        assert!(metric.points[indices::GLABELLA].is_anchor);
        assert!(!metric.points[indices::FOREHEAD_TOP].is_anchor);
        assert_eq!(metric.points[200].index, 200);
    }
}
