//! Synthetic detections for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;

use fas_face::landmarks::indices::*;
use fas_face::{Landmarks, Point3, VolumetricRegion};

pub const MESH_SIZE: usize = 478;

fn mirror(p: Point3) -> Point3 {
    Point3::new(1.0 - p.x, p.y, p.z)
}

/// Frontal, mirrored face centred on x = 0.5 with eye centres 0.2 apart.
/// Region boundaries are laid out as shallow arcs in front of their deep
/// anchors so every region has a non-zero volume.
pub fn synthetic_face() -> Landmarks {
    let mut points = vec![Point3::new(0.5, 0.5, 0.0); MESH_SIZE];
    let mut assigned = HashSet::new();

    for (idx, p) in [
        (FOREHEAD_TOP, Point3::new(0.5, 0.10, -0.02)),
        (GLABELLA, Point3::new(0.5, 0.30, -0.03)),
        (NOSE_TIP, Point3::new(0.5, 0.46, -0.09)),
        (NASAL_BASE, Point3::new(0.5, 0.50, -0.05)),
        (LIP_TOP, Point3::new(0.5, 0.585, -0.06)),
        (LIP_BOTTOM, Point3::new(0.5, 0.605, -0.06)),
        (MENTO, Point3::new(0.5, 0.67, -0.03)),
        (CHIN, Point3::new(0.5, 0.70, -0.02)),
    ] {
        set(&mut points, &mut assigned, idx, p);
    }

    for (left, right, p) in [
        (ZYGOMA_LEFT, ZYGOMA_RIGHT, Point3::new(0.29, 0.42, 0.03)),
        (GONION_LEFT, GONION_RIGHT, Point3::new(0.33, 0.62, 0.05)),
        (EYE_LEFT_OUTER, EYE_RIGHT_OUTER, Point3::new(0.36, 0.36, 0.0)),
        (EYE_LEFT_INNER, EYE_RIGHT_INNER, Point3::new(0.44, 0.36, 0.0)),
        (EYE_LEFT_TOP, EYE_RIGHT_TOP, Point3::new(0.40, 0.345, -0.005)),
        (EYE_LEFT_BOTTOM, EYE_RIGHT_BOTTOM, Point3::new(0.40, 0.375, -0.005)),
        (BROW_LEFT_PEAK, BROW_RIGHT_PEAK, Point3::new(0.39, 0.29, -0.01)),
        (ALA_LEFT, ALA_RIGHT, Point3::new(0.455, 0.49, -0.04)),
        (MOUTH_LEFT, MOUTH_RIGHT, Point3::new(0.43, 0.595, -0.03)),
        (CUPID_LEFT, CUPID_RIGHT, Point3::new(0.485, 0.565, -0.06)),
        (MALAR_LEFT, MALAR_RIGHT, Point3::new(0.37, 0.45, -0.02)),
    ] {
        set(&mut points, &mut assigned, left, p);
        set(&mut points, &mut assigned, right, mirror(p));
    }

    let regions = [
        (VolumetricRegion::LeftMalar, Point3::new(0.36, 0.47, -0.02)),
        (VolumetricRegion::RightMalar, Point3::new(0.64, 0.47, -0.02)),
        (VolumetricRegion::LeftNasolabial, Point3::new(0.44, 0.55, -0.04)),
        (VolumetricRegion::RightNasolabial, Point3::new(0.56, 0.55, -0.04)),
        (VolumetricRegion::Lips, Point3::new(0.5, 0.595, -0.07)),
        (VolumetricRegion::Chin, Point3::new(0.5, 0.66, -0.03)),
    ];
    for (region, centre) in regions {
        let surface = region.surface_indices();
        for (k, &idx) in surface.iter().enumerate() {
            if assigned.contains(&idx) {
                continue;
            }
            let angle = k as f64 / surface.len() as f64 * std::f64::consts::PI;
            let p = Point3::new(
                centre.x + 0.03 * angle.cos(),
                centre.y + 0.03 * angle.sin(),
                centre.z,
            );
            set(&mut points, &mut assigned, idx, p);
        }
        let anchor = region.deep_anchor_index();
        if !assigned.contains(&anchor) {
            let raised = Point3::new(centre.x, centre.y, centre.z + 0.03);
            set(&mut points, &mut assigned, anchor, raised);
        }
    }

    Landmarks::new(points)
}

fn set(points: &mut [Point3], assigned: &mut HashSet<usize>, idx: usize, p: Point3) {
    points[idx] = p;
    assigned.insert(idx);
}

/// Uniformly scale `face` about (0.5, 0.5, 0) and shift it in the image plane.
pub fn scaled_face(face: &Landmarks, scale: f64, dx: f64, dy: f64) -> Landmarks {
    face.points
        .iter()
        .map(|p| {
            Point3::new(
                0.5 + (p.x - 0.5) * scale + dx,
                0.5 + (p.y - 0.5) * scale + dy,
                p.z * scale,
            )
        })
        .collect()
}

/// Add per-coordinate noise; `noise` holds three values per landmark.
pub fn jittered_face(face: &Landmarks, noise: &[f64]) -> Landmarks {
    face.points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let n = |k: usize| noise.get(i * 3 + k).copied().unwrap_or(0.0);
            Point3::new(p.x + n(0), p.y + n(1), p.z + n(2))
        })
        .collect()
}
