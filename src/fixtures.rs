//! Synthetic detections shared by unit tests.

use crate::landmarks::indices::*;
use crate::types::{Landmarks, Point3};

fn mirror(p: Point3) -> Point3 {
    Point3::new(1.0 - p.x, p.y, p.z)
}

/// A frontal, perfectly mirrored 478-point face centred on x = 0.5 with
/// eye centres 0.2 normalized units apart.
pub fn frontal_face() -> Landmarks {
    let mut points = vec![Point3::new(0.5, 0.5, 0.0); 478];

    points[FOREHEAD_TOP] = Point3::new(0.5, 0.10, -0.02);
    points[GLABELLA] = Point3::new(0.5, 0.30, -0.03);
    points[NOSE_TIP] = Point3::new(0.5, 0.46, -0.09);
    points[NASAL_BASE] = Point3::new(0.5, 0.50, -0.05);
    points[LIP_TOP] = Point3::new(0.5, 0.585, -0.06);
    points[LIP_BOTTOM] = Point3::new(0.5, 0.605, -0.06);
    points[MENTO] = Point3::new(0.5, 0.67, -0.03);
    points[CHIN] = Point3::new(0.5, 0.70, -0.02);

    let bilateral = [
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
    ];
    for (left, right, p) in bilateral {
        points[left] = p;
        points[right] = mirror(p);
    }

    Landmarks::new(points)
}
