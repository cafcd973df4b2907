use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 3D point. For raw detections `x` and `y` are normalized to the image
/// size and `z` is the detector's depth proxy on a comparable scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Euclidean distance in 3D.
    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance in the image plane, ignoring depth.
    pub fn distance_2d(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point3) -> Point3 {
        Point3::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Point3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::AddAssign for Point3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl std::ops::Sub for Point3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl std::ops::Mul<f64> for Point3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl From<Point3> for nalgebra::Vector3<f64> {
    fn from(p: Point3) -> Self {
        nalgebra::Vector3::new(p.x, p.y, p.z)
    }
}

/// Read access to an ordered landmark sequence.
///
/// Implemented by both the raw detector output and the metric-space copy, so
/// measurement code runs unchanged over either coordinate space.
pub trait LandmarkAccess {
    /// Number of points in the detection.
    fn len(&self) -> usize;

    /// The point at `index`, or `None` if the detection is too short.
    fn point(&self, index: usize) -> Option<Point3>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Like [`point`](Self::point) but reports which index was missing.
    fn require(&self, index: usize) -> Result<Point3> {
        self.point(index).ok_or(Error::LandmarkOutOfRange {
            index,
            len: self.len(),
        })
    }
}

/// A detected face mesh: a fixed-topology ordered sequence of points.
/// The position in the sequence is the anatomical index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Landmarks {
    pub points: Vec<Point3>,
}

impl Landmarks {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    pub fn get(&self, index: usize) -> Result<Point3> {
        self.require(index)
    }

    /// Arithmetic mean of every point, per axis.
    pub fn centroid(&self) -> Point3 {
        if self.points.is_empty() {
            return Point3::zero();
        }
        let mut sum = Point3::zero();
        for p in &self.points {
            sum += *p;
        }
        sum * (1.0 / self.points.len() as f64)
    }
}

impl LandmarkAccess for Landmarks {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }
}

impl From<Vec<Point3>> for Landmarks {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point3> for Landmarks {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(3.0, 4.0, 5.0);

        let sum = a + b;
        assert_eq!(sum, Point3::new(4.0, 6.0, 8.0));

        let diff = b - a;
        assert_eq!(diff, Point3::new(2.0, 2.0, 2.0));

        let scaled = a * 2.0;
        assert_eq!(scaled, Point3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn distances() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert!((a.distance(&b) - 13.0).abs() < 1e-12);
        assert!((a.distance_2d(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.midpoint(&b), Point3::new(1.5, 2.0, 6.0));
    }

    #[test]
    fn centroid_is_per_axis_mean() {
        let lm = Landmarks::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(2.0, 4.0, -3.0),
        ]);
        let c = lm.centroid();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y - 2.0).abs() < 1e-12);
        assert!(c.z.abs() < 1e-12);
    }

    #[test]
    fn out_of_range_lookup_reports_index() {
        let lm = Landmarks::new(vec![Point3::zero(); 3]);
        match lm.get(10) {
            Err(Error::LandmarkOutOfRange { index, len }) => {
                assert_eq!(index, 10);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(lm.point(2).is_some());
        assert!(lm.point(3).is_none());
    }

    #[test]
    fn landmarks_deserialize_from_plain_array() {
        let json = r#"[{"x":0.1,"y":0.2,"z":0.3},{"x":0.4,"y":0.5}]"#;
        let lm: Landmarks = serde_json::from_str(json).unwrap();
        assert_eq!(lm.num_landmarks(), 2);
        assert_eq!(lm.points[1].z, 0.0);
    }
}
