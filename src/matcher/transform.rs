//! Similarity transform between the object and reference planar frames.
//!
//! Parameterized the way a plate header records it: the object frame is a
//! scaled, rotated, shifted view of the reference frame. The matching engine
//! applies the inverse mapping to project detections onto the catalogue
//! plane.

use crate::Point;

/// Parameters of a similarity mapping between the two planar frames.
///
/// Forward model: `p_object = scale · R(rotation) · p_reference + (dx, dy)`,
/// with `scale = 1 / inv_scale` and `R` a counter-clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTransform {
    /// Translation of the object frame along x, in object-frame units.
    pub dx: f64,
    /// Translation of the object frame along y, in object-frame units.
    pub dy: f64,
    /// Rotation of the object frame relative to the reference frame, in
    /// degrees counter-clockwise.
    pub rotation_deg: f64,
    /// Reference-frame units per object-frame unit (`1 / scale`).
    pub inv_scale: f64,
}

impl SimilarityTransform {
    /// Uniform scale of the object frame relative to the reference frame.
    pub fn scale(&self) -> f64 {
        1.0 / self.inv_scale
    }

    /// Map an object-frame point into the reference frame.
    pub fn object_to_reference(&self, p: &Point) -> Point {
        let theta = self.rotation_deg.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let x = p.x - self.dx;
        let y = p.y - self.dy;
        Point::new(
            self.inv_scale * (cos_t * x + sin_t * y),
            self.inv_scale * (-sin_t * x + cos_t * y),
        )
    }

    /// Map a reference-frame point into the object frame (forward model).
    pub fn reference_to_object(&self, p: &Point) -> Point {
        let theta = self.rotation_deg.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let s = self.scale();
        Point::new(
            s * (cos_t * p.x - sin_t * p.y) + self.dx,
            s * (sin_t * p.x + cos_t * p.y) + self.dy,
        )
    }
}

/// Normalize an angle in degrees to the range `[0, 360)`.
pub fn normalize_angle_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let t = SimilarityTransform {
            dx: 2.0,
            dy: 3.0,
            rotation_deg: 30.0,
            inv_scale: 1.0 / 1.5,
        };
        let p = Point::new(7.3, -4.1);
        let back = t.object_to_reference(&t.reference_to_object(&p));
        assert!((back - p).norm() < 1e-12);
    }

    #[test]
    fn test_forward_model_known_values() {
        // 90° rotation, scale 2, shift (1, 1): (1, 0) → (1, 3)
        let t = SimilarityTransform {
            dx: 1.0,
            dy: 1.0,
            rotation_deg: 90.0,
            inv_scale: 0.5,
        };
        let q = t.reference_to_object(&Point::new(1.0, 0.0));
        assert!((q.x - 1.0).abs() < 1e-12);
        assert!((q.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle_deg(-40.0) - 320.0).abs() < 1e-12);
        assert!((normalize_angle_deg(370.0) - 10.0).abs() < 1e-12);
        assert!((normalize_angle_deg(30.0) - 30.0).abs() < 1e-12);
    }
}
