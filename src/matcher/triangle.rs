//! Triangle shape descriptor over three planar points.
//!
//! A triangle caches its side lengths and interior angles at construction so
//! that the invariant tests the search relies on (symmetry, shape
//! commensurability, chirality) reduce to tolerance comparisons with no
//! further geometry.
//! `sizes[i]` is the length of the side *opposite* vertex `i`, so ranking
//! vertices by opposite side length and ranking them by angle agree.

use crate::{Point, Vector2};

/// Three points with cached side lengths and interior angles.
///
/// Vertices keep their construction order (stable indices 0..2); all derived
/// quantities are deterministic functions of the three points, so rebuilding
/// a triangle from the same points reproduces it exactly.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Point; 3],
    /// Side lengths; `sizes[i]` is opposite `vertices[i]`.
    sizes: [f64; 3],
    /// Interior angles in degrees; `angles[i]` is at `vertices[i]`.
    angles: [f64; 3],
    angle_tolerance_deg: f64,
}

impl Triangle {
    /// Build a triangle from three points.
    ///
    /// `angle_tolerance_deg` is the tolerance later used by
    /// [`is_symmetric`](Self::is_symmetric). Degenerate input (coincident or
    /// collinear points) is accepted here and classified as symmetric rather
    /// than rejected, so the search can skip it without an error path.
    pub fn new(p0: Point, p1: Point, p2: Point, angle_tolerance_deg: f64) -> Self {
        let vertices = [p0, p1, p2];
        let sizes = [(p1 - p2).norm(), (p0 - p2).norm(), (p0 - p1).norm()];

        let mut angles = [0.0f64; 3];
        for i in 0..3 {
            let a = sizes[i];
            let b = sizes[(i + 1) % 3];
            let c = sizes[(i + 2) % 3];
            let denom = 2.0 * b * c;
            angles[i] = if denom > 0.0 {
                // Law of cosines; clamp guards rounding just outside [-1, 1]
                ((b * b + c * c - a * a) / denom)
                    .clamp(-1.0, 1.0)
                    .acos()
                    .to_degrees()
            } else {
                0.0
            };
        }

        Self {
            vertices,
            sizes,
            angles,
            angle_tolerance_deg,
        }
    }

    /// Vertex `i` (construction order).
    pub fn vertex(&self, i: usize) -> &Point {
        &self.vertices[i]
    }

    /// Side lengths, each opposite its same-index vertex.
    pub fn sizes(&self) -> &[f64; 3] {
        &self.sizes
    }

    /// Interior angles in degrees, one per vertex.
    pub fn angles(&self) -> &[f64; 3] {
        &self.angles
    }

    /// Shortest side length.
    pub fn min_side(&self) -> f64 {
        self.sizes.iter().cloned().fold(f64::MAX, f64::min)
    }

    /// Smallest interior angle in degrees.
    pub fn min_angle_deg(&self) -> f64 {
        self.angles.iter().cloned().fold(f64::MAX, f64::min)
    }

    // ── Invariant tests ─────────────────────────────────────────────────────

    /// True if the triangle is ambiguous for vertex ranking: two interior
    /// angles coincide within the angular tolerance, or a side has collapsed
    /// to zero length (coincident points).
    ///
    /// Isosceles and equilateral triangles admit more than one vertex
    /// correspondence with a similar triangle, so they are never used.
    pub fn is_symmetric(&self) -> bool {
        if self.min_side() <= 0.0 {
            return true;
        }
        for i in 0..3 {
            for j in (i + 1)..3 {
                if (self.angles[i] - self.angles[j]).abs() <= self.angle_tolerance_deg {
                    return true;
                }
            }
        }
        false
    }

    /// Vertex indices ordered by opposite side length, largest first.
    ///
    /// The sort is stable, so exact ties resolve toward the lower vertex
    /// index and the ranking is reproducible.
    pub fn ranked_vertices(&self) -> [usize; 3] {
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| {
            self.sizes[b]
                .partial_cmp(&self.sizes[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }

    /// Pair same-rank vertices of `self` and `other`.
    ///
    /// Entry `k` is `(self_vertex_index, other_vertex_index)` at rank `k`.
    /// This is how "triangle A matches triangle B" becomes a usable
    /// point-to-point correspondence.
    pub fn vertex_correspondence(&self, other: &Triangle) -> [(usize, usize); 3] {
        let rs = self.ranked_vertices();
        let ro = other.ranked_vertices();
        [(rs[0], ro[0]), (rs[1], ro[1]), (rs[2], ro[2])]
    }

    /// True if the two triangles have the same shape up to uniform scale:
    /// the ranked side-length ratios (largest/largest, mid/mid,
    /// smallest/smallest) agree within `shape_tolerance` relative spread.
    pub fn commensurable(&self, other: &Triangle, shape_tolerance: f64) -> bool {
        let rs = self.ranked_vertices();
        let ro = other.ranked_vertices();

        let mut ratios = [0.0f64; 3];
        for k in 0..3 {
            let denom = other.sizes[ro[k]];
            if denom <= 0.0 {
                return false;
            }
            ratios[k] = self.sizes[rs[k]] / denom;
        }

        let max = ratios.iter().cloned().fold(f64::MIN, f64::max);
        let min = ratios.iter().cloned().fold(f64::MAX, f64::min);
        let mean = (ratios[0] + ratios[1] + ratios[2]) / 3.0;
        max - min <= shape_tolerance * mean
    }

    /// True if the implied vertex correspondence preserves orientation.
    ///
    /// A mirror-image pair winds in opposite directions and cannot be related
    /// by rotation and scale alone, so it is rejected.
    pub fn rotatable(&self, other: &Triangle) -> bool {
        self.winding() * other.winding() > 0.0
    }

    /// Signed doubled area of the ranked vertex sequence.
    fn winding(&self) -> f64 {
        let r = self.ranked_vertices();
        let a = self.vertices[r[0]];
        let b = self.vertices[r[1]];
        let c = self.vertices[r[2]];
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    // ── Transform estimation ────────────────────────────────────────────────

    /// Uniform scale of `self` relative to `other` (perimeter ratio).
    pub fn size_factor(&self, other: &Triangle) -> f64 {
        let ps: f64 = self.sizes.iter().sum();
        let po: f64 = other.sizes.iter().sum();
        ps / po
    }

    /// Rotation of `self` relative to `other`, in degrees counter-clockwise:
    /// the angle that carries `other`'s edges onto `self`'s under the implied
    /// vertex correspondence.
    ///
    /// Computed as the circular mean of the three per-edge rotations, which
    /// averages out coordinate noise without wraparound artifacts at ±180°.
    pub fn rotation_factor(&self, other: &Triangle) -> f64 {
        let rs = self.ranked_vertices();
        let ro = other.ranked_vertices();

        let mut sin_sum = 0.0f64;
        let mut cos_sum = 0.0f64;
        for k in 0..3 {
            let es = self.vertices[rs[(k + 1) % 3]] - self.vertices[rs[k]];
            let eo = other.vertices[ro[(k + 1) % 3]] - other.vertices[ro[k]];
            let cross = eo.x * es.y - eo.y * es.x;
            let dot = eo.x * es.x + eo.y * es.y;
            let angle = cross.atan2(dot);
            sin_sum += angle.sin();
            cos_sum += angle.cos();
        }
        sin_sum.atan2(cos_sum).to_degrees()
    }

    /// Translation that carries `other`'s top-ranked vertex onto `self`'s
    /// once `other` has been scaled by [`size_factor`](Self::size_factor) and
    /// rotated by [`rotation_factor`](Self::rotation_factor).
    pub fn shift_factor(&self, other: &Triangle) -> Vector2 {
        let s = self.size_factor(other);
        let theta = self.rotation_factor(other).to_radians();
        let (sin_t, cos_t) = theta.sin_cos();

        let vs = self.vertices[self.ranked_vertices()[0]];
        let vo = other.vertices[other.ranked_vertices()[0]];

        Vector2::new(
            vs.x - s * (cos_t * vo.x - sin_t * vo.y),
            vs.y - s * (sin_t * vo.x + cos_t * vo.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(points: [(f64, f64); 3], tol: f64) -> Triangle {
        Triangle::new(
            Point::new(points[0].0, points[0].1),
            Point::new(points[1].0, points[1].1),
            Point::new(points[2].0, points[2].1),
            tol,
        )
    }

    /// Apply scale/rotation/shift to a point (forward model used for
    /// constructing known-answer pairs).
    fn transformed(p: (f64, f64), s: f64, theta_deg: f64, t: (f64, f64)) -> (f64, f64) {
        let th = theta_deg.to_radians();
        (
            s * (th.cos() * p.0 - th.sin() * p.1) + t.0,
            s * (th.sin() * p.0 + th.cos() * p.1) + t.1,
        )
    }

    #[test]
    fn test_sides_and_angles_3_4_5() {
        let t = tri([(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)], 0.5);
        // Side opposite vertex 0 is the hypotenuse
        assert!((t.sizes()[0] - 5.0).abs() < 1e-12);
        assert!((t.sizes()[1] - 3.0).abs() < 1e-12);
        assert!((t.sizes()[2] - 4.0).abs() < 1e-12);
        // Right angle at vertex 0
        assert!((t.angles()[0] - 90.0).abs() < 1e-9);
        assert!((t.angles()[0] + t.angles()[1] + t.angles()[2] - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_detection() {
        // Scalene: not symmetric
        assert!(!tri([(0.0, 0.0), (20.0, 2.0), (7.0, 16.0)], 0.5).is_symmetric());
        // Isosceles right triangle
        assert!(tri([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 0.5).is_symmetric());
        // Equilateral
        assert!(tri([(0.0, 0.0), (20.0, 0.0), (10.0, 17.320508)], 0.5).is_symmetric());
        // Coincident points
        assert!(tri([(1.0, 1.0), (1.0, 1.0), (5.0, 9.0)], 0.5).is_symmetric());
        // Collinear points
        assert!(tri([(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)], 0.5).is_symmetric());
    }

    #[test]
    fn test_ranked_vertices_by_opposite_side() {
        let t = tri([(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)], 0.5);
        // sizes = [5, 3, 4] → descending order of opposite side: 0, 2, 1
        assert_eq!(t.ranked_vertices(), [0, 2, 1]);
    }

    #[test]
    fn test_commensurable_scaled_copy() {
        let a = tri([(0.0, 0.0), (20.0, 2.0), (7.0, 16.0)], 0.5);
        let pts = [(0.0, 0.0), (20.0, 2.0), (7.0, 16.0)];
        let b = tri(
            [
                transformed(pts[0], 2.3, 71.0, (4.0, -9.0)),
                transformed(pts[1], 2.3, 71.0, (4.0, -9.0)),
                transformed(pts[2], 2.3, 71.0, (4.0, -9.0)),
            ],
            0.5,
        );
        assert!(b.commensurable(&a, 0.05));
        assert!(a.commensurable(&b, 0.05));

        // A differently shaped triangle is not commensurable
        let c = tri([(0.0, 0.0), (30.0, 1.0), (3.0, 11.0)], 0.5);
        assert!(!c.commensurable(&a, 0.05));
    }

    #[test]
    fn test_rotatable_rejects_mirror() {
        let pts = [(0.0, 0.0), (20.0, 2.0), (7.0, 16.0)];
        let a = tri(pts, 0.5);
        let rotated = tri(
            [
                transformed(pts[0], 1.0, 40.0, (3.0, 3.0)),
                transformed(pts[1], 1.0, 40.0, (3.0, 3.0)),
                transformed(pts[2], 1.0, 40.0, (3.0, 3.0)),
            ],
            0.5,
        );
        let mirrored = tri(
            [
                (-pts[0].0, pts[0].1),
                (-pts[1].0, pts[1].1),
                (-pts[2].0, pts[2].1),
            ],
            0.5,
        );
        assert!(rotated.rotatable(&a));
        assert!(!mirrored.rotatable(&a));
    }

    #[test]
    fn test_factor_recovery() {
        let pts = [(0.0, 0.0), (20.0, 2.0), (7.0, 16.0)];
        let (s, theta, shift) = (1.7, -38.0, (12.0, 5.0));
        let reference = tri(pts, 0.5);
        let object = tri(
            [
                transformed(pts[0], s, theta, shift),
                transformed(pts[1], s, theta, shift),
                transformed(pts[2], s, theta, shift),
            ],
            0.5,
        );

        assert!((object.size_factor(&reference) - s).abs() < 1e-9);
        assert!((object.rotation_factor(&reference) - theta).abs() < 1e-9);
        let sh = object.shift_factor(&reference);
        assert!((sh.x - shift.0).abs() < 1e-9);
        assert!((sh.y - shift.1).abs() < 1e-9);
    }

    #[test]
    fn test_vertex_correspondence_tracks_ranking() {
        let pts = [(0.0, 0.0), (20.0, 2.0), (7.0, 16.0)];
        let a = tri(pts, 0.5);
        // Same triangle with vertices supplied in a different order
        let b = tri([pts[2], pts[0], pts[1]], 0.5);
        for &(ia, ib) in a.vertex_correspondence(&b).iter() {
            // Corresponding vertices are the same physical points
            assert!((a.vertex(ia) - b.vertex(ib)).norm() < 1e-12);
        }
    }
}
