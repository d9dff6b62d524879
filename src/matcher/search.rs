//! Triangle-pair search: the matching engine's entry point.
//!
//! Enumerates reference and object point triples, gates each triangle pair
//! through the geometric invariant tests, refines surviving candidates, and
//! accepts the first one whose greedy extension pairs enough points:
//!
//! 1. Required match size is `min(5, reference.len())`.
//! 2. Reference triples run in the outer loop, object triples in the inner
//!    loop, both in lexicographic order. The first accepted candidate in this
//!    order terminates the search; no globally best candidate is sought, so
//!    the enumeration order is part of the contract.
//! 3. A pair is rejected if either triangle is symmetric, if the object
//!    triangle is too small or too elongated, if the shapes disagree, or if
//!    the pair is mirror-imaged.
//! 4. Known scale/rotation hints prune candidates before refinement.
//! 5. The refined anchor fit sets the acceptance radius
//!    `τ = distance_tolerance · residual` for correspondence extension.

use std::time::Instant;

use tracing::debug;

use crate::Point;

use super::extend::extend_correspondences;
use super::refine::{LeastSquaresRefiner, SimilarityRefiner};
use super::transform::{normalize_angle_deg, SimilarityTransform};
use super::triangle::Triangle;
use super::triples::LexTriples;
use super::{MatchConfig, MatchResult, MatchStatus};

// ── Fixed geometric gates ───────────────────────────────────────────────────

/// Shortest usable side of an object triangle, in pixel units. Smaller
/// triangles carry too little leverage for a reliable transform estimate.
const MIN_SIDE_LENGTH: f64 = 10.0;

/// Smallest usable interior angle of an object triangle, in degrees. Below
/// this the triangle is too elongated and its vertex ranking is unstable.
const MIN_ANGLE_DEG: f64 = 10.0;

/// Accepted band for `known_scale / derived_scale` when a scale hint is set.
const KNOWN_SCALE_BAND: (f64, f64) = (0.9, 1.1);

/// Accepted deviation between a rotation hint and the derived rotation,
/// in degrees, both normalized to `[0, 360)`.
const KNOWN_ROTATION_BAND_DEG: f64 = 10.0;

/// A match never needs to pair more than this many points to be accepted.
const MAX_REQUIRED_MATCHES: usize = 5;

// ── Match entry points ──────────────────────────────────────────────────────

/// Match two point sets with the default least-squares refiner.
///
/// `reference` holds catalogue positions, `object` holds detections, both as
/// (x, y) pairs in a shared local planar frame. The similarity transform
/// relating them (translation, rotation, uniform scale) is unknown and is
/// recovered as part of the match.
///
/// Absence of a match is an ordinary outcome reported through
/// [`MatchResult::status`], never an error: fewer than three points on
/// either side yields `TooFew`, an exhausted search yields `NoMatch`.
pub fn match_point_sets(
    reference: &[Point],
    object: &[Point],
    config: &MatchConfig,
) -> MatchResult {
    match_point_sets_with(&LeastSquaresRefiner, reference, object, config)
}

/// Match two point sets using a caller-supplied refiner back-end.
pub fn match_point_sets_with<F: SimilarityRefiner>(
    refiner: &F,
    reference: &[Point],
    object: &[Point],
    config: &MatchConfig,
) -> MatchResult {
    let t0 = Instant::now();

    if reference.len() < 3 || object.len() < 3 {
        return MatchResult::failure(MatchStatus::TooFew, elapsed_ms(t0));
    }

    let required = reference.len().min(MAX_REQUIRED_MATCHES);

    // Object triangles are reused across every reference triple, so build
    // them once, with the per-triangle gates (symmetry, size, elongation)
    // folded into a usability flag.
    let object_triangles: Vec<(Triangle, bool)> = LexTriples::new(object.len())
        .map(|t| {
            let tri = Triangle::new(
                object[t[0]],
                object[t[1]],
                object[t[2]],
                config.angle_tolerance_deg,
            );
            let usable = !tri.is_symmetric()
                && tri.min_side() >= MIN_SIDE_LENGTH
                && tri.min_angle_deg() > MIN_ANGLE_DEG;
            (tri, usable)
        })
        .collect();

    let num_usable = object_triangles.iter().filter(|(_, u)| *u).count();
    debug!(
        "Matching {} reference / {} object points: {} of {} object triangles usable, {} pairs required",
        reference.len(),
        object.len(),
        num_usable,
        object_triangles.len(),
        required
    );

    let mut candidates_tried = 0u64;

    for ref_triple in LexTriples::new(reference.len()) {
        if let Some(t) = config.timeout_ms {
            if elapsed_ms(t0) > t as f32 {
                debug!("Timeout after {:.1}ms", elapsed_ms(t0));
                let mut result = MatchResult::failure(MatchStatus::Timeout, elapsed_ms(t0));
                result.candidates_tried = candidates_tried;
                return result;
            }
        }

        let tri_ref = Triangle::new(
            reference[ref_triple[0]],
            reference[ref_triple[1]],
            reference[ref_triple[2]],
            config.angle_tolerance_deg,
        );
        if tri_ref.is_symmetric() {
            continue;
        }

        for &(ref tri_obj, usable) in &object_triangles {
            if !usable
                || !tri_obj.commensurable(&tri_ref, config.shape_tolerance)
                || !tri_obj.rotatable(&tri_ref)
            {
                continue;
            }

            // ── Candidate transform from the vertex correspondence ──
            let scale = tri_obj.size_factor(&tri_ref);
            let rotation_deg = tri_obj.rotation_factor(&tri_ref);

            if let Some(known) = config.known_scale {
                let q = known / scale;
                if q < KNOWN_SCALE_BAND.0 || q > KNOWN_SCALE_BAND.1 {
                    continue;
                }
            }
            if let Some(known) = config.known_rotation_deg {
                let dev = (normalize_angle_deg(known) - normalize_angle_deg(rotation_deg)).abs();
                if dev > KNOWN_ROTATION_BAND_DEG {
                    continue;
                }
            }

            let shift = tri_obj.shift_factor(&tri_ref);
            let initial = SimilarityTransform {
                dx: shift.x,
                dy: shift.y,
                rotation_deg,
                inv_scale: 1.0 / scale,
            };

            // ── Refine on the three anchor pairs ──
            let conn = tri_obj.vertex_correspondence(&tri_ref);
            let object_anchors: [Point; 3] = std::array::from_fn(|k| *tri_obj.vertex(conn[k].0));
            let reference_anchors: [Point; 3] =
                std::array::from_fn(|k| *tri_ref.vertex(conn[k].1));

            let (refined, residual) = refiner.refine(&reference_anchors, &object_anchors, &initial);
            if !residual.is_finite() {
                continue;
            }
            candidates_tried += 1;

            // ── Extend across the full point sets ──
            let max_distance = config.distance_tolerance * residual;
            let pairs = extend_correspondences(reference, object, &refined, max_distance);

            if pairs.len() >= required {
                debug!(
                    "Accepted candidate {} on reference triple {:?}: {} pairs, \
                     scale {:.4}, rotation {:.2}°, residual {:.3e}",
                    candidates_tried,
                    ref_triple,
                    pairs.len(),
                    refined.scale(),
                    refined.rotation_deg,
                    residual
                );

                let num_matches = pairs.len() as u32;
                let (object_indices, reference_indices) = pairs.into_iter().unzip();
                return MatchResult {
                    status: MatchStatus::MatchFound,
                    object_indices,
                    reference_indices,
                    transform: Some(refined),
                    residual: Some(residual),
                    num_matches: Some(num_matches),
                    candidates_tried,
                    match_time_ms: elapsed_ms(t0),
                };
            }
        }
    }

    debug!(
        "No match after {} refined candidates ({:.1}ms)",
        candidates_tried,
        elapsed_ms(t0)
    );
    let mut result = MatchResult::failure(MatchStatus::NoMatch, elapsed_ms(t0));
    result.candidates_tried = candidates_tried;
    result
}

fn elapsed_ms(t0: Instant) -> f32 {
    t0.elapsed().as_secs_f32() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalene() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 2.0),
            Point::new(7.0, 16.0),
        ]
    }

    #[test]
    fn test_too_few_points() {
        let pts = scalene();
        let result = match_point_sets(&pts[..2], &pts, &MatchConfig::default());
        assert_eq!(result.status, MatchStatus::TooFew);
        let result = match_point_sets(&pts, &pts[..2], &MatchConfig::default());
        assert_eq!(result.status, MatchStatus::TooFew);
    }

    #[test]
    fn test_zero_timeout_reports_timeout() {
        let config = MatchConfig {
            timeout_ms: Some(0),
            ..Default::default()
        };
        let result = match_point_sets(&scalene(), &scalene(), &config);
        assert_eq!(result.status, MatchStatus::Timeout);
    }

    #[test]
    fn test_identity_match_on_scalene_triangle() {
        let pts = scalene();
        let result = match_point_sets(&pts, &pts, &MatchConfig::default());
        assert_eq!(result.status, MatchStatus::MatchFound);
        assert_eq!(result.object_indices, vec![0, 1, 2]);
        assert_eq!(result.reference_indices, vec![0, 1, 2]);

        let t = result.transform.unwrap();
        assert!(t.dx.abs() < 1e-6);
        assert!(t.dy.abs() < 1e-6);
        assert!((t.inv_scale - 1.0).abs() < 1e-9);
    }
}
