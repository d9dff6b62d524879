//! Greedy correspondence extension under a candidate transform.
//!
//! Once a triangle pair has produced a refined transform, this step grows the
//! 3-point hint into a full match: each object point is mapped into the
//! reference frame and claimed by the nearest still-unassigned reference
//! point within the acceptance radius.
//!
//! The assignment is greedy and order-dependent: object points are visited
//! in their original index order and an assignment, once made, is never
//! revisited. This is not a bipartite-optimal matching; the candidate either
//! pairs enough points under this policy or the search moves on.

use crate::Point;

use super::transform::SimilarityTransform;

/// Assign object points to reference points under `transform`.
///
/// Object points are visited in index order. Each is mapped into the
/// reference frame and paired with the nearest unassigned reference point if
/// that minimum distance is within `max_distance`; otherwise it stays
/// unmatched. Assignment state lives entirely in this call.
///
/// Returns the committed `(object_index, reference_index)` pairs, in the
/// order they were made.
pub fn extend_correspondences(
    reference: &[Point],
    object: &[Point],
    transform: &SimilarityTransform,
    max_distance: f64,
) -> Vec<(usize, usize)> {
    let mut assigned = vec![false; reference.len()];
    let mut pairs = Vec::new();

    for (obj_idx, op) in object.iter().enumerate() {
        let mapped = transform.object_to_reference(op);

        let mut min_dist = f64::MAX;
        let mut nearest = None;
        for (ref_idx, rp) in reference.iter().enumerate() {
            if assigned[ref_idx] {
                continue;
            }
            let d = (mapped - rp).norm();
            if d < min_dist {
                min_dist = d;
                nearest = Some(ref_idx);
            }
        }

        if let Some(ref_idx) = nearest {
            if min_dist <= max_distance {
                assigned[ref_idx] = true;
                pairs.push((obj_idx, ref_idx));
            }
        }
    }

    pairs
}
