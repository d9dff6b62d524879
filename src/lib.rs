//! # trimatch
//!
//! Blind correspondence matching between two 2-D point sets related by an
//! unknown **similarity transform** (translation, rotation, uniform scale).
//!
//! Given star centroids detected in an image (pixel offsets) and catalogue
//! reference stars projected onto the same local plane, `trimatch` finds a
//! subset of each set that corresponds, with no prior knowledge of which
//! point maps to which and no initial transform estimate. The recovered
//! transform and index pairing are what an astrometric pipeline needs to fit
//! a plate solution.
//!
//! ## Features
//!
//! - **Blind matching** — no initial correspondence or alignment required
//! - **Triangle invariants** — symmetry, shape-commensurability, and
//!   chirality tests discard spurious triangle pairs before any fitting work
//! - **Hint pruning** — optional known pixel scale / field rotation hints
//!   prune candidates early
//! - **Deterministic** — fixed enumeration order with first-acceptable-candidate
//!   termination, so repeated calls return identical results
//!
//! ## Example
//!
//! ```
//! use trimatch::{match_point_sets, MatchConfig, MatchStatus, Point, SimilarityTransform};
//!
//! // Catalogue stars projected to the local plane (pixel units).
//! let reference = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(11.0, 1.0),
//!     Point::new(-1.5, 10.5),
//!     Point::new(12.0, 13.0),
//!     Point::new(4.0, 6.5),
//! ];
//!
//! // The image saw the same field scaled 1.5x, rotated 30 degrees,
//! // and shifted by (2, 3) — unknown to the matcher.
//! let truth = SimilarityTransform {
//!     dx: 2.0,
//!     dy: 3.0,
//!     rotation_deg: 30.0,
//!     inv_scale: 1.0 / 1.5,
//! };
//! let object: Vec<Point> = reference.iter().map(|p| truth.reference_to_object(p)).collect();
//!
//! let result = match_point_sets(&reference, &object, &MatchConfig::default());
//! assert_eq!(result.status, MatchStatus::MatchFound);
//!
//! let fitted = result.transform.unwrap();
//! assert!((fitted.rotation_deg - 30.0).abs() < 0.1);
//! assert!((fitted.scale() - 1.5).abs() < 0.01);
//! ```
//!
//! ## Algorithm overview
//!
//! 1. **Triple enumeration** — every 3-combination of reference points is
//!    tested against every 3-combination of object points, in lexicographic
//!    order on both sides
//! 2. **Invariant gating** — a triangle pair survives only if neither
//!    triangle is symmetric (ambiguous vertex ranking), the object triangle
//!    is neither too small nor too elongated, the ranked side ratios agree
//!    (same shape up to scale), and the winding matches (no mirror images)
//! 3. **Transform seeding** — scale, rotation, and shift factors derived from
//!    the ranked vertex correspondence form a candidate similarity transform
//! 4. **Anchor refinement** — a least-squares fit over the three vertex pairs
//!    refines the candidate; the fit residual sets the acceptance radius
//! 5. **Greedy extension** — every object point is mapped into the reference
//!    frame and assigned to the nearest unclaimed reference point within the
//!    radius; the first candidate pairing enough points wins

pub mod matcher;

pub use matcher::{
    match_point_sets, match_point_sets_with, LeastSquaresRefiner, MatchConfig, MatchResult,
    MatchStatus, SimilarityRefiner, SimilarityTransform, Triangle,
};

// Commonly used types
// Note: coordinates are 64-bit throughout. The cost of this search is the
// combinatorial enumeration, not the arithmetic, and the least-squares fit
// needs the precision.
pub type Point = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
