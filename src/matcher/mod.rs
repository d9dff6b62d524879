//! Blind correspondence matching between two planar point sets.
//!
//! This module implements a triangle-invariant matcher: it identifies which
//! detected image sources correspond to which catalogue reference stars when
//! the two sets are related by an unknown similarity transform. The approach:
//!
//! 1. **Triple search**: every reference point triple is tested against every
//!    object point triple in a fixed lexicographic order.
//! 2. **Invariant tests**: symmetric, undersized, differently-shaped, and
//!    mirror-image triangle pairs are rejected before any fitting.
//! 3. **Candidate transform**: a surviving pair's ranked vertex correspondence
//!    yields scale, rotation, and shift estimates.
//! 4. **Refine and extend**: a least-squares fit of the three anchor pairs
//!    sets the acceptance radius for greedy correspondence extension over the
//!    full sets; the first candidate pairing enough points is returned.
//!
//! Reference: E. J. Groth, "A pattern-matching algorithm for two-dimensional
//! coordinate lists", Astronomical Journal 91, 1244 (1986).

pub mod extend;
pub mod refine;
pub mod search;
pub mod transform;
pub mod triangle;
pub mod triples;

pub use refine::{LeastSquaresRefiner, SimilarityRefiner};
pub use search::{match_point_sets, match_point_sets_with};
pub use transform::SimilarityTransform;
pub use triangle::Triangle;

// ── Status codes ────────────────────────────────────────────────────────────

/// Outcome of a match attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Enough correspondences were found.
    MatchFound,
    /// Every triangle pair was exhausted without an acceptable candidate.
    NoMatch,
    /// The timeout elapsed before a candidate was accepted.
    Timeout,
    /// A point set had fewer than three points.
    TooFew,
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Parameters controlling a match attempt.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Tolerance for interior-angle comparisons, in degrees. A triangle with
    /// two angles closer than this is ambiguous for vertex ranking and is
    /// never used. Default 0.5.
    pub angle_tolerance_deg: f64,
    /// Scales the correspondence acceptance radius: a mapped object point is
    /// paired only within `distance_tolerance` times the anchor fit residual.
    /// Default 5.0.
    pub distance_tolerance: f64,
    /// Relative spread allowed between the three ranked side-length ratios of
    /// a triangle pair before the pair is rejected as differently shaped.
    /// Default 0.05.
    pub shape_tolerance: f64,
    /// Known object/reference scale, if the caller has one (e.g. from a plate
    /// header). Candidates whose derived scale falls outside a fixed band
    /// around this value are pruned without refinement.
    pub known_scale: Option<f64>,
    /// Known field rotation in degrees, if the caller has one. Candidates
    /// whose derived rotation deviates beyond a fixed band are pruned.
    pub known_rotation_deg: Option<f64>,
    /// Abort the search after this many milliseconds.
    /// None = search to exhaustion. Default None.
    pub timeout_ms: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            angle_tolerance_deg: 0.5,
            distance_tolerance: 5.0,
            shape_tolerance: 0.05,
            known_scale: None,
            known_rotation_deg: None,
            timeout_ms: None,
        }
    }
}

impl MatchConfig {
    /// Create a configuration with the given angle and distance tolerances.
    pub fn new(angle_tolerance_deg: f64, distance_tolerance: f64) -> Self {
        Self {
            angle_tolerance_deg,
            distance_tolerance,
            ..Default::default()
        }
    }
}

// ── Match result ────────────────────────────────────────────────────────────

/// Result of a match attempt.
///
/// `object_indices` and `reference_indices` are parallel: entry `k` of each
/// names one corresponding pair. Both are empty unless `status` is
/// [`MatchStatus::MatchFound`].
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Outcome status.
    pub status: MatchStatus,
    /// Indices into the object point slice, one per matched pair.
    pub object_indices: Vec<usize>,
    /// Indices into the reference point slice, parallel to `object_indices`.
    pub reference_indices: Vec<usize>,
    /// Fitted transform mapping object points into the reference frame.
    pub transform: Option<SimilarityTransform>,
    /// Anchor fit residual of the accepted candidate (RMS distance in
    /// reference-frame units).
    pub residual: Option<f64>,
    /// Number of matched pairs.
    pub num_matches: Option<u32>,
    /// Refined candidates evaluated before the search ended.
    pub candidates_tried: u64,
    /// Wall-clock time spent matching, in milliseconds.
    pub match_time_ms: f32,
}

impl MatchResult {
    /// Create a failure result with the given status and elapsed time.
    pub(crate) fn failure(status: MatchStatus, match_time_ms: f32) -> Self {
        Self {
            status,
            object_indices: Vec::new(),
            reference_indices: Vec::new(),
            transform: None,
            residual: None,
            num_matches: None,
            candidates_tried: 0,
            match_time_ms,
        }
    }
}
