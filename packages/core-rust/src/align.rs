//! Pairwise sequence alignment engine.
//!
//! Implements global (Needleman-Wunsch) and local (Smith-Waterman) alignment
//! over a dense score table, with a deterministic traceback that reports one
//! optimal alignment as aligned block coordinates. The `fogsaa` mode promises
//! a faster search for the same optimum as `global`, so it shares the global
//! scoring path.

use crate::models::{AlignedPath, AlignmentMode, AlignmentRequest, AlignmentResponse};
use crate::schema::SchemaTag;

/// Longest accepted sequence. Bounds the O(n * m) score table held in memory
/// while a request is being aligned.
pub const MAX_SEQUENCE_LEN: usize = 2_000;

/// Errors raised by a computation engine.
#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    /// One of the input sequences exceeds [`MAX_SEQUENCE_LEN`].
    #[error("{which} sequence of {len} residues exceeds the {max}-residue limit")]
    SequenceTooLong {
        /// Which sequence overflowed, `target` or `query`.
        which: &'static str,
        /// Observed length in residues.
        len: usize,
        /// The enforced limit.
        max: usize,
    },
    /// Engine-internal failure.
    #[error("alignment engine failure: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The computation seam between the HTTP surface and the engine.
///
/// Handlers call through this trait, so the engine can be swapped without
/// touching the protocol code. Implementations must be deterministic: the
/// same request always yields the same response.
pub trait Compute: Send + Sync {
    /// Runs the computation for one request.
    ///
    /// # Errors
    ///
    /// Returns a [`ComputeError`] when the request cannot be computed.
    fn compute(&self, request: &AlignmentRequest) -> Result<AlignmentResponse, ComputeError>;
}

/// Scoring parameters for one alignment run. Gap score is fixed at zero.
#[derive(Debug, Clone, Copy)]
struct Scoring {
    match_score: f64,
    mismatch_score: f64,
    gap_score: f64,
}

impl Scoring {
    fn substitution(&self, a: char, b: char) -> f64 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// Dense-table pairwise aligner.
///
/// Deterministic by construction: ties in the score table are broken with a
/// fixed preference (diagonal, then target gap, then query gap), and local
/// alignment starts from the first maximal cell in row-major order, so one
/// optimal alignment is reported per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseAligner;

impl PairwiseAligner {
    /// Creates an aligner with zero gap score.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Compute for PairwiseAligner {
    fn compute(&self, request: &AlignmentRequest) -> Result<AlignmentResponse, ComputeError> {
        check_length("target", &request.target)?;
        check_length("query", &request.query)?;

        let target: Vec<char> = request.target.chars().collect();
        let query: Vec<char> = request.query.chars().collect();
        let scoring = Scoring {
            match_score: request.match_score,
            mismatch_score: request.mismatch_score,
            gap_score: 0.0,
        };
        let local = matches!(request.mode, AlignmentMode::Local);

        tracing::debug!(
            "aligning {}x{} residues in {:?} mode",
            target.len(),
            query.len(),
            request.mode
        );

        let table = score_table(&target, &query, &scoring, local);
        let (path, score) = trace_path(&table, &target, &query, &scoring, local);

        Ok(AlignmentResponse {
            schema: SchemaTag::new(),
            target: request.target.clone(),
            query: request.query.clone(),
            alignments: vec![path],
            score,
        })
    }
}

fn check_length(which: &'static str, sequence: &str) -> Result<(), ComputeError> {
    let len = sequence.chars().count();
    if len > MAX_SEQUENCE_LEN {
        return Err(ComputeError::SequenceTooLong {
            which,
            len,
            max: MAX_SEQUENCE_LEN,
        });
    }
    Ok(())
}

/// Fills the (m + 1) x (n + 1) score table, row-major.
///
/// Global scoring seeds the borders with accumulated gap scores and lets
/// cells go negative; local scoring floors every cell at zero.
fn score_table(target: &[char], query: &[char], scoring: &Scoring, local: bool) -> Vec<f64> {
    let m = target.len();
    let n = query.len();
    let width = n + 1;
    let mut table = vec![0.0_f64; (m + 1) * width];

    if !local {
        for i in 1..=m {
            #[allow(clippy::cast_precision_loss)]
            let gaps = i as f64;
            table[i * width] = gaps * scoring.gap_score;
        }
        for j in 1..=n {
            #[allow(clippy::cast_precision_loss)]
            let gaps = j as f64;
            table[j] = gaps * scoring.gap_score;
        }
    }

    for i in 1..=m {
        for j in 1..=n {
            let diagonal =
                table[(i - 1) * width + (j - 1)] + scoring.substitution(target[i - 1], query[j - 1]);
            let target_gap = table[(i - 1) * width + j] + scoring.gap_score;
            let query_gap = table[i * width + (j - 1)] + scoring.gap_score;

            let mut best = diagonal.max(target_gap).max(query_gap);
            if local && best < 0.0 {
                best = 0.0;
            }
            table[i * width + j] = best;
        }
    }

    table
}

/// Walks the score table backwards from the alignment end cell and converts
/// the run of diagonal moves into aligned block coordinates.
///
/// Cell values are bit-identical to one of the candidate expressions they
/// were assigned from, so exact float comparison recovers the chosen move.
#[allow(clippy::float_cmp)]
fn trace_path(
    table: &[f64],
    target: &[char],
    query: &[char],
    scoring: &Scoring,
    local: bool,
) -> (AlignedPath, f64) {
    let m = target.len();
    let n = query.len();
    let width = n + 1;

    let (mut i, mut j, score) = if local {
        let mut best = (0, 0, 0.0_f64);
        for row in 0..=m {
            for col in 0..=n {
                let value = table[row * width + col];
                if value > best.2 {
                    best = (row, col, value);
                }
            }
        }
        best
    } else {
        (m, n, table[m * width + n])
    };

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    loop {
        if local && table[i * width + j] == 0.0 {
            break;
        }
        if i == 0 && j == 0 {
            break;
        }

        let current = table[i * width + j];
        if i > 0
            && j > 0
            && current
                == table[(i - 1) * width + (j - 1)]
                    + scoring.substitution(target[i - 1], query[j - 1])
        {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if i > 0 && current == table[(i - 1) * width + j] + scoring.gap_score {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    pairs.reverse();

    (merge_into_blocks(&pairs), score)
}

/// Collapses consecutive aligned residue pairs into `[start, end)` blocks.
fn merge_into_blocks(pairs: &[(usize, usize)]) -> AlignedPath {
    let mut target_blocks: Vec<[u32; 2]> = Vec::new();
    let mut query_blocks: Vec<[u32; 2]> = Vec::new();

    for &(ti, qi) in pairs {
        // Residue indices are bounded by MAX_SEQUENCE_LEN, so truncation is safe.
        #[allow(clippy::cast_possible_truncation)]
        let (ti, qi) = (ti as u32, qi as u32);

        let extends = matches!(
            (target_blocks.last(), query_blocks.last()),
            (Some(t), Some(q)) if t[1] == ti && q[1] == qi
        );
        if extends {
            if let (Some(t), Some(q)) = (target_blocks.last_mut(), query_blocks.last_mut()) {
                t[1] = ti + 1;
                q[1] = qi + 1;
            }
        } else {
            target_blocks.push([ti, ti + 1]);
            query_blocks.push([qi, qi + 1]);
        }
    }

    [target_blocks, query_blocks]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn request(target: &str, query: &str, mode: AlignmentMode) -> AlignmentRequest {
        AlignmentRequest {
            schema: SchemaTag::new(),
            target: target.to_owned(),
            query: query.to_owned(),
            mode,
            match_score: 1.0,
            mismatch_score: 0.0,
        }
    }

    fn align(target: &str, query: &str, mode: AlignmentMode) -> AlignmentResponse {
        PairwiseAligner::new()
            .compute(&request(target, query, mode))
            .unwrap()
    }

    #[test]
    fn local_alignment_reports_blocks_and_score() {
        let response = align("GAACT", "GAT", AlignmentMode::Local);
        assert!((response.score - 3.0).abs() < f64::EPSILON);
        assert_eq!(
            response.alignments,
            vec![[
                vec![[0, 1], [2, 3], [4, 5]],
                vec![[0, 1], [1, 2], [2, 3]]
            ]]
        );
    }

    #[test]
    fn global_alignment_of_identical_sequences_is_one_block() {
        let response = align("ACGT", "ACGT", AlignmentMode::Global);
        assert!((response.score - 4.0).abs() < f64::EPSILON);
        assert_eq!(response.alignments, vec![[vec![[0, 4]], vec![[0, 4]]]]);
    }

    #[test]
    fn local_alignment_finds_embedded_motif() {
        let response = align("TTTACGTTT", "ACG", AlignmentMode::Local);
        assert!((response.score - 3.0).abs() < f64::EPSILON);
        assert_eq!(response.alignments, vec![[vec![[3, 6]], vec![[0, 3]]]]);
    }

    #[test]
    fn global_alignment_with_penalized_mismatch_prefers_gaps() {
        let mut request = request("AC", "AG", AlignmentMode::Global);
        request.mismatch_score = -1.0;
        let response = PairwiseAligner::new().compute(&request).unwrap();
        assert!((response.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(response.alignments, vec![[vec![[0, 1]], vec![[0, 1]]]]);
    }

    #[test]
    fn fogsaa_scores_like_global() {
        let fogsaa = align("GAACT", "GAT", AlignmentMode::Fogsaa);
        let global = align("GAACT", "GAT", AlignmentMode::Global);
        assert_eq!(fogsaa.alignments, global.alignments);
        assert!((fogsaa.score - global.score).abs() < f64::EPSILON);
    }

    #[test]
    fn local_alignment_of_disjoint_sequences_is_empty() {
        let mut request = request("AAAA", "TTTT", AlignmentMode::Local);
        request.mismatch_score = -1.0;
        let response = PairwiseAligner::new().compute(&request).unwrap();
        assert!(response.score.abs() < f64::EPSILON);
        assert_eq!(response.alignments, vec![[Vec::<[u32; 2]>::new(), Vec::new()]]);
    }

    #[test]
    fn empty_query_aligns_trivially() {
        let response = align("GAACT", "", AlignmentMode::Local);
        assert!(response.score.abs() < f64::EPSILON);
        assert_eq!(response.alignments, vec![[Vec::<[u32; 2]>::new(), Vec::new()]]);
    }

    #[test]
    fn response_echoes_request_sequences() {
        let response = align("GAACT", "GAT", AlignmentMode::Local);
        assert_eq!(response.target, "GAACT");
        assert_eq!(response.query, "GAT");
    }

    #[test]
    fn overlong_target_is_rejected() {
        let oversized = "A".repeat(MAX_SEQUENCE_LEN + 1);
        let err = PairwiseAligner::new()
            .compute(&request(&oversized, "GAT", AlignmentMode::Local))
            .unwrap_err();
        match err {
            ComputeError::SequenceTooLong { which, len, max } => {
                assert_eq!(which, "target");
                assert_eq!(len, MAX_SEQUENCE_LEN + 1);
                assert_eq!(max, MAX_SEQUENCE_LEN);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sequences_at_the_limit_are_accepted() {
        let bounded = "A".repeat(MAX_SEQUENCE_LEN);
        let response = PairwiseAligner::new()
            .compute(&request(&bounded, "A", AlignmentMode::Local))
            .unwrap();
        assert!((response.score - 1.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn alignment_is_deterministic(
            target in "[ACGT]{0,40}",
            query in "[ACGT]{0,40}",
            local in any::<bool>(),
        ) {
            let mode = if local { AlignmentMode::Local } else { AlignmentMode::Global };
            let first = align(&target, &query, mode);
            let second = align(&target, &query, mode);
            prop_assert_eq!(first.alignments, second.alignments);
            prop_assert_eq!(first.score, second.score);
        }

        #[test]
        fn score_is_bounded_by_shorter_sequence(
            target in "[ACGT]{0,40}",
            query in "[ACGT]{0,40}",
        ) {
            let response = align(&target, &query, AlignmentMode::Local);
            let bound = target.len().min(query.len());
            #[allow(clippy::cast_precision_loss)]
            let bound = bound as f64;
            prop_assert!(response.score >= 0.0);
            prop_assert!(response.score <= bound);
        }

        #[test]
        fn blocks_are_ordered_and_paired(
            target in "[ACGT]{0,40}",
            query in "[ACGT]{0,40}",
            local in any::<bool>(),
        ) {
            let mode = if local { AlignmentMode::Local } else { AlignmentMode::Global };
            let response = align(&target, &query, mode);
            let [target_blocks, query_blocks] = response.alignments[0].clone();

            prop_assert_eq!(target_blocks.len(), query_blocks.len());
            for (t, q) in target_blocks.iter().zip(&query_blocks) {
                prop_assert!(t[0] < t[1]);
                prop_assert!(q[0] < q[1]);
                prop_assert_eq!(t[1] - t[0], q[1] - q[0]);
                prop_assert!(t[1] as usize <= target.len());
                prop_assert!(q[1] as usize <= query.len());
            }
            for window in target_blocks.windows(2) {
                prop_assert!(window[0][1] <= window[1][0]);
            }
            for window in query_blocks.windows(2) {
                prop_assert!(window[0][1] <= window[1][0]);
            }
        }
    }
}
