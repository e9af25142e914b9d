//! Three-way alignment of a trimmed corrected read
//!
//! Trimming tools emit a read as several clipped fragments. The fragments
//! arrive separated by whitespace, are concatenated for alignment against the
//! reference, and are bracketed with `X` markers in the corrected track.
//! Reference bases before the first aligned base, and after the last base of
//! any fragment, are clipped for free.

use crate::alignment::{pick, ReadTriple, Step, ThreeWayAlignment, TrackBuilder};
use crate::batch::ReadAligner;
use crate::config::AlignerConfig;
use crate::cost::{cost, extend, Cost, CorrectedBase, GAP, INFEASIBLE};
use crate::error::{AlignError, AlignResult};
use crate::matrix::DpMatrix;
use crate::sequence::{validate_pair, CorrectedRead, FragmentBoundaries};

#[derive(Debug, Clone)]
pub struct TrimmedAligner {
    config: AlignerConfig,
    matrix: DpMatrix,
    input: ReadTriple,
    alignment: ThreeWayAlignment,
}

impl TrimmedAligner {
    /// Align with the default configuration.
    pub fn new(reference: &str, uncorrected: &str, corrected: &str) -> AlignResult<Self> {
        Self::with_config(AlignerConfig::default(), reference, uncorrected, corrected)
    }

    pub fn with_config(
        config: AlignerConfig,
        reference: &str,
        uncorrected: &str,
        corrected: &str,
    ) -> AlignResult<Self> {
        let mut aligner = Self::idle(config);
        aligner.reset(reference, uncorrected, corrected)?;
        Ok(aligner)
    }

    /// An aligner holding no alignment yet, meant to be fed through `reset`.
    pub fn idle(config: AlignerConfig) -> Self {
        Self {
            config,
            matrix: DpMatrix::default(),
            input: ReadTriple::default(),
            alignment: ThreeWayAlignment::default(),
        }
    }

    /// Align a new triple, reusing the matrix buffer.
    ///
    /// On error the previous alignment and inputs are kept.
    pub fn reset(&mut self, reference: &str, uncorrected: &str, corrected: &str) -> AlignResult<()> {
        let (read, boundaries) = CorrectedRead::parse_fragments(corrected, self.config.alphabet)?;
        validate_pair(reference, uncorrected, self.config.alphabet)?;

        log::debug!(
            "Trimmed alignment: {} fragments, {} bp corrected, {} reference columns",
            boundaries.len(),
            read.len(),
            reference.len()
        );

        self.matrix
            .reshape(read.len() + 1, reference.len() + 1, self.config.max_matrix_cells)?;

        fill(&mut self.matrix, reference.as_bytes(), &read, &boundaries);
        log::trace!("Trimmed DP matrix:\n{}", self.matrix);

        let alignment = backtrack(
            &self.matrix,
            reference.as_bytes(),
            uncorrected.as_bytes(),
            &read,
            boundaries,
        )?;
        log::debug!(
            "Trimmed alignment done: cost {}, {} columns, {} markers",
            alignment.cost,
            alignment.len(),
            alignment.boundary_markers()
        );

        self.input = ReadTriple::new(reference, uncorrected, corrected);
        self.alignment = alignment;
        Ok(())
    }

    /// Aligned reference track
    pub fn reference(&self) -> &str {
        &self.alignment.reference
    }

    /// Aligned uncorrected-read track
    pub fn uncorrected(&self) -> &str {
        &self.alignment.uncorrected
    }

    /// Aligned corrected-read track, fragments bracketed by `X`
    pub fn corrected(&self) -> &str {
        &self.alignment.corrected
    }

    /// Last base of every fragment in the separator-free corrected read
    pub fn boundaries(&self) -> &[usize] {
        &self.alignment.boundaries
    }

    pub fn cost(&self) -> Cost {
        self.alignment.cost
    }

    pub fn alignment(&self) -> &ThreeWayAlignment {
        &self.alignment
    }

    pub fn input(&self) -> &ReadTriple {
        &self.input
    }

    pub fn matrix(&self) -> &DpMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn into_alignment(self) -> ThreeWayAlignment {
        self.alignment
    }
}

impl ReadAligner for TrimmedAligner {
    fn idle(config: AlignerConfig) -> Self {
        TrimmedAligner::idle(config)
    }

    fn reset(&mut self, reference: &str, uncorrected: &str, corrected: &str) -> AlignResult<()> {
        TrimmedAligner::reset(self, reference, uncorrected, corrected)
    }

    fn alignment(&self) -> &ThreeWayAlignment {
        &self.alignment
    }

    fn name(&self) -> &'static str {
        "trimmed"
    }
}

/// Deleting reference bases after the last base of a fragment is free.
#[inline]
fn deletion_cost(boundaries: &FragmentBoundaries, row: usize, r: u8) -> Cost {
    if boundaries.contains(row - 1) {
        0
    } else {
        cost(r, CorrectedBase::GAP)
    }
}

fn fill(matrix: &mut DpMatrix, reference: &[u8], read: &CorrectedRead, boundaries: &FragmentBoundaries) {
    matrix.fill_base_cases(|_| 0);

    for row in 1..matrix.rows() {
        let c = read.get(row - 1);

        for column in 1..matrix.columns() {
            let r = reference[column - 1];
            let deletion = extend(matrix.get(row, column - 1), deletion_cost(boundaries, row, r));
            let insertion = extend(matrix.get(row - 1, column), cost(GAP, c));
            let substitution = extend(matrix.get(row - 1, column - 1), cost(r, c));
            matrix.set(row, column, deletion.min(insertion).min(substitution));
        }
    }
}

fn backtrack(
    matrix: &DpMatrix,
    reference: &[u8],
    uncorrected: &[u8],
    read: &CorrectedRead,
    boundaries: FragmentBoundaries,
) -> AlignResult<ThreeWayAlignment> {
    let mut row = matrix.rows() - 1;
    let mut column = matrix.columns() - 1;
    let total = matrix.get(row, column);
    let mut tracks = TrackBuilder::with_capacity(row + column + 2 * boundaries.len() + 1);
    // Set once a corrected base has been consumed and no reference base has
    // been clipped since, i.e. the next clipped column opens a fragment gap.
    let mut first_deletion = false;

    while row > 0 || column > 0 {
        if row == 0 {
            if first_deletion {
                tracks.boundary();
            }
            first_deletion = false;
            tracks.deletion(reference[column - 1], uncorrected[column - 1]);
            column -= 1;
            continue;
        }
        if column == 0 {
            tracks.insertion(read.get(row - 1));
            row -= 1;
            continue;
        }

        let c = read.get(row - 1);
        let r = reference[column - 1];
        let u = uncorrected[column - 1];
        let current = matrix.get(row, column);
        let at_boundary = boundaries.contains(row - 1);
        let at_origin = row == 1 && column == 1;

        let deletion = extend(matrix.get(row, column - 1), deletion_cost(&boundaries, row, r));
        let insertion = extend(matrix.get(row - 1, column), cost(GAP, c));
        let substitution = extend(matrix.get(row - 1, column - 1), cost(r, c));

        let step = if current == INFEASIBLE {
            None
        } else {
            pick(
                current,
                &[
                    (deletion, Step::Deletion),
                    (insertion, Step::Insertion),
                    (substitution, Step::Substitution),
                ],
            )
        };

        match step {
            Some(Step::Deletion) => {
                if at_boundary && first_deletion {
                    tracks.boundary();
                }
                tracks.deletion(r, u);
                if at_origin {
                    tracks.boundary();
                }
                column -= 1;
                first_deletion = false;
            }
            Some(Step::Insertion) => {
                if at_boundary {
                    tracks.boundary();
                }
                tracks.insertion(c);
                if at_origin {
                    tracks.boundary();
                }
                row -= 1;
                first_deletion = true;
            }
            Some(Step::Substitution) => {
                if at_boundary {
                    tracks.boundary();
                }
                tracks.substitution(r, u, c);
                if at_origin {
                    tracks.boundary();
                }
                row -= 1;
                column -= 1;
                first_deletion = true;
            }
            None => {
                log::warn!(
                    "Trimmed backtrack stuck at cell ({}, {}) with cost {}",
                    row,
                    column,
                    current
                );
                return Err(AlignError::BacktrackInconsistency {
                    row,
                    column,
                    cost: current,
                    corrected_len: read.len(),
                    other_len: reference.len(),
                });
            }
        }
    }

    Ok(tracks.finish(total, boundaries.into_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::ungapped;
    use crate::error::SequenceKind;

    #[test]
    fn test_two_adjacent_fragments() {
        let aligner = TrimmedAligner::new("ACGACG", "ACGACG", "ACG ACG").unwrap();
        assert_eq!(aligner.boundaries(), &[2, 5]);
        assert_eq!(aligner.cost(), 0);
        assert_eq!(aligner.corrected(), "XACGXACGX");
        assert_eq!(aligner.reference(), "-ACG-ACG-");
        assert_eq!(aligner.uncorrected(), "-ACG-ACG-");
    }

    #[test]
    fn test_leading_reference_is_clipped_for_free() {
        let aligner = TrimmedAligner::new("TTTACG", "TTTACG", "ACG").unwrap();
        assert_eq!(aligner.cost(), 0);
        assert_eq!(aligner.corrected(), "---XACGX");
        assert_eq!(aligner.reference(), "TTT-ACG-");
        assert_eq!(aligner.uncorrected(), "TTT-ACG-");
    }

    #[test]
    fn test_gap_between_fragments_is_free() {
        let aligner = TrimmedAligner::new("ACGTTTACG", "ACGTTTACG", "ACG ACG").unwrap();
        assert_eq!(aligner.cost(), 0);
        assert_eq!(aligner.corrected(), "XACGX---XACGX");
        assert_eq!(aligner.reference(), "-ACG-TTT-ACG-");
        assert_eq!(aligner.alignment().boundary_markers(), 4);
    }

    #[test]
    fn test_deletion_at_origin_closes_first_fragment() {
        let aligner = TrimmedAligner::new("C", "C", "A").unwrap();
        assert_eq!(aligner.cost(), 1);
        assert_eq!(aligner.corrected(), "AX-");
        assert_eq!(aligner.reference(), "--C");

        let aligner = TrimmedAligner::new("TCG", "TCG", "A CG").unwrap();
        assert_eq!(aligner.cost(), 1);
        assert_eq!(aligner.corrected(), "AX-XCGX");
        assert_eq!(aligner.reference(), "--T-CG-");
        assert_eq!(aligner.uncorrected(), "--T-CG-");
    }

    #[test]
    fn test_trusted_fragment_is_free() {
        let aligner = TrimmedAligner::new("ACGT", "ACGT", "aggt").unwrap();
        assert_eq!(aligner.cost(), 0);
        assert_eq!(ungapped(aligner.corrected()), "aggt");
    }

    #[test]
    fn test_empty_corrected_read() {
        let aligner = TrimmedAligner::new("ACG", "A-G", "").unwrap();
        assert_eq!(aligner.cost(), 0);
        assert_eq!(aligner.corrected(), "---");
        assert_eq!(aligner.uncorrected(), "A-G");
        assert!(aligner.boundaries().is_empty());
    }

    #[test]
    fn test_empty_reference() {
        let aligner = TrimmedAligner::new("", "", "AC GT").unwrap();
        assert_eq!(aligner.cost(), 4);
        assert_eq!(aligner.corrected(), "ACGT");
        assert_eq!(aligner.reference(), "----");
    }

    #[test]
    fn test_round_trip_strips_separators() {
        let aligner = TrimmedAligner::new("GGACGTACCATG", "GGACG-ACCATG", "ACgT  CcAT").unwrap();
        let alignment = aligner.alignment();
        assert_eq!(alignment.reference.len(), alignment.corrected.len());
        assert_eq!(alignment.uncorrected.len(), alignment.corrected.len());
        assert_eq!(ungapped(&alignment.corrected), "ACgTCcAT");
        assert_eq!(ungapped(&alignment.reference), "GGACGTACCATG");
        assert_eq!(ungapped(&alignment.uncorrected), "GGACGACCATG");
        assert_eq!(aligner.boundaries(), &[3, 7]);
        assert_eq!(aligner.input().corrected, "ACgT  CcAT");
    }

    #[test]
    fn test_markers_pair_with_gaps() {
        let aligner = TrimmedAligner::new("ACGTTTACG", "ACGTTTACG", "ACG ACG").unwrap();
        for (r, u, c) in aligner.alignment().columns() {
            if c == b'X' {
                assert_eq!((r, u), (b'-', b'-'));
            }
        }
    }

    #[test]
    fn test_reset_clears_previous_boundaries() {
        let mut aligner = TrimmedAligner::new("ACGACG", "ACGACG", "ACG ACG").unwrap();
        aligner.reset("ACG", "ACG", "ACG").unwrap();
        assert_eq!(aligner.boundaries(), &[2]);
        assert_eq!(aligner.corrected(), "XACGX");
    }

    #[test]
    fn test_invalid_corrected_symbol() {
        let err = TrimmedAligner::new("ACG", "ACG", "AC*").unwrap_err();
        assert!(matches!(err, AlignError::InvalidInput { sequence: SequenceKind::Corrected, .. }));
    }

    #[test]
    fn test_matrix_limit() {
        let config = AlignerConfig::default().with_max_matrix_cells(10);
        let err = TrimmedAligner::with_config(config, "ACGACG", "ACGACG", "ACG ACG").unwrap_err();
        assert!(matches!(err, AlignError::AllocationFailure { rows: 7, columns: 7, .. }));
    }

    #[test]
    fn test_inconsistent_matrix_is_reported() {
        let (read, boundaries) = CorrectedRead::parse_fragments("AC", Default::default()).unwrap();
        let mut matrix = DpMatrix::with_shape(3, 3, None).unwrap();
        fill(&mut matrix, b"AC", &read, &boundaries);
        matrix.set(2, 2, 7);

        let err = backtrack(&matrix, b"AC", b"AC", &read, boundaries).unwrap_err();
        assert!(matches!(err, AlignError::BacktrackInconsistency { row: 2, column: 2, cost: 7, .. }));
    }
}
