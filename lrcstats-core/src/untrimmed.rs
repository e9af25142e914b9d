//! Three-way alignment of a contiguous corrected read
//!
//! Rows follow the corrected read, columns follow the uncorrected read; the
//! reference shares the uncorrected read's column index and only feeds the
//! cost model. Trusted (lowercase) runs must align base for base against the
//! uncorrected read and may only be left through a deletion at the last base
//! of the run.

use crate::alignment::{pick, ReadTriple, Step, ThreeWayAlignment, TrackBuilder};
use crate::batch::ReadAligner;
use crate::config::AlignerConfig;
use crate::cost::{cost, extend, Cost, CorrectedBase, GAP, INFEASIBLE};
use crate::error::{AlignError, AlignResult};
use crate::matrix::DpMatrix;
use crate::sequence::{validate_pair, CorrectedRead};

/// How a corrected base constrains the cells of its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    /// Last base of a trusted run
    RunEnd,
    /// Trusted base followed by another trusted base
    RunInterior,
    Untrusted,
}

fn row_kind(read: &CorrectedRead, index: usize) -> RowKind {
    if read.is_run_end(index) {
        RowKind::RunEnd
    } else if read.get(index).is_trusted() {
        RowKind::RunInterior
    } else {
        RowKind::Untrusted
    }
}

#[derive(Debug, Clone)]
pub struct UntrimmedAligner {
    config: AlignerConfig,
    matrix: DpMatrix,
    input: ReadTriple,
    alignment: ThreeWayAlignment,
}

impl UntrimmedAligner {
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
    /// On error the previous alignment and inputs are kept; the matrix is
    /// left in whatever state the failed attempt reached.
    pub fn reset(&mut self, reference: &str, uncorrected: &str, corrected: &str) -> AlignResult<()> {
        let read = CorrectedRead::parse(corrected, self.config.alphabet)?;
        validate_pair(reference, uncorrected, self.config.alphabet)?;

        log::debug!(
            "Untrimmed alignment: corrected read {} bp, uncorrected read {} columns",
            read.len(),
            uncorrected.len()
        );

        self.matrix
            .reshape(read.len() + 1, uncorrected.len() + 1, self.config.max_matrix_cells)?;

        fill(&mut self.matrix, reference.as_bytes(), uncorrected.as_bytes(), &read);
        log::trace!("Untrimmed DP matrix:\n{}", self.matrix);

        let alignment = backtrack(&self.matrix, reference.as_bytes(), uncorrected.as_bytes(), &read)?;
        log::debug!(
            "Untrimmed alignment done: cost {}, {} columns",
            alignment.cost,
            alignment.len()
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

    /// Aligned corrected-read track
    pub fn corrected(&self) -> &str {
        &self.alignment.corrected
    }

    pub fn cost(&self) -> Cost {
        self.alignment.cost
    }

    pub fn alignment(&self) -> &ThreeWayAlignment {
        &self.alignment
    }

    /// The unaligned sequences of the current alignment
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

impl ReadAligner for UntrimmedAligner {
    fn idle(config: AlignerConfig) -> Self {
        UntrimmedAligner::idle(config)
    }

    fn reset(&mut self, reference: &str, uncorrected: &str, corrected: &str) -> AlignResult<()> {
        UntrimmedAligner::reset(self, reference, uncorrected, corrected)
    }

    fn alignment(&self) -> &ThreeWayAlignment {
        &self.alignment
    }

    fn name(&self) -> &'static str {
        "untrimmed"
    }
}

fn fill(matrix: &mut DpMatrix, reference: &[u8], uncorrected: &[u8], read: &CorrectedRead) {
    matrix.fill_base_cases(|column| column as Cost);

    for row in 1..matrix.rows() {
        let c = read.get(row - 1);
        let kind = row_kind(read, row - 1);

        for column in 1..matrix.columns() {
            let r = reference[column - 1];
            let u = uncorrected[column - 1];
            let left = matrix.get(row, column - 1);
            let diagonal = matrix.get(row - 1, column - 1);
            let deletion = extend(left, cost(r, CorrectedBase::GAP));

            let cell = match kind {
                RowKind::RunEnd => {
                    if c.matches(u) {
                        extend(diagonal, cost(r, c)).min(deletion)
                    } else {
                        deletion
                    }
                }
                RowKind::RunInterior => {
                    if c.matches(u) {
                        extend(diagonal, cost(r, c))
                    } else if u == GAP {
                        left
                    } else {
                        INFEASIBLE
                    }
                }
                RowKind::Untrusted => {
                    let insertion = extend(matrix.get(row - 1, column), cost(GAP, c));
                    let substitution = extend(diagonal, cost(r, c));
                    deletion.min(insertion).min(substitution)
                }
            };
            matrix.set(row, column, cell);
        }
    }
}

fn backtrack(
    matrix: &DpMatrix,
    reference: &[u8],
    uncorrected: &[u8],
    read: &CorrectedRead,
) -> AlignResult<ThreeWayAlignment> {
    let mut row = matrix.rows() - 1;
    let mut column = matrix.columns() - 1;
    let total = matrix.get(row, column);
    let mut tracks = TrackBuilder::with_capacity(row + column);

    while row > 0 || column > 0 {
        if row == 0 {
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
        let left = matrix.get(row, column - 1);

        let deletion = extend(left, cost(r, CorrectedBase::GAP));
        let insertion = extend(matrix.get(row - 1, column), cost(GAP, c));
        let substitution = extend(matrix.get(row - 1, column - 1), cost(r, c));

        let step = if current == INFEASIBLE {
            None
        } else {
            match row_kind(read, row - 1) {
                RowKind::RunEnd if c.matches(u) => pick(
                    current,
                    &[(deletion, Step::Deletion), (substitution, Step::Substitution)],
                ),
                RowKind::RunEnd => pick(current, &[(deletion, Step::Deletion)]),
                RowKind::RunInterior if c.matches(u) => {
                    pick(current, &[(substitution, Step::Substitution)])
                }
                RowKind::RunInterior if u == GAP => pick(current, &[(left, Step::Deletion)]),
                RowKind::RunInterior => None,
                RowKind::Untrusted => pick(
                    current,
                    &[
                        (deletion, Step::Deletion),
                        (insertion, Step::Insertion),
                        (substitution, Step::Substitution),
                    ],
                ),
            }
        };

        match step {
            Some(Step::Deletion) => {
                tracks.deletion(r, u);
                column -= 1;
            }
            Some(Step::Insertion) => {
                tracks.insertion(c);
                row -= 1;
            }
            Some(Step::Substitution) => {
                tracks.substitution(r, u, c);
                row -= 1;
                column -= 1;
            }
            None => {
                log::warn!(
                    "Untrimmed backtrack stuck at cell ({}, {}) with cost {}",
                    row,
                    column,
                    current
                );
                return Err(AlignError::BacktrackInconsistency {
                    row,
                    column,
                    cost: current,
                    corrected_len: read.len(),
                    other_len: uncorrected.len(),
                });
            }
        }
    }

    Ok(tracks.finish(total, Vec::new()))
}
