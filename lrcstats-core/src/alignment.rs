//! Alignment inputs and results

use serde::{Deserialize, Serialize};

use crate::cost::{Cost, CorrectedBase, BOUNDARY, GAP};

/// The three unaligned sequences handed to an aligner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadTriple {
    /// Reference, pre-aligned against the uncorrected read
    pub reference: String,
    /// Uncorrected long read, pre-aligned against the reference
    pub uncorrected: String,
    /// Corrected long read; lowercase bases are trusted
    pub corrected: String,
}

impl ReadTriple {
    pub fn new<R, U, C>(reference: R, uncorrected: U, corrected: C) -> Self
    where
        R: Into<String>,
        U: Into<String>,
        C: Into<String>,
    {
        Self {
            reference: reference.into(),
            uncorrected: uncorrected.into(),
            corrected: corrected.into(),
        }
    }
}

/// Optimal three-way alignment. All three tracks have the same length.
///
/// A `-` in the corrected read is kept as an untrusted base; when it is
/// inserted the column is `-` in all three tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeWayAlignment {
    pub reference: String,
    pub uncorrected: String,
    pub corrected: String,
    /// Minimal accumulated cost
    pub cost: Cost,
    /// Last base of every trimmed fragment; empty for untrimmed alignments
    pub boundaries: Vec<usize>,
}

impl ThreeWayAlignment {
    /// Number of alignment columns
    pub fn len(&self) -> usize {
        self.corrected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrected.is_empty()
    }

    /// Columns as (reference, uncorrected, corrected) symbols
    pub fn columns(&self) -> impl Iterator<Item = (u8, u8, u8)> + '_ {
        self.reference
            .bytes()
            .zip(self.uncorrected.bytes())
            .zip(self.corrected.bytes())
            .map(|((r, u), c)| (r, u, c))
    }

    /// Number of `X` fragment markers in the corrected track
    pub fn boundary_markers(&self) -> usize {
        self.corrected.bytes().filter(|&c| c == BOUNDARY).count()
    }
}

/// Strip gaps and fragment markers from an aligned track.
pub fn ungapped(track: &str) -> String {
    track
        .chars()
        .filter(|&c| c != GAP as char && c != BOUNDARY as char)
        .collect()
}

/// One backtracking move through the DP matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Left: consume a reference/uncorrected column only
    Deletion,
    /// Up: consume a corrected base only
    Insertion,
    /// Diagonal: consume both
    Substitution,
}

/// First candidate whose recomputed cost reproduces the stored cell cost.
pub(crate) fn pick(current: Cost, candidates: &[(Cost, Step)]) -> Option<Step> {
    candidates
        .iter()
        .find(|&&(cost, _)| cost == current)
        .map(|&(_, step)| step)
}

/// Collects alignment columns during backtracking. Columns arrive from the
/// end of the alignment towards its start and are reversed on `finish`.
#[derive(Debug, Default)]
pub(crate) struct TrackBuilder {
    reference: Vec<u8>,
    uncorrected: Vec<u8>,
    corrected: Vec<u8>,
}

impl TrackBuilder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            reference: Vec::with_capacity(capacity),
            uncorrected: Vec::with_capacity(capacity),
            corrected: Vec::with_capacity(capacity),
        }
    }

    /// Reference and uncorrected bases against a gap in the corrected read
    pub(crate) fn deletion(&mut self, reference: u8, uncorrected: u8) {
        self.push(reference, uncorrected, GAP);
    }

    /// Corrected base against gaps in the other two tracks
    pub(crate) fn insertion(&mut self, corrected: CorrectedBase) {
        self.push(GAP, GAP, corrected.to_ascii());
    }

    pub(crate) fn substitution(&mut self, reference: u8, uncorrected: u8, corrected: CorrectedBase) {
        self.push(reference, uncorrected, corrected.to_ascii());
    }

    pub(crate) fn boundary(&mut self) {
        self.push(GAP, GAP, BOUNDARY);
    }

    fn push(&mut self, reference: u8, uncorrected: u8, corrected: u8) {
        self.reference.push(reference);
        self.uncorrected.push(uncorrected);
        self.corrected.push(corrected);
    }

    pub(crate) fn finish(self, cost: Cost, boundaries: Vec<usize>) -> ThreeWayAlignment {
        ThreeWayAlignment {
            reference: into_track(self.reference),
            uncorrected: into_track(self.uncorrected),
            corrected: into_track(self.corrected),
            cost,
            boundaries,
        }
    }
}

fn into_track(mut symbols: Vec<u8>) -> String {
    symbols.reverse();
    // Every symbol is validated ASCII or one of the gap/marker bytes.
    symbols.into_iter().map(char::from).collect()
}
