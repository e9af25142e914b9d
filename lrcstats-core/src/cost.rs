//! Cost model shared by both alignment variants
//!
//! Costs are binary: a trusted (corrected) base or a case-insensitive match
//! costs nothing, anything else costs [`MISMATCH_COST`].

/// Accumulated alignment cost
pub type Cost = i64;

/// Cost of a mismatch, insertion or deletion against an untrusted base
pub const MISMATCH_COST: Cost = 2;

/// Marker for cells no alignment path may pass through
pub const INFEASIBLE: Cost = Cost::MAX;

/// Gap symbol used in every track
pub const GAP: u8 = b'-';

/// Fragment boundary symbol used in the corrected track of trimmed alignments
pub const BOUNDARY: u8 = b'X';

/// A corrected-read base tagged with whether the corrector trusts it.
///
/// Upstream tools encode trust as lowercase; the tag keeps the base itself
/// upper-cased so comparisons never depend on case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrectedBase {
    base: u8,
    trusted: bool,
}

impl CorrectedBase {
    /// Gap on the corrected side of a deletion
    pub const GAP: Self = Self {
        base: GAP,
        trusted: false,
    };

    pub fn new(base: u8, trusted: bool) -> Self {
        Self {
            base: base.to_ascii_uppercase(),
            trusted,
        }
    }

    /// Decode the case convention: lowercase means trusted.
    pub fn from_ascii(symbol: u8) -> Self {
        Self::new(symbol, symbol.is_ascii_lowercase())
    }

    pub fn base(&self) -> u8 {
        self.base
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    pub fn is_gap(&self) -> bool {
        self.base == GAP
    }

    /// Case-insensitive comparison against a reference or uncorrected base
    pub fn matches(&self, other: u8) -> bool {
        self.base == other.to_ascii_uppercase()
    }

    /// Re-encode for output, restoring the lowercase convention
    pub fn to_ascii(&self) -> u8 {
        if self.trusted {
            self.base.to_ascii_lowercase()
        } else {
            self.base
        }
    }
}

/// Score one aligned column between a reference/uncorrected base and a
/// corrected-read base (or [`CorrectedBase::GAP`]).
#[inline]
pub fn cost(other: u8, corrected: CorrectedBase) -> Cost {
    if corrected.trusted || corrected.matches(other) {
        0
    } else {
        MISMATCH_COST
    }
}

/// Add a step cost to a cell, keeping infeasible cells infeasible.
#[inline]
pub fn extend(cell: Cost, step: Cost) -> Cost {
    cell.saturating_add(step)
}
