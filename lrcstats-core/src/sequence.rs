//! Input validation and corrected-read decoding

use crate::config::Alphabet;
use crate::cost::CorrectedBase;
use crate::error::{AlignError, AlignResult, SequenceKind};

/// Fail on the first symbol outside the alphabet.
pub fn validate(sequence: &str, kind: SequenceKind, alphabet: Alphabet) -> AlignResult<()> {
    match sequence
        .bytes()
        .enumerate()
        .find(|&(_, symbol)| !alphabet.contains(symbol))
    {
        Some((position, symbol)) => Err(invalid_symbol(kind, symbol, position)),
        None => Ok(()),
    }
}

/// The reference and uncorrected read are consumed column by column in
/// lock-step, so they must come pre-aligned to the same length.
pub fn validate_pair(reference: &str, uncorrected: &str, alphabet: Alphabet) -> AlignResult<()> {
    validate(reference, SequenceKind::Reference, alphabet)?;
    validate(uncorrected, SequenceKind::Uncorrected, alphabet)?;
    if reference.len() != uncorrected.len() {
        return Err(AlignError::invalid_input(
            SequenceKind::Uncorrected,
            format!(
                "length {} differs from reference length {}",
                uncorrected.len(),
                reference.len()
            ),
        ));
    }
    Ok(())
}

fn invalid_symbol(kind: SequenceKind, symbol: u8, position: usize) -> AlignError {
    let reason = if symbol.is_ascii_whitespace() {
        format!("unexpected separator at position {position}")
    } else {
        format!("unexpected symbol {:?} at position {position}", symbol as char)
    };
    AlignError::invalid_input(kind, reason)
}

/// Corrected read decoded into trust-tagged bases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectedRead {
    bases: Vec<CorrectedBase>,
}

impl CorrectedRead {
    /// Decode a contiguous corrected read; separators are rejected.
    pub fn parse(sequence: &str, alphabet: Alphabet) -> AlignResult<Self> {
        validate(sequence, SequenceKind::Corrected, alphabet)?;
        Ok(Self {
            bases: sequence.bytes().map(CorrectedBase::from_ascii).collect(),
        })
    }

    /// Decode a corrected read made of trimmed fragments separated by
    /// whitespace. Separators are dropped; empty fragments are ignored.
    pub fn parse_fragments(
        sequence: &str,
        alphabet: Alphabet,
    ) -> AlignResult<(Self, FragmentBoundaries)> {
        let mut bases = Vec::with_capacity(sequence.len());
        let mut last_bases: Vec<usize> = Vec::new();

        for (position, symbol) in sequence.bytes().enumerate() {
            if symbol.is_ascii_whitespace() {
                close_fragment(&bases, &mut last_bases);
            } else if alphabet.contains(symbol) {
                bases.push(CorrectedBase::from_ascii(symbol));
            } else {
                return Err(invalid_symbol(SequenceKind::Corrected, symbol, position));
            }
        }
        close_fragment(&bases, &mut last_bases);

        Ok((Self { bases }, FragmentBoundaries { last_bases }))
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn get(&self, index: usize) -> CorrectedBase {
        self.bases[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorrectedBase> {
        self.bases.iter()
    }

    /// True when `index` closes a run of trusted bases: the base is trusted
    /// and is either the last one or followed by an untrusted base. A gap
    /// does not close the run.
    pub fn is_run_end(&self, index: usize) -> bool {
        self.bases[index].is_trusted()
            && self
                .bases
                .get(index + 1)
                .map_or(true, |next| !next.is_trusted() && !next.is_gap())
    }

    pub fn to_ascii_string(&self) -> String {
        self.bases.iter().map(|b| b.to_ascii() as char).collect()
    }
}

fn close_fragment(bases: &[CorrectedBase], last_bases: &mut Vec<usize>) {
    let fragment_start = last_bases.last().map_or(0, |&last| last + 1);
    if bases.len() > fragment_start {
        last_bases.push(bases.len() - 1);
    }
}

/// Indices of the last base of every trimmed fragment, strictly increasing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentBoundaries {
    last_bases: Vec<usize>,
}

impl FragmentBoundaries {
    pub fn contains(&self, index: usize) -> bool {
        self.last_bases.binary_search(&index).is_ok()
    }

    pub fn len(&self) -> usize {
        self.last_bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_bases.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.last_bases
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.last_bases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_position() {
        let err = validate("ACGZT", SequenceKind::Reference, Alphabet::Nucleotide).unwrap_err();
        match err {
            AlignError::InvalidInput { sequence, reason } => {
                assert_eq!(sequence, SequenceKind::Reference);
                assert!(reason.contains("'Z'"));
                assert!(reason.contains("position 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_pair_length_mismatch() {
        let err = validate_pair("ACGT", "ACG", Alphabet::Nucleotide).unwrap_err();
        assert!(matches!(
            err,
            AlignError::InvalidInput { sequence: SequenceKind::Uncorrected, .. }
        ));
        assert!(validate_pair("", "", Alphabet::Nucleotide).is_ok());
        assert!(validate_pair("AC-T", "a-GT", Alphabet::Nucleotide).is_ok());
    }

    #[test]
    fn test_parse_rejects_separator() {
        let err = CorrectedRead::parse("ACG ACG", Alphabet::Nucleotide).unwrap_err();
        assert!(err.to_string().contains("separator at position 3"));
    }

    #[test]
    fn test_run_ends() {
        let read = CorrectedRead::parse("acgTTacGa", Alphabet::Nucleotide).unwrap();
        let ends: Vec<usize> = (0..read.len()).filter(|&i| read.is_run_end(i)).collect();
        assert_eq!(ends, vec![2, 6, 8]);

        let read = CorrectedRead::parse("a-AcG-t", Alphabet::Nucleotide).unwrap();
        let ends: Vec<usize> = (0..read.len()).filter(|&i| read.is_run_end(i)).collect();
        assert_eq!(ends, vec![3, 6]);
    }

    #[test]
    fn test_fragments() {
        let (read, boundaries) =
            CorrectedRead::parse_fragments("ACG ACG", Alphabet::Nucleotide).unwrap();
        assert_eq!(read.to_ascii_string(), "ACGACG");
        assert_eq!(boundaries.as_slice(), &[2, 5]);
        assert!(boundaries.contains(2));
        assert!(!boundaries.contains(3));
    }

    #[test]
    fn test_fragments_skip_empty_runs() {
        let (read, boundaries) =
            CorrectedRead::parse_fragments("  acGT\t\tA  ttg ", Alphabet::Nucleotide).unwrap();
        assert_eq!(read.to_ascii_string(), "acGTAttg");
        assert_eq!(boundaries.as_slice(), &[3, 4, 7]);
        assert_eq!(*boundaries.as_slice().last().unwrap(), read.len() - 1);
    }

    #[test]
    fn test_fragments_empty_read() {
        let (read, boundaries) = CorrectedRead::parse_fragments("", Alphabet::Nucleotide).unwrap();
        assert!(read.is_empty());
        assert!(boundaries.is_empty());
    }

    #[test]
    fn test_fragments_invalid_symbol_position() {
        let err = CorrectedRead::parse_fragments("ACG AQG", Alphabet::Nucleotide).unwrap_err();
        assert!(err.to_string().contains("position 5"));
    }
}
