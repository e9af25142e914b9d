//! Running many read triples through the aligners
//!
//! Each aligner owns its matrix, so parallel batches give every rayon worker
//! its own aligner and recycle it with `reset` between reads.

use rayon::prelude::*;

use crate::alignment::{ReadTriple, ThreeWayAlignment};
use crate::config::{AlignerConfig, AlignmentMode};
use crate::error::AlignResult;
use crate::trimmed::TrimmedAligner;
use crate::untrimmed::UntrimmedAligner;

/// Common surface of the untrimmed and trimmed aligners
pub trait ReadAligner {
    /// Build an aligner with no alignment loaded
    fn idle(config: AlignerConfig) -> Self
    where
        Self: Sized;

    /// Align a new triple, replacing the current alignment on success
    fn reset(&mut self, reference: &str, uncorrected: &str, corrected: &str) -> AlignResult<()>;

    /// The most recent successful alignment
    fn alignment(&self) -> &ThreeWayAlignment;

    /// Get the name/identifier of this aligner
    fn name(&self) -> &'static str;

    fn align(&mut self, triple: &ReadTriple) -> AlignResult<ThreeWayAlignment> {
        self.reset(&triple.reference, &triple.uncorrected, &triple.corrected)?;
        Ok(self.alignment().clone())
    }
}

/// Align one triple with the aligner selected by `config.mode`.
pub fn align_triple(config: &AlignerConfig, triple: &ReadTriple) -> AlignResult<ThreeWayAlignment> {
    match config.mode {
        AlignmentMode::Untrimmed => UntrimmedAligner::idle(config.clone()).align(triple),
        AlignmentMode::Trimmed => TrimmedAligner::idle(config.clone()).align(triple),
    }
}

/// Align every triple in parallel. Results keep the input order; a failed
/// triple does not affect the others.
pub fn align_batch(config: &AlignerConfig, triples: &[ReadTriple]) -> Vec<AlignResult<ThreeWayAlignment>> {
    log::debug!("Aligning batch of {} read triples ({:?})", triples.len(), config.mode);

    let results: Vec<AlignResult<ThreeWayAlignment>> = match config.mode {
        AlignmentMode::Untrimmed => run::<UntrimmedAligner>(config, triples),
        AlignmentMode::Trimmed => run::<TrimmedAligner>(config, triples),
    };

    let failures = results.iter().filter(|r| r.is_err()).count();
    if failures > 0 {
        log::warn!("{} of {} read triples failed to align", failures, triples.len());
    }
    results
}

fn run<A>(config: &AlignerConfig, triples: &[ReadTriple]) -> Vec<AlignResult<ThreeWayAlignment>>
where
    A: ReadAligner + Send,
{
    triples
        .par_iter()
        .map_init(|| A::idle(config.clone()), |aligner, triple| aligner.align(triple))
        .collect()
}
