//! LRCstats Core Library
//!
//! Three-way dynamic-programming alignment of a reference, an uncorrected
//! long read and its corrected counterpart. Untrimmed corrected reads are
//! aligned as one contiguous sequence; trimmed reads are aligned fragment by
//! fragment with `X` markers at fragment boundaries.

pub mod error;
pub mod cost;
pub mod sequence;
pub mod matrix;
pub mod alignment;
pub mod untrimmed;
pub mod trimmed;
pub mod config;
pub mod batch;

// Re-export commonly used types and functions
pub use error::{AlignError, AlignResult, SequenceKind};
pub use cost::{Cost, CorrectedBase, INFEASIBLE, MISMATCH_COST};
pub use alignment::{ungapped, ReadTriple, ThreeWayAlignment};
pub use untrimmed::UntrimmedAligner;
pub use trimmed::TrimmedAligner;
pub use config::{AlignerConfig, AlignmentMode, Alphabet};
pub use batch::{align_batch, align_triple, ReadAligner};

/// Version information for the LRCstats core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
