use lrcstats_core::{
    align_batch, AlignError, AlignerConfig, AlignmentMode, ReadAligner, ReadTriple, TrimmedAligner,
    UntrimmedAligner,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn identical_reads_align_without_cost() {
    init_logging();
    let aligner = UntrimmedAligner::new("ACGT", "ACGT", "ACGT").expect("align identical reads");

    assert_eq!(aligner.cost(), 0);
    assert_eq!(aligner.reference(), "ACGT");
    assert_eq!(aligner.uncorrected(), "ACGT");
    assert_eq!(aligner.corrected(), "ACGT");
    assert!(aligner.alignment().boundaries.is_empty());
}

#[test]
fn trusted_read_ignores_reference_mismatches() {
    init_logging();
    let aligner = UntrimmedAligner::new("TTTT", "ACGT", "acgt").expect("align trusted read");

    assert_eq!(aligner.cost(), 0);
    assert_eq!(aligner.reference(), "TTTT");
    assert_eq!(aligner.uncorrected(), "ACGT");
    assert_eq!(aligner.corrected(), "acgt");
}

#[test]
fn trimmed_fragments_are_bracketed_by_markers() {
    init_logging();
    let aligner = TrimmedAligner::new("ACGACG", "ACGACG", "ACG ACG").expect("align fragments");

    assert_eq!(aligner.boundaries(), &[2, 5]);
    assert_eq!(aligner.corrected(), "XACGXACGX");
    assert_eq!(aligner.reference(), "-ACG-ACG-");
    assert_eq!(aligner.uncorrected(), "-ACG-ACG-");
    assert_eq!(aligner.cost(), 0);
    // Adjacent fragments with nothing clipped between them share one marker.
    assert_eq!(aligner.alignment().boundary_markers(), 3);
    assert_eq!(aligner.input().corrected, "ACG ACG");
}

#[test]
fn matrix_limit_rejects_construction() {
    init_logging();
    let config = AlignerConfig::default().with_max_matrix_cells(16);

    let err = UntrimmedAligner::with_config(config.clone(), "ACGTA", "ACGTA", "ACGTA").unwrap_err();
    assert!(matches!(err, AlignError::AllocationFailure { rows: 6, columns: 6, .. }));

    let err = TrimmedAligner::with_config(config, "ACGTA", "ACGTA", "AC GTA").unwrap_err();
    assert!(matches!(err, AlignError::AllocationFailure { rows: 6, columns: 6, .. }));
}

#[test]
fn failed_reset_keeps_previous_alignment() {
    init_logging();
    let config = AlignerConfig::default().with_max_matrix_cells(16);
    let mut aligner = UntrimmedAligner::with_config(config, "AC", "AC", "AC").expect("small alignment fits");
    let before = aligner.alignment().clone();

    let err = aligner.reset("ACGTA", "ACGTA", "ACGTA").unwrap_err();
    assert!(matches!(err, AlignError::AllocationFailure { .. }));
    assert_eq!(aligner.alignment(), &before);
    assert_eq!(aligner.input(), &ReadTriple::new("AC", "AC", "AC"));

    aligner.reset("ACG", "ACG", "aCG").expect("recovers on a fitting triple");
    assert_eq!(aligner.corrected(), "aCG");
}

#[test]
fn idle_aligners_reused_through_the_trait() {
    fn run<A: ReadAligner>(aligner: &mut A, triples: &[ReadTriple]) -> Vec<String> {
        triples
            .iter()
            .map(|t| aligner.align(t).expect("triple aligns").corrected)
            .collect()
    }

    let triples = vec![
        ReadTriple::new("ACGT", "ACGT", "ACGT"),
        ReadTriple::new("TTTACG", "TTTACG", "ACG"),
    ];

    let mut trimmed = TrimmedAligner::idle(AlignerConfig::default().with_mode(AlignmentMode::Trimmed));
    assert_eq!(run(&mut trimmed, &triples), vec!["XACGTX", "---XACGX"]);
}

#[test]
fn batch_alignment_reports_per_read_results() {
    init_logging();
    let config = AlignerConfig::default().with_mode(AlignmentMode::Trimmed);
    let triples = vec![
        ReadTriple::new("ACGTTTACG", "ACGTTTACG", "ACG ACG"),
        ReadTriple::new("ACGT", "ACGT", "AC?T"),
        ReadTriple::new("", "", ""),
    ];

    let results = align_batch(&config, &triples);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().expect("first aligns").corrected, "XACGX---XACGX");
    assert!(matches!(results[1], Err(AlignError::InvalidInput { .. })));
    assert!(results[2].as_ref().expect("empty triple aligns").is_empty());
}
