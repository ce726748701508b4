use forwardflow_core::{EmbeddingTable, FlowError, ForwardFlowScorer, SharedTable};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const ABC_TABLE: &str = "\
4 3
a 1 0 0
b 0 1 0
c 0.70710677 0.70710677 0
void 0 0 0
";

fn table_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_from_path_and_score() {
    let file = table_file(ABC_TABLE);
    let table = EmbeddingTable::load(file.path()).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.dimension(), 3);

    let scorer = ForwardFlowScorer::new(&table);
    let report = scorer.flow(&["a", "b", "c"]).unwrap();
    let diag = 1.0 - std::f64::consts::FRAC_1_SQRT_2;
    assert_eq!(report.instantaneous[0], 1.0);
    assert!((report.instantaneous[1] - diag).abs() < 1e-6);
    assert!((report.score - (1.0 + diag) / 2.0).abs() < 1e-6);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EmbeddingTable::load(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, FlowError::Io(_)), "got {err:?}");
}

#[test]
fn header_overstating_rows_is_format_error() {
    let file = table_file("3 2\na 1 0\nb 0 1\n");
    let err = EmbeddingTable::load(file.path()).unwrap_err();
    assert!(matches!(err, FlowError::Format { .. }), "got {err:?}");
}

#[test]
fn row_with_extra_field_is_format_error() {
    let file = table_file("2 2\na 1 0\nb 0 1 0.5\n");
    let err = EmbeddingTable::load(file.path()).unwrap_err();
    assert!(matches!(err, FlowError::Format { .. }), "got {err:?}");
}

#[test]
fn out_of_vocabulary_even_after_valid_prefix() {
    let file = table_file(ABC_TABLE);
    let table = EmbeddingTable::load(file.path()).unwrap();
    let scorer = ForwardFlowScorer::new(&table);
    match scorer.score(&["a", "b", "c", "dog"]) {
        Err(FlowError::OutOfVocabulary { token }) => assert_eq!(token, "dog"),
        other => panic!("expected OutOfVocabulary, got {other:?}"),
    }
}

#[test]
fn vectors_for_projection_follow_input_order() {
    let file = table_file(ABC_TABLE);
    let table = EmbeddingTable::load(file.path()).unwrap();
    let vectors = table.vectors_of(&["c", "a", "void"]).unwrap();
    assert_eq!(vectors[1], &[1.0, 0.0, 0.0]);
    assert_eq!(vectors[2], &[0.0, 0.0, 0.0]);
    assert_eq!(vectors[0].len(), 3);
}

#[test]
fn zero_vector_token_scores_as_unit_distance() {
    let file = table_file(ABC_TABLE);
    let table = EmbeddingTable::load(file.path()).unwrap();
    let scorer = ForwardFlowScorer::new(&table);
    assert_eq!(scorer.score(&["void", "a"]).unwrap(), 1.0);
    assert_eq!(scorer.score(&["a", "void", "b"]).unwrap(), 1.0);
}

#[test]
fn shared_lazy_table_scores_from_many_threads() {
    let file = table_file(ABC_TABLE);
    let shared = Arc::new(SharedTable::lazy(file.path()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                let table = shared.get().unwrap();
                let tokens = if i % 2 == 0 { ["a", "b"] } else { ["b", "a"] };
                ForwardFlowScorer::new(&table).score(&tokens).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1.0);
    }
}
