//! End-to-end evaluation of CRF++ result files

use std::fs;
use std::io::Write;

use crfeval_core::{EvalError, LabelUniverse};
use crfeval_metrics::Evaluator;

const CHUNK_LABELS: [&str; 4] = ["I-NP", "B-NP", "B-ADJP", "I-ADJP"];

const CRF_OUTPUT: &str = "\
Rockwell\tNNP\tB-NP\tB-NP
International\tNNP\tI-NP\tI-NP
Corp.\tNNP\tI-NP\tI-NP
's\tPOS\tB-NP\tB-NP
Tulsa\tNNP\tI-NP\tB-NP
unit\tNN\tI-NP\tI-NP
said\tVBD\tB-VP\tB-VP

it\tPRP\tB-NP\tB-NP
signed\tVBD\tB-VP\tB-VP
a\tDT\tB-NP\tB-NP
tentative\tJJ\tI-NP\tB-ADJP
agreement
";

fn write_sample() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CRF_OUTPUT.as_bytes()).unwrap();
    file
}

#[test]
fn test_evaluate_crf_file() {
    let file = write_sample();
    let universe = LabelUniverse::new(CHUNK_LABELS).unwrap();

    let evaluator = Evaluator::with_source(universe, file.path()).unwrap();
    let stats = evaluator.summary_stats();

    assert_eq!(stats.total_predictions, 9);
    assert_eq!(stats.correct_predictions, 7);
    assert_eq!(stats.unknown_label_rejections, 2);
    assert_eq!(stats.skipped_lines, 1);

    // rows: I-NP, B-NP, B-ADJP, I-ADJP
    assert_eq!(
        evaluator.confusion_matrix().to_rows(),
        vec![
            vec![3, 1, 1, 0],
            vec![0, 4, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]
    );

    let metrics = evaluator.compute_metrics();
    let i_np = metrics.get("I-NP").unwrap();
    assert!((i_np.precision - 1.0).abs() < 1e-9);
    assert!((i_np.recall - 0.6).abs() < 1e-9);

    let b_np = metrics.get("B-NP").unwrap();
    assert!((b_np.precision - 0.8).abs() < 1e-9);
    assert!((b_np.recall - 1.0).abs() < 1e-9);

    let b_adjp = metrics.get("B-ADJP").unwrap();
    assert_eq!(b_adjp.predicted_total, 1);
    assert_eq!(b_adjp.precision, 0.0);
    assert_eq!(b_adjp.recall, 0.0);

    assert!((metrics.accuracy() - 7.0 / 9.0).abs() < 1e-9);
}

#[test]
fn test_export_to_files() {
    let file = write_sample();
    let dir = tempfile::tempdir().unwrap();
    let correct_path = dir.path().join("correct_predictions.txt");
    let wrong_path = dir.path().join("wrong_predictions.txt");

    let evaluator =
        Evaluator::with_source(LabelUniverse::new(CHUNK_LABELS).unwrap(), file.path()).unwrap();

    let mut correct = fs::File::create(&correct_path).unwrap();
    let mut wrong = fs::File::create(&wrong_path).unwrap();
    let split = evaluator
        .export_prediction_split(&mut correct, &mut wrong)
        .unwrap();

    assert_eq!(split.correct, 7);
    assert_eq!(split.incorrect, 2);

    let wrong_text = fs::read_to_string(&wrong_path).unwrap();
    assert_eq!(
        wrong_text,
        "Tulsa\tNNP\tI-NP\tB-NP\ntentative\tJJ\tI-NP\tB-ADJP\n"
    );
    assert_eq!(fs::read_to_string(&correct_path).unwrap().lines().count(), 7);
}

#[test]
fn test_missing_source() {
    let universe = LabelUniverse::new(CHUNK_LABELS).unwrap();
    let err = Evaluator::with_source(universe, "/nonexistent/sample_crf_output").unwrap_err();

    match err {
        EvalError::SourceUnavailable { path, .. } => assert!(path.ends_with("sample_crf_output")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_source_keeps_previous_results() {
    let file = write_sample();
    let mut evaluator = Evaluator::new(LabelUniverse::new(CHUNK_LABELS).unwrap());
    evaluator.load_from_path(file.path()).unwrap();
    let before = evaluator.confusion_matrix().clone();

    assert!(evaluator.load_from_path("/nonexistent/more_output").is_err());
    assert_eq!(evaluator.confusion_matrix(), &before);
}

#[test]
fn test_empty_file_reports_zeros() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let evaluator =
        Evaluator::with_source(LabelUniverse::new(["A", "B"]).unwrap(), file.path()).unwrap();

    let metrics = evaluator.compute_metrics();
    assert_eq!(metrics.accuracy(), 0.0);
    assert!(metrics.iter().all(|m| m.f1_score == 0.0));
    assert_eq!(evaluator.summary_stats().total_predictions, 0);
}
