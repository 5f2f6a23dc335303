//! File-based parsing tests

use std::io::Write;

use crfeval_core::{EvalError, LabelUniverse};
use crfeval_parser::{open_source, ParsedLine, RecordParser, RecordReader};

const SAMPLE: &str = "\
Confidence\tNN\tB-NP\tB-NP
in\tIN\tB-PP\tB-PP
the\tDT\tB-NP\tB-NP
pound\tNN\tI-NP\tI-NP

is\tVBZ\tB-VP\tB-VP
widely\tRB\tI-VP\tB-ADJP
";

#[test]
fn test_parse_sample_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let universe = LabelUniverse::new(["I-NP", "B-NP", "B-ADJP", "I-ADJP"]).unwrap();
    let parser = RecordParser::default();
    let source = open_source(file.path()).unwrap();

    let mut records = 0;
    let mut blanks = 0;
    let mut unknown = 0;
    for outcome in RecordReader::new(source, "sample", &parser, &universe) {
        match outcome.unwrap() {
            ParsedLine::Record(_) => records += 1,
            ParsedLine::Blank => blanks += 1,
            ParsedLine::Rejected(EvalError::UnknownLabel { .. }) => unknown += 1,
            ParsedLine::Rejected(other) => panic!("unexpected rejection: {other}"),
        }
    }

    // B-PP, B-VP and I-VP are outside the chunk universe
    assert_eq!(records, 3);
    assert_eq!(blanks, 1);
    assert_eq!(unknown, 3);
}

#[test]
fn test_windows_line_endings() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"a\tNN\tA\tA\r\nb\tNN\tA\tB\r\n").unwrap();

    let universe = LabelUniverse::new(["A", "B"]).unwrap();
    let parser = RecordParser::default();
    let source = open_source(file.path()).unwrap();

    let lines: Vec<String> = RecordReader::new(source, "crlf", &parser, &universe)
        .filter_map(|outcome| match outcome.unwrap() {
            ParsedLine::Record(record) => Some(record.line().to_string()),
            _ => None,
        })
        .collect();

    assert_eq!(lines, vec!["a\tNN\tA\tA", "b\tNN\tA\tB"]);
}
