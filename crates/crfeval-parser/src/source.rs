//! Reading CRF++ result files line by line

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crfeval_core::{EvalError, LabelUniverse, Result};

use crate::{ParsedLine, RecordParser};

/// Open a result file for buffered reading
pub fn open_source(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| EvalError::SourceUnavailable {
            path: path.display().to_string(),
            source: e,
        })
}

/// Iterator over the parsed lines of a source.
///
/// Yields `Err` only for source failures (I/O errors, invalid UTF-8); those
/// end the pass. Per-line problems come through as
/// [`ParsedLine::Rejected`].
pub struct RecordReader<'a, R> {
    lines: Lines<R>,
    line_no: usize,
    source_name: String,
    parser: &'a RecordParser,
    universe: &'a LabelUniverse,
}

impl<'a, R: BufRead> RecordReader<'a, R> {
    pub fn new(
        reader: R,
        source_name: impl Into<String>,
        parser: &'a RecordParser,
        universe: &'a LabelUniverse,
    ) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            source_name: source_name.into(),
            parser,
            universe,
        }
    }

    /// 1-based number of the last line read
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for RecordReader<'_, R> {
    type Item = Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => {
                return Some(Err(EvalError::SourceUnavailable {
                    path: format!("{} (line {})", self.source_name, self.line_no + 1),
                    source: e,
                }))
            }
        };
        self.line_no += 1;

        Some(Ok(self
            .parser
            .classify_line(&line, self.line_no, self.universe)))
    }
}
