//! Block-access trace records and the line-oriented trace reader.
//!
//! A trace is a sequence of lines `blockId,opCode`:
//!
//! ```text
//! 1024,R
//! 1025,W
//! 1024,R
//! ```
//!
//! - `blockId` is a non-negative integer. Anything else aborts the read with
//!   [`TraceError::InvalidBlockId`]; records are never skipped.
//! - `opCode` is `R` or `W`. Any other code, or a missing one, is read as
//!   [`OpKind::Read`]; [`TraceReader`] counts these so callers can report them.
//! - Surrounding whitespace is ignored, blank lines are skipped, and fields
//!   after the op code are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TraceError;

/// Block identifier as it appears in traces.
pub type BlockId = u64;

/// Kind of access. Only writes are counted separately; both kinds go through
/// the same replacement decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpKind {
    #[default]
    Read,
    Write,
}

impl OpKind {
    /// Parses a trace op code; `None` for anything but `R` or `W`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "R" => Some(OpKind::Read),
            "W" => Some(OpKind::Write),
            _ => None,
        }
    }

    /// Returns `true` for [`OpKind::Write`].
    pub fn is_write(self) -> bool {
        matches!(self, OpKind::Write)
    }
}

/// One trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub block: BlockId,
    pub op: OpKind,
}

impl Access {
    /// Read access to `block`.
    pub fn read(block: BlockId) -> Self {
        Self {
            block,
            op: OpKind::Read,
        }
    }

    /// Write access to `block`.
    pub fn write(block: BlockId) -> Self {
        Self {
            block,
            op: OpKind::Write,
        }
    }
}

/// A parsed line plus whether its op code was recognized.
struct Record {
    access: Access,
    known_op: bool,
}

fn parse_record(line: &str, line_no: usize) -> Result<Option<Record>, TraceError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut fields = line.split(',');
    let block_text = fields.next().unwrap_or_default().trim();
    let block = block_text
        .parse::<BlockId>()
        .map_err(|_| TraceError::InvalidBlockId {
            line: line_no,
            text: block_text.to_owned(),
        })?;

    let parsed_op = fields.next().map(|code| OpKind::from_code(code.trim()));
    let known_op = matches!(parsed_op, Some(Some(_)));
    let op = parsed_op.flatten().unwrap_or_default();

    Ok(Some(Record {
        access: Access { block, op },
        known_op,
    }))
}

/// Parses one trace line. Returns `Ok(None)` for blank lines.
///
/// # Example
///
/// ```
/// use lirsim::trace::{parse_line, Access};
///
/// assert_eq!(parse_line("42,W", 1).unwrap(), Some(Access::write(42)));
/// assert_eq!(parse_line("42,X", 1).unwrap(), Some(Access::read(42)));
/// assert_eq!(parse_line("   ", 1).unwrap(), None);
/// assert!(parse_line("-1,R", 1).is_err());
/// ```
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Access>, TraceError> {
    Ok(parse_record(line, line_no)?.map(|record| record.access))
}

/// Streaming iterator of [`Access`] records over any `BufRead`.
///
/// Yields at most one error, after which the iterator is exhausted.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    buf: String,
    line_no: usize,
    unrecognized_ops: u64,
    first_unrecognized_line: Option<usize>,
    done: bool,
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps an already-open reader; line numbers start at 1.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            unrecognized_ops: 0,
            first_unrecognized_line: None,
            done: false,
        }
    }

    /// Number of lines consumed so far, blank ones included.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Number of records whose op code was missing or not `R`/`W`.
    pub fn unrecognized_ops(&self) -> u64 {
        self.unrecognized_ops
    }

    /// Line of the first record with an unrecognized op code.
    pub fn first_unrecognized_line(&self) -> Option<usize> {
        self.first_unrecognized_line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<Access, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_no += 1;
                    match parse_record(&self.buf, self.line_no) {
                        Ok(Some(record)) => {
                            if !record.known_op {
                                self.unrecognized_ops += 1;
                                self.first_unrecognized_line.get_or_insert(self.line_no);
                            }
                            return Some(Ok(record.access));
                        },
                        Ok(None) => {},
                        Err(err) => {
                            self.done = true;
                            return Some(Err(err));
                        },
                    }
                },
                Err(source) => {
                    self.done = true;
                    return Some(Err(TraceError::Io {
                        line: self.line_no,
                        source,
                    }));
                },
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(text: &str) -> (Vec<Access>, Option<TraceError>, u64) {
        let mut reader = TraceReader::new(Cursor::new(text.as_bytes().to_vec()));
        let mut accesses = Vec::new();
        let mut error = None;
        for item in reader.by_ref() {
            match item {
                Ok(access) => accesses.push(access),
                Err(err) => error = Some(err),
            }
        }
        (accesses, error, reader.unrecognized_ops())
    }

    #[test]
    fn parses_reads_and_writes() {
        let (accesses, error, unknown) = read_all("1,R\n2,W\n1,R\n");
        assert!(error.is_none());
        assert_eq!(unknown, 0);
        assert_eq!(
            accesses,
            vec![Access::read(1), Access::write(2), Access::read(1)]
        );
    }

    #[test]
    fn tolerates_whitespace_crlf_and_blank_lines() {
        let (accesses, error, _) = read_all(" 7 , W \r\n\n\n8,R\r\n");
        assert!(error.is_none());
        assert_eq!(accesses, vec![Access::write(7), Access::read(8)]);
    }

    #[test]
    fn unknown_or_missing_op_reads_as_read_and_is_counted() {
        let mut reader = TraceReader::new(Cursor::new("1,R\n2,X\n3\n4,W,extra\n"));
        let accesses: Vec<_> = reader.by_ref().map(Result::unwrap).collect();
        assert_eq!(
            accesses,
            vec![
                Access::read(1),
                Access::read(2),
                Access::read(3),
                Access::write(4)
            ]
        );
        assert_eq!(reader.unrecognized_ops(), 2);
        assert_eq!(reader.first_unrecognized_line(), Some(2));
        assert_eq!(reader.lines_read(), 4);
    }

    #[test]
    fn malformed_block_id_stops_the_read() {
        let (accesses, error, _) = read_all("1,R\nabc,R\n3,R\n");
        assert_eq!(accesses, vec![Access::read(1)]);
        match error {
            Some(TraceError::InvalidBlockId { line, text }) => {
                assert_eq!(line, 2);
                assert_eq!(text, "abc");
            },
            other => panic!("expected InvalidBlockId, got {other:?}"),
        }
    }

    #[test]
    fn negative_and_empty_block_ids_are_errors() {
        assert!(matches!(
            parse_line("-5,R", 3),
            Err(TraceError::InvalidBlockId { line: 3, .. })
        ));
        assert!(parse_line(",W", 1).is_err());
    }

    #[test]
    fn open_missing_file_is_open_error() {
        let err = TraceReader::open("/definitely/not/here.trace").unwrap_err();
        assert!(matches!(err, TraceError::Open { .. }));
    }

    #[test]
    fn op_kind_codes() {
        assert_eq!(OpKind::from_code("R"), Some(OpKind::Read));
        assert_eq!(OpKind::from_code("W"), Some(OpKind::Write));
        assert_eq!(OpKind::from_code("w"), None);
        assert!(OpKind::Write.is_write());
        assert!(!OpKind::Read.is_write());
    }
}
