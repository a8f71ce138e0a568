//! Single-record parsing and log-text helpers
//!
//! A record is one heap snapshot: directive lines (starting with `&`)
//! interleaved with chunk lines of the form `address size allocflag`.
//! Parsing is lenient toward malformed chunk lines because the allocator
//! hook may be mid-write when the log is read; each skipped line is
//! reported as a [`ParseWarning`] rather than failing the record.

use crate::model::Chunk;
use std::fmt;

/// Directive prefix marking a non-chunk line.
const DIRECTIVE_PREFIX: char = '&';
/// Directive identifying the producing process.
const PID_DIRECTIVE: &str = "&PID=";
/// Directive noting that the producer already coalesced this snapshot.
const COALESCED_DIRECTIVE: &str = "&coalesced";

/// A chunk line that could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: String,
    pub reason: WarningReason,
}

/// Why a chunk line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningReason {
    /// Not exactly three whitespace-separated tokens
    TokenCount { found: usize },
    /// Size token is not a non-negative base-10 integer
    BadSize { token: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            WarningReason::TokenCount { found } => write!(
                f,
                "skipped chunk line {:?}: expected 3 tokens, found {}",
                self.line, found
            ),
            WarningReason::BadSize { token } => write!(
                f,
                "skipped chunk line {:?}: size token {:?} is not a non-negative integer",
                self.line, token
            ),
        }
    }
}

/// Result of parsing one record's raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// Chunks in file order; order encodes physical adjacency
    pub chunks: Vec<Chunk>,
    /// Whether the record carried a `&coalesced` directive. Informational
    /// only; it does not suppress the server's own synthetic coalescing.
    pub coalesced_directive: bool,
    /// Malformed chunk lines that were skipped
    pub warnings: Vec<ParseWarning>,
}

/// Parse one record's raw text into an ordered chunk list.
pub fn parse_record(raw: &str) -> ParsedRecord {
    let mut chunks = Vec::new();
    let mut coalesced_directive = false;
    let mut warnings = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(DIRECTIVE_PREFIX) {
            if line.starts_with(COALESCED_DIRECTIVE) {
                coalesced_directive = true;
            }
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 {
            warnings.push(ParseWarning {
                line: line.to_string(),
                reason: WarningReason::TokenCount {
                    found: tokens.len(),
                },
            });
            continue;
        }
        let size: u64 = match tokens[1].parse() {
            Ok(size) => size,
            Err(_) => {
                warnings.push(ParseWarning {
                    line: line.to_string(),
                    reason: WarningReason::BadSize {
                        token: tokens[1].to_string(),
                    },
                });
                continue;
            }
        };
        chunks.push(Chunk::new(tokens[0], size, tokens[2] == "1"));
    }

    ParsedRecord {
        chunks,
        coalesced_directive,
        warnings,
    }
}

/// Split a full log read into records on blank-line boundaries.
///
/// Whitespace-only lines count as blank. Leading directive lines attach to
/// the first record that follows them.
pub fn split_records(content: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// Extract the producing process id from a full log read.
///
/// The log can accumulate several `&PID=` directives across appends; only
/// the latest value is authoritative.
pub fn extract_pid(content: &str) -> Option<u32> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix(PID_DIRECTIVE))
        .filter_map(|value| value.trim().parse().ok())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Chunk;

    #[test]
    fn test_parse_chunk_lines() {
        let record = parse_record("0x1000 32 1\n0x1020 16 0\n");
        assert_eq!(
            record.chunks,
            vec![
                Chunk::new("0x1000", 32, true),
                Chunk::new("0x1020", 16, false),
            ]
        );
        assert!(!record.coalesced_directive);
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_alloc_flag_is_one_or_free() {
        let record = parse_record("0x1000 8 1\n0x1008 8 0\n0x1010 8 2\n");
        assert_eq!(
            record.chunks.iter().map(|c| c.allocated).collect::<Vec<_>>(),
            vec![true, false, false]
        );
    }

    #[test]
    fn test_directives_are_not_chunks() {
        let record = parse_record("&PID=1234\n&coalesced\n0x1000 32 1\n");
        assert_eq!(record.chunks.len(), 1);
        assert!(record.coalesced_directive);
    }

    #[test]
    fn test_malformed_line_skipped_with_warning() {
        let record = parse_record("0x1000 32 1\n0x1020 garbage\n0x1040 16 0\n");
        assert_eq!(record.chunks.len(), 2);
        assert_eq!(record.warnings.len(), 1);
        assert_eq!(
            record.warnings[0].reason,
            WarningReason::TokenCount { found: 2 }
        );
    }

    #[test]
    fn test_non_numeric_size_skipped() {
        let record = parse_record("0x1000 huge 1\n");
        assert!(record.chunks.is_empty());
        assert_eq!(
            record.warnings[0].reason,
            WarningReason::BadSize {
                token: "huge".to_string()
            }
        );
    }

    #[test]
    fn test_negative_size_rejected() {
        let record = parse_record("0x1000 -4 1\n");
        assert!(record.chunks.is_empty());
        assert_eq!(record.warnings.len(), 1);
    }

    #[test]
    fn test_split_records_on_blank_lines() {
        let records = split_records("a 1 1\nb 2 0\n\nc 3 1\n\n\nd 4 0\n");
        assert_eq!(records, vec!["a 1 1\nb 2 0", "c 3 1", "d 4 0"]);
    }

    #[test]
    fn test_split_records_whitespace_only_separator() {
        let records = split_records("a 1 1\n   \nb 2 0\n");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_extract_pid_latest_wins() {
        let content = "&PID=100\na 1 1\n\n&PID=200\nb 2 0\n";
        assert_eq!(extract_pid(content), Some(200));
    }

    #[test]
    fn test_extract_pid_absent() {
        assert_eq!(extract_pid("a 1 1\n"), None);
    }
}
