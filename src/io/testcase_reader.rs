//! Test-case input parsing.
//!
//! Two line-oriented formats are accepted, both with qualities encoded as
//! printable ASCII (Phred+33):
//!
//! - **Flat**: every line is one pair,
//!   `haplotype read baseQ insQ delQ gcp`. The whole file forms a single
//!   evaluation batch.
//! - **Grouped**: a header line `m n` announces `m` haplotype lines
//!   followed by `n` read lines (`read baseQ insQ delQ gcp`); the group
//!   expands, haplotype-major, into a batch of `m * n` pairs. Groups may
//!   repeat.
//!
//! All structural validation happens here: by the time a `TestCase` leaves
//! this module it satisfies the invariants the kernel relies on (non-empty
//! sequences, quality tracks as long as the read).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::core::pairhmm::types::TestCase;
use crate::error::{PairHmmError, Result};

/// Phred+33 printable-ASCII offset.
const QUAL_OFFSET: u8 = 33;

/// Reads batches of test cases from a line-oriented source.
///
/// Iterates over batches: each grouped section yields one batch, a flat
/// file yields exactly one batch containing every line.
pub struct TestCaseReader<R: BufRead> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl TestCaseReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TestCaseReader<R> {
    pub fn new(reader: R) -> Self {
        TestCaseReader {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn next_nonempty_line(&mut self) -> Option<io::Result<(usize, String)>> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    self.line_no += 1;
                    if !line.trim().is_empty() {
                        return Some(Ok((self.line_no, line)));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }

    fn expect_line(&mut self, what: &str) -> Result<(usize, String)> {
        match self.next_nonempty_line() {
            Some(Ok(pair)) => Ok(pair),
            Some(Err(e)) => Err(e.into()),
            None => Err(PairHmmError::InvalidFormat {
                line: self.line_no,
                msg: format!("unexpected end of input, expected {what}"),
            }),
        }
    }

    fn read_group(&mut self, n_haps: usize, n_reads: usize) -> Result<Vec<TestCase>> {
        let mut haps = Vec::with_capacity(n_haps);
        for _ in 0..n_haps {
            let (line_no, line) = self.expect_line("a haplotype line")?;
            let mut fields = line.split_whitespace();
            let hap = fields.next().unwrap().to_string();
            if fields.next().is_some() {
                return Err(PairHmmError::InvalidFormat {
                    line: line_no,
                    msg: "haplotype line must contain exactly one field".into(),
                });
            }
            haps.push(hap);
        }

        let mut reads = Vec::with_capacity(n_reads);
        for _ in 0..n_reads {
            let (line_no, line) = self.expect_line("a read line")?;
            reads.push(parse_read_fields(&line, line_no, 5)?);
        }

        let mut batch = Vec::with_capacity(n_haps * n_reads);
        for hap in &haps {
            for read in &reads {
                batch.push(read.build(hap)?);
            }
        }
        Ok(batch)
    }

    fn read_flat(&mut self, first: (usize, String)) -> Result<Vec<TestCase>> {
        let mut batch = Vec::new();
        let (line_no, line) = first;
        batch.push(parse_flat_case(&line, line_no)?);
        while let Some(next) = self.next_nonempty_line() {
            let (line_no, line) = next?;
            batch.push(parse_flat_case(&line, line_no)?);
        }
        Ok(batch)
    }
}

impl<R: BufRead> Iterator for TestCaseReader<R> {
    type Item = Result<Vec<TestCase>>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line_no, line) = match self.next_nonempty_line()? {
            Ok(pair) => pair,
            Err(e) => return Some(Err(e.into())),
        };

        if let Some((m, n)) = parse_group_header(&line) {
            return Some(self.read_group(m, n));
        }
        Some(self.read_flat((line_no, line)))
    }
}

/// Parsed but not yet expanded read-side fields of one line.
struct ReadFields {
    line_no: usize,
    read: String,
    base_quality: Vec<u8>,
    insertion_quality: Vec<u8>,
    deletion_quality: Vec<u8>,
    gap_continuation_quality: Vec<u8>,
}

impl ReadFields {
    fn build(&self, haplotype: &str) -> Result<TestCase> {
        TestCase::new(
            haplotype.as_bytes(),
            self.read.as_bytes(),
            self.base_quality.clone(),
            self.insertion_quality.clone(),
            self.deletion_quality.clone(),
            self.gap_continuation_quality.clone(),
        )
        .map_err(|e| PairHmmError::InvalidFormat {
            line: self.line_no,
            msg: e.to_string(),
        })
    }
}

/// A group header is a line of exactly two non-negative integers.
fn parse_group_header(line: &str) -> Option<(usize, usize)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 2 {
        return None;
    }
    match (fields[0].parse::<usize>(), fields[1].parse::<usize>()) {
        (Ok(m), Ok(n)) if m > 0 && n > 0 => Some((m, n)),
        _ => None,
    }
}

fn parse_read_fields(line: &str, line_no: usize, expected: usize) -> Result<ReadFields> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != expected {
        return Err(PairHmmError::InvalidFormat {
            line: line_no,
            msg: format!("expected {expected} fields, found {}", fields.len()),
        });
    }
    Ok(ReadFields {
        line_no,
        read: fields[0].to_string(),
        base_quality: decode_qualities(fields[1], line_no)?,
        insertion_quality: decode_qualities(fields[2], line_no)?,
        deletion_quality: decode_qualities(fields[3], line_no)?,
        gap_continuation_quality: decode_qualities(fields[4], line_no)?,
    })
}

fn parse_flat_case(line: &str, line_no: usize) -> Result<TestCase> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(PairHmmError::InvalidFormat {
            line: line_no,
            msg: format!("expected 6 fields, found {}", fields.len()),
        });
    }
    let read = parse_read_fields(&fields[1..].join(" "), line_no, 5)?;
    read.build(fields[0])
}

fn decode_qualities(field: &str, line_no: usize) -> Result<Vec<u8>> {
    field
        .bytes()
        .map(|b| {
            b.checked_sub(QUAL_OFFSET).ok_or_else(|| PairHmmError::InvalidFormat {
                line: line_no,
                msg: format!("quality character {:?} below the Phred+33 range", b as char),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(s: &str) -> TestCaseReader<BufReader<&[u8]>> {
        TestCaseReader::new(BufReader::new(s.as_bytes()))
    }

    #[test]
    fn parses_flat_lines_as_one_batch() {
        // '+' is Phred+33 for quality 10, 'I' for 40
        let input = "ACGTACGT ACGT IIII IIII IIII ++++\nACGTACGT TTTT IIII IIII IIII ++++\n";
        let mut r = reader(input);
        let batch = r.next().unwrap().unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].read_len(), 4);
        assert_eq!(batch[0].base_quality(), &[40, 40, 40, 40]);
        assert_eq!(batch[0].gap_continuation_quality(), &[10, 10, 10, 10]);
        assert!(r.next().is_none());
    }

    #[test]
    fn parses_grouped_input_haplotype_major() {
        let input = "2 2\nACGTACGT\nTTTTTTTT\nAC II II II II\nGT II II II II\n";
        let mut r = reader(input);
        let batch = r.next().unwrap().unwrap();
        assert_eq!(batch.len(), 4);
        // haplotype-major: cases 0 and 1 share the first haplotype
        assert_eq!(batch[0].haplotype(), batch[1].haplotype());
        assert_ne!(batch[1].haplotype(), batch[2].haplotype());
        assert_eq!(batch[0].read(), &[0, 1]); // AC
        assert_eq!(batch[1].read(), &[2, 3]); // GT
        assert!(r.next().is_none());
    }

    #[test]
    fn rejects_wrong_field_count() {
        let mut r = reader("ACGT ACGT IIII IIII IIII\n");
        assert!(r.next().unwrap().is_err());
    }

    #[test]
    fn rejects_quality_length_mismatch() {
        let mut r = reader("ACGTACGT ACGT III IIII IIII ++++\n");
        assert!(r.next().unwrap().is_err());
    }

    #[test]
    fn rejects_sub_phred33_quality_characters() {
        let mut r = reader("ACGTACGT ACGT \u{1f}III IIII IIII ++++\n");
        assert!(r.next().unwrap().is_err());
    }

    #[test]
    fn skips_blank_lines() {
        let input = "\n\nACGTACGT ACGT IIII IIII IIII ++++\n\n";
        let mut r = reader(input);
        let batch = r.next().unwrap().unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn truncated_group_is_an_error() {
        let mut r = reader("2 1\nACGT\n");
        assert!(r.next().unwrap().is_err());
    }
}
