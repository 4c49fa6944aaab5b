//! Subtitle document parsing.
//!
//! Parsing happens in two phases. [`blocks`] splits the document on blank
//! lines, then [`Record::from_block`] classifies each line of a block as either
//! the time range or a line of text.

use std::{iter::Enumerate, str::Lines};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::timestamp::parse_timestamp;

const BYTE_ORDER_MARK: char = '\u{feff}';

// both sides must at least look like `..:..`, the numbers themselves may be junk
static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<start>[^\s:>]*:[^\s>]*?)\s*-->\s*(?P<end>[^\s:]*:\S*)")
        .expect("time range pattern is valid")
});

/// A run of consecutive non-blank lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// 1-based line number of the first line in the block
    pub line: usize,
    pub lines: Vec<&'a str>,
}

/// Iterator over the [`Block`]s of a document.
pub struct Blocks<'a> {
    lines: Enumerate<Lines<'a>>,
}

/// Split a document into blocks separated by one or more blank lines.
pub fn blocks(document: &str) -> Blocks<'_> {
    let document = document.strip_prefix(BYTE_ORDER_MARK).unwrap_or(document);
    Blocks {
        lines: document.lines().enumerate(),
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Block<'a>> {
        let mut block: Option<Block<'a>> = None;
        for (idx, line) in self.lines.by_ref() {
            if is_blank(line) {
                if block.is_some() {
                    break;
                }
                continue;
            }
            block
                .get_or_insert_with(|| Block {
                    line: idx + 1,
                    lines: Vec::new(),
                })
                .lines
                .push(line);
        }
        block
    }
}

enum Line<'a> {
    TimeRange { start: &'a str, end: &'a str },
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    match TIME_RANGE.captures(line) {
        Some(caps) => match (caps.name("start"), caps.name("end")) {
            (Some(start), Some(end)) => Line::TimeRange {
                start: start.as_str(),
                end: end.as_str(),
            },
            _ => Line::Text(line),
        },
        None => Line::Text(line),
    }
}

/// One timed cue from the input document.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// seconds
    pub start: f64,
    /// seconds
    pub end: f64,
    pub text: Vec<String>,
}

impl Record {
    /// Build a record from a block, or `None` if the block has no time range.
    ///
    /// Lines before the time range (normally the cue index) are ignored, every
    /// line after it is text.
    pub fn from_block(block: &Block<'_>) -> Option<Record> {
        let mut lines = block.lines.iter();
        let (start, end) = lines.by_ref().find_map(|line| match classify(line) {
            Line::TimeRange { start, end } => Some((start, end)),
            Line::Text(_) => None,
        })?;

        Some(Record {
            start: parse_timestamp(start),
            end: parse_timestamp(end),
            text: lines.map(|line| line.trim_end().to_string()).collect(),
        })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// The whitespace separated words of every text line, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.text.iter().flat_map(|line| line.split_whitespace())
    }
}

/// Parse every record in a document, skipping blocks with no time range.
pub fn parse_records(document: &str) -> Vec<Record> {
    blocks(document)
        .filter_map(|block| Record::from_block(&block))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CUES: &str = "1\n\
    00:00:01,000 --> 00:00:04,000\n\
    Hello there\n\
    General Kenobi\n\
    \n\
    2\n\
    00:00:05,500 --> 00:00:06,000\n\
    - You are a bold one\n";

    #[test]
    fn split_blocks_on_blank_lines() {
        let doc = "a\nb\n\n\n   \nc\n\n";
        let b = blocks(doc).collect::<Vec<_>>();
        assert_eq!(
            b,
            vec![
                Block {
                    line: 1,
                    lines: vec!["a", "b"]
                },
                Block {
                    line: 6,
                    lines: vec!["c"]
                },
            ]
        );
    }

    #[test]
    fn blocks_of_empty_document() {
        assert_eq!(blocks("").count(), 0);
        assert_eq!(blocks("\n\n  \n").count(), 0);
    }

    #[test]
    fn blocks_accept_crlf_and_bom() {
        let doc = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nhi\r\n\r\n2\r\n";
        let b = blocks(doc).collect::<Vec<_>>();
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].lines, vec!["1", "00:00:01,000 --> 00:00:02,000", "hi"]);
        assert_eq!(b[1].line, 5);
    }

    #[test]
    fn parse_two_records() {
        let records = parse_records(TWO_CUES);
        assert_eq!(
            records,
            vec![
                Record {
                    start: 1.0,
                    end: 4.0,
                    text: vec!["Hello there".to_string(), "General Kenobi".to_string()],
                },
                Record {
                    start: 5.5,
                    end: 6.0,
                    text: vec!["- You are a bold one".to_string()],
                },
            ]
        );
    }

    #[test]
    fn block_without_time_range_is_dropped() {
        let doc = "1\njust some text\n\n2\n00:00:01,000 --> 00:00:02,000\nkept\n";
        let records = parse_records(doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, vec!["kept".to_string()]);
    }

    #[test]
    fn missing_index_line() {
        let doc = "00:00:01,000 --> 00:00:02,000\nno index\n";
        let records = parse_records(doc);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start, 1.0);
    }

    #[test]
    fn only_first_time_range_is_timing() {
        let doc = "00:00:01,000 --> 00:00:02,000\n00:00:03,000 --> 00:00:04,000\n";
        let records = parse_records(doc);
        assert_eq!(records[0].end, 2.0);
        assert_eq!(records[0].text, vec!["00:00:03,000 --> 00:00:04,000".to_string()]);
    }

    #[test]
    fn time_range_without_spaces_and_cue_settings() {
        let doc = "7\n00:00:01.250-->00:00:02.500 X1:10 X2:20\ntext\n";
        let records = parse_records(doc);
        assert_eq!(records[0].start, 1.25);
        assert_eq!(records[0].end, 2.5);
    }

    #[test]
    fn arrow_in_prose_is_not_a_time_range() {
        let doc = "1\nfoo --> 00:00:05,000\nhello world\n\n\
                   2\n00:00:01,000 --> bar\nhi\n";
        assert!(parse_records(doc).is_empty());

        let doc = "1\n00:00:01,000 --> 00:00:02,000\nso it goes --> onward\n";
        let records = parse_records(doc);
        assert_eq!(records[0].text, vec!["so it goes --> onward".to_string()]);
    }

    #[test]
    fn malformed_time_fields_still_parse() {
        let doc = "1\n00:xx:01,000 --> 00:00:02,000\ntext\n";
        let records = parse_records(doc);
        assert_eq!(records[0].start, 1.0);
    }

    #[test]
    fn record_without_text() {
        let doc = "1\n00:00:01,000 --> 00:00:02,000\n";
        let records = parse_records(doc);
        assert_eq!(records.len(), 1);
        assert!(records[0].text.is_empty());
        assert_eq!(records[0].words().count(), 0);
    }

    #[test]
    fn words_span_lines() {
        let record = Record {
            start: 0.0,
            end: 1.0,
            text: vec!["  one   two".to_string(), "three\tfour ".to_string()],
        };
        assert_eq!(
            record.words().collect::<Vec<_>>(),
            vec!["one", "two", "three", "four"]
        );
    }
}
