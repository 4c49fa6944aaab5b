//! Splitting records into word groups bounded by count or length, with proportional timing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{record::Record, timestamp::SrtTimestamp};

/// How records are split.
///
/// A width, duration or character budget of zero means the same as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum words per chunk, `None` disables splitting by word count.
    #[serde(default)]
    pub words_per_chunk: Option<usize>,
    /// Maximum seconds a split chunk may span, `None` disables the cap.
    #[serde(default)]
    pub max_duration: Option<f64>,
    /// Maximum characters of chunk text, `None` disables splitting by length.
    #[serde(default)]
    pub max_chars: Option<usize>,
}

impl ChunkConfig {
    pub fn new(words_per_chunk: usize, max_duration: f64) -> ChunkConfig {
        ChunkConfig {
            words_per_chunk: Some(words_per_chunk),
            max_duration: Some(max_duration),
            max_chars: None,
        }
        .normalized()
    }

    pub fn with_max_chars(self, max_chars: usize) -> ChunkConfig {
        ChunkConfig {
            max_chars: Some(max_chars),
            ..self
        }
        .normalized()
    }

    /// Replace zero values with `None`.
    pub fn normalized(self) -> ChunkConfig {
        ChunkConfig {
            words_per_chunk: self.width(),
            max_duration: self.cap(),
            max_chars: self.char_budget(),
        }
    }

    fn width(&self) -> Option<usize> {
        self.words_per_chunk.filter(|w| *w > 0)
    }

    fn cap(&self) -> Option<f64> {
        self.max_duration.filter(|d| *d > 0.0)
    }

    fn char_budget(&self) -> Option<usize> {
        self.max_chars.filter(|c| *c > 0)
    }
}

/// Hands out chunk indices for a single run, starting at 1.
#[derive(Debug, Default)]
pub struct ChunkIndex {
    last: u32,
}

impl ChunkIndex {
    pub fn new() -> ChunkIndex {
        ChunkIndex::default()
    }

    pub fn next_index(&mut self) -> u32 {
        self.last += 1;
        self.last
    }

    /// Number of indices handed out so far.
    pub fn emitted(&self) -> u32 {
        self.last
    }
}

/// A retimed fragment of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub idx: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
    /// The end was pulled in by the duration cap.
    pub capped: bool,
}

impl Chunk {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.idx)?;
        writeln!(f, "{} --> {}", SrtTimestamp(self.start), SrtTimestamp(self.end))?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Why a record produced no chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The block had no time range line.
    NoTimeLine,
    /// The record ends at or before its start.
    NotIncreasing,
    /// The record has no words.
    NoWords,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropReason::NoTimeLine => "no time range",
            DropReason::NotIncreasing => "end is not after start",
            DropReason::NoWords => "no text",
        };
        f.write_str(s)
    }
}

/// Greedily group words so no group exceeds `width` words or, unless it holds a
/// single word, `max_chars` characters once joined with spaces.
fn group_words<'a, 'w>(
    words: &'a [&'w str],
    width: Option<usize>,
    max_chars: Option<usize>,
) -> Vec<&'a [&'w str]> {
    let mut groups = Vec::new();
    let mut begin = 0;
    let mut chars = 0;
    for (i, word) in words.iter().enumerate() {
        let len = word.chars().count();
        let count = i - begin;
        let added = len + usize::from(count > 0);
        let full = width.map_or(false, |w| count >= w)
            || max_chars.map_or(false, |m| count > 0 && chars + added > m);
        if full {
            groups.push(&words[begin..i]);
            begin = i;
            chars = len;
        } else {
            chars += added;
        }
    }
    if begin < words.len() {
        groups.push(&words[begin..]);
    }
    groups
}

/// Split a record into chunks of at most `words_per_chunk` words and
/// `max_chars` characters.
///
/// The record's span is divided into equal slots, one per chunk, no matter how
/// many words end up in each chunk. With a duration cap only the end of an
/// oversized slot moves, so capped chunks leave a gap before the next one.
pub fn rechunk_record(
    record: &Record,
    config: &ChunkConfig,
    index: &mut ChunkIndex,
) -> Result<Vec<Chunk>, DropReason> {
    if record.start >= record.end {
        return Err(DropReason::NotIncreasing);
    }

    let words = record.words().collect::<Vec<_>>();
    if words.is_empty() {
        return Err(DropReason::NoWords);
    }

    let groups = group_words(&words, config.width(), config.char_budget());
    if groups.len() == 1 {
        return Ok(vec![Chunk {
            idx: index.next_index(),
            start: record.start,
            end: record.end,
            text: words.join(" "),
            capped: false,
        }]);
    }

    let per = record.duration() / groups.len() as f64;
    let cap = config.cap();

    let chunks = groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let start = record.start + i as f64 * per;
            let mut end = record.start + (i + 1) as f64 * per;
            let capped = match cap {
                Some(cap) if end - start > cap => {
                    end = start + cap;
                    true
                }
                _ => false,
            };
            Chunk {
                idx: index.next_index(),
                start,
                end,
                text: group.join(" "),
                capped,
            }
        })
        .collect();
    Ok(chunks)
}
