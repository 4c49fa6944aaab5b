//! Writing rechunked records back out as a subtitle document.

use std::io::{self, Write};

use serde::Serialize;

use crate::{
    chunk::{rechunk_record, ChunkConfig, ChunkIndex, DropReason},
    record::{blocks, Block, Record},
    RechunkError,
};

/// Counters collected over one run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RechunkStats {
    pub blocks: usize,
    pub records: usize,
    pub no_time_line: usize,
    pub not_increasing: usize,
    pub no_words: usize,
    pub split_records: usize,
    pub chunks: usize,
    pub capped_chunks: usize,
}

impl RechunkStats {
    pub fn dropped(&self) -> usize {
        self.no_time_line + self.not_increasing + self.no_words
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::NoTimeLine => self.no_time_line += 1,
            DropReason::NotIncreasing => self.not_increasing += 1,
            DropReason::NoWords => self.no_words += 1,
        }
    }
}

/// Writes chunks for a single run.
///
/// The emitter owns the run's [`ChunkIndex`], so output is numbered from 1 in
/// the order records are handed to it. Dropped records are only reported
/// through `log::debug!` and the [`RechunkStats`].
pub struct Emitter<W: Write> {
    writer: W,
    config: ChunkConfig,
    index: ChunkIndex,
    stats: RechunkStats,
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W, config: ChunkConfig) -> Emitter<W> {
        Emitter {
            writer,
            config: config.normalized(),
            index: ChunkIndex::new(),
            stats: RechunkStats::default(),
        }
    }

    pub fn emit_document(&mut self, document: &str) -> Result<(), RechunkError> {
        for block in blocks(document) {
            self.emit_block(&block)?;
        }
        Ok(())
    }

    pub fn emit_block(&mut self, block: &Block<'_>) -> Result<(), RechunkError> {
        self.stats.blocks += 1;
        match Record::from_block(block) {
            Some(record) => self.emit(&record, Some(block.line)),
            None => {
                self.drop_record(DropReason::NoTimeLine, Some(block.line));
                Ok(())
            }
        }
    }

    pub fn emit_record(&mut self, record: &Record) -> Result<(), RechunkError> {
        self.emit(record, None)
    }

    fn emit(&mut self, record: &Record, line: Option<usize>) -> Result<(), RechunkError> {
        self.stats.records += 1;
        let chunks = match rechunk_record(record, &self.config, &mut self.index) {
            Ok(chunks) => chunks,
            Err(reason) => {
                self.drop_record(reason, line);
                return Ok(());
            }
        };

        if chunks.len() > 1 {
            log::trace!("split record into {} chunks: {:?}", chunks.len(), record);
            self.stats.split_records += 1;
        }
        for chunk in &chunks {
            write!(self.writer, "{}", chunk)?;
            self.stats.chunks += 1;
            if chunk.capped {
                self.stats.capped_chunks += 1;
            }
        }
        Ok(())
    }

    fn drop_record(&mut self, reason: DropReason, line: Option<usize>) {
        match line {
            Some(line) => log::debug!("dropping block at line {}: {}", line, reason),
            None => log::debug!("dropping record: {}", reason),
        }
        self.stats.record_drop(reason);
    }

    pub fn stats(&self) -> &RechunkStats {
        &self.stats
    }

    /// Flush the writer and return the statistics for the run.
    pub fn finish(mut self) -> Result<RechunkStats, RechunkError> {
        self.writer.flush()?;
        Ok(self.stats)
    }
}

/// Rechunk an in-memory document.
pub fn rechunk_document(document: &str, config: &ChunkConfig) -> Result<String, RechunkError> {
    let mut buf = Vec::new();
    let mut emitter = Emitter::new(&mut buf, *config);
    emitter.emit_document(document)?;
    emitter.finish()?;
    String::from_utf8(buf)
        .map_err(|e| RechunkError::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::timestamp::SrtTimestamp;

    const SAMPLE: &str = "1\n\
    00:00:01,000 --> 00:00:05,000\n\
    a b c\n\
    d e f\n\
    \n\
    2\n\
    00:00:10,000 --> 00:00:09,000\n\
    backwards\n\
    \n\
    no timing here\n\
    \n\
    3\n\
    00:00:06,000 --> 00:00:07,000\n\
    g\n";

    fn run(doc: &str, config: ChunkConfig) -> (String, RechunkStats) {
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf, config);
        emitter.emit_document(doc).unwrap();
        let stats = emitter.finish().unwrap();
        (String::from_utf8(buf).unwrap(), stats)
    }

    #[test]
    fn renumbers_across_dropped_records() {
        let (out, stats) = run(SAMPLE, ChunkConfig::new(3, 0.0));
        assert_eq!(
            out,
            "1\n00:00:01,000 --> 00:00:03,000\na b c\n\n\
             2\n00:00:03,000 --> 00:00:05,000\nd e f\n\n\
             3\n00:00:06,000 --> 00:00:07,000\ng\n\n"
        );
        assert_eq!(
            stats,
            RechunkStats {
                blocks: 4,
                records: 3,
                no_time_line: 1,
                not_increasing: 1,
                no_words: 0,
                split_records: 1,
                chunks: 3,
                capped_chunks: 0,
            }
        );
        assert_eq!(stats.dropped(), 2);
    }

    #[test]
    fn without_width_only_normalizes() {
        let (out, stats) = run(SAMPLE, ChunkConfig::default());
        assert_eq!(
            out,
            "1\n00:00:01,000 --> 00:00:05,000\na b c d e f\n\n\
             2\n00:00:06,000 --> 00:00:07,000\ng\n\n"
        );
        assert_eq!(stats.split_records, 0);
    }

    #[test]
    fn capped_chunks_are_counted() {
        let doc = "1\n00:00:02,000 --> 00:00:06,000\none two\n";
        let (out, stats) = run(doc, ChunkConfig::new(1, 1.6));
        assert_eq!(
            out,
            "1\n00:00:02,000 --> 00:00:03,600\none\n\n\
             2\n00:00:04,000 --> 00:00:05,600\ntwo\n\n"
        );
        assert_eq!(stats.capped_chunks, 2);
    }

    #[test]
    fn empty_document() {
        let (out, stats) = run("", ChunkConfig::new(2, 1.0));
        assert!(out.is_empty());
        assert_eq!(stats, RechunkStats::default());
    }

    #[test]
    fn emit_records_directly() {
        let mut buf = Vec::new();
        let mut emitter = Emitter::new(&mut buf, ChunkConfig::new(1, 0.0));
        let record = Record {
            start: 0.0,
            end: 2.0,
            text: vec!["x y".to_string()],
        };
        emitter.emit_record(&record).unwrap();
        emitter.emit_record(&record).unwrap();
        assert_eq!(emitter.stats().chunks, 4);
        emitter.finish().unwrap();
        let out = String::from_utf8(buf).unwrap();
        let idx = out
            .split("\n\n")
            .filter(|b| !b.is_empty())
            .map(|b| b.lines().next().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(idx, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn output_is_stable_when_rerun() {
        let first = rechunk_document(SAMPLE, &ChunkConfig::new(2, 0.0)).unwrap();
        let second = rechunk_document(&first, &ChunkConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prose_arrow_block_is_dropped() {
        let (out, stats) = run("1\nfoo --> 00:00:05,000\nhello world\n", ChunkConfig::default());
        assert!(out.is_empty());
        assert_eq!(stats.no_time_line, 1);
    }

    #[test]
    fn sub_millisecond_slots_collapse_on_rerun() {
        // three slots of 2/3ms each: the middle one rounds to a zero-length cue
        let doc = "1\n00:00:01,000 --> 00:00:01,002\na b c\n";
        let first = rechunk_document(doc, &ChunkConfig::new(1, 0.0)).unwrap();
        assert!(first.contains("2\n00:00:01,001 --> 00:00:01,001\nb\n"));

        let mut rerun = Vec::new();
        let mut emitter = Emitter::new(&mut rerun, ChunkConfig::default());
        emitter.emit_document(&first).unwrap();
        let stats = emitter.finish().unwrap();
        assert_eq!(stats.not_increasing, 1);
        assert_eq!(stats.chunks, 2);
    }

    #[test]
    fn output_parses_as_srt() {
        let out = rechunk_document(SAMPLE, &ChunkConfig::new(2, 0.5)).unwrap();
        let subs = subrip::parse(&out).expect("rechunked SRT failed to parse");
        assert_eq!(subs.len(), 4);
    }

    fn cue(start_ms: u64, len_ms: u64, words: &[String]) -> String {
        format!(
            "{} --> {}\n{}\n",
            SrtTimestamp(start_ms as f64 / 1000.0),
            SrtTimestamp((start_ms + len_ms) as f64 / 1000.0),
            words.join(" ")
        )
    }

    proptest! {
        #[test]
        fn rerun_without_width_is_stable(
            cues in prop::collection::vec(
                (0u64..10_000_000, 1u64..2_000, prop::collection::vec("[a-z]{1,6}", 1..12)),
                1..8,
            ),
            width in 1usize..5,
            max_duration in 0.0f64..3.0,
        ) {
            // at least 1ms per word keeps every split slot at least 1ms wide
            let doc = cues
                .iter()
                .map(|(start, per_word, words)| cue(*start, per_word * words.len() as u64, words))
                .collect::<Vec<_>>()
                .join("\n");
            let config = ChunkConfig::new(width, (max_duration * 1000.0).ceil() / 1000.0);

            let first = rechunk_document(&doc, &config).unwrap();
            let second = rechunk_document(&first, &ChunkConfig::default()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
