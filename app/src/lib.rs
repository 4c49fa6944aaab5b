use std::io;

use rechunk_core::{ChunkConfig, Emitter, RechunkError, RechunkStats};

use self::document::{DocumentSink, DocumentSource};

pub mod config;
pub mod document;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Rechunk(#[from] RechunkError),
    #[error("unable to read {}", _0)]
    Read(DocumentSource, #[source] io::Error),
    #[error("unable to open {}", _0)]
    Open(DocumentSink, #[source] io::Error),
}

/// Read a whole subtitle document, rechunk it and write the result.
pub fn rechunk_file(
    source: &DocumentSource,
    sink: &DocumentSink,
    config: &ChunkConfig,
) -> Result<RechunkStats, AppError> {
    log::debug!("rechunk {} -> {} with {:?}", source, sink, config);
    let document = source
        .read_to_string()
        .map_err(|e| AppError::Read(source.clone(), e))?;

    let writer = sink.open().map_err(|e| AppError::Open(sink.clone(), e))?;
    let mut emitter = Emitter::new(writer, *config);
    emitter.emit_document(&document)?;
    let stats = emitter.finish()?;

    log::info!(
        "{} records: {} chunks written, {} dropped",
        stats.records,
        stats.chunks,
        stats.dropped()
    );
    Ok(stats)
}
