pub use chunk::{rechunk_record, Chunk, ChunkConfig, ChunkIndex, DropReason};
pub use emit::{rechunk_document, Emitter, RechunkStats};
pub use error::RechunkError;
pub use record::{blocks, parse_records, Block, Record};
pub use timestamp::{format_timestamp, parse_timestamp, SrtTimestamp};

pub mod chunk;
pub mod emit;
pub mod record;
pub mod timestamp;

mod error;
