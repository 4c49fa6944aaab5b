#[derive(Debug, thiserror::Error)]
pub enum RechunkError {
    #[error("unable to write subtitles")]
    Write(#[from] std::io::Error),
}
