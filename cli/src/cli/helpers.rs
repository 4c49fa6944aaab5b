use anyhow::Context;
use app::config::ConfigBuilder;
use rechunk_core::ChunkConfig;

use super::argparse;

pub fn chunk_config(args: &argparse::ChunkingConfig) -> anyhow::Result<ChunkConfig> {
    let config = ConfigBuilder::new_with_user_dirs()
        .context("could not create config builder")?
        .load_environment(!args.no_env)
        .config_file(args.config.as_deref())
        .context("could not set config file")?
        .words_per_chunk(args.words)
        .context("could not set words per chunk")?
        .max_duration(args.max_duration)
        .context("could not set max duration")?
        .max_chars(args.max_chars)
        .context("could not set max chars")?
        .build()
        .context("could not build config")?;
    config
        .chunk_config()
        .context("invalid chunking configuration")
}
