use std::path::{Path, PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use rechunk_core::ChunkConfig;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "rechunk";
const APP: &str = "rechunk";
const APP_CAPS: &str = "RECHUNK";

const WORDS_PER_CHUNK_KEY: &str = "words_per_chunk";
const MAX_DURATION_KEY: &str = "max_duration";
const MAX_CHARS_KEY: &str = "max_chars";

const DEFAULT_CONFIG_FILE: &str = "rechunk.toml";

type ExtConfigBuilder = config::ConfigBuilder<config::builder::DefaultState>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),
    #[error("unable to get user home directory")]
    NoUserHome,
    #[error("path is not utf8: {:?}", _0)]
    NonUtf8Path(PathBuf),
    #[error("invalid value for `{key}`: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Layers configuration sources, lowest priority first: defaults, config
/// file, environment, explicit overrides.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config_dir: Option<Utf8PathBuf>,
    config_path: Option<Utf8PathBuf>,
    load_environment: bool,
    config_builder: ExtConfigBuilder,
}

fn camino_path(std_path: &Path) -> Result<&Utf8Path, ConfigError> {
    Utf8Path::from_path(std_path).ok_or_else(|| ConfigError::NonUtf8Path(std_path.to_path_buf()))
}

fn new_config_builder() -> Result<ExtConfigBuilder, ConfigError> {
    Ok(config::Config::builder()
        .set_default(WORDS_PER_CHUNK_KEY, 0i64)?
        .set_default(MAX_DURATION_KEY, 0.0)?
        .set_default(MAX_CHARS_KEY, 0i64)?)
}

fn int_value(key: &'static str, value: Option<usize>) -> Result<Option<i64>, ConfigError> {
    value
        .map(|v| {
            i64::try_from(v).map_err(|_| ConfigError::InvalidValue {
                key,
                value: v.to_string(),
            })
        })
        .transpose()
}

impl ConfigBuilder {
    /// Builder that looks for `rechunk.toml` in the user's config directory.
    pub fn new_with_user_dirs() -> Result<Self, ConfigError> {
        let dirs = directories::ProjectDirs::from(QUALIFIER, ORGANIZATION, APP)
            .ok_or(ConfigError::NoUserHome)?;
        let config_dir = camino_path(dirs.config_dir())?.to_path_buf();
        Self::with_config_dir(Some(config_dir))
    }

    /// Builder that looks for `rechunk.toml` in `config_dir`, if given.
    pub fn with_config_dir(config_dir: Option<Utf8PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            config_dir,
            config_path: None,
            load_environment: false,
            config_builder: new_config_builder()?,
        })
    }

    /// Should we load configuration from the environment?
    pub fn load_environment(mut self, load_environment: bool) -> Self {
        self.load_environment = load_environment;
        self
    }

    /// Use this file instead of the default one. Unlike the default, it must exist.
    pub fn config_file(mut self, config_file: Option<&Path>) -> Result<Self, ConfigError> {
        self.config_path = config_file
            .map(|p| camino_path(p).map(|p| p.to_path_buf()))
            .transpose()?;
        Ok(self)
    }

    pub fn words_per_chunk(mut self, words: Option<usize>) -> Result<Self, ConfigError> {
        self.config_builder = self
            .config_builder
            .set_override_option(WORDS_PER_CHUNK_KEY, int_value(WORDS_PER_CHUNK_KEY, words)?)?;
        Ok(self)
    }

    pub fn max_duration(mut self, seconds: Option<f64>) -> Result<Self, ConfigError> {
        self.config_builder = self
            .config_builder
            .set_override_option(MAX_DURATION_KEY, seconds)?;
        Ok(self)
    }

    pub fn max_chars(mut self, chars: Option<usize>) -> Result<Self, ConfigError> {
        self.config_builder = self
            .config_builder
            .set_override_option(MAX_CHARS_KEY, int_value(MAX_CHARS_KEY, chars)?)?;
        Ok(self)
    }

    pub fn build(mut self) -> Result<RechunkConfig, ConfigError> {
        match (&self.config_path, &self.config_dir) {
            (Some(cfg_file), _) => {
                self.config_builder = self
                    .config_builder
                    .add_source(config::File::from(cfg_file.as_std_path()));
            }
            (None, Some(dir)) => {
                let cfg_file = dir.join(DEFAULT_CONFIG_FILE);
                if cfg_file.exists() {
                    self.config_builder = self
                        .config_builder
                        .add_source(config::File::from(cfg_file.as_std_path()));
                }
            }
            (None, None) => {}
        }

        if self.load_environment {
            self.config_builder = self
                .config_builder
                .add_source(config::Environment::with_prefix(APP_CAPS))
        }

        let rechunk_cfg = RechunkConfig {
            inner: self.config_builder.build()?,
        };
        log::trace!("{:#?}", rechunk_cfg);
        Ok(rechunk_cfg)
    }
}

#[derive(Debug, Clone)]
pub struct RechunkConfig {
    inner: config::Config,
}

impl RechunkConfig {
    /// Deserialize the chunking settings. Zero values come back as `None`.
    pub fn chunk_config(&self) -> Result<ChunkConfig, ConfigError> {
        let chunk_config = self.inner.clone().try_deserialize::<ChunkConfig>()?;
        if let Some(seconds) = chunk_config.max_duration {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: MAX_DURATION_KEY,
                    value: seconds.to_string(),
                });
            }
        }
        Ok(chunk_config.normalized())
    }
}
