//! Configuration loading for Visionary.
//!
//! Layers, lowest precedence first:
//! - Bundled defaults (include_str! from visionary.toml)
//! - `~/.config/visionary/visionary.toml`
//! - `./visionary.toml`
//! - Environment variables prefixed `VISIONARY_`, with `__` between
//!   section and key (`VISIONARY_GEMINI__MODEL`)

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use visionary_error::{ConfigError, VisionaryResult};
use visionary_models::GeminiImageConfig;

const DEFAULT_CONFIG: &str = include_str!("../../../visionary.toml");

/// Gemini backend settings (`[gemini]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GeminiSettings {
    /// Image model name
    model: String,
    /// REST base URL
    base_url: String,
    /// Environment variable holding the API key
    api_key_env: String,
    /// Request timeout in seconds
    #[serde(default)]
    timeout_secs: Option<u64>,
    /// Art direction appended to every prompt
    style: String,
}

impl GeminiSettings {
    /// Generator configuration for these settings.
    pub fn to_image_config(&self) -> VisionaryResult<GeminiImageConfig> {
        let mut builder = GeminiImageConfig::builder();
        builder
            .model(self.model.as_str())
            .base_url(self.base_url.as_str())
            .api_key_env(self.api_key_env.as_str())
            .style(self.style.as_str());
        if let Some(secs) = self.timeout_secs {
            builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid Gemini settings: {}", e)).into())
    }
}

/// Output settings (`[output]`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct OutputSettings {
    /// Default directory for frames and `story.json`
    #[serde(default)]
    directory: Option<PathBuf>,
}

/// Complete Visionary configuration.
///
/// # Example
///
/// ```no_run
/// use visionary::VisionaryConfig;
///
/// let config = VisionaryConfig::load()?;
/// println!("Model: {}", config.gemini().model());
/// # Ok::<(), visionary::VisionaryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct VisionaryConfig {
    /// `[gemini]` section
    gemini: GeminiSettings,
    /// `[output]` section
    #[serde(default)]
    output: OutputSettings,
}

impl VisionaryConfig {
    /// Bundled defaults only.
    pub fn bundled() -> VisionaryResult<Self> {
        Self::build(Self::defaults())
    }

    /// Load from the bundled defaults overlaid with a single file.
    ///
    /// Keys missing from the file keep their bundled values.
    pub fn from_file(path: impl AsRef<Path>) -> VisionaryResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration from file");

        Self::defaults()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }

    /// Load with the full precedence chain.
    pub fn load() -> VisionaryResult<Self> {
        debug!(
            "Loading configuration with precedence: env > current dir > home dir > bundled defaults"
        );

        let mut layers = Vec::new();
        if let Some(home) = dirs::home_dir() {
            layers.push(home.join(".config/visionary/visionary.toml"));
        }
        layers.push(PathBuf::from("visionary.toml"));

        Self::load_layered(&layers)
    }

    /// Bundled defaults, then each optional file in order, then environment.
    ///
    /// Later files override earlier ones. Missing files are skipped.
    pub fn load_layered(files: &[PathBuf]) -> VisionaryResult<Self> {
        let mut builder = Self::defaults();
        for file in files {
            builder = builder.add_source(File::from(file.as_path()).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix("VISIONARY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self::build(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> VisionaryResult<Self> {
        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)).into())
    }
}
