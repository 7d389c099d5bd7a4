use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::bands::BandToggle;
use crate::model::correction::CorrectionFactor;
use crate::model::options::DisplayOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{path}: IO error: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("{path}: invalid config: {error}")]
    Parse {
        path: String,
        #[source]
        error: toml::de::Error,
    },
    #[error("unknown RPM correction '{0}' (see `fuelqc corrections`)")]
    UnknownCorrection(String),
}

/// Optional TOML defaults for a run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Stored shared secret. The key attempt only comes from the CLI or env.
    pub access_secret: Option<String>,
    pub registration: Option<String>,
    pub correction: Option<String>,
    pub bands: Option<Vec<BandToggle>>,
    pub out_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let label = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
        path: label.clone(),
        error,
    })?;
    parse_config(&text, &label)
}

pub fn parse_config(text: &str, label: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(text).map_err(|error| ConfigError::Parse {
        path: label.to_string(),
        error,
    })
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub registration: Option<String>,
    pub correction: Option<String>,
    pub bands: Vec<BandToggle>,
    pub no_bands: bool,
    pub out_dir: Option<PathBuf>,
    pub access_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub registration: String,
    pub correction: &'static CorrectionFactor,
    pub options: DisplayOptions,
    pub out_dir: PathBuf,
    pub access_secret: Option<String>,
}

pub fn resolve_settings(file: &FileConfig, cli: &Overrides) -> Result<RunSettings, ConfigError> {
    let registration = cli
        .registration
        .clone()
        .or_else(|| file.registration.clone())
        .unwrap_or_default();

    let correction = match cli.correction.as_ref().or(file.correction.as_ref()) {
        Some(sel) => CorrectionFactor::lookup(sel)
            .ok_or_else(|| ConfigError::UnknownCorrection(sel.clone()))?,
        None => CorrectionFactor::rated(),
    };

    let options = if cli.no_bands {
        DisplayOptions::all_off()
    } else if !cli.bands.is_empty() {
        DisplayOptions::from_toggles(&cli.bands)
    } else if let Some(bands) = &file.bands {
        DisplayOptions::from_toggles(bands)
    } else {
        DisplayOptions::default()
    };

    Ok(RunSettings {
        registration,
        correction,
        options,
        out_dir: cli
            .out_dir
            .clone()
            .or_else(|| file.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(".")),
        access_secret: cli
            .access_secret
            .clone()
            .or_else(|| file.access_secret.clone()),
    })
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
