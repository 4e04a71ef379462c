//! Backup settings. Defaults match the classic qrbak layout (27 codes, three
//! per row, US Letter); a JSON file can override any of them and command-line
//! flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{LayoutConfig, LayoutError, PageSize};
use crate::render::barcode::DEFAULT_QR_SIZE;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "QRBAK_CONFIG";

const MIN_QR_SIZE: u32 = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BackupConfig {
    /// Number of QR codes to split the payload into.
    pub codes: usize,
    pub codes_per_row: usize,
    pub page_size: PageSize,
    /// Also write one PNG per code.
    pub save_images: bool,
    /// Also write the undivided payload as text.
    pub save_text: bool,
    /// Print an "i/N" label under each code.
    pub label_codes: bool,
    /// Minimum edge of each QR PNG in pixels.
    pub qr_size: u32,
    pub gpg_program: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            codes: 27,
            codes_per_row: 3,
            page_size: PageSize::Letter,
            save_images: false,
            save_text: false,
            label_codes: true,
            qr_size: DEFAULT_QR_SIZE,
            gpg_program: "gpg".to_string(),
        }
    }
}

impl BackupConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.codes < 1 {
            return Err(ConfigError::Invalid("codes must be >= 1".to_string()));
        }
        if self.codes_per_row < 1 {
            return Err(ConfigError::Invalid("codes per row must be >= 1".to_string()));
        }
        if self.qr_size < MIN_QR_SIZE {
            return Err(ConfigError::Invalid(format!(
                "qr size must be >= {MIN_QR_SIZE} pixels"
            )));
        }
        if self.gpg_program.trim().is_empty() {
            return Err(ConfigError::Invalid("gpg program must not be empty".to_string()));
        }
        Ok(())
    }

    /// Page geometry for the configured paper size and row width.
    pub fn layout_config(&self) -> Result<LayoutConfig, LayoutError> {
        LayoutConfig::for_page_size(self.page_size, self.codes_per_row)
    }
}

/// Loads and validates a JSON config file. Missing fields take their defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<BackupConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let config: BackupConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    config.validate()?;
    Ok(config)
}

/// Uses `explicit` if given, then `QRBAK_CONFIG`, then built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<BackupConfig, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => load_config(path),
        None => Ok(BackupConfig::default()),
    }
}
