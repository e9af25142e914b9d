//! Configuration handling for the alignment engine
//!
//! Supports loading configuration from lrcstats.toml files; every field has a
//! default so partial files are accepted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "lrcstats.toml";

/// Which aligner processes the corrected reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    /// Corrected read is one contiguous sequence
    #[default]
    Untrimmed,
    /// Corrected read is whitespace-separated trimmed fragments
    Trimmed,
}

/// Accepted base symbols (case-insensitive, `-` always allowed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// A, C, G, T, N
    #[default]
    Nucleotide,
    /// Nucleotides plus IUPAC ambiguity codes
    Iupac,
}

impl Alphabet {
    pub fn contains(&self, symbol: u8) -> bool {
        let upper = symbol.to_ascii_uppercase();
        match self {
            Alphabet::Nucleotide => matches!(upper, b'A' | b'C' | b'G' | b'T' | b'N' | b'-'),
            Alphabet::Iupac => matches!(
                upper,
                b'A' | b'C' | b'G' | b'T' | b'N' | b'-'
                    | b'R' | b'Y' | b'S' | b'W' | b'K' | b'M'
                    | b'B' | b'D' | b'H' | b'V' | b'U'
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// Aligner used by `align_triple` and `align_batch`
    #[serde(default)]
    pub mode: AlignmentMode,

    /// Symbols accepted in all three sequences
    #[serde(default)]
    pub alphabet: Alphabet,

    /// Upper bound on DP matrix cells; unset means only real allocation
    /// failures stop an alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_matrix_cells: Option<usize>,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::default(),
            alphabet: Alphabet::default(),
            max_matrix_cells: None,
        }
    }
}

impl AlignerConfig {
    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_matrix_cells(mut self, cells: usize) -> Self {
        self.max_matrix_cells = Some(cells);
        self
    }

    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AlignerConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        log::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> String {
        let config = Self::default().with_max_matrix_cells(1 << 32);
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
