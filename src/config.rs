use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{ConfigError, FormatError};
use crate::common::format::Fp8Format;

const DEFAULT_FORMAT: &str = "e3m4";
const DEFAULT_COLUMNS: usize = 4;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub array: ArrayConfig,
}

impl Config {
    /// Parses a TOML document. Missing tables and fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolves the `[format]` table. Explicit widths win over the name.
    pub fn format(&self) -> Result<Fp8Format, ConfigError> {
        Ok(self.format.resolve()?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.format()?;
        if self.array.columns == 0 {
            return Err(ConfigError::EmptyArray);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FormatConfig {
    #[serde(default = "default_format")]
    pub name: String,

    pub exponent_bits: Option<u32>,
    pub mantissa_bits: Option<u32>,
}

impl FormatConfig {
    pub fn resolve(&self) -> Result<Fp8Format, FormatError> {
        match (self.exponent_bits, self.mantissa_bits) {
            (Some(e), Some(m)) => Fp8Format::new(e, m),
            (Some(e), None) => Fp8Format::new(e, 7u32.saturating_sub(e)),
            (None, Some(m)) => Fp8Format::new(7u32.saturating_sub(m), m),
            (None, None) => self.name.parse(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            name: default_format(),
            exponent_bits: None,
            mantissa_bits: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArrayConfig {
    #[serde(default = "default_columns")]
    pub columns: usize,

    #[serde(default)]
    pub forward_a: bool,

    #[serde(default)]
    pub forward_b: bool,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            forward_a: false,
            forward_b: false,
        }
    }
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}
