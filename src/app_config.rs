use crate::error::{MatrixError, Result};
use crate::fec::gf_tables::{Gf256, IRREDUCIBLE_POLY};
use crate::matrix::MAX_PRINT_COLUMNS;
use serde::Deserialize;
use std::path::Path;

/// Engine settings parsed from the `[matrix]` table of a TOML file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Widest matrix the diagnostic dump renders as a grid.
    pub display_columns: usize,
    /// How many random coefficient matrices the encoder draws before giving up.
    pub max_coefficient_attempts: usize,
    /// Reduction polynomial for GF(2^8), including the x^8 term.
    pub polynomial: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display_columns: MAX_PRINT_COLUMNS,
            max_coefficient_attempts: 16,
            polynomial: IRREDUCIBLE_POLY,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML string. A missing `[matrix]` table or
    /// missing keys fall back to defaults.
    pub fn from_toml(s: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Root {
            #[serde(default)]
            matrix: EngineConfig,
        }

        let raw: Root = toml::from_str(s)?;
        raw.matrix
            .validate()
            .map_err(MatrixError::Config)?;
        Ok(raw.matrix)
    }

    /// Load configuration from a file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.display_columns == 0 {
            return Err("display_columns must be positive".to_string());
        }
        if self.max_coefficient_attempts == 0 {
            return Err("max_coefficient_attempts must be positive".to_string());
        }
        Gf256::with_polynomial(self.polynomial)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
