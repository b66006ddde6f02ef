//! Export settings, optionally loaded from `nmx.toml`.
//!
//! ```toml
//! [format]
//! int_bits = 2
//! frac_bits = 14
//!
//! [output]
//! style = "padded"          # or "prefixed"
//! digits = 4
//! on_range_error = "abort"  # or "skip"
//! ```

use core::str::FromStr;
use std::path::Path;

use nmx_fixed::{HexStyle, ParseError, QFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::weights::{ExportOptions, RangePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    #[default]
    Padded,
    Prefixed,
}

impl FromStr for StyleKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<HexStyle>()? {
            HexStyle::Prefixed => StyleKind::Prefixed,
            HexStyle::Padded { .. } => StyleKind::Padded,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub int_bits: u32,
    pub frac_bits: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            int_bits: QFormat::Q2_14.int_bits(),
            frac_bits: QFormat::Q2_14.frac_bits(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub style: StyleKind,
    /// Minimum digit count for the padded style.
    pub digits: usize,
    pub on_range_error: RangePolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            style: StyleKind::Padded,
            digits: 4,
            on_range_error: RangePolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: FormatConfig,
    pub output: OutputConfig,
}

impl ExportConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading export config");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: ExportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.qformat()?;
        if self.output.digits == 0 {
            return Err(ExportError::Config("output.digits must be at least 1".into()));
        }
        Ok(())
    }

    pub fn qformat(&self) -> Result<QFormat> {
        Ok(QFormat::new(self.format.int_bits, self.format.frac_bits)?)
    }

    pub fn hex_style(&self) -> HexStyle {
        match self.output.style {
            StyleKind::Prefixed => HexStyle::Prefixed,
            StyleKind::Padded => HexStyle::Padded {
                digits: self.output.digits,
            },
        }
    }

    pub fn export_options(&self) -> Result<ExportOptions> {
        self.validate()?;
        Ok(ExportOptions {
            format: self.qformat()?,
            style: self.hex_style(),
            policy: self.output.on_range_error,
        })
    }
}
