pub mod export_spikes;
pub mod export_weights;
pub mod inspect;
pub mod quantize;
pub mod verify;

use clap::Args;
use nmx_export::{ExportConfig, ExportOptions, StyleKind};

/// Fixed-point format and rendering flags shared by the weight commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FormatArgs {
    /// Integer bits, sign included [config default: 2]
    #[arg(short = 'i', long)]
    int_bits: Option<u32>,
    /// Fractional bits [config default: 14]
    #[arg(short = 'f', long)]
    frac_bits: Option<u32>,
    /// Hex rendering: padded (FFF5) or prefixed (0xfff5)
    #[arg(short, long)]
    style: Option<StyleKind>,
    /// Minimum digits for the padded style
    #[arg(long)]
    digits: Option<usize>,
}

impl FormatArgs {
    /// Apply flags on top of the loaded config.
    pub fn merge(&self, config: &ExportConfig) -> ExportConfig {
        let mut merged = *config;
        if let Some(v) = self.int_bits {
            merged.format.int_bits = v;
        }
        if let Some(v) = self.frac_bits {
            merged.format.frac_bits = v;
        }
        if let Some(v) = self.style {
            merged.output.style = v;
        }
        if let Some(v) = self.digits {
            merged.output.digits = v;
        }
        merged
    }

    pub fn resolve(&self, config: &ExportConfig) -> anyhow::Result<ExportOptions> {
        Ok(self.merge(config).export_options()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmx_fixed::{HexStyle, QFormat};

    #[test]
    fn flags_override_config() {
        let config = ExportConfig::default();
        let args = FormatArgs {
            int_bits: Some(3),
            frac_bits: Some(13),
            style: Some(StyleKind::Prefixed),
            digits: None,
        };
        let opts = args.resolve(&config).unwrap();
        assert_eq!(opts.format, QFormat::Q3_13);
        assert_eq!(opts.style, HexStyle::Prefixed);
    }

    #[test]
    fn no_flags_keep_config() {
        let opts = FormatArgs::default().resolve(&ExportConfig::default()).unwrap();
        assert_eq!(opts, ExportOptions::default());
    }

    #[test]
    fn invalid_merge_is_an_error() {
        let args = FormatArgs {
            int_bits: Some(0),
            ..Default::default()
        };
        assert!(args.resolve(&ExportConfig::default()).is_err());
    }
}
