//! Run configuration derived from command-line arguments.

use std::path::PathBuf;

use ormeta_core::MetadataConfig;

use crate::formatter::OutputFormat;
use crate::Args;

/// Everything a run needs, resolved from [`Args`].
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Schema document to load.
    pub file: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Show a single entity instead of the whole registry.
    pub entity: Option<String>,
    /// Registry configuration.
    pub metadata: MetadataConfig,
}

impl From<&Args> for CliConfig {
    fn from(args: &Args) -> Self {
        Self {
            file: args.file.clone(),
            format: args.format,
            entity: args.entity.clone(),
            metadata: MetadataConfig::new().freeze_on_validate(!args.no_freeze),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_from_defaults() {
        let args = Args::parse_from(["ormeta", "--file", "schema.json"]);
        let config = CliConfig::from(&args);

        assert_eq!(config.file, PathBuf::from("schema.json"));
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.entity.is_none());
        assert_eq!(config.metadata, MetadataConfig::default());
    }

    #[test]
    fn test_config_from_flags() {
        let args = Args::parse_from([
            "ormeta",
            "-f",
            "schema.json",
            "--format",
            "json",
            "--entity",
            "api::article.article",
            "--no-freeze",
        ]);
        let config = CliConfig::from(&args);

        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.entity.as_deref(), Some("api::article.article"));
        assert!(!config.metadata.freeze_on_validate);
        assert!(config.metadata.validate_on_load);
    }

    #[test]
    fn test_file_is_required() {
        assert!(Args::try_parse_from(["ormeta"]).is_err());
    }
}
