use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::constants;

/// Runtime configuration, built once from the parsed CLI (flags already carry
/// their environment-variable bindings) and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile: String,
    pub duration_minutes: u32,
    pub aws_config_file: PathBuf,
    pub aws_credentials_file: PathBuf,
    /// Region override; wins over the profile's stored region
    pub region: Option<String>,
    /// Source profile override; wins over the profile's stored source_profile
    pub source_profile: Option<String>,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let profile = cli
            .profile
            .clone()
            .context("A profile must be provided (use --profile)")?;

        let aws_config_file = match &cli.aws_config_file {
            Some(path) => path.clone(),
            None => constants::get_aws_config_path()
                .context("Failed to determine AWS config path")?,
        };

        let aws_credentials_file = match &cli.aws_credentials_file {
            Some(path) => path.clone(),
            None => constants::get_aws_credentials_path()
                .context("Failed to determine AWS credentials path")?,
        };

        Ok(Self {
            profile,
            duration_minutes: cli.duration,
            aws_config_file,
            aws_credentials_file,
            region: cli.region.clone().filter(|r| !r.is_empty()),
            source_profile: cli.source_profile.clone().filter(|p| !p.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    // The duration/region/source-profile flags are env-bound; clear their
    // variables so the ambient test environment cannot skew parsing
    fn clear_bound_env() {
        for var in ["AWSASSUME_DURATION", "AWS_DEFAULT_REGION", "AWS_PROFILE"] {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_missing_profile_is_an_error() {
        clear_bound_env();
        let cli = Cli::try_parse_from(["awsassume", "shell"]).unwrap();

        assert!(Settings::from_cli(&cli).is_err());
    }

    #[test]
    #[serial]
    fn test_explicit_paths_win_over_defaults() {
        clear_bound_env();
        let cli = Cli::try_parse_from([
            "awsassume",
            "--profile",
            "staging",
            "--aws-config-file",
            "/tmp/config",
            "--aws-credentials-file",
            "/tmp/credentials",
            "shell",
        ])
        .unwrap();

        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.aws_config_file, PathBuf::from("/tmp/config"));
        assert_eq!(
            settings.aws_credentials_file,
            PathBuf::from("/tmp/credentials")
        );
        assert_eq!(settings.profile, "staging");
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_bound_env();
        let cli = Cli::try_parse_from(["awsassume", "-p", "staging", "shell"]).unwrap();
        let settings = Settings::from_cli(&cli).unwrap();

        assert_eq!(
            settings.duration_minutes,
            constants::DEFAULT_SESSION_DURATION_MINUTES
        );
        assert_eq!(settings.source_profile, None);
    }

    #[test]
    #[serial]
    fn test_overrides_captured() {
        clear_bound_env();
        let cli = Cli::try_parse_from([
            "awsassume",
            "-p",
            "staging",
            "--region",
            "ap-northeast-1",
            "--source-profile",
            "base",
            "-d",
            "30",
            "shell",
        ])
        .unwrap();
        let settings = Settings::from_cli(&cli).unwrap();

        assert_eq!(settings.region.as_deref(), Some("ap-northeast-1"));
        assert_eq!(settings.source_profile.as_deref(), Some("base"));
        assert_eq!(settings.duration_minutes, 30);
    }
}
