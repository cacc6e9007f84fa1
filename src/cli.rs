use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::commands::{CompletionsCommand, RunCommand, ShellCommand};
use crate::constants::DEFAULT_SESSION_DURATION_MINUTES;
use crate::settings::Settings;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "awsassume",
    version,
    about = "Run commands or start a shell with temporary AWS credentials from STS",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(short = 'p', long, global = true, help = "Profile to assume")]
    pub profile: Option<String>,

    #[arg(
        short = 'd',
        long,
        global = true,
        env = "AWSASSUME_DURATION",
        default_value_t = DEFAULT_SESSION_DURATION_MINUTES,
        help = "How long in minutes credentials should be valid for"
    )]
    pub duration: u32,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Path to AWS CLI config file (default ~/.aws/config)"
    )]
    pub aws_config_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Path to AWS shared credentials file (default ~/.aws/credentials)"
    )]
    pub aws_credentials_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "AWS_DEFAULT_REGION",
        help = "Region override for the assumed session"
    )]
    pub region: Option<String>,

    #[arg(
        long,
        global = true,
        env = "AWS_PROFILE",
        help = "Source profile override for establishing trust"
    )]
    pub source_profile: Option<String>,

    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Run a single command with an assumed role")]
    Run(RunCommand),
    #[command(about = "Start a shell session with an assumed role")]
    Shell(ShellCommand),
    #[command(about = "Generate shell completion scripts for awsassume")]
    Completions(CompletionsCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command.clone() {
            Commands::Run(cmd) => {
                let settings = Settings::from_cli(&self)?;
                cmd.execute(&settings).await
            }
            Commands::Shell(cmd) => {
                let settings = Settings::from_cli(&self)?;
                cmd.execute(&settings).await
            }
            Commands::Completions(cmd) => {
                cmd.execute();
                Ok(())
            }
        }
    }
}
