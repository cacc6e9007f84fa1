use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::session;
use crate::settings::Settings;

#[derive(Debug, Clone, Args)]
pub struct RunCommand {
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND",
        help = "Command (and arguments) to run with the assumed role"
    )]
    pub command: Vec<String>,
}

impl RunCommand {
    pub async fn execute(self, settings: &Settings) -> Result<()> {
        session::ensure_not_nested()?;

        info!(
            "Resolving credentials for profile '{}' to run '{}'",
            settings.profile, self.command[0]
        );

        let credentials = super::resolve_credentials(settings).await?;

        session::exec_command(&self.command, session::env_vars(&credentials))
    }
}
