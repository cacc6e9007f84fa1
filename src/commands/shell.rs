use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::session;
use crate::settings::Settings;

#[derive(Debug, Clone, Args)]
pub struct ShellCommand {}

impl ShellCommand {
    pub async fn execute(self, settings: &Settings) -> Result<()> {
        session::ensure_not_nested()?;

        let shell = session::login_shell();
        info!(
            "Resolving credentials for profile '{}' to start {}",
            settings.profile, shell
        );

        let credentials = super::resolve_credentials(settings).await?;

        println!(
            "Starting {} with credentials for profile '{}'. Exit the shell to end the session.",
            shell, settings.profile
        );

        session::exec_command(&[shell], session::env_vars(&credentials))
    }
}
