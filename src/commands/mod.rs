pub mod completions;
pub mod run;
pub mod shell;

pub use completions::CompletionsCommand;
pub use run::RunCommand;
pub use shell::ShellCommand;

use anyhow::Result;

use crate::aws::credentials::SharedCredentialsStore;
use crate::aws::profile::AwsConfigStore;
use crate::aws::resolver::CredentialResolver;
use crate::aws::sts::StsRoleAssumer;
use crate::aws::Credentials;
use crate::settings::Settings;

/// Wire the production stores and assumer together and resolve credentials
/// for the configured profile
pub(crate) async fn resolve_credentials(settings: &Settings) -> Result<Credentials> {
    let profiles = AwsConfigStore::load(&settings.aws_config_file)?;
    let credentials = SharedCredentialsStore::open(&settings.aws_credentials_file);
    let mut resolver = CredentialResolver::new(profiles, credentials, StsRoleAssumer::new());

    Ok(resolver.resolve(settings).await?)
}
