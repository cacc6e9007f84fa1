use std::time::SystemTime;

use aws_smithy_types::DateTime;
use tracing::{debug, info, warn};

use super::credentials::CredentialStore;
use super::error::Error;
use super::profile::{ProfileConfig, ProfileStore};
use super::sts::RoleAssumer;
use super::{AssumeRoleOptions, Credentials};
use crate::constants::MIN_REMAINING_SECONDS;
use crate::settings::Settings;

/// Orchestrates credential resolution: serve from the cache while the entry is
/// fresh, otherwise mint fresh credentials through the assumer and persist
/// them for the next invocation.
pub struct CredentialResolver<P, C, A> {
    profiles: P,
    credentials: C,
    assumer: A,
}

impl<P, C, A> CredentialResolver<P, C, A>
where
    P: ProfileStore,
    C: CredentialStore,
    A: RoleAssumer,
{
    pub fn new(profiles: P, credentials: C, assumer: A) -> Self {
        Self {
            profiles,
            credentials,
            assumer,
        }
    }

    /// Resolve credentials for the profile named in `settings`: look up its
    /// static attributes, fold in the caller's overrides, then run the
    /// cache-or-mint flow.
    pub async fn resolve(&mut self, settings: &Settings) -> Result<Credentials, Error> {
        let profile = self.profiles.get_profile(&settings.profile)?;
        let options = build_options(settings, &profile);
        self.get_credentials(&options).await
    }

    pub async fn get_credentials(
        &mut self,
        options: &AssumeRoleOptions,
    ) -> Result<Credentials, Error> {
        if let Some(cached) = self.credentials.get_credentials(&options.profile_name) {
            if is_fresh(&cached, SystemTime::now()) {
                debug!(
                    "Using cached credentials for '{}', valid until {}",
                    options.profile_name, cached.expiration
                );
                return Ok(cached);
            }
            debug!(
                "Cached credentials for '{}' are expired or about to expire",
                options.profile_name
            );
        } else {
            debug!("No cached credentials for '{}'", options.profile_name);
        }

        let minted = self.assumer.assume_role(options).await?;
        info!("Obtained fresh credentials for '{}'", options.profile_name);

        // Losing the cache only costs the next run a round trip; the
        // credentials we hold are still good, so a write failure is not fatal
        if let Err(e) = self
            .credentials
            .set_credentials(&options.profile_name, &minted)
        {
            warn!("Could not cache credentials: {e}");
        }

        Ok(minted)
    }
}

/// Fold the profile's stored attributes together with the caller's overrides
/// into a single resolution request
fn build_options(settings: &Settings, profile: &ProfileConfig) -> AssumeRoleOptions {
    AssumeRoleOptions {
        profile_name: settings.profile.clone(),
        source_profile: settings
            .source_profile
            .clone()
            .unwrap_or_else(|| profile.source_profile.clone()),
        role_arn: profile.role_arn.clone(),
        mfa_serial: profile.mfa_serial.clone(),
        external_id: profile.external_id.clone(),
        role_session_name: profile.role_session_name.clone(),
        duration_minutes: settings.duration_minutes,
        region: settings.region.clone().or_else(|| profile.region.clone()),
    }
}

/// Credentials are binary valid/invalid: fresh iff at least
/// MIN_REMAINING_SECONDS of lifetime remain
fn is_fresh(creds: &Credentials, now: SystemTime) -> bool {
    let now = DateTime::from(now);
    creds.expiration.secs() - now.secs() >= MIN_REMAINING_SECONDS
}
