use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_sts::Client as StsClient;
use aws_sdk_sts::error::SdkError;
use aws_smithy_types::DateTime;
use aws_smithy_types::error::display::DisplayErrorContext;
use dialoguer::{Input, theme::ColorfulTheme};
use tracing::{debug, info};

use super::error::Error;
use super::{AssumeRoleOptions, Credentials};
use crate::constants::DEFAULT_AWS_REGION;

/// Capability that exchanges a source identity and role descriptor for fresh
/// temporary credentials
#[allow(async_fn_in_trait)]
pub trait RoleAssumer {
    async fn assume_role(&self, options: &AssumeRoleOptions) -> Result<Credentials, Error>;
}

/// RoleAssumer backed by the AWS STS AssumeRole API
#[derive(Debug, Default)]
pub struct StsRoleAssumer;

impl StsRoleAssumer {
    pub fn new() -> Self {
        Self
    }
}

impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(&self, options: &AssumeRoleOptions) -> Result<Credentials, Error> {
        info!("Calling AWS STS AssumeRole");
        debug!("Profile: {}", options.profile_name);
        debug!("Source profile: {}", options.source_profile);
        debug!("Role ARN: {}", options.role_arn);
        debug!("Duration: {} minutes", options.duration_minutes);

        let started_at = SystemTime::now();

        let config = load_source_config(options).await;

        // Fail early with a specific message when the source identity has no
        // usable credentials. Expired long-lived keys are the usual cause and
        // the raw STS error for it is unhelpful.
        let provider = config
            .credentials_provider()
            .ok_or_else(|| Error::NoValidSourceCredentials(source_label(options)))?;
        provider.provide_credentials().await.map_err(|e| {
            debug!("Source credential lookup failed: {}", e);
            Error::NoValidSourceCredentials(source_label(options))
        })?;

        let client = StsClient::new(&config);

        let session_name = match &options.role_session_name {
            Some(name) => name.clone(),
            None => default_session_name(started_at),
        };

        let mut request = client
            .assume_role()
            .role_arn(&options.role_arn)
            .role_session_name(&session_name)
            .duration_seconds(duration_seconds(options.duration_minutes));

        if let Some(external_id) = &options.external_id {
            // Opaque to us; the trust policy on the far side checks it
            request = request.external_id(external_id);
        }

        if let Some(serial) = &options.mfa_serial {
            let token = prompt_mfa_token(serial).await?;
            request = request.serial_number(serial).token_code(token);
        }

        let response = request.send().await.map_err(|err| {
            let message = DisplayErrorContext(&err).to_string();
            match err {
                SdkError::ServiceError(_) => Error::AssumeDenied(message),
                _ => Error::AssumeTransport(message),
            }
        })?;

        let sts_creds = response.credentials().ok_or_else(|| {
            Error::AssumeTransport("AWS STS returned no credentials".to_string())
        })?;

        // Prefer the expiry STS reports; fall back to our own clock if the
        // response carries a zeroed or missing one
        let reported = *sts_creds.expiration();
        let expiration = if reported.secs() > 0 {
            reported
        } else {
            computed_expiration(started_at, options.duration_minutes)
        };

        info!("Successfully obtained temporary credentials");

        Ok(Credentials {
            access_key_id: sts_creds.access_key_id().to_string(),
            secret_access_key: sts_creds.secret_access_key().to_string(),
            session_token: sts_creds.session_token().to_string(),
            expiration,
            region: options.region.clone(),
        })
    }
}

/// Build the identity context for the source profile. The credential chain
/// behind it (static keys, SSO, another assumed role) is the SDK's business.
async fn load_source_config(options: &AssumeRoleOptions) -> aws_config::SdkConfig {
    let loader = || {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if !options.source_profile.is_empty() {
            loader = loader.profile_name(&options.source_profile);
        }
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        loader
    };

    let loaded = loader().load().await;
    match loaded.region() {
        Some(region) => {
            debug!("Using region: {}", region);
            loaded
        }
        None => {
            debug!(
                "No region configured, using default {} for STS",
                DEFAULT_AWS_REGION
            );
            loader().region(Region::new(DEFAULT_AWS_REGION)).load().await
        }
    }
}

/// Blocking console read; runs on the blocking pool so it cannot stall the
/// async runtime. No timeout: the operator answers or aborts.
async fn prompt_mfa_token(serial: &str) -> Result<String, Error> {
    let prompt = format!("Enter MFA token for {serial}");

    tokio::task::spawn_blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .validate_with(|input: &String| {
                if input.len() == 6 && input.chars().all(|c| c.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err("MFA token must be 6 digits")
                }
            })
            .interact_text()
    })
    .await
    .map_err(|e| Error::MfaPrompt(e.to_string()))?
    .map_err(|e| Error::MfaPrompt(e.to_string()))
}

fn duration_seconds(duration_minutes: u32) -> i32 {
    i32::try_from(u64::from(duration_minutes) * 60).unwrap_or(i32::MAX)
}

fn computed_expiration(started_at: SystemTime, duration_minutes: u32) -> DateTime {
    DateTime::from(started_at + Duration::from_secs(u64::from(duration_minutes) * 60))
}

fn default_session_name(started_at: SystemTime) -> String {
    let secs = started_at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("awsassume-{secs}")
}

fn source_label(options: &AssumeRoleOptions) -> String {
    if options.source_profile.is_empty() {
        "default".to_string()
    } else {
        options.source_profile.clone()
    }
}
