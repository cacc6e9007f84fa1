use aws_smithy_types::DateTime;

pub mod credentials;
pub mod error;
pub mod profile;
pub mod resolver;
pub mod sts;

/// AWS temporary credentials, either freshly minted by STS or rehydrated from
/// the shared credentials file
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime,
    pub region: Option<String>,
}

/// A single role-assumption request, built per resolution from the profile's
/// stored attributes plus caller-supplied overrides
#[derive(Debug, Clone, Default)]
pub struct AssumeRoleOptions {
    pub profile_name: String,
    pub source_profile: String,
    pub role_arn: String,
    pub mfa_serial: Option<String>,
    pub external_id: Option<String>,
    pub role_session_name: Option<String>,
    pub duration_minutes: u32,
    pub region: Option<String>,
}

// Re-export commonly used types (functions should be accessed via module path)
pub use error::Error;
pub use profile::ProfileConfig;
pub use resolver::CredentialResolver;
