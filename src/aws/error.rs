use thiserror::Error;

/// Failures surfaced by credential resolution.
///
/// Store read problems never appear here: a malformed or missing credentials
/// entry is treated as a cache miss by the store itself. Store write failures
/// are returned to the resolver, which logs and ignores them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("profile '{0}' not found in AWS config file")]
    ProfileNotFound(String),

    #[error(
        "no valid credentials found for source profile '{0}'. \
         They may be missing or expired; refresh them and try again"
    )]
    NoValidSourceCredentials(String),

    #[error("AWS STS refused the role assumption: {0}")]
    AssumeDenied(String),

    #[error("failed to reach AWS STS: {0}")]
    AssumeTransport(String),

    #[error("failed to read {path}: {message}")]
    StoreRead { path: String, message: String },

    #[error("failed to write {path}: {message}")]
    StoreWrite { path: String, message: String },

    #[error(
        "already inside an awsassume session. \
         Exit this shell before assuming another role"
    )]
    AlreadyInSession,

    #[error("failed to read MFA token: {0}")]
    MfaPrompt(String),
}
