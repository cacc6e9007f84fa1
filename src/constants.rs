use std::{env, path::PathBuf};

use dirs;

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS configuration file name
pub const AWS_CONFIG_FILE_NAME: &str = "config";

/// AWS shared credentials file name
pub const AWS_CREDENTIALS_FILE_NAME: &str = "credentials";

/// Environment variable marking a process already running inside an
/// awsassume session
pub const SENTINEL_ENV_VAR: &str = "AWSASSUME";

/// Environment variable carrying the session expiration into the child process
pub const SESSION_EXPIRATION_ENV_VAR: &str = "SESSION_EXPIRATION";

/// Default session duration in minutes
pub const DEFAULT_SESSION_DURATION_MINUTES: u32 = 15;

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Cached credentials with less than this many seconds remaining are treated
/// as expired, to avoid races against clock skew and STS request latency
pub const MIN_REMAINING_SECONDS: i64 = 60;

/// Get the AWS config file path
/// Respects AWS_CONFIG_FILE environment variable if set
pub fn get_aws_config_path() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(path) = env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    // Use default AWS config location
    dirs::home_dir().map(|home| home.join(AWS_CONFIG_DIR_NAME).join(AWS_CONFIG_FILE_NAME))
}

/// Get the AWS credentials file path
/// Respects AWS_SHARED_CREDENTIALS_FILE environment variable if set
pub fn get_aws_credentials_path() -> Option<PathBuf> {
    // Check environment variable first
    if let Ok(path) = env::var("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }

    // Use default AWS credentials location
    dirs::home_dir().map(|home| {
        home.join(AWS_CONFIG_DIR_NAME)
            .join(AWS_CREDENTIALS_FILE_NAME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_aws_config_path_with_env() {
        let original = env::var("AWS_CONFIG_FILE").ok();

        unsafe {
            env::set_var("AWS_CONFIG_FILE", "/custom/aws/config");
        }
        let path = get_aws_config_path();
        assert_eq!(path, Some(PathBuf::from("/custom/aws/config")));

        unsafe {
            match original {
                Some(val) => env::set_var("AWS_CONFIG_FILE", val),
                None => env::remove_var("AWS_CONFIG_FILE"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_get_aws_config_path_default() {
        let original = env::var("AWS_CONFIG_FILE").ok();

        unsafe {
            env::remove_var("AWS_CONFIG_FILE");
        }
        let path = get_aws_config_path();

        if let Some(p) = path {
            let path_str = p.to_string_lossy();
            assert!(path_str.contains(AWS_CONFIG_DIR_NAME));
            assert!(path_str.contains(AWS_CONFIG_FILE_NAME));
        }

        unsafe {
            if let Some(val) = original {
                env::set_var("AWS_CONFIG_FILE", val);
            }
        }
    }

    #[test]
    #[serial]
    fn test_get_aws_credentials_path_with_env() {
        let original = env::var("AWS_SHARED_CREDENTIALS_FILE").ok();

        unsafe {
            env::set_var("AWS_SHARED_CREDENTIALS_FILE", "/custom/path/credentials");
        }
        let path = get_aws_credentials_path();
        assert_eq!(path, Some(PathBuf::from("/custom/path/credentials")));

        unsafe {
            match original {
                Some(val) => env::set_var("AWS_SHARED_CREDENTIALS_FILE", val),
                None => env::remove_var("AWS_SHARED_CREDENTIALS_FILE"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_get_aws_credentials_path_default() {
        let original = env::var("AWS_SHARED_CREDENTIALS_FILE").ok();

        unsafe {
            env::remove_var("AWS_SHARED_CREDENTIALS_FILE");
        }
        let path = get_aws_credentials_path();

        if let Some(p) = path {
            let path_str = p.to_string_lossy();
            assert!(path_str.contains(AWS_CONFIG_DIR_NAME));
            assert!(path_str.contains(AWS_CREDENTIALS_FILE_NAME));
        }

        unsafe {
            if let Some(val) = original {
                env::set_var("AWS_SHARED_CREDENTIALS_FILE", val);
            }
        }
    }
}
