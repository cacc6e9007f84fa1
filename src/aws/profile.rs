use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use tracing::debug;

use super::error::Error;

/// Static role-assumption attributes for a named profile in the AWS config
/// file. Read once per resolution, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    pub source_profile: String,
    pub role_arn: String,
    pub mfa_serial: Option<String>,
    pub external_id: Option<String>,
    pub region: Option<String>,
    pub role_session_name: Option<String>,
}

impl ProfileConfig {
    fn from_ini_section(section: &Properties) -> Self {
        let optional = |key: &str| {
            section
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            source_profile: section.get("source_profile").unwrap_or("").to_string(),
            role_arn: section.get("role_arn").unwrap_or("").to_string(),
            mfa_serial: optional("mfa_serial"),
            external_id: optional("external_id"),
            region: optional("region"),
            role_session_name: optional("role_session_name"),
        }
    }
}

/// Read-only accessor over a persisted profile configuration store
pub trait ProfileStore {
    fn get_profile(&self, profile_name: &str) -> Result<ProfileConfig, Error>;
}

/// Profile store backed by the AWS CLI config file (`~/.aws/config` by default)
#[derive(Debug)]
pub struct AwsConfigStore {
    path: PathBuf,
    ini: Ini,
}

impl AwsConfigStore {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let ini = Ini::load_from_file(path).map_err(|e| Error::StoreRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded AWS config file from {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            ini,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn from_str(content: &str) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            ini: Ini::load_from_str(content).expect("valid ini"),
        }
    }
}

/// The AWS config file namespaces every section except the default one:
/// `[default]` but `[profile staging]`. This is a structural rule of the file
/// format, not a naming convention.
fn section_name(profile_name: &str) -> String {
    if profile_name == "default" {
        profile_name.to_string()
    } else {
        format!("profile {profile_name}")
    }
}

impl ProfileStore for AwsConfigStore {
    fn get_profile(&self, profile_name: &str) -> Result<ProfileConfig, Error> {
        debug!("Looking up profile '{}' in config file", profile_name);

        let section = self
            .ini
            .section(Some(section_name(profile_name)))
            .ok_or_else(|| Error::ProfileNotFound(profile_name.to_string()))?;

        Ok(ProfileConfig::from_ini_section(section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r"
[default]
role_arn = arn:aws:iam::123456789012:role/Base
source_profile = base
region = us-east-1

[profile teamrole]
role_arn = arn:aws:iam::123456789012:role/Team
source_profile = default
mfa_serial = arn:aws:iam::123456789012:mfa/me
external_id = team-external
role_session_name = team-session

[unprefixed]
role_arn = arn:aws:iam::123456789012:role/Wrong
";

    #[test]
    fn test_default_profile_uses_bare_section_name() {
        let store = AwsConfigStore::from_str(CONFIG);
        let profile = store.get_profile("default").unwrap();

        assert_eq!(profile.role_arn, "arn:aws:iam::123456789012:role/Base");
        assert_eq!(profile.source_profile, "base");
        assert_eq!(profile.region.as_deref(), Some("us-east-1"));
        assert_eq!(profile.mfa_serial, None);
    }

    #[test]
    fn test_named_profile_uses_prefixed_section_name() {
        let store = AwsConfigStore::from_str(CONFIG);
        let profile = store.get_profile("teamrole").unwrap();

        assert_eq!(profile.role_arn, "arn:aws:iam::123456789012:role/Team");
        assert_eq!(profile.source_profile, "default");
        assert_eq!(
            profile.mfa_serial.as_deref(),
            Some("arn:aws:iam::123456789012:mfa/me")
        );
        assert_eq!(profile.external_id.as_deref(), Some("team-external"));
        assert_eq!(profile.role_session_name.as_deref(), Some("team-session"));
    }

    #[test]
    fn test_unprefixed_section_does_not_match_named_profile() {
        let store = AwsConfigStore::from_str(CONFIG);

        match store.get_profile("unprefixed") {
            Err(Error::ProfileNotFound(name)) => assert_eq!(name, "unprefixed"),
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_profile_is_not_found() {
        let store = AwsConfigStore::from_str(CONFIG);

        assert!(matches!(
            store.get_profile("missing"),
            Err(Error::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_empty_optional_fields_become_none() {
        let store = AwsConfigStore::from_str(
            "[profile sparse]\nrole_arn = arn:aws:iam::1:role/X\nmfa_serial =\n",
        );
        let profile = store.get_profile("sparse").unwrap();

        assert_eq!(profile.mfa_serial, None);
        assert_eq!(profile.source_profile, "");
    }
}
