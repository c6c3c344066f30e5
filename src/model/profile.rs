//! Connection profiles and per-profile validation state

use serde::{Deserialize, Serialize};

/// A named connection to a mainframe service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Session token obtained via login. Never persisted.
    #[serde(skip)]
    pub token: Option<String>,
    #[serde(default = "default_reject_unauthorized")]
    pub reject_unauthorized: bool,
}

fn default_reject_unauthorized() -> bool {
    true
}

impl ConnectionProfile {
    pub fn new(name: &str, host: &str, port: u16) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            port,
            user: None,
            password: None,
            token: None,
            reject_unauthorized: true,
        }
    }

    /// Whether this profile can authenticate without prompting:
    /// either a token, or a complete user/password pair.
    pub fn has_credentials(&self) -> bool {
        self.token.is_some() || (self.user.is_some() && self.password.is_some())
    }
}

/// Result of the last validation probe for a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Not validated yet, or validation is disabled
    Unverified,
    /// Probe reached the host but the service reported it down, or the probe failed
    Inactive,
    /// Probe succeeded
    Active,
}

impl ValidationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ValidationStatus::Unverified => "unverified",
            ValidationStatus::Inactive => "inactive",
            ValidationStatus::Active => "active",
        }
    }
}

/// Coarse answer to "can I use this session right now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileValidity {
    Valid,
    Invalid,
    Unverified,
}

impl From<ValidationStatus> for ProfileValidity {
    fn from(status: ValidationStatus) -> Self {
        match status {
            ValidationStatus::Active => ProfileValidity::Valid,
            ValidationStatus::Inactive => ProfileValidity::Invalid,
            ValidationStatus::Unverified => ProfileValidity::Unverified,
        }
    }
}

impl ProfileValidity {
    /// Sessions may be browsed when validation passed or was skipped.
    pub fn is_usable(&self) -> bool {
        matches!(self, ProfileValidity::Valid | ProfileValidity::Unverified)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileValidity::Valid => "valid",
            ProfileValidity::Invalid => "inactive",
            ProfileValidity::Unverified => "unverified",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ValidationRecord {
    profile_name: String,
    status: ValidationStatus,
}

#[derive(Debug, Clone, PartialEq)]
struct ValidationSetting {
    profile_name: String,
    enabled: bool,
}

/// Per-profile validation state for the lifetime of the process.
///
/// At most one status record and one setting per profile name; superseding
/// writes replace the existing entry in place.
#[derive(Debug, Default)]
pub struct ProfileStateStore {
    records: Vec<ValidationRecord>,
    settings: Vec<ValidationSetting>,
}

impl ProfileStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded validation status for a profile, if any.
    pub fn status(&self, name: &str) -> Option<ValidationStatus> {
        self.records
            .iter()
            .find(|r| r.profile_name == name)
            .map(|r| r.status)
    }

    /// Record a validation status, replacing any existing record for the name.
    pub fn set_status(&mut self, name: &str, status: ValidationStatus) {
        match self.records.iter_mut().find(|r| r.profile_name == name) {
            Some(record) => record.status = status,
            None => self.records.push(ValidationRecord {
                profile_name: name.to_string(),
                status,
            }),
        }
    }

    /// Drop any cached record for the name that is not "unverified".
    ///
    /// Used before a credential re-prompt so a stale "active"/"inactive"
    /// result cannot short-circuit the next check.
    pub fn remove_stale(&mut self, name: &str) {
        self.records
            .retain(|r| r.profile_name != name || r.status == ValidationStatus::Unverified);
    }

    /// Whether validation is enabled for a profile. Defaults to true.
    pub fn validation_enabled(&self, name: &str) -> bool {
        self.settings
            .iter()
            .find(|s| s.profile_name == name)
            .map(|s| s.enabled)
            .unwrap_or(true)
    }

    pub fn set_validation_enabled(&mut self, name: &str, enabled: bool) {
        match self.settings.iter_mut().find(|s| s.profile_name == name) {
            Some(setting) => setting.enabled = enabled,
            None => self.settings.push(ValidationSetting {
                profile_name: name.to_string(),
                enabled,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_replaces_in_place() {
        let mut store = ProfileStateStore::new();
        assert_eq!(store.status("lpar1"), None);

        store.set_status("lpar1", ValidationStatus::Active);
        store.set_status("lpar2", ValidationStatus::Inactive);
        store.set_status("lpar1", ValidationStatus::Inactive);

        assert_eq!(store.status("lpar1"), Some(ValidationStatus::Inactive));
        assert_eq!(store.status("lpar2"), Some(ValidationStatus::Inactive));
        assert_eq!(store.records.len(), 2);
    }

    #[test]
    fn test_remove_stale_keeps_unverified() {
        let mut store = ProfileStateStore::new();
        store.set_status("a", ValidationStatus::Active);
        store.set_status("b", ValidationStatus::Unverified);

        store.remove_stale("a");
        store.remove_stale("b");

        assert_eq!(store.status("a"), None);
        assert_eq!(store.status("b"), Some(ValidationStatus::Unverified));
    }

    #[test]
    fn test_validation_enabled_defaults_true() {
        let mut store = ProfileStateStore::new();
        assert!(store.validation_enabled("lpar1"));

        store.set_validation_enabled("lpar1", false);
        assert!(!store.validation_enabled("lpar1"));

        store.set_validation_enabled("lpar1", true);
        assert!(store.validation_enabled("lpar1"));
        assert_eq!(store.settings.len(), 1);
    }

    #[test]
    fn test_has_credentials() {
        let mut profile = ConnectionProfile::new("lpar1", "mf.example.com", 443);
        assert!(!profile.has_credentials());

        profile.user = Some("ibmuser".to_string());
        assert!(!profile.has_credentials());

        profile.password = Some("secret".to_string());
        assert!(profile.has_credentials());

        profile.user = None;
        profile.password = None;
        profile.token = Some("token".to_string());
        assert!(profile.has_credentials());
    }

    #[test]
    fn test_validity_mapping() {
        assert_eq!(
            ProfileValidity::from(ValidationStatus::Active),
            ProfileValidity::Valid
        );
        assert_eq!(
            ProfileValidity::from(ValidationStatus::Inactive),
            ProfileValidity::Invalid
        );
        assert!(ProfileValidity::Unverified.is_usable());
        assert!(!ProfileValidity::Invalid.is_usable());
    }
}
