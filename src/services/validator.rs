//! Session validation
//!
//! Before a session expands, its profile must be usable: credentials present
//! and, when validation is enabled, the host reachable. The check runs as a
//! small state machine so the UI can suspend it for a credential prompt or a
//! background probe and pick it up again later.

use crate::model::profile::{
    ConnectionProfile, ProfileStateStore, ProfileValidity, ValidationStatus,
};
use crate::services::client::ZosClient;
use crate::services::probe::{spawn_status_probe, ProbeHandle};
use std::sync::Arc;

/// Where a validation check currently stands
pub enum CheckProgress {
    /// The profile has no usable credentials; prompt and call `resume_check`
    NeedsCredentials,
    /// A status probe is running; poll the handle, then call `finish_probe`
    Probing(ProbeHandle),
    /// The check is complete
    Done(ProfileValidity),
}

/// What the credential prompt produced
pub enum CredentialInput {
    Provided { user: String, password: String },
    /// The prompt was dismissed. Not an error; the profile stays unverified.
    Cancelled,
    /// The prompt itself failed (for example a secrets backend error)
    Failed(String),
}

/// Runs validation checks for session profiles
pub struct SessionValidator {
    client: Arc<dyn ZosClient + Send + Sync>,
}

impl SessionValidator {
    pub fn new(client: Arc<dyn ZosClient + Send + Sync>) -> Self {
        Self { client }
    }

    /// Start a check for `profile`. Mutates the store as the check settles.
    pub fn begin_check(
        &self,
        store: &mut ProfileStateStore,
        profile: &mut ConnectionProfile,
    ) -> CheckProgress {
        if !profile.has_credentials() {
            // A stale verdict must not short-circuit the check once the
            // prompt settles
            store.remove_stale(&profile.name);
            return CheckProgress::NeedsCredentials;
        }
        self.check_with_credentials(store, profile)
    }

    /// Continue a check that stopped at `NeedsCredentials`.
    pub fn resume_check(
        &self,
        store: &mut ProfileStateStore,
        profile: &mut ConnectionProfile,
        input: CredentialInput,
    ) -> CheckProgress {
        match input {
            CredentialInput::Cancelled => {
                store.set_status(&profile.name, ValidationStatus::Unverified);
                CheckProgress::Done(ProfileValidity::Unverified)
            }
            CredentialInput::Failed(reason) => {
                tracing::warn!(profile = %profile.name, %reason, "credential prompt failed");
                let validity = store
                    .status(&profile.name)
                    .map(ProfileValidity::from)
                    .unwrap_or(ProfileValidity::Unverified);
                CheckProgress::Done(validity)
            }
            CredentialInput::Provided { user, password } => {
                profile.user = Some(user);
                profile.password = Some(password);
                self.check_with_credentials(store, profile)
            }
        }
    }

    /// Check a profile that has credentials.
    fn check_with_credentials(
        &self,
        store: &mut ProfileStateStore,
        profile: &ConnectionProfile,
    ) -> CheckProgress {
        if !store.validation_enabled(&profile.name) {
            store.set_status(&profile.name, ValidationStatus::Unverified);
            return CheckProgress::Done(ProfileValidity::Unverified);
        }

        // A profile already verified active this session is not re-probed
        if store.status(&profile.name) == Some(ValidationStatus::Active) {
            return CheckProgress::Done(ProfileValidity::Valid);
        }

        let handle = spawn_status_probe(Arc::clone(&self.client), profile.clone());
        CheckProgress::Probing(handle)
    }

    /// Record a probe outcome and return the resulting validity.
    pub fn finish_probe(
        &self,
        store: &mut ProfileStateStore,
        profile_name: &str,
        outcome: Result<String, crate::services::client::ClientError>,
    ) -> ProfileValidity {
        let status = match outcome {
            Ok(state) if state == "active" => ValidationStatus::Active,
            Ok(state) if state == "inactive" => ValidationStatus::Inactive,
            Ok(state) => {
                tracing::warn!(profile = %profile_name, %state, "unrecognized host state");
                ValidationStatus::Unverified
            }
            Err(error) => {
                tracing::warn!(profile = %profile_name, %error, "status probe failed");
                ValidationStatus::Inactive
            }
        };
        store.set_status(profile_name, status);
        ProfileValidity::from(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::testing::StubClient;
    use crate::services::client::ClientError;
    use std::thread;
    use std::time::Duration;

    fn profile_with_credentials(name: &str) -> ConnectionProfile {
        let mut profile = ConnectionProfile::new(name, "mf.example.com", 10443);
        profile.user = Some("ibmuser".to_string());
        profile.password = Some("secret".to_string());
        profile
    }

    fn drive_probe(
        validator: &SessionValidator,
        store: &mut ProfileStateStore,
        profile_name: &str,
        handle: ProbeHandle,
    ) -> ProfileValidity {
        for _ in 0..100 {
            if let Some(result) = handle.try_result() {
                return validator.finish_probe(store, profile_name, result.outcome);
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("probe never completed");
    }

    #[test]
    fn test_disabled_validation_never_probes() {
        let client = Arc::new(StubClient::with_status(Ok("active".to_string())));
        let validator = SessionValidator::new(Arc::clone(&client) as _);
        let mut store = ProfileStateStore::new();
        let mut profile = profile_with_credentials("P1");
        store.set_validation_enabled("P1", false);

        let progress = validator.begin_check(&mut store, &mut profile);
        assert!(matches!(
            progress,
            CheckProgress::Done(ProfileValidity::Unverified)
        ));
        assert_eq!(store.status("P1"), Some(ValidationStatus::Unverified));
        assert_eq!(client.status_call_count(), 0);
    }

    #[test]
    fn test_cached_active_skips_probe() {
        let client = Arc::new(StubClient::with_status(Ok("active".to_string())));
        let validator = SessionValidator::new(Arc::clone(&client) as _);
        let mut store = ProfileStateStore::new();
        let mut profile = profile_with_credentials("lpar1");
        store.set_status("lpar1", ValidationStatus::Active);

        let progress = validator.begin_check(&mut store, &mut profile);
        assert!(matches!(
            progress,
            CheckProgress::Done(ProfileValidity::Valid)
        ));
        assert_eq!(client.status_call_count(), 0);
    }

    #[test]
    fn test_probe_active_yields_valid() {
        let client = Arc::new(StubClient::with_status(Ok("active".to_string())));
        let validator = SessionValidator::new(Arc::clone(&client) as _);
        let mut store = ProfileStateStore::new();
        let mut profile = profile_with_credentials("lpar1");

        let CheckProgress::Probing(handle) = validator.begin_check(&mut store, &mut profile)
        else {
            panic!("expected a probe");
        };
        let validity = drive_probe(&validator, &mut store, "lpar1", handle);
        assert_eq!(validity, ProfileValidity::Valid);
        assert_eq!(store.status("lpar1"), Some(ValidationStatus::Active));
        assert_eq!(client.status_call_count(), 1);
    }

    #[test]
    fn test_probe_error_yields_invalid() {
        let client = Arc::new(StubClient::with_status(Err(ClientError::Remote(
            "connect timeout".to_string(),
        ))));
        let validator = SessionValidator::new(client as _);
        let mut store = ProfileStateStore::new();
        let mut profile = profile_with_credentials("lpar1");

        let CheckProgress::Probing(handle) = validator.begin_check(&mut store, &mut profile)
        else {
            panic!("expected a probe");
        };
        let validity = drive_probe(&validator, &mut store, "lpar1", handle);
        assert_eq!(validity, ProfileValidity::Invalid);
        assert_eq!(store.status("lpar1"), Some(ValidationStatus::Inactive));
    }

    #[test]
    fn test_missing_credentials_prompts_and_clears_stale() {
        let client = Arc::new(StubClient::with_status(Ok("active".to_string())));
        let validator = SessionValidator::new(client as _);
        let mut store = ProfileStateStore::new();
        store.set_status("lpar1", ValidationStatus::Active);
        store.set_status("other", ValidationStatus::Inactive);
        let mut profile = ConnectionProfile::new("lpar1", "mf.example.com", 10443);

        let progress = validator.begin_check(&mut store, &mut profile);
        assert!(matches!(progress, CheckProgress::NeedsCredentials));
        assert_eq!(store.status("lpar1"), None);
        assert_eq!(store.status("other"), Some(ValidationStatus::Inactive));
    }

    #[test]
    fn test_cancelled_prompt_leaves_profile_unverified() {
        let client = Arc::new(StubClient::with_status(Ok("active".to_string())));
        let validator = SessionValidator::new(Arc::clone(&client) as _);
        let mut store = ProfileStateStore::new();
        let mut profile = ConnectionProfile::new("lpar1", "mf.example.com", 10443);

        let progress =
            validator.resume_check(&mut store, &mut profile, CredentialInput::Cancelled);
        assert!(matches!(
            progress,
            CheckProgress::Done(ProfileValidity::Unverified)
        ));
        assert_eq!(store.status("lpar1"), Some(ValidationStatus::Unverified));
        assert_eq!(client.status_call_count(), 0);
    }

    #[test]
    fn test_provided_credentials_continue_to_probe() {
        let client = Arc::new(StubClient::with_status(Ok("active".to_string())));
        let validator = SessionValidator::new(Arc::clone(&client) as _);
        let mut store = ProfileStateStore::new();
        let mut profile = ConnectionProfile::new("lpar1", "mf.example.com", 10443);

        let progress = validator.resume_check(
            &mut store,
            &mut profile,
            CredentialInput::Provided {
                user: "ibmuser".to_string(),
                password: "secret".to_string(),
            },
        );
        assert!(profile.has_credentials());
        let CheckProgress::Probing(handle) = progress else {
            panic!("expected a probe");
        };
        let validity = drive_probe(&validator, &mut store, "lpar1", handle);
        assert_eq!(validity, ProfileValidity::Valid);
    }
}
