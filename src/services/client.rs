//! Client seam for talking to the mainframe
//!
//! Everything that touches the host goes through `ZosClient`, so the rest of
//! the app can be tested against a stub.

use crate::model::job::{JobInfo, SpoolInfo};
use crate::model::profile::ConnectionProfile;
use thiserror::Error;

/// Errors surfaced by client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials rejected by the host. Triggers a credential re-prompt.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The CLI binary could not be launched
    #[error("failed to run {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The CLI produced output we could not parse
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The host rejected the request for a non-auth reason
    #[error("{0}")]
    Remote(String),
}

impl ClientError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// One row of a data set catalog listing
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetEntry {
    pub name: String,
    pub organization: Option<String>,
    pub volume: Option<String>,
}

/// One row of a PDS member listing
#[derive(Debug, Clone, PartialEq)]
pub struct MemberEntry {
    pub name: String,
}

/// One row of a USS directory listing
#[derive(Debug, Clone, PartialEq)]
pub struct UssEntry {
    pub name: String,
    pub directory: bool,
}

/// Operations against a z/OS host
///
/// Implementations are synchronous; callers that must not block the UI run
/// them on a worker thread.
pub trait ZosClient {
    /// Probe the z/OSMF status endpoint. Returns the reported state,
    /// normally "active".
    fn get_status(&self, profile: &ConnectionProfile) -> ClientResult<String>;

    fn list_data_sets(
        &self,
        profile: &ConnectionProfile,
        pattern: &str,
    ) -> ClientResult<Vec<DataSetEntry>>;

    fn list_members(
        &self,
        profile: &ConnectionProfile,
        dataset: &str,
    ) -> ClientResult<Vec<MemberEntry>>;

    fn list_uss_files(
        &self,
        profile: &ConnectionProfile,
        path: &str,
    ) -> ClientResult<Vec<UssEntry>>;

    fn list_jobs(
        &self,
        profile: &ConnectionProfile,
        owner: &str,
        prefix: &str,
        status: &str,
    ) -> ClientResult<Vec<JobInfo>>;

    fn list_spool_files(
        &self,
        profile: &ConnectionProfile,
        jobname: &str,
        jobid: &str,
    ) -> ClientResult<Vec<SpoolInfo>>;

    fn read_data_set(&self, profile: &ConnectionProfile, name: &str) -> ClientResult<String>;

    fn read_uss_file(&self, profile: &ConnectionProfile, path: &str) -> ClientResult<String>;

    fn read_spool_file(
        &self,
        profile: &ConnectionProfile,
        jobid: &str,
        spool_id: i64,
    ) -> ClientResult<String>;

    /// Obtain an API ML token for the profile's credentials.
    fn login(&self, profile: &ConnectionProfile) -> ClientResult<String>;

    /// Invalidate the profile's token on the host.
    fn logout(&self, profile: &ConnectionProfile) -> ClientResult<()>;
}

/// Shared stub client for unit tests
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Stub whose `get_status` answer and delay are configurable; every
    /// listing comes back empty. Counts status calls.
    pub struct StubClient {
        pub status: Mutex<ClientResult<String>>,
        pub status_delay: Duration,
        pub status_calls: AtomicUsize,
    }

    impl StubClient {
        pub fn with_status(status: ClientResult<String>) -> Self {
            Self {
                status: Mutex::new(status),
                status_delay: Duration::from_millis(0),
                status_calls: AtomicUsize::new(0),
            }
        }

        pub fn status_call_count(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }

        fn cloned_status(&self) -> ClientResult<String> {
            match &*self.status.lock().unwrap() {
                Ok(s) => Ok(s.clone()),
                Err(ClientError::Auth(m)) => Err(ClientError::Auth(m.clone())),
                Err(ClientError::Remote(m)) => Err(ClientError::Remote(m.clone())),
                Err(ClientError::Malformed(m)) => Err(ClientError::Malformed(m.clone())),
                Err(ClientError::Spawn { command, .. }) => Err(ClientError::Remote(format!(
                    "failed to run {}",
                    command
                ))),
            }
        }
    }

    impl ZosClient for StubClient {
        fn get_status(&self, _profile: &ConnectionProfile) -> ClientResult<String> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            if !self.status_delay.is_zero() {
                std::thread::sleep(self.status_delay);
            }
            self.cloned_status()
        }

        fn list_data_sets(
            &self,
            _profile: &ConnectionProfile,
            _pattern: &str,
        ) -> ClientResult<Vec<DataSetEntry>> {
            Ok(Vec::new())
        }

        fn list_members(
            &self,
            _profile: &ConnectionProfile,
            _dataset: &str,
        ) -> ClientResult<Vec<MemberEntry>> {
            Ok(Vec::new())
        }

        fn list_uss_files(
            &self,
            _profile: &ConnectionProfile,
            _path: &str,
        ) -> ClientResult<Vec<UssEntry>> {
            Ok(Vec::new())
        }

        fn list_jobs(
            &self,
            _profile: &ConnectionProfile,
            _owner: &str,
            _prefix: &str,
            _status: &str,
        ) -> ClientResult<Vec<JobInfo>> {
            Ok(Vec::new())
        }

        fn list_spool_files(
            &self,
            _profile: &ConnectionProfile,
            _jobname: &str,
            _jobid: &str,
        ) -> ClientResult<Vec<SpoolInfo>> {
            Ok(Vec::new())
        }

        fn read_data_set(
            &self,
            _profile: &ConnectionProfile,
            _name: &str,
        ) -> ClientResult<String> {
            Ok(String::new())
        }

        fn read_uss_file(&self, _profile: &ConnectionProfile, _path: &str) -> ClientResult<String> {
            Ok(String::new())
        }

        fn read_spool_file(
            &self,
            _profile: &ConnectionProfile,
            _jobid: &str,
            _spool_id: i64,
        ) -> ClientResult<String> {
            Ok(String::new())
        }

        fn login(&self, _profile: &ConnectionProfile) -> ClientResult<String> {
            Ok("stub-token".to_string())
        }

        fn logout(&self, _profile: &ConnectionProfile) -> ClientResult<()> {
            Ok(())
        }
    }
}
