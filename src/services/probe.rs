//! Background connection probe
//!
//! Status checks can hang on an unreachable host, so they run on a worker
//! thread. The UI polls the handle each tick and may cancel; a cancelled
//! probe's result is discarded before it is ever sent.

use crate::model::profile::ConnectionProfile;
use crate::services::client::{ClientError, ZosClient};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Outcome of a finished probe
#[derive(Debug)]
pub struct ProbeResult {
    pub profile_name: String,
    pub outcome: Result<String, ClientError>,
}

/// Handle to a probe in flight
pub struct ProbeHandle {
    receiver: Receiver<ProbeResult>,
    cancel: Arc<AtomicBool>,
    profile_name: String,
}

impl ProbeHandle {
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// Ask the worker to drop its result. The thread finishes its in-flight
    /// request but never reports it.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Poll for a result without blocking. A disconnected channel after
    /// cancellation is the expected quiet ending.
    pub fn try_result(&self) -> Option<ProbeResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Spawn a worker thread that probes the host status for `profile`.
pub fn spawn_status_probe(
    client: Arc<dyn ZosClient + Send + Sync>,
    profile: ConnectionProfile,
) -> ProbeHandle {
    let (sender, receiver) = channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = Arc::clone(&cancel);
    let profile_name = profile.name.clone();

    thread::spawn(move || {
        let outcome = client.get_status(&profile);
        // Checked after the call returns: a cancelled probe must not
        // influence the profile's recorded state
        if cancel_flag.load(Ordering::SeqCst) {
            tracing::debug!(profile = %profile.name, "probe cancelled, result discarded");
            return;
        }
        let _ = sender.send(ProbeResult {
            profile_name: profile.name,
            outcome,
        });
    });

    ProbeHandle {
        receiver,
        cancel,
        profile_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::testing::StubClient;
    use std::time::Duration;

    fn wait_for_result(handle: &ProbeHandle) -> Option<ProbeResult> {
        for _ in 0..100 {
            if let Some(result) = handle.try_result() {
                return Some(result);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn test_probe_reports_status() {
        let client = Arc::new(StubClient::with_status(Ok("active".to_string())));
        let handle = spawn_status_probe(client, ConnectionProfile::new("lpar1", "host", 443));

        let result = wait_for_result(&handle).unwrap();
        assert_eq!(result.profile_name, "lpar1");
        assert_eq!(result.outcome.unwrap(), "active");
    }

    #[test]
    fn test_cancelled_probe_never_reports() {
        let mut client = StubClient::with_status(Ok("active".to_string()));
        client.status_delay = Duration::from_millis(50);
        let handle = spawn_status_probe(
            Arc::new(client),
            ConnectionProfile::new("lpar1", "host", 443),
        );
        handle.cancel();

        // Give the worker time to finish and (not) send
        thread::sleep(Duration::from_millis(150));
        assert!(handle.try_result().is_none());
    }
}
