//! External service interactions
//!
//! This module contains services for interacting with the host:
//! - The `ZosClient` seam and its Zowe CLI implementation
//! - Background connection probes
//! - Session validation
//! - Tree reconciliation after refreshes
//! - Search over loaded tree items

pub mod client;
pub mod probe;
pub mod reconcile;
pub mod search;
pub mod validator;
pub mod zowe;

pub use client::{ClientError, ClientResult, ZosClient};
pub use probe::{spawn_status_probe, ProbeHandle, ProbeResult};
pub use reconcile::{
    reconcile_data_sets, reconcile_jobs, reconcile_members, reconcile_spools, reconcile_uss,
};
pub use validator::{CheckProgress, CredentialInput, SessionValidator};
pub use zowe::ZoweCli;
