//! Zowe CLI-backed client
//!
//! Shells out to the `zowe` binary with `--rfj` so every command answers with
//! a JSON envelope. Connection details are passed per invocation, so no Zowe
//! profile setup is needed on the workstation.

use crate::model::job::{JobInfo, SpoolInfo};
use crate::model::profile::ConnectionProfile;
use crate::services::client::{
    ClientError, ClientResult, DataSetEntry, MemberEntry, UssEntry, ZosClient,
};
use regex::Regex;
use serde::Deserialize;
use std::process::Command;
use std::sync::LazyLock;

static ANSI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").unwrap());

/// Strip ANSI escape codes from CLI output
fn strip_ansi(text: &str) -> String {
    ANSI_REGEX.replace_all(text, "").to_string()
}

/// The `--rfj` response envelope every Zowe command emits
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseEnvelope {
    success: bool,
    #[serde(default)]
    exit_code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponseItems<T> {
    #[serde(rename = "apiResponse")]
    api_response: ApiItems<T>,
}

#[derive(Debug, Deserialize)]
struct ApiItems<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct DataSetItem {
    dsname: String,
    #[serde(default)]
    dsorg: Option<String>,
    #[serde(default)]
    vol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberItem {
    member: String,
}

#[derive(Debug, Deserialize)]
struct UssItem {
    name: String,
    #[serde(default)]
    mode: String,
}

#[derive(Debug, Deserialize)]
struct JobItem {
    jobname: String,
    jobid: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    retcode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpoolItem {
    id: i64,
    #[serde(default)]
    stepname: String,
    ddname: String,
    #[serde(default)]
    procstep: Option<String>,
    #[serde(rename = "record-count", default)]
    record_count: i64,
}

/// Client that runs the Zowe CLI as a subprocess
pub struct ZoweCli {
    binary: String,
}

impl ZoweCli {
    pub fn new(binary: String) -> Self {
        Self { binary }
    }

    /// Connection arguments appended to every command. A token takes
    /// precedence over basic credentials.
    fn connection_args(profile: &ConnectionProfile) -> Vec<String> {
        let mut args = vec![
            "--host".to_string(),
            profile.host.clone(),
            "--port".to_string(),
            profile.port.to_string(),
        ];
        if let Some(token) = &profile.token {
            args.push("--token-type".to_string());
            args.push("apimlAuthenticationToken".to_string());
            args.push("--token-value".to_string());
            args.push(token.clone());
        } else {
            if let Some(user) = &profile.user {
                args.push("--user".to_string());
                args.push(user.clone());
            }
            if let Some(password) = &profile.password {
                args.push("--password".to_string());
                args.push(password.clone());
            }
        }
        if !profile.reject_unauthorized {
            args.push("--ru".to_string());
            args.push("false".to_string());
        }
        args
    }

    /// Run a command and return its parsed envelope, classifying failures.
    fn run(&self, profile: &ConnectionProfile, args: &[&str]) -> ClientResult<ResponseEnvelope> {
        let mut full_args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        full_args.extend(Self::connection_args(profile));
        full_args.push("--rfj".to_string());

        tracing::debug!(command = %args.join(" "), "running zowe");

        let output = Command::new(&self.binary)
            .args(&full_args)
            .output()
            .map_err(|e| ClientError::Spawn {
                command: format!("{} {}", self.binary, args.join(" ")),
                source: e,
            })?;

        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        parse_envelope(&stdout)
    }
}

/// Parse a `--rfj` envelope and classify failures.
fn parse_envelope(stdout: &str) -> ClientResult<ResponseEnvelope> {
    let envelope: ResponseEnvelope = serde_json::from_str(stdout.trim())
        .map_err(|e| ClientError::Malformed(format!("invalid response envelope: {}", e)))?;

    if envelope.success {
        return Ok(envelope);
    }

    let detail = if envelope.message.is_empty() {
        envelope.stderr.clone()
    } else {
        envelope.message.clone()
    };
    if is_auth_failure(&detail) || is_auth_failure(&envelope.stderr) {
        Err(ClientError::Auth(detail))
    } else {
        Err(ClientError::Remote(format!(
            "command failed (exit {}): {}",
            envelope.exit_code, detail
        )))
    }
}

fn is_auth_failure(text: &str) -> bool {
    text.contains("401") || text.to_lowercase().contains("unauthorized")
}

fn decode_items<T: serde::de::DeserializeOwned>(envelope: &ResponseEnvelope) -> ClientResult<Vec<T>> {
    let wrapper: ApiResponseItems<T> = serde_json::from_value(envelope.data.clone())
        .map_err(|e| ClientError::Malformed(format!("unexpected listing shape: {}", e)))?;
    Ok(wrapper.api_response.items)
}

fn parse_data_set_listing(envelope: &ResponseEnvelope) -> ClientResult<Vec<DataSetEntry>> {
    let items: Vec<DataSetItem> = decode_items(envelope)?;
    Ok(items
        .into_iter()
        .map(|item| DataSetEntry {
            name: item.dsname,
            organization: item.dsorg,
            volume: item.vol,
        })
        .collect())
}

fn parse_member_listing(envelope: &ResponseEnvelope) -> ClientResult<Vec<MemberEntry>> {
    let items: Vec<MemberItem> = decode_items(envelope)?;
    Ok(items
        .into_iter()
        .map(|item| MemberEntry { name: item.member })
        .collect())
}

fn parse_uss_listing(envelope: &ResponseEnvelope) -> ClientResult<Vec<UssEntry>> {
    let items: Vec<UssItem> = decode_items(envelope)?;
    Ok(items
        .into_iter()
        .filter(|item| item.name != "." && item.name != "..")
        .map(|item| UssEntry {
            directory: item.mode.starts_with('d'),
            name: item.name,
        })
        .collect())
}

fn parse_job_listing(envelope: &ResponseEnvelope) -> ClientResult<Vec<JobInfo>> {
    // The jobs listing returns a bare array in `data`, no apiResponse wrapper
    let items: Vec<JobItem> = serde_json::from_value(envelope.data.clone())
        .map_err(|e| ClientError::Malformed(format!("unexpected job listing shape: {}", e)))?;
    Ok(items
        .into_iter()
        .map(|item| JobInfo {
            jobname: item.jobname,
            jobid: item.jobid,
            owner: item.owner,
            status: item.status,
            retcode: item.retcode,
        })
        .collect())
}

fn parse_spool_listing(envelope: &ResponseEnvelope) -> ClientResult<Vec<SpoolInfo>> {
    let items: Vec<SpoolItem> = serde_json::from_value(envelope.data.clone())
        .map_err(|e| ClientError::Malformed(format!("unexpected spool listing shape: {}", e)))?;
    Ok(items
        .into_iter()
        .map(|item| SpoolInfo {
            id: item.id,
            stepname: item.stepname,
            ddname: item.ddname,
            procstep: item.procstep.filter(|p| !p.is_empty()),
            record_count: item.record_count,
        })
        .collect())
}

fn parse_status(envelope: &ResponseEnvelope) -> String {
    // zosmf check status reports {"zosmf_running": ..} variants across
    // versions; fall back to the human message
    envelope
        .data
        .get("status")
        .and_then(|v| v.as_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| {
            if envelope.success {
                "active".to_string()
            } else {
                "inactive".to_string()
            }
        })
}

fn parse_token(envelope: &ResponseEnvelope) -> ClientResult<String> {
    if let Some(token) = envelope.data.get("tokenValue").and_then(|v| v.as_str()) {
        return Ok(token.to_string());
    }
    let token = envelope.stdout.trim();
    if token.is_empty() {
        Err(ClientError::Malformed(
            "login succeeded but no token was returned".to_string(),
        ))
    } else {
        Ok(token.to_string())
    }
}

impl ZosClient for ZoweCli {
    fn get_status(&self, profile: &ConnectionProfile) -> ClientResult<String> {
        let envelope = self.run(profile, &["zosmf", "check", "status"])?;
        Ok(parse_status(&envelope))
    }

    fn list_data_sets(
        &self,
        profile: &ConnectionProfile,
        pattern: &str,
    ) -> ClientResult<Vec<DataSetEntry>> {
        let envelope = self.run(
            profile,
            &["zos-files", "list", "data-set", pattern, "--attributes"],
        )?;
        parse_data_set_listing(&envelope)
    }

    fn list_members(
        &self,
        profile: &ConnectionProfile,
        dataset: &str,
    ) -> ClientResult<Vec<MemberEntry>> {
        let envelope = self.run(profile, &["zos-files", "list", "all-members", dataset])?;
        parse_member_listing(&envelope)
    }

    fn list_uss_files(
        &self,
        profile: &ConnectionProfile,
        path: &str,
    ) -> ClientResult<Vec<UssEntry>> {
        let envelope = self.run(profile, &["zos-files", "list", "uss-files", path])?;
        parse_uss_listing(&envelope)
    }

    fn list_jobs(
        &self,
        profile: &ConnectionProfile,
        owner: &str,
        prefix: &str,
        status: &str,
    ) -> ClientResult<Vec<JobInfo>> {
        let envelope = self.run(
            profile,
            &[
                "zos-jobs", "list", "jobs", "--owner", owner, "--prefix", prefix,
            ],
        )?;
        let mut jobs = parse_job_listing(&envelope)?;
        // The CLI has no status filter; apply it client-side
        if !status.is_empty() && status != "*" {
            let wanted = status.to_uppercase();
            jobs.retain(|job| job.status.to_uppercase() == wanted);
        }
        Ok(jobs)
    }

    fn list_spool_files(
        &self,
        profile: &ConnectionProfile,
        _jobname: &str,
        jobid: &str,
    ) -> ClientResult<Vec<SpoolInfo>> {
        let envelope = self.run(
            profile,
            &["zos-jobs", "list", "spool-files-by-jobid", jobid],
        )?;
        parse_spool_listing(&envelope)
    }

    fn read_data_set(&self, profile: &ConnectionProfile, name: &str) -> ClientResult<String> {
        let envelope = self.run(profile, &["zos-files", "view", "data-set", name])?;
        Ok(envelope.stdout)
    }

    fn read_uss_file(&self, profile: &ConnectionProfile, path: &str) -> ClientResult<String> {
        let envelope = self.run(profile, &["zos-files", "view", "uss-file", path])?;
        Ok(envelope.stdout)
    }

    fn read_spool_file(
        &self,
        profile: &ConnectionProfile,
        jobid: &str,
        spool_id: i64,
    ) -> ClientResult<String> {
        let spool_id = spool_id.to_string();
        let envelope = self.run(
            profile,
            &[
                "zos-jobs",
                "view",
                "spool-file-by-id",
                jobid,
                &spool_id,
            ],
        )?;
        Ok(envelope.stdout)
    }

    fn login(&self, profile: &ConnectionProfile) -> ClientResult<String> {
        let envelope = self.run(profile, &["auth", "login", "apiml", "--show-token"])?;
        parse_token(&envelope)
    }

    fn logout(&self, profile: &ConnectionProfile) -> ClientResult<()> {
        self.run(profile, &["auth", "logout", "apiml"])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        let input = "\x1b[32mactive\x1b[0m";
        assert_eq!(strip_ansi(input), "active");
    }

    #[test]
    fn test_parse_data_set_listing() {
        let stdout = r#"{
            "success": true,
            "exitCode": 0,
            "message": "",
            "stdout": "",
            "stderr": "",
            "data": {
                "apiResponse": {
                    "items": [
                        {"dsname": "IBMUSER.SRC", "dsorg": "PO", "vol": "WRKD01"},
                        {"dsname": "IBMUSER.LOG", "dsorg": "PS"},
                        {"dsname": "IBMUSER.MIGRAT"}
                    ]
                }
            }
        }"#;
        let envelope = parse_envelope(stdout).unwrap();
        let entries = parse_data_set_listing(&envelope).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "IBMUSER.SRC");
        assert_eq!(entries[0].organization.as_deref(), Some("PO"));
        assert_eq!(entries[2].organization, None);
    }

    #[test]
    fn test_parse_uss_listing_skips_dot_entries() {
        let stdout = r#"{
            "success": true,
            "exitCode": 0,
            "data": {
                "apiResponse": {
                    "items": [
                        {"name": ".", "mode": "drwxr-xr-x"},
                        {"name": "..", "mode": "drwxr-xr-x"},
                        {"name": "bin", "mode": "drwxr-xr-x"},
                        {"name": "profile", "mode": "-rw-r--r--"}
                    ]
                }
            }
        }"#;
        let envelope = parse_envelope(stdout).unwrap();
        let entries = parse_uss_listing(&envelope).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].directory);
        assert_eq!(entries[1].name, "profile");
        assert!(!entries[1].directory);
    }

    #[test]
    fn test_parse_job_listing_bare_array() {
        let stdout = r#"{
            "success": true,
            "exitCode": 0,
            "data": [
                {"jobname": "JOBA", "jobid": "JOB00001", "owner": "IBMUSER", "status": "OUTPUT", "retcode": "CC 0000"},
                {"jobname": "JOBB", "jobid": "JOB00002", "owner": "IBMUSER", "status": "ACTIVE", "retcode": null}
            ]
        }"#;
        let envelope = parse_envelope(stdout).unwrap();
        let jobs = parse_job_listing(&envelope).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].retcode.as_deref(), Some("CC 0000"));
        assert_eq!(jobs[1].retcode, None);
    }

    #[test]
    fn test_parse_spool_listing_record_count_key() {
        let stdout = r#"{
            "success": true,
            "exitCode": 0,
            "data": [
                {"id": 2, "stepname": "STEP1", "ddname": "SYSOUT", "procstep": "", "record-count": 120},
                {"id": 3, "stepname": "STEP1", "ddname": "SYSPRINT", "procstep": "PROC1", "record-count": 8}
            ]
        }"#;
        let envelope = parse_envelope(stdout).unwrap();
        let spools = parse_spool_listing(&envelope).unwrap();
        assert_eq!(spools[0].record_count, 120);
        assert_eq!(spools[0].procstep, None);
        assert_eq!(spools[1].procstep.as_deref(), Some("PROC1"));
    }

    #[test]
    fn test_auth_failure_classified() {
        let stdout = r#"{
            "success": false,
            "exitCode": 1,
            "message": "Rest API failure with HTTP(S) status 401",
            "stdout": "",
            "stderr": "",
            "data": {}
        }"#;
        let err = parse_envelope(stdout).unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_remote_failure_not_auth() {
        let stdout = r#"{
            "success": false,
            "exitCode": 1,
            "message": "Rest API failure with HTTP(S) status 404",
            "stderr": "data set not found",
            "data": {}
        }"#;
        let err = parse_envelope(stdout).unwrap_err();
        assert!(!err.is_auth());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_malformed_envelope() {
        let err = parse_envelope("not json at all").unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[test]
    fn test_connection_args_prefer_token() {
        let mut profile = ConnectionProfile::new("lpar1", "mf.example.com", 10443);
        profile.user = Some("ibmuser".to_string());
        profile.password = Some("secret".to_string());
        profile.token = Some("tok123".to_string());

        let args = ZoweCli::connection_args(&profile);
        assert!(args.contains(&"--token-value".to_string()));
        assert!(!args.contains(&"--password".to_string()));
    }

    #[test]
    fn test_connection_args_reject_unauthorized_off() {
        let mut profile = ConnectionProfile::new("lpar1", "mf.example.com", 10443);
        profile.reject_unauthorized = false;
        let args = ZoweCli::connection_args(&profile);
        let position = args.iter().position(|a| a == "--ru").unwrap();
        assert_eq!(args[position + 1], "false");
    }
}
