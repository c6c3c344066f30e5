//! Batch job and spool file data, and the job sort order

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A batch job as returned by the jobs listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub jobname: String,
    pub jobid: String,
    pub owner: String,
    pub status: String,
    /// Completion code, absent while the job is still running
    pub retcode: Option<String>,
}

impl JobInfo {
    /// Display label: `JOBNAME(JOBID) - RETCODE` with the status standing in
    /// for jobs that have not completed.
    pub fn label(&self) -> String {
        format!(
            "{}({}) - {}",
            self.jobname,
            self.jobid,
            self.retcode.as_deref().unwrap_or(&self.status)
        )
    }

    /// Text used when sorting by return code.
    fn result_text(&self) -> &str {
        self.retcode.as_deref().unwrap_or(&self.status)
    }

    /// Identity used for matching across refreshes. Status and retcode are
    /// display fields and never part of identity.
    pub fn identity(&self) -> (&str, &str) {
        (&self.jobname, &self.jobid)
    }
}

/// A spool output file of a batch job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolInfo {
    pub id: i64,
    pub stepname: String,
    pub ddname: String,
    pub procstep: Option<String>,
    pub record_count: i64,
}

impl SpoolInfo {
    /// Display label: `STEP:DD - PROCSTEP`, falling back to the record count
    /// when the spool file has no procstep.
    pub fn label(&self) -> String {
        match &self.procstep {
            Some(procstep) => format!("{}:{} - {}", self.stepname, self.ddname, procstep),
            None => format!("{}:{} - {}", self.stepname, self.ddname, self.record_count),
        }
    }

    /// Identity is (stepname, ddname, procstep). The record count grows as the
    /// job writes output, so it is excluded; a growing spool file keeps its node.
    pub fn identity(&self) -> (&str, &str, Option<&str>) {
        (&self.stepname, &self.ddname, self.procstep.as_deref())
    }
}

/// Sort key for job children of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSortKey {
    Id,
    ReturnCode,
    Owner,
    Name,
}

impl JobSortKey {
    pub fn all() -> [JobSortKey; 4] {
        [
            JobSortKey::Id,
            JobSortKey::ReturnCode,
            JobSortKey::Owner,
            JobSortKey::Name,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobSortKey::Id => "Job ID",
            JobSortKey::ReturnCode => "Return Code",
            JobSortKey::Owner => "Owner",
            JobSortKey::Name => "Job Name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    pub fn toggled(&self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort configuration for job sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSort {
    pub key: JobSortKey,
    pub direction: SortDirection,
}

impl Default for NodeSort {
    fn default() -> Self {
        Self {
            key: JobSortKey::Id,
            direction: SortDirection::Ascending,
        }
    }
}

/// Compare two jobs under the given sort configuration.
///
/// Equal primary projections fall through to job id, so the order is a strict
/// total order for jobs with distinct ids. The direction flip applies to the
/// whole comparison, tiebreak included.
pub fn compare_jobs(a: &JobInfo, b: &JobInfo, sort: NodeSort) -> Ordering {
    let primary = match sort.key {
        JobSortKey::Id => a.jobid.cmp(&b.jobid),
        JobSortKey::ReturnCode => a.result_text().cmp(b.result_text()),
        JobSortKey::Owner => a.owner.cmp(&b.owner),
        JobSortKey::Name => a.jobname.cmp(&b.jobname),
    };

    let ordering = if primary == Ordering::Equal {
        a.jobid.cmp(&b.jobid)
    } else {
        primary
    };

    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, id: &str, owner: &str, status: &str, retcode: Option<&str>) -> JobInfo {
        JobInfo {
            jobname: name.to_string(),
            jobid: id.to_string(),
            owner: owner.to_string(),
            status: status.to_string(),
            retcode: retcode.map(|r| r.to_string()),
        }
    }

    #[test]
    fn test_label_uses_retcode_over_status() {
        let done = job("PAYROLL", "JOB00123", "IBMUSER", "OUTPUT", Some("CC 0000"));
        assert_eq!(done.label(), "PAYROLL(JOB00123) - CC 0000");

        let running = job("PAYROLL", "JOB00124", "IBMUSER", "ACTIVE", None);
        assert_eq!(running.label(), "PAYROLL(JOB00124) - ACTIVE");
    }

    #[test]
    fn test_spool_label_procstep_fallback() {
        let with_proc = SpoolInfo {
            id: 2,
            stepname: "STEP1".to_string(),
            ddname: "SYSOUT".to_string(),
            procstep: Some("PROC1".to_string()),
            record_count: 40,
        };
        assert_eq!(with_proc.label(), "STEP1:SYSOUT - PROC1");

        let without = SpoolInfo {
            id: 3,
            stepname: "STEP1".to_string(),
            ddname: "SYSPRINT".to_string(),
            procstep: None,
            record_count: 17,
        };
        assert_eq!(without.label(), "STEP1:SYSPRINT - 17");
    }

    #[test]
    fn test_sort_by_return_code_with_status_fallback() {
        let a = job("JOBA", "JOB00001", "U1", "ACTIVE", None);
        let b = job("JOBB", "JOB00002", "U1", "OUTPUT", Some("CC 0000"));

        // "ACTIVE" < "CC 0000" lexicographically
        let sort = NodeSort {
            key: JobSortKey::ReturnCode,
            direction: SortDirection::Ascending,
        };
        assert_eq!(compare_jobs(&a, &b, sort), Ordering::Less);
    }

    #[test]
    fn test_equal_key_falls_through_to_jobid() {
        let a = job("SAME", "JOB00002", "U1", "OUTPUT", Some("CC 0000"));
        let b = job("SAME", "JOB00001", "U1", "OUTPUT", Some("CC 0000"));

        let asc = NodeSort {
            key: JobSortKey::Name,
            direction: SortDirection::Ascending,
        };
        assert_eq!(compare_jobs(&a, &b, asc), Ordering::Greater);

        let desc = NodeSort {
            key: JobSortKey::Name,
            direction: SortDirection::Descending,
        };
        assert_eq!(compare_jobs(&a, &b, desc), Ordering::Less);
    }

    #[test]
    fn test_strict_total_order_for_distinct_ids() {
        let jobs = vec![
            job("JOBB", "JOB00003", "U2", "OUTPUT", Some("CC 0000")),
            job("JOBA", "JOB00001", "U1", "OUTPUT", Some("CC 0000")),
            job("JOBA", "JOB00002", "U1", "ACTIVE", None),
        ];

        for sort_key in JobSortKey::all() {
            let sort = NodeSort {
                key: sort_key,
                direction: SortDirection::Ascending,
            };
            for a in &jobs {
                for b in &jobs {
                    let ab = compare_jobs(a, b, sort);
                    let ba = compare_jobs(b, a, sort);
                    if a.jobid == b.jobid {
                        assert_eq!(ab, Ordering::Equal);
                    } else {
                        // Never equal, and antisymmetric
                        assert_ne!(ab, Ordering::Equal);
                        assert_eq!(ab, ba.reverse());
                    }
                }
            }
        }
    }

    #[test]
    fn test_sorted_by_id_ascending() {
        let mut jobs = vec![
            job("JOBC", "JOB00003", "U1", "ACTIVE", None),
            job("JOBA", "JOB00001", "U1", "OUTPUT", Some("CC 0000")),
            job("JOBB", "JOB00002", "U1", "OUTPUT", Some("ABEND S0C4")),
        ];
        jobs.sort_by(|a, b| compare_jobs(a, b, NodeSort::default()));

        let ids: Vec<&str> = jobs.iter().map(|j| j.jobid.as_str()).collect();
        assert_eq!(ids, vec!["JOB00001", "JOB00002", "JOB00003"]);
    }
}
