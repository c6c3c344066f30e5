//! Tree reconciliation
//!
//! A refresh replaces a container's children with whatever the host reports,
//! but nodes that survive the refresh must keep their identity: same NodeId,
//! same expansion state, same loaded subtree. Matching is by resource
//! identity, never by list position.

use crate::model::job::{compare_jobs, JobInfo, NodeSort, SpoolInfo};
use crate::model::node::{DataSetOrg, NodeId, NodeKind, ResourceTree, TreeNode};
use crate::services::client::{DataSetEntry, MemberEntry, UssEntry};
use std::collections::HashMap;

/// Replace `parent`'s children with `fetched` jobs.
///
/// Matching is by (jobname, jobid). A matched node is updated in place so a
/// job whose status or return code changed keeps its spool subtree; jobs the
/// host no longer reports are dropped with their subtrees. Duplicate
/// identities in the fetch keep the first occurrence.
pub fn reconcile_jobs(
    tree: &mut ResourceTree,
    parent: NodeId,
    fetched: Vec<JobInfo>,
    sort: NodeSort,
) {
    let fetched = dedupe_first_wins(fetched, |job| {
        (job.jobname.clone(), job.jobid.clone())
    });

    let mut existing: HashMap<(String, String), NodeId> = HashMap::new();
    for &child in child_list(tree, parent).iter() {
        if let Some(NodeKind::Job(job)) = tree.get(child).map(|n| &n.kind) {
            existing.insert((job.jobname.clone(), job.jobid.clone()), child);
        }
    }

    let mut keep: Vec<(JobInfo, NodeId)> = Vec::new();
    let mut fresh: Vec<NodeId> = Vec::new();
    for job in fetched {
        let key = (job.jobname.clone(), job.jobid.clone());
        match existing.remove(&key) {
            Some(id) => {
                if let Some(node) = tree.get_mut(id) {
                    node.label = job.label();
                    node.kind = NodeKind::Job(job.clone());
                }
                keep.push((job, id));
            }
            None => {
                let id = tree.add_detached(parent, TreeNode::new(job.label(), NodeKind::Job(job.clone())));
                fresh.push(id);
                keep.push((job, id));
            }
        }
    }

    // Children the host no longer reports, plus any non-job rows such as a
    // previous placeholder
    for &child in child_list(tree, parent).iter() {
        let survives = keep.iter().any(|(_, id)| *id == child);
        if !survives {
            tree.free_subtree(child);
        }
    }

    let children = if keep.is_empty() {
        vec![placeholder(tree, parent, "No jobs found")]
    } else {
        keep.sort_by(|a, b| compare_jobs(&a.0, &b.0, sort));
        keep.into_iter().map(|(_, id)| id).collect()
    };
    tree.set_children(parent, children);
    finish(tree, parent, &fresh);
}

/// Replace `parent`'s children with `fetched` spool files.
///
/// Matching is by (stepname, ddname, procstep), falling back to
/// (stepname, ddname) when the fetched row carries no procstep.
pub fn reconcile_spools(tree: &mut ResourceTree, parent: NodeId, fetched: Vec<SpoolInfo>) {
    let fetched = dedupe_first_wins(fetched, |spool| {
        (
            spool.stepname.clone(),
            spool.ddname.clone(),
            spool.procstep.clone(),
        )
    });

    let mut by_full: HashMap<(String, String, Option<String>), NodeId> = HashMap::new();
    let mut by_short: HashMap<(String, String), NodeId> = HashMap::new();
    for &child in child_list(tree, parent).iter() {
        if let Some(NodeKind::Spool(spool)) = tree.get(child).map(|n| &n.kind) {
            by_full.insert(
                (
                    spool.stepname.clone(),
                    spool.ddname.clone(),
                    spool.procstep.clone(),
                ),
                child,
            );
            by_short.insert((spool.stepname.clone(), spool.ddname.clone()), child);
        }
    }

    let mut keep: Vec<NodeId> = Vec::new();
    let mut fresh: Vec<NodeId> = Vec::new();
    for spool in fetched {
        let full_key = (
            spool.stepname.clone(),
            spool.ddname.clone(),
            spool.procstep.clone(),
        );
        let matched = by_full.get(&full_key).copied().or_else(|| {
            if spool.procstep.is_none() {
                by_short
                    .get(&(spool.stepname.clone(), spool.ddname.clone()))
                    .copied()
            } else {
                None
            }
        });
        match matched.filter(|id| !keep.contains(id)) {
            Some(id) => {
                if let Some(node) = tree.get_mut(id) {
                    node.label = spool.label();
                    node.kind = NodeKind::Spool(spool);
                }
                keep.push(id);
            }
            None => {
                let id = tree.add_detached(
                    parent,
                    TreeNode::new(spool.label(), NodeKind::Spool(spool)),
                );
                fresh.push(id);
                keep.push(id);
            }
        }
    }

    for &child in child_list(tree, parent).iter() {
        if !keep.contains(&child) {
            tree.free_subtree(child);
        }
    }

    let children = if keep.is_empty() {
        vec![placeholder(tree, parent, "No spool files available")]
    } else {
        sort_by_label(tree, keep)
    };
    tree.set_children(parent, children);
    finish(tree, parent, &fresh);
}

/// Replace `parent`'s children with a USS directory listing.
///
/// Matching is by name, and only when the entry kind still agrees: a file
/// that became a directory (or the reverse) is a new node.
pub fn reconcile_uss(
    tree: &mut ResourceTree,
    parent: NodeId,
    parent_path: &str,
    fetched: Vec<UssEntry>,
) {
    let fetched = dedupe_first_wins(fetched, |entry| entry.name.clone());

    let mut existing: HashMap<(String, bool), NodeId> = HashMap::new();
    for &child in child_list(tree, parent).iter() {
        match tree.get(child).map(|n| &n.kind) {
            Some(NodeKind::UssDir { name, .. }) => {
                existing.insert((name.clone(), true), child);
            }
            Some(NodeKind::UssFile { name, .. }) => {
                existing.insert((name.clone(), false), child);
            }
            _ => {}
        }
    }

    let mut keep: Vec<NodeId> = Vec::new();
    let mut fresh: Vec<NodeId> = Vec::new();
    for entry in fetched {
        let key = (entry.name.clone(), entry.directory);
        match existing.remove(&key) {
            Some(id) => keep.push(id),
            None => {
                let kind = if entry.directory {
                    NodeKind::UssDir {
                        parent_path: parent_path.to_string(),
                        name: entry.name.clone(),
                    }
                } else {
                    NodeKind::UssFile {
                        parent_path: parent_path.to_string(),
                        name: entry.name.clone(),
                    }
                };
                let id = tree.add_detached(parent, TreeNode::new(entry.name, kind));
                fresh.push(id);
                keep.push(id);
            }
        }
    }

    for &child in child_list(tree, parent).iter() {
        if !keep.contains(&child) {
            tree.free_subtree(child);
        }
    }

    let children = if keep.is_empty() {
        vec![placeholder(tree, parent, "No files found")]
    } else {
        sort_by_label(tree, keep)
    };
    tree.set_children(parent, children);
    finish(tree, parent, &fresh);
}

/// Replace a PDS node's children with a member listing. Matching is by name.
pub fn reconcile_members(
    tree: &mut ResourceTree,
    parent: NodeId,
    dataset: &str,
    fetched: Vec<MemberEntry>,
) {
    let fetched = dedupe_first_wins(fetched, |member| member.name.clone());

    let mut existing: HashMap<String, NodeId> = HashMap::new();
    for &child in child_list(tree, parent).iter() {
        if let Some(NodeKind::Member { name, .. }) = tree.get(child).map(|n| &n.kind) {
            existing.insert(name.clone(), child);
        }
    }

    let mut keep: Vec<NodeId> = Vec::new();
    let mut fresh: Vec<NodeId> = Vec::new();
    for member in fetched {
        match existing.remove(&member.name) {
            Some(id) => keep.push(id),
            None => {
                let id = tree.add_detached(
                    parent,
                    TreeNode::new(
                        member.name.clone(),
                        NodeKind::Member {
                            dataset: dataset.to_string(),
                            name: member.name,
                        },
                    ),
                );
                fresh.push(id);
                keep.push(id);
            }
        }
    }

    for &child in child_list(tree, parent).iter() {
        if !keep.contains(&child) {
            tree.free_subtree(child);
        }
    }

    let children = if keep.is_empty() {
        vec![placeholder(tree, parent, "No members found")]
    } else {
        sort_by_label(tree, keep)
    };
    tree.set_children(parent, children);
    finish(tree, parent, &fresh);
}

/// Replace a session's children with a data set catalog listing. Matching is
/// by DSN; a matched node keeps its member subtree even if attributes moved.
pub fn reconcile_data_sets(tree: &mut ResourceTree, parent: NodeId, fetched: Vec<DataSetEntry>) {
    let fetched = dedupe_first_wins(fetched, |entry| entry.name.clone());

    let mut existing: HashMap<String, NodeId> = HashMap::new();
    for &child in child_list(tree, parent).iter() {
        if let Some(NodeKind::DataSet { name, .. }) = tree.get(child).map(|n| &n.kind) {
            existing.insert(name.clone(), child);
        }
    }

    let mut keep: Vec<NodeId> = Vec::new();
    let mut fresh: Vec<NodeId> = Vec::new();
    for entry in fetched {
        let org = DataSetOrg::from_dsorg(entry.organization.as_deref());
        match existing.remove(&entry.name) {
            Some(id) => {
                if let Some(node) = tree.get_mut(id) {
                    node.kind = NodeKind::DataSet {
                        name: entry.name.clone(),
                        org,
                    };
                }
                keep.push(id);
            }
            None => {
                let id = tree.add_detached(
                    parent,
                    TreeNode::new(
                        entry.name.clone(),
                        NodeKind::DataSet {
                            name: entry.name,
                            org,
                        },
                    ),
                );
                fresh.push(id);
                keep.push(id);
            }
        }
    }

    for &child in child_list(tree, parent).iter() {
        if !keep.contains(&child) {
            tree.free_subtree(child);
        }
    }

    let children = if keep.is_empty() {
        vec![placeholder(tree, parent, "No data sets found")]
    } else {
        sort_by_label(tree, keep)
    };
    tree.set_children(parent, children);
    finish(tree, parent, &fresh);
}

fn child_list(tree: &ResourceTree, parent: NodeId) -> Vec<NodeId> {
    tree.get(parent).map(|n| n.children.clone()).unwrap_or_default()
}

fn dedupe_first_wins<T, K: std::hash::Hash + Eq>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

fn placeholder(tree: &mut ResourceTree, parent: NodeId, message: &str) -> NodeId {
    tree.add_detached(
        parent,
        TreeNode::new(message.to_string(), NodeKind::Placeholder),
    )
}

fn sort_by_label(tree: &ResourceTree, mut ids: Vec<NodeId>) -> Vec<NodeId> {
    ids.sort_by(|a, b| {
        let la = tree.get(*a).map(|n| n.label.as_str()).unwrap_or("");
        let lb = tree.get(*b).map(|n| n.label.as_str()).unwrap_or("");
        la.cmp(lb)
    });
    ids
}

fn finish(tree: &mut ResourceTree, parent: NodeId, fresh: &[NodeId]) {
    for &id in fresh {
        if let Some(node) = tree.get_mut(id) {
            node.dirty = true;
        }
    }
    if let Some(node) = tree.get_mut(parent) {
        node.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::SessionFilter;

    fn job(jobname: &str, jobid: &str, status: &str, retcode: Option<&str>) -> JobInfo {
        JobInfo {
            jobname: jobname.to_string(),
            jobid: jobid.to_string(),
            owner: "IBMUSER".to_string(),
            status: status.to_string(),
            retcode: retcode.map(|s| s.to_string()),
        }
    }

    fn jobs_session(tree: &mut ResourceTree) -> NodeId {
        tree.add_root(TreeNode::new(
            "lpar1".to_string(),
            NodeKind::Session {
                profile_name: "lpar1".to_string(),
                filter: SessionFilter::Jobs {
                    owner: "IBMUSER".to_string(),
                    prefix: "*".to_string(),
                    status: "*".to_string(),
                },
            },
        ))
    }

    fn child_labels(tree: &ResourceTree, parent: NodeId) -> Vec<String> {
        tree.get(parent)
            .unwrap()
            .children
            .iter()
            .map(|&id| tree.get(id).unwrap().label.clone())
            .collect()
    }

    #[test]
    fn test_job_refresh_updates_drops_and_adds() {
        let mut tree = ResourceTree::new();
        let session = jobs_session(&mut tree);
        reconcile_jobs(
            &mut tree,
            session,
            vec![
                job("JOBA", "J1", "ACTIVE", None),
                job("JOBB", "J2", "ACTIVE", None),
            ],
            NodeSort::default(),
        );
        assert_eq!(
            child_labels(&tree, session),
            vec!["JOBA(J1) - ACTIVE", "JOBB(J2) - ACTIVE"]
        );

        reconcile_jobs(
            &mut tree,
            session,
            vec![
                job("JOBA", "J1", "OUTPUT", Some("CC 0000")),
                job("JOBC", "J3", "ACTIVE", None),
            ],
            NodeSort::default(),
        );
        assert_eq!(
            child_labels(&tree, session),
            vec!["JOBA(J1) - CC 0000", "JOBC(J3) - ACTIVE"]
        );
    }

    #[test]
    fn test_job_refresh_is_idempotent() {
        let mut tree = ResourceTree::new();
        let session = jobs_session(&mut tree);
        let fetched = vec![
            job("JOBA", "J1", "ACTIVE", None),
            job("JOBB", "J2", "ACTIVE", None),
        ];
        reconcile_jobs(&mut tree, session, fetched.clone(), NodeSort::default());
        let first = tree.get(session).unwrap().children.clone();

        reconcile_jobs(&mut tree, session, fetched, NodeSort::default());
        assert_eq!(tree.get(session).unwrap().children, first);
    }

    #[test]
    fn test_matched_job_keeps_id_and_spool_subtree() {
        let mut tree = ResourceTree::new();
        let session = jobs_session(&mut tree);
        reconcile_jobs(
            &mut tree,
            session,
            vec![job("JOBA", "J1", "ACTIVE", None)],
            NodeSort::default(),
        );
        let job_id = tree.get(session).unwrap().children[0];
        tree.get_mut(job_id).unwrap().expanded = true;
        reconcile_spools(
            &mut tree,
            job_id,
            vec![SpoolInfo {
                id: 2,
                stepname: "STEP1".to_string(),
                ddname: "SYSOUT".to_string(),
                procstep: None,
                record_count: 12,
            }],
        );
        let spool_id = tree.get(job_id).unwrap().children[0];

        reconcile_jobs(
            &mut tree,
            session,
            vec![job("JOBA", "J1", "OUTPUT", Some("CC 0000"))],
            NodeSort::default(),
        );
        assert_eq!(tree.get(session).unwrap().children, vec![job_id]);
        assert!(tree.get(job_id).unwrap().expanded);
        assert_eq!(tree.get(job_id).unwrap().children, vec![spool_id]);
        assert_eq!(tree.get(job_id).unwrap().label, "JOBA(J1) - CC 0000");
    }

    #[test]
    fn test_duplicate_job_identities_first_wins() {
        let mut tree = ResourceTree::new();
        let session = jobs_session(&mut tree);
        reconcile_jobs(
            &mut tree,
            session,
            vec![
                job("JOBA", "J1", "ACTIVE", None),
                job("JOBA", "J1", "OUTPUT", Some("CC 0000")),
            ],
            NodeSort::default(),
        );
        assert_eq!(child_labels(&tree, session), vec!["JOBA(J1) - ACTIVE"]);
    }

    #[test]
    fn test_empty_fetch_leaves_placeholder() {
        let mut tree = ResourceTree::new();
        let session = jobs_session(&mut tree);
        reconcile_jobs(
            &mut tree,
            session,
            vec![job("JOBA", "J1", "ACTIVE", None)],
            NodeSort::default(),
        );

        reconcile_jobs(&mut tree, session, Vec::new(), NodeSort::default());
        let children = &tree.get(session).unwrap().children;
        assert_eq!(children.len(), 1);
        assert_eq!(
            tree.get(children[0]).unwrap().kind,
            NodeKind::Placeholder
        );
        assert_eq!(tree.get(children[0]).unwrap().label, "No jobs found");
    }

    #[test]
    fn test_placeholder_replaced_on_next_fetch() {
        let mut tree = ResourceTree::new();
        let session = jobs_session(&mut tree);
        reconcile_jobs(&mut tree, session, Vec::new(), NodeSort::default());

        reconcile_jobs(
            &mut tree,
            session,
            vec![job("JOBA", "J1", "ACTIVE", None)],
            NodeSort::default(),
        );
        assert_eq!(child_labels(&tree, session), vec!["JOBA(J1) - ACTIVE"]);
    }

    #[test]
    fn test_spool_matches_without_procstep() {
        let mut tree = ResourceTree::new();
        let session = jobs_session(&mut tree);
        reconcile_jobs(
            &mut tree,
            session,
            vec![job("JOBA", "J1", "ACTIVE", None)],
            NodeSort::default(),
        );
        let job_id = tree.get(session).unwrap().children[0];

        let spool = |records| SpoolInfo {
            id: 2,
            stepname: "STEP1".to_string(),
            ddname: "SYSOUT".to_string(),
            procstep: None,
            record_count: records,
        };
        reconcile_spools(&mut tree, job_id, vec![spool(12)]);
        let spool_id = tree.get(job_id).unwrap().children[0];

        // Changed record count is an update to the same node
        reconcile_spools(&mut tree, job_id, vec![spool(99)]);
        assert_eq!(tree.get(job_id).unwrap().children, vec![spool_id]);
        assert_eq!(tree.get(spool_id).unwrap().label, "STEP1:SYSOUT - 99");
    }

    #[test]
    fn test_uss_kind_change_is_new_node() {
        let mut tree = ResourceTree::new();
        let session = tree.add_root(TreeNode::new(
            "lpar1".to_string(),
            NodeKind::Session {
                profile_name: "lpar1".to_string(),
                filter: SessionFilter::UssPath("/u/ibmuser".to_string()),
            },
        ));
        reconcile_uss(
            &mut tree,
            session,
            "/u/ibmuser",
            vec![UssEntry {
                name: "work".to_string(),
                directory: false,
            }],
        );
        let file_id = tree.get(session).unwrap().children[0];

        reconcile_uss(
            &mut tree,
            session,
            "/u/ibmuser",
            vec![UssEntry {
                name: "work".to_string(),
                directory: true,
            }],
        );
        let dir_id = tree.get(session).unwrap().children[0];
        assert_ne!(file_id, dir_id);
        assert!(matches!(
            tree.get(dir_id).unwrap().kind,
            NodeKind::UssDir { .. }
        ));
    }

    #[test]
    fn test_data_set_keeps_member_subtree_across_refresh() {
        let mut tree = ResourceTree::new();
        let session = tree.add_root(TreeNode::new(
            "lpar1".to_string(),
            NodeKind::Session {
                profile_name: "lpar1".to_string(),
                filter: SessionFilter::DataSetPattern("IBMUSER.*".to_string()),
            },
        ));
        let entry = DataSetEntry {
            name: "IBMUSER.SRC".to_string(),
            organization: Some("PO".to_string()),
            volume: None,
        };
        reconcile_data_sets(&mut tree, session, vec![entry.clone()]);
        let ds_id = tree.get(session).unwrap().children[0];
        reconcile_members(
            &mut tree,
            ds_id,
            "IBMUSER.SRC",
            vec![MemberEntry {
                name: "MAIN".to_string(),
            }],
        );
        let member_id = tree.get(ds_id).unwrap().children[0];

        reconcile_data_sets(&mut tree, session, vec![entry]);
        assert_eq!(tree.get(session).unwrap().children, vec![ds_id]);
        assert_eq!(tree.get(ds_id).unwrap().children, vec![member_id]);
    }
}
