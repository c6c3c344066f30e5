//! Search across loaded tree items
//!
//! Collects every loaded data set, member and USS file into display strings
//! like `[lpar1]: IBMUSER.SRC(MAIN)`. The same strings are persisted as
//! recently-opened history, so a parser turns a string back into a tree
//! location when one is picked later.

use crate::model::node::{NodeId, NodeKind, ResourceTree, TreeKind};

/// One searchable row
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    pub display: String,
    pub tree: TreeKind,
    pub node: NodeId,
}

/// Display string for a node, when the node kind is searchable.
pub fn display_for(tree: &ResourceTree, id: NodeId) -> Option<String> {
    let node = tree.get(id)?;
    let session = tree.session_of(id)?;
    let session_name = match tree.get(session).map(|n| &n.kind) {
        Some(NodeKind::Session { profile_name, .. }) => profile_name.clone(),
        _ => return None,
    };
    match &node.kind {
        NodeKind::DataSet { name, .. } => Some(format!("[{}]: {}", session_name, name)),
        NodeKind::Member { dataset, name } => {
            Some(format!("[{}]: {}({})", session_name, dataset, name))
        }
        NodeKind::UssFile { .. } | NodeKind::UssDir { .. } => {
            node.uss_path().map(|path| format!("[{}]: {}", session_name, path))
        }
        _ => None,
    }
}

/// Every searchable row currently loaded in the data set and USS trees.
pub fn collect_loaded(data_sets: &ResourceTree, uss: &ResourceTree) -> Vec<SearchEntry> {
    let mut entries = Vec::new();
    for (tree, kind) in [(data_sets, TreeKind::DataSets), (uss, TreeKind::Uss)] {
        for id in tree.walk() {
            if let Some(display) = display_for(tree, id) {
                entries.push(SearchEntry {
                    display,
                    tree: kind,
                    node: id,
                });
            }
        }
    }
    entries
}

/// A display string parsed back into its parts
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub session: String,
    pub resource: ParsedResource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResource {
    DataSet { name: String },
    Member { dataset: String, member: String },
    UssPath { path: String },
}

/// Parse a `[session]: resource` display string. Returns None when the
/// string does not follow the format.
pub fn parse_entry(display: &str) -> Option<ParsedEntry> {
    let rest = display.strip_prefix('[')?;
    let close = rest.find("]: ")?;
    let session = &rest[..close];
    let resource = &rest[close + 3..];
    if session.is_empty() || resource.is_empty() {
        return None;
    }

    let resource = if resource.starts_with('/') {
        ParsedResource::UssPath {
            path: resource.to_string(),
        }
    } else if let Some(open) = resource.find('(') {
        let member = resource[open + 1..].strip_suffix(')')?;
        if member.is_empty() {
            return None;
        }
        ParsedResource::Member {
            dataset: resource[..open].to_string(),
            member: member.to_string(),
        }
    } else {
        ParsedResource::DataSet {
            name: resource.to_string(),
        }
    };

    Some(ParsedEntry {
        session: session.to_string(),
        resource,
    })
}

/// Find the tree node a parsed entry refers to, if it is still loaded.
pub fn resolve(
    data_sets: &ResourceTree,
    uss: &ResourceTree,
    parsed: &ParsedEntry,
) -> Option<(TreeKind, NodeId)> {
    match &parsed.resource {
        ParsedResource::DataSet { name } => {
            let session = data_sets.find_session(&parsed.session)?;
            find_under(data_sets, session, |kind| {
                matches!(kind, NodeKind::DataSet { name: n, .. } if n == name)
            })
            .map(|id| (TreeKind::DataSets, id))
        }
        ParsedResource::Member { dataset, member } => {
            let session = data_sets.find_session(&parsed.session)?;
            find_under(data_sets, session, |kind| {
                matches!(
                    kind,
                    NodeKind::Member { dataset: d, name: n } if d == dataset && n == member
                )
            })
            .map(|id| (TreeKind::DataSets, id))
        }
        ParsedResource::UssPath { path } => {
            let session = uss.find_session(&parsed.session)?;
            find_under_by(uss, session, |tree, id| {
                tree.get(id).and_then(|n| n.uss_path()).as_deref() == Some(path)
            })
            .map(|id| (TreeKind::Uss, id))
        }
    }
}

fn find_under(tree: &ResourceTree, root: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
    find_under_by(tree, root, |tree, id| {
        tree.get(id).map(|n| pred(&n.kind)).unwrap_or(false)
    })
}

fn find_under_by(
    tree: &ResourceTree,
    root: NodeId,
    pred: impl Fn(&ResourceTree, NodeId) -> bool,
) -> Option<NodeId> {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if pred(tree, id) {
            return Some(id);
        }
        if let Some(node) = tree.get(id) {
            stack.extend(node.children.iter().copied());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{DataSetOrg, SessionFilter, TreeNode};

    fn build_trees() -> (ResourceTree, ResourceTree, NodeId, NodeId, NodeId) {
        let mut data_sets = ResourceTree::new();
        let ds_session = data_sets.add_root(TreeNode::new(
            "lpar1".to_string(),
            NodeKind::Session {
                profile_name: "lpar1".to_string(),
                filter: SessionFilter::DataSetPattern("IBMUSER.*".to_string()),
            },
        ));
        let ds = data_sets.add_child(
            ds_session,
            TreeNode::new(
                "IBMUSER.SRC".to_string(),
                NodeKind::DataSet {
                    name: "IBMUSER.SRC".to_string(),
                    org: DataSetOrg::Partitioned,
                },
            ),
        );
        let member = data_sets.add_child(
            ds,
            TreeNode::new(
                "MAIN".to_string(),
                NodeKind::Member {
                    dataset: "IBMUSER.SRC".to_string(),
                    name: "MAIN".to_string(),
                },
            ),
        );

        let mut uss = ResourceTree::new();
        let uss_session = uss.add_root(TreeNode::new(
            "lpar1".to_string(),
            NodeKind::Session {
                profile_name: "lpar1".to_string(),
                filter: SessionFilter::UssPath("/u/ibmuser".to_string()),
            },
        ));
        let file = uss.add_child(
            uss_session,
            TreeNode::new(
                "profile".to_string(),
                NodeKind::UssFile {
                    parent_path: "/u/ibmuser".to_string(),
                    name: "profile".to_string(),
                },
            ),
        );

        (data_sets, uss, ds, member, file)
    }

    #[test]
    fn test_collect_skips_sessions() {
        let (data_sets, uss, _, _, _) = build_trees();
        let entries = collect_loaded(&data_sets, &uss);
        let displays: Vec<&str> = entries.iter().map(|e| e.display.as_str()).collect();
        assert_eq!(
            displays,
            vec![
                "[lpar1]: IBMUSER.SRC",
                "[lpar1]: IBMUSER.SRC(MAIN)",
                "[lpar1]: /u/ibmuser/profile"
            ]
        );
    }

    #[test]
    fn test_entry_round_trip_data_set() {
        let (data_sets, uss, ds, _, _) = build_trees();
        let display = display_for(&data_sets, ds).unwrap();
        let parsed = parse_entry(&display).unwrap();
        assert_eq!(
            resolve(&data_sets, &uss, &parsed),
            Some((TreeKind::DataSets, ds))
        );
    }

    #[test]
    fn test_entry_round_trip_member() {
        let (data_sets, uss, _, member, _) = build_trees();
        let display = display_for(&data_sets, member).unwrap();
        assert_eq!(display, "[lpar1]: IBMUSER.SRC(MAIN)");
        let parsed = parse_entry(&display).unwrap();
        assert_eq!(
            resolve(&data_sets, &uss, &parsed),
            Some((TreeKind::DataSets, member))
        );
    }

    #[test]
    fn test_entry_round_trip_uss_file() {
        let (data_sets, uss, _, _, file) = build_trees();
        let display = display_for(&uss, file).unwrap();
        let parsed = parse_entry(&display).unwrap();
        assert_eq!(parsed.resource, ParsedResource::UssPath {
            path: "/u/ibmuser/profile".to_string()
        });
        assert_eq!(resolve(&data_sets, &uss, &parsed), Some((TreeKind::Uss, file)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_entry("no session").is_none());
        assert!(parse_entry("[]: IBMUSER.SRC").is_none());
        assert!(parse_entry("[lpar1]: ").is_none());
        assert!(parse_entry("[lpar1]: IBMUSER.SRC()").is_none());
    }

    #[test]
    fn test_resolve_missing_session_is_none() {
        let (data_sets, uss, _, _, _) = build_trees();
        let parsed = parse_entry("[other]: IBMUSER.SRC").unwrap();
        assert_eq!(resolve(&data_sets, &uss, &parsed), None);
    }
}
