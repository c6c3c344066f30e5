//! Resource tree - arena-backed tree of mainframe resources
//!
//! Each tree (data sets, USS, jobs) owns its nodes in a flat indexed store.
//! Nodes reference their parent by index, so there are no ownership cycles;
//! removing a subtree frees the slots for reuse.

use crate::model::job::{JobInfo, SpoolInfo};

/// Index of a node in its owning `ResourceTree`.
///
/// Stable for the lifetime of the node: reconciliation updates matched nodes
/// in place and never reallocates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Which of the three resource trees a node lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    DataSets,
    Uss,
    Jobs,
}

impl TreeKind {
    pub fn all() -> [TreeKind; 3] {
        [TreeKind::DataSets, TreeKind::Uss, TreeKind::Jobs]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TreeKind::DataSets => "Data Sets",
            TreeKind::Uss => "USS Files",
            TreeKind::Jobs => "Jobs",
        }
    }
}

/// Listing filter carried by a session node
#[derive(Debug, Clone, PartialEq)]
pub enum SessionFilter {
    /// DSN pattern, e.g. `IBMUSER.*`
    DataSetPattern(String),
    /// Starting directory for USS listings
    UssPath(String),
    /// Owner/prefix/status filter for the jobs listing
    Jobs {
        owner: String,
        prefix: String,
        status: String,
    },
}

impl SessionFilter {
    /// One-line summary shown on the session row.
    pub fn summary(&self) -> String {
        match self {
            SessionFilter::DataSetPattern(pattern) => pattern.clone(),
            SessionFilter::UssPath(path) => path.clone(),
            SessionFilter::Jobs {
                owner,
                prefix,
                status,
            } => format!("Owner:{} Prefix:{} Status:{}", owner, prefix, status),
        }
    }
}

/// Data set organization as reported by the catalog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSetOrg {
    Sequential,
    Partitioned,
    Vsam,
    Unknown,
}

impl DataSetOrg {
    pub fn from_dsorg(dsorg: Option<&str>) -> DataSetOrg {
        match dsorg {
            Some("PS") | Some("PS-E") => DataSetOrg::Sequential,
            Some("PO") | Some("PO-E") => DataSetOrg::Partitioned,
            Some("VS") => DataSetOrg::Vsam,
            _ => DataSetOrg::Unknown,
        }
    }

    /// Partitioned data sets are the only ones with member children.
    pub fn has_members(&self) -> bool {
        matches!(self, DataSetOrg::Partitioned)
    }
}

/// Per-kind payload of a tree node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Session {
        profile_name: String,
        filter: SessionFilter,
    },
    DataSet {
        name: String,
        org: DataSetOrg,
    },
    Member {
        dataset: String,
        name: String,
    },
    UssDir {
        parent_path: String,
        name: String,
    },
    UssFile {
        parent_path: String,
        name: String,
    },
    Job(JobInfo),
    Spool(SpoolInfo),
    /// Non-actionable row shown when a listing comes back empty
    Placeholder,
}

impl NodeKind {
    /// Containers fetch children on expansion; leaves open content.
    pub fn is_container(&self) -> bool {
        match self {
            NodeKind::Session { .. } | NodeKind::UssDir { .. } | NodeKind::Job(_) => true,
            NodeKind::DataSet { org, .. } => org.has_members(),
            _ => false,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NodeKind::Session { .. } => "⌂",
            NodeKind::DataSet { org, .. } if org.has_members() => "▤",
            NodeKind::DataSet { .. } => "≡",
            NodeKind::Member { .. } => "·",
            NodeKind::UssDir { .. } => "▸",
            NodeKind::UssFile { .. } => "·",
            NodeKind::Job(_) => "◈",
            NodeKind::Spool(_) => "·",
            NodeKind::Placeholder => " ",
        }
    }
}

/// A node in a resource tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub expanded: bool,
    /// Set when the children need refetching on next expansion
    pub dirty: bool,
}

impl TreeNode {
    pub fn new(label: String, kind: NodeKind) -> Self {
        Self {
            label,
            kind,
            parent: None,
            children: Vec::new(),
            expanded: false,
            dirty: true,
        }
    }

    /// Full USS path of this node, when it is a USS directory or file.
    pub fn uss_path(&self) -> Option<String> {
        match &self.kind {
            NodeKind::UssDir { parent_path, name } | NodeKind::UssFile { parent_path, name } => {
                if parent_path == "/" {
                    Some(format!("/{}", name))
                } else {
                    Some(format!("{}/{}", parent_path, name))
                }
            }
            NodeKind::Session {
                filter: SessionFilter::UssPath(path),
                ..
            } => Some(path.clone()),
            _ => None,
        }
    }
}

/// Arena-backed tree. Slots of removed nodes are reused.
#[derive(Debug, Default)]
pub struct ResourceTree {
    slots: Vec<Option<TreeNode>>,
    free: Vec<usize>,
    roots: Vec<NodeId>,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: TreeNode) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Add a session root.
    pub fn add_root(&mut self, node: TreeNode) -> NodeId {
        let id = self.insert(node);
        self.roots.push(id);
        id
    }

    /// Add a child under `parent`, appended to its child list.
    pub fn add_child(&mut self, parent: NodeId, mut node: TreeNode) -> NodeId {
        node.parent = Some(parent);
        let id = self.insert(node);
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(id);
        }
        id
    }

    /// Create a node parented to `parent` without linking it into the child
    /// list. Reconciliation builds the child list separately.
    pub fn add_detached(&mut self, parent: NodeId, mut node: TreeNode) -> NodeId {
        node.parent = Some(parent);
        self.insert(node)
    }

    /// Replace a node's child list. Callers are responsible for freeing any
    /// children dropped from the old list.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        if let Some(node) = self.get_mut(parent) {
            node.children = children;
        }
    }

    /// Free a node and its whole subtree. Does not touch the parent's child
    /// list; use `remove_subtree` for that.
    pub fn free_subtree(&mut self, id: NodeId) {
        let children = match self.slots.get_mut(id.0).and_then(|slot| slot.take()) {
            Some(node) => node.children,
            None => return,
        };
        self.free.push(id.0);
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Detach a node from its parent (or the root list) and free its subtree.
    pub fn remove_subtree(&mut self, id: NodeId) {
        let parent = self.get(id).and_then(|n| n.parent);
        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.get_mut(parent_id) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
        self.free_subtree(id);
    }

    /// The session root owning a node.
    pub fn session_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = self.get(current)?;
            match node.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Session root for a profile name.
    pub fn find_session(&self, profile_name: &str) -> Option<NodeId> {
        self.roots.iter().copied().find(|&id| {
            matches!(
                self.get(id).map(|n| &n.kind),
                Some(NodeKind::Session { profile_name: p, .. }) if p == profile_name
            )
        })
    }

    /// Expand every ancestor of `id` so the node is visible.
    pub fn expand_to(&mut self, id: NodeId) {
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(ancestor) = current {
            if let Some(node) = self.get_mut(ancestor) {
                node.expanded = true;
                current = node.parent;
            } else {
                break;
            }
        }
    }

    /// Depth-first list of visible rows: every root, plus the children of
    /// expanded nodes, with their indent depth.
    pub fn visible_rows(&self) -> Vec<(NodeId, usize)> {
        let mut rows = Vec::new();
        for &root in &self.roots {
            self.push_visible(root, 0, &mut rows);
        }
        rows
    }

    fn push_visible(&self, id: NodeId, depth: usize, rows: &mut Vec<(NodeId, usize)>) {
        let Some(node) = self.get(id) else {
            return;
        };
        rows.push((id, depth));
        if node.expanded {
            for &child in &node.children {
                self.push_visible(child, depth + 1, rows);
            }
        }
    }

    /// Walk the whole tree, visiting every live node.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                out.push(id);
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(profile: &str) -> TreeNode {
        TreeNode::new(
            profile.to_string(),
            NodeKind::Session {
                profile_name: profile.to_string(),
                filter: SessionFilter::DataSetPattern("IBMUSER.*".to_string()),
            },
        )
    }

    fn data_set(name: &str) -> TreeNode {
        TreeNode::new(
            name.to_string(),
            NodeKind::DataSet {
                name: name.to_string(),
                org: DataSetOrg::Partitioned,
            },
        )
    }

    fn member(dataset: &str, name: &str) -> TreeNode {
        TreeNode::new(
            name.to_string(),
            NodeKind::Member {
                dataset: dataset.to_string(),
                name: name.to_string(),
            },
        )
    }

    #[test]
    fn test_add_and_walk() {
        let mut tree = ResourceTree::new();
        let root = tree.add_root(session("lpar1"));
        let ds = tree.add_child(root, data_set("IBMUSER.SRC"));
        let m = tree.add_child(ds, member("IBMUSER.SRC", "MAIN"));

        assert_eq!(tree.walk(), vec![root, ds, m]);
        assert_eq!(tree.get(m).unwrap().parent, Some(ds));
        assert_eq!(tree.session_of(m), Some(root));
    }

    #[test]
    fn test_visible_rows_respect_expansion() {
        let mut tree = ResourceTree::new();
        let root = tree.add_root(session("lpar1"));
        let ds = tree.add_child(root, data_set("IBMUSER.SRC"));
        tree.add_child(ds, member("IBMUSER.SRC", "MAIN"));

        // Collapsed root shows only itself
        assert_eq!(tree.visible_rows(), vec![(root, 0)]);

        tree.get_mut(root).unwrap().expanded = true;
        assert_eq!(tree.visible_rows(), vec![(root, 0), (ds, 1)]);

        tree.get_mut(ds).unwrap().expanded = true;
        assert_eq!(tree.visible_rows().len(), 3);
    }

    #[test]
    fn test_remove_subtree_frees_slots() {
        let mut tree = ResourceTree::new();
        let root = tree.add_root(session("lpar1"));
        let ds = tree.add_child(root, data_set("IBMUSER.SRC"));
        let m = tree.add_child(ds, member("IBMUSER.SRC", "MAIN"));

        tree.remove_subtree(ds);
        assert!(tree.get(ds).is_none());
        assert!(tree.get(m).is_none());
        assert!(tree.get(root).unwrap().children.is_empty());

        // Freed slots are reused
        let reused = tree.add_child(root, data_set("IBMUSER.NEW"));
        assert!(reused == ds || reused == m);
    }

    #[test]
    fn test_remove_root_detaches_from_root_list() {
        let mut tree = ResourceTree::new();
        let a = tree.add_root(session("lpar1"));
        let b = tree.add_root(session("lpar2"));

        tree.remove_subtree(a);
        assert_eq!(tree.roots(), &[b]);
        assert!(tree.find_session("lpar1").is_none());
        assert_eq!(tree.find_session("lpar2"), Some(b));
    }

    #[test]
    fn test_expand_to_opens_ancestors() {
        let mut tree = ResourceTree::new();
        let root = tree.add_root(session("lpar1"));
        let ds = tree.add_child(root, data_set("IBMUSER.SRC"));
        let m = tree.add_child(ds, member("IBMUSER.SRC", "MAIN"));

        tree.expand_to(m);
        assert!(tree.get(root).unwrap().expanded);
        assert!(tree.get(ds).unwrap().expanded);
        assert!(tree.visible_rows().contains(&(m, 2)));
    }

    #[test]
    fn test_uss_path_root_join() {
        let dir = TreeNode::new(
            "u".to_string(),
            NodeKind::UssDir {
                parent_path: "/".to_string(),
                name: "u".to_string(),
            },
        );
        assert_eq!(dir.uss_path(), Some("/u".to_string()));

        let file = TreeNode::new(
            "profile".to_string(),
            NodeKind::UssFile {
                parent_path: "/u/ibmuser".to_string(),
                name: "profile".to_string(),
            },
        );
        assert_eq!(file.uss_path(), Some("/u/ibmuser/profile".to_string()));
    }
}
