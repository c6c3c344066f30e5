//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! App is intentionally lean - it coordinates between components but
//! does not contain business logic itself.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_main_screen, ContentDialog, CredentialDialog, DetailComponent, ExplorerComponent,
    ExplorerRenderContext, FilterDialog, HelpDialog, ProfileDialog, QuitDialog, SearchDialog,
    SortDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{
    BrowseHistory, ConnectionProfile, JobInfo, NodeId, NodeKind, ProfileStateStore, ResourceTree,
    SessionFilter, TreeKind, TreeNode,
};
use crate::services::{
    self, search, CheckProgress, CredentialInput, ProbeHandle, SessionValidator, ZosClient, ZoweCli,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};
use std::path::PathBuf;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Loaded configuration, or defaults when no config file exists
    pub config: Config,

    /// Per-profile validation state
    pub store: ProfileStateStore,

    /// Connection check driver
    pub validator: SessionValidator,

    /// Remote access client
    pub client: Arc<dyn ZosClient + Send + Sync>,

    /// One resource tree per tab
    pub data_sets: ResourceTree,
    pub uss: ResourceTree,
    pub jobs: ResourceTree,

    /// Persisted search and opened-item history
    pub history: BrowseHistory,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// In-flight connection probe, at most one at a time
    pub probe: Option<ProbeHandle>,

    /// Node waiting for a connection check to settle before it expands
    pub pending_expand: Option<(TreeKind, NodeId)>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    /// Pending external editor file path (set by OpenEditor action, handled by main loop)
    pub pending_editor_file: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub explorer: ExplorerComponent,
    pub detail: DetailComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub search_dialog: SearchDialog,
    pub profile_dialog: ProfileDialog,
    pub sort_dialog: SortDialog,
    pub credential_dialog: CredentialDialog,
    pub filter_dialog: FilterDialog,
    pub content_dialog: ContentDialog,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App instance
    pub fn new() -> App {
        let config = Config::load().unwrap_or_default();
        let client: Arc<dyn ZosClient + Send + Sync> =
            Arc::new(ZoweCli::new(config.zowe_binary_path.clone()));
        Self::with_client(config, client)
    }

    pub fn with_client(config: Config, client: Arc<dyn ZosClient + Send + Sync>) -> App {
        App {
            validator: SessionValidator::new(Arc::clone(&client)),
            client,
            config,
            store: ProfileStateStore::new(),
            data_sets: ResourceTree::new(),
            uss: ResourceTree::new(),
            jobs: ResourceTree::new(),
            history: BrowseHistory::load(),
            modals: ModalStack::new(),
            probe: None,
            pending_expand: None,
            should_quit: false,
            error: None,
            status_message: None,
            pending_editor_file: None,
            // Components
            explorer: ExplorerComponent::new(),
            detail: DetailComponent::new(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
            search_dialog: SearchDialog::new(),
            profile_dialog: ProfileDialog::new(),
            sort_dialog: SortDialog::new(),
            credential_dialog: CredentialDialog::new(),
            filter_dialog: FilterDialog::new(),
            content_dialog: ContentDialog::new(),
        }
    }

    fn tree(&self, kind: TreeKind) -> &ResourceTree {
        match kind {
            TreeKind::DataSets => &self.data_sets,
            TreeKind::Uss => &self.uss,
            TreeKind::Jobs => &self.jobs,
        }
    }

    fn tree_mut(&mut self, kind: TreeKind) -> &mut ResourceTree {
        match kind {
            TreeKind::DataSets => &mut self.data_sets,
            TreeKind::Uss => &mut self.uss,
            TreeKind::Jobs => &mut self.jobs,
        }
    }

    fn active_tree(&self) -> &ResourceTree {
        self.tree(self.explorer.active_tab)
    }

    /// Split borrow so the explorer can mutate while reading a tree
    fn tree_and_explorer(&mut self, kind: TreeKind) -> (&ResourceTree, &mut ExplorerComponent) {
        let tree = match kind {
            TreeKind::DataSets => &self.data_sets,
            TreeKind::Uss => &self.uss,
            TreeKind::Jobs => &self.jobs,
        };
        (tree, &mut self.explorer)
    }

    fn selected_id(&self) -> Option<NodeId> {
        self.explorer.selected_node(self.active_tree())
    }

    /// Profile name of the session containing the selected node
    fn selected_session_profile(&self) -> Option<String> {
        let tree = self.active_tree();
        let id = self.selected_id()?;
        let session = tree.session_of(id)?;
        match &tree.get(session)?.kind {
            NodeKind::Session { profile_name, .. } => Some(profile_name.clone()),
            _ => None,
        }
    }

    /// Add a session for `profile` to all three trees with default filters
    pub fn add_session(&mut self, profile: &ConnectionProfile) {
        let user = profile.user.clone().unwrap_or_default();
        let ds_pattern = if user.is_empty() {
            format!("{}.*", profile.name.to_uppercase())
        } else {
            format!("{}.*", user.to_uppercase())
        };
        let uss_path = if user.is_empty() {
            "/".to_string()
        } else {
            format!("/u/{}", user.to_lowercase())
        };
        let owner = if user.is_empty() {
            "*".to_string()
        } else {
            user.to_uppercase()
        };

        let filters = [
            (TreeKind::DataSets, SessionFilter::DataSetPattern(ds_pattern)),
            (TreeKind::Uss, SessionFilter::UssPath(uss_path)),
            (
                TreeKind::Jobs,
                SessionFilter::Jobs {
                    owner,
                    prefix: "*".to_string(),
                    status: "*".to_string(),
                },
            ),
        ];

        for (kind, filter) in filters {
            let tree = self.tree_mut(kind);
            if tree.find_session(&profile.name).is_none() {
                tree.add_root(TreeNode::new(
                    profile.name.clone(),
                    NodeKind::Session {
                        profile_name: profile.name.clone(),
                        filter,
                    },
                ));
            }
        }
        self.status_message = Some(format!("Added session '{}'", profile.name));
    }

    /// Start or resume the connection check that gates a session expansion
    fn activate_session(&mut self, kind: TreeKind, id: NodeId) {
        let profile_name = match self.tree(kind).get(id).map(|n| &n.kind) {
            Some(NodeKind::Session { profile_name, .. }) => profile_name.clone(),
            _ => return,
        };

        // A second Enter on an open session collapses it
        if self.tree(kind).get(id).is_some_and(|n| n.expanded) {
            if let Some(node) = self.tree_mut(kind).get_mut(id) {
                node.expanded = false;
            }
            return;
        }

        let mut profile = match self.config.profile(&profile_name) {
            Some(p) => p.clone(),
            None => {
                self.error = Some(format!("Profile '{}' not found in config", profile_name));
                return;
            }
        };

        let progress = self.validator.begin_check(&mut self.store, &mut profile);
        self.handle_check_progress(progress, kind, id, &profile_name);
    }

    fn handle_check_progress(
        &mut self,
        progress: CheckProgress,
        kind: TreeKind,
        id: NodeId,
        profile_name: &str,
    ) {
        match progress {
            CheckProgress::NeedsCredentials => {
                let user = self
                    .config
                    .profile(profile_name)
                    .and_then(|p| p.user.clone())
                    .unwrap_or_default();
                self.credential_dialog.open(profile_name, &user);
                self.pending_expand = Some((kind, id));
                self.modals.push(Modal::Credentials {
                    profile_name: profile_name.to_string(),
                });
            }
            CheckProgress::Probing(handle) => {
                self.probe = Some(handle);
                self.pending_expand = Some((kind, id));
                self.modals.push(Modal::Probing {
                    profile_name: profile_name.to_string(),
                });
            }
            CheckProgress::Done(validity) => {
                self.pending_expand = None;
                if validity.is_usable() {
                    self.expand_node(kind, id);
                } else {
                    self.error = Some(format!(
                        "Connection '{}' is {}",
                        profile_name,
                        validity.label()
                    ));
                }
            }
        }
    }

    /// Expand a container node, fetching its children if they are stale
    fn expand_node(&mut self, kind: TreeKind, id: NodeId) {
        let (is_container, dirty) = match self.tree(kind).get(id) {
            Some(node) => (node.kind.is_container(), node.dirty),
            None => return,
        };
        if !is_container {
            return;
        }
        if let Some(node) = self.tree_mut(kind).get_mut(id) {
            node.expanded = true;
        }
        if dirty {
            self.load_children(kind, id);
        }
    }

    /// Fetch and reconcile the children of a container node
    fn load_children(&mut self, kind: TreeKind, id: NodeId) {
        let profile = {
            let tree = self.tree(kind);
            let session = tree.session_of(id);
            let name = session.and_then(|s| match &tree.get(s)?.kind {
                NodeKind::Session { profile_name, .. } => Some(profile_name.clone()),
                _ => None,
            });
            match name.and_then(|n| self.config.profile(&n).cloned()) {
                Some(p) => p,
                None => return,
            }
        };

        let node_kind = match self.tree(kind).get(id) {
            Some(node) => node.kind.clone(),
            None => return,
        };

        let outcome = match &node_kind {
            NodeKind::Session { filter, .. } => match filter {
                SessionFilter::DataSetPattern(pattern) => self
                    .client
                    .list_data_sets(&profile, pattern)
                    .map(|entries| {
                        services::reconcile_data_sets(&mut self.data_sets, id, entries)
                    }),
                SessionFilter::UssPath(path) => {
                    let path = path.clone();
                    self.client.list_uss_files(&profile, &path).map(|entries| {
                        services::reconcile_uss(&mut self.uss, id, &path, entries)
                    })
                }
                SessionFilter::Jobs {
                    owner,
                    prefix,
                    status,
                } => {
                    let sort = self.config.job_sort;
                    self.client
                        .list_jobs(&profile, owner, prefix, status)
                        .map(|entries| services::reconcile_jobs(&mut self.jobs, id, entries, sort))
                }
            },
            NodeKind::DataSet { name, .. } => {
                let name = name.clone();
                self.client.list_members(&profile, &name).map(|entries| {
                    services::reconcile_members(&mut self.data_sets, id, &name, entries)
                })
            }
            NodeKind::UssDir { .. } => {
                let path = match self.tree(kind).get(id).and_then(|n| n.uss_path()) {
                    Some(p) => p,
                    None => return,
                };
                self.client.list_uss_files(&profile, &path).map(|entries| {
                    services::reconcile_uss(&mut self.uss, id, &path, entries)
                })
            }
            NodeKind::Job(job) => self
                .client
                .list_spool_files(&profile, &job.jobname, &job.jobid)
                .map(|entries| services::reconcile_spools(&mut self.jobs, id, entries)),
            _ => return,
        };

        if let Err(error) = outcome {
            self.report_client_error(kind, id, error);
        }
    }

    /// Fetch and show the content of a leaf node
    fn open_content(&mut self, kind: TreeKind, id: NodeId) {
        let profile = {
            let tree = self.tree(kind);
            let session = tree.session_of(id);
            let name = session.and_then(|s| match &tree.get(s)?.kind {
                NodeKind::Session { profile_name, .. } => Some(profile_name.clone()),
                _ => None,
            });
            match name.and_then(|n| self.config.profile(&n).cloned()) {
                Some(p) => p,
                None => return,
            }
        };

        let node = match self.tree(kind).get(id) {
            Some(node) => node.clone(),
            None => return,
        };

        let fetched = match &node.kind {
            NodeKind::DataSet { name, .. } => self
                .client
                .read_data_set(&profile, name)
                .map(|content| (name.clone(), content)),
            NodeKind::Member { dataset, name } => {
                let qualified = format!("{}({})", dataset, name);
                self.client
                    .read_data_set(&profile, &qualified)
                    .map(|content| (qualified, content))
            }
            NodeKind::UssFile { .. } => match node.uss_path() {
                Some(path) => self
                    .client
                    .read_uss_file(&profile, &path)
                    .map(|content| (path, content)),
                None => return,
            },
            NodeKind::Spool(spool) => {
                let jobid = self
                    .tree(kind)
                    .get(id)
                    .and_then(|n| n.parent)
                    .and_then(|p| self.tree(kind).get(p))
                    .and_then(|parent| match &parent.kind {
                        NodeKind::Job(job) => Some(job.jobid.clone()),
                        _ => None,
                    });
                match jobid {
                    Some(jobid) => self
                        .client
                        .read_spool_file(&profile, &jobid, spool.id)
                        .map(|content| (format!("{} - {}", jobid, node.label), content)),
                    None => return,
                }
            }
            _ => return,
        };

        match fetched {
            Ok((title, content)) => {
                if let Some(display) = search::display_for(self.tree(kind), id) {
                    self.history.add_opened_item(&display);
                    if let Err(error) = self.history.save() {
                        tracing::warn!(%error, "failed to save history");
                    }
                }
                self.content_dialog.open(&title, &content);
                self.modals.push(Modal::Content { title });
            }
            Err(error) => self.report_client_error(kind, id, error),
        }
    }

    /// Route a client error: auth failures reopen the credential prompt,
    /// everything else surfaces in the status area.
    fn report_client_error(
        &mut self,
        kind: TreeKind,
        id: NodeId,
        error: crate::services::ClientError,
    ) {
        if let Some(node) = self.tree_mut(kind).get_mut(id) {
            node.dirty = true;
        }
        if error.is_auth() {
            if let Some(profile_name) = {
                let tree = self.tree(kind);
                tree.session_of(id).and_then(|s| match &tree.get(s)?.kind {
                    NodeKind::Session { profile_name, .. } => Some(profile_name.clone()),
                    _ => None,
                })
            } {
                self.store.remove_stale(&profile_name);
                let user = self
                    .config
                    .profile(&profile_name)
                    .and_then(|p| p.user.clone())
                    .unwrap_or_default();
                self.credential_dialog.open(&profile_name, &user);
                self.pending_expand = Some((kind, id));
                self.modals.push(Modal::Credentials { profile_name });
                return;
            }
        }
        self.error = Some(error.to_string());
    }

    /// Dispatch Enter on the selected node
    fn activate_selected(&mut self) {
        let kind = self.explorer.active_tab;
        let id = match self.selected_id() {
            Some(id) => id,
            None => return,
        };
        let node_kind = match self.tree(kind).get(id) {
            Some(node) => node.kind.clone(),
            None => return,
        };
        match node_kind {
            NodeKind::Session { .. } => self.activate_session(kind, id),
            kind_inner if kind_inner.is_container() => {
                if self.tree(kind).get(id).is_some_and(|n| n.expanded) {
                    if let Some(node) = self.tree_mut(kind).get_mut(id) {
                        node.expanded = false;
                    }
                } else {
                    self.expand_node(kind, id);
                }
            }
            NodeKind::Placeholder => {}
            _ => self.open_content(kind, id),
        }
    }

    /// Expand or collapse the selected container without opening leaves
    fn toggle_selected(&mut self) {
        let kind = self.explorer.active_tab;
        let id = match self.selected_id() {
            Some(id) => id,
            None => return,
        };
        let node = match self.tree(kind).get(id) {
            Some(node) => node,
            None => return,
        };
        if !node.kind.is_container() {
            return;
        }
        if matches!(node.kind, NodeKind::Session { .. }) && !node.expanded {
            self.activate_session(kind, id);
            return;
        }
        if node.expanded {
            if let Some(node) = self.tree_mut(kind).get_mut(id) {
                node.expanded = false;
            }
        } else {
            self.expand_node(kind, id);
        }
    }

    /// Refetch the selected container's listing
    fn refresh_selected(&mut self) {
        let kind = self.explorer.active_tab;
        let id = match self.selected_id() {
            Some(id) => id,
            None => return,
        };
        let is_container = self
            .tree(kind)
            .get(id)
            .is_some_and(|n| n.kind.is_container());
        if !is_container {
            return;
        }
        if let Some(node) = self.tree_mut(kind).get_mut(id) {
            node.dirty = true;
            node.expanded = true;
        }
        self.load_children(kind, id);
    }

    /// Remove the selected node's session from every tree
    fn remove_selected_session(&mut self) {
        let profile_name = match self.selected_session_profile() {
            Some(name) => name,
            None => return,
        };
        for kind in TreeKind::all() {
            let tree = self.tree_mut(kind);
            if let Some(session) = tree.find_session(&profile_name) {
                tree.remove_subtree(session);
            }
        }
        self.status_message = Some(format!("Removed session '{}'", profile_name));
    }

    fn toggle_validation(&mut self) {
        let profile_name = match self.selected_session_profile() {
            Some(name) => name,
            None => return,
        };
        let enabled = !self.store.validation_enabled(&profile_name);
        self.store.set_validation_enabled(&profile_name, enabled);
        self.status_message = Some(format!(
            "Connection validation {} for '{}'",
            if enabled { "enabled" } else { "disabled" },
            profile_name
        ));
    }

    fn login_selected(&mut self) {
        let profile_name = match self.selected_session_profile() {
            Some(name) => name,
            None => return,
        };
        let profile = match self.config.profile(&profile_name) {
            Some(p) => p.clone(),
            None => return,
        };
        match self.client.login(&profile) {
            Ok(token) => {
                if let Some(profile) = self.config.profile_mut(&profile_name) {
                    profile.token = Some(token);
                }
                self.status_message = Some(format!("Logged in to '{}'", profile_name));
            }
            Err(error) => self.error = Some(error.to_string()),
        }
    }

    fn logout_selected(&mut self) {
        let profile_name = match self.selected_session_profile() {
            Some(name) => name,
            None => return,
        };
        let profile = match self.config.profile(&profile_name) {
            Some(p) => p.clone(),
            None => return,
        };
        if let Err(error) = self.client.logout(&profile) {
            tracing::warn!(profile = %profile_name, %error, "logout failed");
        }
        if let Some(profile) = self.config.profile_mut(&profile_name) {
            profile.token = None;
        }
        self.store.remove_stale(&profile_name);
        self.status_message = Some(format!("Logged out of '{}'", profile_name));
    }

    /// Jump to a search or history entry, opening leaf content
    fn jump_to_entry(&mut self, display: &str) {
        let parsed = match search::parse_entry(display) {
            Some(parsed) => parsed,
            None => {
                self.error = Some(format!("Unrecognized entry: {}", display));
                return;
            }
        };
        let resolved = search::resolve(&self.data_sets, &self.uss, &parsed);
        let (kind, id) = match resolved {
            Some(found) => found,
            None => {
                self.status_message = Some(format!("'{}' is not loaded in the tree", display));
                return;
            }
        };
        self.explorer.active_tab = kind;
        self.tree_mut(kind).expand_to(id);
        let (tree, explorer) = self.tree_and_explorer(kind);
        explorer.select_node(tree, id);

        let is_leaf = tree.get(id).is_some_and(|n| !n.kind.is_container());
        if is_leaf {
            self.open_content(kind, id);
        }
    }

    /// Re-sort every loaded job listing under the current configuration
    fn resort_jobs(&mut self) {
        let sort = self.config.job_sort;
        let sessions: Vec<NodeId> = self.jobs.roots().to_vec();
        for session in sessions {
            let children = match self.jobs.get(session) {
                Some(node) if !node.dirty => node.children.clone(),
                _ => continue,
            };
            let fetched: Vec<JobInfo> = children
                .iter()
                .filter_map(|&id| match self.jobs.get(id).map(|n| &n.kind) {
                    Some(NodeKind::Job(job)) => Some(job.clone()),
                    _ => None,
                })
                .collect();
            if !fetched.is_empty() {
                services::reconcile_jobs(&mut self.jobs, session, fetched, sort);
            }
        }
    }

    fn cancel_probe(&mut self) {
        if let Some(handle) = self.probe.take() {
            handle.cancel();
        }
        if matches!(self.modals.top(), Some(Modal::Probing { .. })) {
            self.modals.pop();
        }
        self.pending_expand = None;
        self.status_message = Some("Connection check cancelled".to_string());
    }

    fn poll_probe(&mut self) {
        let result = match &self.probe {
            Some(handle) => handle.try_result(),
            None => return,
        };
        let result = match result {
            Some(result) => result,
            None => return,
        };
        self.probe = None;
        let profile_name = result.profile_name.clone();
        let validity =
            self.validator
                .finish_probe(&mut self.store, &profile_name, result.outcome);
        if matches!(self.modals.top(), Some(Modal::Probing { .. })) {
            self.modals.pop();
        }
        if validity.is_usable() {
            if let Some((kind, id)) = self.pending_expand.take() {
                self.expand_node(kind, id);
            }
        } else {
            self.pending_expand = None;
            self.error = Some(format!(
                "Connection '{}' is {}",
                profile_name,
                validity.label()
            ));
        }
    }

    /// Resolve the dialog that settles the top modal's Enter
    fn confirm_top_modal(&mut self) {
        let modal = match self.modals.top().cloned() {
            Some(modal) => modal,
            None => return,
        };
        match modal {
            Modal::Credentials { profile_name } => {
                self.modals.pop();
                let input = CredentialInput::Provided {
                    user: self.credential_dialog.user().to_string(),
                    password: self.credential_dialog.password().to_string(),
                };
                let mut profile = match self.config.profile(&profile_name) {
                    Some(p) => p.clone(),
                    None => return,
                };
                let progress = self
                    .validator
                    .resume_check(&mut self.store, &mut profile, input);
                // Keep the entered credentials for later fetches
                if let Some(stored) = self.config.profile_mut(&profile_name) {
                    stored.user = profile.user.clone();
                    stored.password = profile.password.clone();
                }
                if let Some((kind, id)) = self.pending_expand {
                    self.handle_check_progress(progress, kind, id, &profile_name);
                }
            }
            Modal::SearchAll => {
                let query = self.search_dialog.query().to_string();
                let selected = self.search_dialog.selected_item().map(|s| s.to_string());
                self.modals.pop();
                if !query.is_empty() {
                    self.history.add_search_pattern(&query);
                    if let Err(error) = self.history.save() {
                        tracing::warn!(%error, "failed to save history");
                    }
                }
                if let Some(display) = selected {
                    self.jump_to_entry(&display);
                }
            }
            Modal::RecentItems => {
                let selected = self.search_dialog.selected_item().map(|s| s.to_string());
                self.modals.pop();
                if let Some(display) = selected {
                    self.jump_to_entry(&display);
                }
            }
            Modal::ProfileSelector => {
                let selected = self.profile_dialog.selected_profile().map(|s| s.to_string());
                self.modals.pop();
                if let Some(name) = selected {
                    if let Some(profile) = self.config.profile(&name).cloned() {
                        self.add_session(&profile);
                    }
                }
            }
            Modal::SortOptions => {
                self.modals.pop();
                self.config.job_sort = self.sort_dialog.selected_sort();
                self.resort_jobs();
                if let Err(error) = self.config.save() {
                    tracing::warn!(%error, "failed to save config");
                }
            }
            Modal::FilterInput => {
                self.modals.pop();
                self.apply_filter(self.filter_dialog.filter());
            }
            _ => {}
        }
    }

    /// Replace the selected session's filter and refetch its listing
    fn apply_filter(&mut self, filter: SessionFilter) {
        let kind = self.explorer.active_tab;
        let session = match self
            .selected_id()
            .and_then(|id| self.tree(kind).session_of(id))
        {
            Some(session) => session,
            None => return,
        };
        if let Some(node) = self.tree_mut(kind).get_mut(session) {
            if let NodeKind::Session { filter: current, .. } = &mut node.kind {
                *current = filter.clone();
            }
        }
        if let SessionFilter::DataSetPattern(pattern) = &filter {
            self.history.add_search_pattern(pattern);
            if let Err(error) = self.history.save() {
                tracing::warn!(%error, "failed to save history");
            }
        }
        if let Some(node) = self.tree_mut(kind).get_mut(session) {
            node.dirty = true;
        }
        if self.tree(kind).get(session).is_some_and(|n| n.expanded) {
            self.load_children(kind, session);
        }
    }

    fn close_top_modal(&mut self) {
        match self.modals.top().cloned() {
            Some(Modal::Credentials { profile_name }) => {
                self.modals.pop();
                self.pending_expand = None;
                if let Some(mut profile) = self.config.profile(&profile_name).cloned() {
                    self.validator.resume_check(
                        &mut self.store,
                        &mut profile,
                        CredentialInput::Cancelled,
                    );
                }
            }
            Some(Modal::Probing { .. }) => self.cancel_probe(),
            _ => {
                self.modals.pop();
            }
        }
    }

    /// Stage the content viewer's text for the external editor
    fn open_in_editor(&mut self) {
        let title = match self.modals.top() {
            Some(Modal::Content { title }) => title.clone(),
            _ => return,
        };
        let safe: String = title
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            })
            .collect();
        let path = std::env::temp_dir().join(format!("zos-tui-{}.txt", safe));
        match std::fs::write(&path, self.content_dialog.content()) {
            Ok(()) => self.pending_editor_file = Some(path),
            Err(error) => self.error = Some(format!("Failed to stage file for editor: {}", error)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        let profiles = self.config.profiles.clone();
        for profile in &profiles {
            self.add_session(profile);
        }
        self.status_message = None;
        if !self.data_sets.roots().is_empty() {
            self.explorer.select_first(&self.data_sets);
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }
        self.explorer.handle_key_event(key)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.poll_probe();
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation (delegate to ExplorerComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextItem => {
                let (tree, explorer) = self.tree_and_explorer(self.explorer.active_tab);
                explorer.next(tree);
            }
            Action::PrevItem => {
                let (tree, explorer) = self.tree_and_explorer(self.explorer.active_tab);
                explorer.previous(tree);
            }
            Action::NextTab => self.explorer.next_tab(),
            Action::PrevTab => self.explorer.previous_tab(),
            Action::FirstItem => {
                let (tree, explorer) = self.tree_and_explorer(self.explorer.active_tab);
                explorer.select_first(tree);
            }
            Action::LastItem => {
                let (tree, explorer) = self.tree_and_explorer(self.explorer.active_tab);
                explorer.select_last(tree);
            }

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (delegate to DetailComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                self.detail.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Tree Operations
            // ─────────────────────────────────────────────────────────────────
            Action::ActivateItem => self.activate_selected(),
            Action::ToggleExpand => self.toggle_selected(),
            Action::RefreshNode => self.refresh_selected(),
            Action::RemoveSession => self.remove_selected_session(),
            Action::ToggleValidation => self.toggle_validation(),
            Action::Login => self.login_selected(),
            Action::Logout => self.logout_selected(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help { scroll_offset: 0 });
            }
            Action::OpenSearchAll => {
                let entries = search::collect_loaded(&self.data_sets, &self.uss);
                if entries.is_empty() {
                    self.status_message = Some("No items are loaded in the tree.".to_string());
                } else {
                    let displays: Vec<String> =
                        entries.into_iter().map(|entry| entry.display).collect();
                    self.search_dialog.open("Search", displays);
                    self.modals.push(Modal::SearchAll);
                }
            }
            Action::OpenRecentItems => {
                let items: Vec<String> = self
                    .history
                    .opened_items
                    .iter()
                    .map(|entry| entry.value.clone())
                    .collect();
                if items.is_empty() {
                    self.status_message = Some("No recently opened items.".to_string());
                } else {
                    self.search_dialog.open("Recent Items", items);
                    self.modals.push(Modal::RecentItems);
                }
            }
            Action::OpenProfileSelector => {
                let available: Vec<String> = self
                    .config
                    .profiles
                    .iter()
                    .filter(|p| self.data_sets.find_session(&p.name).is_none())
                    .map(|p| p.name.clone())
                    .collect();
                self.profile_dialog.set_profiles(available);
                self.modals.push(Modal::ProfileSelector);
            }
            Action::OpenSortDialog => {
                self.sort_dialog.set_sort(self.config.job_sort);
                self.modals.push(Modal::SortOptions);
            }
            Action::OpenFilterDialog => {
                let seeded = {
                    let tree = self.active_tree();
                    self.selected_id()
                        .and_then(|id| tree.session_of(id))
                        .and_then(|session| tree.get(session))
                        .and_then(|node| match &node.kind {
                            NodeKind::Session {
                                profile_name,
                                filter,
                            } => Some((profile_name.clone(), filter.clone())),
                            _ => None,
                        })
                };
                if let Some((name, filter)) = seeded {
                    self.filter_dialog.open(&name, &filter);
                    self.modals.push(Modal::FilterInput);
                }
            }
            Action::CloseModal => self.close_top_modal(),
            Action::ConfirmModal => self.confirm_top_modal(),
            Action::CancelProbe => self.cancel_probe(),

            // Dialog-internal edits already happened in handle_key_event
            Action::ModalUp
            | Action::ModalDown
            | Action::ModalInput(_)
            | Action::ModalBackspace
            | Action::ModalNextField => {}

            // ─────────────────────────────────────────────────────────────────
            // Editor
            // ─────────────────────────────────────────────────────────────────
            Action::OpenEditor => self.open_in_editor(),
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let tree = match self.explorer.active_tab {
            TreeKind::DataSets => &self.data_sets,
            TreeKind::Uss => &self.uss,
            TreeKind::Jobs => &self.jobs,
        };
        let ctx = ExplorerRenderContext {
            tree,
            store: &self.store,
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
        };
        draw_main_screen(frame, area, &mut self.explorer, &mut self.detail, &ctx)?;

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
            Modal::SearchAll | Modal::RecentItems => self.search_dialog.handle_key_event(key),
            Modal::Credentials { .. } => self.credential_dialog.handle_key_event(key),
            Modal::ProfileSelector => self.profile_dialog.handle_key_event(key),
            Modal::SortOptions => self.sort_dialog.handle_key_event(key),
            Modal::FilterInput => self.filter_dialog.handle_key_event(key),
            Modal::Content { .. } => self.content_dialog.handle_key_event(key),
            Modal::Probing { .. } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CancelProbe),
                    _ => None,
                };
                Ok(action)
            }
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help { .. } => self.help_dialog.draw(frame, area)?,
            Modal::SearchAll | Modal::RecentItems => self.search_dialog.draw(frame, area)?,
            Modal::Credentials { .. } => self.credential_dialog.draw(frame, area)?,
            Modal::ProfileSelector => self.profile_dialog.draw(frame, area)?,
            Modal::SortOptions => self.sort_dialog.draw(frame, area)?,
            Modal::FilterInput => self.filter_dialog.draw(frame, area)?,
            Modal::Content { .. } => self.content_dialog.draw(frame, area)?,
            Modal::Probing { profile_name } => {
                self.draw_probing(frame, area, profile_name)?;
            }
        }
        Ok(())
    }

    /// Draw the connection probe overlay
    fn draw_probing(&self, frame: &mut Frame, area: Rect, profile_name: &str) -> Result<()> {
        use crate::components::centered_popup;
        use ratatui::style::{Color, Modifier, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::{Block, Borders, Clear, Paragraph};

        let popup_area = centered_popup(area, 46, 7);
        frame.render_widget(Clear, popup_area);

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Checking connection to '{}'...", profile_name),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " Esc ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Cancel"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Connecting ")
                    .title_style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::testing::StubClient;

    fn app_with_profile() -> App {
        let mut config = Config::default();
        config.profiles.push(ConnectionProfile::new(
            "lpar1",
            "mainframe.example.com",
            443,
        ));
        App::with_client(
            config,
            Arc::new(StubClient::with_status(Ok("active".to_string()))),
        )
    }

    #[test]
    fn test_init_adds_sessions_to_all_trees() {
        let mut app = app_with_profile();
        app.init().unwrap();
        assert!(app.data_sets.find_session("lpar1").is_some());
        assert!(app.uss.find_session("lpar1").is_some());
        assert!(app.jobs.find_session("lpar1").is_some());
    }

    #[test]
    fn test_remove_session_clears_every_tree() {
        let mut app = app_with_profile();
        app.init().unwrap();
        app.explorer.select_first(&app.data_sets);
        app.remove_selected_session();
        assert!(app.data_sets.find_session("lpar1").is_none());
        assert!(app.uss.find_session("lpar1").is_none());
        assert!(app.jobs.find_session("lpar1").is_none());
    }

    #[test]
    fn test_search_with_nothing_loaded_sets_status() {
        let mut app = app_with_profile();
        app.init().unwrap();
        app.update(Action::OpenSearchAll).unwrap();
        assert!(app.modals.is_empty());
        assert_eq!(
            app.status_message.as_deref(),
            Some("No items are loaded in the tree.")
        );
    }

    #[test]
    fn test_session_without_credentials_prompts() {
        let mut app = app_with_profile();
        app.init().unwrap();
        app.explorer.select_first(&app.data_sets);
        app.update(Action::ActivateItem).unwrap();
        assert!(matches!(
            app.modals.top(),
            Some(Modal::Credentials { profile_name }) if profile_name == "lpar1"
        ));
        assert!(app.pending_expand.is_some());
    }

    #[test]
    fn test_quit_dialog_opens() {
        let mut app = app_with_profile();
        app.update(Action::OpenQuitDialog).unwrap();
        assert!(matches!(app.modals.top(), Some(Modal::QuitConfirm)));
    }
}
