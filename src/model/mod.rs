//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `ProfileStateStore` - connection profiles and their validation state
//! - `ResourceTree` - arena-backed trees of mainframe resources
//! - `BrowseHistory` - persisted search patterns and opened items
//! - `ModalStack` - modal overlay management

pub mod history;
pub mod job;
pub mod modal;
pub mod node;
pub mod profile;

// Re-export commonly used types
pub use history::BrowseHistory;
pub use job::{JobInfo, JobSortKey, NodeSort, SortDirection, SpoolInfo};
pub use modal::{Modal, ModalStack};
pub use node::{
    DataSetOrg, NodeId, NodeKind, ResourceTree, SessionFilter, TreeKind, TreeNode,
};
pub use profile::{ConnectionProfile, ProfileStateStore, ProfileValidity, ValidationStatus};
