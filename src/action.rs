//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for background polling
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next row in the tree
    NextItem,
    /// Move to previous row in the tree
    PrevItem,
    /// Move to next tree tab
    NextTab,
    /// Move to previous tree tab
    PrevTab,
    /// Jump to first row
    FirstItem,
    /// Jump to last row
    LastItem,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll detail panel up one line
    ScrollUp,
    /// Scroll detail panel down one line
    ScrollDown,
    /// Scroll detail panel up one page
    PageUp,
    /// Scroll detail panel down one page
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Tree Operations
    // ─────────────────────────────────────────────────────────────────────────
    /// Activate the selected row (expand a container, open a leaf)
    ActivateItem,
    /// Collapse or expand the selected container without fetching
    ToggleExpand,
    /// Refetch the selected container's children
    RefreshNode,
    /// Remove the selected session from all trees
    RemoveSession,
    /// Toggle validation for the selected session's profile
    ToggleValidation,
    /// Log in to obtain a token for the selected session's profile
    Login,
    /// Log out and drop the token for the selected session's profile
    Logout,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open search over all loaded items
    OpenSearchAll,
    /// Open recall prompt over recently opened items
    OpenRecentItems,
    /// Open profile picker for adding a session
    OpenProfileSelector,
    /// Open job sort options dialog
    OpenSortDialog,
    /// Open listing filter editor for the selected session
    OpenFilterDialog,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Navigate up in modal (e.g., previous option)
    ModalUp,
    /// Navigate down in modal (e.g., next option)
    ModalDown,
    /// Add character to the focused modal input
    ModalInput(char),
    /// Remove last character from the focused modal input
    ModalBackspace,
    /// Move focus to the next modal field
    ModalNextField,
    /// Cancel the probe behind the probing modal
    CancelProbe,

    // ─────────────────────────────────────────────────────────────────────────
    // Editor
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the viewed content in external $EDITOR
    OpenEditor,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::ActivateItem => write!(f, "ActivateItem"),
            Action::ToggleExpand => write!(f, "ToggleExpand"),
            Action::RefreshNode => write!(f, "RefreshNode"),
            Action::RemoveSession => write!(f, "RemoveSession"),
            Action::ToggleValidation => write!(f, "ToggleValidation"),
            Action::Login => write!(f, "Login"),
            Action::Logout => write!(f, "Logout"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenSearchAll => write!(f, "OpenSearchAll"),
            Action::OpenRecentItems => write!(f, "OpenRecentItems"),
            Action::OpenProfileSelector => write!(f, "OpenProfileSelector"),
            Action::OpenSortDialog => write!(f, "OpenSortDialog"),
            Action::OpenFilterDialog => write!(f, "OpenFilterDialog"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::ModalInput(c) => write!(f, "ModalInput('{}')", c),
            Action::ModalBackspace => write!(f, "ModalBackspace"),
            Action::ModalNextField => write!(f, "ModalNextField"),
            Action::CancelProbe => write!(f, "CancelProbe"),
            Action::OpenEditor => write!(f, "OpenEditor"),
        }
    }
}
