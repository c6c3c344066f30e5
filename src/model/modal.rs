//! Modal stack for managing overlays
//!
//! Replaces scattered boolean flags (show_quit_confirm, show_help, etc.)
//! with a proper state machine using an enum-based modal stack.

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
    /// Search across every loaded item in all trees
    SearchAll,
    /// Recall prompt over recently opened items
    RecentItems,
    /// Username/password prompt for a profile
    Credentials { profile_name: String },
    /// Picker over configured profiles not yet added as sessions
    ProfileSelector,
    /// Job sort key and direction picker
    SortOptions,
    /// Listing filter editor for the selected session
    FilterInput,
    /// Scrollable viewer for fetched resource content
    Content { title: String },
    /// Connection probe in flight for a profile
    Probing { profile_name: String },
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    /// Create a new empty modal stack
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a modal onto the stack
    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    /// Pop the top modal from the stack
    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    /// Get a mutable reference to the top modal
    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        assert!(stack.top().is_some());

        stack.push(Modal::SearchAll);

        let top = stack.pop();
        assert_eq!(top, Some(Modal::SearchAll));

        let top = stack.pop();
        assert_eq!(top, Some(Modal::QuitConfirm));
        assert!(stack.top().is_none());
    }

    #[test]
    fn test_modal_stack_top() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));

        stack.push(Modal::Help { scroll_offset: 0 });
        assert_eq!(stack.top(), Some(&Modal::Help { scroll_offset: 0 }));
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Help { scroll_offset: 0 });

        if let Some(Modal::Help { scroll_offset }) = stack.top_mut() {
            *scroll_offset = 2;
        }

        assert_eq!(stack.top(), Some(&Modal::Help { scroll_offset: 2 }));
    }
}
