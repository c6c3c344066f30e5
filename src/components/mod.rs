//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod content_dialog;
pub mod credential_dialog;
pub mod detail;
pub mod explorer;
pub mod filter_dialog;
pub mod help_dialog;
pub mod layout;
pub mod profile_dialog;
pub mod quit_dialog;
pub mod search_dialog;
pub mod sort_dialog;

pub use content_dialog::ContentDialog;
pub use credential_dialog::CredentialDialog;
pub use detail::DetailComponent;
pub use explorer::{draw_main_screen, ExplorerComponent, ExplorerRenderContext};
pub use filter_dialog::FilterDialog;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use profile_dialog::ProfileDialog;
pub use quit_dialog::QuitDialog;
pub use search_dialog::SearchDialog;
pub use sort_dialog::SortDialog;
