//! Explorer component - Main application screen
//!
//! Displays the tree tabs, tree rows, detail panel, status bar, and help
//! bar. Owns navigation state and the current tab.

use crate::action::Action;
use crate::component::Component;
use crate::components::calculate_main_layout;
use crate::model::node::{NodeId, NodeKind, ResourceTree, TreeKind};
use crate::model::profile::{ProfileStateStore, ValidationStatus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Explorer Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Explorer component for the main application view
/// Owns navigation state and handles tree interactions
pub struct ExplorerComponent {
    /// Current active tree tab
    pub active_tab: TreeKind,

    /// List selection state
    pub list_state: ListState,
}

impl Default for ExplorerComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerComponent {
    pub fn new() -> Self {
        Self {
            active_tab: TreeKind::DataSets,
            list_state: ListState::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch to the next tab
    pub fn next_tab(&mut self) {
        let tabs = TreeKind::all();
        let current_index = tabs.iter().position(|t| *t == self.active_tab).unwrap_or(0);
        self.active_tab = tabs[(current_index + 1) % tabs.len()];
        self.list_state.select(Some(0));
    }

    /// Switch to the previous tab
    pub fn previous_tab(&mut self) {
        let tabs = TreeKind::all();
        let current_index = tabs.iter().position(|t| *t == self.active_tab).unwrap_or(0);
        let prev_index = if current_index == 0 {
            tabs.len() - 1
        } else {
            current_index - 1
        };
        self.active_tab = tabs[prev_index];
        self.list_state.select(Some(0));
    }

    /// Select next row, wrapping at the end
    pub fn next(&mut self, tree: &ResourceTree) {
        let rows = tree.visible_rows();
        if rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((current + 1) % rows.len()));
    }

    /// Select previous row, wrapping at the start
    pub fn previous(&mut self, tree: &ResourceTree) {
        let rows = tree.visible_rows();
        if rows.is_empty() {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let prev = if current == 0 {
            rows.len() - 1
        } else {
            current - 1
        };
        self.list_state.select(Some(prev));
    }

    pub fn select_first(&mut self, tree: &ResourceTree) {
        if tree.visible_rows().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self, tree: &ResourceTree) {
        let rows = tree.visible_rows();
        if rows.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(rows.len() - 1));
        }
    }

    /// The node id of the currently selected row
    pub fn selected_node(&self, tree: &ResourceTree) -> Option<NodeId> {
        let rows = tree.visible_rows();
        let index = self.list_state.selected()?;
        rows.get(index).map(|&(id, _)| id)
    }

    /// Move the selection onto a node, assuming its ancestors are expanded
    pub fn select_node(&mut self, tree: &ResourceTree, id: NodeId) {
        let rows = tree.visible_rows();
        if let Some(index) = rows.iter().position(|&(row_id, _)| row_id == id) {
            self.list_state.select(Some(index));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for ExplorerComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),

            // Scrolling (with Ctrl for detail panel)
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollDown)
            }
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollUp)
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),

            // Tree operations
            KeyCode::Enter => Some(Action::ActivateItem),
            KeyCode::Char(' ') => Some(Action::ToggleExpand),
            KeyCode::Char('r') => Some(Action::RefreshNode),
            KeyCode::Char('x') => Some(Action::RemoveSession),
            KeyCode::Char('v') => Some(Action::ToggleValidation),
            KeyCode::Char('L') => Some(Action::Login),
            KeyCode::Char('O') => Some(Action::Logout),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('/') => Some(Action::OpenSearchAll),
            KeyCode::Char('h') => Some(Action::OpenRecentItems),
            KeyCode::Char('a') => Some(Action::OpenProfileSelector),
            KeyCode::Char('s') => Some(Action::OpenSortDialog),
            KeyCode::Char('p') => Some(Action::OpenFilterDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        // Updates are handled by App which has access to the trees
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_main_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the main screen
pub struct ExplorerRenderContext<'a> {
    pub tree: &'a ResourceTree,
    pub store: &'a ProfileStateStore,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

/// Draw the main screen
pub fn draw_main_screen(
    frame: &mut Frame,
    area: Rect,
    explorer: &mut ExplorerComponent,
    detail: &mut crate::components::DetailComponent,
    ctx: &ExplorerRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area, true);

    render_tabs(frame, layout.tabs, explorer);
    render_tree(frame, layout.tree, explorer, ctx);

    let node = explorer
        .selected_node(ctx.tree)
        .and_then(|id| ctx.tree.get(id))
        .cloned();
    detail.set_node(node.as_ref());
    detail.draw(frame, layout.detail)?;

    if let Some(status_area) = layout.status {
        render_status_bar(frame, status_area, ctx);
    }
    render_help_bar(frame, layout.help);

    Ok(())
}

fn render_tabs(frame: &mut Frame, area: Rect, explorer: &ExplorerComponent) {
    let all_tabs = TreeKind::all();
    let titles: Vec<&str> = all_tabs.iter().map(|t| t.name()).collect();
    let selected = all_tabs
        .iter()
        .position(|t| *t == explorer.active_tab)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Glyph showing a session profile's last validation verdict
fn session_glyph(store: &ProfileStateStore, profile_name: &str) -> (&'static str, Color) {
    if !store.validation_enabled(profile_name) {
        return ("⊘", Color::DarkGray);
    }
    match store.status(profile_name) {
        Some(ValidationStatus::Active) => ("✓", Color::Green),
        Some(ValidationStatus::Inactive) => ("✗", Color::Red),
        Some(ValidationStatus::Unverified) | None => ("?", Color::Yellow),
    }
}

fn render_tree(
    frame: &mut Frame,
    area: Rect,
    explorer: &mut ExplorerComponent,
    ctx: &ExplorerRenderContext,
) {
    let rows = ctx.tree.visible_rows();
    let max_width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .filter_map(|&(id, depth)| {
            let node = ctx.tree.get(id)?;
            let indent = "  ".repeat(depth);

            let spans = match &node.kind {
                NodeKind::Session { profile_name, filter } => {
                    let (glyph, color) = session_glyph(ctx.store, profile_name);
                    vec![
                        Span::styled(format!("{} ", glyph), Style::default().fg(color)),
                        Span::styled(
                            profile_name.clone(),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  {}", truncated(&filter.summary(), max_width)),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]
                }
                NodeKind::Placeholder => {
                    vec![
                        Span::raw(indent),
                        Span::styled(node.label.clone(), Style::default().fg(Color::DarkGray)),
                    ]
                }
                kind => {
                    let marker = if kind.is_container() {
                        if node.expanded {
                            "▾ "
                        } else {
                            "▸ "
                        }
                    } else {
                        "  "
                    };
                    vec![
                        Span::raw(indent),
                        Span::styled(marker, Style::default().fg(Color::DarkGray)),
                        Span::styled(format!("{} ", kind.icon()), Style::default().fg(Color::Yellow)),
                        Span::styled(
                            truncated(&node.label, max_width),
                            Style::default().fg(Color::White),
                        ),
                    ]
                }
            };
            Some(ListItem::new(Line::from(spans)))
        })
        .collect();

    let title = format!(" {} ({}) ", explorer.active_tab.name(), rows.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut explorer.list_state);
}

/// Truncate a label to fit the tree column
fn truncated(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        if out.width() + 1 >= max_width {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &ExplorerRenderContext) {
    let mut spans = vec![];

    if let Some(error) = ctx.error {
        spans.push(Span::styled(
            format!(" Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled(
            " q ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Quit "),
        Span::styled(
            " Enter ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Open "),
        Span::styled(
            " r ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Refresh "),
        Span::styled(
            " / ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Search "),
        Span::styled(
            " h ",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Recent "),
        Span::styled(
            " a ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Add Session "),
        Span::styled(
            " p ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Filter "),
        Span::styled(
            " s ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Sort "),
        Span::styled(
            " v ",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Validation "),
        Span::styled(
            " ? ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Help"),
    ];

    let paragraph =
        Paragraph::new(Line::from(help_spans)).alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}
