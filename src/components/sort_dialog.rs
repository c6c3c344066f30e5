//! Job sort dialog component
//!
//! Picks the sort key for job nodes and toggles the direction. The current
//! configuration is marked so the user can see what is in effect.

use crate::action::Action;
use crate::component::Component;
use crate::model::{JobSortKey, NodeSort};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Sort options dialog for the jobs tree
pub struct SortDialog {
    current: NodeSort,
    pending: NodeSort,
    selected_index: usize,
    list_state: ListState,
}

impl Default for SortDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl SortDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            current: NodeSort::default(),
            pending: NodeSort::default(),
            selected_index: 0,
            list_state,
        }
    }

    /// Seed with the active sort before the modal opens
    pub fn set_sort(&mut self, sort: NodeSort) {
        self.current = sort;
        self.pending = sort;
        self.selected_index = JobSortKey::all()
            .iter()
            .position(|key| *key == sort.key)
            .unwrap_or(0);
        self.list_state.select(Some(self.selected_index));
    }

    /// The sort the user has built up in the dialog
    pub fn selected_sort(&self) -> NodeSort {
        NodeSort {
            key: JobSortKey::all()[self.selected_index],
            direction: self.pending.direction,
        }
    }

    fn select_next(&mut self) {
        if self.selected_index < JobSortKey::all().len() - 1 {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }
}

impl Component for SortDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('s') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Char('d') => {
                self.pending.direction = self.pending.direction.toggled();
                Some(Action::ModalInput('d'))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Some(Action::ModalDown)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 44u16.min(area.width.saturating_sub(4));
        let popup_height = 12u16.min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Sort keys
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "Sort Jobs ",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({})", self.pending.direction.label()),
                Style::default().fg(Color::Cyan),
            ),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = JobSortKey::all()
            .iter()
            .map(|key| {
                let marker = if *key == self.current.key { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(key.label(), Style::default().fg(Color::White)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Apply  "),
            Span::styled(" d ", Style::default().fg(Color::Cyan)),
            Span::raw("Direction  "),
            Span::styled(" Esc/s ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortDirection;

    #[test]
    fn test_set_sort_selects_current_key() {
        let mut dialog = SortDialog::new();
        dialog.set_sort(NodeSort {
            key: JobSortKey::Owner,
            direction: SortDirection::Descending,
        });
        let sort = dialog.selected_sort();
        assert_eq!(sort.key, JobSortKey::Owner);
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn test_direction_toggle() {
        let mut dialog = SortDialog::new();
        dialog.set_sort(NodeSort::default());
        let key = KeyEvent::from(KeyCode::Char('d'));
        dialog.handle_key_event(key).unwrap();
        assert_eq!(dialog.selected_sort().direction, SortDirection::Descending);
    }
}
