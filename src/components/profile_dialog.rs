//! Profile selector dialog component
//!
//! Lists connection profiles from the config that have not been added as
//! sessions yet. Picking one adds a session root to all three trees.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Profile selector dialog
pub struct ProfileDialog {
    profiles: Vec<String>,
    selected_index: usize,
    list_state: ListState,
}

impl Default for ProfileDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            profiles: Vec::new(),
            selected_index: 0,
            list_state,
        }
    }

    /// Seed with the profiles not yet present in the trees
    pub fn set_profiles(&mut self, available: Vec<String>) {
        self.profiles = available;
        self.selected_index = 0;
        self.list_state.select(Some(0));
    }

    pub fn selected_profile(&self) -> Option<&str> {
        self.profiles.get(self.selected_index).map(|s| s.as_str())
    }

    fn select_next(&mut self) {
        if !self.profiles.is_empty() && self.selected_index < self.profiles.len() - 1 {
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

impl Component for ProfileDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('a') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
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
        let popup_width = 50u16.min(area.width.saturating_sub(4));
        let popup_height = (self.profiles.len() as u16 + 8)
            .max(11)
            .min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Profile list
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let header = Paragraph::new(Line::from(Span::styled(
            "Add Session",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        if self.profiles.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No profiles available",
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Define profiles in ~/.zos-tui/config.json",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(empty, chunks[1]);
        } else {
            let items: Vec<ListItem> = self
                .profiles
                .iter()
                .map(|name| {
                    ListItem::new(Line::from(Span::styled(
                        name.clone(),
                        Style::default().fg(Color::White),
                    )))
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
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Add  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Esc/a ", Style::default().fg(Color::Yellow)),
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

    #[test]
    fn test_selection_bounded() {
        let mut dialog = ProfileDialog::new();
        dialog.set_profiles(vec!["lpar1".to_string(), "lpar2".to_string()]);
        dialog.select_prev();
        assert_eq!(dialog.selected_profile(), Some("lpar1"));
        dialog.select_next();
        dialog.select_next();
        assert_eq!(dialog.selected_profile(), Some("lpar2"));
    }

    #[test]
    fn test_empty_has_no_selection() {
        let mut dialog = ProfileDialog::new();
        dialog.set_profiles(Vec::new());
        assert_eq!(dialog.selected_profile(), None);
    }
}
