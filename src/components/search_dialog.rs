//! Search dialog component
//!
//! Filter-as-you-type list over a set of display strings. Backs both the
//! search-everything prompt and the recently-opened recall prompt; the App
//! seeds it with the right items and title before pushing the modal.

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

/// Search dialog over display strings
pub struct SearchDialog {
    title: String,
    items: Vec<String>,
    query: String,
    /// Indices into `items` that match the query
    matches: Vec<usize>,
    list_state: ListState,
}

impl Default for SearchDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchDialog {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            items: Vec::new(),
            query: String::new(),
            matches: Vec::new(),
            list_state: ListState::default(),
        }
    }

    /// Seed the dialog before the modal opens
    pub fn open(&mut self, title: &str, items: Vec<String>) {
        self.title = format!(" {} ", title);
        self.items = items;
        self.query.clear();
        self.refilter();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The display string of the highlighted row
    pub fn selected_item(&self) -> Option<&str> {
        let index = self.list_state.selected()?;
        let item_index = *self.matches.get(index)?;
        self.items.get(item_index).map(|s| s.as_str())
    }

    fn refilter(&mut self) {
        let query = self.query.to_lowercase();
        self.matches = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| query.is_empty() || item.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect();
        if self.matches.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    fn select_next(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((current + 1) % self.matches.len()));
    }

    fn select_prev(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let prev = if current == 0 {
            self.matches.len() - 1
        } else {
            current - 1
        };
        self.list_state.select(Some(prev));
    }
}

impl Component for SearchDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Up => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down => {
                self.select_next();
                Some(Action::ModalDown)
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter();
                Some(Action::ModalBackspace)
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refilter();
                Some(Action::ModalInput(c))
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 70u16.min(area.width.saturating_sub(4));
        let popup_height = 20u16.min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query input
                Constraint::Min(3),    // Matches
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let query = Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(self.query.clone()),
            Span::styled("█", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.title.clone())
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(query, chunks[0]);

        if self.matches.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No matching items",
                    Style::default().fg(Color::Yellow),
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
                .matches
                .iter()
                .filter_map(|&i| self.items.get(i))
                .map(|item| {
                    ListItem::new(Line::from(Span::styled(
                        item.clone(),
                        Style::default().fg(Color::White),
                    )))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} matches ", self.matches.len()))
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
            Span::raw("Open  "),
            Span::styled(" ↑/↓ ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}
