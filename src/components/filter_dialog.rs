//! Listing filter dialog component
//!
//! Edits the listing filter of the selected session. The field set depends on
//! the tree the session belongs to: a data set pattern, a USS directory path,
//! or the owner/prefix/status triple for jobs.

use crate::action::Action;
use crate::component::Component;
use crate::model::SessionFilter;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Listing filter editor
pub struct FilterDialog {
    session_name: String,
    labels: Vec<&'static str>,
    values: Vec<String>,
    focus: usize,
    kind: FilterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKind {
    DataSets,
    Uss,
    Jobs,
}

impl Default for FilterDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterDialog {
    pub fn new() -> Self {
        Self {
            session_name: String::new(),
            labels: Vec::new(),
            values: Vec::new(),
            focus: 0,
            kind: FilterKind::DataSets,
        }
    }

    /// Seed from the session's current filter before the modal opens
    pub fn open(&mut self, session_name: &str, filter: &SessionFilter) {
        self.session_name = session_name.to_string();
        self.focus = 0;
        match filter {
            SessionFilter::DataSetPattern(pattern) => {
                self.kind = FilterKind::DataSets;
                self.labels = vec!["Pattern"];
                self.values = vec![pattern.clone()];
            }
            SessionFilter::UssPath(path) => {
                self.kind = FilterKind::Uss;
                self.labels = vec!["Path"];
                self.values = vec![path.clone()];
            }
            SessionFilter::Jobs {
                owner,
                prefix,
                status,
            } => {
                self.kind = FilterKind::Jobs;
                self.labels = vec!["Owner", "Prefix", "Status"];
                self.values = vec![owner.clone(), prefix.clone(), status.clone()];
            }
        }
    }

    /// The filter built from the edited fields
    pub fn filter(&self) -> SessionFilter {
        match self.kind {
            FilterKind::DataSets => SessionFilter::DataSetPattern(self.values[0].clone()),
            FilterKind::Uss => SessionFilter::UssPath(self.values[0].clone()),
            FilterKind::Jobs => SessionFilter::Jobs {
                owner: self.values[0].clone(),
                prefix: self.values[1].clone(),
                status: self.values[2].clone(),
            },
        }
    }

    fn next_field(&mut self) {
        if !self.values.is_empty() {
            self.focus = (self.focus + 1) % self.values.len();
        }
    }
}

impl Component for FilterDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Tab => {
                self.next_field();
                Some(Action::ModalNextField)
            }
            KeyCode::Backspace => {
                if let Some(value) = self.values.get_mut(self.focus) {
                    value.pop();
                }
                Some(Action::ModalBackspace)
            }
            KeyCode::Char(c) => {
                if let Some(value) = self.values.get_mut(self.focus) {
                    value.push(c);
                }
                Some(Action::ModalInput(c))
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 56u16.min(area.width.saturating_sub(4));
        let popup_height = (self.values.len() as u16 * 2 + 7).min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Fields
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let mut lines = vec![Line::from("")];
        for (i, (label, value)) in self.labels.iter().zip(self.values.iter()).enumerate() {
            let focused = i == self.focus;
            let label_style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![
                Span::styled(format!("{label:>8}: "), label_style),
                Span::styled(value.clone(), Style::default().fg(Color::White)),
            ];
            if focused {
                spans.push(Span::styled("█", Style::default().fg(Color::DarkGray)));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }

        let body = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Filter for {} ", self.session_name))
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(body, chunks[0]);

        let mut help_spans = vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Apply  "),
        ];
        if self.values.len() > 1 {
            help_spans.push(Span::styled(" Tab ", Style::default().fg(Color::Cyan)));
            help_spans.push(Span::raw("Next field  "));
        }
        help_spans.push(Span::styled(" Esc ", Style::default().fg(Color::Yellow)));
        help_spans.push(Span::raw("Cancel"));

        let help = Paragraph::new(Line::from(help_spans))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}
