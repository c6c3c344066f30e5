//! Credential prompt component
//!
//! Prompts for a user id and password when a profile has neither stored
//! credentials nor a token. The password field is masked.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    User,
    Password,
}

/// Credential prompt for a connection profile
pub struct CredentialDialog {
    profile_name: String,
    user: String,
    password: String,
    focus: Field,
}

impl Default for CredentialDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialDialog {
    pub fn new() -> Self {
        Self {
            profile_name: String::new(),
            user: String::new(),
            password: String::new(),
            focus: Field::User,
        }
    }

    /// Reset the prompt for a profile before the modal opens
    pub fn open(&mut self, profile_name: &str, user: &str) {
        self.profile_name = profile_name.to_string();
        self.user = user.to_string();
        self.password.clear();
        self.focus = if user.is_empty() {
            Field::User
        } else {
            Field::Password
        };
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            Field::User => Field::Password,
            Field::Password => Field::User,
        };
    }

    fn field_line(&self, label: &str, value: String, focused: bool) -> Line<'static> {
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![
            Span::styled(format!("{label:>10}: "), label_style),
            Span::styled(value, Style::default().fg(Color::White)),
        ];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    }
}

impl Component for CredentialDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Tab => {
                self.next_field();
                Some(Action::ModalNextField)
            }
            KeyCode::Backspace => {
                match self.focus {
                    Field::User => self.user.pop(),
                    Field::Password => self.password.pop(),
                };
                Some(Action::ModalBackspace)
            }
            KeyCode::Char(c) => {
                match self.focus {
                    Field::User => self.user.push(c),
                    Field::Password => self.password.push(c),
                }
                Some(Action::ModalInput(c))
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 52u16.min(area.width.saturating_sub(4));
        let popup_height = 11u16.min(area.height.saturating_sub(4));
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Fields
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let masked = "•".repeat(self.password.chars().count());
        let lines = vec![
            Line::from(""),
            self.field_line("User", self.user.clone(), self.focus == Field::User),
            Line::from(""),
            self.field_line("Password", masked, self.focus == Field::Password),
        ];

        let body = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Credentials for {} ", self.profile_name))
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(body, chunks[0]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Connect  "),
            Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
            Span::raw("Switch field  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut dialog = CredentialDialog::new();
        dialog.open("lpar1", "");
        dialog
            .handle_key_event(KeyEvent::from(KeyCode::Char('u')))
            .unwrap();
        dialog
            .handle_key_event(KeyEvent::from(KeyCode::Tab))
            .unwrap();
        dialog
            .handle_key_event(KeyEvent::from(KeyCode::Char('p')))
            .unwrap();
        assert_eq!(dialog.user(), "u");
        assert_eq!(dialog.password(), "p");
    }

    #[test]
    fn test_open_with_user_focuses_password() {
        let mut dialog = CredentialDialog::new();
        dialog.open("lpar1", "IBMUSER");
        dialog
            .handle_key_event(KeyEvent::from(KeyCode::Char('x')))
            .unwrap();
        assert_eq!(dialog.user(), "IBMUSER");
        assert_eq!(dialog.password(), "x");
    }
}
