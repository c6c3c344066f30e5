//! Content viewer dialog component
//!
//! Shows fetched data set, USS file, or spool content in a large scrollable
//! popup. 'e' hands the content off to an external editor.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Scrollable content viewer
pub struct ContentDialog {
    title: String,
    lines: Vec<String>,
    scroll: u16,
}

impl Default for ContentDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentDialog {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            lines: Vec::new(),
            scroll: 0,
        }
    }

    /// Seed the viewer before the modal opens
    pub fn open(&mut self, title: &str, content: &str) {
        self.title = format!(" {} ", title);
        self.lines = content.lines().map(|l| l.to_string()).collect();
        self.scroll = 0;
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    fn max_scroll(&self) -> u16 {
        (self.lines.len() as u16).saturating_sub(1)
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).max(0) as u16;
        self.scroll = next.min(self.max_scroll());
    }
}

impl Component for ContentDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
                Some(Action::CloseModal)
            }
            (KeyCode::Char('e'), KeyModifiers::NONE) => Some(Action::OpenEditor),
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                self.scroll_by(1);
                Some(Action::ScrollDown)
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                self.scroll_by(-1);
                Some(Action::ScrollUp)
            }
            (KeyCode::PageDown, _) | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.scroll_by(20);
                Some(Action::PageDown)
            }
            (KeyCode::PageUp, _) | (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.scroll_by(-20);
                Some(Action::PageUp)
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) => {
                self.scroll = 0;
                Some(Action::FirstItem)
            }
            (KeyCode::Char('G'), _) => {
                self.scroll = self.max_scroll();
                Some(Action::LastItem)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = area.width.saturating_sub(6).max(20);
        let popup_height = area.height.saturating_sub(4).max(10);
        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let text: Vec<Line> = self
            .lines
            .iter()
            .map(|l| Line::from(l.clone()))
            .collect();

        let footer = Line::from(vec![
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Scroll "),
            Span::styled(" e ", Style::default().fg(Color::Yellow)),
            Span::raw("Editor "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Close "),
        ]);

        let body = Paragraph::new(text).scroll((self.scroll, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.title.clone())
                .title_style(
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                )
                .title_bottom(footer),
        );
        frame.render_widget(body, popup_area);

        let visible = popup_area.height.saturating_sub(2) as usize;
        if self.lines.len() > visible {
            let mut state = ScrollbarState::new(self.lines.len()).position(self.scroll as usize);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                popup_area,
                &mut state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut dialog = ContentDialog::new();
        dialog.open("IBMUSER.SRC(MAIN)", "one\ntwo\nthree");
        dialog
            .handle_key_event(KeyEvent::from(KeyCode::Char('G')))
            .unwrap();
        assert_eq!(dialog.scroll, 2);
        dialog
            .handle_key_event(KeyEvent::from(KeyCode::Down))
            .unwrap();
        assert_eq!(dialog.scroll, 2);
    }

    #[test]
    fn test_content_round_trips_lines() {
        let mut dialog = ContentDialog::new();
        dialog.open("SPOOL", "a\nb");
        assert_eq!(dialog.content(), "a\nb");
    }
}
