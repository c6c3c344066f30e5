//! Detail panel component
//!
//! Displays attributes for the selected tree node.

use crate::action::Action;
use crate::component::Component;
use crate::model::node::{NodeKind, SessionFilter, TreeNode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Detail panel component for displaying node attributes
pub struct DetailComponent {
    /// Current scroll offset
    scroll: usize,
    /// Cached content lines
    content: Vec<Line<'static>>,
    title: &'static str,
}

impl Default for DetailComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn attr(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

fn heading(text: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "═══════════════════════════════════════════════════════════",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ]
}

impl DetailComponent {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            content: vec![Line::from("No item selected")],
            title: " Details ",
        }
    }

    /// Update content based on the selected node
    pub fn set_node(&mut self, node: Option<&TreeNode>) {
        self.scroll = 0;
        let Some(node) = node else {
            self.title = " Details ";
            self.content = vec![Line::from("No item selected")];
            return;
        };

        let mut lines = Vec::new();
        match &node.kind {
            NodeKind::Session { profile_name, filter } => {
                self.title = " Session ";
                lines.extend(heading("Session"));
                lines.push(attr("Profile", profile_name.clone()));
                match filter {
                    SessionFilter::DataSetPattern(pattern) => {
                        lines.push(attr("Pattern", pattern.clone()));
                    }
                    SessionFilter::UssPath(path) => {
                        lines.push(attr("Path", path.clone()));
                    }
                    SessionFilter::Jobs {
                        owner,
                        prefix,
                        status,
                    } => {
                        lines.push(attr("Owner", owner.clone()));
                        lines.push(attr("Prefix", prefix.clone()));
                        lines.push(attr("Status", status.clone()));
                    }
                }
            }
            NodeKind::DataSet { name, org } => {
                self.title = " Data Set ";
                lines.extend(heading("Data Set"));
                lines.push(attr("Name", name.clone()));
                lines.push(attr("Organization", format!("{:?}", org)));
            }
            NodeKind::Member { dataset, name } => {
                self.title = " Member ";
                lines.extend(heading("Member"));
                lines.push(attr("Data Set", dataset.clone()));
                lines.push(attr("Member", name.clone()));
            }
            NodeKind::UssDir { .. } | NodeKind::UssFile { .. } => {
                self.title = " USS ";
                lines.extend(heading("USS Entry"));
                if let Some(path) = node.uss_path() {
                    lines.push(attr("Path", path));
                }
                let kind = if matches!(node.kind, NodeKind::UssDir { .. }) {
                    "Directory"
                } else {
                    "File"
                };
                lines.push(attr("Type", kind.to_string()));
            }
            NodeKind::Job(job) => {
                self.title = " Job ";
                lines.extend(heading("Job"));
                lines.push(attr("Name", job.jobname.clone()));
                lines.push(attr("Id", job.jobid.clone()));
                lines.push(attr("Owner", job.owner.clone()));
                lines.push(attr("Status", job.status.clone()));
                if let Some(retcode) = &job.retcode {
                    lines.push(attr("Return Code", retcode.clone()));
                }
            }
            NodeKind::Spool(spool) => {
                self.title = " Spool File ";
                lines.extend(heading("Spool File"));
                lines.push(attr("Step", spool.stepname.clone()));
                lines.push(attr("DD", spool.ddname.clone()));
                if let Some(procstep) = &spool.procstep {
                    lines.push(attr("Proc Step", procstep.clone()));
                }
                lines.push(attr("Records", spool.record_count.to_string()));
            }
            NodeKind::Placeholder => {
                self.title = " Details ";
                lines.push(Line::from(Span::styled(
                    node.label.clone(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        self.content = lines;
    }
}

impl Component for DetailComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollDown)
            }
            KeyCode::Char('y') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ScrollUp)
            }
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.content.len().saturating_sub(1);

        match action {
            Action::ScrollDown => {
                if self.scroll < max_scroll {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.scroll = (self.scroll + 20).min(max_scroll);
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(20);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let visible_height = area.height.saturating_sub(2) as usize;

        let paragraph = Paragraph::new(self.content.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .scroll((self.scroll as u16, 0));

        frame.render_widget(paragraph, area);

        // Render scrollbar if content exceeds visible area
        let total = self.content.len();
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}
