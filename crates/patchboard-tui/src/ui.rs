use crate::poller::PollerState;
use crate::state::{App, Notice, View};
use crate::theme::{self, icons};
use patchboard_core::{PatchedPane, ProcessNode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_tabs(f, app, chunks[1]);
    match app.view {
        View::Conversation => render_conversation(f, app, chunks[2]),
        View::Checks => render_checks(f, app, chunks[2]),
        View::Files => render_files(f, app, chunks[2]),
    }
    render_footer(f, app, chunks[3]);

    if let Some(notice) = &app.notice {
        render_notice(f, notice, area);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let run = app.run();
    let badge = run.status_badge();
    let title = run.title().unwrap_or("No pull request yet");

    let control = app.control();
    let control_style = if control.is_enabled() {
        theme::HEADER_STYLE
    } else {
        theme::MUTED_STYLE
    };
    let mut summary = vec![
        Span::styled(format!("[{}]", control.label()), control_style),
        Span::raw(format!("  lang: {}", app.language)),
        Span::raw(format!("  files: {}", run.file_count())),
    ];
    if control.poller_state() == PollerState::Polling {
        let spinner = icons::SPINNER[(app.frame as usize) % icons::SPINNER.len()];
        summary.push(Span::styled(format!("  {spinner} polling"), theme::MUTED_STYLE));
    }
    if let Some(step) = run.latest().and_then(|snapshot| snapshot.current_step()) {
        summary.push(Span::raw(format!("  step: {step}")));
    }
    if let Some(at) = app.last_poll_at {
        summary.push(Span::styled(
            format!("  polled {}", at.format("%H:%M:%S")),
            theme::MUTED_STYLE,
        ));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", badge.label()), theme::badge_style(badge)),
            Span::raw(" "),
            Span::styled(title.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(summary),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::BORDER_STYLE)
        .title(Span::styled("patchboard", theme::HEADER_STYLE));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(idx, view)| Line::from(format!("{} {}", idx + 1, view.label())))
        .collect();
    let selected = View::ALL
        .iter()
        .position(|view| *view == app.view)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(theme::SELECTED_STYLE)
        .divider("|");
    f.render_widget(tabs, area);
}

fn render_conversation(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::BORDER_STYLE)
        .title("Conversation");

    let items: Vec<ListItem> = app
        .run()
        .timeline()
        .into_iter()
        .map(|entry| {
            let avatar = theme::avatar_color(entry.actor.avatar());
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} ", icons::AVATAR), Style::default().fg(avatar)),
                Span::styled(
                    entry.actor.name(),
                    Style::default().fg(avatar).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {}", entry.message)),
            ])];
            lines.extend(
                entry
                    .items
                    .into_iter()
                    .map(|item| Line::from(format!("    {} {item}", icons::ITEM))),
            );
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    if items.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Press s to start a simulation.",
            theme::MUTED_STYLE,
        )))
        .block(block);
        f.render_widget(hint, area);
        return;
    }
    f.render_widget(List::new(items).block(block), area);
}

fn render_checks(f: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    render_graph(f, app, columns[0]);
    render_logs(f, app, columns[1]);
}

fn render_graph(f: &mut Frame, app: &App, area: Rect) {
    let graph = app.run().graph();
    let animation = graph.animation();
    let hub_active = graph.is_active(ProcessNode::Supervising);

    let node_line = |node: ProcessNode, prefix: Span<'static>| {
        let active = graph.is_active(node);
        let glyph = if active {
            icons::NODE_ACTIVE
        } else {
            icons::NODE_IDLE
        };
        Line::from(vec![
            prefix,
            Span::styled(
                format!("{glyph} {}", node.label()),
                theme::node_style(active, animation),
            ),
        ])
    };

    let mut lines = vec![node_line(ProcessNode::Supervising, Span::raw(""))];
    for node in &ProcessNode::ALL[1..] {
        let edge = if hub_active && graph.is_active(*node) {
            theme::edge_glyph(animation, app.frame)
        } else {
            theme::edge_glyph(None, app.frame)
        };
        lines.push(node_line(
            *node,
            Span::styled(format!("  {edge} "), theme::MUTED_STYLE),
        ));
    }
    lines.push(Line::from(""));
    let state_line = match animation {
        Some(class) => {
            let spinner = icons::SPINNER[(app.frame as usize) % icons::SPINNER.len()];
            format!("{spinner} {}", class.class_name())
        }
        None => format!("{:?}", graph.state()).to_lowercase(),
    };
    lines.push(Line::from(Span::styled(state_line, theme::MUTED_STYLE)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::BORDER_STYLE)
        .title("Process");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_logs(f: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let logs = app.run_mut().logs_mut();
    let offset = logs.scroll_offset(height);
    let title = if logs.is_following() {
        "Logs (following)"
    } else {
        "Logs"
    };

    let lines: Vec<Line> = logs
        .lines()
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::BORDER_STYLE)
        .title(title);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

fn render_files(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(0)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(columns[1]);
    let panes_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[0]);

    let run = app.run();
    let items: Vec<ListItem> = run
        .file_entries()
        .iter()
        .map(|name| ListItem::new(name.as_str()))
        .collect();
    let mut list_state = ListState::default();
    list_state.select(run.active_file_index());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::BORDER_STYLE)
                .title(format!("Files ({})", run.file_count())),
        )
        .highlight_style(theme::SELECTED_STYLE);
    f.render_stateful_widget(list, columns[0], &mut list_state);

    let (original_title, original, patched) = match run.code_panes() {
        Some(panes) => (
            format!("Original: {}", panes.filename),
            Paragraph::new(panes.original),
            patched_paragraph(panes.patched),
        ),
        None => (
            "Original".to_string(),
            Paragraph::new(""),
            Paragraph::new(""),
        ),
    };
    f.render_widget(
        original.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::BORDER_STYLE)
                .title(original_title),
        ),
        panes_area[0],
    );
    f.render_widget(
        patched.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::BORDER_STYLE)
                .title("Patched"),
        ),
        panes_area[1],
    );

    let tests = Paragraph::new(run.test_source()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::BORDER_STYLE)
            .title("Generated tests"),
    );
    f.render_widget(tests, right[1]);
}

fn patched_paragraph(pane: PatchedPane<'_>) -> Paragraph<'_> {
    if pane.is_placeholder() {
        Paragraph::new(Span::styled(pane.text(), theme::PLACEHOLDER_STYLE))
    } else {
        Paragraph::new(pane.text())
    }
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "s start  l language  1/2/3 tab views  j/k move  PgUp/PgDn logs  q quit",
        theme::MUTED_STYLE,
    )];
    if let Some(note) = &app.status_note {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(note.as_str(), theme::HEADER_STYLE));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_notice(f: &mut Frame, notice: &Notice, area: Rect) {
    let popup = centered_rect(60, 30, area);
    f.render_widget(Clear, popup);
    let mut lines: Vec<Line> = notice
        .message
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter or Esc to dismiss",
        theme::MUTED_STYLE,
    )));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::NOTICE_STYLE)
        .title(Span::styled(notice.title.as_str(), theme::NOTICE_STYLE));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, rect: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;
    use crate::config::Config;
    use patchboard_core::{Language, Snapshot};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn test_app() -> App {
        let config = Config {
            backend_url: "http://127.0.0.1:9".to_string(),
            language: Language::Go,
            poll_interval: Duration::from_secs(60),
            request_timeout: None,
            log_file: None,
            debug: false,
        };
        let (tx, _rx) = mpsc::channel(1);
        let mut app = App::new(config, Arc::new(ScriptedBackend::new()), tx);
        app.run_mut().apply_snapshot(
            Snapshot::from_json(
                r#"{"status": "RUNNING", "current_step": "Fixing vulnerabilities...",
                    "pr_details": {"id": 2, "title": "Feature: Update go service",
                                   "files": {"main.go": "package main"}},
                    "vulnerabilities": ["Hardcoded secret"],
                    "logs": ["[12:00:00] Hacker found 1 issue"]}"#,
            )
            .unwrap(),
        );
        app
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn every_view_renders_its_surfaces() {
        let mut app = test_app();

        let screen = draw(&mut app);
        assert!(screen.contains("#2 Feature: Update go service"));
        assert!(screen.contains("Open"));
        assert!(screen.contains("hacker-agent"));
        assert!(screen.contains("Hardcoded secret"));

        app.view = View::Checks;
        let screen = draw(&mut app);
        assert!(screen.contains("anim-fixing"));
        assert!(screen.contains("Hacker found 1 issue"));

        app.view = View::Files;
        let screen = draw(&mut app);
        assert!(screen.contains("main.go"));
        assert!(screen.contains("(Pending fix...)"));
    }

    #[test]
    fn notice_is_drawn_over_the_view() {
        let mut app = test_app();
        app.notice = Some(Notice {
            title: "Failed to start simulation".to_string(),
            message: "backend responded with HTTP 503".to_string(),
        });
        let screen = draw(&mut app);
        assert!(screen.contains("Failed to start simulation"));
        assert!(screen.contains("Press Enter or Esc to dismiss"));
    }
}
