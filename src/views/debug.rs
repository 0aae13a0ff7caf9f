use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .title(" Debug ")
        .borders(Borders::ALL)
        .border_style(theme.dim_style());

    let mut lines = Vec::new();

    let task_count = app.debug.running_tasks.len();
    lines.push(Line::from(vec![
        Span::styled("Tasks: ", theme.dim_style()),
        Span::styled(
            task_count.to_string(),
            Style::default().fg(if task_count > 0 {
                theme.spinner
            } else {
                theme.foreground
            }),
        ),
        Span::styled(
            format!(
                "   cursor {}/{}  phase {:?}",
                app.feed.cursor(),
                app.feed.total(),
                app.feed.phase()
            ),
            theme.dim_style(),
        ),
    ]));

    // Comment fetches can be numerous; list only as many as fit.
    let available_lines = area.height.saturating_sub(3) as usize;
    let shown_tasks = app.debug.running_tasks.len().min(available_lines / 2);
    for task in app.debug.running_tasks.iter().take(shown_tasks) {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", task.id), theme.dim_style()),
            Span::styled(
                task.description.as_str(),
                Style::default().fg(theme.foreground),
            ),
            Span::styled(
                format!(" ({:.1?})", task.started_at.elapsed()),
                Style::default().fg(theme.story_score),
            ),
        ]));
    }

    // Recent log entries, newest first
    let log_lines = available_lines.saturating_sub(shown_tasks);
    for entry in app.debug.log.iter().rev().take(log_lines) {
        lines.push(Line::from(Span::styled(
            format!("  {}", entry.message),
            theme.dim_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
