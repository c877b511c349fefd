use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::coordinator::{CompletionReport, COMPLETION_BONUS};
use crate::data::ProfileStore;
use crate::session::CompletionReason;

pub fn render<S: ProfileStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let Some(report) = app.coordinator().last_report() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_summary(frame, chunks[1], report);
    render_rewards(frame, chunks[2], report);
    super::render_footer(frame, chunks[3], app, "enter menu  ·  r play again  ·  q quit");
}

fn headline(reason: CompletionReason) -> (&'static str, Color) {
    match reason {
        CompletionReason::Exhausted => ("QUIZ COMPLETED!", Color::Green),
        CompletionReason::MistakeLimit => ("TOO MANY MISTAKES", Color::Red),
        CompletionReason::Timeout => ("TIME'S UP", Color::Yellow),
    }
}

fn render_summary(frame: &mut Frame, area: Rect, report: &CompletionReport) {
    let outcome = &report.outcome;
    let (title, color) = headline(outcome.reason);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(color).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} points", outcome.score),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(
            format!(
                "{}/{} questions  ·  {} mistakes  ·  {}s left",
                outcome.answered, outcome.round_size, outcome.mistakes, outcome.remaining_secs
            )
            .fg(Color::DarkGray),
        ),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_rewards(frame: &mut Frame, area: Rect, report: &CompletionReport) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" + ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:>4} ", report.outcome.score),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("score", Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::styled(" + ", Style::default().fg(Color::Yellow)),
            Span::styled(format!("{:>4} ", COMPLETION_BONUS), Style::default().fg(Color::Yellow)),
            Span::styled("completion bonus", Style::default().fg(Color::Gray)),
        ]),
    ];

    for (id, reward) in &report.unlocked {
        lines.push(Line::from(vec![
            Span::styled(" + ", Style::default().fg(Color::Green)),
            Span::styled(format!("{:>4} ", reward), Style::default().fg(Color::Green)),
            Span::styled(
                format!("achievement: {}", id.title()),
                Style::default().fg(Color::White).bold(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" = {:>4} coins earned", report.total_coins()),
        Style::default().fg(Color::Yellow).bold(),
    )));

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}
