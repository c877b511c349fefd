use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::data::ProfileStore;
use crate::models::CATALOG;

pub fn render<S: ProfileStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let profile = app.coordinator().profile();

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("ACHIEVEMENTS  ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("{}/{}", profile.unlocked_count(), CATALOG.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(header, chunks[0]);

    let lines: Vec<Line> = CATALOG
        .iter()
        .map(|achievement| {
            let unlocked = profile.is_unlocked(achievement.id);
            let (symbol, color) = if unlocked {
                ("+", Color::Green)
            } else {
                ("·", Color::DarkGray)
            };

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:<16}", achievement.title),
                    Style::default().fg(if unlocked { Color::White } else { Color::Gray }),
                ),
                Span::styled(
                    format!("{:>4}  ", achievement.reward),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(achievement.description, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.achievements_scroll() as u16, 0));
    frame.render_widget(widget, chunks[1]);

    super::render_footer(frame, chunks[2], app, "j/k scroll  ·  esc back  ·  q quit");
}
