use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::data::ProfileStore;
use crate::models::{Category, CATALOG};

pub fn render<S: ProfileStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_profile(frame, chunks[0], app);
    render_categories(frame, chunks[1], app);
    super::render_footer(
        frame,
        chunks[2],
        app,
        "j/k navigate  ·  enter play  ·  a achievements  ·  R reset  ·  q quit",
    );
}

fn render_profile<S: ProfileStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let profile = app.coordinator().profile();

    let content = vec![
        Line::from(Span::styled(
            "NATURE QUIZ",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            profile.nickname.as_str(),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(vec![
            Span::styled(format!("{} coins", profile.coins()), Style::default().fg(Color::Yellow)),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} quizzes", profile.completed_quiz_count()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}/{} achievements", profile.unlocked_count(), CATALOG.len()),
                Style::default().fg(Color::Gray),
            ),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_categories<S: ProfileStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let coordinator = app.coordinator();
    let round_size = coordinator.config().round_size;
    let mut lines: Vec<Line> = Vec::with_capacity(Category::COUNT * 2);

    for category in Category::ALL {
        let is_selected = category == app.selected_category();
        let available = coordinator.bank().count_for(category);
        let style = if available == 0 {
            Style::default().fg(Color::DarkGray)
        } else if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{:<10}", category.display_name()), style),
            Span::styled(
                format!("{:>2} questions", available.min(round_size)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("   played {}", coordinator.profile().category_count(category)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(widget, area);
}
