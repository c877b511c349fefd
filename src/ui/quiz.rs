use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::data::ProfileStore;
use crate::models::Question;
use crate::session::{HintKind, QuizSession};

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render<S: ProfileStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let Some(session) = app.coordinator().session() else {
        return;
    };
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_status(frame, chunks[0], session, app.coordinator().profile().coins());
    render_question_text(frame, chunks[1], &question.text);
    render_options(frame, chunks[2], session, question, app.selected_option());
    render_hints(frame, chunks[3], app.coordinator().profile().coins());
    super::render_footer(
        frame,
        chunks[4],
        app,
        "j/k navigate  ·  enter select  ·  f/s/h hints  ·  esc menu  ·  q quit",
    );
}

fn render_status(frame: &mut Frame, area: Rect, session: &QuizSession, coins: u32) {
    let timer_color = match session.remaining_secs() {
        0..=5 => Color::Red,
        6..=15 => Color::Yellow,
        _ => Color::Green,
    };
    let mistakes = "x".repeat(session.mistakes() as usize)
        + &"·".repeat(session.max_mistakes().saturating_sub(session.mistakes()) as usize);

    let line = Line::from(vec![
        Span::styled(
            format!("{:>2}s", session.remaining_secs()),
            Style::default().fg(timer_color).bold(),
        ),
        Span::styled("   mistakes ", Style::default().fg(Color::DarkGray)),
        Span::styled(mistakes, Style::default().fg(Color::Red)),
        Span::styled(format!("   {} coins", coins), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!(
                "   {}/{}  {}",
                session.current_index() + 1,
                session.question_count(),
                session.category()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    session: &QuizSession,
    question: &Question,
    selected: usize,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = index == selected;
        let style = if session.is_option_disabled(index) {
            Style::default().fg(Color::DarkGray).crossed_out()
        } else if session.reveals_correct() && question.is_correct(index) {
            Style::default().fg(Color::Green).bold()
        } else if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_hints(frame: &mut Frame, area: Rect, coins: u32) {
    let keys = |kind: HintKind| match kind {
        HintKind::FiftyFifty => 'f',
        HintKind::Skip => 's',
        HintKind::Highlight => 'h',
    };

    let spans: Vec<Span> = HintKind::ALL
        .iter()
        .map(|kind| {
            let affordable = coins >= kind.cost();
            let color = if affordable { Color::Magenta } else { Color::DarkGray };
            Span::styled(
                format!("  [{}] {} {}  ", keys(*kind), kind.label(), kind.cost()),
                Style::default().fg(color),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}
