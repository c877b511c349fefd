mod achievements;
mod menu;
mod quiz;
mod result;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};
use crate::data::ProfileStore;

pub fn render<S: ProfileStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen {
        Screen::Menu => menu::render(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Result => result::render(frame, area, app),
        Screen::Achievements => achievements::render(frame, area, app),
    }
}

/// Bottom status line: the app's notice if any, otherwise the key help.
fn render_footer<S: ProfileStore>(frame: &mut Frame, area: Rect, app: &App<S>, controls: &str) {
    let widget = match app.notice() {
        Some(notice) => Paragraph::new(notice.to_string()).fg(Color::Yellow),
        None => Paragraph::new(controls.to_string()).fg(Color::DarkGray),
    };
    frame.render_widget(widget.alignment(Alignment::Center), area);
}
