//! Combat tab: run a full battle simulation between the player and the
//! opponent's composed stats and inspect its round-by-round log.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::progress_bar;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(50), Constraint::Length(30)])
        .split(area);

    draw_log(f, app, chunks[0]);
    draw_side_panel(f, app, chunks[1]);
}

fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .combat_log
        .iter()
        .skip(app.log_scroll)
        .map(|line| ListItem::new(Line::from(line.clone())))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Battle Log ({:?}) ", app.battle_kind)),
    );
    f.render_widget(list, area);
}

fn draw_side_panel(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    match &app.last_outcome {
        Some(outcome) => {
            let player_side = &outcome.attacker_final;
            let opponent_side = &outcome.defender_final;

            f.render_widget(
                Paragraph::new(vec![
                    Line::from(format!("hp: {}/{}", player_side.hp, player_side.max_hp)),
                    Line::from(format!("mp: {}/{}", player_side.mp, player_side.max_mp)),
                ])
                .block(Block::default().borders(Borders::ALL).title(" Player (last battle) "))
                .style(Style::default().fg(Color::White)),
                rows[0],
            );

            f.render_widget(
                Paragraph::new(vec![
                    Line::from(format!("hp: {}/{}", opponent_side.hp, opponent_side.max_hp)),
                    Line::from(format!("mp: {}/{}", opponent_side.mp, opponent_side.max_mp)),
                ])
                .block(Block::default().borders(Borders::ALL).title(" Opponent (last battle) "))
                .style(Style::default().fg(Color::White)),
                rows[1],
            );

            let summary = Paragraph::new(vec![
                Line::from(format!("rounds: {}", outcome.rounds)),
                Line::from(format!("winner: {}", outcome.winner.as_deref().unwrap_or("draw"))),
                Line::from(""),
                Line::from("[b] toggle duel/spar"),
                Line::from("[a/space] fight again"),
                Line::from("[r] clear log"),
            ])
            .block(Block::default().borders(Borders::ALL).title(" Summary "));
            f.render_widget(summary, rows[2]);
        }
        None => {
            f.render_widget(
                Paragraph::new(vec![Line::from(format!("hp: {}/{}", app.player.hp, app.player.max_hp))])
                    .block(Block::default().borders(Borders::ALL).title(" Player ")),
                rows[0],
            );
            f.render_widget(
                Paragraph::new(vec![Line::from(format!("hp: {}/{}", app.opponent.hp, app.opponent.max_hp))])
                    .block(Block::default().borders(Borders::ALL).title(" Opponent ")),
                rows[1],
            );
            f.render_widget(
                Paragraph::new(vec![
                    Line::from("no battle fought yet."),
                    Line::from(""),
                    Line::from("[b] toggle duel/spar"),
                    Line::from("[a/space] fight"),
                ])
                .block(Block::default().borders(Borders::ALL).title(" Summary ")),
                rows[2],
            );
        }
    }
}
