//! Stats tab: a side-by-side summary of both combatants' persistent state.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::{progress_bar, stat_line};
use cultivation_core::player::Player;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_panel(f, app, &app.player, chunks[0]);
    draw_panel(f, app, &app.opponent, chunks[1]);
}

fn draw_panel(f: &mut Frame, app: &App, player: &Player, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let realm_name = app
        .catalogs
        .realm(player.realm_index)
        .map(|r| r.name.as_str())
        .unwrap_or("unknown realm");

    let header = Paragraph::new(vec![
        Line::from(format!(
            "{} ({})",
            player.display_name.as_deref().unwrap_or(&player.user_id),
            player.user_id
        )),
        Line::from(format!("realm: {realm_name} (#{})", player.realm_index)),
        Line::from(format!("path: {:?}  root: {:?}", player.cultivation_path, player.spiritual_root)),
        Line::from(format!("experience: {}  gold: {}", player.experience, player.gold)),
        Line::from(format!(
            "resurrection token: {}  debuff shield: {}",
            player.has_resurrection_token, player.has_debuff_shield
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Identity "));
    f.render_widget(header, rows[0]);

    f.render_widget(
        progress_bar(player.hp as f64, player.max_hp as f64, area.width.saturating_sub(2), Color::Red),
        rows[1],
    );
    f.render_widget(
        progress_bar(player.mp as f64, player.max_mp as f64, area.width.saturating_sub(2), Color::Blue),
        rows[2],
    );

    let stat_lines = vec![
        Line::from(format!("hp: {}/{}", player.hp, player.max_hp)),
        Line::from(format!("mp: {}/{}", player.mp, player.max_mp)),
        stat_line("physical attack", player.physical_attack as f64),
        stat_line("magic attack", player.magic_attack as f64),
        stat_line("physical defense", player.physical_defense as f64),
        stat_line("magic defense", player.magic_defense as f64),
        stat_line("mental power", player.mental_power as f64),
        stat_line("speed", player.speed as f64),
        stat_line("critical rate", player.critical_rate),
        stat_line("critical damage", player.critical_damage),
        stat_line("hit rate", player.hit_rate),
        stat_line("dodge rate", player.dodge_rate),
    ];

    let body = Paragraph::new(stat_lines)
        .block(Block::default().borders(Borders::ALL).title(" Base Stats "))
        .style(Style::default().fg(Color::White))
        .scroll((app.stats_scroll as u16, 0));
    f.render_widget(body, rows[3]);
}
