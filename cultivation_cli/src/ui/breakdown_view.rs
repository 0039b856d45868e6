//! Breakdown tab: base stats next to the composed, battle-ready stats the
//! stats pipeline derives from them.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::stat_line_with_computed;
use cultivation_core::player::Player;
use cultivation_core::stats_pipeline::compose_stats;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_panel(f, app, &app.player, "Player", chunks[0]);
    draw_panel(f, app, &app.opponent, "Opponent", chunks[1]);
}

fn draw_panel(f: &mut Frame, app: &App, player: &Player, title: &str, area: Rect) {
    let composed = compose_stats(player, &app.catalogs, app.now).stats;

    let mut lines = vec![
        Line::from("base -> final, shown in green where they diverge"),
        stat_line_with_computed("max hp", player.max_hp as f64, composed.max_hp as f64),
        stat_line_with_computed("max mp", player.max_mp as f64, composed.max_mp as f64),
        stat_line_with_computed("physical attack", player.physical_attack as f64, composed.physical_attack as f64),
        stat_line_with_computed("magic attack", player.magic_attack as f64, composed.magic_attack as f64),
        stat_line_with_computed("physical defense", player.physical_defense as f64, composed.physical_defense as f64),
        stat_line_with_computed("magic defense", player.magic_defense as f64, composed.magic_defense as f64),
        stat_line_with_computed("speed", player.speed as f64, composed.speed as f64),
        stat_line_with_computed("critical rate", player.critical_rate, composed.critical_rate),
        stat_line_with_computed("critical damage", player.critical_damage, composed.critical_damage),
        stat_line_with_computed("hit rate", player.hit_rate, composed.hit_rate),
        stat_line_with_computed("dodge rate", player.dodge_rate, composed.dodge_rate),
        Line::from(""),
        Line::from(format!(
            "weapon: {}  armor: {}  technique: {}",
            player.equipment.weapon.as_deref().unwrap_or("none"),
            player.equipment.armor.as_deref().unwrap_or("none"),
            player.equipment.main_technique.as_deref().unwrap_or("none"),
        )),
        Line::from(format!("equipped skills resolved: {}", composed.skills.len())),
        Line::from(format!(
            "active temporary pill effects: {}",
            player.active_temporary_effects.len()
        )),
    ];

    if composed.skills.is_empty() {
        lines.push(Line::from("(no equipped skills resolved -- equip one from the Skills tab)"));
    }

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} -- Composition ")))
        .style(Style::default().fg(Color::White))
        .scroll((app.breakdown_scroll as u16, 0));
    f.render_widget(body, area);
}
