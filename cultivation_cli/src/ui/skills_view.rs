//! Skills tab: the player's learned skill pool next to the catalog details
//! for whichever one is selected, including its equipped status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use cultivation_core::player::Player;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_skill_list(f, app, chunks[0]);
    draw_skill_details(f, app, chunks[1]);
}

fn learned_sorted(player: &Player) -> Vec<String> {
    let mut skills: Vec<String> = player.learned_skills.iter().cloned().collect();
    skills.sort();
    skills
}

fn draw_skill_list(f: &mut Frame, app: &App, area: Rect) {
    let learned = learned_sorted(&app.player);

    let items: Vec<ListItem> = learned
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let is_equipped = app.player.equipped_skills.iter().any(|s| s == id);
            let style = if i == app.selected_skill {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if is_equipped {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == app.selected_skill { "\u{25ba} " } else { "  " };
            let marker = if is_equipped { " [equipped]" } else { "" };
            let name = app
                .catalogs
                .skill(id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| id.clone());
            ListItem::new(Line::from(Span::styled(format!("{prefix}{name}{marker}"), style)))
        })
        .collect();

    let title = format!(
        " Learned Skills ({}/{} equipped) ",
        app.player.equipped_skills.len(),
        Player::EQUIPPED_SKILL_CAPACITY
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_skill_details(f: &mut Frame, app: &App, area: Rect) {
    let learned = learned_sorted(&app.player);
    let mut lines: Vec<Line> = vec![];

    match learned.get(app.selected_skill) {
        Some(id) => match app.catalogs.skill(id) {
            Some(skill) => {
                lines.push(Line::from(Span::styled(
                    skill.name.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(format!("damage kind: {:?}", skill.damage_kind)));
                lines.push(Line::from(format!(
                    "base damage: {:.1}   attack ratio: {:.2}",
                    skill.base_damage, skill.attack_ratio
                )));
                lines.push(Line::from(format!(
                    "mp cost: {}   cooldown: {} rounds",
                    skill.mp_cost, skill.cooldown
                )));
                lines.push(Line::from(format!("realm requirement: #{}", skill.realm_requirement)));
                if skill.lifesteal > 0.0 {
                    lines.push(Line::from(format!("lifesteal: {:.0}%", skill.lifesteal * 100.0)));
                }
                if let Some(penalty) = skill.mp_exhausted_penalty {
                    lines.push(Line::from(format!(
                        "damage multiplier when mp exhausted: {:.0}%",
                        penalty * 100.0
                    )));
                }
                if !skill.effects.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "effects on hit:",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )));
                    for effect in &skill.effects {
                        lines.push(Line::from(format!(
                            "  {:?}  value {:.2}  duration {}  chance {:.0}%",
                            effect.kind,
                            effect.value,
                            effect.duration,
                            effect.chance * 100.0
                        )));
                    }
                }

                lines.push(Line::from(""));
                let is_equipped = app.player.equipped_skills.iter().any(|s| s == id);
                lines.push(Line::from(Span::styled(
                    if is_equipped {
                        "[Enter/Space] unequip this skill"
                    } else {
                        "[Enter/Space] equip this skill"
                    },
                    Style::default().fg(Color::DarkGray),
                )));
            }
            None => lines.push(Line::from("(skill not found in catalog)")),
        },
        None => lines.push(Line::from("learn a skill to see its details here")),
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Skill Details "));
    f.render_widget(paragraph, area);
}
