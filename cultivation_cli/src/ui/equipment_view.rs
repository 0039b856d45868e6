//! Equipment tab: inspect and swap a combatant's three equippable slots
//! against whatever sits in their storage ring.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, EquipTarget, EQUIP_SLOTS};
use cultivation_core::config::ItemKind;
use cultivation_core::player::Player;
use cultivation_core::types::EquipmentSlot;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(area);

    draw_slots(f, app, chunks[0]);
    draw_inventory(f, app, chunks[1]);
    draw_preview(f, app, chunks[2]);
}

fn slot_name(slot: EquipmentSlot) -> &'static str {
    match slot {
        EquipmentSlot::Weapon => "weapon",
        EquipmentSlot::Armor => "armor",
        EquipmentSlot::MainTechnique => "technique",
        EquipmentSlot::StorageRing => "ring",
    }
}

fn target_player(app: &App) -> &Player {
    match app.equip_target {
        EquipTarget::Player => &app.player,
        EquipTarget::Opponent => &app.opponent,
    }
}

fn draw_slots(f: &mut Frame, app: &App, area: Rect) {
    let target = target_player(app);
    let target_name = match app.equip_target {
        EquipTarget::Player => "PLAYER",
        EquipTarget::Opponent => "OPPONENT",
    };

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "  [\u{2190}/\u{2192}] switch player/opponent",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for (i, slot) in EQUIP_SLOTS.iter().enumerate() {
        let is_selected = i == app.selected_slot;
        let (prefix, style) = if is_selected {
            ("> ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("  ", Style::default().fg(Color::White))
        };

        let occupant = target.equipment.get(*slot).clone().unwrap_or_else(|| "(empty)".to_string());
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(format!("{:10}", slot_name(*slot)), style),
            Span::styled(occupant, Style::default().fg(Color::Cyan)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [u] unequip selected slot",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {target_name} Equipment ")),
    );
    f.render_widget(paragraph, area);
}

fn draw_inventory(f: &mut Frame, app: &App, area: Rect) {
    let inventory = app.target_inventory();

    let mut lines: Vec<Line> = vec![];
    if inventory.is_empty() {
        lines.push(Line::from(Span::styled(
            "(storage ring is empty)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, name) in inventory.iter().enumerate() {
        let is_selected = i == app.selected_inventory;
        let (prefix, style) = if is_selected {
            ("> ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            ("  ", Style::default().fg(Color::White))
        };
        let count = target_player(app).storage_ring.count(name);
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(format!("{name} x{count}"), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Enter/Space] equip selected item",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Storage Ring "));
    f.render_widget(paragraph, area);
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let inventory = app.target_inventory();
    let mut lines: Vec<Line> = vec![];

    match inventory.get(app.selected_inventory) {
        Some(name) => {
            lines.push(Line::from(Span::styled(
                name.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));

            if let Some(technique) = app.catalogs.technique(name) {
                lines.push(Line::from(format!("kind: main technique (realm req {})", technique.realm_requirement)));
                lines.push(Line::from(format!(
                    "hp {:+}  mp {:+}  patk {:+}  matk {:+}",
                    technique.bonuses.max_hp,
                    technique.bonuses.max_mp,
                    technique.bonuses.physical_attack,
                    technique.bonuses.magic_attack,
                )));
                if !technique.passive_effects.is_empty() {
                    lines.push(Line::from(format!("passive effects: {}", technique.passive_effects.len())));
                }
                if !technique.growth_modifiers.is_empty() {
                    lines.push(Line::from(format!("growth modifiers: {}", technique.growth_modifiers.len())));
                }
            } else if let Some(item) = app.catalogs.item(name) {
                let kind = match item.kind {
                    ItemKind::Weapon => "weapon",
                    ItemKind::Armor => "armor",
                    ItemKind::MainTechnique => "main technique",
                    ItemKind::Technique => "technique",
                    ItemKind::Pill => "pill",
                    ItemKind::Material => "material",
                    ItemKind::StorageRing => "storage ring",
                };
                lines.push(Line::from(format!("kind: {kind}  rank {}", item.rank)));
                lines.push(Line::from(format!(
                    "hp {:+}  mp {:+}  patk {:+}  matk {:+}  pdef {:+}  mdef {:+}  spd {:+}",
                    item.bonuses.max_hp,
                    item.bonuses.max_mp,
                    item.bonuses.physical_attack,
                    item.bonuses.magic_attack,
                    item.bonuses.physical_defense,
                    item.bonuses.magic_defense,
                    item.bonuses.speed,
                )));
            } else {
                lines.push(Line::from("(not an equippable catalog entry)"));
            }
        }
        None => lines.push(Line::from("select an item to preview its bonuses")),
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Preview "));
    f.render_widget(paragraph, area);
}
