//! Help tab: keybindings and a summary of the stats composition / combat
//! rules this visualizer drives.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub fn draw(f: &mut Frame, _app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "\u{2550}\u{2550}\u{2550} Navigation \u{2550}\u{2550}\u{2550}",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("1-6", "jump to tab (Stats/Equip/Calc/Combat/Skills/Help)"),
        key_line("Tab / Shift+Tab", "next/previous tab"),
        key_line("\u{2191}/k  \u{2193}/j", "navigate lists / scroll"),
        key_line("q / Ctrl+C", "quit"),
        key_line("?", "toggle this help"),
        Line::from(""),
        Line::from(Span::styled(
            "\u{2550}\u{2550}\u{2550} Equipment \u{2550}\u{2550}\u{2550}",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("\u{2190}/\u{2192}", "switch player/opponent target"),
        key_line("u", "unequip selected slot"),
        key_line("Enter/Space", "equip selected storage-ring item"),
        Line::from(""),
        Line::from(Span::styled(
            "\u{2550}\u{2550}\u{2550} Skills \u{2550}\u{2550}\u{2550}",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("\u{2191}/\u{2193}", "select a learned skill"),
        key_line("Enter/Space", "equip/unequip selected skill (capacity 2)"),
        Line::from(""),
        Line::from(Span::styled(
            "\u{2550}\u{2550}\u{2550} Combat \u{2550}\u{2550}\u{2550}",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        key_line("a / Enter / Space", "resolve a full battle now"),
        key_line("b", "toggle duel / spar"),
        key_line("r", "clear the battle log"),
        key_line("t", "advance the simulated clock by 1 second"),
        Line::from(""),
        Line::from(Span::styled(
            "\u{2550}\u{2550}\u{2550} Composition Pipeline \u{2550}\u{2550}\u{2550}",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from("  realm base -> permanent pill gains -> equipment -> techniques"),
        Line::from("  -> percentage modifiers -> temporary pill multipliers -> clamps"),
        Line::from(""),
        Line::from(Span::styled(
            "\u{2550}\u{2550}\u{2550} Combat Round \u{2550}\u{2550}\u{2550}",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from("  dot tick -> effect duration decrement -> turn order by speed"),
        Line::from("  (coin flip on ties) -> actions -> spar surrender check -> cooldowns"),
        Line::from("  capped at 50 rounds; duels and world boss fights never end in surrender"),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help & Mechanics "));

    f.render_widget(paragraph, area);
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:20}", key), Style::default().fg(Color::Yellow)),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
