//! UI helper functions for terminal output formatting.
//!
//! Plain-text renderings of snapshots and records shared by `play` and `sim`.

use lastturn_engine::cards::Card;
use lastturn_engine::logger::format_summary;
use lastturn_engine::snapshot::{MatchSnapshot, SideView};
use lastturn_session::MatchResult;
use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// `#id Name dmg/hp`, with current over maximum health once damaged.
pub fn format_card(card: &Card) -> String {
    if card.health < card.max_health {
        format!(
            "#{} {} {}/{}({})",
            card.id, card.name, card.damage, card.health, card.max_health
        )
    } else {
        format!("#{} {} {}/{}", card.id, card.name, card.damage, card.health)
    }
}

fn format_row(side: &SideView) -> String {
    side.board
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(card) => format!("[{}: {}]", i, format_card(card)),
            None => format!("[{}: -]", i),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_board(out: &mut dyn Write, snap: &MatchSnapshot) -> std::io::Result<()> {
    writeln!(
        out,
        "{} ({}/{} hp, deck {}): {}",
        snap.opponent.name,
        snap.opponent.health,
        snap.opponent.max_health,
        snap.opponent.deck_remaining,
        format_row(&snap.opponent)
    )?;
    writeln!(
        out,
        "{} ({}/{} hp, deck {}): {}",
        snap.player.name,
        snap.player.health,
        snap.player.max_health,
        snap.player.deck_remaining,
        format_row(&snap.player)
    )
}

pub fn render_hand(out: &mut dyn Write, snap: &MatchSnapshot) -> std::io::Result<()> {
    if snap.player.hand.is_empty() {
        return writeln!(out, "Hand: (empty)");
    }
    let cards: Vec<String> = snap
        .player
        .hand
        .iter()
        .map(|c| {
            let marker = if snap.selected == Some(c.id) { "*" } else { "" };
            format!("{}{}", marker, format_card(c))
        })
        .collect();
    writeln!(out, "Hand: {}", cards.join(", "))
}

pub fn render_status(out: &mut dyn Write, snap: &MatchSnapshot) -> std::io::Result<()> {
    writeln!(
        out,
        "Turn: {} | match {}s | action {}s",
        snap.turn, snap.remaining_total_secs, snap.remaining_action_secs
    )
}

pub fn render_result(out: &mut dyn Write, result: &MatchResult) -> std::io::Result<()> {
    writeln!(
        out,
        "Match over: {}. {}",
        result.outcome,
        result.reason.describe()
    )?;
    writeln!(
        out,
        "{}",
        format_summary(
            result.cards_eliminated,
            result.damage_dealt,
            result.damage_received
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damaged_cards_show_max_health() {
        let card = Card::new(10, "Dragon", 7, 6);
        assert_eq!(format_card(&card), "#10 Dragon 7/6");
        assert_eq!(format_card(&card.after_hit(2)), "#10 Dragon 7/4(6)");
    }

    #[test]
    fn write_error_prefixes_message() {
        let mut err = Vec::new();
        write_error(&mut err, "boom").unwrap();
        assert_eq!(String::from_utf8(err).unwrap(), "Error: boom\n");
    }
}
