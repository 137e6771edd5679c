//! Lane-by-lane combat between the two boards.
//!
//! Lane `i` pits the player's slot `i` against the opponent's slot `i`.
//! Two occupants clash simultaneously: both damage values are read before
//! either card is written back. A lone occupant hits the opposing side
//! itself for [`DIRECT_HIT`] point.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::player::{Side, SideId};

/// Health a side loses when an unopposed card attacks it.
pub const DIRECT_HIT: u32 = 1;

/// What happened in one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaneResult {
    Clash {
        lane: usize,
        player_card: String,
        opponent_card: String,
        /// Health of the player's card after the exchange
        player_card_health: u32,
        /// Health of the opponent's card after the exchange
        opponent_card_health: u32,
    },
    DirectHit {
        lane: usize,
        attacker: SideId,
        card: String,
        defender_health: u32,
    },
    Empty {
        lane: usize,
    },
}

impl LaneResult {
    pub fn is_direct_hit(&self) -> bool {
        matches!(self, LaneResult::DirectHit { .. })
    }

    /// Human readable line for the match log. Empty lanes have none.
    pub fn describe(&self) -> Option<String> {
        match self {
            LaneResult::Clash {
                lane,
                player_card,
                opponent_card,
                player_card_health,
                opponent_card_health,
            } => {
                let mut line = format!(
                    "Lane {lane}: {player_card} clashes with {opponent_card} ({player_card_health} hp vs {opponent_card_health} hp)."
                );
                if *player_card_health == 0 {
                    line.push_str(&format!(" {player_card} is eliminated."));
                }
                if *opponent_card_health == 0 {
                    line.push_str(&format!(" {opponent_card} is eliminated."));
                }
                Some(line)
            }
            LaneResult::DirectHit {
                lane,
                attacker,
                card,
                defender_health,
            } => Some(format!(
                "Lane {lane}: {card} hits the {} directly ({defender_health} hp left).",
                attacker.other().label()
            )),
            LaneResult::Empty { .. } => None,
        }
    }
}

/// Resolves a single lane, mutating boards, health and metrics.
///
/// This is the only place combat damage is applied.
pub fn resolve_lane(player: &mut Side, opponent: &mut Side, lane: usize) -> LaneResult {
    let player_card = player.board.slot(lane).and_then(|s| s.card().cloned());
    let opponent_card = opponent.board.slot(lane).and_then(|s| s.card().cloned());

    match (player_card, opponent_card) {
        (Some(pc), Some(oc)) => clash(player, opponent, lane, pc, oc),
        (Some(pc), None) => direct_hit(player, opponent, lane, pc, SideId::Player),
        (None, Some(oc)) => direct_hit(opponent, player, lane, oc, SideId::Opponent),
        (None, None) => LaneResult::Empty { lane },
    }
}

fn clash(player: &mut Side, opponent: &mut Side, lane: usize, pc: Card, oc: Card) -> LaneResult {
    let player_after = pc.after_hit(oc.damage);
    let opponent_after = oc.after_hit(pc.damage);

    player.metrics.damage_dealt = player.metrics.damage_dealt.saturating_add(pc.damage);
    opponent.metrics.damage_dealt = opponent.metrics.damage_dealt.saturating_add(oc.damage);
    if opponent_after.is_defeated() {
        player.metrics.cards_eliminated += 1;
    }
    if player_after.is_defeated() {
        opponent.metrics.cards_eliminated += 1;
    }

    let result = LaneResult::Clash {
        lane,
        player_card: pc.name,
        opponent_card: oc.name,
        player_card_health: player_after.health,
        opponent_card_health: opponent_after.health,
    };

    if let Some(slot) = player.board.slot_mut(lane) {
        slot.update(player_after);
    }
    if let Some(slot) = opponent.board.slot_mut(lane) {
        slot.update(opponent_after);
    }
    result
}

fn direct_hit(
    attacker: &mut Side,
    defender: &mut Side,
    lane: usize,
    card: Card,
    attacker_id: SideId,
) -> LaneResult {
    defender.take_direct_hit(DIRECT_HIT);
    attacker.metrics.damage_dealt = attacker.metrics.damage_dealt.saturating_add(card.damage);
    LaneResult::DirectHit {
        lane,
        attacker: attacker_id,
        card: card.name,
        defender_health: defender.health(),
    }
}
