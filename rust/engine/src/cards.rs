use serde::{Deserialize, Serialize};

/// Stable identity of a card within one match.
pub type CardId = u32;

/// A combat unit: deals `damage` to the opposing lane and dies when its
/// `health` reaches zero.
///
/// Cards have value semantics. Damage never mutates a card in place; it
/// produces a new copy through [`Card::with_health`] so that a card held in a
/// hand and a card on the board can never alias each other.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Identity, unique within one deck
    pub id: CardId,
    /// Display name
    pub name: String,
    /// Damage dealt to the opposing card each combat
    pub damage: u32,
    /// Current health, never above `max_health`
    pub health: u32,
    /// Health the card entered play with
    pub max_health: u32,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>, damage: u32, max_health: u32) -> Self {
        Self {
            id,
            name: name.into(),
            damage,
            health: max_health,
            max_health,
        }
    }

    /// Copy of this card with `health` replaced, clamped to `0..=max_health`.
    pub fn with_health(&self, health: u32) -> Card {
        Card {
            health: health.min(self.max_health),
            ..self.clone()
        }
    }

    /// Copy of this card after taking `damage` points.
    pub fn after_hit(&self, damage: u32) -> Card {
        self.with_health(self.health.saturating_sub(damage))
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} ({} dmg, {}/{} hp)",
            self.id, self.name, self.damage, self.health, self.max_health
        )
    }
}

/// The standard 13-card catalogue every side starts with.
pub fn standard_catalogue() -> Vec<Card> {
    vec![
        Card::new(1, "Warrior", 3, 6),
        Card::new(2, "Mage", 5, 3),
        Card::new(3, "Archer", 4, 4),
        Card::new(4, "Golem", 2, 9),
        Card::new(5, "Ninja", 6, 3),
        Card::new(6, "Berserker", 8, 1),
        Card::new(7, "Healer", 1, 7),
        Card::new(8, "Assassin", 7, 2),
        Card::new(9, "Knight", 4, 7),
        Card::new(10, "Dragon", 7, 6),
        Card::new(11, "Squire", 2, 8),
        Card::new(13, "Lancer", 5, 5),
        Card::new(14, "Hound", 4, 2),
    ]
}
