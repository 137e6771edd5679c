//! Terminal-condition checks. Outcomes are always stated from the human
//! player's perspective.

use serde::{Deserialize, Serialize};

use crate::player::{Side, SideId};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Victory,
    Defeat,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Victory => "VICTORY",
            Outcome::Defeat => "DEFEAT",
            Outcome::Draw => "DRAW",
        }
    }

    fn for_winner(side: SideId) -> Outcome {
        match side {
            SideId::Player => Outcome::Victory,
            SideId::Opponent => Outcome::Defeat,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VICTORY" => Ok(Outcome::Victory),
            "DEFEAT" => Ok(Outcome::Defeat),
            "DRAW" => Ok(Outcome::Draw),
            other => Err(format!("unknown outcome '{other}'")),
        }
    }
}

/// Which rule decided the match.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Both sides reached zero health; damage dealt broke the tie
    BothDefeated,
    /// One side reached zero health
    HealthDepleted,
    /// Neither side has a card left anywhere
    AllCardsExhausted,
    /// One side has no card left anywhere
    CardsExhausted,
    /// The total match clock ran out
    TimeExpired,
}

impl EndReason {
    /// Wire name, as written in match records.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::BothDefeated => "both_defeated",
            EndReason::HealthDepleted => "health_depleted",
            EndReason::AllCardsExhausted => "all_cards_exhausted",
            EndReason::CardsExhausted => "cards_exhausted",
            EndReason::TimeExpired => "time_expired",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            EndReason::BothDefeated => "Both sides were defeated; damage dealt decides.",
            EndReason::HealthDepleted => "A side ran out of health.",
            EndReason::AllCardsExhausted => "Both sides ran out of cards.",
            EndReason::CardsExhausted => "A side ran out of cards.",
            EndReason::TimeExpired => "Total match time expired.",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub reason: EndReason,
}

impl Verdict {
    fn new(outcome: Outcome, reason: EndReason) -> Self {
        Self { outcome, reason }
    }
}

/// Checks the terminal conditions in priority order. `None` means the match
/// continues.
pub fn evaluate(player: &Side, opponent: &Side) -> Option<Verdict> {
    match (player.is_defeated(), opponent.is_defeated()) {
        (true, true) => {
            return Some(Verdict::new(
                compare_damage(player, opponent),
                EndReason::BothDefeated,
            ));
        }
        (true, false) => {
            return Some(Verdict::new(
                Outcome::for_winner(SideId::Opponent),
                EndReason::HealthDepleted,
            ));
        }
        (false, true) => {
            return Some(Verdict::new(
                Outcome::for_winner(SideId::Player),
                EndReason::HealthDepleted,
            ));
        }
        (false, false) => {}
    }

    match (player.has_cards_available(), opponent.has_cards_available()) {
        (false, false) => Some(Verdict::new(
            compare_health_then_damage(player, opponent),
            EndReason::AllCardsExhausted,
        )),
        (false, true) => Some(Verdict::new(
            Outcome::for_winner(SideId::Opponent),
            EndReason::CardsExhausted,
        )),
        (true, false) => Some(Verdict::new(
            Outcome::for_winner(SideId::Player),
            EndReason::CardsExhausted,
        )),
        (true, true) => None,
    }
}

/// Decides a match whose total clock ran out: health first, then damage dealt.
pub fn evaluate_by_time(player: &Side, opponent: &Side) -> Verdict {
    Verdict::new(
        compare_health_then_damage(player, opponent),
        EndReason::TimeExpired,
    )
}

fn compare_health_then_damage(player: &Side, opponent: &Side) -> Outcome {
    match player.health().cmp(&opponent.health()) {
        std::cmp::Ordering::Greater => Outcome::Victory,
        std::cmp::Ordering::Less => Outcome::Defeat,
        std::cmp::Ordering::Equal => compare_damage(player, opponent),
    }
}

fn compare_damage(player: &Side, opponent: &Side) -> Outcome {
    let dealt = player.metrics().damage_dealt;
    let received = opponent.metrics().damage_dealt;
    match dealt.cmp(&received) {
        std::cmp::Ordering::Greater => Outcome::Victory,
        std::cmp::Ordering::Less => Outcome::Defeat,
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::deck::Deck;

    fn stocked(name: &str) -> Side {
        let deck = Deck::new(vec![Card::new(1, "Warrior", 3, 6)]).expect("deck");
        Side::new(name, deck, 2)
    }

    fn empty(name: &str) -> Side {
        Side::new(name, Deck::default(), 2)
    }

    #[test]
    fn continues_while_both_sides_have_cards_and_health() {
        assert_eq!(evaluate(&stocked("p"), &stocked("o")), None);
    }

    #[test]
    fn health_beats_card_exhaustion() {
        let p = empty("p");
        let mut o = stocked("o");
        o.take_direct_hit(3);
        let verdict = evaluate(&p, &o).expect("terminal");
        assert_eq!(verdict.outcome, Outcome::Victory);
        assert_eq!(verdict.reason, EndReason::HealthDepleted);
    }

    #[test]
    fn mutual_defeat_compares_damage() {
        let mut p = stocked("p");
        let mut o = stocked("o");
        p.take_direct_hit(3);
        o.take_direct_hit(3);
        assert_eq!(
            evaluate(&p, &o),
            Some(Verdict::new(Outcome::Draw, EndReason::BothDefeated))
        );
        p.metrics.damage_dealt = 4;
        assert_eq!(evaluate(&p, &o).map(|v| v.outcome), Some(Outcome::Victory));
    }

    #[test]
    fn card_exhaustion_on_one_or_both_sides() {
        let verdict = evaluate(&empty("p"), &stocked("o")).expect("terminal");
        assert_eq!(verdict, Verdict::new(Outcome::Defeat, EndReason::CardsExhausted));

        let p = empty("p");
        let mut o = empty("o");
        o.take_direct_hit(1);
        let verdict = evaluate(&p, &o).expect("terminal");
        assert_eq!(verdict, Verdict::new(Outcome::Victory, EndReason::AllCardsExhausted));
    }

    #[test]
    fn time_expiry_falls_back_to_damage_then_draw() {
        let mut p = stocked("p");
        let o = stocked("o");
        assert_eq!(evaluate_by_time(&p, &o).outcome, Outcome::Draw);
        p.metrics.damage_dealt = 2;
        assert_eq!(evaluate_by_time(&p, &o).outcome, Outcome::Victory);
        p.take_direct_hit(1);
        assert_eq!(evaluate_by_time(&p, &o).outcome, Outcome::Defeat);
    }

    #[test]
    fn outcome_parses_case_insensitively() {
        assert_eq!("victory".parse::<Outcome>(), Ok(Outcome::Victory));
        assert!("win".parse::<Outcome>().is_err());
    }
}
