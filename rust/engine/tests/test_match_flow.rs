use lastturn_engine::cards::Card;
use lastturn_engine::clock::TickOutcome;
use lastturn_engine::engine::{Match, MatchSetup, Step};
use lastturn_engine::errors::GameError;
use lastturn_engine::game::{MatchConfig, Placement, TurnState};
use lastturn_engine::outcome::{EndReason, Outcome};

fn filler(start: u32, count: u32) -> Vec<Card> {
    (start..start + count)
        .map(|id| Card::new(id, format!("Recruit{id}"), 1, 9))
        .collect()
}

fn config(board_size: usize) -> MatchConfig {
    MatchConfig {
        board_size,
        total_time_secs: 5,
        action_time_secs: 3,
        seed: Some(1),
        ..Default::default()
    }
}

#[test]
fn standard_start_deals_and_opens_for_the_opponent() {
    let game = Match::start(config(4)).expect("start");
    assert_eq!(game.turn(), TurnState::AwaitingPlayer);
    assert_eq!(game.player().hand().len(), 3);
    assert_eq!(game.player().deck().remaining(), 10);
    assert_eq!(game.opponent().hand().len(), 2);
    assert_eq!(game.opponent().board().occupied(), 1);
    assert!(game.opponent().board().slot(0).is_some_and(|s| !s.is_empty()));
    assert!(game.outcome().is_none());
    assert!(game.log().contains("New match started"));
    assert!(game.log().contains("Opponent opens"));
}

#[test]
fn same_seed_gives_same_opponent_order() {
    let a = Match::start(config(4)).expect("start");
    let b = Match::start(config(4)).expect("start");
    let ids = |m: &Match| m.opponent().deck().iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
    assert_eq!(a.seed(), 1);
}

// An unopposed 5-damage card still takes only one point of health.
#[test]
fn placement_into_open_lane_deals_one_direct_damage() {
    let mut player_deck = vec![Card::new(2, "Mage", 5, 3)];
    player_deck.extend(filler(100, 6));
    let setup = MatchSetup {
        opponent_opens: false,
        ..MatchSetup::with_decks(player_deck, filler(200, 6))
    };
    let mut game = Match::with_setup(config(4), setup).expect("start");

    game.select_card(2).expect("mage in hand");
    game.place_card(0).expect("empty slot");
    assert_eq!(game.turn(), TurnState::ResolvingCombat);
    assert_eq!(game.selected(), None);

    let step = game.advance(|_| None);
    assert!(matches!(step, Step::CombatResolved(ref lanes) if lanes.len() == 4));
    assert_eq!(game.opponent().health(), 2);
    assert_eq!(game.player().health(), 3);
    assert_eq!(game.player().metrics().damage_dealt, 5);
    assert_eq!(game.turn(), TurnState::AwaitingPlayer);
    assert_eq!(game.turns_played(), 1);
    // two draws each after combat
    assert_eq!(game.player().hand().len(), 4);
    assert_eq!(game.opponent().hand().len(), 5);
}

#[test]
fn opponent_reply_is_placed_after_player_triggered_combat() {
    let setup = MatchSetup {
        opponent_opens: false,
        ..MatchSetup::with_decks(filler(1, 6), filler(50, 6))
    };
    let mut game = Match::with_setup(config(3), setup).expect("start");
    game.select_card(1).expect("in hand");
    game.place_card(1).expect("empty");

    let steps = game.run_until_idle(|m| {
        let card_id = m.opponent().hand().first()?.id;
        let slot = m.opponent().board().first_empty()?;
        Some(Placement { card_id, slot })
    });

    assert_eq!(steps.len(), 1);
    assert_eq!(game.opponent().board().occupied(), 1);
    assert!(game.log().contains("Opponent placed Recruit50 in slot 0."));
    assert_eq!(game.turn(), TurnState::AwaitingPlayer);
}

#[test]
fn invalid_opponent_choice_is_a_pass() {
    let setup = MatchSetup {
        opponent_opens: false,
        ..MatchSetup::with_decks(filler(1, 6), filler(50, 6))
    };
    let mut game = Match::with_setup(config(2), setup).expect("start");
    for _ in 0..3 {
        game.tick_action();
    }
    assert_eq!(game.turn(), TurnState::AwaitingOpponent);
    let step = game.advance(|_| {
        Some(Placement {
            card_id: 999,
            slot: 0,
        })
    });
    assert_eq!(step, Step::OpponentPlaced(None));
    assert_eq!(game.opponent().board().occupied(), 0);
    assert!(game.log().contains("invalid placement"));
}

// Running out the action clock passes the placement to the opponent.
#[test]
fn action_expiry_forfeits_to_the_opponent() {
    let mut game = Match::start(config(4)).expect("start");
    let board_before = game.player().board().occupied();

    assert_eq!(game.tick_action(), TickOutcome::Running { remaining: 2 });
    assert_eq!(game.tick_action(), TickOutcome::Running { remaining: 1 });
    assert_eq!(game.tick_action(), TickOutcome::Forfeited);

    assert_eq!(game.turn(), TurnState::AwaitingOpponent);
    assert_eq!(game.player().board().occupied(), board_before);
    assert!(game.log().contains("forfeits"));
    assert_eq!(game.clock().action.remaining(), 3);

    let step = game.advance(|_| None);
    assert_eq!(step, Step::OpponentPlaced(None));
    assert_eq!(game.turn(), TurnState::ResolvingCombat);
}

#[test]
fn action_expiry_outside_player_turn_does_nothing() {
    let mut game = Match::start(config(4)).expect("start");
    let card = game.player().hand().cards()[0].id;
    game.select_card(card).expect("select");
    game.place_card(1).expect("place");
    for _ in 0..2 {
        game.tick_action();
    }
    assert_eq!(game.tick_action(), TickOutcome::Expired);
    assert_eq!(game.turn(), TurnState::ResolvingCombat);
}

// Player at 2 and opponent at 1 when time runs out is a victory, even though
// the opponent dealt more damage.
#[test]
fn total_time_expiry_prefers_health_over_damage() {
    let mut player_deck = vec![Card::new(1, "Spear", 1, 9)];
    player_deck.extend(filler(100, 6));
    let mut opponent_deck = vec![Card::new(50, "Titan", 9, 9)];
    opponent_deck.extend(filler(200, 6));
    let setup = MatchSetup {
        opponent_opens: false,
        ..MatchSetup::with_decks(player_deck, opponent_deck)
    };
    let mut game = Match::with_setup(config(2), setup).expect("start");

    let titan = |m: &Match| {
        m.opponent()
            .hand()
            .contains(50)
            .then_some(Placement { card_id: 50, slot: 1 })
    };

    // Turn 1: Spear hits the opponent, Titan is placed as the reply.
    game.select_card(1).expect("spear");
    game.place_card(0).expect("slot 0");
    game.run_until_idle(titan);
    assert_eq!(game.opponent().health(), 2);

    // Turn 2: the player forfeits, both unopposed cards hit.
    for _ in 0..3 {
        game.tick_action();
    }
    game.run_until_idle(titan);
    assert_eq!(game.player().health(), 2);
    assert_eq!(game.opponent().health(), 1);
    assert!(game.opponent().metrics().damage_dealt > game.player().metrics().damage_dealt);

    for _ in 0..4 {
        assert!(matches!(game.tick_total(), TickOutcome::Running { .. }));
    }
    assert_eq!(
        game.tick_total(),
        TickOutcome::Finished {
            outcome: Outcome::Victory
        }
    );
    let verdict = game.verdict().expect("decided");
    assert_eq!(verdict.reason, EndReason::TimeExpired);
}

// Both last cards die in one clash, so both sides run out together.
#[test]
fn simultaneous_exhaustion_compares_damage_then_draws() {
    let run = |player_damage: u32| {
        let setup = MatchSetup {
            opening_hand: 1,
            opponent_opens: true,
            ..MatchSetup::with_decks(
                vec![Card::new(1, "Twin", player_damage, 4)],
                vec![Card::new(1, "Twin", 4, 4)],
            )
        };
        let mut game = Match::with_setup(config(1), setup).expect("start");
        assert_eq!(game.opponent().board().occupied(), 1);
        game.select_card(1).expect("select");
        game.place_card(0).expect("place");
        let step = game.advance(|_| None);
        (game, step)
    };

    let (game, step) = run(4);
    assert_eq!(step, Step::Finished(Outcome::Draw));
    assert_eq!(
        game.verdict().map(|v| v.reason),
        Some(EndReason::AllCardsExhausted)
    );
    assert_eq!(game.player().metrics().cards_eliminated, 1);
    assert_eq!(game.opponent().metrics().cards_eliminated, 1);

    let (game, step) = run(5);
    assert_eq!(step, Step::Finished(Outcome::Victory));
    assert_eq!(game.player().health(), 3);
}

#[test]
fn one_side_out_of_cards_loses() {
    let setup = MatchSetup {
        opening_hand: 1,
        opponent_opens: false,
        ..MatchSetup::with_decks(vec![Card::new(1, "Hound", 4, 2)], filler(10, 5))
    };
    let mut game = Match::with_setup(config(1), setup).expect("start");
    game.select_card(1).expect("select");
    game.place_card(0).expect("place");
    // reply lands a Recruit (1 dmg, 9 hp) opposite the Hound
    game.run_until_idle(|m| {
        Some(Placement {
            card_id: m.opponent().hand().first()?.id,
            slot: 0,
        })
    });
    assert!(!game.is_finished());

    for _ in 0..3 {
        game.tick_action();
    }
    // Hound (2 hp) survives its first clash with the Recruit
    game.run_until_idle(|_| None);
    assert!(!game.is_finished());
    for _ in 0..3 {
        game.tick_action();
    }
    let steps = game.run_until_idle(|_| None);
    assert_eq!(steps.last(), Some(&Step::Finished(Outcome::Defeat)));
    assert_eq!(
        game.verdict().map(|v| v.reason),
        Some(EndReason::CardsExhausted)
    );
}

#[test]
fn finished_match_ignores_everything() {
    let setup = MatchSetup {
        opening_hand: 1,
        opponent_opens: true,
        ..MatchSetup::with_decks(
            vec![Card::new(1, "Twin", 4, 4)],
            vec![Card::new(1, "Twin", 4, 4)],
        )
    };
    let mut game = Match::with_setup(config(1), setup).expect("start");
    game.select_card(1).expect("select");
    game.place_card(0).expect("place");
    game.advance(|_| None);
    let verdict = game.verdict().expect("finished");
    let log_len = game.log().len();
    let player_metrics = game.player().metrics();
    let opponent_metrics = game.opponent().metrics();

    assert_eq!(game.tick_total(), TickOutcome::Ignored);
    assert_eq!(game.tick_action(), TickOutcome::Ignored);
    assert_eq!(game.advance(|_| None), Step::Idle);
    assert_eq!(game.evaluate(), Some(verdict.outcome));
    assert_eq!(game.evaluate(), Some(verdict.outcome));
    assert_eq!(game.verdict(), Some(verdict));
    assert_eq!(game.player().metrics(), player_metrics);
    assert_eq!(game.opponent().metrics(), opponent_metrics);

    for _ in 0..5 {
        assert_eq!(game.select_card(1), Err(GameError::MatchFinished));
        assert_eq!(game.place_card(0), Err(GameError::MatchFinished));
    }
    assert_eq!(game.log().len(), log_len);
    assert_eq!(game.selected(), None);
}

#[test]
fn health_never_goes_below_zero() {
    let setup = MatchSetup {
        opponent_opens: false,
        ..MatchSetup::with_decks(filler(1, 12), filler(50, 12))
    };
    let mut game = Match::with_setup(config(4), setup).expect("start");
    let mut slot = 0;
    while !game.is_finished() && slot < 4 {
        let card = game.player().hand().cards()[0].id;
        game.select_card(card).expect("select");
        game.place_card(slot).expect("place");
        game.run_until_idle(|_| None);
        slot += 1;
    }
    assert_eq!(game.outcome(), Some(Outcome::Victory));
    assert_eq!(game.opponent().health(), 0);
    assert!(game.player().health() <= game.player().max_health());
}
