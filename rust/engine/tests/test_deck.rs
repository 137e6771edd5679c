use lastturn_engine::cards::{standard_catalogue, Card};
use lastturn_engine::deck::Deck;
use lastturn_engine::errors::GameError;

#[test]
fn seeded_shuffle_is_reproducible_and_complete() {
    let a = Deck::new_with_seed(standard_catalogue(), 42).expect("deck");
    let b = Deck::new_with_seed(standard_catalogue(), 42).expect("deck");
    let c = Deck::new_with_seed(standard_catalogue(), 43).expect("deck");

    let ids = |d: &Deck| d.iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
    assert_ne!(ids(&a), ids(&c));

    let mut sorted = ids(&a);
    sorted.sort_unstable();
    let mut expected: Vec<_> = standard_catalogue().iter().map(|c| c.id).collect();
    expected.sort_unstable();
    assert_eq!(sorted, expected);
}

#[test]
fn draw_pops_from_the_front_until_empty() {
    let mut deck = Deck::new(vec![Card::new(1, "Warrior", 3, 6), Card::new(2, "Mage", 5, 3)])
        .expect("deck");
    assert_eq!(deck.draw().map(|c| c.id), Some(1));
    assert_eq!(deck.draw().map(|c| c.id), Some(2));
    assert!(deck.draw().is_none());
    assert!(deck.is_empty());
}

#[test]
fn duplicate_ids_are_refused() {
    let err = Deck::new(vec![Card::new(7, "Healer", 1, 7), Card::new(7, "Healer", 1, 7)])
        .expect_err("duplicate");
    assert_eq!(err, GameError::DuplicateCard(7));
}
