use lastturn_cli::run_with_input;
use std::io::Cursor;

fn play(args: &[&str], input: &str) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run_with_input(
        args.iter().copied(),
        Box::new(Cursor::new(input.as_bytes().to_vec())),
        &mut out,
        &mut err,
    );
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn place_then_quit_abandons_the_match() {
    let (code, out, err) = play(
        &["lastturn", "play", "--seed", "42", "--name", "Ada"],
        "hand\nselect 1\nplace 0\nquit\n",
    );
    assert_eq!(code, 130, "stderr: {err}");
    assert!(out.contains("New match started with 4 slots."));
    assert!(out.contains("Hand: #1 Warrior 3/6, #2 Mage 5/3, #3 Archer 4/4"));
    assert!(out.contains("Card selected: Warrior"));
    assert!(out.contains("Card Warrior placed in slot 0."));
    assert!(out.contains("Combat phase started."));
    assert!(out.contains("Match abandoned."));
}

#[test]
fn rejected_intents_are_reported_and_play_continues() {
    let (code, out, err) = play(
        &["lastturn", "play", "--seed", "1"],
        "place 0\nselect 99\nattack\nselect 2\nplace 7\nboard\n",
    );
    // end of input counts as quitting
    assert_eq!(code, 130);
    assert!(err.contains("No card selected for placement"));
    assert!(err.contains("Card 99 is not in hand"));
    assert!(err.contains("unknown command: attack"));
    assert!(err.contains("Slot 7 does not exist (board size 4)"));
    assert!(out.contains("Card selected: Mage"));
    assert!(out.contains("Turn: AWAITING_PLAYER"));
}

#[test]
fn invalid_flags_fail_before_the_match_starts() {
    let (code, out, err) = play(&["lastturn", "play", "--board-size", "0"], "quit\n");
    assert_eq!(code, 2);
    assert!(err.contains("board_size must be between 1 and 8"));
    assert!(!out.contains("New match started"));
}
