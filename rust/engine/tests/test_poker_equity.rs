use std::time::Duration;

use cardsense_engine::cards::parse_cards;
use cardsense_engine::errors::EngineError;
use cardsense_engine::poker::{equity, par_simulate_equity, simulate_equity, PokerSpot, Street};
use cardsense_engine::sim::StopToken;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[test]
fn pocket_aces_heads_up_near_85_percent() {
    let hole = parse_cards(&["AS", "AH"]).unwrap();
    let eq = equity(&hole, &[], 1, 50_000, &mut rng(42)).unwrap();
    assert!((eq - 0.85).abs() < 0.02, "equity={eq}");
}

#[test]
fn more_opponents_never_help() {
    let hole = parse_cards(&["AS", "AH"]).unwrap();
    let mut previous = 1.0;
    for opponents in 1..=4 {
        let eq = equity(&hole, &[], opponents, 10_000, &mut rng(7)).unwrap();
        assert!(
            eq <= previous,
            "{opponents} opponents gave {eq}, fewer gave {previous}"
        );
        previous = eq;
    }
}

#[test]
fn same_seed_same_result() {
    let hole = parse_cards(&["7C", "8C"]).unwrap();
    let board = parse_cards(&["9C", "TD", "2S"]).unwrap();
    let a = equity(&hole, &board, 3, 5_000, &mut rng(99)).unwrap();
    let b = equity(&hole, &board, 3, 5_000, &mut rng(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn split_board_credits_a_share_of_ties() {
    // royal flush on board: everyone ties every time
    let hole = parse_cards(&["2C", "3D"]).unwrap();
    let board = parse_cards(&["AS", "KS", "QS", "JS", "TS"]).unwrap();
    let eq = equity(&hole, &board, 2, 1_000, &mut rng(1)).unwrap();
    assert!((eq - 1.0 / 3.0).abs() < 1e-12, "equity={eq}");
}

#[test]
fn equity_stays_in_unit_interval() {
    let hole = parse_cards(&["2C", "7D"]).unwrap();
    let eq = equity(&hole, &[], 5, 3_000, &mut rng(5)).unwrap();
    assert!((0.0..=1.0).contains(&eq));
    assert!(eq < 0.2, "seven-deuce against five should be poor, got {eq}");
}

#[test]
fn board_quads_come_down_to_the_kicker() {
    // hero plays the board's queen kicker; any opponent ace wins outright
    let hole = parse_cards(&["2C", "3D"]).unwrap();
    let board = parse_cards(&["KS", "KH", "KD", "KC", "QS"]).unwrap();
    let eq = equity(&hole, &board, 1, 4_000, &mut rng(3)).unwrap();
    // no ace in 41*40 of 45*44 deals, each a half-pot tie
    assert!((eq - 0.414).abs() < 0.03, "equity={eq}");
}

#[test]
fn invalid_inputs_are_rejected() {
    let hole = parse_cards(&["AS", "AH"]).unwrap();
    let one = parse_cards(&["AS"]).unwrap();
    let board6 = parse_cards(&["2C", "3C", "4C", "5C", "6C", "7C"]).unwrap();
    let dup_board = parse_cards(&["AS", "3C", "4C"]).unwrap();

    assert!(matches!(
        equity(&one, &[], 1, 10, &mut rng(0)),
        Err(EngineError::InvalidHandSize { actual: 1, .. })
    ));
    assert!(matches!(
        equity(&hole, &board6, 1, 10, &mut rng(0)),
        Err(EngineError::InvalidHandSize { actual: 6, .. })
    ));
    assert!(matches!(
        equity(&hole, &dup_board, 1, 10, &mut rng(0)),
        Err(EngineError::DuplicateCard(_))
    ));
    assert_eq!(
        equity(&hole, &[], 0, 10, &mut rng(0)),
        Err(EngineError::InvalidOpponentCount)
    );
    assert_eq!(
        equity(&hole, &[], 1, 0, &mut rng(0)),
        Err(EngineError::InvalidTrialCount)
    );
}

#[test]
fn too_many_opponents_exhaust_the_deck() {
    let hole = parse_cards(&["AS", "AH"]).unwrap();
    assert_eq!(
        PokerSpot::new(&hole, &[], 23),
        Err(EngineError::InsufficientDeck {
            needed: 51,
            available: 50
        })
    );
    assert!(PokerSpot::new(&hole, &[], 22).is_ok());
}

#[test]
fn parallel_run_is_reproducible_and_agrees() {
    let hole = parse_cards(&["AS", "AH"]).unwrap();
    let spot = PokerSpot::new(&hole, &[], 1).unwrap();
    let a = par_simulate_equity(&spot, 20_000, 17, None).unwrap();
    let b = par_simulate_equity(&spot, 20_000, 17, None).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.trials, 20_000);
    assert!((spot.equity_of(&a) - 0.85).abs() < 0.03);
}

#[test]
fn stopped_run_reports_completed_trials_only() {
    let hole = parse_cards(&["KS", "QS"]).unwrap();
    let spot = PokerSpot::new(&hole, &[], 1).unwrap();

    let stop = StopToken::new();
    stop.cancel();
    assert_eq!(
        simulate_equity(&spot, 1_000, &mut rng(1), Some(&stop)),
        Err(EngineError::Cancelled)
    );

    let generous = StopToken::after(Duration::from_secs(600));
    let tally = simulate_equity(&spot, 1_000, &mut rng(1), Some(&generous)).unwrap();
    assert_eq!(tally.trials, 1_000);
}

#[test]
fn spot_reports_street() {
    let hole = parse_cards(&["AS", "AH"]).unwrap();
    let turn = parse_cards(&["2C", "3C", "4C", "5C"]).unwrap();
    assert_eq!(PokerSpot::new(&hole, &turn, 1).unwrap().street(), Street::Turn);
}
