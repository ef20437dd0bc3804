use cardsense_engine::blackjack::{
    par_simulate_outcomes, simulate_outcomes, win_probability, BlackjackSpot, HouseRules,
};
use cardsense_engine::cards::{parse_cards, Card};
use cardsense_engine::errors::EngineError;
use cardsense_engine::sim::StopToken;
use cardsense_engine::strategy::Action;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

fn card(token: &str) -> Card {
    token.parse().unwrap()
}

#[test]
fn standing_on_20_against_a_six_mostly_wins() {
    let hand = parse_cards(&["KS", "QD"]).unwrap();
    let p = win_probability(&hand, card("6H"), Action::Stand, 20_000, &mut rng(4)).unwrap();
    assert!(p > 0.70, "win={p}");
    assert!(p < 0.95, "win={p}");
}

#[test]
fn hitting_hard_20_almost_always_busts() {
    let hand = parse_cards(&["KS", "QD"]).unwrap();
    let p = win_probability(&hand, card("6H"), Action::Hit, 20_000, &mut rng(4)).unwrap();
    assert!(p < 0.12, "win={p}");
}

#[test]
fn rates_partition_every_trial() {
    let hand = parse_cards(&["8S", "8D"]).unwrap();
    for action in [Action::Stand, Action::Hit, Action::Double, Action::Split] {
        let spot = BlackjackSpot::new(&hand, card("TC"), action, HouseRules::default()).unwrap();
        let tally = simulate_outcomes(&spot, 5_000, &mut rng(21), None).unwrap();
        assert_eq!(tally.trials, 5_000);
        let sum = tally.win_rate() + tally.tie_rate() + tally.loss_rate();
        assert!((sum - 1.0).abs() < 1e-9, "{action:?} sums to {sum}");
    }
}

#[test]
fn split_hands_count_half_each() {
    let hand = parse_cards(&["8S", "8D"]).unwrap();
    let spot = BlackjackSpot::new(&hand, card("TC"), Action::Split, HouseRules::default()).unwrap();
    let tally = simulate_outcomes(&spot, 2_000, &mut rng(8), None).unwrap();
    for weight in [tally.wins, tally.ties, tally.losses] {
        assert_eq!((weight * 2.0).fract(), 0.0);
    }
}

#[test]
fn doubling_draws_like_hitting() {
    let hand = parse_cards(&["6S", "5D"]).unwrap();
    let hit = BlackjackSpot::new(&hand, card("6C"), Action::Hit, HouseRules::default()).unwrap();
    let dbl = BlackjackSpot::new(&hand, card("6C"), Action::Double, HouseRules::default()).unwrap();
    assert_eq!(
        simulate_outcomes(&hit, 3_000, &mut rng(2), None).unwrap(),
        simulate_outcomes(&dbl, 3_000, &mut rng(2), None).unwrap()
    );
}

#[test]
fn same_seed_same_result() {
    let hand = parse_cards(&["AS", "7D"]).unwrap();
    let a = win_probability(&hand, card("9H"), Action::Hit, 4_000, &mut rng(77)).unwrap();
    let b = win_probability(&hand, card("9H"), Action::Hit, 4_000, &mut rng(77)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn parallel_run_is_reproducible_and_agrees() {
    let hand = parse_cards(&["KS", "QD"]).unwrap();
    let spot = BlackjackSpot::new(&hand, card("6H"), Action::Stand, HouseRules::default()).unwrap();
    let a = par_simulate_outcomes(&spot, 20_000, 5, None).unwrap();
    let b = par_simulate_outcomes(&spot, 20_000, 5, None).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.trials, 20_000);

    let serial = simulate_outcomes(&spot, 20_000, &mut rng(5), None).unwrap();
    assert!((a.win_rate() - serial.win_rate()).abs() < 0.03);
}

#[test]
fn hitting_soft_17_removes_pushes_on_17() {
    let hand = parse_cards(&["TS", "7D"]).unwrap();
    let stands = HouseRules {
        decks: 4,
        dealer_hits_soft_17: false,
    };
    let hits = HouseRules {
        dealer_hits_soft_17: true,
        ..stands
    };
    let s17 = BlackjackSpot::new(&hand, card("AH"), Action::Stand, stands).unwrap();
    let h17 = BlackjackSpot::new(&hand, card("AH"), Action::Stand, hits).unwrap();
    let s17 = simulate_outcomes(&s17, 20_000, &mut rng(13), None).unwrap();
    let h17 = simulate_outcomes(&h17, 20_000, &mut rng(13), None).unwrap();
    assert!(
        s17.tie_rate() > h17.tie_rate() + 0.02,
        "s17 push={} h17 push={}",
        s17.tie_rate(),
        h17.tie_rate()
    );
}

#[test]
fn visible_cards_must_fit_the_shoe() {
    let single = HouseRules {
        decks: 1,
        dealer_hits_soft_17: false,
    };
    let hand = parse_cards(&["AS", "AS"]).unwrap();
    assert_eq!(
        BlackjackSpot::new(&hand, card("TC"), Action::Split, single),
        Err(EngineError::ExhaustedShoe)
    );
    assert!(BlackjackSpot::new(&hand, card("TC"), Action::Split, HouseRules::default()).is_ok());
}

#[test]
fn invalid_inputs_are_rejected() {
    assert!(matches!(
        win_probability(&[], card("TC"), Action::Stand, 10, &mut rng(0)),
        Err(EngineError::InvalidHandSize { .. })
    ));
    let hand = parse_cards(&["TS", "7D"]).unwrap();
    assert_eq!(
        win_probability(&hand, card("TC"), Action::Stand, 0, &mut rng(0)),
        Err(EngineError::InvalidTrialCount)
    );
}

#[test]
fn cancelled_before_any_trial() {
    let hand = parse_cards(&["TS", "7D"]).unwrap();
    let spot = BlackjackSpot::new(&hand, card("TC"), Action::Stand, HouseRules::default()).unwrap();
    let stop = StopToken::new();
    stop.cancel();
    assert_eq!(
        par_simulate_outcomes(&spot, 10_000, 1, Some(&stop)),
        Err(EngineError::Cancelled)
    );
}
