use cardsense_engine::cards::{parse_cards, Card};
use cardsense_engine::errors::EngineError;
use cardsense_engine::strategy::{recommend, recommend_tokens, Action};

fn card(token: &str) -> Card {
    token.parse().unwrap()
}

fn advise(hand: &[&str], upcard: &str) -> (Action, u8) {
    recommend(&parse_cards(hand).unwrap(), card(upcard)).unwrap()
}

const UPCARDS: [&str; 10] = ["2S", "3S", "4S", "5S", "6S", "7S", "8S", "9S", "TS", "AS"];

#[test]
fn hard_16_hits_against_a_ten() {
    assert_eq!(advise(&["TH", "6D"], "TC"), (Action::Hit, 16));
    assert_eq!(advise(&["9H", "7D"], "KC"), (Action::Hit, 16));
    assert_eq!(advise(&["5H", "4D", "7C"], "QC"), (Action::Hit, 16));
}

#[test]
fn eights_split_against_a_ten() {
    assert_eq!(advise(&["8H", "8D"], "TC"), (Action::Split, 16));
}

#[test]
fn hard_17_and_up_always_stand() {
    let hands: [&[&str]; 5] = [
        &["TH", "7D"],
        &["9H", "9D"],
        &["KH", "8D"],
        &["5H", "4D", "TC"],
        &["TH", "QD"],
    ];
    for hand in hands {
        for up in UPCARDS {
            let (action, total) = advise(hand, up);
            assert!(total >= 17);
            assert_eq!(action, Action::Stand, "{:?} vs {}", hand, up);
        }
    }
}

#[test]
fn busted_hands_stand() {
    assert_eq!(advise(&["TH", "QD", "5C"], "6C"), (Action::Stand, 25));
}

#[test]
fn soft_hands_read_the_soft_rows() {
    assert_eq!(advise(&["AH", "7D"], "5C"), (Action::DoubleElseStand, 18));
    assert_eq!(advise(&["AH", "7D"], "7C"), (Action::Stand, 18));
    assert_eq!(advise(&["AH", "7D"], "9C"), (Action::Hit, 18));
    assert_eq!(advise(&["AH", "6D"], "TC"), (Action::Hit, 17));
    assert_eq!(advise(&["AH", "2D", "4C"], "TC"), (Action::Hit, 17));
    assert_eq!(advise(&["AH", "8D"], "6C"), (Action::Stand, 19));
    assert_eq!(advise(&["AH", "4D", "6C"], "TC"), (Action::Stand, 21));
}

#[test]
fn hard_doubles_and_twelves() {
    assert_eq!(advise(&["6H", "5D"], "6C"), (Action::Double, 11));
    assert_eq!(advise(&["6H", "4D"], "AC"), (Action::Hit, 10));
    assert_eq!(advise(&["TH", "2D"], "4C"), (Action::Stand, 12));
    assert_eq!(advise(&["TH", "2D"], "2C"), (Action::Hit, 12));
    assert_eq!(advise(&["3H", "2D"], "6C"), (Action::Hit, 5));
}

#[test]
fn reduced_aces_count_as_hard() {
    // A + A + T is a hard 12, not a soft one
    assert_eq!(advise(&["AH", "AD", "TC"], "4C"), (Action::Stand, 12));
}

#[test]
fn pairs_follow_the_pair_rows() {
    assert_eq!(advise(&["AH", "AD"], "TC"), (Action::Split, 12));
    assert_eq!(advise(&["KH", "KD"], "6C"), (Action::Stand, 20));
    assert_eq!(advise(&["5H", "5D"], "9C"), (Action::Double, 10));
    assert_eq!(advise(&["4H", "4D"], "5C"), (Action::Hit, 8));
    assert_eq!(advise(&["7H", "7D"], "8C"), (Action::Hit, 14));
    assert_eq!(advise(&["2H", "2D"], "7C"), (Action::Split, 4));
}

#[test]
fn mixed_tens_are_not_a_pair() {
    assert_eq!(advise(&["KH", "QD"], "6C"), (Action::Stand, 20));
}

#[test]
fn tokens_are_validated() {
    assert_eq!(
        recommend_tokens(&["10H", "6D"], "10C").unwrap(),
        (Action::Hit, 16)
    );
    assert!(matches!(
        recommend_tokens(&["XH", "6D"], "TC"),
        Err(EngineError::UnknownRank(_))
    ));
    assert!(matches!(
        recommend_tokens(&["TH", "6D"], "1C"),
        Err(EngineError::UnknownRank(_))
    ));
    assert!(matches!(
        recommend(&[], card("TC")),
        Err(EngineError::InvalidHandSize { .. })
    ));
}

#[test]
fn table_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| advise(&["8H", "8D"], "TC")))
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), (Action::Split, 16));
    }
}
