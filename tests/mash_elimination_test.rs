//! Tests for the elimination rules.

use mash::{GamePlaying, GameSetup, ItemKind, Phase, PlayTransition, SetupAction, StepEvent};
use strictly_mash::{InvariantSet, MashInvariants};

fn ready(letters: &str, categories: &[(&str, &[&str])], magic: u32) -> GameSetup {
    let mut setup = GameSetup::new(letters);
    for (key, options) in categories {
        setup
            .apply(SetupAction::AddCategory {
                key: key.to_string(),
                display_name: key.to_string(),
            })
            .expect("New category");
        for text in *options {
            setup
                .apply(SetupAction::AddOption {
                    key: key.to_string(),
                    text: text.to_string(),
                })
                .expect("Fresh option");
        }
        setup
            .apply(SetupAction::FinishCategory(key.to_string()))
            .expect("Category has options");
    }
    setup.apply(SetupAction::SetMagicNumber(magic)).expect("Valid magic number");
    setup
}

fn two_by_three(magic: u32) -> GameSetup {
    ready(
        "MASH",
        &[("car", &["Van", "Bike", "Jeep"]), ("job", &["Chef", "Pilot", "Vet"])],
        magic,
    )
}

#[test]
fn test_items_cover_letters_and_options() {
    let game = two_by_three(3).start().expect("Ready to start");
    let state = game.state();
    assert_eq!(state.phase(), Phase::Playing);
    assert_eq!(state.all_items().len(), 10);
    assert_eq!(state.all_items().len(), state.mash_letters().len() + state.option_count());

    let kinds: Vec<ItemKind> = state.all_items().iter().map(|i| i.kind()).collect();
    assert!(kinds[..4].iter().all(|k| *k == ItemKind::Mash));
    assert!(kinds[4..].iter().all(|k| *k == ItemKind::Category));
    assert_eq!(state.all_items()[4].category_key(), Some("car"));
    assert_eq!(state.all_items()[7].category_key(), Some("job"));
}

#[test]
fn test_one_survivor_per_group() {
    let results = two_by_three(3)
        .start()
        .expect("Ready to start")
        .run_to_completion()
        .expect("Elimination converges");
    let state = results.state();
    assert_eq!(state.phase(), Phase::Results);

    let surviving: Vec<_> = state.all_items().iter().filter(|i| !i.crossed()).collect();
    assert_eq!(surviving.len(), 3);
    assert_eq!(surviving.iter().filter(|i| i.kind() == ItemKind::Mash).count(), 1);
    for key in ["car", "job"] {
        assert_eq!(
            surviving.iter().filter(|i| i.category_key() == Some(key)).count(),
            1,
            "one survivor in {key}"
        );
    }

    let fortune = results.fortune();
    assert!(fortune.letter().is_some());
    assert!(fortune.home().is_some());
    assert_eq!(fortune.picks().len(), 2);
}

#[test]
fn test_survivors_are_the_selections() {
    let results = two_by_three(4)
        .start()
        .expect("Ready to start")
        .run_to_completion()
        .expect("Elimination converges");
    let state = results.state();
    for category in state.categories().values() {
        let index = category.selected_index().expect("Category resolved");
        assert!(!category.is_crossed(index));
        assert_eq!(category.remaining(), 1);
    }
    let letter = state.selected_letter().expect("Letter resolved");
    assert!(!letter.crossed());
    assert_eq!(state.mash_letters().iter().filter(|c| c.selected()).count(), 1);
}

#[test]
fn test_magic_one_crosses_in_display_order() {
    let mut game = two_by_three(1).start().expect("Ready to start");
    let mut crossed = Vec::new();
    loop {
        match game.step().expect("Step succeeds") {
            PlayTransition::Playing { game: next, event } => {
                if let StepEvent::Crossed { item, .. } = event {
                    crossed.push(item);
                }
                game = next;
            }
            PlayTransition::Finished { event, .. } => {
                if let Some(StepEvent::Crossed { item, .. }) = event {
                    crossed.push(item);
                }
                break;
            }
        }
    }
    // M A S crossed, H survives; then two of each category.
    assert_eq!(crossed, vec![0, 1, 2, 4, 5, 7, 8]);
}

#[test]
fn test_invariants_hold_after_every_step() {
    for magic in 1..=12 {
        let mut game: GamePlaying = two_by_three(magic).start().expect("Ready to start");
        let mut previous_cursor = 0;
        loop {
            MashInvariants::check_all(game.state()).expect("Invariants hold");
            match game.step().expect("Step succeeds") {
                PlayTransition::Playing { game: next, .. } => {
                    assert!(next.state().current_animation_index() > previous_cursor);
                    previous_cursor = next.state().current_animation_index();
                    game = next;
                }
                PlayTransition::Finished { results, .. } => {
                    MashInvariants::check_all(results.state()).expect("Invariants hold");
                    break;
                }
            }
        }
    }
}

#[test]
fn test_single_option_category_resolves_at_start() {
    let game = ready("MASH", &[("pet", &["Dog"]), ("car", &["Van", "Bike"])], 2)
        .start()
        .expect("Ready to start");
    let pet = game.state().category("pet").expect("Known category");
    assert_eq!(pet.selected_index(), Some(0));
    assert!(!game.is_complete());
}

#[test]
fn test_single_letter_title() {
    let results = ready("M", &[("car", &["Van", "Bike"])], 5)
        .start()
        .expect("Ready to start")
        .run_to_completion()
        .expect("Elimination converges");
    assert_eq!(results.fortune().letter(), Some('M'));
    assert_eq!(results.fortune().picks().len(), 1);
}

#[test]
fn test_rewind_replays_same_crossings() {
    let first = two_by_three(5)
        .start()
        .expect("Ready to start")
        .run_to_completion()
        .expect("Elimination converges");

    let mut game = two_by_three(5).start().expect("Ready to start");
    for _ in 0..6 {
        game = match game.step().expect("Step succeeds") {
            PlayTransition::Playing { game, .. } => game,
            PlayTransition::Finished { .. } => panic!("Too early to finish"),
        };
    }
    let rewound = game.rewind();
    assert_eq!(rewound.state().current_animation_index(), 0);
    assert!(rewound.state().all_items().iter().all(|i| !i.crossed()));

    let second = rewound.run_to_completion().expect("Elimination converges");
    assert_eq!(first.fortune(), second.fortune());
}
