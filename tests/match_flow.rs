use snake_defense::consts::TICK_SECONDS;
use snake_defense::ranking::{Leaderboard, ScoreTransport, SubmitOutcome};
use snake_defense::regions::Selection;
use snake_defense::sim::{Action, TowerKind};
use snake_defense::{SelectionPolicy, Session, Settings, Speed};

fn play(settings: &Settings) -> Session {
    let mut session = Session::new(settings);
    session.set_speed(Speed::X3);
    // One tower per lane while the ledger lasts
    for x in [180.0, 60.0, 300.0] {
        session.begin_placement(TowerKind::Normal);
        session.finish_placement(x, 300.0);
    }
    while !session.state().game_over {
        session.frame(TICK_SECONDS * 10.0);
    }
    session
}

#[test]
fn same_seed_same_match() {
    let settings = Settings {
        starting_ledger: 21,
        ..Settings::default()
    };
    let a = play(&settings);
    let b = play(&settings);
    assert_eq!(a.state().time_ticks, b.state().time_ticks);
    assert_eq!(a.state().enemies_defeated, b.state().enemies_defeated);
    assert_eq!(a.score(), b.score());
    assert!(a.state().enemies_defeated > 0);
}

#[test]
fn finished_match_is_frozen() {
    let mut session = play(&Settings::default());
    let ticks = session.state().time_ticks;
    let score = session.score();
    session.frame(5.0);
    assert_eq!(session.state().time_ticks, ticks);
    assert_eq!(session.score(), score);
    assert!(session.snapshot().game_over);
}

#[test]
fn action_log_records_ticks() {
    let settings = Settings {
        starting_ledger: 100,
        selection: SelectionPolicy::Nearest,
        ..Settings::default()
    };
    let mut session = Session::new(&settings);
    session.frame(TICK_SECONDS * 30.5);
    session.begin_placement(TowerKind::Venom);
    let id = session.finish_placement(180.0, 200.0).unwrap();

    session.click(180.0, 200.0);
    assert_eq!(session.selection(), Some(Selection::Tower(id)));
    let button = session.snapshot().upgrade_button.unwrap();
    session.click(button.rect.x + 5.0, button.rect.y + 5.0);

    let entries = session.state().log.entries();
    assert_eq!(entries.len(), 2);
    assert!(matches!(entries[0], Action::Place { frame: 30, level: 1, .. }));
    assert!(matches!(entries[1], Action::Upgrade { frame: 30, level: 2, .. }));
}

#[test]
fn submit_then_rank() {
    let mut board = Leaderboard::new();
    let mut session = play(&Settings::default());
    let total = session.score().total;

    let outcome = session
        .submit_score(&mut board, "alice", "first try", "key")
        .unwrap();
    assert_eq!(
        outcome,
        SubmitOutcome::Created {
            name: "alice".into(),
            score: total as f64
        }
    );

    // A later, worse run from the same player is ignored
    let outcome = board.submit("alice", total as f64 - 1.0, 0.0);
    assert!(matches!(outcome, SubmitOutcome::Ignored { .. }));
    let ranking = board.fetch_ranking().unwrap();
    assert_eq!(ranking[0].score, total as f64);
    assert_eq!(session.snapshot().ranking, ranking.as_slice());
}
