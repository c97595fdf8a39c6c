//! Snake Defense headless runner
//!
//! Plays a short scripted match against the simulation core and prints the
//! result screen data and the action log.

use std::path::PathBuf;

use snake_defense::consts::{TICK_SECONDS, TICKS_PER_SECOND};
use snake_defense::ranking::Leaderboard;
use snake_defense::regions::Selection;
use snake_defense::sim::TowerKind;
use snake_defense::{Session, Settings, Speed};

/// Give up on matches that outlive this many simulated seconds
const MAX_SECONDS: u64 = 60 * 30;

/// Scripted build order: (second, kind, x, y)
const BUILD_ORDER: [(u64, TowerKind, f64, f64); 5] = [
    (0, TowerKind::Normal, 180.0, 260.0),
    (3, TowerKind::Producer, 330.0, 520.0),
    (15, TowerKind::Stone, 60.0, 300.0),
    (30, TowerKind::Venom, 300.0, 340.0),
    (45, TowerKind::Normal, 180.0, 420.0),
];

fn main() {
    env_logger::init();

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load_or_default(&path),
        None => Settings::default(),
    };
    log::info!("Snake Defense (headless) starting...");

    let mut session = Session::new(&settings);
    session.set_speed(Speed::X3);

    let mut next_build = 0;
    while !session.state().game_over && session.state().seconds < MAX_SECONDS {
        let seconds = session.state().seconds;
        if let Some(&(at, kind, x, y)) = BUILD_ORDER.get(next_build) {
            if seconds >= at {
                session.begin_placement(kind);
                if session.finish_placement(x, y).is_some() {
                    next_build += 1;
                }
            }
        }

        // Upgrade the first tower whenever the ledger allows it
        if seconds % 10 == 0 && !session.state().towers.is_empty() {
            session.click(180.0, 260.0);
            if session.selection() == Some(Selection::Tower(1)) {
                if let Some(button) = session.snapshot().upgrade_button {
                    session.click(button.rect.x + 1.0, button.rect.y + 1.0);
                }
                session.clear_selection();
            }
        }

        session.frame(TICK_SECONDS * TICKS_PER_SECOND as f64 / 6.0);
    }

    let snapshot = session.snapshot();
    let score = snapshot.score;
    println!("Survived {} s (game over: {})", snapshot.seconds, snapshot.game_over);
    println!(
        "Score {} = towers {} + enemies {} + ledger {} + time {}",
        score.total, score.towers, score.enemies, score.ledger, score.time
    );
    match session.state().log.to_json() {
        Ok(json) => println!("Record: {json}"),
        Err(e) => log::error!("Could not serialize action log: {e}"),
    }

    // Rank against an in-process board when the match actually ended
    let mut board = Leaderboard::new();
    if let Err(e) = session.submit_score(&mut board, "headless", "scripted run", "") {
        log::warn!("Score not submitted: {e}");
    }
    for (place, entry) in session.ranking().iter().enumerate() {
        println!("{:>2}. {} {}", place + 1, entry.name, entry.score);
    }
}
