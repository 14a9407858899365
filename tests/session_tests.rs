//! Session flow tests.
//!
//! These tests play whole rounds through the command surface:
//! - Start, summon, attack, clear, confirm, shop, continue
//! - Error codes and rollback at the session boundary
//! - Deterministic replay from a seed
//! - Snapshot JSON

use std::sync::Arc;

use card_gauntlet::cards::catalog::{self, standard_registry, starter_deck};
use card_gauntlet::cards::CardId;
use card_gauntlet::core::{Command, ErrorCode, GameStatus, RulesConfig};
use card_gauntlet::rules::Engine;
use card_gauntlet::session::{Session, Snapshot};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Eight heavy hitters: every round-one enemy dies to a single attack.
fn heavy_deck() -> Vec<CardId> {
    vec![
        catalog::DRAGON,
        catalog::DRAGON,
        catalog::DRAGON,
        catalog::TITAN,
        catalog::TITAN,
        catalog::TITAN,
        catalog::WYVERN,
        catalog::WYVERN,
    ]
}

fn rich_session(seed: u64) -> Session {
    Session::with_config(RulesConfig::default().with_starting_gold(100), seed)
}

/// Summon the whole hand, then attack until the enemy field is empty.
fn clear_round(session: &mut Session) -> Snapshot {
    let mut snapshot = session.snapshot().expect("game started");
    while !snapshot.hand.is_empty() {
        snapshot = session
            .execute(Command::PlayCard {
                hand_index: 0,
                target_id: None,
            })
            .expect("summon");
    }

    let attackers: Vec<_> = snapshot.player_units().map(|u| u.id).collect();
    for attacker_id in attackers {
        let Some(target_id) = snapshot.enemy_units().next().map(|u| u.id) else {
            break;
        };
        snapshot = session
            .execute(Command::Attack { attacker_id, target_id })
            .expect("attack");
    }
    snapshot
}

/// Test a full round: start → clear → confirm → buy → continue.
#[test]
fn test_full_round() {
    init_tracing();
    let mut session = rich_session(42);

    let start = session
        .execute(Command::StartGame { deck: heavy_deck() })
        .unwrap();
    assert_eq!(start.status, GameStatus::Playing);
    assert_eq!((start.round, start.turn), (1, 1));
    assert_eq!(start.hand.len(), 4);
    assert_eq!(start.deck_count, 4);
    let enemies = start.enemy_units().count();
    assert!((1..=2).contains(&enemies));

    let cleared = clear_round(&mut session);
    assert_eq!(cleared.status, GameStatus::RoundVictory);
    assert!(cleared.enemy_units().next().is_none());
    assert!(!cleared.shop.is_empty());
    assert!(cleared.shop.iter().all(|offer| offer.cost == 1));

    let err = session.execute(Command::BuyCard { offer_index: 0 }).unwrap_err();
    assert_eq!(err.code, ErrorCode::GameNotInShop);

    let shop = session.execute(Command::ConfirmRound).unwrap();
    assert_eq!(shop.status, GameStatus::Shop);

    let offers = shop.shop.len();
    let bought = session.execute(Command::BuyCard { offer_index: 0 }).unwrap();
    assert_eq!(bought.deck_count, shop.deck_count + 1);
    assert_eq!(bought.gold, shop.gold - shop.shop[0].cost);
    assert_eq!(bought.shop.len(), offers - 1);

    let next = session.execute(Command::ContinueRound).unwrap();
    assert_eq!(next.status, GameStatus::Playing);
    assert_eq!(next.round, 2);
    assert_eq!(next.turn, 2);
    assert!(next.shop.is_empty());
    assert!(next.enemy_units().count() >= 1);
    // Surviving units keep their place and are ready again
    assert_eq!(next.player_units().count(), 4);
    assert_eq!(next.hand.len(), 1);

    let history = &session.state().unwrap().history;
    assert_eq!(history[0].command, Command::StartGame { deck: heavy_deck() });
    assert_eq!(history.last().unwrap().command, Command::ContinueRound);
}

/// Test that a rejected command leaves the snapshot byte-for-byte equal.
#[test]
fn test_rejections_roll_back() {
    let mut session = Session::standard(3);
    session.execute(Command::StartGame { deck: starter_deck() }).unwrap();
    let before = session.snapshot().unwrap().to_json().unwrap();

    let rejected = [
        (Command::StartGame { deck: starter_deck() }, ErrorCode::GameAlreadyStarted),
        (Command::PlayCard { hand_index: 9, target_id: None }, ErrorCode::CardNotFound),
        (Command::BuyCard { offer_index: 0 }, ErrorCode::GameNotInShop),
        (Command::ContinueRound, ErrorCode::GameNotInShop),
        (Command::ConfirmRound, ErrorCode::RoundNotCleared),
        (
            Command::Attack {
                attacker_id: card_gauntlet::EntityId(999),
                target_id: card_gauntlet::EntityId(998),
            },
            ErrorCode::CardNotOnField,
        ),
    ];

    for (command, code) in rejected {
        let err = session.execute(command).unwrap_err();
        assert_eq!(err.code, code);
        assert!(!err.message.is_empty());
        assert_eq!(session.snapshot().unwrap().to_json().unwrap(), before);
    }
}

/// Test deck validation at game start.
#[test]
fn test_invalid_decks() {
    let mut session = Session::standard(3);

    let err = session
        .execute(Command::StartGame {
            deck: vec![catalog::SQUIRE; 2],
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidDeck);

    let err = session
        .execute(Command::StartGame {
            deck: vec![catalog::SQUIRE; 9],
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidDeck);

    let mut unknown = starter_deck();
    unknown[0] = CardId::new(4242);
    let err = session.execute(Command::StartGame { deck: unknown }).unwrap_err();
    assert_eq!(err.code, ErrorCode::CardNotFound);

    assert!(session.snapshot().is_none());
}

/// Test that equal seeds and commands give equal games.
#[test]
fn test_deterministic_replay() {
    let play = |seed: u64| {
        let mut session = Session::standard(seed);
        let mut snapshots = vec![session.execute(Command::StartGame { deck: starter_deck() }).unwrap()];
        for _ in 0..3 {
            snapshots.push(session.execute(Command::EndTurn).unwrap());
            snapshots.push(session.run_enemy_turn().unwrap());
        }
        snapshots
    };

    assert_eq!(play(17), play(17));
    assert_ne!(play(17)[0], play(18)[0]);
}

/// Test that the enemy turn ends the game when the player runs out of HP.
#[test]
fn test_defeat_then_restart() {
    let mut session = Session::with_config(RulesConfig::default().with_player_hp(1), 5);
    session.execute(Command::StartGame { deck: starter_deck() }).unwrap();
    session.execute(Command::EndTurn).unwrap();

    let snapshot = session.run_enemy_turn().unwrap();
    assert_eq!(snapshot.status, GameStatus::Defeat);
    assert!(snapshot.player.current_hp <= 0);

    let err = session.execute(Command::EndTurn).unwrap_err();
    assert_eq!(err.code, ErrorCode::GameOver);

    let restarted = session.execute(Command::StartGame { deck: starter_deck() }).unwrap();
    assert_eq!(restarted.status, GameStatus::Playing);
    assert_eq!(restarted.player.current_hp, 1);
}

/// Test the snapshot wire format.
#[test]
fn test_snapshot_json_shape() {
    let mut session = Session::standard(8);
    let snapshot = session.execute(Command::StartGame { deck: starter_deck() }).unwrap();

    let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

    assert_eq!(json["status"], "PLAYING");
    assert_eq!(json["round"], 1);
    assert_eq!(json["playerField"].as_array().unwrap().len(), 5);
    assert_eq!(json["enemyField"].as_array().unwrap().len(), 5);
    assert_eq!(json["hand"].as_array().unwrap().len(), 4);
    assert_eq!(json["deckCount"], 6);
    assert!(json.get("deck").is_none());

    let command: Command = serde_json::from_str(r#"{"type":"playCard","handIndex":0,"targetId":null}"#).unwrap();
    assert_eq!(
        command,
        Command::PlayCard {
            hand_index: 0,
            target_id: None
        }
    );
}

/// Test that a restarted game can be rebuilt from its own seed and history.
#[test]
fn test_replay_restarted_game() {
    let config = RulesConfig::default().with_player_hp(1).with_starting_gold(100);
    let mut session = Session::with_config(config.clone(), 12);
    session.execute(Command::StartGame { deck: starter_deck() }).unwrap();
    session.execute(Command::EndTurn).unwrap();
    assert_eq!(session.run_enemy_turn().unwrap().status, GameStatus::Defeat);

    session.execute(Command::StartGame { deck: heavy_deck() }).unwrap();
    session
        .execute(Command::PlayCard {
            hand_index: 0,
            target_id: None,
        })
        .unwrap();
    let state = session.state().unwrap();
    assert_eq!(state.seed, 13);
    let history: Vec<_> = state.history.iter().cloned().collect();

    let engine = Engine::new(Arc::new(standard_registry()), config);
    let replayed = Session::replay(engine, state.seed, &history).unwrap();

    assert_eq!(replayed.snapshot(), session.snapshot());
}
