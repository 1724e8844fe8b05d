//! Tests for result accumulation and game history.

use countbattle_core::{Answer, Color, Symmetry};
use countbattle_session::{BoardResult, GameInstanceId, LedgerError, ResultsLedger, ReviewCursor};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn result(board_index: usize, is_correct: bool) -> BoardResult {
    BoardResult::new(
        board_index,
        board_index + 100,
        Answer::Color(Color::White),
        "white".to_string(),
        -2,
        1.0,
        is_correct,
        Symmetry::IDENTITY,
    )
}

#[test]
fn test_record_without_game_fails() {
    let mut ledger = ResultsLedger::new();
    assert_eq!(ledger.record_result(result(0, true)), Err(LedgerError::NoActiveGame));
    assert_eq!(ledger.finalize_game().unwrap_err(), LedgerError::NoActiveGame);
}

#[test]
fn test_new_game_gets_fresh_id_and_empty_results() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut ledger = ResultsLedger::new();

    let first = ledger.start_new_game("room", &mut rng);
    ledger.record_result(result(0, true)).unwrap();
    ledger.view_summary();
    ledger.review_board(0).unwrap();

    let second = ledger.start_new_game("room", &mut rng);
    assert_ne!(first, second);
    assert!(ledger.current_results().is_empty());
    assert!(!ledger.viewing_summary());
    assert_eq!(ledger.review(), ReviewCursor::Grid);
    assert!(ledger.historical().is_none());
}

#[test]
fn test_finalized_game_rejects_more_results() {
    let mut ledger = ResultsLedger::new();
    let id = ledger.start_new_game("room", &mut StdRng::seed_from_u64(1));
    ledger.record_result(result(0, true)).unwrap();
    ledger.finalize_game().unwrap();

    let err = ledger.record_result(result(1, false)).unwrap_err();
    assert_eq!(err, LedgerError::AlreadyFinalized { instance_id: id.clone() });
    assert_eq!(
        ledger.finalize_game().unwrap_err(),
        LedgerError::AlreadyFinalized { instance_id: id }
    );
    // Still viewable after finalize.
    assert_eq!(ledger.current_results().len(), 1);
    assert_eq!(ledger.history().len(), 1);
}

#[test]
fn test_history_is_chronological_and_keeps_each_game() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut ledger = ResultsLedger::new();
    let mut ids = Vec::new();

    for boards in 1..=3 {
        ids.push(ledger.start_new_game("room", &mut rng));
        for index in 0..boards {
            ledger.record_result(result(index, index % 2 == 0)).unwrap();
        }
        ledger.finalize_game().unwrap();
    }

    let history = ledger.history();
    assert_eq!(history.len(), 3);
    for (summary, (id, boards)) in history.iter().zip(ids.iter().zip(1..=3)) {
        assert_eq!(summary.instance_id(), id);
        assert_eq!(summary.results().len(), boards);
        assert_eq!(summary.room_id(), "room");
    }
    assert_eq!(ledger.summary(&ids[1]).unwrap().correct_count(), 1);
}

#[test]
fn test_review_cursor_is_bounded_by_result_count() {
    let mut ledger = ResultsLedger::new();
    ledger.start_new_game("room", &mut StdRng::seed_from_u64(2));
    ledger.record_result(result(0, true)).unwrap();
    ledger.record_result(result(1, true)).unwrap();

    assert_eq!(ledger.review_board(1).unwrap().board_id(), &101);
    assert_eq!(ledger.reviewed_result().map(|r| *r.board_index()), Some(1));
    assert_eq!(
        ledger.review_board(2).unwrap_err(),
        LedgerError::BoardOutOfRange { index: 2, len: 2 }
    );
    // A failed review leaves the cursor where it was.
    assert_eq!(ledger.review(), ReviewCursor::Board(1));

    ledger.back_to_grid();
    assert_eq!(ledger.reviewed_result(), None);
}

#[test]
fn test_unknown_historical_game_is_reported() {
    let mut ledger = ResultsLedger::new();
    let missing = GameInstanceId::from_raw("room-1-abcdefghi");
    assert_eq!(
        ledger.view_historical(&missing).unwrap_err(),
        LedgerError::UnknownGame { instance_id: missing }
    );
}

#[test]
fn test_historical_view_switches_shown_results() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut ledger = ResultsLedger::new();
    let old = ledger.start_new_game("room", &mut rng);
    ledger.record_result(result(0, false)).unwrap();
    ledger.record_result(result(1, false)).unwrap();
    ledger.finalize_game().unwrap();

    ledger.start_new_game("room", &mut rng);
    ledger.record_result(result(0, true)).unwrap();

    ledger.view_historical(&old).unwrap();
    assert_eq!(ledger.shown_results().len(), 2);
    ledger.close_historical();
    assert_eq!(ledger.shown_results().len(), 1);
}

#[test]
fn test_summary_serializes_with_camel_case_fields() {
    let mut ledger = ResultsLedger::new();
    ledger.start_new_game("room", &mut StdRng::seed_from_u64(4));
    ledger.record_result(result(0, true)).unwrap();
    let summary = ledger.finalize_game().unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("instanceId").is_some());
    let first = &json["results"][0];
    assert_eq!(first["boardId"], 100);
    assert_eq!(first["chosenAnswer"], "white");
    assert_eq!(first["isCorrect"], true);
}
