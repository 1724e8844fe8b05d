//! Tests for answer judging and hard-mode choices.

use countbattle_core::{
    Answer, Board, CHOICE_COUNT, Color, MarkedBoard, ScoreEngine, ScoringMode, score_choices,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_choices_are_distinct_sorted_and_contain_answer() {
    let mut rng = StdRng::seed_from_u64(2024);
    for magnitude in 0..30 {
        for _ in 0..20 {
            let choices = score_choices(magnitude, &mut rng);
            assert_eq!(choices.len(), CHOICE_COUNT);
            assert!(choices.contains(&magnitude));
            assert!(choices.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}

#[test]
fn test_small_margins_fall_back_above() {
    // Only 0 and 1 exist below 1, so at least two choices come from above.
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let choices = score_choices(1, &mut rng);
        assert!(choices.iter().filter(|&&c| c > 1).count() >= 2);
    }
}

#[test]
fn test_hard_mode_answer_judged_against_active_mode() {
    // Territory: black 0, white 0. Area: black 2, white 1.
    let position = MarkedBoard::without_dead(Board::parse("xxo").unwrap());
    let engine = ScoreEngine::new();
    let answer = Answer::Scored {
        color: Color::Black,
        magnitude: 1,
    };

    let territory = engine.score(&position, ScoringMode::Territory);
    let area = engine.score(&position, ScoringMode::Area);
    assert!(!answer.is_correct(&territory.active_margin()));
    assert!(answer.is_correct(&area.active_margin()));
}

#[test]
fn test_expected_answer_text_matches_parse_form() {
    let position = MarkedBoard::without_dead(Board::parse("x.x\nooo\n...").unwrap());
    let margin = ScoreEngine::new()
        .score(&position, ScoringMode::Area)
        .active_margin();
    let expected: Answer = Answer::expected(&margin, true).parse().unwrap();
    assert!(expected.is_correct(&margin));
}
