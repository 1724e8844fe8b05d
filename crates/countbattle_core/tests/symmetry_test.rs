//! Tests for board and mask re-orientation.

use countbattle_core::{Board, DeadMask, MarkedBoard, Stone, Symmetry};

fn square() -> MarkedBoard {
    MarkedBoard::new(
        Board::parse("xo.\n.x.\noo.").unwrap(),
        DeadMask::parse("...\n...\nyy.").unwrap(),
    )
    .unwrap()
}

fn rectangle() -> MarkedBoard {
    MarkedBoard::new(
        Board::parse("x..o.\nxo..o").unwrap(),
        DeadMask::parse("...y.\n.y...").unwrap(),
    )
    .unwrap()
}

#[test]
fn test_round_trip_for_every_symmetry() {
    for position in [square(), rectangle()] {
        for symmetry in Symmetry::all() {
            let back = position.transform(&symmetry).transform(&symmetry.inverse());
            assert_eq!(back, position, "round trip failed for {symmetry}");
        }
    }
}

#[test]
fn test_transform_re_dimensions_rectangles() {
    let position = rectangle();
    for symmetry in Symmetry::all() {
        let shown = position.transform(&symmetry);
        let expected = if symmetry.transpose { (2, 5) } else { (5, 2) };
        assert_eq!(shown.board().size(), expected);
        assert_eq!(shown.dead().size(), expected);
    }
}

#[test]
fn test_board_and_mask_stay_index_aligned() {
    let position = rectangle();
    for symmetry in Symmetry::all() {
        let shown = position.transform(&symmetry);
        let (width, height) = shown.board().size();
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = symmetry.source_of(x, y, width, height);
                let source = position.board().get(sx, sy).unwrap();
                let expected = if symmetry.invert {
                    source.inverted()
                } else {
                    source
                };
                assert_eq!(shown.board().get(x, y), Some(expected));
                assert_eq!(shown.dead().is_dead(x, y), position.dead().is_dead(sx, sy));
            }
        }
    }
}

#[test]
fn test_dead_marks_follow_their_stones() {
    let position = rectangle();
    for symmetry in Symmetry::all() {
        let shown = position.transform(&symmetry);
        let (width, height) = shown.board().size();
        for y in 0..height {
            for x in 0..width {
                if shown.dead().is_dead(x, y) {
                    assert_ne!(shown.board().get(x, y), Some(Stone::Empty));
                }
            }
        }
        assert_eq!(shown.dead().dead_count(), 2);
    }
}

#[test]
fn test_flip_y_reverses_row_order() {
    let board = Board::parse("x..\n..o").unwrap();
    let flipped = board.transform(&Symmetry::new(false, true, false, false));
    assert_eq!(flipped.to_string(), "..o\nx..");
}

#[test]
fn test_inverse_of_non_transposing_symmetry_is_itself() {
    for symmetry in Symmetry::all().filter(|s| !s.transpose) {
        assert_eq!(symmetry.inverse(), symmetry);
    }
}
