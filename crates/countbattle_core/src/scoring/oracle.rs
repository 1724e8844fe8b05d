//! Territory oracle contract and the default flood-fill oracle.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::mask::MarkedBoard;
use crate::types::{Color, Stone};

/// Extra points handed to the oracle alongside the position.
///
/// The counting quiz always passes zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, new)]
pub struct TuningParams {
    /// Prisoners already taken by black.
    pub black_captures: i32,
    /// Prisoners already taken by white.
    pub white_captures: i32,
    /// Compensation for white, in whole points.
    pub komi: i32,
}

/// Point totals reported by an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointTotals {
    /// Black's points.
    pub black: i32,
    /// White's points.
    pub white: i32,
}

impl PointTotals {
    /// Points for `color`.
    pub fn for_color(&self, color: Color) -> i32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

/// Counts the territory of a finished position.
///
/// Implementations must be deterministic and free of side effects. The
/// board and mask of `position` share one coordinate system.
pub trait TerritoryOracle: std::fmt::Debug {
    /// Returns black's and white's territory totals.
    fn final_territory_score(&self, position: &MarkedBoard, params: TuningParams) -> PointTotals;
}

/// Region-counting oracle.
///
/// Dead stones are lifted off the board. Each maximal orthogonally connected
/// region of points without a living stone is territory for a color when the
/// only living stones it touches are of that color; regions touching both
/// colors, or none, are neutral. Every dead stone also scores one prisoner
/// point for the other color.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloodFillOracle;

impl FloodFillOracle {
    /// Creates the oracle.
    pub fn new() -> Self {
        Self
    }
}

impl TerritoryOracle for FloodFillOracle {
    #[instrument(skip(self, position), fields(size = ?position.board().size()))]
    fn final_territory_score(&self, position: &MarkedBoard, params: TuningParams) -> PointTotals {
        let board = position.board();
        let grid = board.grid();
        let (width, height) = board.size();
        let living = |x: usize, y: usize| -> Option<Color> {
            if position.dead().is_dead(x, y) {
                return None;
            }
            board.get(x, y).and_then(Stone::color)
        };

        let mut totals = PointTotals {
            black: params.black_captures,
            white: params.white_captures + params.komi,
        };
        let mut visited = vec![false; width * height];
        let mut stack = Vec::new();

        for start_y in 0..height {
            for start_x in 0..width {
                let start = start_y * width + start_x;
                if visited[start] || living(start_x, start_y).is_some() {
                    continue;
                }

                let mut region = 0i32;
                let mut touches_black = false;
                let mut touches_white = false;
                visited[start] = true;
                stack.push((start_x, start_y));

                while let Some((x, y)) = stack.pop() {
                    region += 1;
                    for (nx, ny) in grid.neighbors(x, y) {
                        match living(nx, ny) {
                            Some(Color::Black) => touches_black = true,
                            Some(Color::White) => touches_white = true,
                            None => {
                                let index = ny * width + nx;
                                if !visited[index] {
                                    visited[index] = true;
                                    stack.push((nx, ny));
                                }
                            }
                        }
                    }
                }

                match (touches_black, touches_white) {
                    (true, false) => totals.black += region,
                    (false, true) => totals.white += region,
                    _ => debug!(start_x, start_y, region, "Neutral region"),
                }
            }
        }

        for (x, y, stone) in grid.iter() {
            if !position.dead().is_dead(x, y) {
                continue;
            }
            match stone.color() {
                Some(Color::Black) => totals.white += 1,
                Some(Color::White) => totals.black += 1,
                None => {}
            }
        }

        debug!(black = totals.black, white = totals.white, "Counted territory");
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::mask::DeadMask;

    fn totals(board: &str, dead: &str) -> PointTotals {
        let position =
            MarkedBoard::new(Board::parse(board).unwrap(), DeadMask::parse(dead).unwrap())
                .unwrap();
        FloodFillOracle::new().final_territory_score(&position, TuningParams::default())
    }

    #[test]
    fn empty_board_is_neutral() {
        assert_eq!(totals("...\n...", "...\n..."), PointTotals::default());
    }

    #[test]
    fn region_touching_one_color_is_territory() {
        let t = totals(".x.\n.x.", "...\n...");
        assert_eq!(t, PointTotals { black: 4, white: 0 });
    }

    #[test]
    fn shared_region_is_neutral() {
        let t = totals("x.o", "...");
        assert_eq!(t, PointTotals::default());
    }

    #[test]
    fn dead_stone_counts_as_territory_and_prisoner() {
        // The white stone is lifted; its point joins black's region.
        let t = totals("x.o", "..y");
        assert_eq!(t, PointTotals { black: 3, white: 0 });
    }

    #[test]
    fn tuning_params_are_added() {
        let position = MarkedBoard::without_dead(Board::parse("x.o").unwrap());
        let t = FloodFillOracle::new().final_territory_score(&position, TuningParams::new(2, 1, 6));
        assert_eq!(t, PointTotals { black: 2, white: 7 });
    }
}
