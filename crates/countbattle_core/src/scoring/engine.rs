//! Territory and area scoring on top of a territory oracle.

use tracing::{debug, instrument};

use super::oracle::{FloodFillOracle, TerritoryOracle, TuningParams};
use super::result::{AreaScore, ScoreReport, ScoringMode, TerritoryScore};
use crate::mask::MarkedBoard;
use crate::types::Color;

/// Scores marked positions.
///
/// The engine holds no state besides its oracle; every call recomputes.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine<O: TerritoryOracle = FloodFillOracle> {
    oracle: O,
}

impl ScoreEngine<FloodFillOracle> {
    /// Engine backed by the flood-fill oracle.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: TerritoryOracle> ScoreEngine<O> {
    /// Engine backed by a custom oracle.
    pub fn with_oracle(oracle: O) -> Self {
        Self { oracle }
    }

    /// The oracle this engine delegates to.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Territory count of the position.
    ///
    /// The dead mask is handed to the oracle in the board's own coordinates
    /// with zero captures and komi.
    #[instrument(skip(self, position), fields(size = ?position.board().size()))]
    pub fn territory_score(&self, position: &MarkedBoard) -> TerritoryScore {
        let totals = self
            .oracle
            .final_territory_score(position, TuningParams::default());
        let score = TerritoryScore::new(totals.black, totals.white);
        debug!(margin = %score.margin(), "Territory scored");
        score
    }

    /// Area count of the position: living stones plus territory.
    #[instrument(skip(self, position), fields(size = ?position.board().size()))]
    pub fn area_score(&self, position: &MarkedBoard) -> AreaScore {
        let territory = self.territory_score(position);
        let black_alive = stone_total(position.alive_count(Color::Black));
        let white_alive = stone_total(position.alive_count(Color::White));
        let score = AreaScore::new(territory, black_alive, white_alive);
        debug!(margin = %score.margin(), black_alive, white_alive, "Area scored");
        score
    }

    /// Both counts, with `mode` selecting the margin answers are judged by.
    #[instrument(skip(self, position))]
    pub fn score(&self, position: &MarkedBoard, mode: ScoringMode) -> ScoreReport {
        ScoreReport::new(mode, self.area_score(position))
    }
}

fn stone_total(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
