//! Score computation.

mod engine;
mod oracle;
mod result;

pub use engine::ScoreEngine;
pub use oracle::{FloodFillOracle, PointTotals, TerritoryOracle, TuningParams};
pub use result::{AreaScore, Margin, ScoreReport, ScoringMode, TerritoryScore};
