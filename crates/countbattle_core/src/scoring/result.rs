//! Score results.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::types::{Color, Winner};

/// Which count decides a round.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScoringMode {
    /// Empty points surrounded, plus prisoners.
    #[default]
    Territory,
    /// Living stones plus territory.
    Area,
}

impl ScoringMode {
    /// Returns the other mode.
    pub fn toggle(self) -> Self {
        match self {
            ScoringMode::Territory => ScoringMode::Area,
            ScoringMode::Area => ScoringMode::Territory,
        }
    }
}

/// Black-minus-white difference with its winner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margin {
    /// Black's count minus white's count.
    pub difference: i32,
    /// Side ahead, by the sign of `difference`.
    pub winning_color: Winner,
    /// Absolute value of `difference`.
    pub magnitude: u32,
}

impl Margin {
    /// Builds a margin from the two totals.
    #[instrument]
    pub fn between(black: i32, white: i32) -> Self {
        let difference = black - white;
        Self {
            difference,
            winning_color: Winner::from_difference(difference),
            magnitude: difference.unsigned_abs(),
        }
    }
}

impl std::fmt::Display for Margin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.winning_color.color() {
            Some(Color::Black) => write!(f, "B+{}", self.magnitude),
            Some(Color::White) => write!(f, "W+{}", self.magnitude),
            None => write!(f, "Tie"),
        }
    }
}

/// Territory count of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryScore {
    /// Black's territory points.
    black_territory: i32,
    /// White's territory points.
    white_territory: i32,
    /// Black minus white.
    margin: Margin,
}

impl TerritoryScore {
    /// Builds the score from the two territory totals.
    pub fn new(black_territory: i32, white_territory: i32) -> Self {
        Self {
            black_territory,
            white_territory,
            margin: Margin::between(black_territory, white_territory),
        }
    }

    /// Territory points for `color`.
    pub fn territory(&self, color: Color) -> i32 {
        match color {
            Color::Black => self.black_territory,
            Color::White => self.white_territory,
        }
    }

    /// Black minus white.
    pub fn difference(&self) -> i32 {
        self.margin.difference
    }

    /// Side ahead on territory.
    pub fn winning_color(&self) -> Winner {
        self.margin.winning_color
    }

    /// Size of the lead.
    pub fn magnitude(&self) -> u32 {
        self.margin.magnitude
    }
}

/// Area count of a position, with the territory count it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaScore {
    /// Territory component.
    territory: TerritoryScore,
    /// Black stones not marked dead.
    black_stones_alive: i32,
    /// White stones not marked dead.
    white_stones_alive: i32,
    /// Living black stones plus black territory.
    black_area: i32,
    /// Living white stones plus white territory.
    white_area: i32,
    /// Black area minus white area.
    margin: Margin,
}

impl AreaScore {
    /// Adds living stone counts to a territory score.
    pub fn new(territory: TerritoryScore, black_stones_alive: i32, white_stones_alive: i32) -> Self {
        let black_area = black_stones_alive + territory.black_territory;
        let white_area = white_stones_alive + territory.white_territory;
        Self {
            territory,
            black_stones_alive,
            white_stones_alive,
            black_area,
            white_area,
            margin: Margin::between(black_area, white_area),
        }
    }

    /// Black's territory points.
    pub fn black_territory(&self) -> i32 {
        self.territory.black_territory
    }

    /// White's territory points.
    pub fn white_territory(&self) -> i32 {
        self.territory.white_territory
    }

    /// Black area minus white area.
    pub fn difference(&self) -> i32 {
        self.margin.difference
    }

    /// Side ahead on area.
    pub fn winning_color(&self) -> Winner {
        self.margin.winning_color
    }

    /// Size of the lead.
    pub fn magnitude(&self) -> u32 {
        self.margin.magnitude
    }
}

/// Both counts of one position and the margin that decides the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    /// Mode the answer is judged against.
    mode: ScoringMode,
    /// Territory count.
    territory: TerritoryScore,
    /// Area count.
    area: AreaScore,
}

impl ScoreReport {
    /// Bundles both counts.
    pub fn new(mode: ScoringMode, area: AreaScore) -> Self {
        Self {
            mode,
            territory: area.territory,
            area,
        }
    }

    /// Margin for the report's scoring mode.
    pub fn active_margin(&self) -> Margin {
        match self.mode {
            ScoringMode::Territory => self.territory.margin,
            ScoringMode::Area => self.area.margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_display_uses_go_notation() {
        assert_eq!(Margin::between(10, 4).to_string(), "B+6");
        assert_eq!(Margin::between(3, 5).to_string(), "W+2");
        assert_eq!(Margin::between(7, 7).to_string(), "Tie");
    }

    #[test]
    fn area_adds_living_stones() {
        let area = AreaScore::new(TerritoryScore::new(5, 3), 10, 14);
        assert_eq!(*area.black_area(), 15);
        assert_eq!(*area.white_area(), 17);
        assert_eq!(area.difference(), -2);
        assert_eq!(area.winning_color(), Winner::White);
    }

    #[test]
    fn scoring_mode_parses_case_insensitively() {
        assert_eq!("Area".parse::<ScoringMode>().unwrap(), ScoringMode::Area);
        assert_eq!(ScoringMode::Territory.to_string(), "territory");
    }
}
