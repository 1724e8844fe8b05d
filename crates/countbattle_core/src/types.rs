//! Core domain types for Go positions.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Stone color of a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Color {
    /// Black stones.
    Black,
    /// White stones.
    White,
}

impl Color {
    /// Returns the opposing color.
    #[instrument]
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Returns `+1` for black and `-1` for white.
    ///
    /// Score differences are black minus white, so a signed margin is
    /// `sign() * magnitude`.
    pub fn sign(self) -> i32 {
        match self {
            Color::Black => 1,
            Color::White => -1,
        }
    }
}

/// Contents of a single board point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    /// No stone.
    #[default]
    Empty,
    /// A black stone.
    Black,
    /// A white stone.
    White,
}

impl Stone {
    /// Parses one character of the board text encoding.
    ///
    /// Stone markers are case-insensitive; `.` is the only empty marker.
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '.' => Some(Stone::Empty),
            'x' | 'X' => Some(Stone::Black),
            'o' | 'O' => Some(Stone::White),
            _ => None,
        }
    }

    /// Canonical text marker for this point.
    pub fn marker(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'x',
            Stone::White => 'o',
        }
    }

    /// Swaps black and white; empty is unaffected.
    pub fn inverted(self) -> Self {
        match self {
            Stone::Empty => Stone::Empty,
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// Returns the color of the stone, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Stone::Empty => None,
            Stone::Black => Some(Color::Black),
            Stone::White => Some(Color::White),
        }
    }
}

impl From<Color> for Stone {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Stone::Black,
            Color::White => Stone::White,
        }
    }
}

/// Which side is ahead on a given count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Winner {
    /// Black has more points.
    Black,
    /// White has more points.
    White,
    /// Both sides have the same count.
    Tie,
}

impl Winner {
    /// Derives the winner from a black-minus-white difference.
    #[instrument]
    pub fn from_difference(difference: i32) -> Self {
        match difference.signum() {
            1 => Winner::Black,
            -1 => Winner::White,
            _ => Winner::Tie,
        }
    }

    /// Returns the winning color, or `None` on a tie.
    pub fn color(self) -> Option<Color> {
        match self {
            Winner::Black => Some(Color::Black),
            Winner::White => Some(Color::White),
            Winner::Tie => None,
        }
    }
}

impl From<Color> for Winner {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Winner::Black,
            Color::White => Winner::White,
        }
    }
}
