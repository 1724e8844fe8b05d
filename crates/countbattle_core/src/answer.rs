//! Player answers and how they are judged.
//!
//! In normal mode a player names the side that is ahead. In hard mode the
//! player also names the margin, written in Go notation (`B+3`, `W+2`).
//! Resigning and running out of time are answers too; both are always wrong.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ParseAnswerError;
use crate::scoring::Margin;
use crate::types::{Color, Winner};

/// One player's answer for one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Answer {
    /// Normal mode: the side believed to be ahead.
    Color(Color),
    /// Hard mode: the side ahead and by how much.
    Scored {
        /// Side believed to be ahead.
        color: Color,
        /// Believed margin.
        magnitude: u32,
    },
    /// The player gave up the rest of the game.
    Resign,
    /// The round timer expired first.
    TimedOut,
}

impl Answer {
    /// Whether this answer matches `margin`.
    ///
    /// A color answer is right when that color wins, so it never matches a
    /// tie. A scored answer is right when its signed value equals the
    /// black-minus-white difference.
    #[instrument]
    pub fn is_correct(&self, margin: &Margin) -> bool {
        let correct = match *self {
            Answer::Color(color) => margin.winning_color == Winner::from(color),
            Answer::Scored { color, magnitude } => {
                i64::from(color.sign()) * i64::from(magnitude) == i64::from(margin.difference)
            }
            Answer::Resign | Answer::TimedOut => false,
        };
        debug!(correct, "Judged answer");
        correct
    }

    /// Text of the right answer for `margin`, as shown in a round result.
    ///
    /// In hard mode this always parses back to an answer that
    /// [`Answer::is_correct`] accepts; a tie is written `B+0`. In normal
    /// mode a tie is written `tie`, which no color answer matches.
    pub fn expected(margin: &Margin, hard_mode: bool) -> String {
        if hard_mode {
            Answer::Scored {
                color: margin.winning_color.color().unwrap_or(Color::Black),
                magnitude: margin.magnitude,
            }
            .to_string()
        } else {
            margin.winning_color.to_string()
        }
    }

    /// Whether the answer ends the player's game.
    pub fn ends_game(&self) -> bool {
        matches!(self, Answer::Resign | Answer::TimedOut)
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Color(color) => write!(f, "{color}"),
            Answer::Scored {
                color: Color::Black,
                magnitude,
            } => write!(f, "B+{magnitude}"),
            Answer::Scored {
                color: Color::White,
                magnitude,
            } => write!(f, "W+{magnitude}"),
            Answer::Resign => write!(f, "resign"),
            Answer::TimedOut => write!(f, "timeout"),
        }
    }
}

impl FromStr for Answer {
    type Err = ParseAnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let reject = || ParseAnswerError {
            input: s.to_string(),
        };

        if text.eq_ignore_ascii_case("resign") {
            return Ok(Answer::Resign);
        }
        if text.eq_ignore_ascii_case("timeout") {
            return Ok(Answer::TimedOut);
        }
        if let Ok(color) = text.parse::<Color>() {
            return Ok(Answer::Color(color));
        }

        let (side, magnitude) = text.split_once('+').ok_or_else(reject)?;
        let color = match side {
            "B" | "b" => Color::Black,
            "W" | "w" => Color::White,
            _ => return Err(reject()),
        };
        let magnitude = magnitude.parse::<u32>().map_err(|_| reject())?;
        Ok(Answer::Scored { color, magnitude })
    }
}

impl TryFrom<String> for Answer {
    type Error = ParseAnswerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Answer> for String {
    fn from(answer: Answer) -> Self {
        answer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_form() {
        assert_eq!("Black".parse::<Answer>().unwrap(), Answer::Color(Color::Black));
        assert_eq!(
            "w+12".parse::<Answer>().unwrap(),
            Answer::Scored {
                color: Color::White,
                magnitude: 12
            }
        );
        assert_eq!("resign".parse::<Answer>().unwrap(), Answer::Resign);
        assert_eq!("timeout".parse::<Answer>().unwrap(), Answer::TimedOut);
    }

    #[test]
    fn rejects_garbage() {
        assert!("tie".parse::<Answer>().is_err());
        assert!("B+".parse::<Answer>().is_err());
        assert!("B+-2".parse::<Answer>().is_err());
        assert!("X+2".parse::<Answer>().is_err());
    }

    #[test]
    fn display_round_trips_through_serde() {
        let answer = Answer::Scored {
            color: Color::Black,
            magnitude: 3,
        };
        let json = serde_json::to_string(&answer).unwrap();
        assert_eq!(json, "\"B+3\"");
        assert_eq!(serde_json::from_str::<Answer>(&json).unwrap(), answer);
    }

    #[test]
    fn color_answer_never_matches_tie() {
        let tie = Margin::between(5, 5);
        assert!(!Answer::Color(Color::Black).is_correct(&tie));
        assert!(!Answer::Color(Color::White).is_correct(&tie));
    }

    #[test]
    fn scored_answer_compares_signed_value() {
        let margin = Margin::between(4, 7);
        let right = Answer::Scored {
            color: Color::White,
            magnitude: 3,
        };
        let wrong_side = Answer::Scored {
            color: Color::Black,
            magnitude: 3,
        };
        assert!(right.is_correct(&margin));
        assert!(!wrong_side.is_correct(&margin));
    }

    #[test]
    fn zero_margin_matches_a_tie_from_either_side() {
        let tie = Margin::between(2, 2);
        for color in [Color::Black, Color::White] {
            assert!(Answer::Scored { color, magnitude: 0 }.is_correct(&tie));
        }
    }

    #[test]
    fn resign_and_timeout_are_always_wrong() {
        let margin = Margin::between(1, 0);
        assert!(!Answer::Resign.is_correct(&margin));
        assert!(!Answer::TimedOut.is_correct(&margin));
        assert!(Answer::TimedOut.ends_game());
    }

    #[test]
    fn expected_text_depends_on_mode() {
        let margin = Margin::between(3, 9);
        assert_eq!(Answer::expected(&margin, false), "white");
        assert_eq!(Answer::expected(&margin, true), "W+6");
    }

    #[test]
    fn hard_mode_tie_text_is_a_correct_answer() {
        let tie = Margin::between(3, 3);
        let text = Answer::expected(&tie, true);
        assert_eq!(text, "B+0");
        assert!(text.parse::<Answer>().unwrap().is_correct(&tie));
        assert_eq!(Answer::expected(&tie, false), "tie");
    }
}
