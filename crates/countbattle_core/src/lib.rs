//! Count Battle core - Go positions, symmetries and scoring
//!
//! Pure logic for the Go counting quiz: no I/O, no clocks, no session state.
//!
//! # Architecture
//!
//! - **Boards**: text codec for positions and dead-stone masks
//! - **Symmetry**: the sixteen orientation and color transforms
//! - **Catalog**: multi-board data files paired with their masks
//! - **Scoring**: territory and area counts over a pluggable oracle
//! - **Answers**: answer parsing, judging and hard-mode choices
//!
//! # Example
//!
//! ```
//! use countbattle_core::{Board, DeadMask, MarkedBoard, ScoreEngine, ScoringMode, Symmetry};
//!
//! let board = Board::parse("xx.\n.xo\nxoo").unwrap();
//! let dead = DeadMask::parse("...\n...\n...").unwrap();
//! let position = MarkedBoard::new(board, dead).unwrap();
//!
//! let shown = position.transform(&Symmetry::new(true, false, true, false));
//! let engine = ScoreEngine::new();
//! let report = engine.score(&shown, ScoringMode::Area);
//! assert_eq!(report.active_margin(), engine.score(&position, ScoringMode::Area).active_margin());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod answer;
mod board;
mod catalog;
mod choices;
mod error;
mod grid;
mod mask;
mod scoring;
mod symmetry;
mod types;

// Crate-level exports - Position types
pub use board::Board;
pub use grid::Grid;
pub use mask::{DEAD_MARKER, DeadMask, MarkedBoard};
pub use types::{Color, Stone, Winner};

// Crate-level exports - Transforms
pub use symmetry::Symmetry;

// Crate-level exports - Data files
pub use catalog::{BoardCatalog, split_records};

// Crate-level exports - Scoring
pub use scoring::{
    AreaScore, FloodFillOracle, Margin, PointTotals, ScoreEngine, ScoreReport, ScoringMode,
    TerritoryOracle, TerritoryScore, TuningParams,
};

// Crate-level exports - Answers
pub use answer::Answer;
pub use choices::{CHOICE_COUNT, MAX_CHOICE_OFFSET, score_choices};

// Crate-level exports - Errors
pub use error::{CatalogError, DimensionMismatchError, MalformedBoardError, ParseAnswerError};
