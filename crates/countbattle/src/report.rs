//! Text output for the `score` and `catalog` commands.

use std::fmt::Write;

use countbattle_core::{BoardCatalog, MarkedBoard, ScoreEngine, ScoreReport, ScoringMode, Symmetry};
use tracing::instrument;

/// Renders one shown board with both counts and the deciding margin.
#[instrument(skip(position, report))]
pub fn render_score(
    board_id: usize,
    symmetry: Symmetry,
    position: &MarkedBoard,
    report: &ScoreReport,
) -> String {
    let territory = report.territory();
    let area = report.area();
    let mut out = String::new();

    let _ = writeln!(out, "Board {} ({})", board_id, symmetry);
    let _ = writeln!(out, "{}", position.board());
    let _ = writeln!(
        out,
        "territory: black {}, white {} -> {}",
        territory.black_territory(),
        territory.white_territory(),
        territory.margin()
    );
    let _ = writeln!(
        out,
        "area: black {}, white {} -> {}",
        area.black_area(),
        area.white_area(),
        area.margin()
    );
    let _ = writeln!(out, "dead stones: {}", position.dead().dead_count());
    let _ = write!(out, "answer ({}): {}", report.mode(), report.active_margin());
    out
}

/// One line per board: index, size, territory margin, area margin.
#[instrument(skip(catalog, engine))]
pub fn render_catalog(catalog: &BoardCatalog, engine: &ScoreEngine, mode: ScoringMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<6} {:<10} {:<10}", "id", "size", "territory", "area");
    for (id, position) in catalog.iter() {
        let report = engine.score(position, mode);
        let (width, height) = position.board().size();
        let _ = writeln!(
            out,
            "{:>4}  {:<6} {:<10} {:<10}",
            id,
            format!("{}x{}", width, height),
            report.territory().margin().to_string(),
            report.area().margin().to_string()
        );
    }
    let _ = write!(out, "{} boards, answers judged by {}", catalog.len(), mode);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BoardCatalog {
        BoardCatalog::parse("xxx\nx..\nx..\n\nooo\no..\no..", "...\n...\n...\n\n...\n...\n...").unwrap()
    }

    #[test]
    fn test_score_lists_both_counts() {
        let catalog = catalog();
        let position = catalog.get(0).unwrap();
        let report = ScoreEngine::new().score(position, ScoringMode::Area);
        let text = render_score(0, Symmetry::IDENTITY, position, &report);

        assert!(text.starts_with("Board 0 (identity)\nxxx\nx..\nx..\n"));
        assert!(text.contains("territory: black 4, white 0 -> B+4"));
        assert!(text.contains("area: black 9, white 0 -> B+9"));
        assert!(text.ends_with("answer (area): B+9"));
    }

    #[test]
    fn test_catalog_has_a_line_per_board() {
        let text = render_catalog(&catalog(), &ScoreEngine::new(), ScoringMode::Territory);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("3x3") && lines[1].contains("B+4"));
        assert!(lines[2].contains("W+"));
        assert_eq!(lines[3], "2 boards, answers judged by territory");
    }
}
