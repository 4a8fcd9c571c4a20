//! Representative example selection.
//!
//! Rows score higher when more cells are filled, when they carry several
//! synonyms, and when they are short overall. The top of the ranking is
//! usually atypical (long synonym lists), so the example is taken from a
//! fixed rank further down.

use crate::table::Table;

/// Rank of the representative row after sorting by score.
pub const DEFAULT_EXAMPLE_RANK: usize = 50;

pub const SYNONYM_BONUS: f64 = 0.5;

/// `filled + synonym bonus + cells / characters`.
///
/// A row without a single character scores only its (zero) filled count;
/// the length ratio is undefined there and contributes nothing.
pub fn example_score(row: &[String], synonyms: Option<usize>) -> f64 {
    let characters: usize = row.iter().map(|cell| cell.chars().count()).sum();
    let filled = row.iter().filter(|cell| !cell.is_empty()).count();

    let mut score = filled as f64;
    if synonyms
        .and_then(|idx| row.get(idx))
        .is_some_and(|cell| cell.contains('|'))
    {
        score += SYNONYM_BONUS;
    }
    if characters > 0 {
        score += row.len() as f64 / characters as f64;
    }
    score
}

/// Row indices with their scores, best first. Ties keep table order.
pub fn rank_rows(table: &Table, synonyms_column: Option<&str>) -> Vec<(usize, f64)> {
    let synonyms = synonyms_column.and_then(|name| table.column_index(name));
    let mut ranked: Vec<(usize, f64)> = table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx, example_score(row, synonyms)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Index of the row at `rank` in the score ranking, clamped to the last row.
pub fn representative_row(
    table: &Table,
    synonyms_column: Option<&str>,
    rank: usize,
) -> Option<usize> {
    let ranked = rank_rows(table, synonyms_column);
    let last = ranked.len().checked_sub(1)?;
    Some(ranked[rank.min(last)].0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn score_counts_filled_synonyms_and_brevity() {
        // 3 filled, synonyms bonus, 4 cells over 10 characters.
        let r = row(&["ab", "c|d", "efghi", ""]);
        let score = example_score(&r, Some(1));
        assert!((score - (3.0 + 0.5 + 0.4)).abs() < 1e-12);

        let without_bonus = example_score(&r, None);
        assert!((without_bonus - 3.4).abs() < 1e-12);
    }

    #[test]
    fn empty_row_scores_zero() {
        assert_eq!(example_score(&row(&["", "", ""]), Some(1)), 0.0);
        assert_eq!(example_score(&[], None), 0.0);
    }

    #[test]
    fn rank_is_clamped_to_the_last_row() {
        let table = Table::with_rows(
            vec!["id".into(), "synonyms".into()],
            vec![row(&["aaaa", "x|y"]), row(&["bbbb", ""]), row(&["cccc", "zz"])],
        );
        let ranked = rank_rows(&table, Some("synonyms"));
        assert_eq!(ranked.iter().map(|r| r.0).collect::<Vec<_>>(), vec![0, 2, 1]);

        assert_eq!(representative_row(&table, Some("synonyms"), DEFAULT_EXAMPLE_RANK), Some(1));
        assert_eq!(representative_row(&table, Some("synonyms"), 0), Some(0));
    }

    #[test]
    fn empty_table_has_no_representative() {
        let table = Table::new(vec!["id".into()]);
        assert_eq!(representative_row(&table, None, DEFAULT_EXAMPLE_RANK), None);
    }
}
