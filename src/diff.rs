//! Positional diff between two snapshot tables.
//!
//! Cells are compared by (rank, URL), not by price identity. When a page
//! gains or loses one price, every rank above the change point shifts and
//! each shifted cell reports as changed. That cascade is a known property
//! of the positional model, kept because the alert consumer wants "this
//! page moved", not a minimal edit script.

use std::collections::HashMap;

use serde::Serialize;

use crate::snapshot::PriceTable;

/// One cell that differs between the previous and current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    /// Zero-based rank position within the page's sorted price set.
    pub rank: usize,
    /// Source URL exactly as the source list spells it.
    pub url: String,
    pub previous: f64,
    pub current: f64,
}

/// Compare two tables cell by cell over the union of their (rank, URL) keys.
///
/// Cells one side does not have, because the column is new, vanished, or the
/// rank is beyond that table's extent, read as 0.0; cardinality changes
/// therefore surface as ordinary value changes against zero. Output is
/// rank-major; within a rank, columns follow the current table's order and
/// then any columns only the previous table still had.
///
/// Equality is exact. Snapshot values survive the CSV round trip bit for
/// bit, so an unchanged page can never produce a tolerance artifact.
pub fn diff_tables(previous: &PriceTable, current: &PriceTable) -> Vec<ChangeRecord> {
    let prev_cols: HashMap<&str, usize> = previous
        .columns
        .iter()
        .enumerate()
        .map(|(idx, url)| (url.as_str(), idx))
        .collect();
    let cur_cols: HashMap<&str, usize> = current
        .columns
        .iter()
        .enumerate()
        .map(|(idx, url)| (url.as_str(), idx))
        .collect();

    let mut union: Vec<&str> = current.columns.iter().map(String::as_str).collect();
    for url in &previous.columns {
        if !cur_cols.contains_key(url.as_str()) {
            union.push(url);
        }
    }

    let depth = previous.depth().max(current.depth());
    let mut changes = Vec::new();
    for rank in 0..depth {
        for url in &union {
            let before = prev_cols
                .get(url)
                .map_or(0.0, |&col| previous.value_at(rank, col));
            let after = cur_cols
                .get(url)
                .map_or(0.0, |&col| current.value_at(rank, col));
            if before != after {
                changes.push(ChangeRecord {
                    rank,
                    url: (*url).to_string(),
                    previous: before,
                    current: after,
                });
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn table(entries: &[(&str, &[f64])]) -> PriceTable {
        let mapping: IndexMap<String, Vec<f64>> = entries
            .iter()
            .map(|(url, prices)| (url.to_string(), prices.to_vec()))
            .collect();
        PriceTable::from_price_sets(&mapping)
    }

    #[test]
    fn test_identical_tables_diff_to_nothing() {
        let a = table(&[("https://a.example.com", &[5.0, 19.99])]);
        assert!(diff_tables(&a, &a).is_empty());
    }

    #[test]
    fn test_single_cell_change_is_reported_once() {
        let before = table(&[("https://a.example.com", &[10.0, 20.0])]);
        let after = table(&[("https://a.example.com", &[10.0, 25.0])]);

        let changes = diff_tables(&before, &after);
        assert_eq!(
            changes,
            vec![ChangeRecord {
                rank: 1,
                url: "https://a.example.com".to_string(),
                previous: 20.0,
                current: 25.0,
            }]
        );
    }

    #[test]
    fn test_new_column_diffs_against_zero() {
        let before = table(&[("https://a.example.com", &[10.0])]);
        let after = table(&[
            ("https://a.example.com", &[10.0]),
            ("https://b.example.com", &[7.5]),
        ]);

        let changes = diff_tables(&before, &after);
        assert_eq!(
            changes,
            vec![ChangeRecord {
                rank: 0,
                url: "https://b.example.com".to_string(),
                previous: 0.0,
                current: 7.5,
            }]
        );
    }

    #[test]
    fn test_vanished_column_diffs_against_zero() {
        let before = table(&[
            ("https://a.example.com", &[10.0]),
            ("https://gone.example.com", &[4.0]),
        ]);
        let after = table(&[("https://a.example.com", &[10.0])]);

        let changes = diff_tables(&before, &after);
        assert_eq!(
            changes,
            vec![ChangeRecord {
                rank: 0,
                url: "https://gone.example.com".to_string(),
                previous: 4.0,
                current: 0.0,
            }]
        );
    }

    #[test]
    fn test_inserted_price_cascades_through_higher_ranks() {
        // One new mid-list price shifts everything above it.
        let before = table(&[("https://a.example.com", &[10.0, 20.0, 30.0])]);
        let after = table(&[("https://a.example.com", &[10.0, 15.0, 20.0, 30.0])]);

        let changes = diff_tables(&before, &after);
        let cells: Vec<(usize, f64, f64)> = changes
            .iter()
            .map(|c| (c.rank, c.previous, c.current))
            .collect();
        assert_eq!(
            cells,
            vec![(1, 20.0, 15.0), (2, 30.0, 20.0), (3, 0.0, 30.0)]
        );
    }

    #[test]
    fn test_output_is_rank_major_current_columns_first() {
        let before = table(&[
            ("https://a.example.com", &[1.0]),
            ("https://old.example.com", &[2.0]),
        ]);
        let after = table(&[
            ("https://b.example.com", &[3.0]),
            ("https://a.example.com", &[9.0]),
        ]);

        let changes = diff_tables(&before, &after);
        let urls: Vec<&str> = changes.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://b.example.com",
                "https://a.example.com",
                "https://old.example.com"
            ]
        );
    }
}
