//! Positional price snapshot: the rank-by-URL matrix persisted between runs.

pub mod codec;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Price matrix for one run.
///
/// `columns[c]` is the URL whose ranked prices run down column `c`:
/// `rows[r][c]` is that page's `r`-th smallest price. Every column is
/// right-padded with `0.0` to the longest price set of the batch, so each
/// row holds exactly `columns.len()` cells. Zero is the padding value and
/// is indistinguishable from a real zero price; displayed prices are
/// positive in practice, so the ambiguity stays theoretical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl PriceTable {
    /// Transpose the run mapping into the persisted matrix shape.
    pub fn from_price_sets(prices: &IndexMap<String, Vec<f64>>) -> Self {
        let columns: Vec<String> = prices.keys().cloned().collect();
        let depth = prices.values().map(Vec::len).max().unwrap_or(0);
        let rows = (0..depth)
            .map(|rank| {
                prices
                    .values()
                    .map(|set| set.get(rank).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Number of rank rows.
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (rank, column index). Ranks beyond the table's extent read
    /// as 0.0, same as the padding.
    pub fn value_at(&self, rank: usize, col: usize) -> f64 {
        self.rows
            .get(rank)
            .and_then(|row| row.get(col))
            .copied()
            .unwrap_or(0.0)
    }
}
