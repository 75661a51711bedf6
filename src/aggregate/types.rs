//! Data types produced by the aggregation stage.

use serde::Serialize;
use std::collections::HashMap;

use crate::categories::CollisionCategory;

/// One series of a [`YearPivot`]: a category label and its count per pivot year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotColumn {
    pub label: String,
    pub counts: Vec<usize>,
}

/// Wide table of counts: one row per year (ascending), one column per category.
///
/// Years with no occurrences of a category hold zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearPivot {
    pub years: Vec<i32>,
    pub columns: Vec<PivotColumn>,
}

impl YearPivot {
    /// Builds a pivot over `years` from `(year, label)` observations.
    ///
    /// Columns appear in `column_order`; observations whose year or label is
    /// not listed are ignored.
    pub fn from_observations<'a>(
        years: &[i32],
        column_order: &[String],
        observations: impl IntoIterator<Item = (i32, &'a str)>,
    ) -> Self {
        let col_index: HashMap<&str, usize> = column_order
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();

        let mut columns: Vec<PivotColumn> = column_order
            .iter()
            .map(|label| PivotColumn {
                label: label.clone(),
                counts: vec![0; years.len()],
            })
            .collect();

        for (year, label) in observations {
            let (Ok(row), Some(&col)) = (years.binary_search(&year), col_index.get(label)) else {
                continue;
            };
            columns[col].counts[row] += 1;
        }

        Self {
            years: years.to_vec(),
            columns,
        }
    }

    pub fn column(&self, label: &str) -> Option<&PivotColumn> {
        self.columns.iter().find(|c| c.label == label)
    }

    /// Sum across all columns for `year`, or 0 when the year is not in the pivot.
    pub fn row_total(&self, year: i32) -> usize {
        match self.years.binary_search(&year) {
            Ok(row) => self.columns.iter().map(|c| c.counts[row]).sum(),
            Err(_) => 0,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Cumulative sums per year, bottom layer first; entry `i` is the top edge of column `i`.
    pub fn stacked(&self) -> Vec<Vec<usize>> {
        let mut running = vec![0usize; self.years.len()];
        self.columns
            .iter()
            .map(|c| {
                for (acc, n) in running.iter_mut().zip(&c.counts) {
                    *acc += n;
                }
                running.clone()
            })
            .collect()
    }

    pub fn max_row_total(&self) -> usize {
        self.years.iter().map(|y| self.row_total(*y)).max().unwrap_or(0)
    }

    pub fn max_cell(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|c| c.counts.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Number of reports for one collision category in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollisionCount {
    pub year: i32,
    pub category: CollisionCategory,
    pub count: usize,
}

/// All aggregates for a single weather condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherSummary {
    pub weather: String,
    /// `(year, report count)`, years ascending.
    pub totals: Vec<(i32, usize)>,
    pub driver_at_fault: YearPivot,
    pub injury_severity: YearPivot,
    pub collisions: Vec<CollisionCount>,
}

impl WeatherSummary {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.totals.iter().map(|(y, _)| *y)
    }

    pub fn total_rows(&self) -> usize {
        self.totals.iter().map(|(_, n)| n).sum()
    }

    /// Largest value any series of this weather reaches on the count axis.
    pub fn y_max(&self) -> usize {
        let collision_max = self.collisions.iter().map(|c| c.count).max().unwrap_or(0);
        self.driver_at_fault
            .max_row_total()
            .max(self.injury_severity.max_cell())
            .max(collision_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pivot_zero_fills_missing_years() {
        let pivot = YearPivot::from_observations(
            &[2018, 2019, 2020],
            &labels(&["Yes", "No"]),
            [(2018, "Yes"), (2020, "Yes"), (2020, "No"), (2020, "Yes")],
        );

        assert_eq!(pivot.column("Yes").unwrap().counts, vec![1, 0, 2]);
        assert_eq!(pivot.column("No").unwrap().counts, vec![0, 0, 1]);
        assert_eq!(pivot.row_total(2020), 3);
        assert_eq!(pivot.row_total(2019), 0);
        assert_eq!(pivot.row_total(1999), 0);
    }

    #[test]
    fn test_pivot_ignores_unlisted_labels() {
        let pivot = YearPivot::from_observations(&[2018], &labels(&["Yes"]), [(2018, "Maybe")]);
        assert_eq!(pivot.column("Yes").unwrap().counts, vec![0]);
        assert!(pivot.column("Maybe").is_none());
    }

    #[test]
    fn test_stacked_layers_accumulate() {
        let pivot = YearPivot {
            years: vec![2020, 2021],
            columns: vec![
                PivotColumn {
                    label: "Yes".into(),
                    counts: vec![2, 1],
                },
                PivotColumn {
                    label: "No".into(),
                    counts: vec![3, 0],
                },
            ],
        };

        assert_eq!(pivot.stacked(), vec![vec![2, 1], vec![5, 1]]);
        assert_eq!(pivot.max_row_total(), 5);
        assert_eq!(pivot.max_cell(), 3);
    }

    #[test]
    fn test_empty_pivot() {
        let pivot = YearPivot::default();
        assert!(pivot.stacked().is_empty());
        assert_eq!(pivot.max_row_total(), 0);
    }
}
