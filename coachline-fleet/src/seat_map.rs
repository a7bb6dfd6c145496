use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Row-major grid of one floor. `None` marks an aisle cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatLayout(pub Vec<Vec<Option<String>>>);

impl SeatLayout {
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.0
    }

    /// Seat labels in booking order: row by row, left to right, aisles skipped.
    pub fn seat_labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.0
            .iter()
            .flat_map(|row| row.iter().filter_map(|cell| cell.as_deref()))
    }

    pub fn seat_count(&self) -> usize {
        self.seat_labels().count()
    }

    /// 1-based columns that are an aisle in every row.
    pub fn aisle_columns(&self) -> BTreeSet<i32> {
        let Some(first) = self.0.first() else {
            return BTreeSet::new();
        };

        (0..first.len())
            .filter(|&idx| self.0.iter().all(|row| matches!(row.get(idx), Some(None))))
            .map(|idx| idx as i32 + 1)
            .collect()
    }
}

/// Seat map of a single floor as persisted on the vehicle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMapConfig {
    pub rows: i32,
    pub cols: i32,
    pub layout: SeatLayout,
}

impl SeatMapConfig {
    pub fn seat_count(&self) -> usize {
        self.layout.seat_count()
    }

    /// Check a seat map loaded from storage against the shape the generator
    /// guarantees.
    pub fn validate(&self) -> Result<(), SeatMapError> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(SeatMapError::InvalidDimension {
                rows: self.rows,
                columns: self.cols,
            });
        }

        let grid = self.layout.rows();
        if grid.len() != self.rows as usize {
            return Err(SeatMapError::MalformedLayout(format!(
                "expected {} rows, found {}",
                self.rows,
                grid.len()
            )));
        }

        let aisle_cells = |row: &Vec<Option<String>>| -> Vec<usize> {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_none())
                .map(|(idx, _)| idx)
                .collect()
        };
        let first_aisles = aisle_cells(&grid[0]);

        let mut seen = HashSet::new();
        for (row_idx, row) in grid.iter().enumerate() {
            if row.len() != self.cols as usize {
                return Err(SeatMapError::MalformedLayout(format!(
                    "row {} has {} cells, expected {}",
                    row_idx + 1,
                    row.len(),
                    self.cols
                )));
            }
            if aisle_cells(row) != first_aisles {
                return Err(SeatMapError::MalformedLayout(format!(
                    "row {} has aisles in different columns than row 1",
                    row_idx + 1
                )));
            }
            for label in row.iter().flatten() {
                if !seen.insert(label.as_str()) {
                    return Err(SeatMapError::MalformedLayout(format!(
                        "duplicate seat label {}",
                        label
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Output of a single-floor generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSeatMap {
    pub seat_count: i32,
    pub seat_map: SeatMapConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatMapError {
    #[error("Invalid seat map dimensions: {rows} rows x {columns} columns")]
    InvalidDimension { rows: i32, columns: i32 },

    #[error("Malformed seat layout: {0}")]
    MalformedLayout(String),
}

/// Lay out one floor. Columns listed in `aisle_positions` (1-based) are left
/// empty; every other cell gets `seat_prefix` followed by a floor-wide counter
/// padded to at least two digits.
pub fn generate_seat_map_layout(
    rows: i32,
    columns: i32,
    aisle_positions: &BTreeSet<i32>,
    seat_prefix: &str,
) -> Result<GeneratedSeatMap, SeatMapError> {
    if rows <= 0 || columns <= 0 {
        return Err(SeatMapError::InvalidDimension { rows, columns });
    }

    let mut seat_number = 0;
    let mut layout = Vec::with_capacity(rows as usize);

    for _row in 1..=rows {
        let mut cells = Vec::with_capacity(columns as usize);
        for col in 1..=columns {
            if aisle_positions.contains(&col) {
                cells.push(None);
            } else {
                seat_number += 1;
                cells.push(Some(format!("{}{:02}", seat_prefix, seat_number)));
            }
        }
        layout.push(cells);
    }

    Ok(GeneratedSeatMap {
        seat_count: seat_number,
        seat_map: SeatMapConfig {
            rows,
            cols: columns,
            layout: SeatLayout(layout),
        },
    })
}
