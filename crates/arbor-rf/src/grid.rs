//! Decision regions: the forest's vote over a regular lattice of query points.

use std::collections::BTreeMap;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{info, instrument};

use crate::error::RfError;
use crate::forest::RandomForest;
use crate::predict::vote;
use crate::sample::{ClassLabel, Point, Sample};

/// Lattice resolution and the margin added around the data's bounding box.
///
/// # Defaults
///
/// | Parameter        | Default |
/// |------------------|---------|
/// | `rows`           | 80      |
/// | `cols`           | 80      |
/// | `income_padding` | 12.0    |
/// | `score_padding`  | 60.0    |
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    rows: usize,
    cols: usize,
    income_padding: f64,
    score_padding: f64,
}

impl GridConfig {
    /// Create a config with `rows` score steps and `cols` income steps.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidGrid`] if either dimension is below 2.
    pub fn new(rows: usize, cols: usize) -> Result<Self, RfError> {
        if rows < 2 || cols < 2 {
            return Err(RfError::InvalidGrid { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            income_padding: 12.0,
            score_padding: 60.0,
        })
    }

    /// Set the margin added on both sides of each feature's range.
    #[must_use]
    pub fn with_padding(mut self, income_padding: f64, score_padding: f64) -> Self {
        self.income_padding = income_padding;
        self.score_padding = score_padding;
        self
    }

    // --- Getters ---

    /// Return the number of rows (score axis).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns (income axis).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the income margin.
    #[must_use]
    pub fn income_padding(&self) -> f64 {
        self.income_padding
    }

    /// Return the score margin.
    #[must_use]
    pub fn score_padding(&self) -> f64 {
        self.score_padding
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 80,
            cols: 80,
            income_padding: 12.0,
            score_padding: 60.0,
        }
    }
}

/// Inclusive bounds of the lattice on both features.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bounds {
    /// Lowest income, after padding.
    pub income_min: f64,
    /// Highest income, after padding.
    pub income_max: f64,
    /// Lowest score, after padding.
    pub score_min: f64,
    /// Highest score, after padding.
    pub score_max: f64,
}

impl Bounds {
    fn around(data: &[Sample], config: &GridConfig) -> Self {
        let (mut income_min, mut income_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut score_min, mut score_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for s in data {
            income_min = income_min.min(s.point.income);
            income_max = income_max.max(s.point.income);
            score_min = score_min.min(s.point.score);
            score_max = score_max.max(s.point.score);
        }
        Self {
            income_min: income_min - config.income_padding,
            income_max: income_max + config.income_padding,
            score_min: score_min - config.score_padding,
            score_max: score_max + config.score_padding,
        }
    }
}

/// The forest's class for every lattice cell, stored row-major.
///
/// Row `i` fixes the score, column `j` fixes the income.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DecisionGrid {
    rows: usize,
    cols: usize,
    bounds: Bounds,
    cells: Vec<ClassLabel>,
}

impl DecisionGrid {
    /// Vote on every cell of the lattice spanning `data`'s padded bounding box.
    ///
    /// Cells are voted in parallel; results are stored in row-major order.
    ///
    /// # Errors
    ///
    /// | Variant                     | When                                 |
    /// |-----------------------------|--------------------------------------|
    /// | [`RfError::EmptyDataset`]   | `data` is empty                      |
    /// | [`RfError::NonFiniteValue`] | any feature value is NaN or infinite |
    /// | [`RfError::EmptyForest`]    | `forest` holds no trees              |
    #[instrument(skip_all, fields(rows = config.rows, cols = config.cols))]
    pub fn compute(
        config: &GridConfig,
        data: &[Sample],
        forest: &RandomForest,
    ) -> Result<Self, RfError> {
        if data.is_empty() {
            return Err(RfError::EmptyDataset);
        }
        crate::sample::validate_finite(data)?;

        let mut grid = Self {
            rows: config.rows,
            cols: config.cols,
            bounds: Bounds::around(data, config),
            cells: Vec::new(),
        };
        grid.cells = (0..grid.rows * grid.cols)
            .into_par_iter()
            .map(|cell| {
                let point = grid.point_at(cell / grid.cols, cell % grid.cols);
                vote(forest, &point).map(|v| v.class)
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(n_cells = grid.cells.len(), "decision grid computed");
        Ok(grid)
    }

    /// Query point for lattice cell (`row`, `col`). Corners hit the bounds exactly.
    #[must_use]
    pub fn point_at(&self, row: usize, col: usize) -> Point {
        let b = &self.bounds;
        let col_frac = col as f64 / (self.cols - 1) as f64;
        let row_frac = row as f64 / (self.rows - 1) as f64;
        let income = b.income_min + (b.income_max - b.income_min) * col_frac;
        let score = b.score_min + (b.score_max - b.score_min) * row_frac;
        Point::new(income, score)
    }

    /// Class voted for cell (`row`, `col`), or `None` outside the lattice.
    #[must_use]
    pub fn class_at(&self, row: usize, col: usize) -> Option<ClassLabel> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// Fraction of cells assigned to each class that appears at least once.
    #[must_use]
    pub fn class_shares(&self) -> BTreeMap<ClassLabel, f64> {
        let mut counts: BTreeMap<ClassLabel, usize> = BTreeMap::new();
        for &class in &self.cells {
            *counts.entry(class).or_insert(0) += 1;
        }
        let n = self.cells.len() as f64;
        counts.into_iter().map(|(c, k)| (c, k as f64 / n)).collect()
    }

    /// All cell classes, row-major.
    #[must_use]
    pub fn cells(&self) -> &[ClassLabel] {
        &self.cells
    }

    /// Number of lattice rows (score axis).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of lattice columns (income axis).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Padded bounding box the lattice spans.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
