//! Augmented-matrix linear system solver.
//!
//! The splitter asks two kinds of questions of it: "how do these two planes
//! meet?" and "where does this edge cross that line?". Both reduce to row
//! reduction followed by counting free variables.

use std::fmt;

use nalgebra::{DMatrix, DVector, Point3};
use thiserror::Error;

use crate::equation::{line_rows, plane_row};
use crate::{EPSILON, Plane3D};

/// Dimensionality of the solution set of a reduced system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionType {
    /// The system has not been classified yet.
    Undefined,
    /// The equations contradict each other.
    Unsolvable,
    /// Exactly one solution.
    Point,
    /// One free variable.
    Line,
    /// Two free variables.
    Plane,
    /// More than two free variables.
    HigherDimension,
}

/// Errors raised by [`AugmentedMatrix`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The equation row does not have one coefficient per column.
    #[error("equation has {got} columns, matrix expects {expected}")]
    WidthMismatch { expected: usize, got: usize },

    /// Every row of the matrix is already in use.
    #[error("row budget of {capacity} equations exhausted")]
    RowBudgetExceeded { capacity: usize },

    /// A line was requested through two coincident points.
    #[error("a line needs two distinct points")]
    DegenerateLine,

    /// A single point was requested from a system that does not have one.
    #[error("point solution requested from a {0:?} system")]
    AmbiguousSolution(SolutionType),

    /// Back-substitution stopped making progress.
    #[error("back-substitution stalled with {remaining} unknowns unresolved")]
    Unresolved { remaining: usize },
}

/// An m × n augmented matrix: n − 1 coefficient columns plus the right-hand side.
///
/// Rows are appended with the `add_*` methods up to the row budget given at
/// construction; rows that were never filled stay zero and do not constrain
/// the system. Elimination reduces the matrix in place, so clone it first if
/// the original equations are still needed.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedMatrix {
    data: DMatrix<f64>,
    filled: usize,
    epsilon: f64,
    solution: SolutionType,
}

impl AugmentedMatrix {
    /// Creates an empty system with a budget of `rows` equations and `columns`
    /// columns (the last one being the right-hand side), using [`EPSILON`].
    ///
    /// # Panics
    /// Panics if `columns < 2`.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::with_epsilon(rows, columns, EPSILON)
    }

    /// Creates an empty system with a custom tolerance.
    ///
    /// # Panics
    /// Panics if `columns < 2`.
    pub fn with_epsilon(rows: usize, columns: usize, epsilon: f64) -> Self {
        assert!(columns >= 2, "Augmented matrix needs at least one unknown");
        Self {
            data: DMatrix::zeros(rows, columns),
            filled: 0,
            epsilon,
            solution: SolutionType::Undefined,
        }
    }

    /// Copies this system into a new one with room for `extra` more equations.
    ///
    /// The copy is unclassified, even if `self` has been solved.
    pub fn stacked(&self, extra: usize) -> Self {
        let (rows, columns) = self.data.shape();
        let mut data = DMatrix::zeros(rows + extra, columns);
        data.rows_mut(0, rows).copy_from(&self.data);
        Self {
            data,
            filled: self.filled,
            epsilon: self.epsilon,
            solution: SolutionType::Undefined,
        }
    }

    /// Row budget of the matrix.
    #[inline]
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Width of the matrix, right-hand side included.
    #[inline]
    pub fn columns(&self) -> usize {
        self.data.ncols()
    }

    /// Number of unknowns (`columns - 1`).
    #[inline]
    pub fn unknowns(&self) -> usize {
        self.data.ncols() - 1
    }

    /// Number of equations added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Returns `true` if no equation has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Tolerance used for noise culling and residual checks.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the cell at `row`, `column`.
    #[inline]
    pub fn entry(&self, row: usize, column: usize) -> f64 {
        self.data[(row, column)]
    }

    /// Classification from the last [`determine_solution`](Self::determine_solution).
    #[inline]
    pub fn solution_type(&self) -> SolutionType {
        self.solution
    }

    /// Appends a coefficient row. The row must be exactly as wide as the matrix.
    pub fn add_equation(&mut self, row: &[f64]) -> Result<(), SolverError> {
        if row.len() != self.columns() {
            return Err(SolverError::WidthMismatch {
                expected: self.columns(),
                got: row.len(),
            });
        }
        if self.filled >= self.rows() {
            return Err(SolverError::RowBudgetExceeded {
                capacity: self.rows(),
            });
        }

        for (c, value) in row.iter().enumerate() {
            self.data[(self.filled, c)] = *value;
        }
        self.filled += 1;
        self.solution = SolutionType::Undefined;
        Ok(())
    }

    /// Appends the point-normal equation of `plane`.
    pub fn add_plane(&mut self, plane: &Plane3D) -> Result<(), SolverError> {
        self.add_equation(&plane_row(plane))
    }

    /// Appends the two plane equations whose intersection is the line through
    /// `p1` and `p2`. Consumes two rows of budget; nothing is added on error.
    pub fn add_line(&mut self, p1: Point3<f64>, p2: Point3<f64>) -> Result<(), SolverError> {
        let [first, second] = line_rows(p1, p2).ok_or(SolverError::DegenerateLine)?;
        if self.columns() != first.len() {
            return Err(SolverError::WidthMismatch {
                expected: self.columns(),
                got: first.len(),
            });
        }
        if self.filled + 2 > self.rows() {
            return Err(SolverError::RowBudgetExceeded {
                capacity: self.rows(),
            });
        }
        self.add_equation(&first)?;
        self.add_equation(&second)
    }

    /// Reduces the matrix to row-echelon form.
    ///
    /// Columns are processed left to right. The pivot is the first row at or
    /// below the current position whose entry exceeds epsilon in magnitude; it is
    /// swapped into place, scaled to a leading 1, and used to clear the column
    /// in every row below it.
    pub fn gaussian_elimination(&mut self) {
        let (rows, columns) = self.data.shape();
        let mut pivot_row = 0;

        for col in 0..columns - 1 {
            if pivot_row >= rows {
                break;
            }

            let found = (pivot_row..rows).find(|&r| self.data[(r, col)].abs() > self.epsilon);
            let Some(found) = found else {
                // Only noise left in this column
                for r in pivot_row..rows {
                    self.data[(r, col)] = 0.0;
                }
                continue;
            };

            if found != pivot_row {
                self.data.swap_rows(found, pivot_row);
            }

            let lead = self.data[(pivot_row, col)];
            if lead != 1.0 {
                for c in col..columns {
                    self.data[(pivot_row, c)] /= lead;
                }
                self.data[(pivot_row, col)] = 1.0;
            }

            for r in pivot_row + 1..rows {
                let factor = self.data[(r, col)];
                if factor == 0.0 {
                    continue;
                }
                for c in col..columns {
                    self.data[(r, c)] -= factor * self.data[(pivot_row, c)];
                }
                self.data[(r, col)] = 0.0;
            }

            pivot_row += 1;
        }

        self.solution = SolutionType::Undefined;
    }

    /// Reduces the matrix to reduced row-echelon form, then zeroes every cell
    /// below epsilon in magnitude.
    pub fn gauss_jordan_elimination(&mut self) {
        self.gaussian_elimination();

        let (rows, columns) = self.data.shape();
        for r in (0..rows).rev() {
            let Some(col) = (0..columns - 1).find(|&c| self.data[(r, c)] != 0.0) else {
                continue;
            };
            for above in 0..r {
                let factor = self.data[(above, col)];
                if factor == 0.0 {
                    continue;
                }
                for c in col..columns {
                    self.data[(above, c)] -= factor * self.data[(r, c)];
                }
                self.data[(above, col)] = 0.0;
            }
        }

        self.cull_small_values();
    }

    fn cull_small_values(&mut self) {
        let epsilon = self.epsilon;
        self.data
            .iter_mut()
            .filter(|value| value.abs() < epsilon)
            .for_each(|value| *value = 0.0);
    }

    /// Classifies the solution set of a reduced matrix and stores the result.
    pub fn determine_solution(&mut self) -> SolutionType {
        let unknowns = self.unknowns();
        let mut pivot_columns = vec![false; unknowns];

        for r in 0..self.rows() {
            match (0..unknowns).find(|&c| self.data[(r, c)] != 0.0) {
                Some(c) => pivot_columns[c] = true,
                // 0 = b with b != 0
                None if self.data[(r, unknowns)] != 0.0 => {
                    self.solution = SolutionType::Unsolvable;
                    return self.solution;
                }
                None => {}
            }
        }

        let pivots = pivot_columns.iter().filter(|&&p| p).count();
        self.solution = match unknowns - pivots {
            0 => SolutionType::Point,
            1 => SolutionType::Line,
            2 => SolutionType::Plane,
            _ => SolutionType::HigherDimension,
        };
        self.solution
    }

    /// Runs [`gauss_jordan_elimination`](Self::gauss_jordan_elimination) and
    /// [`determine_solution`](Self::determine_solution).
    pub fn solve(&mut self) -> SolutionType {
        self.gauss_jordan_elimination();
        self.determine_solution()
    }

    /// Returns the unique solution of a system classified as [`SolutionType::Point`].
    pub fn point_solution(&self) -> Result<DVector<f64>, SolverError> {
        match self.solution {
            SolutionType::Point => self.back_substitute(),
            other => Err(SolverError::AmbiguousSolution(other)),
        }
    }

    /// [`point_solution`](Self::point_solution) for systems in three unknowns.
    pub fn point3_solution(&self) -> Result<Point3<f64>, SolverError> {
        if self.unknowns() != 3 {
            return Err(SolverError::WidthMismatch {
                expected: 4,
                got: self.columns(),
            });
        }
        let values = self.point_solution()?;
        Ok(Point3::new(values[0], values[1], values[2]))
    }

    fn back_substitute(&self) -> Result<DVector<f64>, SolverError> {
        let unknowns = self.unknowns();
        let mut values = DVector::zeros(unknowns);
        let mut known = vec![false; unknowns];
        let mut pending = Vec::new();

        // Variables already isolated by the reduction
        for r in 0..self.rows() {
            let mut nonzero = (0..unknowns).filter(|&c| self.data[(r, c)] != 0.0);
            match (nonzero.next(), nonzero.next()) {
                (None, _) => {}
                (Some(c), None) => {
                    values[c] = self.data[(r, unknowns)] / self.data[(r, c)];
                    known[c] = true;
                }
                (Some(_), Some(_)) => pending.push(r),
            }
        }

        let mut remaining = known.iter().filter(|k| !**k).count();
        while remaining > 0 {
            let before = remaining;
            pending.retain(|&r| {
                let mut sum = self.data[(r, unknowns)];
                let mut unresolved = None;
                let mut count = 0;
                for c in 0..unknowns {
                    let coefficient = self.data[(r, c)];
                    if coefficient == 0.0 {
                        continue;
                    }
                    if known[c] {
                        sum -= coefficient * values[c];
                    } else {
                        count += 1;
                        unresolved = Some(c);
                    }
                }
                match (count, unresolved) {
                    (1, Some(c)) => {
                        values[c] = sum / self.data[(r, c)];
                        known[c] = true;
                        remaining -= 1;
                        false
                    }
                    (0, _) => false,
                    _ => true,
                }
            });
            if remaining == before {
                return Err(SolverError::Unresolved { remaining });
            }
        }

        Ok(values)
    }

    /// Returns `true` if `values` satisfies every equation within epsilon.
    ///
    /// A slice of the wrong length never satisfies the system.
    pub fn satisfies(&self, values: &[f64]) -> bool {
        let unknowns = self.unknowns();
        if values.len() != unknowns {
            return false;
        }
        (0..self.rows()).all(|r| {
            let residual = (0..unknowns).fold(self.data[(r, unknowns)], |sum, c| {
                sum - self.data[(r, c)] * values[c]
            });
            residual.abs() <= self.epsilon
        })
    }

    /// [`satisfies`](Self::satisfies) for a point in three unknowns.
    #[inline]
    pub fn satisfies_point(&self, point: Point3<f64>) -> bool {
        self.satisfies(point.coords.as_slice())
    }
}

impl fmt::Display for AugmentedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unknowns = self.unknowns();
        for r in 0..self.rows() {
            for c in 0..unknowns {
                write!(f, "{:>10.4} ", self.data[(r, c)])?;
            }
            writeln!(f, "| {:>10.4}", self.data[(r, unknowns)])?;
        }
        Ok(())
    }
}
