//! Gauss-Jordan elimination composed from the row primitives.

use super::row::{eliminate_row, normalize_row};
use super::Matrix;
use crate::error::{MatrixError, Result};
use crate::fec::gf_tables::{GaloisField, Gf256};
use log::trace;

/// Reduces `coefficients` to reduced row echelon form in place and returns
/// its rank. Every row operation is mirrored on `companion`, which must have
/// the same number of rows.
pub fn reduce<F>(
    coefficients: &mut Matrix,
    mut companion: Option<&mut Matrix>,
    field: &F,
) -> Result<usize>
where
    F: GaloisField + ?Sized,
{
    let (rows, cols) = coefficients.shape();
    if let Some(c) = companion.as_deref() {
        if c.rows() != rows {
            return Err(MatrixError::DimensionMismatch {
                left: coefficients.shape(),
                right: c.shape(),
            });
        }
    }

    let mut rank = 0;
    for col in 0..cols {
        if rank == rows {
            break;
        }
        // pivot search
        let Some(pivot) = (rank..rows).find(|&r| coefficients.data[r * cols + col] != 0) else {
            continue;
        };
        coefficients.swap_rows(rank, pivot)?;
        if let Some(c) = companion.as_deref_mut() {
            c.swap_rows(rank, pivot)?;
        }

        let factor = coefficients.data[rank * cols + col];
        normalize_row(coefficients.row_mut(rank)?, factor, cols, field)?;
        if let Some(c) = companion.as_deref_mut() {
            let width = c.columns();
            normalize_row(c.row_mut(rank)?, factor, width, field)?;
        }

        for r in 0..rows {
            if r == rank {
                continue;
            }
            let coeff = coefficients.data[r * cols + col];
            if coeff == 0 {
                continue;
            }
            let (target, source) = coefficients.rows_pair_mut(r, rank)?;
            eliminate_row(target, source, coeff, cols, field)?;
            if let Some(c) = companion.as_deref_mut() {
                let width = c.columns();
                let (target, source) = c.rows_pair_mut(r, rank)?;
                eliminate_row(target, source, coeff, width, field)?;
            }
        }
        rank += 1;
    }
    trace!("reduced {}x{} matrix to rank {}", rows, cols, rank);
    Ok(rank)
}

impl Matrix {
    /// Rank over the default field.
    pub fn rank(&self) -> Result<usize> {
        self.rank_in(Gf256::default_field())
    }

    pub fn rank_in<F: GaloisField + ?Sized>(&self, field: &F) -> Result<usize> {
        let mut work = self.try_clone()?;
        reduce(&mut work, None, field)
    }

    /// Inverse over the default field.
    pub fn inverse(&self) -> Result<Matrix> {
        self.inverse_in(Gf256::default_field())
    }

    pub fn inverse_in<F: GaloisField + ?Sized>(&self, field: &F) -> Result<Matrix> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                columns: self.columns,
            });
        }
        let mut work = self.try_clone()?;
        let mut inverse = Matrix::identity(self.rows)?;
        let rank = reduce(&mut work, Some(&mut inverse), field)?;
        if rank < self.rows {
            return Err(MatrixError::Singular {
                rank,
                order: self.rows,
            });
        }
        Ok(inverse)
    }
}
