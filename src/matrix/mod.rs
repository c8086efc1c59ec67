// Copyright (c) 2024, The rlnc-matrix Project Authors.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
//     * Redistributions of source code must retain the above copyright
//       notice, this list of conditions and the following disclaimer.
//
//     * Redistributions in binary form must reproduce the above
//       copyright notice, this list of conditions and the following disclaimer
//       in the documentation and/or other materials provided with the
//       distribution.
//
//     * Neither the name of the copyright holder nor the names of its
//       contributors may be used to endorse or promote products derived from
//       this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
// OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE,
// DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
// THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Dense matrices over GF(2^8).
//!
//! Storage is a single row-major buffer with stride `columns`. A matrix with
//! zero rows owns no element storage at all.

use crate::error::{MatrixError, Result};
use crate::fec::gf_tables::{GaloisField, Gf256};
use log::{error, trace};
use rand::RngCore;
use std::fmt;

pub mod gauss;
pub mod row;

pub use row::{eliminate_row, normalize_row};

/// Widest matrix that the diagnostic dump renders as a grid.
pub const MAX_PRINT_COLUMNS: usize = 32;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    // Field order matters for the derived `PartialEq`: shapes are compared
    // before any element.
    rows: usize,
    columns: usize,
    data: Vec<u8>,
}

impl Matrix {
    /// Zero-filled `rows x columns` matrix.
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 {
            return Ok(Self {
                rows,
                columns,
                data: Vec::new(),
            });
        }
        let len = rows
            .checked_mul(columns)
            .ok_or(MatrixError::Allocation { rows, columns })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| MatrixError::Allocation { rows, columns })?;
        data.resize(len, 0);
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    /// Square identity matrix of order `n`.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        Ok(m)
    }

    /// Matrix with every element drawn independently from `rng`.
    ///
    /// The result is not checked for rank; see [`crate::fec::Encoder`] for a
    /// caller that retries until it gets an invertible one.
    pub fn random<R: RngCore + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Result<Self> {
        let mut m = Self::zeros(rows, columns)?;
        rng.fill_bytes(&mut m.data);
        Ok(m)
    }

    /// Builds a matrix from row slices. All rows must have the same length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let mut m = Self::zeros(rows.len(), columns)?;
        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != columns {
                return Err(MatrixError::Shape(format!(
                    "row {} has length {} but expected {}",
                    i,
                    r.len(),
                    columns
                )));
            }
            m.row_mut(i)?.copy_from_slice(r);
        }
        Ok(m)
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(rows: usize, columns: usize, data: Vec<u8>) -> Result<Self> {
        let expected = rows
            .checked_mul(columns)
            .ok_or(MatrixError::Allocation { rows, columns })?;
        if data.len() != expected {
            return Err(MatrixError::Shape(format!(
                "buffer of {} bytes cannot hold a {}x{} matrix",
                data.len(),
                rows,
                columns
            )));
        }
        let data = if rows == 0 { Vec::new() } else { data };
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Row-major view of every element.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Allocated element capacity; zero for matrices without rows.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    fn out_of_bounds(&self, row: usize, column: usize) -> MatrixError {
        MatrixError::IndexOutOfBounds {
            row,
            column,
            rows: self.rows,
            columns: self.columns,
        }
    }

    pub fn get(&self, row: usize, column: usize) -> Option<u8> {
        if row < self.rows && column < self.columns {
            Some(self.data[row * self.columns + column])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, column: usize, value: u8) -> Result<()> {
        if row >= self.rows || column >= self.columns {
            return Err(self.out_of_bounds(row, column));
        }
        self.data[row * self.columns + column] = value;
        Ok(())
    }

    pub fn row(&self, i: usize) -> Result<&[u8]> {
        if i >= self.rows {
            return Err(self.out_of_bounds(i, 0));
        }
        let start = i * self.columns;
        Ok(&self.data[start..start + self.columns])
    }

    pub fn row_mut(&mut self, i: usize) -> Result<&mut [u8]> {
        if i >= self.rows {
            return Err(self.out_of_bounds(i, 0));
        }
        let start = i * self.columns;
        Ok(&mut self.data[start..start + self.columns])
    }

    /// Borrows row `target` mutably alongside row `source`, for use with
    /// [`eliminate_row`] inside a single matrix.
    pub fn rows_pair_mut(&mut self, target: usize, source: usize) -> Result<(&mut [u8], &[u8])> {
        if target >= self.rows {
            return Err(self.out_of_bounds(target, 0));
        }
        if source >= self.rows {
            return Err(self.out_of_bounds(source, 0));
        }
        if target == source {
            return Err(MatrixError::AliasedRows(target));
        }
        let c = self.columns;
        if target < source {
            let (head, tail) = self.data.split_at_mut(source * c);
            Ok((&mut head[target * c..(target + 1) * c], &tail[..c]))
        } else {
            let (head, tail) = self.data.split_at_mut(target * c);
            Ok((&mut tail[..c], &head[source * c..(source + 1) * c]))
        }
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) -> Result<()> {
        if a >= self.rows {
            return Err(self.out_of_bounds(a, 0));
        }
        if b >= self.rows {
            return Err(self.out_of_bounds(b, 0));
        }
        if a == b {
            return Ok(());
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let c = self.columns;
        let (head, tail) = self.data.split_at_mut(hi * c);
        head[lo * c..(lo + 1) * c].swap_with_slice(&mut tail[..c]);
        Ok(())
    }

    /// Product over the default field. See [`Matrix::multiply_in`].
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        self.multiply_in(rhs, Gf256::default_field())
    }

    /// `self x rhs` over `field`.
    ///
    /// For every zero element `self[i][j]` the contribution of row `j` of
    /// `rhs` to row `i` of the result is skipped entirely, so the cost scales
    /// with the number of nonzero entries in `self`.
    pub fn multiply_in<F>(&self, rhs: &Matrix, field: &F) -> Result<Matrix>
    where
        F: GaloisField + ?Sized,
    {
        if self.columns != rhs.rows {
            error!(
                "multiply: inner dimensions disagree ({}x{} by {}x{})",
                self.rows, self.columns, rhs.rows, rhs.columns
            );
            return Err(MatrixError::DimensionMismatch {
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let mut result = Matrix::zeros(self.rows, rhs.columns)?;
        if self.columns == 0 || rhs.columns == 0 {
            return Ok(result);
        }

        let lhs_rows = self.data.chunks_exact(self.columns);
        let out_rows = result.data.chunks_exact_mut(rhs.columns);
        for (a_row, out_row) in lhs_rows.zip(out_rows) {
            for (&factor, b_row) in a_row.iter().zip(rhs.data.chunks_exact(rhs.columns)) {
                if factor != 0x00 {
                    row::accumulate_row(out_row, b_row, factor, field);
                }
            }
        }
        Ok(result)
    }

    /// Independent copy that reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Matrix> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|_| MatrixError::Allocation {
                rows: self.rows,
                columns: self.columns,
            })?;
        data.extend_from_slice(&self.data);
        Ok(Matrix {
            rows: self.rows,
            columns: self.columns,
            data,
        })
    }

    /// Same shape and same elements. Shape mismatches return before any
    /// element is inspected.
    pub fn equals(&self, other: &Matrix) -> bool {
        if self.rows != other.rows || self.columns != other.columns {
            return false;
        }
        self.data == other.data
    }

    /// Renders the dump with a custom width threshold.
    pub fn render(&self, max_columns: usize) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_grid(&mut out, max_columns);
        out
    }

    /// Writes the default dump to stdout.
    pub fn print(&self) {
        print!("{}", self);
    }

    /// Drops the matrix and its storage. Consuming `self` rules out use
    /// after release and double release.
    pub fn release(self) {
        trace!("releasing {}x{} matrix", self.rows, self.columns);
        drop(self);
    }

    fn write_grid<W: fmt::Write>(&self, w: &mut W, max_columns: usize) -> fmt::Result {
        writeln!(w, "rows = {}, columns = {}", self.rows, self.columns)?;
        if self.columns > max_columns {
            return writeln!(
                w,
                "matrix too wide to print ({} columns, limit {})",
                self.columns, max_columns
            );
        }
        for i in 0..self.rows {
            w.write_char('|')?;
            let start = i * self.columns;
            for v in &self.data[start..start + self.columns] {
                write!(w, " {:02x} ", v)?;
            }
            w.write_str("|\n")?;
        }
        Ok(())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_grid(f, MAX_PRINT_COLUMNS)
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matrix ")?;
        self.write_grid(f, MAX_PRINT_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    /// Default field that counts how often `mul` is called.
    #[derive(Default)]
    struct CountingField {
        muls: Cell<usize>,
    }

    impl GaloisField for CountingField {
        fn mul(&self, a: u8, b: u8) -> u8 {
            self.muls.set(self.muls.get() + 1);
            Gf256::default_field().mul(a, b)
        }

        fn div(&self, a: u8, b: u8) -> u8 {
            Gf256::default_field().div(a, b)
        }
    }

    fn m(rows: &[&[u8]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn zero_row_matrix_has_no_storage() {
        let z = Matrix::zeros(0, 7).unwrap();
        assert_eq!(z.shape(), (0, 7));
        assert_eq!(z.capacity(), 0);
        assert!(z.as_slice().is_empty());
        assert!(z.row(0).is_err());
        z.release();
    }

    #[test]
    fn zeros_are_zero() {
        let z = Matrix::zeros(3, 4).unwrap();
        assert_eq!(z.as_slice(), &[0u8; 12]);
    }

    #[test]
    fn zeros_reports_overflowing_shapes() {
        assert_eq!(
            Matrix::zeros(usize::MAX, 2).unwrap_err(),
            MatrixError::Allocation {
                rows: usize::MAX,
                columns: 2
            }
        );
        assert!(Matrix::zeros(1, usize::MAX).is_err());
    }

    #[test]
    fn identity_diagonal() {
        let i3 = Matrix::identity(3).unwrap();
        assert_eq!(i3, m(&[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]]));
        assert_eq!(Matrix::identity(0).unwrap().shape(), (0, 0));
    }

    #[test]
    fn identity_times_r_is_r() {
        let i3 = Matrix::identity(3).unwrap();
        let r = m(&[&[5, 6], &[7, 8], &[9, 10]]);
        let product = i3.multiply(&r).unwrap();
        assert_eq!(product, r);
    }

    #[test]
    fn zero_rows_annihilate() {
        let a = m(&[&[0, 0], &[0, 0]]);
        let b = m(&[&[1, 2], &[3, 4]]);
        assert_eq!(a.multiply(&b).unwrap(), m(&[&[0, 0], &[0, 0]]));

        let mixed = m(&[&[0, 0], &[1, 1]]);
        let p = mixed.multiply(&b).unwrap();
        assert_eq!(p.row(0).unwrap(), &[0, 0]);
        assert_eq!(p.row(1).unwrap(), &[1 ^ 3, 2 ^ 4]);
    }

    #[test]
    fn multiply_skips_zero_coefficients() {
        let b = m(&[&[1, 2, 3, 4], &[5, 6, 7, 8], &[9, 10, 11, 12]]);

        let field = CountingField::default();
        let a = m(&[&[0, 3, 0], &[0, 0, 0]]);
        let p = a.multiply_in(&b, &field).unwrap();
        assert_eq!(field.muls.get(), 4);
        assert_eq!(p, a.multiply(&b).unwrap());

        let field = CountingField::default();
        let z = Matrix::zeros(2, 3).unwrap();
        assert_eq!(z.multiply_in(&b, &field).unwrap(), Matrix::zeros(2, 4).unwrap());
        assert_eq!(field.muls.get(), 0);

        let mut rng = StdRng::seed_from_u64(9);
        let mut a = Matrix::random(6, 3, &mut rng).unwrap();
        for i in (0..6).step_by(2) {
            a.set(i, i % 3, 0).unwrap();
        }
        a.row_mut(5).unwrap().fill(0);
        let nnz = a.as_slice().iter().filter(|&&v| v != 0).count();
        let field = CountingField::default();
        a.multiply_in(&b, &field).unwrap();
        assert_eq!(field.muls.get(), nnz * b.columns());
    }

    #[test]
    fn multiply_known_product() {
        let gf = Gf256::default_field();
        let a = m(&[&[2, 3]]);
        let b = m(&[&[0x80], &[3]]);
        let p = a.multiply(&b).unwrap();
        assert_eq!(p.as_slice(), &[gf.mul(2, 0x80) ^ gf.mul(3, 3)]);
        assert_eq!(p.as_slice(), &[0x1D ^ 5]);
    }

    #[test]
    fn multiply_dimension_mismatch() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(2, 3).unwrap();
        assert_eq!(
            a.multiply(&b).unwrap_err(),
            MatrixError::DimensionMismatch {
                left: (2, 3),
                right: (2, 3)
            }
        );
    }

    #[test]
    fn multiply_degenerate_shapes() {
        let a = Matrix::zeros(3, 0).unwrap();
        let b = Matrix::zeros(0, 4).unwrap();
        let p = a.multiply(&b).unwrap();
        assert_eq!(p, Matrix::zeros(3, 4).unwrap());

        let c = Matrix::zeros(2, 2).unwrap();
        let d = Matrix::zeros(2, 0).unwrap();
        assert_eq!(c.multiply(&d).unwrap().shape(), (2, 0));

        let e = Matrix::zeros(0, 2).unwrap();
        assert_eq!(e.multiply(&c).unwrap().shape(), (0, 2));
    }

    #[test]
    fn copy_is_independent() {
        let mut rng = StdRng::seed_from_u64(7);
        let original = Matrix::random(4, 5, &mut rng).unwrap();
        let mut copy = original.try_clone().unwrap();
        assert!(copy.equals(&original));
        let old = copy.get(2, 3).unwrap();
        copy.set(2, 3, old ^ 0xFF).unwrap();
        assert!(!copy.equals(&original));
        assert_eq!(original.get(2, 3), Some(old));
    }

    #[test]
    fn equality_requires_matching_shape() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(3, 2).unwrap();
        assert!(!a.equals(&b));
        assert_ne!(a, b);
        assert!(Matrix::zeros(0, 3).unwrap() != Matrix::zeros(0, 2).unwrap());
    }

    #[test]
    fn random_is_seed_deterministic() {
        let a = Matrix::random(8, 8, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Matrix::random(8, 8, &mut StdRng::seed_from_u64(42)).unwrap();
        let c = Matrix::random(8, 8, &mut StdRng::seed_from_u64(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1u8, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, MatrixError::Shape(_)));
        assert!(Matrix::from_vec(2, 2, vec![0; 3]).is_err());
        assert_eq!(
            Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap(),
            m(&[&[1, 2], &[3, 4]])
        );
    }

    #[test]
    fn row_access_and_swap() {
        let mut a = m(&[&[1, 2], &[3, 4], &[5, 6]]);
        a.swap_rows(0, 2).unwrap();
        assert_eq!(a, m(&[&[5, 6], &[3, 4], &[1, 2]]));
        a.swap_rows(1, 1).unwrap();
        assert!(a.swap_rows(0, 3).is_err());
        assert!(a.set(3, 0, 1).is_err());
        assert_eq!(a.get(0, 2), None);
    }

    #[test]
    fn rows_pair_mut_both_orders() {
        let gf = Gf256::default_field();
        let mut a = m(&[&[1, 2], &[3, 4], &[5, 6]]);
        {
            let (t, s) = a.rows_pair_mut(2, 0).unwrap();
            eliminate_row(t, s, 1, 2, gf).unwrap();
        }
        assert_eq!(a.row(2).unwrap(), &[5 ^ 1, 6 ^ 2]);
        {
            let (t, s) = a.rows_pair_mut(0, 1).unwrap();
            assert_eq!(s, &[3, 4]);
            t[0] = 9;
        }
        assert_eq!(a.row(0).unwrap(), &[9, 2]);
        assert_eq!(a.rows_pair_mut(1, 1).unwrap_err(), MatrixError::AliasedRows(1));
    }

    #[test]
    fn dump_format() {
        let a = m(&[&[0x05, 0xAB], &[0x00, 0x10]]);
        assert_eq!(
            a.to_string(),
            "rows = 2, columns = 2\n| 05  ab |\n| 00  10 |\n"
        );
        a.print();
    }

    #[test]
    fn dump_truncates_wide_matrices() {
        let wide = Matrix::zeros(1, MAX_PRINT_COLUMNS + 1).unwrap();
        let text = wide.to_string();
        assert!(text.starts_with("rows = 1, columns = 33\n"));
        assert!(text.contains("too wide"));
        assert!(!text.contains('|'));
        assert!(wide.render(64).contains('|'));
    }
}
