//! Row-level elimination primitives.
//!
//! These work on raw rows rather than whole matrices so a decoder can apply
//! the same step to a coefficient row and its payload row in lockstep.

use crate::error::{MatrixError, Result};
use crate::fec::gf_tables::GaloisField;

#[inline(always)]
fn check_len(len: usize, available: usize) -> Result<()> {
    if len > available {
        return Err(MatrixError::RowLength { len, available });
    }
    Ok(())
}

/// Divides the first `len` elements of `row` by `factor`.
///
/// A factor of 1 returns immediately. A zero factor is rejected before any
/// element is touched.
pub fn normalize_row<F>(row: &mut [u8], factor: u8, len: usize, field: &F) -> Result<()>
where
    F: GaloisField + ?Sized,
{
    if factor == 0x01 {
        return Ok(());
    }
    check_len(len, row.len())?;
    if factor == 0x00 {
        return Err(MatrixError::ZeroDivisor);
    }
    for v in &mut row[..len] {
        *v = field.div(*v, factor);
    }
    Ok(())
}

/// `target[i] = target[i] - coeff * source[i]` for the first `len` elements.
///
/// A zero coefficient returns immediately. Since subtraction is XOR, calling
/// this twice with the same arguments restores `target`.
pub fn eliminate_row<F>(
    target: &mut [u8],
    source: &[u8],
    coeff: u8,
    len: usize,
    field: &F,
) -> Result<()>
where
    F: GaloisField + ?Sized,
{
    if coeff == 0x00 {
        return Ok(());
    }
    check_len(len, target.len())?;
    check_len(len, source.len())?;
    for (t, &s) in target[..len].iter_mut().zip(&source[..len]) {
        *t = field.sub(*t, field.mul(coeff, s));
    }
    Ok(())
}

/// `acc[i] = acc[i] + factor * source[i]` over the whole row.
#[inline(always)]
pub(crate) fn accumulate_row<F>(acc: &mut [u8], source: &[u8], factor: u8, field: &F)
where
    F: GaloisField + ?Sized,
{
    for (a, &s) in acc.iter_mut().zip(source) {
        *a = field.add(*a, field.mul(factor, s));
    }
}
