use super::gf_tables::{GaloisField, Gf256};
use crate::app_config::EngineConfig;
use crate::error::{MatrixError, Result};
use crate::matrix::{gauss, Matrix};
use log::{debug, warn};
use rand::RngCore;

/// Output of one encoding pass: the coefficients that were drawn and the
/// coded payload rows they produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub coefficients: Matrix,
    pub payload: Matrix,
}

/// Encodes a generation of source packets (one per data row) into the same
/// number of coded packets using a random, invertible coefficient matrix.
pub struct Encoder<F = Gf256> {
    field: F,
    max_attempts: usize,
}

impl Encoder<Gf256> {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self::with_field(
            Gf256::with_polynomial(config.polynomial)?,
            config.max_coefficient_attempts,
        ))
    }
}

impl<F: GaloisField> Encoder<F> {
    pub fn with_field(field: F, max_attempts: usize) -> Self {
        Self {
            field,
            max_attempts,
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    /// Draws a full-rank `k x k` coefficient matrix, retrying at most
    /// `max_attempts` times. An empty generation needs no draw.
    pub fn coefficients<R: RngCore + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Matrix> {
        if k == 0 {
            return Matrix::zeros(0, 0);
        }
        for attempt in 1..=self.max_attempts {
            let candidate = Matrix::random(k, k, rng)?;
            let mut work = candidate.try_clone()?;
            let rank = gauss::reduce(&mut work, None, &self.field)?;
            if rank == k {
                debug!("coefficient matrix of order {} accepted on attempt {}", k, attempt);
                return Ok(candidate);
            }
            warn!("coefficient matrix rank {} < {}, redrawing", rank, k);
        }
        Err(MatrixError::RankDeficient {
            attempts: self.max_attempts,
        })
    }

    /// Multiplies `data` through a fresh coefficient matrix.
    pub fn encode<R: RngCore + ?Sized>(&self, data: &Matrix, rng: &mut R) -> Result<Encoded> {
        let coefficients = self.coefficients(data.rows(), rng)?;
        let payload = coefficients.multiply_in(data, &self.field)?;
        Ok(Encoded {
            coefficients,
            payload,
        })
    }
}
