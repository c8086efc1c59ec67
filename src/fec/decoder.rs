use super::gf_tables::{GaloisField, Gf256};
use crate::app_config::EngineConfig;
use crate::error::{MatrixError, Result};
use crate::matrix::{gauss, Matrix};
use log::{debug, error};

/// Recovers source rows from coded rows and the coefficients used to make
/// them.
pub struct Decoder<F = Gf256> {
    field: F,
}

impl Decoder<Gf256> {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self::with_field(Gf256::with_polynomial(config.polynomial)?))
    }
}

impl<F: GaloisField> Decoder<F> {
    pub fn with_field(field: F) -> Self {
        Self { field }
    }

    /// Reduces `coefficients` to the identity while applying the same row
    /// operations to `payload`, which then holds the source rows.
    pub fn decode(&self, mut coefficients: Matrix, mut payload: Matrix) -> Result<Matrix> {
        if !coefficients.is_square() {
            return Err(MatrixError::NotSquare {
                rows: coefficients.rows(),
                columns: coefficients.columns(),
            });
        }
        if coefficients.rows() != payload.rows() {
            return Err(MatrixError::DimensionMismatch {
                left: coefficients.shape(),
                right: payload.shape(),
            });
        }
        let order = coefficients.rows();
        let rank = gauss::reduce(&mut coefficients, Some(&mut payload), &self.field)?;
        if rank < order {
            error!("decode: coefficient matrix has rank {} of {}", rank, order);
            return Err(MatrixError::Singular { rank, order });
        }
        debug!("decoded {} rows of {} bytes", order, payload.columns());
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fec::Encoder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn decodes_what_was_encoded() {
        let cfg = EngineConfig::default();
        let enc = Encoder::new(&cfg).unwrap();
        let dec = Decoder::new(&cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let data = Matrix::random(8, 32, &mut rng).unwrap();
        let coded = enc.encode(&data, &mut rng).unwrap();
        let recovered = dec.decode(coded.coefficients, coded.payload).unwrap();
        assert_eq!(recovered, data);
    }

    #[test]
    fn singular_coefficients_rejected() {
        let dec = Decoder::new(&EngineConfig::default()).unwrap();
        let coeffs = Matrix::from_rows(&[&[1u8, 1][..], &[1, 1]]).unwrap();
        let payload = Matrix::zeros(2, 4).unwrap();
        assert_eq!(
            dec.decode(coeffs, payload).unwrap_err(),
            MatrixError::Singular { rank: 1, order: 2 }
        );
    }

    #[test]
    fn shape_checks() {
        let dec = Decoder::new(&EngineConfig::default()).unwrap();
        assert!(matches!(
            dec.decode(Matrix::zeros(2, 3).unwrap(), Matrix::zeros(2, 1).unwrap()),
            Err(MatrixError::NotSquare { .. })
        ));
        assert!(matches!(
            dec.decode(Matrix::identity(2).unwrap(), Matrix::zeros(3, 1).unwrap()),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }
}
