use thiserror::Error;

/// Errors surfaced by the matrix engine and the coding layer built on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("dimension mismatch: cannot combine {}x{} with {}x{}", left.0, left.1, right.0, right.1)]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("unable to allocate storage for a {rows}x{columns} matrix")]
    Allocation { rows: usize, columns: usize },
    #[error("invalid shape: {0}")]
    Shape(String),
    #[error("row operation over {len} elements exceeds row length {available}")]
    RowLength { len: usize, available: usize },
    #[error("division by zero in row normalization")]
    ZeroDivisor,
    #[error("index ({row}, {column}) out of bounds for a {rows}x{columns} matrix")]
    IndexOutOfBounds {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },
    #[error("row {0} cannot be both target and source")]
    AliasedRows(usize),
    #[error("expected a square matrix, got {rows}x{columns}")]
    NotSquare { rows: usize, columns: usize },
    #[error("matrix is singular (rank {rank} of {order})")]
    Singular { rank: usize, order: usize },
    #[error("no full-rank coefficient matrix after {attempts} attempts")]
    RankDeficient { attempts: usize },
    #[error("polynomial {0:#x} does not generate GF(2^8) with generator 2")]
    InvalidPolynomial(u16),
    #[error("config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for MatrixError {
    fn from(e: toml::de::Error) -> Self {
        MatrixError::Config(e.to_string())
    }
}

impl From<std::io::Error> for MatrixError {
    fn from(e: std::io::Error) -> Self {
        MatrixError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatrixError>;
