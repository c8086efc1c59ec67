// rlnc-matrix Core Library
//
// GF(2^8) matrix engine for random linear network coding: matrix
// construction, multiplication, the row primitives of Gauss-Jordan
// elimination, and the encoder/decoder built on them.

pub mod app_config;
pub mod error;
pub mod fec;
pub mod logger;
pub mod matrix;

pub use app_config::EngineConfig;
pub use error::{MatrixError, Result};
pub use fec::{Decoder, Encoded, Encoder, GaloisField, Gf256};
pub use matrix::{eliminate_row, normalize_row, Matrix, MAX_PRINT_COLUMNS};
