use crate::error::{MatrixError, Result};
use lazy_static::lazy_static;

// --- Finite Field Arithmetic (GF(2^8)) ---

const GF_ORDER: usize = 256;

/// Default reduction polynomial: x^8 + x^4 + x^3 + x^2 + 1.
pub const IRREDUCIBLE_POLY: u16 = 0x11D;

/// Byte-valued field operations consumed by the matrix engine.
///
/// Addition and subtraction coincide with XOR in characteristic 2, so both
/// have default implementations. `div(a, 0)` is a caller error; the engine
/// never issues it.
pub trait GaloisField {
    #[inline(always)]
    fn add(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    #[inline(always)]
    fn sub(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    fn mul(&self, a: u8, b: u8) -> u8;

    fn div(&self, a: u8, b: u8) -> u8;
}

/// Log/exp table implementation of GF(2^8).
#[derive(Clone)]
pub struct Gf256 {
    poly: u16,
    log: [u8; GF_ORDER],
    // Doubled so that `log[a] + log[b]` never needs a modulo.
    exp: [u8; GF_ORDER * 2],
}

lazy_static! {
    static ref DEFAULT_FIELD: Gf256 = Gf256::from_primitive(IRREDUCIBLE_POLY);
}

impl Gf256 {
    /// Returns the shared field over [`IRREDUCIBLE_POLY`].
    pub fn default_field() -> &'static Gf256 {
        &DEFAULT_FIELD
    }

    /// Builds tables for `poly`, which must have degree 8 and admit 2 as a
    /// generator of the multiplicative group.
    pub fn with_polynomial(poly: u16) -> Result<Self> {
        if !(0x100..=0x1FF).contains(&poly) {
            return Err(MatrixError::InvalidPolynomial(poly));
        }
        let mut seen = [false; GF_ORDER];
        let mut x: u16 = 1;
        for _ in 0..GF_ORDER - 1 {
            if x == 0 || seen[x as usize] {
                return Err(MatrixError::InvalidPolynomial(poly));
            }
            seen[x as usize] = true;
            x = Self::times_two(x, poly);
        }
        if x != 1 {
            return Err(MatrixError::InvalidPolynomial(poly));
        }
        Ok(Self::from_primitive(poly))
    }

    fn from_primitive(poly: u16) -> Self {
        let mut log = [0u8; GF_ORDER];
        let mut exp = [0u8; GF_ORDER * 2];
        let mut x: u16 = 1;
        for i in 0..GF_ORDER - 1 {
            exp[i] = x as u8;
            exp[i + 255] = x as u8;
            log[x as usize] = i as u8;
            x = Self::times_two(x, poly);
        }
        Self { poly, log, exp }
    }

    #[inline(always)]
    fn times_two(x: u16, poly: u16) -> u16 {
        let x = x << 1;
        if x & 0x100 != 0 {
            x ^ poly
        } else {
            x
        }
    }

    pub fn polynomial(&self) -> u16 {
        self.poly
    }

    /// Multiplicative inverse; `None` for zero.
    #[inline(always)]
    pub fn inv(&self, a: u8) -> Option<u8> {
        if a == 0 {
            return None;
        }
        Some(self.exp[255 - self.log[a as usize] as usize])
    }
}

impl GaloisField for Gf256 {
    #[inline(always)]
    fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let sum_log = self.log[a as usize] as usize + self.log[b as usize] as usize;
        self.exp[sum_log]
    }

    /// Returns 0 when `b == 0` rather than panicking.
    #[inline(always)]
    fn div(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let idx = self.log[a as usize] as usize + 255 - self.log[b as usize] as usize;
        self.exp[idx]
    }
}

impl std::fmt::Debug for Gf256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gf256")
            .field("poly", &format_args!("{:#x}", self.poly))
            .finish()
    }
}

/// Table-free shift-and-add field. Slow, but independent of the log/exp
/// tables, which makes it the oracle in tests.
#[derive(Debug, Clone, Copy)]
pub struct ShiftAddField {
    poly: u16,
}

impl ShiftAddField {
    pub fn new(poly: u16) -> Self {
        Self { poly }
    }

    fn pow(&self, mut x: u8, mut power: u32) -> u8 {
        let mut result = 1u8;
        while power > 0 {
            if power & 1 != 0 {
                result = self.mul(result, x);
            }
            x = self.mul(x, x);
            power >>= 1;
        }
        result
    }
}

impl Default for ShiftAddField {
    fn default() -> Self {
        Self::new(IRREDUCIBLE_POLY)
    }
}

impl GaloisField for ShiftAddField {
    fn mul(&self, mut a: u8, mut b: u8) -> u8 {
        let mut res = 0u8;
        while b != 0 {
            if b & 1 != 0 {
                res ^= a;
            }
            let carry = a & 0x80;
            a <<= 1;
            if carry != 0 {
                a ^= self.poly as u8;
            }
            b >>= 1;
        }
        res
    }

    fn div(&self, a: u8, b: u8) -> u8 {
        if b == 0 {
            return 0;
        }
        // b^254 == b^-1 in a field of order 256
        self.mul(a, self.pow(b, 254))
    }
}
