//! Modular arithmetic operations

/// Modular arithmetic operations over Z_q
///
/// All inputs are assumed reduced into `[0, q)`; products are widened to
/// `u128` so no operation depends on native overflow behaviour.
pub struct ModQ;

impl ModQ {
    /// Add two values modulo q
    #[inline]
    pub fn add(a: u64, b: u64, q: u64) -> u64 {
        let sum = (a as u128) + (b as u128);
        (sum % (q as u128)) as u64
    }

    /// Subtract two values modulo q
    #[inline]
    pub fn sub(a: u64, b: u64, q: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            q - (b - a)
        }
    }

    /// Multiply two values modulo q
    #[inline]
    pub fn mul(a: u64, b: u64, q: u64) -> u64 {
        let prod = (a as u128) * (b as u128);
        (prod % (q as u128)) as u64
    }

    /// Negate a value modulo q
    #[inline]
    pub fn negate(a: u64, q: u64) -> u64 {
        if a == 0 {
            0
        } else {
            q - a
        }
    }

    /// Convert a signed integer to its representation in Z_q
    #[inline]
    pub fn from_signed(val: i64, q: u64) -> u64 {
        if val >= 0 {
            (val as u64) % q
        } else {
            let abs = val.unsigned_abs() % q;
            if abs == 0 {
                0
            } else {
                q - abs
            }
        }
    }

    /// Convert from Z_q to signed representation in [-q/2, q/2)
    #[inline]
    pub fn to_signed(val: u64, q: u64) -> i64 {
        if val <= q / 2 {
            val as i64
        } else {
            -((q - val) as i64)
        }
    }

    /// Square-and-multiply exponentiation
    pub fn pow(base: u64, mut exp: u64, q: u64) -> u64 {
        let mut result = 1 % q;
        let mut base = base % q;
        while exp > 0 {
            if exp & 1 == 1 {
                result = Self::mul(result, base, q);
            }
            base = Self::mul(base, base, q);
            exp >>= 1;
        }
        result
    }

    /// Multiplicative inverse for prime q via Fermat's little theorem.
    ///
    /// Returns `None` for zero.
    pub fn inv(a: u64, q: u64) -> Option<u64> {
        let a = a % q;
        if a == 0 {
            None
        } else {
            Some(Self::pow(a, q - 2, q))
        }
    }
}
