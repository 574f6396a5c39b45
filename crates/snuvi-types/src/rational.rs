//! Exact rational numbers
//!
//! `Rational` is the default numeric type of the scripting language. Values are
//! always kept in lowest terms with a positive denominator, every operation
//! builds a new value, and overflow is reported as an [`ArithmeticError`]
//! instead of wrapping.

use crate::error::ArithmeticError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Scale used when converting non-integral floats
pub const FLOAT_SCALE: i64 = 10_000_000_000;

/// Newton steps attempted before a root falls back to floating point
pub const MAX_ROOT_STEPS: usize = 8;

/// Both terms of the precomputed constants stay below this bound so that a
/// product of two constants still fits into 64 bits.
const CONSTANT_LIMIT: i64 = 1 << 31;

/// Continued fraction of π (OEIS A001203)
const PI_TERMS: &[i64] = &[
    3, 7, 15, 1, 292, 1, 1, 1, 2, 1, 3, 1, 14, 2, 1, 1, 2, 2, 2, 2, 1, 84, 2, 1, 1, 15, 3, 13,
    1, 4, 2, 6, 6, 99, 1, 2, 2, 6, 3, 5, 1, 1, 6, 8, 1, 7, 1, 2, 3, 7,
];

/// π as the best convergent within [`CONSTANT_LIMIT`]
pub static PI: Lazy<Rational> = Lazy::new(|| from_continued_fraction(PI_TERMS.iter().copied()));

/// e as the best convergent within [`CONSTANT_LIMIT`]
pub static E: Lazy<Rational> = Lazy::new(|| from_continued_fraction(e_terms().take(64)));

/// e = [2; 1, 2, 1, 1, 4, 1, 1, 6, ...]
fn e_terms() -> impl Iterator<Item = i64> {
    std::iter::once(2).chain((1..).map(|i: i64| if i % 3 == 2 { 2 * (i + 1) / 3 } else { 1 }))
}

/// Evaluate convergents until a term would leave the constant bound.
fn from_continued_fraction(terms: impl Iterator<Item = i64>) -> Rational {
    let (mut h1, mut h2) = (1i64, 0i64);
    let (mut k1, mut k2) = (0i64, 1i64);

    for a in terms {
        let h = a.checked_mul(h1).and_then(|v| v.checked_add(h2));
        let k = a.checked_mul(k1).and_then(|v| v.checked_add(k2));
        match (h, k) {
            (Some(h), Some(k)) if h < CONSTANT_LIMIT && k < CONSTANT_LIMIT => {
                (h2, h1) = (h1, h);
                (k2, k1) = (k1, k);
            }
            _ => break,
        }
    }

    // Convergents are always in lowest terms.
    Rational { num: h1, den: k1 }
}

/// Exact fraction `num / den` in lowest terms, `den > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i64, i64)", into = "(i64, i64)")]
pub struct Rational {
    num: i64,
    den: i64,
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn overflow(op: &'static str) -> ArithmeticError {
    ArithmeticError::Overflow(op)
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Build a reduced fraction; a zero denominator is an error.
    pub fn new(num: i64, den: i64) -> Result<Self, ArithmeticError> {
        if den == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        if num == 0 {
            return Ok(Self::ZERO);
        }

        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        let (mut n, mut d) = (num as i128 / g, den as i128 / g);
        if d < 0 {
            n = -n;
            d = -d;
        }

        Ok(Rational {
            num: i64::try_from(n).map_err(|_| overflow("normalization"))?,
            den: i64::try_from(d).map_err(|_| overflow("normalization"))?,
        })
    }

    pub const fn from_integer(n: i64) -> Self {
        Rational { num: n, den: 1 }
    }

    /// Integral floats convert exactly; anything else is scaled by 10^10 and rounded.
    pub fn from_f64(value: f64) -> Result<Self, ArithmeticError> {
        if !value.is_finite() {
            return Err(ArithmeticError::NotFinite(value));
        }
        // 2^63 as f64; anything at or above cannot be an i64
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;

        if value.fract() == 0.0 {
            if value.abs() >= LIMIT {
                return Err(overflow("float conversion"));
            }
            return Ok(Self::from_integer(value as i64));
        }

        let scaled = (value * FLOAT_SCALE as f64).round();
        if scaled.abs() >= LIMIT {
            return Err(overflow("float conversion"));
        }
        Self::new(scaled as i64, FLOAT_SCALE)
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    /// The integer value, if the denominator is 1
    pub fn to_integer(&self) -> Option<i64> {
        self.is_integer().then_some(self.num)
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    pub fn signum(&self) -> i64 {
        self.num.signum()
    }

    // ===== Field operations =====

    /// Sum over the least common multiple of the denominators
    pub fn checked_add(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        let g = gcd(self.den as u64, other.den as u64) as i64;
        let lcm = (self.den / g)
            .checked_mul(other.den)
            .ok_or_else(|| overflow("addition"))?;
        let left = self
            .num
            .checked_mul(lcm / self.den)
            .ok_or_else(|| overflow("addition"))?;
        let right = other
            .num
            .checked_mul(lcm / other.den)
            .ok_or_else(|| overflow("addition"))?;
        let sum = left.checked_add(right).ok_or_else(|| overflow("addition"))?;
        Rational::new(sum, lcm)
    }

    pub fn checked_sub(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        self.checked_add(&other.checked_neg()?)
    }

    /// Product; common factors are cancelled before multiplying.
    pub fn checked_mul(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        if self.is_zero() || other.is_zero() {
            return Ok(Self::ZERO);
        }
        let g1 = gcd(self.num.unsigned_abs(), other.den as u64) as i64;
        let g2 = gcd(other.num.unsigned_abs(), self.den as u64) as i64;
        let num = (self.num / g1)
            .checked_mul(other.num / g2)
            .ok_or_else(|| overflow("multiplication"))?;
        let den = (self.den / g2)
            .checked_mul(other.den / g1)
            .ok_or_else(|| overflow("multiplication"))?;
        Rational::new(num, den)
    }

    pub fn checked_div(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        self.checked_mul(&other.recip()?)
    }

    /// Remainder of truncated division; the sign follows the dividend.
    pub fn checked_rem(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        let quotient = self.checked_div(other)?.trunc();
        self.checked_sub(&other.checked_mul(&quotient)?)
    }

    pub fn checked_neg(&self) -> Result<Rational, ArithmeticError> {
        Ok(Rational {
            num: self.num.checked_neg().ok_or_else(|| overflow("negation"))?,
            den: self.den,
        })
    }

    pub fn abs(&self) -> Result<Rational, ArithmeticError> {
        if self.num < 0 {
            self.checked_neg()
        } else {
            Ok(*self)
        }
    }

    pub fn recip(&self) -> Result<Rational, ArithmeticError> {
        Rational::new(self.den, self.num)
    }

    // ===== Rounding =====

    pub fn trunc(&self) -> Rational {
        Self::from_integer(self.num / self.den)
    }

    pub fn floor(&self) -> Rational {
        Self::from_integer(self.num.div_euclid(self.den))
    }

    pub fn ceil(&self) -> Rational {
        let floor = self.num.div_euclid(self.den);
        if self.is_integer() {
            *self
        } else {
            Self::from_integer(floor + 1)
        }
    }

    /// Round half away from zero
    pub fn round(&self) -> Rational {
        let (n, d) = (self.num as i128, self.den as i128);
        let rounded = if n >= 0 {
            (2 * n + d) / (2 * d)
        } else {
            -((-2 * n + d) / (2 * d))
        };
        Self::from_integer(rounded as i64)
    }

    // ===== Powers and roots =====

    /// Binary exponentiation; negative exponents invert the base.
    pub fn pow_int(&self, exponent: i64) -> Result<Rational, ArithmeticError> {
        let mut result = Self::ONE;
        let mut base = *self;
        let mut e = exponent.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                result = result.checked_mul(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.checked_mul(&base)?;
            }
        }
        if exponent < 0 {
            result.recip()
        } else {
            Ok(result)
        }
    }

    /// `self ^ exponent`; exact when possible, floating point otherwise.
    pub fn pow(&self, exponent: &Rational) -> Result<Rational, ArithmeticError> {
        if exponent.is_integer() {
            return self.pow_int(exponent.num);
        }
        match self.exact_root(exponent.den) {
            Ok(Some(root)) => root.pow_int(exponent.num),
            Ok(None) | Err(ArithmeticError::Overflow(_)) => {
                Rational::from_f64(self.to_f64().powf(exponent.to_f64()))
            }
            Err(e) => Err(e),
        }
    }

    pub fn sqrt(&self) -> Result<Rational, ArithmeticError> {
        self.root(2)
    }

    /// `degree`-th root. Newton iteration seeded from the integer roots of
    /// numerator and denominator; falls back to floating point when no exact
    /// rational root is reached within [`MAX_ROOT_STEPS`].
    pub fn root(&self, degree: i64) -> Result<Rational, ArithmeticError> {
        match self.exact_root(degree)? {
            Some(root) => Ok(root),
            None => {
                let value = self.to_f64().abs().powf(1.0 / degree as f64);
                let root = Rational::from_f64(value)?;
                if self.is_negative() {
                    root.checked_neg()
                } else {
                    Ok(root)
                }
            }
        }
    }

    fn exact_root(&self, degree: i64) -> Result<Option<Rational>, ArithmeticError> {
        if degree <= 0 {
            return Err(ArithmeticError::InvalidRootDegree(degree));
        }
        if degree == 1 || self.is_zero() {
            return Ok(Some(*self));
        }
        if self.is_negative() {
            if degree % 2 == 0 {
                return Err(ArithmeticError::NegativeRoot);
            }
            let magnitude = match self.checked_neg() {
                Ok(m) => m,
                Err(ArithmeticError::Overflow(_)) => return Ok(None),
                Err(e) => return Err(e),
            };
            return match magnitude.exact_root(degree)? {
                Some(root) => root.checked_neg().map(Some),
                None => Ok(None),
            };
        }
        let k = u32::try_from(degree).map_err(|_| ArithmeticError::InvalidRootDegree(degree))?;

        let seed = Rational::new(
            integer_root(self.num as u64, k) as i64,
            integer_root(self.den as u64, k).max(1) as i64,
        )?;
        if seed.is_zero() {
            return Ok(None);
        }

        let k_minus_one = Rational::from_integer(degree - 1);
        let k_rational = Rational::from_integer(degree);
        let mut x = seed;
        for _ in 0..=MAX_ROOT_STEPS {
            let power = match x.pow_int(degree) {
                Ok(p) => p,
                Err(ArithmeticError::Overflow(_)) => return Ok(None),
                Err(e) => return Err(e),
            };
            if power == *self {
                return Ok(Some(x));
            }
            // x' = ((k - 1) x + a / x^(k-1)) / k
            let step = x
                .pow_int(degree - 1)
                .and_then(|p| self.checked_div(&p))
                .and_then(|q| k_minus_one.checked_mul(&x)?.checked_add(&q))
                .and_then(|s| s.checked_div(&k_rational));
            match step {
                Ok(next) if next == x => return Ok(None),
                Ok(next) => x = next,
                Err(ArithmeticError::Overflow(_)) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    // ===== Bit operations (integers only) =====

    fn integer(&self, op: &'static str) -> Result<i64, ArithmeticError> {
        self.to_integer().ok_or(ArithmeticError::NotAnInteger(op))
    }

    fn bit_index(&self, op: &'static str) -> Result<u32, ArithmeticError> {
        let index = self.integer(op)?;
        if !(0..64).contains(&index) {
            return Err(ArithmeticError::InvalidShift(index));
        }
        Ok(index as u32)
    }

    pub fn bit_and(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        Ok(Self::from_integer(self.integer("&")? & other.integer("&")?))
    }

    pub fn bit_or(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        Ok(Self::from_integer(self.integer("|")? | other.integer("|")?))
    }

    pub fn bit_xor(&self, other: &Rational) -> Result<Rational, ArithmeticError> {
        Ok(Self::from_integer(self.integer("^")? ^ other.integer("^")?))
    }

    pub fn bit_not(&self) -> Result<Rational, ArithmeticError> {
        Ok(Self::from_integer(!self.integer("~")?))
    }

    pub fn shl(&self, amount: &Rational) -> Result<Rational, ArithmeticError> {
        let value = self.integer("<<")?;
        let shift = amount.bit_index("<<")?;
        let shifted = (value as i128) << shift;
        i64::try_from(shifted)
            .map(Self::from_integer)
            .map_err(|_| overflow("shift"))
    }

    /// Arithmetic right shift
    pub fn shr(&self, amount: &Rational) -> Result<Rational, ArithmeticError> {
        let value = self.integer(">>")?;
        let shift = amount.bit_index(">>")?;
        Ok(Self::from_integer(value >> shift))
    }

    pub fn bit_test(&self, index: &Rational) -> Result<bool, ArithmeticError> {
        let value = self.integer("bit test")?;
        Ok(value & (1 << index.bit_index("bit test")?) != 0)
    }

    pub fn bit_set(&self, index: &Rational) -> Result<Rational, ArithmeticError> {
        let value = self.integer("bit set")?;
        Ok(Self::from_integer(value | (1 << index.bit_index("bit set")?)))
    }

    pub fn bit_clear(&self, index: &Rational) -> Result<Rational, ArithmeticError> {
        let value = self.integer("bit clear")?;
        Ok(Self::from_integer(value & !(1 << index.bit_index("bit clear")?)))
    }
}

/// Largest `r` with `r^k <= n`, by integer Newton iteration
fn integer_root(n: u64, k: u32) -> u64 {
    if n < 2 || k == 1 {
        return n;
    }
    let n = n as u128;
    let k128 = k as u128;
    let bits = 128 - n.leading_zeros();
    // 2^ceil(bits / k) is always >= the root
    let mut x: u128 = 1 << bits.div_ceil(k);
    loop {
        let Some(power) = x.checked_pow(k - 1) else {
            x /= 2;
            continue;
        };
        let y = ((k128 - 1) * x + n / power) / k128;
        if y >= x {
            return x as u64;
        }
        x = y;
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::from_integer(n)
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Rational::from_integer(n as i64)
    }
}

impl TryFrom<(i64, i64)> for Rational {
    type Error = ArithmeticError;

    fn try_from((num, den): (i64, i64)) -> Result<Self, Self::Error> {
        Rational::new(num, den)
    }
}

impl From<Rational> for (i64, i64) {
    fn from(r: Rational) -> Self {
        (r.num, r.den)
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = self.num as i128 * other.den as i128;
        let right = other.num as i128 * self.den as i128;
        left.cmp(&right)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
