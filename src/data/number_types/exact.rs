//! # Exact values
//!
//! Arbitrary precision rationals, extended with a positive and a negative infinity. Bounds and
//! sides of an LP are frequently infinite, so the sentinels are part of the value type rather
//! than being wrapped in an `Option` everywhere.
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use thiserror::Error;

/// An exact value: either one of the two infinities, or a finite rational.
///
/// The variant order is such that the derived ordering is the natural one: negative infinity is
/// smaller than every finite value, which is smaller than infinity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Exact {
    /// Smaller than every finite value.
    NegativeInfinity,
    /// A rational number.
    Finite(BigRational),
    /// Larger than every finite value.
    Infinity,
}

/// Direction in which to round when converting to a floating point number.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RoundingMode {
    /// Largest float not larger than the exact value.
    Down,
    /// Smallest float not smaller than the exact value.
    Up,
    /// Closest float.
    Nearest,
}

/// A text could not be read as an exact value.
#[derive(Error, Debug, Eq, PartialEq)]
#[error("can't read \"{0}\" as an exact value")]
pub struct ParseExactError(String);

impl Exact {
    /// Create the value `numerator / denominator`.
    ///
    /// # Arguments
    ///
    /// * `denominator`: Should not be zero.
    #[must_use]
    pub fn from_fraction(numerator: i64, denominator: i64) -> Self {
        debug_assert_ne!(denominator, 0);

        Exact::Finite(BigRational::new(BigInt::from(numerator), BigInt::from(denominator)))
    }

    /// Create the exact value represented by a float.
    ///
    /// Infinite floats map to the infinity sentinels.
    ///
    /// # Return value
    ///
    /// `None` if the float is not a number.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value == f64::INFINITY {
            Some(Exact::Infinity)
        } else if value == f64::NEG_INFINITY {
            Some(Exact::NegativeInfinity)
        } else {
            BigRational::from_float(value).map(Exact::Finite)
        }
    }

    /// Whether this value is one of the two infinities.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        !self.is_finite()
    }

    /// Whether this value is a rational number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        matches!(self, Exact::Finite(_))
    }

    /// The rational, if this value is finite.
    #[must_use]
    pub fn finite(&self) -> Option<&BigRational> {
        match self {
            Exact::Finite(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this value is strictly larger than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        match self {
            Exact::NegativeInfinity => false,
            Exact::Finite(value) => value.is_positive(),
            Exact::Infinity => true,
        }
    }

    /// Whether this value is strictly smaller than zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Exact::NegativeInfinity => true,
            Exact::Finite(value) => value.is_negative(),
            Exact::Infinity => false,
        }
    }

    /// Comparison with zero.
    #[must_use]
    pub fn sign(&self) -> Ordering {
        if self.is_positive() {
            Ordering::Greater
        } else if self.is_negative() {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Whether this value is a finite integer.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.finite().is_some_and(BigRational::is_integer)
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        match self {
            Exact::NegativeInfinity | Exact::Infinity => Exact::Infinity,
            Exact::Finite(value) => Exact::Finite(value.abs()),
        }
    }

    /// Multiply two values and add the product to this value.
    pub fn add_product(&mut self, left: &Exact, right: &Exact) {
        let product = left * right;
        *self += &product;
    }

    /// Closest float in the requested direction.
    ///
    /// Values too large for a float round to the largest finite float when that is the correct
    /// direction, and to an infinity otherwise.
    #[must_use]
    pub fn to_f64(&self, mode: RoundingMode) -> f64 {
        let value = match self {
            Exact::NegativeInfinity => return f64::NEG_INFINITY,
            Exact::Infinity => return f64::INFINITY,
            Exact::Finite(value) => value,
        };

        let nearest = value.to_f64().unwrap_or(if value.is_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });

        match mode {
            RoundingMode::Nearest => nearest,
            RoundingMode::Down => match BigRational::from_float(nearest) {
                Some(represented) if &represented > value => next_down(nearest),
                Some(_) => nearest,
                None if nearest > 0_f64 => f64::MAX,
                None => nearest,
            },
            RoundingMode::Up => match BigRational::from_float(nearest) {
                Some(represented) if &represented < value => next_up(nearest),
                Some(_) => nearest,
                None if nearest < 0_f64 => f64::MIN,
                None => nearest,
            },
        }
    }
}

fn next_up(value: f64) -> f64 {
    if value.is_nan() || value == f64::INFINITY {
        value
    } else if value == 0_f64 {
        f64::from_bits(1)
    } else if value > 0_f64 {
        f64::from_bits(value.to_bits() + 1)
    } else {
        f64::from_bits(value.to_bits() - 1)
    }
}

fn next_down(value: f64) -> f64 {
    -next_up(-value)
}

fn sum(left: &Exact, right: &Exact) -> Exact {
    debug_assert!(
        !(left.is_infinite() && right.is_infinite() && left != right),
        "opposite infinities can't be added",
    );

    match (left, right) {
        (Exact::Finite(left), Exact::Finite(right)) => Exact::Finite(left + right),
        (Exact::Infinity, _) | (_, Exact::Infinity) => Exact::Infinity,
        (Exact::NegativeInfinity, _) | (_, Exact::NegativeInfinity) => Exact::NegativeInfinity,
    }
}

fn product(left: &Exact, right: &Exact) -> Exact {
    match (left, right) {
        (Exact::Finite(left), Exact::Finite(right)) => Exact::Finite(left * right),
        _ if left.is_zero() || right.is_zero() => Exact::zero(),
        _ if left.is_positive() == right.is_positive() => Exact::Infinity,
        _ => Exact::NegativeInfinity,
    }
}

impl Neg for &Exact {
    type Output = Exact;

    fn neg(self) -> Self::Output {
        match self {
            Exact::NegativeInfinity => Exact::Infinity,
            Exact::Finite(value) => Exact::Finite(-value),
            Exact::Infinity => Exact::NegativeInfinity,
        }
    }
}

impl Neg for Exact {
    type Output = Exact;

    fn neg(self) -> Self::Output {
        match self {
            Exact::NegativeInfinity => Exact::Infinity,
            Exact::Finite(value) => Exact::Finite(-value),
            Exact::Infinity => Exact::NegativeInfinity,
        }
    }
}

macro_rules! forward_binary_operation {
    ($trait:ident, $method:ident, $implementation:expr) => {
        impl $trait<&Exact> for &Exact {
            type Output = Exact;

            fn $method(self, other: &Exact) -> Self::Output {
                $implementation(self, other)
            }
        }

        impl $trait<Exact> for Exact {
            type Output = Exact;

            fn $method(self, other: Exact) -> Self::Output {
                $implementation(&self, &other)
            }
        }

        impl $trait<&Exact> for Exact {
            type Output = Exact;

            fn $method(self, other: &Exact) -> Self::Output {
                $implementation(&self, other)
            }
        }
    };
}

forward_binary_operation!(Add, add, sum);
forward_binary_operation!(Sub, sub, |left: &Exact, right: &Exact| sum(left, &-right));
forward_binary_operation!(Mul, mul, product);

impl AddAssign<&Exact> for Exact {
    fn add_assign(&mut self, other: &Exact) {
        match (&mut *self, other) {
            (Exact::Finite(value), Exact::Finite(other)) => *value += other,
            _ => *self = sum(self, other),
        }
    }
}

impl AddAssign<Exact> for Exact {
    fn add_assign(&mut self, other: Exact) {
        *self += &other;
    }
}

impl SubAssign<&Exact> for Exact {
    fn sub_assign(&mut self, other: &Exact) {
        match (&mut *self, other) {
            (Exact::Finite(value), Exact::Finite(other)) => *value -= other,
            _ => *self = sum(self, &-other),
        }
    }
}

impl Zero for Exact {
    fn zero() -> Self {
        Exact::Finite(BigRational::zero())
    }

    fn is_zero(&self) -> bool {
        self.finite().is_some_and(Zero::is_zero)
    }
}

impl Default for Exact {
    fn default() -> Self {
        Exact::zero()
    }
}

impl One for Exact {
    fn one() -> Self {
        Exact::Finite(BigRational::one())
    }
}

impl Sum for Exact {
    fn sum<I: Iterator<Item=Self>>(iter: I) -> Self {
        iter.fold(Exact::zero(), |mut total, value| {
            total += &value;
            total
        })
    }
}

impl<'a> Sum<&'a Exact> for Exact {
    fn sum<I: Iterator<Item=&'a Exact>>(iter: I) -> Self {
        iter.fold(Exact::zero(), |mut total, value| {
            total += value;
            total
        })
    }
}

impl From<i64> for Exact {
    fn from(value: i64) -> Self {
        Exact::Finite(BigRational::from_integer(BigInt::from(value)))
    }
}

impl From<BigInt> for Exact {
    fn from(value: BigInt) -> Self {
        Exact::Finite(BigRational::from_integer(value))
    }
}

impl From<BigRational> for Exact {
    fn from(value: BigRational) -> Self {
        Exact::Finite(value)
    }
}

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Exact::NegativeInfinity => f.write_str("-inf"),
            Exact::Finite(value) => write!(f, "{}", value),
            Exact::Infinity => f.write_str("inf"),
        }
    }
}

/// Reads integers, fractions (`-7/2`), decimals with an optional exponent (`1.25e-3`) and the
/// infinities (`inf`, `+inf`, `-inf`).
impl FromStr for Exact {
    type Err = ParseExactError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let error = || ParseExactError(trimmed.to_string());

        match trimmed.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" | "+infinity" => return Ok(Exact::Infinity),
            "-inf" | "-infinity" => return Ok(Exact::NegativeInfinity),
            _ => {},
        }

        if trimmed.contains('/') {
            return BigRational::from_str(trimmed).map(Exact::Finite).map_err(|_| error());
        }

        let (mantissa, exponent) = match trimmed.find(['e', 'E']) {
            Some(index) => {
                let exponent = trimmed[(index + 1)..].parse::<i32>().map_err(|_| error())?;
                (&trimmed[..index], exponent)
            },
            None => (trimmed, 0),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(error());
        }

        let numerator = BigInt::from_str(&format!("{}{}", integer, fraction)).map_err(|_| error())?;
        let scale = exponent - i32::try_from(fraction.len()).map_err(|_| error())?;
        let ten = BigInt::from(10);
        let value = if scale >= 0 {
            BigRational::from_integer(numerator * num_traits::pow(ten, scale.unsigned_abs() as usize))
        } else {
            BigRational::new(numerator, num_traits::pow(ten, scale.unsigned_abs() as usize))
        };

        Ok(Exact::Finite(value))
    }
}

/// Shorthand to create an `Exact` from an integer or from a fraction of two integers.
#[macro_export]
macro_rules! R {
    ($value:expr) => {
        $crate::data::number_types::exact::Exact::from(($value) as i64)
    };
    ($numerator:expr, $denominator:expr) => {
        $crate::data::number_types::exact::Exact::from_fraction(($numerator) as i64, ($denominator) as i64)
    };
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use num_rational::BigRational;
    use num_traits::Zero;

    use crate::data::number_types::exact::{Exact, RoundingMode};

    #[test]
    fn ordering() {
        assert!(Exact::NegativeInfinity < R!(-1_000_000));
        assert!(R!(-1, 2) < R!(0));
        assert!(R!(1, 3) < R!(1, 2));
        assert!(R!(1_000_000) < Exact::Infinity);
        assert_eq!(R!(2, 4), R!(1, 2));
    }

    #[test]
    fn arithmetic_with_infinities() {
        assert_eq!(&Exact::Infinity + &R!(-5), Exact::Infinity);
        assert_eq!(&R!(3) - &Exact::Infinity, Exact::NegativeInfinity);
        assert_eq!(&Exact::NegativeInfinity * &R!(-2), Exact::Infinity);
        assert_eq!(&Exact::Infinity * &R!(0), R!(0));
        assert_eq!(-Exact::Infinity, Exact::NegativeInfinity);

        let mut total = R!(1, 2);
        total.add_product(&R!(3), &R!(1, 6));
        assert_eq!(total, R!(1));
    }

    #[test]
    fn sum() {
        let values = [R!(1, 2), R!(1, 3), R!(1, 6)];
        assert_eq!(values.iter().sum::<Exact>(), R!(1));
        assert!(Vec::<Exact>::new().into_iter().sum::<Exact>().is_zero());
    }

    #[test]
    fn parse() {
        assert_eq!(Exact::from_str("3"), Ok(R!(3)));
        assert_eq!(Exact::from_str("-7/2"), Ok(R!(-7, 2)));
        assert_eq!(Exact::from_str("1.25"), Ok(R!(5, 4)));
        assert_eq!(Exact::from_str("-0.5"), Ok(R!(-1, 2)));
        assert_eq!(Exact::from_str("2.5e2"), Ok(R!(250)));
        assert_eq!(Exact::from_str("3e-1"), Ok(R!(3, 10)));
        assert_eq!(Exact::from_str(" inf "), Ok(Exact::Infinity));
        assert_eq!(Exact::from_str("-inf"), Ok(Exact::NegativeInfinity));
        assert!(Exact::from_str("1.2.3").is_err());
        assert!(Exact::from_str("abc").is_err());
        assert!(Exact::from_str("").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(R!(3).to_string(), "3");
        assert_eq!(R!(-7, 2).to_string(), "-7/2");
        assert_eq!(Exact::Infinity.to_string(), "inf");
        assert_eq!(Exact::NegativeInfinity.to_string(), "-inf");
    }

    #[test]
    fn directed_rounding() {
        let third = R!(1, 3);
        let down = third.to_f64(RoundingMode::Down);
        let up = third.to_f64(RoundingMode::Up);
        assert!(down < up);
        assert!(Exact::from_f64(down).unwrap() < third);
        assert!(Exact::from_f64(up).unwrap() > third);

        let half = R!(1, 2);
        assert_eq!(half.to_f64(RoundingMode::Down), 0.5);
        assert_eq!(half.to_f64(RoundingMode::Up), 0.5);
        assert_eq!(half.to_f64(RoundingMode::Nearest), 0.5);

        let negative = R!(-1, 3);
        assert!(Exact::from_f64(negative.to_f64(RoundingMode::Down)).unwrap() < negative);
        assert!(Exact::from_f64(negative.to_f64(RoundingMode::Up)).unwrap() > negative);

        assert_eq!(Exact::Infinity.to_f64(RoundingMode::Down), f64::INFINITY);
        assert_eq!(Exact::NegativeInfinity.to_f64(RoundingMode::Up), f64::NEG_INFINITY);
    }

    #[test]
    fn from_f64() {
        assert_eq!(Exact::from_f64(0.25), Some(R!(1, 4)));
        assert_eq!(Exact::from_f64(f64::INFINITY), Some(Exact::Infinity));
        assert_eq!(Exact::from_f64(f64::NAN), None);
    }

    #[test]
    fn integrality() {
        assert!(R!(4).is_integral());
        assert!(R!(8, 2).is_integral());
        assert!(!R!(1, 2).is_integral());
        assert!(!Exact::Infinity.is_integral());
        assert!(Exact::from(BigRational::zero()).is_integral());
    }
}
