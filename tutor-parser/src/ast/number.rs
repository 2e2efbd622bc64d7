use rug::{Integer, Rational};
use std::{cmp::Ordering, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An exact decimal number, stored as an integer of digits and a decimal scale.
///
/// The value of the number is `digits × 10^-scale`. Number literals are never negative when
/// parsed; a leading minus sign is a unary operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Number {
    /// The digits of the number, with the decimal point removed.
    pub digits: Integer,

    /// The number of digits after the decimal point.
    pub scale: u32,
}

/// Returns `10^scale`.
fn pow10(scale: u32) -> Integer {
    Integer::from(Integer::u_pow_u(10, scale))
}

impl Number {
    /// Creates an integer number.
    pub fn integer(value: impl Into<Integer>) -> Self {
        Self { digits: value.into(), scale: 0 }
    }

    /// Returns true if the number was written with a decimal point.
    pub fn is_decimal(&self) -> bool {
        self.scale > 0
    }

    /// Returns the value of the number if it was written without a decimal point.
    pub fn as_integer(&self) -> Option<&Integer> {
        (self.scale == 0).then_some(&self.digits)
    }

    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        self.digits.cmp0() == Ordering::Equal
    }

    /// Returns true if the number is the integer `1`.
    pub fn is_one(&self) -> bool {
        self.scale == 0 && self.digits == 1
    }

    /// Returns true if the number is less than zero.
    pub fn is_negative(&self) -> bool {
        self.digits.cmp0() == Ordering::Less
    }

    /// Returns the absolute value of the number.
    pub fn abs(&self) -> Self {
        Self { digits: Integer::from(self.digits.abs_ref()), scale: self.scale }
    }

    /// Returns the exact value of the number as a rational.
    pub fn to_rational(&self) -> Rational {
        Rational::from((self.digits.clone(), pow10(self.scale)))
    }

    /// Rescales both numbers to the larger of their two scales.
    fn aligned(&self, other: &Self) -> (Integer, Integer, u32) {
        let scale = self.scale.max(other.scale);
        let lhs = Integer::from(&self.digits * pow10(scale - self.scale));
        let rhs = Integer::from(&other.digits * pow10(scale - other.scale));
        (lhs, rhs, scale)
    }

    /// Removes trailing zeros after the decimal point.
    fn trimmed(mut self) -> Self {
        while self.scale > 0 && self.digits.is_divisible_u(10) {
            self.digits /= 10;
            self.scale -= 1;
        }
        self
    }

    /// Adds two numbers exactly.
    pub fn add(&self, other: &Self) -> Self {
        let (lhs, rhs, scale) = self.aligned(other);
        Self { digits: lhs + rhs, scale }.trimmed()
    }

    /// Subtracts two numbers exactly.
    pub fn sub(&self, other: &Self) -> Self {
        let (lhs, rhs, scale) = self.aligned(other);
        Self { digits: lhs - rhs, scale }.trimmed()
    }

    /// Multiplies two numbers exactly.
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            digits: Integer::from(&self.digits * &other.digits),
            scale: self.scale + other.scale,
        }.trimmed()
    }

    /// Negates the number.
    pub fn neg(&self) -> Self {
        Self { digits: Integer::from(-&self.digits), scale: self.scale }
    }
}

/// The error returned when a string is not a valid number literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNumberError;

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
            || s.contains('.') && fraction.is_empty()
        {
            return Err(ParseNumberError);
        }

        let digits = format!("{}{}", whole, fraction)
            .parse::<Integer>()
            .map_err(|_| ParseNumberError)?;
        Ok(Self { digits, scale: fraction.len() as u32 })
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.digits);
        }

        if self.is_negative() {
            write!(f, "-")?;
        }

        let scale = self.scale as usize;
        let mut digits = Integer::from(self.digits.abs_ref()).to_string();
        if digits.len() <= scale {
            digits.insert_str(0, &"0".repeat(scale + 1 - digits.len()));
        }

        let (whole, fraction) = digits.split_at(digits.len() - scale);
        write!(f, "{}.{}", whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn num(s: &str) -> Number {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_print() {
        assert_eq!(num("12"), Number::integer(12));
        assert_eq!(num("1.50"), Number { digits: Integer::from(150), scale: 2 });
        assert_eq!(num("0.05").to_string(), "0.05");
        assert_eq!(num("1.50").to_string(), "1.50");
        assert_eq!(num("007").to_string(), "7");
        assert!("1.".parse::<Number>().is_err());
        assert!(".5".parse::<Number>().is_err());
    }

    #[test]
    fn exact_arithmetic() {
        assert_eq!(num("0.1").add(&num("0.2")), num("0.3"));
        assert_eq!(num("1.5").add(&num("1.5")), num("3"));
        assert_eq!(num("2").sub(&num("2.25")).to_string(), "-0.25");
        assert_eq!(num("0.5").mul(&num("0.5")), num("0.25"));
        assert_eq!(num("123456789012345678901234567890").mul(&num("10")).to_string(), "1234567890123456789012345678900");
    }

    #[test]
    fn rational_value() {
        assert_eq!(num("1.25").to_rational(), Rational::from((5, 4)));
        assert!(num("0.00").is_zero());
        assert!(num("1").is_one());
        assert!(!num("1.0").is_one());
    }
}
