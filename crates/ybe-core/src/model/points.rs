use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Score awarded for a question.
///
/// Whole numbers stay integers so that `points: 2` is written back as `2`
/// rather than `2.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum Points {
    Integer(i64),
    Decimal(f64),
}

impl Default for Points {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl Points {
    /// Creates points from a float, normalizing integral values to integers.
    ///
    /// Returns `None` for NaN and infinite values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        let integral = value.fract() == 0.0 && value.abs() < i64::MAX as f64;
        if integral {
            Some(Self::Integer(value as i64))
        } else {
            Some(Self::Decimal(value))
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(value) => *value as f64,
            Self::Decimal(value) => *value,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }
}

impl From<i64> for Points {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => match a.checked_add(b) {
                Some(sum) => Self::Integer(sum),
                None => Self::Decimal(a as f64 + b as f64),
            },
            (a, b) => Self::from_f64(a.as_f64() + b.as_f64()).unwrap_or(Self::Decimal(f64::MAX)),
        }
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_floats_normalize() {
        assert_eq!(Points::from_f64(2.0), Some(Points::Integer(2)));
        assert_eq!(Points::from_f64(1.5), Some(Points::Decimal(1.5)));
        assert_eq!(Points::from_f64(f64::NAN), None);
        assert_eq!(Points::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn test_sum() {
        let total: Points = [Points::Integer(1), Points::Integer(2)].into_iter().sum();
        assert_eq!(total, Points::Integer(3));

        let total: Points = [Points::Integer(1), Points::Decimal(0.5)].into_iter().sum();
        assert_eq!(total, Points::Decimal(1.5));

        let total: Points = [Points::Decimal(0.5), Points::Decimal(0.5)].into_iter().sum();
        assert_eq!(total, Points::Integer(1));
    }
}
