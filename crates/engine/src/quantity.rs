use std::{fmt, str::FromStr};

use crate::{EngineError, ResultEngine};

/// A strictly positive amount of stock requested by an operation.
///
/// Stock is counted in the product's own unit (`pcs`, `g`, `ml`, ...), so the
/// value is fractional. Construction rejects zero, negative and non-finite
/// values; every engine operation that moves stock takes a `Quantity`, so a
/// bad amount is rejected before anything is read from the store.
///
/// # Examples
///
/// ```rust
/// use engine::Quantity;
///
/// let q = Quantity::new(2.5).unwrap();
/// assert_eq!(q.value(), 2.5);
/// assert!(Quantity::new(0.0).is_err());
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator):
///
/// ```rust
/// use engine::Quantity;
///
/// assert_eq!("10".parse::<Quantity>().unwrap().value(), 10.0);
/// assert_eq!("0,25".parse::<Quantity>().unwrap().value(), 0.25);
/// assert!("-1".parse::<Quantity>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Quantity(f64);

impl Quantity {
    /// Creates a quantity, rejecting values that are not finite and `> 0`.
    pub fn new(value: f64) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidArgument(
                "quantity must be a finite number".to_string(),
            ));
        }
        if value <= 0.0 {
            return Err(EngineError::InvalidArgument(
                "quantity must be greater than 0".to_string(),
            ));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for f64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl FromStr for Quantity {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidArgument("empty quantity".to_string()));
        }
        let value: f64 = trimmed
            .replace(',', ".")
            .parse()
            .map_err(|_| EngineError::InvalidArgument(format!("invalid quantity: {trimmed}")))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite() {
        assert!(Quantity::new(0.0).is_err());
        assert!(Quantity::new(-3.0).is_err());
        assert!(Quantity::new(f64::NAN).is_err());
        assert!(Quantity::new(f64::INFINITY).is_err());
        assert_eq!(Quantity::new(0.01).unwrap().value(), 0.01);
        assert!(Quantity::try_from(-0.5).is_err());
        assert_eq!(f64::from(Quantity::try_from(2.0).unwrap()), 2.0);
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("3".parse::<Quantity>().unwrap().value(), 3.0);
        assert_eq!("1.5".parse::<Quantity>().unwrap().value(), 1.5);
        assert_eq!(" 1,5 ".parse::<Quantity>().unwrap().value(), 1.5);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Quantity>().is_err());
        assert!("abc".parse::<Quantity>().is_err());
        assert!("0".parse::<Quantity>().is_err());
    }
}
