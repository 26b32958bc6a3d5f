use super::{CurveError, Direction, check_finite};

/// A continuous, linear price/quantity relationship
///
/// The curve reads `price = intercept + slope·quantity`. Callers pass the slope
/// already signed (negative for a well-formed demand curve, positive for supply);
/// the engine does not reinterpret it. Both coefficients must be finite, but a
/// zero slope is allowed: it describes a perfectly elastic curve, and only the
/// operations that divide by the slope reject it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinearCurveDto", into = "LinearCurveDto")
)]
pub struct LinearCurve {
    direction: Direction,
    intercept: f64,
    slope: f64,
}

impl LinearCurve {
    /// Creates a new linear curve, validating its coefficients
    pub fn new(direction: Direction, intercept: f64, slope: f64) -> Result<Self, CurveError> {
        Self::try_from(LinearCurveDto {
            direction,
            intercept,
            slope,
        })
    }

    /// Shorthand for a supply curve
    pub fn supply(intercept: f64, slope: f64) -> Result<Self, CurveError> {
        Self::new(Direction::Supply, intercept, slope)
    }

    /// Shorthand for a demand curve
    pub fn demand(intercept: f64, slope: f64) -> Result<Self, CurveError> {
        Self::new(Direction::Demand, intercept, slope)
    }

    /// The side of the market
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The price at zero quantity
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// The change in price per unit of quantity
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Evaluates the curve
    pub fn price_at(&self, quantity: f64) -> f64 {
        self.intercept + self.slope * quantity
    }

    /// Inverts the curve, returning `None` when the slope is zero.
    ///
    /// The result is not clamped and may be negative.
    pub fn quantity_at(&self, price: f64) -> Option<f64> {
        if self.slope == 0.0 {
            None
        } else {
            Some((price - self.intercept) / self.slope)
        }
    }

    /// Returns the curve moved up by `vertical` and right by `horizontal`
    pub fn shifted(&self, vertical: f64, horizontal: f64) -> Self {
        Self {
            direction: self.direction,
            intercept: self.intercept + vertical - self.slope * horizontal,
            slope: self.slope,
        }
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(inline))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct LinearCurveDto {
    /// The side of the market
    pub direction: Direction,
    /// The price at zero quantity
    pub intercept: f64,
    /// The (signed) change in price per unit of quantity
    pub slope: f64,
}

impl From<LinearCurve> for LinearCurveDto {
    fn from(value: LinearCurve) -> Self {
        Self {
            direction: value.direction,
            intercept: value.intercept,
            slope: value.slope,
        }
    }
}

impl TryFrom<LinearCurveDto> for LinearCurve {
    type Error = CurveError;

    fn try_from(value: LinearCurveDto) -> Result<Self, Self::Error> {
        Ok(Self {
            direction: value.direction,
            intercept: check_finite(value.intercept)?,
            slope: check_finite(value.slope)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_coefficients() {
        assert_eq!(
            LinearCurve::demand(f64::NAN, -1.0).unwrap_err(),
            CurveError::NaN
        );
        assert_eq!(
            LinearCurve::demand(10.0, f64::NAN).unwrap_err(),
            CurveError::NaN
        );
    }

    #[test]
    fn test_infinite_coefficients() {
        assert_eq!(
            LinearCurve::supply(f64::INFINITY, 1.0).unwrap_err(),
            CurveError::Infinity
        );
        assert_eq!(
            LinearCurve::supply(0.0, f64::NEG_INFINITY).unwrap_err(),
            CurveError::Infinity
        );
    }

    #[test]
    fn test_slope_sign_is_preserved() {
        // A demand curve with a positive slope is the caller's business
        let curve = LinearCurve::demand(1.0, 2.0).unwrap();
        assert_eq!(curve.slope(), 2.0);
    }

    #[test]
    fn test_inverse() {
        let curve = LinearCurve::demand(10.0, -2.0).unwrap();
        assert_eq!(curve.quantity_at(4.0), Some(3.0));
        assert_eq!(curve.quantity_at(12.0), Some(-1.0));

        let flat = LinearCurve::supply(3.0, 0.0).unwrap();
        assert_eq!(flat.quantity_at(3.0), None);
    }

    #[test]
    fn test_shifted() {
        let curve = LinearCurve::supply(1.0, 2.0).unwrap();

        // A vertical shift moves the intercept one for one
        let up = curve.shifted(3.0, 0.0);
        assert_eq!(up.price_at(1.0), curve.price_at(1.0) + 3.0);

        // A horizontal shift offers the same price two units later
        let right = curve.shifted(0.0, 2.0);
        assert_eq!(right.price_at(5.0), curve.price_at(3.0));
    }
}
