use super::{CurveError, Direction, check_finite};

/// A discrete schedule of reservation prices
///
/// `rates[i]` is the reservation price of unit `i`: the most a buyer would pay
/// for it (demand) or the least a seller would accept for it (supply). Unit `i`
/// occupies the quantity interval `[i, i + 1)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "StepCurveDto", into = "StepCurveDto")
)]
pub struct StepCurve {
    direction: Direction,
    rates: Vec<f64>,
}

impl StepCurve {
    /// Creates a new step curve, validating its rates
    pub fn new(direction: Direction, rates: Vec<f64>) -> Result<Self, CurveError> {
        Self::try_from(StepCurveDto { direction, rates })
    }

    /// The side of the market
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The reservation prices, one per unit
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// The number of units in the schedule
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the schedule is empty (never true for a validated curve)
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// The reservation price of unit `index`, if it exists
    pub fn rate(&self, index: usize) -> Option<f64> {
        self.rates.get(index).copied()
    }

    /// The reservation price of the unit containing `quantity`
    pub fn price_at(&self, quantity: f64) -> Option<f64> {
        if quantity.is_finite() && quantity >= 0.0 {
            self.rate(quantity.floor() as usize)
        } else {
            None
        }
    }

    /// The number of units whose reservation price accepts `price`.
    ///
    /// Buyers take a unit when its rate is at least the price, sellers part with a
    /// unit when its rate is at most the price.
    pub fn quantity_at(&self, price: f64) -> f64 {
        let accepted = match self.direction {
            Direction::Demand => self.rates.iter().filter(|&&rate| rate >= price).count(),
            Direction::Supply => self.rates.iter().filter(|&&rate| rate <= price).count(),
        };
        accepted as f64
    }

    /// Returns the schedule with every rate moved up by `vertical`
    pub fn shifted(&self, vertical: f64) -> Self {
        Self {
            direction: self.direction,
            rates: self.rates.iter().map(|rate| rate + vertical).collect(),
        }
    }
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(inline))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct StepCurveDto {
    /// The side of the market
    pub direction: Direction,
    /// The reservation price of each unit
    pub rates: Vec<f64>,
}

impl From<StepCurve> for StepCurveDto {
    fn from(value: StepCurve) -> Self {
        Self {
            direction: value.direction,
            rates: value.rates,
        }
    }
}

impl TryFrom<StepCurveDto> for StepCurve {
    type Error = CurveError;

    fn try_from(value: StepCurveDto) -> Result<Self, Self::Error> {
        if value.rates.is_empty() {
            return Err(CurveError::Empty);
        }
        for &rate in value.rates.iter() {
            check_finite(rate)?;
        }
        Ok(Self {
            direction: value.direction,
            rates: value.rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(
            StepCurve::new(Direction::Supply, vec![]).unwrap_err(),
            CurveError::Empty
        );
    }

    #[test]
    fn test_nan_rate() {
        assert_eq!(
            StepCurve::new(Direction::Supply, vec![1.0, f64::NAN]).unwrap_err(),
            CurveError::NaN
        );
    }

    #[test]
    fn test_quantity_by_direction() {
        let rates = vec![1.0, 2.0, 3.0, 4.0];
        let supply = StepCurve::new(Direction::Supply, rates.clone()).unwrap();
        let demand = StepCurve::new(Direction::Demand, rates).unwrap();

        assert_eq!(supply.quantity_at(2.5), 2.0);
        assert_eq!(demand.quantity_at(2.5), 2.0);
        assert_eq!(supply.quantity_at(4.0), 4.0);
        assert_eq!(demand.quantity_at(4.0), 1.0);
    }

    #[test]
    fn test_price_at_unit_boundaries() {
        let curve = StepCurve::new(Direction::Demand, vec![9.0, 8.0]).unwrap();
        assert_eq!(curve.price_at(0.999), Some(9.0));
        assert_eq!(curve.price_at(1.0), Some(8.0));
        assert_eq!(curve.price_at(2.0), None);
        assert_eq!(curve.price_at(f64::INFINITY), None);
    }
}
