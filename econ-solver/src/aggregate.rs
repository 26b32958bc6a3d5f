use crate::AggregateError;
use crate::models::{Curve, LinearCurve, StepCurve};
use tracing::{Level, event};

/// Sums linear curves horizontally, i.e. adds the quantities each curve trades at every price.
///
/// Writing each curve as `p = aᵢ + bᵢ·q`, the quantity it trades is `(p − aᵢ)/bᵢ`.
/// Adding those up gives `Q = β·p − α` with `α = Σ aᵢ/bᵢ` and `β = Σ 1/bᵢ`, so the
/// aggregate is `p = α/β + Q/β`.
///
/// A horizontal curve (`bᵢ == 0`) has no quantity function and is rejected, as is a
/// mixture of supply and demand curves.
pub fn sum_horizontal(curves: &[LinearCurve]) -> Result<LinearCurve, AggregateError> {
    let direction = curves.first().ok_or(AggregateError::Empty)?.direction();

    let mut alpha = 0.0;
    let mut beta = 0.0;
    for (index, curve) in curves.iter().enumerate() {
        if curve.direction() != direction {
            return Err(AggregateError::DirectionMismatch {
                expected: direction,
                found: curve.direction(),
            });
        }
        if curve.slope() == 0.0 {
            return Err(AggregateError::DegenerateCurve { index });
        }
        alpha += curve.intercept() / curve.slope();
        beta += 1.0 / curve.slope();
    }

    if beta == 0.0 {
        return Err(AggregateError::CancellingSlopes);
    }

    let aggregate = LinearCurve::new(direction, alpha / beta, 1.0 / beta)?;
    event!(
        Level::DEBUG,
        count = curves.len(),
        intercept = aggregate.intercept(),
        slope = aggregate.slope(),
        "summed linear curves"
    );
    Ok(aggregate)
}

/// Sums discrete schedules unit by unit.
///
/// With `length == None` every schedule must have the same number of units.
/// With `Some(len)`, schedules are aligned on their last unit: shorter ones are
/// left-padded with zeros and longer ones lose their leading units.
pub fn sum_discrete(
    curves: &[StepCurve],
    length: Option<usize>,
) -> Result<StepCurve, AggregateError> {
    let first = curves.first().ok_or(AggregateError::Empty)?;
    let direction = first.direction();
    let len = length.unwrap_or(first.len());
    if len == 0 {
        return Err(AggregateError::Empty);
    }

    let mut rates = vec![0.0; len];
    for curve in curves.iter() {
        if curve.direction() != direction {
            return Err(AggregateError::DirectionMismatch {
                expected: direction,
                found: curve.direction(),
            });
        }
        if length.is_none() && curve.len() != len {
            return Err(AggregateError::ShapeMismatch {
                expected: len,
                found: curve.len(),
            });
        }

        let offset = len.saturating_sub(curve.len());
        let skip = curve.len().saturating_sub(len);
        for (slot, rate) in rates[offset..].iter_mut().zip(&curve.rates()[skip..]) {
            *slot += rate;
        }
    }

    event!(Level::DEBUG, count = curves.len(), units = len, "summed discrete schedules");
    Ok(StepCurve::new(direction, rates)?)
}

/// Aggregates the curves of many participants on one side of a market.
///
/// All curves must have the same shape; discrete schedules must also have the
/// same length.
pub fn aggregate(curves: &[Curve]) -> Result<Curve, AggregateError> {
    match curves.first().ok_or(AggregateError::Empty)? {
        Curve::Continuous(_) => {
            let linear = curves
                .iter()
                .map(|curve| match curve {
                    Curve::Continuous(linear) => Ok(linear.clone()),
                    Curve::Discrete(_) => Err(AggregateError::MixedKinds),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sum_horizontal(&linear)?.into())
        }
        Curve::Discrete(_) => {
            let steps = curves
                .iter()
                .map(|curve| match curve {
                    Curve::Discrete(step) => Ok(step.clone()),
                    Curve::Continuous(_) => Err(AggregateError::MixedKinds),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sum_discrete(&steps, None)?.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;

    fn demand(a: f64, b: f64) -> LinearCurve {
        LinearCurve::demand(a, b).unwrap()
    }

    #[test]
    fn two_identical_consumers() {
        // Two consumers with p = 10 - q trade twice as much at every price
        let total = sum_horizontal(&[demand(10.0, -1.0), demand(10.0, -1.0)]).unwrap();
        assert_eq!(total.intercept(), 10.0);
        assert_eq!(total.slope(), -0.5);
    }

    #[test]
    fn single_curve_is_unchanged() {
        let total = sum_horizontal(&[demand(8.0, -2.0)]).unwrap();
        assert_eq!(total, demand(8.0, -2.0));
    }

    #[test]
    fn empty_input() {
        assert_eq!(sum_horizontal(&[]).unwrap_err(), AggregateError::Empty);
        assert_eq!(aggregate(&[]).unwrap_err(), AggregateError::Empty);
    }

    #[test]
    fn zero_slope_is_degenerate() {
        assert_eq!(
            sum_horizontal(&[demand(10.0, -1.0), demand(4.0, 0.0)]).unwrap_err(),
            AggregateError::DegenerateCurve { index: 1 }
        );
    }

    #[test]
    fn cancelling_slopes() {
        assert_eq!(
            sum_horizontal(&[demand(10.0, -1.0), demand(4.0, 1.0)]).unwrap_err(),
            AggregateError::CancellingSlopes
        );
    }

    #[test]
    fn mixed_directions() {
        let supply = LinearCurve::supply(0.0, 1.0).unwrap();
        assert_eq!(
            sum_horizontal(&[demand(10.0, -1.0), supply]).unwrap_err(),
            AggregateError::DirectionMismatch {
                expected: Direction::Demand,
                found: Direction::Supply
            }
        );
    }

    fn step(rates: &[f64]) -> StepCurve {
        StepCurve::new(Direction::Supply, rates.to_vec()).unwrap()
    }

    #[test]
    fn discrete_elementwise() {
        let total = sum_discrete(&[step(&[1.0, 2.0, 3.0]), step(&[2.0, 2.0, 2.0])], None).unwrap();
        assert_eq!(total.rates(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn discrete_shape_mismatch() {
        assert_eq!(
            sum_discrete(&[step(&[1.0, 2.0, 3.0]), step(&[2.0])], None).unwrap_err(),
            AggregateError::ShapeMismatch {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn discrete_pad_and_truncate() {
        let total = sum_discrete(&[step(&[1.0, 2.0, 3.0, 4.0]), step(&[5.0])], Some(3)).unwrap();
        // The long schedule keeps its last three units, the short one is padded on the left
        assert_eq!(total.rates(), &[2.0, 3.0, 9.0]);
    }

    #[test]
    fn mixed_kinds() {
        let curves: Vec<Curve> = vec![demand(10.0, -1.0).into(), step(&[1.0]).into()];
        assert_eq!(aggregate(&curves).unwrap_err(), AggregateError::MixedKinds);
    }
}
