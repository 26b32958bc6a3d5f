use crate::EquilibriumError;
use crate::models::{Curve, Direction, LinearCurve, Settings, StepCurve};
use std::cmp::Ordering;

/// The quantity/price pair at which supply meets demand
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equilibrium {
    /// The quantity traded
    pub quantity: f64,
    /// The market-clearing price
    pub price: f64,
}

/// Finds where `supply` crosses `demand`, using the default tolerance.
pub fn equilibrium(demand: &Curve, supply: &Curve) -> Result<Equilibrium, EquilibriumError> {
    equilibrium_within(demand, supply, Settings::default().tolerance)
}

/// Finds where `supply` crosses `demand`.
///
/// * Two linear curves are solved exactly; slopes closer than `tolerance` are parallel.
/// * Two discrete schedules are scanned unit by unit for the first unit at which
///   the sign of excess supply flips relative to unit 0. A tie (equal rates) does
///   not count as a flip. The price is the midpoint of the two rates at that unit.
/// * Mixing the shapes is not supported.
///
/// The curves must be passed on their own side; the solver refuses to guess.
pub fn equilibrium_within(
    demand: &Curve,
    supply: &Curve,
    tolerance: f64,
) -> Result<Equilibrium, EquilibriumError> {
    check_side(demand, Direction::Demand)?;
    check_side(supply, Direction::Supply)?;

    match (demand, supply) {
        (Curve::Continuous(demand), Curve::Continuous(supply)) => {
            linear(demand, supply, tolerance)
        }
        (Curve::Discrete(demand), Curve::Discrete(supply)) => discrete(demand, supply),
        (demand, supply) => Err(EquilibriumError::UnsupportedCombination {
            demand: demand.kind(),
            supply: supply.kind(),
        }),
    }
}

fn check_side(curve: &Curve, expected: Direction) -> Result<(), EquilibriumError> {
    let found = curve.direction();
    if found == expected {
        Ok(())
    } else {
        Err(EquilibriumError::WrongSide { expected, found })
    }
}

fn linear(
    demand: &LinearCurve,
    supply: &LinearCurve,
    tolerance: f64,
) -> Result<Equilibrium, EquilibriumError> {
    let denominator = demand.slope() - supply.slope();
    if denominator.abs() < tolerance {
        return Err(EquilibriumError::Parallel);
    }

    let quantity = (supply.intercept() - demand.intercept()) / denominator;
    Ok(Equilibrium {
        quantity,
        price: supply.price_at(quantity),
    })
}

fn discrete(demand: &StepCurve, supply: &StepCurve) -> Result<Equilibrium, EquilibriumError> {
    let units = demand.len().min(supply.len());

    // Both schedules are validated finite, so the ordering is total.
    let excess = |i: usize| -> Option<(Ordering, f64)> {
        let (s, d) = (supply.rate(i)?, demand.rate(i)?);
        Some((s.total_cmp(&d), (s + d) / 2.0))
    };

    let (reference, midpoint) = excess(0).ok_or(EquilibriumError::NoCrossing { units })?;
    if reference == Ordering::Equal {
        return Ok(Equilibrium {
            quantity: 0.0,
            price: midpoint,
        });
    }

    (1..units)
        .filter_map(|i| excess(i).map(|(ordering, price)| (i, ordering, price)))
        .find(|&(_, ordering, _)| ordering == reference.reverse())
        .map(|(i, _, price)| Equilibrium {
            quantity: i as f64,
            price,
        })
        .ok_or(EquilibriumError::NoCrossing { units })
}
