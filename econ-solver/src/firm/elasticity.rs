use super::FirmBehaviourTable;
use crate::models::Point;

/// Point elasticities between consecutive observations of a schedule.
///
/// Each value is `(ΔQ/Q) / (ΔP/P)`, measured from the earlier observation of
/// the pair. A pair is skipped, never reported as zero, when either observation
/// is missing, the earlier quantity is zero, the price does not change, or the
/// quotient is otherwise not finite. The iterator is lazy and single-pass.
#[derive(Debug)]
pub struct Elasticities<I: Iterator<Item = Option<Point>>> {
    /// The raw, underlying observations
    observations: I,
    /// The left end of the sliding window
    anchor: Option<Point>,
}

impl<I: Iterator<Item = Option<Point>>> Elasticities<I> {
    /// Wraps a sequence of (quantity, price) observations; `None` marks a gap
    pub fn new(observations: I) -> Self {
        Self {
            observations,
            anchor: None,
        }
    }
}

impl<I: Iterator<Item = Option<Point>>> Iterator for Elasticities<I> {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.observations.next()?;
            let previous = std::mem::replace(&mut self.anchor, current);
            if let (Some(previous), Some(current)) = (previous, current) {
                if let Some(elasticity) = point_elasticity(previous, current) {
                    return Some(elasticity);
                }
            }
        }
    }
}

fn point_elasticity(from: Point, to: Point) -> Option<f64> {
    let delta_price = to.price - from.price;
    if from.quantity == 0.0 || delta_price == 0.0 {
        return None;
    }
    let elasticity =
        ((to.quantity - from.quantity) / from.quantity) / (delta_price / from.price);
    elasticity.is_finite().then_some(elasticity)
}

/// The elasticity of the firm's supply: output against marginal cost.
pub fn supply_elasticity(
    table: &FirmBehaviourTable,
) -> Elasticities<impl Iterator<Item = Option<Point>> + '_> {
    Elasticities::new(
        table
            .units
            .iter()
            .zip(&table.marginal_cost)
            .map(|(&units, marginal_cost)| {
                marginal_cost.map(|marginal_cost| Point::new(units, marginal_cost))
            }),
    )
}

/// The price elasticity along the firm's schedule: output against selling price.
pub fn price_elasticity(
    table: &FirmBehaviourTable,
) -> Elasticities<impl Iterator<Item = Option<Point>> + '_> {
    Elasticities::new(
        table
            .units
            .iter()
            .zip(&table.price)
            .map(|(&units, &price)| Some(Point::new(units, price))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firm::build;
    use crate::models::RateOfChange;
    use approx::assert_relative_eq;

    fn bakery(price: RateOfChange) -> FirmBehaviourTable {
        build(
            &RateOfChange::Scalar(10.0),
            &price,
            &RateOfChange::Cumulative(vec![0.0, 10.0, 18.0, 24.0, 28.0, 30.0]),
            5.0,
            None,
        )
        .unwrap()
    }

    #[test]
    fn supply_skips_undefined_first_row() {
        let values = supply_elasticity(&bakery(RateOfChange::Scalar(2.0))).collect::<Vec<_>>();
        // Six rows, the first without a marginal cost
        assert_eq!(values.len(), 4);
        assert_relative_eq!(values[0], 3.2, max_relative = 1e-12);
        assert_relative_eq!(values[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_price_has_no_elasticity() {
        assert_eq!(price_elasticity(&bakery(RateOfChange::Scalar(2.0))).count(), 0);
    }

    #[test]
    fn falling_price() {
        let table = bakery(RateOfChange::Cumulative(vec![
            6.0, 5.0, 4.0, 3.0, 2.0, 1.0,
        ]));
        let values = price_elasticity(&table).collect::<Vec<_>>();
        // The pair starting at zero output is skipped
        assert_eq!(values.len(), 4);
        // (8/10) / (-1/5)
        assert_relative_eq!(values[0], -4.0, max_relative = 1e-12);
    }

    #[test]
    fn gaps_break_the_window() {
        let observations = vec![
            Some(Point::new(1.0, 1.0)),
            None,
            Some(Point::new(2.0, 2.0)),
            Some(Point::new(3.0, 3.0)),
        ];
        let values = Elasticities::new(observations.into_iter()).collect::<Vec<_>>();
        assert_eq!(values, vec![1.0]);
    }
}
