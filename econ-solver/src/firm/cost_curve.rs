use crate::TableError;
use crate::models::{LinearCurve, Point, Settings};
use tracing::{Level, event};

/// Sampled cost curves of a firm whose marginal cost is linear in output
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostCurves {
    /// Average total cost (ATC)
    pub average_total: Vec<Point>,
    /// Average variable cost (AVC)
    pub average_variable: Vec<Point>,
    /// Marginal cost (MC)
    pub marginal: Vec<Point>,
    /// The lowest sampled ATC: below this price the firm makes a loss
    pub break_even: Point,
    /// The lowest sampled AVC: below this price the firm stops producing
    pub shutdown: Point,
}

/// Samples ATC, AVC and MC at `samples` points, with the default settings otherwise.
pub fn cost_curves(
    marginal: &LinearCurve,
    fixed_cost: f64,
    max_quantity: f64,
    samples: usize,
) -> Result<CostCurves, TableError> {
    cost_curves_with(
        marginal,
        fixed_cost,
        max_quantity,
        &Settings {
            samples,
            ..Settings::default()
        },
    )
}

/// Samples ATC, AVC and MC over `(0, max_quantity]` at `settings.samples` points.
///
/// With `MC(q) = a + b·q`, variable cost is `a·q + b·q²/2`, so
/// `AVC(q) = a + b·q/2` and `ATC(q) = AVC(q) + fixed_cost/q`. Quantity zero is
/// left out, where ATC is unbounded.
pub fn cost_curves_with(
    marginal: &LinearCurve,
    fixed_cost: f64,
    max_quantity: f64,
    settings: &Settings,
) -> Result<CostCurves, TableError> {
    let samples = settings.samples;
    if !fixed_cost.is_finite() {
        return Err(TableError::NonFinite {
            column: "fixed_cost",
        });
    }
    if !max_quantity.is_finite() {
        return Err(TableError::NonFinite {
            column: "max_quantity",
        });
    }
    if samples == 0 || max_quantity <= 0.0 {
        return Err(TableError::Empty { column: "samples" });
    }
    if samples > settings.max_rows {
        return Err(TableError::TooManyRows {
            requested: samples,
            limit: settings.max_rows,
        });
    }

    let (a, b) = (marginal.intercept(), marginal.slope());
    let quantities = (1..=samples).map(|i| max_quantity * i as f64 / samples as f64);

    let average_variable = quantities
        .clone()
        .map(|q| Point::new(q, a + b * q / 2.0))
        .collect::<Vec<_>>();
    let average_total = average_variable
        .iter()
        .map(|avc| Point::new(avc.quantity, avc.price + fixed_cost / avc.quantity))
        .collect::<Vec<_>>();
    let marginal = quantities
        .map(|q| Point::new(q, marginal.price_at(q)))
        .collect::<Vec<_>>();

    // Samples are non-empty, so a minimum always exists
    let lowest = |curve: &[Point]| {
        curve
            .iter()
            .copied()
            .reduce(|low, point| if point.price < low.price { point } else { low })
            .unwrap_or_default()
    };
    let break_even = lowest(&average_total);
    let shutdown = lowest(&average_variable);

    event!(
        Level::DEBUG,
        samples,
        break_even = break_even.price,
        shutdown = shutdown.price,
        "sampled cost curves"
    );

    Ok(CostCurves {
        average_total,
        average_variable,
        marginal,
        break_even,
        shutdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn break_even_where_marginal_meets_average() {
        let mc = LinearCurve::supply(2.0, 1.0).unwrap();
        let curves = cost_curves(&mc, 8.0, 10.0, 200).unwrap();
        assert_eq!(curves.average_total.len(), 200);
        assert_relative_eq!(curves.break_even.quantity, 4.0);
        assert_relative_eq!(curves.break_even.price, 6.0);
        assert_relative_eq!(mc.price_at(curves.break_even.quantity), 6.0);
        // AVC rises from the start, so the shutdown point is the first sample
        assert_relative_eq!(curves.shutdown.quantity, 0.05);
        assert_relative_eq!(curves.shutdown.price, 2.025);
    }

    #[test]
    fn invalid_sampling() {
        let mc = LinearCurve::supply(2.0, 1.0).unwrap();
        assert_eq!(
            cost_curves(&mc, 8.0, 10.0, 0).unwrap_err(),
            TableError::Empty { column: "samples" }
        );
        assert_eq!(
            cost_curves(&mc, f64::INFINITY, 10.0, 10).unwrap_err(),
            TableError::NonFinite {
                column: "fixed_cost"
            }
        );
    }

    #[test]
    fn sample_count_is_capped() {
        let mc = LinearCurve::supply(2.0, 1.0).unwrap();
        let settings = Settings {
            samples: usize::MAX,
            max_rows: 500,
            ..Settings::default()
        };
        assert_eq!(
            cost_curves_with(&mc, 8.0, 10.0, &settings).unwrap_err(),
            TableError::TooManyRows {
                requested: usize::MAX,
                limit: 500
            }
        );
        assert_eq!(cost_curves(&mc, 8.0, 10.0, 500).unwrap().marginal.len(), 500);
    }
}
