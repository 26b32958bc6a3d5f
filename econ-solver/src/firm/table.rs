use crate::TableError;
use crate::models::{Param, RateOfChange, Settings};
use tracing::{Level, event};

/// A firm's output, cost and revenue for each number of workers.
///
/// Every column has one entry per row, and row `w` describes the firm employing
/// `w` workers. Marginal and average columns hold `None` where the quotient is
/// undefined (no change in output, or no output at all); renderers show those as
/// a placeholder rather than a number.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirmBehaviourTable {
    /// The number of workers, `0..=n`
    pub workers: Vec<u32>,
    /// Cumulative output
    pub units: Vec<f64>,
    /// Cost that varies with output
    pub cost_var: Vec<f64>,
    /// Variable plus fixed cost
    pub cost_total: Vec<f64>,
    /// Selling price per unit
    pub price: Vec<f64>,
    /// `price · units`
    pub revenue: Vec<f64>,
    /// Change in total cost per extra unit
    pub marginal_cost: Vec<Option<f64>>,
    /// Change in revenue per extra unit
    pub marginal_revenue: Vec<Option<f64>>,
    /// Change in revenue per extra worker
    pub marginal_benefit: Vec<Option<f64>>,
    /// Variable cost per unit
    pub avg_cost_var: Vec<Option<f64>>,
    /// Total cost per unit
    pub avg_cost_total: Vec<Option<f64>>,
    /// `revenue − cost_total`
    pub profit: Vec<f64>,
}

/// A single row of a [`FirmBehaviourTable`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Row {
    /// Workers employed
    pub workers: u32,
    /// Cumulative output
    pub units: f64,
    /// Variable cost
    pub cost_var: f64,
    /// Total cost
    pub cost_total: f64,
    /// Selling price
    pub price: f64,
    /// Revenue
    pub revenue: f64,
    /// Marginal cost per unit
    pub marginal_cost: Option<f64>,
    /// Marginal revenue per unit
    pub marginal_revenue: Option<f64>,
    /// Marginal revenue per worker
    pub marginal_benefit: Option<f64>,
    /// Average variable cost
    pub avg_cost_var: Option<f64>,
    /// Average total cost
    pub avg_cost_total: Option<f64>,
    /// Profit
    pub profit: f64,
    /// Whether a price-taking firm would operate at this row
    pub feasible: bool,
}

/// Builds a behaviour table with the default settings.
pub fn build(
    cost: &RateOfChange,
    price: &RateOfChange,
    units: &RateOfChange,
    fixed_cost: f64,
    max_workers: Option<u32>,
) -> Result<FirmBehaviourTable, TableError> {
    build_with(
        cost,
        price,
        units,
        fixed_cost,
        max_workers,
        &Settings::default(),
    )
}

/// Builds a behaviour table.
///
/// The table has `max_workers + 1` rows. Without an explicit worker count, the
/// shortest cumulative schedule decides, and failing that `settings.max_workers`.
/// No table grows past `settings.max_rows`.
///
/// * `units` is output: a constant product per worker, explicit running totals,
///   or a marginal product `intercept + slope·x` added up worker by worker, where
///   `x` is the worker count or the output so far.
/// * `cost` is variable cost: a wage per worker, explicit running totals, a
///   per-worker marginal cost added up, or a per-unit marginal cost integrated
///   over output.
/// * `price` is the selling price, evaluated at the row's worker count or output.
pub fn build_with(
    cost: &RateOfChange,
    price: &RateOfChange,
    units: &RateOfChange,
    fixed_cost: f64,
    max_workers: Option<u32>,
    settings: &Settings,
) -> Result<FirmBehaviourTable, TableError> {
    let specs = [("cost", cost), ("price", price), ("units", units)];
    for &(column, spec) in specs.iter() {
        if !spec.is_finite() {
            return Err(TableError::NonFinite { column });
        }
        if spec.cumulative_len() == Some(0) {
            return Err(TableError::Empty { column });
        }
    }
    if !fixed_cost.is_finite() {
        return Err(TableError::NonFinite {
            column: "fixed_cost",
        });
    }

    let rows = match max_workers {
        Some(workers) => (workers as usize).saturating_add(1),
        None => specs
            .iter()
            .filter_map(|(_, spec)| spec.cumulative_len())
            .min()
            .unwrap_or((settings.max_workers as usize).saturating_add(1)),
    };
    if rows > settings.max_rows {
        return Err(TableError::TooManyRows {
            requested: rows,
            limit: settings.max_rows,
        });
    }
    for &(column, spec) in specs.iter() {
        if let Some(found) = spec.cumulative_len().filter(|&found| found < rows) {
            return Err(TableError::ShapeMismatch {
                column,
                expected: rows,
                found,
            });
        }
    }

    let units = output(units, rows);
    let cost_var = variable_cost(cost, &units);
    let price = selling_price(price, &units);
    let cost_total = cost_var.iter().map(|cost| cost + fixed_cost).collect::<Vec<_>>();
    let revenue = price
        .iter()
        .zip(&units)
        .map(|(price, units)| price * units)
        .collect::<Vec<_>>();
    let profit = revenue
        .iter()
        .zip(&cost_total)
        .map(|(revenue, cost)| revenue - cost)
        .collect::<Vec<_>>();

    let tolerance = settings.tolerance;
    let per_unit = |column: &[f64]| -> Vec<Option<f64>> {
        (0..rows)
            .map(|w| {
                let delta = units[w] - units[w.checked_sub(1)?];
                if delta.abs() <= tolerance {
                    event!(Level::DEBUG, row = w, "output unchanged, marginal value undefined");
                    None
                } else {
                    Some((column[w] - column[w - 1]) / delta)
                }
            })
            .collect()
    };
    let average = |column: &[f64]| -> Vec<Option<f64>> {
        column
            .iter()
            .zip(&units)
            .map(|(value, units)| (units.abs() > tolerance).then(|| value / units))
            .collect()
    };

    let marginal_cost = per_unit(&cost_total);
    let marginal_revenue = per_unit(&revenue);
    let marginal_benefit = (0..rows)
        .map(|w| Some(revenue[w] - revenue[w.checked_sub(1)?]))
        .collect();
    let avg_cost_var = average(&cost_var);
    let avg_cost_total = average(&cost_total);

    event!(Level::DEBUG, rows, "built behaviour table");

    Ok(FirmBehaviourTable {
        workers: (0..rows as u32).collect(),
        units,
        cost_var,
        cost_total,
        price,
        revenue,
        marginal_cost,
        marginal_revenue,
        marginal_benefit,
        avg_cost_var,
        avg_cost_total,
        profit,
    })
}

// Cumulative specs have been checked to cover every row.
fn output(spec: &RateOfChange, rows: usize) -> Vec<f64> {
    let mut units: Vec<f64> = Vec::with_capacity(rows);
    for w in 0..rows {
        let value = match spec {
            RateOfChange::Scalar(rate) => rate * w as f64,
            RateOfChange::Cumulative(values) => values[w],
            RateOfChange::Curve {
                intercept,
                slope,
                param,
            } => match units.last() {
                None => 0.0,
                Some(&previous) => {
                    let x = match param {
                        Param::Worker => w as f64,
                        Param::Units => previous,
                    };
                    previous + intercept + slope * x
                }
            },
        };
        units.push(value);
    }
    units
}

fn variable_cost(spec: &RateOfChange, units: &[f64]) -> Vec<f64> {
    match spec {
        RateOfChange::Scalar(wage) => (0..units.len()).map(|w| wage * w as f64).collect(),
        RateOfChange::Cumulative(values) => values[..units.len()].to_vec(),
        RateOfChange::Curve {
            intercept,
            slope,
            param: Param::Worker,
        } => (0..units.len())
            .scan(0.0, |total, w| {
                if w > 0 {
                    *total += intercept + slope * w as f64;
                }
                Some(*total)
            })
            .collect(),
        RateOfChange::Curve {
            intercept,
            slope,
            param: Param::Units,
        } => units
            .iter()
            .map(|units| intercept * units + slope * units * units / 2.0)
            .collect(),
    }
}

fn selling_price(spec: &RateOfChange, units: &[f64]) -> Vec<f64> {
    match spec {
        RateOfChange::Scalar(price) => vec![*price; units.len()],
        RateOfChange::Cumulative(values) => values[..units.len()].to_vec(),
        RateOfChange::Curve {
            intercept,
            slope,
            param,
        } => units
            .iter()
            .enumerate()
            .map(|(w, units)| {
                let x = match param {
                    Param::Worker => w as f64,
                    Param::Units => *units,
                };
                intercept + slope * x
            })
            .collect(),
    }
}

impl FirmBehaviourTable {
    /// The number of rows
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Whether a price-taking firm would employ `workers`: either it produces
    /// nothing, or its marginal cost does not exceed the price.
    pub fn feasible(&self, workers: usize) -> bool {
        match self.units.get(workers) {
            Some(&units) if units == 0.0 => true,
            Some(_) => self.marginal_cost[workers]
                .is_some_and(|marginal_cost| marginal_cost <= self.price[workers]),
            None => false,
        }
    }

    /// [`feasible`](Self::feasible) for every row
    pub fn feasibility(&self) -> Vec<bool> {
        (0..self.len()).map(|w| self.feasible(w)).collect()
    }

    /// Row `workers`, if the table has it
    pub fn row(&self, workers: usize) -> Option<Row> {
        Some(Row {
            workers: *self.workers.get(workers)?,
            units: self.units[workers],
            cost_var: self.cost_var[workers],
            cost_total: self.cost_total[workers],
            price: self.price[workers],
            revenue: self.revenue[workers],
            marginal_cost: self.marginal_cost[workers],
            marginal_revenue: self.marginal_revenue[workers],
            marginal_benefit: self.marginal_benefit[workers],
            avg_cost_var: self.avg_cost_var[workers],
            avg_cost_total: self.avg_cost_total[workers],
            profit: self.profit[workers],
            feasible: self.feasible(workers),
        })
    }

    /// Every row, in order of worker count
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.len()).filter_map(|w| self.row(w))
    }

    /// The feasible row with the highest profit (the first one, on ties)
    pub fn profit_maximising_row(&self) -> Option<Row> {
        self.rows()
            .filter(|row| row.feasible)
            .reduce(|best, row| if row.profit > best.profit { row } else { best })
    }
}
