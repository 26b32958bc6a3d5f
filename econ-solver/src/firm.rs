//! A firm's schedule of output, cost and price by number of workers.
//!
//! [`build`] produces a [`FirmBehaviourTable`] from three [`RateOfChange`]
//! specifications. The table feeds the elasticity iterators and the
//! feasibility checks used in perfect-competition lessons. [`cost_curves`]
//! is the continuous counterpart for a firm with a linear marginal cost.

mod cost_curve;
mod elasticity;
mod table;

pub use cost_curve::{CostCurves, cost_curves, cost_curves_with};
pub use elasticity::{Elasticities, price_elasticity, supply_elasticity};
pub use table::{FirmBehaviourTable, Row, build, build_with};

use crate::TableError;
use crate::models::{RateOfChange, Settings};

/// The inputs of a behaviour table, bundled for scenario files
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirmSpec {
    /// Variable cost
    pub cost: RateOfChange,
    /// Selling price
    pub price: RateOfChange,
    /// Output
    pub units: RateOfChange,
    /// Cost incurred regardless of output
    #[cfg_attr(feature = "serde", serde(default))]
    pub fixed_cost: f64,
    /// The largest worker count tabulated
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_workers: Option<u32>,
}

impl FirmSpec {
    /// Builds the table described by this spec
    pub fn build(&self, settings: &Settings) -> Result<FirmBehaviourTable, TableError> {
        build_with(
            &self.cost,
            &self.price,
            &self.units,
            self.fixed_cost,
            self.max_workers,
            settings,
        )
    }
}
