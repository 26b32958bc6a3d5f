use crate::firm::{FirmBehaviourTable, FirmSpec, price_elasticity, supply_elasticity};
use crate::models::{Curve, MarketConfig, PolicySpec};
use crate::{Engine, EngineError, Model, aggregate};
use serde::{Deserialize, Serialize};

/// A market as it appears in a scenario file, with one curve per participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct MarketScenario {
    /// the individual supply curves, summed horizontally
    pub supply: Vec<Curve>,
    /// the individual demand curves, summed horizontally
    pub demand: Vec<Curve>,
    /// the world price
    #[serde(default)]
    pub world_price: f64,
    /// exogenous supply
    #[serde(default)]
    pub extern_supply: f64,
    /// exogenous demand
    #[serde(default)]
    pub extern_demand: f64,
    /// the policy in force
    #[serde(default)]
    pub policy: PolicySpec,
}

impl MarketScenario {
    /// aggregate each side of the market into a single config
    pub fn into_config(self) -> Result<MarketConfig, EngineError> {
        Ok(MarketConfig {
            world_price: self.world_price,
            supply: aggregate(&self.supply)?,
            demand: aggregate(&self.demand)?,
            extern_supply: self.extern_supply,
            extern_demand: self.extern_demand,
            policy: self.policy,
        })
    }
}

/// a scenario file: either a market or a single firm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(tag = "scenario", rename_all = "lowercase")]
pub enum Scenario {
    /// a market to simulate
    Market(MarketScenario),
    /// a firm to tabulate
    Firm(FirmSpec),
}

/// the tabulated behaviour of a firm, with its derived series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct FirmReport {
    /// the behaviour table
    pub table: FirmBehaviourTable,
    /// whether a price taker would operate at each row
    pub feasible: Vec<bool>,
    /// the supply elasticities between consecutive rows, undefined pairs omitted
    pub supply_elasticity: Vec<f64>,
    /// the price elasticities between consecutive rows, undefined pairs omitted
    pub price_elasticity: Vec<f64>,
}

impl From<FirmBehaviourTable> for FirmReport {
    fn from(table: FirmBehaviourTable) -> Self {
        Self {
            feasible: table.feasibility(),
            supply_elasticity: supply_elasticity(&table).collect(),
            price_elasticity: price_elasticity(&table).collect(),
            table,
        }
    }
}

/// a representation of the result of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(tag = "report", rename_all = "lowercase")]
pub enum Report {
    /// the simulated market
    Market(Box<Model>),
    /// the firm's behaviour
    Firm(FirmReport),
}

impl Scenario {
    /// evaluate the scenario
    pub fn evaluate(self, engine: &Engine) -> Result<Report, EngineError> {
        match self {
            Self::Market(market) => {
                let config = market.into_config()?;
                Ok(Report::Market(Box::new(engine.simulate(&config)?)))
            }
            Self::Firm(spec) => Ok(Report::Firm(engine.firm_table(&spec)?.into())),
        }
    }
}
