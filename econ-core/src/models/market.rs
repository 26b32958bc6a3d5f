use super::{Curve, PolicySpec};
use std::fmt;

/// Everything needed to simulate one market.
///
/// A config is assembled once per configuration change and never mutated while
/// a computation is in flight; the builder methods consume and return it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketConfig {
    /// The price at which the rest of the world trades, only used when a permit is granted
    #[cfg_attr(feature = "serde", serde(default))]
    pub world_price: f64,
    /// Domestic (possibly aggregated) supply
    pub supply: Curve,
    /// Domestic (possibly aggregated) demand
    pub demand: Curve,
    /// Exogenous quantity added to supply at every price
    #[cfg_attr(feature = "serde", serde(default))]
    pub extern_supply: f64,
    /// Exogenous quantity added to demand at every price
    #[cfg_attr(feature = "serde", serde(default))]
    pub extern_demand: f64,
    /// Government and trade interventions
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: PolicySpec,
}

impl MarketConfig {
    /// A closed, undistorted market
    pub fn new(supply: impl Into<Curve>, demand: impl Into<Curve>) -> Self {
        Self {
            world_price: 0.0,
            supply: supply.into(),
            demand: demand.into(),
            extern_supply: 0.0,
            extern_demand: 0.0,
            policy: PolicySpec::default(),
        }
    }

    /// Sets the world price
    pub fn with_world_price(mut self, world_price: f64) -> Self {
        self.world_price = world_price;
        self
    }

    /// Sets the exogenous quantities
    pub fn with_extern(mut self, extern_supply: f64, extern_demand: f64) -> Self {
        self.extern_supply = extern_supply;
        self.extern_demand = extern_demand;
        self
    }

    /// Replaces the policy
    pub fn with_policy(mut self, policy: PolicySpec) -> Self {
        self.policy = policy;
        self
    }
}

/// A class of market participant receiving an [`Allocation`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Participant {
    /// Domestic buyers
    Consumer,
    /// Domestic sellers
    Producer,
    /// Sellers of foreign goods on the domestic market
    Importer,
    /// Buyers of domestic goods for foreign markets
    Exporter,
    /// The collector of taxes and tariffs, and payer of subsidies
    Government,
}

impl Participant {
    /// Every participant class, in reporting order
    pub const ALL: [Participant; 5] = [
        Self::Consumer,
        Self::Producer,
        Self::Importer,
        Self::Exporter,
        Self::Government,
    ];
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Consumer => "consumer",
            Self::Producer => "producer",
            Self::Importer => "importer",
            Self::Exporter => "exporter",
            Self::Government => "government",
        };
        f.write_str(name)
    }
}

/// The quantity a participant class trades and the price it effectively pays or receives per unit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    /// Units traded
    pub quantity: f64,
    /// Price per unit, net of any wedge applying to this class
    pub effective_price: f64,
}

impl Allocation {
    /// Creates an allocation
    pub const fn new(quantity: f64, effective_price: f64) -> Self {
        Self {
            quantity,
            effective_price,
        }
    }

    /// The money changing hands, `quantity · effective_price`
    pub fn value(&self) -> f64 {
        self.quantity * self.effective_price
    }
}
