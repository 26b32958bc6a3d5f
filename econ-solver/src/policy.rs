use crate::models::{
    Allocation, Curve, CurveError, Direction, Map, MarketConfig, Participant, PolicySpec, Settings,
};
use crate::{PolicyError, equilibrium_within};
use tracing::{Level, event};

// Enough halvings to exhaust f64 precision on any realistic price interval.
const BISECTION_STEPS: usize = 64;

/// An instrument or trade flow that shaped the final price
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Binding {
    /// The domestic price fell to the landed import price
    Import,
    /// The domestic price rose to the net export price
    Export,
    /// The import licence ran out and the domestic price rose above the landed price
    Quota,
    /// The price floor lies above the market price
    Floor,
    /// The price ceiling lies below the market price
    Ceiling,
}

/// The final state of a market once every instrument has been applied
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicyOutcome {
    /// The domestic market price, before any per-unit wedge
    pub price: f64,
    /// What each participant class trades, in [`Participant::ALL`] order
    pub allocations: Map<Participant, Allocation>,
    /// The constraints that shaped the price, in order of application
    pub binding: Vec<Binding>,
}

impl PolicyOutcome {
    /// The allocation of one participant class (zero if absent)
    pub fn allocation(&self, participant: Participant) -> Allocation {
        self.allocations
            .get(&participant)
            .copied()
            .unwrap_or_default()
    }

    /// Units bought by domestic consumers
    pub fn consumption(&self) -> f64 {
        self.allocation(Participant::Consumer).quantity
    }

    /// Units sold by domestic producers
    pub fn production(&self) -> f64 {
        self.allocation(Participant::Producer).quantity
    }

    /// Units brought in from abroad
    pub fn imports(&self) -> f64 {
        self.allocation(Participant::Importer).quantity
    }

    /// Units sent abroad
    pub fn exports(&self) -> f64 {
        self.allocation(Participant::Exporter).quantity
    }

    /// The government's net take (negative when subsidies dominate)
    pub fn revenue(&self) -> f64 {
        self.allocation(Participant::Government).value()
    }

    /// Whether `binding` shaped the outcome
    pub fn is_binding(&self, binding: Binding) -> bool {
        self.binding.contains(&binding)
    }

    /// Whether any goods crossed the border
    pub fn is_trading(&self) -> bool {
        self.imports() > 0.0 || self.exports() > 0.0
    }
}

/// The demand and supply curves as seen by the market once per-unit wedges and
/// external quantities are applied.
///
/// Buyers' willingness to pay drops by the net demand-side tax, sellers' asking
/// price rises by the net supply-side tax, and the exogenous quantities move each
/// curve to the right.
pub fn effective_curves(
    config: &MarketConfig,
    policy: &PolicySpec,
) -> Result<(Curve, Curve), PolicyError> {
    let shift = |curve: &Curve, vertical: f64, horizontal: f64| {
        curve
            .shift(vertical, horizontal)
            .map_err(|error| match error {
                CurveError::DiscreteShift(_) => {
                    PolicyError::unhandled("external quantities require continuous curves")
                }
                error => PolicyError::unhandled(error.to_string()),
            })
    };

    Ok((
        shift(&config.demand, -policy.demand_wedge(), config.extern_demand)?,
        shift(&config.supply, policy.supply_wedge(), config.extern_supply)?,
    ))
}

/// Applies the policy of `config` with the default tolerance.
pub fn resolve(config: &MarketConfig) -> Result<PolicyOutcome, PolicyError> {
    resolve_within(config, Settings::default().tolerance)
}

/// Applies the policy of `config` on top of its free market.
///
/// The order of application is fixed:
/// 1. taxes, subsidies and external quantities shift the curves;
/// 2. the shifted curves are solved for the market price;
/// 3. if a permit allows it and the world price (net of tariff) undercuts or
///    beats the market price, the domestic price moves to it, and an exhausted
///    import quota pushes it back up until imports fit the licence;
/// 4. a floor above, or a ceiling below, the resulting price replaces it;
/// 5. quantities are rationed at the final price: the short side of the market
///    is served in full, imports fill shortages and exports absorb gluts when
///    trade is open at that price.
pub fn resolve_within(
    config: &MarketConfig,
    tolerance: f64,
) -> Result<PolicyOutcome, PolicyError> {
    validate(config)?;
    let policy = &config.policy;
    let (demand, supply) = effective_curves(config, policy)?;
    let market = equilibrium_within(&demand, &supply, tolerance)?;

    let tariff = policy.transfer.tariff;
    let import_price = config.world_price + tariff.import_unit;
    let export_price = config.world_price - tariff.export_unit;
    let licence = policy.quota.import_licensed_unit;

    let mut binding = Vec::new();
    let mut price = market.price;

    if policy.permit.importing && import_price < market.price - tolerance {
        price = import_price;
        binding.push(Binding::Import);

        if let Some(cap) = licence {
            let (wanted, offered) = quantities(&demand, &supply, price, tolerance)?;
            if wanted - offered > cap + tolerance {
                price = quota_price(
                    &demand,
                    &supply,
                    cap,
                    (import_price, market.price),
                    tolerance,
                )?;
                binding.push(Binding::Quota);
                event!(Level::DEBUG, cap, price, "import quota binds");
            }
        }
    } else if policy.permit.exporting && export_price > market.price + tolerance {
        price = export_price;
        binding.push(Binding::Export);
    }

    if let Some(floor) = policy.anchor.price_floor.filter(|&floor| floor > price + tolerance) {
        event!(Level::DEBUG, floor, price, "price floor binds");
        price = floor;
        binding.push(Binding::Floor);
    }
    if let Some(ceiling) = policy
        .anchor
        .price_ceiling
        .filter(|&ceiling| ceiling < price - tolerance)
    {
        event!(Level::DEBUG, ceiling, price, "price ceiling binds");
        price = ceiling;
        binding.push(Binding::Ceiling);
    }

    // An unconstrained market trades its equilibrium quantity. Re-reading a
    // discrete schedule at the midpoint price can drop the units either side
    // of the crossing.
    let (wanted, offered) = if binding.is_empty() {
        let traded = market.quantity.max(0.0);
        (traded, traded)
    } else {
        quantities(&demand, &supply, price, tolerance)?
    };
    let import_open = policy.permit.importing && price + tolerance >= import_price;
    let export_open = policy.permit.exporting && price - tolerance <= export_price;

    let (consumption, production, imports, exports) = if wanted >= offered {
        let imports = if import_open {
            (wanted - offered).min(licence.unwrap_or(f64::INFINITY))
        } else {
            0.0
        };
        (offered + imports, offered, imports, 0.0)
    } else {
        let exports = if export_open { offered - wanted } else { 0.0 };
        (wanted, wanted + exports, 0.0, exports)
    };

    if !(consumption.is_finite() && production.is_finite()) {
        return Err(PolicyError::unhandled(format!(
            "quantity is unbounded at price {price}"
        )));
    }

    let demand_wedge = policy.demand_wedge();
    let supply_wedge = policy.supply_wedge();
    let revenue = demand_wedge * consumption
        + supply_wedge * production
        + tariff.import_unit * imports
        + tariff.export_unit * exports;
    let levied = consumption.max(production);
    let government = if levied > 0.0 {
        Allocation::new(levied, revenue / levied)
    } else {
        Allocation::new(0.0, demand_wedge + supply_wedge)
    };

    let allocations = Participant::ALL
        .into_iter()
        .map(|participant| {
            let allocation = match participant {
                Participant::Consumer => Allocation::new(consumption, price + demand_wedge),
                Participant::Producer => Allocation::new(production, price - supply_wedge),
                Participant::Importer => Allocation::new(imports, import_price),
                Participant::Exporter => Allocation::new(exports, export_price),
                Participant::Government => government,
            };
            (participant, allocation)
        })
        .collect::<Map<_, _>>();

    event!(
        Level::DEBUG,
        price,
        consumption,
        production,
        imports,
        exports,
        revenue,
        "resolved policy"
    );

    Ok(PolicyOutcome {
        price,
        allocations,
        binding,
    })
}

fn validate(config: &MarketConfig) -> Result<(), PolicyError> {
    let fields = [
        ("world_price", Some(config.world_price)),
        ("extern_supply", Some(config.extern_supply)),
        ("extern_demand", Some(config.extern_demand)),
    ]
    .into_iter()
    .chain(config.policy.numeric_fields());

    for (name, value) in fields {
        if let Some(value) = value.filter(|value| !value.is_finite()) {
            return Err(PolicyError::unhandled(format!("{name} is not finite: {value}")));
        }
    }

    if let Some(cap) = config.policy.quota.import_licensed_unit.filter(|&cap| cap < 0.0) {
        return Err(PolicyError::unhandled(format!(
            "import quota cannot be negative: {cap}"
        )));
    }

    let anchor = config.policy.anchor;
    if let (Some(floor), Some(ceiling)) = (anchor.price_floor, anchor.price_ceiling) {
        if floor > ceiling {
            return Err(PolicyError::unhandled(format!(
                "price floor {floor} lies above price ceiling {ceiling}"
            )));
        }
    }

    Ok(())
}

/// The quantities demanded and supplied at `price`.
///
/// A horizontal curve has no inverse; it takes whatever the other side trades
/// at its own level, everything above (supply) or below (demand) it, and nothing
/// otherwise.
fn quantities(
    demand: &Curve,
    supply: &Curve,
    price: f64,
    tolerance: f64,
) -> Result<(f64, f64), PolicyError> {
    match (demand.quantity_at(price), supply.quantity_at(price)) {
        (Some(wanted), Some(offered)) => Ok((wanted, offered)),
        (Some(wanted), None) => Ok((wanted, elastic(supply, price, wanted, tolerance))),
        (None, Some(offered)) => Ok((elastic(demand, price, offered, tolerance), offered)),
        (None, None) => Err(PolicyError::unhandled(
            "supply and demand are both perfectly elastic",
        )),
    }
}

fn elastic(curve: &Curve, price: f64, matched: f64, tolerance: f64) -> f64 {
    let level = curve.sample(0.0).unwrap_or(price);
    let above = price > level + tolerance;
    let below = price < level - tolerance;
    match curve.direction() {
        Direction::Supply if above => f64::INFINITY,
        Direction::Demand if below => f64::INFINITY,
        Direction::Supply | Direction::Demand if above || below => 0.0,
        Direction::Supply | Direction::Demand => matched,
    }
}

/// The price within `bounds` at which excess demand equals the import licence.
fn quota_price(
    demand: &Curve,
    supply: &Curve,
    cap: f64,
    (low, high): (f64, f64),
    tolerance: f64,
) -> Result<f64, PolicyError> {
    if let (Curve::Continuous(d), Curve::Continuous(s)) = (demand, supply) {
        if d.slope() != 0.0 && s.slope() != 0.0 {
            // Licensed imports act as extra supply at every price above the landed price
            let widened: Curve = s.shifted(0.0, cap).into();
            let market = equilibrium_within(demand, &widened, tolerance)?;
            return Ok(market.price.clamp(low, high));
        }
    }

    // Excess demand never rises with the price, so bisection converges on the
    // lowest price at which imports fit within the licence.
    let (mut low, mut high) = (low, high);
    for _ in 0..BISECTION_STEPS {
        let middle = (low + high) / 2.0;
        let (wanted, offered) = quantities(demand, supply, middle, tolerance)?;
        if wanted - offered > cap {
            low = middle;
        } else {
            high = middle;
        }
    }
    Ok(high)
}
