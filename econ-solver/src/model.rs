use crate::firm::{CostCurves, FirmBehaviourTable, FirmSpec, cost_curves_with};
use crate::models::{
    Allocation, Curve, LinearCurve, MarketConfig, Participant, Point, PolicySpec, Settings,
};
use crate::policy::{PolicyOutcome, effective_curves, resolve_within};
use crate::surplus::{
    SurplusRegion, band, consumer_surplus, dead_weight_loss, extent, producer_surplus, rectangle,
    trace,
};
use crate::{EngineError, Equilibrium, equilibrium_within};
use tracing::{Level, event};

/// What a renderer draws for one side of the market
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketView {
    /// The curve traced across the chart, left to right
    pub line: Vec<Point>,
    /// The surplus this side keeps under the outcome
    pub surplus: SurplusRegion,
}

/// One side of a simulated market
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Side {
    /// The curve before taxes and subsidies (external quantities included)
    pub curve: Curve,
    /// Geometry for rendering
    pub market: MarketView,
    /// What this side trades and at what price
    pub alloc: Allocation,
}

/// The complete, render-ready result of simulating one market
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    /// Domestic buyers
    pub demand: Side,
    /// Domestic sellers
    pub supply: Side,
    /// The top-right corner of the chart: every quantity and price of interest fits inside
    pub bounds: Point,
    /// Where the curves cross with the border closed and no instruments in force
    pub equilibrium: Equilibrium,
    /// The market once the configured policy is applied
    pub outcome: PolicyOutcome,
    /// Surplus lost relative to the same market without instruments
    pub dead_weight_loss: Vec<SurplusRegion>,
    /// The government's wedge between what buyers pay and sellers receive
    pub transfer: SurplusRegion,
    /// Tariff revenue and quota rent on traded units
    pub trade_rent: SurplusRegion,
}

/// The entry point of the engine, carrying its numeric settings.
///
/// An engine holds no state besides its settings; every call returns a fresh value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Engine {
    settings: Settings,
}

impl Engine {
    /// Creates an engine with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// The settings this engine runs with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Solves for the crossing of `demand` and `supply`
    pub fn equilibrium(&self, demand: &Curve, supply: &Curve) -> Result<Equilibrium, EngineError> {
        Ok(equilibrium_within(demand, supply, self.settings.tolerance)?)
    }

    /// Applies the policy of `config`
    pub fn resolve(&self, config: &MarketConfig) -> Result<PolicyOutcome, EngineError> {
        Ok(resolve_within(config, self.settings.tolerance)?)
    }

    /// Simulates `config` end to end: equilibrium, policy, surplus and chart geometry.
    pub fn simulate(&self, config: &MarketConfig) -> Result<Model, EngineError> {
        let tolerance = self.settings.tolerance;

        let (demand, supply) = effective_curves(config, &PolicySpec::default())?;
        let equilibrium = equilibrium_within(&demand, &supply, tolerance)?;
        let outcome = resolve_within(config, tolerance)?;
        let benchmark = resolve_within(
            &MarketConfig {
                policy: config.policy.without_instruments(),
                ..config.clone()
            },
            tolerance,
        )?;

        let consumer = outcome.allocation(Participant::Consumer);
        let producer = outcome.allocation(Participant::Producer);

        let losses = if outcome.is_trading() || benchmark.is_trading() {
            // Against trade, the efficient price is the benchmark's, flat on both sides
            vec![
                band(
                    &demand,
                    benchmark.price,
                    benchmark.consumption(),
                    outcome.consumption(),
                ),
                band(
                    &supply,
                    benchmark.price,
                    benchmark.production(),
                    outcome.production(),
                ),
            ]
        } else {
            vec![dead_weight_loss(
                &demand,
                &supply,
                benchmark.consumption(),
                outcome.consumption(),
            )]
        }
        .into_iter()
        .filter(|region| !region.is_empty())
        .collect::<Vec<_>>();

        let transfer = rectangle(
            0.0,
            outcome.allocation(Participant::Government).quantity,
            producer.effective_price,
            consumer.effective_price,
        );

        let trade_rent = if outcome.imports() > 0.0 {
            rectangle(
                outcome.production(),
                outcome.production() + outcome.imports(),
                config.world_price,
                outcome.price,
            )
        } else if outcome.exports() > 0.0 {
            rectangle(
                outcome.consumption(),
                outcome.consumption() + outcome.exports(),
                outcome.price,
                config.world_price,
            )
        } else {
            SurplusRegion::empty()
        };

        let bounds = bounds(config, &demand, &supply, &equilibrium, &outcome);

        event!(
            Level::DEBUG,
            price = outcome.price,
            quantity = outcome.consumption(),
            dead_weight_loss = losses.iter().map(|region| region.size).sum::<f64>(),
            "simulated market"
        );

        Ok(Model {
            demand: Side {
                market: MarketView {
                    line: trace(&demand, 0.0, bounds.quantity),
                    surplus: consumer_surplus(&demand, &consumer),
                },
                curve: demand,
                alloc: consumer,
            },
            supply: Side {
                market: MarketView {
                    line: trace(&supply, 0.0, bounds.quantity),
                    surplus: producer_surplus(&supply, &producer),
                },
                curve: supply,
                alloc: producer,
            },
            bounds,
            equilibrium,
            outcome,
            dead_weight_loss: losses,
            transfer,
            trade_rent,
        })
    }

    /// Builds the behaviour table of a single firm
    pub fn firm_table(&self, spec: &FirmSpec) -> Result<FirmBehaviourTable, EngineError> {
        Ok(spec.build(&self.settings)?)
    }

    /// Samples the average and marginal cost curves of a firm with a linear marginal cost
    pub fn cost_curves(
        &self,
        marginal: &LinearCurve,
        fixed_cost: f64,
        max_quantity: f64,
    ) -> Result<CostCurves, EngineError> {
        Ok(cost_curves_with(
            marginal,
            fixed_cost,
            max_quantity,
            &self.settings,
        )?)
    }
}

/// Simulates `config` with the default settings.
pub fn simulate(config: &MarketConfig) -> Result<Model, EngineError> {
    Engine::default().simulate(config)
}

fn bounds(
    config: &MarketConfig,
    demand: &Curve,
    supply: &Curve,
    equilibrium: &Equilibrium,
    outcome: &PolicyOutcome,
) -> Point {
    let quantity = widest([
        demand.quantity_at(0.0).unwrap_or_default(),
        extent(demand),
        extent(supply),
        equilibrium.quantity,
        outcome.consumption(),
        outcome.production(),
    ]);

    let anchors = [
        config.policy.anchor.price_floor,
        config.policy.anchor.price_ceiling,
    ];
    let price = widest(
        [
            demand.sample(0.0),
            supply.sample(0.0),
            supply.sample(quantity),
            Some(equilibrium.price),
            Some(outcome.price),
            Some(config.world_price),
        ]
        .into_iter()
        .chain(anchors)
        .chain(
            outcome
                .allocations
                .values()
                .map(|alloc| Some(alloc.effective_price)),
        )
        .flatten(),
    );

    Point::new(quantity, price)
}

// The largest positive finite value, or one when there is none
fn widest(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .filter(|value| value.is_finite() && *value > 0.0)
        .reduce(f64::max)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, StepCurve};
    use approx::assert_relative_eq;

    fn textbook() -> MarketConfig {
        MarketConfig::new(
            LinearCurve::supply(0.0, 1.0).unwrap(),
            LinearCurve::demand(10.0, -1.0).unwrap(),
        )
    }

    #[test]
    fn free_market_model() {
        let model = simulate(&textbook()).unwrap();
        assert_eq!(model.equilibrium.quantity, 5.0);
        assert_eq!(model.demand.market.surplus.size, 12.5);
        assert_eq!(model.supply.market.surplus.size, 12.5);
        assert!(model.dead_weight_loss.is_empty());
        assert!(model.transfer.is_empty());
        assert!(model.trade_rent.is_empty());
        assert_eq!(model.bounds, Point::new(10.0, 10.0));
        assert_eq!(
            model.demand.market.line,
            vec![Point::new(0.0, 10.0), Point::new(10.0, 0.0)]
        );
    }

    #[test]
    fn tax_leaves_wedge_and_loss() {
        let config = textbook().with_policy(PolicySpec::default().with_tax(0.0, 2.0));
        let model = simulate(&config).unwrap();
        assert_relative_eq!(model.transfer.size, 8.0);
        assert_eq!(model.dead_weight_loss.len(), 1);
        // Triangle between q = 4 and q = 5 with a height of 2
        assert_relative_eq!(model.dead_weight_loss[0].size, 1.0);
        // The closed, undistorted crossing does not move
        assert_eq!(model.equilibrium.price, 5.0);
    }

    #[test]
    fn tariff_losses_on_both_sides() {
        let config = textbook().with_world_price(3.0).with_policy(
            PolicySpec::default()
                .with_permit(true, false)
                .with_tariff(1.0, 0.0),
        );
        let model = simulate(&config).unwrap();
        let sizes = model
            .dead_weight_loss
            .iter()
            .map(|region| region.size)
            .collect::<Vec<_>>();
        assert_eq!(sizes.len(), 2);
        assert_relative_eq!(sizes[0], 0.5);
        assert_relative_eq!(sizes[1], 0.5);
        // Two imported units at a duty of one
        assert_relative_eq!(model.trade_rent.size, 2.0);
    }

    #[test]
    fn discrete_model() {
        let config = MarketConfig::new(
            StepCurve::new(Direction::Supply, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
            StepCurve::new(Direction::Demand, vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0]).unwrap(),
        );
        let model = simulate(&config).unwrap();
        assert_eq!(model.bounds.quantity, 6.0);
        assert!(model.demand.market.surplus.size >= 0.0);
        assert!(model.supply.market.surplus.size >= 0.0);
        assert_eq!(model.demand.market.line.first(), Some(&Point::new(0.0, 6.0)));
    }

    #[test]
    fn models_compare_by_value() {
        let engine = Engine::new(Settings::default());
        assert_eq!(
            engine.simulate(&textbook()).unwrap(),
            engine.simulate(&textbook()).unwrap()
        );
    }
}
