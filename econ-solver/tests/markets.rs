use approx::{assert_abs_diff_eq, assert_relative_eq};
use econ_solver::models::{Direction, LinearCurve, MarketConfig, Point, PolicySpec, StepCurve};
use econ_solver::{Binding, PolicyError, equilibrium, resolve, shoelace, simulate, sum_horizontal};
use rstest::*;
use rstest_reuse::{self, *};

use all_markets::all_markets;

fn market(
    demand_intercept: f64,
    demand_slope: f64,
    supply_intercept: f64,
    supply_slope: f64,
) -> MarketConfig {
    MarketConfig::new(
        LinearCurve::supply(supply_intercept, supply_slope).unwrap(),
        LinearCurve::demand(demand_intercept, demand_slope).unwrap(),
    )
}

#[fixture]
fn textbook() -> MarketConfig {
    market(10.0, -1.0, 0.0, 1.0)
}

#[fixture]
fn schedules() -> MarketConfig {
    MarketConfig::new(
        StepCurve::new(
            Direction::Supply,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        )
        .unwrap(),
        StepCurve::new(
            Direction::Demand,
            vec![9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
        )
        .unwrap(),
    )
}

#[apply(all_markets)]
fn equilibrium_lies_on_both_curves(
    #[case] demand_intercept: f64,
    #[case] demand_slope: f64,
    #[case] supply_intercept: f64,
    #[case] supply_slope: f64,
) {
    let config = market(demand_intercept, demand_slope, supply_intercept, supply_slope);
    let eq = equilibrium(&config.demand, &config.supply).unwrap();
    assert_abs_diff_eq!(
        demand_intercept + demand_slope * eq.quantity,
        eq.price,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        supply_intercept + supply_slope * eq.quantity,
        eq.price,
        epsilon = 1e-9
    );
}

#[apply(all_markets)]
fn surplus_is_never_negative(
    #[case] demand_intercept: f64,
    #[case] demand_slope: f64,
    #[case] supply_intercept: f64,
    #[case] supply_slope: f64,
) {
    let config = market(demand_intercept, demand_slope, supply_intercept, supply_slope);
    let policies = [
        PolicySpec::default(),
        PolicySpec::default().with_tax(1.0, 0.5),
        PolicySpec::default().with_subsidy(0.0, 1.0),
        PolicySpec::default().with_price_ceiling(supply_intercept + 0.5),
    ];
    for policy in policies {
        let model = simulate(&config.clone().with_policy(policy)).unwrap();
        assert!(model.demand.market.surplus.size >= 0.0);
        assert!(model.supply.market.surplus.size >= 0.0);
        for region in &model.dead_weight_loss {
            assert!(region.size > 0.0);
            assert!(shoelace(&region.geometry) > 0.0);
        }
    }
}

#[apply(all_markets)]
fn floor_never_raises_quantity(
    #[case] demand_intercept: f64,
    #[case] demand_slope: f64,
    #[case] supply_intercept: f64,
    #[case] supply_slope: f64,
) {
    let config = market(demand_intercept, demand_slope, supply_intercept, supply_slope);
    let free = resolve(&config).unwrap();
    let mut previous = free.consumption();
    for step in 1..=5 {
        let floor = free.price + 0.5 * step as f64;
        let outcome = resolve(
            &config
                .clone()
                .with_policy(PolicySpec::default().with_price_floor(floor)),
        )
        .unwrap();
        assert!(outcome.is_binding(Binding::Floor));
        assert!(outcome.consumption() <= previous + 1e-9);
        previous = outcome.consumption();
    }
}

#[rstest]
#[case::two(&[(10.0, -1.0), (6.0, -0.5)])]
#[case::three(&[(10.0, -1.0), (6.0, -0.5), (8.0, -2.0)])]
#[case::four(&[(3.0, -0.1), (10.0, -1.0), (6.0, -0.5), (8.0, -2.0)])]
fn sum_horizontal_ignores_order(#[case] coefficients: &[(f64, f64)]) {
    let curves = coefficients
        .iter()
        .map(|&(intercept, slope)| LinearCurve::demand(intercept, slope).unwrap())
        .collect::<Vec<_>>();
    let reversed = curves.iter().rev().cloned().collect::<Vec<_>>();

    let forward = sum_horizontal(&curves).unwrap();
    let backward = sum_horizontal(&reversed).unwrap();
    assert_relative_eq!(forward.intercept(), backward.intercept(), max_relative = 1e-12);
    assert_relative_eq!(forward.slope(), backward.slope(), max_relative = 1e-12);
}

#[rstest]
fn textbook_market(textbook: MarketConfig) {
    let model = simulate(&textbook).unwrap();
    assert_eq!(model.equilibrium.quantity, 5.0);
    assert_eq!(model.equilibrium.price, 5.0);
    assert_eq!(
        model.demand.market.surplus.geometry,
        vec![
            Point::new(0.0, 10.0),
            Point::new(0.0, 5.0),
            Point::new(5.0, 5.0)
        ]
    );
    assert_eq!(model.demand.market.surplus.size, 12.5);
    assert_eq!(
        model.supply.market.surplus.geometry,
        vec![
            Point::new(0.0, 5.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0)
        ]
    );
    assert_eq!(model.supply.market.surplus.size, 12.5);
}

#[rstest]
fn price_floor_at_seven(textbook: MarketConfig) {
    let free = simulate(&textbook).unwrap();
    let model = simulate(
        &textbook.with_policy(PolicySpec::default().with_price_floor(7.0)),
    )
    .unwrap();

    assert_eq!(model.outcome.consumption(), 3.0);
    assert!(model.supply.market.surplus.size > free.supply.market.surplus.size);
    assert!(model.demand.market.surplus.size < free.demand.market.surplus.size);

    assert_eq!(model.dead_weight_loss.len(), 1);
    let loss = &model.dead_weight_loss[0];
    assert!(loss.size > 0.0);
    assert!(
        loss.geometry
            .iter()
            .all(|point| (3.0..=5.0).contains(&point.quantity))
    );
}

#[rstest]
fn discrete_example() {
    let supply = StepCurve::new(
        Direction::Supply,
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
    )
    .unwrap();
    let demand = StepCurve::new(
        Direction::Demand,
        vec![9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
    )
    .unwrap();
    let model = simulate(&MarketConfig::new(supply, demand)).unwrap();
    assert_eq!(model.equilibrium.quantity, 5.0);
    assert_eq!(model.equilibrium.price, 5.0);
    // 4 + 3 + 2 + 1 + 0 on both sides
    assert_relative_eq!(model.demand.market.surplus.size, 10.0);
    assert_relative_eq!(model.supply.market.surplus.size, 10.0);
}

#[rstest]
#[case::inverted_anchors(PolicySpec::default().with_price_floor(6.0).with_price_ceiling(4.0))]
#[case::negative_quota(PolicySpec::default().with_permit(true, false).with_quota(-1.0))]
#[case::infinite_tax(PolicySpec::default().with_tax(f64::INFINITY, 0.0))]
fn unhandled_policies(textbook: MarketConfig, #[case] policy: PolicySpec) {
    assert!(matches!(
        resolve(&textbook.with_policy(policy)).unwrap_err(),
        PolicyError::UnhandledPolicyCombination { .. }
    ));
}

#[rstest]
#[case::floor(PolicySpec::default().with_price_floor(7.0), 7.0, Binding::Floor)]
#[case::ceiling(PolicySpec::default().with_price_ceiling(3.0), 3.0, Binding::Ceiling)]
fn anchors_ration_schedules(
    schedules: MarketConfig,
    #[case] policy: PolicySpec,
    #[case] price: f64,
    #[case] binding: Binding,
) {
    let outcome = resolve(&schedules.with_policy(policy)).unwrap();
    assert_eq!(outcome.price, price);
    assert!(outcome.is_binding(binding));
    // The short side trades: three units either way
    assert_eq!(outcome.consumption(), 3.0);
    assert_eq!(outcome.production(), 3.0);
}

#[rstest]
fn floor_on_schedules_loses_surplus(schedules: MarketConfig) {
    let free = simulate(&schedules).unwrap();
    let model =
        simulate(&schedules.with_policy(PolicySpec::default().with_price_floor(7.0))).unwrap();

    assert_eq!(model.outcome.consumption(), 3.0);
    assert!(model.supply.market.surplus.size > free.supply.market.surplus.size);
    assert!(model.demand.market.surplus.size < free.demand.market.surplus.size);
    // Unit 3 is worth 6 to its buyer and costs 4 to make; unit 4 breaks even
    let lost: f64 = model.dead_weight_loss.iter().map(|region| region.size).sum();
    assert_relative_eq!(lost, 2.0, max_relative = 1e-9);
}

#[rstest]
fn schedules_trade_equilibrium_quantity() {
    let config = MarketConfig::new(
        StepCurve::new(Direction::Supply, vec![1.0, 2.0, 9.0, 10.0]).unwrap(),
        StepCurve::new(Direction::Demand, vec![5.0, 4.0, 3.0]).unwrap(),
    );
    let model = simulate(&config).unwrap();
    assert_eq!(model.equilibrium.quantity, 2.0);
    assert_eq!(model.demand.alloc.quantity, 2.0);
    assert_eq!(model.supply.alloc.quantity, 2.0);
    // Sellers of units 0 and 1 ask 1 and 2 and receive 6
    assert_relative_eq!(model.supply.market.surplus.size, 9.0, max_relative = 1e-9);
}
