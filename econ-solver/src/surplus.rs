//! Welfare regions as polygons in (quantity, price) space.
//!
//! Every region is built the same way: a lower boundary traced left to right,
//! an upper boundary traced right to left. The result is counter-clockwise,
//! starts at its upper-left vertex, and never repeats a vertex (the closing
//! edge back to the first vertex is implicit). Renderers fill the polygon as is.

mod trace;
pub(crate) use trace::{extent, trace};

use crate::models::{Allocation, Curve, Point};

// Vertices closer than this are merged.
const SNAP: f64 = 1e-9;

/// A welfare region: its polygon and the polygon's area
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurplusRegion {
    /// The area of `geometry`, never negative
    pub size: f64,
    /// The boundary of the region, counter-clockwise, empty when the region has no area
    pub geometry: Vec<Point>,
}

impl SurplusRegion {
    /// A region with no area
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps a polygon, computing its area
    pub fn from_geometry(geometry: Vec<Point>) -> Self {
        if geometry.len() < 3 {
            return Self::empty();
        }
        Self {
            size: shoelace(&geometry).abs(),
            geometry,
        }
    }

    /// Whether the region has any area
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

/// The signed area of a polygon, positive when its vertices run counter-clockwise.
///
/// `½ Σ (xᵢ·yᵢ₊₁ − xᵢ₊₁·yᵢ)` over consecutive vertices, wrapping around at the end.
pub fn shoelace(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n).map(|i| points[i].cross(&points[(i + 1) % n])).sum();
    twice / 2.0
}

/// Joins a lower and an upper boundary, both traced left to right, into a region.
fn enclose(lower: Vec<Point>, upper: Vec<Point>) -> SurplusRegion {
    let mut vertices: Vec<Point> = Vec::with_capacity(lower.len() + upper.len() + 1);
    for point in upper
        .first()
        .into_iter()
        .chain(lower.iter())
        .chain(upper.iter().rev())
    {
        if vertices.last().is_none_or(|last| !last.approx_eq(point, SNAP)) {
            vertices.push(*point);
        }
    }
    while vertices.len() > 1 && vertices[0].approx_eq(&vertices[vertices.len() - 1], SNAP) {
        vertices.pop();
    }
    remove_collinear(&mut vertices);

    let region = SurplusRegion::from_geometry(vertices);
    if region.size <= SNAP {
        SurplusRegion::empty()
    } else {
        region
    }
}

// Staircases double back along flat edges; drop every vertex that sits on a
// straight line between its neighbours so the outline never overlaps itself.
fn remove_collinear(vertices: &mut Vec<Point>) {
    'scan: while vertices.len() >= 3 {
        let n = vertices.len();
        for i in 0..n {
            let a = vertices[(i + n - 1) % n];
            let b = vertices[i];
            let c = vertices[(i + 1) % n];
            let turn = (b.quantity - a.quantity) * (c.price - b.price)
                - (b.price - a.price) * (c.quantity - b.quantity);
            if turn.abs() <= SNAP {
                vertices.remove(i);
                continue 'scan;
            }
        }
        break;
    }
}

fn level(price: f64, from: f64, to: f64) -> Vec<Point> {
    vec![Point::new(from, price), Point::new(to, price)]
}

/// The buyers' gain: the area under `demand` and above the price they effectively pay,
/// from zero up to the quantity they receive.
pub fn consumer_surplus(demand: &Curve, alloc: &Allocation) -> SurplusRegion {
    let quantity = alloc.quantity.min(extent(demand));
    if !(quantity > 0.0) {
        return SurplusRegion::empty();
    }
    enclose(
        level(alloc.effective_price, 0.0, quantity),
        trace(demand, 0.0, quantity),
    )
}

/// The sellers' gain: the area above `supply` and under the price they effectively
/// receive, from zero up to the quantity they sell.
pub fn producer_surplus(supply: &Curve, alloc: &Allocation) -> SurplusRegion {
    let quantity = alloc.quantity.min(extent(supply));
    if !(quantity > 0.0) {
        return SurplusRegion::empty();
    }
    enclose(
        trace(supply, 0.0, quantity),
        level(alloc.effective_price, 0.0, quantity),
    )
}

/// The surplus lost between the undistorted quantity and the quantity a policy allows.
///
/// The region lies between the two curves. It works in either direction: a
/// binding floor (less is traded) or a subsidy (more is traded than is efficient).
pub fn dead_weight_loss(
    demand: &Curve,
    supply: &Curve,
    free_quantity: f64,
    policy_quantity: f64,
) -> SurplusRegion {
    let from = free_quantity.min(policy_quantity).max(0.0);
    let to = free_quantity
        .max(policy_quantity)
        .min(extent(demand))
        .min(extent(supply));
    if !(to > from) {
        return SurplusRegion::empty();
    }

    let middle = (from + to) / 2.0;
    match (demand.sample(middle), supply.sample(middle)) {
        (Some(d), Some(s)) if d >= s => enclose(trace(supply, from, to), trace(demand, from, to)),
        (Some(_), Some(_)) => enclose(trace(demand, from, to), trace(supply, from, to)),
        _ => SurplusRegion::empty(),
    }
}

/// The region between a curve and a horizontal price line over `[from, to]`.
///
/// Open-economy losses take this shape: consumption or production moves along a
/// curve while the undistorted benchmark is the flat world price.
pub fn band(curve: &Curve, price: f64, from: f64, to: f64) -> SurplusRegion {
    let (from, to) = (from.min(to).max(0.0), from.max(to).min(extent(curve)));
    if !(to > from) {
        return SurplusRegion::empty();
    }

    match curve.sample((from + to) / 2.0) {
        Some(p) if p >= price => enclose(level(price, from, to), trace(curve, from, to)),
        Some(_) => enclose(trace(curve, from, to), level(price, from, to)),
        None => SurplusRegion::empty(),
    }
}

/// An axis-aligned rectangle, used for tax revenue, tariff revenue and quota rent.
pub fn rectangle(from: f64, to: f64, low: f64, high: f64) -> SurplusRegion {
    let (from, to) = (from.min(to), from.max(to));
    let (low, high) = (low.min(high), low.max(high));
    enclose(level(low, from, to), level(high, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, LinearCurve, StepCurve};
    use approx::assert_relative_eq;

    fn demand() -> Curve {
        LinearCurve::demand(10.0, -1.0).unwrap().into()
    }

    fn supply() -> Curve {
        LinearCurve::supply(0.0, 1.0).unwrap().into()
    }

    #[test]
    fn textbook_consumer_surplus() {
        let region = consumer_surplus(&demand(), &Allocation::new(5.0, 5.0));
        assert_eq!(
            region.geometry,
            vec![
                Point::new(0.0, 10.0),
                Point::new(0.0, 5.0),
                Point::new(5.0, 5.0)
            ]
        );
        assert_eq!(region.size, 12.5);
    }

    #[test]
    fn textbook_producer_surplus() {
        let region = producer_surplus(&supply(), &Allocation::new(5.0, 5.0));
        assert_eq!(
            region.geometry,
            vec![
                Point::new(0.0, 5.0),
                Point::new(0.0, 0.0),
                Point::new(5.0, 5.0)
            ]
        );
        assert_eq!(region.size, 12.5);
    }

    #[test]
    fn regions_run_counter_clockwise() {
        let cs = consumer_surplus(&demand(), &Allocation::new(3.0, 7.0));
        let ps = producer_surplus(&supply(), &Allocation::new(3.0, 7.0));
        assert!(shoelace(&cs.geometry) > 0.0);
        assert!(shoelace(&ps.geometry) > 0.0);
        // A binding floor leaves a trapezoid for producers
        assert_eq!(ps.geometry.len(), 4);
        assert_relative_eq!(ps.size, 16.5);
        assert_relative_eq!(cs.size, 4.5);
    }

    #[test]
    fn zero_quantity_is_empty() {
        let region = consumer_surplus(&demand(), &Allocation::new(0.0, 5.0));
        assert!(region.is_empty());
        assert_eq!(region.size, 0.0);
    }

    #[test]
    fn dead_weight_triangle() {
        let region = dead_weight_loss(&demand(), &supply(), 5.0, 3.0);
        assert_eq!(
            region.geometry,
            vec![
                Point::new(3.0, 7.0),
                Point::new(3.0, 3.0),
                Point::new(5.0, 5.0)
            ]
        );
        assert_relative_eq!(region.size, 4.0);
    }

    #[test]
    fn dead_weight_overproduction() {
        // A subsidy pushes trade past the efficient quantity
        let region = dead_weight_loss(&demand(), &supply(), 5.0, 7.0);
        assert_relative_eq!(region.size, 4.0);
        assert!(shoelace(&region.geometry) > 0.0);
    }

    #[test]
    fn staircase_consumer_surplus() {
        let demand: Curve = StepCurve::new(Direction::Demand, vec![9.0, 8.0, 7.0, 6.0, 5.0])
            .unwrap()
            .into();
        let region = consumer_surplus(&demand, &Allocation::new(5.0, 5.0));
        // 4 + 3 + 2 + 1 + 0
        assert_relative_eq!(region.size, 10.0);
        assert!(shoelace(&region.geometry) > 0.0);
    }

    #[test]
    fn rectangle_orientation() {
        let region = rectangle(0.0, 4.0, 6.0, 3.0);
        assert_eq!(region.size, 12.0);
        assert_eq!(region.geometry[0], Point::new(0.0, 6.0));
        assert!(shoelace(&region.geometry) > 0.0);
        assert!(rectangle(1.0, 1.0, 0.0, 5.0).is_empty());
    }

    #[test]
    fn band_below_price() {
        // Supply below a world price of 4, between 2 and 3 units
        let region = band(&supply(), 4.0, 2.0, 3.0);
        assert_relative_eq!(region.size, 1.5);
        assert!(shoelace(&region.geometry) > 0.0);
    }
}
