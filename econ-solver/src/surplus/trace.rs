use crate::models::{Curve, Point};

/// How far along the quantity axis a curve is defined
pub(crate) fn extent(curve: &Curve) -> f64 {
    match curve {
        Curve::Continuous(_) => f64::INFINITY,
        Curve::Discrete(steps) => steps.len() as f64,
    }
}

/// The vertices of `curve` between quantities `from` and `to`, left to right.
///
/// A linear curve needs only its two end points. A discrete schedule becomes a
/// staircase with a flat tread for every unit, clipped to `[from, to]` and to
/// the end of the schedule.
pub(crate) fn trace(curve: &Curve, from: f64, to: f64) -> Vec<Point> {
    match curve {
        Curve::Continuous(linear) => vec![
            Point::new(from, linear.price_at(from)),
            Point::new(to, linear.price_at(to)),
        ],
        Curve::Discrete(steps) => {
            let to = to.min(steps.len() as f64);
            let mut points = Vec::new();
            let mut unit = from.max(0.0).floor() as usize;
            while let Some(rate) = steps.rate(unit) {
                let left = (unit as f64).max(from);
                let right = ((unit + 1) as f64).min(to);
                if left >= right {
                    break;
                }
                points.push(Point::new(left, rate));
                points.push(Point::new(right, rate));
                unit += 1;
            }
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, LinearCurve, StepCurve};

    #[test]
    fn linear_endpoints() {
        let curve: Curve = LinearCurve::supply(1.0, 2.0).unwrap().into();
        assert_eq!(
            trace(&curve, 1.0, 3.0),
            vec![Point::new(1.0, 3.0), Point::new(3.0, 7.0)]
        );
    }

    #[test]
    fn clipped_staircase() {
        let curve: Curve = StepCurve::new(Direction::Supply, vec![1.0, 2.0, 3.0])
            .unwrap()
            .into();
        assert_eq!(
            trace(&curve, 0.5, 5.0),
            vec![
                Point::new(0.5, 1.0),
                Point::new(1.0, 1.0),
                Point::new(1.0, 2.0),
                Point::new(2.0, 2.0),
                Point::new(2.0, 3.0),
                Point::new(3.0, 3.0),
            ]
        );
        assert_eq!(extent(&curve), 3.0);
    }
}
