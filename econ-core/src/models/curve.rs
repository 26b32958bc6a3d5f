//! Supply and demand curves.
//!
//! This module provides the two curve shapes the engine understands:
//! - [`LinearCurve`]: a continuous `price = intercept + slope·quantity` relationship
//! - [`StepCurve`]: a discrete schedule of per-unit reservation prices
//!
//! [`Curve`] wraps both so that every consumer has to handle each shape.

mod linear;
mod step;

pub use linear::*;
pub use step::*;

use std::fmt;

/// Which side of the market a curve belongs to.
///
/// Supply carries the mark `+1` and demand `-1`. The engine uses the direction to
/// decide which way a discrete schedule rations units and to refuse mixing sides
/// during aggregation; it never flips the sign of a slope on the caller's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Producers: more is offered as the price rises
    Supply,
    /// Consumers: more is bought as the price falls
    Demand,
}

impl Direction {
    /// The numeric mark of the direction: `+1` for supply, `-1` for demand
    pub fn sign(self) -> f64 {
        match self {
            Self::Supply => 1.0,
            Self::Demand => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supply => f.write_str("supply"),
            Self::Demand => f.write_str("demand"),
        }
    }
}

/// The shape of a curve, without its data. Mostly useful for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// A [`LinearCurve`]
    Continuous,
    /// A [`StepCurve`]
    Discrete,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuous => f.write_str("continuous"),
            Self::Discrete => f.write_str("discrete"),
        }
    }
}

// `schemars` does not follow serde's try_from/into, so the schema is taken from the DTOs.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "lowercase")
)]
#[derive(Clone, Debug, PartialEq)]
/// A price/quantity relationship for one side of a market.
pub enum Curve {
    /// A linear curve, `price = intercept + slope·quantity`
    Continuous(#[cfg_attr(feature = "schemars", schemars(with = "LinearCurveDto"))] LinearCurve),
    /// A stepwise curve of per-unit reservation prices
    Discrete(#[cfg_attr(feature = "schemars", schemars(with = "StepCurveDto"))] StepCurve),
}

impl From<LinearCurve> for Curve {
    fn from(value: LinearCurve) -> Self {
        Self::Continuous(value)
    }
}

impl From<StepCurve> for Curve {
    fn from(value: StepCurve) -> Self {
        Self::Discrete(value)
    }
}

/// Errors that can occur when constructing or transforming curves
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// Error when any coefficient or rate is NaN
    #[error("NaN value encountered")]
    NaN,
    /// Error when any coefficient or rate is infinite
    #[error("curve coefficients cannot be infinite")]
    Infinity,
    /// Error when a discrete curve has no units
    #[error("discrete curve has no rates")]
    Empty,
    /// Error when a discrete curve is asked to move sideways
    #[error("discrete curves cannot be shifted by {0} units of quantity")]
    DiscreteShift(f64),
}

pub(crate) fn check_finite(value: f64) -> Result<f64, CurveError> {
    if value.is_nan() {
        Err(CurveError::NaN)
    } else if value.is_infinite() {
        Err(CurveError::Infinity)
    } else {
        Ok(value)
    }
}

impl Curve {
    /// The shape of this curve
    pub fn kind(&self) -> CurveKind {
        match self {
            Self::Continuous(_) => CurveKind::Continuous,
            Self::Discrete(_) => CurveKind::Discrete,
        }
    }

    /// The side of the market this curve describes
    pub fn direction(&self) -> Direction {
        match self {
            Self::Continuous(curve) => curve.direction(),
            Self::Discrete(curve) => curve.direction(),
        }
    }

    /// Evaluates the reservation price at `quantity`.
    ///
    /// Continuous curves are evaluated directly. Discrete curves index the unit
    /// containing `quantity`, returning `None` outside of the schedule rather than
    /// panicking. Non-finite quantities always yield `None`.
    pub fn sample(&self, quantity: f64) -> Option<f64> {
        match self {
            Self::Continuous(curve) => {
                if quantity.is_finite() {
                    Some(curve.price_at(quantity))
                } else {
                    None
                }
            }
            Self::Discrete(curve) => curve.price_at(quantity),
        }
    }

    /// The (non-negative) quantity this side of the market trades at `price`.
    ///
    /// Returns `None` for a horizontal continuous curve, whose quantity is undetermined.
    pub fn quantity_at(&self, price: f64) -> Option<f64> {
        match self {
            Self::Continuous(curve) => curve.quantity_at(price).map(|q| q.max(0.0)),
            Self::Discrete(curve) => Some(curve.quantity_at(price)),
        }
    }

    /// Returns a new curve moved up by `vertical` and right by `horizontal`.
    ///
    /// A discrete schedule can only move vertically; any non-zero horizontal
    /// displacement is an error.
    pub fn shift(&self, vertical: f64, horizontal: f64) -> Result<Self, CurveError> {
        check_finite(vertical)?;
        check_finite(horizontal)?;
        match self {
            Self::Continuous(curve) => Ok(curve.shifted(vertical, horizontal).into()),
            Self::Discrete(curve) => {
                if horizontal == 0.0 {
                    Ok(curve.shifted(vertical).into())
                } else {
                    Err(CurveError::DiscreteShift(horizontal))
                }
            }
        }
    }
}
