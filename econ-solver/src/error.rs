use crate::models::{CurveError, CurveKind, Direction};

/// Errors that can occur when summing curves
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// Error when there is nothing to sum
    #[error("no curves to aggregate")]
    Empty,
    /// Error when a linear curve is horizontal and its quantity cannot be solved for
    #[error("curve {index} has a zero slope and cannot be summed horizontally")]
    DegenerateCurve {
        /// Position of the offending curve in the input
        index: usize,
    },
    /// Error when the inverse slopes sum to zero and the aggregate would be vertical
    #[error("inverse slopes cancel out; the aggregate curve is vertical")]
    CancellingSlopes,
    /// Error when discrete schedules have different numbers of units
    #[error("expected a schedule of {expected} units, found {found}")]
    ShapeMismatch {
        /// The length of the first schedule
        expected: usize,
        /// The length of the offending schedule
        found: usize,
    },
    /// Error when supply and demand curves are mixed
    #[error("cannot aggregate {found} with {expected}")]
    DirectionMismatch {
        /// The direction of the first curve
        expected: Direction,
        /// The direction of the offending curve
        found: Direction,
    },
    /// Error when continuous and discrete curves are mixed
    #[error("cannot aggregate continuous and discrete curves together")]
    MixedKinds,
    /// Error when the aggregate coefficients are not representable
    #[error("aggregate curve is invalid: {0}")]
    Curve(#[from] CurveError),
}

/// Errors that can occur when solving for an equilibrium.
///
/// Collectively these are the "no intersection" outcomes: the curves do not
/// cross anywhere the solver can see.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum EquilibriumError {
    /// Error when two linear curves have the same slope
    #[error("supply and demand are parallel")]
    Parallel,
    /// Error when excess supply never changes sign within the schedules
    #[error("supply and demand do not cross within {units} units")]
    NoCrossing {
        /// The number of units inspected
        units: usize,
    },
    /// Error when a continuous curve meets a discrete one
    #[error("cannot intersect {demand} demand with {supply} supply")]
    UnsupportedCombination {
        /// The shape of the demand curve
        demand: CurveKind,
        /// The shape of the supply curve
        supply: CurveKind,
    },
    /// Error when a curve is passed in the other side's position
    #[error("expected a {expected} curve, found a {found} curve")]
    WrongSide {
        /// The direction required in this position
        expected: Direction,
        /// The direction of the curve provided
        found: Direction,
    },
}

/// Errors that can occur when applying policy instruments
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// Error when the instruments describe something the resolver does not model
    #[error("unhandled policy combination: {reason}")]
    UnhandledPolicyCombination {
        /// What the resolver could not make sense of
        reason: String,
    },
    /// Error when the (shifted) curves have no equilibrium
    #[error("no intersection: {0}")]
    NoIntersection(#[from] EquilibriumError),
}

impl PolicyError {
    pub(crate) fn unhandled(reason: impl Into<String>) -> Self {
        Self::UnhandledPolicyCombination {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur when building a firm behaviour table
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Error when a cumulative schedule has no entries
    #[error("the {column} schedule is empty")]
    Empty {
        /// The column the schedule feeds
        column: &'static str,
    },
    /// Error when a cumulative schedule has fewer entries than the table has rows
    #[error("the {column} schedule has {found} entries but the table needs {expected}")]
    ShapeMismatch {
        /// The column the schedule feeds
        column: &'static str,
        /// The number of rows in the table
        expected: usize,
        /// The number of entries provided
        found: usize,
    },
    /// Error when a specification contains NaN or infinity
    #[error("the {column} specification is not finite")]
    NonFinite {
        /// The offending column
        column: &'static str,
    },
    /// Error when more rows (or samples) are asked for than the settings allow
    #[error("{requested} rows requested but at most {limit} are allowed")]
    TooManyRows {
        /// The number of rows asked for
        requested: usize,
        /// The configured ceiling
        limit: usize,
    },
}

/// Any failure of the engine
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Error from aggregating curves
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    /// Error from solving an equilibrium
    #[error("no intersection: {0}")]
    NoIntersection(#[from] EquilibriumError),
    /// Error from applying policy
    #[error(transparent)]
    Policy(#[from] PolicyError),
    /// Error from building a behaviour table
    #[error(transparent)]
    Table(#[from] TableError),
    /// Error from constructing a curve
    #[error("invalid curve: {0}")]
    Curve(#[from] CurveError),
}
