/// What a [`RateOfChange::Curve`] is evaluated against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Param {
    /// The number of workers employed
    #[default]
    Worker,
    /// The cumulative number of units produced
    Units,
}

/// How one column of a firm's behaviour table changes from row to row.
///
/// The same shape describes output per worker, cost and price; the table builder
/// decides how each variant is accumulated for each column.
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema), schemars(untagged))]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
#[derive(Clone, Debug, PartialEq)]
pub enum RateOfChange {
    /// A constant marginal rate
    Scalar(f64),
    /// Explicit running totals, indexed by worker count (index 0 is the zero-worker row)
    Cumulative(Vec<f64>),
    /// A rate that is a linear function of workers or units
    Curve {
        /// The rate at zero
        intercept: f64,
        /// The change in rate per worker (or per unit)
        slope: f64,
        /// What the rate is a function of
        param: Param,
    },
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RateCurveDto {
    intercept: f64,
    slope: f64,
    #[serde(default)]
    param: Param,
}

// A bare number, an array or a map: the shape alone decides the variant.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RateOfChange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_untagged::UntaggedEnumVisitor::new()
            .f64(|value| Ok(RateOfChange::Scalar(value)))
            .i64(|value| Ok(RateOfChange::Scalar(value as f64)))
            .u64(|value| Ok(RateOfChange::Scalar(value as f64)))
            .seq(|seq| seq.deserialize().map(RateOfChange::Cumulative))
            .map(|map| {
                map.deserialize().map(
                    |RateCurveDto {
                         intercept,
                         slope,
                         param,
                     }| RateOfChange::Curve {
                        intercept,
                        slope,
                        param,
                    },
                )
            })
            .deserialize(deserializer)
    }
}

impl RateOfChange {
    /// A rate that grows linearly with the worker count
    pub fn per_worker(intercept: f64, slope: f64) -> Self {
        Self::Curve {
            intercept,
            slope,
            param: Param::Worker,
        }
    }

    /// A rate that grows linearly with cumulative units
    pub fn per_unit(intercept: f64, slope: f64) -> Self {
        Self::Curve {
            intercept,
            slope,
            param: Param::Units,
        }
    }

    /// The length of an explicit cumulative schedule, if this is one
    pub fn cumulative_len(&self) -> Option<usize> {
        match self {
            Self::Cumulative(values) => Some(values.len()),
            Self::Scalar(_) | Self::Curve { .. } => None,
        }
    }

    /// Whether every number in the spec is finite
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(value) => value.is_finite(),
            Self::Cumulative(values) => values.iter().all(|value| value.is_finite()),
            Self::Curve {
                intercept, slope, ..
            } => intercept.is_finite() && slope.is_finite(),
        }
    }
}
