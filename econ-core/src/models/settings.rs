/// Numeric knobs of the engine.
///
/// The defaults are what lessons use; a front end may layer overrides on top
/// (see the `econlab` configuration loader).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Settings {
    /// Differences smaller than this are treated as zero (parallel slopes, slack constraints)
    pub tolerance: f64,
    /// The number of samples used to discretise continuous cost curves
    pub samples: usize,
    /// The number of worker rows in a behaviour table when no spec fixes it
    pub max_workers: u32,
    /// The most rows a behaviour table, or samples a cost curve, may have
    pub max_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            samples: 200,
            max_workers: 10,
            max_rows: 10_000,
        }
    }
}
