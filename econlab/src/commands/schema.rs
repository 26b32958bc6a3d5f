use crate::AppConfig;
use econ_solver::io::{Report, Scenario};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemaKind {
    /// The scenario accepted by `simulate`
    Scenario,
    /// The report written by `simulate`
    Report,
    /// The configuration file
    Config,
}

impl SchemaKind {
    pub fn schema(self) -> schemars::Schema {
        match self {
            Self::Scenario => schemars::schema_for!(Scenario),
            Self::Report => schemars::schema_for!(Report),
            Self::Config => schemars::schema_for!(AppConfig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_schema_names_both_kinds() {
        let schema = serde_json::to_string(&SchemaKind::Scenario.schema()).unwrap();
        assert!(schema.contains("market"));
        assert!(schema.contains("firm"));
    }
}
