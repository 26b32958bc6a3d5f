use super::{IOArgs, PathOrStd};
use clap::Subcommand;

mod schema;
pub use schema::SchemaKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a market or firm scenario and report the result
    Simulate {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Print the JSON schema of a document this tool reads or writes
    Schema {
        /// The document to describe
        #[arg(value_enum)]
        kind: SchemaKind,

        /// The output file ("-" implies stdout)
        #[arg(short, long, default_value = "-", value_parser = clap::value_parser!(PathOrStd))]
        output: PathOrStd,
    },
}
