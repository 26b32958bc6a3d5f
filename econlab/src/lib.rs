use clap::Parser;
use econ_solver::Engine;
use econ_solver::io::Scenario;
use std::io::Write as _;
use std::path::PathBuf;
use tracing::{Level, event};

mod io;
pub use io::*;

mod commands;
pub use commands::*;

mod config;
pub use config::AppConfig;

// The top-level arguments: the configuration shared by all subcommands, and which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "ECON_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Simulate { io } => {
                let AppConfig { solver } = AppConfig::load(self.config.as_deref())?;
                event!(Level::DEBUG, ?solver, "loaded configuration");
                let engine = Engine::new(solver);

                let scenario = serde_json::from_reader::<_, Scenario>(io.read()?)?;
                let report = scenario.evaluate(&engine)?;

                let mut output = io.write()?;
                serde_json::to_writer_pretty(&mut output, &report)?;
                writeln!(output)?;
                output.flush()?;
            }
            Commands::Schema { kind, output } => {
                let mut output = output.writer()?;
                serde_json::to_writer_pretty(&mut output, &kind.schema())?;
                writeln!(output)?;
                output.flush()?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Config file {} does not exist", .0.display())]
    MissingConfig(PathBuf),
}
