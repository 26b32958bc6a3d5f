#![warn(missing_docs)]
//! The market simulation engine.
//!
//! Every function here is a pure transform: immutable inputs from `econ-core`
//! go in, a freshly allocated result comes out. The pipeline for a market is
//! [`aggregate`] → [`equilibrium`] → [`resolve`] → surplus geometry, wrapped up
//! by [`simulate`] into a [`Model`]. Firm behaviour tables are an independent
//! pipeline in [`firm`].

pub use econ_core::models;

mod aggregate;
pub use aggregate::{aggregate, sum_discrete, sum_horizontal};

mod equilibrium;
pub use equilibrium::{Equilibrium, equilibrium, equilibrium_within};

mod error;
pub use error::*;

pub mod firm;

mod model;
pub use model::{Engine, MarketView, Model, Side, simulate};

mod policy;
pub use policy::{Binding, PolicyOutcome, effective_curves, resolve, resolve_within};

mod surplus;
pub use surplus::{
    SurplusRegion, band, consumer_surplus, dead_weight_loss, producer_surplus, rectangle,
    shoelace,
};

/// Scenario files: the serialized inputs and outputs of the engine.
#[cfg(feature = "io")]
pub mod io;
