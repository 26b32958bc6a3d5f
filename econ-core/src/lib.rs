#![warn(missing_docs)]
//! Value types for the market simulation engine.
//!
//! Everything in this crate is plain data: curves, policy instruments, market
//! configurations and firm specifications. The computations that consume these
//! types live in `econ-solver`, which keeps this crate free of any numerical
//! policy beyond validation.

/// Core domain models for the market simulation.
///
/// These are immutable value objects. A lesson configuration is translated into
/// a [`models::MarketConfig`] (or a set of [`models::RateOfChange`] specs for a
/// firm) once per change, handed to the solver, and discarded afterwards.
pub mod models;
