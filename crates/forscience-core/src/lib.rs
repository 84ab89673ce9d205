//! ForScience Core - Simulated Flight Host
//!
//! A small host for the automation logic in `forscience-logic`: a vessel
//! built from parts, a research archive that values and records science,
//! and an antenna uplink that completes transmissions after a delay.
//!
//! # Architecture
//!
//! The vessel uses an Entity Component System (ECS) via `hecs`:
//! - **Entities**: Parts (pods, experiments, containers, antennas), crew
//! - **Components**: Pure data attached to entities (Part, ScienceModule, CrewMember, Antenna)
//! - **Engine**: Fixed-step loop that advances the uplink and ticks the session
//!
//! # Example
//!
//! ```rust,no_run
//! use forscience_core::prelude::*;
//! use forscience_logic::config::AutomationConfig;
//!
//! let mut engine = FlightEngine::new(VesselConfig::default(), AutomationConfig::default());
//!
//! loop {
//!     engine.update(1.0 / 50.0); // physics rate
//! }
//! ```

pub mod archive;
pub mod catalog;
pub mod components;
pub mod engine;
pub mod generation;
pub mod uplink;
pub mod vessel;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::archive::ResearchArchive;
    pub use crate::catalog::{Body, StockExperiment};
    pub use crate::components::*;
    pub use crate::engine::FlightEngine;
    pub use crate::generation::VesselConfig;
    pub use crate::vessel::SimVessel;
}
