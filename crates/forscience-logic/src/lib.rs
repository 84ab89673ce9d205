//! Pure science automation logic for ForScience.
//!
//! This crate decides, on every scheduling tick, which experiments aboard a
//! vessel to run, what their data is worth once duplicates are taken into
//! account, how to consolidate collected data into one container, and which
//! data to hand to a transmitter without sending the same subject twice.
//! The host game (parts, physics, research archive, antennas) is reached only
//! through the traits in [`host`] and [`data`], so everything here is
//! unit-testable without a running game.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Automation thresholds and game-mode gating, loaded from JSON |
//! | [`consolidation`] | Moves scattered data into the designated sink container |
//! | [`context`] | Vessel situation snapshot, situation classes, game modes |
//! | [`data`] | Data units and the container capability shared by all holders |
//! | [`eligibility`] | Ordered run/skip decision chain for one experiment |
//! | [`host`] | Traits the host implements: research services and vessel parts |
//! | [`ledger`] | Per-subject resident and in-flight counts |
//! | [`modules`] | Stock experiment and container part implementations |
//! | [`session`] | Per-vessel session: toggle, tracker, ledger, receipt inbox, tick |
//! | [`subject`] | Experiment definitions and canonical subject identity |
//! | [`tracker`] | Situation change detection between ticks |
//! | [`transmission`] | Transmission queueing and completion receipts |
//! | [`value`] | Science value with duplicate decay |

pub mod config;
pub mod consolidation;
pub mod context;
pub mod data;
pub mod eligibility;
pub mod host;
pub mod ledger;
pub mod modules;
pub mod session;
pub mod subject;
pub mod tracker;
pub mod transmission;
pub mod value;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::{AutomationConfig, ConfigError};
    pub use crate::context::{Context, GameMode, Situation, VehicleId};
    pub use crate::data::{DataUnit, HolderKind, ScienceContainer};
    pub use crate::eligibility::{Decision, SkipReason};
    pub use crate::host::{ExperimentSource, ScienceHost, ScienceParts, Transmitter, Vessel};
    pub use crate::ledger::{ScienceLedger, SubjectCounts};
    pub use crate::modules::{ContainerPart, ExperimentPart};
    pub use crate::session::{ScienceSession, TickReport};
    pub use crate::subject::{subject_for, ExperimentDef, SubjectId};
    pub use crate::transmission::{Receipt, ReceiptSender};
}
