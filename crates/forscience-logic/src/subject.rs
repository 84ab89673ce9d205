//! Experiment definitions and canonical subject identity.
//!
//! Every place that needs to know "which piece of knowledge would this
//! experiment produce here" goes through [`subject_for`]. Eligibility, the
//! value model and the ledger all key on the id it returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::{Context, Situation};

/// Static description of an experiment, shared by every part that carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDef {
    /// Stable experiment id, e.g. `temperatureScan`.
    pub id: String,
    /// Display title, e.g. `Temperature Scan`.
    pub title: String,
    pub base_value: f32,
    pub data_scale: f32,
    /// Situations the experiment can run in (see [`Situation::bit`]).
    pub situation_mask: u8,
    /// Situations in which the biome is part of the subject.
    pub biome_mask: u8,
    /// Experiment only works inside an atmosphere or on a body that has one.
    #[serde(default)]
    pub requires_atmosphere: bool,
}

impl ExperimentDef {
    /// Amount of data one run produces.
    pub fn data_amount(&self) -> f32 {
        self.base_value * self.data_scale
    }

    pub fn is_available_while(&self, situation: Situation, body_has_atmosphere: bool) -> bool {
        if self.situation_mask & situation.bit() == 0 {
            return false;
        }
        !self.requires_atmosphere || body_has_atmosphere
    }

    pub fn biome_relevant_while(&self, situation: Situation) -> bool {
        self.biome_mask & situation.bit() != 0
    }
}

/// Canonical identity of a piece of science knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Biome string as it participates in the subject, empty when irrelevant.
fn subject_biome<'a>(experiment: &ExperimentDef, context: &'a Context) -> &'a str {
    if experiment.biome_relevant_while(context.situation) {
        &context.biome
    } else {
        ""
    }
}

/// Derive the subject an experiment would produce in `context`.
///
/// Format: `<experiment>@<body><situation tag><biome>`, with spaces removed
/// from the biome. Pure: same inputs always give the same id.
pub fn subject_for(experiment: &ExperimentDef, context: &Context) -> SubjectId {
    let biome: String = subject_biome(experiment, context)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    SubjectId(format!(
        "{}@{}{}{}",
        experiment.id,
        context.body,
        context.situation.tag(),
        biome
    ))
}

/// Human-readable title for the subject, used as the data unit's name.
pub fn subject_title(experiment: &ExperimentDef, context: &Context) -> String {
    let biome = subject_biome(experiment, context);
    if biome.is_empty() {
        format!(
            "{} while {} {}",
            experiment.title,
            context.situation.phrase(),
            context.body
        )
    } else {
        format!(
            "{} while {} {} {}",
            experiment.title,
            context.situation.phrase(),
            context.body,
            biome
        )
    }
}
