//! Experiment eligibility.
//!
//! An ordered short-circuit chain: the first matching condition is the skip
//! reason. Only an experiment that passes every check is run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::data::ScienceContainer;
use crate::host::{ExperimentSource, ScienceHost};
use crate::ledger::ScienceLedger;
use crate::subject::subject_for;
use crate::value::ValueModel;

/// Why an experiment was not run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The experiment still holds data that has not been collected.
    HoldsData,
    /// The sink already holds data for this subject.
    AlreadyHeld,
    /// Progression has not unlocked the experiment.
    Locked,
    /// Not rerunnable and nobody aboard can reset it.
    NotRerunnable,
    /// Not valid for this situation, body or atmosphere.
    Unavailable,
    /// Marginal value below the materiality threshold.
    LowValue { value: f32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::HoldsData => f.write_str("experiment already has data"),
            SkipReason::AlreadyHeld => f.write_str("already held"),
            SkipReason::Locked => f.write_str("not unlocked"),
            SkipReason::NotRerunnable => f.write_str("not rerunnable"),
            SkipReason::Unavailable => f.write_str("not available in this situation"),
            SkipReason::LowValue { value } => write!(f, "no more science available ({:.3})", value),
        }
    }
}

/// Outcome of evaluating one experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    Run,
    Skip(SkipReason),
}

impl Decision {
    pub fn is_run(&self) -> bool {
        matches!(self, Decision::Run)
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Decision::Run => None,
            Decision::Skip(reason) => Some(*reason),
        }
    }
}

/// Everything the chain consults besides the experiment itself.
pub struct Evaluator<'a> {
    pub context: &'a Context,
    pub host: &'a dyn ScienceHost,
    pub ledger: &'a ScienceLedger,
    /// Designated sink, `None` when the vessel has no container.
    pub sink: Option<&'a dyn ScienceContainer>,
    /// Whether a crew member can reset non-rerunnable experiments.
    pub crew_capable: bool,
    pub materiality_threshold: f32,
}

impl<'a> Evaluator<'a> {
    pub fn evaluate(&self, experiment: &dyn ExperimentSource) -> Decision {
        let definition = experiment.definition();
        let subject = subject_for(definition, self.context);

        if experiment.holds_data() {
            return Decision::Skip(SkipReason::HoldsData);
        }
        if self.sink.is_some_and(|sink| sink.has_data(&subject)) {
            return Decision::Skip(SkipReason::AlreadyHeld);
        }
        if !self.host.is_unlocked(definition) {
            return Decision::Skip(SkipReason::Locked);
        }
        if !experiment.is_rerunnable() && !self.crew_capable {
            return Decision::Skip(SkipReason::NotRerunnable);
        }
        if !self.host.is_available(definition, self.context) {
            return Decision::Skip(SkipReason::Unavailable);
        }

        let value = ValueModel::new(self.host).computed_value(
            &subject,
            definition.data_amount(),
            self.ledger,
        );
        if value < self.materiality_threshold {
            return Decision::Skip(SkipReason::LowValue { value });
        }

        Decision::Run
    }
}
