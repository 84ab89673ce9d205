//! Traits the host game implements.
//!
//! [`ScienceHost`] covers game-wide services (mode, research archive,
//! progression); [`Vessel`] covers one vessel (situation, crew, parts).

use crate::context::{Context, GameMode};
use crate::data::{DataUnit, HolderKind, ScienceContainer};
use crate::subject::{ExperimentDef, SubjectId};

/// Game-wide services consulted during evaluation.
pub trait ScienceHost {
    fn game_mode(&self) -> GameMode;

    /// Global science gain multiplier from game settings.
    fn gain_multiplier(&self) -> f32;

    /// Science `data_amount` of `subject` is worth at its present saturation.
    fn science_value(&self, subject: &SubjectId, data_amount: f32) -> f32;

    /// Science one more unit would be worth after the current one is credited.
    fn next_science_value(&self, subject: &SubjectId, data_amount: f32) -> f32;

    /// Progression gate (tech tree, facility upgrades).
    fn is_unlocked(&self, experiment: &ExperimentDef) -> bool;

    /// Whether the experiment can run in this situation, at this body and
    /// with this atmosphere.
    fn is_available(&self, experiment: &ExperimentDef, context: &Context) -> bool;
}

/// An experiment part that can be commanded to produce data.
pub trait ExperimentSource {
    fn definition(&self) -> &ExperimentDef;

    fn transmit_scalar(&self) -> f32;

    fn is_rerunnable(&self) -> bool;

    /// Whether the part holds data that has not been collected yet.
    fn holds_data(&self) -> bool;

    /// Run the experiment without surfacing a report. Must not block.
    fn deploy(&mut self, subject: SubjectId, title: String);
}

/// Accepts data for transmission. Completion is reported later through a
/// [`ReceiptSender`](crate::transmission::ReceiptSender).
pub trait Transmitter {
    fn transmit(&mut self, unit: DataUnit);
}

/// One vessel as seen by the automation.
pub trait Vessel {
    fn context(&self) -> Context;

    /// Whether any crew member carries the given trait.
    fn has_crew_trait(&self, trait_name: &str) -> bool;

    /// Borrow every data holder and the best transmitter for this tick.
    fn science_parts(&mut self) -> ScienceParts<'_>;
}

/// Mutable view of a vessel's data holders for one tick.
pub struct ScienceParts<'a> {
    /// All holders in stable enumeration order.
    pub holders: Vec<&'a mut dyn ScienceContainer>,
    /// Index of the designated sink, fixed by [`ScienceParts::new`].
    sink: Option<usize>,
    pub transmitter: Option<&'a mut dyn Transmitter>,
}

impl<'a> ScienceParts<'a> {
    pub fn new(
        holders: Vec<&'a mut dyn ScienceContainer>,
        transmitter: Option<&'a mut dyn Transmitter>,
    ) -> Self {
        let sink = holders
            .iter()
            .position(|h| h.kind() == HolderKind::Container);
        Self {
            holders,
            sink,
            transmitter,
        }
    }

    /// Position of the sink in `holders`: the first container enumerated.
    pub fn sink_index(&self) -> Option<usize> {
        self.sink.filter(|&idx| idx < self.holders.len())
    }

    pub fn sink(&self) -> Option<&dyn ScienceContainer> {
        self.sink_index().map(|idx| &*self.holders[idx])
    }

    /// Units held anywhere on the vessel.
    pub fn total_units(&self) -> usize {
        self.holders.iter().map(|h| h.count()).sum()
    }
}
