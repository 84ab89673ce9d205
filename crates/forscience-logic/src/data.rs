//! Data units and the capability shared by everything that holds them.
//!
//! Experiments and pure containers are treated the same way by consolidation
//! and transmission: both implement [`ScienceContainer`]. Experiments expose
//! their extra capabilities through [`ScienceContainer::as_experiment`].

use serde::{Deserialize, Serialize};

use crate::host::ExperimentSource;
use crate::subject::SubjectId;

/// One collected instance of data for a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataUnit {
    pub subject: SubjectId,
    pub amount: f32,
    /// Fraction of the science value recovered by transmitting instead of
    /// returning the data.
    pub transmit_value: f32,
    pub title: String,
}

impl DataUnit {
    pub fn new(
        subject: SubjectId,
        amount: f32,
        transmit_value: f32,
        title: impl Into<String>,
    ) -> Self {
        Self {
            subject,
            amount,
            transmit_value,
            title: title.into(),
        }
    }
}

/// Which variant of holder a container is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HolderKind {
    /// An experiment holding the data it produced.
    Experiment,
    /// A storage container. Only these count as resident for the ledger.
    Container,
}

/// Something that holds zero or more data units.
pub trait ScienceContainer {
    fn kind(&self) -> HolderKind;

    /// Units currently held, in storage order.
    fn data(&self) -> &[DataUnit];

    /// Accept an incoming unit.
    fn store(&mut self, unit: DataUnit);

    /// Remove and return the first unit for `subject`.
    fn dump(&mut self, subject: &SubjectId) -> Option<DataUnit>;

    /// Maximum number of units, `None` when unbounded.
    fn capacity(&self) -> Option<usize> {
        None
    }

    fn count(&self) -> usize {
        self.data().len()
    }

    fn has_room(&self) -> bool {
        self.capacity().map_or(true, |cap| self.count() < cap)
    }

    /// Whether an equivalent unit (same subject) is already held.
    fn has_data(&self, subject: &SubjectId) -> bool {
        self.data().iter().any(|unit| &unit.subject == subject)
    }

    fn as_experiment(&self) -> Option<&dyn ExperimentSource> {
        None
    }

    fn as_experiment_mut(&mut self) -> Option<&mut dyn ExperimentSource> {
        None
    }
}
