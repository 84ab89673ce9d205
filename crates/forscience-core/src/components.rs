//! Components attached to vessel entities.

use forscience_logic::data::{DataUnit, HolderKind, ScienceContainer};
use forscience_logic::host::ExperimentSource;
use forscience_logic::modules::{ContainerPart, ExperimentPart};
use forscience_logic::subject::SubjectId;
use serde::{Deserialize, Serialize};

/// A part on the vessel. `order` is the enumeration order; the root part is 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub order: u32,
}

impl Part {
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        Self {
            name: name.into(),
            order,
        }
    }
}

/// Science-capable module on a part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScienceModule {
    Experiment(ExperimentPart),
    Container(ContainerPart),
}

impl ScienceModule {
    fn inner(&self) -> &dyn ScienceContainer {
        match self {
            ScienceModule::Experiment(e) => e,
            ScienceModule::Container(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ScienceContainer {
        match self {
            ScienceModule::Experiment(e) => e,
            ScienceModule::Container(c) => c,
        }
    }
}

impl ScienceContainer for ScienceModule {
    fn kind(&self) -> HolderKind {
        self.inner().kind()
    }

    fn data(&self) -> &[DataUnit] {
        self.inner().data()
    }

    fn store(&mut self, unit: DataUnit) {
        self.inner_mut().store(unit)
    }

    fn dump(&mut self, subject: &SubjectId) -> Option<DataUnit> {
        self.inner_mut().dump(subject)
    }

    fn capacity(&self) -> Option<usize> {
        self.inner().capacity()
    }

    fn as_experiment(&self) -> Option<&dyn ExperimentSource> {
        self.inner().as_experiment()
    }

    fn as_experiment_mut(&mut self) -> Option<&mut dyn ExperimentSource> {
        self.inner_mut().as_experiment_mut()
    }
}

/// A crew member aboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    /// Experience trait title, e.g. `Scientist`.
    pub specialty: String,
}

/// A communication antenna.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Antenna {
    /// Data units per second.
    pub bandwidth: f32,
}
