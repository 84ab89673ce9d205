//! Stock implementations of the two holder variants.

use serde::{Deserialize, Serialize};

use crate::data::{DataUnit, HolderKind, ScienceContainer};
use crate::host::ExperimentSource;
use crate::subject::{ExperimentDef, SubjectId};

/// A part carrying one experiment and the data it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentPart {
    pub definition: ExperimentDef,
    pub transmit_scalar: f32,
    pub rerunnable: bool,
    data: Vec<DataUnit>,
}

impl ExperimentPart {
    pub fn new(definition: ExperimentDef, transmit_scalar: f32, rerunnable: bool) -> Self {
        Self {
            definition,
            transmit_scalar,
            rerunnable,
            data: Vec::new(),
        }
    }
}

impl ScienceContainer for ExperimentPart {
    fn kind(&self) -> HolderKind {
        HolderKind::Experiment
    }

    fn data(&self) -> &[DataUnit] {
        &self.data
    }

    fn store(&mut self, unit: DataUnit) {
        self.data.push(unit);
    }

    fn dump(&mut self, subject: &SubjectId) -> Option<DataUnit> {
        let idx = self.data.iter().position(|u| &u.subject == subject)?;
        Some(self.data.remove(idx))
    }

    fn as_experiment(&self) -> Option<&dyn ExperimentSource> {
        Some(self)
    }

    fn as_experiment_mut(&mut self) -> Option<&mut dyn ExperimentSource> {
        Some(self)
    }
}

impl ExperimentSource for ExperimentPart {
    fn definition(&self) -> &ExperimentDef {
        &self.definition
    }

    fn transmit_scalar(&self) -> f32 {
        self.transmit_scalar
    }

    fn is_rerunnable(&self) -> bool {
        self.rerunnable
    }

    fn holds_data(&self) -> bool {
        !self.data.is_empty()
    }

    fn deploy(&mut self, subject: SubjectId, title: String) {
        let unit = DataUnit::new(
            subject,
            self.definition.data_amount(),
            self.transmit_scalar,
            title,
        );
        self.data.push(unit);
    }
}

/// A pure storage container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerPart {
    pub capacity: Option<usize>,
    data: Vec<DataUnit>,
}

impl ContainerPart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            data: Vec::new(),
        }
    }
}

impl ScienceContainer for ContainerPart {
    fn kind(&self) -> HolderKind {
        HolderKind::Container
    }

    fn data(&self) -> &[DataUnit] {
        &self.data
    }

    fn store(&mut self, unit: DataUnit) {
        self.data.push(unit);
    }

    fn dump(&mut self, subject: &SubjectId) -> Option<DataUnit> {
        let idx = self.data.iter().position(|u| &u.subject == subject)?;
        Some(self.data.remove(idx))
    }

    fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Situation;

    fn goo() -> ExperimentDef {
        ExperimentDef {
            id: "mysteryGoo".into(),
            title: "Mystery Goo Observation".into(),
            base_value: 10.0,
            data_scale: 1.0,
            situation_mask: Situation::Landed.bit(),
            biome_mask: 0,
            requires_atmosphere: false,
        }
    }

    #[test]
    fn test_deploy_produces_unit() {
        let mut part = ExperimentPart::new(goo(), 0.3, false);
        assert!(!part.holds_data());
        part.deploy(SubjectId::new("mysteryGoo@KerbinSrfLanded"), "Goo".into());
        assert!(part.holds_data());
        let unit = &part.data()[0];
        assert!((unit.amount - 10.0).abs() < 1e-6);
        assert!((unit.transmit_value - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_dump_removes_one_unit() {
        let mut container = ContainerPart::new();
        let subject = SubjectId::new("x");
        container.store(DataUnit::new(subject.clone(), 1.0, 1.0, "x"));
        container.store(DataUnit::new(subject.clone(), 1.0, 1.0, "x"));
        assert!(container.dump(&subject).is_some());
        assert_eq!(container.count(), 1);
        assert!(container.dump(&SubjectId::new("y")).is_none());
    }

    #[test]
    fn test_capacity_limits_room() {
        let mut container = ContainerPart::with_capacity(1);
        assert!(container.has_room());
        container.store(DataUnit::new(SubjectId::new("x"), 1.0, 1.0, "x"));
        assert!(!container.has_room());
        assert!(ContainerPart::new().has_room());
    }

    #[test]
    fn test_experiment_exposes_capability() {
        let mut part = ExperimentPart::new(goo(), 0.3, false);
        assert!(part.as_experiment().is_some());
        assert!(part.as_experiment_mut().is_some());
        assert!(ContainerPart::new().as_experiment().is_none());
    }
}
