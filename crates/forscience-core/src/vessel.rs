//! Simulated vessel - an ECS world of parts and crew.

use forscience_logic::context::{Context, Situation, VehicleId};
use forscience_logic::data::{HolderKind, ScienceContainer};
use forscience_logic::host::{ScienceParts, Transmitter, Vessel};
use forscience_logic::modules::{ContainerPart, ExperimentPart};
use forscience_logic::subject::ExperimentDef;
use hecs::{Entity, World};

use crate::catalog::StockExperiment;
use crate::components::{Antenna, CrewMember, Part, ScienceModule};
use crate::uplink::Uplink;

/// A vessel in flight.
pub struct SimVessel {
    pub id: VehicleId,
    pub name: String,
    /// Parts and crew
    pub world: World,
    pub body: String,
    pub situation: Situation,
    pub biome: String,
    /// Best transmitter aboard, rebuilt when antennas change
    pub uplink: Option<Uplink>,
    next_order: u32,
}

impl SimVessel {
    pub fn new(id: VehicleId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            world: World::new(),
            body: "Kerbin".to_string(),
            situation: Situation::Landed,
            biome: "Launch Pad".to_string(),
            uplink: None,
            next_order: 0,
        }
    }

    fn next_part(&mut self, name: &str) -> Part {
        let part = Part::new(name, self.next_order);
        self.next_order += 1;
        part
    }

    pub fn add_container(&mut self, name: &str, capacity: Option<usize>) -> Entity {
        let part = self.next_part(name);
        let container = match capacity {
            Some(cap) => ContainerPart::with_capacity(cap),
            None => ContainerPart::new(),
        };
        self.world.spawn((part, ScienceModule::Container(container)))
    }

    pub fn add_experiment(&mut self, stock: &StockExperiment) -> Entity {
        let part = self.next_part(&stock.definition.title);
        let experiment = ExperimentPart::new(
            stock.definition.clone(),
            stock.transmit_scalar,
            stock.rerunnable,
        );
        self.world.spawn((part, ScienceModule::Experiment(experiment)))
    }

    pub fn add_antenna(&mut self, name: &str, bandwidth: f32) -> Entity {
        let part = self.next_part(name);
        let entity = self.world.spawn((part, Antenna { bandwidth }));
        self.refresh_uplink();
        entity
    }

    pub fn add_crew(&mut self, name: &str, specialty: &str) -> Entity {
        self.world.spawn((CrewMember {
            name: name.to_string(),
            specialty: specialty.to_string(),
        },))
    }

    /// Detach a part (staging, decoupling). Data it held is lost with it.
    pub fn remove_part(&mut self, entity: Entity) -> bool {
        let removed = self.world.despawn(entity).is_ok();
        if removed {
            self.refresh_uplink();
        }
        removed
    }

    /// Pick the highest-bandwidth antenna. Queued transfers survive a change
    /// of antenna but are lost if none remains.
    pub fn refresh_uplink(&mut self) {
        let best = self
            .world
            .query::<&Antenna>()
            .iter()
            .map(|(_, a)| a.bandwidth)
            .fold(None, |best: Option<f32>, bw| Some(best.map_or(bw, |b| b.max(bw))));

        match (best, self.uplink.as_mut()) {
            (Some(bandwidth), Some(uplink)) => uplink.bandwidth = bandwidth,
            (Some(bandwidth), None) => self.uplink = Some(Uplink::new(bandwidth)),
            (None, _) => self.uplink = None,
        }
    }

    pub fn move_to(&mut self, body: &str, situation: Situation, biome: &str) {
        self.body = body.to_string();
        self.situation = situation;
        self.biome = biome.to_string();
    }

    /// Definitions of every experiment aboard, in part order.
    pub fn experiment_defs(&self) -> Vec<ExperimentDef> {
        let mut defs: Vec<(u32, ExperimentDef)> = self
            .world
            .query::<(&Part, &ScienceModule)>()
            .iter()
            .filter_map(|(_, (part, module))| {
                module
                    .as_experiment()
                    .map(|e| (part.order, e.definition().clone()))
            })
            .collect();
        defs.sort_by_key(|(order, _)| *order);
        defs.into_iter().map(|(_, def)| def).collect()
    }

    /// Data units held anywhere aboard.
    pub fn units_aboard(&self) -> usize {
        self.world
            .query::<&ScienceModule>()
            .iter()
            .map(|(_, m)| m.count())
            .sum()
    }

    /// Data units held in containers.
    pub fn units_in_containers(&self) -> usize {
        self.world
            .query::<&ScienceModule>()
            .iter()
            .filter(|(_, m)| m.kind() == HolderKind::Container)
            .map(|(_, m)| m.count())
            .sum()
    }

    pub fn crew_count(&self) -> usize {
        self.world.query::<&CrewMember>().iter().count()
    }
}

impl Vessel for SimVessel {
    fn context(&self) -> Context {
        Context::new(self.id, self.body.clone(), self.situation, self.biome.clone())
    }

    fn has_crew_trait(&self, trait_name: &str) -> bool {
        self.world
            .query::<&CrewMember>()
            .iter()
            .any(|(_, c)| c.specialty == trait_name)
    }

    fn science_parts(&mut self) -> ScienceParts<'_> {
        let mut modules: Vec<(u32, &mut ScienceModule)> = self
            .world
            .query_mut::<(&Part, &mut ScienceModule)>()
            .into_iter()
            .map(|(_, (part, module))| (part.order, module))
            .collect();
        modules.sort_by_key(|(order, _)| *order);

        let holders: Vec<&mut dyn ScienceContainer> = modules
            .into_iter()
            .map(|(_, module)| module as &mut dyn ScienceContainer)
            .collect();
        let transmitter = self.uplink.as_mut().map(|u| u as &mut dyn Transmitter);
        ScienceParts::new(holders, transmitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::stock_experiment;

    #[test]
    fn test_parts_enumerate_in_order() {
        let mut vessel = SimVessel::new(VehicleId(1), "Test");
        vessel.add_experiment(&stock_experiment("temperatureScan").unwrap());
        vessel.add_container("Pod", None);
        vessel.add_container("Bay", None);
        let parts = vessel.science_parts();
        assert_eq!(parts.holders.len(), 3);
        assert_eq!(parts.holders[0].kind(), HolderKind::Experiment);
        assert_eq!(parts.sink_index(), Some(1));
        assert!(parts.transmitter.is_none());
    }

    #[test]
    fn test_best_antenna_selected() {
        let mut vessel = SimVessel::new(VehicleId(1), "Test");
        let small = vessel.add_antenna("Communotron 16", 3.3);
        vessel.add_antenna("Communotron 88-88", 20.0);
        assert!((vessel.uplink.as_ref().unwrap().bandwidth - 20.0).abs() < 1e-6);
        vessel.remove_part(small);
        assert!(vessel.uplink.is_some());
    }

    #[test]
    fn test_losing_all_antennas_drops_uplink() {
        let mut vessel = SimVessel::new(VehicleId(1), "Test");
        let antenna = vessel.add_antenna("Communotron 16", 3.3);
        assert!(vessel.remove_part(antenna));
        assert!(vessel.uplink.is_none());
    }

    #[test]
    fn test_crew_traits() {
        let mut vessel = SimVessel::new(VehicleId(1), "Test");
        vessel.add_crew("Jebediah Kerman", "Pilot");
        assert!(!vessel.has_crew_trait("Scientist"));
        vessel.add_crew("Bob Kerman", "Scientist");
        assert!(vessel.has_crew_trait("Scientist"));
        assert_eq!(vessel.crew_count(), 2);
    }

    #[test]
    fn test_context_reflects_position() {
        let mut vessel = SimVessel::new(VehicleId(4), "Test");
        vessel.move_to("Mun", Situation::InSpaceLow, "");
        let ctx = vessel.context();
        assert_eq!(ctx.vehicle, VehicleId(4));
        assert_eq!(ctx.body, "Mun");
        assert_eq!(ctx.situation, Situation::InSpaceLow);
        assert!(ctx.biome.is_empty());
    }
}
