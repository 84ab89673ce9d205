//! Vessel generation from a declarative config.

use forscience_logic::context::{Situation, VehicleId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::stock_experiment;
use crate::vessel::SimVessel;

/// What to build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    pub id: u32,
    pub name: String,
    /// Stock experiment ids, fitted in order after the root pod.
    pub experiments: Vec<String>,
    /// Capacity of the root pod's container, `None` for unbounded.
    pub pod_capacity: Option<usize>,
    /// Extra science containers after the experiments.
    pub extra_containers: u32,
    /// Bandwidth of the antenna, `None` for no antenna.
    pub antenna_bandwidth: Option<f32>,
    pub crew_size: u32,
    /// Make the first crew member a scientist.
    pub scientist: bool,
    pub body: String,
    pub situation: Situation,
    pub biome: String,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Science Jr".to_string(),
            experiments: vec![
                "crewReport".to_string(),
                "temperatureScan".to_string(),
                "barometerScan".to_string(),
                "mysteryGoo".to_string(),
                "mobileMaterialsLab".to_string(),
            ],
            pod_capacity: None,
            extra_containers: 0,
            antenna_bandwidth: Some(3.3),
            crew_size: 1,
            scientist: false,
            body: "Kerbin".to_string(),
            situation: Situation::Landed,
            biome: "Launch Pad".to_string(),
        }
    }
}

/// Build a vessel. The root pod is always part 0 and becomes the sink.
pub fn generate_vessel(config: &VesselConfig, rng: &mut impl Rng) -> SimVessel {
    let mut vessel = SimVessel::new(VehicleId(config.id), config.name.clone());
    vessel.move_to(&config.body, config.situation, &config.biome);

    vessel.add_container("Command Pod", config.pod_capacity);

    for id in &config.experiments {
        match stock_experiment(id) {
            Some(stock) => {
                vessel.add_experiment(&stock);
            }
            None => log::warn!("Unknown experiment {}, not fitted", id),
        }
    }

    for i in 0..config.extra_containers {
        vessel.add_container(&format!("Science Container {}", i + 1), None);
    }

    if let Some(bandwidth) = config.antenna_bandwidth {
        vessel.add_antenna("Communotron", bandwidth);
    }

    for i in 0..config.crew_size {
        let specialty = if i == 0 && config.scientist {
            "Scientist"
        } else {
            NON_SCIENTISTS[rng.gen_range(0..NON_SCIENTISTS.len())]
        };
        vessel.add_crew(&generate_name(rng), specialty);
    }

    vessel
}

static NON_SCIENTISTS: &[&str] = &["Pilot", "Engineer"];

/// Generate a random crew name
pub fn generate_name(rng: &mut impl Rng) -> String {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    format!("{} Kerman", given)
}

static GIVEN_NAMES: &[&str] = &[
    "Jebediah", "Bill", "Bob", "Valentina", "Agasel", "Bartrey", "Dilsby", "Gusdun", "Halvan",
    "Lodrin", "Mitzon", "Nelbree", "Rodwig", "Sigbald", "Tedlin", "Wernher",
];

#[cfg(test)]
mod tests {
    use super::*;
    use forscience_logic::host::Vessel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_vessel() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut vessel = generate_vessel(&VesselConfig::default(), &mut rng);
        assert_eq!(vessel.experiment_defs().len(), 5);
        assert_eq!(vessel.crew_count(), 1);
        assert!(!vessel.has_crew_trait("Scientist"));
        let parts = vessel.science_parts();
        assert_eq!(parts.sink_index(), Some(0));
        assert!(parts.transmitter.is_some());
    }

    #[test]
    fn test_scientist_and_extras() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = VesselConfig {
            experiments: vec!["mysteryGoo".into(), "bogus".into()],
            extra_containers: 2,
            antenna_bandwidth: None,
            crew_size: 3,
            scientist: true,
            ..Default::default()
        };
        let mut vessel = generate_vessel(&config, &mut rng);
        assert_eq!(vessel.experiment_defs().len(), 1);
        assert!(vessel.has_crew_trait("Scientist"));
        assert_eq!(vessel.crew_count(), 3);
        let parts = vessel.science_parts();
        assert_eq!(parts.holders.len(), 4);
        assert!(parts.transmitter.is_none());
    }

    #[test]
    fn test_names_end_in_kerman() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert!(generate_name(&mut rng).ends_with(" Kerman"));
        }
    }
}
