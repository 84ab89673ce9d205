//! Research archive - the host's record of science collected per subject.
//!
//! Subjects are registered the first time a vessel could produce them, with a
//! cap scaled by the body/situation multiplier. Value follows a saturation
//! curve: each point of science collected lowers what the next unit is worth.

use std::collections::HashMap;

use forscience_logic::context::{Context, GameMode};
use forscience_logic::host::ScienceHost;
use forscience_logic::subject::{subject_for, subject_title, ExperimentDef, SubjectId};
use serde::{Deserialize, Serialize};

use crate::catalog::{stock_bodies, stock_experiments, Body};

/// Archive entry for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub title: String,
    /// Science already credited.
    pub science: f32,
    pub science_cap: f32,
    /// Body/situation multiplier.
    pub subject_value: f32,
}

impl SubjectRecord {
    /// Fraction of the subject still unknown, in [0, 1].
    pub fn scientific_value(&self) -> f32 {
        remaining_fraction(self.science, self.science_cap)
    }
}

fn remaining_fraction(science: f32, cap: f32) -> f32 {
    if cap <= 0.0 {
        return 0.0;
    }
    (1.0 - science / cap).clamp(0.0, 1.0)
}

/// Upgradeable space-center facilities, levels 1-3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Facilities {
    pub astronaut_complex: u8,
    pub research_and_development: u8,
}

impl Default for Facilities {
    fn default() -> Self {
        Self {
            astronaut_complex: 1,
            research_and_development: 1,
        }
    }
}

impl Facilities {
    /// EVA and sample handling both need the second facility tier.
    pub fn surface_samples_unlocked(&self) -> bool {
        self.astronaut_complex >= 2 && self.research_and_development >= 2
    }
}

/// Game-wide science state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchArchive {
    pub mode: GameMode,
    pub gain_multiplier: f32,
    pub facilities: Facilities,
    /// Total science credited to the player.
    pub science_points: f32,
    records: HashMap<String, SubjectRecord>,
    caps: HashMap<String, f32>,
    bodies: Vec<Body>,
}

impl ResearchArchive {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            gain_multiplier: 1.0,
            facilities: Facilities::default(),
            science_points: 0.0,
            records: HashMap::new(),
            caps: stock_experiments()
                .into_iter()
                .map(|e| (e.definition.id, e.science_cap))
                .collect(),
            bodies: stock_bodies(),
        }
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Whether `biome` exists on `body` (an empty biome always does).
    pub fn knows_location(&self, body: &str, biome: &str) -> bool {
        self.body(body)
            .is_some_and(|b| biome.is_empty() || b.biomes.iter().any(|known| known == biome))
    }

    pub fn record(&self, subject: &SubjectId) -> Option<&SubjectRecord> {
        self.records.get(subject.as_str())
    }

    pub fn subject_count(&self) -> usize {
        self.records.len()
    }

    /// Register the subject `experiment` would produce in `context`, if new.
    pub fn register(&mut self, experiment: &ExperimentDef, context: &Context) -> SubjectId {
        let subject = subject_for(experiment, context);
        if !self.records.contains_key(subject.as_str()) {
            let subject_value = self
                .body(&context.body)
                .map_or(1.0, |b| b.multiplier(context.situation));
            let cap = self
                .caps
                .get(&experiment.id)
                .copied()
                .unwrap_or(experiment.base_value);
            self.records.insert(
                subject.as_str().to_string(),
                SubjectRecord {
                    title: subject_title(experiment, context),
                    science: 0.0,
                    science_cap: cap * subject_value,
                    subject_value,
                },
            );
        }
        subject
    }

    /// Credit transmitted or recovered data. Returns the science awarded.
    pub fn submit(&mut self, subject: &SubjectId, data_amount: f32) -> f32 {
        let value = self.science_value(subject, data_amount);
        let awarded = value * self.gain_multiplier;
        self.science_points += awarded;
        match self.records.get_mut(subject.as_str()) {
            Some(record) => {
                record.science = (record.science + value).min(record.science_cap);
                log::info!("Received {:.2} science for {}", awarded, record.title);
            }
            None => log::warn!("Received {:.2} science for unregistered {}", awarded, subject),
        }
        awarded
    }
}

impl ScienceHost for ResearchArchive {
    fn game_mode(&self) -> GameMode {
        self.mode
    }

    fn gain_multiplier(&self) -> f32 {
        self.gain_multiplier
    }

    fn science_value(&self, subject: &SubjectId, data_amount: f32) -> f32 {
        match self.record(subject) {
            Some(r) => data_amount * r.subject_value * r.scientific_value(),
            None => data_amount,
        }
    }

    fn next_science_value(&self, subject: &SubjectId, data_amount: f32) -> f32 {
        match self.record(subject) {
            Some(r) => {
                let after = r.science + self.science_value(subject, data_amount);
                data_amount * r.subject_value * remaining_fraction(after, r.science_cap)
            }
            None => data_amount,
        }
    }

    fn is_unlocked(&self, experiment: &ExperimentDef) -> bool {
        match experiment.id.as_str() {
            "surfaceSample" => self.facilities.surface_samples_unlocked(),
            _ => true,
        }
    }

    fn is_available(&self, experiment: &ExperimentDef, context: &Context) -> bool {
        self.body(&context.body).is_some_and(|body| {
            body.allows(context.situation)
                && experiment.is_available_while(context.situation, body.atmosphere)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::stock_experiment;
    use forscience_logic::context::{Situation, VehicleId};

    fn kerbin_pad() -> Context {
        Context::new(VehicleId(1), "Kerbin", Situation::Landed, "Launch Pad")
    }

    #[test]
    fn test_register_applies_multiplier() {
        let mut archive = ResearchArchive::new(GameMode::Career);
        let goo = stock_experiment("mysteryGoo").unwrap().definition;
        let subject = archive.register(&goo, &kerbin_pad());
        let record = archive.record(&subject).unwrap();
        assert!((record.subject_value - 0.3).abs() < 1e-6);
        assert!((record.science_cap - 3.9).abs() < 1e-4);
        assert_eq!(archive.subject_count(), 1);
        archive.register(&goo, &kerbin_pad());
        assert_eq!(archive.subject_count(), 1);
    }

    #[test]
    fn test_value_saturates() {
        let mut archive = ResearchArchive::new(GameMode::Career);
        let goo = stock_experiment("mysteryGoo").unwrap().definition;
        let subject = archive.register(&goo, &kerbin_pad());

        let first = archive.science_value(&subject, 10.0);
        let next = archive.next_science_value(&subject, 10.0);
        assert!((first - 3.0).abs() < 1e-4);
        assert!(next < first);
        assert!(next > 0.0);

        archive.submit(&subject, 10.0);
        assert!((archive.science_value(&subject, 10.0) - next).abs() < 1e-4);
        assert!((archive.science_points - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_value_never_negative() {
        let mut archive = ResearchArchive::new(GameMode::Career);
        let thermo = stock_experiment("temperatureScan").unwrap().definition;
        let subject = archive.register(&thermo, &kerbin_pad());
        for _ in 0..5 {
            archive.submit(&subject, 8.0);
        }
        assert_eq!(archive.science_value(&subject, 8.0), 0.0);
        assert_eq!(archive.next_science_value(&subject, 8.0), 0.0);
    }

    #[test]
    fn test_known_locations() {
        let archive = ResearchArchive::new(GameMode::Career);
        assert!(archive.knows_location("Kerbin", "Launch Pad"));
        assert!(archive.knows_location("Mun", ""));
        assert!(!archive.knows_location("Mun", "Launch Pad"));
        assert!(!archive.knows_location("Jool", ""));
    }

    #[test]
    fn test_submit_titles_record() {
        let mut archive = ResearchArchive::new(GameMode::Career);
        let thermo = stock_experiment("temperatureScan").unwrap().definition;
        let subject = archive.register(&thermo, &kerbin_pad());
        assert_eq!(
            archive.record(&subject).unwrap().title,
            "Temperature Scan while landed at Kerbin Launch Pad"
        );
        let unknown = SubjectId::new("nothing@Nowhere");
        assert_eq!(archive.submit(&unknown, 2.0), 2.0);
        assert_eq!(archive.subject_count(), 1);
    }

    #[test]
    fn test_surface_samples_need_facilities() {
        let mut archive = ResearchArchive::new(GameMode::Career);
        let sample = stock_experiment("surfaceSample").unwrap().definition;
        assert!(!archive.is_unlocked(&sample));
        archive.facilities.astronaut_complex = 2;
        assert!(!archive.is_unlocked(&sample));
        archive.facilities.research_and_development = 2;
        assert!(archive.is_unlocked(&sample));
    }

    #[test]
    fn test_atmosphere_required() {
        let archive = ResearchArchive::new(GameMode::Career);
        let analysis = stock_experiment("atmosphereAnalysis").unwrap().definition;
        let mun = Context::new(VehicleId(1), "Mun", Situation::Landed, "Midlands");
        assert!(!archive.is_available(&analysis, &mun));
        assert!(archive.is_available(&analysis, &kerbin_pad()));
        let nowhere = Context::new(VehicleId(1), "Jool", Situation::Landed, "");
        assert!(!archive.is_available(&analysis, &nowhere));
    }
}
