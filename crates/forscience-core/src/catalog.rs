//! Stock experiments and celestial bodies.

use forscience_logic::context::Situation;
use forscience_logic::subject::ExperimentDef;
use serde::{Deserialize, Serialize};

/// An experiment as fitted to parts, with the archive-side science cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockExperiment {
    pub definition: ExperimentDef,
    /// Maximum base science the subject can yield before the body multiplier.
    pub science_cap: f32,
    pub transmit_scalar: f32,
    pub rerunnable: bool,
}

const ALL: u8 = 0b11_1111;
const SURFACE: u8 = 0b00_0011;

#[allow(clippy::too_many_arguments)]
fn stock(
    id: &str,
    title: &str,
    base_value: f32,
    science_cap: f32,
    situation_mask: u8,
    biome_mask: u8,
    transmit_scalar: f32,
    rerunnable: bool,
) -> StockExperiment {
    StockExperiment {
        definition: ExperimentDef {
            id: id.to_string(),
            title: title.to_string(),
            base_value,
            data_scale: 1.0,
            situation_mask,
            biome_mask,
            requires_atmosphere: false,
        },
        science_cap,
        transmit_scalar,
        rerunnable,
    }
}

/// All stock experiments.
#[rustfmt::skip]
pub fn stock_experiments() -> Vec<StockExperiment> {
    let landed = Situation::Landed.bit();
    let flying = Situation::FlyingLow.bit() | Situation::FlyingHigh.bit();
    let crew_biomes = SURFACE | Situation::FlyingLow.bit();
    let mut atmosphere = stock(
        "atmosphereAnalysis",
        "Atmosphere Analysis",
        20.0,
        24.0,
        landed | flying,
        landed | Situation::FlyingLow.bit(),
        0.55,
        true,
    );
    atmosphere.definition.requires_atmosphere = true;

    vec![
        stock("crewReport", "Crew Report", 5.0, 5.0, ALL, crew_biomes, 1.0, true),
        stock("temperatureScan", "Temperature Scan", 8.0, 8.0, ALL, SURFACE, 0.5, true),
        stock("barometerScan", "Atmospheric Pressure Scan", 12.0, 12.0, ALL, SURFACE, 0.5, true),
        stock("mysteryGoo", "Mystery Goo Observation", 10.0, 13.0, ALL, SURFACE, 0.3, false),
        stock("mobileMaterialsLab", "Materials Study", 25.0, 32.0, ALL, SURFACE, 0.35, false),
        stock("surfaceSample", "Surface Sample", 30.0, 40.0, SURFACE, SURFACE, 0.25, true),
        stock("seismicScan", "Seismic Scan", 20.0, 22.0, landed, landed, 0.45, true),
        atmosphere,
    ]
}

/// Look up a stock experiment by id.
pub fn stock_experiment(id: &str) -> Option<StockExperiment> {
    stock_experiments().into_iter().find(|e| e.definition.id == id)
}

/// A celestial body and its science multipliers per situation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub atmosphere: bool,
    pub has_ocean: bool,
    pub landed: f32,
    pub splashed: f32,
    pub flying_low: f32,
    pub flying_high: f32,
    pub space_low: f32,
    pub space_high: f32,
    pub biomes: Vec<String>,
}

impl Body {
    pub fn multiplier(&self, situation: Situation) -> f32 {
        match situation {
            Situation::Landed => self.landed,
            Situation::Splashed => self.splashed,
            Situation::FlyingLow => self.flying_low,
            Situation::FlyingHigh => self.flying_high,
            Situation::InSpaceLow => self.space_low,
            Situation::InSpaceHigh => self.space_high,
        }
    }

    /// Whether a vessel can physically be in `situation` at this body.
    pub fn allows(&self, situation: Situation) -> bool {
        match situation {
            Situation::Splashed => self.has_ocean,
            Situation::FlyingLow | Situation::FlyingHigh => self.atmosphere,
            _ => true,
        }
    }
}

fn body(name: &str, atmosphere: bool, has_ocean: bool, mults: [f32; 6], biomes: &[&str]) -> Body {
    Body {
        name: name.to_string(),
        atmosphere,
        has_ocean,
        landed: mults[0],
        splashed: mults[1],
        flying_low: mults[2],
        flying_high: mults[3],
        space_low: mults[4],
        space_high: mults[5],
        biomes: biomes.iter().map(|b| b.to_string()).collect(),
    }
}

/// Bodies the simulation knows about.
pub fn stock_bodies() -> Vec<Body> {
    vec![
        body(
            "Kerbin",
            true,
            true,
            [0.3, 0.4, 0.7, 0.9, 1.0, 1.5],
            &["Launch Pad", "Shores", "Grasslands", "Highlands", "Water"],
        ),
        body(
            "Mun",
            false,
            false,
            [4.0, 0.0, 0.0, 0.0, 3.0, 2.0],
            &["Midlands", "Highlands", "Canyons", "Farside Crater"],
        ),
        body(
            "Minmus",
            false,
            false,
            [5.0, 0.0, 0.0, 0.0, 4.0, 2.5],
            &["Flats", "Slopes", "Highlands", "Great Flats"],
        ),
        body(
            "Duna",
            true,
            false,
            [8.0, 0.0, 5.0, 5.0, 7.0, 5.0],
            &["Lowlands", "Highlands", "Poles", "Craters"],
        ),
    ]
}
