//! Flight engine - fixed-step loop that drives the automation session

use forscience_logic::config::AutomationConfig;
use forscience_logic::context::{GameMode, Situation};
use forscience_logic::host::Vessel;
use forscience_logic::session::{ScienceSession, TickReport};
use forscience_logic::transmission::ReceiptSender;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::archive::ResearchArchive;
use crate::generation::{generate_vessel, VesselConfig};
use crate::vessel::SimVessel;

/// Physics step in seconds; the automation ticks once per step.
pub const FIXED_STEP: f32 = 0.02;

/// Running totals over a flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightTotals {
    pub ticks: u64,
    pub context_changes: u32,
    pub deployed: usize,
    pub consolidated: usize,
    pub transmitted: usize,
    pub received: usize,
    pub science_earned: f32,
}

/// Main flight engine
pub struct FlightEngine {
    /// Game-wide research state
    pub archive: ResearchArchive,
    /// The active vessel
    pub vessel: SimVessel,
    /// Automation session attached to the vessel
    pub session: ScienceSession,
    receipts: ReceiptSender,
    rng: StdRng,
    sim_time: f64,
    accumulator: f32,
    totals: FlightTotals,
    last_report: TickReport,
}

impl FlightEngine {
    /// Career game, vessel generated from `vessel_config` with seed 0.
    pub fn new(vessel_config: VesselConfig, config: AutomationConfig) -> Self {
        Self::with_seed(GameMode::Career, vessel_config, config, 0)
    }

    pub fn with_seed(
        mode: GameMode,
        vessel_config: VesselConfig,
        config: AutomationConfig,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let vessel = generate_vessel(&vessel_config, &mut rng);
        Self::from_parts(ResearchArchive::new(mode), vessel, config, rng)
    }

    /// Attach a session to an existing vessel.
    pub fn from_parts(
        archive: ResearchArchive,
        vessel: SimVessel,
        config: AutomationConfig,
        rng: StdRng,
    ) -> Self {
        let session = ScienceSession::attach(vessel.id, config);
        let receipts = session.receipts();
        Self {
            archive,
            vessel,
            session,
            receipts,
            rng,
            sim_time: 0.0,
            accumulator: 0.0,
            totals: FlightTotals::default(),
            last_report: TickReport::default(),
        }
    }

    /// Advance by `delta_seconds`, running as many fixed steps as fit.
    pub fn update(&mut self, delta_seconds: f32) {
        self.accumulator += delta_seconds.max(0.0);
        while self.accumulator >= FIXED_STEP {
            self.accumulator -= FIXED_STEP;
            self.fixed_update(FIXED_STEP);
        }
    }

    /// One physics step: deliver finished transmissions, then tick.
    pub fn fixed_update(&mut self, step: f32) {
        self.sim_time += step as f64;

        if let Some(uplink) = self.vessel.uplink.as_mut() {
            for unit in uplink.advance(step, &mut self.rng) {
                let awarded = self
                    .archive
                    .submit(&unit.subject, unit.amount * unit.transmit_value);
                self.totals.science_earned += awarded;
                self.receipts.science_received(unit.subject);
            }
        }

        let context = self.vessel.context();
        for def in self.vessel.experiment_defs() {
            self.archive.register(&def, &context);
        }

        let report = self.session.tick(&self.archive, &mut self.vessel);
        self.totals.ticks += 1;
        self.totals.context_changes += report.context_changed as u32;
        self.totals.deployed += report.deployed;
        self.totals.consolidated += report.consolidated;
        self.totals.transmitted += report.transmitted;
        self.totals.received += report.receipts;
        self.last_report = report;
    }

    /// Move the vessel; the next tick sees the new context. Returns false
    /// (and moves anyway) when the body or biome is not in the catalog.
    pub fn move_to(&mut self, body: &str, situation: Situation, biome: &str) -> bool {
        let known = self.archive.knows_location(body, biome);
        if !known {
            log::warn!("Unknown location {} {}", body, biome);
        }
        self.vessel.move_to(body, situation, biome);
        known
    }

    /// Flip the toggle surface.
    pub fn toggle(&mut self) -> bool {
        self.session.toggle()
    }

    pub fn totals(&self) -> FlightTotals {
        self.totals
    }

    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    /// Simulation time in seconds
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> VesselConfig {
        VesselConfig {
            experiments: vec!["crewReport".into(), "temperatureScan".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = FlightEngine::new(probe(), AutomationConfig::default());
        assert_eq!(engine.sim_time(), 0.0);
        assert_eq!(engine.totals(), FlightTotals::default());
    }

    #[test]
    fn test_fixed_step_count() {
        let mut engine = FlightEngine::new(probe(), AutomationConfig::default());
        engine.update(1.0);
        assert!((engine.totals().ticks as i64 - 50).abs() <= 1);
    }

    #[test]
    fn test_first_tick_collects_and_consolidates() {
        let mut engine = FlightEngine::new(probe(), AutomationConfig::default());
        engine.fixed_update(FIXED_STEP);
        let totals = engine.totals();
        assert_eq!(totals.context_changes, 1);
        assert_eq!(totals.deployed, 2);
        assert_eq!(totals.consolidated, 2);
        // crew report and thermometer both transmit at >= 0.5
        assert_eq!(totals.transmitted, 2);
        assert_eq!(engine.vessel.uplink.as_ref().unwrap().pending(), 2);
    }

    #[test]
    fn test_transmissions_complete_and_release() {
        let mut engine = FlightEngine::new(probe(), AutomationConfig::default());
        for _ in 0..10 {
            engine.update(1.0);
        }
        let totals = engine.totals();
        assert_eq!(totals.received, 2);
        assert!(totals.science_earned > 0.0);
        assert!(engine.session.ledger().in_flight().is_empty());
        assert_eq!(engine.vessel.units_aboard(), 0);
    }

    #[test]
    fn test_no_signal_keeps_in_flight() {
        let mut engine = FlightEngine::new(probe(), AutomationConfig::default());
        engine.vessel.uplink.as_mut().unwrap().signal = 0.0;
        for _ in 0..10 {
            engine.update(1.0);
        }
        assert_eq!(engine.totals().received, 0);
        assert_eq!(engine.session.ledger().in_flight().len(), 2);
        // no requeue while pending
        assert_eq!(engine.totals().transmitted, 2);
    }

    #[test]
    fn test_unknown_location_flagged() {
        let mut engine = FlightEngine::new(probe(), AutomationConfig::default());
        assert!(!engine.move_to("Mun", Situation::Landed, "Launch Pad"));
        assert_eq!(engine.vessel.body, "Mun");
        assert!(engine.move_to("Mun", Situation::Landed, "Midlands"));
    }

    #[test]
    fn test_sandbox_does_nothing() {
        let mut engine = FlightEngine::with_seed(
            GameMode::Sandbox,
            probe(),
            AutomationConfig::default(),
            0,
        );
        engine.update(1.0);
        assert_eq!(engine.totals().deployed, 0);
        assert_eq!(engine.vessel.units_aboard(), 0);
    }

    #[test]
    fn test_new_situation_triggers_collection() {
        let mut engine = FlightEngine::new(probe(), AutomationConfig::default());
        engine.vessel.uplink.as_mut().unwrap().signal = 0.0;
        engine.fixed_update(FIXED_STEP);
        assert!(engine.move_to("Kerbin", Situation::FlyingLow, "Shores"));
        engine.fixed_update(FIXED_STEP);
        assert_eq!(engine.totals().context_changes, 2);
        assert_eq!(engine.totals().deployed, 4);
    }
}
