//! Per-vessel automation session.
//!
//! A session is created when the automation attaches to a vessel and dropped
//! when it detaches. It owns the toggle, the situation tracker, the ledger
//! and the receipt inbox, so no state leaks between vessels.
//!
//! Tick order:
//! 1. drain transmission receipts (always, even while disabled)
//! 2. gate on the toggle and game mode
//! 3. rebuild resident counts from the containers
//! 4. on situation change, evaluate and run experiments
//! 5. consolidate into the sink
//! 6. queue eligible data for transmission

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::config::AutomationConfig;
use crate::consolidation::consolidate;
use crate::context::{Context, VehicleId};
use crate::eligibility::{Decision, Evaluator};
use crate::host::{ScienceHost, ScienceParts, Vessel};
use crate::ledger::ScienceLedger;
use crate::subject::{subject_for, subject_title, SubjectId};
use crate::tracker::SituationTracker;
use crate::transmission::{transmit_eligible, Receipt, ReceiptSender};

/// Decision recorded for one experiment during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDecision {
    pub subject: SubjectId,
    pub decision: Decision,
}

/// What a tick did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Whether the tick did any work past the receipt inbox.
    pub active: bool,
    pub context_changed: bool,
    pub decisions: Vec<ExperimentDecision>,
    pub deployed: usize,
    pub consolidated: usize,
    pub transmitted: usize,
    pub receipts: usize,
}

impl TickReport {
    pub fn decision_for(&self, subject: &SubjectId) -> Option<Decision> {
        self.decisions
            .iter()
            .find(|d| &d.subject == subject)
            .map(|d| d.decision)
    }
}

/// Automation state for one attached vessel.
pub struct ScienceSession {
    vehicle: VehicleId,
    config: AutomationConfig,
    enabled: bool,
    tracker: SituationTracker,
    ledger: ScienceLedger,
    inbox: Receiver<Receipt>,
    outbox: Sender<Receipt>,
}

impl ScienceSession {
    /// Attach to a vessel. The toggle starts at `config.enabled`.
    pub fn attach(vehicle: VehicleId, config: AutomationConfig) -> Self {
        let (outbox, inbox) = mpsc::channel();
        log::info!("Science automation attached to {}", vehicle);
        Self {
            vehicle,
            enabled: config.enabled,
            config,
            tracker: SituationTracker::new(),
            ledger: ScienceLedger::new(),
            inbox,
            outbox,
        }
    }

    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub fn ledger(&self) -> &ScienceLedger {
        &self.ledger
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::info!(
                "Science automation {} for {}",
                if enabled { "enabled" } else { "disabled" },
                self.vehicle
            );
        }
        self.enabled = enabled;
    }

    /// Flip the toggle and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Handle for reporting completed transmissions.
    pub fn receipts(&self) -> ReceiptSender {
        ReceiptSender::new(self.outbox.clone())
    }

    /// Run one scheduling tick against the host and vessel.
    pub fn tick(&mut self, host: &dyn ScienceHost, vessel: &mut dyn Vessel) -> TickReport {
        let mut report = TickReport {
            receipts: self.drain_receipts(),
            ..TickReport::default()
        };

        if !self.enabled || !self.config.runs_in(host.game_mode()) {
            return report;
        }
        report.active = true;

        let context = vessel.context();
        let crew_capable = vessel.has_crew_trait(&self.config.crew_trait);
        let mut parts = vessel.science_parts();
        self.ledger.rescan_resident(&parts.holders);

        if self.tracker.has_changed(&context) {
            log::debug!("Situation changed: {}", context);
            report.context_changed = true;
            self.run_experiments(host, &context, crew_capable, &mut parts, &mut report);
        }

        let Some(sink_idx) = parts.sink_index() else {
            if parts.total_units() > 0 {
                log::debug!("No container aboard {}, data stays in experiments", self.vehicle);
            }
            return report;
        };

        let sink = parts.holders.remove(sink_idx);
        let moved = consolidate(&mut parts.holders, &mut *sink, &mut self.ledger);
        parts.holders.insert(sink_idx, sink);
        report.consolidated = moved.moved;

        if self.config.transmit {
            report.transmitted = transmit_eligible(
                &mut parts.holders,
                parts.transmitter,
                &mut self.ledger,
                self.config.transmit_threshold,
            );
        }

        report
    }

    fn drain_receipts(&mut self) -> usize {
        let mut processed = 0;
        for receipt in self.inbox.try_iter() {
            if self.ledger.release_in_flight(&receipt.subject) {
                log::info!("Transmission received for {}", receipt.subject);
            } else {
                log::warn!("Receipt for {} which is not in flight", receipt.subject);
            }
            processed += 1;
        }
        processed
    }

    fn run_experiments(
        &mut self,
        host: &dyn ScienceHost,
        context: &Context,
        crew_capable: bool,
        parts: &mut ScienceParts<'_>,
        report: &mut TickReport,
    ) {
        let mut to_run: Vec<(usize, SubjectId, String)> = Vec::new();
        {
            let evaluator = Evaluator {
                context,
                host,
                ledger: &self.ledger,
                sink: parts.sink(),
                crew_capable,
                materiality_threshold: self.config.materiality_threshold,
            };

            for (idx, holder) in parts.holders.iter().enumerate() {
                let Some(experiment) = holder.as_experiment() else {
                    continue;
                };
                let subject = subject_for(experiment.definition(), context);
                log::debug!("Checking experiment {}", subject);
                let decision = evaluator.evaluate(experiment);
                match decision {
                    Decision::Run => {
                        let title = subject_title(experiment.definition(), context);
                        to_run.push((idx, subject.clone(), title));
                    }
                    Decision::Skip(reason) => {
                        log::debug!("Skipping {}: {}", subject, reason);
                    }
                }
                report.decisions.push(ExperimentDecision { subject, decision });
            }
        }

        if report.decisions.is_empty() {
            log::debug!("There are no experiments aboard {}", self.vehicle);
        }

        for (idx, subject, title) in to_run {
            if let Some(experiment) = parts.holders[idx].as_experiment_mut() {
                log::info!("Running experiment {}", subject);
                experiment.deploy(subject, title);
                report.deployed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GameMode, Situation};
    use crate::data::{DataUnit, ScienceContainer};
    use crate::host::{ExperimentSource, Transmitter};
    use crate::modules::{ContainerPart, ExperimentPart};
    use crate::subject::ExperimentDef;

    struct Host {
        mode: GameMode,
    }

    impl ScienceHost for Host {
        fn game_mode(&self) -> GameMode {
            self.mode
        }
        fn gain_multiplier(&self) -> f32 {
            1.0
        }
        fn science_value(&self, _: &SubjectId, amount: f32) -> f32 {
            amount
        }
        fn next_science_value(&self, _: &SubjectId, amount: f32) -> f32 {
            amount / 2.0
        }
        fn is_unlocked(&self, _: &ExperimentDef) -> bool {
            true
        }
        fn is_available(&self, _: &ExperimentDef, _: &Context) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct Antenna {
        sent: Vec<DataUnit>,
    }

    impl Transmitter for Antenna {
        fn transmit(&mut self, unit: DataUnit) {
            self.sent.push(unit);
        }
    }

    struct Probe {
        context: Context,
        pod: Option<ContainerPart>,
        thermometer: ExperimentPart,
        antenna: Option<Antenna>,
    }

    impl Vessel for Probe {
        fn context(&self) -> Context {
            self.context.clone()
        }
        fn has_crew_trait(&self, _: &str) -> bool {
            false
        }
        fn science_parts(&mut self) -> ScienceParts<'_> {
            let mut holders: Vec<&mut dyn ScienceContainer> = Vec::new();
            if let Some(pod) = self.pod.as_mut() {
                holders.push(pod);
            }
            holders.push(&mut self.thermometer);
            let transmitter = self.antenna.as_mut().map(|a| a as &mut dyn Transmitter);
            ScienceParts::new(holders, transmitter)
        }
    }

    fn probe(transmit_scalar: f32) -> Probe {
        let def = ExperimentDef {
            id: "temperatureScan".into(),
            title: "Temperature Scan".into(),
            base_value: 8.0,
            data_scale: 1.0,
            situation_mask: 0b11_1111,
            biome_mask: 0,
            requires_atmosphere: false,
        };
        Probe {
            context: Context::new(VehicleId(1), "Kerbin", Situation::Landed, "Launch Pad"),
            pod: Some(ContainerPart::new()),
            thermometer: ExperimentPart::new(def, transmit_scalar, true),
            antenna: None,
        }
    }

    fn career() -> Host {
        Host {
            mode: GameMode::Career,
        }
    }

    #[test]
    fn test_tick_runs_consolidates_once() {
        let mut session = ScienceSession::attach(VehicleId(1), AutomationConfig::default());
        let mut vessel = probe(0.3);
        let report = session.tick(&career(), &mut vessel);
        assert!(report.context_changed);
        assert_eq!(report.deployed, 1);
        assert_eq!(report.consolidated, 1);
        assert_eq!(vessel.pod.as_ref().unwrap().count(), 1);

        let report = session.tick(&career(), &mut vessel);
        assert!(!report.context_changed);
        assert_eq!(report.deployed, 0);
        assert_eq!(report.consolidated, 0);
    }

    #[test]
    fn test_disabled_session_does_nothing() {
        let mut session = ScienceSession::attach(VehicleId(1), AutomationConfig::default());
        session.set_enabled(false);
        let mut vessel = probe(0.3);
        let report = session.tick(&career(), &mut vessel);
        assert!(!report.active);
        assert!(!vessel.thermometer.holds_data());
        assert!(session.toggle());
        assert!(session.tick(&career(), &mut vessel).active);
    }

    #[test]
    fn test_sandbox_mode_gated() {
        let mut session = ScienceSession::attach(VehicleId(1), AutomationConfig::default());
        let mut vessel = probe(0.3);
        let host = Host {
            mode: GameMode::Sandbox,
        };
        assert!(!session.tick(&host, &mut vessel).active);
    }

    #[test]
    fn test_no_sink_keeps_data_in_experiment() {
        let mut session = ScienceSession::attach(VehicleId(1), AutomationConfig::default());
        let mut vessel = probe(1.0);
        vessel.pod = None;
        vessel.antenna = Some(Antenna::default());
        let report = session.tick(&career(), &mut vessel);
        assert_eq!(report.deployed, 1);
        assert_eq!(report.transmitted, 0);
        assert!(vessel.thermometer.holds_data());
    }

    #[test]
    fn test_transmit_then_receipt_releases() {
        let mut session = ScienceSession::attach(VehicleId(1), AutomationConfig::default());
        let receipts = session.receipts();
        let mut vessel = probe(1.0);
        vessel.antenna = Some(Antenna::default());

        let report = session.tick(&career(), &mut vessel);
        assert_eq!(report.transmitted, 1);
        let subject = vessel.antenna.as_ref().unwrap().sent[0].subject.clone();
        assert!(session.ledger().is_in_flight(&subject));
        assert_eq!(session.ledger().count(&subject), 1);

        assert!(receipts.science_received(subject.clone()));
        session.set_enabled(false);
        let report = session.tick(&career(), &mut vessel);
        assert_eq!(report.receipts, 1);
        assert_eq!(session.ledger().count(&subject), 0);
    }
}
