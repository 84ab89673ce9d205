//! ForScience Headless Simulation Harness
//!
//! Flies a simulated vessel through a flight plan and checks the automation
//! against it. Runs entirely in-process, no game client required.
//!
//! Usage:
//!   cargo run -p forscience-simtest
//!   cargo run -p forscience-simtest -- --verbose

use std::collections::BTreeSet;

use forscience_core::archive::ResearchArchive;
use forscience_core::catalog::stock_experiment;
use forscience_core::components::{Part, ScienceModule};
use forscience_core::engine::FlightEngine;
use forscience_core::generation::VesselConfig;
use forscience_logic::config::{AutomationConfig, ConfigError};
use forscience_logic::context::{Context, GameMode, Situation, VehicleId};
use forscience_logic::data::{HolderKind, ScienceContainer};
use forscience_logic::host::ScienceHost;
use forscience_logic::value::{decayed_value, duplicate_divisor};
use serde::Deserialize;

// ── Data files ──────────────────────────────────────────────────────────
const AUTOMATION_JSON: &str = include_str!("../../../data/automation.json");
const FLIGHT_PLAN_JSON: &str = include_str!("../../../data/flight_plan.json");

#[derive(Debug, Deserialize)]
struct Waypoint {
    body: String,
    situation: Situation,
    biome: String,
    seconds: f32,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== ForScience Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Automation config
    let config = validate_config(&mut results).unwrap_or_default();

    // 2. Duplicate decay
    results.extend(validate_value_model());

    // 3. Archive saturation
    results.extend(validate_archive());

    // 4. Flight plan sweep
    results.extend(validate_flight_plan(&config, verbose));

    // 5. Toggle and game-mode gates
    results.extend(validate_gates(&config));

    // 6. Missing hardware
    results.extend(validate_missing_hardware(&config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Automation Config ────────────────────────────────────────────────

fn validate_config(results: &mut Vec<TestResult>) -> Option<AutomationConfig> {
    println!("--- Automation Config ---");

    let config = match AutomationConfig::from_json(AUTOMATION_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: e.to_string(),
            });
            return None;
        }
    };

    results.push(TestResult {
        name: "config_matches_defaults".into(),
        passed: config == AutomationConfig::default(),
        detail: format!(
            "materiality {} transmit {} trait {}",
            config.materiality_threshold, config.transmit_threshold, config.crew_trait
        ),
    });

    let bad_threshold = AutomationConfig::from_json(r#"{ "transmit_threshold": 1.5 }"#);
    results.push(TestResult {
        name: "config_rejects_transmit_threshold".into(),
        passed: matches!(bad_threshold, Err(ConfigError::TransmitThreshold(_))),
        detail: format!("{:?}", bad_threshold.err()),
    });

    let empty_trait = AutomationConfig::from_json(r#"{ "crew_trait": "  " }"#);
    results.push(TestResult {
        name: "config_rejects_empty_trait".into(),
        passed: matches!(empty_trait, Err(ConfigError::EmptyCrewTrait)),
        detail: format!("{:?}", empty_trait.err()),
    });

    let garbage = AutomationConfig::from_json("not json");
    results.push(TestResult {
        name: "config_rejects_garbage".into(),
        passed: matches!(garbage, Err(ConfigError::Parse(_))),
        detail: "parse error surfaced".into(),
    });

    Some(config)
}

// ── 2. Value Model ──────────────────────────────────────────────────────

fn validate_value_model() -> Vec<TestResult> {
    println!("--- Duplicate Decay ---");
    let mut results = Vec::new();

    let divisors: Vec<f32> = (0..5).map(duplicate_divisor).collect();
    results.push(TestResult {
        name: "decay_divisors".into(),
        passed: divisors == vec![1.0, 1.0, 4.0, 16.0, 64.0],
        detail: format!("{:?}", divisors),
    });

    let fresh = decayed_value(10.0, 6.0, 0);
    let second = decayed_value(10.0, 6.0, 1);
    let third = decayed_value(10.0, 6.0, 2);
    results.push(TestResult {
        name: "decay_uses_next_value_once_held".into(),
        passed: fresh == 10.0 && second == 6.0 && third == 1.5,
        detail: format!("{} / {} / {}", fresh, second, third),
    });

    let monotonic = (1..8).all(|n| decayed_value(10.0, 6.0, n + 1) < decayed_value(10.0, 6.0, n));
    results.push(TestResult {
        name: "decay_strictly_decreasing".into(),
        passed: monotonic,
        detail: "value falls with every extra copy".into(),
    });

    results
}

// ── 3. Archive ──────────────────────────────────────────────────────────

fn validate_archive() -> Vec<TestResult> {
    println!("--- Research Archive ---");
    let mut results = Vec::new();

    let mut archive = ResearchArchive::new(GameMode::Career);
    let context = Context::new(VehicleId(1), "Mun", Situation::Landed, "Midlands");
    let Some(stock) = stock_experiment("temperatureScan") else {
        results.push(TestResult {
            name: "archive_catalog".into(),
            passed: false,
            detail: "temperatureScan missing from catalog".into(),
        });
        return results;
    };

    let subject = archive.register(&stock.definition, &context);
    let amount = stock.definition.data_amount();
    let current = archive.science_value(&subject, amount);
    let next = archive.next_science_value(&subject, amount);
    results.push(TestResult {
        name: "archive_next_below_current".into(),
        passed: next < current && next >= 0.0,
        detail: format!("{} current {:.2} next {:.2}", subject, current, next),
    });

    let mut awards = Vec::new();
    for _ in 0..4 {
        awards.push(archive.submit(&subject, amount));
    }
    let saturating = awards.windows(2).all(|w| w[1] <= w[0]);
    results.push(TestResult {
        name: "archive_saturates".into(),
        passed: saturating && archive.science_value(&subject, amount) < current,
        detail: format!("awards {:?}", awards),
    });

    let sample = stock_experiment("surfaceSample").map(|s| s.definition);
    let locked = sample.as_ref().is_some_and(|d| !archive.is_unlocked(d));
    archive.facilities.astronaut_complex = 2;
    archive.facilities.research_and_development = 2;
    let unlocked = sample.as_ref().is_some_and(|d| archive.is_unlocked(d));
    results.push(TestResult {
        name: "archive_facility_gating".into(),
        passed: locked && unlocked,
        detail: "surface samples need tier-2 facilities".into(),
    });

    results
}

// ── 4. Flight Plan ──────────────────────────────────────────────────────

fn validate_flight_plan(config: &AutomationConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Flight Plan Sweep ---");
    let mut results = Vec::new();

    let plan: Vec<Waypoint> = match serde_json::from_str(FLIGHT_PLAN_JSON) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "flight_plan_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let vessel = VesselConfig {
        scientist: true,
        crew_size: 3,
        ..VesselConfig::default()
    };
    let mut engine = FlightEngine::with_seed(GameMode::Career, vessel, config.clone(), 42);

    let mut max_in_flight = 0;
    let mut duplicate_in_sink = None;
    let mut visited = 0;
    let mut unknown = Vec::new();

    for waypoint in &plan {
        if !engine.move_to(&waypoint.body, waypoint.situation, &waypoint.biome) {
            unknown.push(format!("{} {}", waypoint.body, waypoint.biome));
        }
        let steps = (waypoint.seconds / 0.1).ceil() as u32;
        for _ in 0..steps {
            engine.update(0.1);
            let ledger = engine.session.ledger();
            let most = ledger.in_flight().iter().map(|(_, n)| n).max().unwrap_or(0);
            max_in_flight = max_in_flight.max(most);
            if duplicate_in_sink.is_none() {
                duplicate_in_sink = sink_duplicate(&engine);
            }
        }
        visited += 1;
        if verbose {
            let totals = engine.totals();
            println!(
                "  {} {:?} {}: deployed {} transmitted {} earned {:.1}",
                waypoint.body,
                waypoint.situation,
                waypoint.biome,
                totals.deployed,
                totals.transmitted,
                totals.science_earned
            );
        }
    }

    results.push(TestResult {
        name: "flight_plan_locations_known".into(),
        passed: unknown.is_empty(),
        detail: if unknown.is_empty() {
            format!("{} waypoints on cataloged biomes", plan.len())
        } else {
            format!("unknown: {}", unknown.join(", "))
        },
    });

    let totals = engine.totals();
    results.push(TestResult {
        name: "flight_context_changes".into(),
        passed: totals.context_changes as usize == visited,
        detail: format!("{} changes over {} waypoints", totals.context_changes, visited),
    });

    results.push(TestResult {
        name: "flight_collects_science".into(),
        passed: totals.deployed > visited && totals.science_earned > 0.0,
        detail: format!(
            "{} deployed, {} transmitted, {:.1} science",
            totals.deployed, totals.transmitted, totals.science_earned
        ),
    });

    results.push(TestResult {
        name: "flight_single_transmission_per_subject".into(),
        passed: max_in_flight <= 1,
        detail: format!("max {} in flight for one subject", max_in_flight),
    });

    results.push(TestResult {
        name: "flight_sink_has_no_duplicates".into(),
        passed: duplicate_in_sink.is_none(),
        detail: match &duplicate_in_sink {
            Some(s) => format!("{} held twice", s),
            None => "every subject held at most once".into(),
        },
    });

    results.push(TestResult {
        name: "flight_receipts_release".into(),
        passed: totals.received <= totals.transmitted,
        detail: format!("{} of {} transmissions received", totals.received, totals.transmitted),
    });

    // Let the uplink finish whatever is still queued.
    for _ in 0..600 {
        engine.update(0.1);
    }
    let ledger = engine.session.ledger();
    let idle = engine.vessel.uplink.as_ref().map_or(true, |u| u.is_idle());
    results.push(TestResult {
        name: "flight_uplink_drains".into(),
        passed: idle && ledger.in_flight().is_empty(),
        detail: format!("{} subjects still in flight", ledger.in_flight().len()),
    });

    results.push(TestResult {
        name: "flight_kept_low_transmit_data".into(),
        passed: engine.vessel.units_in_containers() > 0,
        detail: format!(
            "{} units kept aboard for recovery",
            engine.vessel.units_in_containers()
        ),
    });

    results
}

/// First subject held more than once by the sink, if any.
fn sink_duplicate(engine: &FlightEngine) -> Option<String> {
    let mut query = engine.vessel.world.query::<(&Part, &ScienceModule)>();
    let sink = query
        .iter()
        .filter(|(_, (_, m))| m.kind() == HolderKind::Container)
        .min_by_key(|(_, (p, _))| p.order)
        .map(|(_, (_, m))| m)?;

    let mut seen = BTreeSet::new();
    sink.data()
        .iter()
        .find(|u| !seen.insert(u.subject.clone()))
        .map(|u| u.subject.to_string())
}

// ── 5. Gates ────────────────────────────────────────────────────────────

fn validate_gates(config: &AutomationConfig) -> Vec<TestResult> {
    println!("--- Toggle & Game Mode ---");
    let mut results = Vec::new();

    let mut engine =
        FlightEngine::with_seed(GameMode::Career, VesselConfig::default(), config.clone(), 1);
    engine.toggle();
    engine.update(1.0);
    let while_disabled = engine.totals().deployed;
    engine.toggle();
    engine.update(0.1);
    results.push(TestResult {
        name: "gate_toggle".into(),
        passed: while_disabled == 0 && engine.totals().deployed > 0,
        detail: format!(
            "disabled deployed {}, enabled deployed {}",
            while_disabled,
            engine.totals().deployed
        ),
    });

    for (mode, expect_active) in [
        (GameMode::Career, true),
        (GameMode::ScienceSandbox, true),
        (GameMode::Sandbox, false),
    ] {
        let mut engine = FlightEngine::with_seed(mode, VesselConfig::default(), config.clone(), 1);
        engine.update(0.1);
        let active = engine.last_report().active;
        results.push(TestResult {
            name: format!("gate_mode_{:?}", mode),
            passed: active == expect_active,
            detail: format!("active {}", active),
        });
    }

    results
}

// ── 6. Missing Hardware ─────────────────────────────────────────────────

fn validate_missing_hardware(config: &AutomationConfig) -> Vec<TestResult> {
    println!("--- Missing Hardware ---");
    let mut results = Vec::new();

    let no_antenna = VesselConfig {
        antenna_bandwidth: None,
        ..VesselConfig::default()
    };
    let mut engine = FlightEngine::with_seed(GameMode::Career, no_antenna, config.clone(), 3);
    engine.update(1.0);
    let totals = engine.totals();
    results.push(TestResult {
        name: "hardware_no_antenna".into(),
        passed: totals.transmitted == 0
            && totals.consolidated > 0
            && engine.vessel.units_in_containers() == totals.deployed,
        detail: format!("{} units consolidated, none sent", totals.consolidated),
    });

    let mut engine =
        FlightEngine::with_seed(GameMode::Career, VesselConfig::default(), config.clone(), 4);
    let pods: Vec<_> = engine
        .vessel
        .world
        .query::<&ScienceModule>()
        .iter()
        .filter(|(_, m)| m.kind() == HolderKind::Container)
        .map(|(e, _)| e)
        .collect();
    for pod in pods {
        engine.vessel.remove_part(pod);
    }
    engine.update(1.0);
    let totals = engine.totals();
    results.push(TestResult {
        name: "hardware_no_container".into(),
        passed: totals.deployed > 0
            && totals.consolidated == 0
            && totals.transmitted == 0
            && engine.vessel.units_aboard() == totals.deployed,
        detail: format!("{} units left in experiments", engine.vessel.units_aboard()),
    });

    results
}
