//! Situation change detection.
//!
//! Experiments only need re-evaluating when the vessel's situation changes,
//! so the session asks the tracker before running the decision chain.

use crate::context::Context;

/// Remembers the last context seen and reports transitions.
#[derive(Debug, Clone, Default)]
pub struct SituationTracker {
    last: Option<Context>,
}

impl SituationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True on the first call and whenever vehicle, body, situation or biome
    /// differs from the previous call. The snapshot is updated on change.
    pub fn has_changed(&mut self, context: &Context) -> bool {
        let changed = match &self.last {
            None => true,
            Some(last) => {
                let vehicle = last.vehicle != context.vehicle;
                let body = last.body != context.body;
                let situation = last.situation != context.situation;
                let biome = last.biome != context.biome;
                vehicle | body | situation | biome
            }
        };
        if changed {
            self.last = Some(context.clone());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Situation, VehicleId};

    fn ctx(body: &str, situation: Situation, biome: &str) -> Context {
        Context::new(VehicleId(7), body, situation, biome)
    }

    #[test]
    fn test_first_call_reports_change() {
        let mut tracker = SituationTracker::new();
        assert!(tracker.has_changed(&ctx("Kerbin", Situation::Landed, "Launch Pad")));
    }

    #[test]
    fn test_unchanged_context_reports_once() {
        let mut tracker = SituationTracker::new();
        let c = ctx("Kerbin", Situation::Landed, "Launch Pad");
        assert!(tracker.has_changed(&c));
        assert!(!tracker.has_changed(&c));
        assert!(!tracker.has_changed(&c));
    }

    #[test]
    fn test_each_field_triggers_change() {
        let mut tracker = SituationTracker::new();
        let base = ctx("Kerbin", Situation::Landed, "Launch Pad");
        tracker.has_changed(&base);

        let mut other = base.clone();
        other.vehicle = VehicleId(8);
        assert!(tracker.has_changed(&other));

        let mut other2 = other.clone();
        other2.body = "Mun".into();
        assert!(tracker.has_changed(&other2));

        let mut other3 = other2.clone();
        other3.situation = Situation::FlyingLow;
        assert!(tracker.has_changed(&other3));

        let mut other4 = other3.clone();
        other4.biome = "Shores".into();
        assert!(tracker.has_changed(&other4));
        assert!(!tracker.has_changed(&other4));
    }

    #[test]
    fn test_returning_to_earlier_context_is_a_change() {
        let mut tracker = SituationTracker::new();
        let pad = ctx("Kerbin", Situation::Landed, "Launch Pad");
        let shores = ctx("Kerbin", Situation::FlyingLow, "Shores");
        assert!(tracker.has_changed(&pad));
        assert!(tracker.has_changed(&shores));
        assert!(tracker.has_changed(&pad));
        assert!(!tracker.has_changed(&pad));
    }
}
