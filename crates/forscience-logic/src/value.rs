//! Science value with duplicate decay.
//!
//! The host supplies the value curve; this module applies the gain
//! multiplier and the duplicate rule. With `count` units of a subject
//! already held or in flight, one more is worth:
//!
//! | count | value |
//! |-------|-------|
//! | 0 | current value |
//! | 1 | next value |
//! | n > 1 | next value / 4^(n-1) |

use crate::host::ScienceHost;
use crate::ledger::ScienceLedger;
use crate::subject::SubjectId;

/// Each additional duplicate is worth this factor less than the previous.
pub const DECAY_BASE: f32 = 4.0;

/// Divisor applied to the next value when `count` duplicates exist.
pub fn duplicate_divisor(count: u32) -> f32 {
    match count {
        0 | 1 => 1.0,
        n => DECAY_BASE.powi(i32::try_from(n - 1).unwrap_or(i32::MAX)),
    }
}

/// Apply the duplicate rule to a current/next value pair.
pub fn decayed_value(current: f32, next: f32, count: u32) -> f32 {
    if count == 0 {
        current
    } else {
        next / duplicate_divisor(count)
    }
}

/// Values subjects against the host's research archive.
#[derive(Clone, Copy)]
pub struct ValueModel<'a> {
    host: &'a dyn ScienceHost,
}

impl<'a> ValueModel<'a> {
    pub fn new(host: &'a dyn ScienceHost) -> Self {
        Self { host }
    }

    /// Value of `data_amount` at the subject's present saturation.
    pub fn current_value(&self, subject: &SubjectId, data_amount: f32) -> f32 {
        self.host.science_value(subject, data_amount) * self.host.gain_multiplier()
    }

    /// Value of one more unit after the current one has been credited.
    pub fn next_value(&self, subject: &SubjectId, data_amount: f32) -> f32 {
        self.host.next_science_value(subject, data_amount) * self.host.gain_multiplier()
    }

    /// Marginal value of collecting `subject` again, given the ledger.
    pub fn computed_value(
        &self,
        subject: &SubjectId,
        data_amount: f32,
        ledger: &ScienceLedger,
    ) -> f32 {
        let count = ledger.count(subject);
        match count {
            0 => {
                log::debug!("No duplicates for {}", subject);
                self.current_value(subject, data_amount)
            }
            n => {
                log::debug!("{} duplicate(s) for {}", n, subject);
                self.next_value(subject, data_amount) / duplicate_divisor(n)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, GameMode};
    use crate::subject::ExperimentDef;

    struct FixedArchive {
        current: f32,
        next: f32,
        gain: f32,
    }

    impl ScienceHost for FixedArchive {
        fn game_mode(&self) -> GameMode {
            GameMode::Career
        }
        fn gain_multiplier(&self) -> f32 {
            self.gain
        }
        fn science_value(&self, _: &SubjectId, _: f32) -> f32 {
            self.current
        }
        fn next_science_value(&self, _: &SubjectId, _: f32) -> f32 {
            self.next
        }
        fn is_unlocked(&self, _: &ExperimentDef) -> bool {
            true
        }
        fn is_available(&self, _: &ExperimentDef, _: &Context) -> bool {
            true
        }
    }

    #[test]
    fn test_decay_table() {
        assert_eq!(decayed_value(5.0, 3.0, 0), 5.0);
        assert_eq!(decayed_value(5.0, 3.0, 1), 3.0);
        assert_eq!(decayed_value(5.0, 3.0, 2), 3.0 / 4.0);
        assert_eq!(decayed_value(5.0, 3.0, 3), 3.0 / 16.0);
        assert_eq!(decayed_value(5.0, 3.0, 4), 3.0 / 64.0);
    }

    #[test]
    fn test_divisor_is_power_of_four() {
        assert_eq!(duplicate_divisor(0), 1.0);
        assert_eq!(duplicate_divisor(1), 1.0);
        assert_eq!(duplicate_divisor(2), 4.0);
        assert_eq!(duplicate_divisor(5), 256.0);
    }

    #[test]
    fn test_huge_counts_decay_to_zero() {
        assert_eq!(duplicate_divisor(u32::MAX), f32::INFINITY);
        assert_eq!(decayed_value(5.0, 3.0, u32::MAX), 0.0);
        assert_eq!(decayed_value(5.0, 3.0, i32::MAX as u32 + 2), 0.0);
    }

    #[test]
    fn test_gain_multiplier_applied() {
        let host = FixedArchive {
            current: 4.0,
            next: 2.0,
            gain: 1.5,
        };
        let model = ValueModel::new(&host);
        let s = SubjectId::new("s");
        assert!((model.current_value(&s, 1.0) - 6.0).abs() < 1e-6);
        assert!((model.next_value(&s, 1.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_computed_value_follows_ledger() {
        let host = FixedArchive {
            current: 5.0,
            next: 2.0,
            gain: 1.0,
        };
        let model = ValueModel::new(&host);
        let s = SubjectId::new("s");
        let mut ledger = ScienceLedger::new();
        assert_eq!(model.computed_value(&s, 1.0, &ledger), 5.0);

        ledger.add_resident(&s);
        assert_eq!(model.computed_value(&s, 1.0, &ledger), 2.0);

        ledger.mark_in_flight(&s);
        assert_eq!(
            model.computed_value(&s, 1.0, &ledger),
            model.next_value(&s, 1.0) / 4.0
        );

        ledger.add_resident(&s);
        assert_eq!(
            model.computed_value(&s, 1.0, &ledger),
            model.next_value(&s, 1.0) / 16.0
        );
    }
}
