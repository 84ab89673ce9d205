//! Duplicate ledger.
//!
//! Counts, per subject, how many units are resident in containers and how
//! many are in flight with a transmitter. The two sides are additive: a
//! subject held once and in flight once has a count of 2. Zero counts are
//! removed, never stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::{HolderKind, ScienceContainer};
use crate::subject::SubjectId;

/// Per-subject counter map with no zero entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCounts {
    counts: BTreeMap<SubjectId, u32>,
}

impl SubjectCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, subject: &SubjectId) {
        *self.counts.entry(subject.clone()).or_insert(0) += 1;
    }

    /// Decrement and drop the entry at zero. Returns false (and does
    /// nothing) when the subject is absent.
    pub fn decrement(&mut self, subject: &SubjectId) -> bool {
        match self.counts.get_mut(subject) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(subject);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, subject: &SubjectId) -> u32 {
        self.counts.get(subject).copied().unwrap_or(0)
    }

    pub fn contains(&self, subject: &SubjectId) -> bool {
        self.counts.contains_key(subject)
    }

    /// Number of distinct subjects.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectId, u32)> {
        self.counts.iter().map(|(s, c)| (s, *c))
    }
}

/// Resident and in-flight counts for one vessel session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScienceLedger {
    resident: SubjectCounts,
    in_flight: SubjectCounts,
}

impl ScienceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of `subject` already held in containers or in flight.
    pub fn count(&self, subject: &SubjectId) -> u32 {
        self.resident.count(subject) + self.in_flight.count(subject)
    }

    pub fn is_in_flight(&self, subject: &SubjectId) -> bool {
        self.in_flight.contains(subject)
    }

    pub fn resident(&self) -> &SubjectCounts {
        &self.resident
    }

    pub fn in_flight(&self) -> &SubjectCounts {
        &self.in_flight
    }

    /// A unit entered a container.
    pub fn add_resident(&mut self, subject: &SubjectId) {
        self.resident.increment(subject);
    }

    /// A unit left a container.
    pub fn remove_resident(&mut self, subject: &SubjectId) -> bool {
        self.resident.decrement(subject)
    }

    /// A unit was handed to a transmitter.
    pub fn mark_in_flight(&mut self, subject: &SubjectId) {
        self.in_flight.increment(subject);
    }

    /// The host reported a transmission for `subject` as received.
    pub fn release_in_flight(&mut self, subject: &SubjectId) -> bool {
        self.in_flight.decrement(subject)
    }

    /// Rebuild the resident side from what containers actually hold. The
    /// in-flight side is left untouched.
    pub fn rescan_resident(&mut self, holders: &[&mut dyn ScienceContainer]) {
        self.resident.clear();
        for holder in holders
            .iter()
            .filter(|h| h.kind() == HolderKind::Container)
        {
            for unit in holder.data() {
                self.resident.increment(&unit.subject);
            }
        }
    }
}
