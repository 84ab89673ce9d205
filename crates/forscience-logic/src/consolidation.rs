//! Data consolidation into the designated sink.
//!
//! Units are moved (not copied) from every other holder into the sink.
//! A unit whose subject the sink already held before the pass started stays
//! where it is; units that arrive during the pass do not block each other.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::{HolderKind, ScienceContainer};
use crate::ledger::ScienceLedger;
use crate::subject::SubjectId;

/// Result of one consolidation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consolidation {
    /// Units moved into the sink.
    pub moved: usize,
    /// Holders that contributed at least one candidate unit.
    pub sources: usize,
}

/// Move collected data from `sources` into `sink`, updating the ledger.
///
/// `sources` must not contain the sink itself. Sources are processed in
/// slice order, so a stable enumeration gives a reproducible pass.
pub fn consolidate(
    sources: &mut [&mut dyn ScienceContainer],
    sink: &mut dyn ScienceContainer,
    ledger: &mut ScienceLedger,
) -> Consolidation {
    let vessel_total = sink.count() + sources.iter().map(|s| s.count()).sum::<usize>();
    if sink.count() == vessel_total {
        return Consolidation::default();
    }

    let already_held: BTreeSet<SubjectId> =
        sink.data().iter().map(|unit| unit.subject.clone()).collect();

    let candidates: Vec<usize> = sources
        .iter()
        .enumerate()
        .filter(|(_, source)| source.count() > 0)
        .filter(|(_, source)| {
            !source
                .data()
                .iter()
                .all(|unit| already_held.contains(&unit.subject))
        })
        .map(|(idx, _)| idx)
        .collect();

    let mut result = Consolidation {
        moved: 0,
        sources: candidates.len(),
    };
    if candidates.is_empty() {
        return result;
    }

    log::info!(
        "Moving data from {} holder(s) into the sink",
        candidates.len()
    );

    'sources: for idx in candidates {
        let source = &mut *sources[idx];
        let to_move: Vec<SubjectId> = source
            .data()
            .iter()
            .filter(|unit| !already_held.contains(&unit.subject))
            .map(|unit| unit.subject.clone())
            .collect();

        for subject in to_move {
            if !sink.has_room() {
                log::warn!("Sink is full, {} stays where it is", subject);
                break 'sources;
            }
            let Some(unit) = source.dump(&subject) else {
                continue;
            };
            if source.kind() == HolderKind::Container {
                ledger.remove_resident(&subject);
            }
            sink.store(unit);
            ledger.add_resident(&subject);
            result.moved += 1;
        }
    }

    result
}
