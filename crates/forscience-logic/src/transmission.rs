//! Transmission queueing and completion receipts.
//!
//! At most one unit per subject is in flight at a time. Completion arrives
//! asynchronously from the host as a [`Receipt`] posted through a
//! [`ReceiptSender`]; the session drains receipts at the start of each tick.

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::data::{HolderKind, ScienceContainer};
use crate::host::Transmitter;
use crate::ledger::ScienceLedger;
use crate::subject::SubjectId;

/// Host notification that a transmission for `subject` was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub subject: SubjectId,
}

/// Cloneable handle the host uses to report completed transmissions.
#[derive(Debug, Clone)]
pub struct ReceiptSender {
    tx: Sender<Receipt>,
}

impl ReceiptSender {
    pub(crate) fn new(tx: Sender<Receipt>) -> Self {
        Self { tx }
    }

    /// Report that data for `subject` arrived. Returns false if the session
    /// has already been detached.
    pub fn science_received(&self, subject: SubjectId) -> bool {
        self.tx.send(Receipt { subject }).is_ok()
    }
}

/// Queue every held unit that is worth transmitting. Returns the number of
/// units handed to the transmitter.
pub fn transmit_eligible(
    holders: &mut [&mut dyn ScienceContainer],
    transmitter: Option<&mut dyn Transmitter>,
    ledger: &mut ScienceLedger,
    threshold: f32,
) -> usize {
    let Some(transmitter) = transmitter else {
        for unit in holders.iter().flat_map(|h| h.data()) {
            log::debug!("Have {} to transmit but no transmitter", unit.subject);
        }
        return 0;
    };

    let mut sent = 0;
    for holder in holders.iter_mut() {
        let candidates: Vec<(SubjectId, f32)> = holder
            .data()
            .iter()
            .map(|unit| (unit.subject.clone(), unit.transmit_value))
            .collect();

        for (subject, transmit_value) in candidates {
            if ledger.is_in_flight(&subject) {
                log::debug!("Transmit queue already has {}", subject);
                continue;
            }
            if transmit_value < threshold {
                log::debug!(
                    "Transmit value {:.2} below {:.2} for {}",
                    transmit_value,
                    threshold,
                    subject
                );
                continue;
            }
            let Some(unit) = holder.dump(&subject) else {
                continue;
            };
            ledger.mark_in_flight(&subject);
            if holder.kind() == HolderKind::Container {
                ledger.remove_resident(&subject);
            }
            log::info!("Transmitting {}", subject);
            transmitter.transmit(unit);
            sent += 1;
        }
    }
    sent
}
