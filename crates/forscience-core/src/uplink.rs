//! Antenna uplink - the vessel's best transmitter.
//!
//! Transmissions are sent one at a time. Each takes `amount / bandwidth`
//! seconds scaled by signal strength, with some jitter; with no signal the
//! queue stalls indefinitely.

use std::collections::VecDeque;

use forscience_logic::data::DataUnit;
use forscience_logic::host::Transmitter;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Transfer {
    unit: DataUnit,
    remaining: f32,
}

/// Queue of data being transmitted home.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uplink {
    /// Data units per second at full signal.
    pub bandwidth: f32,
    /// Link quality in [0, 1]; 0 means no connection.
    pub signal: f32,
    queue: VecDeque<Transfer>,
}

impl Uplink {
    pub fn new(bandwidth: f32) -> Self {
        Self {
            bandwidth: bandwidth.max(f32::EPSILON),
            signal: 1.0,
            queue: VecDeque::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Progress transmissions by `delta_seconds`. Returns units that arrived.
    pub fn advance(&mut self, delta_seconds: f32, rng: &mut impl Rng) -> Vec<DataUnit> {
        let mut arrived = Vec::new();
        if self.signal <= 0.0 {
            return arrived;
        }

        let mut budget = delta_seconds * self.signal.min(1.0) * rng.gen_range(0.8..1.2);
        while budget > 0.0 {
            let Some(front) = self.queue.front_mut() else {
                break;
            };
            if front.remaining > budget {
                front.remaining -= budget;
                break;
            }
            budget -= front.remaining;
            if let Some(done) = self.queue.pop_front() {
                arrived.push(done.unit);
            }
        }
        arrived
    }
}

impl Transmitter for Uplink {
    fn transmit(&mut self, unit: DataUnit) {
        let remaining = unit.amount / self.bandwidth;
        log::debug!("Queued {} for {:.1}s of transmission", unit.subject, remaining);
        self.queue.push_back(Transfer { unit, remaining });
    }
}
