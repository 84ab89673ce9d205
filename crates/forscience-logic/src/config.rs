//! Automation configuration.
//!
//! Thresholds and gating that the session consults each tick. Loaded from
//! JSON; every field has a default so a partial document is valid.

use serde::{Deserialize, Serialize};

use crate::context::GameMode;

/// Materiality threshold below which an experiment is not worth running.
pub const DEFAULT_MATERIALITY_THRESHOLD: f32 = 0.1;

/// Transmit-value fraction below which data is kept for recovery instead.
pub const DEFAULT_TRANSMIT_THRESHOLD: f32 = 0.40;

/// Settings for one automation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Toggle state of a newly attached session.
    pub enabled: bool,
    pub materiality_threshold: f32,
    pub transmit_threshold: f32,
    /// Crew trait that allows re-running non-rerunnable experiments.
    pub crew_trait: String,
    /// Game modes in which the tick does any work.
    pub allowed_modes: Vec<GameMode>,
    /// Whether the transmission phase runs.
    pub transmit: bool,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            materiality_threshold: DEFAULT_MATERIALITY_THRESHOLD,
            transmit_threshold: DEFAULT_TRANSMIT_THRESHOLD,
            crew_trait: "Scientist".to_string(),
            allowed_modes: vec![GameMode::Career, GameMode::ScienceSandbox],
            transmit: true,
        }
    }
}

impl AutomationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.materiality_threshold.is_finite() || self.materiality_threshold < 0.0 {
            return Err(ConfigError::MaterialityThreshold(self.materiality_threshold));
        }
        if !(0.0..=1.0).contains(&self.transmit_threshold) {
            return Err(ConfigError::TransmitThreshold(self.transmit_threshold));
        }
        if self.crew_trait.trim().is_empty() {
            return Err(ConfigError::EmptyCrewTrait);
        }
        Ok(())
    }

    /// Whether automation runs at all in `mode`.
    pub fn runs_in(&self, mode: GameMode) -> bool {
        self.allowed_modes.contains(&mode)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse automation config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Materiality threshold must be finite and non-negative, got {0}")]
    MaterialityThreshold(f32),

    #[error("Transmit threshold must be within [0, 1], got {0}")]
    TransmitThreshold(f32),

    #[error("Crew trait must not be empty")]
    EmptyCrewTrait,
}
