//! Vessel situation snapshot.
//!
//! A [`Context`] is taken once per tick from the host and never mutated. It
//! carries the four fields that decide which science subject an experiment
//! would produce: vessel, celestial body, situation class and biome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a vessel as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vessel#{}", self.0)
    }
}

/// Science situation class of a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    /// Resting on solid ground.
    Landed,
    /// Floating on or in liquid.
    Splashed,
    /// In the lower atmosphere.
    FlyingLow,
    /// In the upper atmosphere.
    FlyingHigh,
    /// In space close to the body.
    InSpaceLow,
    /// In space far from the body.
    InSpaceHigh,
}

impl Situation {
    pub const ALL: [Situation; 6] = [
        Situation::Landed,
        Situation::Splashed,
        Situation::FlyingLow,
        Situation::FlyingHigh,
        Situation::InSpaceLow,
        Situation::InSpaceHigh,
    ];

    /// Bit used in experiment situation masks.
    pub fn bit(self) -> u8 {
        match self {
            Situation::Landed => 1,
            Situation::Splashed => 2,
            Situation::FlyingLow => 4,
            Situation::FlyingHigh => 8,
            Situation::InSpaceLow => 16,
            Situation::InSpaceHigh => 32,
        }
    }

    /// Compact tag embedded in subject ids.
    pub fn tag(self) -> &'static str {
        match self {
            Situation::Landed => "SrfLanded",
            Situation::Splashed => "SrfSplashed",
            Situation::FlyingLow => "FlyingLow",
            Situation::FlyingHigh => "FlyingHigh",
            Situation::InSpaceLow => "InSpaceLow",
            Situation::InSpaceHigh => "InSpaceHigh",
        }
    }

    /// Human-readable phrase used in subject titles.
    pub fn phrase(self) -> &'static str {
        match self {
            Situation::Landed => "landed at",
            Situation::Splashed => "splashed down at",
            Situation::FlyingLow => "flying low over",
            Situation::FlyingHigh => "flying high over",
            Situation::InSpaceLow => "in space near",
            Situation::InSpaceHigh => "in space high over",
        }
    }

    /// Whether the vessel is on the surface.
    pub fn is_surface(self) -> bool {
        matches!(self, Situation::Landed | Situation::Splashed)
    }

    /// Whether the vessel is inside an atmosphere.
    pub fn is_atmospheric(self) -> bool {
        matches!(self, Situation::FlyingLow | Situation::FlyingHigh)
    }
}

/// Host game mode. Only some modes award science.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Career,
    ScienceSandbox,
    /// Free play: no science or progression.
    Sandbox,
}

/// Snapshot of where a vessel is, taken once per tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub vehicle: VehicleId,
    /// Name of the celestial body the vessel is at.
    pub body: String,
    pub situation: Situation,
    /// Biome under the vessel, empty when the body has no biome map.
    pub biome: String,
}

impl Context {
    pub fn new(
        vehicle: VehicleId,
        body: impl Into<String>,
        situation: Situation,
        biome: impl Into<String>,
    ) -> Self {
        Self {
            vehicle,
            body: body.into(),
            situation,
            biome: biome.into(),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.vehicle, self.situation.tag(), self.body)?;
        if !self.biome.is_empty() {
            write!(f, " ({})", self.biome)?;
        }
        Ok(())
    }
}
