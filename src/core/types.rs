//! Core type definitions shared by the sectors and the engine

use serde::{Deserialize, Serialize};

/// Insurgent troop level at which the war turns conventional.
///
/// Hard threshold, no hysteresis: `TI >= 1000` is conventional.
pub const CONVENTIONAL_THRESHOLD: f64 = 1000.0;

/// Simulation step counter
pub type Step = u32;

/// Warfare phase, selected once per step from insurgent troop strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarfarePhase {
    /// Small insurgent bands, hit-and-run; insurgents suffer area fire
    Guerrilla,
    /// Insurgent main-force units; both sides suffer aimed fire
    Conventional,
}

impl WarfarePhase {
    pub fn from_insurgent_troops(ti: f64) -> Self {
        if ti >= CONVENTIONAL_THRESHOLD {
            WarfarePhase::Conventional
        } else {
            WarfarePhase::Guerrilla
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WarfarePhase::Guerrilla => "guerrilla",
            WarfarePhase::Conventional => "conventional",
        }
    }
}

impl std::fmt::Display for WarfarePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Why a run stopped before its configured step count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Total population reached zero
    PopulationExtinct,
    /// No insurgents remain
    InsurgencyDefeated,
    /// No government-controlled population remains
    GovernmentCollapsed,
    /// Regulars and police are both gone
    GovernmentForcesDestroyed,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Termination::PopulationExtinct => "population extinct",
            Termination::InsurgencyDefeated => "insurgency defeated",
            Termination::GovernmentCollapsed => "government collapsed",
            Termination::GovernmentForcesDestroyed => "government forces destroyed",
        };
        f.pad(text)
    }
}
