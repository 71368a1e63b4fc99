//! Imperfect intelligence
//!
//! Each side sees the other through bounded noise drawn independently every
//! step. The RNG is owned by the engine and passed in, so runs are
//! reproducible from the seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::conflict::state::SimulationState;

/// Ratios as each side perceives them this step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intelligence {
    /// Government's estimate of INS / PT
    pub perceived_insurgent_ratio: f64,
    /// Insurgents' estimate of GC / PT
    pub perceived_government_ratio: f64,
}

impl Intelligence {
    /// Noise-free estimates
    pub fn exact(state: &SimulationState) -> Self {
        Self {
            perceived_insurgent_ratio: state.insurgent_ratio(),
            perceived_government_ratio: state.government_ratio(),
        }
    }
}

/// Sample this step's perceptions
///
/// Always consumes exactly two draws (government first), even with a zero
/// band, so the stream position depends only on the step count.
pub fn gather_intelligence<R: Rng + ?Sized>(
    state: &SimulationState,
    noise_band: f64,
    rng: &mut R,
) -> Intelligence {
    let government_view = perturb(state.insurgent_ratio(), noise_band, rng);
    let insurgent_view = perturb(state.government_ratio(), noise_band, rng);

    Intelligence {
        perceived_insurgent_ratio: government_view,
        perceived_government_ratio: insurgent_view,
    }
}

/// `ratio * (1 + u)`, `u ~ U[-band, band]`, kept inside [0, 1]
fn perturb<R: Rng + ?Sized>(ratio: f64, band: f64, rng: &mut R) -> f64 {
    let unit: f64 = rng.gen();
    let u = band * (2.0 * unit - 1.0);
    (ratio * (1.0 + u)).clamp(0.0, 1.0)
}
