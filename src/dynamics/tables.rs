//! Named curve registry
//!
//! Every non-linear relationship in the model is a [`LookupTable`] keyed by a
//! [`CurveId`]. A [`TableSet`] is built once per scenario, validated up
//! front, then shared read-only (typically behind an `Arc`) by every run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{InsurgencyError, Result};
use crate::dynamics::lookup::LookupTable;

/// Canonical identifier of each curve the sectors consult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurveId {
    /// Insurgent indicated propaganda effort vs perceived government share
    InsurgentPropagandaEffort,
    /// Government indicated propaganda effort vs perceived insurgent share
    GovernmentPropagandaEffort,
    /// Probability insurgent propaganda reaches a person vs insurgent effort
    InsurgentReach,
    /// Probability government propaganda reaches a person vs government effort
    GovernmentReach,
    /// Neutral -> insurgent conversion factor vs insurgent share
    NeutralToInsurgent,
    /// Neutral -> government conversion factor vs government share
    NeutralToGovernment,
    /// Government -> insurgent conversion factor vs insurgent share
    GovernmentToInsurgent,
    /// Insurgent -> government conversion factor vs government share
    InsurgentToGovernment,
    /// Share of insurgents under arms vs insurgent share
    InsurgentTroopShare,
    /// Engagements per time unit vs insurgent troops (guerrilla)
    EngagementFrequencyGuerrilla,
    /// Engagements per time unit vs insurgent troops (conventional)
    EngagementFrequencyConventional,
    /// Insurgents committed per engagement vs insurgent troops (guerrilla)
    InsurgentForceSizeGuerrilla,
    /// Insurgents committed per engagement vs insurgent troops (conventional)
    InsurgentForceSizeConventional,
    /// Government force multiplier vs troop ratio TG/TI (guerrilla)
    GovernmentForceRatioGuerrilla,
    /// Government force multiplier vs troop ratio TG/TI (conventional)
    GovernmentForceRatioConventional,
    /// Desired regulars per capita vs perceived insurgent share
    RegularsTarget,
}

impl CurveId {
    pub const ALL: [CurveId; 16] = [
        CurveId::InsurgentPropagandaEffort,
        CurveId::GovernmentPropagandaEffort,
        CurveId::InsurgentReach,
        CurveId::GovernmentReach,
        CurveId::NeutralToInsurgent,
        CurveId::NeutralToGovernment,
        CurveId::GovernmentToInsurgent,
        CurveId::InsurgentToGovernment,
        CurveId::InsurgentTroopShare,
        CurveId::EngagementFrequencyGuerrilla,
        CurveId::EngagementFrequencyConventional,
        CurveId::InsurgentForceSizeGuerrilla,
        CurveId::InsurgentForceSizeConventional,
        CurveId::GovernmentForceRatioGuerrilla,
        CurveId::GovernmentForceRatioConventional,
        CurveId::RegularsTarget,
    ];

    /// Key used in scenario files
    pub fn name(&self) -> &'static str {
        match self {
            CurveId::InsurgentPropagandaEffort => "insurgent_propaganda_effort",
            CurveId::GovernmentPropagandaEffort => "government_propaganda_effort",
            CurveId::InsurgentReach => "insurgent_reach",
            CurveId::GovernmentReach => "government_reach",
            CurveId::NeutralToInsurgent => "neutral_to_insurgent",
            CurveId::NeutralToGovernment => "neutral_to_government",
            CurveId::GovernmentToInsurgent => "government_to_insurgent",
            CurveId::InsurgentToGovernment => "insurgent_to_government",
            CurveId::InsurgentTroopShare => "insurgent_troop_share",
            CurveId::EngagementFrequencyGuerrilla => "engagement_frequency_guerrilla",
            CurveId::EngagementFrequencyConventional => "engagement_frequency_conventional",
            CurveId::InsurgentForceSizeGuerrilla => "insurgent_force_size_guerrilla",
            CurveId::InsurgentForceSizeConventional => "insurgent_force_size_conventional",
            CurveId::GovernmentForceRatioGuerrilla => "government_force_ratio_guerrilla",
            CurveId::GovernmentForceRatioConventional => "government_force_ratio_conventional",
            CurveId::RegularsTarget => "regulars_target",
        }
    }

    pub fn from_name(name: &str) -> Option<CurveId> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Raw curve data as it appears in a scenario: name -> `[[x, y], ...]`
pub type CurveData = BTreeMap<String, Vec<[f64; 2]>>;

/// Validated, immutable set of every curve the model needs
#[derive(Debug, Clone)]
pub struct TableSet {
    tables: Vec<LookupTable>,
}

impl TableSet {
    /// Build from scenario curve data
    ///
    /// Fails on the first missing, unknown or malformed curve.
    pub fn from_curves(curves: &CurveData) -> Result<Self> {
        if let Some(unknown) = curves.keys().find(|k| CurveId::from_name(k).is_none()) {
            return Err(InsurgencyError::UnknownTable(unknown.clone()));
        }

        let mut tables = Vec::with_capacity(CurveId::ALL.len());
        for curve in CurveId::ALL {
            let pairs = curves
                .get(curve.name())
                .ok_or_else(|| InsurgencyError::MissingTable(curve.name().to_string()))?;
            tables.push(LookupTable::from_pairs(curve.name(), pairs)?);
        }

        Ok(Self { tables })
    }

    /// The built-in baseline curves
    pub fn baseline() -> Result<Self> {
        Self::from_curves(&baseline_curves())
    }

    pub fn table(&self, curve: CurveId) -> &LookupTable {
        &self.tables[curve.index()]
    }

    /// Shorthand for `table(curve).evaluate(x)`
    pub fn lookup(&self, curve: CurveId, x: f64) -> f64 {
        self.table(curve).evaluate(x)
    }
}

/// Baseline curve data
///
/// Time unit is one month. Effort is in abstract propaganda units (0-10).
/// Conversion factors are monthly fractions.
pub fn baseline_curves() -> CurveData {
    let mut curves = CurveData::new();
    let mut add = |curve: CurveId, points: &[[f64; 2]]| {
        curves.insert(curve.name().to_string(), points.to_vec());
    };

    // Insurgents push harder the more firmly the government holds the population
    add(
        CurveId::InsurgentPropagandaEffort,
        &[[0.0, 2.0], [0.25, 4.0], [0.5, 6.0], [0.75, 8.0], [1.0, 9.0]],
    );
    // Government responds to visible insurgent strength
    add(
        CurveId::GovernmentPropagandaEffort,
        &[[0.0, 1.0], [0.01, 3.0], [0.05, 6.0], [0.1, 8.0], [0.3, 10.0]],
    );
    add(
        CurveId::InsurgentReach,
        &[[0.0, 0.0], [2.0, 0.2], [5.0, 0.5], [10.0, 0.7]],
    );
    add(
        CurveId::GovernmentReach,
        &[[0.0, 0.0], [2.0, 0.15], [5.0, 0.4], [10.0, 0.6]],
    );
    add(
        CurveId::NeutralToInsurgent,
        &[[0.0, 0.005], [0.05, 0.01], [0.2, 0.02], [0.5, 0.03]],
    );
    add(
        CurveId::NeutralToGovernment,
        &[[0.0, 0.002], [0.25, 0.005], [0.5, 0.01], [1.0, 0.015]],
    );
    add(
        CurveId::GovernmentToInsurgent,
        &[[0.0, 0.001], [0.05, 0.003], [0.2, 0.008], [0.5, 0.015]],
    );
    add(
        CurveId::InsurgentToGovernment,
        &[[0.0, 0.005], [0.5, 0.01], [1.0, 0.02]],
    );
    add(
        CurveId::InsurgentTroopShare,
        &[[0.0, 0.6], [0.01, 0.5], [0.1, 0.35], [0.5, 0.25]],
    );
    add(
        CurveId::EngagementFrequencyGuerrilla,
        &[[0.0, 0.0], [500.0, 4.0], [1000.0, 8.0]],
    );
    add(
        CurveId::EngagementFrequencyConventional,
        &[[1000.0, 10.0], [5000.0, 20.0], [20000.0, 30.0]],
    );
    add(
        CurveId::InsurgentForceSizeGuerrilla,
        &[[0.0, 5.0], [500.0, 20.0], [1000.0, 40.0]],
    );
    add(
        CurveId::InsurgentForceSizeConventional,
        &[[1000.0, 200.0], [5000.0, 500.0], [20000.0, 1000.0]],
    );
    add(
        CurveId::GovernmentForceRatioGuerrilla,
        &[[0.0, 0.5], [1.0, 1.0], [10.0, 2.0], [50.0, 3.0]],
    );
    add(
        CurveId::GovernmentForceRatioConventional,
        &[[0.0, 0.5], [1.0, 1.0], [5.0, 1.5]],
    );
    add(
        CurveId::RegularsTarget,
        &[[0.0, 0.02], [0.005, 0.03], [0.02, 0.05], [0.1, 0.08], [0.3, 0.1]],
    );

    curves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_covers_every_curve() {
        let tables = TableSet::baseline().unwrap();
        for curve in CurveId::ALL {
            assert_eq!(tables.table(curve).name(), curve.name());
        }
    }

    #[test]
    fn test_curve_index_matches_all_order() {
        for (i, curve) in CurveId::ALL.iter().enumerate() {
            assert_eq!(curve.index(), i);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for curve in CurveId::ALL {
            assert_eq!(CurveId::from_name(curve.name()), Some(curve));
        }
        assert_eq!(CurveId::from_name("no_such_curve"), None);
    }

    #[test]
    fn test_missing_curve_is_named() {
        let mut curves = baseline_curves();
        curves.remove("regulars_target");
        let err = TableSet::from_curves(&curves).unwrap_err();
        assert!(matches!(err, InsurgencyError::MissingTable(ref n) if n == "regulars_target"));
    }

    #[test]
    fn test_unknown_curve_is_rejected() {
        let mut curves = baseline_curves();
        curves.insert("regulars_targte".into(), vec![[0.0, 1.0]]);
        let err = TableSet::from_curves(&curves).unwrap_err();
        assert!(matches!(err, InsurgencyError::UnknownTable(ref n) if n == "regulars_targte"));
    }

    #[test]
    fn test_malformed_curve_names_table() {
        let mut curves = baseline_curves();
        curves.insert("insurgent_reach".into(), vec![[1.0, 0.0], [1.0, 0.5]]);
        let err = TableSet::from_curves(&curves).unwrap_err();
        assert!(err.to_string().contains("insurgent_reach"));
    }

    #[test]
    fn test_lookup_shorthand() {
        let tables = TableSet::baseline().unwrap();
        assert_eq!(tables.lookup(CurveId::InsurgentReach, 5.0), 0.5);
        assert_eq!(tables.lookup(CurveId::InsurgentReach, 50.0), 0.7);
    }
}
