use serde::{Deserialize, Serialize};

/// Last day (0-based) on which infected cluster members travel at the full
/// trip probability under the partial-quarantine policy.
pub const PARTIAL_QUARANTINE_DAY: u32 = 5;

/// Travel-restriction variants applied to infected cluster members before the
/// cluster is identified and quarantined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyVersion {
    /// Unrestricted travel: the trip probability applies for the whole window.
    #[serde(alias = "version1")]
    V1,
    /// Partial quarantine: full trip probability through day 5, reduced by
    /// the policy compliance probability afterward.
    #[serde(alias = "version2")]
    V2,
}

/// Accumulates the travel exposure score of one trial.
///
/// Each update folds the whole current accumulator back through the trip
/// multiplier, so updates must be applied one event at a time in the order the
/// infections are discovered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelExposure {
    pub policy: PolicyVersion,
    pub trip_prob: f64,
    pub policy_compliance_prob: f64,
    pub num_days: u32,
}

impl TravelExposure {
    /// Exposure after a member becomes infected on `day`, given the exposure
    /// accumulated so far.
    #[must_use]
    pub fn on_infection(&self, exposure: f64, day: u32) -> f64 {
        let num_days = f64::from(self.num_days);
        let day = f64::from(day);
        match self.policy {
            PolicyVersion::V1 => self.trip_prob * (exposure + (num_days - day)),
            PolicyVersion::V2 => {
                let switch_day = f64::from(PARTIAL_QUARANTINE_DAY);
                let restricted_trip_prob = self.trip_prob * self.policy_compliance_prob;
                if day <= switch_day {
                    self.trip_prob * (exposure + (switch_day - day))
                        + restricted_trip_prob * (exposure + (num_days - switch_day))
                } else {
                    restricted_trip_prob * (exposure + (num_days - day))
                }
            }
        }
    }

    /// Exposure after adding the index case's own travel. The index case is
    /// infected before the window opens, so it travels from day 0.
    #[must_use]
    pub fn index_case(&self, exposure: f64) -> f64 {
        self.on_infection(exposure, 0)
    }
}
