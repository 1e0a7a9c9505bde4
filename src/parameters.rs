use ixa::{define_global_property, ContextGlobalPropertiesExt, IxaError};
use serde::{Deserialize, Serialize};

use crate::policies::PolicyVersion;

/// Smallest grid spacing accepted for sweeps.
pub const MIN_GRID_STEP: f64 = 1e-3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GridSearchParams {
    /// Spacing of the trip probability and policy compliance probability grid.
    pub step: f64,
    /// Name of the R0 surface report.
    pub report_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CriticalBoundaryParams {
    /// Spacing of the trip probability grid and of the downward walk over the
    /// policy compliance probability.
    pub step: f64,
    /// R0 value the cluster must stay below.
    pub r0_threshold: f64,
    /// Name of the critical boundary report.
    pub report_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// The random seed for the simulation.
    #[serde(default)]
    pub seed: u64,
    /// Number of people in the cluster, index case included.
    pub cluster_size: usize,
    /// Probability that one contagious member infects one susceptible member
    /// on a given day. Also the per-contact probability used for travel contacts.
    pub per_contact_transmission_prob: f64,
    /// Baseline daily probability that an infected member travels.
    pub trip_prob: f64,
    /// Multiplier applied to travel after the partial-quarantine day under `V2`.
    pub policy_compliance_prob: f64,
    /// Expected number of travel contacts per unit of travel exposure.
    pub contacts_per_trip: f64,
    pub policy: PolicyVersion,
    /// Length of the incubation/observation window in days.
    #[serde(default = "default_num_days")]
    pub num_days: u32,
    /// Days a newly infected member stays contagious.
    #[serde(default = "default_infectious_duration")]
    pub infectious_duration: u32,
    /// Number of independent trials aggregated into one estimate.
    #[serde(default = "default_num_trials")]
    pub num_trials: usize,
    /// Name of the headline estimate report.
    #[serde(default)]
    pub estimate_report_name: Option<String>,
    #[serde(default)]
    pub grid_search: Option<GridSearchParams>,
    #[serde(default)]
    pub critical_boundary: Option<CriticalBoundaryParams>,
}

fn default_num_days() -> u32 {
    16
}

fn default_infectious_duration() -> u32 {
    5
}

fn default_num_trials() -> usize {
    10_000
}

impl Default for Params {
    fn default() -> Self {
        Params {
            seed: 0,
            cluster_size: 5,
            per_contact_transmission_prob: 0.1,
            trip_prob: 1.0,
            policy_compliance_prob: 0.5,
            contacts_per_trip: 10.0,
            policy: PolicyVersion::V1,
            num_days: default_num_days(),
            infectious_duration: default_infectious_duration(),
            num_trials: default_num_trials(),
            estimate_report_name: None,
            grid_search: None,
            critical_boundary: None,
        }
    }
}

fn invalid_parameter(msg: &str) -> IxaError {
    IxaError::IxaError(format!("Invalid parameter: {msg}"))
}

fn validate_probability(name: &str, value: f64) -> Result<(), IxaError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid_parameter(&format!(
            "{name} must be between 0 and 1, inclusive."
        )));
    }
    Ok(())
}

pub(crate) fn validate_step(name: &str, step: f64) -> Result<(), IxaError> {
    if !(MIN_GRID_STEP..=1.0).contains(&step) {
        return Err(invalid_parameter(&format!(
            "{name} step must be between {MIN_GRID_STEP} and 1, inclusive."
        )));
    }
    Ok(())
}

pub fn validate_inputs(parameters: &Params) -> Result<(), IxaError> {
    validate_probability(
        "per_contact_transmission_prob",
        parameters.per_contact_transmission_prob,
    )?;
    validate_probability("trip_prob", parameters.trip_prob)?;
    validate_probability(
        "policy_compliance_prob",
        parameters.policy_compliance_prob,
    )?;
    if parameters.cluster_size < 1 {
        return Err(invalid_parameter("cluster_size must be at least 1."));
    }
    if parameters.num_days < 1 {
        return Err(invalid_parameter("num_days must be at least 1."));
    }
    if parameters.num_trials < 1 {
        return Err(invalid_parameter("num_trials must be at least 1."));
    }
    if !(parameters.contacts_per_trip.is_finite() && parameters.contacts_per_trip >= 0.0) {
        return Err(invalid_parameter(
            "contacts_per_trip must be finite and non-negative.",
        ));
    }
    if let Some(grid_search) = &parameters.grid_search {
        validate_step("grid_search", grid_search.step)?;
    }
    if let Some(critical_boundary) = &parameters.critical_boundary {
        validate_step("critical_boundary", critical_boundary.step)?;
        if !(critical_boundary.r0_threshold.is_finite() && critical_boundary.r0_threshold > 0.0) {
            return Err(invalid_parameter(
                "critical_boundary r0_threshold must be finite and positive.",
            ));
        }
    }
    Ok(())
}

define_global_property!(GlobalParams, Params, validate_inputs);

pub trait ContextParametersExt {
    fn get_params(&self) -> &Params;
}

impl ContextParametersExt for ixa::Context {
    fn get_params(&self) -> &Params {
        self.get_global_property_value(GlobalParams)
            .expect("Expected GlobalParams to be set")
    }
}

#[cfg(test)]
mod test {
    use ixa::{Context, ContextGlobalPropertiesExt, IxaError};

    use super::validate_inputs;
    use crate::{
        parameters::{
            ContextParametersExt, CriticalBoundaryParams, GlobalParams, GridSearchParams, Params,
        },
        policies::PolicyVersion,
    };

    fn expect_invalid(parameters: &Params, expected: &str) {
        match validate_inputs(parameters).err() {
            Some(IxaError::IxaError(msg)) => assert_eq!(msg, expected.to_string()),
            Some(ue) => panic!(
                "Expected an invalid parameter error. Instead got {:?}",
                ue.to_string()
            ),
            None => panic!("Expected an error. Instead, validation passed with no errors."),
        }
    }

    #[test]
    fn test_default_input_file() {
        let mut context = Context::new();
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("input/input.json");
        context
            .load_global_properties(&path)
            .expect("Could not load input file");
        let params = context.get_params();
        assert_eq!(params.cluster_size, 5);
        assert_eq!(params.policy, PolicyVersion::V2);
        assert!(params.grid_search.is_some());
    }

    #[test]
    fn test_get_params() {
        let mut context = Context::new();
        context
            .set_global_property_value(
                GlobalParams,
                Params {
                    cluster_size: 3,
                    ..Params::default()
                },
            )
            .unwrap();

        let &Params {
            cluster_size,
            num_days,
            ..
        } = context.get_params();
        assert_eq!(cluster_size, 3);
        assert_eq!(num_days, 16);
    }

    #[test]
    fn test_defaults_fill_window_fields() {
        let params = serde_json::from_str::<Params>(
            r#"{
                "cluster_size": 4,
                "per_contact_transmission_prob": 0.2,
                "trip_prob": 0.3,
                "policy_compliance_prob": 0.4,
                "contacts_per_trip": 5.0,
                "policy": "V2"
            }"#,
        )
        .unwrap();
        assert_eq!(params.cluster_size, 4);
        assert_eq!(params.policy, PolicyVersion::V2);
        assert_eq!(params.seed, 0);
        assert_eq!(params.num_days, 16);
        assert_eq!(params.infectious_duration, 5);
        assert_eq!(params.num_trials, 10_000);
        assert!(params.grid_search.is_none());
    }

    #[test]
    fn test_unrecognized_policy_rejected() {
        let params_json = r#"{
            "cluster_size": 4,
            "per_contact_transmission_prob": 0.2,
            "trip_prob": 0.3,
            "policy_compliance_prob": 0.4,
            "contacts_per_trip": 5.0,
            "policy": "version3"
        }"#;
        assert!(serde_json::from_str::<Params>(params_json).is_err());
    }

    #[test]
    fn test_misspelled_policy_key_rejected() {
        let params_json = r#"{
            "cluster_size": 3,
            "per_contact_transmission_prob": 0.2,
            "trip_prob": 0.2,
            "policy_compliance_prob": 0.3,
            "contacts_per_trip": 5.0,
            "polcy": "V2"
        }"#;
        assert!(serde_json::from_str::<Params>(params_json).is_err());
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        // No policy.
        let params_json = r#"{
            "cluster_size": 3,
            "per_contact_transmission_prob": 0.2,
            "trip_prob": 0.2,
            "policy_compliance_prob": 0.3,
            "contacts_per_trip": 5.0
        }"#;
        assert!(serde_json::from_str::<Params>(params_json).is_err());

        // No transmission probability.
        let params_json = r#"{
            "cluster_size": 3,
            "trip_prob": 0.2,
            "policy_compliance_prob": 0.3,
            "contacts_per_trip": 5.0,
            "policy": "V1"
        }"#;
        assert!(serde_json::from_str::<Params>(params_json).is_err());
    }

    #[test]
    fn test_misspelled_input_file_key_fails_to_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("input.json");
        std::fs::write(
            &file_path,
            r#"{
                "cluster_r0.GlobalParams": {
                    "cluster_size": 3,
                    "per_contact_transmission_prob": 0.2,
                    "trip_prob": 0.2,
                    "policy_compliance_prob": 0.3,
                    "contacts_per_trip": 5.0,
                    "polcy": "V2"
                }
            }"#,
        )
        .unwrap();
        let mut context = Context::new();
        assert!(context.load_global_properties(&file_path).is_err());
    }

    #[test]
    fn test_unknown_grid_search_key_rejected() {
        let grid_json = r#"{"step": 0.1, "report_name": "surface", "stpe": 0.2}"#;
        assert!(serde_json::from_str::<GridSearchParams>(grid_json).is_err());
    }

    #[test]
    fn test_default_params_valid() {
        assert!(validate_inputs(&Params::default()).is_ok());
    }

    #[test]
    fn test_validate_probabilities() {
        expect_invalid(
            &Params {
                per_contact_transmission_prob: 1.5,
                ..Params::default()
            },
            "Invalid parameter: per_contact_transmission_prob must be between 0 and 1, inclusive.",
        );
        expect_invalid(
            &Params {
                trip_prob: -0.1,
                ..Params::default()
            },
            "Invalid parameter: trip_prob must be between 0 and 1, inclusive.",
        );
        expect_invalid(
            &Params {
                policy_compliance_prob: f64::NAN,
                ..Params::default()
            },
            "Invalid parameter: policy_compliance_prob must be between 0 and 1, inclusive.",
        );
    }

    #[test]
    fn test_validate_counts() {
        expect_invalid(
            &Params {
                cluster_size: 0,
                ..Params::default()
            },
            "Invalid parameter: cluster_size must be at least 1.",
        );
        expect_invalid(
            &Params {
                num_days: 0,
                ..Params::default()
            },
            "Invalid parameter: num_days must be at least 1.",
        );
        expect_invalid(
            &Params {
                num_trials: 0,
                ..Params::default()
            },
            "Invalid parameter: num_trials must be at least 1.",
        );
        expect_invalid(
            &Params {
                contacts_per_trip: -1.0,
                ..Params::default()
            },
            "Invalid parameter: contacts_per_trip must be finite and non-negative.",
        );
    }

    #[test]
    fn test_validate_critical_boundary() {
        expect_invalid(
            &Params {
                critical_boundary: Some(CriticalBoundaryParams {
                    step: 0.0,
                    r0_threshold: 1.0,
                    report_name: "boundary".to_string(),
                }),
                ..Params::default()
            },
            "Invalid parameter: critical_boundary step must be between 0.001 and 1, inclusive.",
        );
        expect_invalid(
            &Params {
                critical_boundary: Some(CriticalBoundaryParams {
                    step: 1e-9,
                    r0_threshold: 1.0,
                    report_name: "boundary".to_string(),
                }),
                ..Params::default()
            },
            "Invalid parameter: critical_boundary step must be between 0.001 and 1, inclusive.",
        );
        expect_invalid(
            &Params {
                critical_boundary: Some(CriticalBoundaryParams {
                    step: 0.1,
                    r0_threshold: 0.0,
                    report_name: "boundary".to_string(),
                }),
                ..Params::default()
            },
            "Invalid parameter: critical_boundary r0_threshold must be finite and positive.",
        );
    }

    #[test]
    fn test_set_invalid_params_fails() {
        let mut context = Context::new();
        let result = context.set_global_property_value(
            GlobalParams,
            Params {
                cluster_size: 0,
                ..Params::default()
            },
        );
        assert!(result.is_err());
    }
}
