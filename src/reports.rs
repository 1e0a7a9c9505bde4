use ixa::{define_report, report::ContextReportExt, Context, IxaError};
use serde::{Deserialize, Serialize};

use crate::{parameters::Params, policies::PolicyVersion, r0_estimator::R0Estimate};

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct R0EstimateReport {
    pub cluster_size: usize,
    pub policy: PolicyVersion,
    pub trip_prob: f64,
    pub policy_compliance_prob: f64,
    pub contacts_per_trip: f64,
    pub num_trials: usize,
    pub r0: f64,
    pub neighbor_infections_mean: f64,
    pub travel_infections_mean: f64,
}

define_report!(R0EstimateReport);

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct R0SurfaceReport {
    pub cluster_size: usize,
    pub policy: PolicyVersion,
    pub trip_prob: f64,
    pub policy_compliance_prob: f64,
    pub contacts_per_trip: f64,
    pub num_trials: usize,
    pub r0: f64,
    pub neighbor_infections_mean: f64,
    pub travel_infections_mean: f64,
}

define_report!(R0SurfaceReport);

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CriticalBoundaryReport {
    pub cluster_size: usize,
    pub policy: PolicyVersion,
    pub r0_threshold: f64,
    pub trip_prob: f64,
    pub policy_compliance_prob: f64,
    pub r0: f64,
}

define_report!(CriticalBoundaryReport);

impl R0EstimateReport {
    #[must_use]
    pub fn new(parameters: &Params, estimate: &R0Estimate) -> Self {
        R0EstimateReport {
            cluster_size: parameters.cluster_size,
            policy: parameters.policy,
            trip_prob: parameters.trip_prob,
            policy_compliance_prob: parameters.policy_compliance_prob,
            contacts_per_trip: parameters.contacts_per_trip,
            num_trials: estimate.num_trials,
            r0: estimate.r0,
            neighbor_infections_mean: estimate.neighbor_infections_mean,
            travel_infections_mean: estimate.travel_infections_mean,
        }
    }
}

impl R0SurfaceReport {
    #[must_use]
    pub fn new(parameters: &Params, estimate: &R0Estimate) -> Self {
        R0SurfaceReport {
            cluster_size: parameters.cluster_size,
            policy: parameters.policy,
            trip_prob: parameters.trip_prob,
            policy_compliance_prob: parameters.policy_compliance_prob,
            contacts_per_trip: parameters.contacts_per_trip,
            num_trials: estimate.num_trials,
            r0: estimate.r0,
            neighbor_infections_mean: estimate.neighbor_infections_mean,
            travel_infections_mean: estimate.travel_infections_mean,
        }
    }
}

/// Registers the estimate report if the parameters name one.
pub fn init_estimate_report(context: &mut Context, parameters: &Params) -> Result<(), IxaError> {
    if let Some(report_name) = &parameters.estimate_report_name {
        context.add_report::<R0EstimateReport>(report_name)?;
    }
    Ok(())
}

pub fn record_estimate(context: &mut Context, parameters: &Params, estimate: &R0Estimate) {
    if parameters.estimate_report_name.is_some() {
        context.send_report(R0EstimateReport::new(parameters, estimate));
    }
}
