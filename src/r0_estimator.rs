use ixa::{debug, Context, ContextRandomExt, IxaError};
use rayon::prelude::*;

use crate::{
    cluster::TrialResult,
    cluster_simulator::{ClusterInfectionSimulator, ContactSampler},
    parameters::{validate_inputs, ContextParametersExt, Params},
};

/// R0 estimate aggregated over many independent trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct R0Estimate {
    pub r0: f64,
    pub neighbor_infections_mean: f64,
    pub travel_infections_mean: f64,
    pub travel_exposure_mean: f64,
    pub num_trials: usize,
}

/// Running sums of trial outputs. Workers each own one and they are merged
/// once all trials are done.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct TrialTotals {
    num_trials: usize,
    neighbor_infections: usize,
    travel_exposure: f64,
}

impl TrialTotals {
    fn record(&mut self, result: TrialResult) {
        self.num_trials += 1;
        self.neighbor_infections += result.neighbor_infections;
        self.travel_exposure += result.travel_exposure_score;
    }

    fn merge(self, other: TrialTotals) -> TrialTotals {
        TrialTotals {
            num_trials: self.num_trials + other.num_trials,
            neighbor_infections: self.neighbor_infections + other.neighbor_infections,
            travel_exposure: self.travel_exposure + other.travel_exposure,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn into_estimate(self, parameters: &Params) -> R0Estimate {
        let num_trials = self.num_trials as f64;
        let neighbor_infections_mean = self.neighbor_infections as f64 / num_trials;
        let travel_exposure_mean = self.travel_exposure / num_trials;
        let travel_infections_mean = travel_exposure_mean
            * parameters.contacts_per_trip
            * parameters.per_contact_transmission_prob;
        let r0 = (neighbor_infections_mean + travel_infections_mean)
            / parameters.cluster_size as f64;
        R0Estimate {
            r0,
            neighbor_infections_mean,
            travel_infections_mean,
            travel_exposure_mean,
            num_trials: self.num_trials,
        }
    }
}

fn run_trials<S: ContactSampler + ?Sized>(
    simulator: &ClusterInfectionSimulator,
    num_trials: usize,
    sampler: &mut S,
) -> TrialTotals {
    let mut totals = TrialTotals::default();
    for _ in 0..num_trials {
        totals.record(simulator.run_trial(&mut *sampler));
    }
    totals
}

/// Runs `num_trials` independent trials and combines the within-cluster and
/// travel-driven infections into a single R0 estimate.
pub fn estimate_r0<S: ContactSampler + ?Sized>(
    parameters: &Params,
    sampler: &mut S,
) -> Result<R0Estimate, IxaError> {
    validate_inputs(parameters)?;
    let simulator = ClusterInfectionSimulator::new(parameters);
    let estimate = run_trials(&simulator, parameters.num_trials, sampler).into_estimate(parameters);
    debug!("R0 estimate for {parameters:?}: {estimate:?}");
    Ok(estimate)
}

/// Splits the trials across `num_workers` workers. Worker `i` draws from its
/// own context seeded with `parameters.seed + i`, so results are reproducible
/// for a fixed seed and worker count.
pub fn estimate_r0_parallel(
    parameters: &Params,
    num_workers: usize,
) -> Result<R0Estimate, IxaError> {
    validate_inputs(parameters)?;
    if num_workers < 1 {
        return Err(IxaError::IxaError(
            "Invalid parameter: the number of workers must be at least 1.".to_string(),
        ));
    }
    let simulator = ClusterInfectionSimulator::new(parameters);
    let base_trials = parameters.num_trials / num_workers;
    let extra_trials = parameters.num_trials % num_workers;

    let per_worker = (0..num_workers)
        .into_par_iter()
        .map(|worker| {
            let mut context = Context::new();
            context.init_random(parameters.seed.wrapping_add(worker as u64));
            let num_trials = base_trials + usize::from(worker < extra_trials);
            run_trials(&simulator, num_trials, &mut context)
        })
        .collect::<Vec<_>>();

    let totals = per_worker
        .into_iter()
        .fold(TrialTotals::default(), TrialTotals::merge);
    let estimate = totals.into_estimate(parameters);
    debug!("R0 estimate from {num_workers} workers for {parameters:?}: {estimate:?}");
    Ok(estimate)
}

pub trait ContextR0EstimatorExt {
    /// Estimates R0 for the loaded global parameters using this context's
    /// random number generator.
    fn estimate_r0(&mut self) -> Result<R0Estimate, IxaError>;

    /// Estimates R0 for arbitrary parameters using this context's random
    /// number generator.
    fn estimate_r0_with(&mut self, parameters: &Params) -> Result<R0Estimate, IxaError>;
}

impl ContextR0EstimatorExt for Context {
    fn estimate_r0(&mut self) -> Result<R0Estimate, IxaError> {
        let parameters = self.get_params().clone();
        self.estimate_r0_with(&parameters)
    }

    fn estimate_r0_with(&mut self, parameters: &Params) -> Result<R0Estimate, IxaError> {
        estimate_r0(parameters, self)
    }
}
