//! Sweeps over the travel parameters: a full R0 surface over the
//! (`trip_prob`, `policy_compliance_prob`) grid, and a search for the
//! boundary below which travel restrictions keep R0 under a threshold.

use ixa::{info, report::ContextReportExt, trace, Context, IxaError};

use crate::{
    parameters::{validate_inputs, validate_step, CriticalBoundaryParams, GridSearchParams, Params},
    r0_estimator::{ContextR0EstimatorExt, R0Estimate},
    reports::{CriticalBoundaryReport, R0SurfaceReport},
};

/// One point of an R0 surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub trip_prob: f64,
    pub policy_compliance_prob: f64,
    pub estimate: R0Estimate,
}

/// Grid `0, step, 2 * step, ...` up to and including 1.0. Values within a
/// tenth of a step of 1.0 are snapped to 1.0.
///
/// # Errors
///
/// Returns an error if `step` is outside `[MIN_GRID_STEP, 1]`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn probability_grid(step: f64) -> Result<Vec<f64>, IxaError> {
    validate_step("grid", step)?;
    let last_index = (1.0 / step + 0.1).floor() as usize;
    let grid = (0..=last_index)
        .map(|index| {
            let value = index as f64 * step;
            if (value - 1.0).abs() <= 0.1 * step {
                1.0
            } else {
                value
            }
        })
        .collect();
    Ok(grid)
}

fn with_travel(parameters: &Params, trip_prob: f64, policy_compliance_prob: f64) -> Params {
    Params {
        trip_prob,
        policy_compliance_prob,
        ..parameters.clone()
    }
}

/// Estimates R0 at every grid point, trip probability outermost, and writes one
/// row per point to the surface report.
pub fn run_grid_search(
    context: &mut Context,
    parameters: &Params,
    grid_search: &GridSearchParams,
) -> Result<Vec<SurfacePoint>, IxaError> {
    validate_inputs(parameters)?;
    let grid = probability_grid(grid_search.step)?;
    context.add_report::<R0SurfaceReport>(&grid_search.report_name)?;

    let mut surface = Vec::with_capacity(grid.len() * grid.len());
    for &trip_prob in &grid {
        for &policy_compliance_prob in &grid {
            let point_parameters = with_travel(parameters, trip_prob, policy_compliance_prob);
            let estimate = context.estimate_r0_with(&point_parameters)?;
            trace!("Grid point ({trip_prob}, {policy_compliance_prob}): R0 = {}", estimate.r0);
            context.send_report(R0SurfaceReport::new(&point_parameters, &estimate));
            surface.push(SurfacePoint {
                trip_prob,
                policy_compliance_prob,
                estimate,
            });
        }
    }
    info!(
        "Grid search over {} points finished for cluster size {}",
        surface.len(),
        parameters.cluster_size
    );
    Ok(surface)
}

/// For each trip probability, finds the largest policy compliance probability
/// on the grid that keeps R0 below the threshold.
///
/// R0 grows with both probabilities, so the compliance value found for one
/// trip probability is the starting point for the next one. Trip probabilities
/// for which no compliance value is low enough are left out.
pub fn find_critical_boundary(
    context: &mut Context,
    parameters: &Params,
    critical_boundary: &CriticalBoundaryParams,
) -> Result<Vec<SurfacePoint>, IxaError> {
    validate_inputs(parameters)?;
    let step = critical_boundary.step;
    let trip_grid = probability_grid(step)?;
    context.add_report::<CriticalBoundaryReport>(&critical_boundary.report_name)?;

    let mut boundary = Vec::new();
    let mut policy_compliance_prob = 1.0;
    for trip_prob in trip_grid {
        while policy_compliance_prob > -0.1 * step {
            let point_parameters = with_travel(parameters, trip_prob, policy_compliance_prob);
            let estimate = context.estimate_r0_with(&point_parameters)?;
            if estimate.r0 >= critical_boundary.r0_threshold {
                policy_compliance_prob -= step;
                if policy_compliance_prob > -0.1 * step && policy_compliance_prob < 0.0 {
                    policy_compliance_prob = 0.0;
                }
                continue;
            }
            trace!(
                "Boundary at trip_prob {trip_prob}: policy_compliance_prob {policy_compliance_prob}, R0 = {}",
                estimate.r0
            );
            context.send_report(CriticalBoundaryReport {
                cluster_size: parameters.cluster_size,
                policy: parameters.policy,
                r0_threshold: critical_boundary.r0_threshold,
                trip_prob,
                policy_compliance_prob,
                r0: estimate.r0,
            });
            boundary.push(SurfacePoint {
                trip_prob,
                policy_compliance_prob,
                estimate,
            });
            break;
        }
    }
    info!(
        "Critical boundary search found {} points for cluster size {}",
        boundary.len(),
        parameters.cluster_size
    );
    Ok(boundary)
}
