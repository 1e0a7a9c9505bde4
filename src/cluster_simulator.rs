use ixa::{define_rng, trace, Context, ContextRandomExt};

use crate::{
    cluster::{ClusterState, InfectionStatus, TrialResult},
    parameters::Params,
    policies::TravelExposure,
};

define_rng!(ClusterTransmissionRng);

/// Source of the per-contact Bernoulli draws used by a trial.
pub trait ContactSampler {
    /// Returns `true` if a single contact with a contagious member transmits.
    fn sample_contact(&mut self, transmission_prob: f64) -> bool;
}

impl ContactSampler for Context {
    fn sample_contact(&mut self, transmission_prob: f64) -> bool {
        self.sample_bool(ClusterTransmissionRng, transmission_prob)
    }
}

/// Day-stepped branching process over a single fully-connected cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterInfectionSimulator {
    pub cluster_size: usize,
    pub per_contact_transmission_prob: f64,
    pub num_days: u32,
    pub infectious_duration: u32,
    pub travel: TravelExposure,
}

impl ClusterInfectionSimulator {
    #[must_use]
    pub fn new(parameters: &Params) -> Self {
        ClusterInfectionSimulator {
            cluster_size: parameters.cluster_size,
            per_contact_transmission_prob: parameters.per_contact_transmission_prob,
            num_days: parameters.num_days,
            infectious_duration: parameters.infectious_duration,
            travel: TravelExposure {
                policy: parameters.policy,
                trip_prob: parameters.trip_prob,
                policy_compliance_prob: parameters.policy_compliance_prob,
                num_days: parameters.num_days,
            },
        }
    }

    /// A susceptible member draws once per contagious member and is infected
    /// if any draw succeeds. Every draw is taken even after a success.
    fn is_infected_today<S: ContactSampler + ?Sized>(
        &self,
        num_infectious: usize,
        sampler: &mut S,
    ) -> bool {
        let successes = (0..num_infectious)
            .filter(|_| sampler.sample_contact(self.per_contact_transmission_prob))
            .count();
        successes > 0
    }

    /// Runs one trial from a fresh cluster.
    ///
    /// Status transitions for a day are decided against the state at the start
    /// of that day, so an infection can't chain through a second member on the
    /// same day. The travel exposure score is updated in place as each new
    /// infection is found, so later members on the same day see the updated score.
    pub fn run_trial<S: ContactSampler + ?Sized>(&self, sampler: &mut S) -> TrialResult {
        let mut cluster = ClusterState::new(self.cluster_size, self.infectious_duration);
        let mut day_start = cluster.clone();
        let mut travel_exposure_score = 0.0;

        for day in 0..self.num_days {
            day_start.clone_from(&cluster);
            let num_infectious = day_start.count_infectious();

            for (index, member) in day_start.members().iter().enumerate() {
                match member.status {
                    InfectionStatus::Infected => cluster.member_mut(index).count_down(),
                    InfectionStatus::Susceptible => {
                        if self.is_infected_today(num_infectious, &mut *sampler) {
                            cluster.member_mut(index).infect(self.infectious_duration);
                            travel_exposure_score =
                                self.travel.on_infection(travel_exposure_score, day);
                            trace!("Day {day}: member {index} infected by {num_infectious} contagious members");
                        }
                    }
                }
            }
        }

        travel_exposure_score = self.travel.index_case(travel_exposure_score);

        let result = TrialResult {
            neighbor_infections: cluster.neighbor_infections(),
            travel_exposure_score,
        };
        trace!("Trial finished: {result:?}");
        result
    }
}
