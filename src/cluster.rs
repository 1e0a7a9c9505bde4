/// Whether a member has ever been infected during the trial. Contagiousness is
/// tracked separately by `Member::infectious_days_remaining`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfectionStatus {
    Susceptible,
    Infected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub status: InfectionStatus,
    /// Counts down once per day after infection and may go negative.
    pub infectious_days_remaining: i64,
}

impl Member {
    fn susceptible() -> Self {
        Member {
            status: InfectionStatus::Susceptible,
            infectious_days_remaining: 0,
        }
    }

    fn infected(infectious_duration: u32) -> Self {
        Member {
            status: InfectionStatus::Infected,
            infectious_days_remaining: i64::from(infectious_duration),
        }
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.status == InfectionStatus::Infected
    }

    #[must_use]
    pub fn is_infectious(&self) -> bool {
        self.infectious_days_remaining > 0
    }

    pub(crate) fn infect(&mut self, infectious_duration: u32) {
        *self = Member::infected(infectious_duration);
    }

    pub(crate) fn count_down(&mut self) {
        self.infectious_days_remaining -= 1;
    }
}

/// The members of one simulated cluster. Member 0 is the index case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterState {
    members: Vec<Member>,
}

impl ClusterState {
    /// Creates a cluster whose index case has just become infected and whose
    /// other members are all susceptible.
    #[must_use]
    pub fn new(cluster_size: usize, infectious_duration: u32) -> Self {
        let mut members = vec![Member::susceptible(); cluster_size];
        if let Some(index_case) = members.first_mut() {
            index_case.infect(infectious_duration);
        }
        ClusterState { members }
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub(crate) fn member_mut(&mut self, index: usize) -> &mut Member {
        &mut self.members[index]
    }

    /// Number of members still contagious.
    #[must_use]
    pub fn count_infectious(&self) -> usize {
        self.members.iter().filter(|m| m.is_infectious()).count()
    }

    /// Number of members other than the index case that have been infected.
    #[must_use]
    pub fn neighbor_infections(&self) -> usize {
        self.members
            .iter()
            .skip(1)
            .filter(|m| m.is_infected())
            .count()
    }
}

/// Output of a single trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialResult {
    pub neighbor_infections: usize,
    pub travel_exposure_score: f64,
}
