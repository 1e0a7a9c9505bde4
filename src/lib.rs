// Re-export commonly used types at the crate root
pub use cluster::{ClusterState, InfectionStatus, Member, TrialResult};
pub use cluster_simulator::{ClusterInfectionSimulator, ContactSampler};
pub use parameters::Params;
pub use policies::{PolicyVersion, TravelExposure};
pub use r0_estimator::{estimate_r0, estimate_r0_parallel, R0Estimate};

// Module declarations
pub mod cluster;
pub mod cluster_simulator;
pub mod grid_search;
pub mod parameters;
pub mod policies;
pub mod r0_estimator;
pub mod reports;

// Re-export common macros
pub use ixa::assert_almost_eq;
