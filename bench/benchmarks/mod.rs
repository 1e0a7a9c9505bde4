pub mod cluster_trials;
