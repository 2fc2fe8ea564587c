//! Numerical collaborators: fixed-grid integration of the second-order
//! linear equation and finite differencing of sampled trajectories.

pub mod finite_diff;
pub mod ode2;
