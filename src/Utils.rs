//! different utility modules used throughout the project
/// tiny module to initialize terminal logging
pub mod logger;
/// tiny module to plot computed trajectories
pub mod plots;
/// tiny module to save trajectories into file
pub mod save_results;
