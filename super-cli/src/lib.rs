//! Command-line front end for the superannuation refund estimator.

pub mod app;
pub mod config;
pub mod csv_loader;
pub mod cues;
pub mod logging;
pub mod repl;
pub mod report;
