//! Git history analysis that flags commits with tool-assisted authorship
//! signatures: oversized changes, implausible line velocity and commits
//! landing too close together.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod git;
pub mod init;
pub mod model;
pub mod pairing;
pub mod report;
pub mod stats;
pub mod util;
pub mod velocity;
