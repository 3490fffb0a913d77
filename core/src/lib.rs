//! Skills gap analysis: decode two tables, compute per-employee gaps
//! against role requirements, and reduce them into report-ready summaries.

pub mod advisor;
pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod decoder;
pub mod error;
pub mod gap_engine;
pub mod report;
pub mod types;
