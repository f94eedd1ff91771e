//! The ETL coordinator: per-dataset validation, partitioning, static table
//! loading, the dataset adapters, and the package/bundle orchestration that
//! ties them together.

pub mod emissions;
pub mod finance;
pub mod generators;
pub mod linkage;
pub mod package;
pub mod params;
pub mod partition;
pub mod ports;
pub mod reference;
pub mod static_tables;
