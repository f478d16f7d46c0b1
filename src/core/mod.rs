//! Core business logic - framework-agnostic engine operations.
//!
//! Everything in here is callable from any transport layer: allocation
//! validation and distribution, dashboard aggregation, budget merge, dataset
//! rollover, CSV import/export, and plain CRUD for the ledger entities.

/// Allocation engine - split validation, distribution, mismatch detection
pub mod allocation;
/// Budget operations, including the merge operator
pub mod budget;
/// CSV export gateway
pub mod csv_export;
/// CSV import gateway and persisted column mappings
pub mod csv_import;
/// Dashboard aggregator - derived per-budget and dataset-wide figures
pub mod dashboard;
/// Dataset operations, including the rollover operator
pub mod dataset;
/// Actual expense operations
pub mod expense;
/// Member operations
pub mod member;
/// Purchase operations and the status/category enumerations
pub mod purchase;
