//! Unified error types and result handling.
//!
//! Every fallible operation in the engine returns [`Result`]. Note that an
//! allocation sum differing from its purchase amount is deliberately NOT an
//! error: it is surfaced as a warning flag on read so that incremental data
//! entry is never blocked.

use thiserror::Error;

/// Engine error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    /// No dataset exists with the given id.
    #[error("Dataset not found: {id}")]
    UnknownDataset {
        /// The dataset id that failed to resolve
        id: String,
    },

    /// No budget exists with the given id (in the dataset being operated on).
    #[error("Budget not found: {id}")]
    UnknownBudget {
        /// The budget id that failed to resolve
        id: String,
    },

    /// No purchase exists with the given id.
    #[error("Purchase not found: {id}")]
    UnknownPurchase {
        /// The purchase id that failed to resolve
        id: i64,
    },

    /// No member exists with the given id.
    #[error("Member not found: {id}")]
    UnknownMember {
        /// The member id that failed to resolve
        id: i64,
    },

    /// No actual expense exists with the given id.
    #[error("Actual expense not found: {id}")]
    UnknownExpense {
        /// The expense id that failed to resolve
        id: i64,
    },

    /// A budget merge named the same budget as both source and target.
    #[error("Cannot merge budget {id} into itself")]
    InvalidMergeTarget {
        /// The offending budget id
        id: String,
    },

    /// A write carried a missing required field or an invalid value.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// An import file or column mapping could not be interpreted.
    #[error("Import format error: {message}")]
    ImportFormat {
        /// What was wrong with the file or mapping
        message: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Low-level CSV reader/writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ledger store failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
