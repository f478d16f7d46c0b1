//! Purchase entity - A prospective or completed expenditure.
//!
//! `amount` is the authoritative total cost; the split across budgets lives
//! in the allocation rows owned by this purchase. `member_name` is free text
//! (decoupled from the member lifecycle), and `category`/`status` hold the
//! string form of the closed enumerations defined in
//! [`crate::core::purchase`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Dataset this purchase belongs to
    pub dataset_id: String,
    /// Free-text attribution to a person; intentionally not a foreign key
    pub member_name: Option<String>,
    /// Category string: `"fixed-cost"`, `"travel"`, or `"other"`
    pub category: String,
    /// What is being bought
    pub item_name: String,
    /// Authoritative total cost of the purchase
    pub amount: f64,
    /// Display unit label
    pub unit: String,
    /// Status string: `"drafted"`, `"estimated"`, `"shopping"`, `"purchased"`, or `"declined"`
    pub status: String,
    /// Priority from 1 (lowest) to 5 (highest)
    pub priority: i32,
    /// Optional free-text note
    pub note: Option<String>,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one dataset
    #[sea_orm(
        belongs_to = "super::dataset::Entity",
        from = "Column::DatasetId",
        to = "super::dataset::Column::Id"
    )]
    Dataset,
    /// One purchase owns many allocations
    #[sea_orm(has_many = "super::allocation::Entity")]
    Allocations,
}

impl Related<super::dataset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl Related<super::allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
