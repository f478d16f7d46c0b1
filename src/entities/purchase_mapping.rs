//! Purchase import mapping entity - The dataset-scoped column mapping for
//! the multi-column purchase import path, stored as a JSON blob and upserted
//! on every successful import so the next import can pre-fill it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase import mapping database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_import_mappings")]
pub struct Model {
    /// Dataset this mapping belongs to (one mapping per dataset)
    #[sea_orm(primary_key, auto_increment = false)]
    pub dataset_id: String,
    /// JSON-serialized [`crate::core::csv_import::ColumnMapping`]
    pub mapping_json: String,
}

/// Defines relationships between PurchaseMapping and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each mapping belongs to one dataset
    #[sea_orm(
        belongs_to = "super::dataset::Entity",
        from = "Column::DatasetId",
        to = "super::dataset::Column::Id"
    )]
    Dataset,
}

impl Related<super::dataset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
