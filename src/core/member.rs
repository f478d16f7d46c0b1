//! Member business logic.
//!
//! Members are descriptive only. Purchases carry a free-text member name,
//! not a foreign key, so renaming or deleting a member here never rewrites
//! purchase history - an old name simply degrades to an unassigned label.

use crate::{
    entities::{Dataset, Member, member},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};

/// Lists the members of a dataset in creation order.
pub async fn list_members(db: &DatabaseConnection, dataset_id: &str) -> Result<Vec<member::Model>> {
    Member::find()
        .filter(member::Column::DatasetId.eq(dataset_id))
        .order_by_asc(member::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a member to a dataset.
pub async fn create_member(
    db: &DatabaseConnection,
    dataset_id: &str,
    name: &str,
) -> Result<member::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "member name cannot be empty".to_string(),
        });
    }
    Dataset::find_by_id(dataset_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownDataset {
            id: dataset_id.to_string(),
        })?;

    let model = member::ActiveModel {
        dataset_id: Set(dataset_id.to_string()),
        name: Set(name.trim().to_string()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Renames a member.
pub async fn rename_member(
    db: &DatabaseConnection,
    member_id: i64,
    name: &str,
) -> Result<member::Model> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "member name cannot be empty".to_string(),
        });
    }
    let existing = Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownMember { id: member_id })?;

    let mut model: member::ActiveModel = existing.into();
    model.name = Set(name.trim().to_string());
    model.update(db).await.map_err(Into::into)
}

/// Removes a member. Purchases attributed to the member are untouched.
pub async fn delete_member(db: &DatabaseConnection, member_id: i64) -> Result<()> {
    let existing = Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or(Error::UnknownMember { id: member_id })?;
    existing.delete(db).await?;
    Ok(())
}
