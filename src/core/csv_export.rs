//! CSV export gateway - the structural inverse of the import path.
//!
//! A purchase can hold N allocations while the export format is flat, so
//! the output is denormalized: one row per (purchase, allocation) pair, and
//! one row with empty budget/allocation columns for a purchase that has
//! none. The text is UTF-8 with a byte-order-mark prefix so spreadsheet
//! tools pick the encoding up correctly.

use crate::{
    core::purchase::list_purchases,
    entities::Dataset,
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, prelude::*};

/// Header row of the export format, aligned with the import mapping's
/// logical field names.
const EXPORT_HEADERS: [&str; 10] = [
    "member_name",
    "category",
    "item_name",
    "amount",
    "unit",
    "status",
    "priority",
    "note",
    "budget_id",
    "allocation_amount",
];

/// Serializes a dataset's purchases to CSV text.
pub async fn export_purchases_csv(db: &DatabaseConnection, dataset_id: &str) -> Result<String> {
    Dataset::find_by_id(dataset_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownDataset {
            id: dataset_id.to_string(),
        })?;

    let records = list_purchases(db, dataset_id).await?;

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(EXPORT_HEADERS)?;

    for record in &records {
        let purchase = &record.purchase;
        let base = [
            purchase.member_name.clone().unwrap_or_default(),
            purchase.category.clone(),
            purchase.item_name.clone(),
            purchase.amount.to_string(),
            purchase.unit.clone(),
            purchase.status.clone(),
            purchase.priority.to_string(),
            purchase.note.clone().unwrap_or_default(),
        ];

        if record.allocations.is_empty() {
            let mut row = base.to_vec();
            row.push(String::new());
            row.push(String::new());
            writer.write_record(&row)?;
        } else {
            for allocation in &record.allocations {
                let mut row = base.to_vec();
                row.push(allocation.budget_id.clone());
                row.push(allocation.amount.to_string());
                writer.write_record(&row)?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    let body = String::from_utf8(bytes).map_err(|e| Error::ImportFormat {
        message: format!("exported CSV is not valid UTF-8: {e}"),
    })?;

    Ok(format!("\u{feff}{body}"))
}
