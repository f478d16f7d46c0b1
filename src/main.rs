//! Bootstrap binary: initializes logging and configuration, opens the
//! ledger store, creates tables, and seeds the first dataset on an empty
//! store. The presentation/transport layer is an external collaborator and
//! is not started here.

use budget_buddy::{
    config::{database, settings},
    core::{budget, dataset},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load settings (display unit, optional seed templates)
    let settings = settings::load_default_settings();
    info!(display_unit = %settings.display_unit, "Loaded settings.");

    // 4. Initialize the ledger store
    let db = database::create_connection().await?;
    database::create_tables(&db).await?;
    info!("Ledger store initialized.");

    // 5. Seed the first dataset when the store is empty
    if dataset::list_datasets(&db).await?.is_empty() {
        if let Some(seed) = settings.seed {
            let created = dataset::create_dataset(&db, &seed.dataset_name).await?;
            for template in seed.budgets {
                budget::create_budget(
                    &db,
                    &created.id,
                    budget::BudgetInput {
                        id: None,
                        name: template.name,
                        total_amount: template.total_amount,
                        unit: settings.display_unit.clone(),
                        description: template.description,
                    },
                )
                .await?;
            }
            info!(dataset = %created.id, "Seeded initial dataset from config.toml.");
        }
    }

    info!("Engine bootstrap complete.");
    Ok(())
}
