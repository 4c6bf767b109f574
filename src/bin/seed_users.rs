use migration::{Migrator, MigratorTrait};
use qau_api::bootstrap::seed_users;
use qau_api::static_service::init_database_connection;
use qau_api::utils::tracing::init_standard_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    let db = init_database_connection().await?;
    Migrator::up(db, None).await?;

    let created = seed_users(db).await?;
    tracing::info!(created, "Seed users ready");
    Ok(())
}
