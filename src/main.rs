mod cli;

use anyhow::Result;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use dbscout::assemble::SchemaReader;
use dbscout::pg::PgMetadataSource;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let url = cli.parse_connection()?;

    tracing::debug!("Connecting to database...");
    // One connection: the reader owns it exclusively for the run.
    let pool = PgPoolOptions::new().max_connections(1).connect(&url).await?;

    let mut reader = SchemaReader::new(PgMetadataSource::new(pool.clone()))
        .with_excluded_tables(cli.excluded_tables())
        .with_progress(|msg| tracing::info!("{msg}"));

    let types = cli.type_list();
    if cli.tolerant {
        let tables = reader
            .list_basic_table_info(
                cli.catalog.as_deref(),
                cli.schema.as_deref(),
                cli.table.as_deref(),
                &types,
            )
            .await?;
        tracing::info!("Read {} tables", tables.len());
        for table in &tables {
            tracing::info!(
                "{} {} ({} columns, {} foreign keys)",
                table.kind,
                table.name,
                table.columns.len(),
                table.foreign_keys.len()
            );
        }
    } else {
        let explicit = cli.table_list();
        let model = reader
            .process_schema(
                cli.catalog.as_deref().unwrap_or_default(),
                cli.schema.as_deref(),
                cli.table.as_deref(),
                &types,
                explicit.as_deref(),
            )
            .await?;
        tracing::info!("Schema {}: {} tables", model.name, model.tables.len());
        for table in &model.tables {
            tracing::info!(
                "{} {} ({} columns, pk: {}, {} indexes, {} foreign keys)",
                table.kind,
                table.name,
                table.columns.len(),
                table.primary_key.is_some(),
                table.indexes.len(),
                table.foreign_keys.len()
            );
        }
    }

    pool.close().await;
    Ok(())
}
