use anyhow::{Context as _, Result};

use crate::notion_api::{DatabaseId, NotionDatabase, NotionError, RemoteSchema};

use super::{definition::build_definitions, options::SchemaOptions};

/// Pushes the properties and select options needed by `options` to the database.
///
/// Returns the schema as Notion reports it after the update. Any failure here must abort
/// the import, rows must never be written against a stale schema.
pub async fn synchronize(
    database: &impl NotionDatabase,
    database_id: &DatabaseId,
    options: &SchemaOptions,
) -> Result<RemoteSchema> {
    let current = database
        .retrieve_schema(database_id)
        .await
        .map_err(|err| log_failure("retrieve", database_id, err))
        .context("Failed to retrieve the current database schema")?;
    log::debug!(
        "Current properties: {:?}",
        current.properties.keys().collect::<Vec<_>>()
    );

    let definitions = build_definitions(options, &current)?;
    database
        .update_schema(database_id, &definitions)
        .await
        .map_err(|err| log_failure("update", database_id, err))
        .context("Failed to update the database schema")?;

    let updated = database
        .retrieve_schema(database_id)
        .await
        .map_err(|err| log_failure("retrieve", database_id, err))
        .context("Failed to retrieve the updated database schema")?;
    log::debug!(
        "Updated properties: {:?}",
        updated.properties.keys().collect::<Vec<_>>()
    );
    Ok(updated)
}

fn log_failure(operation: &str, database_id: &DatabaseId, err: NotionError) -> NotionError {
    log::error!("Failed to {operation} schema of database {database_id}: {err}");
    if let Some(body) = err.body() {
        log::error!("Notion response: {body}");
    }
    err
}
