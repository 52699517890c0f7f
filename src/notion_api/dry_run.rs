use std::cell::RefCell;

use super::{
    database::{DatabaseId, NotionDatabase, PageId},
    error::NotionError,
    model::{PageProperties, PropertyDefinitions, RemoteSchema},
};

/// Accepts every call without talking to Notion. Starts out with an empty database.
#[derive(Default)]
pub struct DryRun {
    schema: RefCell<RemoteSchema>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotionDatabase for DryRun {
    async fn retrieve_schema(&self, database_id: &DatabaseId) -> Result<RemoteSchema, NotionError> {
        log::debug!("[dry run] Retrieving schema of {database_id}");
        Ok(self.schema.borrow().clone())
    }

    async fn update_schema(
        &self,
        database_id: &DatabaseId,
        properties: &PropertyDefinitions,
    ) -> Result<RemoteSchema, NotionError> {
        log::debug!(
            "[dry run] Updating schema of {database_id} with {} properties",
            properties.len()
        );
        let mut schema = self.schema.borrow_mut();
        schema.apply(properties);
        Ok(schema.clone())
    }

    async fn create_page(
        &self,
        database_id: &DatabaseId,
        properties: &PageProperties,
    ) -> Result<PageId, NotionError> {
        log::debug!("[dry run] Creating page in {database_id}: {properties:?}");
        Ok(PageId("dry-run".to_string()))
    }
}
