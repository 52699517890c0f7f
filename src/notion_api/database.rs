use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{
    error::NotionError,
    model::{PageProperties, PropertyDefinitions, RemoteSchema},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DatabaseId(String);

impl DatabaseId {
    pub fn new(id: String) -> Self {
        Self(id)
    }
}

impl Display for DatabaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct PageId(pub String);

/// The operations on a Notion database that the importer relies on.
#[allow(async_fn_in_trait)]
pub trait NotionDatabase {
    async fn retrieve_schema(&self, database_id: &DatabaseId) -> Result<RemoteSchema, NotionError>;

    /// Applies the given property definitions. Properties not mentioned stay untouched.
    async fn update_schema(
        &self,
        database_id: &DatabaseId,
        properties: &PropertyDefinitions,
    ) -> Result<RemoteSchema, NotionError>;

    async fn create_page(
        &self,
        database_id: &DatabaseId,
        properties: &PageProperties,
    ) -> Result<PageId, NotionError>;
}
