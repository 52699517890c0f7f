use anyhow::{Context as _, Result};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::NotionConfig;

use super::{
    database::{DatabaseId, NotionDatabase, PageId},
    error::NotionError,
    model::{PageProperties, PropertyDefinitions, RemoteSchema},
};

const NOTION_VERSION: &str = "2022-06-28";

pub struct Notion {
    client: Client,
    token: String,
    base_url: String,
}

impl Notion {
    pub fn new(config: &NotionConfig) -> Result<Notion> {
        let client = ClientBuilder::new()
            .build()
            .context("Error creating HTTP client")?;
        Ok(Notion {
            client,
            token: config.token.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, NotionError> {
        let response = request
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(NotionError::from_response(status.as_u16(), &body));
        }
        Ok(response.json::<T>().await?)
    }
}

impl NotionDatabase for Notion {
    async fn retrieve_schema(&self, database_id: &DatabaseId) -> Result<RemoteSchema, NotionError> {
        log::info!("Retrieving database schema...");
        let schema = self
            .send(
                self.client
                    .get(format!("{base}/databases/{database_id}", base = self.base_url)),
            )
            .await?;
        log::info!("Retrieving database schema...done");
        Ok(schema)
    }

    async fn update_schema(
        &self,
        database_id: &DatabaseId,
        properties: &PropertyDefinitions,
    ) -> Result<RemoteSchema, NotionError> {
        log::info!("Updating database schema...");
        let schema = self
            .send(
                self.client
                    .patch(format!("{base}/databases/{database_id}", base = self.base_url))
                    .json(&json!({ "properties": properties })),
            )
            .await?;
        log::info!("Updating database schema...done");
        Ok(schema)
    }

    async fn create_page(
        &self,
        database_id: &DatabaseId,
        properties: &PageProperties,
    ) -> Result<PageId, NotionError> {
        #[derive(serde::Deserialize)]
        struct CreatedPage {
            id: PageId,
        }

        let page: CreatedPage = self
            .send(
                self.client
                    .post(format!("{base}/pages", base = self.base_url))
                    .json(&json!({
                        "parent": { "database_id": database_id },
                        "properties": properties,
                    })),
            )
            .await?;
        Ok(page.id)
    }
}
