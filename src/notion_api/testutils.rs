use std::cell::RefCell;

use super::{
    database::{DatabaseId, NotionDatabase, PageId},
    error::NotionError,
    model::{PageProperties, PropertyDefinitions, PropertyValue, RemoteSchema},
};

/// In-memory Notion database that records every call.
#[derive(Default)]
pub struct RecordingDatabase {
    schema: RefCell<RemoteSchema>,
    pub schema_updates: RefCell<Vec<PropertyDefinitions>>,
    pub retrieve_calls: RefCell<usize>,
    pub pages: RefCell<Vec<PageProperties>>,
    fail_schema_update: bool,
    rejected_titles: Vec<String>,
}

impl RecordingDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: RemoteSchema) -> Self {
        Self {
            schema: RefCell::new(schema),
            ..Self::default()
        }
    }

    pub fn failing_schema_update() -> Self {
        Self {
            fail_schema_update: true,
            ..Self::default()
        }
    }

    /// Page creation fails for pages whose title equals `title`.
    pub fn rejecting_title(mut self, title: &str) -> Self {
        self.rejected_titles.push(title.to_string());
        self
    }

    fn validation_error(message: &str) -> NotionError {
        NotionError::from_response(
            400,
            &serde_json::json!({
                "object": "error",
                "status": 400,
                "code": "validation_error",
                "message": message,
            })
            .to_string(),
        )
    }
}

impl NotionDatabase for RecordingDatabase {
    async fn retrieve_schema(&self, _database_id: &DatabaseId) -> Result<RemoteSchema, NotionError> {
        *self.retrieve_calls.borrow_mut() += 1;
        Ok(self.schema.borrow().clone())
    }

    async fn update_schema(
        &self,
        _database_id: &DatabaseId,
        properties: &PropertyDefinitions,
    ) -> Result<RemoteSchema, NotionError> {
        if self.fail_schema_update {
            return Err(Self::validation_error("schema update rejected"));
        }
        self.schema_updates.borrow_mut().push(properties.clone());
        let mut schema = self.schema.borrow_mut();
        schema.apply(properties);
        Ok(schema.clone())
    }

    async fn create_page(
        &self,
        _database_id: &DatabaseId,
        properties: &PageProperties,
    ) -> Result<PageId, NotionError> {
        let rejected = properties.values().any(|value| match value {
            PropertyValue::Title(text) => text
                .iter()
                .any(|text| self.rejected_titles.iter().any(|t| t == text.content())),
            _ => false,
        });
        if rejected {
            return Err(Self::validation_error("page rejected"));
        }
        let mut pages = self.pages.borrow_mut();
        pages.push(properties.clone());
        Ok(PageId(format!("page-{}", pages.len())))
    }
}
