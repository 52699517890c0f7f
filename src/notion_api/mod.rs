mod client;
mod database;
mod dry_run;
mod error;
mod model;
#[cfg(test)]
mod testutils;

pub use client::Notion;
pub use database::{DatabaseId, NotionDatabase, PageId};
pub use dry_run::DryRun;
pub use error::NotionError;
pub use model::{
    NumberFormat, PageProperties, PropertyDefinition, PropertyDefinitions, PropertySchema,
    PropertyValue, RemoteProperty, RemoteSchema, RichText, SelectOption,
};
#[cfg(test)]
pub use testutils::RecordingDatabase;
